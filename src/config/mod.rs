//! Configuration module for tripdesk
//!
//! A desk file is a single TOML document holding settings (logging,
//! matching) and the desk snapshot itself: rules, staff and queries.
//!
//! # Configuration Precedence
//!
//! 1. CLI arguments (highest priority)
//! 2. Environment variables (`TRIPDESK_*`)
//! 3. Configuration file (TOML)
//! 4. Default values (lowest priority)
//!
//! # Example
//!
//! ```rust
//! use tripdesk::config::DeskConfig;
//!
//! // Defaults carry the standard rule catalog and nothing else
//! let config = DeskConfig::default();
//! assert_eq!(config.rules.len(), 4);
//! assert!(config.staff.is_empty());
//!
//! // Parse from TOML
//! let toml = r#"
//! [[staff]]
//! id = "s-1"
//! name = "Amira"
//! active = true
//! workload_capacity = 4
//! "#;
//! let config: DeskConfig = toml::from_str(toml).unwrap();
//! assert_eq!(config.staff[0].workload_capacity, 4);
//! ```

pub mod error;
pub mod logging;
pub mod matching;

pub use error::ConfigError;
pub use logging::{LogFormat, LoggingConfig};
pub use matching::MatchingConfig;

use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::path::Path;

use crate::roster::{Query, StaffMember};
use crate::rules::{AssignmentRule, RuleCatalog};

/// Unified desk file: settings plus the roster snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DeskConfig {
    /// Logging configuration
    pub logging: LoggingConfig,
    /// Matcher tuning
    pub matching: MatchingConfig,
    /// Rule catalog; omitted means the four standard rules
    pub rules: Vec<AssignmentRule>,
    /// Staff roster
    pub staff: Vec<StaffMember>,
    /// Queries in arrival order
    pub queries: Vec<Query>,
}

impl Default for DeskConfig {
    fn default() -> Self {
        Self {
            logging: LoggingConfig::default(),
            matching: MatchingConfig::default(),
            rules: RuleCatalog::default().rules().to_vec(),
            staff: Vec::new(),
            queries: Vec::new(),
        }
    }
}

impl DeskConfig {
    /// Load configuration from a TOML file
    ///
    /// If path is None, returns default configuration.
    /// If path doesn't exist, returns NotFound error.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        match path {
            Some(p) => {
                if !p.exists() {
                    return Err(ConfigError::NotFound(p.to_path_buf()));
                }
                let content = std::fs::read_to_string(p)?;
                toml::from_str(&content).map_err(|e| ConfigError::Parse {
                    path: p.to_path_buf(),
                    message: e.to_string(),
                })
            }
            None => Ok(Self::default()),
        }
    }

    /// Write the desk back to a TOML file.
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        let content =
            toml::to_string_pretty(self).map_err(|e| ConfigError::Serialize(e.to_string()))?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Apply environment variable overrides
    ///
    /// Supports TRIPDESK_* environment variables for common settings.
    /// Invalid values are silently ignored (defaults are kept).
    pub fn with_env_overrides(mut self) -> Self {
        if let Ok(level) = std::env::var("TRIPDESK_LOG_LEVEL") {
            self.logging.level = level;
        }
        if let Ok(format) = std::env::var("TRIPDESK_LOG_FORMAT") {
            if let Ok(f) = format.parse() {
                self.logging.format = f;
            }
        }
        if let Ok(weighting) = std::env::var("TRIPDESK_EXPERTISE_WEIGHTING") {
            if let Ok(w) = weighting.parse() {
                self.matching.expertise_weighting = w;
            }
        }

        self
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if let Some(component) = self.logging.unknown_component() {
            return Err(ConfigError::Validation {
                field: format!("logging.component_levels.{}", component),
                message: format!("expected one of {}", logging::COMPONENTS.join(", ")),
            });
        }

        let mut rule_ids = HashSet::new();
        for (i, rule) in self.rules.iter().enumerate() {
            if rule.id.trim().is_empty() {
                return Err(ConfigError::Validation {
                    field: format!("rules[{}].id", i),
                    message: "id cannot be empty".to_string(),
                });
            }
            if !rule_ids.insert(rule.id.as_str()) {
                return Err(ConfigError::Validation {
                    field: format!("rules[{}].id", i),
                    message: format!("duplicate rule id '{}'", rule.id),
                });
            }
        }

        let mut staff_ids = HashSet::new();
        let mut orders = HashSet::new();
        for (i, member) in self.staff.iter().enumerate() {
            if member.id.trim().is_empty() {
                return Err(ConfigError::Validation {
                    field: format!("staff[{}].id", i),
                    message: "id cannot be empty".to_string(),
                });
            }
            if !staff_ids.insert(member.id.as_str()) {
                return Err(ConfigError::Validation {
                    field: format!("staff[{}].id", i),
                    message: format!("duplicate staff id '{}'", member.id),
                });
            }
            if member.workload_capacity == 0 {
                return Err(ConfigError::Validation {
                    field: format!("staff[{}].workload_capacity", i),
                    message: "capacity must be above zero".to_string(),
                });
            }
            if let Some(order) = member.sequence_order {
                if order == 0 || !orders.insert(order) {
                    return Err(ConfigError::Validation {
                        field: format!("staff[{}].sequence_order", i),
                        message: format!("order {} is zero or already taken", order),
                    });
                }
            }
        }

        let mut query_ids = HashSet::new();
        let mut open_queries: HashMap<&str, u64> = HashMap::new();
        for (i, query) in self.queries.iter().enumerate() {
            if !query_ids.insert(query.id.as_str()) {
                return Err(ConfigError::Validation {
                    field: format!("queries[{}].id", i),
                    message: format!("duplicate query id '{}'", query.id),
                });
            }
            if query.destination.country.trim().is_empty() {
                return Err(ConfigError::Validation {
                    field: format!("queries[{}].destination.country", i),
                    message: "country cannot be empty".to_string(),
                });
            }
            if let Some(staff_id) = query.assigned_staff() {
                if !staff_ids.contains(staff_id) {
                    return Err(ConfigError::Validation {
                        field: format!("queries[{}].assignment.staff_id", i),
                        message: format!("unknown staff id '{}'", staff_id),
                    });
                }
                *open_queries.entry(staff_id).or_insert(0) += 1;
            }
        }

        for (i, member) in self.staff.iter().enumerate() {
            let held = open_queries.get(member.id.as_str()).copied().unwrap_or(0);
            if u64::from(member.assigned()) < held {
                return Err(ConfigError::Validation {
                    field: format!("staff[{}].assigned", i),
                    message: format!(
                        "count {} is below the {} open queries held by '{}'",
                        member.assigned(),
                        held,
                        member.id
                    ),
                });
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matching::ExpertiseWeighting;
    use crate::roster::{Destination, QueryStatus};
    use std::path::Path;

    #[test]
    fn test_desk_config_defaults() {
        let config = DeskConfig::default();
        assert_eq!(config.rules.len(), 4);
        assert!(config.rules.iter().all(|r| r.enabled));
        assert!(config.staff.is_empty());
        assert!(config.queries.is_empty());
    }

    #[test]
    fn test_config_parse_minimal_toml() {
        let toml = r#"
        [logging]
        level = "debug"
        "#;

        let config: DeskConfig = toml::from_str(toml).unwrap();
        assert_eq!(config.logging.level, "debug");
        assert_eq!(config.rules.len(), 4); // Default
    }

    #[test]
    fn test_config_parse_full_toml() {
        let toml = include_str!("../../tripdesk.example.toml");
        let config: DeskConfig = toml::from_str(toml).unwrap();
        assert!(config.validate().is_ok());
        assert!(!config.staff.is_empty());
        assert!(!config.queries.is_empty());
    }

    #[test]
    fn test_config_parse_query() {
        let toml = r#"
        [[queries]]
        id = "q-1"
        duration_days = 8

        [queries.destination]
        country = "Japan"
        cities = ["Tokyo", "Kyoto"]

        [queries.pax]
        adults = 2
        children = 1

        [queries.travel_dates]
        start = "2026-04-01"
        end = "2026-04-08"

        [queries.agent]
        id = "agent-3"
        name = "Blue Lagoon Travel"
        "#;

        let config: DeskConfig = toml::from_str(toml).unwrap();
        let query = &config.queries[0];
        assert_eq!(query.destination.cities, vec!["Tokyo", "Kyoto"]);
        assert_eq!(query.pax.total(), 3);
        assert_eq!(query.status(), QueryStatus::New);
        assert_eq!(query.travel_dates.unwrap().days(), 8);
    }

    #[test]
    fn test_config_parse_explicit_empty_rules() {
        let config: DeskConfig = toml::from_str("rules = []").unwrap();
        assert!(config.rules.is_empty());
    }

    #[test]
    fn test_config_load_from_file() {
        let temp = tempfile::NamedTempFile::new().unwrap();
        std::fs::write(temp.path(), "[logging]\nformat = \"json\"").unwrap();

        let config = DeskConfig::load(Some(temp.path())).unwrap();
        assert_eq!(config.logging.format, LogFormat::Json);
    }

    #[test]
    fn test_config_missing_file_error() {
        let result = DeskConfig::load(Some(Path::new("/nonexistent/tripdesk.toml")));
        assert!(matches!(result, Err(ConfigError::NotFound(_))));
    }

    #[test]
    fn test_config_load_none_returns_defaults() {
        let config = DeskConfig::load(None).unwrap();
        assert_eq!(config, DeskConfig::default());
    }

    #[test]
    fn test_config_save_and_reload() {
        let mut config = DeskConfig::default();
        config.staff.push(
            StaffMember::new("s-1", "Amira", 3)
                .with_expertise(["France"])
                .with_sequence_order(1),
        );
        config.queries.push(
            Query::new("q-1", Destination::new("France", ["Paris"]), "agent-1")
                .with_pax(2, 0, 0),
        );

        let temp = tempfile::NamedTempFile::new().unwrap();
        config.save(temp.path()).unwrap();
        let reloaded = DeskConfig::load(Some(temp.path())).unwrap();
        assert_eq!(reloaded, config);
    }

    #[test]
    fn test_config_env_override_log_level() {
        std::env::set_var("TRIPDESK_LOG_LEVEL", "trace");
        let config = DeskConfig::default().with_env_overrides();
        std::env::remove_var("TRIPDESK_LOG_LEVEL");

        assert_eq!(config.logging.level, "trace");
    }

    #[test]
    fn test_config_env_override_weighting() {
        std::env::set_var("TRIPDESK_EXPERTISE_WEIGHTING", "fractional");
        let config = DeskConfig::default().with_env_overrides();
        std::env::remove_var("TRIPDESK_EXPERTISE_WEIGHTING");

        assert_eq!(
            config.matching.expertise_weighting,
            ExpertiseWeighting::Fractional
        );
    }

    #[test]
    fn test_config_env_invalid_value_ignored() {
        std::env::set_var("TRIPDESK_LOG_FORMAT", "xml");
        let config = DeskConfig::default().with_env_overrides();
        std::env::remove_var("TRIPDESK_LOG_FORMAT");

        // Should keep default, not crash
        assert_eq!(config.logging.format, LogFormat::Pretty);
    }

    #[test]
    fn test_config_validation_zero_capacity() {
        let mut config = DeskConfig::default();
        config.staff.push(StaffMember::new("s-1", "Amira", 0));

        let result = config.validate();
        assert!(matches!(
            result,
            Err(ConfigError::Validation { ref field, .. }) if field == "staff[0].workload_capacity"
        ));
    }

    #[test]
    fn test_config_validation_duplicate_sequence_order() {
        let mut config = DeskConfig::default();
        config.staff.push(StaffMember::new("a", "A", 1).with_sequence_order(1));
        config.staff.push(StaffMember::new("b", "B", 1).with_sequence_order(1));

        let result = config.validate();
        assert!(matches!(
            result,
            Err(ConfigError::Validation { ref field, .. }) if field.contains("sequence_order")
        ));
    }

    #[test]
    fn test_config_validation_duplicate_rule_id() {
        let mut config = DeskConfig::default();
        let first = config.rules[0].clone();
        config.rules.push(first);

        assert!(matches!(
            config.validate(),
            Err(ConfigError::Validation { ref field, .. }) if field == "rules[4].id"
        ));
    }

    #[test]
    fn test_config_validation_empty_country() {
        let mut config = DeskConfig::default();
        config
            .queries
            .push(Query::new("q", Destination::new(" ", Vec::<String>::new()), "agent"));

        assert!(matches!(
            config.validate(),
            Err(ConfigError::Validation { ref field, .. }) if field.contains("country")
        ));
    }

    const HELD_QUERY: &str = r#"
        [[staff]]
        id = "A"
        name = "Amira"
        active = true
        workload_capacity = 5
        assigned = 0

        [[staff]]
        id = "B"
        name = "Bruno"
        active = true
        workload_capacity = 5

        [[queries]]
        id = "q"
        status = "assigned"
        destination = { country = "Peru" }
        agent = { id = "ag" }
        assignment = { query_id = "q", staff_id = "A", reason = "Manual", decided_at = "2026-03-02T09:30:00Z" }
        "#;

    #[test]
    fn test_config_validation_counter_below_open_queries() {
        let config: DeskConfig = toml::from_str(HELD_QUERY).unwrap();

        match config.validate() {
            Err(ConfigError::Validation { field, message }) => {
                assert_eq!(field, "staff[0].assigned");
                assert!(message.contains("1 open queries"));
            }
            other => panic!("expected validation error, got {:?}", other),
        }
    }

    #[test]
    fn test_config_validation_counter_covers_open_queries() {
        let mut config: DeskConfig = toml::from_str(HELD_QUERY).unwrap();
        config.staff[0] = config.staff[0].clone().with_assigned(1);
        assert!(config.validate().is_ok());

        // Load from outside the desk on top of held queries is fine
        config.staff[0] = config.staff[0].clone().with_assigned(4);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_validation_unknown_log_component() {
        let config: DeskConfig =
            toml::from_str("[logging.component_levels]\nrouting = \"debug\"").unwrap();

        match config.validate() {
            Err(ConfigError::Validation { field, message }) => {
                assert_eq!(field, "logging.component_levels.routing");
                assert!(message.contains("executor"));
            }
            other => panic!("expected validation error, got {:?}", other),
        }
    }

    #[test]
    fn test_config_parse_error_names_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.toml");
        std::fs::write(&path, "[[staff]\nid = ").unwrap();

        let err = DeskConfig::load(Some(&path)).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { ref path, .. } if path.ends_with("broken.toml")));
        assert!(err.to_string().contains("broken.toml"));
    }
}
