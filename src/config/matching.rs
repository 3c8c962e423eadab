//! Matching configuration

use serde::{Deserialize, Serialize};

use crate::matching::{ExpertiseWeighting, Matcher};

/// Matcher tuning
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct MatchingConfig {
    /// How a country hit compares to city hits in expertise-match
    pub expertise_weighting: ExpertiseWeighting,
}

impl From<MatchingConfig> for Matcher {
    fn from(config: MatchingConfig) -> Self {
        Matcher::new(config.expertise_weighting)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_matching_config_defaults() {
        let config = MatchingConfig::default();
        assert_eq!(config.expertise_weighting, ExpertiseWeighting::CountryDominant);
    }

    #[test]
    fn test_matching_config_parse() {
        let config: MatchingConfig = toml::from_str("expertise_weighting = \"fractional\"").unwrap();
        assert_eq!(config.expertise_weighting, ExpertiseWeighting::Fractional);
        assert_eq!(
            Matcher::from(config).weighting(),
            ExpertiseWeighting::Fractional
        );
    }
}
