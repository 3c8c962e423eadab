//! Rule catalog for query assignment
//!
//! The catalog is plain configuration: an ordered list of rules, each of
//! which can be switched off without being deleted. The matcher only ever
//! sees the enabled rules, sorted by priority.

pub mod error;
pub mod rule;

pub use error::CatalogError;
pub use rule::{AssignmentRule, RuleType};

/// Ordered set of assignment rules.
///
/// Two rules may share a `rule_type`; both are kept and evaluated, and the
/// one with the lower priority value wins whenever it produces a match.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleCatalog {
    rules: Vec<AssignmentRule>,
}

impl RuleCatalog {
    /// Create an empty catalog. Nothing will ever match against it.
    pub fn new() -> Self {
        Self { rules: Vec::new() }
    }

    /// Build a catalog from a list of rules.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::DuplicateRule` if two rules share an id.
    pub fn from_rules(rules: Vec<AssignmentRule>) -> Result<Self, CatalogError> {
        let mut catalog = Self::new();
        for rule in rules {
            catalog.add_rule(rule)?;
        }
        Ok(catalog)
    }

    pub fn add_rule(&mut self, rule: AssignmentRule) -> Result<(), CatalogError> {
        if self.get(&rule.id).is_some() {
            return Err(CatalogError::DuplicateRule(rule.id));
        }
        self.rules.push(rule);
        Ok(())
    }

    pub fn get(&self, rule_id: &str) -> Option<&AssignmentRule> {
        self.rules.iter().find(|rule| rule.id == rule_id)
    }

    /// All rules in insertion order, enabled or not.
    pub fn rules(&self) -> &[AssignmentRule] {
        &self.rules
    }

    /// Enabled rules by ascending priority.
    ///
    /// The sort is stable, so rules sharing a priority keep catalog order.
    pub fn list_enabled_by_priority(&self) -> Vec<&AssignmentRule> {
        let mut enabled: Vec<&AssignmentRule> =
            self.rules.iter().filter(|rule| rule.enabled).collect();
        enabled.sort_by_key(|rule| rule.priority);
        enabled
    }

    /// Switch a rule on or off. Returns the previous value.
    pub fn set_enabled(&mut self, rule_id: &str, enabled: bool) -> Result<bool, CatalogError> {
        let rule = self
            .rules
            .iter_mut()
            .find(|rule| rule.id == rule_id)
            .ok_or_else(|| CatalogError::RuleNotFound(rule_id.to_string()))?;

        let previous = std::mem::replace(&mut rule.enabled, enabled);
        tracing::info!(rule_id = %rule_id, rule = %rule.rule_type, enabled, "Rule toggled");
        Ok(previous)
    }

    /// Move a rule to a new priority. Returns the previous priority.
    pub fn set_priority(&mut self, rule_id: &str, priority: i32) -> Result<i32, CatalogError> {
        let rule = self
            .rules
            .iter_mut()
            .find(|rule| rule.id == rule_id)
            .ok_or_else(|| CatalogError::RuleNotFound(rule_id.to_string()))?;
        Ok(std::mem::replace(&mut rule.priority, priority))
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

impl Default for RuleCatalog {
    /// All four strategies, enabled, strongest signal first.
    fn default() -> Self {
        let rules = RuleType::ALL
            .iter()
            .enumerate()
            .map(|(i, rule_type)| AssignmentRule::new(rule_type.as_str(), *rule_type, i as i32 + 1))
            .collect();
        Self { rules }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rule_type_from_str() {
        assert_eq!(
            "agent-staff-relationship".parse::<RuleType>().unwrap(),
            RuleType::AgentStaffRelationship
        );
        assert_eq!(
            "expertise-match".parse::<RuleType>().unwrap(),
            RuleType::ExpertiseMatch
        );
        assert_eq!(
            "WORKLOAD_BALANCE".parse::<RuleType>().unwrap(),
            RuleType::WorkloadBalance
        );
        assert_eq!(
            "round_robin".parse::<RuleType>().unwrap(),
            RuleType::RoundRobin
        );
    }

    #[test]
    fn rule_type_from_str_invalid() {
        assert!("random".parse::<RuleType>().is_err());
    }

    #[test]
    fn rule_type_serde_is_kebab_case() {
        let json = serde_json::to_string(&RuleType::AgentStaffRelationship).unwrap();
        assert_eq!(json, "\"agent-staff-relationship\"");
        assert_eq!(RuleType::WorkloadBalance.to_string(), "workload-balance");
    }

    #[test]
    fn default_catalog_orders_all_rules() {
        let catalog = RuleCatalog::default();
        let types: Vec<RuleType> = catalog
            .list_enabled_by_priority()
            .iter()
            .map(|rule| rule.rule_type)
            .collect();
        assert_eq!(types, RuleType::ALL.to_vec());
    }

    #[test]
    fn enabled_rules_sorted_by_priority() {
        let catalog = RuleCatalog::from_rules(vec![
            AssignmentRule::new("rr", RuleType::RoundRobin, 9),
            AssignmentRule::new("wb", RuleType::WorkloadBalance, 1),
            AssignmentRule::new("em", RuleType::ExpertiseMatch, 5).disabled(),
        ])
        .unwrap();

        let ids: Vec<&str> = catalog
            .list_enabled_by_priority()
            .iter()
            .map(|rule| rule.id.as_str())
            .collect();
        assert_eq!(ids, vec!["wb", "rr"]);
    }

    #[test]
    fn equal_priorities_keep_catalog_order() {
        let catalog = RuleCatalog::from_rules(vec![
            AssignmentRule::new("b", RuleType::WorkloadBalance, 1),
            AssignmentRule::new("a", RuleType::ExpertiseMatch, 1),
        ])
        .unwrap();
        let ids: Vec<&str> = catalog
            .list_enabled_by_priority()
            .iter()
            .map(|rule| rule.id.as_str())
            .collect();
        assert_eq!(ids, vec!["b", "a"]);
    }

    #[test]
    fn set_enabled_returns_previous_value() {
        let mut catalog = RuleCatalog::default();
        assert!(catalog.set_enabled("round-robin", false).unwrap());
        assert!(!catalog.set_enabled("round-robin", false).unwrap());
        assert_eq!(catalog.list_enabled_by_priority().len(), 3);
        // Disabled rules stay in the catalog
        assert_eq!(catalog.len(), 4);
    }

    #[test]
    fn set_enabled_unknown_rule() {
        let mut catalog = RuleCatalog::default();
        let result = catalog.set_enabled("nope", true);
        assert!(matches!(result, Err(CatalogError::RuleNotFound(ref id)) if id == "nope"));
    }

    #[test]
    fn duplicate_rule_types_are_kept() {
        let catalog = RuleCatalog::from_rules(vec![
            AssignmentRule::new("wb-1", RuleType::WorkloadBalance, 1),
            AssignmentRule::new("wb-2", RuleType::WorkloadBalance, 2),
        ])
        .unwrap();
        assert_eq!(catalog.list_enabled_by_priority().len(), 2);
    }

    #[test]
    fn duplicate_rule_ids_rejected() {
        let result = RuleCatalog::from_rules(vec![
            AssignmentRule::new("x", RuleType::WorkloadBalance, 1),
            AssignmentRule::new("x", RuleType::RoundRobin, 2),
        ]);
        assert!(matches!(result, Err(CatalogError::DuplicateRule(_))));
    }

    #[test]
    fn set_priority_reorders() {
        let mut catalog = RuleCatalog::default();
        assert_eq!(catalog.set_priority("round-robin", 0).unwrap(), 4);
        assert_eq!(
            catalog.list_enabled_by_priority()[0].rule_type,
            RuleType::RoundRobin
        );
    }

    #[test]
    fn generated_rule_ids_are_unique() {
        let a = AssignmentRule::generated(RuleType::RoundRobin, 1);
        let b = AssignmentRule::generated(RuleType::RoundRobin, 1);
        assert_ne!(a.id, b.id);
        assert!(a.id.starts_with("round-robin-"));
    }
}
