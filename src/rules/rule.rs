//! Assignment rule types

use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// The strategy a rule applies when choosing a staff member
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RuleType {
    /// Prefer staff who already work with the query's agent
    AgentStaffRelationship,

    /// Prefer staff who know the destination
    ExpertiseMatch,

    /// Prefer the least loaded staff member relative to capacity
    WorkloadBalance,

    /// Walk the staff sequence and take the first one with room
    RoundRobin,
}

impl RuleType {
    /// Every rule type, in default evaluation order
    pub const ALL: [RuleType; 4] = [
        RuleType::AgentStaffRelationship,
        RuleType::ExpertiseMatch,
        RuleType::WorkloadBalance,
        RuleType::RoundRobin,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            RuleType::AgentStaffRelationship => "agent-staff-relationship",
            RuleType::ExpertiseMatch => "expertise-match",
            RuleType::WorkloadBalance => "workload-balance",
            RuleType::RoundRobin => "round-robin",
        }
    }
}

impl FromStr for RuleType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().replace('_', "-").as_str() {
            "agent-staff-relationship" => Ok(RuleType::AgentStaffRelationship),
            "expertise-match" => Ok(RuleType::ExpertiseMatch),
            "workload-balance" => Ok(RuleType::WorkloadBalance),
            "round-robin" => Ok(RuleType::RoundRobin),
            _ => Err(format!("Unknown rule type: {}", s)),
        }
    }
}

impl std::fmt::Display for RuleType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One entry of the rule catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssignmentRule {
    pub id: String,
    pub rule_type: RuleType,
    /// Lower values are evaluated first
    pub priority: i32,
    pub enabled: bool,
}

impl AssignmentRule {
    /// Create an enabled rule.
    pub fn new(id: impl Into<String>, rule_type: RuleType, priority: i32) -> Self {
        Self {
            id: id.into(),
            rule_type,
            priority,
            enabled: true,
        }
    }

    /// Create an enabled rule with a generated id.
    pub fn generated(rule_type: RuleType, priority: i32) -> Self {
        Self::new(
            format!("{}-{}", rule_type, uuid::Uuid::new_v4().simple()),
            rule_type,
            priority,
        )
    }

    pub fn disabled(mut self) -> Self {
        self.enabled = false;
        self
    }
}
