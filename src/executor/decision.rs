use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::rules::RuleType;

/// Reason stamped on decisions made by a person rather than the matcher
pub const MANUAL_REASON: &str = "Manual";

/// Who handles a query, and why.
///
/// A query only keeps its latest decision; a reassignment produces a new
/// one that names the previous holder.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssignmentDecision {
    pub query_id: String,
    pub staff_id: String,
    /// Rule that produced the match; `None` for manual assignment
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rule_type: Option<RuleType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rule_id: Option<String>,
    pub reason: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub previous_staff_id: Option<String>,
    pub decided_at: DateTime<Utc>,
}

impl AssignmentDecision {
    pub fn is_manual(&self) -> bool {
        self.rule_type.is_none()
    }

    pub fn is_reassignment(&self) -> bool {
        self.previous_staff_id.is_some()
    }
}

/// Raised when an assignment leaves a staff member above capacity.
///
/// Not an error: the assignment went through, but callers should flag it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CapacityWarning {
    pub staff_id: String,
    pub assigned: u32,
    pub workload_capacity: u32,
}

impl std::fmt::Display for CapacityWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "capacity exceeded for '{}': {}/{}",
            self.staff_id, self.assigned, self.workload_capacity
        )
    }
}

/// A committed assignment
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Assignment {
    pub decision: AssignmentDecision,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub capacity_warning: Option<CapacityWarning>,
}

/// What happened to one query of an auto-assignment batch
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum BatchResult {
    Assigned(Assignment),
    /// No enabled rule found eligible staff; the query stays `new`
    NoMatch,
    /// The query was not pending (unknown id or already handled)
    Skipped { reason: String },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchOutcome {
    pub query_id: String,
    #[serde(flatten)]
    pub result: BatchResult,
}

/// Outcomes of an auto-assignment batch, in input order
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct BatchReport {
    pub outcomes: Vec<BatchOutcome>,
}

impl BatchReport {
    pub fn assigned_count(&self) -> usize {
        self.decisions().count()
    }

    pub fn unmatched_count(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|o| matches!(o.result, BatchResult::NoMatch))
            .count()
    }

    pub fn skipped_count(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|o| matches!(o.result, BatchResult::Skipped { .. }))
            .count()
    }

    pub fn decisions(&self) -> impl Iterator<Item = &AssignmentDecision> {
        self.outcomes.iter().filter_map(|o| match &o.result {
            BatchResult::Assigned(assignment) => Some(&assignment.decision),
            _ => None,
        })
    }

    pub fn warnings(&self) -> impl Iterator<Item = &CapacityWarning> {
        self.outcomes.iter().filter_map(|o| match &o.result {
            BatchResult::Assigned(assignment) => assignment.capacity_warning.as_ref(),
            _ => None,
        })
    }
}
