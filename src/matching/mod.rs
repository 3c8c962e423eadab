//! Rule-based matching of queries to staff
//!
//! This module decides which staff member should handle a query. Enabled
//! rules are walked in priority order and the first rule that yields a
//! candidate wins; the matcher never mutates anything.

pub mod scoring;
pub mod strategies;

pub use scoring::{compare_load, ExpertiseScore, ExpertiseWeighting};
pub use strategies::{candidates, sequence_cmp, Candidate};

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::roster::{Query, Roster};
use crate::rules::{AssignmentRule, RuleType};

/// The staff member a rule picked for a query
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Match {
    pub staff_id: String,
    pub rule_id: String,
    pub rule_type: RuleType,
    /// Starts with the rule type name
    pub reason: String,
}

/// One line of the ranked list shown for manual assignment
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Recommendation {
    /// 1-based position
    pub rank: usize,
    pub staff_id: String,
    pub staff_name: String,
    pub rule_id: String,
    pub rule_type: RuleType,
    pub reason: String,
    pub assigned: u32,
    pub workload_capacity: u32,
}

/// Matcher selects the best staff member for each query
#[derive(Debug, Clone, Copy, Default)]
pub struct Matcher {
    weighting: ExpertiseWeighting,
}

impl Matcher {
    /// Create a matcher with the given expertise weighting
    pub fn new(weighting: ExpertiseWeighting) -> Self {
        Self { weighting }
    }

    pub fn weighting(&self) -> ExpertiseWeighting {
        self.weighting
    }

    /// Find the best staff member for a query.
    ///
    /// `rules` must already be the enabled rules in priority order (see
    /// [`crate::rules::RuleCatalog::list_enabled_by_priority`]). Returns
    /// `None` when no rule produces a candidate; callers must then leave
    /// the query unassigned.
    pub fn find_best_match(
        &self,
        query: &Query,
        roster: &Roster,
        rules: &[&AssignmentRule],
    ) -> Option<Match> {
        for rule in rules {
            let ranked = candidates(rule.rule_type, query, roster, self.weighting);
            if let Some(best) = ranked.into_iter().next() {
                tracing::debug!(
                    query_id = %query.id,
                    staff_id = %best.staff.id,
                    rule = %rule.rule_type,
                    rule_id = %rule.id,
                    "Matched query"
                );
                return Some(Match {
                    staff_id: best.staff.id.clone(),
                    rule_id: rule.id.clone(),
                    rule_type: rule.rule_type,
                    reason: best.reason,
                });
            }
            tracing::trace!(
                query_id = %query.id,
                rule = %rule.rule_type,
                "Rule produced no candidate"
            );
        }

        tracing::debug!(query_id = %query.id, "No eligible staff for query");
        None
    }

    /// Rank every eligible staff member for a query.
    ///
    /// Rules contribute their candidates in priority order; a staff member
    /// is listed once, under the first rule that accepted them. The head of
    /// the list is always the `find_best_match` result.
    pub fn recommend(
        &self,
        query: &Query,
        roster: &Roster,
        rules: &[&AssignmentRule],
    ) -> Vec<Recommendation> {
        let mut seen = HashSet::new();
        let mut ranked = Vec::new();

        for rule in rules {
            for candidate in candidates(rule.rule_type, query, roster, self.weighting) {
                if !seen.insert(candidate.staff.id.clone()) {
                    continue;
                }
                ranked.push(Recommendation {
                    rank: ranked.len() + 1,
                    staff_id: candidate.staff.id.clone(),
                    staff_name: candidate.staff.name.clone(),
                    rule_id: rule.id.clone(),
                    rule_type: rule.rule_type,
                    reason: candidate.reason,
                    assigned: candidate.staff.assigned(),
                    workload_capacity: candidate.staff.workload_capacity,
                });
            }
        }

        ranked
    }
}
