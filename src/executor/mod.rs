//! Assignment executor
//!
//! The only code that moves a staff member's `assigned` counter or a
//! query's status. Every mutation validates first and then updates the
//! query and the counters together, so a rejected call leaves the roster
//! untouched.

mod decision;
mod error;

pub use decision::*;
pub use error::AssignError;

use chrono::Utc;

use crate::matching::{Match, Matcher};
use crate::roster::{QueryStatus, Roster};
use crate::rules::AssignmentRule;

/// Where an assignment came from
enum Origin {
    Manual,
    Matched(Match),
}

/// Applies assignment decisions to a roster
pub struct Executor<'a> {
    roster: &'a mut Roster,
    matcher: Matcher,
}

impl<'a> Executor<'a> {
    pub fn new(roster: &'a mut Roster, matcher: Matcher) -> Self {
        Self { roster, matcher }
    }

    /// Read access to the roster being edited.
    pub fn roster(&self) -> &Roster {
        &*self.roster
    }

    /// Assign a query to a staff member chosen by a person.
    ///
    /// Reassigning an open query releases the previous holder first. The
    /// decision carries the reason `"Manual"`.
    ///
    /// # Errors
    ///
    /// `QueryNotFound`, `StaffNotFound`, `StaffInactive`, or
    /// `InvalidTransition` for a completed query.
    pub fn assign(&mut self, query_id: &str, staff_id: &str) -> Result<Assignment, AssignError> {
        self.commit(query_id, staff_id, Origin::Manual)
    }

    /// Auto-assign the given queries, in the order given.
    ///
    /// Each query is matched against the roster as left by the previous
    /// commit, so later queries see the load added by earlier ones. Queries
    /// that are unknown or no longer `new` are skipped; queries without an
    /// eligible staff member stay `new` and are reported as `NoMatch`.
    pub fn auto_assign_batch(
        &mut self,
        pending: &[String],
        rules: &[&AssignmentRule],
    ) -> BatchReport {
        let outcomes = pending
            .iter()
            .map(|query_id| BatchOutcome {
                query_id: query_id.clone(),
                result: self.auto_assign_one(query_id, rules),
            })
            .collect();

        let report = BatchReport { outcomes };
        tracing::info!(
            total = pending.len(),
            assigned = report.assigned_count(),
            unmatched = report.unmatched_count(),
            skipped = report.skipped_count(),
            "Auto-assignment batch finished"
        );
        report
    }

    /// Auto-assign every `new` query in arrival order.
    pub fn auto_assign_pending(&mut self, rules: &[&AssignmentRule]) -> BatchReport {
        let pending: Vec<String> = self
            .roster
            .pending_queries()
            .map(|query| query.id.clone())
            .collect();
        self.auto_assign_batch(&pending, rules)
    }

    fn auto_assign_one(&mut self, query_id: &str, rules: &[&AssignmentRule]) -> BatchResult {
        let Some(query) = self.roster.query(query_id) else {
            return BatchResult::Skipped {
                reason: format!("query not found: {}", query_id),
            };
        };
        if query.status() != QueryStatus::New {
            return BatchResult::Skipped {
                reason: format!("query is already {}", query.status()),
            };
        }

        let Some(found) = self.matcher.find_best_match(query, &*self.roster, rules) else {
            metrics::counter!("tripdesk_unmatched_total").increment(1);
            tracing::warn!(query_id = %query_id, "No eligible staff, query left unassigned");
            return BatchResult::NoMatch;
        };

        let staff_id = found.staff_id.clone();
        match self.commit(query_id, &staff_id, Origin::Matched(found)) {
            Ok(assignment) => BatchResult::Assigned(assignment),
            Err(e) => BatchResult::Skipped {
                reason: e.to_string(),
            },
        }
    }

    /// Move a query from `assigned` to `in-progress`.
    pub fn start(&mut self, query_id: &str) -> Result<(), AssignError> {
        let query = self
            .roster
            .query_mut(query_id)
            .ok_or_else(|| AssignError::QueryNotFound(query_id.to_string()))?;

        if query.status() != QueryStatus::Assigned {
            return Err(AssignError::InvalidTransition {
                query_id: query_id.to_string(),
                status: query.status(),
                action: "start",
            });
        }
        query.set_status(QueryStatus::InProgress);
        tracing::info!(query_id = %query_id, "Query in progress");
        Ok(())
    }

    /// Close an open query and release its staff member's slot.
    ///
    /// Returns the staff member's load after the release.
    pub fn complete(&mut self, query_id: &str) -> Result<u32, AssignError> {
        let query = self
            .roster
            .query(query_id)
            .ok_or_else(|| AssignError::QueryNotFound(query_id.to_string()))?;

        let Some(holder) = query.assigned_staff().map(str::to_string) else {
            return Err(AssignError::InvalidTransition {
                query_id: query_id.to_string(),
                status: query.status(),
                action: "complete",
            });
        };

        let remaining = match self.roster.staff_mut(&holder) {
            Some(member) => member.decrement_assigned(),
            None => {
                tracing::warn!(
                    query_id = %query_id,
                    staff_id = %holder,
                    "Completed query held by a staff member missing from the roster"
                );
                0
            }
        };
        if let Some(query) = self.roster.query_mut(query_id) {
            query.set_status(QueryStatus::Completed);
        }

        tracing::info!(query_id = %query_id, staff_id = %holder, assigned = remaining, "Query completed");
        Ok(remaining)
    }

    fn commit(
        &mut self,
        query_id: &str,
        staff_id: &str,
        origin: Origin,
    ) -> Result<Assignment, AssignError> {
        // Validate everything before touching state
        let query = self
            .roster
            .query(query_id)
            .ok_or_else(|| AssignError::QueryNotFound(query_id.to_string()))?;
        if query.status() == QueryStatus::Completed {
            return Err(AssignError::InvalidTransition {
                query_id: query_id.to_string(),
                status: query.status(),
                action: "assign",
            });
        }
        let previous = query.assigned_staff().map(str::to_string);

        let staff = self
            .roster
            .staff(staff_id)
            .ok_or_else(|| AssignError::StaffNotFound(staff_id.to_string()))?;
        if !staff.active {
            return Err(AssignError::StaffInactive(staff_id.to_string()));
        }
        if staff.assigned() == u32::MAX && previous.as_deref() != Some(staff_id) {
            return Err(AssignError::LoadLimitReached(staff_id.to_string()));
        }

        // Release the previous holder, then take the new slot
        if let Some(previous_id) = previous.as_deref() {
            if let Some(member) = self.roster.staff_mut(previous_id) {
                member.decrement_assigned();
            }
        }
        let (assigned, capacity) = match self.roster.staff_mut(staff_id) {
            Some(member) => (member.increment_assigned(), member.workload_capacity),
            None => return Err(AssignError::StaffNotFound(staff_id.to_string())),
        };

        let (rule_type, rule_id, reason) = match origin {
            Origin::Manual => (None, None, MANUAL_REASON.to_string()),
            Origin::Matched(found) => (Some(found.rule_type), Some(found.rule_id), found.reason),
        };
        let decision = AssignmentDecision {
            query_id: query_id.to_string(),
            staff_id: staff_id.to_string(),
            rule_type,
            rule_id,
            reason,
            previous_staff_id: previous,
            decided_at: Utc::now(),
        };

        if let Some(query) = self.roster.query_mut(query_id) {
            query.set_status(QueryStatus::Assigned);
            query.set_assignment(decision.clone());
        }

        let rule_label = decision
            .rule_type
            .map(|rule| rule.as_str())
            .unwrap_or("manual");
        metrics::counter!("tripdesk_assignments_total", "rule" => rule_label).increment(1);

        let capacity_warning = (assigned > capacity).then(|| {
            metrics::counter!("tripdesk_capacity_warnings_total").increment(1);
            tracing::warn!(
                staff_id = %staff_id,
                assigned,
                capacity,
                "Staff member assigned beyond capacity"
            );
            CapacityWarning {
                staff_id: staff_id.to_string(),
                assigned,
                workload_capacity: capacity,
            }
        });

        tracing::info!(
            query_id = %query_id,
            staff_id = %staff_id,
            rule = rule_label,
            previous_staff_id = ?decision.previous_staff_id,
            reason = %decision.reason,
            "Query assigned"
        );

        Ok(Assignment {
            decision,
            capacity_warning,
        })
    }
}
