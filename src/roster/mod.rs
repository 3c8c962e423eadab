//! Staff and query roster.
//!
//! Provides the owned in-memory store of staff members and customer queries
//! the matcher reads and the executor mutates.

mod error;
mod query;
mod staff;

pub use error::*;
pub use query::*;
pub use staff::*;

use std::collections::{BTreeMap, BTreeSet, HashMap};

/// The Roster stores every known staff member and query.
///
/// Staff are kept ordered by id so every scan is deterministic. Queries
/// remember the order they arrived in; that order drives batch
/// auto-assignment. An agent index answers "who already works with this
/// agent" without scanning the whole staff list.
///
/// # Examples
///
/// ```
/// use tripdesk::roster::{Destination, Query, Roster, StaffMember};
///
/// let mut roster = Roster::new();
/// roster
///     .add_staff(StaffMember::new("s-1", "Amira", 5).with_agents(["agent-7"]))
///     .unwrap();
/// roster
///     .add_query(Query::new("q-1", Destination::new("France", ["Paris"]), "agent-7"))
///     .unwrap();
///
/// assert_eq!(roster.staff_count(), 1);
/// assert_eq!(roster.staff_for_agent("agent-7").len(), 1);
/// assert_eq!(roster.pending_queries().count(), 1);
/// ```
#[derive(Debug, Clone, Default)]
pub struct Roster {
    staff: BTreeMap<String, StaffMember>,
    queries: HashMap<String, Query>,
    arrival: Vec<String>,
    agent_index: HashMap<String, BTreeSet<String>>,
}

impl Roster {
    /// Create a new empty Roster.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a staff member to the roster.
    ///
    /// # Errors
    ///
    /// Returns `RosterError::DuplicateStaff` for a known id,
    /// `RosterError::InvalidCapacity` for a zero capacity and
    /// `RosterError::InvalidSequenceOrder` when the sequence slot is zero or
    /// already taken.
    pub fn add_staff(&mut self, member: StaffMember) -> Result<(), RosterError> {
        if self.staff.contains_key(&member.id) {
            return Err(RosterError::DuplicateStaff(member.id));
        }
        if member.workload_capacity == 0 {
            return Err(RosterError::InvalidCapacity(member.id));
        }
        if let Some(order) = member.sequence_order {
            if order == 0 {
                return Err(RosterError::InvalidSequenceOrder {
                    staff_id: member.id,
                    order,
                    message: "sequence orders start at 1".to_string(),
                });
            }
            if let Some(holder) = self
                .staff
                .values()
                .find(|other| other.sequence_order == Some(order))
            {
                return Err(RosterError::InvalidSequenceOrder {
                    staff_id: member.id,
                    order,
                    message: format!("already held by '{}'", holder.id),
                });
            }
        }

        for agent in &member.agents {
            self.agent_index
                .entry(agent.clone())
                .or_default()
                .insert(member.id.clone());
        }

        tracing::debug!(
            staff_id = %member.id,
            capacity = member.workload_capacity,
            assigned = member.assigned(),
            "Added staff member to roster"
        );
        self.staff.insert(member.id.clone(), member);
        Ok(())
    }

    /// Add a query; it joins the end of the arrival order.
    ///
    /// # Errors
    ///
    /// Returns `RosterError::DuplicateQuery` for a known id and
    /// `RosterError::InvalidQuery` for a missing country, reversed travel
    /// dates, or an open status without an assignment record.
    pub fn add_query(&mut self, query: Query) -> Result<(), RosterError> {
        if self.queries.contains_key(&query.id) {
            return Err(RosterError::DuplicateQuery(query.id));
        }
        if query.destination.country.trim().is_empty() {
            return Err(RosterError::InvalidQuery {
                query_id: query.id,
                message: "destination country cannot be empty".to_string(),
            });
        }
        if let Some(dates) = query.travel_dates {
            if dates.end < dates.start {
                return Err(RosterError::InvalidQuery {
                    query_id: query.id,
                    message: format!("travel ends ({}) before it starts ({})", dates.end, dates.start),
                });
            }
        }
        if query.status().is_open_assignment() && query.assignment().is_none() {
            let message = format!("status '{}' requires an assignment", query.status());
            return Err(RosterError::InvalidQuery {
                query_id: query.id,
                message,
            });
        }

        self.arrival.push(query.id.clone());
        self.queries.insert(query.id.clone(), query);
        Ok(())
    }

    /// Record that a staff member works with an agent.
    ///
    /// Returns `false` if the relationship already existed.
    pub fn link_agent(&mut self, staff_id: &str, agent_id: &str) -> Result<bool, RosterError> {
        let member = self
            .staff
            .get_mut(staff_id)
            .ok_or_else(|| RosterError::StaffNotFound(staff_id.to_string()))?;

        let added = member.agents.insert(agent_id.to_string());
        self.agent_index
            .entry(agent_id.to_string())
            .or_default()
            .insert(staff_id.to_string());
        Ok(added)
    }

    /// Drop a staff/agent relationship.
    ///
    /// Returns `false` if there was none.
    pub fn unlink_agent(&mut self, staff_id: &str, agent_id: &str) -> Result<bool, RosterError> {
        let member = self
            .staff
            .get_mut(staff_id)
            .ok_or_else(|| RosterError::StaffNotFound(staff_id.to_string()))?;

        let removed = member.agents.remove(agent_id);
        if let Some(staff_ids) = self.agent_index.get_mut(agent_id) {
            staff_ids.remove(staff_id);
            if staff_ids.is_empty() {
                self.agent_index.remove(agent_id);
            }
        }
        Ok(removed)
    }

    /// Activate or deactivate a staff member. Returns the previous value.
    pub fn set_active(&mut self, staff_id: &str, active: bool) -> Result<bool, RosterError> {
        let member = self
            .staff
            .get_mut(staff_id)
            .ok_or_else(|| RosterError::StaffNotFound(staff_id.to_string()))?;
        let previous = std::mem::replace(&mut member.active, active);
        if previous != active {
            tracing::info!(staff_id = %staff_id, active, "Staff activity changed");
        }
        Ok(previous)
    }

    /// Opt a staff member in or out of round-robin. Returns the previous value.
    pub fn set_auto_assign(&mut self, staff_id: &str, enabled: bool) -> Result<bool, RosterError> {
        let member = self
            .staff
            .get_mut(staff_id)
            .ok_or_else(|| RosterError::StaffNotFound(staff_id.to_string()))?;
        Ok(std::mem::replace(&mut member.auto_assign_enabled, enabled))
    }

    pub fn staff(&self, id: &str) -> Option<&StaffMember> {
        self.staff.get(id)
    }

    pub fn query(&self, id: &str) -> Option<&Query> {
        self.queries.get(id)
    }

    /// All staff members, ascending by id.
    pub fn staff_members(&self) -> impl Iterator<Item = &StaffMember> {
        self.staff.values()
    }

    /// All queries in arrival order.
    pub fn queries(&self) -> impl Iterator<Item = &Query> {
        self.arrival.iter().filter_map(|id| self.queries.get(id))
    }

    /// Queries still in status `new`, in arrival order.
    pub fn pending_queries(&self) -> impl Iterator<Item = &Query> {
        self.queries()
            .filter(|query| query.status() == QueryStatus::New)
    }

    /// Staff members with a recorded relationship to the agent, by id.
    pub fn staff_for_agent(&self, agent_id: &str) -> Vec<&StaffMember> {
        self.agent_index
            .get(agent_id)
            .map(|ids| ids.iter().filter_map(|id| self.staff.get(id)).collect())
            .unwrap_or_default()
    }

    pub fn staff_count(&self) -> usize {
        self.staff.len()
    }

    pub fn query_count(&self) -> usize {
        self.queries.len()
    }

    /// Sum of every staff member's open assignments.
    pub fn total_assigned(&self) -> u64 {
        self.staff.values().map(|s| u64::from(s.assigned())).sum()
    }

    pub(crate) fn staff_mut(&mut self, id: &str) -> Option<&mut StaffMember> {
        self.staff.get_mut(id)
    }

    pub(crate) fn query_mut(&mut self, id: &str) -> Option<&mut Query> {
        self.queries.get_mut(id)
    }
}
