use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// A back-office staff member who can be handed customer queries.
///
/// Contains both roster configuration and the live workload counter. The
/// counter is private: only the assignment executor moves it, through the
/// crate-internal `increment_assigned` / `decrement_assigned`.
///
/// # Examples
///
/// ```
/// use tripdesk::roster::StaffMember;
///
/// let staff = StaffMember::new("s-1", "Amira Haddad", 5)
///     .with_expertise(["France", "Paris"])
///     .with_sequence_order(1);
/// assert_eq!(staff.id, "s-1");
/// assert_eq!(staff.assigned(), 0);
/// assert!(staff.has_capacity());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StaffMember {
    /// Unique identifier
    pub id: String,
    /// Display name
    pub name: String,
    /// Job title shown next to the name
    #[serde(default)]
    pub role: String,
    /// Inactive staff never receive new queries
    pub active: bool,
    /// Destinations (countries, cities or tags) this person knows well
    #[serde(default)]
    pub expertise: BTreeSet<String>,
    /// Maximum concurrent assignments (> 0)
    pub workload_capacity: u32,
    /// Queries currently assigned and not completed
    #[serde(default)]
    assigned: u32,
    /// Whether round-robin may pick this person
    #[serde(default = "default_true")]
    pub auto_assign_enabled: bool,
    /// Position in the round-robin fallback sequence (1-based)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sequence_order: Option<u32>,
    /// Agents this person has an established working relationship with
    #[serde(default)]
    pub agents: BTreeSet<String>,
}

fn default_true() -> bool {
    true
}

impl StaffMember {
    /// Create an active, auto-assignable staff member with no load.
    pub fn new(id: impl Into<String>, name: impl Into<String>, workload_capacity: u32) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            role: String::new(),
            active: true,
            expertise: BTreeSet::new(),
            workload_capacity,
            assigned: 0,
            auto_assign_enabled: true,
            sequence_order: None,
            agents: BTreeSet::new(),
        }
    }

    pub fn with_role(mut self, role: impl Into<String>) -> Self {
        self.role = role.into();
        self
    }

    pub fn with_expertise<I, S>(mut self, expertise: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.expertise = expertise.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_agents<I, S>(mut self, agents: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.agents = agents.into_iter().map(Into::into).collect();
        self
    }

    /// Seed the workload counter from an external snapshot.
    pub fn with_assigned(mut self, assigned: u32) -> Self {
        self.assigned = assigned;
        self
    }

    pub fn with_sequence_order(mut self, order: u32) -> Self {
        self.sequence_order = Some(order);
        self
    }

    pub fn with_active(mut self, active: bool) -> Self {
        self.active = active;
        self
    }

    pub fn with_auto_assign(mut self, enabled: bool) -> Self {
        self.auto_assign_enabled = enabled;
        self
    }

    /// Current number of open assignments.
    pub fn assigned(&self) -> u32 {
        self.assigned
    }

    /// True while `assigned < workload_capacity`.
    pub fn has_capacity(&self) -> bool {
        self.assigned < self.workload_capacity
    }

    /// Remaining headroom, zero when at or over capacity.
    pub fn remaining_capacity(&self) -> u32 {
        self.workload_capacity.saturating_sub(self.assigned)
    }

    /// Case-insensitive membership test against the expertise set.
    pub fn knows(&self, term: &str) -> bool {
        let needle = normalize_term(term);
        !needle.is_empty()
            && self
                .expertise
                .iter()
                .any(|known| normalize_term(known) == needle)
    }

    pub fn works_with_agent(&self, agent_id: &str) -> bool {
        self.agents.contains(agent_id)
    }

    /// Saturating at `u32::MAX`; the executor refuses assignments before that.
    pub(crate) fn increment_assigned(&mut self) -> u32 {
        self.assigned = self.assigned.saturating_add(1);
        self.assigned
    }

    /// Saturating at 0; logs when the counter is already empty.
    pub(crate) fn decrement_assigned(&mut self) -> u32 {
        if self.assigned == 0 {
            tracing::warn!(
                staff_id = %self.id,
                "Attempted to decrement assigned count when already at 0"
            );
            return 0;
        }
        self.assigned -= 1;
        self.assigned
    }
}

/// Trim and lowercase a destination term for comparison.
pub fn normalize_term(term: &str) -> String {
    term.trim().to_lowercase()
}
