//! Shared builders for tripdesk integration tests.

#![allow(dead_code)]

use tripdesk::roster::{Destination, Query, Roster, StaffMember};
use tripdesk::rules::{AssignmentRule, RuleCatalog, RuleType};

/// Active staff member with the given load and capacity.
pub fn make_staff(id: &str, assigned: u32, capacity: u32) -> StaffMember {
    StaffMember::new(id, format!("Staff {}", id), capacity).with_assigned(assigned)
}

/// New query for a country with no cities, sent by `agent-1`.
pub fn make_query(id: &str, country: &str) -> Query {
    Query::new(id, Destination::new(country, Vec::<String>::new()), "agent-1")
}

pub fn roster_with(staff: Vec<StaffMember>, queries: Vec<Query>) -> Roster {
    let mut roster = Roster::new();
    for member in staff {
        roster.add_staff(member).unwrap();
    }
    for query in queries {
        roster.add_query(query).unwrap();
    }
    roster
}

/// Catalog holding one enabled rule per type, in the given priority order.
pub fn catalog_of(types: &[RuleType]) -> RuleCatalog {
    let rules = types
        .iter()
        .enumerate()
        .map(|(i, t)| AssignmentRule::new(t.as_str(), *t, i as i32 + 1))
        .collect();
    RuleCatalog::from_rules(rules).unwrap()
}

/// The two-person roster used by the France and Japan walkthroughs.
pub fn france_desk_staff() -> Vec<StaffMember> {
    vec![
        make_staff("A", 2, 5).with_expertise(["France"]),
        make_staff("B", 0, 5),
    ]
}

pub fn ids(values: &[&str]) -> Vec<String> {
    values.iter().map(|v| v.to_string()).collect()
}
