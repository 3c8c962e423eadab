//! Candidate selection for each rule type
//!
//! Every strategy is a pure function from a query and the roster to a ranked
//! list of candidates, best first. An empty list means the rule does not
//! apply and the matcher moves on to the next one.

use std::cmp::Ordering;

use super::scoring::{compare_load, ExpertiseScore, ExpertiseWeighting};
use crate::roster::{Query, Roster, StaffMember};
use crate::rules::RuleType;

/// A staff member a rule would accept, with the reason it would give
#[derive(Debug, Clone)]
pub struct Candidate<'a> {
    pub staff: &'a StaffMember,
    pub reason: String,
}

/// Rank candidates for one rule type.
pub fn candidates<'a>(
    rule_type: RuleType,
    query: &Query,
    roster: &'a Roster,
    weighting: ExpertiseWeighting,
) -> Vec<Candidate<'a>> {
    match rule_type {
        RuleType::AgentStaffRelationship => agent_relationship(query, roster),
        RuleType::ExpertiseMatch => expertise_match(query, roster, weighting),
        RuleType::WorkloadBalance => workload_balance(roster),
        RuleType::RoundRobin => round_robin(roster),
    }
}

/// Active staff who already work with the query's agent, least loaded first.
fn agent_relationship<'a>(query: &Query, roster: &'a Roster) -> Vec<Candidate<'a>> {
    let mut staff: Vec<&StaffMember> = roster
        .staff_for_agent(&query.agent.id)
        .into_iter()
        .filter(|member| member.active)
        .collect();
    staff.sort_by(|a, b| a.assigned().cmp(&b.assigned()).then_with(|| a.id.cmp(&b.id)));

    let agent = if query.agent.name.is_empty() {
        query.agent.id.as_str()
    } else {
        query.agent.name.as_str()
    };

    prefer_under_capacity(staff)
        .into_iter()
        .map(|member| Candidate {
            staff: member,
            reason: format!(
                "{}: works with agent {} (load {}/{})",
                RuleType::AgentStaffRelationship,
                agent,
                member.assigned(),
                member.workload_capacity
            ),
        })
        .collect()
}

/// Active staff who know at least one destination term, strongest first.
fn expertise_match<'a>(
    query: &Query,
    roster: &'a Roster,
    weighting: ExpertiseWeighting,
) -> Vec<Candidate<'a>> {
    let mut scored: Vec<(&StaffMember, ExpertiseScore)> = roster
        .staff_members()
        .filter(|member| member.active)
        .map(|member| (member, ExpertiseScore::compute(query, member)))
        .filter(|(_, score)| score.is_match())
        .collect();

    scored.sort_by(|(a, sa), (b, sb)| {
        sb.compare(sa, weighting)
            .then_with(|| a.assigned().cmp(&b.assigned()))
            .then_with(|| a.id.cmp(&b.id))
    });

    let (mut open, full): (Vec<_>, Vec<_>) =
        scored.into_iter().partition(|(member, _)| member.has_capacity());
    open.extend(full);

    open.into_iter()
        .map(|(member, score)| {
            let known: Vec<&str> = query
                .destination_terms()
                .filter(|term| member.knows(term))
                .collect();
            Candidate {
                staff: member,
                reason: format!(
                    "{}: knows {} ({}/{} destination terms{}, score {:.2})",
                    RuleType::ExpertiseMatch,
                    dedup_terms(known).join(", "),
                    score.matched,
                    score.total,
                    if score.country_match {
                        ", country match"
                    } else {
                        ""
                    },
                    score.value(weighting)
                ),
            }
        })
        .collect()
}

/// Active staff by load ratio. Staff with room sort ahead of full staff
/// because their ratio is below 1.
fn workload_balance(roster: &Roster) -> Vec<Candidate<'_>> {
    let mut staff: Vec<&StaffMember> = roster.staff_members().filter(|m| m.active).collect();
    staff.sort_by(|a, b| {
        compare_load(a, b)
            .then_with(|| a.assigned().cmp(&b.assigned()))
            .then_with(|| a.id.cmp(&b.id))
    });

    let everyone_full = staff.iter().all(|member| !member.has_capacity());

    staff
        .into_iter()
        .map(|member| {
            let note = if everyone_full {
                "all staff at capacity, least over"
            } else if member.has_capacity() {
                "lowest relative load"
            } else {
                "at capacity"
            };
            Candidate {
                staff: member,
                reason: format!(
                    "{}: {} ({}/{})",
                    RuleType::WorkloadBalance,
                    note,
                    member.assigned(),
                    member.workload_capacity
                ),
            }
        })
        .collect()
}

/// Auto-assignable active staff in sequence order; the first one with room
/// leads, the rest follow in sequence.
fn round_robin(roster: &Roster) -> Vec<Candidate<'_>> {
    let mut staff: Vec<&StaffMember> = roster
        .staff_members()
        .filter(|member| member.active && member.auto_assign_enabled)
        .collect();
    staff.sort_by(|a, b| sequence_cmp(a, b));

    // Full staff ahead of the lead wrap around to the tail.
    let lead = staff.iter().position(|member| member.has_capacity()).unwrap_or(0);
    staff.rotate_left(lead);

    let everyone_full = staff.iter().all(|member| !member.has_capacity());

    staff
        .into_iter()
        .map(|member| {
            let slot = member
                .sequence_order
                .map(|order| format!("#{}", order))
                .unwrap_or_else(|| "unsequenced".to_string());
            let note = if everyone_full {
                "everyone at capacity, next in sequence"
            } else if member.has_capacity() {
                "next in sequence with capacity"
            } else {
                "in sequence, at capacity"
            };
            Candidate {
                staff: member,
                reason: format!(
                    "{}: {} {} ({}/{})",
                    RuleType::RoundRobin,
                    note,
                    slot,
                    member.assigned(),
                    member.workload_capacity
                ),
            }
        })
        .collect()
}

/// Sequenced staff first by order, unsequenced last, ties by id.
pub fn sequence_cmp(a: &StaffMember, b: &StaffMember) -> Ordering {
    match (a.sequence_order, b.sequence_order) {
        (Some(x), Some(y)) => x.cmp(&y).then_with(|| a.id.cmp(&b.id)),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => a.id.cmp(&b.id),
    }
}

/// Stable partition: staff with room keep their order ahead of full staff.
fn prefer_under_capacity(staff: Vec<&StaffMember>) -> Vec<&StaffMember> {
    let (mut open, full): (Vec<_>, Vec<_>) =
        staff.into_iter().partition(|member| member.has_capacity());
    open.extend(full);
    open
}

fn dedup_terms(terms: Vec<&str>) -> Vec<&str> {
    let mut seen: Vec<String> = Vec::new();
    terms
        .into_iter()
        .filter(|term| {
            let key = term.trim().to_lowercase();
            if seen.contains(&key) {
                false
            } else {
                seen.push(key);
                true
            }
        })
        .collect()
}
