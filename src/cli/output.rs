//! Output formatting helpers for CLI commands

use colored::Colorize;
use comfy_table::{presets::UTF8_FULL, Cell, ContentArrangement, Table};
use serde::Serialize;

use crate::executor::{Assignment, BatchReport, BatchResult};
use crate::matching::Recommendation;
use crate::roster::{Query, QueryStatus, StaffMember};
use crate::rules::AssignmentRule;

fn new_table(header: Vec<&str>) -> Table {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(header);
    table
}

/// Wrap `value` as `{ "<key>": value }` and pretty-print it
pub fn format_json<T: Serialize + ?Sized>(key: &str, value: &T) -> serde_json::Result<String> {
    let mut map = serde_json::Map::new();
    map.insert(key.to_string(), serde_json::to_value(value)?);
    serde_json::to_string_pretty(&serde_json::Value::Object(map))
}

fn load_cell(assigned: u32, capacity: u32) -> String {
    let load = format!("{}/{}", assigned, capacity);
    if assigned > capacity {
        load.red().to_string()
    } else if assigned == capacity {
        load.yellow().to_string()
    } else {
        load.green().to_string()
    }
}

fn status_cell(status: QueryStatus) -> String {
    match status {
        QueryStatus::New => "new".cyan().to_string(),
        QueryStatus::Assigned => "assigned".green().to_string(),
        QueryStatus::InProgress => "in-progress".yellow().to_string(),
        QueryStatus::Completed => "completed".dimmed().to_string(),
    }
}

/// Format recommendations as a table
pub fn format_recommendations_table(recommendations: &[Recommendation]) -> String {
    if recommendations.is_empty() {
        return "No eligible staff".yellow().to_string();
    }

    let mut table = new_table(vec!["#", "Staff", "Name", "Rule", "Load", "Reason"]);
    for r in recommendations {
        table.add_row(vec![
            Cell::new(r.rank),
            Cell::new(&r.staff_id),
            Cell::new(&r.staff_name),
            Cell::new(r.rule_type),
            Cell::new(load_cell(r.assigned, r.workload_capacity)),
            Cell::new(&r.reason),
        ]);
    }
    table.to_string()
}

/// One-line summary of a committed assignment
pub fn format_assignment(assignment: &Assignment) -> String {
    let decision = &assignment.decision;
    let mut line = format!(
        "{} {} -> {} ({})",
        "✓".green(),
        decision.query_id,
        decision.staff_id.bold(),
        decision.reason
    );
    if let Some(previous) = &decision.previous_staff_id {
        line.push_str(&format!(", reassigned from {}", previous));
    }
    if let Some(warning) = &assignment.capacity_warning {
        line.push_str(&format!("\n{} {}", "!".yellow(), warning));
    }
    line
}

/// Format a batch report as a table followed by a summary line
pub fn format_batch_table(report: &BatchReport) -> String {
    let mut table = new_table(vec!["Query", "Outcome", "Staff", "Reason"]);
    for outcome in &report.outcomes {
        let (label, staff, reason) = match &outcome.result {
            BatchResult::Assigned(assignment) => (
                "assigned".green().to_string(),
                assignment.decision.staff_id.clone(),
                assignment.decision.reason.clone(),
            ),
            BatchResult::NoMatch => (
                "no match".yellow().to_string(),
                String::new(),
                String::new(),
            ),
            BatchResult::Skipped { reason } => {
                ("skipped".dimmed().to_string(), String::new(), reason.clone())
            }
        };
        table.add_row(vec![
            Cell::new(&outcome.query_id),
            Cell::new(label),
            Cell::new(staff),
            Cell::new(reason),
        ]);
    }

    let mut out = table.to_string();
    out.push_str(&format!(
        "\n{} assigned, {} unmatched, {} skipped",
        report.assigned_count(),
        report.unmatched_count(),
        report.skipped_count()
    ));
    for warning in report.warnings() {
        out.push_str(&format!("\n{} {}", "!".yellow(), warning));
    }
    out
}

/// Format staff as a table
pub fn format_staff_table(staff: &[StaffMember]) -> String {
    let mut table = new_table(vec![
        "ID", "Name", "Role", "Active", "Load", "Expertise", "Agents", "Seq",
    ]);
    for s in staff {
        let active = if s.active {
            "yes".green().to_string()
        } else {
            "no".red().to_string()
        };
        table.add_row(vec![
            Cell::new(&s.id),
            Cell::new(&s.name),
            Cell::new(&s.role),
            Cell::new(active),
            Cell::new(load_cell(s.assigned(), s.workload_capacity)),
            Cell::new(s.expertise.iter().cloned().collect::<Vec<_>>().join(", ")),
            Cell::new(s.agents.iter().cloned().collect::<Vec<_>>().join(", ")),
            Cell::new(s.sequence_order.map(|o| o.to_string()).unwrap_or_default()),
        ]);
    }
    table.to_string()
}

/// Format queries as a table
pub fn format_queries_table(queries: &[&Query]) -> String {
    let mut table = new_table(vec!["ID", "Status", "Destination", "Pax", "Days", "Agent", "Staff"]);
    for q in queries {
        let mut destination = q.destination.country.clone();
        if !q.destination.cities.is_empty() {
            destination.push_str(&format!(" ({})", q.destination.cities.join(", ")));
        }
        table.add_row(vec![
            Cell::new(&q.id),
            Cell::new(status_cell(q.status())),
            Cell::new(destination),
            Cell::new(q.pax.total()),
            Cell::new(q.trip_days().map(|d| d.to_string()).unwrap_or_default()),
            Cell::new(&q.agent.id),
            Cell::new(q.assigned_staff().unwrap_or("")),
        ]);
    }
    table.to_string()
}

/// Format rules as a table, in the order given
pub fn format_rules_table(rules: &[&AssignmentRule]) -> String {
    let mut table = new_table(vec!["ID", "Type", "Priority", "Enabled"]);
    for r in rules {
        let enabled = if r.enabled {
            "yes".green().to_string()
        } else {
            "no".dimmed().to_string()
        };
        table.add_row(vec![
            Cell::new(&r.id),
            Cell::new(r.rule_type),
            Cell::new(r.priority),
            Cell::new(enabled),
        ]);
    }
    table.to_string()
}

/// Format the round-robin sequence as a numbered list
pub fn format_sequence(staff: &[&StaffMember]) -> String {
    if staff.is_empty() {
        return "Sequence is empty".yellow().to_string();
    }
    staff
        .iter()
        .enumerate()
        .map(|(i, s)| {
            let mut line = format!("{:>2}. {} ({})", i + 1, s.id, s.name);
            if !s.active {
                line.push_str(&format!(" {}", "inactive".red()));
            } else if !s.auto_assign_enabled {
                line.push_str(&format!(" {}", "auto-assign off".dimmed()));
            }
            line
        })
        .collect::<Vec<_>>()
        .join("\n")
}
