//! Rule catalog commands

use crate::cli::output::{format_json, format_rules_table};
use crate::cli::session::with_service;
use crate::cli::{ListArgs, RuleToggleArgs};
use crate::rules::AssignmentRule;

/// Handle `tripdesk rules list`
///
/// Rules are shown in evaluation order: priority, then catalog position.
pub async fn handle_rules_list(args: &ListArgs) -> anyhow::Result<String> {
    let snapshot = with_service(&args.desk, false, |handle| async move { Ok(handle.snapshot()) })
        .await?;

    let mut rules: Vec<&AssignmentRule> = snapshot.rules.iter().collect();
    rules.sort_by_key(|r| r.priority);

    if args.desk.json {
        Ok(format_json("rules", &rules)?)
    } else {
        Ok(format_rules_table(&rules))
    }
}

/// Handle `tripdesk rules enable` / `tripdesk rules disable`
pub async fn handle_rules_toggle(args: &RuleToggleArgs, enabled: bool) -> anyhow::Result<String> {
    let previous = with_service(&args.desk, args.write, |handle| async move {
        Ok(handle.set_rule_enabled(&args.id, enabled).await?)
    })
    .await?;

    let state = if enabled { "enabled" } else { "disabled" };
    if previous == enabled {
        Ok(format!("Rule {} was already {}", args.id, state))
    } else {
        Ok(format!("✓ Rule {} {}", args.id, state))
    }
}
