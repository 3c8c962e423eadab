//! Roster inspection commands

use crate::cli::output::{format_json, format_queries_table, format_staff_table};
use crate::cli::session::with_service;
use crate::cli::{ListArgs, QueriesListArgs};
use crate::roster::{Query, QueryStatus};

/// Handle `tripdesk staff list`
pub async fn handle_staff_list(args: &ListArgs) -> anyhow::Result<String> {
    let snapshot = with_service(&args.desk, false, |handle| async move { Ok(handle.snapshot()) })
        .await?;

    if args.desk.json {
        Ok(format_json("staff", &snapshot.staff)?)
    } else {
        Ok(format_staff_table(&snapshot.staff))
    }
}

/// Handle `tripdesk queries list`
pub async fn handle_queries_list(args: &QueriesListArgs) -> anyhow::Result<String> {
    let status = args
        .status
        .as_deref()
        .map(str::parse::<QueryStatus>)
        .transpose()
        .map_err(anyhow::Error::msg)?;

    let snapshot = with_service(&args.desk, false, |handle| async move { Ok(handle.snapshot()) })
        .await?;

    let queries: Vec<&Query> = snapshot
        .queries
        .iter()
        .filter(|q| status.map_or(true, |s| q.status() == s))
        .collect();

    if args.desk.json {
        Ok(format_json("queries", &queries)?)
    } else {
        Ok(format_queries_table(&queries))
    }
}
