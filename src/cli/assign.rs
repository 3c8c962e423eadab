//! Assignment commands: recommend, assign, auto-assign, start, complete

use crate::cli::output::{
    format_assignment, format_batch_table, format_json, format_recommendations_table,
};
use crate::cli::session::with_service;
use crate::cli::{AssignArgs, AutoAssignArgs, QueryActionArgs, RecommendArgs};

/// Handle `tripdesk recommend`
pub async fn handle_recommend(args: &RecommendArgs) -> anyhow::Result<String> {
    let recommendations = with_service(&args.desk, false, |handle| async move {
        Ok(handle.recommend(&args.query).await?)
    })
    .await?;

    if args.desk.json {
        Ok(format_json("recommendations", &recommendations)?)
    } else {
        Ok(format_recommendations_table(&recommendations))
    }
}

/// Handle `tripdesk assign`
pub async fn handle_assign(args: &AssignArgs) -> anyhow::Result<String> {
    let assignment = with_service(&args.desk, args.write, |handle| async move {
        Ok(handle.assign(&args.query, &args.staff).await?)
    })
    .await?;

    if args.desk.json {
        Ok(format_json("assignment", &assignment)?)
    } else {
        Ok(format_assignment(&assignment))
    }
}

/// Handle `tripdesk auto-assign`
pub async fn handle_auto_assign(args: &AutoAssignArgs) -> anyhow::Result<String> {
    let report = with_service(&args.desk, args.write, |handle| async move {
        if args.queries.is_empty() {
            Ok(handle.auto_assign_pending().await?)
        } else {
            Ok(handle.auto_assign(args.queries.clone()).await?)
        }
    })
    .await?;

    if args.desk.json {
        Ok(format_json("outcomes", &report.outcomes)?)
    } else {
        Ok(format_batch_table(&report))
    }
}

/// Handle `tripdesk start`
pub async fn handle_start(args: &QueryActionArgs) -> anyhow::Result<String> {
    with_service(&args.desk, args.write, |handle| async move {
        Ok(handle.start(&args.query).await?)
    })
    .await?;

    Ok(format!("✓ {} is in progress", args.query))
}

/// Handle `tripdesk complete`
pub async fn handle_complete(args: &QueryActionArgs) -> anyhow::Result<String> {
    let (staff_id, remaining) = with_service(&args.desk, args.write, |handle| async move {
        let staff_id = handle
            .snapshot()
            .query(&args.query)
            .and_then(|q| q.assigned_staff())
            .map(str::to_string);
        let remaining = handle.complete(&args.query).await?;
        Ok((staff_id, remaining))
    })
    .await?;

    match staff_id {
        Some(staff_id) => Ok(format!(
            "✓ {} completed, {} now holds {}",
            args.query, staff_id, remaining
        )),
        None => Ok(format!("✓ {} completed", args.query)),
    }
}
