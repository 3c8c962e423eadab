//! Round-robin sequence commands

use crate::cli::output::{format_json, format_sequence};
use crate::cli::session::with_service;
use crate::cli::{ListArgs, SequenceArgs};
use crate::matching::sequence_cmp;
use crate::roster::StaffMember;
use crate::service::{DeskSnapshot, SequenceOp};

fn ordered<'a>(snapshot: &'a DeskSnapshot, ids: &[String]) -> Vec<&'a StaffMember> {
    ids.iter().filter_map(|id| snapshot.staff(id)).collect()
}

fn render(snapshot: &DeskSnapshot, ids: &[String], json: bool) -> anyhow::Result<String> {
    let staff = ordered(snapshot, ids);
    if json {
        Ok(format_json("sequence", &staff)?)
    } else {
        Ok(format_sequence(&staff))
    }
}

/// Handle `tripdesk sequence show`
pub async fn handle_sequence_show(args: &ListArgs) -> anyhow::Result<String> {
    let snapshot = with_service(&args.desk, false, |handle| async move { Ok(handle.snapshot()) })
        .await?;

    let mut sequenced: Vec<&StaffMember> = snapshot
        .staff
        .iter()
        .filter(|s| s.sequence_order.is_some())
        .collect();
    sequenced.sort_by(|a, b| sequence_cmp(a, b));
    let ids: Vec<String> = sequenced.iter().map(|s| s.id.clone()).collect();

    render(&snapshot, &ids, args.desk.json)
}

/// Handle `tripdesk sequence add|remove|up|down`
pub async fn handle_sequence_edit(args: &SequenceArgs, op: SequenceOp) -> anyhow::Result<String> {
    let (snapshot, ids) = with_service(&args.desk, args.write, |handle| async move {
        let ids = handle.sequence(op, &args.staff).await?;
        Ok((handle.snapshot(), ids))
    })
    .await?;

    render(&snapshot, &ids, args.desk.json)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::DeskArgs;
    use crate::config::DeskConfig;

    const DESK: &str = r#"
[[staff]]
id = "a"
name = "Ana"
active = true
workload_capacity = 2
sequence_order = 1

[[staff]]
id = "b"
name = "Bo"
active = true
workload_capacity = 2
sequence_order = 2

[[staff]]
id = "c"
name = "Cy"
active = true
workload_capacity = 2
"#;

    fn desk_args(dir: &std::path::Path) -> DeskArgs {
        let path = dir.join("tripdesk.toml");
        std::fs::write(&path, DESK).unwrap();
        DeskArgs {
            config: path,
            log_level: Some("error".to_string()),
            json: false,
        }
    }

    #[tokio::test]
    async fn test_sequence_show_skips_unsequenced() {
        let dir = tempfile::tempdir().unwrap();
        let args = ListArgs {
            desk: desk_args(dir.path()),
        };
        let output = handle_sequence_show(&args).await.unwrap();
        assert!(output.contains("1. a (Ana)"));
        assert!(output.contains("2. b (Bo)"));
        assert!(!output.contains("Cy"));
    }

    #[tokio::test]
    async fn test_sequence_down_with_write() {
        let dir = tempfile::tempdir().unwrap();
        let args = SequenceArgs {
            staff: "a".to_string(),
            write: true,
            desk: desk_args(dir.path()),
        };
        let output = handle_sequence_edit(&args, SequenceOp::MoveDown).await.unwrap();
        assert!(output.contains("1. b (Bo)"));

        let saved = DeskConfig::load(Some(&args.desk.config)).unwrap();
        let a = saved.staff.iter().find(|s| s.id == "a").unwrap();
        assert_eq!(a.sequence_order, Some(2));
    }

    #[tokio::test]
    async fn test_sequence_add_already_sequenced() {
        let dir = tempfile::tempdir().unwrap();
        let args = SequenceArgs {
            staff: "b".to_string(),
            write: false,
            desk: desk_args(dir.path()),
        };
        assert!(handle_sequence_edit(&args, SequenceOp::Add).await.is_err());
    }
}
