//! Opening a desk file for one command

use anyhow::Context;
use std::future::Future;
use tokio_util::sync::CancellationToken;

use crate::cli::DeskArgs;
use crate::config::DeskConfig;
use crate::logging::init_tracing;
use crate::service::{Desk, DeskHandle, DeskService};

/// Load the desk file with env and CLI overrides applied
pub fn load_config(args: &DeskArgs) -> anyhow::Result<DeskConfig> {
    let mut config = DeskConfig::load(Some(&args.config))
        .with_context(|| format!("cannot open desk file {}", args.config.display()))?
        .with_env_overrides();

    if let Some(level) = &args.log_level {
        config.logging.level = level.clone();
    }

    Ok(config)
}

/// Run `f` against a desk service for the file named in `args`.
///
/// With `write` set, the desk is saved back to the same file once `f`
/// succeeds. Nothing is written when `f` fails.
pub async fn with_service<F, Fut, T>(args: &DeskArgs, write: bool, f: F) -> anyhow::Result<T>
where
    F: FnOnce(DeskHandle) -> Fut,
    Fut: Future<Output = anyhow::Result<T>>,
{
    let config = load_config(args)?;
    if init_tracing(&config.logging).is_err() {
        tracing::debug!("Tracing already initialized");
    }

    let desk = Desk::from_config(&config)
        .with_context(|| format!("invalid desk file {}", args.config.display()))?;

    let cancel = CancellationToken::new();
    let (handle, join) = DeskService::spawn(desk, cancel.clone());
    let result = f(handle).await;

    cancel.cancel();
    let desk = join.await.context("desk service panicked")?;
    let value = result?;

    if write {
        desk.to_config(&config)
            .save(&args.config)
            .with_context(|| format!("cannot save desk file {}", args.config.display()))?;
        tracing::info!(path = %args.config.display(), "Desk saved");
    }

    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn args(path: PathBuf) -> DeskArgs {
        DeskArgs {
            config: path,
            log_level: Some("error".to_string()),
            json: false,
        }
    }

    #[test]
    fn test_load_config_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let result = load_config(&args(dir.path().join("nope.toml")));
        let message = format!("{:#}", result.unwrap_err());
        assert!(message.contains("cannot open desk file"));
        assert!(message.contains("not found"));
    }

    #[test]
    fn test_load_config_cli_level_wins() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("desk.toml");
        std::fs::write(&path, "[logging]\nlevel = \"debug\"\n").unwrap();

        let config = load_config(&args(path)).unwrap();
        assert_eq!(config.logging.level, "error");
    }

    #[tokio::test]
    async fn test_failed_command_does_not_write() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("desk.toml");
        std::fs::write(&path, "").unwrap();

        let result: anyhow::Result<()> = with_service(&args(path.clone()), true, |_| async {
            anyhow::bail!("boom")
        })
        .await;

        assert!(result.is_err());
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "");
    }
}
