//! Tracing setup for the desk
//!
//! Logs go to stderr so command output on stdout stays machine-readable.
//! `RUST_LOG`, when set, replaces the configured filter entirely.

use tracing_subscriber::util::TryInitError;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::{LogFormat, LoggingConfig};

/// Build filter directives string from LoggingConfig
///
/// The base level comes first, followed by one `tripdesk::<component>=<level>`
/// directive per configured component, sorted by component name.
///
/// # Examples
///
/// ```
/// use tripdesk::config::LoggingConfig;
/// use tripdesk::logging::build_filter_directives;
/// use std::collections::HashMap;
///
/// let config = LoggingConfig {
///     level: "warn".to_string(),
///     component_levels: Some(HashMap::from([
///         ("matching".to_string(), "debug".to_string()),
///     ])),
///     ..LoggingConfig::default()
/// };
///
/// assert_eq!(build_filter_directives(&config), "warn,tripdesk::matching=debug");
/// ```
pub fn build_filter_directives(config: &LoggingConfig) -> String {
    let mut filter_str = config.level.clone();

    if let Some(component_levels) = &config.component_levels {
        let mut components: Vec<_> = component_levels.iter().collect();
        components.sort();
        for (component, level) in components {
            filter_str.push_str(&format!(",tripdesk::{}={}", component, level));
        }
    }

    filter_str
}

/// Install the global subscriber. Fails if one is already installed.
pub fn init_tracing(config: &LoggingConfig) -> Result<(), TryInitError> {
    let filter_str = build_filter_directives(config);
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&filter_str));

    match config.format {
        LogFormat::Pretty => tracing_subscriber::registry()
            .with(env_filter)
            .with(
                tracing_subscriber::fmt::layer()
                    .pretty()
                    .with_writer(std::io::stderr),
            )
            .try_init(),
        LogFormat::Json => tracing_subscriber::registry()
            .with(env_filter)
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_writer(std::io::stderr),
            )
            .try_init(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_filter_without_components() {
        let config = LoggingConfig::default();
        assert_eq!(build_filter_directives(&config), "warn");
    }

    #[test]
    fn test_filter_components_are_sorted() {
        let config = LoggingConfig {
            level: "info".to_string(),
            format: LogFormat::Json,
            component_levels: Some(HashMap::from([
                ("service".to_string(), "trace".to_string()),
                ("executor".to_string(), "debug".to_string()),
            ])),
        };
        assert_eq!(
            build_filter_directives(&config),
            "info,tripdesk::executor=debug,tripdesk::service=trace"
        );
    }

    #[test]
    fn test_second_init_fails() {
        let config = LoggingConfig::default();
        let _ = init_tracing(&config);
        assert!(init_tracing(&config).is_err());
    }
}
