//! Error types for rule catalog edits

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("rule not found: {0}")]
    RuleNotFound(String),

    #[error("rule already exists: {0}")]
    DuplicateRule(String),
}
