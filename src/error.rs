//! Crate-level error type

use thiserror::Error;

use crate::config::ConfigError;
use crate::executor::AssignError;
use crate::roster::RosterError;
use crate::rules::CatalogError;
use crate::sequencer::SequenceError;

/// Any failure surfaced by a desk operation
#[derive(Debug, Error)]
pub enum DeskError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Roster(#[from] RosterError),

    #[error(transparent)]
    Catalog(#[from] CatalogError),

    #[error(transparent)]
    Assign(#[from] AssignError),

    #[error(transparent)]
    Sequence(#[from] SequenceError),

    /// The desk service task has stopped and can take no more commands
    #[error("desk service is not running")]
    ServiceClosed,
}
