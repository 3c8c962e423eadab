//! Error types for assignment failures

use crate::roster::QueryStatus;
use thiserror::Error;

/// Errors that reject an assignment or lifecycle change.
///
/// None of these leave partial state behind: validation runs before any
/// counter or status is touched.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AssignError {
    #[error("query not found: {0}")]
    QueryNotFound(String),

    #[error("staff member not found: {0}")]
    StaffNotFound(String),

    #[error("staff member '{0}' is inactive")]
    StaffInactive(String),

    #[error("staff member '{0}' cannot take more queries: assigned count is at its limit")]
    LoadLimitReached(String),

    #[error("cannot {action} query '{query_id}' while it is {status}")]
    InvalidTransition {
        query_id: String,
        status: QueryStatus,
        action: &'static str,
    },
}
