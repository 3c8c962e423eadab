/// Errors that can occur during roster operations
#[derive(Debug, thiserror::Error)]
pub enum RosterError {
    #[error("staff member already exists: {0}")]
    DuplicateStaff(String),

    #[error("query already exists: {0}")]
    DuplicateQuery(String),

    #[error("staff member not found: {0}")]
    StaffNotFound(String),

    #[error("query not found: {0}")]
    QueryNotFound(String),

    #[error("staff member '{0}' must have a workload capacity above zero")]
    InvalidCapacity(String),

    #[error("sequence order {order} of '{staff_id}' is invalid: {message}")]
    InvalidSequenceOrder {
        staff_id: String,
        order: u32,
        message: String,
    },

    #[error("query '{query_id}' is invalid: {message}")]
    InvalidQuery { query_id: String, message: String },
}
