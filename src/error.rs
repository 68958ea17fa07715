use thiserror::Error;

pub type DataResult<T> = Result<T, DataAccessError>;

/// Failures talking to the relational store.
#[derive(Debug, Error)]
pub enum DataAccessError {
    #[error("connection failed: {0}")]
    Connect(#[source] sqlx::Error),

    #[error("{context}: {source}")]
    Query {
        context: &'static str,
        #[source]
        source: sqlx::Error,
    },

    #[error("schema setup failed: {0}")]
    Schema(#[source] sqlx::Error),
}

impl DataAccessError {
    pub fn query(context: &'static str) -> impl FnOnce(sqlx::Error) -> Self {
        move |source| Self::Query { context, source }
    }
}

/// Failures of the autoscale launcher.
#[derive(Debug, Error)]
pub enum LaunchError {
    #[error("CPU must be a number (got '{input}')")]
    InvalidCpu { input: String },

    /// Only ever rendered into the launcher's returned text.
    #[error("Error running autoscaler: {0}")]
    Start(String),
}
