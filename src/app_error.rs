use thiserror::Error;
use tracing::error;

use crate::db_postgres::Table;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("internal error: {0}")]
    Internal(String),
    #[error("sqlx: {0}")]
    SqlxError(#[from] sqlx::Error),
    #[error("unknown {0}")]
    UnknownInDb(Table),
}

impl AppError {
    /// Log the error, used at the top level before the process exits
    pub fn log(&self) {
        match self {
            Self::SqlxError(e) => error!("{:?}", e),
            Self::Internal(e) => error!("internal: {}", e),
            Self::UnknownInDb(table) => error!("dangling reference to {}", table),
        }
    }
}
