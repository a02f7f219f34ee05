use thiserror::Error;

#[derive(Error, Debug)]
pub enum QueryError {
    #[error("Invalid table name: {0}")]
    InvalidTableName(String),

    #[error("Invalid column name: {0}")]
    InvalidColumn(String),

    #[error("Unknown sort field: {0}")]
    UnknownSortField(String),

    #[error("Invalid limit: {0}")]
    InvalidLimit(String),

    #[error("JSON parsing error: {0}")]
    JsonError(#[from] serde_json::Error),
}
