use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("API_KEY environment variable not set")]
    MissingApiKey,
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("Subgraph returned HTTP {status}: {body}")]
    Status { status: u16, body: String },
    #[error("GraphQL errors: {0}")]
    GraphQl(String),
    #[error("Subgraph response carried no data")]
    MissingData,
    #[error("Failed to decode subgraph response: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("Invalid number in field `{field}`: {value:?}")]
    InvalidNumber { field: &'static str, value: String },
    #[error("Chart error: {0}")]
    Chart(String),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, AppError>;
