// src/error.rs
use chrono::NaiveDate;
use thiserror::Error;

/// Every failure the tool can report. All of them end the current command;
/// nothing here is retried.
#[derive(Debug, Error)]
pub enum FoodError {
    /// A structural element the page or payload must contain is absent.
    #[error("malformed response: {0}")]
    MalformedResponse(String),

    /// Column shape disagrees between pages, or between headers and values.
    #[error("schema drift: {0}")]
    SchemaDrift(String),

    #[error("no free entry number left on day grid {parent_id} for {date} (slots {first}..={last} are all taken)")]
    AllocationExhausted {
        date: NaiveDate,
        parent_id: i64,
        first: u32,
        last: u32,
    },

    #[error("unknown unit {unit:?} in amount {amount:?}")]
    UnknownUnit { unit: String, amount: String },

    /// Caller-supplied input rejected before any request was sent.
    #[error("invalid input: {0}")]
    Validation(String),

    #[error("unsupported: {0}")]
    Unsupported(String),

    #[error("configuration: {0}")]
    Config(String),

    #[error("http: {0}")]
    Http(#[from] reqwest::Error),

    #[error("json: {0}")]
    Json(#[from] serde_json::Error),

    #[error("i/o: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, FoodError>;

impl FoodError {
    pub fn malformed(msg: impl Into<String>) -> Self {
        FoodError::MalformedResponse(msg.into())
    }

    pub fn validation(msg: impl Into<String>) -> Self {
        FoodError::Validation(msg.into())
    }

    /// True when the error only means stdout went away (e.g. piped into `head`).
    pub fn is_broken_pipe(&self) -> bool {
        matches!(self, FoodError::Io(e) if e.kind() == std::io::ErrorKind::BrokenPipe)
    }
}
