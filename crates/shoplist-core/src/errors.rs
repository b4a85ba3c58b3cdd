use std::path::PathBuf;

/// Core error type for the shopping list bot.
///
/// User-input problems (empty `/add`, no match on `/remove`) are never errors;
/// they are ordinary result variants. Everything here is either a startup
/// failure or something the host must surface before exiting.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("config error: {0}")]
    Config(String),

    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("corrupt list state: {path}: {reason}")]
    CorruptState { path: PathBuf, reason: String },

    #[error("failed to write list state: {path}: {source}")]
    StateWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("shutting down; command rejected")]
    ShuttingDown,

    #[error("external error: {0}")]
    External(String),
}

pub type Result<T> = std::result::Result<T, Error>;
