use thiserror::Error;

#[derive(Debug, Error)]
pub enum GraphError {
    #[error("git error: {0}")]
    Git(#[from] git2::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid config: {0}")]
    Config(#[from] toml::de::Error),

    #[error("invalid commit list: {0}")]
    Input(#[from] serde_json::Error),

    #[error("invalid timestamp {seconds} on commit {oid}")]
    InvalidTimestamp { oid: String, seconds: i64 },
}

pub type Result<T> = std::result::Result<T, GraphError>;
