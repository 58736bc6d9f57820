use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("core error: {0}")]
    Core(#[from] consensus_core::error::CoreError),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("config error: {0}")]
    Config(#[from] figment::Error),

    #[error("decision not found: {0}")]
    DecisionNotFound(String),

    #[error("store not found (searched upward from {0})")]
    StoreNotFound(String),

    #[error("store already exists at {0}")]
    StoreExists(String),

    #[error("{0} is locked; if no other consensus process is running, delete that file")]
    LockConflict(String),

    #[error("invalid location: {0}")]
    InvalidLocation(String),

    #[error("store unavailable: {0}")]
    Unavailable(String),
}
