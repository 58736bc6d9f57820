use thiserror::Error;

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("invalid decision id: {0}")]
    InvalidDecisionId(String),

    #[error("invariant violated: {0}")]
    InvariantViolation(String),
}
