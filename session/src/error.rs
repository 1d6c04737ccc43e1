use memorito_core::GameError;
use thiserror::Error;

/// Configuration bugs that prevent an engine from starting.
#[derive(Error, Debug)]
pub enum SessionError {
    #[error("No tokio runtime to drive timers and score requests")]
    NoRuntime(#[from] tokio::runtime::TryCurrentError),
    #[error("Invalid game configuration: {0}")]
    Game(#[from] GameError),
}

/// Failures reported by a score service. They never reach gameplay.
#[derive(Error, Debug)]
pub enum ScoreError {
    #[error("Player is not authenticated")]
    NotAuthenticated,
    #[error("Score service unavailable: {0}")]
    Unavailable(String),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Malformed score data: {0}")]
    Json(#[from] serde_json::Error),
}
