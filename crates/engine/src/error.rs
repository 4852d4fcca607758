use thiserror::Error;

/// Result type alias for engine operations
pub type Result<T> = std::result::Result<T, EngineError>;

/// Errors that can occur while spawning or tearing down the engine.
///
/// Rejected moves and rotations are ordinary `false` results, and game over
/// is an event, not an error; only configuration and task-lifecycle
/// problems surface here.
#[derive(Debug, Error)]
pub enum EngineError {
    /// Configuration rejected at startup
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// A runtime task panicked or was cancelled from outside
    #[error("{activity} task failed: {source}")]
    TaskFailed {
        /// Which task went down
        activity: &'static str,
        #[source]
        source: tokio::task::JoinError,
    },
}
