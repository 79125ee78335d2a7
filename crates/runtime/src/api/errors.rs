//! Unified error types surfaced by the runtime API.
//!
//! Wraps engine failures and worker coordination problems so clients can
//! bubble them up with consistent context.
use battle_core::{BattleError, EngineError, ErrorSeverity};
use thiserror::Error;
use tokio::sync::oneshot;

pub type Result<T> = std::result::Result<T, RuntimeError>;

#[derive(Debug, Error)]
pub enum RuntimeError {
    #[error("runtime requires an initial battle state before building")]
    MissingState,

    #[error("invalid runtime configuration: {0}")]
    InvalidConfig(String),

    #[error("battle engine failed at tick {tick}")]
    Engine {
        tick: u64,
        #[source]
        source: EngineError,
    },

    #[error("battle worker command channel closed")]
    CommandChannelClosed,

    #[error("battle worker reply channel closed")]
    ReplyChannelClosed(#[source] oneshot::error::RecvError),

    #[error("battle worker join failed")]
    WorkerJoin(#[source] tokio::task::JoinError),
}

impl RuntimeError {
    /// Severity of the underlying failure. Coordination errors are internal.
    pub fn severity(&self) -> ErrorSeverity {
        match self {
            Self::Engine { source, .. } => source.severity(),
            Self::MissingState | Self::InvalidConfig(_) => ErrorSeverity::Validation,
            Self::CommandChannelClosed | Self::ReplyChannelClosed(_) | Self::WorkerJoin(_) => {
                ErrorSeverity::Internal
            }
        }
    }
}
