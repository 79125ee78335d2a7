//! Error classification shared by every battle-core error.
//!
//! Stale references never become errors: they are repaired where they are
//! found (no target, skipped effect). What remains is classified by
//! [`ErrorSeverity`] so callers can decide between logging and aborting.

use crate::state::{AbilityId, StatusId, TemplateId};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ErrorSeverity {
    /// The request can succeed later (cooldown, mana).
    Recoverable,
    /// The request was invalid in the current state.
    Validation,
    /// Content or wiring is inconsistent and needs fixing.
    Internal,
}

impl ErrorSeverity {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Recoverable => "recoverable",
            Self::Validation => "validation",
            Self::Internal => "internal",
        }
    }

    pub const fn is_recoverable(&self) -> bool {
        matches!(self, Self::Recoverable)
    }
}

/// Common interface of battle-core errors.
pub trait BattleError: core::fmt::Display + core::fmt::Debug {
    fn severity(&self) -> ErrorSeverity;

    /// Stable identifier for logs and tests.
    fn error_code(&self) -> &'static str;
}

/// A content id referenced by state or another definition has no definition.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ContentError {
    #[error("unknown ability '{0}'")]
    UnknownAbility(AbilityId),

    #[error("unknown status effect '{0}'")]
    UnknownStatus(StatusId),

    #[error("unknown participant template '{0}'")]
    UnknownTemplate(TemplateId),

    #[error("{0} oracle not available")]
    OracleUnavailable(&'static str),
}

impl BattleError for ContentError {
    fn severity(&self) -> ErrorSeverity {
        ErrorSeverity::Internal
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::UnknownAbility(_) => "CONTENT_UNKNOWN_ABILITY",
            Self::UnknownStatus(_) => "CONTENT_UNKNOWN_STATUS",
            Self::UnknownTemplate(_) => "CONTENT_UNKNOWN_TEMPLATE",
            Self::OracleUnavailable(_) => "CONTENT_ORACLE_UNAVAILABLE",
        }
    }
}

/// Errors returned by [`BattleEngine::tick`](crate::BattleEngine::tick).
#[derive(Clone, Debug, PartialEq, thiserror::Error)]
pub enum EngineError {
    #[error(transparent)]
    Content(#[from] ContentError),

    #[error("tick_ms must be greater than zero")]
    ZeroTickDuration,
}

impl BattleError for EngineError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            Self::Content(e) => e.severity(),
            Self::ZeroTickDuration => ErrorSeverity::Validation,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::Content(e) => e.error_code(),
            Self::ZeroTickDuration => "ENGINE_ZERO_TICK",
        }
    }
}
