//! Build-time error and warning types.
//!
//! Everything here surfaces during registry construction, before any
//! request is served. Misconfiguration is a programmer error: builds fail
//! fast and loud, and nothing in this module ever appears on the request
//! path.

use std::fmt;
use thiserror::Error;

/// Fatal registry-construction errors.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum BuildError {
    /// The same action name was declared twice in one registry.
    #[error("action '{0}' is declared more than once")]
    DuplicateAction(String),

    /// An action was declared with an empty name.
    #[error("action name cannot be empty")]
    EmptyActionName,
}

/// Result alias for registry construction.
pub type BuildResult<T> = Result<T, BuildError>;

/// Non-fatal registry-construction warnings.
///
/// Warnings are logged via `tracing::warn!` when emitted and retained on
/// the finalized registry for host-side inspection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BuildWarning {
    /// An action was declared with no (or only empty) parameter specs; it
    /// is exempt from validation and always passes through.
    NoParams { action: String },
    /// The registry was finalized without a single action contract; every
    /// request passes through unvalidated.
    NoActions,
}

impl fmt::Display for BuildWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BuildWarning::NoParams { action } => write!(
                f,
                "action '{action}' declares no parameters and is exempt from validation"
            ),
            BuildWarning::NoActions => {
                write!(f, "registry finalized without any action contracts")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_messages_name_the_offending_action() {
        let err = BuildError::DuplicateAction("show".to_string());
        assert_eq!(err.to_string(), "action 'show' is declared more than once");
    }

    #[test]
    fn warning_display_is_human_readable() {
        let warning = BuildWarning::NoParams {
            action: "index".to_string(),
        };
        assert!(warning.to_string().contains("index"));
        assert_eq!(
            BuildWarning::NoActions.to_string(),
            "registry finalized without any action contracts"
        );
    }
}
