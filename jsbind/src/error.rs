///
/// Backend error types.
///
/// Failures that stop a translation request: operators that should have
/// been eliminated earlier, unknown connected keys looked up strictly,
/// host runtime gate failures and configuration problems. Call-site shape
/// mismatches are not errors here; they become `Expr::Invalid` nodes.
///

use thiserror::Error;

use crate::ir::{BuiltinOperatorId, CoroutineStrategy};
use crate::source::Span;

#[derive(Debug, Error)]
pub enum BackendError {
    #[error("internal error: operator {operator} must not reach code generation under {strategy}")]
    UnsupportedOperator { operator: BuiltinOperatorId, strategy: CoroutineStrategy },

    #[error("unknown standard-library member '{key}'")]
    UnknownConnectedKey { key: String, span: Span },

    #[error("host tool '{tool}' unavailable: {reason}")]
    HostTool { tool: String, reason: String },

    #[error("host tool '{tool}' version {found} does not satisfy {required}")]
    IncompatibleHost { tool: String, found: semver::Version, required: semver::VersionReq },

    #[error("Invalid config: {0}")]
    Config(String),

    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("{0}")]
    Io(#[from] std::io::Error),

    #[error("Version error: {0}")]
    Version(#[from] semver::Error),
}

impl BackendError {
    /// True for failures that indicate a bug in an earlier compiler stage.
    pub fn is_internal(&self) -> bool {
        matches!(self, BackendError::UnsupportedOperator { .. })
    }
}
