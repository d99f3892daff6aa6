//! SSI-prefixed error types with structured error codes.

#![allow(missing_docs)]

use std::path::{Path, PathBuf};

use thiserror::Error;

/// Shared `Result` alias for the project.
pub type Result<T> = std::result::Result<T, ScopeError>;

/// Top-level error type for scoped stdin.
///
/// Injected failures never pass through this type: they reach the reader as
/// the original `io::Error` or `RuntimeFault` panic payload.
#[derive(Debug, Error)]
pub enum ScopeError {
    #[error("[SSI-1001] invalid script configuration: {details}")]
    InvalidConfig { details: String },

    #[error("[SSI-1002] missing script file: {path}")]
    MissingConfig { path: PathBuf },

    #[error("[SSI-1003] script parse failure in {context}: {details}")]
    ConfigParse {
        context: &'static str,
        details: String,
    },

    #[error("[SSI-2001] unsupported failure category: {details}")]
    UnsupportedFailure { details: String },

    #[error("[SSI-3002] IO failure at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("[SSI-4001] permission {permission} denied by {policy}")]
    PermissionDenied {
        permission: String,
        policy: &'static str,
    },
}

impl ScopeError {
    /// Stable machine-parseable error code.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::InvalidConfig { .. } => "SSI-1001",
            Self::MissingConfig { .. } => "SSI-1002",
            Self::ConfigParse { .. } => "SSI-1003",
            Self::UnsupportedFailure { .. } => "SSI-2001",
            Self::Io { .. } => "SSI-3002",
            Self::PermissionDenied { .. } => "SSI-4001",
        }
    }

    /// Whether the error was caused by the caller's configuration rather than
    /// by the environment.
    #[must_use]
    pub const fn is_configuration(&self) -> bool {
        matches!(
            self,
            Self::InvalidConfig { .. } | Self::ConfigParse { .. } | Self::UnsupportedFailure { .. }
        )
    }

    /// Convenience constructor for IO errors with a known path.
    #[must_use]
    pub fn io(path: impl AsRef<Path>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.as_ref().to_path_buf(),
            source,
        }
    }
}

impl From<toml::de::Error> for ScopeError {
    fn from(value: toml::de::Error) -> Self {
        Self::ConfigParse {
            context: "toml",
            details: value.to_string(),
        }
    }
}

// ──────────────────── tests ────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_match_display_prefix() {
        let errors = [
            ScopeError::InvalidConfig {
                details: "x".into(),
            },
            ScopeError::MissingConfig {
                path: PathBuf::from("/nope.toml"),
            },
            ScopeError::UnsupportedFailure {
                details: "fmt::Error".into(),
            },
            ScopeError::io("/tmp/x", std::io::Error::other("boom")),
            ScopeError::PermissionDenied {
                permission: "exit".into(),
                policy: "deny",
            },
        ];
        for error in errors {
            let rendered = error.to_string();
            assert!(
                rendered.starts_with(&format!("[{}]", error.code())),
                "{rendered} should start with its code"
            );
        }
    }

    #[test]
    fn configuration_errors_are_flagged() {
        assert!(
            ScopeError::UnsupportedFailure {
                details: String::new()
            }
            .is_configuration()
        );
        assert!(!ScopeError::io("/x", std::io::Error::other("y")).is_configuration());
    }

    #[test]
    fn toml_errors_convert_to_parse_failures() {
        let err = toml::from_str::<toml::Value>("= nope").unwrap_err();
        let converted = ScopeError::from(err);
        assert_eq!(converted.code(), "SSI-1003");
    }
}
