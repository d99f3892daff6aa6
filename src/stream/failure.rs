//! Failures that a scripted stream raises once its content is exhausted.

use std::error::Error;
use std::fmt;
use std::io;

use crate::core::errors::{Result, ScopeError};

/// Unchecked fault delivered by panicking out of a read.
///
/// The fault is the panic payload itself (`std::panic::panic_any`), so code
/// that catches the unwind can downcast back to the exact value it configured.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuntimeFault {
    message: String,
}

impl RuntimeFault {
    /// A fault carrying `message` as its payload text.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    /// The configured payload text.
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl fmt::Display for RuntimeFault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "runtime fault: {}", self.message)
    }
}

impl Error for RuntimeFault {}

/// Closed set of failure categories a stream can inject at end of input.
#[derive(Debug)]
pub enum InjectedFailure {
    /// Returned from the read as an `Err`.
    Io(io::Error),
    /// Raised from the read as a panic.
    Runtime(RuntimeFault),
}

impl InjectedFailure {
    /// Sort an open-ended error object into one of the supported categories.
    ///
    /// Anything that is neither an `io::Error` nor a [`RuntimeFault`] is a
    /// configuration error, reported here rather than at read time.
    pub fn classify(failure: Box<dyn Error + Send + Sync + 'static>) -> Result<Self> {
        let failure = match failure.downcast::<io::Error>() {
            Ok(io_error) => return Ok(Self::Io(*io_error)),
            Err(other) => other,
        };
        match failure.downcast::<RuntimeFault>() {
            Ok(fault) => Ok(Self::Runtime(*fault)),
            Err(other) => Err(ScopeError::UnsupportedFailure {
                details: format!("expected io::Error or RuntimeFault, got: {other}"),
            }),
        }
    }

    /// Short category label used in logs.
    #[must_use]
    pub const fn category(&self) -> &'static str {
        match self {
            Self::Io(_) => "io",
            Self::Runtime(_) => "runtime",
        }
    }

    /// Deliver the failure to the reader.
    pub(crate) fn raise(self) -> io::Error {
        match self {
            Self::Io(error) => error,
            Self::Runtime(fault) => std::panic::panic_any(fault),
        }
    }
}

impl From<io::Error> for InjectedFailure {
    fn from(value: io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<RuntimeFault> for InjectedFailure {
    fn from(value: RuntimeFault) -> Self {
        Self::Runtime(value)
    }
}

// ──────────────────── tests ────────────────────
