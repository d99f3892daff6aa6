//! Scoped stdin: test-scoped substitution of process-wide input and
//! security policy.
//!
//! A [`ScriptedStream`] yields caller-supplied text and then either
//! end-of-stream or one injected failure. A [`ScopedInstaller`] makes it the
//! process-wide input channel for exactly one unit of work and always puts
//! the previous channel back. [`policy::ProvidePolicy`] does the same for the
//! process-wide security policy.
//!
//! Code under test reads through [`stream::stdin()`] (or
//! [`stream::read_line()`]) instead of `std::io::stdin()`.

pub mod core;
pub mod policy;
pub mod scope;
pub mod stream;

pub use crate::core::errors::{Result, ScopeError};
pub use scope::ScopedInstaller;
pub use stream::{InjectedFailure, RuntimeFault, ScriptedStream, StreamState};

/// Serialises unit tests that touch the process-wide slots.
#[cfg(test)]
pub(crate) fn test_serial() -> parking_lot::MutexGuard<'static, ()> {
    static SERIAL: parking_lot::Mutex<()> = parking_lot::const_mutex(());
    SERIAL.lock()
}
