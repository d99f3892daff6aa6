//! Runs one unit of work with a scripted stream as the process-wide input.

use super::slot::RestoreGuard;
use crate::stream::channel::{self, InputChannel};
use crate::stream::scripted::ScriptedStream;

/// Installs a [`ScriptedStream`] around a unit of work and always restores
/// the previous input channel afterwards.
#[derive(Debug, Clone, Default)]
pub struct ScopedInstaller {
    stream: ScriptedStream,
}

impl ScopedInstaller {
    /// Installer around a preconfigured stream.
    #[must_use]
    pub fn new(stream: ScriptedStream) -> Self {
        Self { stream }
    }

    /// Installer around [`ScriptedStream::empty`].
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// Handle for configuring content before or during [`run`](Self::run).
    #[must_use]
    pub fn stream(&self) -> &ScriptedStream {
        &self.stream
    }

    /// Execute `work` with the scripted stream installed.
    ///
    /// The previous channel is captured once and restored once, whether
    /// `work` returns, returns an `Err`, or panics. The outcome is passed
    /// through untouched: the return value as-is, a panic resumed with its
    /// original payload.
    pub fn run<R>(&self, work: impl FnOnce() -> R) -> R {
        let _restore = self.install();
        work()
    }

    /// Install without a closure; the previous channel comes back when the
    /// guard drops.
    pub fn install(&self) -> RestoreGuard<Option<InputChannel>> {
        channel::install(InputChannel::scripted(self.stream.clone()))
    }
}

// ──────────────────── tests ────────────────────
