//! Global value slot with an RAII restore guard.

use std::fmt;
use std::thread;

use parking_lot::Mutex;
use tracing::debug;

/// A process-wide value that can be swapped for the duration of a scope.
///
/// The lock only protects individual reads and swaps. Holding a
/// [`RestoreGuard`] does not keep other scopes out; running one scope at a
/// time is the caller's job.
pub struct Slot<T> {
    label: &'static str,
    value: Mutex<T>,
}

impl<T> Slot<T> {
    /// A slot holding `value`, named `label` in logs.
    pub const fn new(label: &'static str, value: T) -> Self {
        Self {
            label,
            value: parking_lot::const_mutex(value),
        }
    }

    /// Name used in install/restore logs.
    #[must_use]
    pub const fn label(&self) -> &'static str {
        self.label
    }

    /// Store `value`, returning what was there before.
    pub fn replace(&self, value: T) -> T {
        std::mem::replace(&mut *self.value.lock(), value)
    }

    /// Run `f` with exclusive access to the stored value.
    pub fn with<R>(&self, f: impl FnOnce(&mut T) -> R) -> R {
        f(&mut self.value.lock())
    }
}

impl<T: 'static> Slot<T> {
    /// Swap `value` in until the returned guard is dropped.
    ///
    /// The previous value is captured here, once, and put back exactly once
    /// when the guard goes out of scope.
    pub fn install(&'static self, value: T) -> RestoreGuard<T> {
        let previous = self.replace(value);
        debug!(slot = self.label, "scoped value installed");
        RestoreGuard {
            slot: self,
            previous: Some(previous),
        }
    }
}

impl<T> fmt::Debug for Slot<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Slot").field("label", &self.label).finish_non_exhaustive()
    }
}

/// Puts a slot's previous value back when dropped.
#[must_use = "dropping the guard restores the previous value immediately"]
pub struct RestoreGuard<T: 'static> {
    slot: &'static Slot<T>,
    previous: Option<T>,
}

impl<T: 'static> RestoreGuard<T> {
    /// The value that will be restored.
    #[must_use]
    pub fn previous(&self) -> Option<&T> {
        self.previous.as_ref()
    }
}

impl<T: 'static> Drop for RestoreGuard<T> {
    fn drop(&mut self) {
        if let Some(previous) = self.previous.take() {
            drop(self.slot.replace(previous));
            debug!(
                slot = self.slot.label,
                unwinding = thread::panicking(),
                "scoped value restored"
            );
        }
    }
}

impl<T: 'static> fmt::Debug for RestoreGuard<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RestoreGuard")
            .field("slot", &self.slot.label)
            .field("armed", &self.previous.is_some())
            .finish()
    }
}

// ──────────────────── tests ────────────────────
