//! Scoped acquisition of process-wide state with guaranteed release.
//!
//! [`slot::Slot`] holds one piece of global state. Swapping a value in hands
//! back a [`slot::RestoreGuard`] that puts the previous value back on drop,
//! which covers normal return, early `?` exits and panic unwinding alike.

pub mod installer;
pub mod slot;

pub use installer::ScopedInstaller;
pub use slot::{RestoreGuard, Slot};
