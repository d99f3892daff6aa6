//! Scripted input: the stream itself, its injectable failures, and the
//! process-wide channel it is installed into.

pub mod channel;
pub mod failure;
pub mod scripted;

pub use channel::{InputChannel, ProcessInput, read_line, stdin};
pub use failure::{InjectedFailure, RuntimeFault};
pub use scripted::{ScriptedStream, StreamState};
