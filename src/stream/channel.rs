//! The process-wide input channel.
//!
//! Code under test reads through [`stdin()`] instead of `std::io::stdin()`.
//! Each read goes to whichever [`InputChannel`] is installed at that moment:
//! the real process stdin by default, or a scripted stream inside a
//! [`ScopedInstaller`](crate::scope::ScopedInstaller) run.

use std::fmt;
use std::io::{self, Read};
use std::sync::Arc;

use parking_lot::Mutex;

use super::scripted::ScriptedStream;
use crate::scope::slot::{RestoreGuard, Slot};

type SharedReader = Arc<Mutex<Box<dyn Read + Send>>>;

/// Shared handle to a byte source. Clones refer to the same source.
#[derive(Clone)]
pub struct InputChannel {
    label: &'static str,
    reader: SharedReader,
}

impl InputChannel {
    /// Wrap `reader` as a channel; `label` shows up in logs and `Debug`.
    pub fn new(label: &'static str, reader: impl Read + Send + 'static) -> Self {
        Self {
            label,
            reader: Arc::new(Mutex::new(Box::new(reader))),
        }
    }

    /// The real standard input of the process.
    #[must_use]
    pub fn process_stdin() -> Self {
        Self::new("stdin", io::stdin())
    }

    /// A channel backed by `stream`. The stream handle stays usable for
    /// configuration while installed.
    #[must_use]
    pub fn scripted(stream: ScriptedStream) -> Self {
        Self::new("scripted", stream)
    }

    /// Name given at construction.
    #[must_use]
    pub const fn label(&self) -> &'static str {
        self.label
    }

    /// Reference identity: true only for clones of the same channel.
    #[must_use]
    pub fn same_channel(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.reader, &other.reader)
    }

    fn read_into(&self, buf: &mut [u8]) -> io::Result<usize> {
        self.reader.lock().read(buf)
    }
}

impl fmt::Debug for InputChannel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InputChannel")
            .field("label", &self.label)
            .field("id", &Arc::as_ptr(&self.reader).cast::<()>())
            .finish()
    }
}

/// `None` until first use, then the process stdin unless something is installed.
static INPUT: Slot<Option<InputChannel>> = Slot::new("input", None);

/// The channel currently installed as process-wide input.
#[must_use]
pub fn current() -> InputChannel {
    INPUT.with(|slot| slot.get_or_insert_with(InputChannel::process_stdin).clone())
}

/// Install `channel` until the returned guard is dropped.
pub fn install(channel: InputChannel) -> RestoreGuard<Option<InputChannel>> {
    // Pin down the default first so the guard restores a concrete channel.
    drop(current());
    INPUT.install(Some(channel))
}

/// Reader over the process-wide input channel.
#[must_use]
pub fn stdin() -> ProcessInput {
    ProcessInput { _private: () }
}

/// Read one line from the process-wide input, without the terminator.
///
/// Consumes a byte at a time so nothing past the line is taken from the
/// channel, and successive calls behave like successive fresh line readers.
/// Returns `Ok(None)` when the channel is at end-of-stream before any byte.
pub fn read_line() -> io::Result<Option<String>> {
    let mut input = stdin();
    let mut line = Vec::new();
    let mut byte = [0_u8; 1];
    loop {
        if input.read(&mut byte)? == 0 {
            if line.is_empty() {
                return Ok(None);
            }
            break;
        }
        if byte[0] == b'\n' {
            break;
        }
        line.push(byte[0]);
    }
    if line.last() == Some(&b'\r') {
        line.pop();
    }
    String::from_utf8(line)
        .map(Some)
        .map_err(|err| io::Error::new(io::ErrorKind::InvalidData, err))
}

/// Handle returned by [`stdin()`].
#[derive(Debug)]
pub struct ProcessInput {
    _private: (),
}

impl Read for ProcessInput {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        current().read_into(buf)
    }
}

// ──────────────────── tests ────────────────────
