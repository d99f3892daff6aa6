//! In-memory scripted input: caller-supplied fragments followed by either
//! end-of-stream or a one-shot injected failure.
//!
//! A [`ScriptedStream`] is a cheap, cloneable handle onto shared state. The
//! test keeps one handle to configure content while another is installed as
//! the process-wide input channel, so content provided from inside the unit of
//! work is visible to the code under test.
//!
//! Reads move through four states:
//!
//! ```text
//! Streaming ──(content drained)──► ExhaustedClean          (reads yield EOF)
//!     │
//!     └──(content drained, failure pending)──► ExhaustedWithFailure
//!                                                   │ next read raises
//!                                                   ▼
//!                                              FailureRaised
//! ```

use std::io::{self, Read};
use std::sync::Arc;

use memchr::memchr;
use parking_lot::Mutex;
use tracing::{trace, warn};

use super::failure::InjectedFailure;
use crate::core::errors::{Result, ScopeError};

/// Terminator appended by [`ScriptedStream::provide_lines`] unless overridden.
pub const DEFAULT_LINE_TERMINATOR: &str = "\n";

/// Observable position of a stream in its read lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StreamState {
    /// Unread content remains.
    Streaming,
    /// Content drained; reads return end-of-stream.
    ExhaustedClean,
    /// Content drained; the next read raises the pending failure.
    ExhaustedWithFailure,
    /// The pending failure has been raised.
    FailureRaised,
}

#[derive(Debug)]
struct Script {
    segments: Vec<Vec<u8>>,
    segment: usize,
    offset: usize,
    pending: Option<InjectedFailure>,
    raised: bool,
    line_terminator: Vec<u8>,
}

impl Script {
    fn new(line_terminator: Vec<u8>) -> Self {
        Self {
            segments: Vec::new(),
            segment: 0,
            offset: 0,
            pending: None,
            raised: false,
            line_terminator,
        }
    }

    /// Move the cursor past fully consumed (or empty) segments.
    fn skip_drained(&mut self) {
        while self
            .segments
            .get(self.segment)
            .is_some_and(|segment| self.offset >= segment.len())
        {
            self.segment += 1;
            self.offset = 0;
        }
    }

    fn chunk(&self) -> Option<&[u8]> {
        self.segments
            .get(self.segment)
            .map(|segment| &segment[self.offset..])
            .filter(|rest| !rest.is_empty())
    }

    fn remaining(&self) -> usize {
        self.segments
            .iter()
            .skip(self.segment)
            .map(Vec::len)
            .sum::<usize>()
            .saturating_sub(self.offset)
    }

    fn state(&self) -> StreamState {
        if self.remaining() > 0 {
            StreamState::Streaming
        } else if self.pending.is_some() {
            StreamState::ExhaustedWithFailure
        } else if self.raised {
            StreamState::FailureRaised
        } else {
            StreamState::ExhaustedClean
        }
    }

    fn take_failure(&mut self) -> Option<InjectedFailure> {
        let failure = self.pending.take();
        if failure.is_some() {
            self.raised = true;
        }
        failure
    }
}

/// Scripted substitute for the process's input stream.
#[derive(Debug, Clone)]
pub struct ScriptedStream {
    inner: Arc<Mutex<Script>>,
}

impl Default for ScriptedStream {
    fn default() -> Self {
        Self::empty()
    }
}

impl ScriptedStream {
    /// A stream with no content and no pending failure: the first read
    /// returns end-of-stream.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            inner: Arc::new(Mutex::new(Script::new(
                DEFAULT_LINE_TERMINATOR.as_bytes().to_vec(),
            ))),
        }
    }

    /// An empty stream whose [`provide_lines`](Self::provide_lines) appends
    /// `terminator` instead of `"\n"`.
    pub fn with_line_terminator(terminator: &str) -> Result<Self> {
        if terminator.is_empty() {
            return Err(ScopeError::InvalidConfig {
                details: "line terminator must not be empty".to_string(),
            });
        }
        Ok(Self {
            inner: Arc::new(Mutex::new(Script::new(terminator.as_bytes().to_vec()))),
        })
    }

    /// Append each fragment verbatim. No separator is inserted between or
    /// after fragments. An empty slice leaves the content unchanged.
    pub fn provide_text(&self, fragments: &[&str]) {
        let mut script = self.inner.lock();
        for fragment in fragments {
            script.segments.push(fragment.as_bytes().to_vec());
        }
        trace!(fragments = fragments.len(), "scripted text provided");
    }

    /// Append each line followed by exactly one line terminator.
    pub fn provide_lines(&self, lines: &[&str]) {
        let mut script = self.inner.lock();
        for line in lines {
            let mut segment = Vec::with_capacity(line.len() + script.line_terminator.len());
            segment.extend_from_slice(line.as_bytes());
            segment.extend_from_slice(&script.line_terminator);
            script.segments.push(segment);
        }
        trace!(lines = lines.len(), "scripted lines provided");
    }

    /// Raise `failure` on the first read after the content is exhausted.
    ///
    /// A second call replaces the earlier failure (last write wins). Arming a
    /// failure after an earlier one fired re-arms the trap.
    pub fn throw_on_input_end(&self, failure: impl Into<InjectedFailure>) {
        let failure = failure.into();
        let mut script = self.inner.lock();
        if let Some(previous) = &script.pending {
            warn!(
                previous = previous.category(),
                replacement = failure.category(),
                "pending end-of-input failure replaced"
            );
        }
        script.pending = Some(failure);
        script.raised = false;
    }

    /// Like [`throw_on_input_end`](Self::throw_on_input_end), but classifies an
    /// arbitrary error object first. Unsupported categories are rejected here.
    pub fn throw_error_on_input_end(
        &self,
        failure: Box<dyn std::error::Error + Send + Sync + 'static>,
    ) -> Result<()> {
        let failure = InjectedFailure::classify(failure)?;
        self.throw_on_input_end(failure);
        Ok(())
    }

    /// Drop all content and any pending failure, rewinding to an empty script.
    pub fn clear(&self) {
        let mut script = self.inner.lock();
        let terminator = std::mem::take(&mut script.line_terminator);
        *script = Script::new(terminator);
    }

    /// Read a single byte. `Ok(None)` is the end-of-stream sentinel.
    ///
    /// Once the content is exhausted, a pending I/O failure is returned as
    /// `Err` and a pending [`RuntimeFault`](super::failure::RuntimeFault)
    /// panics. Either fires exactly once.
    pub fn read_byte(&self) -> io::Result<Option<u8>> {
        let mut script = self.inner.lock();
        script.skip_drained();
        if let Some(byte) = script.chunk().map(|chunk| chunk[0]) {
            script.offset += 1;
            return Ok(Some(byte));
        }
        let failure = script.take_failure();
        drop(script);
        failure.map_or(Ok(None), |failure| Err(fire(failure)))
    }

    /// Unread content bytes.
    #[must_use]
    pub fn remaining(&self) -> usize {
        self.inner.lock().remaining()
    }

    /// Where the stream is in its read lifecycle.
    #[must_use]
    pub fn state(&self) -> StreamState {
        self.inner.lock().state()
    }
}

fn fire(failure: InjectedFailure) -> io::Error {
    trace!(category = failure.category(), "injecting end-of-input failure");
    failure.raise()
}

/// Bulk reads stop after the next line terminator and never cross a segment,
/// so independent buffered readers each see whole lines.
impl Read for &ScriptedStream {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        if buf.is_empty() {
            return Ok(0);
        }
        let mut script = self.inner.lock();
        script.skip_drained();
        let boundary = script.line_terminator.last().copied();
        if let Some(chunk) = script.chunk() {
            let line_end = boundary
                .and_then(|byte| memchr(byte, chunk))
                .map_or(chunk.len(), |index| index + 1);
            let count = line_end.min(buf.len());
            buf[..count].copy_from_slice(&chunk[..count]);
            script.offset += count;
            return Ok(count);
        }
        let failure = script.take_failure();
        drop(script);
        failure.map_or(Ok(0), |failure| Err(fire(failure)))
    }
}

impl Read for ScriptedStream {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        (&*self).read(buf)
    }
}

// ──────────────────── tests ────────────────────
