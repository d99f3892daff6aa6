//! TOML script fixtures describing a scripted stream.
//!
//! ```toml
//! line_terminator = "\n"
//! segments = [{ text = "name: " }, { line = "ferris" }]
//!
//! [on_input_end]
//! kind = "io"
//! message = "device unplugged"
//! io_kind = "broken_pipe"
//! ```

#![allow(missing_docs)]

use std::io;
use std::path::Path;

use serde::Deserialize;

use super::errors::{Result, ScopeError};
use crate::stream::failure::{InjectedFailure, RuntimeFault};
use crate::stream::scripted::{DEFAULT_LINE_TERMINATOR, ScriptedStream};

/// One piece of scripted content, kept in file order.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SegmentSpec {
    /// Raw text, appended verbatim.
    Text(String),
    /// A line, appended with the line terminator.
    Line(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FailureSpec {
    /// `"io"` or `"runtime"`.
    pub kind: String,
    #[serde(default)]
    pub message: String,
    /// snake_case `io::ErrorKind` name; only valid with `kind = "io"`.
    pub io_kind: Option<String>,
}

impl FailureSpec {
    /// Turn the description into a concrete failure, rejecting anything that
    /// does not name a supported category.
    pub fn to_failure(&self) -> Result<InjectedFailure> {
        match self.kind.as_str() {
            "io" => {
                let kind = match self.io_kind.as_deref() {
                    Some(name) => parse_io_kind(name)?,
                    None => io::ErrorKind::Other,
                };
                Ok(InjectedFailure::Io(io::Error::new(kind, self.message.clone())))
            }
            "runtime" => {
                if self.io_kind.is_some() {
                    return Err(ScopeError::InvalidConfig {
                        details: "io_kind is only valid for io failures".to_string(),
                    });
                }
                Ok(InjectedFailure::Runtime(RuntimeFault::new(
                    self.message.clone(),
                )))
            }
            other => Err(ScopeError::UnsupportedFailure {
                details: format!("unknown failure kind {other:?}; expected \"io\" or \"runtime\""),
            }),
        }
    }
}

fn parse_io_kind(name: &str) -> Result<io::ErrorKind> {
    let kind = match name {
        "not_found" => io::ErrorKind::NotFound,
        "permission_denied" => io::ErrorKind::PermissionDenied,
        "connection_reset" => io::ErrorKind::ConnectionReset,
        "connection_aborted" => io::ErrorKind::ConnectionAborted,
        "broken_pipe" => io::ErrorKind::BrokenPipe,
        "interrupted" => io::ErrorKind::Interrupted,
        "invalid_data" => io::ErrorKind::InvalidData,
        "timed_out" => io::ErrorKind::TimedOut,
        "unexpected_eof" => io::ErrorKind::UnexpectedEof,
        "other" => io::ErrorKind::Other,
        _ => {
            return Err(ScopeError::InvalidConfig {
                details: format!("unknown io_kind {name:?}"),
            });
        }
    };
    Ok(kind)
}

/// Declarative description of a [`ScriptedStream`].
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ScriptConfig {
    #[serde(default = "default_line_terminator")]
    pub line_terminator: String,
    #[serde(default)]
    pub segments: Vec<SegmentSpec>,
    pub on_input_end: Option<FailureSpec>,
}

fn default_line_terminator() -> String {
    DEFAULT_LINE_TERMINATOR.to_string()
}

impl Default for ScriptConfig {
    fn default() -> Self {
        Self {
            line_terminator: default_line_terminator(),
            segments: Vec::new(),
            on_input_end: None,
        }
    }
}

impl ScriptConfig {
    /// Parse and validate a TOML document.
    pub fn from_toml_str(raw: &str) -> Result<Self> {
        let config: Self = toml::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a fixture file.
    pub fn load(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path).map_err(|source| {
            if source.kind() == io::ErrorKind::NotFound {
                ScopeError::MissingConfig {
                    path: path.to_path_buf(),
                }
            } else {
                ScopeError::io(path, source)
            }
        })?;
        Self::from_toml_str(&raw)
    }

    /// Fail-fast checks, so a bad fixture never reaches read time.
    pub fn validate(&self) -> Result<()> {
        if self.line_terminator.is_empty() {
            return Err(ScopeError::InvalidConfig {
                details: "line_terminator must not be empty".to_string(),
            });
        }
        if let Some(failure) = &self.on_input_end {
            failure.to_failure()?;
        }
        Ok(())
    }

    /// Build a fresh stream with this script's content and failure.
    pub fn build(&self) -> Result<ScriptedStream> {
        let stream = ScriptedStream::with_line_terminator(&self.line_terminator)?;
        for segment in &self.segments {
            match segment {
                SegmentSpec::Text(text) => stream.provide_text(&[text.as_str()]),
                SegmentSpec::Line(line) => stream.provide_lines(&[line.as_str()]),
            }
        }
        if let Some(failure) = &self.on_input_end {
            stream.throw_on_input_end(failure.to_failure()?);
        }
        Ok(stream)
    }
}

// ──────────────────── tests ────────────────────

#[cfg(test)]
mod tests {
    use std::io::Write as _;

    use super::*;
    use crate::stream::scripted::StreamState;

    fn drain(stream: &ScriptedStream) -> io::Result<Vec<u8>> {
        let mut out = Vec::new();
        while let Some(byte) = stream.read_byte()? {
            out.push(byte);
        }
        Ok(out)
    }

    #[test]
    fn empty_document_is_an_empty_stream() {
        let config = ScriptConfig::from_toml_str("").unwrap();
        assert_eq!(config, ScriptConfig::default());
        let stream = config.build().unwrap();
        assert_eq!(stream.state(), StreamState::ExhaustedClean);
    }

    #[test]
    fn segments_keep_file_order() {
        let config = ScriptConfig::from_toml_str(
            r#"
            segments = [{ text = "a" }, { line = "b" }, { text = "c" }]
            "#,
        )
        .unwrap();
        let stream = config.build().unwrap();
        assert_eq!(drain(&stream).unwrap(), b"ab\nc");
    }

    #[test]
    fn io_failure_with_kind_fires_after_content() {
        let config = ScriptConfig::from_toml_str(
            r#"
            line_terminator = "\r\n"
            segments = [{ line = "x" }]

            [on_input_end]
            kind = "io"
            message = "unplugged"
            io_kind = "broken_pipe"
            "#,
        )
        .unwrap();
        let stream = config.build().unwrap();
        assert_eq!(stream.read_byte().unwrap(), Some(b'x'));
        assert_eq!(stream.read_byte().unwrap(), Some(b'\r'));
        assert_eq!(stream.read_byte().unwrap(), Some(b'\n'));
        let err = stream.read_byte().unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::BrokenPipe);
        assert_eq!(err.to_string(), "unplugged");
    }

    #[test]
    fn unknown_failure_kind_is_rejected_at_load() {
        let err = ScriptConfig::from_toml_str(
            r#"
            [on_input_end]
            kind = "timeout"
            "#,
        )
        .unwrap_err();
        assert_eq!(err.code(), "SSI-2001");
    }

    #[test]
    fn io_kind_on_runtime_failure_is_rejected() {
        let err = ScriptConfig::from_toml_str(
            r#"
            [on_input_end]
            kind = "runtime"
            io_kind = "broken_pipe"
            "#,
        )
        .unwrap_err();
        assert_eq!(err.code(), "SSI-1001");
    }

    #[test]
    fn unknown_io_kind_and_empty_terminator_are_rejected() {
        let bad_kind = ScriptConfig::from_toml_str(
            r#"
            [on_input_end]
            kind = "io"
            io_kind = "meltdown"
            "#,
        )
        .unwrap_err();
        assert_eq!(bad_kind.code(), "SSI-1001");

        let bad_terminator = ScriptConfig::from_toml_str(r#"line_terminator = """#).unwrap_err();
        assert_eq!(bad_terminator.code(), "SSI-1001");
    }

    #[test]
    fn unknown_fields_are_parse_errors() {
        let err = ScriptConfig::from_toml_str("lines = [\"a\"]").unwrap_err();
        assert_eq!(err.code(), "SSI-1003");
    }

    #[test]
    fn load_reads_fixture_files() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "segments = [{{ line = \"from disk\" }}]").unwrap();
        let config = ScriptConfig::load(file.path()).unwrap();
        assert_eq!(
            config.segments,
            vec![SegmentSpec::Line("from disk".to_string())]
        );
    }

    #[test]
    fn load_reports_missing_files() {
        let dir = tempfile::tempdir().unwrap();
        let err = ScriptConfig::load(&dir.path().join("absent.toml")).unwrap_err();
        assert_eq!(err.code(), "SSI-1002");
    }
}
