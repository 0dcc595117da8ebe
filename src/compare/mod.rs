//! Pairwise similarity between two version directories.
//!
//! Each comparison runs an external duplicate detector with its stdout
//! redirected to a temporary file, then parses that file once the process
//! exits. The file is removed as soon as the comparison finishes, whether
//! or not its contents could be parsed.

mod parse;
mod tool;

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use thiserror::Error;
use tracing::debug;

pub use tool::Tool;

#[derive(Debug, Error)]
pub enum CompareError {
    #[error("failed to execute {tool}: {source}")]
    Spawn {
        tool: &'static str,
        #[source]
        source: io::Error,
    },

    #[error("i/o error while capturing output: {0}")]
    Io(#[from] io::Error),

    #[error("invalid JSON report: {source}")]
    InvalidJson {
        #[source]
        source: serde_json::Error,
        output: String,
    },

    #[error("no duplicated-lines summary in output")]
    UnrecognizedOutput { output: String },

    #[error("no directory known for version {0}")]
    UnknownVersion(String),
}

impl CompareError {
    /// The tool output that could not be parsed, if that is what failed.
    pub fn raw_output(&self) -> Option<&str> {
        match self {
            CompareError::InvalidJson { output, .. } | CompareError::UnrecognizedOutput { output } => {
                Some(output)
            }
            _ => None,
        }
    }
}

/// Counts the lines two source trees have in common.
///
/// Implementations are called concurrently from the batch runner.
pub trait Comparator: Sync {
    fn name(&self) -> &str;

    fn compare(&self, left: &Path, right: &Path) -> Result<u64, CompareError>;
}

/// A [`Comparator`] backed by one of the supported external tools.
pub struct ExternalComparator {
    tool: Tool,
    temp_dir: PathBuf,
}

impl ExternalComparator {
    pub fn new(tool: Tool) -> Self {
        Self {
            tool,
            temp_dir: std::env::temp_dir(),
        }
    }

    /// Write intermediate reports under `dir` instead of the system temp dir.
    #[allow(dead_code)]
    pub fn with_temp_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.temp_dir = dir.into();
        self
    }
}

impl Comparator for ExternalComparator {
    fn name(&self) -> &str {
        self.tool.name()
    }

    fn compare(&self, left: &Path, right: &Path) -> Result<u64, CompareError> {
        let cmd = self.tool.command(left, right);
        let output = capture_stdout(cmd, self.tool.name(), &self.temp_dir)?;
        self.tool.parse(&output)
    }
}

/// Run `cmd` to completion with stdout written into a temporary file under
/// `temp_dir` and return what it wrote. The exit status is not checked:
/// detectors such as phpcpd exit non-zero when they find clones.
pub fn capture_stdout(
    mut cmd: Command,
    tool: &'static str,
    temp_dir: &Path,
) -> Result<String, CompareError> {
    let report = tempfile::Builder::new()
        .prefix("versus-")
        .suffix(".out")
        .tempfile_in(temp_dir)?;

    cmd.stdin(Stdio::null())
        .stdout(Stdio::from(report.reopen()?))
        .stderr(Stdio::null());
    debug!(tool, "{cmd:?}");

    let status = cmd
        .spawn()
        .and_then(|mut child| child.wait())
        .map_err(|source| CompareError::Spawn { tool, source })?;
    debug!(tool, %status, "exited");

    let bytes = fs::read(report.path())?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

#[cfg(test)]
#[path = "mod_test.rs"]
mod tests;
