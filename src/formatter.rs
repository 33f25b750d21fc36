//! External code formatter
//!
//! With `--validate`, code is piped through a formatter command (yapf by
//! default) before rendering. A formatter that exits non-zero rejects the
//! code; that is the only syntax check performed.

use std::io::{self, Write};
use std::process::{Command, Stdio};
use std::thread;

use tracing::debug;

use crate::error::{ConvertError, Result};

/// Formatter used when none is configured
pub const DEFAULT_FORMATTER: &str = "yapf";

/// A formatter reading code on stdin and writing it to stdout
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExternalFormatter {
    program: String,
    args: Vec<String>,
}

impl ExternalFormatter {
    /// Build from a command line such as `yapf --style=pep8`
    ///
    /// Returns None for an empty command line.
    pub fn from_command_line(command: &str) -> Option<Self> {
        let mut words = command.split_whitespace().map(str::to_string);
        let program = words.next()?;
        Some(Self {
            program,
            args: words.collect(),
        })
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    /// Run the formatter over `code`
    pub fn format(&self, code: &str) -> Result<String> {
        debug!("Formatting {} bytes with {}", code.len(), self.program);

        let mut child = Command::new(&self.program)
            .args(&self.args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|source| ConvertError::FormatterSpawn {
                program: self.program.clone(),
                source,
            })?;

        // Feed stdin from its own thread while stdout is drained here, so
        // neither pipe can fill up and stall both processes. Dropping stdin
        // closes the pipe; a formatter that quits early is judged by its
        // exit status.
        let writer = child.stdin.take().map(|mut stdin| {
            let code = code.to_string();
            thread::spawn(move || match stdin.write_all(code.as_bytes()) {
                Err(e) if e.kind() != io::ErrorKind::BrokenPipe => Err(e),
                _ => Ok(()),
            })
        });
        let output = child.wait_with_output()?;
        if let Some(writer) = writer {
            writer
                .join()
                .map_err(|_| io::Error::new(io::ErrorKind::Other, "formatter input thread panicked"))??;
        }

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(ConvertError::Formatter {
                program: self.program.clone(),
                message: stderr.trim().to_string(),
            });
        }

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}
