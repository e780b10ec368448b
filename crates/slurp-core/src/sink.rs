//! Output sink for raw stream bytes: stdout or a file.

use crate::error::ConfigError;
use std::fs::File;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

/// Where stream bytes go. Written by one attempt at a time, in arrival order.
pub enum OutputSink {
    Stdout(io::Stdout),
    File { file: File, path: PathBuf },
}

impl OutputSink {
    /// Open the sink. `None` means stdout. Files are truncated unless `append` is set.
    pub fn open(path: Option<&Path>, append: bool) -> Result<Self, ConfigError> {
        let Some(path) = path else {
            return Ok(OutputSink::Stdout(io::stdout()));
        };
        let file = File::options()
            .create(true)
            .write(true)
            .append(append)
            .truncate(!append)
            .open(path)
            .map_err(|source| ConfigError::OutputFile {
                path: path.to_path_buf(),
                source,
            })?;
        Ok(OutputSink::File {
            file,
            path: path.to_path_buf(),
        })
    }

    /// Human-readable destination for log lines.
    pub fn describe(&self) -> String {
        match self {
            OutputSink::Stdout(_) => "stdout".to_string(),
            OutputSink::File { path, .. } => path.display().to_string(),
        }
    }
}

impl Write for OutputSink {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        match self {
            OutputSink::Stdout(out) => out.lock().write(buf),
            OutputSink::File { file, .. } => file.write(buf),
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        match self {
            OutputSink::Stdout(out) => out.lock().flush(),
            OutputSink::File { file, .. } => file.flush(),
        }
    }
}
