use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};

use parking_lot::Mutex;

use crate::{
    error::EventLoggerError,
    types::{Recency, now_ms},
};

use super::{
    EventLogger, format_line,
    tail::{TAIL_BLOCK_LEN, tail_lines},
};

/// Appends one formatted line per event to a text file.
///
/// Construction is the only step that fails loudly. After that, a write
/// failure switches the logger off instead of surfacing an error; when
/// `exceptions_to_stderr` is set the failure is also echoed to stderr.
///
/// `tail_last_n(n)` returns the last `n` non-empty lines of the file, in file
/// order, using its own read handle so it never waits on the writer.
pub struct TextfileEventLogger {
    path: PathBuf,
    exceptions_to_stderr: bool,
    active: AtomicBool,
    // None once shut down
    writer: Mutex<Option<BufWriter<File>>>,
    reader: Mutex<File>,
}

impl TextfileEventLogger {
    /// Opens `path` for appending, creating it if needed, and records
    /// "Logger started".
    ///
    /// # Errors
    ///
    /// Returns [`EventLoggerError`] if the file cannot be created, is not
    /// writable, or cannot be opened for reading.
    pub fn open(path: impl AsRef<Path>, exceptions_to_stderr: bool) -> Result<Self, EventLoggerError> {
        let path = path.as_ref().to_path_buf();

        let opened = Self::open_handles(&path);
        let (writer, reader) = match opened {
            Ok(handles) => handles,
            Err(err) => {
                if exceptions_to_stderr {
                    eprintln!("Error creating or opening event file for writing: {}", path.display());
                }
                tracing::warn!(path = %path.display(), error = %err, "event file unavailable");
                return Err(err);
            }
        };

        let logger = Self {
            path,
            exceptions_to_stderr,
            active: AtomicBool::new(true),
            writer: Mutex::new(Some(BufWriter::new(writer))),
            reader: Mutex::new(reader),
        };
        logger.add("Logger started");
        Ok(logger)
    }

    fn open_handles(path: &Path) -> Result<(File, File), EventLoggerError> {
        let open_err = |source| EventLoggerError::Open {
            path: path.to_path_buf(),
            source,
        };

        if path.exists() {
            let meta = path.metadata().map_err(open_err)?;
            if meta.permissions().readonly() {
                return Err(EventLoggerError::NotWritable {
                    path: path.to_path_buf(),
                });
            }
        }

        let writer = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .map_err(open_err)?;
        let reader = File::open(path).map_err(open_err)?;
        Ok((writer, reader))
    }

    /// Path of the event file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn report(&self, context: &str, err: &std::io::Error) {
        if self.exceptions_to_stderr {
            eprintln!("{context}: {err}");
        }
        tracing::warn!(path = %self.path.display(), error = %err, "{context}");
    }
}

fn write_line(writer: &mut BufWriter<File>, line: &str) -> std::io::Result<()> {
    writer.write_all(line.as_bytes())?;
    writer.write_all(b"\n")?;
    writer.flush()
}

impl EventLogger for TextfileEventLogger {
    fn add_with_address(&self, address: &str, message: &str) -> String {
        if !self.active.load(Ordering::Acquire) {
            return String::new();
        }

        let mut guard = self.writer.lock();
        let Some(writer) = guard.as_mut() else {
            return String::new();
        };

        let line = format_line(now_ms(), address, message);
        if let Err(err) = write_line(writer, &line) {
            self.active.store(false, Ordering::Release);
            self.report("Logger DEACTIVATED due to exception adding event to file", &err);
        }
        line
    }

    fn tail_last_n(&self, n: Recency) -> Vec<String> {
        let mut reader = self.reader.lock();
        let file_len = match reader.metadata() {
            Ok(meta) => meta.len(),
            Err(err) => {
                self.report("Exception reading file for tail", &err);
                return Vec::new();
            }
        };

        let (lines, err) = tail_lines(&mut *reader, file_len, n, TAIL_BLOCK_LEN);
        if let Some(err) = err {
            self.report("Exception reading file for tail", &err);
        }
        lines
    }

    fn enable(&self) {
        self.active.store(true, Ordering::Release);
    }

    fn disable(&self) {
        self.active.store(false, Ordering::Release);
    }

    fn is_active(&self) -> bool {
        self.active.load(Ordering::Acquire)
    }

    fn shutdown(&self) {
        self.add("Logger shutting down");
        let Some(mut writer) = self.writer.lock().take() else {
            return;
        };
        if let Err(err) = writer.flush().and_then(|()| writer.get_ref().sync_all()) {
            self.report("Exception closing writer", &err);
        }
    }
}
