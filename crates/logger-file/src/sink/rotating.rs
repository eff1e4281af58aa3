//! Size-based rotating file sink.

use std::fs::{self, File, OpenOptions};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::thread;
use std::time::Duration;

use parking_lot::Mutex;
use proven_logger::Record;
use tracing::{debug, warn};

use super::LogSink;
use crate::error::{Error, Result};
use crate::formatter::PatternFormatter;
use crate::naming::rotated_file_name;

/// Pause before the single retry of a failed rename.
const RENAME_RETRY_DELAY: Duration = Duration::from_millis(100);

/// Writes lines to a file, rotating it once it would grow past `max_size`.
///
/// On rotation `app.log` becomes `app.1.log`, `app.1.log` becomes
/// `app.2.log` and so on; the segment that would exceed `max_files` is
/// deleted. Each line is written under a lock, so lines from concurrent
/// callers never interleave.
pub struct RotatingFileSink {
    path: PathBuf,
    max_size: u64,
    max_files: usize,
    formatter: PatternFormatter,
    state: Mutex<FileState>,
}

struct FileState {
    /// `None` after a failed reopen; the next write tries again
    writer: Option<BufWriter<File>>,
    current_size: u64,
    line: String,
}

impl RotatingFileSink {
    /// Opens `path` for appending, creating missing parent directories.
    ///
    /// # Errors
    ///
    /// Fails if `max_size` is zero, or if the directory or file cannot be
    /// created.
    pub fn new(path: impl Into<PathBuf>, max_size: u64, max_files: usize) -> Result<Self> {
        let path = path.into();
        if max_size == 0 {
            return Err(Error::Configuration(
                "maximum log file size cannot be zero".to_string(),
            ));
        }

        if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|source| Error::CreateDirectory {
                path: parent.to_path_buf(),
                source,
            })?;
        }

        let file = open_append(&path).map_err(|source| Error::OpenFile {
            path: path.clone(),
            source,
        })?;
        let current_size = file.metadata().map_or(0, |metadata| metadata.len());

        Ok(Self {
            path,
            max_size,
            max_files,
            formatter: PatternFormatter,
            state: Mutex::new(FileState {
                writer: Some(BufWriter::new(file)),
                current_size,
                line: String::new(),
            }),
        })
    }

    /// Active file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Formats and writes one record.
    ///
    /// # Errors
    ///
    /// Returns an error if rotation or the write itself failed.
    pub fn write_record(&self, record: &Record<'_>) -> Result<()> {
        let mut guard = self.state.lock();
        let state = &mut *guard;
        self.ensure_open(state)?;

        state.line.clear();
        self.formatter.format(record, &mut state.line);
        let line_len = state.line.len() as u64;

        let mut new_size = state.current_size + line_len;
        if new_size > self.max_size {
            if let Some(writer) = state.writer.as_mut() {
                writer.flush()?;
            }
            if state.current_size > 0 {
                self.rotate(state)?;
                new_size = line_len;
            }
        }

        if let Some(writer) = state.writer.as_mut() {
            writer.write_all(state.line.as_bytes())?;
        }
        state.current_size = new_size;
        Ok(())
    }

    fn ensure_open(&self, state: &mut FileState) -> Result<()> {
        if state.writer.is_some() {
            return Ok(());
        }
        let file = open_append(&self.path).map_err(|source| Error::OpenFile {
            path: self.path.clone(),
            source,
        })?;
        state.current_size = file.metadata().map_or(0, |metadata| metadata.len());
        state.writer = Some(BufWriter::new(file));
        Ok(())
    }

    /// Shifts every segment one index up and starts an empty active file.
    ///
    /// The active file is truncated even when a rename fails.
    fn rotate(&self, state: &mut FileState) -> Result<()> {
        // Windows refuses to rename open files
        drop(state.writer.take());

        if let Err(e) = self.shift_segments() {
            warn!(path = %self.path.display(), error = %e, "failed to rotate log file");
        }

        let file = File::create(&self.path).map_err(|source| Error::OpenFile {
            path: self.path.clone(),
            source,
        })?;
        state.writer = Some(BufWriter::new(file));
        state.current_size = 0;
        Ok(())
    }

    fn shift_segments(&self) -> Result<()> {
        for index in (1..=self.max_files).rev() {
            let from = rotated_file_name(&self.path, index - 1);
            if !from.exists() {
                continue;
            }
            let to = rotated_file_name(&self.path, index);
            remove_if_exists(&to);

            if fs::rename(&from, &to).is_err() {
                thread::sleep(RENAME_RETRY_DELAY);
                remove_if_exists(&to);
                fs::rename(&from, &to).map_err(|source| Error::Rotation { from, to, source })?;
            }
        }
        Ok(())
    }
}

impl LogSink for RotatingFileSink {
    fn append(&self, record: Record<'_>) -> Result<()> {
        self.write_record(&record)
    }

    fn flush(&self) -> Result<()> {
        if let Some(writer) = self.state.lock().writer.as_mut() {
            writer.flush()?;
        }
        Ok(())
    }
}

fn open_append(path: &Path) -> io::Result<File> {
    OpenOptions::new().create(true).append(true).open(path)
}

fn remove_if_exists(path: &Path) {
    match fs::remove_file(path) {
        Ok(()) => {}
        Err(e) if e.kind() == io::ErrorKind::NotFound => {}
        Err(e) => {
            debug!(path = %path.display(), error = %e, "could not remove old log segment");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use proven_logger::Level;
    use tempfile::tempdir;

    fn write_lines(sink: &RotatingFileSink, count: usize) {
        for i in 0..count {
            sink.write_record(&Record::new(Level::Info, format!("line {i:04}")))
                .unwrap();
        }
    }

    #[test]
    fn test_appends_and_flushes() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("app.log");
        let sink = RotatingFileSink::new(&path, 1024 * 1024, 3).unwrap();

        write_lines(&sink, 3);
        LogSink::flush(&sink).unwrap();

        let content = fs::read_to_string(&path).unwrap();
        assert_eq!(content.lines().count(), 3);
        assert!(content.lines().next().unwrap().ends_with("[info ] - line 0000"));
    }

    #[test]
    fn test_creates_parent_directories() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("deeper").join("app.log");

        let sink = RotatingFileSink::new(&path, 1024, 1).unwrap();

        assert!(path.exists());
        assert_eq!(sink.path(), path);
    }

    #[test]
    fn test_rotation_keeps_bounded_history() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("app.log");
        // Each line is 49 bytes, four fit in a segment
        let sink = RotatingFileSink::new(&path, 200, 2).unwrap();

        write_lines(&sink, 50);
        LogSink::flush(&sink).unwrap();

        assert!(path.exists());
        assert!(dir.path().join("app.1.log").exists());
        assert!(dir.path().join("app.2.log").exists());
        assert!(!dir.path().join("app.3.log").exists());

        for name in ["app.log", "app.1.log", "app.2.log"] {
            let len = fs::metadata(dir.path().join(name)).unwrap().len();
            assert!(len <= 200, "{name} is {len} bytes");
        }

        // Newest lines are in the active file, older ones in .1
        let active = fs::read_to_string(&path).unwrap();
        let previous = fs::read_to_string(dir.path().join("app.1.log")).unwrap();
        assert!(active.contains("line 0049"));
        assert!(!previous.contains("line 0049"));
    }

    #[test]
    fn test_zero_history_truncates_in_place() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("app.log");
        let sink = RotatingFileSink::new(&path, 200, 0).unwrap();

        write_lines(&sink, 20);
        LogSink::flush(&sink).unwrap();

        assert!(!dir.path().join("app.1.log").exists());
        assert!(fs::metadata(&path).unwrap().len() <= 200);
    }

    #[test]
    fn test_reopen_counts_existing_size() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("app.log");
        fs::write(&path, "x".repeat(190)).unwrap();

        let sink = RotatingFileSink::new(&path, 200, 1).unwrap();
        write_lines(&sink, 1);
        LogSink::flush(&sink).unwrap();

        // The existing 190 bytes pushed the first line into a new segment
        assert_eq!(
            fs::read_to_string(dir.path().join("app.1.log")).unwrap(),
            "x".repeat(190)
        );
        assert!(fs::read_to_string(&path).unwrap().contains("line 0000"));
    }

    #[test]
    fn test_oversized_line_goes_into_empty_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("app.log");
        let sink = RotatingFileSink::new(&path, 10, 1).unwrap();

        write_lines(&sink, 1);
        LogSink::flush(&sink).unwrap();

        assert!(!dir.path().join("app.1.log").exists());
        assert!(fs::read_to_string(&path).unwrap().contains("line 0000"));
    }

    #[test]
    fn test_zero_size_is_rejected() {
        let dir = tempdir().unwrap();
        let result = RotatingFileSink::new(dir.path().join("app.log"), 0, 1);

        assert!(matches!(result, Err(Error::Configuration(_))));
    }

    #[test]
    fn test_unusable_directory_is_reported() {
        let dir = tempdir().unwrap();
        let blocker = dir.path().join("blocker");
        fs::write(&blocker, "not a directory").unwrap();

        let result = RotatingFileSink::new(blocker.join("app.log"), 1024, 1);

        assert!(matches!(result, Err(Error::CreateDirectory { .. })));
    }
}
