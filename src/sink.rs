use log::debug;

use std::{
    fs::{File, OpenOptions},
    io::Write,
    path::{Path, PathBuf},
};

use crate::error::{Error, Result};
use crate::rotation::LogFileDescriptor;

const LINE_TERMINATOR: &[u8] = b"\r\n";

/// The one open log file. Closing consumes the sink, so a closed sink can't be
/// written to and a rotation never has two files open at once.
#[derive(Debug)]
pub struct OutputSink {
    path: PathBuf,
    file: File,
    bytes_written: u64,
}

impl OutputSink {
    /// Create the directory tree and open the file for appending.
    pub fn open(descriptor: &LogFileDescriptor) -> Result<Self> {
        let directory_path = descriptor.directory_path();
        std::fs::create_dir_all(directory_path).map_err(|source| Error::CreateDir {
            path: directory_path.to_path_buf(),
            source,
        })?;

        let path = descriptor.path();
        let file = open_output_file_append(&path)?;
        debug!("opened output file {}", path.display());

        Ok(Self {
            path,
            file,
            bytes_written: 0,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn bytes_written(&self) -> u64 {
        self.bytes_written
    }

    /// Write `text` followed by CRLF as a single write.
    pub fn append(&mut self, text: &[u8]) -> Result<()> {
        let mut record = Vec::with_capacity(text.len() + LINE_TERMINATOR.len());
        record.extend_from_slice(text);
        record.extend_from_slice(LINE_TERMINATOR);

        self.file
            .write_all(&record)
            .map_err(|source| Error::Write {
                path: self.path.clone(),
                source,
            })?;
        self.bytes_written += record.len() as u64;
        Ok(())
    }

    /// Close this sink, then open one for `descriptor`.
    pub fn rotate(self, descriptor: &LogFileDescriptor) -> Result<Self> {
        debug!(
            "rotate from {} to {}",
            self.path.display(),
            descriptor.path().display()
        );
        self.shutdown()?;
        Self::open(descriptor)
    }

    /// Flush to disk and close.
    pub fn shutdown(mut self) -> Result<()> {
        self.file.flush().map_err(|source| Error::Write {
            path: self.path.clone(),
            source,
        })?;
        self.file.sync_all().map_err(|source| Error::Sync {
            path: self.path.clone(),
            source,
        })?;
        debug!(
            "closed output file {} bytes_written = {}",
            self.path.display(),
            self.bytes_written
        );
        Ok(())
    }
}

fn open_output_file_append(path: &Path) -> Result<File> {
    OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map_err(|source| Error::Open {
            path: path.to_path_buf(),
            source,
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::rotation::compute_path;
    use chrono::{TimeZone, Utc};
    use tempfile::TempDir;

    fn descriptor(dir: &TempDir, month: u32, by_year: bool) -> LogFileDescriptor {
        let config = Config {
            log_dir: dir.path().to_string_lossy().into_owned(),
            log_name: "svc".into(),
            separate_by_year: by_year,
        };
        compute_path(&config, &Utc.with_ymd_and_hms(2024, month, 10, 0, 0, 0).unwrap())
    }

    #[test]
    fn test_open_creates_missing_directories() {
        let dir = TempDir::new().unwrap();
        let descriptor = descriptor(&dir, 3, true);

        let sink = OutputSink::open(&descriptor).unwrap();
        assert!(dir.path().join("2024").is_dir());
        assert!(sink.path().exists());
        sink.shutdown().unwrap();
    }

    #[test]
    fn test_append_terminates_with_crlf() {
        let dir = TempDir::new().unwrap();
        let descriptor = descriptor(&dir, 3, false);

        let mut sink = OutputSink::open(&descriptor).unwrap();
        sink.append(b"first").unwrap();
        sink.append(b"second line").unwrap();
        assert_eq!(sink.bytes_written(), 20);
        sink.shutdown().unwrap();

        let contents = std::fs::read(descriptor.path()).unwrap();
        assert_eq!(contents, b"first\r\nsecond line\r\n");
    }

    #[test]
    fn test_reopen_appends_without_truncating() {
        let dir = TempDir::new().unwrap();
        let descriptor = descriptor(&dir, 3, false);

        let mut sink = OutputSink::open(&descriptor).unwrap();
        for line in ["one", "two", "three"] {
            sink.append(line.as_bytes()).unwrap();
        }
        sink.shutdown().unwrap();

        let mut sink = OutputSink::open(&descriptor).unwrap();
        for line in ["four", "five"] {
            sink.append(line.as_bytes()).unwrap();
        }
        sink.shutdown().unwrap();

        let contents = std::fs::read_to_string(descriptor.path()).unwrap();
        let lines: Vec<&str> = contents.split_terminator("\r\n").collect();
        assert_eq!(lines, ["one", "two", "three", "four", "five"]);
    }

    #[test]
    fn test_rotate_switches_files() {
        let dir = TempDir::new().unwrap();
        let march = descriptor(&dir, 3, false);
        let april = descriptor(&dir, 4, false);

        let mut sink = OutputSink::open(&march).unwrap();
        sink.append(b"march").unwrap();
        let mut sink = sink.rotate(&april).unwrap();
        sink.append(b"april").unwrap();
        assert_eq!(sink.path(), april.path());
        sink.shutdown().unwrap();

        assert_eq!(std::fs::read(march.path()).unwrap(), b"march\r\n");
        assert_eq!(std::fs::read(april.path()).unwrap(), b"april\r\n");
    }

    #[test]
    fn test_open_fails_when_directory_is_a_file() {
        let dir = TempDir::new().unwrap();
        let blocker = dir.path().join("blocked");
        std::fs::write(&blocker, b"").unwrap();
        let config = Config {
            log_dir: blocker.to_string_lossy().into_owned(),
            log_name: "svc".into(),
            separate_by_year: true,
        };
        let descriptor = compute_path(&config, &Utc::now());

        let err = OutputSink::open(&descriptor).unwrap_err();
        assert!(matches!(err, Error::CreateDir { .. }));
    }
}
