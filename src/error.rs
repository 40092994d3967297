use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("No data being piped in from stdin")]
    NotPiped,

    #[error("failed to create log directory {path}: {source}")]
    CreateDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to open log file {path}: {source}")]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to write to log file {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to sync log file {path}: {source}")]
    Sync {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to read from stdin: {0}")]
    Read(#[source] std::io::Error),

    #[error("failed to start stdin reader thread: {0}")]
    Spawn(#[source] std::io::Error),

    #[error("failed to register signal handler: {0}")]
    Signal(#[source] std::io::Error),

    #[error("end of month {year}-{month:02} is out of range")]
    DateOutOfRange { year: i32, month: u32 },
}

impl Error {
    /// Process exit status for this error.
    pub fn exit_code(&self) -> u8 {
        match self {
            Error::NotPiped => 1,
            _ => 2,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
