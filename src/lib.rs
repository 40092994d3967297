//! Copy lines piped on stdin into log files that rotate at the end of each
//! calendar month.

pub mod config;
pub mod error;
pub mod monthrotate;
pub mod reader;
pub mod rotation;
pub mod shutdown;
pub mod sink;

pub use config::Config;
pub use error::{Error, Result};
pub use monthrotate::{Clock, MonthRotate, RunSummary, SystemClock};
