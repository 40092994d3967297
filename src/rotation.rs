//! Monthly rotation window and log file naming.
//!
//! A window stays valid until 23:59:59 local time on the last day of the
//! month it was computed in. The file name and directory are derived from the
//! same instant, so a new window always comes with a new descriptor.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Datelike, Months, NaiveTime, Offset, TimeZone};
use log::debug;

use crate::config::Config;
use crate::error::{Error, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RotationWindow {
    expires_at_unix_seconds: i64,
}

impl RotationWindow {
    pub fn expires_at_unix_seconds(&self) -> i64 {
        self.expires_at_unix_seconds
    }

    pub fn is_expired<Tz: TimeZone>(&self, now: &DateTime<Tz>) -> bool {
        now.timestamp() > self.expires_at_unix_seconds
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogFileDescriptor {
    directory_path: PathBuf,
    file_name: String,
}

impl LogFileDescriptor {
    pub fn directory_path(&self) -> &Path {
        &self.directory_path
    }

    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    pub fn path(&self) -> PathBuf {
        self.directory_path.join(&self.file_name)
    }
}

/// Window ending at 23:59:59 on the last calendar day of `now`'s month.
pub fn compute_window<Tz: TimeZone>(now: &DateTime<Tz>) -> Result<RotationWindow> {
    let (year, month) = (now.year(), now.month());
    let out_of_range = || Error::DateOutOfRange { year, month };

    // Day before the first of next month is the last day of this one.
    let last_day = now
        .date_naive()
        .with_day(1)
        .and_then(|first| first.checked_add_months(Months::new(1)))
        .and_then(|next_first| next_first.pred_opt())
        .ok_or_else(out_of_range)?;
    let end_of_day = NaiveTime::from_hms_opt(23, 59, 59).ok_or_else(out_of_range)?;
    let local_end = last_day.and_time(end_of_day);

    let expires_at_unix_seconds = match now.timezone().from_local_datetime(&local_end).latest() {
        Some(end) => end.timestamp(),
        // Local time skipped by a DST jump; use the offset in effect now.
        None => {
            let offset = now.offset().fix().local_minus_utc();
            local_end.and_utc().timestamp() - i64::from(offset)
        }
    };

    let window = RotationWindow {
        expires_at_unix_seconds,
    };
    debug!("computed rotation window for {}-{:02}: {:?}", year, month, window);
    Ok(window)
}

pub fn is_expired<Tz: TimeZone>(window: &RotationWindow, now: &DateTime<Tz>) -> bool {
    window.is_expired(now)
}

/// `<logDir>/[<YYYY>/]<logName>-<YYYY>-<MM>.log` for `now`.
pub fn compute_path<Tz: TimeZone>(config: &Config, now: &DateTime<Tz>) -> LogFileDescriptor {
    let year = format!("{:04}", now.year());
    let month = format!("{:02}", now.month());

    let mut directory_path = config.base_dir();
    if config.separate_by_year {
        directory_path.push(&year);
    }
    let file_name = format!("{}-{}-{}.log", config.log_name, year, month);

    LogFileDescriptor {
        directory_path,
        file_name,
    }
}
