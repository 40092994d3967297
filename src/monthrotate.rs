use log::{debug, info};

use std::path::PathBuf;

use chrono::{DateTime, Local, TimeZone};

use crate::config::Config;
use crate::error::Result;
use crate::reader::{LineReader, ReadOutcome};
use crate::rotation::{compute_path, compute_window, is_expired, RotationWindow};
use crate::shutdown::Shutdown;
use crate::sink::OutputSink;

pub trait Clock {
    type Tz: TimeZone;

    fn now(&self) -> DateTime<Self::Tz>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    type Tz = Local;

    fn now(&self) -> DateTime<Local> {
        Local::now()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Running,
    Stopping,
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct RunSummary {
    pub lines_written: u64,
    pub empty_lines_skipped: u64,
    pub rotations: u64,
    pub final_path: PathBuf,
}

pub struct MonthRotate<C: Clock> {
    config: Config,
    clock: C,
}

impl MonthRotate<SystemClock> {
    pub fn new(config: Config) -> Self {
        Self::with_clock(config, SystemClock)
    }
}

impl<C: Clock> MonthRotate<C> {
    pub fn with_clock(config: Config, clock: C) -> Self {
        debug!("config = {:?}", config);
        Self { config, clock }
    }

    /// Copy lines from `reader` into the current month's file until input ends
    /// or `shutdown` is raised. I/O failures are returned immediately.
    pub fn run(&self, reader: &mut LineReader, shutdown: &Shutdown) -> Result<RunSummary> {
        let now = self.clock.now();
        let mut window = compute_window(&now)?;
        let mut sink = OutputSink::open(&compute_path(&self.config, &now))?;
        let mut summary = RunSummary::default();
        let mut state = State::Running;

        while state == State::Running {
            if shutdown.is_raised() {
                state = State::Stopping;
                continue;
            }

            let line = match reader.read_line(shutdown)? {
                ReadOutcome::Line(line) => line,
                ReadOutcome::EndOfStream => {
                    println!("Nothing to read from stdin");
                    shutdown.raise();
                    continue;
                }
                ReadOutcome::Cancelled => continue,
            };

            let now = self.clock.now();
            if is_expired(&window, &now) {
                sink = sink.rotate(&compute_path(&self.config, &now))?;
                window = self.next_window(&now)?;
                summary.rotations += 1;
            }

            if line.is_empty() {
                summary.empty_lines_skipped += 1;
                continue;
            }
            sink.append(&line)?;
            summary.lines_written += 1;
        }

        summary.final_path = sink.path().to_path_buf();
        sink.shutdown()?;
        info!("stopped summary = {:?}", summary);
        Ok(summary)
    }

    fn next_window(&self, now: &DateTime<C::Tz>) -> Result<RotationWindow> {
        let window = compute_window(now)?;
        info!(
            "rotated log file, next rotation after unix time {}",
            window.expires_at_unix_seconds()
        );
        Ok(window)
    }
}
