//! Line input that can be interrupted by a shutdown request.
//!
//! Blocking reads happen on a pump thread. The thread hands each line over a
//! rendezvous channel, so it never holds more than the one line it is trying
//! to deliver. `read_line` waits on the channel in short slices and gives up
//! as soon as the shutdown flag is raised.

use log::debug;

use std::{
    io::BufRead,
    sync::mpsc::{self, Receiver, RecvTimeoutError, SyncSender},
    thread,
    time::Duration,
};

use crate::error::{Error, Result};
use crate::shutdown::Shutdown;

pub const POLL_INTERVAL: Duration = Duration::from_millis(100);

#[derive(Debug, PartialEq, Eq)]
pub enum ReadOutcome {
    Line(Vec<u8>),
    EndOfStream,
    Cancelled,
}

enum Record {
    Line(Vec<u8>),
    EndOfStream,
    Failed(std::io::Error),
}

pub struct LineReader {
    records: Receiver<Record>,
    poll_interval: Duration,
    finished: bool,
}

impl LineReader {
    pub fn spawn<R>(input: R) -> Result<Self>
    where
        R: BufRead + Send + 'static,
    {
        let (sender, records) = mpsc::sync_channel(0);
        thread::Builder::new()
            .name("line-reader".into())
            .spawn(move || pump_lines(input, sender))
            .map_err(Error::Spawn)?;

        Ok(Self {
            records,
            poll_interval: POLL_INTERVAL,
            finished: false,
        })
    }

    pub fn with_poll_interval(mut self, poll_interval: Duration) -> Self {
        self.poll_interval = poll_interval;
        self
    }

    /// Next line without its terminator, or why there isn't one.
    pub fn read_line(&mut self, shutdown: &Shutdown) -> Result<ReadOutcome> {
        if self.finished {
            return Ok(ReadOutcome::EndOfStream);
        }

        loop {
            if shutdown.is_raised() {
                return Ok(ReadOutcome::Cancelled);
            }

            match self.records.recv_timeout(self.poll_interval) {
                Ok(Record::Line(line)) => return Ok(ReadOutcome::Line(line)),
                Ok(Record::EndOfStream) | Err(RecvTimeoutError::Disconnected) => {
                    self.finished = true;
                    return Ok(ReadOutcome::EndOfStream);
                }
                Ok(Record::Failed(e)) => {
                    self.finished = true;
                    return Err(Error::Read(e));
                }
                Err(RecvTimeoutError::Timeout) => continue,
            }
        }
    }
}

fn pump_lines<R: BufRead>(mut input: R, sender: SyncSender<Record>) {
    let mut buffer = Vec::new();

    loop {
        buffer.clear();
        let record = match input.read_until(b'\n', &mut buffer) {
            Ok(0) => Record::EndOfStream,
            Ok(bytes_read) => {
                debug!("read_until bytes_read = {}", bytes_read);
                Record::Line(strip_line_terminator(&buffer).to_vec())
            }
            Err(e) => Record::Failed(e),
        };

        let last = !matches!(record, Record::Line(_));
        if sender.send(record).is_err() || last {
            debug!("reader thread done");
            return;
        }
    }
}

fn strip_line_terminator(line: &[u8]) -> &[u8] {
    let line = line.strip_suffix(b"\n").unwrap_or(line);
    line.strip_suffix(b"\r").unwrap_or(line)
}
