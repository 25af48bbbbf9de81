//! Replays recorded positions from a text log
//!
//! Each line holds a timestamp and a position separated by spaces:
//!
//! ```text
//! 2009-08-24T22:25:01 -27.576082 153.092415 12.5
//! ```
//!
//! Lines that do not parse, or that describe an invalid position, are
//! skipped. An empty line or the end of input closes the source.

use log::{debug, warn};
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use super::{parse_timestamp, PositionSource};
use crate::tracking::entity::{PositionInfo, PositionSample};
use crate::Result;

/// Position source reading `<timestamp> <lat> <lon> <alt>` lines
#[derive(Debug)]
pub struct LogFilePositionSource<R> {
    reader: R,
    last_position: Option<PositionInfo>,
    closed: bool,
    line_number: usize,
}

impl LogFilePositionSource<BufReader<File>> {
    /// Opens a log file from disk
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = File::open(path.as_ref())?;
        debug!("replaying positions from {}", path.as_ref().display());
        Ok(Self::new(BufReader::new(file)))
    }
}

impl<R: BufRead> LogFilePositionSource<R> {
    pub fn new(reader: R) -> Self {
        LogFilePositionSource {
            reader,
            last_position: None,
            closed: false,
            line_number: 0,
        }
    }

    /// Whether the source has stopped producing positions
    pub fn is_closed(&self) -> bool {
        self.closed
    }

    fn close(&mut self) {
        if !self.closed {
            debug!("log source closed after {} lines", self.line_number);
        }
        self.closed = true;
    }
}

/// Splits a log line into a sample; `None` if any field is missing or
/// unparseable
fn parse_line(line: &str) -> Option<PositionSample> {
    let mut fields = line.split_whitespace();
    let timestamp = parse_timestamp(fields.next()?);
    let latitude = fields.next()?.parse::<f64>().ok()?;
    let longitude = fields.next()?.parse::<f64>().ok()?;
    let height = fields.next()?.parse::<f64>().ok()?;
    Some(PositionSample {
        latitude,
        longitude,
        height,
        timestamp,
    })
}

impl<R: BufRead> PositionSource for LogFilePositionSource<R> {
    fn next_position(&mut self) -> Option<PositionInfo> {
        let mut line = String::new();
        while !self.closed {
            line.clear();
            match self.reader.read_line(&mut line) {
                Ok(0) => self.close(),
                Ok(_) => {
                    self.line_number += 1;
                    let trimmed = line.trim();
                    if trimmed.is_empty() {
                        self.close();
                        continue;
                    }
                    let position = parse_line(trimmed).map(|sample| sample.validate());
                    match position {
                        Some(Ok(position)) => {
                            self.last_position = Some(position);
                            return Some(position);
                        }
                        Some(Err(err)) => {
                            warn!("skipping log line {}: {}", self.line_number, err);
                        }
                        None => {
                            warn!("skipping malformed log line {}: {:?}", self.line_number, trimmed);
                        }
                    }
                }
                Err(err) => {
                    warn!("error reading position log: {}", err);
                    self.close();
                }
            }
        }
        None
    }

    fn last_known_position(&self) -> Option<PositionInfo> {
        self.last_position
    }
}

impl<R: BufRead> Iterator for LogFilePositionSource<R> {
    type Item = PositionInfo;

    fn next(&mut self) -> Option<Self::Item> {
        self.next_position()
    }
}
