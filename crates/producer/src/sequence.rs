//! Endless record cursor over a [`SourceKind`].

use crate::error::SourceError;
use crate::record::Record;
use crate::source::{load_records, SourceKind};
use std::collections::VecDeque;
use std::path::PathBuf;
use tracing::{debug, info};

/// Pull-based, never-ending sequence of records.
///
/// A file source is re-read from disk every time its records run out, so
/// edits to the file take effect at the next cycle boundary. A failed
/// re-read is returned as an error; the sequence never reports exhaustion.
#[derive(Debug)]
pub struct RecordSequence {
    state: State,
}

#[derive(Debug)]
enum State {
    Literal(Record),
    File {
        path: PathBuf,
        pending: VecDeque<Record>,
        cycles: u64,
    },
}

impl RecordSequence {
    pub fn new(source: SourceKind) -> Self {
        let state = match source {
            SourceKind::Literal(record) => {
                info!("Starting custom message generation.");
                State::Literal(record)
            }
            SourceKind::File(path) => State::File {
                path,
                pending: VecDeque::new(),
                cycles: 0,
            },
        };
        Self { state }
    }

    /// Produce the next record, reloading the file at a cycle boundary.
    pub fn next_record(&mut self) -> Result<Record, SourceError> {
        match &mut self.state {
            State::Literal(record) => {
                debug!("Generated custom message: {record}");
                Ok(record.clone())
            }
            State::File {
                path,
                pending,
                cycles,
            } => loop {
                if let Some(record) = pending.pop_front() {
                    debug!("Generated JSON from file: {record}");
                    return Ok(record);
                }
                // load_records rejects empty arrays, so this terminates.
                *pending = load_records(path)?.into();
                *cycles += 1;
                debug!("Starting pass {} over {}", cycles, path.display());
            },
        }
    }

    /// Number of times the data file has been loaded. Always zero for literals.
    pub fn cycles(&self) -> u64 {
        match &self.state {
            State::Literal(_) => 0,
            State::File { cycles, .. } => *cycles,
        }
    }
}
