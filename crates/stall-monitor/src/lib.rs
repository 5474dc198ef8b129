//! CSV temperature monitor for buzz-stream
//!
//! Reads `time,temperature` rows from a CSV file and logs, for each row,
//! whether the temperature sits inside the stall (plateau) range.

mod monitor;

pub use monitor::{classify_reader, monitor, Classification, Config, StallRange, Summary};
