//! Text formats around two-line element sets: the per-line checksum, the
//! fixed-column TLE layout, and the ground-track record lines.

pub use crate::checksum::{checksum, validate, validate_pair};
pub use crate::error::{FormatError, LineNumber};
pub use crate::parser::{parse_epoch, parse_tle, parse_tle_set, ParseError};
pub use crate::record::{
    format_record, parse_coordinate_record, parse_coordinate_records, RecordFormat,
};

pub mod checksum;
pub mod error;
pub mod parser;
pub mod record;

/// Length of every line of a well-formed TLE, checksum digit included
pub const TLE_LINE_LEN: usize = 69;
pub const TIMESTAMP_UTC_FORMAT: &str = "%Y-%m-%d %H:%M:%S";
pub const RECORD_DELIMETER: &str = "\n";
