pub use crate::sample::{CoordinateSample, SubPoint};
pub use crate::satellite::SatelliteId;
pub use crate::time::{Day, TimeRange, TimeRangeError, UtcTimestamp};
pub use crate::tle::{Tle, TleLines};
