use crate::{satellite::SatelliteId, time::UtcTimestamp};

/// A raw two-line element set, exactly as read from a provider or the cache.
///
/// Nothing about the contents has been checked yet.
#[derive(Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Debug)]
pub struct TleLines {
    pub line1: String,
    pub line2: String,
}

impl TleLines {
    pub fn new<L1: Into<String>, L2: Into<String>>(line1: L1, line2: L2) -> Self {
        Self {
            line1: line1.into(),
            line2: line2.into(),
        }
    }
}

/// A validated two-line element set.
/// https://en.wikipedia.org/wiki/Two-line_element_set
///
/// Built by the protocol parser once both checksums and the catalog numbers
/// have been verified; never mutated afterwards.
#[derive(Clone, PartialEq, Debug)]
pub struct Tle {
    pub satellite_id: SatelliteId,
    /// Reference instant of the elements, from line 1 columns 19-32
    pub epoch: UtcTimestamp,
    pub lines: TleLines,
}

impl Tle {
    pub fn line1(&self) -> &str {
        &self.lines.line1
    }

    pub fn line2(&self) -> &str {
        &self.lines.line2
    }
}
