use derive_more::{Display, From, Into};
use std::str::FromStr;

/// NORAD satellite catalog number
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Debug, Display, From, Into)]
#[display(fmt = "{}", "_0")]
pub struct SatelliteId(u32);

impl SatelliteId {
    pub const fn new(catalog_number: u32) -> Self {
        SatelliteId(catalog_number)
    }

    pub const fn catalog_number(self) -> u32 {
        self.0
    }
}

impl FromStr for SatelliteId {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim().parse::<u32>().map(SatelliteId)
    }
}
