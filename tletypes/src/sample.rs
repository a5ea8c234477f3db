use crate::time::UtcTimestamp;
use derive_more::Display;

/// Geodetic point on the WGS84 ellipsoid directly below a satellite
#[derive(Copy, Clone, PartialEq, PartialOrd, Debug, Default, Display)]
#[display(
    fmt = "{{lat: {}, lon: {}, alt: {}}}",
    "latitude",
    "longitude",
    "altitude"
)]
pub struct SubPoint {
    /// Geodetic latitude, [deg]
    pub latitude: f64,

    /// Longitude, [deg], in [-180, 180)
    pub longitude: f64,

    /// Height above the ellipsoid, [km]
    pub altitude: f64,
}

/// One record of a ground-track series
#[derive(Copy, Clone, PartialEq, Debug)]
pub struct CoordinateSample {
    pub timestamp: UtcTimestamp,
    pub latitude: f64,
    pub longitude: f64,
    pub altitude: Option<f64>,
}

impl CoordinateSample {
    pub fn new(timestamp: UtcTimestamp, sub_point: SubPoint) -> Self {
        Self {
            timestamp,
            latitude: sub_point.latitude,
            longitude: sub_point.longitude,
            altitude: Some(sub_point.altitude),
        }
    }
}
