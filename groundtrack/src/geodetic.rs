//! TEME -> Earth-fixed -> WGS84 geodetic conversions

use crate::na::{Rotation3, Vector3};
use nav_types::{ECEF, WGS84};
use std::f64::consts::TAU;
use tletypes::prelude::*;

const METERS_PER_KM: f64 = 1000.0;

/// Greenwich mean sidereal time (IAU 1982), [rad] in [0, 2pi)
pub fn gmst(instant: &UtcTimestamp) -> f64 {
    sgp4::iau_epoch_to_sidereal_time(sgp4::julian_years_since_j2000(&instant.naive_utc()))
        .rem_euclid(TAU)
}

/// Rotate a TEME position into the Earth-fixed frame
pub fn teme_to_ecef(position: &Vector3<f64>, instant: &UtcTimestamp) -> Vector3<f64> {
    Rotation3::from_axis_angle(&Vector3::z_axis(), -gmst(instant)) * position
}

/// Earth-fixed position [km] to geodetic latitude/longitude [deg] and
/// height above the ellipsoid [km]
pub fn ecef_to_geodetic(position: &Vector3<f64>) -> SubPoint {
    let ecef = ECEF::new(
        position.x * METERS_PER_KM,
        position.y * METERS_PER_KM,
        position.z * METERS_PER_KM,
    );
    let wgs = WGS84::from(ecef);
    SubPoint {
        latitude: wgs.latitude_degrees(),
        longitude: wrap_longitude(wgs.longitude_degrees()),
        altitude: wgs.altitude() / METERS_PER_KM,
    }
}

/// Wrap to [-180, 180)
pub fn wrap_longitude(degrees: f64) -> f64 {
    (degrees + 180.0).rem_euclid(360.0) - 180.0
}
