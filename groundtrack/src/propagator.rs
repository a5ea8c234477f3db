//! SGP4 propagation of a validated element set to a geodetic sub-point

use crate::{
    geodetic::{ecef_to_geodetic, teme_to_ecef},
    na::Vector3,
};
use tletypes::prelude::*;

#[derive(Clone, Debug, PartialEq, thiserror::Error)]
pub enum PropagationFailure {
    #[error("The element set was rejected by SGP4: {0}")]
    Elements(String),
    #[error("SGP4 failed: {0}")]
    Sgp4(String),
    #[error("SGP4 produced a non-finite position")]
    NonFinite,
}

#[derive(Clone, Debug, PartialEq, thiserror::Error)]
#[error("Failed to propagate satellite {satellite_id} (TLE epoch {epoch}) to {instant}")]
pub struct PropagationError {
    pub satellite_id: SatelliteId,
    pub epoch: UtcTimestamp,
    pub instant: UtcTimestamp,
    #[source]
    pub failure: PropagationFailure,
}

/// SGP4 state for one element set, built once and reused for every instant
pub struct Propagator {
    satellite_id: SatelliteId,
    epoch: UtcTimestamp,
    constants: sgp4::Constants,
}

impl Propagator {
    pub fn new(tle: &Tle) -> Result<Self, PropagationError> {
        let err = |failure| PropagationError {
            satellite_id: tle.satellite_id,
            epoch: tle.epoch,
            instant: tle.epoch,
            failure,
        };

        let elements =
            sgp4::Elements::from_tle(None, tle.line1().as_bytes(), tle.line2().as_bytes())
                .map_err(|e| err(PropagationFailure::Elements(format!("{e:?}"))))?;
        let constants = sgp4::Constants::from_elements(&elements)
            .map_err(|e| err(PropagationFailure::Elements(format!("{e:?}"))))?;

        Ok(Self {
            satellite_id: tle.satellite_id,
            epoch: elements.datetime.and_utc(),
            constants,
        })
    }

    pub fn satellite_id(&self) -> SatelliteId {
        self.satellite_id
    }

    pub fn epoch(&self) -> UtcTimestamp {
        self.epoch
    }

    pub fn sub_point(&self, instant: UtcTimestamp) -> Result<SubPoint, PropagationError> {
        let err = |failure| PropagationError {
            satellite_id: self.satellite_id,
            epoch: self.epoch,
            instant,
            failure,
        };

        let since_epoch = instant - self.epoch;
        let minutes = match since_epoch.num_microseconds() {
            Some(us) => us as f64 / 60e6,
            None => since_epoch.num_milliseconds() as f64 / 60e3,
        };

        let prediction = self
            .constants
            .propagate(sgp4::MinutesSinceEpoch(minutes))
            .map_err(|e| err(PropagationFailure::Sgp4(format!("{e:?}"))))?;

        let teme = Vector3::from(prediction.position);
        if !teme.iter().all(|c| c.is_finite()) {
            return Err(err(PropagationFailure::NonFinite));
        }

        let sub_point = ecef_to_geodetic(&teme_to_ecef(&teme, &instant));
        if !(sub_point.latitude.is_finite()
            && sub_point.longitude.is_finite()
            && sub_point.altitude.is_finite())
        {
            return Err(err(PropagationFailure::NonFinite));
        }
        Ok(sub_point)
    }
}

/// Propagate `tle` to `instant`
pub fn propagate(tle: &Tle, instant: UtcTimestamp) -> Result<SubPoint, PropagationError> {
    Propagator::new(tle).and_then(|p| {
        p.sub_point(instant).map_err(|e| PropagationError {
            epoch: tle.epoch,
            ..e
        })
    })
}
