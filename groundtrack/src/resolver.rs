//! Per-day TLE resolution: cache first, then the remote source, then
//! validation and selection of a single element set for the day.

use crate::{
    cache::TleCache,
    source::{RemoteError, TleSource},
};
use chrono::{Duration, NaiveTime};
use serde::Deserialize;
use std::sync::Arc;
use tleprotocol::parse_tle;
use tletypes::prelude::*;
use tracing::{debug, warn};

/// How a single element set is chosen among the valid ones whose epochs
/// fall within the day
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SelectionPolicy {
    /// Epoch closest to the start of the day, ties go to the earlier epoch
    #[default]
    ClosestToStartOfDay,
    /// Latest epoch before the next day begins
    MostRecent,
}

impl SelectionPolicy {
    /// Index of the chosen candidate. Ties resolve to the first one given.
    pub fn select(self, day: Day, candidates: &[Tle]) -> Option<usize> {
        let start = day.and_time(NaiveTime::MIN).and_utc();
        let closest = || {
            candidates
                .iter()
                .enumerate()
                .min_by_key(|(_, t)| ((t.epoch - start).abs(), t.epoch))
                .map(|(idx, _)| idx)
        };

        match self {
            SelectionPolicy::ClosestToStartOfDay => closest(),
            SelectionPolicy::MostRecent => {
                let end = start + Duration::days(1);
                let mut best: Option<(usize, UtcTimestamp)> = None;
                for (idx, t) in candidates.iter().enumerate() {
                    if t.epoch >= end {
                        continue;
                    }
                    if best.map_or(true, |(_, e)| t.epoch > e) {
                        best = Some((idx, t.epoch));
                    }
                }
                best.map(|(idx, _)| idx).or_else(closest)
            }
        }
    }
}

/// Why no element set could be resolved for a day
#[derive(Clone, Debug, thiserror::Error)]
pub enum Unavailable {
    #[error("The TLE source failed: {0}")]
    Remote(Arc<RemoteError>),
    #[error("The TLE source has no element sets for the day")]
    NoData,
    #[error("None of the {rejected} element sets returned passed validation")]
    NoValidTle { rejected: usize },
}

/// Resolves the TLE in effect for a satellite on a given UTC day
pub trait TleProvider {
    fn resolve(&mut self, satellite_id: SatelliteId, day: Day) -> Result<Tle, Unavailable>;
}

impl<T: TleProvider + ?Sized> TleProvider for &mut T {
    fn resolve(&mut self, satellite_id: SatelliteId, day: Day) -> Result<Tle, Unavailable> {
        (**self).resolve(satellite_id, day)
    }
}

#[derive(Debug)]
pub struct TleResolver<S> {
    cache: TleCache,
    source: S,
    policy: SelectionPolicy,
}

impl<S: TleSource> TleResolver<S> {
    pub fn new(cache: TleCache, source: S, policy: SelectionPolicy) -> Self {
        Self {
            cache,
            source,
            policy,
        }
    }

    pub fn cache(&self) -> &TleCache {
        &self.cache
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    pub fn into_source(self) -> S {
        self.source
    }

    /// A valid cached element set for the day, if any
    fn cached(&self, satellite_id: SatelliteId, day: Day) -> Option<Tle> {
        let lines = match self.cache.get(satellite_id, day) {
            Ok(Some(lines)) => lines,
            Ok(None) => return None,
            Err(e) => {
                warn!(%satellite_id, %day, error = %e, "Failed to read the TLE cache");
                return None;
            }
        };

        match parse_tle(&lines) {
            Ok(tle) if tle.satellite_id == satellite_id => {
                debug!(%satellite_id, %day, epoch = %tle.epoch, "TLE cache hit");
                Some(tle)
            }
            Ok(tle) => {
                warn!(
                    %satellite_id,
                    %day,
                    cached_id = %tle.satellite_id,
                    "Cached TLE belongs to another satellite, ignoring it"
                );
                None
            }
            Err(e) => {
                warn!(%satellite_id, %day, error = %e, "Cached TLE is invalid, ignoring it");
                None
            }
        }
    }
}

impl<S: TleSource> TleProvider for TleResolver<S> {
    fn resolve(&mut self, satellite_id: SatelliteId, day: Day) -> Result<Tle, Unavailable> {
        if let Some(tle) = self.cached(satellite_id, day) {
            return Ok(tle);
        }

        let raw = self.source.query(satellite_id, day, day).map_err(|e| {
            warn!(%satellite_id, %day, error = %e, "TLE query failed");
            Unavailable::Remote(Arc::new(e))
        })?;
        if raw.is_empty() {
            warn!(%satellite_id, %day, "No TLE published for the day");
            return Err(Unavailable::NoData);
        }

        let total = raw.len();
        let candidates: Vec<Tle> = raw
            .iter()
            .filter_map(|lines| match parse_tle(lines) {
                Ok(tle) if tle.satellite_id == satellite_id => Some(tle),
                Ok(tle) => {
                    debug!(%satellite_id, returned_id = %tle.satellite_id, "Discarding TLE of another satellite");
                    None
                }
                Err(e) => {
                    debug!(%satellite_id, %day, error = %e, "Discarding invalid TLE");
                    None
                }
            })
            .collect();

        let Some(idx) = self.policy.select(day, &candidates) else {
            warn!(%satellite_id, %day, rejected = total, "No valid TLE for the day");
            return Err(Unavailable::NoValidTle { rejected: total });
        };
        let tle = candidates[idx].clone();

        if let Err(e) = self.cache.put(satellite_id, day, &tle) {
            warn!(%satellite_id, %day, error = %e, "Failed to write the TLE cache");
        }
        Ok(tle)
    }
}

/// The same pre-validated element set for every day
#[derive(Clone, Debug)]
pub struct FixedTle(pub Tle);

impl TleProvider for FixedTle {
    fn resolve(&mut self, satellite_id: SatelliteId, _day: Day) -> Result<Tle, Unavailable> {
        if satellite_id == self.0.satellite_id {
            Ok(self.0.clone())
        } else {
            Err(Unavailable::NoData)
        }
    }
}
