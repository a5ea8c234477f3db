//! Time-stepped ground-track generation

use crate::{
    interruptor::Interruptor,
    propagator::Propagator,
    resolver::{TleProvider, Unavailable},
    sink::CoordinateSink,
};
use std::{collections::BTreeMap, io};
use tletypes::prelude::*;
use tracing::{debug, info, warn};

#[derive(Debug, thiserror::Error)]
pub enum GenerateError {
    #[error("Failed to write to the coordinate sink")]
    Sink(#[from] io::Error),
}

/// What a generation run did
#[derive(Clone, Debug, Default)]
pub struct GenerationReport {
    pub written: usize,
    /// Samples whose day had no usable TLE
    pub skipped_unavailable: usize,
    /// Samples SGP4 could not produce
    pub skipped_propagation: usize,
    pub unavailable_days: Vec<(Day, Unavailable)>,
    /// The run was interrupted before reaching the end of the range
    pub cancelled: bool,
}

impl GenerationReport {
    pub fn skipped(&self) -> usize {
        self.skipped_unavailable + self.skipped_propagation
    }
}

/// Resolution outcome of a day, computed once per run
enum DayState {
    Ready(Propagator),
    Unavailable,
    /// SGP4 refused the day's element set
    Rejected,
}

pub struct Generator<P> {
    provider: P,
    interruptor: Option<Interruptor>,
}

impl<P: TleProvider> Generator<P> {
    pub fn new(provider: P) -> Self {
        Self {
            provider,
            interruptor: None,
        }
    }

    pub fn with_interruptor(provider: P, interruptor: Interruptor) -> Self {
        Self {
            provider,
            interruptor: Some(interruptor),
        }
    }

    pub fn provider(&self) -> &P {
        &self.provider
    }

    pub fn into_provider(self) -> P {
        self.provider
    }

    /// Append one sample per instant of `range` to `sink`.
    ///
    /// Days without a usable TLE and instants SGP4 fails on are skipped and
    /// counted in the report; only a failing sink aborts the run.
    pub fn generate<S: CoordinateSink + ?Sized>(
        &mut self,
        satellite_id: SatelliteId,
        range: &TimeRange,
        sink: &mut S,
    ) -> Result<GenerationReport, GenerateError> {
        info!(
            %satellite_id,
            start = %range.start(),
            end = %range.end(),
            step = %range.step(),
            "Generating ground track"
        );

        let mut report = GenerationReport::default();
        let mut days: BTreeMap<Day, DayState> = BTreeMap::new();

        for instant in range.instants() {
            if self.interruptor.as_ref().map_or(false, Interruptor::is_set) {
                warn!(%satellite_id, %instant, "Generation interrupted");
                report.cancelled = true;
                break;
            }

            let day = instant.date_naive();
            let state = days
                .entry(day)
                .or_insert_with(|| self.resolve_day(satellite_id, day, &mut report));

            match state {
                DayState::Unavailable => report.skipped_unavailable += 1,
                DayState::Rejected => report.skipped_propagation += 1,
                DayState::Ready(propagator) => match propagator.sub_point(instant) {
                    Ok(sub_point) => {
                        sink.append(&CoordinateSample::new(instant, sub_point))?;
                        report.written += 1;
                    }
                    Err(e) => {
                        warn!(%satellite_id, %instant, error = %e, failure = %e.failure, "Skipping sample");
                        report.skipped_propagation += 1;
                    }
                },
            }
        }

        info!(
            %satellite_id,
            written = report.written,
            skipped_unavailable = report.skipped_unavailable,
            skipped_propagation = report.skipped_propagation,
            unavailable_days = report.unavailable_days.len(),
            cancelled = report.cancelled,
            "Ground track generation finished"
        );
        Ok(report)
    }

    fn resolve_day(
        &mut self,
        satellite_id: SatelliteId,
        day: Day,
        report: &mut GenerationReport,
    ) -> DayState {
        let tle = match self.provider.resolve(satellite_id, day) {
            Ok(tle) => tle,
            Err(reason) => {
                warn!(%satellite_id, %day, %reason, "No TLE for the day, skipping its samples");
                report.unavailable_days.push((day, reason));
                return DayState::Unavailable;
            }
        };

        debug!(%satellite_id, %day, epoch = %tle.epoch, "Resolved TLE");
        match Propagator::new(&tle) {
            Ok(p) => DayState::Ready(p),
            Err(e) => {
                warn!(%satellite_id, %day, error = %e, failure = %e.failure, "TLE rejected by SGP4");
                DayState::Rejected
            }
        }
    }
}
