use chrono::{DateTime, Duration, NaiveDate, Utc};

pub type UtcTimestamp = DateTime<Utc>;

/// A UTC calendar day
pub type Day = NaiveDate;

const NANOS_PER_DAY: i64 = 86_400_000_000_000;

#[derive(Copy, Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum TimeRangeError {
    #[error("Time range end ({end}) is before its start ({start})")]
    EndBeforeStart {
        start: UtcTimestamp,
        end: UtcTimestamp,
    },
    #[error("Time range step must be positive, got {0}")]
    NonPositiveStep(Duration),
}

/// An inclusive `[start, end]` range of UTC instants sampled every `step`
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct TimeRange {
    start: UtcTimestamp,
    end: UtcTimestamp,
    step: Duration,
}

impl TimeRange {
    pub fn new(
        start: UtcTimestamp,
        end: UtcTimestamp,
        step: Duration,
    ) -> Result<Self, TimeRangeError> {
        if step <= Duration::zero() {
            return Err(TimeRangeError::NonPositiveStep(step));
        }
        if end < start {
            return Err(TimeRangeError::EndBeforeStart { start, end });
        }
        Ok(TimeRange { start, end, step })
    }

    /// Every sample instant of a single day, from 00:00 up to but excluding
    /// the next day's 00:00.
    pub fn whole_day(day: Day, step: Duration) -> Result<Self, TimeRangeError> {
        let start = day.and_time(chrono::NaiveTime::MIN).and_utc();
        if step <= Duration::zero() {
            return Err(TimeRangeError::NonPositiveStep(step));
        }
        // Offset of the last step boundary strictly before the next midnight
        let last = match step.num_nanoseconds() {
            Some(ns) => (NANOS_PER_DAY - 1) / ns * ns,
            None => 0,
        };
        Self::new(start, start + Duration::nanoseconds(last), step)
    }

    pub fn start(&self) -> UtcTimestamp {
        self.start
    }

    pub fn end(&self) -> UtcTimestamp {
        self.end
    }

    pub fn step(&self) -> Duration {
        self.step
    }

    pub fn instants(&self) -> Instants {
        Instants {
            next: Some(self.start),
            end: self.end,
            step: self.step,
        }
    }

    /// Calendar days touched by `[start, end]`, in order
    pub fn days(&self) -> Vec<Day> {
        self.start
            .date_naive()
            .iter_days()
            .take_while(|d| *d <= self.end.date_naive())
            .collect()
    }
}

/// Iterator over the sample instants of a [`TimeRange`]
#[derive(Clone, Debug)]
pub struct Instants {
    next: Option<UtcTimestamp>,
    end: UtcTimestamp,
    step: Duration,
}

impl Iterator for Instants {
    type Item = UtcTimestamp;

    fn next(&mut self) -> Option<Self::Item> {
        let t = self.next.filter(|t| *t <= self.end)?;
        self.next = t.checked_add_signed(self.step);
        Some(t)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn utc(y: i32, m: u32, d: u32, h: u32, min: u32) -> UtcTimestamp {
        Utc.with_ymd_and_hms(y, m, d, h, min, 0).unwrap()
    }

    #[test]
    fn rejects_invalid_ranges() {
        let t = utc(2023, 1, 1, 0, 0);
        assert_eq!(
            TimeRange::new(t, t - Duration::minutes(1), Duration::minutes(1)),
            Err(TimeRangeError::EndBeforeStart {
                start: t,
                end: t - Duration::minutes(1)
            })
        );
        assert_eq!(
            TimeRange::new(t, t, Duration::zero()),
            Err(TimeRangeError::NonPositiveStep(Duration::zero()))
        );
        assert!(TimeRange::new(t, t, -Duration::seconds(5)).is_err());
    }

    #[test]
    fn inclusive_instants() {
        let r = TimeRange::new(
            utc(2023, 1, 1, 0, 0),
            utc(2023, 1, 1, 0, 1),
            Duration::minutes(1),
        )
        .unwrap();
        let instants: Vec<_> = r.instants().collect();
        assert_eq!(instants, vec![utc(2023, 1, 1, 0, 0), utc(2023, 1, 1, 0, 1)]);

        let single = TimeRange::new(r.start(), r.start(), Duration::minutes(1)).unwrap();
        assert_eq!(single.instants().count(), 1);
    }

    #[test]
    fn end_not_on_step_boundary() {
        let r = TimeRange::new(
            utc(2023, 1, 1, 0, 0),
            utc(2023, 1, 1, 0, 2) + Duration::seconds(30),
            Duration::minutes(1),
        )
        .unwrap();
        assert_eq!(r.instants().count(), 3);
    }

    #[test]
    fn touched_days() {
        let r = TimeRange::new(
            utc(2024, 10, 6, 12, 0),
            utc(2024, 10, 8, 0, 0),
            Duration::minutes(1),
        )
        .unwrap();
        assert_eq!(
            r.days(),
            vec![
                NaiveDate::from_ymd_opt(2024, 10, 6).unwrap(),
                NaiveDate::from_ymd_opt(2024, 10, 7).unwrap(),
                NaiveDate::from_ymd_opt(2024, 10, 8).unwrap(),
            ]
        );
    }

    #[test]
    fn whole_day_excludes_next_midnight() {
        let day = NaiveDate::from_ymd_opt(2023, 1, 1).unwrap();
        let r = TimeRange::whole_day(day, Duration::minutes(1)).unwrap();
        assert_eq!(r.instants().count(), 1440);
        assert_eq!(r.end(), utc(2023, 1, 1, 23, 59));
    }

    #[test]
    fn whole_day_sub_millisecond_step() {
        let day = NaiveDate::from_ymd_opt(2023, 1, 1).unwrap();
        let r = TimeRange::whole_day(day, Duration::microseconds(500)).unwrap();
        assert_eq!(
            r.end(),
            utc(2023, 1, 1, 23, 59) + Duration::microseconds(59_999_500)
        );

        let r = TimeRange::whole_day(day, Duration::days(2)).unwrap();
        assert_eq!(r.end(), r.start());
        assert_eq!(r.instants().count(), 1);
    }
}
