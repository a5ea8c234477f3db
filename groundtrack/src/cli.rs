//! Argument parsers shared by the command line tools

use chrono::{Duration, NaiveDate, NaiveDateTime, NaiveTime};
use tletypes::prelude::*;

const TIME_FORMATS: [&str; 2] = ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M:%S"];

#[derive(Debug, thiserror::Error)]
pub enum ArgError {
    #[error("Invalid UTC time '{0}', expected YYYY-MM-DD, YYYY-MM-DDTHH:MM:SS or 'YYYY-MM-DD HH:MM:SS'")]
    Time(String),
    #[error("Invalid step '{0}'")]
    Step(String, #[source] humantime::DurationError),
    #[error("Step '{0}' is out of range")]
    StepRange(String),
}

/// A UTC instant; a bare date is midnight
pub fn parse_utc_time(s: &str) -> Result<UtcTimestamp, ArgError> {
    let s = s.trim();
    TIME_FORMATS
        .iter()
        .find_map(|f| NaiveDateTime::parse_from_str(s, f).ok())
        .or_else(|| {
            NaiveDate::parse_from_str(s, "%Y-%m-%d")
                .ok()
                .map(|d| d.and_time(NaiveTime::MIN))
        })
        .map(|t| t.and_utc())
        .ok_or_else(|| ArgError::Time(s.to_owned()))
}

pub fn parse_day(s: &str) -> Result<Day, ArgError> {
    NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d").map_err(|_| ArgError::Time(s.to_owned()))
}

/// A humantime duration, e.g. `1m` or `30s`
pub fn parse_step(s: &str) -> Result<Duration, ArgError> {
    let d = humantime::parse_duration(s).map_err(|e| ArgError::Step(s.to_owned(), e))?;
    Duration::from_std(d).map_err(|_| ArgError::StepRange(s.to_owned()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    #[test]
    fn time_layouts() {
        let t = Utc.with_ymd_and_hms(2023, 1, 1, 0, 1, 0).unwrap();
        assert_eq!(parse_utc_time("2023-01-01T00:01:00").unwrap(), t);
        assert_eq!(parse_utc_time("2023-01-01 00:01:00").unwrap(), t);
        assert_eq!(
            parse_utc_time("2023-01-01").unwrap(),
            Utc.with_ymd_and_hms(2023, 1, 1, 0, 0, 0).unwrap()
        );
        assert!(parse_utc_time("2023-01-32").is_err());
        assert!(parse_utc_time("yesterday").is_err());
    }

    #[test]
    fn steps() {
        assert_eq!(parse_step("1m").unwrap(), Duration::minutes(1));
        assert_eq!(parse_step("90s").unwrap(), Duration::seconds(90));
        assert!(parse_step("often").is_err());
    }

    #[test]
    fn days() {
        assert_eq!(
            parse_day("2024-05-13").unwrap(),
            NaiveDate::from_ymd_opt(2024, 5, 13).unwrap()
        );
        assert!(parse_day("13/05/2024").is_err());
    }
}
