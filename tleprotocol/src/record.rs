//! Ground-track record lines: `<UTC timestamp> <latitude> <longitude>`

use crate::{parser::ParseError, parser::Result, RECORD_DELIMETER, TIMESTAMP_UTC_FORMAT};
use chrono::NaiveDateTime;
use nom::{
    branch::alt,
    bytes::complete::take,
    character::complete::{line_ending, space0, space1},
    combinator::{eof, opt},
    multi::fold_many0,
    number::complete::double,
    sequence::preceded,
    Err::Error,
};
use serde::{Deserialize, Serialize};
use tletypes::prelude::*;

/// Float layout of the latitude/longitude fields.
///
/// A destination file should only ever be written with one format.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum RecordFormat {
    /// 6-digit mantissa with a signed two-digit exponent, e.g. `4.512346e+01`
    #[default]
    Scientific,
    /// 6 decimal digits, right aligned to 9 columns, e.g. `45.123457`
    Fixed,
}

/// One full record line, delimiter included
pub fn format_record(sample: &CoordinateSample, format: RecordFormat) -> String {
    let timestamp = sample.timestamp.format(TIMESTAMP_UTC_FORMAT);
    match format {
        RecordFormat::Scientific => format!(
            "{timestamp} {} {}{RECORD_DELIMETER}",
            scientific(sample.latitude),
            scientific(sample.longitude),
        ),
        RecordFormat::Fixed => format!(
            "{timestamp} {:9.6} {:9.6}{RECORD_DELIMETER}",
            sample.latitude, sample.longitude,
        ),
    }
}

fn scientific(v: f64) -> String {
    let s = format!("{v:.6e}");
    match s.split_once('e') {
        Some((mantissa, exp)) => {
            let (sign, digits) = match exp.strip_prefix('-') {
                Some(digits) => ('-', digits),
                None => ('+', exp),
            };
            format!("{mantissa}e{sign}{digits:0>2}")
        }
        None => s,
    }
}

/// Parse one record line in either [`RecordFormat`], with an optional
/// trailing altitude field
pub fn parse_coordinate_record(line: &str) -> Result<&str, CoordinateSample> {
    let (s, timestamp) = take(19usize)(line)?;
    let timestamp = NaiveDateTime::parse_from_str(timestamp, TIMESTAMP_UTC_FORMAT)
        .map_err(|_| Error(ParseError::Timestamp))?
        .and_utc();
    let (s, _) = space1(s)?;
    let (s, latitude) = double(s)?;
    let (s, _) = space1(s)?;
    let (s, longitude) = double(s)?;
    let (s, altitude) = opt(preceded(space1, double))(s)?;
    let (s, _) = space0(s)?;
    let (s, _) = alt((line_ending, eof))(s)?;
    Ok((
        s,
        CoordinateSample {
            timestamp,
            latitude,
            longitude,
            altitude,
        },
    ))
}

/// Every record of a destination's content, in file order
pub fn parse_coordinate_records(content: &str) -> Result<&str, Vec<CoordinateSample>> {
    fold_many0(
        parse_coordinate_record,
        Vec::new,
        |mut records: Vec<CoordinateSample>, r| {
            records.push(r);
            records
        },
    )(content)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn sample(lat: f64, lon: f64) -> CoordinateSample {
        CoordinateSample {
            timestamp: Utc.with_ymd_and_hms(2024, 10, 6, 0, 1, 0).unwrap(),
            latitude: lat,
            longitude: lon,
            altitude: Some(812.5),
        }
    }

    #[test]
    fn scientific_layout() {
        assert_eq!(
            format_record(&sample(45.1234567, -123.0), RecordFormat::Scientific),
            "2024-10-06 00:01:00 4.512346e+01 -1.230000e+02\n"
        );
        assert_eq!(scientific(0.0), "0.000000e+00");
        assert_eq!(scientific(-0.00012345), "-1.234500e-04");
    }

    #[test]
    fn fixed_layout() {
        assert_eq!(
            format_record(&sample(5.5, -123.25), RecordFormat::Fixed),
            "2024-10-06 00:01:00  5.500000 -123.250000\n"
        );
    }

    #[test]
    fn records_parse_back() {
        for format in [RecordFormat::Scientific, RecordFormat::Fixed] {
            let s = sample(-51.25, 179.5);
            let line = format_record(&s, format);
            let (rest, r) = parse_coordinate_record(&line).unwrap();
            assert!(rest.is_empty());
            assert_eq!(r.timestamp, s.timestamp);
            assert_eq!(r.latitude, -51.25);
            assert_eq!(r.longitude, 179.5);
            assert_eq!(r.altitude, None);
        }
    }

    #[test]
    fn four_field_record() {
        let (_, r) =
            parse_coordinate_record("2024-10-06 00:01:00 1.0e+01 2.0e+01 8.125e+02").unwrap();
        assert_eq!(r.altitude, Some(812.5));
    }

    #[test]
    fn bad_timestamp() {
        assert_eq!(
            parse_coordinate_record("2024-13-06 00:01:00 1.0 2.0\n"),
            Err(Error(ParseError::Timestamp))
        );
    }

    #[test]
    fn several_records() {
        let content = "2024-10-06 00:00:00 1.000000e+00 2.000000e+00\n\
                       2024-10-06 00:01:00 3.000000e+00 4.000000e+00\n";
        let (rest, records) = parse_coordinate_records(content).unwrap();
        assert!(rest.is_empty());
        assert_eq!(records.len(), 2);
        assert_eq!(records[1].longitude, 4.0);
    }
}
