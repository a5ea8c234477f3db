//! nom parsers for the fixed-column TLE layout and for provider responses
//! holding several element sets

use crate::{validate_pair, FormatError, LineNumber, TLE_LINE_LEN};
use chrono::{Duration, NaiveDate, NaiveTime};
use nom::{
    branch::alt,
    bytes::complete::take,
    character::complete::{char, line_ending, multispace0, not_line_ending, one_of},
    combinator::{eof, opt, verify},
    error::ErrorKind,
    multi::fold_many0,
    sequence::terminated,
    Err::Error,
};
use tletypes::prelude::*;
use tracing::debug;

pub type Result<I, O, E = ParseError<I>> = std::result::Result<(I, O), nom::Err<E>>;

#[derive(Debug, PartialEq, thiserror::Error)]
pub enum ParseError<I> {
    #[error("Invalid catalog number")]
    CatalogNumber,
    #[error("Invalid epoch")]
    Epoch,
    #[error("Invalid record timestamp")]
    Timestamp,
    #[error("Unexpected input ({1:?})")]
    Nom(I, ErrorKind),
}

/// Validate and parse a raw element set.
///
/// Checksums are verified first so that a corrupted check digit is always
/// reported as such, then the line lengths, the fixed columns, and finally
/// the catalog number agreement between the two lines.
pub fn parse_tle(lines: &TleLines) -> std::result::Result<Tle, FormatError> {
    validate_pair(&lines.line1, &lines.line2)?;
    check_length(LineNumber::One, &lines.line1)?;
    check_length(LineNumber::Two, &lines.line2)?;

    let (_, l1) = line1(&lines.line1).map_err(|e| structure_error(LineNumber::One, e))?;
    let (_, catalog2) = line2(&lines.line2).map_err(|e| structure_error(LineNumber::Two, e))?;

    if l1.catalog != catalog2 {
        return Err(FormatError::CatalogMismatch {
            line1: l1.catalog,
            line2: catalog2,
        });
    }

    Ok(Tle {
        satellite_id: SatelliteId::new(l1.catalog),
        epoch: l1.epoch,
        lines: lines.clone(),
    })
}

/// Epoch of a line 1, without any checksum verification
pub fn parse_epoch(line1_text: &str) -> std::result::Result<UtcTimestamp, FormatError> {
    line1(line1_text)
        .map(|(_, l1)| l1.epoch)
        .map_err(|e| structure_error(LineNumber::One, e))
}

/// Element sets in the usual text layout, one line per row, with an optional
/// name line before each pair (3LE). Blank lines between entries are skipped.
///
/// Whatever cannot be read as an element set is left in the returned
/// remainder, e.g. a dangling line 1 without its line 2.
pub fn parse_tle_set(set: &str) -> Result<&str, Vec<TleLines>> {
    let (s, tles) = fold_many0(tle_entry, Vec::new, |mut tles: Vec<TleLines>, tle| {
        tles.push(tle);
        tles
    })(set)?;
    let (s, _) = multispace0(s)?;
    Ok((s, tles))
}

fn tle_entry(s: &str) -> Result<&str, TleLines> {
    let (s, _) = multispace0(s)?;
    let (s, name) = opt(name_line)(s)?;
    let (s, line1) = element_line(s, "1 ")?;
    let (s, line2) = element_line(s, "2 ")?;
    if let Some(name) = name {
        debug!(name = name.trim(), "Element set name line");
    }
    Ok((s, TleLines::new(line1, line2)))
}

fn name_line(s: &str) -> Result<&str, &str> {
    terminated(
        verify(not_line_ending, |l: &str| {
            !l.is_empty() && !l.starts_with("1 ") && !l.starts_with("2 ")
        }),
        line_ending,
    )(s)
}

fn element_line<'a>(s: &'a str, prefix: &str) -> Result<&'a str, &'a str> {
    terminated(
        verify(not_line_ending, |l: &str| l.starts_with(prefix)),
        alt((line_ending, eof)),
    )(s)
}

struct Line1 {
    catalog: u32,
    epoch: UtcTimestamp,
}

fn line1(s: &str) -> Result<&str, Line1> {
    let (s, _) = char('1')(s)?;
    let (s, _) = char(' ')(s)?;
    let (s, catalog) = catalog_number(s)?;
    let (s, _classification) = one_of("UCS")(s)?;
    let (s, _) = char(' ')(s)?;
    let (s, _designator) = take(8usize)(s)?;
    let (s, _) = char(' ')(s)?;
    let (s, epoch) = epoch(s)?;
    Ok((s, Line1 { catalog, epoch }))
}

fn line2(s: &str) -> Result<&str, u32> {
    let (s, _) = char('2')(s)?;
    let (s, _) = char(' ')(s)?;
    catalog_number(s)
}

fn catalog_number(s: &str) -> Result<&str, u32> {
    let (rest, field) = take(5usize)(s)?;
    match field.trim_start().parse::<u32>() {
        Ok(n) => Ok((rest, n)),
        Err(_) => Err(Error(ParseError::CatalogNumber)),
    }
}

/// `YYDDD.DDDDDDDD`: two-digit year (57-99 are 19xx) and fractional day of year
fn epoch(s: &str) -> Result<&str, UtcTimestamp> {
    let (s, year) = take(2usize)(s)?;
    let (s, day) = take(12usize)(s)?;
    match epoch_from_fields(year, day) {
        Some(epoch) => Ok((s, epoch)),
        None => Err(Error(ParseError::Epoch)),
    }
}

fn epoch_from_fields(year: &str, day: &str) -> Option<UtcTimestamp> {
    if !year.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let yy: i32 = year.parse().ok()?;
    let year = if yy < 57 { 2000 + yy } else { 1900 + yy };
    let jan1 = NaiveDate::from_ymd_opt(year, 1, 1)?;
    let days_in_year = if NaiveDate::from_ymd_opt(year, 2, 29).is_some() {
        366.0
    } else {
        365.0
    };

    let day: f64 = day.trim_start().parse().ok()?;
    if !(1.0..days_in_year + 1.0).contains(&day) {
        return None;
    }

    let micros = ((day - 1.0) * 86_400_000_000.0).round() as i64;
    jan1.and_time(NaiveTime::MIN)
        .and_utc()
        .checked_add_signed(Duration::microseconds(micros))
}

fn check_length(line: LineNumber, text: &str) -> std::result::Result<(), FormatError> {
    let found = text.chars().count();
    if found == TLE_LINE_LEN {
        Ok(())
    } else {
        Err(FormatError::Length {
            line,
            expected: TLE_LINE_LEN,
            found,
        })
    }
}

fn structure_error(line: LineNumber, e: nom::Err<ParseError<&str>>) -> FormatError {
    let reason = match e {
        nom::Err::Error(e) | nom::Err::Failure(e) => e.to_string(),
        nom::Err::Incomplete(_) => "incomplete input".to_string(),
    };
    FormatError::Structure { line, reason }
}

impl<I> nom::error::ParseError<I> for ParseError<I> {
    fn from_error_kind(s: I, kind: ErrorKind) -> Self {
        ParseError::Nom(s, kind)
    }

    fn append(_: I, _: ErrorKind, other: Self) -> Self {
        other
    }
}
