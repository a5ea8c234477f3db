//! Parse a gp_history style response holding several epochs of one satellite

use chrono::NaiveDate;
use tleprotocol::*;
use tletypes::prelude::*;

const RESPONSE: &str = include_str!("../test_fixtures/gp_history_44387.txt");

#[test]
fn gp_history_response() {
    let (rest, pairs) = parse_tle_set(RESPONSE).unwrap();
    assert_eq!(rest, "");
    assert_eq!(pairs.len(), 4);

    let parsed: Vec<_> = pairs.iter().map(parse_tle).collect();
    assert!(parsed[0].is_ok());
    assert!(parsed[1].is_ok());
    assert!(parsed[3].is_ok());

    let err = parsed[2].as_ref().unwrap_err();
    assert!(matches!(err, FormatError::Checksum { .. }));
    assert_eq!(err.line(), Some(LineNumber::Two));

    let tles: Vec<Tle> = parsed.into_iter().filter_map(Result::ok).collect();
    assert!(tles
        .iter()
        .all(|t| t.satellite_id == SatelliteId::new(44387)));
    assert!(tles.windows(2).all(|w| w[0].epoch < w[1].epoch));

    let may13 = NaiveDate::from_ymd_opt(2024, 5, 13).unwrap();
    let same_day = tles
        .iter()
        .filter(|t| t.epoch.date_naive() == may13)
        .count();
    assert_eq!(same_day, 2);
}

#[test]
fn epochs_readable_without_validation() {
    let (_, pairs) = parse_tle_set(RESPONSE).unwrap();
    let epochs: Vec<_> = pairs
        .iter()
        .map(|p| parse_epoch(&p.line1).unwrap())
        .collect();
    assert!(epochs.windows(2).all(|w| w[0] < w[1]));
}
