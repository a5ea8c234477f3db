//! Remote providers of historical element sets

use tleprotocol::{parse_epoch, parse_tle_set};
use tletypes::prelude::*;

pub use self::space_track::SpaceTrackSource;

pub mod space_track;

#[derive(Debug, thiserror::Error)]
pub enum RemoteError {
    #[error("The provider rejected the credentials")]
    Auth,

    #[error("No provider credentials were configured")]
    MissingCredentials,

    #[error("The provider is rate limiting requests")]
    RateLimited,

    #[error("The provider responded with status {0}")]
    Status(u16),

    #[error("Failed to reach the provider")]
    Transport(#[from] reqwest::Error),

    #[error("The provider response is not a sequence of TLE line pairs")]
    Malformed,

    #[error("Invalid provider URL: {0}")]
    Url(String),

    #[error("Invalid request pacing: {0}")]
    Pacing(String),
}

/// Something that can be asked for the element sets of a satellite whose
/// epochs fall within an inclusive range of UTC days.
pub trait TleSource {
    /// Pairs are returned ordered by epoch, ascending, undeduplicated.
    /// No results is not an error.
    fn query(
        &mut self,
        satellite_id: SatelliteId,
        start_day: Day,
        end_day: Day,
    ) -> Result<Vec<TleLines>, RemoteError>;
}

impl<T: TleSource + ?Sized> TleSource for &mut T {
    fn query(
        &mut self,
        satellite_id: SatelliteId,
        start_day: Day,
        end_day: Day,
    ) -> Result<Vec<TleLines>, RemoteError> {
        (**self).query(satellite_id, start_day, end_day)
    }
}

/// Split a provider response into line pairs, ordered by epoch
pub fn parse_response(body: &str) -> Result<Vec<TleLines>, RemoteError> {
    let (rem, mut tles) = parse_tle_set(body).map_err(|_| RemoteError::Malformed)?;
    if !rem.is_empty() {
        return Err(RemoteError::Malformed);
    }
    order_by_epoch(&mut tles);
    Ok(tles)
}

/// Stable sort by epoch. Pairs with an unreadable epoch go last, the
/// validator will reject them anyway.
pub fn order_by_epoch(tles: &mut [TleLines]) {
    tles.sort_by_cached_key(|t| match parse_epoch(&t.line1) {
        Ok(epoch) => (false, Some(epoch)),
        Err(_) => (true, None),
    });
}
