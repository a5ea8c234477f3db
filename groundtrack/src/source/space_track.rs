//! Space-Track.org REST adapter
//!
//! Logs in once per source, then queries the `gp_history` class for every
//! element set with an epoch inside the requested days.

use super::{parse_response, RemoteError, TleSource};
use crate::config::SpaceTrackConfig;
use ratelimit::Ratelimiter;
use reqwest::{blocking::Client, StatusCode};
use std::time::Duration;
use tletypes::prelude::*;
use tracing::{debug, info};
use url::Url;

const LOGIN_PATH: [&str; 2] = ["ajaxauth", "login"];
const QUERY_PATH: [&str; 2] = ["basicspacedata", "query"];
const DAY_FORMAT: &str = "%Y-%m-%d";

pub struct SpaceTrackSource {
    client: Client,
    base_url: Url,
    identity: String,
    password: String,
    limiter: Ratelimiter,
    logged_in: bool,
}

impl SpaceTrackSource {
    pub fn new(cfg: &SpaceTrackConfig) -> Result<Self, RemoteError> {
        let (identity, password) = match (&cfg.identity, &cfg.password) {
            (Some(i), Some(p)) => (i.clone(), p.clone()),
            _ => return Err(RemoteError::MissingCredentials),
        };
        let base_url = cfg.base_url().map_err(|e| RemoteError::Url(e.to_string()))?;
        if base_url.cannot_be_a_base() {
            return Err(RemoteError::Url(base_url.to_string()));
        }

        let client = Client::builder()
            .cookie_store(true)
            .timeout(cfg.timeout)
            .build()?;

        let limiter = pacer(cfg.requests_per_minute)?;

        Ok(Self {
            client,
            base_url,
            identity,
            password,
            limiter,
            logged_in: false,
        })
    }

    /// The most recent element set published for the satellite, regardless
    /// of its epoch
    pub fn latest(&mut self, satellite_id: SatelliteId) -> Result<Option<TleLines>, RemoteError> {
        let url = self.latest_url(satellite_id)?;
        let body = self.get(url)?;
        Ok(parse_response(&body)?.pop())
    }

    pub fn history_url(
        &self,
        satellite_id: SatelliteId,
        start_day: Day,
        end_day: Day,
    ) -> Result<Url, RemoteError> {
        let epoch_range = format!(
            "{}--{}",
            start_day.format(DAY_FORMAT),
            end_day.succ_opt().unwrap_or(end_day).format(DAY_FORMAT)
        );
        let catalog = satellite_id.to_string();
        self.endpoint(
            QUERY_PATH.iter().copied().chain([
                "class",
                "gp_history",
                "NORAD_CAT_ID",
                catalog.as_str(),
                "EPOCH",
                epoch_range.as_str(),
                "orderby",
                "EPOCH asc",
                "format",
                "tle",
            ]),
        )
    }

    pub fn latest_url(&self, satellite_id: SatelliteId) -> Result<Url, RemoteError> {
        let catalog = satellite_id.to_string();
        self.endpoint(QUERY_PATH.iter().copied().chain([
            "class",
            "gp",
            "NORAD_CAT_ID",
            catalog.as_str(),
            "orderby",
            "EPOCH desc",
            "limit",
            "1",
            "format",
            "tle",
        ]))
    }

    fn endpoint<'a, I: IntoIterator<Item = &'a str>>(&self, segments: I) -> Result<Url, RemoteError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| RemoteError::Url(self.base_url.to_string()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    fn pace(&self) {
        while let Err(wait) = self.limiter.try_wait() {
            std::thread::sleep(wait);
        }
    }

    fn login(&mut self) -> Result<(), RemoteError> {
        if self.logged_in {
            return Ok(());
        }

        let url = self.endpoint(LOGIN_PATH)?;
        info!(url = %url, identity = %self.identity, "Logging in to Space-Track");
        self.pace();
        let resp = self
            .client
            .post(url)
            .form(&[
                ("identity", self.identity.as_str()),
                ("password", self.password.as_str()),
            ])
            .send()?;

        match resp.status() {
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => return Err(RemoteError::Auth),
            StatusCode::TOO_MANY_REQUESTS => return Err(RemoteError::RateLimited),
            s if !s.is_success() => return Err(RemoteError::Status(s.as_u16())),
            _ => (),
        }

        // A rejected login is still a 200, with a JSON body saying so
        let body = resp.text()?;
        if body.contains("Failed") {
            return Err(RemoteError::Auth);
        }

        self.logged_in = true;
        Ok(())
    }

    fn get(&mut self, url: Url) -> Result<String, RemoteError> {
        self.login()?;
        self.pace();
        debug!(url = %url, "Space-Track query");
        let resp = self.client.get(url).send()?;
        match resp.status() {
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
                self.logged_in = false;
                Err(RemoteError::Auth)
            }
            StatusCode::TOO_MANY_REQUESTS => Err(RemoteError::RateLimited),
            s if !s.is_success() => Err(RemoteError::Status(s.as_u16())),
            _ => Ok(resp.text()?),
        }
    }
}

/// One request every `60s / requests_per_minute`, without bursts, so no
/// minute ever sees more than the budget
fn pacer(requests_per_minute: u32) -> Result<Ratelimiter, RemoteError> {
    let interval = Duration::from_secs(60)
        .checked_div(requests_per_minute)
        .ok_or_else(|| RemoteError::Pacing(format!("{requests_per_minute} requests per minute")))?;
    Ratelimiter::builder(1, interval)
        .max_tokens(1)
        .initial_available(1)
        .build()
        .map_err(|e| RemoteError::Pacing(format!("{e:?}")))
}

impl TleSource for SpaceTrackSource {
    fn query(
        &mut self,
        satellite_id: SatelliteId,
        start_day: Day,
        end_day: Day,
    ) -> Result<Vec<TleLines>, RemoteError> {
        let url = self.history_url(satellite_id, start_day, end_day)?;
        let body = self.get(url)?;
        let tles = parse_response(&body)?;
        info!(
            %satellite_id,
            %start_day,
            %end_day,
            count = tles.len(),
            "Fetched element sets"
        );
        Ok(tles)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn cfg(base_url: &str) -> SpaceTrackConfig {
        SpaceTrackConfig {
            base_url: Some(Url::parse(base_url).unwrap()),
            identity: Some("user@example.com".to_owned()),
            password: Some("secret".to_owned()),
            ..Default::default()
        }
    }

    fn day() -> Day {
        NaiveDate::from_ymd_opt(2024, 5, 13).unwrap()
    }

    #[test]
    fn credentials_required() {
        let mut c = cfg("https://www.space-track.org");
        c.password = None;
        assert!(matches!(
            SpaceTrackSource::new(&c),
            Err(RemoteError::MissingCredentials)
        ));
    }

    #[test]
    fn requests_are_spread_over_the_minute() {
        let limiter = pacer(600).unwrap();
        assert!(limiter.try_wait().is_ok());
        let wait = limiter.try_wait().unwrap_err();
        assert!(wait <= Duration::from_millis(100));
    }

    #[test]
    fn zero_rate_is_rejected() {
        assert!(matches!(pacer(0), Err(RemoteError::Pacing(_))));
    }

    #[test]
    fn history_query_url() {
        let src = SpaceTrackSource::new(&cfg("https://www.space-track.org")).unwrap();
        let url = src.history_url(SatelliteId::new(44387), day(), day()).unwrap();
        assert_eq!(
            url.as_str(),
            "https://www.space-track.org/basicspacedata/query/class/gp_history/\
             NORAD_CAT_ID/44387/EPOCH/2024-05-13--2024-05-14/orderby/EPOCH%20asc/format/tle"
        );
    }

    #[test]
    fn latest_query_url_under_base_path() {
        let src = SpaceTrackSource::new(&cfg("http://localhost:8080/st/")).unwrap();
        let url = src.latest_url(SatelliteId::new(25544)).unwrap();
        assert_eq!(
            url.as_str(),
            "http://localhost:8080/st/basicspacedata/query/class/gp/\
             NORAD_CAT_ID/25544/orderby/EPOCH%20desc/limit/1/format/tle"
        );
    }
}
