use crate::resolver::SelectionPolicy;
use serde::{Deserialize, Deserializer};
use std::{
    env, fmt, fs, io,
    path::{Path, PathBuf},
    time::Duration,
};
use tleprotocol::RecordFormat;
use url::Url;

pub const SPACE_TRACK_URL_DEFAULT: &str = "https://www.space-track.org";
pub const SPACE_TRACK_IDENTITY_ENV_VAR: &str = "SPACETRACK_IDENTITY";
pub const SPACE_TRACK_PASSWORD_ENV_VAR: &str = "SPACETRACK_PASSWORD";

#[derive(Clone, PartialEq, Debug, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct Config {
    /// Directory holding one `<satellite>_<YYYY-MM-DD>.tle` file per resolved day
    pub cache_dir: PathBuf,
    /// Directory for the default `SAT-<satellite>.dat` outputs
    pub output_dir: PathBuf,
    pub selection_policy: SelectionPolicy,
    pub record_format: RecordFormat,
    pub space_track: SpaceTrackConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            cache_dir: PathBuf::from("tle_cache"),
            output_dir: PathBuf::from("satellites"),
            selection_policy: SelectionPolicy::default(),
            record_format: RecordFormat::default(),
            space_track: SpaceTrackConfig::default(),
        }
    }
}

#[derive(Clone, PartialEq, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct SpaceTrackConfig {
    /// Defaults to [`SPACE_TRACK_URL_DEFAULT`]
    pub base_url: Option<Url>,
    pub identity: Option<String>,
    pub password: Option<String>,
    #[serde(deserialize_with = "humantime_duration")]
    pub timeout: Duration,
    /// Request budget per rolling minute, login included
    pub requests_per_minute: u32,
}

impl Default for SpaceTrackConfig {
    fn default() -> Self {
        Self {
            base_url: None,
            identity: None,
            password: None,
            timeout: Duration::from_secs(30),
            requests_per_minute: 30,
        }
    }
}

impl SpaceTrackConfig {
    pub fn base_url(&self) -> Result<Url, url::ParseError> {
        match &self.base_url {
            Some(url) => Ok(url.clone()),
            None => Url::parse(SPACE_TRACK_URL_DEFAULT),
        }
    }
}

impl fmt::Debug for SpaceTrackConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SpaceTrackConfig")
            .field("base_url", &self.base_url)
            .field("identity", &self.identity)
            .field("password", &self.password.as_ref().map(|_| "<redacted>"))
            .field("timeout", &self.timeout)
            .field("requests_per_minute", &self.requests_per_minute)
            .finish()
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file '{}'", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Failed to parse config file")]
    Parse(#[from] toml::de::Error),

    #[error("space-track.requests-per-minute must be greater than zero")]
    RequestRate,

    #[error("The {0} environment variable contained a non-UTF-8-compatible string")]
    EnvVarNonUtf8(&'static str),
}

impl Config {
    /// Read a TOML config file, then apply the credential environment overrides
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let mut cfg = Self::from_str_checked(&content)?;
        cfg.apply_env()?;
        Ok(cfg)
    }

    /// The config file when provided, defaults otherwise
    pub fn load_or_default<P: AsRef<Path>>(path: Option<P>) -> Result<Self, ConfigError> {
        match path {
            Some(p) => Self::load(p),
            None => {
                let mut cfg = Self::default();
                cfg.apply_env()?;
                Ok(cfg)
            }
        }
    }

    pub fn from_str_checked(s: &str) -> Result<Self, ConfigError> {
        let cfg: Config = toml::from_str(s)?;
        if cfg.space_track.requests_per_minute == 0 {
            return Err(ConfigError::RequestRate);
        }
        Ok(cfg)
    }

    /// `SPACETRACK_IDENTITY` and `SPACETRACK_PASSWORD` take precedence over
    /// the file's credentials
    pub fn apply_env(&mut self) -> Result<(), ConfigError> {
        if let Some(identity) = env_var(SPACE_TRACK_IDENTITY_ENV_VAR)? {
            self.space_track.identity = Some(identity);
        }
        if let Some(password) = env_var(SPACE_TRACK_PASSWORD_ENV_VAR)? {
            self.space_track.password = Some(password);
        }
        Ok(())
    }
}

fn env_var(name: &'static str) -> Result<Option<String>, ConfigError> {
    match env::var(name) {
        Ok(val) => Ok(Some(val)),
        Err(env::VarError::NotUnicode(_)) => Err(ConfigError::EnvVarNonUtf8(name)),
        Err(env::VarError::NotPresent) => Ok(None),
    }
}

fn humantime_duration<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
    let s = String::deserialize(deserializer)?;
    humantime::parse_duration(&s).map_err(serde::de::Error::custom)
}
