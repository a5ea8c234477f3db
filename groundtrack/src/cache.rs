//! Filesystem-backed TLE cache, one file per (satellite, UTC day)

use std::{
    fs, io,
    path::{Path, PathBuf},
};
use tletypes::prelude::*;
use tracing::debug;

pub const CACHE_FILE_EXTENSION: &str = "tle";
const DAY_FORMAT: &str = "%Y-%m-%d";

#[derive(Debug, thiserror::Error)]
pub enum CacheError {
    #[error("TLE cache I/O error on '{}'", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

#[derive(Clone, Debug)]
pub struct TleCache {
    dir: PathBuf,
}

impl TleCache {
    pub fn new<P: Into<PathBuf>>(dir: P) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// `<dir>/<satellite>_<YYYY-MM-DD>.tle`
    pub fn entry_path(&self, satellite_id: SatelliteId, day: Day) -> PathBuf {
        self.dir.join(format!(
            "{satellite_id}_{}.{CACHE_FILE_EXTENSION}",
            day.format(DAY_FORMAT)
        ))
    }

    /// The cached pair for exactly `day`.
    ///
    /// An entry that doesn't hold exactly two non-empty lines is reported as
    /// absent. The lines are not validated here.
    pub fn get(&self, satellite_id: SatelliteId, day: Day) -> Result<Option<TleLines>, CacheError> {
        let path = self.entry_path(satellite_id, day);
        let content = match fs::read_to_string(&path) {
            Ok(c) => c,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(source) => return Err(CacheError::Io { path, source }),
        };

        let lines: Vec<&str> = content
            .lines()
            .map(str::trim_end)
            .filter(|l| !l.is_empty())
            .collect();
        match lines.as_slice() {
            [line1, line2] => Ok(Some(TleLines::new(*line1, *line2))),
            _ => {
                debug!(
                    path = %path.display(),
                    lines = lines.len(),
                    "Ignoring cache entry without exactly two lines"
                );
                Ok(None)
            }
        }
    }

    /// Store `tle` for `day`, replacing any previous entry.
    ///
    /// The entry is written next to its final location and renamed into place.
    pub fn put(&self, satellite_id: SatelliteId, day: Day, tle: &Tle) -> Result<(), CacheError> {
        fs::create_dir_all(&self.dir).map_err(|source| CacheError::Io {
            path: self.dir.clone(),
            source,
        })?;

        let path = self.entry_path(satellite_id, day);
        let tmp_path = path.with_extension(format!("{CACHE_FILE_EXTENSION}.tmp"));
        let content = format!("{}\n{}", tle.line1(), tle.line2());

        fs::write(&tmp_path, content).map_err(|source| CacheError::Io {
            path: tmp_path.clone(),
            source,
        })?;
        fs::rename(&tmp_path, &path).map_err(|source| CacheError::Io { path, source })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use tempfile::TempDir;
    use tleprotocol::parse_tle;

    const LINE1: &str = "1 44387U 19038A   24134.50749057  .00000245  00000-0  12652-3 0  9998";
    const LINE2: &str = "2 44387  98.8247 103.6000 0002382  74.0416 286.1024 14.23882512252450";
    const ISS_LINE1: &str = "1 25544U 98067A   08264.51782528 -.00002182  00000-0 -11606-4 0  2927";
    const ISS_LINE2: &str = "2 25544  51.6416 247.4627 0006703 130.5360 325.0288 15.72125391563537";

    fn day(d: u32) -> Day {
        NaiveDate::from_ymd_opt(2023, 1, d).unwrap()
    }

    fn tle(l1: &str, l2: &str) -> Tle {
        parse_tle(&TleLines::new(l1, l2)).unwrap()
    }

    #[test]
    fn deterministic_entry_names() {
        let cache = TleCache::new("tle_cache");
        let sid = SatelliteId::new(44387);
        assert_eq!(
            cache.entry_path(sid, day(1)),
            PathBuf::from("tle_cache/44387_2023-01-01.tle")
        );
        assert_ne!(cache.entry_path(sid, day(1)), cache.entry_path(sid, day(2)));
        assert_ne!(
            cache.entry_path(sid, day(1)),
            cache.entry_path(SatelliteId::new(4438), day(1))
        );
    }

    #[test]
    fn round_trip() {
        let dir = TempDir::new().unwrap();
        let cache = TleCache::new(dir.path().join("nested").join("cache"));
        let sid = SatelliteId::new(44387);
        let t = tle(LINE1, LINE2);

        assert!(cache.get(sid, day(1)).unwrap().is_none());
        cache.put(sid, day(1), &t).unwrap();
        assert_eq!(cache.get(sid, day(1)).unwrap(), Some(t.lines.clone()));
        assert!(cache.get(sid, day(2)).unwrap().is_none());

        let content = fs::read_to_string(cache.entry_path(sid, day(1))).unwrap();
        assert_eq!(content, format!("{LINE1}\n{LINE2}"));
        assert!(!cache
            .entry_path(sid, day(1))
            .with_extension("tle.tmp")
            .exists());
    }

    #[test]
    fn last_write_wins() {
        let dir = TempDir::new().unwrap();
        let cache = TleCache::new(dir.path());
        let sid = SatelliteId::new(44387);

        cache.put(sid, day(1), &tle(LINE1, LINE2)).unwrap();
        cache.put(sid, day(1), &tle(ISS_LINE1, ISS_LINE2)).unwrap();
        assert_eq!(
            cache.get(sid, day(1)).unwrap(),
            Some(TleLines::new(ISS_LINE1, ISS_LINE2))
        );
    }

    #[test]
    fn partial_entries_are_absent() {
        let dir = TempDir::new().unwrap();
        let cache = TleCache::new(dir.path());
        let sid = SatelliteId::new(44387);

        fs::write(cache.entry_path(sid, day(1)), LINE1).unwrap();
        assert!(cache.get(sid, day(1)).unwrap().is_none());

        fs::write(cache.entry_path(sid, day(2)), "").unwrap();
        assert!(cache.get(sid, day(2)).unwrap().is_none());

        fs::write(
            cache.entry_path(sid, day(3)),
            format!("{LINE1}\r\n{LINE2}\r\n\n"),
        )
        .unwrap();
        assert_eq!(
            cache.get(sid, day(3)).unwrap(),
            Some(TleLines::new(LINE1, LINE2))
        );
    }

    #[test]
    fn unreadable_entry_is_an_error() {
        let dir = TempDir::new().unwrap();
        let cache = TleCache::new(dir.path());
        let sid = SatelliteId::new(44387);

        // A directory where the entry file should be
        fs::create_dir_all(cache.entry_path(sid, day(1))).unwrap();
        assert!(matches!(
            cache.get(sid, day(1)),
            Err(CacheError::Io { .. })
        ));
    }
}
