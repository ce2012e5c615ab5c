use anyhow::Result;
use chrono::{DateTime, Duration, Utc};
use rusqlite::Connection;

use crate::config::settings::SyncConfig;
use crate::db::repository::SyncRepo;
use crate::models::Timetable;
use crate::prayer_times::client::TimingsSource;

/// When cached timings count as stale, and how often to ask.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SyncPolicy {
    pub stale_after: Duration,
    pub check_every: Duration,
}

impl Default for SyncPolicy {
    fn default() -> Self {
        Self::from_config(&SyncConfig::default())
    }
}

impl SyncPolicy {
    pub fn from_config(config: &SyncConfig) -> Self {
        Self {
            stale_after: Duration::days(config.stale_after_days.max(0)),
            check_every: Duration::hours(config.check_interval_hours.max(1)),
        }
    }

    /// A missing watermark is always stale.
    pub fn is_stale(&self, watermark: Option<DateTime<Utc>>, now: DateTime<Utc>) -> bool {
        match watermark {
            None => true,
            Some(at) => now - at > self.stale_after,
        }
    }
}

/// Fetch synchronously and record the result in the store.
pub fn fetch_and_store(
    conn: &Connection,
    source: &dyn TimingsSource,
    now: DateTime<Utc>,
) -> Result<Timetable> {
    let timetable = source.fetch().inspect_err(|e| {
        log::error!("Error fetching prayer times: {}", e);
    })?;
    SyncRepo::store(conn, &timetable, now)?;
    log::info!("Prayer times synced for {}", timetable.date.readable);
    Ok(timetable)
}

/// The cached timetable if it is fresh, otherwise a newly fetched one.
pub fn ensure_fresh(
    conn: &Connection,
    source: &dyn TimingsSource,
    policy: &SyncPolicy,
    now: DateTime<Utc>,
) -> Result<Timetable> {
    let watermark = SyncRepo::last_sync(conn)?;
    if !policy.is_stale(watermark, now) {
        if let Some(cached) = SyncRepo::load_timetable(conn)? {
            log::debug!("Using cached prayer times from {:?}", watermark);
            return Ok(cached);
        }
    }
    fetch_and_store(conn, source, now)
}

#[cfg(test)]
pub(crate) mod fakes {
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use crate::models::Timetable;
    use crate::models::prayer::fixtures::karachi_timetable;
    use crate::prayer_times::client::{FetchError, TimingsSource};

    /// Serves a scripted sequence of outcomes and counts calls.
    pub struct ScriptedSource {
        outcomes: Mutex<Vec<Result<Timetable, FetchError>>>,
        calls: AtomicUsize,
    }

    impl ScriptedSource {
        pub fn ok() -> Self {
            Self::new(vec![Ok(karachi_timetable())])
        }

        pub fn failing(error: FetchError) -> Self {
            Self::new(vec![Err(error)])
        }

        pub fn new(mut outcomes: Vec<Result<Timetable, FetchError>>) -> Self {
            outcomes.reverse();
            Self {
                outcomes: Mutex::new(outcomes),
                calls: AtomicUsize::new(0),
            }
        }

        pub fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    impl TimingsSource for ScriptedSource {
        fn fetch(&self) -> Result<Timetable, FetchError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.outcomes
                .lock()
                .unwrap()
                .pop()
                .unwrap_or_else(|| Ok(karachi_timetable()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::fakes::ScriptedSource;
    use super::*;
    use crate::db::migrations::run_migrations;
    use crate::models::prayer::fixtures::karachi_timetable;
    use crate::prayer_times::client::FetchError;
    use chrono::TimeZone;

    fn conn() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        run_migrations(&conn).unwrap();
        conn
    }

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 10, 18, 12, 0, 0).unwrap()
    }

    #[test]
    fn absent_watermark_is_stale() {
        assert!(SyncPolicy::default().is_stale(None, now()));
    }

    #[test]
    fn ten_day_threshold_is_exclusive() {
        let policy = SyncPolicy::default();
        assert!(!policy.is_stale(Some(now() - Duration::days(9)), now()));
        assert!(!policy.is_stale(Some(now() - Duration::days(10)), now()));
        assert!(policy.is_stale(
            Some(now() - Duration::days(10) - Duration::seconds(1)),
            now()
        ));
    }

    #[test]
    fn fresh_cache_skips_the_network() {
        let conn = conn();
        SyncRepo::store(&conn, &karachi_timetable(), now() - Duration::days(2)).unwrap();
        let source = ScriptedSource::ok();

        let timetable = ensure_fresh(&conn, &source, &SyncPolicy::default(), now()).unwrap();

        assert_eq!(source.calls(), 0);
        assert_eq!(timetable, karachi_timetable());
    }

    #[test]
    fn stale_cache_fetches_once_and_restamps() {
        let conn = conn();
        SyncRepo::store(&conn, &karachi_timetable(), now() - Duration::days(11)).unwrap();
        let source = ScriptedSource::ok();

        ensure_fresh(&conn, &source, &SyncPolicy::default(), now()).unwrap();

        assert_eq!(source.calls(), 1);
        assert_eq!(SyncRepo::last_sync(&conn).unwrap(), Some(now()));
    }

    #[test]
    fn failed_fetch_leaves_watermark_untouched() {
        let conn = conn();
        let source = ScriptedSource::failing(FetchError::Network { status: 500 });

        let err = ensure_fresh(&conn, &source, &SyncPolicy::default(), now()).unwrap_err();

        assert!(matches!(
            err.downcast_ref::<FetchError>(),
            Some(FetchError::Network { status: 500 })
        ));
        assert!(SyncRepo::last_sync(&conn).unwrap().is_none());
    }
}
