use anyhow::{anyhow, Context, Result};
use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension};

use crate::models::Timetable;

const LAST_SYNC_KEY: &str = "last_sync";

fn parse_stamp(s: &str) -> Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| anyhow!("Bad sync timestamp '{}': {}", s, e))
}

// ─── Sync watermark + last timetable ─────────────────────────────────────────

pub struct SyncRepo;

impl SyncRepo {
    /// When timings were last fetched successfully, if ever.
    pub fn last_sync(conn: &Connection) -> Result<Option<DateTime<Utc>>> {
        let value: Option<String> = conn
            .query_row(
                "SELECT value FROM sync_meta WHERE key = ?1",
                params![LAST_SYNC_KEY],
                |row| row.get(0),
            )
            .optional()?;

        value.as_deref().map(parse_stamp).transpose()
    }

    pub fn load_timetable(conn: &Connection) -> Result<Option<Timetable>> {
        let payload: Option<String> = conn
            .query_row(
                "SELECT payload FROM timetable_cache WHERE id = 1",
                [],
                |row| row.get(0),
            )
            .optional()?;

        match payload {
            None => Ok(None),
            Some(json) => {
                let timetable =
                    serde_json::from_str(&json).context("Decoding cached timetable")?;
                Ok(Some(timetable))
            }
        }
    }

    /// Replace the cached timetable and stamp the watermark in one transaction.
    pub fn store(conn: &Connection, timetable: &Timetable, at: DateTime<Utc>) -> Result<()> {
        let payload = serde_json::to_string(timetable).context("Encoding timetable")?;
        let stamp = at.to_rfc3339();

        let tx = conn.unchecked_transaction()?;
        tx.execute(
            "INSERT OR REPLACE INTO timetable_cache (id, payload, fetched_at)
             VALUES (1, ?1, ?2)",
            params![payload, stamp],
        )?;
        tx.execute(
            "INSERT OR REPLACE INTO sync_meta (key, value) VALUES (?1, ?2)",
            params![LAST_SYNC_KEY, stamp],
        )?;
        tx.commit()?;
        Ok(())
    }

    pub fn clear(conn: &Connection) -> Result<()> {
        conn.execute("DELETE FROM timetable_cache", [])?;
        conn.execute(
            "DELETE FROM sync_meta WHERE key = ?1",
            params![LAST_SYNC_KEY],
        )?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::migrations::run_migrations;
    use crate::models::prayer::fixtures::karachi_timetable;
    use chrono::TimeZone;

    fn conn() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        run_migrations(&conn).unwrap();
        conn
    }

    #[test]
    fn empty_store_has_no_watermark() {
        let conn = conn();
        assert!(SyncRepo::last_sync(&conn).unwrap().is_none());
        assert!(SyncRepo::load_timetable(&conn).unwrap().is_none());
    }

    #[test]
    fn store_persists_watermark_and_timetable() {
        let conn = conn();
        let at = Utc.with_ymd_and_hms(2026, 10, 18, 9, 30, 0).unwrap();
        let timetable = karachi_timetable();

        SyncRepo::store(&conn, &timetable, at).unwrap();

        assert_eq!(SyncRepo::last_sync(&conn).unwrap(), Some(at));
        assert_eq!(SyncRepo::load_timetable(&conn).unwrap(), Some(timetable));
    }

    #[test]
    fn store_replaces_previous_sync() {
        let conn = conn();
        let first = Utc.with_ymd_and_hms(2026, 10, 1, 0, 0, 0).unwrap();
        let second = Utc.with_ymd_and_hms(2026, 10, 12, 0, 0, 0).unwrap();
        let mut timetable = karachi_timetable();

        SyncRepo::store(&conn, &timetable, first).unwrap();
        timetable.timings.fajr = "05:30".to_string();
        SyncRepo::store(&conn, &timetable, second).unwrap();

        assert_eq!(SyncRepo::last_sync(&conn).unwrap(), Some(second));
        let cached = SyncRepo::load_timetable(&conn).unwrap().unwrap();
        assert_eq!(cached.timings.fajr, "05:30");
    }

    #[test]
    fn clear_forgets_everything() {
        let conn = conn();
        let at = Utc.with_ymd_and_hms(2026, 10, 18, 9, 30, 0).unwrap();
        SyncRepo::store(&conn, &karachi_timetable(), at).unwrap();

        SyncRepo::clear(&conn).unwrap();

        assert!(SyncRepo::last_sync(&conn).unwrap().is_none());
        assert!(SyncRepo::load_timetable(&conn).unwrap().is_none());
    }
}
