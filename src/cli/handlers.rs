use anyhow::{anyhow, Result};
use chrono::{DateTime, Utc};
use rusqlite::Connection;

use crate::config::AppConfig;
use crate::db::repository::SyncRepo;
use crate::models::{DelayTimes, PrayerName, Timetable};
use crate::prayer_times::sync::{ensure_fresh, fetch_and_store};
use crate::prayer_times::{AladhanClient, FetchError, SyncPolicy, TimingsSource};
use crate::utils::format::format_age_secs;

// ─── ANSI helpers ────────────────────────────────────────────────────────────

macro_rules! println_colored {
    ($color:expr, $($arg:tt)*) => {{
        print!("{}", $color);
        print!($($arg)*);
        println!("\x1b[0m");
    }};
}

const GREEN: &str = "\x1b[32m";
const AMBER: &str = "\x1b[33m";
const DIM: &str = "\x1b[2m";
const BOLD: &str = "\x1b[1m";
const GOLD: &str = "\x1b[38;2;196;160;68m";

const RETRY_HINT: &str = "Please try again later or contact support if the problem persists.";

/// Collapse a fetch failure into the message users see. `main` prints it.
fn user_facing(err: anyhow::Error) -> anyhow::Error {
    if let Some(fetch) = err.downcast_ref::<FetchError>() {
        return anyhow!("{}\n  {}", fetch.user_message(), RETRY_HINT);
    }
    err
}

// ─── Times ───────────────────────────────────────────────────────────────────

/// One printed line of the `times` table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimesRow {
    pub prayer: PrayerName,
    pub time: String,
    pub adjusted: String,
    pub delay: u32,
}

pub fn delays_from_args(delay_args: &[(PrayerName, u32)]) -> DelayTimes {
    let mut delays = DelayTimes::default();
    for (prayer, minutes) in delay_args {
        delays.set(*prayer, *minutes);
    }
    delays
}

pub fn timetable_rows(timetable: &Timetable, delays: &DelayTimes) -> Vec<TimesRow> {
    PrayerName::all()
        .into_iter()
        .map(|prayer| {
            let time = timetable.timings.time_of(prayer);
            TimesRow {
                prayer,
                time: time.to_string(),
                adjusted: delays
                    .adjusted(prayer, time)
                    .unwrap_or_else(|| "--:--".to_string()),
                delay: delays.get(prayer),
            }
        })
        .collect()
}

/// Cached timings when fresh, otherwise fetched through `source`.
pub fn load_times(
    conn: &Connection,
    source: &dyn TimingsSource,
    policy: &SyncPolicy,
    now: DateTime<Utc>,
) -> Result<Timetable> {
    ensure_fresh(conn, source, policy, now).map_err(user_facing)
}

pub fn handle_times(
    conn: &Connection,
    config: &AppConfig,
    delay_args: &[(PrayerName, u32)],
) -> Result<()> {
    let client = AladhanClient::new(&config.api, &config.location)?;
    let policy = SyncPolicy::from_config(&config.sync);
    let timetable = load_times(conn, &client, &policy, Utc::now())?;
    let rows = timetable_rows(&timetable, &delays_from_args(delay_args));

    print_timetable(config, &timetable, &rows);
    Ok(())
}

fn print_timetable(config: &AppConfig, timetable: &Timetable, rows: &[TimesRow]) {
    let date = &timetable.date;
    let timings = &timetable.timings;

    println!();
    println_colored!(
        GOLD,
        "  Prayer Times — {}, {}",
        config.location.city,
        config.location.country
    );
    println_colored!(DIM, "  {}", date.readable);
    println_colored!(DIM, "  Hijri: {}", date.hijri.formatted());
    println_colored!(DIM, "  Gregorian: {}", date.gregorian.formatted());
    println!();
    println_colored!(
        AMBER,
        "  Sunrise: {}    Sunset: {}",
        timings.sunrise,
        timings.sunset
    );
    println!();
    println_colored!(
        DIM,
        "  {:<10}  {:<6}  {:<13}  {}",
        "Prayer",
        "Time",
        "Adjusted Time",
        "Delay (minutes)"
    );

    for row in rows {
        let color = if row.delay > 0 { AMBER } else { BOLD };
        println_colored!(
            color,
            "  {:<10}  {:<6}  {:<13}  {}",
            row.prayer.display_name(),
            row.time,
            row.adjusted,
            row.delay
        );
    }
    println!();
}

// ─── Sync ────────────────────────────────────────────────────────────────────

/// Fetch regardless of the watermark. `clear` drops the cache first, so a
/// failed fetch leaves nothing behind.
pub fn sync_now(
    conn: &Connection,
    source: &dyn TimingsSource,
    clear: bool,
    now: DateTime<Utc>,
) -> Result<Timetable> {
    if clear {
        SyncRepo::clear(conn)?;
        log::info!("Cleared cached prayer times");
    }
    fetch_and_store(conn, source, now).map_err(user_facing)
}

pub fn handle_sync(conn: &Connection, config: &AppConfig, clear: bool) -> Result<()> {
    let client = AladhanClient::new(&config.api, &config.location)?;
    log::debug!("Syncing from {}", client.endpoint());
    if clear {
        println_colored!(DIM, "  Clearing cached prayer times");
    }
    let timetable = sync_now(conn, &client, clear, Utc::now())?;
    println_colored!(
        GREEN,
        "  ✓ Prayer times synced for {} ({})",
        config.location.city,
        timetable.date.readable
    );
    Ok(())
}

// ─── Status ──────────────────────────────────────────────────────────────────

pub fn handle_status(conn: &Connection, config: &AppConfig) -> Result<()> {
    let policy = SyncPolicy::from_config(&config.sync);
    let now = Utc::now();

    println!();
    println_colored!(
        GOLD,
        "  {}, {} (method {})",
        config.location.city,
        config.location.country,
        config.location.method
    );

    match SyncRepo::last_sync(conn)? {
        None => {
            println_colored!(AMBER, "  Never synced — the next run will fetch");
        }
        Some(at) => {
            let age = format_age_secs((now - at).num_seconds());
            if policy.is_stale(Some(at), now) {
                println_colored!(
                    AMBER,
                    "  Last synced {} ago — stale, the next run will fetch",
                    age
                );
            } else {
                println_colored!(GREEN, "  Last synced {} ago — fresh", age);
            }
        }
    }
    println_colored!(
        DIM,
        "  Refreshes after {} days, checked every {} hours",
        config.sync.stale_after_days,
        config.sync.check_interval_hours
    );
    println!();
    Ok(())
}
