use clap::{Parser, Subcommand};

use crate::models::PrayerName;
use crate::utils::format::parse_delay;

#[derive(Parser, Debug)]
#[command(name = "azan", version, about = "Prayer times for your city, with per-prayer delays and an azan toggle")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Print today's prayer times once (fetching only if the cache is stale)
    Times {
        /// Delay a prayer by some minutes, e.g. --delay isha=15 (repeatable)
        #[arg(long = "delay", value_name = "PRAYER=MIN", value_parser = parse_delay_arg)]
        delays: Vec<(PrayerName, u32)>,
    },
    /// Fetch prayer times now, regardless of when they were last synced
    Sync {
        /// Forget the cached timetable and watermark first
        #[arg(long)]
        clear: bool,
    },
    /// Show when prayer times were last synced and whether they are stale
    Status,
}

fn parse_delay_arg(s: &str) -> Result<(PrayerName, u32), String> {
    let (prayer, minutes) = s
        .split_once('=')
        .ok_or_else(|| format!("expected PRAYER=MIN, got '{}'", s))?;
    let prayer = prayer
        .trim()
        .parse::<PrayerName>()
        .map_err(|_| format!("unknown prayer '{}'. Use: fajr, dhuhr, asr, maghrib, isha", prayer))?;
    Ok((prayer, parse_delay(minutes)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn delay_args_parse() {
        let cli = Cli::try_parse_from(["azan", "times", "--delay", "isha=15", "--delay", "Fajr=x"])
            .unwrap();
        match cli.command {
            Some(Commands::Times { delays }) => {
                assert_eq!(delays, vec![(PrayerName::Isha, 15), (PrayerName::Fajr, 0)]);
            }
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn delay_for_sunrise_is_rejected() {
        assert!(Cli::try_parse_from(["azan", "times", "--delay", "sunrise=5"]).is_err());
        assert!(Cli::try_parse_from(["azan", "times", "--delay", "isha"]).is_err());
    }

    #[test]
    fn no_subcommand_means_tui() {
        let cli = Cli::try_parse_from(["azan"]).unwrap();
        assert!(cli.command.is_none());
    }
}
