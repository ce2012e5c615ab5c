use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// The five daily prayers that carry an adjustable delay.
/// Sunrise and sunset are reported by the API but are not prayers here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PrayerName {
    Fajr,
    Dhuhr,
    Asr,
    Maghrib,
    Isha,
}

impl PrayerName {
    pub fn all() -> [PrayerName; 5] {
        [
            PrayerName::Fajr,
            PrayerName::Dhuhr,
            PrayerName::Asr,
            PrayerName::Maghrib,
            PrayerName::Isha,
        ]
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            PrayerName::Fajr => "Fajr",
            PrayerName::Dhuhr => "Dhuhr",
            PrayerName::Asr => "Asr",
            PrayerName::Maghrib => "Maghrib",
            PrayerName::Isha => "Isha",
        }
    }
}

impl std::fmt::Display for PrayerName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

impl FromStr for PrayerName {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "fajr" => Ok(PrayerName::Fajr),
            "dhuhr" | "zuhr" | "dhuhur" => Ok(PrayerName::Dhuhr),
            "asr" => Ok(PrayerName::Asr),
            "maghrib" => Ok(PrayerName::Maghrib),
            "isha" => Ok(PrayerName::Isha),
            _ => Err(anyhow::anyhow!("Unknown prayer: {}", s)),
        }
    }
}

/// Times of day as returned by the timings API, verbatim `HH:MM` strings.
/// Keys the API adds beyond these seven (Imsak, Midnight, ...) are ignored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct PrayerTimings {
    pub fajr: String,
    pub sunrise: String,
    pub dhuhr: String,
    pub asr: String,
    pub sunset: String,
    pub maghrib: String,
    pub isha: String,
}

impl PrayerTimings {
    pub fn time_of(&self, prayer: PrayerName) -> &str {
        match prayer {
            PrayerName::Fajr => &self.fajr,
            PrayerName::Dhuhr => &self.dhuhr,
            PrayerName::Asr => &self.asr,
            PrayerName::Maghrib => &self.maghrib,
            PrayerName::Isha => &self.isha,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonthName {
    pub en: String,
}

/// One calendar's view of the current date.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalendarDate {
    /// Full `DD-MM-YYYY` date string.
    #[serde(default)]
    pub date: String,
    #[serde(default)]
    pub day: String,
    pub month: MonthName,
    pub year: String,
}

impl CalendarDate {
    /// "day month year", e.g. "14 Rabi al-thani 1446". The full `date`
    /// string stands in when the API omits `day`.
    pub fn formatted(&self) -> String {
        let day = if self.day.is_empty() {
            self.date.as_str()
        } else {
            self.day.as_str()
        };
        format!("{} {} {}", day, self.month.en, self.year)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateInfo {
    pub readable: String,
    pub hijri: CalendarDate,
    pub gregorian: CalendarDate,
}

/// Everything one successful fetch produces.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Timetable {
    pub timings: PrayerTimings,
    pub date: DateInfo,
}

#[cfg(test)]
pub(crate) mod fixtures {
    use super::*;

    pub fn karachi_timetable() -> Timetable {
        let calendar = |date: &str, day: &str, month: &str, year: &str| CalendarDate {
            date: date.to_string(),
            day: day.to_string(),
            month: MonthName {
                en: month.to_string(),
            },
            year: year.to_string(),
        };
        Timetable {
            timings: PrayerTimings {
                fajr: "05:21".to_string(),
                sunrise: "06:40".to_string(),
                dhuhr: "12:29".to_string(),
                asr: "15:48".to_string(),
                sunset: "18:17".to_string(),
                maghrib: "18:17".to_string(),
                isha: "19:33".to_string(),
            },
            date: DateInfo {
                readable: "18 Oct 2026".to_string(),
                hijri: calendar("07-05-1448", "7", "Jumādá al-ūlá", "1448"),
                gregorian: calendar("18-10-2026", "18", "October", "2026"),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prayer_names_parse_case_insensitively() {
        assert_eq!("FAJR".parse::<PrayerName>().unwrap(), PrayerName::Fajr);
        assert_eq!("zuhr".parse::<PrayerName>().unwrap(), PrayerName::Dhuhr);
        assert!("sunrise".parse::<PrayerName>().is_err());
    }

    #[test]
    fn timings_deserialize_from_api_keys() {
        let json = r#"{
            "Fajr": "05:21", "Sunrise": "06:40", "Dhuhr": "12:29", "Asr": "15:48",
            "Sunset": "18:17", "Maghrib": "18:17", "Isha": "19:33",
            "Imsak": "05:11", "Midnight": "00:29"
        }"#;
        let timings: PrayerTimings = serde_json::from_str(json).unwrap();
        assert_eq!(timings.time_of(PrayerName::Asr), "15:48");
        assert_eq!(timings.sunset, "18:17");
    }

    #[test]
    fn calendar_date_prefers_day_over_full_date() {
        let mut date = fixtures::karachi_timetable().date.gregorian;
        assert_eq!(date.date, "18-10-2026");
        assert_eq!(date.formatted(), "18 October 2026");

        date.day.clear();
        date.date = "18-10-2026".to_string();
        assert_eq!(date.formatted(), "18-10-2026 October 2026");
    }

    #[test]
    fn hijri_line_uses_day_when_envelope_carries_both() {
        let json = r#"{
            "readable": "18 Oct 2026",
            "timestamp": "1792281600",
            "hijri": {
                "date": "07-05-1448", "day": "7",
                "weekday": { "en": "Al Ahad" },
                "month": { "number": 5, "en": "Jumada" },
                "year": "1448"
            },
            "gregorian": {
                "date": "18-10-2026", "day": "18",
                "month": { "number": 10, "en": "October" },
                "year": "2026"
            }
        }"#;
        let info: DateInfo = serde_json::from_str(json).unwrap();
        assert_eq!(info.hijri.date, "07-05-1448");
        assert_eq!(info.hijri.formatted(), "7 Jumada 1448");
        assert_eq!(info.gregorian.formatted(), "18 October 2026");
    }
}
