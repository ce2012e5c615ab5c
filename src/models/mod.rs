pub mod delay;
pub mod prayer;

pub use delay::DelayTimes;
pub use prayer::{DateInfo, PrayerName, PrayerTimings, Timetable};
