use chrono::{Duration, NaiveTime};

/// Shift an `HH:MM` base time by `delay_minutes`, wrapping past midnight.
///
/// The API occasionally appends a zone tag ("05:21 (PKT)"); only the leading
/// `HH:MM` token is read. Returns `None` when the base time does not parse.
pub fn adjust_time(base: &str, delay_minutes: u32) -> Option<String> {
    let token = base.split_whitespace().next()?;
    let time = NaiveTime::parse_from_str(token, "%H:%M").ok()?;
    let adjusted = time + Duration::minutes(i64::from(delay_minutes));
    Some(format_time(adjusted))
}

/// Read a delay from raw user input the way a numeric input field would:
/// leading digits count, anything else (including an empty field) is zero.
pub fn parse_delay(input: &str) -> u32 {
    let digits: String = input
        .trim_start()
        .chars()
        .take_while(|c| c.is_ascii_digit())
        .collect();
    if digits.is_empty() {
        return 0;
    }
    digits.parse::<u32>().unwrap_or(u32::MAX)
}

/// Format a NaiveTime to "HH:MM"
pub fn format_time(t: NaiveTime) -> String {
    t.format("%H:%M").to_string()
}

/// Format an age in seconds to "Xd Yh", "Xh Ym" or "Ym"
pub fn format_age_secs(secs: i64) -> String {
    if secs < 60 {
        return "just now".to_string();
    }
    let days = secs / 86_400;
    let hours = (secs % 86_400) / 3600;
    let minutes = (secs % 3600) / 60;
    if days > 0 {
        format!("{}d {}h", days, hours)
    } else if hours > 0 {
        format!("{}h {}m", hours, minutes)
    } else {
        format!("{}m", minutes)
    }
}
