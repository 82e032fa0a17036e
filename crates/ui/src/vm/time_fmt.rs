use chrono::{DateTime, Utc};

#[must_use]
pub fn format_datetime(value: DateTime<Utc>) -> String {
    value.format("%Y-%m-%d %H:%M UTC").to_string()
}

#[must_use]
pub fn format_time_of_day(value: DateTime<Utc>) -> String {
    value.format("%H:%M:%S").to_string()
}

/// Countdown label: `MM:SS`, or `HH:MM:SS` from one hour up.
#[must_use]
pub fn format_countdown(total_secs: u32) -> String {
    let hours = total_secs / 3600;
    let minutes = (total_secs % 3600) / 60;
    let seconds = total_secs % 60;
    if hours > 0 {
        format!("{hours:02}:{minutes:02}:{seconds:02}")
    } else {
        format!("{minutes:02}:{seconds:02}")
    }
}

#[must_use]
pub fn format_duration_minutes(minutes: u32) -> String {
    match minutes {
        1 => "1 minute".to_string(),
        m if m >= 60 && m % 60 == 0 => {
            let hours = m / 60;
            if hours == 1 {
                "1 hour".to_string()
            } else {
                format!("{hours} hours")
            }
        }
        m => format!("{m} minutes"),
    }
}
