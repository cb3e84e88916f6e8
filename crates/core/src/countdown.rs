//! Time left until the daily shop rotation at 00:00 UTC.

use chrono::{DateTime, Duration, Utc};

/// Non-negative time remaining until the next 00:00 UTC.
pub fn time_until_reset(now: DateTime<Utc>) -> Duration {
    now.date_naive()
        .succ_opt()
        .and_then(|tomorrow| tomorrow.and_hms_opt(0, 0, 0))
        .map(|reset| reset.and_utc() - now)
        .unwrap_or_else(Duration::zero)
        .max(Duration::zero())
}

/// Render a duration as zero-padded `HH:MM:SS`.
pub fn format_countdown(remaining: Duration) -> String {
    let secs = remaining.num_seconds().max(0);
    format!(
        "{:02}:{:02}:{:02}",
        secs / 3600,
        (secs % 3600) / 60,
        secs % 60
    )
}
