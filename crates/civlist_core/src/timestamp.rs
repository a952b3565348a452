use std::time::{SystemTime, UNIX_EPOCH};

use anyhow::{Context, Result};

const SECONDS_PER_DAY: u64 = 86_400;

/// MediaWiki UTC timestamp for `days` days before now, in the
/// YYYY-MM-DDTHH:MM:SSZ format every revision query expects.
pub fn cutoff_timestamp(days: u64) -> Result<String> {
    let now = unix_timestamp()?;
    let cutoff = now.saturating_sub(days.saturating_mul(SECONDS_PER_DAY));
    Ok(format_timestamp(cutoff))
}

pub fn format_timestamp(unix_seconds: u64) -> String {
    let days = unix_seconds / SECONDS_PER_DAY;
    let seconds_of_day = unix_seconds % SECONDS_PER_DAY;
    let (year, month, day) = civil_from_days(days);
    format!(
        "{year:04}-{month:02}-{day:02}T{:02}:{:02}:{:02}Z",
        seconds_of_day / 3_600,
        (seconds_of_day / 60) % 60,
        seconds_of_day % 60
    )
}

// Era-based conversion from days since 1970-01-01 to a civil date. Only
// valid for non-negative day counts, which is all a cutoff ever is.
fn civil_from_days(days_since_epoch: u64) -> (u64, u64, u64) {
    let z = days_since_epoch + 719_468;
    let era = z / 146_097;
    let doe = z % 146_097;
    let yoe = (doe - doe / 1_460 + doe / 36_524 - doe / 146_096) / 365;
    let doy = doe - (365 * yoe + yoe / 4 - yoe / 100);
    let mp = (5 * doy + 2) / 153;
    let day = doy - (153 * mp + 2) / 5 + 1;
    let month = if mp < 10 { mp + 3 } else { mp - 9 };
    let year = yoe + era * 400 + u64::from(month <= 2);
    (year, month, day)
}

fn unix_timestamp() -> Result<u64> {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .context("system clock is before UNIX_EPOCH")
        .map(|duration| duration.as_secs())
}
