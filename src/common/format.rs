/// Unit tiers for `to_human`, smallest first
const UNITS: &[&str] = &[
    "Bytes", "KiB", "MiB", "GiB", "TiB", "PiB", "EiB", "ZiB", "YiB",
];

/// Render a byte delta in the largest binary unit whose value is below 1024.
///
/// Uses iterative integer division: on each step the two-digit fraction is
/// taken from the remainder of that step only, so the result truncates
/// rather than rounds. Deltas at or below zero (disk usage grew during the
/// run) render as `0 Bytes`.
pub fn to_human(delta: i128) -> String {
    if delta <= 0 {
        return "0 Bytes".to_string();
    }

    let mut value = delta;
    let mut fraction = 0;
    let mut tier = 0;

    while value >= 1024 && tier < UNITS.len() - 1 {
        fraction = (value % 1024) * 100 / 1024;
        value /= 1024;
        tier += 1;
    }

    if tier == 0 {
        format!("{} {}", value, UNITS[0])
    } else {
        format!("{}.{:02} {}", value, fraction, UNITS[tier])
    }
}

/// Render an optional byte count, `?` when it could not be measured
pub fn format_optional_size(bytes: Option<u64>) -> String {
    match bytes {
        Some(b) => to_human(b as i128),
        None => "?".to_string(),
    }
}

/// Format duration in human-readable form
pub fn format_duration(secs: f64) -> String {
    if secs < 1.0 {
        format!("{:.0}ms", secs * 1000.0)
    } else if secs < 60.0 {
        format!("{:.1}s", secs)
    } else {
        let mins = (secs / 60.0).floor() as u64;
        let remaining = secs - (mins as f64 * 60.0);
        format!("{}m {:.0}s", mins, remaining)
    }
}

/// Truncate a string to max length with ellipsis
pub fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else if max_len <= 3 {
        ".".repeat(max_len)
    } else {
        let head: String = s.chars().take(max_len - 3).collect();
        format!("{}...", head)
    }
}
