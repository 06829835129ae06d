use std::time::Duration;

use crate::foundation::error::{ReframeError, ReframeResult};

/// Format `t` as `HH:MM:SS.mmm`, truncating below the millisecond.
pub fn format_label(t: Duration) -> String {
    let total_ms = t.as_millis();
    let ms = total_ms % 1000;
    let total_s = total_ms / 1000;
    let s = total_s % 60;
    let m = (total_s / 60) % 60;
    let h = total_s / 3600;
    format!("{h:02}:{m:02}:{s:02}.{ms:03}")
}

/// Format `t` as `HH:MM:SS.fff...` with as many fractional digits as it needs (at least
/// three), so that [`parse_timestamp`] returns exactly `t`.
pub fn format_timestamp(t: Duration) -> String {
    let total_s = t.as_secs();
    let (h, m, s) = (total_s / 3600, (total_s / 60) % 60, total_s % 60);
    let mut frac = format!("{:09}", t.subsec_nanos());
    while frac.len() > 3 && frac.ends_with('0') {
        frac.pop();
    }
    format!("{h:02}:{m:02}:{s:02}.{frac}")
}

/// Parse `HH:MM:SS.mmm`, `MM:SS(.mmm)` or plain seconds into a duration.
///
/// Fractional digits beyond nanoseconds are dropped.
pub fn parse_timestamp(s: &str) -> ReframeResult<Duration> {
    let s = s.trim();
    let bad = || ReframeError::validation(format!("invalid timestamp '{s}' (use HH:MM:SS.mmm)"));

    let parts: Vec<&str> = s.split(':').collect();
    if parts.is_empty() || parts.len() > 3 {
        return Err(bad());
    }

    let (whole_parts, last) = parts.split_at(parts.len() - 1);
    let mut minutes: u64 = 0;
    for (i, p) in whole_parts.iter().enumerate() {
        let v: u64 = p.parse().map_err(|_| bad())?;
        if i > 0 && v >= 60 {
            return Err(bad());
        }
        minutes = minutes.checked_mul(60).ok_or_else(bad)?;
        minutes = minutes.checked_add(v).ok_or_else(bad)?;
    }

    let (int_part, frac_part) = match last[0].split_once('.') {
        Some((i, f)) => (i, f),
        None => (last[0], ""),
    };
    if int_part.is_empty() && frac_part.is_empty() {
        return Err(bad());
    }
    let last_secs: u64 = if int_part.is_empty() {
        0
    } else {
        int_part.parse().map_err(|_| bad())?
    };
    if !whole_parts.is_empty() && last_secs >= 60 {
        return Err(bad());
    }

    let mut nanos: u32 = 0;
    if !frac_part.is_empty() {
        if !frac_part.bytes().all(|b| b.is_ascii_digit()) {
            return Err(bad());
        }
        let digits: String = frac_part.chars().take(9).collect();
        let scale = 10u32.pow(9 - digits.len() as u32);
        nanos = digits.parse::<u32>().map_err(|_| bad())? * scale;
    }

    let secs = minutes
        .checked_mul(60)
        .and_then(|m| m.checked_add(last_secs))
        .ok_or_else(bad)?;
    Ok(Duration::new(secs, nanos))
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/timecode.rs"]
mod tests;
