//! Playback duration formatting for the receiver's time labels
//!
//! Labels are zero-padded clock strings: `MM:SS` below one hour,
//! `HH:MM:SS` from one hour up.

const SECONDS_PER_MINUTE: u64 = 60;
const SECONDS_PER_HOUR: u64 = 3600;

/// Format a playback position or duration in seconds as a clock label.
///
/// Fractional seconds are truncated. Negative and non-finite inputs
/// (unknown duration, live streams) format as `00:00`.
///
/// # Examples
///
/// ```
/// use sms_common::human_time::format_duration;
///
/// assert_eq!(format_duration(65.0), "01:05");
/// assert_eq!(format_duration(3725.0), "01:02:05");
/// assert_eq!(format_duration(59.9), "00:59");
/// ```
pub fn format_duration(seconds: f64) -> String {
    let total = if seconds.is_finite() && seconds > 0.0 {
        seconds.floor() as u64
    } else {
        0
    };

    let hours = total / SECONDS_PER_HOUR;
    let minutes = (total / SECONDS_PER_MINUTE) % 60;
    let secs = total % SECONDS_PER_MINUTE;

    if hours == 0 {
        format!("{:02}:{:02}", minutes, secs)
    } else {
        format!("{:02}:{:02}:{:02}", hours, minutes, secs)
    }
}

/// Format an optional duration, returning an empty label when unknown.
///
/// Used for the total-time label, which is blanked for unbounded media.
///
/// # Examples
///
/// ```
/// use sms_common::human_time::format_duration_opt;
///
/// assert_eq!(format_duration_opt(Some(65.0)), "01:05");
/// assert_eq!(format_duration_opt(None), "");
/// assert_eq!(format_duration_opt(Some(f64::NAN)), "");
/// ```
pub fn format_duration_opt(seconds: Option<f64>) -> String {
    match seconds {
        Some(s) if s.is_finite() => format_duration(s),
        _ => String::new(),
    }
}
