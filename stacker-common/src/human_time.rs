//! Human-readable time formatting
//!
//! Pure display transforms for trim ranges and probed durations. Stored
//! values stay in fractional seconds; nothing here feeds back into the model.

/// Format seconds as `HH:MM:SS`
///
/// Fractions are truncated. Negative and non-finite values display as zero.
/// Hours are not wrapped at 24.
///
/// # Examples
///
/// ```
/// use stacker_common::human_time::format_timestamp;
///
/// assert_eq!(format_timestamp(0.0), "00:00:00");
/// assert_eq!(format_timestamp(2341.0), "00:39:01");
/// assert_eq!(format_timestamp(4123.9), "01:08:43");
/// ```
pub fn format_timestamp(seconds: f64) -> String {
    let total = if seconds.is_finite() && seconds > 0.0 {
        seconds.floor() as u64
    } else {
        0
    };

    let (hours, minutes, secs) = (total / 3600, (total / 60) % 60, total % 60);
    format!("{:02}:{:02}:{:02}", hours, minutes, secs)
}

/// Format a `(from, to)` range as `HH:MM:SS - HH:MM:SS`
///
/// ```
/// use stacker_common::human_time::format_range;
///
/// assert_eq!(format_range(5.0, 30.0), "00:00:05 - 00:00:30");
/// ```
pub fn format_range(from: f64, to: f64) -> String {
    format!("{} - {}", format_timestamp(from), format_timestamp(to))
}

/// Format a duration compactly, keeping sub-second precision for short spans
///
/// | Range    | Format    | Example   |
/// |----------|-----------|-----------|
/// | < 60 s   | `S.SSs`   | `7.50s`   |
/// | ≥ 60 s   | `HH:MM:SS`| `00:01:30`|
pub fn format_duration(seconds: f64) -> String {
    if seconds.is_finite() && seconds.abs() < 60.0 {
        format!("{:.2}s", seconds.max(0.0))
    } else {
        format_timestamp(seconds)
    }
}
