//! Human-readable elapsed time formatting
//!
//! Used for stage and run durations in pipeline statistics.

use std::time::Duration;

/// Below this many seconds → `X.XXs`
const SHORT_FORMAT_MAX: u64 = 100;
/// Below this many seconds → `M:SS.Xs`, otherwise `H:MM:SS`
const MEDIUM_FORMAT_MAX: u64 = 6000;

/// Format an elapsed duration for log output.
///
/// - Short format (`X.XXs`): under 100 seconds
/// - Medium format (`M:SS.Xs`): 100 seconds to 100 minutes
/// - Long format (`H:MM:SS`): 100 minutes and above
///
/// # Examples
///
/// ```
/// use std::time::Duration;
/// use mla_common::human_time::format_elapsed;
///
/// assert_eq!(format_elapsed(Duration::from_millis(420)), "0.42s");
/// assert_eq!(format_elapsed(Duration::from_secs(330)), "5:30.0s");
/// assert_eq!(format_elapsed(Duration::from_secs(7261)), "2:01:01");
/// ```
pub fn format_elapsed(elapsed: Duration) -> String {
    let whole_seconds = elapsed.as_secs();

    if whole_seconds < SHORT_FORMAT_MAX {
        format!("{:.2}s", elapsed.as_secs_f64())
    } else if whole_seconds < MEDIUM_FORMAT_MAX {
        let minutes = whole_seconds / 60;
        let secs = elapsed.as_secs_f64() - (minutes * 60) as f64;
        format!("{}:{:04.1}s", minutes, secs)
    } else {
        let hours = whole_seconds / 3600;
        let mins = (whole_seconds % 3600) / 60;
        let secs = whole_seconds % 60;
        format!("{}:{:02}:{:02}", hours, mins, secs)
    }
}
