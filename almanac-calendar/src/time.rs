/// Default times the calendar emits when an organizer set no start time.
const PLACEHOLDER_TIMES: [&str; 2] = ["06:00", "07:00"];

/// Trim a raw time and collapse placeholder defaults to `""`.
///
/// This is a filter, not a parser: anything that is not a placeholder is
/// returned trimmed but otherwise untouched.
///
/// ```
/// use almanac_calendar::time::normalize_time;
///
/// assert_eq!(normalize_time(" 06:00 "), "");
/// assert_eq!(normalize_time("18:30"), "18:30");
/// assert_eq!(normalize_time("All day"), "All day");
/// ```
pub fn normalize_time(raw: &str) -> String {
    let trimmed = raw.trim();
    if PLACEHOLDER_TIMES.contains(&trimmed) {
        return String::new();
    }
    trimmed.to_string()
}
