use url::Url;

pub const TIMER_ROUTE: &str = "/timer";

/// Location a timer window is opened at, e.g. `/timer?duration=25`.
pub fn timer_location(minutes: u32) -> String {
    format!("{TIMER_ROUTE}?duration={minutes}")
}

/// Countdown length in seconds for a timer window opened at `location`.
///
/// The `duration` query parameter (whole minutes) is the only duration source a
/// timer window honours. Absent, non-numeric or non-positive values fall back
/// to `default_minutes`.
pub fn countdown_seconds(location: &str, default_minutes: u32) -> u64 {
    let minutes = duration_param(location)
        .filter(|m| *m > 0)
        .unwrap_or(i64::from(default_minutes));
    minutes.unsigned_abs() * 60
}

fn duration_param(location: &str) -> Option<i64> {
    let base = Url::parse("http://localhost/").ok()?;
    let url = base.join(location).ok()?;
    let value = url
        .query_pairs()
        .find(|(key, _)| key == "duration")
        .map(|(_, value)| value.into_owned())?;
    value.trim().parse::<i64>().ok()
}
