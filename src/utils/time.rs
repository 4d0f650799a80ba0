use chrono::{Local, NaiveDateTime, Timelike};

/// Local datetime format used for `StartBoundary` and `RegistrationInfo/Date`.
/// No timezone suffix: the Task Scheduler interprets these as local time.
pub(crate) const DATE_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

/// Current local time truncated to second resolution.
pub(crate) fn local_now() -> NaiveDateTime {
    let now = Local::now().naive_local();
    now.with_nanosecond(0).unwrap_or(now)
}

pub(crate) fn format_datetime(datetime: &NaiveDateTime) -> String {
    datetime.format(DATE_FORMAT).to_string()
}
