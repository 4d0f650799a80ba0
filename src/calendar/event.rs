use super::{error::CalendarError, field::Field};
use chrono::{Datelike, Days, Duration, NaiveDate, NaiveDateTime, NaiveTime};
use serde::Serialize;
use std::fmt;

/// Forward search window for `next`, in days.
const SEARCH_HORIZON_DAYS: u64 = 3653;

const WEEKDAY_NAMES: [&str; 8] = ["Sun", "Mon", "Tue", "Wed", "Thu", "Fri", "Sat", "Sun"];

/// A systemd-style calendar event: one constraint per component. Wildcard
/// fields match their whole domain. Weekday 0 is Sunday; 7 is accepted as
/// a synonym for Sunday everywhere a weekday is read.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Event {
    pub seconds: Field,
    pub minutes: Field,
    pub hours: Field,
    pub day: Field,
    pub month: Field,
    pub week_day: Field,
    pub year: Field,
}

/// How an event maps onto the native scheduler trigger shapes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventClass {
    TimeOnly,
    Daily,
    Weekly,
    Monthly,
    Unsupported,
}

impl Event {
    /// A fully wildcard event.
    pub fn new() -> Self {
        Event {
            seconds: Field::new(0, 59),
            minutes: Field::new(0, 59),
            hours: Field::new(0, 23),
            day: Field::new(1, 31),
            month: Field::new(1, 12),
            week_day: Field::new(0, 7),
            year: Field::new(1970, 2199),
        }
    }

    /// Classify the event; ties break on the first matching class, in
    /// declaration order.
    pub fn classify(&self) -> EventClass {
        if self.as_time().is_some() {
            return EventClass::TimeOnly;
        }
        let time_constrained =
            self.hours.has_value() || self.minutes.has_value() || self.seconds.has_value();
        let date_free =
            !self.day.has_value() && !self.month.has_value() && !self.year.has_value();

        if !self.week_day.has_value() && date_free && time_constrained {
            return EventClass::Daily;
        }
        if self.week_day.has_value() && date_free {
            return EventClass::Weekly;
        }
        if (self.day.has_value() || self.week_day.has_value()) && !self.year.has_value() {
            return EventClass::Monthly;
        }
        EventClass::Unsupported
    }

    /// The unique instant of a fully specified event. `None` when any of
    /// the six date/time fields is not a singleton or the date does not
    /// exist on the calendar.
    pub fn as_time(&self) -> Option<NaiveDateTime> {
        let year = self.year.single_value()?;
        let month = self.month.single_value()?;
        let day = self.day.single_value()?;
        let hour = self.hours.single_value()?;
        let minute = self.minutes.single_value()?;
        let second = self.seconds.single_value()?;

        let date = NaiveDate::from_ymd_opt(year as i32, month, day)?;
        let time = NaiveTime::from_hms_opt(hour, minute, second)?;
        Some(NaiveDateTime::new(date, time))
    }

    /// Smallest matching instant `>= after`. The clock is never consulted;
    /// the search stops after ten years.
    pub fn next(&self, after: NaiveDateTime) -> Result<NaiveDateTime, CalendarError> {
        let start_date = after.date();
        for offset in 0..=SEARCH_HORIZON_DAYS {
            let date = match start_date.checked_add_days(Days::new(offset)) {
                Some(result) => result,
                None => break,
            };
            if !self.date_matches(date) {
                continue;
            }
            let bound = if offset == 0 { Some(after.time()) } else { None };
            if let Some(time) = self.first_time_at_or_after(bound) {
                return Ok(NaiveDateTime::new(date, time));
            }
        }
        Err(CalendarError::NoFiringInWindow)
    }

    /// Every matching instant in `[from, to)`, ascending.
    pub fn all_in(&self, from: NaiveDateTime, to: NaiveDateTime) -> Vec<NaiveDateTime> {
        let mut found = Vec::new();
        let mut cursor = from;
        while cursor < to {
            match self.next(cursor) {
                Ok(instant) if instant < to => {
                    found.push(instant);
                    cursor = instant + Duration::seconds(1);
                }
                _ => break,
            }
        }
        found
    }

    /// Day-of-month and weekday are a conjunction when both are set.
    fn date_matches(&self, date: NaiveDate) -> bool {
        let year_ok = match u32::try_from(date.year()) {
            Ok(year) => self.year.matches(year),
            Err(_) => !self.year.has_value(),
        };
        if !year_ok || !self.month.matches(date.month()) || !self.day.matches(date.day()) {
            return false;
        }
        if self.week_day.has_value() {
            let weekday = date.weekday().num_days_from_sunday();
            if !self.week_day.matches(weekday) && !(weekday == 0 && self.week_day.matches(7)) {
                return false;
            }
        }
        true
    }

    /// Smallest admissible time of day, at or after `bound` when given.
    fn first_time_at_or_after(&self, bound: Option<NaiveTime>) -> Option<NaiveTime> {
        use chrono::Timelike;

        let (bound_hour, bound_minute, bound_second) = match bound {
            Some(time) => (time.hour(), time.minute(), time.second()),
            None => (0, 0, 0),
        };
        for hour in self.hours.candidates() {
            if hour < bound_hour {
                continue;
            }
            for minute in self.minutes.candidates() {
                if hour == bound_hour && minute < bound_minute {
                    continue;
                }
                for second in self.seconds.candidates() {
                    if hour == bound_hour && minute == bound_minute && second < bound_second {
                        continue;
                    }
                    if let Some(time) = NaiveTime::from_hms_opt(hour, minute, second) {
                        return Some(time);
                    }
                }
            }
        }
        None
    }
}

impl Default for Event {
    fn default() -> Self {
        Event::new()
    }
}

fn field_text(field: &Field, width: usize) -> String {
    if !field.has_value() {
        return String::from("*");
    }
    field
        .values()
        .iter()
        .map(|value| format!("{value:0width$}"))
        .collect::<Vec<String>>()
        .join(",")
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.week_day.has_value() {
            let names: Vec<&str> = self
                .week_day
                .values()
                .iter()
                .map(|value| WEEKDAY_NAMES[*value as usize])
                .collect();
            write!(f, "{} ", names.join(","))?;
        }
        write!(
            f,
            "{}-{}-{} {}:{}:{}",
            field_text(&self.year, 0),
            field_text(&self.month, 2),
            field_text(&self.day, 2),
            field_text(&self.hours, 2),
            field_text(&self.minutes, 2),
            field_text(&self.seconds, 2)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::{Event, EventClass};
    use chrono::{Duration, NaiveDate, NaiveDateTime};

    fn datetime(year: i32, month: u32, day: u32, hour: u32, minute: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(year, month, day)
            .unwrap()
            .and_hms_opt(hour, minute, 0)
            .unwrap()
    }

    fn daily_at(hours: &[u32]) -> Event {
        let mut event = Event::new();
        for hour in hours {
            event.hours.add_value(*hour).unwrap();
        }
        event.minutes.add_value(0).unwrap();
        event.seconds.add_value(0).unwrap();
        event
    }

    #[test]
    fn test_classify_daily() {
        assert_eq!(daily_at(&[3]).classify(), EventClass::Daily);
    }

    #[test]
    fn test_classify_weekly() {
        let mut event = daily_at(&[9]);
        event.week_day.add_value(1).unwrap();
        assert_eq!(event.classify(), EventClass::Weekly);
    }

    #[test]
    fn test_classify_monthly_by_day() {
        let mut event = daily_at(&[2]);
        event.day.add_value(15).unwrap();
        assert_eq!(event.classify(), EventClass::Monthly);
    }

    #[test]
    fn test_classify_monthly_by_weekday_and_month() {
        let mut event = daily_at(&[2]);
        event.week_day.add_value(1).unwrap();
        event.month.add_value(1).unwrap();
        assert_eq!(event.classify(), EventClass::Monthly);
    }

    #[test]
    fn test_classify_time_only() {
        let mut event = Event::new();
        event.year.add_value(2024).unwrap();
        event.month.add_value(6).unwrap();
        event.day.add_value(1).unwrap();
        event.hours.add_value(12).unwrap();
        event.minutes.add_value(30).unwrap();
        event.seconds.add_value(0).unwrap();
        assert_eq!(event.classify(), EventClass::TimeOnly);
        assert_eq!(
            event.as_time(),
            Some(datetime(2024, 6, 1, 12, 30))
        );
    }

    #[test]
    fn test_classify_unsupported() {
        let mut event = daily_at(&[3]);
        event.year.add_value(2024).unwrap();
        assert_eq!(event.classify(), EventClass::Unsupported);
    }

    #[test]
    fn test_as_time_rejects_invalid_date() {
        let mut event = Event::new();
        event.year.add_value(2024).unwrap();
        event.month.add_value(2).unwrap();
        event.day.add_value(30).unwrap();
        event.hours.add_value(0).unwrap();
        event.minutes.add_value(0).unwrap();
        event.seconds.add_value(0).unwrap();
        assert_eq!(event.as_time(), None);
    }

    #[test]
    fn test_next_same_day() {
        let event = daily_at(&[3]);
        let next = event.next(datetime(2024, 1, 1, 0, 0)).unwrap();
        assert_eq!(next, datetime(2024, 1, 1, 3, 0));
    }

    #[test]
    fn test_next_is_inclusive() {
        let event = daily_at(&[3]);
        let next = event.next(datetime(2024, 1, 1, 3, 0)).unwrap();
        assert_eq!(next, datetime(2024, 1, 1, 3, 0));
    }

    #[test]
    fn test_next_rolls_to_following_day() {
        let event = daily_at(&[3]);
        let next = event.next(datetime(2024, 1, 1, 4, 0)).unwrap();
        assert_eq!(next, datetime(2024, 1, 2, 3, 0));
    }

    #[test]
    fn test_next_honours_weekday() {
        let mut event = daily_at(&[9]);
        event.week_day.add_value(1).unwrap();
        // 2024-01-01 is a Monday
        let next = event.next(datetime(2024, 1, 2, 0, 0)).unwrap();
        assert_eq!(next, datetime(2024, 1, 8, 9, 0));
    }

    #[test]
    fn test_next_weekday_seven_is_sunday() {
        let mut event = daily_at(&[9]);
        event.week_day.add_value(7).unwrap();
        let next = event.next(datetime(2024, 1, 1, 0, 0)).unwrap();
        assert_eq!(next, datetime(2024, 1, 7, 9, 0));
    }

    #[test]
    fn test_next_day_and_weekday_conjunction() {
        // day 15 AND a Monday: 2024-01-15 qualifies, 2024-02-15 (Thursday)
        // does not, and the next one after that is 2024-04-15
        let mut event = daily_at(&[0]);
        event.day.add_value(15).unwrap();
        event.week_day.add_value(1).unwrap();
        let next = event.next(datetime(2024, 1, 1, 0, 0)).unwrap();
        assert_eq!(next, datetime(2024, 1, 15, 0, 0));
        let next = event.next(datetime(2024, 1, 16, 0, 0)).unwrap();
        assert_eq!(next, datetime(2024, 4, 15, 0, 0));
    }

    #[test]
    fn test_next_unsatisfiable_event() {
        let mut event = daily_at(&[0]);
        event.month.add_value(2).unwrap();
        event.day.add_value(30).unwrap();
        assert!(event.next(datetime(2024, 1, 1, 0, 0)).is_err());
    }

    #[test]
    fn test_all_in_window() {
        let event = daily_at(&[1, 2, 3, 4]);
        let from = datetime(2024, 1, 1, 1, 0);
        let to = from + Duration::hours(24);
        let recurrences = event.all_in(from, to);
        assert_eq!(
            recurrences,
            vec![
                datetime(2024, 1, 1, 1, 0),
                datetime(2024, 1, 1, 2, 0),
                datetime(2024, 1, 1, 3, 0),
                datetime(2024, 1, 1, 4, 0),
            ]
        );
    }

    #[test]
    fn test_all_in_is_ascending_and_bounded() {
        let mut event = Event::new();
        event.minutes.add_value(0).unwrap();
        event.minutes.add_value(30).unwrap();
        event.seconds.add_value(0).unwrap();
        let from = datetime(2024, 1, 1, 0, 0);
        let to = datetime(2024, 1, 1, 3, 0);
        let recurrences = event.all_in(from, to);
        assert_eq!(recurrences.len(), 6);
        for pair in recurrences.windows(2) {
            assert!(pair[0] < pair[1]);
        }
        for instant in &recurrences {
            assert!(*instant >= from && *instant < to);
        }
    }

    #[test]
    fn test_all_in_empty_for_unsatisfiable() {
        let mut event = daily_at(&[0]);
        event.month.add_value(2).unwrap();
        event.day.add_value(30).unwrap();
        let from = datetime(2024, 1, 1, 0, 0);
        assert!(event.all_in(from, from + Duration::days(365)).is_empty());
    }

    #[test]
    fn test_next_agrees_with_all_in() {
        let event = daily_at(&[5, 11, 17]);
        let from = datetime(2024, 3, 10, 6, 30);
        let next = event.next(from).unwrap();
        let window = event.all_in(from, from + Duration::days(2));
        assert_eq!(Some(&next), window.first());
    }

    #[test]
    fn test_display() {
        let mut event = daily_at(&[3]);
        event.week_day.add_value(1).unwrap();
        assert_eq!(event.to_string(), "Mon *-*-* 03:00:00");
    }

    #[test]
    fn test_display_wildcards() {
        assert_eq!(Event::new().to_string(), "*-*-* *:*:*");
    }
}
