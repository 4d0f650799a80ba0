use crate::utils::period::Period;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct Triggers {
    pub time: Vec<TimeTrigger>,
    pub calendar: Vec<CalendarTrigger>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TimeTrigger {
    pub start_boundary: String,
}

/// A calendar trigger carries exactly one schedule shape. The builder
/// never sets more than one of the four options.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct CalendarTrigger {
    pub start_boundary: String,
    pub repetition: Option<RepetitionPattern>,
    pub schedule_by_day: Option<ScheduleByDay>,
    pub schedule_by_week: Option<ScheduleByWeek>,
    pub schedule_by_month: Option<ScheduleByMonth>,
    pub schedule_by_month_day_of_week: Option<ScheduleByMonthDayOfWeek>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RepetitionPattern {
    pub interval: Period,
    pub duration: Period,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ScheduleByDay {
    pub days_interval: u16,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScheduleByWeek {
    pub weeks_interval: u16,
    pub days_of_week: DaysOfWeek,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScheduleByMonth {
    pub days_of_month: DaysOfMonth,
    pub months: Months,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScheduleByMonthDayOfWeek {
    pub days_of_week: DaysOfWeek,
    pub weeks: Weeks,
    pub months: Months,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct DaysOfWeek {
    pub sunday: bool,
    pub monday: bool,
    pub tuesday: bool,
    pub wednesday: bool,
    pub thursday: bool,
    pub friday: bool,
    pub saturday: bool,
}

impl DaysOfWeek {
    pub fn is_empty(&self) -> bool {
        self == &DaysOfWeek::default()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct Months {
    pub january: bool,
    pub february: bool,
    pub march: bool,
    pub april: bool,
    pub may: bool,
    pub june: bool,
    pub july: bool,
    pub august: bool,
    pub september: bool,
    pub october: bool,
    pub november: bool,
    pub december: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct DaysOfMonth {
    pub days: Vec<u32>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Week {
    First,
    Second,
    Third,
    Fourth,
    Last,
}

impl Week {
    pub(crate) fn as_str(&self) -> &'static str {
        match self {
            Week::First => "1",
            Week::Second => "2",
            Week::Third => "3",
            Week::Fourth => "4",
            Week::Last => "Last",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Weeks {
    pub weeks: Vec<Week>,
}

impl Weeks {
    /// Every week of the month, the `Last` marker included.
    pub fn all() -> Self {
        Weeks {
            weeks: vec![
                Week::First,
                Week::Second,
                Week::Third,
                Week::Fourth,
                Week::Last,
            ],
        }
    }
}
