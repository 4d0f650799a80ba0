/**
 * Windows Task Scheduler document builder.
 *
 * Each calendar event is turned into the tightest trigger shape the task
 * schema can express: a single `ScheduleBy*` trigger when the recurrences
 * repeat at a fixed interval, one trigger per recurrence otherwise, up to
 * a hard cap. Schedules the schema cannot represent are skipped with a
 * warning; the builder itself never fails.
 */
use super::differences::{detect, Repetition};
use super::schema::actions::{Actions, ExecAction};
use super::schema::principals::{LogonType, Principal, Principals, RunLevel};
use super::schema::registration::RegistrationInfo;
use super::schema::settings::Settings;
use super::schema::triggers::{
    CalendarTrigger, DaysOfMonth, DaysOfWeek, Months, RepetitionPattern, ScheduleByDay,
    ScheduleByMonth, ScheduleByMonthDayOfWeek, ScheduleByWeek, TimeTrigger, Triggers, Weeks,
};
use crate::calendar::{CalendarError, Event, EventClass};
use crate::structs::options::TaskOptions;
use crate::utils::environment::current_user_sid;
use crate::utils::period::Period;
use crate::utils::time::{format_datetime, local_now};
use chrono::{Duration, NaiveDateTime};
use log::warn;
use serde::Serialize;

pub(crate) const TASK_SCHEMA: &str = "http://schemas.microsoft.com/windows/2004/02/mit/task";
pub(crate) const TASK_SCHEMA_VERSION: &str = "1.2";
pub(crate) const APPLICATION_NAME: &str = "taskcal";

/// Principal id, also used as the action execution context.
pub(crate) const AUTHOR: &str = "Author";

/// Hard cap on the number of triggers a single task may carry.
pub const MAX_TRIGGERS: usize = 48;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Task {
    pub registration_info: RegistrationInfo,
    pub triggers: Triggers,
    pub principals: Principals,
    pub settings: Settings,
    pub actions: Actions,
    #[serde(skip)]
    max_triggers: usize,
}

impl Task {
    pub fn new() -> Self {
        Task {
            registration_info: RegistrationInfo {
                date: format_datetime(&local_now()),
                author: APPLICATION_NAME.to_string(),
                description: None,
                uri: None,
                security_descriptor: None,
            },
            triggers: Triggers::default(),
            principals: Principals {
                principal: Principal {
                    id: AUTHOR.to_string(),
                    user_id: current_user_sid(),
                    logon_type: LogonType::InteractiveToken,
                    run_level: RunLevel::LeastPrivilege,
                },
            },
            settings: Settings::default(),
            actions: Actions {
                context: AUTHOR.to_string(),
                exec: Vec::new(),
            },
            max_triggers: MAX_TRIGGERS,
        }
    }

    pub fn add_exec_action(&mut self, action: ExecAction) {
        self.actions.exec.push(action);
    }

    /// Convert each event into triggers, anchored at the current time.
    pub fn add_schedules(&mut self, schedules: &[Event]) {
        self.add_schedules_from(schedules, local_now());
    }

    pub(crate) fn add_schedules_from(&mut self, schedules: &[Event], now: NaiveDateTime) {
        for schedule in schedules {
            match schedule.classify() {
                EventClass::TimeOnly => {
                    if let Some(once) = schedule.as_time() {
                        self.add_time_trigger(&once);
                    }
                }
                EventClass::Daily => self.add_daily_trigger(schedule, now),
                EventClass::Weekly => self.add_weekly_trigger(schedule, now),
                EventClass::Monthly => self.add_monthly_trigger(schedule, now),
                EventClass::Unsupported => {
                    warn!("[schtasks] cannot convert schedule '{schedule}' into a task scheduler trigger");
                }
            }
        }
    }

    #[cfg(test)]
    pub(crate) fn set_max_triggers(&mut self, cap: usize) {
        self.max_triggers = cap;
    }

    fn add_time_trigger(&mut self, once: &NaiveDateTime) {
        self.triggers.time.push(TimeTrigger {
            start_boundary: format_datetime(once),
        });
    }

    fn add_calendar_trigger(&mut self, trigger: CalendarTrigger) {
        self.triggers.calendar.push(trigger);
    }

    /// The recurrences of one day starting at the next occurrence, or
    /// `None` when the event never fires.
    fn day_of_recurrences(
        &self,
        schedule: &Event,
        now: NaiveDateTime,
    ) -> Option<Vec<NaiveDateTime>> {
        let start = match schedule.next(now) {
            Ok(result) => result,
            Err(_) => return None,
        };
        let recurrences = schedule.all_in(start, start + Duration::hours(24));
        if recurrences.is_empty() {
            None
        } else {
            Some(recurrences)
        }
    }

    fn too_many_triggers(&self, count: usize) -> bool {
        if count > self.max_triggers {
            warn!(
                "[schtasks] this task would need more than {} triggers ({} in total), please rethink your schedule",
                self.max_triggers, count
            );
            return true;
        }
        false
    }

    fn add_daily_trigger(&mut self, schedule: &Event, now: NaiveDateTime) {
        let Some(recurrences) = self.day_of_recurrences(schedule, now) else {
            warn!("[schtasks] cannot convert schedule '{schedule}' into a daily trigger");
            return;
        };
        match detect(&recurrences) {
            Repetition::Single(once) => self.add_calendar_trigger(CalendarTrigger {
                start_boundary: format_datetime(&once),
                schedule_by_day: Some(ScheduleByDay { days_interval: 1 }),
                ..CalendarTrigger::default()
            }),
            Repetition::Uniform {
                start,
                interval,
                duration,
            } => self.add_calendar_trigger(CalendarTrigger {
                start_boundary: format_datetime(&start),
                repetition: Some(RepetitionPattern {
                    interval: Period::from_duration(&interval),
                    duration: Period::from_duration(&duration),
                }),
                schedule_by_day: Some(ScheduleByDay { days_interval: 1 }),
                ..CalendarTrigger::default()
            }),
            Repetition::Irregular => {
                if self.too_many_triggers(recurrences.len()) {
                    return;
                }
                for recurrence in &recurrences {
                    self.add_calendar_trigger(CalendarTrigger {
                        start_boundary: format_datetime(recurrence),
                        schedule_by_day: Some(ScheduleByDay { days_interval: 1 }),
                        ..CalendarTrigger::default()
                    });
                }
            }
        }
    }

    fn add_weekly_trigger(&mut self, schedule: &Event, now: NaiveDateTime) {
        let Some(recurrences) = self.day_of_recurrences(schedule, now) else {
            warn!("[schtasks] cannot convert schedule '{schedule}' into a weekly trigger");
            return;
        };
        let by_week = ScheduleByWeek {
            weeks_interval: 1,
            days_of_week: convert_weekdays(&schedule.week_day.values()),
        };
        match detect(&recurrences) {
            Repetition::Single(once) => self.add_calendar_trigger(CalendarTrigger {
                start_boundary: format_datetime(&once),
                schedule_by_week: Some(by_week),
                ..CalendarTrigger::default()
            }),
            Repetition::Uniform {
                start,
                interval,
                duration,
            } => self.add_calendar_trigger(CalendarTrigger {
                start_boundary: format_datetime(&start),
                repetition: Some(RepetitionPattern {
                    interval: Period::from_duration(&interval),
                    duration: Period::from_duration(&duration),
                }),
                schedule_by_week: Some(by_week),
                ..CalendarTrigger::default()
            }),
            Repetition::Irregular => {
                if self.too_many_triggers(recurrences.len()) {
                    return;
                }
                for recurrence in &recurrences {
                    self.add_calendar_trigger(CalendarTrigger {
                        start_boundary: format_datetime(recurrence),
                        schedule_by_week: Some(by_week.clone()),
                        ..CalendarTrigger::default()
                    });
                }
            }
        }
    }

    fn add_monthly_trigger(&mut self, schedule: &Event, now: NaiveDateTime) {
        let Some(recurrences) = self.day_of_recurrences(schedule, now) else {
            warn!("[schtasks] cannot convert schedule '{schedule}' into a monthly trigger");
            return;
        };
        if self.too_many_triggers(recurrences.len()) {
            return;
        }
        for recurrence in &recurrences {
            if schedule.week_day.has_value() && schedule.day.has_value() {
                warn!(
                    "[schtasks] the task scheduler does not support a day of the month and a day of the week in the same trigger: '{schedule}'"
                );
                return;
            }
            if schedule.week_day.has_value() {
                self.add_calendar_trigger(CalendarTrigger {
                    start_boundary: format_datetime(recurrence),
                    schedule_by_month_day_of_week: Some(ScheduleByMonthDayOfWeek {
                        days_of_week: convert_weekdays(&schedule.week_day.values()),
                        weeks: Weeks::all(),
                        months: convert_months(&schedule.month.values()),
                    }),
                    ..CalendarTrigger::default()
                });
                continue;
            }
            self.add_calendar_trigger(CalendarTrigger {
                start_boundary: format_datetime(recurrence),
                schedule_by_month: Some(ScheduleByMonth {
                    days_of_month: convert_days_of_month(&schedule.day.values()),
                    months: convert_months(&schedule.month.values()),
                }),
                ..CalendarTrigger::default()
            });
        }
    }
}

impl Default for Task {
    fn default() -> Self {
        Task::new()
    }
}

/// Build a task document from configuration options: one exec action and
/// one set of triggers per parsed schedule.
pub fn create_task(options: &TaskOptions) -> Result<Task, CalendarError> {
    let mut events = Vec::with_capacity(options.schedules.len());
    for schedule in &options.schedules {
        events.push(schedule.parse::<Event>()?);
    }
    let mut task = Task::new();
    task.add_exec_action(ExecAction {
        command: options.command.clone(),
        arguments: options.arguments.clone(),
        working_directory: options.working_directory.clone(),
    });
    task.add_schedules(&events);
    Ok(task)
}

/// An empty input selects every month.
pub(crate) fn convert_months(input: &[u32]) -> Months {
    let mut months = Months::default();
    if input.is_empty() {
        return Months {
            january: true,
            february: true,
            march: true,
            april: true,
            may: true,
            june: true,
            july: true,
            august: true,
            september: true,
            october: true,
            november: true,
            december: true,
        };
    }
    for month in input {
        match month {
            1 => months.january = true,
            2 => months.february = true,
            3 => months.march = true,
            4 => months.april = true,
            5 => months.may = true,
            6 => months.june = true,
            7 => months.july = true,
            8 => months.august = true,
            9 => months.september = true,
            10 => months.october = true,
            11 => months.november = true,
            12 => months.december = true,
            _ => (),
        }
    }
    months
}

/// An empty input selects every day up to 31; the scheduler tolerates the
/// extra days on shorter months.
pub(crate) fn convert_days_of_month(input: &[u32]) -> DaysOfMonth {
    if input.is_empty() {
        return DaysOfMonth {
            days: (1..=31).collect(),
        };
    }
    DaysOfMonth {
        days: input.to_vec(),
    }
}

/// Both 0 and 7 map to Sunday. Out of range values are dropped.
pub(crate) fn convert_weekdays(input: &[u32]) -> DaysOfWeek {
    let mut week_days = DaysOfWeek::default();
    for weekday in input {
        match weekday {
            0 | 7 => week_days.sunday = true,
            1 => week_days.monday = true,
            2 => week_days.tuesday = true,
            3 => week_days.wednesday = true,
            4 => week_days.thursday = true,
            5 => week_days.friday = true,
            6 => week_days.saturday = true,
            _ => (),
        }
    }
    week_days
}
