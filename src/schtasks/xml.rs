/**
 * Serialisation of the task document to the Task Scheduler XML schema.
 *
 * Element order inside `Task` is fixed: `RegistrationInfo`, `Triggers`,
 * `Principals`, `Settings`, `Actions`. Presence sets (`DaysOfWeek`,
 * `Months`) encode as empty child elements.
 */
use super::error::TaskError;
use super::schema::actions::Actions;
use super::schema::principals::Principals;
use super::schema::registration::RegistrationInfo;
use super::schema::settings::Settings;
use super::schema::triggers::{CalendarTrigger, DaysOfMonth, DaysOfWeek, Months, Triggers, Weeks};
use super::task::{Task, TASK_SCHEMA, TASK_SCHEMA_VERSION};
use log::error;
use quick_xml::events::{BytesDecl, BytesText, Event};
use quick_xml::{Error, Writer};
use std::fs;
use std::path::Path;

/// Render the task document as an XML string.
pub fn write_task(task: &Task) -> Result<String, TaskError> {
    match render(task) {
        Ok(xml) => Ok(xml),
        Err(err) => {
            error!("[schtasks] could not serialize the task document: {err:?}");
            Err(TaskError::Serialize)
        }
    }
}

/// Render the task document and write it to `path`, ready to be handed to
/// `schtasks.exe /create /xml`.
pub fn create_task_file(task: &Task, path: &Path) -> Result<(), TaskError> {
    let xml = write_task(task)?;
    if let Err(err) = fs::write(path, xml) {
        error!(
            "[schtasks] could not write the task file at {}: {err:?}",
            path.display()
        );
        return Err(TaskError::WriteFile);
    }
    Ok(())
}

fn render(task: &Task) -> Result<String, Error> {
    let mut writer = Writer::new_with_indent(Vec::new(), b' ', 2);
    writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;
    writer
        .create_element("Task")
        .with_attribute(("version", TASK_SCHEMA_VERSION))
        .with_attribute(("xmlns", TASK_SCHEMA))
        .write_inner_content(|writer| -> Result<(), Error> {
            write_registration_info(writer, &task.registration_info)?;
            write_triggers(writer, &task.triggers)?;
            write_principals(writer, &task.principals)?;
            write_settings(writer, &task.settings)?;
            write_actions(writer, &task.actions)?;
            Ok(())
        })?;
    Ok(String::from_utf8_lossy(&writer.into_inner()).into_owned())
}

fn text_element(writer: &mut Writer<Vec<u8>>, name: &str, value: &str) -> Result<(), Error> {
    writer
        .create_element(name)
        .write_text_content(BytesText::new(value))?;
    Ok(())
}

fn bool_element(writer: &mut Writer<Vec<u8>>, name: &str, value: bool) -> Result<(), Error> {
    text_element(writer, name, if value { "true" } else { "false" })
}

fn empty_element(writer: &mut Writer<Vec<u8>>, name: &str) -> Result<(), Error> {
    writer.create_element(name).write_empty()?;
    Ok(())
}

fn write_registration_info(
    writer: &mut Writer<Vec<u8>>,
    info: &RegistrationInfo,
) -> Result<(), Error> {
    writer
        .create_element("RegistrationInfo")
        .write_inner_content(|writer| -> Result<(), Error> {
            text_element(writer, "Date", &info.date)?;
            text_element(writer, "Author", &info.author)?;
            if let Some(description) = &info.description {
                text_element(writer, "Description", description)?;
            }
            if let Some(uri) = &info.uri {
                text_element(writer, "URI", uri)?;
            }
            if let Some(descriptor) = &info.security_descriptor {
                text_element(writer, "SecurityDescriptor", descriptor)?;
            }
            Ok(())
        })?;
    Ok(())
}

fn write_triggers(writer: &mut Writer<Vec<u8>>, triggers: &Triggers) -> Result<(), Error> {
    writer
        .create_element("Triggers")
        .write_inner_content(|writer| -> Result<(), Error> {
            for trigger in &triggers.time {
                writer
                    .create_element("TimeTrigger")
                    .write_inner_content(|writer| -> Result<(), Error> {
                        text_element(writer, "StartBoundary", &trigger.start_boundary)
                    })?;
            }
            for trigger in &triggers.calendar {
                write_calendar_trigger(writer, trigger)?;
            }
            Ok(())
        })?;
    Ok(())
}

fn write_calendar_trigger(
    writer: &mut Writer<Vec<u8>>,
    trigger: &CalendarTrigger,
) -> Result<(), Error> {
    writer
        .create_element("CalendarTrigger")
        .write_inner_content(|writer| -> Result<(), Error> {
            text_element(writer, "StartBoundary", &trigger.start_boundary)?;
            if let Some(repetition) = &trigger.repetition {
                writer
                    .create_element("Repetition")
                    .write_inner_content(|writer| -> Result<(), Error> {
                        text_element(writer, "Interval", &repetition.interval.to_string())?;
                        text_element(writer, "Duration", &repetition.duration.to_string())?;
                        Ok(())
                    })?;
            }
            if let Some(by_day) = &trigger.schedule_by_day {
                writer
                    .create_element("ScheduleByDay")
                    .write_inner_content(|writer| -> Result<(), Error> {
                        text_element(writer, "DaysInterval", &by_day.days_interval.to_string())
                    })?;
            }
            if let Some(by_week) = &trigger.schedule_by_week {
                writer
                    .create_element("ScheduleByWeek")
                    .write_inner_content(|writer| -> Result<(), Error> {
                        text_element(writer, "WeeksInterval", &by_week.weeks_interval.to_string())?;
                        write_days_of_week(writer, &by_week.days_of_week)?;
                        Ok(())
                    })?;
            }
            if let Some(by_month) = &trigger.schedule_by_month {
                writer
                    .create_element("ScheduleByMonth")
                    .write_inner_content(|writer| -> Result<(), Error> {
                        write_days_of_month(writer, &by_month.days_of_month)?;
                        write_months(writer, &by_month.months)?;
                        Ok(())
                    })?;
            }
            if let Some(by_month_dow) = &trigger.schedule_by_month_day_of_week {
                writer
                    .create_element("ScheduleByMonthDayOfWeek")
                    .write_inner_content(|writer| -> Result<(), Error> {
                        write_days_of_week(writer, &by_month_dow.days_of_week)?;
                        write_weeks(writer, &by_month_dow.weeks)?;
                        write_months(writer, &by_month_dow.months)?;
                        Ok(())
                    })?;
            }
            Ok(())
        })?;
    Ok(())
}

fn write_days_of_week(writer: &mut Writer<Vec<u8>>, days: &DaysOfWeek) -> Result<(), Error> {
    writer
        .create_element("DaysOfWeek")
        .write_inner_content(|writer| -> Result<(), Error> {
            if days.sunday {
                empty_element(writer, "Sunday")?;
            }
            if days.monday {
                empty_element(writer, "Monday")?;
            }
            if days.tuesday {
                empty_element(writer, "Tuesday")?;
            }
            if days.wednesday {
                empty_element(writer, "Wednesday")?;
            }
            if days.thursday {
                empty_element(writer, "Thursday")?;
            }
            if days.friday {
                empty_element(writer, "Friday")?;
            }
            if days.saturday {
                empty_element(writer, "Saturday")?;
            }
            Ok(())
        })?;
    Ok(())
}

fn write_months(writer: &mut Writer<Vec<u8>>, months: &Months) -> Result<(), Error> {
    writer
        .create_element("Months")
        .write_inner_content(|writer| -> Result<(), Error> {
            if months.january {
                empty_element(writer, "January")?;
            }
            if months.february {
                empty_element(writer, "February")?;
            }
            if months.march {
                empty_element(writer, "March")?;
            }
            if months.april {
                empty_element(writer, "April")?;
            }
            if months.may {
                empty_element(writer, "May")?;
            }
            if months.june {
                empty_element(writer, "June")?;
            }
            if months.july {
                empty_element(writer, "July")?;
            }
            if months.august {
                empty_element(writer, "August")?;
            }
            if months.september {
                empty_element(writer, "September")?;
            }
            if months.october {
                empty_element(writer, "October")?;
            }
            if months.november {
                empty_element(writer, "November")?;
            }
            if months.december {
                empty_element(writer, "December")?;
            }
            Ok(())
        })?;
    Ok(())
}

fn write_days_of_month(writer: &mut Writer<Vec<u8>>, days: &DaysOfMonth) -> Result<(), Error> {
    writer
        .create_element("DaysOfMonth")
        .write_inner_content(|writer| -> Result<(), Error> {
            for day in &days.days {
                text_element(writer, "Day", &day.to_string())?;
            }
            Ok(())
        })?;
    Ok(())
}

fn write_weeks(writer: &mut Writer<Vec<u8>>, weeks: &Weeks) -> Result<(), Error> {
    writer
        .create_element("Weeks")
        .write_inner_content(|writer| -> Result<(), Error> {
            for week in &weeks.weeks {
                text_element(writer, "Week", week.as_str())?;
            }
            Ok(())
        })?;
    Ok(())
}

fn write_principals(writer: &mut Writer<Vec<u8>>, principals: &Principals) -> Result<(), Error> {
    let principal = &principals.principal;
    writer
        .create_element("Principals")
        .write_inner_content(|writer| -> Result<(), Error> {
            writer
                .create_element("Principal")
                .with_attribute(("id", principal.id.as_str()))
                .write_inner_content(|writer| -> Result<(), Error> {
                    if !principal.user_id.is_empty() {
                        text_element(writer, "UserId", &principal.user_id)?;
                    }
                    text_element(writer, "LogonType", principal.logon_type.as_str())?;
                    text_element(writer, "RunLevel", principal.run_level.as_str())?;
                    Ok(())
                })?;
            Ok(())
        })?;
    Ok(())
}

pub(crate) fn write_settings(
    writer: &mut Writer<Vec<u8>>,
    settings: &Settings,
) -> Result<(), Error> {
    writer
        .create_element("Settings")
        .write_inner_content(|writer| -> Result<(), Error> {
            text_element(
                writer,
                "MultipleInstancesPolicy",
                settings.multiple_instances_policy.as_str(),
            )?;
            bool_element(
                writer,
                "DisallowStartIfOnBatteries",
                settings.disallow_start_if_on_batteries,
            )?;
            bool_element(
                writer,
                "StopIfGoingOnBatteries",
                settings.stop_if_going_on_batteries,
            )?;
            writer
                .create_element("IdleSettings")
                .write_inner_content(|writer| -> Result<(), Error> {
                    text_element(
                        writer,
                        "Duration",
                        &settings.idle_settings.duration.to_string(),
                    )?;
                    text_element(
                        writer,
                        "WaitTimeout",
                        &settings.idle_settings.wait_timeout.to_string(),
                    )?;
                    bool_element(
                        writer,
                        "StopOnIdleEnd",
                        settings.idle_settings.stop_on_idle_end,
                    )?;
                    Ok(())
                })?;
            text_element(writer, "Compatibility", settings.compatibility.as_str())?;
            text_element(writer, "Priority", &settings.priority.to_string())?;
            bool_element(
                writer,
                "UseUnifiedSchedulingEngine",
                settings.use_unified_scheduling_engine,
            )?;
            Ok(())
        })?;
    Ok(())
}

fn write_actions(writer: &mut Writer<Vec<u8>>, actions: &Actions) -> Result<(), Error> {
    writer
        .create_element("Actions")
        .with_attribute(("Context", actions.context.as_str()))
        .write_inner_content(|writer| -> Result<(), Error> {
            for exec in &actions.exec {
                writer
                    .create_element("Exec")
                    .write_inner_content(|writer| -> Result<(), Error> {
                        text_element(writer, "Command", &exec.command)?;
                        if let Some(arguments) = &exec.arguments {
                            text_element(writer, "Arguments", arguments)?;
                        }
                        if let Some(directory) = &exec.working_directory {
                            text_element(writer, "WorkingDirectory", directory)?;
                        }
                        Ok(())
                    })?;
            }
            Ok(())
        })?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::{create_task_file, write_settings, write_task};
    use crate::calendar::Event;
    use crate::schtasks::schema::actions::ExecAction;
    use crate::schtasks::schema::settings::Settings;
    use crate::schtasks::task::Task;
    use chrono::{NaiveDate, NaiveDateTime};
    use quick_xml::Writer;

    fn now() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 1, 1)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap()
    }

    fn sample_task(expression: &str) -> Task {
        let mut task = Task::new();
        task.registration_info.date = String::from("2024-01-01T00:00:00");
        task.add_exec_action(ExecAction {
            command: String::from("restic"),
            arguments: Some(String::from("backup")),
            working_directory: None,
        });
        let event: Event = expression.parse().unwrap();
        task.add_schedules_from(&[event], now());
        task
    }

    #[test]
    fn test_write_task_daily() {
        let xml = write_task(&sample_task("03:00")).unwrap();
        assert!(xml.starts_with("<?xml version=\"1.0\" encoding=\"UTF-8\"?>"));
        assert!(xml.contains(
            "<Task version=\"1.2\" xmlns=\"http://schemas.microsoft.com/windows/2004/02/mit/task\">"
        ));
        assert!(xml.contains("<StartBoundary>2024-01-01T03:00:00</StartBoundary>"));
        assert!(xml.contains("<DaysInterval>1</DaysInterval>"));
        assert!(!xml.contains("<Repetition>"));
    }

    #[test]
    fn test_write_task_element_order() {
        let xml = write_task(&sample_task("03:00")).unwrap();
        let registration = xml.find("<RegistrationInfo>").unwrap();
        let triggers = xml.find("<Triggers>").unwrap();
        let principals = xml.find("<Principals>").unwrap();
        let settings = xml.find("<Settings>").unwrap();
        let actions = xml.find("<Actions").unwrap();
        assert!(registration < triggers);
        assert!(triggers < principals);
        assert!(principals < settings);
        assert!(settings < actions);
    }

    #[test]
    fn test_write_task_repetition() {
        let xml = write_task(&sample_task("01,02,03,04:00")).unwrap();
        assert!(xml.contains("<StartBoundary>2024-01-01T01:00:00</StartBoundary>"));
        assert!(xml.contains("<Interval>PT1H</Interval>"));
        assert!(xml.contains("<Duration>PT3H</Duration>"));
    }

    #[test]
    fn test_write_task_weekly_days() {
        let xml = write_task(&sample_task("Mon 09:00")).unwrap();
        assert!(xml.contains("<WeeksInterval>1</WeeksInterval>"));
        assert!(xml.contains("<Monday/>"));
        assert!(!xml.contains("<Tuesday/>"));
    }

    #[test]
    fn test_write_task_monthly() {
        let xml = write_task(&sample_task("01,07-15 02:00")).unwrap();
        assert!(xml.contains("<Day>15</Day>"));
        assert!(xml.contains("<January/>"));
        assert!(xml.contains("<July/>"));
        assert!(!xml.contains("<February/>"));
    }

    #[test]
    fn test_write_task_settings_block() {
        let xml = write_task(&sample_task("03:00")).unwrap();
        assert!(xml.contains("<MultipleInstancesPolicy>IgnoreNew</MultipleInstancesPolicy>"));
        assert!(xml.contains("<DisallowStartIfOnBatteries>true</DisallowStartIfOnBatteries>"));
        assert!(xml.contains("<StopIfGoingOnBatteries>true</StopIfGoingOnBatteries>"));
        assert!(xml.contains("<Duration>PT10M</Duration>"));
        assert!(xml.contains("<WaitTimeout>PT1H</WaitTimeout>"));
        assert!(xml.contains("<StopOnIdleEnd>true</StopOnIdleEnd>"));
        assert!(xml.contains("<Compatibility>AT</Compatibility>"));
        assert!(xml.contains("<Priority>7</Priority>"));
        assert!(xml.contains("<UseUnifiedSchedulingEngine>true</UseUnifiedSchedulingEngine>"));
    }

    #[test]
    fn test_write_task_actions() {
        let xml = write_task(&sample_task("03:00")).unwrap();
        assert!(xml.contains("<Actions Context=\"Author\">"));
        assert!(xml.contains("<Command>restic</Command>"));
        assert!(xml.contains("<Arguments>backup</Arguments>"));
        assert!(!xml.contains("<WorkingDirectory>"));
    }

    #[test]
    fn test_settings_block_is_idempotent() {
        let render = |settings: &Settings| {
            let mut writer = Writer::new_with_indent(Vec::new(), b' ', 2);
            write_settings(&mut writer, settings).unwrap();
            writer.into_inner()
        };
        let first = render(&Settings::default());
        let second = render(&Settings::default());
        assert_eq!(first, second);
    }

    #[test]
    fn test_create_task_file() {
        let path = std::env::temp_dir().join("taskcal_test_task.xml");
        create_task_file(&sample_task("03:00"), &path).unwrap();
        let content = std::fs::read_to_string(&path).unwrap();
        assert!(content.contains("<DaysInterval>1</DaysInterval>"));
        let _ = std::fs::remove_file(&path);
    }
}
