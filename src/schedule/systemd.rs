/**
 * Validation of calendar schedules on systemd platforms.
 *
 * The heavy lifting is left to `systemd-analyze calendar`, which both
 * checks the expression and prints the upcoming elapse times. Firing-time
 * computation stays with systemd itself, so a successful validation
 * returns no events.
 */
use super::error::ScheduleError;
use crate::calendar::Event;
use log::error;
use std::process::Command;

pub(crate) const ANALYZER_COMMAND: &str = "systemd-analyze";

/// Validate every schedule with the system analyzer, stopping at the
/// first rejection. Empty strings are rejected up front, before anything
/// is spawned.
pub fn load_schedules(schedules: &[String]) -> Result<Vec<Event>, ScheduleError> {
    if let Some(index) = schedules.iter().position(|schedule| schedule.is_empty()) {
        return Err(ScheduleError::EmptySchedule { index });
    }

    let total = schedules.len();
    for (index, schedule) in schedules.iter().enumerate() {
        println!("\nAnalyzing schedule {}/{}\n========================", index + 1, total);
        let status = Command::new(ANALYZER_COMMAND)
            .arg("calendar")
            .arg(schedule)
            .status();
        let status = match status {
            Ok(result) => result,
            Err(err) => {
                error!("[schedule] could not launch {ANALYZER_COMMAND}: {err:?}");
                return Err(ScheduleError::Launch { index });
            }
        };
        if !status.success() {
            return Err(ScheduleError::Analyzer {
                index,
                code: status.code(),
            });
        }
    }
    Ok(Vec::new())
}

#[cfg(test)]
mod tests {
    use super::load_schedules;
    use crate::schedule::error::ScheduleError;

    #[test]
    fn test_empty_schedule_rejected_without_analyzer() {
        // the first entry is never analyzed: emptiness is checked up front
        let schedules = vec![String::from("*:0/15"), String::new()];
        let err = load_schedules(&schedules).unwrap_err();
        assert!(matches!(err, ScheduleError::EmptySchedule { index: 1 }));
    }

    #[test]
    fn test_no_schedules() {
        let events = load_schedules(&[]).unwrap();
        assert!(events.is_empty());
    }
}
