use std::fmt;

#[derive(Debug)]
pub enum ScheduleError {
    EmptySchedule { index: usize },
    Analyzer { index: usize, code: Option<i32> },
    Launch { index: usize },
}

impl std::error::Error for ScheduleError {}

impl fmt::Display for ScheduleError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScheduleError::EmptySchedule { index } => {
                write!(f, "Schedule {} is empty", index + 1)
            }
            ScheduleError::Analyzer { index, code } => match code {
                Some(code) => write!(
                    f,
                    "Schedule {} was rejected by the analyzer (exit code {code})",
                    index + 1
                ),
                None => write!(
                    f,
                    "Schedule {} was rejected by the analyzer (terminated by signal)",
                    index + 1
                ),
            },
            ScheduleError::Launch { index } => {
                write!(f, "Could not launch the analyzer for schedule {}", index + 1)
            }
        }
    }
}
