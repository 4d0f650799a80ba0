pub(crate) mod differences;
pub(crate) mod error;
pub(crate) mod schema;
pub(crate) mod task;
pub(crate) mod xml;

pub use error::TaskError;
pub use schema::actions::{Actions, ExecAction};
pub use schema::principals::{LogonType, Principal, Principals, RunLevel};
pub use schema::registration::RegistrationInfo;
pub use schema::settings::{
    Compatibility, IdleSettings, MultipleInstancesPolicy, Settings, DEFAULT_PRIORITY,
};
pub use schema::triggers::{
    CalendarTrigger, DaysOfMonth, DaysOfWeek, Months, RepetitionPattern, ScheduleByDay,
    ScheduleByMonth, ScheduleByMonthDayOfWeek, ScheduleByWeek, TimeTrigger, Triggers, Week, Weeks,
};
pub use task::{create_task, Task, MAX_TRIGGERS};
pub use xml::{create_task_file, write_task};
