pub(crate) mod error;
pub(crate) mod systemd;

pub use error::ScheduleError;
pub use systemd::load_schedules;
