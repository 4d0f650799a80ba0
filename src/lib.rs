//! Translate systemd-style calendar events into native scheduler
//! configuration.
//!
//! The crate evaluates a [`calendar::Event`] into concrete firing
//! instants, then emits an equivalent configuration for the host
//! scheduler: on systemd platforms each schedule string is validated
//! through `systemd-analyze`, on Windows a complete Task Scheduler XML
//! document is synthesized with the most compact trigger shape the
//! schema can express.
//!
//! ```no_run
//! use taskcal::schtasks;
//! use taskcal::structs::TaskOptions;
//!
//! let options = TaskOptions {
//!     command: String::from("restic"),
//!     arguments: Some(String::from("backup --quiet")),
//!     working_directory: None,
//!     schedules: vec![String::from("Mon..Fri 03:00")],
//! };
//! let task = schtasks::create_task(&options)?;
//! let xml = schtasks::write_task(&task)?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod calendar;
pub mod schedule;
pub mod schtasks;
pub mod structs;
pub mod utils;
