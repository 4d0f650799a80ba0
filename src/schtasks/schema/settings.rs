use crate::utils::period::Period;
use serde::Serialize;

/// Default process priority for registered tasks.
pub const DEFAULT_PRIORITY: u8 = 7;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Settings {
    pub compatibility: Compatibility,
    pub disallow_start_if_on_batteries: bool,
    pub stop_if_going_on_batteries: bool,
    pub idle_settings: IdleSettings,
    pub multiple_instances_policy: MultipleInstancesPolicy,
    pub priority: u8,
    pub use_unified_scheduling_engine: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            compatibility: Compatibility::At,
            disallow_start_if_on_batteries: true,
            stop_if_going_on_batteries: true,
            idle_settings: IdleSettings {
                duration: Period::from_minutes(10),
                wait_timeout: Period::from_hours(1),
                stop_on_idle_end: true,
            },
            multiple_instances_policy: MultipleInstancesPolicy::IgnoreNew,
            priority: DEFAULT_PRIORITY,
            use_unified_scheduling_engine: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IdleSettings {
    pub duration: Period,
    pub wait_timeout: Period,
    pub stop_on_idle_end: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Compatibility {
    At,
    V1,
    V2,
}

impl Compatibility {
    pub(crate) fn as_str(&self) -> &'static str {
        match self {
            Compatibility::At => "AT",
            Compatibility::V1 => "V1",
            Compatibility::V2 => "V2",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum MultipleInstancesPolicy {
    IgnoreNew,
    Parallel,
    Queue,
    StopExisting,
}

impl MultipleInstancesPolicy {
    pub(crate) fn as_str(&self) -> &'static str {
        match self {
            MultipleInstancesPolicy::IgnoreNew => "IgnoreNew",
            MultipleInstancesPolicy::Parallel => "Parallel",
            MultipleInstancesPolicy::Queue => "Queue",
            MultipleInstancesPolicy::StopExisting => "StopExisting",
        }
    }
}
