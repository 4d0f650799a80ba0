use serde::{Deserialize, Serialize};

/// What to run and when, as loaded from a profile configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskOptions {
    pub command: String,
    pub arguments: Option<String>,
    pub working_directory: Option<String>,
    pub schedules: Vec<String>,
}
