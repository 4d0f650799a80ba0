use std::fmt;

#[derive(Debug)]
pub enum TaskError {
    Serialize,
    WriteFile,
}

impl std::error::Error for TaskError {}

impl fmt::Display for TaskError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TaskError::Serialize => write!(f, "Could not serialize the task document"),
            TaskError::WriteFile => write!(f, "Could not write the task file"),
        }
    }
}
