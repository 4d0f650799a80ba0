use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Actions {
    pub context: String,
    pub exec: Vec<ExecAction>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExecAction {
    pub command: String,
    pub arguments: Option<String>,
    pub working_directory: Option<String>,
}
