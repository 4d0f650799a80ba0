use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Principals {
    pub principal: Principal,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Principal {
    pub id: String,
    pub user_id: String,
    pub logon_type: LogonType,
    pub run_level: RunLevel,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum LogonType {
    InteractiveToken,
    Password,
    S4U,
}

impl LogonType {
    pub(crate) fn as_str(&self) -> &'static str {
        match self {
            LogonType::InteractiveToken => "InteractiveToken",
            LogonType::Password => "Password",
            LogonType::S4U => "S4U",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum RunLevel {
    LeastPrivilege,
    HighestAvailable,
}

impl RunLevel {
    pub(crate) fn as_str(&self) -> &'static str {
        match self {
            RunLevel::LeastPrivilege => "LeastPrivilege",
            RunLevel::HighestAvailable => "HighestAvailable",
        }
    }
}
