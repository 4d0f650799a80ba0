use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RegistrationInfo {
    pub date: String,
    pub author: String,
    pub description: Option<String>,
    pub uri: Option<String>,
    // https://learn.microsoft.com/en-us/windows/win32/secauthz/security-descriptor-string-format
    pub security_descriptor: Option<String>,
}
