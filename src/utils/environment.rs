/// Best-effort lookup of the current user's SID. Returns an empty string
/// when the lookup fails; the task document tolerates a missing `UserId`.
#[cfg(target_os = "windows")]
pub(crate) fn current_user_sid() -> String {
    use log::warn;
    use std::process::Command;

    let output = match Command::new("whoami").args(["/user", "/fo", "csv", "/nh"]).output() {
        Ok(result) => result,
        Err(err) => {
            warn!("[environment] could not determine current user SID: {err:?}");
            return String::new();
        }
    };

    let stdout = String::from_utf8_lossy(&output.stdout);
    for token in stdout.split(['"', ',', ' ', '\r', '\n']) {
        if token.starts_with("S-1-") {
            return token.to_string();
        }
    }
    String::new()
}

#[cfg(not(target_os = "windows"))]
pub(crate) fn current_user_sid() -> String {
    String::new()
}
