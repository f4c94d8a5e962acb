//! Turns upstream errors into display strings

/// Shown when an error carries no usable text
pub const UNKNOWN_ERROR: &str = "Unknown error";

/// Display text of an error, or [`UNKNOWN_ERROR`] if it is blank
pub fn format_error(err: &anyhow::Error) -> String {
    let message = err.to_string();
    if message.trim().is_empty() {
        UNKNOWN_ERROR.to_string()
    } else {
        message
    }
}
