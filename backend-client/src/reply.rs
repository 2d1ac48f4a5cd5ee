//! Backend replies carry failures in-band: a JSON object whose `message`
//! starts with `Error`.

use serde_json::Value;

use crate::error::{BackendError, Result};

const ERROR_PREFIX: &str = "Error";

/// Error message carried by an error-shaped reply, if any.
pub fn error_message(reply: &Value) -> Option<&str> {
    reply
        .get("message")
        .and_then(Value::as_str)
        .filter(|message| message.starts_with(ERROR_PREFIX))
}

/// Pass success payloads through and turn error-shaped ones into
/// [`BackendError::Rejected`].
pub fn check_reply(reply: Value) -> Result<Value> {
    match error_message(&reply) {
        Some(message) => Err(BackendError::Rejected {
            message: message.to_string(),
        }),
        None => Ok(reply),
    }
}

pub fn user_notice(action: &str, message: &str) -> String {
    format!("{action} - Message: {message}. Please try again later.")
}
