pub mod assistant;
pub mod health;
pub mod login;
pub mod register;
pub mod reset;

use crate::error::AssistantError;

/// Field presence check that keeps rejections in the chat envelope instead of
/// letting the extractor produce a bare 422.
pub(crate) fn required(
    value: Option<String>,
    field: &'static str,
) -> Result<String, AssistantError> {
    match value {
        Some(value) if !value.trim().is_empty() => Ok(value.trim().to_owned()),
        _ => Err(AssistantError::MissingField(field)),
    }
}
