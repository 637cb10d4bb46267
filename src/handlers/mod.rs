pub mod auth;
pub mod category;
pub mod comment;
pub mod notice;
pub mod post;
pub mod user;

use crate::error::AppError;
use serde::{Deserialize, Deserializer};

/// Deserialize a tri-state field: pair with `#[serde(default)]` so an
/// omitted field stays `None` while an explicit `null` becomes
/// `Some(None)` instead of collapsing into the outer `None`.
pub(crate) fn double_option<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

/// Trim-validate a required text field, rejecting absent or blank values
/// with the field-specific Korean message.
pub(crate) fn require_trimmed(value: Option<&str>, message: &str) -> Result<String, AppError> {
    match value.map(str::trim) {
        Some(trimmed) if !trimmed.is_empty() => Ok(trimmed.to_string()),
        _ => Err(AppError::Validation(message.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_missing_and_blank() {
        assert!(require_trimmed(None, "제목은 필수입니다.").is_err());
        assert!(require_trimmed(Some("   "), "제목은 필수입니다.").is_err());
    }

    #[test]
    fn trims_accepted_values() {
        let value = require_trimmed(Some("  제목  "), "제목은 필수입니다.").unwrap();
        assert_eq!(value, "제목");
    }
}
