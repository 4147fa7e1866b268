//! Image payloads posted by the booth page.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Request body of `POST /detect` and `POST /save`.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct ImagePayload {
    /// Data URL as produced by `canvas.toDataURL`
    pub image: String,
}

/// Errors raised while unpacking a data URL.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PayloadError {
    #[error("image payload is not a data URL (missing ',' separator)")]
    MissingSeparator,
}

/// Return the base64 segment of a `data:<mime>;base64,<payload>` string.
///
/// The segment between the first and second comma is taken; base64 never
/// contains commas so for well-formed input this is everything after the
/// header.
pub fn split_data_url(data_url: &str) -> Result<&str, PayloadError> {
    data_url
        .split(',')
        .nth(1)
        .ok_or(PayloadError::MissingSeparator)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_data_url() {
        assert_eq!(split_data_url("data:image/jpeg;base64,QUJD"), Ok("QUJD"));
        assert_eq!(split_data_url("data:image/png;base64,"), Ok(""));
    }

    #[test]
    fn test_split_rejects_bare_base64() {
        assert_eq!(
            split_data_url("QUJDRA=="),
            Err(PayloadError::MissingSeparator)
        );
    }
}
