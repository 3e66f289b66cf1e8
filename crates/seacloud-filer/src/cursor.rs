//! Opaque continuation tokens for directory listings

use crate::{FilerError, Result};
use base64::{
    alphabet,
    engine::{DecodePaddingMode, GeneralPurpose, GeneralPurposeConfig},
    Engine as _,
};
use serde::{Deserialize, Serialize};

/// URL-safe base64 so tokens survive query strings; padding is optional on input.
const TOKEN_ENGINE: GeneralPurpose = GeneralPurpose::new(
    &alphabet::URL_SAFE,
    GeneralPurposeConfig::new()
        .with_encode_padding(false)
        .with_decode_padding_mode(DecodePaddingMode::Indifferent),
);

/// Listing position: the last file name already returned
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cursor {
    #[serde(rename = "LastFileName")]
    pub last_file_name: Option<String>,
}

impl Cursor {
    /// Cursor that continues after `last_file_name`
    pub fn after(last_file_name: impl Into<String>) -> Self {
        Self {
            last_file_name: Some(last_file_name.into()),
        }
    }

    /// Cursor pointing at the first page
    pub fn start() -> Self {
        Self::default()
    }

    /// Encode into a transport-safe token
    pub fn encode(&self) -> String {
        // Serializing a struct of one optional string cannot fail
        let json = serde_json::to_vec(self).unwrap_or_default();
        TOKEN_ENGINE.encode(json)
    }

    /// Decode a token produced by [`Cursor::encode`]. The empty token is the start cursor.
    pub fn decode(token: &str) -> Result<Self> {
        if token.is_empty() {
            return Ok(Self::start());
        }

        let json = TOKEN_ENGINE
            .decode(token)
            .map_err(|e| FilerError::Decode(format!("not base64: {}", e)))?;

        serde_json::from_slice(&json)
            .map_err(|e| FilerError::Decode(format!("not a cursor: {}", e)))
    }
}
