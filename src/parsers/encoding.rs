//! Text recovery for exported logs.
//!
//! Exports from different tool versions and locales are not consistently
//! encoded. UTF-8 is tried first; if the bytes are not valid UTF-8 the
//! configured single-byte fallback is used instead.

use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumString};

use super::error::DecodeError;

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// Supported text encodings
#[derive(
    AsRefStr, Clone, Copy, Debug, Display, EnumString, PartialEq, Eq, Serialize, Deserialize,
)]
pub enum TextEncoding {
    #[strum(serialize = "utf-8")]
    #[serde(rename = "utf-8")]
    Utf8,
    /// ISO-8859-1, every byte maps to the code point of the same value
    #[strum(serialize = "latin-1")]
    #[serde(rename = "latin-1")]
    Latin1,
}

impl TextEncoding {
    /// Decode bytes strictly under this encoding
    pub fn decode(&self, data: &[u8]) -> Option<String> {
        match self {
            TextEncoding::Utf8 => std::str::from_utf8(data).ok().map(str::to_owned),
            TextEncoding::Latin1 => Some(data.iter().map(|&b| b as char).collect()),
        }
    }
}

/// Recover text from raw bytes, returning the text and the encoding used.
pub fn recover_text(
    data: &[u8],
    fallback: Option<TextEncoding>,
) -> Result<(String, TextEncoding), DecodeError> {
    let body = data.strip_prefix(UTF8_BOM).unwrap_or(data);
    let utf8_err = match std::str::from_utf8(body) {
        Ok(text) => return Ok((text.to_owned(), TextEncoding::Utf8)),
        Err(e) => format!("invalid UTF-8 at byte {}", e.valid_up_to()),
    };

    match fallback {
        Some(encoding) => encoding.decode(body).map(|text| (text, encoding)).ok_or_else(|| {
            DecodeError::Encoding(format!("{}; {} fallback also failed", utf8_err, encoding))
        }),
        None => Err(DecodeError::Encoding(format!(
            "{} and no fallback encoding is enabled",
            utf8_err
        ))),
    }
}
