//! Decode a status service body into a [`StatusResponse`].

use serde::Deserialize;

use super::error::DecodeError;

/// Validated status of one upload as reported by the server.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusResponse {
    /// Server flagged `error: true`: it has no status record for the token
    /// (not created yet, or already cleared after the upload finished).
    Unavailable,
    /// Bytes received so far out of the total request size.
    Progress { pos: u64, length: u64 },
}

impl StatusResponse {
    /// Percentage for a progress response; `None` for `Unavailable`.
    pub fn percent(&self) -> Option<u8> {
        match *self {
            StatusResponse::Unavailable => None,
            StatusResponse::Progress { pos, length } => Some(percent_of(pos, length)),
        }
    }
}

/// Wire shape. Everything optional here; `decode` enforces what is required.
#[derive(Debug, Deserialize)]
struct RawStatus {
    #[serde(default)]
    error: Option<bool>,
    #[serde(default)]
    pos: Option<u64>,
    #[serde(default)]
    length: Option<u64>,
}

/// Parse a JSON status body.
pub fn decode(body: &[u8]) -> Result<StatusResponse, DecodeError> {
    let raw: RawStatus = serde_json::from_slice(body)?;
    if raw.error == Some(true) {
        return Ok(StatusResponse::Unavailable);
    }
    let pos = raw.pos.ok_or(DecodeError::MissingField("pos"))?;
    let length = raw.length.ok_or(DecodeError::MissingField("length"))?;
    Ok(StatusResponse::Progress { pos, length })
}

/// `round(100 * pos / length)`, half rounded up, always in `0..=100`.
///
/// `pos` beyond `length` counts as complete, and so does an empty upload
/// (`length == 0`).
pub fn percent_of(pos: u64, length: u64) -> u8 {
    if length == 0 {
        return 100;
    }
    let pos = u128::from(pos.min(length));
    let length = u128::from(length);
    ((pos * 200 + length) / (length * 2)) as u8
}
