//! Envelope - the JSON wrapper around every backend response.
//!
//! Two conventions coexist across endpoints:
//! - newer endpoints answer `{success, data, mensaje}` and may report a
//!   business failure with `success: false` under a 2xx status;
//! - older auth/profile endpoints answer `{mensaje}` with a non-2xx status
//!   on failure and `{data}` on success.
//!
//! [`Envelope::into_data`] reconciles both into a single `Result`.

use serde::de::DeserializeOwned;
use serde::Deserialize;

use crate::ApiError;

/// The outer response object.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(bound(deserialize = "T: DeserializeOwned"))]
pub struct Envelope<T> {
    /// Explicit success flag (newer endpoints only).
    #[serde(default)]
    pub success: Option<bool>,
    /// The payload.
    #[serde(default)]
    pub data: Option<T>,
    /// Human-readable message, usually in Spanish.
    #[serde(default)]
    pub mensaje: Option<String>,
}

impl<T: DeserializeOwned> Envelope<T> {
    /// Decode a response body.
    ///
    /// A body that is not JSON is tolerated for failed statuses so the
    /// status itself can still be reported.
    pub fn parse(status: u16, body: &[u8]) -> Result<T, ApiError> {
        match serde_json::from_slice::<Envelope<T>>(body) {
            Ok(envelope) => envelope.into_data(status),
            Err(_) if !is_success(status) => Err(ApiError::from_status(status, None)),
            Err(e) => Err(ApiError::Malformed(e.to_string())),
        }
    }

    /// Turn the envelope into its payload or the error it describes.
    pub fn into_data(self, status: u16) -> Result<T, ApiError> {
        if !is_success(status) {
            return Err(ApiError::from_status(status, self.mensaje));
        }
        if self.success == Some(false) {
            return Err(ApiError::Rejected {
                status,
                message: self.mensaje,
            });
        }
        self.data.ok_or(ApiError::MissingData)
    }
}

/// Envelope for endpoints whose success carries no meaningful payload.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Acknowledgement {
    /// Message accompanying the success.
    #[serde(default)]
    pub mensaje: Option<String>,
    /// Explicit success flag.
    #[serde(default)]
    pub success: Option<bool>,
}

impl Acknowledgement {
    /// Decode a teardown-style response where only the outcome matters.
    pub fn parse(status: u16, body: &[u8]) -> Result<Self, ApiError> {
        let ack = serde_json::from_slice::<Acknowledgement>(body).unwrap_or(Acknowledgement {
            mensaje: None,
            success: None,
        });
        if !is_success(status) {
            return Err(ApiError::from_status(status, ack.mensaje));
        }
        if ack.success == Some(false) {
            return Err(ApiError::Rejected {
                status,
                message: ack.mensaje,
            });
        }
        Ok(ack)
    }
}

fn is_success(status: u16) -> bool {
    (200..300).contains(&status)
}
