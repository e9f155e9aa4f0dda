use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A captured still frame as transmissible encoded data.
///
/// Holds either a `data:` URL (`data:image/png;base64,...`) or a bare
/// base64 payload. Non-empty by construction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct EncodedImage(String);

#[derive(Debug, Error)]
#[error("image payload must not be empty")]
pub struct EmptyImageError;

const DEFAULT_MIME: &str = "image/jpeg";

impl EncodedImage {
    pub fn new(payload: impl Into<String>) -> Result<Self, EmptyImageError> {
        let payload = payload.into();
        if payload.trim().is_empty() {
            Err(EmptyImageError)
        } else {
            Ok(Self(payload))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Split a `data:` URL into its mime type and payload.
    fn data_url_parts(&self) -> Option<(&str, &str)> {
        let rest = self.0.strip_prefix("data:")?;
        let (meta, payload) = rest.split_once(',')?;
        let mime = meta.split(';').next().unwrap_or(DEFAULT_MIME);
        Some((mime, payload))
    }

    /// Mime type for the analysis request. Bare payloads are assumed to be
    /// JPEG, the common camera still format.
    pub fn mime_type(&self) -> &str {
        match self.data_url_parts() {
            Some((mime, _)) if !mime.is_empty() => mime,
            _ => DEFAULT_MIME,
        }
    }

    /// Base64 payload without any data-URL framing.
    pub fn base64_data(&self) -> &str {
        match self.data_url_parts() {
            Some((_, payload)) => payload,
            None => &self.0,
        }
    }
}

impl TryFrom<String> for EncodedImage {
    type Error = EmptyImageError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl TryFrom<&str> for EncodedImage {
    type Error = EmptyImageError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<EncodedImage> for String {
    fn from(value: EncodedImage) -> Self {
        value.0
    }
}

impl AsRef<str> for EncodedImage {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}
