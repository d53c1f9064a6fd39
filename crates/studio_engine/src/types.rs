use std::fmt;

use base64::Engine as _;
use thiserror::Error;

pub type RequestId = u64;
pub type AssetId = u64;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ImageStyle {
    Rustic,
    Modern,
    Social,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChatRole {
    User,
    Model,
}

impl ChatRole {
    pub fn as_str(self) -> &'static str {
        match self {
            ChatRole::User => "user",
            ChatRole::Model => "model",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatTurn {
    pub role: ChatRole,
    pub text: String,
}

/// Inline image returned by the provider, kept base64-encoded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageReference {
    pub mime_type: String,
    pub base64_data: String,
}

impl ImageReference {
    pub fn new(mime_type: impl Into<String>, base64_data: impl Into<String>) -> Self {
        Self {
            mime_type: mime_type.into(),
            base64_data: base64_data.into(),
        }
    }

    /// Embeddable `data:<mime>;base64,<payload>` form.
    pub fn to_data_url(&self) -> String {
        format!("data:{};base64,{}", self.mime_type, self.base64_data)
    }

    pub fn from_data_url(url: &str) -> Option<Self> {
        let rest = url.strip_prefix("data:")?;
        let (mime_type, data) = rest.split_once(";base64,")?;
        if mime_type.is_empty() {
            return None;
        }
        Some(Self::new(mime_type, data))
    }

    pub fn decode(&self) -> Result<Vec<u8>, base64::DecodeError> {
        base64::engine::general_purpose::STANDARD.decode(self.base64_data.as_bytes())
    }

    pub fn file_extension(&self) -> &'static str {
        match self.mime_type.as_str() {
            "image/jpeg" | "image/jpg" => "jpg",
            "image/webp" => "webp",
            "image/gif" => "gif",
            _ => "png",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineEvent {
    ImageSettled {
        request: RequestId,
        asset_id: AssetId,
        result: Result<ImageReference, ProviderError>,
    },
    ChatSettled {
        request: RequestId,
        result: Result<String, ProviderError>,
    },
}

/// Any failure of an outbound generation or chat call.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{kind}: {message}")]
pub struct ProviderError {
    pub kind: ProviderFailureKind,
    pub message: String,
}

impl ProviderError {
    pub(crate) fn new(kind: ProviderFailureKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProviderFailureKind {
    MissingApiKey,
    Transport,
    Timeout,
    HttpStatus(u16),
    QuotaExceeded,
    NoContent,
    InvalidResponse,
}

impl fmt::Display for ProviderFailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProviderFailureKind::MissingApiKey => write!(f, "missing api key"),
            ProviderFailureKind::Transport => write!(f, "transport error"),
            ProviderFailureKind::Timeout => write!(f, "timeout"),
            ProviderFailureKind::HttpStatus(code) => write!(f, "http status {code}"),
            ProviderFailureKind::QuotaExceeded => write!(f, "quota exceeded"),
            ProviderFailureKind::NoContent => write!(f, "no content in response"),
            ProviderFailureKind::InvalidResponse => write!(f, "invalid response"),
        }
    }
}
