//! Error types for the character API client.
//!
//! # Design
//! `NetworkError` is the closed set the client itself produces. Transports
//! report through `FetchError` so that their failures reach the caller
//! unchanged: a transport may return a `NetworkError` of its own (an
//! unparsable URL, say) or an opaque transport message. The controller
//! distinguishes the two when choosing an alert title.

use std::error::Error;
use std::fmt;

/// Failures raised while building a request or interpreting a response.
#[derive(Debug)]
pub enum NetworkError {
    /// The request URL could not be constructed or parsed.
    InvalidUrl,

    /// The payload was not a valid page envelope.
    DecodingError(serde_json::Error),

    /// A success status arrived without a body.
    NoData,

    /// The server answered outside `200..=299`.
    BadStatusCode(u16),

    Unknown,
}

impl NetworkError {
    /// Human-readable text shown to the user.
    pub fn description(&self) -> String {
        match self {
            NetworkError::InvalidUrl => "Invalid URL Error.".to_string(),
            NetworkError::DecodingError(cause) => {
                format!("Decoding Error with reason: {cause}.")
            }
            NetworkError::NoData => "No Data Error.".to_string(),
            NetworkError::BadStatusCode(code) => {
                format!("Bad Status Code Error with code: {code}.")
            }
            NetworkError::Unknown => "Unknown Error.".to_string(),
        }
    }
}

impl fmt::Display for NetworkError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.description())
    }
}

impl Error for NetworkError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            NetworkError::DecodingError(cause) => Some(cause),
            _ => None,
        }
    }
}

/// Error returned by `CharacterFetcher::fetch_characters` and by transports.
#[derive(Debug)]
pub enum FetchError {
    Network(NetworkError),

    /// A transport-level failure (connection refused, TLS, timeout, ...),
    /// carried as the transport's own message.
    Transport(String),
}

impl fmt::Display for FetchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FetchError::Network(err) => write!(f, "{err}"),
            FetchError::Transport(msg) => f.write_str(msg),
        }
    }
}

impl Error for FetchError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            FetchError::Network(err) => Some(err),
            FetchError::Transport(_) => None,
        }
    }
}

impl From<NetworkError> for FetchError {
    fn from(err: NetworkError) -> Self {
        FetchError::Network(err)
    }
}

/// Failures while loading a character portrait.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImageError {
    InvalidUrl(String),
    Transfer(String),
    BadStatusCode(u16),
    Empty,
}

impl fmt::Display for ImageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ImageError::InvalidUrl(url) => write!(f, "invalid image URL: {url:?}"),
            ImageError::Transfer(msg) => write!(f, "image download failed: {msg}"),
            ImageError::BadStatusCode(code) => {
                write!(f, "image download failed with status {code}")
            }
            ImageError::Empty => write!(f, "image download returned no data"),
        }
    }
}

impl Error for ImageError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn descriptions_match_user_facing_text() {
        assert_eq!(NetworkError::InvalidUrl.description(), "Invalid URL Error.");
        assert_eq!(NetworkError::NoData.description(), "No Data Error.");
        assert_eq!(
            NetworkError::BadStatusCode(404).description(),
            "Bad Status Code Error with code: 404."
        );
        assert_eq!(NetworkError::Unknown.to_string(), "Unknown Error.");
    }

    #[test]
    fn decoding_error_keeps_its_cause() {
        let cause = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let err = NetworkError::DecodingError(cause);
        assert!(err.description().starts_with("Decoding Error with reason: "));
        assert!(err.source().is_some());
    }

    #[test]
    fn transport_message_passes_through() {
        let err = FetchError::Transport("connection refused".to_string());
        assert_eq!(err.to_string(), "connection refused");
        assert!(err.source().is_none());
    }
}
