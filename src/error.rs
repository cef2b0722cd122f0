use thiserror::Error;

/// Construction failures. Fatal: the widget is never mounted.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("order tracking: api_url is required")]
    MissingApiUrl,
    #[error("order tracking: container is required")]
    MissingContainer,
    #[error("order tracking: container element not found for selector {0:?}")]
    ContainerNotFound(String),
    #[error("order tracking: container element reference is null")]
    NullContainer,
    #[error("order tracking: invalid container selector: {0}")]
    InvalidSelector(#[from] SelectorError),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SelectorError {
    #[error("selector is empty")]
    Empty,
    #[error("unsupported selector syntax near {0:?}")]
    Unsupported(String),
    #[error("unterminated attribute selector")]
    UnterminatedAttribute,
}

/// Failure of the tracking request itself, before the body is interpreted.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchError {
    #[error("request failed: {0}")]
    Transport(String),
    /// The raw body is kept so servers that answer with a plain-text
    /// message still have it show up in the error text.
    #[error("invalid JSON in response ({reason}): {body}")]
    InvalidJson { reason: String, body: String },
}

/// Errors handed to the host's error callback.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TrackingError {
    #[error("{0}")]
    NotFound(String),
    #[error("{0}")]
    NotShipped(String),
    #[error(transparent)]
    Request(#[from] FetchError),
}

#[derive(Debug, Error)]
pub enum PlatformError {
    #[error("failed to open {url}: {source}")]
    Open {
        url: String,
        #[source]
        source: std::io::Error,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tracking_error_display_is_the_message() {
        let err = TrackingError::NotShipped("not yet".to_string());
        assert_eq!(err.to_string(), "not yet");

        let err = TrackingError::from(FetchError::Transport("connection refused".to_string()));
        assert_eq!(err.to_string(), "request failed: connection refused");
    }

    #[test]
    fn test_invalid_json_message_carries_body() {
        let err = FetchError::InvalidJson {
            reason: "expected value at line 1 column 1".to_string(),
            body: "Could Not Find Order".to_string(),
        };
        assert!(err.to_string().contains("Could Not Find Order"));
    }
}
