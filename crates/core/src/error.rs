//! Unified error types for seawall.

/// Unified error type shared by the worker crates.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Manifest payload failed ingestion validation (duplicate or
    /// mismatched ids, dangling parent references, parent cycles).
    #[error("INVALID_MANIFEST: {0}")]
    InvalidManifest(String),

    /// A request or population URL could not be parsed or resolved.
    #[error("INVALID_URL: {0}")]
    InvalidUrl(String),

    /// Transport-level network failure. HTTP error responses are not
    /// errors; they are delivered as ordinary responses.
    #[error("NETWORK_ERROR: {0}")]
    Network(String),

    /// A population fetch answered with a status outside the 200 range.
    #[error("HTTP_ERROR: unexpected status {0}")]
    UnexpectedStatus(u16),

    /// Cache store read or write failed.
    #[error("STORE_ERROR: {0}")]
    Store(String),

    /// Push payload was not valid JSON.
    #[error("INVALID_PUSH: {0}")]
    InvalidPush(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::InvalidManifest("route x: parent missing".to_string());
        assert!(err.to_string().contains("INVALID_MANIFEST"));
        assert!(err.to_string().contains("parent missing"));
    }

    #[test]
    fn test_unexpected_status_display() {
        let err = Error::UnexpectedStatus(404);
        assert!(err.to_string().contains("404"));
    }
}
