//! # Router Error Types
//!
//! Error taxonomy for the offline cache router.

use std::time::Duration;

use bridge_traits::BridgeError;
use thiserror::Error;

/// Errors that can occur while routing events and requests.
#[derive(Error, Debug)]
pub enum RouterError {
    /// Worker configuration was rejected.
    #[error("Configuration error: {0}")]
    Config(String),

    /// A shell-manifest fetch failed during install. Fatal to the attempt;
    /// no partial namespace is left behind.
    #[error("Install failed: {0}")]
    InstallFailed(String),

    /// A CACHE_URLS bulk-add failed. Nothing from the batch is stored.
    #[error("Failed to cache URLs: {0}")]
    CacheUrlsFailed(String),

    /// A fetch did not settle within its time limit.
    #[error("Request timed out after {0:?}")]
    Timeout(Duration),

    /// Live fetch failed and no cached fallback exists. Only the navigation
    /// and default classes surface this; static and API requests always get
    /// a synthesized response instead.
    #[error("'{url}' unreachable with no cached fallback: {message}")]
    Unreachable { url: String, message: String },

    /// A host capability reported a failure.
    #[error(transparent)]
    Bridge(#[from] BridgeError),
}

impl RouterError {
    /// Returns `true` if this error means the network could not be reached.
    pub fn is_network_error(&self) -> bool {
        matches!(
            self,
            RouterError::Timeout(_)
                | RouterError::Unreachable { .. }
                | RouterError::Bridge(BridgeError::Network(_))
        )
    }
}

/// Result type for router operations.
pub type Result<T> = std::result::Result<T, RouterError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_network_error_classification() {
        assert!(RouterError::Timeout(Duration::from_secs(5)).is_network_error());
        assert!(RouterError::Unreachable {
            url: "/about".to_string(),
            message: "offline".to_string(),
        }
        .is_network_error());
        assert!(RouterError::Bridge(BridgeError::Network("refused".to_string()))
            .is_network_error());

        assert!(!RouterError::Config("bad origin".to_string()).is_network_error());
        assert!(!RouterError::InstallFailed("404".to_string()).is_network_error());
    }
}
