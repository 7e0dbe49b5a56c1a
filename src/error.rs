//! Error types for sound-pool.
//!
//! Nothing here crosses the public pool API: `prepare`, `play`, and
//! `tear_down` are fire-and-forget and report no result. A [`LoadError`]
//! surfaces only through the [`LogSink`](crate::LogSink) side channel (as a
//! [`PoolEvent::PrepareFailed`](crate::PoolEvent::PrepareFailed) event) and
//! through `tracing`.

use crate::AssetId;

/// A playback handle failed to construct during `prepare`.
///
/// Recoverable and local: the pool keeps any handles created before the
/// failure and stays fully usable afterwards.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    /// The asset could not be opened.
    #[error("failed to open asset {asset_id}: {source}")]
    Open {
        /// Asset whose resource could not be opened.
        asset_id: AssetId,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The asset was opened but could not be decoded.
    #[error("failed to decode asset {asset_id}: {reason}")]
    Decode {
        /// Asset that failed to decode.
        asset_id: AssetId,
        /// Description of the decode failure.
        reason: String,
    },

    /// Custom error for user-implemented providers.
    #[error("{0}")]
    Custom(String),
}

impl LoadError {
    /// Creates an open error for the given asset.
    pub fn open(asset_id: impl Into<AssetId>, source: std::io::Error) -> Self {
        Self::Open {
            asset_id: asset_id.into(),
            source,
        }
    }

    /// Creates a decode error for the given asset.
    pub fn decode(asset_id: impl Into<AssetId>, reason: impl Into<String>) -> Self {
        Self::Decode {
            asset_id: asset_id.into(),
            reason: reason.into(),
        }
    }

    /// Creates a custom load error with the given message.
    pub fn custom(msg: impl Into<String>) -> Self {
        Self::Custom(msg.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_error_open_display() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "no such file");
        let err = LoadError::open("sfx/laser.wav", io_err);
        assert!(err.to_string().contains("sfx/laser.wav"));
        assert!(err.to_string().contains("failed to open"));
    }

    #[test]
    fn test_load_error_decode_display() {
        let err = LoadError::decode("sfx/laser.wav", "truncated stream");
        assert_eq!(
            err.to_string(),
            "failed to decode asset sfx/laser.wav: truncated stream"
        );
    }

    #[test]
    fn test_load_error_custom() {
        let err = LoadError::custom("backend offline");
        assert_eq!(err.to_string(), "backend offline");
    }
}
