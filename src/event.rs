//! Runtime events for observing pool behavior.
//!
//! Events are non-fatal notifications delivered to the configured
//! [`LogSink`](crate::LogSink). The pool continues running after any event
//! is emitted - they exist for logging and analytics, not error handling.
//! Successful operations emit nothing.

use std::collections::HashMap;

use crate::AssetId;

/// Severity attached to an emitted event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Severity {
    /// Informational.
    Info,
    /// Expected-but-notable behavior, recorded for analytics.
    Analytic,
    /// Something degraded but the operation proceeded.
    Warning,
    /// An operation failed. Still recoverable at the pool level.
    Severe,
}

/// Events emitted by the pool through its log sink.
///
/// Each event exposes a stable [`name()`](PoolEvent::name), a
/// [`severity()`](PoolEvent::severity), and a flat string parameter map via
/// [`params()`](PoolEvent::params), matching the sink contract.
///
/// # Example
///
/// ```
/// use sound_pool::{PoolEvent, Severity};
///
/// let event = PoolEvent::PlayerNotFound {
///     asset_id: "sfx/laser.wav".into(),
/// };
/// assert_eq!(event.name(), "player_not_found");
/// assert_eq!(event.severity(), Severity::Analytic);
/// ```
#[derive(Debug, Clone)]
pub enum PoolEvent {
    /// A playback handle failed to construct during `prepare`.
    ///
    /// Handles created earlier in the same call are kept; the remainder of
    /// the requested count is abandoned.
    PrepareFailed {
        /// Asset whose handle failed to construct.
        asset_id: AssetId,
        /// Description of the underlying [`LoadError`](crate::LoadError).
        error: String,
    },

    /// `play` was requested for an asset with zero prepared handles.
    ///
    /// Happens when `prepare` was never called for the asset, or after
    /// `tear_down` removed its handles. No playback occurs.
    PlayerNotFound {
        /// Asset that had no handles in the pool.
        asset_id: AssetId,
    },
}

impl PoolEvent {
    /// Stable event name for the sink.
    pub fn name(&self) -> &'static str {
        match self {
            Self::PrepareFailed { .. } => "prepare_failed",
            Self::PlayerNotFound { .. } => "player_not_found",
        }
    }

    /// Severity of this event.
    pub fn severity(&self) -> Severity {
        match self {
            Self::PrepareFailed { .. } => Severity::Severe,
            Self::PlayerNotFound { .. } => Severity::Analytic,
        }
    }

    /// Diagnostic parameters carried by this event.
    pub fn params(&self) -> HashMap<String, String> {
        let mut params = HashMap::new();
        match self {
            Self::PrepareFailed { asset_id, error } => {
                params.insert("asset_id".to_string(), asset_id.to_string());
                params.insert("error".to_string(), error.clone());
            }
            Self::PlayerNotFound { asset_id } => {
                params.insert("asset_id".to_string(), asset_id.to_string());
            }
        }
        params
    }

    /// Asset the event refers to.
    pub fn asset_id(&self) -> &AssetId {
        match self {
            Self::PrepareFailed { asset_id, .. } | Self::PlayerNotFound { asset_id } => asset_id,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prepare_failed_surface() {
        let event = PoolEvent::PrepareFailed {
            asset_id: "sfx/boom.wav".into(),
            error: "failed to decode".to_string(),
        };
        assert_eq!(event.name(), "prepare_failed");
        assert_eq!(event.severity(), Severity::Severe);

        let params = event.params();
        assert_eq!(params.get("asset_id").unwrap(), "sfx/boom.wav");
        assert_eq!(params.get("error").unwrap(), "failed to decode");
    }

    #[test]
    fn test_player_not_found_surface() {
        let event = PoolEvent::PlayerNotFound {
            asset_id: "sfx/laser.wav".into(),
        };
        assert_eq!(event.name(), "player_not_found");
        assert_eq!(event.severity(), Severity::Analytic);
        assert_eq!(event.params().get("asset_id").unwrap(), "sfx/laser.wav");
        assert_eq!(event.asset_id(), &AssetId::new("sfx/laser.wav"));
    }

    #[test]
    fn test_severity_ordering() {
        assert!(Severity::Info < Severity::Analytic);
        assert!(Severity::Analytic < Severity::Warning);
        assert!(Severity::Warning < Severity::Severe);
    }

    #[test]
    fn test_pool_event_clone() {
        let event = PoolEvent::PlayerNotFound {
            asset_id: "sfx/laser.wav".into(),
        };
        let cloned = event.clone();
        assert_eq!(cloned.name(), event.name());
    }
}
