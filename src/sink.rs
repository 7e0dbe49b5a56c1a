//! Log sink trait and built-in implementations.
//!
//! A [`LogSink`] is the pool's only failure-visibility channel: the public
//! operations are fire-and-forget, so load failures and missing-asset plays
//! are reported here instead of being returned to the caller. The crate
//! provides two built-in sinks:
//!
//! - [`NoopSink`]: discards everything (the default when none is injected)
//! - [`TracingSink`]: forwards events to `tracing` at a level derived from
//!   the event severity
//!
//! Implement [`LogSink`] to forward events to an analytics backend.

use std::collections::HashMap;

use async_trait::async_trait;

use crate::{PoolEvent, Severity};

/// Destination for pool events and user properties.
///
/// Invoked from the pool's internal worker, but best-effort: `track_event`
/// futures are spawned rather than awaited, so a slow or failing sink never
/// delays or fails a pool operation.
///
/// # Implementation Notes
///
/// - Methods take `&self` - use interior mutability if needed
/// - `track_event` runs on the tokio runtime, detached from the worker
/// - `add_user_properties` is part of the sink contract but never called by
///   the pool itself; the default implementation does nothing
///
/// # Example
///
/// ```
/// use sound_pool::{LogSink, PoolEvent};
/// use async_trait::async_trait;
///
/// struct PrintSink;
///
/// #[async_trait]
/// impl LogSink for PrintSink {
///     async fn track_event(&self, event: PoolEvent) {
///         println!("[{:?}] {}", event.severity(), event.name());
///     }
/// }
/// ```
#[async_trait]
pub trait LogSink: Send + Sync {
    /// Records one pool event.
    ///
    /// Each call runs as its own detached task, so events emitted in quick
    /// succession may arrive out of emission order. Sinks that need ordering
    /// should sequence on a timestamp or queue internally.
    async fn track_event(&self, event: PoolEvent);

    /// Attaches user-level properties to the analytics context.
    ///
    /// Unused by the pool; available to application code sharing the sink.
    /// Default implementation does nothing.
    async fn add_user_properties(&self, properties: HashMap<String, String>, high_priority: bool) {
        let _ = (properties, high_priority);
    }
}

/// A sink that discards all events.
///
/// Used when no sink is configured on the builder.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopSink;

#[async_trait]
impl LogSink for NoopSink {
    async fn track_event(&self, _event: PoolEvent) {}
}

/// A sink that forwards events to [`tracing`].
///
/// Severity maps to tracing levels: `Severe` to `error`, `Warning` to
/// `warn`, `Analytic` to `debug`, `Info` to `info`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

#[async_trait]
impl LogSink for TracingSink {
    async fn track_event(&self, event: PoolEvent) {
        let name = event.name();
        let params = event.params();
        match event.severity() {
            Severity::Severe => tracing::error!(name, ?params, "pool event"),
            Severity::Warning => tracing::warn!(name, ?params, "pool event"),
            Severity::Analytic => tracing::debug!(name, ?params, "pool event"),
            Severity::Info => tracing::info!(name, ?params, "pool event"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    struct CountingSink {
        events: AtomicUsize,
    }

    #[async_trait]
    impl LogSink for CountingSink {
        async fn track_event(&self, _event: PoolEvent) {
            self.events.fetch_add(1, Ordering::SeqCst);
        }
    }

    #[tokio::test]
    async fn test_counting_sink_receives_events() {
        let sink = Arc::new(CountingSink {
            events: AtomicUsize::new(0),
        });

        sink.track_event(PoolEvent::PlayerNotFound {
            asset_id: "sfx/laser.wav".into(),
        })
        .await;

        assert_eq!(sink.events.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_default_add_user_properties_is_noop() {
        let sink = NoopSink;
        let mut props = HashMap::new();
        props.insert("tier".to_string(), "premium".to_string());
        // Just exercises the default implementation.
        sink.add_user_properties(props, true).await;
    }

    #[tokio::test]
    async fn test_tracing_sink_accepts_all_severities() {
        let sink = TracingSink;
        sink.track_event(PoolEvent::PrepareFailed {
            asset_id: "a".into(),
            error: "boom".to_string(),
        })
        .await;
        sink.track_event(PoolEvent::PlayerNotFound {
            asset_id: "a".into(),
        })
        .await;
    }
}
