//! The sound pool: public handle, builder, and the worker task that owns
//! all playback handles.
//!
//! All mutating operations (`prepare`, `play`, `tear_down`) are commands on
//! a single queue consumed by one worker task, so their read-modify-write of
//! the handle pool and cursor map never interleaves. The public methods push
//! a command and return immediately; they report no result, and failures are
//! visible only through the [`LogSink`] side channel.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::playback::{Player, PlayerProvider};
use crate::sink::NoopSink;
use crate::{round_robin, AssetId, LogSink, PoolEvent};

/// Handles created per asset when `prepare` is called without a count.
const DEFAULT_HANDLE_COUNT: usize = 1;

/// Volume applied when `prepare` is called without one.
const DEFAULT_VOLUME: f32 = 1.0;

/// Command sent to the pool worker.
enum PoolCommand {
    /// Ensure at least `desired_count` handles exist for the asset.
    Prepare {
        asset_id: AssetId,
        desired_count: usize,
        volume: f32,
    },
    /// Dispatch one playback trigger round-robin across the asset's handles.
    Play { asset_id: AssetId },
    /// Stop and remove every handle for the asset, forget its cursor.
    TearDown { asset_id: AssetId },
}

/// Counters shared between the pool handle and the worker.
struct PoolState {
    plays_dispatched: AtomicU64,
    prepare_failures: AtomicU64,
    missing_asset_plays: AtomicU64,
}

impl PoolState {
    fn new() -> Self {
        Self {
            plays_dispatched: AtomicU64::new(0),
            prepare_failures: AtomicU64::new(0),
            missing_asset_plays: AtomicU64::new(0),
        }
    }
}

/// Statistics about pool activity.
///
/// Counters are updated by the worker as commands execute, so a value read
/// right after a fire-and-forget call may not include that call yet.
#[derive(Debug, Clone, Default)]
pub struct PoolStats {
    /// Play commands that selected a handle and triggered playback.
    pub plays_dispatched: u64,
    /// Prepare calls that aborted early because a handle failed to construct.
    pub prepare_failures: u64,
    /// Play commands for assets with no handles in the pool.
    pub missing_asset_plays: u64,
}

/// The worker task: sole owner of the handle pool and cursor map.
struct PoolWorker {
    /// All handles across all assets, in creation order. Round-robin cursors
    /// are positions into this shared sequence filtered by asset.
    players: Vec<Box<dyn Player>>,
    /// Next search start per asset. Created lazily on first play, stored
    /// un-wrapped (`found index + 1`); the finder's wrap pass brings an
    /// out-of-range cursor back to the front.
    cursors: HashMap<AssetId, usize>,
    provider: Box<dyn PlayerProvider>,
    log_sink: Arc<dyn LogSink>,
    state: Arc<PoolState>,
}

impl PoolWorker {
    async fn run(mut self, mut cmd_rx: mpsc::UnboundedReceiver<PoolCommand>) {
        while let Some(cmd) = cmd_rx.recv().await {
            match cmd {
                PoolCommand::Prepare {
                    asset_id,
                    desired_count,
                    volume,
                } => self.prepare(asset_id, desired_count, volume),
                PoolCommand::Play { asset_id } => self.play(asset_id),
                PoolCommand::TearDown { asset_id } => self.tear_down(&asset_id),
            }
        }

        // Channel closed: every pool handle is gone (or close() was called
        // and the queue is drained). Silence anything still playing.
        for player in &mut self.players {
            if player.is_playing() {
                player.stop();
            }
        }
        tracing::debug!("pool worker stopped");
    }

    fn prepare(&mut self, asset_id: AssetId, desired_count: usize, volume: f32) {
        let desired_count = desired_count.max(1);
        let volume = volume.clamp(0.0, 1.0);

        let existing = self
            .players
            .iter()
            .filter(|p| *p.asset_id() == asset_id)
            .count();
        if existing >= desired_count {
            return;
        }

        tracing::debug!(
            asset = %asset_id,
            existing,
            desired_count,
            "preparing playback handles"
        );

        // Append only the deficit. Existing handles keep their volume.
        for _ in existing..desired_count {
            match self.provider.create_player(&asset_id, volume) {
                Ok(player) => self.players.push(player),
                Err(err) => {
                    // Abort the rest of this request, keep what was created.
                    tracing::warn!(asset = %asset_id, %err, "handle construction failed");
                    self.state.prepare_failures.fetch_add(1, Ordering::SeqCst);
                    self.emit(PoolEvent::PrepareFailed {
                        asset_id,
                        error: err.to_string(),
                    });
                    return;
                }
            }
        }
    }

    fn play(&mut self, asset_id: AssetId) {
        let cursor = self.cursors.get(&asset_id).copied().unwrap_or(0);
        let found = round_robin::find_from(&self.players, cursor, |p| *p.asset_id() == asset_id)
            .map(|(index, _)| index);

        let Some(index) = found else {
            tracing::debug!(asset = %asset_id, "play requested with no prepared handles");
            self.state.missing_asset_plays.fetch_add(1, Ordering::SeqCst);
            self.emit(PoolEvent::PlayerNotFound { asset_id });
            return;
        };

        self.cursors.insert(asset_id, index + 1);

        let player = &mut self.players[index];
        if player.is_playing() {
            player.seek_to_start();
        }
        player.play();
        self.state.plays_dispatched.fetch_add(1, Ordering::SeqCst);
    }

    fn tear_down(&mut self, asset_id: &AssetId) {
        self.cursors.remove(asset_id);
        let mut removed = 0usize;
        // Stop matches before dropping them from the pool.
        for player in self.players.iter_mut().filter(|p| p.asset_id() == asset_id) {
            player.stop();
            removed += 1;
        }
        self.players.retain(|p| p.asset_id() != asset_id);
        if removed > 0 {
            tracing::debug!(asset = %asset_id, removed, "tore down playback handles");
        }
    }

    /// Hands an event to the sink without waiting on it. A slow or failing
    /// sink must never stall the command queue.
    fn emit(&self, event: PoolEvent) {
        let sink = Arc::clone(&self.log_sink);
        tokio::spawn(async move {
            sink.track_event(event).await;
        });
    }
}

/// Builder for a [`SoundPool`].
///
/// Created by [`SoundPool::builder()`]. The playback provider is required;
/// the log sink defaults to [`NoopSink`].
#[must_use]
pub struct SoundPoolBuilder {
    provider: Box<dyn PlayerProvider>,
    log_sink: Arc<dyn LogSink>,
}

impl SoundPoolBuilder {
    /// Sets the sink that receives pool events.
    pub fn log_sink<S: LogSink + 'static>(mut self, sink: S) -> Self {
        self.log_sink = Arc::new(sink);
        self
    }

    /// Spawns the pool worker and returns the pool handle.
    ///
    /// Must be called from within a tokio runtime, since the worker runs as
    /// a spawned task.
    pub fn start(self) -> SoundPool {
        let (cmd_tx, cmd_rx) = mpsc::unbounded_channel();
        let state = Arc::new(PoolState::new());

        let worker = PoolWorker {
            players: Vec::new(),
            cursors: HashMap::new(),
            provider: self.provider,
            log_sink: self.log_sink,
            state: Arc::clone(&state),
        };
        let worker_handle = tokio::spawn(worker.run(cmd_rx));

        SoundPool {
            cmd_tx,
            worker_handle: Some(worker_handle),
            state,
        }
    }
}

/// A pool of preloaded playback handles with round-robin dispatch.
///
/// Register an asset with [`prepare`](SoundPool::prepare) (or
/// [`prepare_with`](SoundPool::prepare_with) for overlap), trigger it with
/// [`play`](SoundPool::play), and release it with
/// [`tear_down`](SoundPool::tear_down). With several handles prepared,
/// rapid-fire triggers of the same asset rotate across them and overlap
/// audibly; with a single handle, a retrigger restarts it from the top.
///
/// All three operations are safe to call from any thread or task, never
/// block, and return before the work executes. There is deliberately no
/// completion signal or error return: a `prepare` issued immediately before
/// a `play` is queued ahead of it, but the caller gets no confirmation the
/// handles exist yet. Failures surface through the configured [`LogSink`].
///
/// # Example
///
/// ```ignore
/// use sound_pool::playback::mock::MockPlayback;
/// use sound_pool::{SoundPool, TracingSink};
///
/// let pool = SoundPool::builder(MockPlayback::new())
///     .log_sink(TracingSink)
///     .start();
///
/// pool.prepare_with("sfx/laser.wav", 4, 0.8);
/// pool.play("sfx/laser.wav");
/// pool.play("sfx/laser.wav"); // overlaps on a second handle
///
/// pool.tear_down("sfx/laser.wav");
/// pool.close().await;
/// ```
pub struct SoundPool {
    cmd_tx: mpsc::UnboundedSender<PoolCommand>,
    worker_handle: Option<JoinHandle<()>>,
    state: Arc<PoolState>,
}

impl SoundPool {
    /// Creates a builder around the given playback provider.
    pub fn builder<P: PlayerProvider + 'static>(provider: P) -> SoundPoolBuilder {
        SoundPoolBuilder {
            provider: Box::new(provider),
            log_sink: Arc::new(NoopSink),
        }
    }

    /// Ensures one playback handle exists for `asset_id`, at full volume.
    ///
    /// Shorthand for `prepare_with(asset_id, 1, 1.0)`.
    pub fn prepare(&self, asset_id: impl Into<AssetId>) {
        self.prepare_with(asset_id, DEFAULT_HANDLE_COUNT, DEFAULT_VOLUME);
    }

    /// Ensures at least `desired_count` playback handles exist for
    /// `asset_id`, each new one configured with `volume`.
    ///
    /// Top-up only: if enough handles already exist, nothing is created or
    /// removed, and existing handles keep the volume they were built with.
    /// `volume` is clamped into `[0.0, 1.0]`; a `desired_count` of zero is
    /// treated as one. A handle that fails to load aborts the remainder of
    /// this call (earlier handles are kept) and emits a
    /// [`PoolEvent::PrepareFailed`] event.
    pub fn prepare_with(&self, asset_id: impl Into<AssetId>, desired_count: usize, volume: f32) {
        let _ = self.cmd_tx.send(PoolCommand::Prepare {
            asset_id: asset_id.into(),
            desired_count,
            volume,
        });
    }

    /// Triggers one playback of `asset_id`.
    ///
    /// Selects the next handle for the asset round-robin, restarting it from
    /// the top if it is mid-playback. Never waits for a free handle. If the
    /// asset has no handles (never prepared, or torn down), no playback
    /// occurs and a [`PoolEvent::PlayerNotFound`] event is emitted.
    pub fn play(&self, asset_id: impl Into<AssetId>) {
        let _ = self.cmd_tx.send(PoolCommand::Play {
            asset_id: asset_id.into(),
        });
    }

    /// Stops and removes every handle for `asset_id` and forgets its
    /// round-robin cursor.
    ///
    /// The next `prepare` for the asset starts cold. Idempotent: tearing
    /// down an asset with no handles does nothing and emits nothing.
    pub fn tear_down(&self, asset_id: impl Into<AssetId>) {
        let _ = self.cmd_tx.send(PoolCommand::TearDown {
            asset_id: asset_id.into(),
        });
    }

    /// Returns a snapshot of the pool's activity counters.
    pub fn stats(&self) -> PoolStats {
        PoolStats {
            plays_dispatched: self.state.plays_dispatched.load(Ordering::SeqCst),
            prepare_failures: self.state.prepare_failures.load(Ordering::SeqCst),
            missing_asset_plays: self.state.missing_asset_plays.load(Ordering::SeqCst),
        }
    }

    /// Gracefully shuts the pool down.
    ///
    /// Closes the command queue, lets the worker drain every command already
    /// submitted, stops any handle still playing, and waits for the worker
    /// task to finish. Dropping the pool without calling this also stops the
    /// worker, but without waiting for it.
    pub async fn close(mut self) {
        let handle = self.worker_handle.take();
        // Dropping the sender closes the channel; recv() drains what's left.
        drop(self);
        if let Some(handle) = handle {
            let _ = handle.await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::playback::mock::{MockPlayback, PlayerCommand};

    fn worker_with(mock: &MockPlayback) -> PoolWorker {
        PoolWorker {
            players: Vec::new(),
            cursors: HashMap::new(),
            provider: Box::new(mock.clone()),
            log_sink: Arc::new(NoopSink),
            state: Arc::new(PoolState::new()),
        }
    }

    #[test]
    fn test_prepare_creates_requested_handles() {
        let mock = MockPlayback::new();
        let mut worker = worker_with(&mock);

        worker.prepare("laser".into(), 3, 0.8);

        assert_eq!(mock.created_count(), 3);
        for (asset, volume) in mock.created() {
            assert_eq!(asset, AssetId::new("laser"));
            assert!((volume - 0.8).abs() < f32::EPSILON);
        }
    }

    #[test]
    fn test_prepare_tops_up_to_maximum_requested() {
        let mock = MockPlayback::new();
        let mut worker = worker_with(&mock);

        worker.prepare("laser".into(), 2, 1.0);
        worker.prepare("laser".into(), 5, 1.0);
        // Lower and equal requests change nothing.
        worker.prepare("laser".into(), 3, 1.0);
        worker.prepare("laser".into(), 5, 1.0);

        assert_eq!(mock.created_count(), 5);
        assert_eq!(worker.players.len(), 5);
    }

    #[test]
    fn test_prepare_repeat_does_not_touch_existing_volume() {
        let mock = MockPlayback::new();
        let mut worker = worker_with(&mock);

        worker.prepare("laser".into(), 1, 0.3);
        worker.prepare("laser".into(), 2, 0.9);

        let created = mock.created();
        assert!((created[0].1 - 0.3).abs() < f32::EPSILON);
        assert!((created[1].1 - 0.9).abs() < f32::EPSILON);
    }

    #[test]
    fn test_prepare_clamps_volume_and_count() {
        let mock = MockPlayback::new();
        let mut worker = worker_with(&mock);

        worker.prepare("loud".into(), 0, 7.5);
        worker.prepare("quiet".into(), 1, -2.0);

        let created = mock.created();
        assert_eq!(created.len(), 2);
        assert!((created[0].1 - 1.0).abs() < f32::EPSILON);
        assert!((created[1].1 - 0.0).abs() < f32::EPSILON);
    }

    #[tokio::test]
    async fn test_prepare_keeps_partial_success_on_load_failure() {
        let mock = MockPlayback::new();
        let mut worker = worker_with(&mock);
        mock.fail_load_attempt(1);

        worker.prepare("laser".into(), 3, 1.0);

        // First handle created, second failed, third never attempted.
        assert_eq!(mock.created_count(), 1);
        assert_eq!(worker.players.len(), 1);
        assert_eq!(worker.state.prepare_failures.load(Ordering::SeqCst), 1);

        // The pool stays usable: a later prepare tops up past the failure.
        worker.prepare("laser".into(), 3, 1.0);
        assert_eq!(worker.players.len(), 3);
    }

    #[test]
    fn test_play_single_handle_restarts_when_busy() {
        let mock = MockPlayback::new();
        let mut worker = worker_with(&mock);

        worker.prepare("laser".into(), 1, 1.0);
        worker.play("laser".into());
        worker.play("laser".into());

        assert_eq!(
            mock.commands(),
            vec![
                PlayerCommand::Play { handle: 0 },
                PlayerCommand::SeekToStart { handle: 0 },
                PlayerCommand::Play { handle: 0 },
            ]
        );
    }

    #[test]
    fn test_play_round_robin_rotates_and_wraps() {
        let mock = MockPlayback::new();
        let mut worker = worker_with(&mock);

        worker.prepare("laser".into(), 3, 1.0);
        for _ in 0..4 {
            worker.play("laser".into());
        }

        // Three distinct handles in preparation order, then wrap to the
        // first, which is still playing and gets restarted.
        assert_eq!(
            mock.commands(),
            vec![
                PlayerCommand::Play { handle: 0 },
                PlayerCommand::Play { handle: 1 },
                PlayerCommand::Play { handle: 2 },
                PlayerCommand::SeekToStart { handle: 0 },
                PlayerCommand::Play { handle: 0 },
            ]
        );
        assert_eq!(worker.state.plays_dispatched.load(Ordering::SeqCst), 4);
    }

    #[test]
    fn test_play_cursor_survives_pool_growth() {
        let mock = MockPlayback::new();
        let mut worker = worker_with(&mock);

        // One handle, one play: cursor for the asset is now 1.
        worker.prepare("laser".into(), 1, 1.0);
        worker.play("laser".into());

        // Grow to three handles; new ones append after the existing one.
        worker.prepare("laser".into(), 3, 1.0);
        worker.play("laser".into());
        worker.play("laser".into());
        worker.play("laser".into());

        // The three plays pick up at the cursor: h1, h2, then wrap to h0.
        let mut commands = mock.commands();
        commands.retain(|c| matches!(c, PlayerCommand::Play { .. }));
        assert_eq!(
            commands,
            vec![
                PlayerCommand::Play { handle: 0 },
                PlayerCommand::Play { handle: 1 },
                PlayerCommand::Play { handle: 2 },
                PlayerCommand::Play { handle: 0 },
            ]
        );
        assert_eq!(worker.cursors.get(&AssetId::new("laser")), Some(&1));
    }

    #[test]
    fn test_play_ignores_playing_state_for_selection() {
        let mock = MockPlayback::new();
        let mut worker = worker_with(&mock);

        worker.prepare("laser".into(), 2, 1.0);
        worker.play("laser".into());
        // Handle 0 finishes on its own; rotation still moves to handle 1.
        mock.finish(0);
        worker.play("laser".into());

        assert_eq!(
            mock.commands(),
            vec![
                PlayerCommand::Play { handle: 0 },
                PlayerCommand::Play { handle: 1 },
            ]
        );
    }

    #[test]
    fn test_play_interleaved_assets_keep_independent_cursors() {
        let mock = MockPlayback::new();
        let mut worker = worker_with(&mock);

        worker.prepare("laser".into(), 2, 1.0); // handles 0, 1
        worker.prepare("boom".into(), 2, 1.0); // handles 2, 3

        worker.play("laser".into());
        worker.play("boom".into());
        worker.play("laser".into());
        worker.play("boom".into());

        assert_eq!(
            mock.commands(),
            vec![
                PlayerCommand::Play { handle: 0 },
                PlayerCommand::Play { handle: 2 },
                PlayerCommand::Play { handle: 1 },
                PlayerCommand::Play { handle: 3 },
            ]
        );
    }

    #[tokio::test]
    async fn test_play_without_prepare_emits_nothing_to_handles() {
        let mock = MockPlayback::new();
        let mut worker = worker_with(&mock);

        worker.play("never-prepared".into());

        assert!(mock.commands().is_empty());
        assert_eq!(worker.state.missing_asset_plays.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_tear_down_stops_and_removes_only_matching_handles() {
        let mock = MockPlayback::new();
        let mut worker = worker_with(&mock);

        worker.prepare("laser".into(), 2, 1.0); // handles 0, 1
        worker.prepare("boom".into(), 1, 1.0); // handle 2
        worker.play("laser".into());

        worker.tear_down(&"laser".into());

        assert_eq!(worker.players.len(), 1);
        assert_eq!(worker.players[0].asset_id(), &AssetId::new("boom"));
        assert!(worker.cursors.get(&AssetId::new("laser")).is_none());

        let commands = mock.commands();
        assert!(commands.contains(&PlayerCommand::Stop { handle: 0 }));
        assert!(commands.contains(&PlayerCommand::Stop { handle: 1 }));
        assert!(!commands.contains(&PlayerCommand::Stop { handle: 2 }));
    }

    #[tokio::test]
    async fn test_tear_down_then_play_reports_missing() {
        let mock = MockPlayback::new();
        let mut worker = worker_with(&mock);

        worker.prepare("laser".into(), 2, 1.0);
        worker.tear_down(&"laser".into());
        worker.play("laser".into());

        assert_eq!(worker.state.missing_asset_plays.load(Ordering::SeqCst), 1);
        assert!(!mock
            .commands()
            .iter()
            .any(|c| matches!(c, PlayerCommand::Play { .. })));
    }

    #[test]
    fn test_tear_down_unknown_asset_is_noop() {
        let mock = MockPlayback::new();
        let mut worker = worker_with(&mock);

        worker.tear_down(&"nothing".into());

        assert!(mock.commands().is_empty());
        assert!(worker.players.is_empty());
    }

    #[test]
    fn test_tear_down_resets_cursor_for_fresh_prepare() {
        let mock = MockPlayback::new();
        let mut worker = worker_with(&mock);

        worker.prepare("laser".into(), 2, 1.0);
        worker.play("laser".into());
        worker.tear_down(&"laser".into());

        // Cold start: new handles, rotation begins at the first again.
        worker.prepare("laser".into(), 2, 1.0); // handles 2, 3
        worker.play("laser".into());

        let last = mock.commands().into_iter().last().unwrap();
        assert_eq!(last, PlayerCommand::Play { handle: 2 });
    }
}
