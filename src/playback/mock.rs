//! Mock playback backend for testing without audio hardware.

use std::collections::HashSet;
use std::sync::Arc;

use parking_lot::Mutex;

use crate::{AssetId, LoadError, Player, PlayerProvider};

/// A command issued to a mock handle, tagged with the handle's creation
/// ordinal (0 for the first handle the provider constructed, and so on).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlayerCommand {
    /// `play()` was called on the handle.
    Play {
        /// Creation ordinal of the handle.
        handle: usize,
    },
    /// `seek_to_start()` was called on the handle.
    SeekToStart {
        /// Creation ordinal of the handle.
        handle: usize,
    },
    /// `stop()` was called on the handle.
    Stop {
        /// Creation ordinal of the handle.
        handle: usize,
    },
}

#[derive(Default)]
struct MockState {
    /// One entry per constructed handle: the asset and volume it was built with.
    created: Vec<(AssetId, f32)>,
    /// Every play/seek/stop in issue order, across all handles.
    commands: Vec<PlayerCommand>,
    /// Playing flag per constructed handle, indexed by creation ordinal.
    playing: Vec<bool>,
    /// Create-call ordinals that should fail with a [`LoadError`].
    fail_attempts: HashSet<usize>,
    /// Create calls seen so far (including failed ones).
    attempts: usize,
}

/// A recording [`PlayerProvider`] that fabricates handles in memory.
///
/// Every construction and handle command is recorded into shared state, so
/// tests can assert on exactly which handle the pool selected and what it
/// told it to do. Load failures can be injected per create-call ordinal.
///
/// Clones share the same recording state, so keep a clone outside the pool
/// to inspect it after the pool takes ownership of the provider.
///
/// # Example
///
/// ```
/// use sound_pool::playback::mock::{MockPlayback, PlayerCommand};
/// use sound_pool::{AssetId, Player, PlayerProvider};
///
/// let mock = MockPlayback::new();
/// let mut player = mock
///     .create_player(&AssetId::new("sfx/laser.wav"), 0.8)
///     .unwrap();
///
/// player.play();
/// assert!(player.is_playing());
/// assert_eq!(mock.commands(), vec![PlayerCommand::Play { handle: 0 }]);
/// ```
#[derive(Clone, Default)]
pub struct MockPlayback {
    state: Arc<Mutex<MockState>>,
}

impl MockPlayback {
    /// Creates a mock provider with empty recording state.
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes the create call with the given zero-based ordinal fail.
    ///
    /// Ordinals count every `create_player` call on this provider,
    /// successful or not.
    pub fn fail_load_attempt(&self, attempt: usize) {
        self.state.lock().fail_attempts.insert(attempt);
    }

    /// Returns `(asset_id, volume)` for each handle constructed so far.
    pub fn created(&self) -> Vec<(AssetId, f32)> {
        self.state.lock().created.clone()
    }

    /// Number of handles constructed so far.
    pub fn created_count(&self) -> usize {
        self.state.lock().created.len()
    }

    /// Every command issued to any handle, in order.
    pub fn commands(&self) -> Vec<PlayerCommand> {
        self.state.lock().commands.clone()
    }

    /// Whether the handle with the given creation ordinal is playing.
    pub fn is_playing(&self, handle: usize) -> bool {
        self.state.lock().playing.get(handle).copied().unwrap_or(false)
    }

    /// Silently marks a handle as no longer playing, as if its audio ran to
    /// the end. Records no command.
    pub fn finish(&self, handle: usize) {
        let mut state = self.state.lock();
        if let Some(flag) = state.playing.get_mut(handle) {
            *flag = false;
        }
    }
}

impl PlayerProvider for MockPlayback {
    fn create_player(
        &self,
        asset_id: &AssetId,
        volume: f32,
    ) -> Result<Box<dyn Player>, LoadError> {
        let mut state = self.state.lock();
        let attempt = state.attempts;
        state.attempts += 1;

        if state.fail_attempts.contains(&attempt) {
            return Err(LoadError::decode(asset_id.clone(), "injected load failure"));
        }

        let index = state.created.len();
        state.created.push((asset_id.clone(), volume));
        state.playing.push(false);

        Ok(Box::new(MockPlayer {
            asset_id: asset_id.clone(),
            volume,
            index,
            state: Arc::clone(&self.state),
        }))
    }
}

/// Handle fabricated by [`MockPlayback`].
struct MockPlayer {
    asset_id: AssetId,
    volume: f32,
    index: usize,
    state: Arc<Mutex<MockState>>,
}

impl Player for MockPlayer {
    fn asset_id(&self) -> &AssetId {
        &self.asset_id
    }

    fn volume(&self) -> f32 {
        self.volume
    }

    fn play(&mut self) {
        let mut state = self.state.lock();
        state.playing[self.index] = true;
        state.commands.push(PlayerCommand::Play { handle: self.index });
    }

    fn stop(&mut self) {
        let mut state = self.state.lock();
        state.playing[self.index] = false;
        state.commands.push(PlayerCommand::Stop { handle: self.index });
    }

    fn is_playing(&self) -> bool {
        self.state.lock().playing[self.index]
    }

    fn seek_to_start(&mut self) {
        let mut state = self.state.lock();
        state
            .commands
            .push(PlayerCommand::SeekToStart { handle: self.index });
    }
}
