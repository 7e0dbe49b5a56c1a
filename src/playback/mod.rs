//! Playback capability traits.
//!
//! The pool treats the audio primitive as an opaque capability: a
//! [`PlayerProvider`] constructs pre-buffered [`Player`] handles, and the
//! pool only ever calls play/stop/seek on them. This keeps decoding and
//! hardware concerns out of the core and makes the pool testable without
//! audio hardware via [`MockPlayback`](mock::MockPlayback).
//!
//! A real backend over the `rodio` crate is available behind the `rodio`
//! feature.

pub mod mock;

#[cfg(feature = "rodio")]
pub mod rodio;

use crate::{AssetId, LoadError};

/// One preloaded, independently startable instance of a sound asset.
///
/// Playback state (playing/stopped) is owned by the handle and mutated only
/// through these methods; the pool queries it on demand rather than
/// mirroring it.
pub trait Player: Send {
    /// The asset this handle was constructed for.
    fn asset_id(&self) -> &AssetId;

    /// The volume this handle was configured with, in `[0.0, 1.0]`.
    fn volume(&self) -> f32;

    /// Starts (or restarts) playback from position zero.
    ///
    /// Fire-and-forget against the underlying hardware; never blocks.
    fn play(&mut self);

    /// Halts playback.
    fn stop(&mut self);

    /// Returns `true` while the handle is audibly playing.
    fn is_playing(&self) -> bool;

    /// Resets the playback position to the start without stopping.
    fn seek_to_start(&mut self);
}

/// Constructs playback handles for the pool.
///
/// `create_player` is called once per handle during `prepare`; the returned
/// handle must be in a ready-to-play, pre-buffered state. A failure aborts
/// the remainder of that `prepare` call but keeps earlier handles.
pub trait PlayerProvider: Send {
    /// Creates one handle for `asset_id`, configured with `volume`.
    fn create_player(&self, asset_id: &AssetId, volume: f32)
        -> Result<Box<dyn Player>, LoadError>;
}
