//! # sound-pool
//!
//! Preloaded sound-effect playback with round-robin dispatch.
//!
//! `sound-pool` keeps a fixed set of ready-to-play handles per registered
//! sound and spreads rapid-fire `play` requests across them, so overlapping
//! triggers of the same effect sound simultaneously instead of cutting each
//! other off. Prepare a single handle when a retrigger should restart the
//! sound from the top instead.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use rodio::OutputStream;
//! use sound_pool::playback::rodio::RodioProvider;
//! use sound_pool::{SoundPool, TracingSink};
//!
//! let (_stream, handle) = OutputStream::try_default()?;
//!
//! let pool = SoundPool::builder(RodioProvider::new(handle))
//!     .log_sink(TracingSink)
//!     .start();
//!
//! // Four handles: up to four overlapping lasers at 80% volume.
//! pool.prepare_with("sfx/laser.wav", 4, 0.8);
//!
//! pool.play("sfx/laser.wav");
//! pool.play("sfx/laser.wav"); // overlaps, does not cut off the first
//!
//! pool.tear_down("sfx/laser.wav");
//! pool.close().await;
//! ```
//!
//! ## Architecture
//!
//! The crate keeps a strict ownership boundary:
//!
//! - **Pool handle**: `prepare`/`play`/`tear_down` push a command onto an
//!   unbounded queue and return immediately - callable from any thread or
//!   task, never blocking, never returning a result
//! - **Worker task**: a single tokio task owns every playback handle and the
//!   per-asset round-robin cursors, executing commands strictly in order
//! - **Log sink**: failures (a handle that won't load, a play for an unknown
//!   asset) surface as events on an injected [`LogSink`], off the worker's
//!   critical path
//!
//! The playback primitive itself sits behind the [`Player`]/[`PlayerProvider`]
//! traits; a `rodio`-backed implementation ships behind the `rodio` feature,
//! and [`playback::mock::MockPlayback`] covers tests and CI without audio
//! hardware.

#![warn(missing_docs)]

mod asset;
mod error;
mod event;
pub mod playback;
mod pool;
mod round_robin;
mod sink;

pub use asset::AssetId;
pub use error::LoadError;
pub use event::{PoolEvent, Severity};
pub use playback::{Player, PlayerProvider};
pub use pool::{PoolStats, SoundPool, SoundPoolBuilder};
pub use sink::{LogSink, NoopSink, TracingSink};
