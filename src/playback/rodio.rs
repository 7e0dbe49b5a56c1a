//! Real playback backend over the `rodio` crate.
//!
//! Enabled with the `rodio` feature. The [`AssetId`] locator is interpreted
//! as a filesystem path. Each handle decodes its asset once into a shared
//! in-memory buffer at construction time, so `play` never touches the disk
//! or the decoder again; a restart is a fresh `rodio::Sink` fed from the
//! same buffer, which gives the required from-position-zero semantics.

use std::fs::File;
use std::io::BufReader;

use rodio::source::Buffered;
use rodio::{Decoder, OutputStreamHandle, Sink, Source};

use crate::{AssetId, LoadError, Player, PlayerProvider};

/// A [`PlayerProvider`] that plays assets through a rodio output stream.
///
/// # Example
///
/// ```ignore
/// use rodio::OutputStream;
/// use sound_pool::playback::rodio::RodioProvider;
/// use sound_pool::SoundPool;
///
/// let (_stream, handle) = OutputStream::try_default()?;
/// let pool = SoundPool::builder(RodioProvider::new(handle)).start();
/// pool.prepare_with("sfx/laser.wav", 4, 0.8);
/// pool.play("sfx/laser.wav");
/// ```
pub struct RodioProvider {
    stream_handle: OutputStreamHandle,
}

impl RodioProvider {
    /// Creates a provider that plays on the given output stream.
    ///
    /// Keep the corresponding `OutputStream` alive for as long as the pool;
    /// dropping it silences all handles.
    pub fn new(stream_handle: OutputStreamHandle) -> Self {
        Self { stream_handle }
    }
}

impl PlayerProvider for RodioProvider {
    fn create_player(
        &self,
        asset_id: &AssetId,
        volume: f32,
    ) -> Result<Box<dyn Player>, LoadError> {
        let file = File::open(asset_id.as_str())
            .map_err(|source| LoadError::open(asset_id.clone(), source))?;
        let decoder = Decoder::new(BufReader::new(file))
            .map_err(|err| LoadError::decode(asset_id.clone(), err.to_string()))?;
        let source = decoder.buffered();

        // Pull the whole source through once so the shared buffer is fully
        // decoded before the first trigger.
        for _ in source.clone() {}

        Ok(Box::new(RodioPlayer {
            asset_id: asset_id.clone(),
            volume,
            source,
            stream_handle: self.stream_handle.clone(),
            sink: None,
        }))
    }
}

/// Handle constructed by [`RodioProvider`].
struct RodioPlayer {
    asset_id: AssetId,
    volume: f32,
    source: Buffered<Decoder<BufReader<File>>>,
    stream_handle: OutputStreamHandle,
    sink: Option<Sink>,
}

impl RodioPlayer {
    fn discard_sink(&mut self) {
        if let Some(sink) = self.sink.take() {
            sink.stop();
        }
    }
}

impl Player for RodioPlayer {
    fn asset_id(&self) -> &AssetId {
        &self.asset_id
    }

    fn volume(&self) -> f32 {
        self.volume
    }

    fn play(&mut self) {
        self.discard_sink();
        match Sink::try_new(&self.stream_handle) {
            Ok(sink) => {
                sink.set_volume(self.volume);
                sink.append(self.source.clone());
                self.sink = Some(sink);
            }
            Err(err) => {
                tracing::warn!(asset = %self.asset_id, %err, "rodio sink creation failed");
            }
        }
    }

    fn stop(&mut self) {
        self.discard_sink();
    }

    fn is_playing(&self) -> bool {
        self.sink.as_ref().map_or(false, |sink| !sink.empty())
    }

    fn seek_to_start(&mut self) {
        // Restart-from-zero is realized by play() building a fresh sink from
        // the decoded buffer; all this needs to do is retire the current one.
        self.discard_sink();
    }
}
