//! Asset identification type.

use std::path::Path;
use std::sync::Arc;

/// Locator of a sound asset, as registered with the pool.
///
/// The pool stamps the `AssetId` onto every playback handle it constructs
/// and keys the round-robin cursor map on it, so it wraps the locator string
/// (a bundle path, file path, or URL) in an `Arc<str>` to make those clones
/// pointer copies. Two IDs name the same asset exactly when their locator
/// strings are equal; the pool never resolves or canonicalizes them, so
/// `"sfx/laser.wav"` and `"./sfx/laser.wav"` are two distinct assets with
/// two distinct handle sets.
///
/// # Example
///
/// ```
/// use sound_pool::AssetId;
///
/// let id = AssetId::new("sfx/laser.wav");
/// assert_eq!(id.as_str(), "sfx/laser.wav");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct AssetId(Arc<str>);

impl AssetId {
    /// Creates an asset ID from a locator string.
    pub fn new(locator: impl Into<Arc<str>>) -> Self {
        Self(locator.into())
    }

    /// Creates an asset ID from a filesystem path.
    ///
    /// Convenience for backends that treat the locator as a path (the rodio
    /// backend reopens the file from it). Non-UTF-8 components are replaced
    /// lossily, so such a locator may not round-trip back to the same path.
    pub fn from_path(path: impl AsRef<Path>) -> Self {
        Self::new(path.as_ref().to_string_lossy().into_owned())
    }

    /// The locator this ID was created from.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for AssetId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for AssetId {
    fn from(locator: &str) -> Self {
        Self::new(locator)
    }
}

impl From<String> for AssetId {
    fn from(locator: String) -> Self {
        Self::new(locator)
    }
}
