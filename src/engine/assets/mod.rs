// Asset loading
//
// Images decode on a background thread and deliver exactly one completion
// message; the frame loop polls an `AssetSlot` until it flips to `Ready`.

mod loader;

pub use loader::{AssetSlot, ImageLoader, LoadedImage, PendingImage};

/// Asset loading errors
#[derive(Debug, thiserror::Error)]
pub enum AssetError {
    #[error("Asset not found: {0}")]
    NotFound(String),

    #[error("Failed to decode asset {name}: {reason}")]
    Decode { name: String, reason: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Asset loader thread exited without a result")]
    LoaderGone,
}
