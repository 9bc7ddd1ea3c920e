// Background image loading

use super::AssetError;
use std::path::{Path, PathBuf};
use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::thread;

/// A decoded RGBA8 image ready for GPU upload
#[derive(Debug, Clone)]
pub struct LoadedImage {
    pub name: String,
    pub width: u32,
    pub height: u32,
    pub rgba: Vec<u8>,
}

/// Handle to an image load in flight. The loader thread sends exactly one
/// message and exits.
#[derive(Debug)]
pub struct PendingImage {
    name: String,
    rx: Receiver<Result<LoadedImage, AssetError>>,
}

impl PendingImage {
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Non-blocking check for the load result.
    pub fn try_recv(&self) -> Option<Result<LoadedImage, AssetError>> {
        match self.rx.try_recv() {
            Ok(result) => Some(result),
            Err(TryRecvError::Empty) => None,
            Err(TryRecvError::Disconnected) => Some(Err(AssetError::LoaderGone)),
        }
    }
}

/// Finds image files under a base directory and decodes them off-thread
pub struct ImageLoader {
    base_path: PathBuf,
}

impl ImageLoader {
    /// Create a loader rooted at the given asset directory
    pub fn new<P: AsRef<Path>>(base_path: P) -> Self {
        Self {
            base_path: base_path.as_ref().to_path_buf(),
        }
    }

    /// Get the full path for an image name
    pub fn resolve_path(&self, name: &str) -> PathBuf {
        self.base_path.join("textures").join(name)
    }

    /// Start loading an image. Returns immediately; the decode happens on a
    /// background thread and the result arrives through the returned handle.
    pub fn load_image(&self, name: &str) -> PendingImage {
        let path = self.resolve_path(name);
        let name = name.to_string();
        let (tx, rx) = mpsc::channel();

        let thread_name = name.clone();
        thread::spawn(move || {
            let result = decode_file(&thread_name, &path);
            // The receiver may already be gone on shutdown; nothing to do then.
            let _ = tx.send(result);
        });

        PendingImage { name, rx }
    }
}

fn decode_file(name: &str, path: &Path) -> Result<LoadedImage, AssetError> {
    if !path.exists() {
        return Err(AssetError::NotFound(path.to_string_lossy().to_string()));
    }

    let bytes = std::fs::read(path)?;
    let image = image::load_from_memory(&bytes).map_err(|e| AssetError::Decode {
        name: name.to_string(),
        reason: e.to_string(),
    })?;

    let rgba = image.to_rgba8();
    let (width, height) = rgba.dimensions();

    Ok(LoadedImage {
        name: name.to_string(),
        width,
        height,
        rgba: rgba.into_raw(),
    })
}

/// Readiness state for one asset. `Ready` is flipped exactly once when the
/// load completes and is never reset; a failed load parks in `Failed` so
/// the rest of the game keeps running without the asset.
#[derive(Debug)]
pub enum AssetSlot<T> {
    Pending(PendingImage),
    Ready(T),
    Failed,
}

impl<T> AssetSlot<T> {
    /// Poll the load once. On completion the decoded image is handed to
    /// `upload` (GPU texture creation) and the slot becomes `Ready`.
    pub fn poll(&mut self, upload: impl FnOnce(&LoadedImage) -> Result<T, AssetError>) {
        let AssetSlot::Pending(pending) = self else {
            return;
        };

        match pending.try_recv() {
            None => {}
            Some(Ok(image)) => match upload(&image) {
                Ok(value) => {
                    log::info!("asset ready: {}", image.name);
                    *self = AssetSlot::Ready(value);
                }
                Err(e) => {
                    log::warn!("asset upload failed for {}: {e}", image.name);
                    *self = AssetSlot::Failed;
                }
            },
            Some(Err(e)) => {
                log::warn!("asset load failed for {}: {e}", pending.name());
                *self = AssetSlot::Failed;
            }
        }
    }

    pub fn is_ready(&self) -> bool {
        matches!(self, AssetSlot::Ready(_))
    }

    pub fn get(&self) -> Option<&T> {
        match self {
            AssetSlot::Ready(value) => Some(value),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::{Duration, Instant};

    fn wait_for(pending: &PendingImage) -> Result<LoadedImage, AssetError> {
        let deadline = Instant::now() + Duration::from_secs(5);
        loop {
            if let Some(result) = pending.try_recv() {
                return result;
            }
            assert!(Instant::now() < deadline, "loader thread never answered");
            std::thread::sleep(Duration::from_millis(5));
        }
    }

    fn write_test_png(name: &str) -> std::path::PathBuf {
        let dir = std::env::temp_dir().join(format!("lancer-assets-{name}"));
        std::fs::create_dir_all(dir.join("textures")).unwrap();

        let img = image::RgbaImage::from_pixel(4, 8, image::Rgba([255, 0, 255, 255]));
        img.save(dir.join("textures").join(name)).unwrap();
        dir
    }

    #[test]
    fn test_path_resolution() {
        let loader = ImageLoader::new("/game/assets");
        let path = loader.resolve_path("player.png");
        assert_eq!(path.to_str().unwrap(), "/game/assets/textures/player.png");
    }

    #[test]
    fn test_missing_file_reports_not_found() {
        let loader = ImageLoader::new(std::env::temp_dir());
        let pending = loader.load_image("definitely-not-here.png");
        let result = wait_for(&pending);
        assert!(matches!(result, Err(AssetError::NotFound(_))));
    }

    #[test]
    fn test_load_decodes_rgba_dimensions() {
        let dir = write_test_png("loads.png");
        let loader = ImageLoader::new(&dir);
        let pending = loader.load_image("loads.png");

        let image = wait_for(&pending).unwrap();
        assert_eq!(image.width, 4);
        assert_eq!(image.height, 8);
        assert_eq!(image.rgba.len(), 4 * 8 * 4);
    }

    #[test]
    fn test_slot_flips_to_ready_once() {
        let dir = write_test_png("slot.png");
        let loader = ImageLoader::new(&dir);
        let mut slot: AssetSlot<u32> = AssetSlot::Pending(loader.load_image("slot.png"));

        let deadline = Instant::now() + Duration::from_secs(5);
        while !slot.is_ready() {
            assert!(Instant::now() < deadline, "slot never became ready");
            slot.poll(|image| Ok(image.width));
            std::thread::sleep(Duration::from_millis(5));
        }
        assert_eq!(slot.get(), Some(&4));

        // Further polls leave the ready value untouched
        slot.poll(|_| Ok(99));
        assert_eq!(slot.get(), Some(&4));
    }

    #[test]
    fn test_slot_failure_is_terminal() {
        let loader = ImageLoader::new(std::env::temp_dir());
        let mut slot: AssetSlot<u32> = AssetSlot::Pending(loader.load_image("missing.png"));

        let deadline = Instant::now() + Duration::from_secs(5);
        while matches!(slot, AssetSlot::Pending(_)) {
            assert!(Instant::now() < deadline, "slot never settled");
            slot.poll(|image| Ok(image.width));
            std::thread::sleep(Duration::from_millis(5));
        }
        assert!(matches!(slot, AssetSlot::Failed));
        assert!(!slot.is_ready());
        assert_eq!(slot.get(), None);
    }
}
