use anyhow::{Context, Result, bail};
use rand::RngCore;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::info;

use crate::thumbnail;

/// Filename users start out with; [`PictureStore::new`] guarantees it
/// exists on disk.
pub const DEFAULT_PICTURE: &str = "default.png";

const ALLOWED_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "gif"];

/// Manages the on-disk profile-picture directory.
///
/// Pictures are stored flat as `{store_dir}/{16-hex-chars}.{ext}` and
/// served back by filename through the static file route. Filenames are
/// drawn from the OS RNG, so collisions with existing uploads are not a
/// practical concern.
pub struct PictureStore {
    dir: PathBuf,
}

impl PictureStore {
    /// Create the store under `data_dir/profile_pics`, writing the
    /// placeholder avatar if it is missing.
    pub async fn new(data_dir: &Path) -> Result<Self> {
        let dir = data_dir.join("profile_pics");
        fs::create_dir_all(&dir).await?;

        let placeholder = dir.join(DEFAULT_PICTURE);
        if !fs::try_exists(&placeholder).await? {
            let png = thumbnail::placeholder_png()?;
            fs::write(&placeholder, png).await?;
            info!("Wrote placeholder avatar to {}", placeholder.display());
        }

        info!("Profile picture directory: {}", dir.display());
        Ok(Self { dir })
    }

    /// Path to a stored picture by filename.
    pub fn picture_path(&self, filename: &str) -> PathBuf {
        self.dir.join(filename)
    }

    /// Thumbnail an upload and persist it under a fresh random name.
    ///
    /// Returns the stored filename. The extension comes from the
    /// uploaded filename and must be on the allowlist.
    pub async fn save_picture(&self, original_name: &str, data: Vec<u8>) -> Result<String> {
        let ext = picture_extension(original_name)?;

        let thumb = {
            let ext = ext.clone();
            tokio::task::spawn_blocking(move || thumbnail::shrink_to_avatar(&data, &ext))
                .await
                .context("thumbnail task panicked")??
        };

        let filename = format!("{}.{}", random_token(), ext);
        let path = self.picture_path(&filename);
        fs::write(&path, thumb).await?;

        info!("Saved profile picture {}", path.display());
        Ok(filename)
    }
}

/// Lowercased extension of the uploaded filename, checked against the
/// allowlist.
fn picture_extension(original_name: &str) -> Result<String> {
    let ext = Path::new(original_name)
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase());

    match ext {
        Some(ext) if ALLOWED_EXTENSIONS.contains(&ext.as_str()) => Ok(ext),
        Some(ext) => bail!("unsupported picture type: .{}", ext),
        None => bail!("picture has no file extension"),
    }
}

/// 16 hex chars from the OS RNG, as the original filename is untrusted.
fn random_token() -> String {
    let mut bytes = [0u8; 8];
    rand::rng().fill_bytes(&mut bytes);
    hex::encode(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::GenericImageView;
    use std::io::Cursor;

    fn temp_data_dir() -> PathBuf {
        std::env::temp_dir().join(format!("quill-media-test-{}", uuid::Uuid::new_v4()))
    }

    fn sample_jpeg() -> Vec<u8> {
        let img = image::RgbaImage::from_pixel(300, 300, image::Rgba([10, 200, 30, 255]));
        let mut buf = Cursor::new(Vec::new());
        image::DynamicImage::ImageRgba8(img)
            .to_rgb8()
            .write_to(&mut buf, image::ImageFormat::Jpeg)
            .unwrap();
        buf.into_inner()
    }

    #[tokio::test]
    async fn new_store_writes_placeholder() {
        let root = temp_data_dir();
        let store = PictureStore::new(&root).await.unwrap();

        let placeholder = store.picture_path(DEFAULT_PICTURE);
        assert!(placeholder.exists());

        fs::remove_dir_all(&root).await.unwrap();
    }

    #[tokio::test]
    async fn save_picture_thumbnails_and_keeps_extension() {
        let root = temp_data_dir();
        let store = PictureStore::new(&root).await.unwrap();

        let filename = store
            .save_picture("Holiday Photo.JPG", sample_jpeg())
            .await
            .unwrap();
        assert!(filename.ends_with(".jpg"));
        // 16 hex chars + ".jpg"
        assert_eq!(filename.len(), 20);

        let stored = fs::read(store.picture_path(&filename)).await.unwrap();
        let img = image::load_from_memory(&stored).unwrap();
        let (w, h) = img.dimensions();
        assert!(w <= thumbnail::AVATAR_BOUND && h <= thumbnail::AVATAR_BOUND);

        fs::remove_dir_all(&root).await.unwrap();
    }

    #[tokio::test]
    async fn two_saves_get_distinct_names() {
        let root = temp_data_dir();
        let store = PictureStore::new(&root).await.unwrap();

        let a = store.save_picture("a.png", sample_png()).await.unwrap();
        let b = store.save_picture("b.png", sample_png()).await.unwrap();
        assert_ne!(a, b);

        fs::remove_dir_all(&root).await.unwrap();
    }

    #[tokio::test]
    async fn disallowed_extension_is_rejected() {
        let root = temp_data_dir();
        let store = PictureStore::new(&root).await.unwrap();

        let err = store
            .save_picture("script.svg", b"<svg/>".to_vec())
            .await
            .unwrap_err();
        assert!(err.to_string().contains("unsupported"));

        let err = store.save_picture("noext", vec![1, 2, 3]).await.unwrap_err();
        assert!(err.to_string().contains("extension"));

        fs::remove_dir_all(&root).await.unwrap();
    }

    fn sample_png() -> Vec<u8> {
        let img = image::RgbaImage::from_pixel(10, 10, image::Rgba([0, 0, 0, 255]));
        let mut buf = Cursor::new(Vec::new());
        image::DynamicImage::ImageRgba8(img)
            .write_to(&mut buf, image::ImageFormat::Png)
            .unwrap();
        buf.into_inner()
    }
}
