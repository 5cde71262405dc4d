//! Profile-picture thumbnailing.
//!
//! Decodes an uploaded image, scales it down to fit within the avatar
//! bound while keeping its aspect ratio, and re-encodes it in the
//! upload's own format. Images already within the bound are never
//! upscaled.

use anyhow::{Context, Result, anyhow};
use image::{DynamicImage, GenericImageView, ImageFormat, Rgba, RgbaImage};
use std::io::Cursor;

/// Maximum width/height of a stored profile picture, in pixels.
pub const AVATAR_BOUND: u32 = 125;

/// Shrink `data` to fit within [`AVATAR_BOUND`] and re-encode it.
///
/// CPU-bound; callers on the async runtime should wrap this in
/// `spawn_blocking`.
pub fn shrink_to_avatar(data: &[u8], ext: &str) -> Result<Vec<u8>> {
    let img = image::load_from_memory(data).context("could not decode uploaded image")?;

    let (w, h) = img.dimensions();
    let img = if w <= AVATAR_BOUND && h <= AVATAR_BOUND {
        img
    } else {
        img.thumbnail(AVATAR_BOUND, AVATAR_BOUND)
    };

    encode(&img, ext)
}

/// A plain placeholder avatar, written to disk on first run so fresh
/// installs render something for users who never uploaded a picture.
pub fn placeholder_png() -> Result<Vec<u8>> {
    let img = RgbaImage::from_pixel(AVATAR_BOUND, AVATAR_BOUND, Rgba([176, 184, 196, 255]));
    encode(&DynamicImage::ImageRgba8(img), "png")
}

fn encode(img: &DynamicImage, ext: &str) -> Result<Vec<u8>> {
    let format = ImageFormat::from_extension(ext)
        .ok_or_else(|| anyhow!("unsupported image format: {}", ext))?;

    let mut buf = Cursor::new(Vec::new());
    img.write_to(&mut buf, format)
        .with_context(|| format!("could not encode {} thumbnail", ext))?;
    Ok(buf.into_inner())
}
