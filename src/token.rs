//! The persisted form of a drawing: a PNG wrapped in a base64 data URL.
//!
//! Hosts treat the token as opaque. It round-trips through the session's
//! change notifications, the drawing collection and the restore path.

use anyhow::{anyhow, Context, Result};
use base64::{engine::general_purpose, Engine as _};
use serde::{Deserialize, Serialize};
use std::io::Cursor;

use crate::surface::Surface;

const DATA_URL_PREFIX: &str = "data:image/png;base64,";

/// Opaque persisted drawing content.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ContentToken(String);

impl ContentToken {
    /// Wraps a data URL previously handed out by this crate, e.g. one read
    /// back from host storage.
    pub fn from_raw(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Encodes a surface as PNG bytes.
pub fn encode_png(surface: &Surface) -> Result<Vec<u8>> {
    let mut bytes = Cursor::new(Vec::new());
    image::write_buffer_with_format(
        &mut bytes,
        &surface.pixels,
        surface.width,
        surface.height,
        image::ColorType::Rgba8,
        image::ImageFormat::Png,
    )
    .context("failed to encode surface as png")?;
    Ok(bytes.into_inner())
}

/// Encodes a surface into its persisted token.
pub fn encode_surface(surface: &Surface) -> Result<ContentToken> {
    let png = encode_png(surface)?;
    let mut url = String::from(DATA_URL_PREFIX);
    general_purpose::STANDARD.encode_string(&png, &mut url);
    Ok(ContentToken(url))
}

/// Decodes a token back into a surface at its natural size.
pub fn decode_surface(token: &ContentToken) -> Result<Surface> {
    let image = decode_image(token)?;
    let (width, height) = image.dimensions();
    Ok(Surface::from_pixels(width, height, image.into_raw()))
}

/// Decodes a token into raw RGBA pixels scaled to `width` x `height`, the
/// size the surface has at restore time.
pub fn decode_scaled(token: &ContentToken, width: u32, height: u32) -> Result<Vec<u8>> {
    let image = decode_image(token)?;
    let scaled = if image.dimensions() == (width, height) {
        image
    } else {
        image::imageops::resize(&image, width, height, image::imageops::FilterType::Triangle)
    };
    Ok(scaled.into_raw())
}

fn decode_image(token: &ContentToken) -> Result<image::RgbaImage> {
    let encoded = token
        .0
        .strip_prefix(DATA_URL_PREFIX)
        .ok_or_else(|| anyhow!("content token is not a png data url"))?;
    let png = general_purpose::STANDARD
        .decode(encoded)
        .context("content token payload is not valid base64")?;
    let image = image::load_from_memory_with_format(&png, image::ImageFormat::Png)
        .context("content token payload is not a valid png")?;
    Ok(image.to_rgba8())
}
