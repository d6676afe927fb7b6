use std::fs;
use std::path::Path;

use image::RgbaImage;
use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::error::Result;
use crate::model::Atlas;

/// Writes the mapping as pretty-printed JSON.
pub fn save_mapping<K: Serialize>(atlas: &Atlas<K>, path: &Path) -> Result<()> {
    let json = serde_json::to_string_pretty(atlas)?;
    fs::write(path, json)?;
    Ok(())
}

/// Reads a mapping back. The key type must match the one it was saved
/// with (`u32` for tiles, `SpriteKey` for sprites); round-trips are
/// lossless, including frame order.
pub fn load_mapping<K: DeserializeOwned>(path: &Path) -> Result<Atlas<K>> {
    let json = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&json)?)
}

/// Encodes the composited canvas as a lossless PNG.
pub fn save_canvas(rgba: &RgbaImage, path: &Path) -> Result<()> {
    rgba.save_with_format(path, image::ImageFormat::Png)?;
    Ok(())
}
