//! Core library for baking archived tiles and sprites into a texture atlas.
//!
//! - Catalog: enumerate a zip subset, pad each image by one pixel, dedup byte-identical content by CRC-32
//! - Layout: median-width canvas estimate plus deterministic first-fit placement (pure geometry, no pixels)
//! - Compositor: draws each canonical image exactly once; duplicates reuse the canonical rectangle
//! - Variants: tile atlases keep archive order, sprite atlases pack largest-first and emit in archive order
//!
//! Quick example:
//! ```ignore
//! use atlas_baker_core::{ZipSource, build_tile_atlas, save_canvas, save_mapping};
//! # fn main() -> atlas_baker_core::Result<()> {
//! let mut zip = ZipSource::open("style.zip".as_ref())?;
//! let out = build_tile_atlas(&mut zip, "tiles/")?;
//! save_canvas(&out.rgba, "tiles.png".as_ref())?;
//! save_mapping(&out.atlas, "tiles.json".as_ref())?;
//! # Ok(()) }
//! ```

pub mod archive;
pub mod catalog;
pub mod compositing;
pub mod error;
pub mod export;
pub mod layout;
pub mod model;
pub mod pipeline;

pub use archive::*;
pub use catalog::*;
pub use error::*;
pub use export::*;
pub use layout::*;
pub use model::*;
pub use pipeline::*;

/// Convenience prelude for common types and functions.
/// Importing `atlas_baker_core::prelude::*` brings the primary APIs into scope.
pub mod prelude {
    pub use crate::archive::{ArchiveEntry, ArchiveSource, MemorySource, ZipSource};
    pub use crate::error::{AtlasError, Result};
    pub use crate::model::{Atlas, Frame, Rect, SpriteKey};
    pub use crate::pipeline::{AtlasOutput, build_sprite_atlas, build_tile_atlas};
    pub use crate::{load_mapping, save_canvas, save_mapping};
}
