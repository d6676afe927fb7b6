use std::cmp::Ordering;
use std::collections::HashMap;

use image::RgbaImage;
use tracing::{debug, info, instrument};

use crate::archive::ArchiveSource;
use crate::catalog::{self, SourceEntry};
use crate::compositing::blit_rgba;
use crate::error::{AtlasError, Result};
use crate::layout;
use crate::model::{Atlas, Frame, Rect, SpriteKey};

/// The atlas mapping plus the composited RGBA canvas it refers to.
pub struct AtlasOutput<K> {
    pub atlas: Atlas<K>,
    pub rgba: RgbaImage,
}

/// Builds a tile atlas from the archive entries under `prefix`.
///
/// Placement runs in archive enumeration order; keys are tile indices
/// parsed from the entry names. Entries whose name is not an integer are
/// left out of the mapping without failing the build.
#[instrument(skip_all)]
pub fn build_tile_atlas(
    archive: &mut dyn ArchiveSource,
    prefix: &str,
) -> Result<AtlasOutput<u32>> {
    let entries = catalog::scan(archive, prefix)?;
    build_atlas(archive, entries, layout::cmp_by_sequence, |name| {
        name.parse::<u32>().ok()
    })
}

/// Builds a sprite atlas from the archive entries under `prefix`.
///
/// The largest sprites are placed first (the greedy packer handles that
/// order better than arbitrary order); the mapping is then emitted back in
/// archive enumeration order. Keys parse as `N` or `N_model_remap`; other
/// names are left out of the mapping without failing the build.
#[instrument(skip_all)]
pub fn build_sprite_atlas(
    archive: &mut dyn ArchiveSource,
    prefix: &str,
) -> Result<AtlasOutput<SpriteKey>> {
    let entries = catalog::scan(archive, prefix)?;
    build_atlas(archive, entries, layout::cmp_by_size_desc, |name| {
        name.parse::<SpriteKey>().ok()
    })
}

fn build_atlas<K, F>(
    archive: &mut dyn ArchiveSource,
    entries: Vec<SourceEntry>,
    order: fn(&SourceEntry, &SourceEntry) -> Ordering,
    parse_key: F,
) -> Result<AtlasOutput<K>>
where
    F: Fn(&str) -> Option<K>,
{
    if entries.is_empty() {
        return Err(AtlasError::Empty);
    }

    // Width is estimated over all entries, then placement runs over the
    // canonical ones in the variant's chosen order. `entries` itself stays
    // in enumeration order for the emission pass below.
    let width = layout::guess_canvas_width(&entries);
    let mut ordered: Vec<&SourceEntry> = entries.iter().collect();
    ordered.sort_by(|a, b| order(a, b));
    let (placements, height) = layout::place_first_fit(ordered.iter().copied(), width);
    let placed_rects: HashMap<usize, Rect> =
        placements.iter().map(|p| (p.seq, p.rect)).collect();

    // Draw each canonical entry once, one pixel inside its padded rect,
    // and record the interior rectangle the mapping will publish.
    let mut canvas = RgbaImage::new(width, height);
    let mut interior: HashMap<usize, Rect> = HashMap::with_capacity(placements.len());
    for entry in &entries {
        if entry.duplicate_of.is_some() {
            continue;
        }
        if let Some(padded) = placed_rects.get(&entry.seq) {
            let bytes = archive.read_bytes(entry.archive_index)?;
            let src = image::load_from_memory(&bytes)?.to_rgba8();
            blit_rgba(&src, &mut canvas, padded.x + 1, padded.y + 1);
            interior.insert(entry.seq, padded.interior());
        }
    }

    // Emission in ascending sequence order, whatever order placement used.
    // Duplicates resolve to their canonical entry's interior rectangle.
    let mut frames: Vec<Frame<K>> = Vec::new();
    let mut skipped = 0usize;
    for entry in &entries {
        let canonical = entry.duplicate_of.unwrap_or(entry.seq);
        let Some(&rect) = interior.get(&canonical) else {
            continue;
        };
        match parse_key(&entry.name) {
            Some(key) => frames.push(Frame { key, rect }),
            None => {
                skipped += 1;
                debug!(name = %entry.name, "name does not parse as a key; left out of the mapping");
            }
        }
    }

    info!(
        frames = frames.len(),
        skipped, width, height, "atlas composed"
    );
    Ok(AtlasOutput {
        atlas: Atlas {
            width,
            height,
            frames,
        },
        rgba: canvas,
    })
}
