use std::collections::HashMap;

use image::GenericImageView;
use tracing::debug;

use crate::archive::{ArchiveSource, entry_stem};
use crate::error::Result;

/// One cataloged source image.
#[derive(Debug, Clone)]
pub struct SourceEntry {
    /// Position in archive enumeration order; stable identity, never reused.
    pub seq: usize,
    /// Name stem of the archived path; parsed into the mapping key later.
    pub name: String,
    /// Original pixel dimensions plus a one-pixel border on every side.
    pub padded_w: u32,
    pub padded_h: u32,
    /// Index back into the archive for the on-demand pixel decode.
    pub archive_index: usize,
    /// Sequence index of the canonical entry when this one is a
    /// byte-identical duplicate. `None` means this entry is canonical and
    /// gets drawn; duplicates reuse the canonical rectangle instead.
    pub duplicate_of: Option<usize>,
}

/// Scans `archive` for image entries whose path starts with `prefix`, in
/// enumeration order.
///
/// Dimensions come from a throwaway decode of each entry; the content
/// checksum comes from the archive itself. The first entry seen with a
/// given checksum is canonical, later ones point back at it. A zero-byte
/// or undecodable entry is a fatal error, not skipped.
pub fn scan(archive: &mut dyn ArchiveSource, prefix: &str) -> Result<Vec<SourceEntry>> {
    let metas = archive.entries().to_vec();
    let mut entries: Vec<SourceEntry> = Vec::new();
    let mut first_by_crc: HashMap<u32, usize> = HashMap::new();

    for (idx, meta) in metas.iter().enumerate() {
        if !meta.path.starts_with(prefix) {
            continue;
        }
        let bytes = archive.read_bytes(idx)?;
        let (w, h) = image::load_from_memory(&bytes)?.dimensions();

        let duplicate_of = match first_by_crc.get(&meta.crc32) {
            Some(&canonical) => {
                debug!(seq = idx, canonical, path = %meta.path, "duplicate content");
                Some(canonical)
            }
            None => {
                first_by_crc.insert(meta.crc32, idx);
                None
            }
        };

        entries.push(SourceEntry {
            seq: idx,
            name: entry_stem(&meta.path).to_string(),
            padded_w: w + 2,
            padded_h: h + 2,
            archive_index: idx,
            duplicate_of,
        });
    }

    Ok(entries)
}
