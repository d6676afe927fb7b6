use std::fs::File;
use std::io::Read;
use std::path::Path;

use crate::error::Result;

/// One stored file as seen by the archive's directory listing.
#[derive(Debug, Clone)]
pub struct ArchiveEntry {
    /// Forward-slash separated path within the archive.
    pub path: String,
    /// CRC-32 of the stored bytes; the dedup key for identical content.
    pub crc32: u32,
}

/// Boundary to whatever holds the source images.
///
/// Enumeration order is stable and meaningful: the sequence indices handed
/// to the catalog come straight from it, and re-listing must yield the
/// same order.
pub trait ArchiveSource {
    /// Entry metadata in enumeration order.
    fn entries(&self) -> &[ArchiveEntry];
    /// Raw bytes of the entry at `index` (an index into `entries()`).
    fn read_bytes(&mut self, index: usize) -> Result<Vec<u8>>;
}

/// Name stem of an archived path: the component after the last `/` with
/// the extension stripped. `"sprites/12_3_1.png"` becomes `"12_3_1"`.
pub fn entry_stem(path: &str) -> &str {
    let base = path.rsplit('/').next().unwrap_or(path);
    match base.rsplit_once('.') {
        Some((stem, _)) if !stem.is_empty() => stem,
        _ => base,
    }
}

/// Zip-backed source. Entry metadata, including the per-file CRC-32, is
/// read once from the central directory at open time.
pub struct ZipSource {
    zip: zip::ZipArchive<File>,
    entries: Vec<ArchiveEntry>,
}

impl ZipSource {
    pub fn open(path: &Path) -> Result<Self> {
        let file = File::open(path)?;
        let mut zip = zip::ZipArchive::new(file)?;
        let mut entries = Vec::with_capacity(zip.len());
        for i in 0..zip.len() {
            let f = zip.by_index(i)?;
            entries.push(ArchiveEntry {
                path: f.name().to_string(),
                crc32: f.crc32(),
            });
        }
        Ok(Self { zip, entries })
    }
}

impl ArchiveSource for ZipSource {
    fn entries(&self) -> &[ArchiveEntry] {
        &self.entries
    }

    fn read_bytes(&mut self, index: usize) -> Result<Vec<u8>> {
        let mut f = self.zip.by_index(index)?;
        let mut buf = Vec::with_capacity(f.size() as usize);
        f.read_to_end(&mut buf)?;
        Ok(buf)
    }
}

/// In-memory source: entries are pushed with an explicit checksum, which
/// keeps the dedup contract (archive supplies the checksum) intact for
/// callers that do not have a zip, e.g. tests or directory input.
#[derive(Default)]
pub struct MemorySource {
    entries: Vec<ArchiveEntry>,
    data: Vec<Vec<u8>>,
}

impl MemorySource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends an entry; enumeration order is push order.
    pub fn push(&mut self, path: impl Into<String>, crc32: u32, bytes: Vec<u8>) {
        self.entries.push(ArchiveEntry {
            path: path.into(),
            crc32,
        });
        self.data.push(bytes);
    }
}

impl ArchiveSource for MemorySource {
    fn entries(&self) -> &[ArchiveEntry] {
        &self.entries
    }

    fn read_bytes(&mut self, index: usize) -> Result<Vec<u8>> {
        match self.data.get(index) {
            Some(bytes) => Ok(bytes.clone()),
            None => Err(crate::error::AtlasError::InvalidInput(format!(
                "archive index {index} out of range"
            ))),
        }
    }
}
