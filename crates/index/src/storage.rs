//! On-disk layout of an index directory.
//!
//! `entries.dat` is a sequence of zstd frames, one per embedding batch. Each
//! frame decompresses to length-prefixed (`u32` little-endian) MessagePack
//! [`IndexEntry`] records. `zstd::decode_all` reads concatenated frames as a
//! single stream, so appending a batch never rewrites earlier ones.

use std::fs::{self, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::Path;

use chrono::{DateTime, Utc};
use memmap2::Mmap;
use serde::{Deserialize, Serialize};

use crate::entry::IndexEntry;
use crate::error::IndexError;

pub const ENTRIES_FILE: &str = "entries.dat";
pub const META_FILE: &str = "meta.json";

const ZSTD_LEVEL: i32 = 3;

/// Summary written to `meta.json` once a build completes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndexMeta {
    pub entry_count: usize,
    pub dimensions: usize,
    pub batches: usize,
    pub created_at: DateTime<Utc>,
}

/// Write `entries` as one zstd frame. `truncate` starts a fresh file,
/// otherwise the frame is appended. Returns the uncompressed byte count.
pub fn write_frame(path: &Path, entries: &[IndexEntry], truncate: bool) -> Result<u64, IndexError> {
    let file = if truncate {
        fs::File::create(path)?
    } else {
        OpenOptions::new().append(true).create(true).open(path)?
    };
    let mut encoder = zstd::Encoder::new(BufWriter::new(file), ZSTD_LEVEL)?;

    let mut raw_bytes = 0u64;
    for entry in entries {
        let encoded = rmp_serde::to_vec(entry).map_err(|e| IndexError::Serialize(e.to_string()))?;
        let len = encoded.len() as u32;
        encoder.write_all(&len.to_le_bytes())?;
        encoder.write_all(&encoded)?;
        raw_bytes += 4 + encoded.len() as u64;
    }

    let buf_writer = encoder.finish()?;
    let mut inner = buf_writer.into_inner().map_err(|e| IndexError::Io(e.into_error()))?;
    inner.flush()?;
    Ok(raw_bytes)
}

/// Read every entry of `entries.dat`.
pub fn read_entries(path: &Path) -> Result<Vec<IndexEntry>, IndexError> {
    let file = fs::File::open(path)?;
    if file.metadata()?.len() == 0 {
        return Ok(Vec::new());
    }
    // SAFETY: the index directory has a single writer and is not modified
    // while a reader holds the map.
    let mmap = unsafe { Mmap::map(&file)? };
    let data = zstd::decode_all(mmap.as_ref())?;
    EntryIter { data: &data, pos: 0 }.collect()
}

struct EntryIter<'a> {
    data: &'a [u8],
    pos: usize,
}

impl Iterator for EntryIter<'_> {
    type Item = Result<IndexEntry, IndexError>;

    fn next(&mut self) -> Option<Self::Item> {
        let header = self.data.get(self.pos..self.pos + 4)?;
        let mut len_bytes = [0u8; 4];
        len_bytes.copy_from_slice(header);
        let len = u32::from_le_bytes(len_bytes) as usize;

        let start = self.pos + 4;
        let Some(body) = self.data.get(start..start + len) else {
            self.pos = self.data.len();
            return Some(Err(IndexError::Serialize(format!(
                "truncated record at byte {}",
                self.pos
            ))));
        };

        self.pos = start + len;
        Some(rmp_serde::from_slice(body).map_err(|e| IndexError::Serialize(e.to_string())))
    }
}

pub fn write_meta(dir: &Path, meta: &IndexMeta) -> Result<(), IndexError> {
    let json = serde_json::to_string_pretty(meta).map_err(|e| IndexError::Serialize(e.to_string()))?;
    fs::write(dir.join(META_FILE), json)?;
    Ok(())
}

/// `None` when the file is missing or unreadable; the entries file is authoritative.
pub fn read_meta(dir: &Path) -> Option<IndexMeta> {
    let content = fs::read_to_string(dir.join(META_FILE)).ok()?;
    serde_json::from_str(&content).ok()
}
