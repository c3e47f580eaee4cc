// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Compression (spec.md §4.5 step 8): gzip each archived snapshot file at
//! the configured level. Very small files aren't worth the gzip framing
//! overhead and are left uncompressed.

use std::io::Write;
use std::path::{Path, PathBuf};

use flate2::write::GzEncoder;
use flate2::Compression;

use crate::error::ExecutorError;

/// Below this size, gzip's own header/footer/deflate-block overhead tends
/// to outweigh any savings, so the file is archived as-is.
const MIN_COMPRESS_SIZE_BYTES: u64 = 256;

#[derive(Debug, Clone)]
pub struct CompressedArtifact {
    pub path: PathBuf,
    pub bytes_written: u64,
    pub compressed: bool,
}

/// Compresses every path in `archived_paths` in place, replacing `<path>`
/// with `<path>.gz` on success. Returns one entry per input path in order.
pub fn compress_all(
    archived_paths: &[PathBuf],
    level: u32,
) -> Result<Vec<CompressedArtifact>, ExecutorError> {
    archived_paths.iter().map(|path| compress_one(path, level)).collect()
}

fn compress_one(path: &Path, level: u32) -> Result<CompressedArtifact, ExecutorError> {
    let size = std::fs::metadata(path)?.len();
    if size < MIN_COMPRESS_SIZE_BYTES {
        return Ok(CompressedArtifact { path: path.to_path_buf(), bytes_written: size, compressed: false });
    }

    let raw = std::fs::read(path)?;
    let dest = append_gz_suffix(path);
    let bytes_written = {
        let file = std::fs::File::create(&dest)?;
        let mut encoder = GzEncoder::new(file, Compression::new(level));
        encoder.write_all(&raw)?;
        encoder.finish()?;
        std::fs::metadata(&dest)?.len()
    };
    std::fs::remove_file(path)?;

    Ok(CompressedArtifact { path: dest, bytes_written, compressed: true })
}

fn append_gz_suffix(path: &Path) -> PathBuf {
    let mut name = path.as_os_str().to_os_string();
    name.push(".gz");
    PathBuf::from(name)
}

#[cfg(test)]
#[path = "compression_tests.rs"]
mod tests;
