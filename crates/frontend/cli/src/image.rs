//! Boot image loading.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use sm83_core::memory::MEMORY_SIZE;

#[derive(thiserror::Error, Debug)]
pub enum ImageError {
    #[error("boot image not found: {}", .0.display())]
    Missing(PathBuf),
    #[error("boot image is empty: {}", .0.display())]
    Empty(PathBuf),
    #[error("boot image {} is {len} bytes, more than the {max}-byte address space", .path.display())]
    TooLarge { path: PathBuf, len: usize, max: usize },
    #[error("failed to read boot image {}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Read the whole file at `path`. The result is non-empty and fits in the
/// address space.
pub fn load_image(path: &Path) -> Result<Vec<u8>, ImageError> {
    let bytes = fs::read(path).map_err(|source| match source.kind() {
        io::ErrorKind::NotFound => ImageError::Missing(path.to_path_buf()),
        _ => ImageError::Io {
            path: path.to_path_buf(),
            source,
        },
    })?;

    if bytes.is_empty() {
        return Err(ImageError::Empty(path.to_path_buf()));
    }
    if bytes.len() > MEMORY_SIZE {
        return Err(ImageError::TooLarge {
            path: path.to_path_buf(),
            len: bytes.len(),
            max: MEMORY_SIZE,
        });
    }
    Ok(bytes)
}

/// Hex dump rows of `width` bytes, each prefixed with its address.
pub fn hex_rows(image: &[u8], width: usize) -> Vec<String> {
    let width = width.max(1);
    image
        .chunks(width)
        .enumerate()
        .map(|(row, chunk)| {
            let bytes: Vec<String> = chunk.iter().map(|b| format!("{:02x}", b)).collect();
            format!("{:04X}: {}", row * width, bytes.join(" "))
        })
        .collect()
}
