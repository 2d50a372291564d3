// ============================================================
// Layer 6 — Image Store
// ============================================================
// Reads the one image to reconstruct and writes the result.
//
// Input formats:
//
//   *.json   — an ImageSample:
//                { "channels": 1, "height": 28, "width": 28,
//                  "pixels": [0.0, 0.0, ...] }
//
//   anything else — an MNIST IDX image file (e.g. t10k-images-idx3-ubyte):
//                bytes 0..4    magic 0x00000803
//                bytes 4..8    number of images   (big-endian u32)
//                bytes 8..12   rows               (big-endian u32)
//                bytes 12..16  columns            (big-endian u32)
//                bytes 16..    u8 pixels, one image after another
//              pixels are scaled from 0..=255 to 0.0..=1.0
//
// Output is always the JSON form.

use anyhow::{bail, Context, Result};
use std::{fs, path::Path};

use crate::domain::image::ImageSample;

const IDX_IMAGE_MAGIC: u32 = 0x0000_0803;
const IDX_HEADER_LEN: usize = 16;

pub struct ImageStore;

impl ImageStore {
    /// Read image number `index` from `path`.
    ///
    /// `index` is ignored for JSON files, which hold a single image.
    pub fn read(path: &Path, index: usize) -> Result<ImageSample> {
        let is_json = path.extension().and_then(|e| e.to_str()) == Some("json");
        if is_json {
            Self::read_json(path)
        } else {
            let bytes = fs::read(path)
                .with_context(|| format!("Cannot read image file '{}'", path.display()))?;
            parse_idx_image(&bytes, index)
                .with_context(|| format!("Invalid IDX image file '{}'", path.display()))
        }
    }

    pub fn read_json(path: &Path) -> Result<ImageSample> {
        let json = fs::read_to_string(path)
            .with_context(|| format!("Cannot read image file '{}'", path.display()))?;
        let sample: ImageSample = serde_json::from_str(&json)
            .with_context(|| format!("Invalid image JSON in '{}'", path.display()))?;
        sample.validate()?;
        Ok(sample)
    }

    pub fn write_json(path: &Path, sample: &ImageSample) -> Result<()> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .with_context(|| format!("Cannot create '{}'", parent.display()))?;
        }
        let json = serde_json::to_string_pretty(sample)?;
        fs::write(path, json)
            .with_context(|| format!("Cannot write image to '{}'", path.display()))?;
        tracing::debug!("Wrote {:?} image to '{}'", sample.dims(), path.display());
        Ok(())
    }
}

fn read_be_u32(bytes: &[u8], offset: usize) -> u32 {
    u32::from_be_bytes([bytes[offset], bytes[offset + 1], bytes[offset + 2], bytes[offset + 3]])
}

/// Extract image `index` from the raw bytes of an IDX image file.
pub fn parse_idx_image(bytes: &[u8], index: usize) -> Result<ImageSample> {
    if bytes.len() < IDX_HEADER_LEN {
        bail!("file is {} bytes, shorter than the IDX header", bytes.len());
    }

    let magic = read_be_u32(bytes, 0);
    if magic != IDX_IMAGE_MAGIC {
        bail!("bad magic number {magic:#010x}, expected {IDX_IMAGE_MAGIC:#010x}");
    }

    let count = read_be_u32(bytes, 4) as usize;
    let rows  = read_be_u32(bytes, 8) as usize;
    let cols  = read_be_u32(bytes, 12) as usize;

    if index >= count {
        bail!("image index {index} out of range, file holds {count} images");
    }

    // Header values are untrusted; a huge rows x cols must not wrap.
    let bounds = rows.checked_mul(cols).and_then(|size| {
        let start = index.checked_mul(size)?.checked_add(IDX_HEADER_LEN)?;
        Some((start, start.checked_add(size)?))
    });
    let Some((start, end)) = bounds else {
        bail!("image {index} of size {rows}x{cols} lies beyond any addressable offset");
    };
    if bytes.len() < end {
        bail!("file truncated: image {index} needs bytes {start}..{end}, have {}", bytes.len());
    }

    let pixels = bytes[start..end].iter().map(|&p| p as f32 / 255.0).collect();
    ImageSample::new(1, rows, cols, pixels)
}
