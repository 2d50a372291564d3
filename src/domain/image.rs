// ============================================================
// Layer 3 — Image Domain Type
// ============================================================
// A single image as plain data: its dimensions and the pixel
// intensities in row-major [channels, height, width] order.
//
// The ML layer turns this into a tensor; the infra layer reads
// and writes it. Neither needs to know how the other works.

use anyhow::{bail, Result};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageSample {
    pub channels: usize,
    pub height:   usize,
    pub width:    usize,
    /// Row-major pixel intensities, normally in [0, 1]
    pub pixels:   Vec<f32>,
}

impl ImageSample {
    /// Build a sample, checking that the pixel count matches the dims.
    pub fn new(channels: usize, height: usize, width: usize, pixels: Vec<f32>) -> Result<Self> {
        let sample = Self { channels, height, width, pixels };
        sample.validate()?;
        Ok(sample)
    }

    pub fn dims(&self) -> [usize; 3] {
        [self.channels, self.height, self.width]
    }

    /// None when the dimensions multiply past `usize::MAX`.
    pub fn pixel_count(&self) -> Option<usize> {
        self.channels.checked_mul(self.height)?.checked_mul(self.width)
    }

    pub fn validate(&self) -> Result<()> {
        let Some(expected) = self.pixel_count() else {
            bail!("Image dimensions {:?} are too large", self.dims());
        };
        if expected == 0 {
            bail!("Image has an empty dimension: {:?}", self.dims());
        }
        if self.pixels.len() != expected {
            bail!(
                "Image {:?} expects {} pixels but {} were given",
                self.dims(),
                expected,
                self.pixels.len(),
            );
        }
        Ok(())
    }
}
