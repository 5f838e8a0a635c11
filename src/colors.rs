// src/colors.rs

use crate::error::{check_index, Result};
use crate::layout::GraphLayout;
use image::Rgb;
use palette::{FromColor, Lch, Srgb};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

pub type ColorBucket = usize;

pub const DEFAULT_PALETTE_SIZE: usize = 16;

/// Color per lane, fixed when the snapshot is built. A commit keeps its
/// color for as long as it keeps its lane.
#[derive(Debug, Clone)]
pub struct GraphColorManager {
    buckets: Vec<ColorBucket>,
    palette: Vec<Rgb<u8>>,
}

impl GraphColorManager {
    pub fn new(layout: &GraphLayout) -> Self {
        Self::with_palette_size(layout, DEFAULT_PALETTE_SIZE)
    }

    pub fn with_palette_size(layout: &GraphLayout, palette_size: usize) -> Self {
        let palette = generate_palette(palette_size.max(1));
        // Neighbouring lanes get neighbouring palette entries
        let buckets = (0..layout.lane_count()).map(|lane| lane % palette.len()).collect();
        Self { buckets, palette }
    }

    pub fn palette_size(&self) -> usize {
        self.palette.len()
    }

    pub fn color_bucket(&self, lane: usize) -> Result<ColorBucket> {
        check_index(lane, self.buckets.len())?;
        Ok(self.buckets[lane])
    }

    pub fn color(&self, lane: usize) -> Result<Rgb<u8>> {
        Ok(self.palette[self.color_bucket(lane)?])
    }
}

fn generate_palette(size: usize) -> Vec<Rgb<u8>> {
    let mut rng = StdRng::seed_from_u64(42); // Seed for deterministic colors
    let step = 360.0f32 / size as f32;
    (0..size)
        .map(|i| {
            // Evenly spread hues, jittered so neighbours don't look banded
            let hue = i as f32 * step + rng.gen_range(0.0f32..step * 0.5);
            let color = Lch::new(70.0f32, 80.0f32, hue);
            let srgb: Srgb<f32> = Srgb::from_color(color);
            let (r, g, b) = srgb.into_components();
            Rgb([(r * 255.0f32) as u8, (g * 255.0f32) as u8, (b * 255.0f32) as u8])
        })
        .collect()
}
