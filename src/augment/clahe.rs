use rayon::iter::ParallelIterator;
use rayon::slice::ParallelSliceMut;

use crate::error::AugmentError;
use crate::tensor::{ImageBatch, ValueRange};

use super::config::ClaheConfig;
use super::histogram::Histogram;
use super::layer::ImageLayer;

const CLAHE_BINS: usize = 256;

/// Contrast limited adaptive histogram equalization.
///
/// Each channel is split into a grid of tiles. Every tile gets its own
/// equalization table built from a clipped histogram, and each pixel is
/// mapped through a bilinear blend of the tables of the four nearest tile
/// centres. With a 1x1 grid and clipping disabled this is plain global
/// equalization.
pub struct Clahe {
    value_range: ValueRange,
    clip_limit: f32,
    tile_grid_size: (usize, usize),
}

impl Clahe {
    pub fn new(config: ClaheConfig) -> Result<Self, AugmentError> {
        let config = config.build()?;
        Ok(Self {
            value_range: ValueRange::try_from(config.value_range)?,
            clip_limit: config.clip_limit,
            tile_grid_size: config.tile_grid_size,
        })
    }

    fn clahe_channel(&self, image: &mut [f32], channel: usize, height: usize, width: usize, channels: usize) {
        let range = self.value_range;
        let row_bounds = tile_bounds(height, self.tile_grid_size.0);
        let col_bounds = tile_bounds(width, self.tile_grid_size.1);

        let mut luts = Vec::with_capacity(row_bounds.len() * col_bounds.len());
        for &(top, bottom) in &row_bounds {
            for &(left, right) in &col_bounds {
                let mut histogram = Histogram::new(CLAHE_BINS);
                for y in top..bottom {
                    for x in left..right {
                        histogram.add(range.to_bin(image[(y * width + x) * channels + channel], CLAHE_BINS));
                    }
                }

                if self.clip_limit > 0.0 {
                    let tile_pixels = (bottom - top) * (right - left);
                    let limit = (self.clip_limit * tile_pixels as f32 / CLAHE_BINS as f32) as usize;
                    histogram.clip(limit.max(1));
                }

                // Single-valued tiles map every bin to itself
                luts.push(
                    histogram
                        .equalization_lut()
                        .unwrap_or_else(|| (0..CLAHE_BINS).map(|b| b as f32).collect()),
                );
            }
        }

        let row_weights = interpolation_weights(height, &row_bounds);
        let col_weights = interpolation_weights(width, &col_bounds);
        let grid_cols = col_bounds.len();

        for (y, &(r0, r1, wy)) in row_weights.iter().enumerate() {
            for (x, &(c0, c1, wx)) in col_weights.iter().enumerate() {
                let index = (y * width + x) * channels + channel;
                let bin = range.to_bin(image[index], CLAHE_BINS);
                let lut = |r: usize, c: usize| luts[r * grid_cols + c][bin];

                let upper = lut(r0, c0) * (1.0 - wx) + lut(r0, c1) * wx;
                let lower = lut(r1, c0) * (1.0 - wx) + lut(r1, c1) * wx;
                image[index] = range.from_bin(upper * (1.0 - wy) + lower * wy, CLAHE_BINS);
            }
        }
    }
}

impl ImageLayer for Clahe {
    fn name(&self) -> String {
        "CLAHE".to_string()
    }

    fn config_string(&self) -> Option<String> {
        Some(format!(
            "value_range=({}, {}), clip_limit={}, tile_grid_size={:?}",
            self.value_range.min(),
            self.value_range.max(),
            self.clip_limit,
            self.tile_grid_size
        ))
    }

    fn apply(&self, images: &ImageBatch) -> Result<ImageBatch, AugmentError> {
        let mut output = images.clone();
        let (batch_size, height, width, channels) = images.dims();
        if batch_size == 0 {
            return Ok(output);
        }
        let image_len = images.elements_per_image();

        output
            .as_mut_slice()
            .par_chunks_mut(image_len)
            .for_each(|image| {
                for channel in 0..channels {
                    self.clahe_channel(image, channel, height, width, channels);
                }
            });

        Ok(output)
    }
}

/// Splits `len` pixels into at most `tiles` near-equal spans.
fn tile_bounds(len: usize, tiles: usize) -> Vec<(usize, usize)> {
    let tiles = tiles.min(len).max(1);
    (0..tiles)
        .map(|t| (t * len / tiles, (t + 1) * len / tiles))
        .collect()
}

/// For every pixel coordinate: the tile before it, the tile after it, and the
/// weight of the latter. Pixels outside the outermost tile centres stick to
/// the edge tile.
fn interpolation_weights(len: usize, bounds: &[(usize, usize)]) -> Vec<(usize, usize, f32)> {
    let centres: Vec<f32> = bounds
        .iter()
        .map(|&(start, end)| (start + end - 1) as f32 / 2.0)
        .collect();
    let last = centres.len() - 1;

    (0..len)
        .map(|p| {
            let p = p as f32;
            if p <= centres[0] {
                return (0, 0, 0.0);
            }
            if p >= centres[last] {
                return (last, last, 0.0);
            }
            let upper = centres.iter().position(|&c| c > p).unwrap_or(last);
            let lower = upper - 1;
            let weight = (p - centres[lower]) / (centres[upper] - centres[lower]);
            (lower, upper, weight)
        })
        .collect()
}
