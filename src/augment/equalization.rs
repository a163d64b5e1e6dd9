use rayon::iter::ParallelIterator;
use rayon::slice::ParallelSliceMut;

use crate::error::AugmentError;
use crate::tensor::{ImageBatch, ValueRange};

use super::config::EqualizationConfig;
use super::histogram::Histogram;
use super::layer::ImageLayer;

/// Global per-channel histogram equalization.
pub struct Equalization {
    value_range: ValueRange,
    bins: usize,
}

impl Equalization {
    pub fn new(config: EqualizationConfig) -> Result<Self, AugmentError> {
        let config = config.build()?;
        Ok(Self {
            value_range: ValueRange::try_from(config.value_range)?,
            bins: config.bins,
        })
    }
}

impl ImageLayer for Equalization {
    fn name(&self) -> String {
        "Equalization".to_string()
    }

    fn config_string(&self) -> Option<String> {
        Some(format!(
            "value_range=({}, {}), bins={}",
            self.value_range.min(),
            self.value_range.max(),
            self.bins
        ))
    }

    fn apply(&self, images: &ImageBatch) -> Result<ImageBatch, AugmentError> {
        let mut output = images.clone();
        let (batch_size, _, _, channels) = images.dims();
        if batch_size == 0 {
            return Ok(output);
        }
        let image_len = images.elements_per_image();

        output
            .as_mut_slice()
            .par_chunks_mut(image_len)
            .for_each(|image| {
                for channel in 0..channels {
                    equalize_channel(image, channel, channels, self.value_range, self.bins);
                }
            });

        Ok(output)
    }
}

/// Equalizes one channel of an interleaved (H, W, C) image in place.
fn equalize_channel(image: &mut [f32], channel: usize, channels: usize, range: ValueRange, bins: usize) {
    let histogram = Histogram::from_bins(
        bins,
        image.iter().skip(channel).step_by(channels).map(|&v| range.to_bin(v, bins)),
    );

    // Nothing to spread, leave the channel as is
    let Some(lut) = histogram.equalization_lut() else {
        return;
    };

    for value in image.iter_mut().skip(channel).step_by(channels) {
        *value = range.from_bin(lut[range.to_bin(*value, bins)], bins);
    }
}
