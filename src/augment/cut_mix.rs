use std::sync::Mutex;

use rand::Rng;
use tracing::debug;

use crate::error::AugmentError;
use crate::tensor::{ImageBatch, LabelBatch, ValueRange};

use super::config::CutMixConfig;
use super::random::{RandomSource, StdRandom};

/// Rectangle of an image, already clipped to the image bounds.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CutRegion {
    pub top: usize,
    pub left: usize,
    pub height: usize,
    pub width: usize,
}

impl CutRegion {
    /// Box of side `sqrt(1 - lambda)` times the image side, centred on
    /// `(center_y, center_x)` and clipped to the image. Odd sides put the
    /// extra row or column after the centre.
    pub fn from_lambda(
        lambda: f32,
        center_y: usize,
        center_x: usize,
        image_height: usize,
        image_width: usize,
    ) -> Self {
        let cut_ratio = (1.0 - lambda).clamp(0.0, 1.0).sqrt();
        let cut_height = (image_height as f32 * cut_ratio) as usize;
        let cut_width = (image_width as f32 * cut_ratio) as usize;

        let (top, bottom) = clipped_span(center_y, cut_height, image_height);
        let (left, right) = clipped_span(center_x, cut_width, image_width);

        Self {
            top,
            left,
            height: bottom - top,
            width: right - left,
        }
    }

    pub fn area(&self) -> usize {
        self.height * self.width
    }

    pub fn is_empty(&self) -> bool {
        self.area() == 0
    }

    pub fn area_ratio(&self, image_height: usize, image_width: usize) -> f32 {
        self.area() as f32 / (image_height * image_width) as f32
    }
}

/// Element `index` receives `region` from element `partner`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MixPair {
    pub index: usize,
    pub partner: usize,
    pub region: CutRegion,
}

pub struct CutMix {
    config: CutMixConfig,
    value_range: ValueRange,
    rng: Mutex<StdRandom>,
}

impl CutMix {
    pub fn new(config: CutMixConfig) -> Result<Self, AugmentError> {
        let mut config = config.build()?;
        let value_range = ValueRange::try_from(config.value_range)?;

        let seed = *config.seed.get_or_insert_with(|| rand::thread_rng().gen());
        debug!(seed, "CutMix generator seeded");

        Ok(Self {
            config,
            value_range,
            rng: Mutex::new(StdRandom::from_seed(seed)),
        })
    }

    pub fn config(&self) -> &CutMixConfig {
        &self.config
    }

    pub fn value_range(&self) -> ValueRange {
        self.value_range
    }

    /// Mixes the batch using the layer's own seeded generator.
    pub fn apply(&self, images: &ImageBatch, labels: &LabelBatch) -> Result<(ImageBatch, LabelBatch), AugmentError> {
        let mut rng = self.rng.lock().map_err(|_| AugmentError::RngLockError)?;
        self.apply_with(images, labels, &mut *rng)
    }

    /// Mixes the batch drawing from `rng`. Inputs are never modified; every
    /// patch is read from the original batch.
    pub fn apply_with<R: RandomSource + ?Sized>(
        &self,
        images: &ImageBatch,
        labels: &LabelBatch,
        rng: &mut R,
    ) -> Result<(ImageBatch, LabelBatch), AugmentError> {
        let batch_size = images.batch_size();
        if labels.num_samples() != batch_size {
            return Err(AugmentError::ShapeMismatch {
                images: batch_size,
                labels: labels.num_samples(),
            });
        }

        let (_, height, width, channels) = images.dims();
        let plan = self.plan(rng, batch_size, height, width);

        let mut mixed_images = images.clone();
        let mut mixed_labels = labels.clone();

        for pair in &plan {
            copy_region(
                images.image(pair.partner),
                mixed_images.image_mut(pair.index),
                &pair.region,
                width,
                channels,
            );

            let ratio = pair.region.area_ratio(height, width);
            blend_labels(
                labels.row(pair.index),
                labels.row(pair.partner),
                mixed_labels.row_mut(pair.index),
                ratio,
                self.config.label_smoothing,
            );
        }

        debug!(batch_size, mixed = plan.len(), "CutMix applied");

        Ok((mixed_images, mixed_labels))
    }

    /// Draws the mixing decisions for a batch. Per element, in order: the
    /// Bernoulli decision, then (only when mixing) the partner index, lambda,
    /// and the region centre row and column.
    pub fn plan<R: RandomSource + ?Sized>(
        &self,
        rng: &mut R,
        batch_size: usize,
        height: usize,
        width: usize,
    ) -> Vec<MixPair> {
        (0..batch_size)
            .filter_map(|index| {
                if !rng.next_bernoulli(self.config.probability) {
                    return None;
                }
                let partner = rng.next_index(batch_size);
                let lambda = rng.next_beta(self.config.alpha, self.config.alpha);
                let center_y = rng.next_index(height);
                let center_x = rng.next_index(width);

                Some(MixPair {
                    index,
                    partner,
                    region: CutRegion::from_lambda(lambda, center_y, center_x, height, width),
                })
            })
            .collect()
    }
}

/// `[center - cut / 2, center - cut / 2 + cut)` clipped to `[0, len)`.
fn clipped_span(center: usize, cut: usize, len: usize) -> (usize, usize) {
    let start = center.saturating_sub(cut / 2).min(len);
    let end = (center + cut - cut / 2).min(len);
    (start, end.max(start))
}

fn copy_region(source: &[f32], target: &mut [f32], region: &CutRegion, width: usize, channels: usize) {
    if region.is_empty() {
        return;
    }
    let row_len = region.width * channels;
    for y in region.top..region.top + region.height {
        let start = (y * width + region.left) * channels;
        target[start..start + row_len].copy_from_slice(&source[start..start + row_len]);
    }
}

fn blend_labels(own: &[f32], partner: &[f32], out: &mut [f32], ratio: f32, label_smoothing: f32) {
    let uniform = label_smoothing / out.len() as f32;
    for ((out, &a), &b) in out.iter_mut().zip(own).zip(partner) {
        let blended = (1.0 - ratio) * a + ratio * b;
        *out = if label_smoothing > 0.0 {
            blended * (1.0 - label_smoothing) + uniform
        } else {
            blended
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::augment::random::SequenceRandom;

    #[test]
    fn region_is_clipped_to_image() {
        // lambda 0 asks for a full-size box centred on the corner
        let region = CutRegion::from_lambda(0.0, 0, 0, 4, 4);
        assert_eq!(region, CutRegion { top: 0, left: 0, height: 2, width: 2 });
        assert_eq!(region.area_ratio(4, 4), 0.25);
    }

    #[test]
    fn region_collapses_when_lambda_near_one() {
        let region = CutRegion::from_lambda(0.99, 2, 2, 4, 4);
        assert!(region.is_empty());
        assert_eq!(region.area_ratio(4, 4), 0.0);
    }

    #[test]
    fn centred_region() {
        let region = CutRegion::from_lambda(0.75, 2, 2, 4, 4);
        assert_eq!(region, CutRegion { top: 1, left: 1, height: 2, width: 2 });
    }

    #[test]
    fn odd_cut_keeps_its_full_size() {
        // lambda 0.9 asks for a 1x1 cut on a 4x4 image
        let region = CutRegion::from_lambda(0.9, 2, 2, 4, 4);
        assert_eq!(region, CutRegion { top: 2, left: 2, height: 1, width: 1 });
        // lambda 0.4375 asks for 3x3
        let region = CutRegion::from_lambda(0.4375, 2, 2, 4, 4);
        assert_eq!(region, CutRegion { top: 1, left: 1, height: 3, width: 3 });
        // clipping still applies at the border
        let region = CutRegion::from_lambda(0.4375, 0, 3, 4, 4);
        assert_eq!(region, CutRegion { top: 0, left: 2, height: 2, width: 2 });
    }

    #[test]
    fn plan_skips_elements_that_fail_the_draw() {
        let layer = CutMix::new(CutMixConfig {
            probability: 0.5,
            seed: Some(0),
            ..Default::default()
        })
        .unwrap();
        // element 0: 0.9 fails; element 1: 0.1 passes, partner 0, lambda 0.75, centre (2, 2)
        let mut rng = SequenceRandom::new(vec![0.9, 0.1, 0.0, 0.75, 0.5, 0.5]);
        let plan = layer.plan(&mut rng, 2, 4, 4);
        assert_eq!(
            plan,
            vec![MixPair {
                index: 1,
                partner: 0,
                region: CutRegion { top: 1, left: 1, height: 2, width: 2 },
            }]
        );
        assert_eq!(rng.draws_taken(), 6);
    }

    #[test]
    fn blend_then_smooth() {
        let mut out = [0.0; 2];
        blend_labels(&[1.0, 0.0], &[0.0, 1.0], &mut out, 0.25, 0.2);
        // blended [0.75, 0.25], smoothed *0.8 + 0.1
        assert!((out[0] - 0.7).abs() < 1e-6);
        assert!((out[1] - 0.3).abs() < 1e-6);
    }

    #[test]
    fn copy_region_only_touches_the_rectangle() {
        let source = vec![1.0; 4 * 4];
        let mut target = vec![2.0; 4 * 4];
        let region = CutRegion { top: 1, left: 1, height: 2, width: 2 };
        copy_region(&source, &mut target, &region, 4, 1);
        let ones = target.iter().filter(|&&v| v == 1.0).count();
        assert_eq!(ones, 4);
        assert_eq!(target[5], 1.0);
        assert_eq!(target[0], 2.0);
    }
}
