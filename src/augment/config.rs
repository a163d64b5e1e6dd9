use crate::error::AugmentError;

pub struct CutMixConfig {
    pub probability: f32,
    pub label_smoothing: f32,
    pub alpha: f32,
    pub value_range: (f32, f32),
    pub seed: Option<u64>,
}

impl CutMixConfig {
    pub fn build(self) -> Result<Self, AugmentError> {
        check_value_range(self.value_range)?;

        if !(0.0..=1.0).contains(&self.probability) {
            return Err(AugmentError::InvalidProbability(self.probability));
        }
        if !(0.0..1.0).contains(&self.label_smoothing) {
            return Err(AugmentError::InvalidLabelSmoothing(self.label_smoothing));
        }
        if !(self.alpha > 0.0) || !self.alpha.is_finite() {
            return Err(AugmentError::InvalidAlpha(self.alpha));
        }

        Ok(self)
    }
}

impl Default for CutMixConfig {
    fn default() -> Self {
        Self {
            probability: 1.0,
            label_smoothing: 0.0,
            alpha: 1.0,
            value_range: (0.0, 255.0),
            seed: None,
        }
    }
}

pub struct EqualizationConfig {
    pub value_range: (f32, f32),
    pub bins: usize,
}

impl EqualizationConfig {
    pub fn build(self) -> Result<Self, AugmentError> {
        check_value_range(self.value_range)?;
        if !(2..=MAX_BINS).contains(&self.bins) {
            return Err(AugmentError::InvalidBinCount(self.bins));
        }
        Ok(self)
    }
}

impl Default for EqualizationConfig {
    fn default() -> Self {
        Self {
            value_range: (0.0, 255.0),
            bins: 256,
        }
    }
}

pub struct ClaheConfig {
    pub value_range: (f32, f32),
    // Zero or negative disables clipping
    pub clip_limit: f32,
    // (rows, cols)
    pub tile_grid_size: (usize, usize),
}

impl ClaheConfig {
    pub fn build(self) -> Result<Self, AugmentError> {
        check_value_range(self.value_range)?;
        if !self.clip_limit.is_finite() {
            return Err(AugmentError::InvalidClipLimit(self.clip_limit));
        }
        let (rows, cols) = self.tile_grid_size;
        if rows == 0 || cols == 0 {
            return Err(AugmentError::InvalidTileGrid { rows, cols });
        }
        Ok(self)
    }
}

impl Default for ClaheConfig {
    fn default() -> Self {
        Self {
            value_range: (0.0, 255.0),
            clip_limit: 4.0,
            tile_grid_size: (8, 8),
        }
    }
}

pub const MAX_BINS: usize = 65536;

fn check_value_range((min, max): (f32, f32)) -> Result<(), AugmentError> {
    crate::tensor::ValueRange::new(min, max).map(|_| ())
}
