use crate::error::AugmentError;

/// Closed interval the pixel values of a batch are declared to lie in,
/// commonly `(0, 255)` or `(0, 1)`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ValueRange {
    min: f32,
    max: f32,
}

impl ValueRange {
    pub fn new(min: f32, max: f32) -> Result<Self, AugmentError> {
        // Also rejects NaN bounds
        if !(min < max) || !min.is_finite() || !max.is_finite() {
            return Err(AugmentError::InvalidRange { min, max });
        }
        Ok(Self { min, max })
    }

    pub fn min(&self) -> f32 {
        self.min
    }

    pub fn max(&self) -> f32 {
        self.max
    }

    pub fn width(&self) -> f32 {
        self.max - self.min
    }

    pub fn clamp(&self, value: f32) -> f32 {
        value.clamp(self.min, self.max)
    }

    pub fn contains(&self, value: f32) -> bool {
        value >= self.min && value <= self.max
    }

    /// Quantizes `value` into one of `bins` buckets spanning the range.
    pub fn to_bin(&self, value: f32, bins: usize) -> usize {
        let top = (bins - 1) as f32;
        let scaled = (value - self.min) / self.width() * top;
        // NaN casts to 0
        scaled.round().clamp(0.0, top) as usize
    }

    /// Maps a fractional bin position in `[0, bins - 1]` back into the range.
    pub fn from_bin(&self, bin: f32, bins: usize) -> f32 {
        self.clamp(self.min + bin / (bins - 1) as f32 * self.width())
    }
}

impl TryFrom<(f32, f32)> for ValueRange {
    type Error = AugmentError;

    fn try_from((min, max): (f32, f32)) -> Result<Self, Self::Error> {
        Self::new(min, max)
    }
}
