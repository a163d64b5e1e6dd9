/// Pixel-count histogram over a fixed number of bins.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Histogram {
    counts: Vec<usize>,
}

impl Histogram {
    pub fn new(bins: usize) -> Self {
        Self {
            counts: vec![0; bins],
        }
    }

    pub fn from_bins(bins: usize, values: impl IntoIterator<Item = usize>) -> Self {
        let mut histogram = Self::new(bins);
        for bin in values {
            histogram.add(bin);
        }
        histogram
    }

    pub fn add(&mut self, bin: usize) {
        self.counts[bin] += 1;
    }

    pub fn counts(&self) -> &[usize] {
        &self.counts
    }

    pub fn bins(&self) -> usize {
        self.counts.len()
    }

    pub fn total(&self) -> usize {
        self.counts.iter().sum()
    }

    /// Caps every bin at `limit` and spreads the clipped mass evenly over all
    /// bins. The remainder goes one count at a time to bins at a fixed stride
    /// from bin 0. The total count is unchanged.
    pub fn clip(&mut self, limit: usize) {
        let mut excess = 0;
        for count in self.counts.iter_mut() {
            if *count > limit {
                excess += *count - limit;
                *count = limit;
            }
        }
        if excess == 0 {
            return;
        }

        let bins = self.counts.len();
        let per_bin = excess / bins;
        let mut residual = excess % bins;

        for count in self.counts.iter_mut() {
            *count += per_bin;
        }

        if residual > 0 {
            let step = (bins / residual).max(1);
            for count in self.counts.iter_mut().step_by(step) {
                if residual == 0 {
                    break;
                }
                *count += 1;
                residual -= 1;
            }
        }
    }

    /// CDF lookup table mapping each bin to a fractional bin in `[0, bins - 1]`,
    /// with the lowest occupied bin sent to 0 and the highest to `bins - 1`.
    /// `None` when every value falls into a single bin, since there is no
    /// spread to stretch.
    pub fn equalization_lut(&self) -> Option<Vec<f32>> {
        let total = self.total();
        let cdf_min = self.counts.iter().copied().find(|&c| c > 0)?;
        let denom = total - cdf_min;
        if denom == 0 {
            return None;
        }

        let top = (self.bins() - 1) as f32;
        let mut cumulative = 0;
        let lut = self
            .counts
            .iter()
            .map(|&count| {
                cumulative += count;
                cumulative.saturating_sub(cdf_min) as f32 / denom as f32 * top
            })
            .collect();

        Some(lut)
    }
}
