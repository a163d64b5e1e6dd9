use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::f32::consts::PI;

/// Source of the random draws the augmentation layers consume.
///
/// Only `next_unit` is required; the other draws are derived from it so a
/// scripted source fully controls a layer's behaviour.
pub trait RandomSource {
    /// Uniform sample in `[0, 1)`.
    fn next_unit(&mut self) -> f32;

    /// Uniform index in `[0, upper)`. `upper` must be non-zero.
    fn next_index(&mut self, upper: usize) -> usize {
        let index = (self.next_unit() * upper as f32) as usize;
        index.min(upper - 1)
    }

    fn next_bernoulli(&mut self, probability: f32) -> bool {
        self.next_unit() < probability
    }

    // Box-Muller transform
    fn next_normal(&mut self) -> f32 {
        let u1 = self.next_unit().max(1e-10);
        let u2 = self.next_unit();
        (-2.0 * u1.ln()).sqrt() * (2.0 * PI * u2).cos()
    }

    // Marsaglia and Tsang's method
    fn next_gamma(&mut self, shape: f32) -> f32 {
        if shape < 1.0 {
            let boost = self.next_unit().max(1e-10).powf(1.0 / shape);
            return self.next_gamma(1.0 + shape) * boost;
        }
        let d = shape - 1.0 / 3.0;
        let c = 1.0 / (9.0 * d).sqrt();
        loop {
            let x = self.next_normal();
            let v = (1.0 + c * x).powi(3);
            if v > 0.0 {
                let u = self.next_unit();
                if u < 1.0 - 0.0331 * x.powi(4) || u.ln() < 0.5 * x * x + d * (1.0 - v + v.ln()) {
                    return d * v;
                }
            }
        }
    }

    /// Beta(alpha, beta) sample. Beta(1, 1) consumes a single uniform draw.
    fn next_beta(&mut self, alpha: f32, beta: f32) -> f32 {
        if alpha == 1.0 && beta == 1.0 {
            return self.next_unit();
        }
        let x = self.next_gamma(alpha);
        let y = self.next_gamma(beta);
        let sum = x + y;
        // Both gammas can underflow for tiny shapes
        if sum <= 0.0 {
            return 0.5;
        }
        (x / sum).clamp(0.0, 1.0)
    }
}

/// Seedable generator backed by `StdRng`.
pub struct StdRandom {
    rng: StdRng,
}

impl StdRandom {
    pub fn from_seed(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl RandomSource for StdRandom {
    fn next_unit(&mut self) -> f32 {
        self.rng.gen::<f32>()
    }

    fn next_index(&mut self, upper: usize) -> usize {
        self.rng.gen_range(0..upper)
    }
}

/// Replays a fixed list of uniform draws, wrapping around at the end.
/// Values are clamped into `[0, 1)`.
pub struct SequenceRandom {
    values: Vec<f32>,
    position: usize,
}

impl SequenceRandom {
    pub fn new(values: Vec<f32>) -> Self {
        let values = values
            .into_iter()
            .map(|v| v.clamp(0.0, 1.0 - f32::EPSILON))
            .collect();
        Self { values, position: 0 }
    }

    pub fn draws_taken(&self) -> usize {
        self.position
    }
}

impl RandomSource for SequenceRandom {
    fn next_unit(&mut self) -> f32 {
        if self.values.is_empty() {
            return 0.0;
        }
        let value = self.values[self.position % self.values.len()];
        self.position += 1;
        value
    }
}
