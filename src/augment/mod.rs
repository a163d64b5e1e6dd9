pub mod clahe;
pub mod config;
pub mod cut_mix;
pub mod equalization;
pub mod histogram;
pub mod layer;
pub mod random;

pub use clahe::Clahe;
pub use config::{ClaheConfig, CutMixConfig, EqualizationConfig};
pub use cut_mix::{CutMix, CutRegion, MixPair};
pub use equalization::Equalization;
pub use layer::ImageLayer;
pub use random::{RandomSource, SequenceRandom, StdRandom};
