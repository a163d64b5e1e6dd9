//! Batch image preprocessing layers: CutMix mixing with area-weighted label
//! blending, histogram equalization and CLAHE, plus an image directory
//! loader that feeds them.

pub mod augment;
pub mod dataloader;
pub mod error;
pub mod tensor;

pub use augment::{
    Clahe, ClaheConfig, CutMix, CutMixConfig, CutRegion, Equalization, EqualizationConfig, ImageLayer,
    MixPair, RandomSource, SequenceRandom, StdRandom,
};
pub use dataloader::{log_dataset_info, DataLoaderConfig, ImageFolder};
pub use error::AugmentError;
pub use tensor::{BatchData, ImageBatch, LabelBatch, SourceFormat, TensorDesc, ValueRange};
