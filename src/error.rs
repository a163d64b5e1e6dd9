use thiserror::Error;

#[derive(Error, Debug)]
pub enum AugmentError {
    // Shape and value errors
    #[error("Image batch has {images} samples but label batch has {labels}")]
    ShapeMismatch { images: usize, labels: usize },

    #[error("Expected a rank {expected} tensor with non-zero dimensions, got shape {got:?}")]
    InvalidInputShape { expected: usize, got: Vec<usize> },

    #[error("Tensor data length {got} does not match shape, expected {expected}")]
    DataLengthMismatch { expected: usize, got: usize },

    #[error("Invalid value range. Min: {min}, Max: {max}")]
    InvalidRange { min: f32, max: f32 },

    #[error("Class index {index} out of range for {num_classes} classes")]
    ClassIndexOutOfRange { index: usize, num_classes: usize },

    // Layer configuration errors
    #[error("Probability must be within [0, 1], got {0}")]
    InvalidProbability(f32),

    #[error("Label smoothing must be within [0, 1), got {0}")]
    InvalidLabelSmoothing(f32),

    #[error("Beta distribution alpha must be positive, got {0}")]
    InvalidAlpha(f32),

    #[error("Invalid tile grid size. Rows: {rows}, Cols: {cols}")]
    InvalidTileGrid { rows: usize, cols: usize },

    #[error("Histogram bin count must be within [2, 65536], got {0}")]
    InvalidBinCount(usize),

    #[error("Clip limit must be finite, got {0}")]
    InvalidClipLimit(f32),

    #[error("Failed to acquire lock on RNG")]
    RngLockError,

    #[error("Random number generator (shuffle_seed) not set or enabled")]
    RngNotSet,

    // DataLoader errors
    #[error("Directory not found: {0}")]
    DirectoryNotFound(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Image error: {0}")]
    ImageError(#[from] image::ImageError),

    #[error("No images found in the dataset")]
    EmptyDataset,

    #[error("Image {path} is {got:?}, expected {expected:?}")]
    ImageSizeMismatch {
        path: String,
        expected: (u32, u32),
        got: (u32, u32),
    },

    #[error("Unsupported colour type: {0}")]
    UnsupportedColorType(String),

    #[error("Batch size must be at least 1, got {0}")]
    InvalidBatchSize(usize),

    #[error("Thread count must be at least 1, got {0}")]
    InvalidThreadCount(usize),

    #[error("Failed to build thread pool: {0}")]
    ThreadPoolBuild(#[from] rayon::ThreadPoolBuildError),
}
