use crate::error::AugmentError;
use crate::tensor::ImageBatch;

/// A preprocessing layer that transforms images without touching labels.
pub trait ImageLayer: Send + Sync {
    // Return a string representation of the layers name
    fn name(&self) -> String;

    // Return optional configuration details for the layer
    fn config_string(&self) -> Option<String> {
        None
    }

    // Output has the same shape and dtype as the input
    fn apply(&self, images: &ImageBatch) -> Result<ImageBatch, AugmentError>;
}
