use crate::error::AugmentError;

use super::tensor_data::{BatchData, SourceFormat};
use super::tensor_desc::TensorDesc;
use super::value_range::ValueRange;

/// A batch of same-sized images stored as one flat NHWC `f32` buffer.
#[derive(Clone, Debug, PartialEq)]
pub struct ImageBatch {
    desc: TensorDesc,
    data: Vec<f32>,
    format: SourceFormat,
}

impl ImageBatch {
    pub fn new(dims: &[usize], data: BatchData) -> Result<Self, AugmentError> {
        let desc = TensorDesc::tensor4d_from_dims(dims)?;
        if data.len() != desc.num_elements() {
            return Err(AugmentError::DataLengthMismatch {
                expected: desc.num_elements(),
                got: data.len(),
            });
        }

        Ok(Self {
            format: data.format(),
            data: data.to_f32(),
            desc,
        })
    }

    pub fn from_f32(dims: &[usize], data: Vec<f32>) -> Result<Self, AugmentError> {
        Self::new(dims, BatchData::F32(data))
    }

    /// Batch where every image `i` is filled with `values[i]`.
    pub fn filled(values: &[f32], height: usize, width: usize, channels: usize) -> Result<Self, AugmentError> {
        let per_image = height * width * channels;
        let data = values
            .iter()
            .flat_map(|&v| std::iter::repeat(v).take(per_image))
            .collect();
        Self::from_f32(&[values.len(), height, width, channels], data)
    }

    /// Cast back to the dtype the batch was created from.
    pub fn into_data(self, range: ValueRange) -> BatchData {
        BatchData::from_f32(&self.data, self.format, range)
    }

    pub fn desc(&self) -> &TensorDesc {
        &self.desc
    }

    pub fn dims(&self) -> (usize, usize, usize, usize) {
        match self.desc {
            TensorDesc::Tensor4D { batch, height, width, channels } => (batch, height, width, channels),
            // Constructors only ever build Tensor4D
            TensorDesc::Matrix { .. } => unreachable!("image batch with matrix descriptor"),
        }
    }

    pub fn shape(&self) -> Vec<usize> {
        self.desc.to_dims()
    }

    pub fn batch_size(&self) -> usize {
        self.dims().0
    }

    pub fn format(&self) -> SourceFormat {
        self.format
    }

    pub fn elements_per_image(&self) -> usize {
        let (_, height, width, channels) = self.dims();
        height * width * channels
    }

    pub fn as_slice(&self) -> &[f32] {
        &self.data
    }

    pub fn as_mut_slice(&mut self) -> &mut [f32] {
        &mut self.data
    }

    pub fn image(&self, index: usize) -> &[f32] {
        let len = self.elements_per_image();
        &self.data[index * len..(index + 1) * len]
    }

    pub fn image_mut(&mut self, index: usize) -> &mut [f32] {
        let len = self.elements_per_image();
        &mut self.data[index * len..(index + 1) * len]
    }

    /// All channel values of one pixel.
    pub fn pixel(&self, index: usize, y: usize, x: usize) -> &[f32] {
        let (_, _, width, channels) = self.dims();
        let start = (y * width + x) * channels;
        &self.image(index)[start..start + channels]
    }

    pub fn all_within(&self, range: ValueRange) -> bool {
        self.data.iter().all(|&v| range.contains(v))
    }
}
