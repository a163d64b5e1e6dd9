use crate::error::AugmentError;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TensorDesc {
    // For label batches, one row per sample
    Matrix { rows: usize, cols: usize },

    // For image batches, channels last (NHWC)
    Tensor4D {
        batch: usize,
        height: usize,
        width: usize,
        channels: usize,
    },
}

impl TensorDesc {
    pub fn new_matrix(rows: usize, cols: usize) -> Self {
        Self::Matrix { rows, cols }
    }

    pub fn new_tensor4d(batch: usize, height: usize, width: usize, channels: usize) -> Self {
        Self::Tensor4D { batch, height, width, channels }
    }

    /// Parses `[rows, cols]`. Zero rows is an empty batch, zero columns is rejected.
    pub fn matrix_from_dims(dims: &[usize]) -> Result<Self, AugmentError> {
        match *dims {
            [rows, cols] if cols > 0 => Ok(Self::new_matrix(rows, cols)),
            _ => Err(AugmentError::InvalidInputShape {
                expected: 2,
                got: dims.to_vec(),
            }),
        }
    }

    /// Parses `[batch, height, width, channels]`. Only the batch dimension may be zero.
    pub fn tensor4d_from_dims(dims: &[usize]) -> Result<Self, AugmentError> {
        match *dims {
            [batch, height, width, channels] if height > 0 && width > 0 && channels > 0 => {
                Ok(Self::new_tensor4d(batch, height, width, channels))
            }
            _ => Err(AugmentError::InvalidInputShape {
                expected: 4,
                got: dims.to_vec(),
            }),
        }
    }

    pub fn num_elements(&self) -> usize {
        match &self {
            Self::Matrix { rows, cols } => rows * cols,
            Self::Tensor4D { batch, height, width, channels } =>
                batch * height * width * channels,
        }
    }

    pub fn to_dims(&self) -> Vec<usize> {
        match &self {
            Self::Matrix { rows, cols } => vec![*rows, *cols],
            Self::Tensor4D { batch, height, width, channels } =>
                vec![*batch, *height, *width, *channels],
        }
    }
}
