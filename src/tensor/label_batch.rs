use crate::error::AugmentError;

use super::tensor_desc::TensorDesc;

/// One label vector per sample, row-major `(samples, classes)`.
#[derive(Clone, Debug, PartialEq)]
pub struct LabelBatch {
    desc: TensorDesc,
    data: Vec<f32>,
}

impl LabelBatch {
    pub fn new(dims: &[usize], data: Vec<f32>) -> Result<Self, AugmentError> {
        let desc = TensorDesc::matrix_from_dims(dims)?;
        if data.len() != desc.num_elements() {
            return Err(AugmentError::DataLengthMismatch {
                expected: desc.num_elements(),
                got: data.len(),
            });
        }
        Ok(Self { desc, data })
    }

    pub fn one_hot(indices: &[usize], num_classes: usize) -> Result<Self, AugmentError> {
        let mut data = vec![0.0; indices.len() * num_classes];
        for (row, &index) in indices.iter().enumerate() {
            if index >= num_classes {
                return Err(AugmentError::ClassIndexOutOfRange { index, num_classes });
            }
            data[row * num_classes + index] = 1.0;
        }
        Self::new(&[indices.len(), num_classes], data)
    }

    pub fn desc(&self) -> &TensorDesc {
        &self.desc
    }

    pub fn num_samples(&self) -> usize {
        match self.desc {
            TensorDesc::Matrix { rows, .. } => rows,
            TensorDesc::Tensor4D { .. } => unreachable!("label batch with 4D descriptor"),
        }
    }

    pub fn num_classes(&self) -> usize {
        match self.desc {
            TensorDesc::Matrix { cols, .. } => cols,
            TensorDesc::Tensor4D { .. } => unreachable!("label batch with 4D descriptor"),
        }
    }

    pub fn shape(&self) -> Vec<usize> {
        self.desc.to_dims()
    }

    pub fn as_slice(&self) -> &[f32] {
        &self.data
    }

    pub fn row(&self, index: usize) -> &[f32] {
        let classes = self.num_classes();
        &self.data[index * classes..(index + 1) * classes]
    }

    pub fn row_mut(&mut self, index: usize) -> &mut [f32] {
        let classes = self.num_classes();
        &mut self.data[index * classes..(index + 1) * classes]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn one_hot_rows() {
        let labels = LabelBatch::one_hot(&[2, 0], 3).unwrap();
        assert_eq!(labels.shape(), vec![2, 3]);
        assert_eq!(labels.row(0), &[0.0, 0.0, 1.0]);
        assert_eq!(labels.row(1), &[1.0, 0.0, 0.0]);
    }

    #[test]
    fn one_hot_rejects_out_of_range_class() {
        assert!(matches!(
            LabelBatch::one_hot(&[3], 3),
            Err(AugmentError::ClassIndexOutOfRange { index: 3, num_classes: 3 })
        ));
    }

    #[test]
    fn labels_must_be_rank_two() {
        assert!(matches!(
            LabelBatch::new(&[4], vec![0.0; 4]),
            Err(AugmentError::InvalidInputShape { expected: 2, .. })
        ));
    }
}
