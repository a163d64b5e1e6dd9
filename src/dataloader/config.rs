use crate::error::AugmentError;

pub struct DataLoaderConfig {
    pub threads: usize,
    pub prefetch_count: usize,
    pub batch_size: usize,
    pub sort_dataset: bool,
    pub shuffle: bool,
    pub shuffle_seed: Option<u64>,
    pub drop_last: bool,
}

impl DataLoaderConfig {
    pub fn build(self) -> Result<Self, AugmentError> {
        if self.batch_size == 0 {
            return Err(AugmentError::InvalidBatchSize(self.batch_size));
        }
        if self.threads == 0 {
            return Err(AugmentError::InvalidThreadCount(self.threads));
        }

        Ok(self)
    }
}

impl Default for DataLoaderConfig {
    fn default() -> Self {
        Self {
            threads: num_cpus::get(),
            prefetch_count: 2,
            batch_size: 32,
            sort_dataset: false,
            shuffle: true,
            shuffle_seed: None,
            drop_last: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_batch_size_is_rejected() {
        let config = DataLoaderConfig { batch_size: 0, ..Default::default() };
        assert!(matches!(config.build(), Err(AugmentError::InvalidBatchSize(0))));
    }

    #[test]
    fn zero_threads_is_rejected() {
        let config = DataLoaderConfig { threads: 0, ..Default::default() };
        assert!(matches!(config.build(), Err(AugmentError::InvalidThreadCount(0))));
    }
}
