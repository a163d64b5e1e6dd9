use std::sync::Arc;
use std::thread;

use crossbeam_channel::{bounded, Receiver};

use crate::error::AugmentError;
use crate::tensor::{ImageBatch, LabelBatch};

use super::image_folder::ImageFolder;

pub type BatchResult = Result<(ImageBatch, LabelBatch), AugmentError>;

/// Iterates over the batches of an `ImageFolder`, decoding up to
/// `prefetch_count` batches ahead on a background thread.
pub struct PrefetchIterator {
    receiver: Receiver<BatchResult>,
}

impl PrefetchIterator {
    pub(super) fn new(loader: Arc<ImageFolder>) -> Self {
        let (sender, receiver) = bounded(loader.config().prefetch_count);

        thread::spawn(move || {
            let mut batch_number = 0;
            while let Some(entries) = loader.batch_entries(batch_number) {
                let batch = loader.load_batch(&entries);
                let failed = batch.is_err();
                // Receiver dropped, or the error has been handed over
                if sender.send(batch).is_err() || failed {
                    break;
                }
                batch_number += 1;
            }
        });

        PrefetchIterator { receiver }
    }
}

impl Iterator for PrefetchIterator {
    type Item = BatchResult;

    fn next(&mut self) -> Option<Self::Item> {
        self.receiver.recv().ok()
    }
}
