use tracing::info;

use super::image_folder::ImageFolder;

pub fn log_dataset_info(dl: &ImageFolder) {
    let config = dl.config();
    let (height, width, channels) = dl.image_dims();
    let last_batch_size = dl.len() % config.batch_size;

    info!(
        total_size = dl.len(),
        classes = dl.num_classes(),
        height,
        width,
        channels,
        "Dataset information"
    );
    info!(
        batch_size = config.batch_size,
        batches = dl.num_batches(),
        last_batch_size,
        drop_last = config.drop_last,
        "Batch layout"
    );
    info!(shuffle = config.shuffle, seed = ?config.shuffle_seed, "Ordering");
}
