pub mod config;
pub mod image_folder;
pub mod info;
pub mod par_iter;

pub use config::DataLoaderConfig;
pub use image_folder::ImageFolder;
pub use info::log_dataset_info;
pub use par_iter::PrefetchIterator;
