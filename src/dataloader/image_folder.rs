use image::DynamicImage;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rayon::iter::{IntoParallelRefIterator, ParallelIterator};
use std::collections::HashSet;
use std::fs::DirEntry;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, warn};

use crate::error::AugmentError;
use crate::tensor::{BatchData, ImageBatch, LabelBatch};

use super::config::DataLoaderConfig;
use super::par_iter::PrefetchIterator;

/// Image dataset laid out as one subdirectory per class. A directory with no
/// subdirectories is treated as a single class.
pub struct ImageFolder {
    dir: PathBuf,
    classes: Vec<String>,
    dataset: Vec<(PathBuf, usize)>,
    dataset_indices: Vec<usize>,
    valid_extensions: HashSet<String>,
    image_width: u32,
    image_height: u32,
    image_channels: usize,
    config: DataLoaderConfig,
    rng: Option<StdRng>,
    thread_pool: rayon::ThreadPool,
}

impl ImageFolder {
    pub fn new(dir: impl AsRef<Path>, config: Option<DataLoaderConfig>) -> Result<Self, AugmentError> {
        let path = dir.as_ref();
        if !path.is_dir() {
            return Err(AugmentError::DirectoryNotFound(path.display().to_string()));
        }

        let config = config.unwrap_or_default().build()?;

        let valid_extensions = image::ImageFormat::all()
            .flat_map(|format| format.extensions_str())
            .map(|ext| ext.to_string())
            .collect();

        let thread_pool = rayon::ThreadPoolBuilder::new()
            .num_threads(config.threads)
            .build()?;

        let mut loader = ImageFolder {
            dir: path.to_owned(),
            classes: Vec::new(),
            dataset: Vec::new(),
            dataset_indices: Vec::new(),
            valid_extensions,
            image_width: 0,
            image_height: 0,
            image_channels: 0,
            config,
            rng: None,
            thread_pool,
        };

        loader.load_dataset()?;
        loader.scan_first_image()?;

        Ok(loader)
    }

    fn load_dataset(&mut self) -> Result<(), AugmentError> {
        let mut class_dirs: Vec<PathBuf> = std::fs::read_dir(&self.dir)?
            .filter_map(|entry| self.readable_entry(entry))
            .map(|entry| entry.path())
            .filter(|path| path.is_dir())
            .collect();
        class_dirs.sort_unstable();

        if class_dirs.is_empty() {
            let name = self
                .dir
                .file_name()
                .map(|name| name.to_string_lossy().into_owned())
                .unwrap_or_default();
            self.classes.push(name);
            self.dataset = self.scan_images(&self.dir, 0)?;
        } else {
            for (class_index, class_dir) in class_dirs.iter().enumerate() {
                let name = class_dir
                    .file_name()
                    .map(|name| name.to_string_lossy().into_owned())
                    .unwrap_or_default();
                self.classes.push(name);
                let images = self.scan_images(class_dir, class_index)?;
                self.dataset.extend(images);
            }
        }

        if self.dataset.is_empty() {
            return Err(AugmentError::EmptyDataset);
        }

        // read_dir order is filesystem dependent, sorting makes runs comparable across machines
        if self.config.sort_dataset {
            self.dataset.sort_unstable();
        }

        self.dataset_indices = (0..self.dataset.len()).collect();

        self.rng = if self.config.shuffle {
            let seed = *self
                .config
                .shuffle_seed
                .get_or_insert_with(|| rand::thread_rng().gen());
            Some(StdRng::seed_from_u64(seed))
        } else {
            None
        };

        if self.config.shuffle {
            self.shuffle_dataset()?;
        }

        Ok(())
    }

    fn scan_images(&self, dir: &Path, class_index: usize) -> Result<Vec<(PathBuf, usize)>, AugmentError> {
        Ok(std::fs::read_dir(dir)?
            .filter_map(|entry| self.readable_entry(entry))
            .map(|entry| entry.path())
            .filter(|path| path.is_file() && self.is_valid_extension(path))
            .map(|path| (path, class_index))
            .collect())
    }

    fn readable_entry(&self, entry: std::io::Result<DirEntry>) -> Option<DirEntry> {
        match entry {
            Ok(entry) => Some(entry),
            Err(err) => {
                warn!(dir = %self.dir.display(), %err, "Skipping unreadable directory entry");
                None
            }
        }
    }

    fn scan_first_image(&mut self) -> Result<(), AugmentError> {
        let img = image::open(&self.dataset[self.dataset_indices[0]].0)?;
        self.image_width = img.width();
        self.image_height = img.height();
        self.image_channels = match img.color().channel_count() {
            channels @ (1 | 3 | 4) => channels as usize,
            _ => return Err(AugmentError::UnsupportedColorType(format!("{:?}", img.color()))),
        };
        Ok(())
    }

    fn is_valid_extension(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| self.valid_extensions.contains(&ext.to_lowercase()))
            .unwrap_or(false)
    }

    /// Reshuffles the sample order, e.g. between epochs.
    pub fn shuffle_dataset(&mut self) -> Result<(), AugmentError> {
        let rng = self.rng.as_mut().ok_or(AugmentError::RngNotSet)?;
        self.dataset_indices.shuffle(rng);
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.dataset.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dataset.is_empty()
    }

    pub fn classes(&self) -> &[String] {
        &self.classes
    }

    pub fn num_classes(&self) -> usize {
        self.classes.len()
    }

    /// (height, width, channels) shared by every image in the dataset.
    pub fn image_dims(&self) -> (usize, usize, usize) {
        (self.image_height as usize, self.image_width as usize, self.image_channels)
    }

    pub fn config(&self) -> &DataLoaderConfig {
        &self.config
    }

    pub fn num_batches(&self) -> usize {
        let batch_size = self.config.batch_size;
        if self.config.drop_last {
            self.len() / batch_size
        } else {
            (self.len() + batch_size - 1) / batch_size
        }
    }

    /// Paths and class indices of the samples in batch `batch_number`.
    pub fn batch_entries(&self, batch_number: usize) -> Option<Vec<(PathBuf, usize)>> {
        let batch_start = batch_number * self.config.batch_size;
        if batch_start >= self.len() {
            return None;
        }

        let batch_end = (batch_start + self.config.batch_size).min(self.len());
        if self.config.drop_last && (batch_end - batch_start) < self.config.batch_size {
            return None;
        }

        let entries = self.dataset_indices[batch_start..batch_end]
            .iter()
            .map(|&idx| self.dataset[idx].clone())
            .collect();

        Some(entries)
    }

    /// Decodes the given samples in parallel into an image batch with one-hot labels.
    pub fn load_batch(&self, entries: &[(PathBuf, usize)]) -> Result<(ImageBatch, LabelBatch), AugmentError> {
        let decoded: Vec<Vec<u8>> = self.thread_pool.install(|| {
            entries
                .par_iter()
                .map(|(path, _)| self.decode(path))
                .collect::<Result<Vec<Vec<u8>>, AugmentError>>()
        })?;

        let (height, width, channels) = self.image_dims();
        let images = ImageBatch::new(
            &[entries.len(), height, width, channels],
            BatchData::U8(decoded.concat()),
        )?;

        let class_indices: Vec<usize> = entries.iter().map(|&(_, class)| class).collect();
        let labels = LabelBatch::one_hot(&class_indices, self.num_classes())?;

        debug!(samples = entries.len(), "Loaded image batch");

        Ok((images, labels))
    }

    pub fn batch(&self, batch_number: usize) -> Result<Option<(ImageBatch, LabelBatch)>, AugmentError> {
        self.batch_entries(batch_number)
            .map(|entries| self.load_batch(&entries))
            .transpose()
    }

    pub fn prefetch_iter(self: Arc<Self>) -> PrefetchIterator {
        PrefetchIterator::new(self)
    }

    fn decode(&self, path: &Path) -> Result<Vec<u8>, AugmentError> {
        let img = image::open(path)?;
        if (img.width(), img.height()) != (self.image_width, self.image_height) {
            return Err(AugmentError::ImageSizeMismatch {
                path: path.display().to_string(),
                expected: (self.image_width, self.image_height),
                got: (img.width(), img.height()),
            });
        }

        Ok(to_channels(img, self.image_channels))
    }
}

fn to_channels(img: DynamicImage, channels: usize) -> Vec<u8> {
    match channels {
        1 => img.into_luma8().into_raw(),
        3 => img.into_rgb8().into_raw(),
        _ => img.into_rgba8().into_raw(),
    }
}
