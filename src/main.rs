use std::sync::Arc;

use batch_augment::{
    log_dataset_info, AugmentError, Clahe, ClaheConfig, CutMix, CutMixConfig, DataLoaderConfig, ImageBatch,
    ImageFolder, ImageLayer,
};
use image::ColorType;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

const USAGE: &str = "usage: batch_augment <image_dir> [preview.png]";

fn main() {
    init_logging();

    if let Err(err) = run() {
        error!(%err, "Augmentation failed");
        std::process::exit(1);
    }
}

fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .init();
}

fn run() -> Result<(), AugmentError> {
    let mut args = std::env::args().skip(1);
    let Some(dir) = args.next() else {
        eprintln!("{USAGE}");
        std::process::exit(2);
    };
    let preview = args.next();
    let seed = std::env::var("BATCH_AUGMENT_SEED").ok().and_then(|s| s.parse().ok());

    let config = DataLoaderConfig {
        shuffle_seed: seed,
        drop_last: false,
        ..Default::default()
    };
    let loader = Arc::new(ImageFolder::new(&dir, Some(config))?);
    log_dataset_info(&loader);

    let cut_mix = CutMix::new(CutMixConfig {
        seed,
        ..Default::default()
    })?;
    let layers: Vec<Box<dyn ImageLayer>> = vec![Box::new(Clahe::new(ClaheConfig::default())?)];
    for layer in &layers {
        info!(layer = %layer.name(), config = ?layer.config_string(), "Image layer");
    }

    let mut preview = preview;
    for (batch_number, batch) in Arc::clone(&loader).prefetch_iter().enumerate() {
        let (images, labels) = batch?;
        let (mut images, labels) = cut_mix.apply(&images, &labels)?;
        for layer in &layers {
            images = layer.apply(&images)?;
        }

        // A label below 1 on its top class means the sample took a patch from another class
        let blended = (0..labels.num_samples())
            .filter(|&i| labels.row(i).iter().all(|&v| v < 1.0))
            .count();
        info!(batch_number, samples = images.batch_size(), blended, "Augmented batch");

        if let Some(path) = preview.take() {
            save_preview(&images, &path)?;
            info!(path = %path, "Wrote preview");
        }
    }

    Ok(())
}

fn save_preview(images: &ImageBatch, path: &str) -> Result<(), AugmentError> {
    let (batch_size, height, width, channels) = images.dims();
    if batch_size == 0 {
        return Ok(());
    }

    let pixels: Vec<u8> = images
        .image(0)
        .iter()
        .map(|&v| v.round().clamp(0.0, 255.0) as u8)
        .collect();
    let color_type = match channels {
        1 => ColorType::L8,
        3 => ColorType::Rgb8,
        _ => ColorType::Rgba8,
    };

    image::save_buffer(path, &pixels, width as u32, height as u32, color_type)?;
    Ok(())
}
