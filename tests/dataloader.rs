use std::path::Path;
use std::sync::Arc;

use batch_augment::{AugmentError, CutMix, CutMixConfig, DataLoaderConfig, ImageFolder, SourceFormat};
use image::{Rgb, RgbImage};

fn write_image(dir: &Path, name: &str, size: (u32, u32), value: u8) {
    std::fs::create_dir_all(dir).unwrap();
    RgbImage::from_pixel(size.0, size.1, Rgb([value, value, value]))
        .save(dir.join(name))
        .unwrap();
}

fn config(batch_size: usize, seed: u64) -> DataLoaderConfig {
    DataLoaderConfig {
        threads: 2,
        batch_size,
        shuffle_seed: Some(seed),
        drop_last: false,
        ..Default::default()
    }
}

fn two_class_folder() -> tempfile::TempDir {
    let root = tempfile::tempdir().unwrap();
    for i in 0..3 {
        write_image(&root.path().join("cat"), &format!("{i}.png"), (8, 6), 10);
        write_image(&root.path().join("dog"), &format!("{i}.png"), (8, 6), 200);
    }
    // not an image, ignored
    std::fs::write(root.path().join("dog").join("notes.txt"), "ignored").unwrap();
    root
}

#[test]
fn class_directories_become_one_hot_labels() {
    let root = two_class_folder();
    let loader = ImageFolder::new(root.path(), Some(config(6, 1))).unwrap();

    assert_eq!(loader.len(), 6);
    assert_eq!(loader.classes(), &["cat".to_string(), "dog".to_string()]);
    assert_eq!(loader.image_dims(), (6, 8, 3));

    let (images, labels) = loader.batch(0).unwrap().unwrap();
    assert_eq!(images.shape(), vec![6, 6, 8, 3]);
    assert_eq!(images.format(), SourceFormat::U8);
    assert_eq!(labels.shape(), vec![6, 2]);

    // pixel value identifies the class the image was written for
    for i in 0..labels.num_samples() {
        let class = labels.row(i).iter().position(|&v| v == 1.0).unwrap();
        let expected = if class == 0 { 10.0 } else { 200.0 };
        assert_eq!(images.pixel(i, 0, 0)[0], expected);
    }
}

#[test]
fn seeded_shuffle_is_reproducible() {
    let root = two_class_folder();
    let a = ImageFolder::new(root.path(), Some(config(2, 42))).unwrap();
    let b = ImageFolder::new(root.path(), Some(config(2, 42))).unwrap();
    assert_eq!(a.batch_entries(0), b.batch_entries(0));
    assert_eq!(a.batch_entries(2), b.batch_entries(2));
}

#[test]
fn drop_last_controls_partial_batches() {
    let root = two_class_folder();
    let keep = ImageFolder::new(root.path(), Some(config(4, 0))).unwrap();
    assert_eq!(keep.num_batches(), 2);
    assert_eq!(keep.batch_entries(1).map(|e| e.len()), Some(2));

    let drop = ImageFolder::new(
        root.path(),
        Some(DataLoaderConfig {
            drop_last: true,
            ..config(4, 0)
        }),
    )
    .unwrap();
    assert_eq!(drop.num_batches(), 1);
    assert!(drop.batch_entries(1).is_none());
}

#[test]
fn flat_directory_is_a_single_class() {
    let root = tempfile::tempdir().unwrap();
    write_image(root.path(), "a.png", (4, 4), 1);
    write_image(root.path(), "b.png", (4, 4), 2);

    let loader = ImageFolder::new(root.path(), Some(config(2, 0))).unwrap();
    assert_eq!(loader.num_classes(), 1);
    let (_, labels) = loader.batch(0).unwrap().unwrap();
    assert_eq!(labels.as_slice(), &[1.0, 1.0]);
}

#[test]
fn mismatched_image_sizes_are_rejected() {
    let root = tempfile::tempdir().unwrap();
    write_image(root.path(), "a.png", (4, 4), 1);
    write_image(root.path(), "b.png", (5, 4), 2);

    let loader = ImageFolder::new(root.path(), Some(config(2, 0))).unwrap();
    assert!(matches!(loader.batch(0), Err(AugmentError::ImageSizeMismatch { .. })));
}

#[test]
fn missing_and_empty_directories() {
    assert!(matches!(
        ImageFolder::new("/definitely/not/here", None),
        Err(AugmentError::DirectoryNotFound(_))
    ));

    let root = tempfile::tempdir().unwrap();
    assert!(matches!(
        ImageFolder::new(root.path(), Some(config(2, 0))),
        Err(AugmentError::EmptyDataset)
    ));
}

#[test]
fn prefetch_iterator_feeds_cut_mix() {
    let root = two_class_folder();
    let loader = Arc::new(ImageFolder::new(root.path(), Some(config(4, 5))).unwrap());
    let cut_mix = CutMix::new(CutMixConfig {
        seed: Some(5),
        ..Default::default()
    })
    .unwrap();

    let mut samples = 0;
    for batch in Arc::clone(&loader).prefetch_iter() {
        let (images, labels) = batch.unwrap();
        let (mixed, mixed_labels) = cut_mix.apply(&images, &labels).unwrap();
        assert_eq!(mixed.shape(), images.shape());
        assert!(mixed.as_slice().iter().all(|&v| v == 10.0 || v == 200.0));
        for i in 0..mixed_labels.num_samples() {
            let sum: f32 = mixed_labels.row(i).iter().sum();
            assert!((sum - 1.0).abs() < 1e-5);
        }
        samples += images.batch_size();
    }
    assert_eq!(samples, 6);
}

#[test]
fn reshuffle_requires_shuffling_enabled() {
    let root = two_class_folder();
    let mut loader = ImageFolder::new(
        root.path(),
        Some(DataLoaderConfig {
            shuffle: false,
            ..config(2, 0)
        }),
    )
    .unwrap();
    assert!(matches!(loader.shuffle_dataset(), Err(AugmentError::RngNotSet)));
}
