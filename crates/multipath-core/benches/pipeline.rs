//! Benchmarks for the multipath loading pipeline.
//!
//! Run with: cargo bench -p multipath-core

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use image::{Rgb, RgbImage};
use multipath_core::config::{Config, LimitsConfig};
use multipath_core::pipeline::{
    content_hash, resize::resize_image_batch, DirectoryLoader, DirectoryScanner, Fingerprinter,
    ImageNormalizer, LoadOptions,
};
use multipath_core::Geometry;
use ndarray::Array4;
use std::path::{Path, PathBuf};

fn write_frames(dir: &Path, count: usize, width: u32, height: u32) -> Vec<PathBuf> {
    (0..count)
        .map(|i| {
            let path = dir.join(format!("frame_{i:03}.png"));
            RgbImage::from_fn(width, height, |x, y| {
                Rgb([(x % 256) as u8, (y % 256) as u8, (i % 256) as u8])
            })
            .save(&path)
            .unwrap();
            path
        })
        .collect()
}

fn benchmark_content_hash(c: &mut Criterion) {
    let dir = tempfile::tempdir().unwrap();
    let files = write_frames(dir.path(), 1, 1920, 1080);

    c.bench_function("content_hash_blake3", |b| {
        b.iter(|| {
            let _ = content_hash(black_box(&files[0]));
        })
    });
}

fn benchmark_fingerprint(c: &mut Criterion) {
    let dir = tempfile::tempdir().unwrap();
    write_frames(dir.path(), 24, 256, 256);
    let fingerprinter = Fingerprinter::new(DirectoryScanner::new(&Default::default()));
    let directories = [dir.path().to_path_buf()];

    c.bench_function("fingerprint_24_frames", |b| {
        b.iter(|| {
            let _ = fingerprinter.fingerprint(black_box(&directories), 0, 0, 1);
        })
    });
}

fn benchmark_normalize(c: &mut Criterion) {
    let dir = tempfile::tempdir().unwrap();
    let files = write_frames(dir.path(), 1, 1280, 720);
    let normalizer = ImageNormalizer::new(LimitsConfig::default());

    c.bench_function("normalize_720p", |b| {
        b.iter(|| {
            let _ = normalizer.normalize(black_box(&files[0]));
        })
    });
}

fn benchmark_resize(c: &mut Criterion) {
    let batch = Array4::<f32>::from_elem((4, 256, 256, 3), 0.5);
    let target = Geometry::new(128, 96);

    c.bench_function("resize_batch_4x256_to_128x96", |b| {
        b.iter(|| {
            let _ = resize_image_batch(black_box(&batch), target);
        })
    });
}

fn benchmark_load_directory(c: &mut Criterion) {
    let dir = tempfile::tempdir().unwrap();
    write_frames(dir.path(), 8, 320, 240);
    let loader = DirectoryLoader::new(&Config::default());
    let options = LoadOptions::default();

    c.bench_function("load_directory_8_frames", |b| {
        b.iter(|| {
            let _ = loader.load(black_box(dir.path()), &options, &());
        })
    });
}

criterion_group!(
    benches,
    benchmark_content_hash,
    benchmark_fingerprint,
    benchmark_normalize,
    benchmark_resize,
    benchmark_load_directory,
);
criterion_main!(benches);
