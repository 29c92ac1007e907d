//! Resampling of image and mask tensors to a target geometry.
//!
//! Color frames are center-cropped to the target aspect ratio and resampled
//! with Lanczos3. Masks get the same crop but nearest-neighbor sampling, so a
//! resized mask only ever holds values present in the source mask.

use image::imageops::{self, FilterType};
use image::{ImageBuffer, Rgb, Rgb32FImage};
use ndarray::{s, Array2, Array3, Array4, ArrayView2, ArrayView3, Axis};

use crate::types::{Geometry, ImageTensor, MaskTensor, RGB_CHANNELS};

/// Source window kept when cropping to a new aspect ratio.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct CropWindow {
    x: usize,
    y: usize,
    width: usize,
    height: usize,
}

impl CropWindow {
    /// Centered window of `(width, height)` matching the aspect of `target`.
    fn centered(width: usize, height: usize, target: Geometry) -> Self {
        let old_aspect = width as f64 / height as f64;
        let new_aspect = target.width as f64 / target.height as f64;

        let mut x = 0usize;
        let mut y = 0usize;
        if old_aspect > new_aspect {
            x = ((width as f64 - width as f64 * (new_aspect / old_aspect)) / 2.0).round() as usize;
        } else if old_aspect < new_aspect {
            y = ((height as f64 - height as f64 * (old_aspect / new_aspect)) / 2.0).round()
                as usize;
        }

        // Never crop away the last row or column
        let x = x.min(width.saturating_sub(1) / 2);
        let y = y.min(height.saturating_sub(1) / 2);
        Self {
            x,
            y,
            width: width - 2 * x,
            height: height - 2 * y,
        }
    }
}

/// Resample one RGB frame to `target`.
pub fn resize_image(image: &ImageTensor, target: Geometry) -> ImageTensor {
    if Geometry::of_image(image) == target {
        return image.clone();
    }
    resize_image_view(image.view(), target)
}

fn resize_image_view(image: ArrayView3<'_, f32>, target: Geometry) -> ImageTensor {
    let (h, w, _) = image.dim();
    let crop = CropWindow::centered(w, h, target);
    let cropped = image.slice(s![
        crop.y..crop.y + crop.height,
        crop.x..crop.x + crop.width,
        ..
    ]);

    let raw: Vec<f32> = cropped.iter().copied().collect();
    let source: Rgb32FImage = match ImageBuffer::<Rgb<f32>, Vec<f32>>::from_raw(
        crop.width as u32,
        crop.height as u32,
        raw,
    ) {
        Some(buffer) => buffer,
        // Length always matches width * height * 3 for a (h, w, 3) slice
        None => return Array3::zeros(target_shape(target)),
    };

    let resized = imageops::resize(&source, target.width, target.height, FilterType::Lanczos3);
    Array3::from_shape_fn(target_shape(target), |(y, x, c)| {
        resized.get_pixel(x as u32, y as u32)[c].clamp(0.0, 1.0)
    })
}

/// Resample one mask frame to `target` with nearest-neighbor sampling.
pub fn resize_mask(mask: &MaskTensor, target: Geometry) -> MaskTensor {
    resize_mask_view(mask.view(), target)
}

fn resize_mask_view(mask: ArrayView2<'_, f32>, target: Geometry) -> MaskTensor {
    let (h, w) = mask.dim();
    if w == target.width as usize && h == target.height as usize {
        return mask.to_owned();
    }
    let crop = CropWindow::centered(w, h, target);
    let (th, tw) = (target.height as usize, target.width as usize);

    Array2::from_shape_fn((th, tw), |(y, x)| {
        let sy = ((y * crop.height) / th).min(crop.height - 1);
        let sx = ((x * crop.width) / tw).min(crop.width - 1);
        mask[[crop.y + sy, crop.x + sx]]
    })
}

/// Resample every frame of an `(n, h, w, 3)` batch.
pub fn resize_image_batch(images: &Array4<f32>, target: Geometry) -> Array4<f32> {
    let n = images.len_of(Axis(0));
    let mut out = Array4::zeros((n, target.height as usize, target.width as usize, RGB_CHANNELS));
    for (i, frame) in images.axis_iter(Axis(0)).enumerate() {
        out.index_axis_mut(Axis(0), i)
            .assign(&resize_image_view(frame, target));
    }
    out
}

/// Resample every frame of an `(n, h, w)` mask batch.
pub fn resize_mask_batch(masks: &Array3<f32>, target: Geometry) -> Array3<f32> {
    let n = masks.len_of(Axis(0));
    let mut out = Array3::zeros((n, target.height as usize, target.width as usize));
    for (i, frame) in masks.axis_iter(Axis(0)).enumerate() {
        out.index_axis_mut(Axis(0), i)
            .assign(&resize_mask_view(frame, target));
    }
    out
}

fn target_shape(target: Geometry) -> (usize, usize, usize) {
    (target.height as usize, target.width as usize, RGB_CHANNELS)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_crop_window_wide_source() {
        // 200x100 into a square target keeps the central 100x100
        let crop = CropWindow::centered(200, 100, Geometry::new(50, 50));
        assert_eq!(
            crop,
            CropWindow {
                x: 50,
                y: 0,
                width: 100,
                height: 100
            }
        );
    }

    #[test]
    fn test_crop_window_same_aspect() {
        let crop = CropWindow::centered(32, 32, Geometry::new(64, 64));
        assert_eq!((crop.x, crop.y, crop.width, crop.height), (0, 0, 32, 32));
    }

    #[test]
    fn test_resize_image_shape_and_range() {
        let image = Array3::from_shape_fn((32, 32, 3), |(y, x, _)| {
            if (x + y) % 2 == 0 {
                1.0
            } else {
                0.0
            }
        });
        let resized = resize_image(&image, Geometry::new(64, 48));
        assert_eq!(resized.dim(), (48, 64, 3));
        assert!(resized.iter().all(|v| (0.0..=1.0).contains(v)));
    }

    #[test]
    fn test_resize_image_constant_stays_constant() {
        let image = Array3::from_elem((10, 20, 3), 0.5f32);
        let resized = resize_image(&image, Geometry::new(7, 7));
        assert!(resized.iter().all(|v| (v - 0.5).abs() < 1e-4));
    }

    #[test]
    fn test_resize_mask_only_source_values() {
        let mask = Array2::from_shape_fn((32, 32), |(y, x)| {
            if x < 16 {
                0.0
            } else if y < 16 {
                1.0
            } else {
                0.25
            }
        });
        let resized = resize_mask(&mask, Geometry::new(64, 64));
        assert_eq!(resized.dim(), (64, 64));

        let allowed: HashSet<u32> = mask.iter().map(|v| v.to_bits()).collect();
        assert!(resized.iter().all(|v| allowed.contains(&v.to_bits())));
    }

    #[test]
    fn test_resize_mask_upscale_nearest() {
        let mask = Array2::from_shape_vec((1, 2), vec![0.0, 1.0]).unwrap();
        let resized = resize_mask(&mask, Geometry::new(4, 2));
        assert_eq!(
            resized,
            Array2::from_shape_vec((2, 4), vec![0.0, 0.0, 1.0, 1.0, 0.0, 0.0, 1.0, 1.0])
                .unwrap()
        );
    }

    #[test]
    fn test_resize_batches() {
        let images = Array4::from_elem((3, 8, 8, 3), 0.2f32);
        let masks = Array3::from_elem((3, 8, 8), 1.0f32);
        let target = Geometry::new(4, 6);

        let images = resize_image_batch(&images, target);
        let masks = resize_mask_batch(&masks, target);
        assert_eq!(images.dim(), (3, 6, 4, 3));
        assert_eq!(masks.dim(), (3, 6, 4));
        assert!(masks.iter().all(|&v| v == 1.0));
    }
}
