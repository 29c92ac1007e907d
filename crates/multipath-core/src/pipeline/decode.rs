//! Image decoding into normalized RGB and mask tensors.

use image::{DynamicImage, GenericImageView, ImageFormat, ImageReader};
use ndarray::{Array2, Array3};
use std::io::Cursor;
use std::path::Path;

use super::metadata::Orientation;
use crate::config::LimitsConfig;
use crate::error::PipelineError;
use crate::types::{Geometry, ImageTensor, MaskTensor, RGB_CHANNELS};

/// Decodes one file into the tensors the loader stacks.
pub struct ImageNormalizer {
    limits: LimitsConfig,
}

/// One decoded frame at its native (oriented) resolution.
#[derive(Debug, Clone)]
pub struct NormalizedImage {
    /// RGB samples in `[0, 1]`
    pub image: ImageTensor,
    /// `1 - alpha`, or zeros when the source has no alpha channel
    pub mask: MaskTensor,
    pub geometry: Geometry,
    pub has_alpha: bool,
}

impl ImageNormalizer {
    /// Create a new normalizer with the given limits.
    pub fn new(limits: LimitsConfig) -> Self {
        Self { limits }
    }

    /// Decode `path`, correct its orientation, and split color from alpha.
    pub fn normalize(&self, path: &Path) -> Result<NormalizedImage, PipelineError> {
        let bytes = std::fs::read(path).map_err(|e| PipelineError::Decode {
            path: path.to_path_buf(),
            message: format!("Cannot read file: {}", e),
        })?;
        let orientation = Orientation::read(&bytes);

        let decoded = decode_bytes(bytes, path)?;
        let (width, height) = decoded.dimensions();
        self.check_dimensions(path, width, height)?;

        let image = orientation.apply(decoded);
        Ok(to_tensors(&image))
    }

    /// Read the oriented size of `path` without decoding pixel data.
    pub fn probe_geometry(&self, path: &Path) -> Result<Geometry, PipelineError> {
        let bytes = std::fs::read(path).map_err(|e| PipelineError::Decode {
            path: path.to_path_buf(),
            message: format!("Cannot read file: {}", e),
        })?;
        let orientation = Orientation::read(&bytes);
        let (width, height) = reader_for(bytes, path)?
            .into_dimensions()
            .map_err(|e| PipelineError::Decode {
                path: path.to_path_buf(),
                message: e.to_string(),
            })?;
        Ok(orientation.oriented(width, height))
    }

    fn check_dimensions(&self, path: &Path, width: u32, height: u32) -> Result<(), PipelineError> {
        if width > self.limits.max_image_dimension || height > self.limits.max_image_dimension {
            return Err(PipelineError::ImageTooLarge {
                path: path.to_path_buf(),
                width,
                height,
                max_dim: self.limits.max_image_dimension,
            });
        }
        Ok(())
    }
}

/// Build a reader that detects the format from content, falling back to the
/// file extension.
fn reader_for(bytes: Vec<u8>, path: &Path) -> Result<ImageReader<Cursor<Vec<u8>>>, PipelineError> {
    let mut reader = ImageReader::new(Cursor::new(bytes))
        .with_guessed_format()
        .map_err(|e| PipelineError::Decode {
            path: path.to_path_buf(),
            message: format!("Cannot detect image format: {}", e),
        })?;
    if reader.format().is_none() {
        let format = ImageFormat::from_path(path).map_err(|_| PipelineError::Decode {
            path: path.to_path_buf(),
            message: format!(
                "Unsupported format: {}",
                path.extension()
                    .and_then(|e| e.to_str())
                    .unwrap_or("unknown")
            ),
        })?;
        reader.set_format(format);
    }
    Ok(reader)
}

fn decode_bytes(bytes: Vec<u8>, path: &Path) -> Result<DynamicImage, PipelineError> {
    reader_for(bytes, path)?
        .decode()
        .map_err(|e| PipelineError::Decode {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
}

/// Convert a decoded image to `[0, 1]` RGB plus an inverted-alpha mask.
pub fn to_tensors(image: &DynamicImage) -> NormalizedImage {
    let (width, height) = image.dimensions();
    let (w, h) = (width as usize, height as usize);
    let has_alpha = image.color().has_alpha();

    let (tensor, mask) = if has_alpha {
        let rgba = image.to_rgba8();
        let raw = rgba.as_raw();
        let mut tensor = Array3::<f32>::zeros((h, w, RGB_CHANNELS));
        let mut mask = Array2::<f32>::zeros((h, w));
        for (i, pixel) in raw.chunks_exact(4).enumerate() {
            let (y, x) = (i / w, i % w);
            for c in 0..RGB_CHANNELS {
                tensor[[y, x, c]] = pixel[c] as f32 / 255.0;
            }
            mask[[y, x]] = 1.0 - pixel[3] as f32 / 255.0;
        }
        (tensor, mask)
    } else {
        let rgb = image.to_rgb8();
        let raw = rgb.as_raw();
        let mut tensor = Array3::<f32>::zeros((h, w, RGB_CHANNELS));
        for (i, pixel) in raw.chunks_exact(RGB_CHANNELS).enumerate() {
            let (y, x) = (i / w, i % w);
            for (c, &val) in pixel.iter().enumerate() {
                tensor[[y, x, c]] = val as f32 / 255.0;
            }
        }
        (tensor, Array2::zeros((h, w)))
    };

    NormalizedImage {
        image: tensor,
        mask,
        geometry: Geometry::new(width, height),
        has_alpha,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgb, RgbImage, Rgba, RgbaImage};

    fn normalizer() -> ImageNormalizer {
        ImageNormalizer::new(LimitsConfig::default())
    }

    #[test]
    fn test_rgb_scaling() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("rgb.png");
        RgbImage::from_pixel(3, 2, Rgb([255, 51, 0])).save(&path).unwrap();

        let frame = normalizer().normalize(&path).unwrap();
        assert_eq!(frame.geometry, Geometry::new(3, 2));
        assert_eq!(frame.image.dim(), (2, 3, 3));
        assert!(!frame.has_alpha);
        assert_eq!(frame.image[[1, 2, 0]], 1.0);
        assert!((frame.image[[1, 2, 1]] - 0.2).abs() < 1e-6);
        assert_eq!(frame.image[[1, 2, 2]], 0.0);
        assert!(frame.mask.iter().all(|&v| v == 0.0));
    }

    #[test]
    fn test_alpha_becomes_inverted_mask() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("rgba.png");
        RgbaImage::from_pixel(2, 2, Rgba([10, 20, 30, 200]))
            .save(&path)
            .unwrap();

        let frame = normalizer().normalize(&path).unwrap();
        assert!(frame.has_alpha);
        assert_eq!(frame.image.dim(), (2, 2, 3));
        let expected = 1.0 - 200.0 / 255.0;
        assert!((frame.mask[[0, 0]] - expected).abs() < 1e-6);
        assert!((frame.mask[[0, 0]] - 0.216).abs() < 1e-3);
    }

    #[test]
    fn test_format_detected_by_content() {
        // PNG content behind a .jpg extension still decodes
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("misnamed.jpg");
        let mut buffer = Cursor::new(Vec::new());
        RgbImage::new(4, 4)
            .write_to(&mut buffer, ImageFormat::Png)
            .unwrap();
        std::fs::write(&path, buffer.into_inner()).unwrap();

        let frame = normalizer().normalize(&path).unwrap();
        assert_eq!(frame.geometry, Geometry::new(4, 4));
    }

    #[test]
    fn test_unreadable_image_is_decode_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.png");
        std::fs::write(&path, b"\x89PNG garbage").unwrap();

        let err = normalizer().normalize(&path).unwrap_err();
        assert!(matches!(err, PipelineError::Decode { .. }));
    }

    #[test]
    fn test_dimension_limit() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("wide.png");
        RgbImage::new(20, 2).save(&path).unwrap();

        let limited = ImageNormalizer::new(LimitsConfig {
            max_image_dimension: 10,
        });
        let err = limited.normalize(&path).unwrap_err();
        assert!(matches!(err, PipelineError::ImageTooLarge { .. }));
    }

    #[test]
    fn test_probe_geometry() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("probe.png");
        RgbImage::new(7, 5).save(&path).unwrap();
        assert_eq!(
            normalizer().probe_geometry(&path).unwrap(),
            Geometry::new(7, 5)
        );
    }
}
