//! EXIF orientation lookup and correction.

use exif::{In, Reader, Tag, Value};
use image::DynamicImage;
use std::io::Cursor;

use crate::types::Geometry;

/// Stored EXIF orientation, values 1-8.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Orientation(u32);

impl Orientation {
    /// Pixel rows already match visual orientation.
    pub const NORMAL: Orientation = Orientation(1);

    /// Build from a raw tag value; values outside 1-8 are treated as normal.
    pub fn from_raw(value: u32) -> Self {
        if (1..=8).contains(&value) {
            Self(value)
        } else {
            Self::NORMAL
        }
    }

    /// Read the orientation from an encoded image.
    ///
    /// Missing or unreadable EXIF data means no correction is needed.
    pub fn read(bytes: &[u8]) -> Self {
        let mut cursor = Cursor::new(bytes);
        let Ok(exif) = Reader::new().read_from_container(&mut cursor) else {
            return Self::NORMAL;
        };
        exif.get_field(Tag::Orientation, In::PRIMARY)
            .and_then(|f| match &f.value {
                Value::Short(v) => v.first().map(|&x| x as u32),
                Value::Long(v) => v.first().copied(),
                _ => None,
            })
            .map(Self::from_raw)
            .unwrap_or(Self::NORMAL)
    }

    pub fn raw(self) -> u32 {
        self.0
    }

    /// Whether applying the orientation swaps width and height.
    pub fn swaps_axes(self) -> bool {
        self.0 >= 5
    }

    /// Geometry after the orientation is applied.
    pub fn oriented(self, width: u32, height: u32) -> Geometry {
        if self.swaps_axes() {
            Geometry::new(height, width)
        } else {
            Geometry::new(width, height)
        }
    }

    /// Transform the image so its rows match the visual orientation.
    pub fn apply(self, image: DynamicImage) -> DynamicImage {
        match self.0 {
            2 => image.fliph(),
            3 => image.rotate180(),
            4 => image.flipv(),
            5 => image.rotate90().fliph(),
            6 => image.rotate90(),
            7 => image.rotate270().fliph(),
            8 => image.rotate270(),
            _ => image,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{GenericImageView, Rgb, RgbImage};

    #[test]
    fn test_read_without_exif_is_normal() {
        assert_eq!(Orientation::read(b"not an image"), Orientation::NORMAL);
    }

    #[test]
    fn test_from_raw_out_of_range() {
        assert_eq!(Orientation::from_raw(0), Orientation::NORMAL);
        assert_eq!(Orientation::from_raw(9), Orientation::NORMAL);
        assert_eq!(Orientation::from_raw(6).raw(), 6);
    }

    #[test]
    fn test_rotation_swaps_geometry() {
        assert_eq!(
            Orientation::from_raw(6).oriented(40, 20),
            Geometry::new(20, 40)
        );
        assert_eq!(
            Orientation::from_raw(3).oriented(40, 20),
            Geometry::new(40, 20)
        );
    }

    #[test]
    fn test_apply_rotate90_moves_top_left() {
        // Marker in the top-left pixel of a 2x1 image
        let mut img = RgbImage::new(2, 1);
        img.put_pixel(0, 0, Rgb([255, 0, 0]));
        let rotated = Orientation::from_raw(6).apply(DynamicImage::ImageRgb8(img));

        assert_eq!(rotated.dimensions(), (1, 2));
        // Clockwise: (x, y) -> (h - 1 - y, x), and h is 1
        assert_eq!(rotated.to_rgb8().get_pixel(0, 0), &Rgb([255, 0, 0]));
    }

    #[test]
    fn test_apply_mirror() {
        let mut img = RgbImage::new(2, 1);
        img.put_pixel(0, 0, Rgb([255, 0, 0]));
        let flipped = Orientation::from_raw(2).apply(DynamicImage::ImageRgb8(img));
        assert_eq!(flipped.to_rgb8().get_pixel(1, 0), &Rgb([255, 0, 0]));
    }
}
