//! Image normalization for the classifier input.

use image::DynamicImage;
use image::imageops::FilterType;
use ndarray::Array4;
use std::path::Path;

use crate::error::{Error, Result};

/// Input edge length the model was trained with.
pub const INPUT_SIZE: u32 = 224;

/// Decode an image file. Failures surface as [`Error::InvalidImage`]; no
/// partial tensor is ever produced.
pub fn decode_image(path: &Path) -> Result<DynamicImage> {
    image::open(path).map_err(|e| Error::InvalidImage {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })
}

/// Decode an in-memory upload. `name` only labels the error.
pub fn decode_image_bytes(name: &str, bytes: &[u8]) -> Result<DynamicImage> {
    image::load_from_memory(bytes).map_err(|e| Error::InvalidImage {
        path: name.into(),
        reason: e.to_string(),
    })
}

/// Normalize a decoded image into the fixed classifier input tensor.
///
/// Any pixel format is accepted: alpha is dropped, grayscale is expanded to
/// three channels. The resize stretches to a square; aspect ratio is
/// intentionally not preserved because the model was trained on stretched
/// inputs. Output shape is (1, 224, 224, 3) with values in [0, 1].
pub fn preprocess(img: &DynamicImage) -> Array4<f32> {
    let resized = img
        .resize_exact(INPUT_SIZE, INPUT_SIZE, FilterType::Triangle)
        .to_rgb8();
    let side = INPUT_SIZE as usize;
    let mut tensor = Array4::<f32>::zeros((1, side, side, 3));
    for (x, y, pixel) in resized.enumerate_pixels() {
        let [r, g, b] = pixel.0;
        let (row, col) = (y as usize, x as usize);
        tensor[[0, row, col, 0]] = r as f32 / 255.0;
        tensor[[0, row, col, 1]] = g as f32 / 255.0;
        tensor[[0, row, col, 2]] = b as f32 / 255.0;
    }
    tensor
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use image::{GrayImage, Rgb, RgbImage, RgbaImage};

    fn solid_rgb(width: u32, height: u32, rgb: [u8; 3]) -> DynamicImage {
        let mut img = RgbImage::new(width, height);
        for pixel in img.pixels_mut() {
            *pixel = Rgb(rgb);
        }
        DynamicImage::ImageRgb8(img)
    }

    #[test]
    fn output_shape_is_fixed_for_any_resolution() {
        for (w, h) in [(10, 10), (640, 480), (224, 224), (3, 1000)] {
            let tensor = preprocess(&solid_rgb(w, h, [10, 20, 30]));
            assert_eq!(tensor.shape(), &[1, 224, 224, 3]);
        }
    }

    #[test]
    fn values_are_scaled_to_unit_range() {
        let tensor = preprocess(&solid_rgb(64, 48, [255, 0, 128]));
        for &v in tensor.iter() {
            assert!((0.0..=1.0).contains(&v), "value out of range: {v}");
        }
        assert_relative_eq!(tensor[[0, 0, 0, 0]], 1.0);
        assert_relative_eq!(tensor[[0, 0, 0, 1]], 0.0);
        assert_relative_eq!(tensor[[0, 0, 0, 2]], 128.0 / 255.0);
    }

    #[test]
    fn alpha_is_dropped() {
        let img = DynamicImage::ImageRgba8(RgbaImage::from_pixel(
            32,
            32,
            image::Rgba([200, 100, 50, 7]),
        ));
        let tensor = preprocess(&img);
        assert_eq!(tensor.shape(), &[1, 224, 224, 3]);
        assert_relative_eq!(tensor[[0, 100, 100, 0]], 200.0 / 255.0);
    }

    #[test]
    fn grayscale_expands_to_three_channels() {
        let img = DynamicImage::ImageLuma8(GrayImage::from_pixel(16, 16, image::Luma([99])));
        let tensor = preprocess(&img);
        let v = 99.0 / 255.0;
        assert_relative_eq!(tensor[[0, 50, 50, 0]], v);
        assert_relative_eq!(tensor[[0, 50, 50, 1]], v);
        assert_relative_eq!(tensor[[0, 50, 50, 2]], v);
    }

    #[test]
    fn undecodable_bytes_fail_with_invalid_image() {
        let err = decode_image_bytes("garbage.jpg", b"not an image").unwrap_err();
        assert!(matches!(err, Error::InvalidImage { .. }));
    }

    #[test]
    fn missing_file_fails_with_invalid_image() {
        let err = decode_image(Path::new("/no/such/photo.png")).unwrap_err();
        assert!(matches!(err, Error::InvalidImage { .. }));
    }
}
