use image::{GrayImage, Luma};
use imageproc::distance_transform::Norm;
use imageproc::filter::gaussian_blur_f32;
use imageproc::morphology::{close, open};

use crate::config::PipelineConfig;

/// Sigma of the Gaussian window matching a `block_size`-tap kernel
/// (the same rule OpenCV uses when sigma is left unspecified).
pub fn block_sigma(block_size: u32) -> f32 {
    0.3 * ((block_size as f32 - 1.0) * 0.5 - 1.0) + 0.8
}

/// Gaussian-weighted local mean of every pixel
pub fn local_mean(img: &GrayImage, block_size: u32) -> GrayImage {
    gaussian_blur_f32(img, block_sigma(block_size))
}

/// Inverted adaptive threshold: a pixel becomes foreground (255) when it is
/// not brighter than its local mean minus `constant`.
pub fn adaptive_threshold_inv(img: &GrayImage, block_size: u32, constant: f64) -> GrayImage {
    let mean = local_mean(img, block_size);
    let (width, height) = img.dimensions();
    GrayImage::from_fn(width, height, |x, y| {
        let value = img.get_pixel(x, y)[0] as f64;
        let threshold = mean.get_pixel(x, y)[0] as f64 - constant;
        if value > threshold { Luma([0]) } else { Luma([255]) }
    })
}

/// Opening with the small kernel, then closing with the large one.
/// Kernel sizes are odd square side lengths.
pub fn clean_mask(mask: &GrayImage, open_size: u32, close_size: u32) -> GrayImage {
    let opened = open(mask, Norm::LInf, (open_size / 2) as u8);
    close(&opened, Norm::LInf, (close_size / 2) as u8)
}

/// Full binarization stage for a validated config.
pub fn binarize(img: &GrayImage, config: &PipelineConfig) -> GrayImage {
    let mask = adaptive_threshold_inv(img, config.adaptive_block_size, config.adaptive_constant);
    if config.enable_morphology {
        clean_mask(&mask, config.open_kernel_size, config.close_kernel_size)
    } else {
        mask
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dark_square(size: u32, from: u32, to: u32) -> GrayImage {
        GrayImage::from_fn(size, size, |x, y| {
            if (from..=to).contains(&x) && (from..=to).contains(&y) {
                Luma([20])
            } else {
                Luma([220])
            }
        })
    }

    #[test]
    fn sigma_grows_with_block_size() {
        assert!((block_sigma(3) - 0.8).abs() < 1e-6);
        assert!((block_sigma(11) - 2.0).abs() < 1e-6);
        assert!(block_sigma(31) > block_sigma(11));
    }

    #[test]
    fn uniform_image_has_no_foreground() {
        let img = GrayImage::from_pixel(40, 30, Luma([128]));
        let mask = adaptive_threshold_inv(&img, 11, 7.0);
        assert!(mask.pixels().all(|p| p[0] == 0));
    }

    #[test]
    fn dark_square_boundary_is_foreground() {
        let img = dark_square(100, 30, 70);
        let mask = adaptive_threshold_inv(&img, 11, 7.0);

        assert_eq!(mask.get_pixel(30, 30)[0], 255);
        assert_eq!(mask.get_pixel(50, 30)[0], 255);
        assert_eq!(mask.get_pixel(31, 50)[0], 255);
        // light side of the edge
        assert_eq!(mask.get_pixel(29, 50)[0], 0);
        assert_eq!(mask.get_pixel(50, 29)[0], 0);
        // deep inside, the local mean matches the pixel
        assert_eq!(mask.get_pixel(50, 50)[0], 0);
    }

    #[test]
    fn opening_removes_speckle() {
        let mut mask = GrayImage::new(20, 20);
        mask.put_pixel(10, 10, Luma([255]));
        let cleaned = clean_mask(&mask, 3, 5);
        assert!(cleaned.pixels().all(|p| p[0] == 0));
    }

    #[test]
    fn closing_fills_small_gap() {
        let mut mask = GrayImage::new(30, 30);
        for y in 5..25 {
            for x in 5..25 {
                if x != 15 {
                    mask.put_pixel(x, y, Luma([255]));
                }
            }
        }
        let cleaned = clean_mask(&mask, 3, 5);
        assert_eq!(cleaned.get_pixel(15, 15)[0], 255);
        assert_eq!(cleaned.get_pixel(2, 2)[0], 0);
    }

    #[test]
    fn morphology_toggle() {
        let img = dark_square(60, 20, 40);
        let raw = binarize(
            &img,
            &PipelineConfig {
                enable_morphology: false,
                ..Default::default()
            },
        );
        assert_eq!(raw, adaptive_threshold_inv(&img, 11, 7.0));
    }
}
