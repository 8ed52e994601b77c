//! Still downsizing

use anyhow::{Context, Result};
use image::{imageops::FilterType, DynamicImage, ImageFormat, ImageReader};
use std::path::Path;

/// Bounding box stills are shrunk to fit
pub const MAX_WIDTH: u32 = 1080;
pub const MAX_HEIGHT: u32 = 400;

/// Fit `image` inside the bounding box keeping its aspect ratio. Never upscales.
pub fn fit_within(image: DynamicImage) -> DynamicImage {
    if image.width() <= MAX_WIDTH && image.height() <= MAX_HEIGHT {
        return image;
    }
    image.resize(MAX_WIDTH, MAX_HEIGHT, FilterType::Lanczos3)
}

/// Read `src`, shrink it and write it to `dest` in the format its extension names.
///
/// Returns the stored dimensions.
pub fn resize_still(src: &Path, dest: &Path) -> Result<(u32, u32)> {
    let image = ImageReader::open(src)
        .with_context(|| format!("Failed to open {}", src.display()))?
        .with_guessed_format()?
        .decode()
        .with_context(|| format!("Failed to decode {}", src.display()))?;

    let mut resized = fit_within(image);

    // JPEG has no alpha channel
    if matches!(ImageFormat::from_path(dest), Ok(ImageFormat::Jpeg)) {
        resized = DynamicImage::ImageRgb8(resized.to_rgb8());
    }

    if let Some(parent) = dest.parent() {
        std::fs::create_dir_all(parent)?;
    }
    resized
        .save(dest)
        .with_context(|| format!("Failed to write {}", dest.display()))?;

    Ok((resized.width(), resized.height()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::RgbImage;

    #[test]
    fn test_wide_still_is_shrunk_to_width() {
        let image = DynamicImage::ImageRgb8(RgbImage::new(2160, 400));
        let resized = fit_within(image);
        assert_eq!((resized.width(), resized.height()), (1080, 200));
    }

    #[test]
    fn test_tall_still_is_shrunk_to_height() {
        let image = DynamicImage::ImageRgb8(RgbImage::new(800, 800));
        let resized = fit_within(image);
        assert_eq!((resized.width(), resized.height()), (400, 400));
    }

    #[test]
    fn test_small_still_is_not_upscaled() {
        let image = DynamicImage::ImageRgb8(RgbImage::new(320, 180));
        let resized = fit_within(image);
        assert_eq!((resized.width(), resized.height()), (320, 180));
    }

    #[test]
    fn test_resize_still_writes_png() {
        let dir = tempfile::tempdir().unwrap();
        let src = dir.path().join("wide.png");
        DynamicImage::ImageRgb8(RgbImage::new(1600, 320)).save(&src).unwrap();

        let dest = dir.path().join("out/wide.png");
        let dims = resize_still(&src, &dest).unwrap();

        assert_eq!(dims, (1080, 216));
        assert!(dest.exists());
    }
}
