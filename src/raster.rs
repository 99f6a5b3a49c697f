//! Decoding and resizing of working images.

use std::path::Path;

use image::imageops::{self, FilterType};
use image::{Rgb, RgbImage};

use crate::error::{Error, Result};

/// Interpolation used when fitting an image to the canvas.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ResizeFilter {
    /// Area averaging, used when any axis shrinks.
    Area,
    /// Bilinear, used when no axis shrinks.
    Linear,
}

impl ResizeFilter {
    pub fn choose(source: (u32, u32), target: (u32, u32)) -> Self {
        if source.0 > target.0 || source.1 > target.1 {
            ResizeFilter::Area
        } else {
            ResizeFilter::Linear
        }
    }
}

pub fn decode(path: &Path) -> Result<RgbImage> {
    let img = image::open(path).map_err(|source| Error::Decode {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(img.to_rgb8())
}

pub fn fit_to_canvas(image: &RgbImage, width: u32, height: u32) -> RgbImage {
    if image.dimensions() == (width, height) {
        return image.clone();
    }
    match ResizeFilter::choose(image.dimensions(), (width, height)) {
        ResizeFilter::Area => imageops::thumbnail(image, width, height),
        ResizeFilter::Linear => imageops::resize(image, width, height, FilterType::Triangle),
    }
}

/// Decode `path` and fit it to a `width` x `height` canvas.
pub fn load_frame(path: &Path, width: u32, height: u32) -> Result<RgbImage> {
    Ok(fit_to_canvas(&decode(path)?, width, height))
}

/// Place `right` next to `left`; the shorter one is padded with black.
pub fn concat_horizontal(left: &RgbImage, right: &RgbImage) -> RgbImage {
    let height = left.height().max(right.height());
    let mut out = RgbImage::from_pixel(left.width() + right.width(), height, Rgb([0, 0, 0]));
    imageops::replace(&mut out, left, 0, 0);
    imageops::replace(&mut out, right, left.width() as i64, 0);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn filter_choice() {
        assert_eq!(ResizeFilter::choose((800, 600), (416, 768)), ResizeFilter::Area);
        assert_eq!(ResizeFilter::choose((400, 900), (416, 768)), ResizeFilter::Area);
        assert_eq!(ResizeFilter::choose((200, 300), (416, 768)), ResizeFilter::Linear);
        assert_eq!(ResizeFilter::choose((416, 768), (416, 768)), ResizeFilter::Linear);
    }

    #[test]
    fn fit_produces_canvas_size() {
        let big = RgbImage::from_pixel(900, 1000, Rgb([10, 20, 30]));
        assert_eq!(fit_to_canvas(&big, 416, 768).dimensions(), (416, 768));
        let small = RgbImage::from_pixel(40, 60, Rgb([10, 20, 30]));
        let fitted = fit_to_canvas(&small, 416, 768);
        assert_eq!(fitted.dimensions(), (416, 768));
        assert_eq!(*fitted.get_pixel(200, 400), Rgb([10, 20, 30]));
    }

    #[test]
    fn concat_pads_shorter_side() {
        let left = RgbImage::from_pixel(4, 6, Rgb([255, 0, 0]));
        let right = RgbImage::from_pixel(3, 2, Rgb([0, 255, 0]));
        let out = concat_horizontal(&left, &right);
        assert_eq!(out.dimensions(), (7, 6));
        assert_eq!(*out.get_pixel(0, 5), Rgb([255, 0, 0]));
        assert_eq!(*out.get_pixel(4, 1), Rgb([0, 255, 0]));
        assert_eq!(*out.get_pixel(4, 5), Rgb([0, 0, 0]));
    }

    #[test]
    fn undecodable_file_reports_decode_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.jpg");
        std::fs::write(&path, b"not a jpeg").unwrap();
        assert!(matches!(decode(&path), Err(Error::Decode { .. })));
    }
}
