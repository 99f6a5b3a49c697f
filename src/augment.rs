//! Rotation/scale augmentation of single-point confidence labels.
//!
//! Source labels hold any number of `"<confidence> <x_norm> <y_norm>"` lines.
//! Each image is warped by a rotation-about-center affine matrix and every
//! point is pushed through the same matrix, then clamped back into `[0, 1]`.

use std::path::{Path, PathBuf};

use image::{Rgb, RgbImage};
use imageproc::geometric_transformations::{warp, Interpolation, Projection};
use tracing::{info, warn};

use crate::config::Transform;
use crate::coords::{CoordinateMapper, Normalization};
use crate::error::{Error, Result};
use crate::raster;
use crate::sidecar::{parse_triple, sidecar_path};

/// Row-major 2x3 affine matrix.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AffineTransform {
    pub m: [[f64; 3]; 2],
}

impl AffineTransform {
    pub fn from_rows(m: [[f64; 3]; 2]) -> Self {
        Self { m }
    }

    /// Rotation by `angle` degrees (counter-clockwise on screen) around
    /// `center`, followed by uniform `scale`.
    pub fn rotation_about(center: (f64, f64), angle: f64, scale: f64) -> Self {
        let theta = angle.to_radians();
        let alpha = scale * theta.cos();
        let beta = scale * theta.sin();
        let (cx, cy) = center;
        Self {
            m: [
                [alpha, beta, (1.0 - alpha) * cx - beta * cy],
                [-beta, alpha, beta * cx + (1.0 - alpha) * cy],
            ],
        }
    }

    pub fn apply(&self, x: f64, y: f64) -> (f64, f64) {
        let m = &self.m;
        (
            m[0][0] * x + m[0][1] * y + m[0][2],
            m[1][0] * x + m[1][1] * y + m[1][2],
        )
    }

    fn projection(&self) -> Option<Projection> {
        let m = &self.m;
        Projection::from_matrix([
            m[0][0] as f32,
            m[0][1] as f32,
            m[0][2] as f32,
            m[1][0] as f32,
            m[1][1] as f32,
            m[1][2] as f32,
            0.0,
            0.0,
            1.0,
        ])
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ConfidencePoint {
    pub confidence: f64,
    pub x: f64,
    pub y: f64,
}

pub fn parse_points(path: &Path, text: &str) -> Result<Vec<ConfidencePoint>> {
    text.lines()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty())
        .map(|(i, line)| {
            let [confidence, x, y] = parse_triple(path, i + 1, line)?;
            Ok(ConfidencePoint { confidence, x, y })
        })
        .collect()
}

pub fn format_points(points: &[ConfidencePoint]) -> String {
    points
        .iter()
        .map(|p| format!("{:.6} {:.6} {:.6}\n", p.confidence, p.x, p.y))
        .collect()
}

/// Move a normalized point through `transform`, clamping to the frame.
/// Points pushed out of the frame are kept on its border.
pub fn remap_point(
    point: ConfidencePoint,
    transform: &AffineTransform,
    mapper: &CoordinateMapper,
) -> ConfidencePoint {
    let (px, py) = mapper.to_pixel_f64(point.x, point.y);
    let (nx, ny) = transform.apply(px, py);
    let (x, y) = mapper.normalize_f64(nx, ny);
    ConfidencePoint {
        confidence: point.confidence,
        x: x.clamp(0.0, 1.0),
        y: y.clamp(0.0, 1.0),
    }
}

/// Warp `image` and its points by every transform, in order.
pub fn augment_image(
    image: &RgbImage,
    points: &[ConfidencePoint],
    transforms: &[Transform],
) -> Result<Vec<(RgbImage, Vec<ConfidencePoint>)>> {
    let (w, h) = image.dimensions();
    let mapper = CoordinateMapper::new(w, h, Normalization::EdgeExclusive);
    let center = (w as f64 / 2.0, h as f64 / 2.0);

    transforms
        .iter()
        .map(|t| {
            let affine = AffineTransform::rotation_about(center, t.angle, t.scale);
            let projection = affine.projection().ok_or(Error::DegenerateTransform {
                angle: t.angle,
                scale: t.scale,
            })?;
            let warped = warp(image, &projection, Interpolation::Bilinear, Rgb([0, 0, 0]));
            let remapped = points
                .iter()
                .map(|p| remap_point(*p, &affine, &mapper))
                .collect();
            Ok((warped, remapped))
        })
        .collect()
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct AugmentReport {
    pub sources: usize,
    pub skipped: usize,
    pub written: usize,
}

pub struct Augmenter {
    output_dir: PathBuf,
    transforms: Vec<Transform>,
}

impl Augmenter {
    pub fn new(output_dir: impl Into<PathBuf>, transforms: Vec<Transform>) -> Self {
        Self {
            output_dir: output_dir.into(),
            transforms,
        }
    }

    /// Augment every source image in order. Sources that cannot be decoded or
    /// have no readable label are skipped and counted. Failures writing the
    /// output abort the run.
    pub fn run(&self, sources: &[PathBuf]) -> Result<AugmentReport> {
        std::fs::create_dir_all(&self.output_dir).map_err(|e| Error::io(&self.output_dir, e))?;

        let mut report = AugmentReport {
            sources: sources.len(),
            ..AugmentReport::default()
        };
        for (k, source) in sources.iter().enumerate() {
            info!("[{}/{}] {}", k + 1, sources.len(), source.display());
            match self.augment_one(source) {
                Ok(written) => report.written += written,
                Err(e) if e.is_recoverable() => {
                    warn!("skipping {}: {e}", source.display());
                    report.skipped += 1;
                }
                Err(e) => return Err(e),
            }
        }
        info!(
            "augmented {} of {} images into {} pairs in {}",
            report.sources - report.skipped,
            report.sources,
            report.written,
            self.output_dir.display()
        );
        Ok(report)
    }

    fn augment_one(&self, source: &Path) -> Result<usize> {
        let label_path = sidecar_path(source);
        let text = std::fs::read_to_string(&label_path).map_err(|source| Error::MissingLabel {
            path: label_path.clone(),
            source,
        })?;
        let points = parse_points(&label_path, &text)?;
        let image = raster::decode(source)?;

        let stem = source
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("image");
        let ext = source
            .extension()
            .and_then(|s| s.to_str())
            .unwrap_or("jpg");

        let variants = augment_image(&image, &points, &self.transforms)?;
        for (i, (img, remapped)) in variants.iter().enumerate() {
            let image_out = self.output_dir.join(format!("{stem}_{i}.{ext}"));
            img.save(&image_out).map_err(|source| Error::Encode {
                path: image_out.clone(),
                source,
            })?;
            let label_out = image_out.with_extension("txt");
            if let Err(e) = std::fs::write(&label_out, format_points(remapped)) {
                // never leave an image without its label
                if let Err(rm) = std::fs::remove_file(&image_out) {
                    warn!("could not remove {}: {rm}", image_out.display());
                }
                return Err(Error::io(&label_out, e));
            }
        }
        Ok(variants.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DEFAULT_TRANSFORMS;

    const EPS: f64 = 1e-9;

    fn point(x: f64, y: f64) -> ConfidencePoint {
        ConfidencePoint {
            confidence: 0.9,
            x,
            y,
        }
    }

    #[test]
    fn matches_rotation_matrix_layout() {
        let m = AffineTransform::rotation_about((100.0, 50.0), 90.0, 1.0).m;
        assert!((m[0][0]).abs() < EPS);
        assert!((m[0][1] - 1.0).abs() < EPS);
        assert!((m[1][0] + 1.0).abs() < EPS);
        assert!((m[0][2] - 50.0).abs() < EPS);
        assert!((m[1][2] - 150.0).abs() < EPS);
    }

    #[test]
    fn center_is_invariant() {
        let mapper = CoordinateMapper::new(640, 480, Normalization::EdgeExclusive);
        for t in DEFAULT_TRANSFORMS {
            let affine = AffineTransform::rotation_about((320.0, 240.0), t.angle, t.scale);
            let out = remap_point(point(0.5, 0.5), &affine, &mapper);
            assert!((out.x - 0.5).abs() < EPS && (out.y - 0.5).abs() < EPS, "{t:?}");
            assert_eq!(out.confidence, 0.9);
        }
    }

    #[test]
    fn points_leaving_the_frame_are_clamped() {
        let mapper = CoordinateMapper::new(100, 100, Normalization::EdgeExclusive);
        let shift = AffineTransform::from_rows([[1.0, 0.0, -15.0], [0.0, 1.0, 25.0]]);
        let moved = shift.apply(5.0, 95.0);
        assert!((moved.0 + 10.0).abs() < EPS && (moved.1 - 120.0).abs() < EPS);

        let out = remap_point(point(0.05, 0.95), &shift, &mapper);
        assert_eq!((out.x, out.y), (0.0, 1.0));
        assert_eq!(format_points(&[out]), "0.900000 0.000000 1.000000\n");
    }

    #[test]
    fn one_variant_per_transform() {
        let image = RgbImage::from_pixel(64, 48, Rgb([200, 100, 50]));
        let variants = augment_image(&image, &[point(0.25, 0.75)], &DEFAULT_TRANSFORMS).unwrap();
        assert_eq!(variants.len(), DEFAULT_TRANSFORMS.len());
        for (img, points) in &variants {
            assert_eq!(img.dimensions(), (64, 48));
            assert_eq!(points.len(), 1);
            assert_eq!(*img.get_pixel(32, 24), Rgb([200, 100, 50]));
        }
        // 45 degrees at 0.75 leaves the corners uncovered
        assert_eq!(*variants[5].0.get_pixel(0, 0), Rgb([0, 0, 0]));
    }

    #[test]
    fn zero_scale_is_rejected() {
        let image = RgbImage::new(8, 8);
        let err = augment_image(&image, &[], &[Transform::new(10.0, 0.0)]).unwrap_err();
        assert!(matches!(err, Error::DegenerateTransform { .. }));
    }

    #[test]
    fn parse_skips_blank_lines_and_rejects_garbage() {
        let points = parse_points(Path::new("a.txt"), "1.0 0.5 0.25\n\n0.5 0.1 0.2\n").unwrap();
        assert_eq!(points.len(), 2);
        assert_eq!(points[0], ConfidencePoint { confidence: 1.0, x: 0.5, y: 0.25 });
        assert_eq!(points[1], ConfidencePoint { confidence: 0.5, x: 0.1, y: 0.2 });
        assert!(matches!(
            parse_points(Path::new("a.txt"), "1.0 0.5\n"),
            Err(Error::LabelFormat { line: 1, .. })
        ));
    }
}
