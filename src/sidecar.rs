//! Sidecar label files: one `.txt` per image, one line per limb.
//!
//! Each line is `"<presence> <x_norm> <y_norm>"`, presence written as `0.0` or
//! `1.0` and coordinates with 6 decimals.

use std::path::{Path, PathBuf};

use tracing::debug;

use crate::coords::{CoordinateMapper, NormalizedPoint, PixelPoint};
use crate::error::{Error, Result};
use crate::keypoint::{Keypoint, LabelRecord, Limb, LIMB_COUNT};

pub fn sidecar_path(image_path: &Path) -> PathBuf {
    image_path.with_extension("txt")
}

pub fn format_record(label: &LabelRecord, mapper: &CoordinateMapper) -> String {
    let mut out = String::with_capacity(LIMB_COUNT * 24);
    for (_, kp) in label.iter() {
        let presence = if kp.present { 1.0f32 } else { 0.0 };
        let n = mapper.to_normalized(PixelPoint { x: kp.x, y: kp.y });
        out.push_str(&format!("{presence:.1} {:.6} {:.6}\n", n.x, n.y));
    }
    out
}

/// Parse a 16-line record. `path` is only used for error reporting.
pub fn parse_record(path: &Path, text: &str, mapper: &CoordinateMapper) -> Result<LabelRecord> {
    let lines: Vec<(usize, &str)> = text
        .lines()
        .enumerate()
        .filter(|(_, l)| !l.trim().is_empty())
        .map(|(i, l)| (i + 1, l))
        .collect();
    if lines.len() != LIMB_COUNT {
        return Err(Error::label_format(
            path,
            lines.len(),
            format!("expected {LIMB_COUNT} lines, found {}", lines.len()),
        ));
    }

    let mut label = LabelRecord::new();
    for (limb, (line_no, line)) in Limb::ALL.iter().zip(lines) {
        let [presence, x, y] = parse_triple(path, line_no, line)?;
        let present = if presence == 0.0 {
            false
        } else if presence == 1.0 {
            true
        } else {
            return Err(Error::label_format(
                path,
                line_no,
                format!("presence must be 0 or 1, got {presence}"),
            ));
        };
        if present {
            if !(0.0..=1.0).contains(&x) || !(0.0..=1.0).contains(&y) {
                return Err(Error::label_format(
                    path,
                    line_no,
                    format!("coordinates ({x}, {y}) outside [0, 1]"),
                ));
            }
            let p = mapper.to_pixel(NormalizedPoint { x, y });
            label[*limb] = Keypoint::at(p.x, p.y);
        }
    }
    Ok(label)
}

/// Split a line into exactly three floats.
pub(crate) fn parse_triple(path: &Path, line_no: usize, line: &str) -> Result<[f64; 3]> {
    let tokens: Vec<&str> = line.split_whitespace().collect();
    if tokens.len() != 3 {
        return Err(Error::label_format(
            path,
            line_no,
            format!("expected 3 values, found {}", tokens.len()),
        ));
    }
    let mut values = [0.0; 3];
    for (slot, token) in values.iter_mut().zip(&tokens) {
        *slot = token.parse::<f64>().map_err(|_| {
            Error::label_format(path, line_no, format!("not a number: {token:?}"))
        })?;
        if !slot.is_finite() {
            return Err(Error::label_format(
                path,
                line_no,
                format!("not a finite number: {token:?}"),
            ));
        }
    }
    Ok(values)
}

/// Read a label file. A missing file means "nothing labeled yet".
pub fn load(label_path: &Path, mapper: &CoordinateMapper) -> Result<Option<LabelRecord>> {
    if !label_path.is_file() {
        return Ok(None);
    }
    let text = std::fs::read_to_string(label_path).map_err(|e| Error::io(label_path, e))?;
    parse_record(label_path, &text, mapper).map(Some)
}

pub fn save(label_path: &Path, label: &LabelRecord, mapper: &CoordinateMapper) -> Result<()> {
    std::fs::write(label_path, format_record(label, mapper)).map_err(|e| Error::io(label_path, e))?;
    debug!(
        "saved {} keypoints to {}",
        label.present_count(),
        label_path.display()
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coords::Normalization;

    fn mapper() -> CoordinateMapper {
        CoordinateMapper::new(416, 768, Normalization::EdgeInclusive)
    }

    #[test]
    fn sidecar_shares_the_stem() {
        assert_eq!(
            sidecar_path(Path::new("/data/pose_12.jpg")),
            PathBuf::from("/data/pose_12.txt")
        );
    }

    #[test]
    fn format_line_layout() {
        let mut label = LabelRecord::new();
        label.set(Limb::Head, 415, 0);
        let text = format_record(&label, &mapper());
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), LIMB_COUNT);
        assert_eq!(lines[0], "1.0 1.000000 0.000000");
        assert_eq!(lines[1], "0.0 0.000000 0.000000");
    }

    #[test]
    fn parse_reproduces_record() {
        let mut label = LabelRecord::new();
        label.set(Limb::Neck, 208, 130);
        label.set(Limb::LeftAnkle, 3, 761);
        label.set(Limb::Back, 415, 767);
        let text = format_record(&label, &mapper());
        let parsed = parse_record(Path::new("a.txt"), &text, &mapper()).unwrap();
        assert_eq!(parsed, label);
    }

    #[test]
    fn absent_lines_ignore_coordinates() {
        let mut text = String::from("0.0 0.500000 0.500000\n");
        text.push_str(&"0.0 0.000000 0.000000\n".repeat(LIMB_COUNT - 1));
        let parsed = parse_record(Path::new("a.txt"), &text, &mapper()).unwrap();
        assert_eq!(parsed[Limb::Head], Keypoint::ABSENT);
    }

    #[test]
    fn malformed_inputs_are_rejected() {
        let good = "0.0 0.000000 0.000000\n";
        let cases = [
            good.repeat(LIMB_COUNT - 1),
            format!("1.0 0.5\n{}", good.repeat(LIMB_COUNT - 1)),
            format!("1.0 abc 0.5\n{}", good.repeat(LIMB_COUNT - 1)),
            format!("2.0 0.5 0.5\n{}", good.repeat(LIMB_COUNT - 1)),
        ];
        for text in cases {
            let err = parse_record(Path::new("a.txt"), &text, &mapper()).unwrap_err();
            assert!(matches!(err, Error::LabelFormat { .. }), "{err}");
        }
    }

    #[test]
    fn out_of_range_coordinates_are_rejected() {
        let mut text = String::from("1.0 2.000000 -0.500000\n");
        text.push_str(&"0.0 0.000000 0.000000\n".repeat(LIMB_COUNT - 1));
        let err = parse_record(Path::new("a.txt"), &text, &mapper()).unwrap_err();
        assert!(matches!(err, Error::LabelFormat { line: 1, .. }), "{err}");
    }

    #[test]
    fn errors_report_file_line_numbers() {
        let good = "0.0 0.000000 0.000000\n";
        let text = format!("\n\n\n{good}1.0 abc 0.5\n{}", good.repeat(LIMB_COUNT - 2));
        let err = parse_record(Path::new("a.txt"), &text, &mapper()).unwrap_err();
        assert!(matches!(err, Error::LabelFormat { line: 5, .. }), "{err}");
    }

    #[test]
    fn missing_file_is_not_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let loaded = load(&dir.path().join("nothing.txt"), &mapper()).unwrap();
        assert!(loaded.is_none());
    }
}
