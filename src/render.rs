//! Drawing keypoints, skeleton and guide hint onto RGB rasters.

use image::{Rgb, RgbImage};
use imageproc::drawing::{draw_filled_circle_mut, draw_hollow_circle_mut, draw_line_segment_mut};

use crate::keypoint::{Keypoint, LabelRecord, Limb};
use crate::raster::concat_horizontal;
use crate::skeleton;

pub const RING_COLOR: Rgb<u8> = Rgb([128, 255, 128]);
pub const DOT_COLOR: Rgb<u8> = Rgb([192, 32, 32]);
pub const BONE_COLOR: Rgb<u8> = Rgb([255, 200, 64]);
pub const CURSOR_COLOR: Rgb<u8> = Rgb([64, 160, 255]);

const RING_RADIUS: i32 = 8;
const DOT_RADIUS: i32 = 3;

/// What to draw on top of a frame.
#[derive(Clone, Copy)]
pub struct Overlay<'a> {
    pub label: &'a LabelRecord,
    pub cursor: Limb,
    pub show_skeleton: bool,
}

pub fn draw_keypoint(img: &mut RgbImage, x: i32, y: i32, ring: Rgb<u8>) {
    // two-pixel ring
    draw_hollow_circle_mut(img, (x, y), RING_RADIUS, ring);
    draw_hollow_circle_mut(img, (x, y), RING_RADIUS - 1, ring);
    draw_filled_circle_mut(img, (x, y), DOT_RADIUS, DOT_COLOR);
}

pub fn draw_skeleton(img: &mut RgbImage, label: &LabelRecord) {
    for seg in skeleton::segments(label) {
        draw_line_segment_mut(
            img,
            (seg.start.0 as f32, seg.start.1 as f32),
            (seg.end.0 as f32, seg.end.1 as f32),
            BONE_COLOR,
        );
    }
}

pub fn draw_label(img: &mut RgbImage, overlay: Overlay<'_>) {
    if overlay.show_skeleton {
        draw_skeleton(img, overlay.label);
    }
    for (limb, kp) in overlay.label.iter() {
        if let Some((x, y)) = kp.position() {
            let ring = if limb == overlay.cursor {
                CURSOR_COLOR
            } else {
                RING_COLOR
            };
            draw_keypoint(img, x, y, ring);
        }
    }
}

/// Guide panel showing where the selected limb sits on the reference pose.
pub fn draw_guide(guide: &RgbImage, hint: Keypoint) -> RgbImage {
    let mut panel = guide.clone();
    if let Some((x, y)) = hint.position() {
        draw_keypoint(&mut panel, x, y, CURSOR_COLOR);
    }
    panel
}

/// Frame with its overlay, followed by the guide panel when there is one.
pub fn compose(frame: &RgbImage, overlay: Overlay<'_>, guide: Option<(&RgbImage, Keypoint)>) -> RgbImage {
    let mut canvas = frame.clone();
    draw_label(&mut canvas, overlay);
    match guide {
        Some((guide_image, hint)) => concat_horizontal(&canvas, &draw_guide(guide_image, hint)),
        None => canvas,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const BG: Rgb<u8> = Rgb([0, 0, 0]);

    #[test]
    fn keypoint_is_drawn_with_dot_and_ring() {
        let mut label = LabelRecord::new();
        label.set(Limb::Neck, 30, 30);
        let frame = RgbImage::from_pixel(64, 64, BG);
        let out = compose(
            &frame,
            Overlay {
                label: &label,
                cursor: Limb::Head,
                show_skeleton: false,
            },
            None,
        );
        assert_eq!(*out.get_pixel(30, 30), DOT_COLOR);
        assert_eq!(*out.get_pixel(30 + RING_RADIUS as u32, 30), RING_COLOR);
        assert_eq!(*out.get_pixel(2, 2), BG);
    }

    #[test]
    fn skeleton_only_when_enabled() {
        let mut label = LabelRecord::new();
        label.set(Limb::Head, 10, 10);
        label.set(Limb::Neck, 50, 10);
        let frame = RgbImage::from_pixel(64, 64, BG);
        let mut overlay = Overlay {
            label: &label,
            cursor: Limb::Chest,
            show_skeleton: false,
        };
        assert_eq!(*compose(&frame, overlay, None).get_pixel(30, 10), BG);
        overlay.show_skeleton = true;
        assert_eq!(*compose(&frame, overlay, None).get_pixel(30, 10), BONE_COLOR);
    }

    #[test]
    fn guide_is_placed_to_the_right() {
        let label = LabelRecord::new();
        let frame = RgbImage::from_pixel(40, 50, BG);
        let guide = RgbImage::from_pixel(40, 50, Rgb([200, 200, 200]));
        let out = compose(
            &frame,
            Overlay {
                label: &label,
                cursor: Limb::Head,
                show_skeleton: false,
            },
            Some((&guide, Keypoint::at(20, 20))),
        );
        assert_eq!(out.dimensions(), (80, 50));
        assert_eq!(*out.get_pixel(60, 20), DOT_COLOR);
        assert_eq!(*out.get_pixel(45, 45), Rgb([200, 200, 200]));
    }
}
