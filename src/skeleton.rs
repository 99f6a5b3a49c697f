use crate::keypoint::{LabelRecord, Limb};

/// Anatomical connections drawn by the skeleton overlay.
pub const SKELETON: [(Limb, Limb); 17] = [
    (Limb::Head, Limb::Neck),
    // right arm
    (Limb::Neck, Limb::RightShoulder),
    (Limb::RightShoulder, Limb::RightElbow),
    (Limb::RightElbow, Limb::RightWrist),
    // left arm
    (Limb::Neck, Limb::LeftShoulder),
    (Limb::LeftShoulder, Limb::LeftElbow),
    (Limb::LeftElbow, Limb::LeftWrist),
    // legs
    (Limb::RightHip, Limb::RightKnee),
    (Limb::RightKnee, Limb::RightAnkle),
    (Limb::LeftHip, Limb::LeftKnee),
    (Limb::LeftKnee, Limb::LeftAnkle),
    // torso, front
    (Limb::Neck, Limb::Chest),
    (Limb::Chest, Limb::RightHip),
    (Limb::Chest, Limb::LeftHip),
    // torso, back
    (Limb::Neck, Limb::Back),
    (Limb::Back, Limb::RightHip),
    (Limb::Back, Limb::LeftHip),
];

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Segment {
    pub from: Limb,
    pub to: Limb,
    pub start: (i32, i32),
    pub end: (i32, i32),
}

/// Segments whose two endpoints are both present.
pub fn segments(label: &LabelRecord) -> Vec<Segment> {
    SKELETON
        .iter()
        .filter_map(|&(from, to)| {
            let start = label[from].position()?;
            let end = label[to].position()?;
            Some(Segment {
                from,
                to,
                start,
                end,
            })
        })
        .collect()
}
