use std::ops::{Index, IndexMut};

/// Number of keypoint slots in every label record.
pub const LIMB_COUNT: usize = 16;

// ── Limb schema ─────────────────────────────────────────────────────────────

/// Anatomical keypoint slots, in sidecar line order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Limb {
    Head,
    Neck,
    RightShoulder,
    RightElbow,
    RightWrist,
    LeftShoulder,
    LeftElbow,
    LeftWrist,
    RightHip,
    RightKnee,
    RightAnkle,
    LeftHip,
    LeftKnee,
    LeftAnkle,
    Chest,
    Back,
}

impl Limb {
    pub const ALL: [Limb; LIMB_COUNT] = [
        Limb::Head,
        Limb::Neck,
        Limb::RightShoulder,
        Limb::RightElbow,
        Limb::RightWrist,
        Limb::LeftShoulder,
        Limb::LeftElbow,
        Limb::LeftWrist,
        Limb::RightHip,
        Limb::RightKnee,
        Limb::RightAnkle,
        Limb::LeftHip,
        Limb::LeftKnee,
        Limb::LeftAnkle,
        Limb::Chest,
        Limb::Back,
    ];

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn from_index(index: usize) -> Option<Limb> {
        Self::ALL.get(index).copied()
    }

    pub fn name(self) -> &'static str {
        match self {
            Limb::Head => "Head",
            Limb::Neck => "Neck",
            Limb::RightShoulder => "Right Shoulder",
            Limb::RightElbow => "Right Elbow",
            Limb::RightWrist => "Right Wrist",
            Limb::LeftShoulder => "Left Shoulder",
            Limb::LeftElbow => "Left Elbow",
            Limb::LeftWrist => "Left Wrist",
            Limb::RightHip => "Right Hip",
            Limb::RightKnee => "Right Knee",
            Limb::RightAnkle => "Right Ankle",
            Limb::LeftHip => "Left Hip",
            Limb::LeftKnee => "Left Knee",
            Limb::LeftAnkle => "Left Ankle",
            Limb::Chest => "Chest",
            Limb::Back => "Back",
        }
    }

    /// Next slot, wrapping Back -> Head.
    pub fn next(self) -> Limb {
        Self::ALL[(self.index() + 1) % LIMB_COUNT]
    }

    /// Previous slot, wrapping Head -> Back.
    pub fn prev(self) -> Limb {
        Self::ALL[(self.index() + LIMB_COUNT - 1) % LIMB_COUNT]
    }
}

// ── Keypoint / LabelRecord ──────────────────────────────────────────────────

/// One labeled landmark in canvas pixel space.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Keypoint {
    pub present: bool,
    pub x: i32,
    pub y: i32,
}

impl Keypoint {
    pub const ABSENT: Keypoint = Keypoint {
        present: false,
        x: 0,
        y: 0,
    };

    pub fn at(x: i32, y: i32) -> Self {
        Self {
            present: true,
            x,
            y,
        }
    }

    pub fn position(&self) -> Option<(i32, i32)> {
        self.present.then_some((self.x, self.y))
    }
}

/// Fixed set of 16 keypoints for one image.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct LabelRecord {
    points: [Keypoint; LIMB_COUNT],
}

impl LabelRecord {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, limb: Limb, x: i32, y: i32) {
        self.points[limb.index()] = Keypoint::at(x, y);
    }

    pub fn clear(&mut self, limb: Limb) {
        self.points[limb.index()] = Keypoint::ABSENT;
    }

    pub fn iter(&self) -> impl Iterator<Item = (Limb, &Keypoint)> {
        Limb::ALL.iter().copied().zip(self.points.iter())
    }

    pub fn present_count(&self) -> usize {
        self.points.iter().filter(|kp| kp.present).count()
    }

    pub fn is_empty(&self) -> bool {
        self.present_count() == 0
    }
}

impl Index<Limb> for LabelRecord {
    type Output = Keypoint;

    fn index(&self, limb: Limb) -> &Keypoint {
        &self.points[limb.index()]
    }
}

impl IndexMut<Limb> for LabelRecord {
    fn index_mut(&mut self, limb: Limb) -> &mut Keypoint {
        &mut self.points[limb.index()]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn limb_order_matches_file_order() {
        for (i, limb) in Limb::ALL.iter().enumerate() {
            assert_eq!(limb.index(), i);
            assert_eq!(Limb::from_index(i), Some(*limb));
        }
        assert_eq!(Limb::from_index(LIMB_COUNT), None);
    }

    #[test]
    fn cursor_wraps_both_ways() {
        assert_eq!(Limb::Back.next(), Limb::Head);
        assert_eq!(Limb::Head.prev(), Limb::Back);
        assert_eq!(Limb::Head.next(), Limb::Neck);

        let mut limb = Limb::Head;
        for _ in 0..LIMB_COUNT {
            limb = limb.next();
        }
        assert_eq!(limb, Limb::Head);
    }

    #[test]
    fn set_and_clear() {
        let mut label = LabelRecord::new();
        assert!(label.is_empty());

        label.set(Limb::LeftKnee, 120, 400);
        assert_eq!(label[Limb::LeftKnee], Keypoint::at(120, 400));
        assert_eq!(label.present_count(), 1);

        label.clear(Limb::LeftKnee);
        assert_eq!(label[Limb::LeftKnee], Keypoint::ABSENT);
        assert_eq!(label[Limb::LeftKnee].position(), None);
        assert_eq!(label.iter().count(), LIMB_COUNT);
    }
}
