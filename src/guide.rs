//! Read-only reference pose shown next to the working image.

use std::path::Path;

use image::RgbImage;
use tracing::{info, warn};

use crate::coords::CoordinateMapper;
use crate::error::Result;
use crate::keypoint::{Keypoint, LabelRecord, Limb};
use crate::raster;
use crate::sidecar;

pub struct Guide {
    pub image: RgbImage,
    pub label: LabelRecord,
}

impl Guide {
    /// Load the guide image and its label, both fitted to `mapper`'s canvas.
    ///
    /// An undecodable image is an error. A missing or malformed label only
    /// leaves the guide record empty.
    pub fn load(image_path: &Path, label_path: &Path, mapper: &CoordinateMapper) -> Result<Self> {
        let image = raster::load_frame(image_path, mapper.width, mapper.height)?;
        let label = match sidecar::load(label_path, mapper) {
            Ok(Some(label)) => label,
            Ok(None) => {
                warn!("guide label {} not found", label_path.display());
                LabelRecord::new()
            }
            Err(e) => {
                warn!("ignoring guide label: {e}");
                LabelRecord::new()
            }
        };
        Ok(Self { image, label })
    }

    /// Like [`Guide::load`], but a missing guide image just disables the guide.
    pub fn load_optional(
        image_path: &Path,
        label_path: &Path,
        mapper: &CoordinateMapper,
    ) -> Option<Self> {
        if !image_path.is_file() {
            info!("no guide image at {}, guide disabled", image_path.display());
            return None;
        }
        match Self::load(image_path, label_path, mapper) {
            Ok(guide) => Some(guide),
            Err(e) => {
                warn!("guide disabled: {e}");
                None
            }
        }
    }

    pub fn hint(&self, limb: Limb) -> Keypoint {
        self.label[limb]
    }
}
