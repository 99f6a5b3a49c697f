//! Pose keypoint annotation on a directory of images, and rotation/scale
//! augmentation of single-point confidence labels.
//!
//! The annotator binary (`label-pose`) drives a [`session::Session`] from an
//! egui window; the `augment` binary runs [`augment::Augmenter`] over a folder.

pub mod app;
pub mod augment;
pub mod config;
pub mod coords;
pub mod error;
pub mod guide;
pub mod keypoint;
pub mod logging;
pub mod navigator;
pub mod raster;
pub mod render;
pub mod session;
pub mod sidecar;
pub mod skeleton;

pub use config::{Config, Transform, DEFAULT_TRANSFORMS};
pub use error::{BoundaryError, Error, Result};
pub use keypoint::{Keypoint, LabelRecord, Limb, LIMB_COUNT};
pub use navigator::ImageSet;
pub use session::{Command, Outcome, Session, SessionState};
