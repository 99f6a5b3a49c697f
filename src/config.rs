use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// One augmentation variant: rotation in degrees (counter-clockwise) and scale.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Transform {
    pub angle: f64,
    pub scale: f64,
}

impl Transform {
    pub const fn new(angle: f64, scale: f64) -> Self {
        Self { angle, scale }
    }
}

pub const DEFAULT_TRANSFORMS: [Transform; 6] = [
    Transform::new(-45.0, 0.75),
    Transform::new(-30.0, 0.85),
    Transform::new(-15.0, 0.95),
    Transform::new(15.0, 0.95),
    Transform::new(30.0, 0.85),
    Transform::new(45.0, 0.75),
];

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AugmentConfig {
    pub output_dir: PathBuf,
    pub transforms: Vec<Transform>,
}

impl Default for AugmentConfig {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("generated"),
            transforms: DEFAULT_TRANSFORMS.to_vec(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub canvas_width: u32,
    pub canvas_height: u32,
    pub guide_image: PathBuf,
    pub guide_label: PathBuf,
    pub show_skeleton: bool,
    pub augment: AugmentConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            canvas_width: 416,
            canvas_height: 768,
            guide_image: PathBuf::from("guide.jpg"),
            guide_label: PathBuf::from("guide.txt"),
            show_skeleton: false,
            augment: AugmentConfig::default(),
        }
    }
}

impl Config {
    pub fn load(path: &Path) -> Result<Self> {
        let data = std::fs::read_to_string(path).map_err(|e| Error::io(path, e))?;
        let config: Config = serde_json::from_str(&data).map_err(|e| Error::Config {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;
        config.validate(path)?;
        Ok(config)
    }

    pub fn load_or_default(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::load(path),
            None => Ok(Self::default()),
        }
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        let data = serde_json::to_string_pretty(self).map_err(|e| Error::Config {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;
        std::fs::write(path, data).map_err(|e| Error::io(path, e))
    }

    fn validate(&self, path: &Path) -> Result<()> {
        let invalid = |reason: String| Error::Config {
            path: path.to_path_buf(),
            reason,
        };
        if self.canvas_width < 2 || self.canvas_height < 2 {
            return Err(invalid(format!(
                "canvas must be at least 2x2, got {}x{}",
                self.canvas_width, self.canvas_height
            )));
        }
        if let Some(t) = self.augment.transforms.iter().find(|t| t.scale <= 0.0) {
            return Err(invalid(format!("transform scale must be positive, got {}", t.scale)));
        }
        Ok(())
    }
}
