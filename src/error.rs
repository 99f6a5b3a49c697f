//! Error types shared by the annotator and the augmenter.

use std::path::PathBuf;

use thiserror::Error;

use crate::session::SessionState;

pub type Result<T> = std::result::Result<T, Error>;

/// Navigation tried to move past either end of the image set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum BoundaryError {
    #[error("Current image is first image")]
    First,
    #[error("Current image is last image")]
    Last,
}

#[derive(Debug, Error)]
pub enum Error {
    /// Image bytes could not be read or decoded. Recoverable: the entry is skipped.
    #[error("failed to decode image {}: {source}", path.display())]
    Decode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    /// A label file exists but does not follow the expected line format.
    /// Recoverable: callers fall back to an empty record.
    #[error("malformed label file {} (line {line}): {reason}", path.display())]
    LabelFormat {
        path: PathBuf,
        line: usize,
        reason: String,
    },

    /// An augmentation source has no readable label file. Recoverable: the source is skipped.
    #[error("cannot read label {}: {source}", path.display())]
    MissingLabel {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Boundary(#[from] BoundaryError),

    /// No images found at startup. Fatal for the session.
    #[error("no *.jpg images found in {}", .0.display())]
    EmptyImageSet(PathBuf),

    #[error("command rejected: session is {0:?}")]
    InvalidState(SessionState),

    #[error("transform (angle {angle}, scale {scale}) is not invertible")]
    DegenerateTransform { angle: f64, scale: f64 },

    #[error("failed to write image {}: {source}", path.display())]
    Encode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("invalid config {}: {reason}", path.display())]
    Config { path: PathBuf, reason: String },

    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl Error {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn label_format(
        path: impl Into<PathBuf>,
        line: usize,
        reason: impl Into<String>,
    ) -> Self {
        Self::LabelFormat {
            path: path.into(),
            line,
            reason: reason.into(),
        }
    }

    /// Whether the session can carry on after reporting this error.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            Self::Decode { .. }
                | Self::LabelFormat { .. }
                | Self::MissingLabel { .. }
                | Self::Boundary(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn boundary_notices() {
        assert_eq!(BoundaryError::First.to_string(), "Current image is first image");
        assert_eq!(BoundaryError::Last.to_string(), "Current image is last image");
        let err: Error = BoundaryError::Last.into();
        assert_eq!(err.to_string(), "Current image is last image");
        assert!(err.is_recoverable());
    }

    #[test]
    fn empty_set_is_fatal() {
        let err = Error::EmptyImageSet(PathBuf::from("/data/poses"));
        assert!(!err.is_recoverable());
        assert_eq!(err.to_string(), "no *.jpg images found in /data/poses");
    }
}
