//! Per-image labeling state machine.
//!
//! Input events are translated into [`Command`]s by the presentation layer and
//! applied one at a time with [`Session::apply`]. Every command that mutates
//! the label record writes the sidecar file before returning, so nothing is
//! pending when the next event arrives.

use std::path::{Path, PathBuf};

use image::RgbImage;
use tracing::{error, info, warn};

use crate::config::Config;
use crate::coords::{CoordinateMapper, Normalization};
use crate::error::{Error, Result};
use crate::guide::Guide;
use crate::keypoint::{LabelRecord, Limb};
use crate::navigator::ImageSet;
use crate::raster;
use crate::render::{self, Overlay};
use crate::sidecar;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SessionState {
    Idle,
    ImageLoaded,
    Exited,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Command {
    /// Primary click: mark the selected limb at a canvas position.
    Place { x: i32, y: i32 },
    /// Secondary click: remove the selected limb.
    Clear,
    NextLimb,
    PrevLimb,
    NextImage,
    PrevImage,
    ToggleSkeleton,
    Exit,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Outcome {
    /// Same frame, overlay changed.
    Redraw,
    /// A different image is now loaded.
    FrameChanged,
    /// Nothing changed; tell the user why.
    Notice(String),
    Exited,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Direction {
    Forward,
    Backward,
}

pub struct Session {
    images: ImageSet,
    mapper: CoordinateMapper,
    state: SessionState,
    cursor: Limb,
    label: LabelRecord,
    frame: Option<RgbImage>,
    guide: Option<Guide>,
    show_skeleton: bool,
    revision: u64,
}

impl Session {
    /// Build an idle session. The guide is loaded here, once.
    pub fn new(images: ImageSet, config: &Config) -> Self {
        let mapper = CoordinateMapper::new(
            config.canvas_width,
            config.canvas_height,
            Normalization::EdgeInclusive,
        );
        let guide = Guide::load_optional(&config.guide_image, &config.guide_label, &mapper);
        Self {
            images,
            mapper,
            state: SessionState::Idle,
            cursor: Limb::Head,
            label: LabelRecord::new(),
            frame: None,
            guide,
            show_skeleton: config.show_skeleton,
            revision: 0,
        }
    }

    /// Load the first decodable image, moving forward past broken ones.
    pub fn start(&mut self) -> Result<()> {
        if self.state != SessionState::Idle {
            return Err(Error::InvalidState(self.state));
        }
        let mut last_err = match self.load(self.images.index()) {
            Ok(()) => return Ok(()),
            Err(e) => e,
        };
        loop {
            if !last_err.is_recoverable() {
                return Err(last_err);
            }
            warn!("skipping: {last_err}");
            match self.images.advance() {
                Ok(index) => match self.load(index) {
                    Ok(()) => return Ok(()),
                    Err(e) => last_err = e,
                },
                Err(_) => return Err(last_err),
            }
        }
    }

    /// Convenience for `new` followed by `start`.
    pub fn open(images: ImageSet, config: &Config) -> Result<Self> {
        let mut session = Self::new(images, config);
        session.start()?;
        Ok(session)
    }

    pub fn apply(&mut self, command: Command) -> Result<Outcome> {
        if self.state != SessionState::ImageLoaded {
            return Err(Error::InvalidState(self.state));
        }
        match command {
            Command::Place { x, y } => {
                let (x, y) = self.mapper.clamp(x, y);
                self.label.set(self.cursor, x, y);
                self.touch();
                self.persist()?;
                Ok(Outcome::Redraw)
            }
            Command::Clear => {
                self.label.clear(self.cursor);
                self.touch();
                self.persist()?;
                Ok(Outcome::Redraw)
            }
            Command::NextLimb => {
                self.select_limb(self.cursor.next());
                Ok(Outcome::Redraw)
            }
            Command::PrevLimb => {
                self.select_limb(self.cursor.prev());
                Ok(Outcome::Redraw)
            }
            Command::NextImage => self.navigate(Direction::Forward),
            Command::PrevImage => self.navigate(Direction::Backward),
            Command::ToggleSkeleton => {
                self.show_skeleton = !self.show_skeleton;
                self.touch();
                Ok(Outcome::Redraw)
            }
            Command::Exit => {
                self.persist()?;
                self.state = SessionState::Exited;
                info!("session closed at [{}]", self.images.index());
                Ok(Outcome::Exited)
            }
        }
    }

    fn select_limb(&mut self, limb: Limb) {
        self.cursor = limb;
        self.touch();
        info!("limb index : {} ({})", limb.index(), limb.name());
    }

    fn navigate(&mut self, direction: Direction) -> Result<Outcome> {
        self.persist()?;
        let origin = self.images.index();
        loop {
            let step = match direction {
                Direction::Forward => self.images.advance(),
                Direction::Backward => self.images.retreat(),
            };
            let index = match step {
                Ok(index) => index,
                Err(boundary) => {
                    self.images.seek(origin);
                    info!("{boundary}");
                    return Ok(Outcome::Notice(boundary.to_string()));
                }
            };
            match self.load(index) {
                Ok(()) => return Ok(Outcome::FrameChanged),
                Err(e) if e.is_recoverable() => error!("skipping [{index}]: {e}"),
                Err(e) => {
                    self.images.seek(origin);
                    return Err(e);
                }
            }
        }
    }

    /// Decode image `index` and replace the frame and label with its data.
    /// Session state is only touched once decoding has succeeded.
    fn load(&mut self, index: usize) -> Result<()> {
        let path = self
            .images
            .path_at(index)
            .map(Path::to_path_buf)
            .ok_or(Error::InvalidState(self.state))?;
        let frame = raster::load_frame(&path, self.mapper.width, self.mapper.height)?;

        let label = match sidecar::load(&sidecar::sidecar_path(&path), &self.mapper) {
            Ok(Some(label)) => label,
            Ok(None) => LabelRecord::new(),
            Err(e) => {
                warn!("starting with an empty label: {e}");
                LabelRecord::new()
            }
        };

        self.images.seek(index);
        self.frame = Some(frame);
        self.label = label;
        self.cursor = Limb::Head;
        self.state = SessionState::ImageLoaded;
        self.touch();
        info!("[{index}] : {}", path.display());
        Ok(())
    }

    fn persist(&self) -> Result<()> {
        let path = sidecar::sidecar_path(self.images.current());
        sidecar::save(&path, &self.label, &self.mapper)
    }

    fn touch(&mut self) {
        self.revision = self.revision.wrapping_add(1);
    }

    /// Frame with keypoints, optional skeleton and the guide panel.
    pub fn render(&self) -> Option<RgbImage> {
        let frame = self.frame.as_ref()?;
        let overlay = Overlay {
            label: &self.label,
            cursor: self.cursor,
            show_skeleton: self.show_skeleton,
        };
        let guide = self
            .guide
            .as_ref()
            .map(|g| (&g.image, g.hint(self.cursor)));
        Some(render::compose(frame, overlay, guide))
    }

    /// Write the current render next to the image as `{stem}_annotated.png`.
    pub fn export_snapshot(&self) -> Result<PathBuf> {
        let img = self.render().ok_or(Error::InvalidState(self.state))?;
        let image_path = self.images.current();
        let stem = image_path
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("out");
        let out_path = image_path.with_file_name(format!("{stem}_annotated.png"));
        img.save(&out_path).map_err(|source| Error::Encode {
            path: out_path.clone(),
            source,
        })?;
        info!("exported to {}", out_path.display());
        Ok(out_path)
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn cursor(&self) -> Limb {
        self.cursor
    }

    pub fn label(&self) -> &LabelRecord {
        &self.label
    }

    pub fn images(&self) -> &ImageSet {
        &self.images
    }

    pub fn current_path(&self) -> &Path {
        self.images.current()
    }

    pub fn mapper(&self) -> &CoordinateMapper {
        &self.mapper
    }

    pub fn show_skeleton(&self) -> bool {
        self.show_skeleton
    }

    pub fn has_guide(&self) -> bool {
        self.guide.is_some()
    }

    /// Changes whenever [`Session::render`] would produce a different image.
    pub fn revision(&self) -> u64 {
        self.revision
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgb;

    fn session_with(names: &[&str]) -> (tempfile::TempDir, Session) {
        let dir = tempfile::tempdir().unwrap();
        for name in names {
            RgbImage::from_pixel(20, 30, Rgb([90, 90, 90]))
                .save(dir.path().join(name))
                .unwrap();
        }
        let config = Config {
            canvas_width: 40,
            canvas_height: 60,
            guide_image: dir.path().join("no-guide.jpg"),
            ..Config::default()
        };
        let images = ImageSet::scan(dir.path()).unwrap();
        let session = Session::open(images, &config).unwrap();
        (dir, session)
    }

    #[test]
    fn idle_session_rejects_commands() {
        let dir = tempfile::tempdir().unwrap();
        let images = ImageSet::from_paths(vec![dir.path().join("a.jpg")]).unwrap();
        let mut session = Session::new(images, &Config::default());
        assert_eq!(session.state(), SessionState::Idle);
        assert!(matches!(
            session.apply(Command::NextLimb),
            Err(Error::InvalidState(SessionState::Idle))
        ));
    }

    #[test]
    fn limb_cursor_wraps() {
        let (_dir, mut session) = session_with(&["1.jpg"]);
        assert_eq!(session.cursor(), Limb::Head);
        session.apply(Command::PrevLimb).unwrap();
        assert_eq!(session.cursor(), Limb::Back);
        session.apply(Command::NextLimb).unwrap();
        assert_eq!(session.cursor(), Limb::Head);
    }

    #[test]
    fn click_does_not_advance_cursor() {
        let (_dir, mut session) = session_with(&["1.jpg"]);
        let outcome = session.apply(Command::Place { x: 5, y: 6 }).unwrap();
        assert_eq!(outcome, Outcome::Redraw);
        assert_eq!(session.cursor(), Limb::Head);
        assert_eq!(session.label()[Limb::Head].position(), Some((5, 6)));
    }

    #[test]
    fn place_is_clamped_to_canvas() {
        let (_dir, mut session) = session_with(&["1.jpg"]);
        session.apply(Command::Place { x: 100, y: -3 }).unwrap();
        assert_eq!(session.label()[Limb::Head].position(), Some((39, 0)));
    }

    #[test]
    fn toggling_skeleton_bumps_revision() {
        let (_dir, mut session) = session_with(&["1.jpg"]);
        let before = session.revision();
        session.apply(Command::ToggleSkeleton).unwrap();
        assert!(session.show_skeleton());
        assert_ne!(session.revision(), before);
    }

    #[test]
    fn render_matches_canvas_without_guide() {
        let (_dir, session) = session_with(&["1.jpg"]);
        assert!(!session.has_guide());
        assert_eq!(session.render().unwrap().dimensions(), (40, 60));
    }

    #[test]
    fn exit_rejects_further_commands() {
        let (_dir, mut session) = session_with(&["1.jpg"]);
        assert_eq!(session.apply(Command::Exit).unwrap(), Outcome::Exited);
        assert!(matches!(
            session.apply(Command::Clear),
            Err(Error::InvalidState(SessionState::Exited))
        ));
    }
}
