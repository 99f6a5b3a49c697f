//! eframe front end: turns keyboard and pointer input into session commands.

use eframe::egui;
use tracing::{error, info};

use crate::session::{Command, Outcome, Session, SessionState};

pub const WINDOW_TITLE: &str = "label-pose";

pub struct LabelPoseApp {
    session: Session,
    texture: Option<egui::TextureHandle>,
    texture_revision: Option<u64>,
    image_size: (f32, f32),
    notice: Option<String>,

    // pan & zoom
    pan: egui::Vec2,
    zoom: f32,
}

impl LabelPoseApp {
    pub fn new(session: Session) -> Self {
        Self {
            session,
            texture: None,
            texture_revision: None,
            image_size: (0.0, 0.0),
            notice: None,
            pan: egui::Vec2::ZERO,
            zoom: 1.0,
        }
    }

    fn dispatch(&mut self, ctx: &egui::Context, command: Command) {
        if self.session.state() != SessionState::ImageLoaded {
            return;
        }
        match self.session.apply(command) {
            Ok(Outcome::Redraw) => {}
            Ok(Outcome::FrameChanged) => self.notice = None,
            Ok(Outcome::Notice(msg)) => self.notice = Some(msg),
            Ok(Outcome::Exited) => ctx.send_viewport_cmd(egui::ViewportCommand::Close),
            Err(e) => {
                error!("{command:?} failed: {e}");
                self.notice = Some(e.to_string());
            }
        }
    }

    /// Map the pressed key, if any, to a command.
    fn key_command(i: &egui::InputState) -> Option<Command> {
        if !i.modifiers.is_none() {
            return None;
        }
        let bindings = [
            (egui::Key::D, Command::NextImage),
            (egui::Key::A, Command::PrevImage),
            (egui::Key::E, Command::NextLimb),
            (egui::Key::Q, Command::PrevLimb),
            (egui::Key::S, Command::ToggleSkeleton),
            (egui::Key::Escape, Command::Exit),
        ];
        bindings
            .into_iter()
            .find(|(key, _)| i.key_pressed(*key))
            .map(|(_, command)| command)
    }

    fn ensure_texture(&mut self, ctx: &egui::Context) {
        let revision = self.session.revision();
        if self.texture_revision == Some(revision) {
            return;
        }
        let Some(rgb) = self.session.render() else {
            return;
        };
        let size = [rgb.width() as usize, rgb.height() as usize];
        let color_image = egui::ColorImage::from_rgb(size, rgb.as_raw());
        self.image_size = (size[0] as f32, size[1] as f32);
        match self.texture.as_mut() {
            Some(tex) => tex.set(color_image, egui::TextureOptions::NEAREST),
            None => {
                self.texture =
                    Some(ctx.load_texture("frame", color_image, egui::TextureOptions::NEAREST));
            }
        }
        self.texture_revision = Some(revision);
    }

    /// Convert image-space coords to screen-space
    fn image_to_screen(&self, canvas_rect: egui::Rect, img_pos: egui::Pos2) -> egui::Pos2 {
        let center = canvas_rect.center();
        center
            + self.pan
            + (img_pos.to_vec2() - egui::vec2(self.image_size.0, self.image_size.1) * 0.5)
                * self.zoom
    }

    /// Convert screen-space coords to image-space
    fn screen_to_image(&self, canvas_rect: egui::Rect, screen_pos: egui::Pos2) -> egui::Pos2 {
        let center = canvas_rect.center();
        let rel = screen_pos - center - self.pan;
        egui::pos2(
            rel.x / self.zoom + self.image_size.0 * 0.5,
            rel.y / self.zoom + self.image_size.1 * 0.5,
        )
    }

    fn image_rect_on_screen(&self, canvas_rect: egui::Rect) -> egui::Rect {
        let top_left = self.image_to_screen(canvas_rect, egui::Pos2::ZERO);
        let bot_right = self.image_to_screen(
            canvas_rect,
            egui::pos2(self.image_size.0, self.image_size.1),
        );
        egui::Rect::from_min_max(top_left, bot_right)
    }

    fn export_snapshot(&mut self) {
        match self.session.export_snapshot() {
            Ok(path) => self.notice = Some(format!("Exported to {}", path.display())),
            Err(e) => {
                error!("export failed: {e}");
                self.notice = Some(e.to_string());
            }
        }
    }

    fn toolbar(&mut self, ui: &mut egui::Ui, ctx: &egui::Context) {
        ui.horizontal(|ui| {
            let images = self.session.images();
            ui.label(format!(
                "[{}/{}] {}",
                images.index() + 1,
                images.len(),
                self.session
                    .current_path()
                    .file_name()
                    .unwrap_or_default()
                    .to_string_lossy()
            ));
            ui.separator();
            let cursor = self.session.cursor();
            ui.label(format!("Limb {}: {}", cursor.index(), cursor.name()));
            ui.separator();
            if ui.button("◀ Limb").clicked() {
                self.dispatch(ctx, Command::PrevLimb);
            }
            if ui.button("Limb ▶").clicked() {
                self.dispatch(ctx, Command::NextLimb);
            }
            ui.separator();
            let mut skeleton = self.session.show_skeleton();
            if ui.checkbox(&mut skeleton, "Skeleton").changed() {
                self.dispatch(ctx, Command::ToggleSkeleton);
            }
            ui.separator();
            ui.label(format!("Zoom: {:.0}%", self.zoom * 100.0));
        });
    }
}

// ── eframe App impl ────────────────────────────────────────────────────────

impl eframe::App for LabelPoseApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        if ctx.input(|i| i.viewport().close_requested())
            && self.session.state() == SessionState::ImageLoaded
        {
            info!("window closed");
            self.dispatch(ctx, Command::Exit);
        }

        // Keyboard shortcuts
        let (command, export) = ctx.input(|i| {
            let export = i.modifiers.command_only() && i.key_pressed(egui::Key::S);
            (Self::key_command(i), export)
        });
        if export {
            self.export_snapshot();
        }
        if let Some(command) = command {
            self.dispatch(ctx, command);
        }

        self.ensure_texture(ctx);

        egui::TopBottomPanel::top("toolbar").show(ctx, |ui| self.toolbar(ui, ctx));

        egui::TopBottomPanel::bottom("status").show(ctx, |ui| {
            let text = self.notice.as_deref().unwrap_or(
                "left click: place   right click: remove   E/Q: limb   A/D: image   S: skeleton   Esc: exit",
            );
            ui.label(text);
        });

        // Canvas
        egui::CentralPanel::default().show(ctx, |ui| {
            let (response, painter) =
                ui.allocate_painter(ui.available_size(), egui::Sense::click_and_drag());
            let canvas_rect = response.rect;

            painter.rect_filled(canvas_rect, 0.0, egui::Color32::from_gray(40));

            if let Some(ref tex) = self.texture {
                painter.image(
                    tex.id(),
                    self.image_rect_on_screen(canvas_rect),
                    egui::Rect::from_min_max(egui::pos2(0.0, 0.0), egui::pos2(1.0, 1.0)),
                    egui::Color32::WHITE,
                );
            }

            // Handle pan (middle mouse button)
            if ctx.input(|i| i.pointer.middle_down()) {
                self.pan += ctx.input(|i| i.pointer.delta());
            }

            // Handle zoom (scroll wheel)
            let scroll_delta = ctx.input(|i| i.smooth_scroll_delta.y);
            if scroll_delta != 0.0 && response.hovered() {
                let zoom_factor = 1.0 + scroll_delta * 0.002;
                let new_zoom = (self.zoom * zoom_factor).clamp(0.25, 8.0);
                if let Some(cursor) = response.hover_pos() {
                    let cursor_rel = cursor - canvas_rect.center() - self.pan;
                    self.pan -= cursor_rel * (new_zoom / self.zoom - 1.0);
                }
                self.zoom = new_zoom;
            }

            // Clicks only count without modifiers and on the working frame,
            // not on the guide panel.
            let plain = ctx.input(|i| i.modifiers.is_none());
            let Some(pos) = response.interact_pointer_pos() else {
                return;
            };
            let img_pos = self.screen_to_image(canvas_rect, pos);
            let (x, y) = (img_pos.x.floor() as i32, img_pos.y.floor() as i32);
            if !plain || !self.session.mapper().contains(x, y) {
                return;
            }
            if response.clicked_by(egui::PointerButton::Primary) {
                self.dispatch(ctx, Command::Place { x, y });
            } else if response.clicked_by(egui::PointerButton::Secondary) {
                self.dispatch(ctx, Command::Clear);
            }
        });
    }
}
