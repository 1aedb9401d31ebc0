use egui::Context as EguiContext;
use objview_common::ViewerConfig;
use objview_input::HeldKeys;
use objview_kernel::transcript::format_matrix;
use objview_kernel::{Accumulator, Control, Transcript, pressed_controls};
use objview_render::{DrawParams, FrameStats, SceneCamera};
use std::io::Write;
use winit::keyboard::KeyCode;

/// What the window loop should do after a key event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyOutcome {
    Continue,
    Exit,
}

/// Viewer state that outlives a single frame.
pub struct AppState {
    pub config: ViewerConfig,
    pub camera: SceneCamera,
    accumulator: Accumulator,
    keys: HeldKeys,
    transcript: Option<Transcript<Box<dyn Write>>>,
    pub wireframe: bool,
    wireframe_supported: bool,
    pub show_hud: bool,
    frame: u64,
    vertex_count: u32,
}

impl AppState {
    pub fn new(
        config: ViewerConfig,
        vertex_count: u32,
        transcript: Option<Transcript<Box<dyn Write>>>,
    ) -> Self {
        Self {
            camera: SceneCamera::from_config(&config),
            accumulator: Accumulator::new(config.steps),
            keys: HeldKeys::default(),
            transcript,
            wireframe: config.wireframe,
            wireframe_supported: true,
            show_hud: true,
            frame: 0,
            vertex_count,
            config,
        }
    }

    pub fn accumulator(&self) -> &Accumulator {
        &self.accumulator
    }

    pub fn frame(&self) -> u64 {
        self.frame
    }

    /// Record whether the backend can draw lines. Without it, wireframe
    /// requests are drawn filled.
    pub fn set_wireframe_supported(&mut self, supported: bool) {
        self.wireframe_supported = supported;
        if self.wireframe && !supported {
            tracing::warn!("wireframe requested but unsupported; drawing filled");
        }
    }

    /// Draw mode as it actually appears on screen.
    pub fn mode_label(&self) -> &'static str {
        match (self.wireframe, self.wireframe_supported) {
            (true, true) => "wireframe",
            (true, false) => "wireframe (unsupported, filled)",
            (false, _) => "fill",
        }
    }

    /// Fold one key event into the held set and handle the viewer's own keys.
    pub fn handle_key(&mut self, key: KeyCode, pressed: bool) -> KeyOutcome {
        self.keys.handle(key, pressed);
        if !pressed {
            return KeyOutcome::Continue;
        }

        match key {
            KeyCode::Escape => return KeyOutcome::Exit,
            KeyCode::F1 => {
                self.show_hud = !self.show_hud;
            }
            KeyCode::F2 => {
                self.wireframe = !self.wireframe;
                tracing::info!("{} mode", self.mode_label());
            }
            KeyCode::Backspace => {
                self.accumulator.reset();
                tracing::info!("transform reset");
            }
            _ => {}
        }
        KeyOutcome::Continue
    }

    /// Window lost focus: release events will not arrive, so drop all held keys.
    pub fn focus_lost(&mut self) {
        self.keys.clear();
    }

    /// Advance one frame: apply held controls, then record them.
    pub fn update(&mut self) {
        self.frame += 1;
        self.accumulator.apply_frame(&self.keys);

        let pressed = pressed_controls(&self.keys);
        if let Some(transcript) = &mut self.transcript {
            if let Err(e) = transcript.record(&pressed, &self.accumulator.matrix()) {
                tracing::error!("transcript write failed, disabling transcript: {e}");
                self.transcript = None;
            }
        }
    }

    pub fn draw_params(&self) -> DrawParams {
        DrawParams {
            mvp: self.camera.mvp(self.accumulator.matrix()),
            color: self.config.mesh_color,
            wireframe: self.wireframe,
        }
    }

    pub fn stats(&self) -> FrameStats {
        FrameStats {
            frame: self.frame,
            vertex_count: self.vertex_count,
        }
    }

    /// Flush and close the transcript, if any.
    pub fn finish(&mut self) {
        if let Some(mut transcript) = self.transcript.take() {
            if let Err(e) = transcript.flush() {
                tracing::error!("failed to flush transcript: {e}");
            } else {
                tracing::info!("transcript closed after {} frames", transcript.frames_written());
            }
        }
    }

    pub fn draw_ui(&mut self, ctx: &EguiContext) {
        if !self.show_hud {
            return;
        }

        egui::Window::new("Transform")
            .default_pos([8.0, 8.0])
            .resizable(false)
            .show(ctx, |ui| {
                ui.label(format!("Frame: {}", self.frame));
                ui.label(format!("Triangles: {}", self.vertex_count / 3));
                ui.label(format!("Mode: {}", self.mode_label()));
                ui.separator();
                ui.label(
                    egui::RichText::new(format_matrix(&self.accumulator.matrix())).monospace(),
                );
                ui.separator();
                for control in Control::ALL {
                    ui.small(format!("{}: {}", control.label(), control.description()));
                }
                ui.separator();
                ui.small("F1: HUD | F2: Wireframe | Backspace: Reset | Esc: Quit");
            });
    }
}

impl Drop for AppState {
    fn drop(&mut self) {
        self.finish();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Mat4;

    fn state() -> AppState {
        AppState::new(ViewerConfig::default(), 36, None)
    }

    #[test]
    fn held_key_applies_each_frame() {
        let mut s = state();
        s.handle_key(KeyCode::KeyW, true);
        for _ in 0..10 {
            s.update();
        }
        assert!((s.accumulator().matrix().w_axis.y - 0.1).abs() < 1e-5);
        s.handle_key(KeyCode::KeyW, false);
        let before = s.accumulator().matrix();
        s.update();
        assert_eq!(s.accumulator().matrix(), before);
        assert_eq!(s.frame(), 11);
    }

    #[test]
    fn focus_loss_releases_keys() {
        let mut s = state();
        s.handle_key(KeyCode::KeyQ, true);
        s.focus_lost();
        s.update();
        assert_eq!(s.accumulator().matrix(), Mat4::IDENTITY);
    }

    #[test]
    fn viewer_keys() {
        let mut s = state();
        assert!(s.wireframe);
        s.handle_key(KeyCode::F2, true);
        assert!(!s.wireframe);
        assert!(!s.draw_params().wireframe);

        s.handle_key(KeyCode::F1, true);
        assert!(!s.show_hud);

        s.handle_key(KeyCode::KeyR, true);
        s.update();
        assert_ne!(s.accumulator().matrix(), Mat4::IDENTITY);
        s.handle_key(KeyCode::KeyR, false);
        s.handle_key(KeyCode::Backspace, true);
        assert_eq!(s.accumulator().matrix(), Mat4::IDENTITY);

        assert_eq!(s.handle_key(KeyCode::Escape, true), KeyOutcome::Exit);
        assert_eq!(s.handle_key(KeyCode::Escape, false), KeyOutcome::Continue);
    }

    #[test]
    fn mode_label_reports_fill_fallback() {
        let mut s = state();
        assert_eq!(s.mode_label(), "wireframe");
        s.set_wireframe_supported(false);
        assert_eq!(s.mode_label(), "wireframe (unsupported, filled)");
        s.handle_key(KeyCode::F2, true);
        assert_eq!(s.mode_label(), "fill");
    }

    #[test]
    fn draw_params_compose_camera_chain() {
        let s = state();
        let expected = s.camera.mvp(Mat4::IDENTITY);
        assert_eq!(s.draw_params().mvp, expected);
        assert_eq!(s.stats().vertex_count, 36);
    }

    #[test]
    fn transcript_records_only_active_frames() {
        let tmp = tempfile::NamedTempFile::new().unwrap();
        let file = tmp.reopen().unwrap();
        let transcript = Transcript::new(Box::new(file) as Box<dyn Write>);
        let mut s = AppState::new(ViewerConfig::default(), 3, Some(transcript));

        s.update();
        s.handle_key(KeyCode::KeyT, true);
        s.update();
        s.handle_key(KeyCode::KeyT, false);
        s.update();
        drop(s);

        let text = std::fs::read_to_string(tmp.path()).unwrap();
        assert_eq!(text.matches("Pressed ").count(), 1);
        assert!(text.starts_with("Pressed T: Rotate model about x axis anticlockwise"));
        assert_eq!(text.matches("Current Transformation Matrix:").count(), 1);
    }
}
