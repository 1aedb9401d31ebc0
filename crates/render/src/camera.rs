use glam::{Mat4, Vec3};
use objview_common::ViewerConfig;

/// Fixed perspective camera looking down -Z at the origin.
///
/// Only the aspect ratio changes during a session (on window resize).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SceneCamera {
    pub eye: Vec3,
    pub target: Vec3,
    pub up: Vec3,
    /// Vertical field of view in degrees.
    pub fov_degrees: f32,
    pub aspect: f32,
    pub near: f32,
    pub far: f32,
    /// Uniform scale applied to the mesh before the interactive transform.
    pub model_scale: f32,
}

impl Default for SceneCamera {
    fn default() -> Self {
        Self {
            eye: Vec3::new(0.0, 0.0, 3.0),
            target: Vec3::ZERO,
            up: Vec3::Y,
            fov_degrees: 45.0,
            aspect: 1024.0 / 768.0,
            near: 0.1,
            far: 100.0,
            model_scale: 0.15,
        }
    }
}

impl SceneCamera {
    pub fn from_config(config: &ViewerConfig) -> Self {
        Self {
            aspect: config.aspect(),
            model_scale: config.model_scale,
            ..Self::default()
        }
    }

    /// Update the aspect ratio. Zero-sized windows (minimized) are ignored.
    pub fn set_viewport(&mut self, width: u32, height: u32) {
        if width > 0 && height > 0 {
            self.aspect = width as f32 / height as f32;
            tracing::debug!("viewport {width}x{height}, aspect {:.3}", self.aspect);
        }
    }

    pub fn model_matrix(&self) -> Mat4 {
        Mat4::from_scale(Vec3::splat(self.model_scale))
    }

    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.eye, self.target, self.up)
    }

    pub fn projection_matrix(&self) -> Mat4 {
        Mat4::perspective_rh(
            self.fov_degrees.to_radians(),
            self.aspect,
            self.near,
            self.far,
        )
    }

    /// Final draw matrix: `projection * view * interactive * model`.
    pub fn mvp(&self, interactive: Mat4) -> Mat4 {
        self.projection_matrix() * self.view_matrix() * interactive * self.model_matrix()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec4;

    #[test]
    fn default_camera_matches_viewer() {
        let cam = SceneCamera::default();
        assert_eq!(cam.eye, Vec3::new(0.0, 0.0, 3.0));
        assert_eq!(cam.fov_degrees, 45.0);
        assert!((cam.aspect - 4.0 / 3.0).abs() < 1e-6);
    }

    #[test]
    fn origin_projects_to_screen_center() {
        let cam = SceneCamera::default();
        let clip = cam.mvp(Mat4::IDENTITY) * Vec4::new(0.0, 0.0, 0.0, 1.0);
        let ndc = clip.truncate() / clip.w;
        assert!(ndc.x.abs() < 1e-6);
        assert!(ndc.y.abs() < 1e-6);
        assert!(ndc.z > 0.0 && ndc.z < 1.0);
    }

    #[test]
    fn interactive_translation_moves_image() {
        let cam = SceneCamera::default();
        let up = Mat4::from_translation(Vec3::new(0.0, 0.5, 0.0));
        let clip = cam.mvp(up) * Vec4::new(0.0, 0.0, 0.0, 1.0);
        assert!(clip.y / clip.w > 0.0);
    }

    #[test]
    fn model_scale_applies_before_interactive() {
        let cam = SceneCamera::default();
        let interactive = Mat4::from_translation(Vec3::new(1.0, 0.0, 0.0));
        let expected = cam.projection_matrix()
            * cam.view_matrix()
            * interactive
            * Mat4::from_scale(Vec3::splat(0.15));
        assert!(cam.mvp(interactive).abs_diff_eq(expected, 1e-6));
    }

    #[test]
    fn zero_viewport_keeps_aspect() {
        let mut cam = SceneCamera::default();
        cam.set_viewport(0, 600);
        assert!((cam.aspect - 4.0 / 3.0).abs() < 1e-6);
        cam.set_viewport(800, 800);
        assert_eq!(cam.aspect, 1.0);
    }

    #[test]
    fn from_config_uses_window_aspect() {
        let mut config = ViewerConfig::default();
        config.window.width = 1920;
        config.window.height = 1080;
        config.model_scale = 1.0;
        let cam = SceneCamera::from_config(&config);
        assert!((cam.aspect - 16.0 / 9.0).abs() < 1e-6);
        assert_eq!(cam.model_matrix(), Mat4::IDENTITY);
    }
}
