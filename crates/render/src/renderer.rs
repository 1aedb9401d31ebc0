use glam::Mat4;
use objview_common::Rgb;
use objview_kernel::transcript::format_matrix;

/// Everything a backend needs to draw one frame of the mesh.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DrawParams {
    /// Final clip-space matrix (`projection * view * interactive * model`).
    pub mvp: Mat4,
    /// Flat mesh color.
    pub color: Rgb,
    pub wireframe: bool,
}

impl Default for DrawParams {
    fn default() -> Self {
        Self {
            mvp: Mat4::IDENTITY,
            color: Rgb::WHITE,
            wireframe: true,
        }
    }
}

/// Per-frame counters shown alongside the draw.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FrameStats {
    pub frame: u64,
    pub vertex_count: u32,
}

/// Renderer-agnostic interface. All renderers implement this trait.
pub trait Renderer {
    /// The output type produced by this renderer.
    type Output;

    /// Render one frame.
    fn render(&self, params: &DrawParams, stats: &FrameStats) -> Self::Output;
}

/// Text renderer: describes a frame instead of drawing it.
///
/// Used by the headless CLI and in tests.
#[derive(Debug, Default)]
pub struct DebugTextRenderer;

impl DebugTextRenderer {
    pub fn new() -> Self {
        Self
    }
}

impl Renderer for DebugTextRenderer {
    type Output = String;

    fn render(&self, params: &DrawParams, stats: &FrameStats) -> String {
        let mut out = String::new();
        out.push_str(&format!(
            "=== Frame {} ({} vertices, {} triangles) ===\n",
            stats.frame,
            stats.vertex_count,
            stats.vertex_count / 3
        ));
        out.push_str(&format!(
            "Mode: {}\n",
            if params.wireframe { "wireframe" } else { "fill" }
        ));
        let [r, g, b] = params.color.0;
        out.push_str(&format!("Color: ({r:.2}, {g:.2}, {b:.2})\n"));
        out.push_str("MVP:\n");
        out.push_str(&format_matrix(&params.mvp));
        out
    }
}
