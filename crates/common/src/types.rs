use bytemuck::{Pod, Zeroable};
use glam::Vec3;
use serde::{Deserialize, Serialize};

/// One mesh vertex as uploaded to the GPU.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct Vertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
}

impl Vertex {
    /// Normal used when the source file carries none.
    pub const DEFAULT_NORMAL: [f32; 3] = [0.0, 0.0, 1.0];

    pub fn new(position: [f32; 3], normal: [f32; 3]) -> Self {
        Self { position, normal }
    }

    pub fn position(&self) -> Vec3 {
        Vec3::from_array(self.position)
    }
}

/// Flat RGB color in linear `[0, 1]` components.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rgb(pub [f32; 3]);

impl Rgb {
    pub const WHITE: Rgb = Rgb([1.0, 1.0, 1.0]);

    /// Pad to four components for uniform buffers.
    pub fn to_vec4(self, alpha: f32) -> [f32; 4] {
        [self.0[0], self.0[1], self.0[2], alpha]
    }
}

impl Default for Rgb {
    fn default() -> Self {
        Self::WHITE
    }
}
