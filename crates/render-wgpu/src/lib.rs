//! wgpu render backend for the mesh viewer.
//!
//! Draws one uploaded vertex buffer as an unindexed triangle list with a
//! single matrix uniform and a flat color, filled or as wireframe.
//!
//! # Invariants
//! - The renderer never mutates the interactive transform.
//! - Wireframe falls back to fill when the adapter lacks `POLYGON_MODE_LINE`.

mod gpu;
mod shaders;

pub use gpu::{RenderError, WgpuRenderer, optional_features};
