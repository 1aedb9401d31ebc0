//! Rendering adapter: renderer-agnostic interface.
//!
//! # Invariants
//! - Renderers never mutate the interactive transform; they only read the
//!   final [`DrawParams`].
//! - The camera chain is fixed for the session apart from the aspect ratio.

mod camera;
mod renderer;

pub use camera::SceneCamera;
pub use renderer::{DebugTextRenderer, DrawParams, FrameStats, Renderer};
