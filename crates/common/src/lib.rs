//! Shared types for the objview workspace.
//!
//! Everything here is plain data: the GPU vertex layout, flat colors, and the
//! YAML-loadable [`ViewerConfig`].

pub mod config;
mod types;

pub use config::{ConfigError, Steps, ViewerConfig, WindowConfig};
pub use types::{Rgb, Vertex};
