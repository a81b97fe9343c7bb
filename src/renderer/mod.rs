//! WebGPU rendering module
//!
//! The scene is flattened into layer-tagged colored quads (`draw_list`) and
//! drawn by a single quad pipeline with a world and a screen camera.

pub mod draw_list;
pub mod quad_pipeline;
pub mod vertex;

pub use draw_list::{DrawList, Label, Quad, build};
pub use quad_pipeline::{CameraUniform, QuadRenderState};
pub use vertex::Vertex;
