//! Vertex types for 2D rendering

use bytemuck::{Pod, Zeroable};

/// Simple 2D vertex with position and color. Position is in the space of
/// the camera the vertex is drawn with (world or screen pixels).
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct Vertex {
    pub position: [f32; 2],
    pub color: [f32; 4],
}

impl Vertex {
    pub const fn new(x: f32, y: f32, color: [f32; 4]) -> Self {
        Self {
            position: [x, y],
            color,
        }
    }

    pub fn desc() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<Vertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &[
                wgpu::VertexAttribute {
                    offset: 0,
                    shader_location: 0,
                    format: wgpu::VertexFormat::Float32x2,
                },
                wgpu::VertexAttribute {
                    offset: std::mem::size_of::<[f32; 2]>() as wgpu::BufferAddress,
                    shader_location: 1,
                    format: wgpu::VertexFormat::Float32x4,
                },
            ],
        }
    }
}

/// Colors for scene elements
pub mod colors {
    pub const SKY: [f32; 4] = [0.53, 0.81, 0.92, 1.0];
    pub const GROUND: [f32; 4] = [0.33, 0.55, 0.18, 1.0];
    pub const LAUNCH_PAD: [f32; 4] = [0.45, 0.3, 0.2, 1.0];
    pub const AIM_LINE: [f32; 4] = [1.0, 1.0, 1.0, 0.8];
    pub const SIGN_POST: [f32; 4] = [0.4, 0.26, 0.13, 1.0];
    pub const SIGN_BOARD: [f32; 4] = [0.95, 0.9, 0.75, 1.0];
    pub const STAR: [f32; 4] = [1.0, 0.85, 0.1, 1.0];
    pub const METER_TRACK: [f32; 4] = [0.0, 0.0, 0.0, 0.35];
    pub const POWER: [f32; 4] = [0.95, 0.3, 0.2, 1.0];
    pub const GLIDE: [f32; 4] = [0.2, 0.6, 1.0, 1.0];
    pub const SPINNER: [f32; 4] = [1.0, 1.0, 1.0, 0.9];
    pub const RECAP_BACKDROP: [f32; 4] = [0.08, 0.08, 0.12, 1.0];
}
