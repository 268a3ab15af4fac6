//! Vertex types for 2D rendering

use bytemuck::{Pod, Zeroable};

/// Simple 2D vertex with position and color
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
    pub const BACKGROUND: [f32; 4] = [0.08, 0.08, 0.1, 1.0];
    pub const TOP_VIEW_BG: [f32; 4] = [0.97, 0.97, 0.97, 1.0];
    pub const GRID: [f32; 4] = [0.0, 0.0, 0.0, 0.08];
    pub const CURVE: [f32; 4] = [0.0, 0.0, 0.0, 1.0];
    pub const VIEWER: [f32; 4] = [0.9, 0.1, 0.1, 1.0];
    pub const RAY_HIT: [f32; 4] = [0.0, 0.5, 0.0, 0.3];
    pub const RAY_MISS: [f32; 4] = [0.0, 0.5, 0.0, 0.05];
    pub const HIT_POINT: [f32; 4] = [0.1, 0.2, 0.9, 0.6];
    /// #222222
    pub const PLAYER_VIEW_BG: [f32; 4] = [0.133, 0.133, 0.133, 1.0];
    pub const WALL: [f32; 4] = [1.0, 1.0, 1.0, 1.0];
    pub const HORIZON: [f32; 4] = [0.0, 0.0, 0.0, 1.0];
}
