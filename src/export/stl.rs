//! Binary STL writer
//!
//! Layout: 80-byte header, little-endian u32 triangle count, then one
//! 50-byte record per triangle (normal, three vertices, attribute word).

use bytemuck::{Pod, Zeroable};
use glam::Vec3;

use crate::error::ExportError;

pub const HEADER_LEN: usize = 80;
pub const TRIANGLE_LEN: usize = 50;

/// On-disk triangle record (must match the STL layout byte for byte)
#[repr(C, packed)]
#[derive(Copy, Clone, Pod, Zeroable)]
struct StlTriangle {
    normal: [f32; 3],
    vertices: [[f32; 3]; 3],
    attribute: u16,
}

const _: () = assert!(std::mem::size_of::<StlTriangle>() == TRIANGLE_LEN);

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Triangle {
    pub normal: Vec3,
    pub vertices: [Vec3; 3],
}

/// Triangle soup
#[derive(Debug, Clone, Default)]
pub struct Mesh {
    pub triangles: Vec<Triangle>,
}

impl Mesh {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an axis-aligned box with outward-facing triangles
    pub fn push_box(&mut self, min: Vec3, max: Vec3) {
        let c = |x: bool, y: bool, z: bool| {
            Vec3::new(
                if x { max.x } else { min.x },
                if y { max.y } else { min.y },
                if z { max.z } else { min.z },
            )
        };
        // Each face as a counter-clockwise quad seen from outside
        let faces = [
            (Vec3::NEG_X, [c(false, false, false), c(false, false, true), c(false, true, true), c(false, true, false)]),
            (Vec3::X, [c(true, false, false), c(true, true, false), c(true, true, true), c(true, false, true)]),
            (Vec3::NEG_Y, [c(false, false, false), c(true, false, false), c(true, false, true), c(false, false, true)]),
            (Vec3::Y, [c(false, true, false), c(false, true, true), c(true, true, true), c(true, true, false)]),
            (Vec3::NEG_Z, [c(false, false, false), c(false, true, false), c(true, true, false), c(true, false, false)]),
            (Vec3::Z, [c(false, false, true), c(true, false, true), c(true, true, true), c(false, true, true)]),
        ];
        for (normal, [a, b, cc, d]) in faces {
            self.triangles.push(Triangle { normal, vertices: [a, b, cc] });
            self.triangles.push(Triangle { normal, vertices: [a, cc, d] });
        }
    }

    /// Encode as binary STL
    pub fn to_binary_stl(&self, header: &str) -> Result<Vec<u8>, ExportError> {
        if self.triangles.is_empty() {
            return Err(ExportError::EmptyMesh);
        }
        let count = u32::try_from(self.triangles.len())
            .map_err(|_| ExportError::TooManyTriangles(self.triangles.len()))?;

        let mut out = Vec::with_capacity(HEADER_LEN + 4 + self.triangles.len() * TRIANGLE_LEN);
        let mut head = [0u8; HEADER_LEN];
        let text = header.as_bytes();
        let n = text.len().min(HEADER_LEN);
        head[..n].copy_from_slice(&text[..n]);
        out.extend_from_slice(&head);
        out.extend_from_slice(&count.to_le_bytes());

        for tri in &self.triangles {
            let record = StlTriangle {
                normal: tri.normal.to_array(),
                vertices: tri.vertices.map(|v| v.to_array()),
                attribute: 0,
            };
            // STL is little-endian; so are wasm32 and every target we ship
            out.extend_from_slice(bytemuck::bytes_of(&record));
        }
        Ok(out)
    }
}
