//! 3D export of the recap composite

pub mod stl;

use glam::Vec3;

pub use stl::Mesh;

use crate::error::ExportError;
use crate::recap::CompositeSegment;

/// Build the composite cube: an `edge`-sized cube centered on the origin,
/// sliced along Z into one box per segment.
pub fn composite_mesh(segments: &[CompositeSegment], edge: f32) -> Result<Mesh, ExportError> {
    let half = edge / 2.0;
    let mut mesh = Mesh::new();
    for (index, seg) in segments.iter().enumerate() {
        let z0 = -half + seg.start * edge;
        let z1 = z0 + seg.height * edge;
        for value in [z0, z1] {
            if !value.is_finite() {
                return Err(ExportError::NonFinite { index, value });
            }
        }
        mesh.push_box(Vec3::new(-half, -half, z0), Vec3::new(half, half, z1));
    }
    Ok(mesh)
}

/// Binary STL bytes for the composite
pub fn composite_stl(segments: &[CompositeSegment], edge: f32) -> Result<Vec<u8>, ExportError> {
    let mesh = composite_mesh(segments, edge)?;
    let bytes = mesh.to_binary_stl("when-pigs-fly composite cube")?;
    log::info!(
        "Generated STL: {} segments, {} triangles, {} bytes",
        segments.len(),
        mesh.triangles.len(),
        bytes.len()
    );
    Ok(bytes)
}

/// Download name for an export made at `timestamp_ms`
pub fn export_filename(timestamp_ms: f64) -> String {
    format!("unique_cube_{}.stl", timestamp_ms.max(0.0) as u64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::recap::composite_segments;
    use crate::sim::{CollectibleColor, Inventory};

    #[test]
    fn test_empty_inventory_exports_one_cube() {
        let segments = composite_segments(&Inventory::new(), &CollectibleColor::ALL);
        let bytes = composite_stl(&segments, 20.0).unwrap();
        assert_eq!(u32::from_le_bytes(bytes[80..84].try_into().unwrap()), 12);
    }

    #[test]
    fn test_segments_stack_along_z() {
        let mut inv = Inventory::new();
        inv.add(CollectibleColor::Red);
        inv.add(CollectibleColor::Orange);
        inv.add(CollectibleColor::Orange);
        inv.add(CollectibleColor::Orange);
        let segments = composite_segments(&inv, &CollectibleColor::ALL);
        let mesh = composite_mesh(&segments, 20.0).unwrap();
        assert_eq!(mesh.triangles.len(), 24);

        let zs: Vec<f32> = mesh
            .triangles
            .iter()
            .flat_map(|t| t.vertices.iter().map(|v| v.z))
            .collect();
        let min = zs.iter().cloned().fold(f32::MAX, f32::min);
        let max = zs.iter().cloned().fold(f32::MIN, f32::max);
        assert_eq!(min, -10.0);
        assert_eq!(max, 10.0);
        // Red quarter ends at -5
        assert!(zs.iter().any(|&z| (z - -5.0).abs() < 1e-4));
    }

    #[test]
    fn test_non_finite_segment_fails() {
        let segments = [CompositeSegment {
            color: 0xffffff,
            start: 0.0,
            height: f32::NAN,
        }];
        assert!(matches!(
            composite_stl(&segments, 20.0),
            Err(ExportError::NonFinite { index: 0, .. })
        ));
    }

    #[test]
    fn test_filename_has_timestamp() {
        assert_eq!(export_filename(1_700_000_000_123.0), "unique_cube_1700000000123.stl");
    }
}
