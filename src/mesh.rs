//! Subdivided plane mesh for the water surface.

use bytemuck::{Pod, Zeroable};
use glam::Mat4;

/// Vertex data for the plane mesh (position + UV coordinates)
#[repr(C)]
#[derive(Copy, Clone, Debug, Pod, Zeroable)]
pub struct Vertex {
    pub position: [f32; 3],
    pub uv: [f32; 2],
}

impl Vertex {
    pub const ATTRIBUTES: [wgpu::VertexAttribute; 2] =
        wgpu::vertex_attr_array![0 => Float32x3, 1 => Float32x2];

    pub fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<Vertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRIBUTES,
        }
    }
}

/// Flat plane in the XY plane, centred on the origin, facing +Z
pub struct PlaneGeometry {
    pub vertices: Vec<Vertex>,
    pub indices: Vec<u32>,
    pub width: f32,
    pub height: f32,
    pub segments: u32,
}

impl PlaneGeometry {
    /// Create a `width` x `height` plane split into `segments` x `segments` quads
    pub fn new(width: f32, height: f32, segments: u32) -> Self {
        let segments = segments.max(1);
        let row = segments + 1;
        let half_w = width / 2.0;
        let half_h = height / 2.0;
        let step_w = width / segments as f32;
        let step_h = height / segments as f32;

        let mut vertices = Vec::with_capacity((row * row) as usize);
        let mut indices = Vec::with_capacity((segments * segments * 6) as usize);

        // Rows run top (+Y) to bottom, UV v runs 1 -> 0 so textures stay upright
        for iy in 0..row {
            let y = half_h - iy as f32 * step_h;
            for ix in 0..row {
                let x = ix as f32 * step_w - half_w;
                vertices.push(Vertex {
                    position: [x, y, 0.0],
                    uv: [
                        ix as f32 / segments as f32,
                        1.0 - iy as f32 / segments as f32,
                    ],
                });
            }
        }

        // Two counter-clockwise triangles per quad, seen from +Z
        for iy in 0..segments {
            for ix in 0..segments {
                let a = ix + row * iy;
                let b = ix + row * (iy + 1);
                let c = (ix + 1) + row * (iy + 1);
                let d = (ix + 1) + row * iy;

                indices.extend_from_slice(&[a, b, d, b, c, d]);
            }
        }

        Self {
            vertices,
            indices,
            width,
            height,
            segments,
        }
    }

    pub fn index_count(&self) -> u32 {
        self.indices.len() as u32
    }
}

/// Model transform laying the plane flat, facing +Y
pub fn water_model_matrix() -> Mat4 {
    Mat4::from_rotation_x(-std::f32::consts::FRAC_PI_2)
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec3;

    fn first_face_normal(geometry: &PlaneGeometry) -> Option<Vec3> {
        let tri = geometry.indices.get(0..3)?;
        let [a, b, c] = [tri[0], tri[1], tri[2]]
            .map(|i| Vec3::from_array(geometry.vertices[i as usize].position));
        Some((b - a).cross(c - a).normalize())
    }

    #[test]
    fn test_plane_creation() {
        let plane = PlaneGeometry::new(2.0, 2.0, 16);

        // Check vertex count: (segments + 1)^2
        assert_eq!(plane.vertices.len(), 17 * 17);

        // Check index count: segments^2 * 2 triangles * 3 indices
        assert_eq!(plane.indices.len(), 16 * 16 * 6);
        assert_eq!(plane.index_count(), 16 * 16 * 6);
    }

    #[test]
    fn test_plane_extent_and_uvs() {
        let plane = PlaneGeometry::new(2.0, 2.0, 4);
        let first = plane.vertices.first().unwrap();
        let last = plane.vertices.last().unwrap();

        assert_eq!(first.position, [-1.0, 1.0, 0.0]);
        assert_eq!(first.uv, [0.0, 1.0]);
        assert_eq!(last.position, [1.0, -1.0, 0.0]);
        assert_eq!(last.uv, [1.0, 0.0]);

        let max_index = *plane.indices.iter().max().unwrap();
        assert_eq!(max_index as usize, plane.vertices.len() - 1);
    }

    #[test]
    fn test_zero_segments_still_makes_a_quad() {
        let plane = PlaneGeometry::new(1.0, 1.0, 0);
        assert_eq!(plane.vertices.len(), 4);
        assert_eq!(plane.indices.len(), 6);
    }

    #[test]
    fn test_model_matrix_lays_plane_flat() {
        let plane = PlaneGeometry::new(2.0, 2.0, 2);
        let normal = first_face_normal(&plane).unwrap();
        assert!((normal - Vec3::Z).length() < 1e-5);

        let world_normal = water_model_matrix().transform_vector3(normal);
        assert!((world_normal - Vec3::Y).length() < 1e-5);
    }
}
