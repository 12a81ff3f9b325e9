//! Mesh generation for the panorama sphere and the grid tiles
//!
//! Both meshes carry texture coordinates with `v = 0` at the top edge, which
//! matches WebGPU's texture origin.

use std::f32::consts::PI;

/// Radius of the panorama sphere. Hotspots must sit strictly inside it.
pub const SPHERE_RADIUS: f32 = 60.0;

/// Segment count used for the panorama sphere in both directions
pub const SPHERE_SEGMENTS: u32 = 65;

/// Segment count used for grid tiles in both directions
pub const PLANE_SEGMENTS: u32 = 32;

/// A vertex with position, normal and texture coordinates.
///
/// Layout matches the WGSL `VertexInput` structs for vertex buffer upload.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "webgpu", derive(bytemuck::Pod, bytemuck::Zeroable))]
pub struct MeshVertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
    pub uv: [f32; 2],
}

/// Indexed triangle mesh
#[derive(Debug, Clone, Default)]
pub struct Mesh {
    pub vertices: Vec<MeshVertex>,
    pub indices: Vec<u32>,
}

impl Mesh {
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }
}

/// Generate a UV sphere centered at the origin.
///
/// Triangles wind counter-clockwise when seen from outside, so culling front
/// faces leaves only the interior visible to a camera at the center.
///
/// # Example
///
/// ```
/// use tourfolio_viz::geometry::uv_sphere;
///
/// let mesh = uv_sphere(60.0, 8, 4);
/// assert_eq!(mesh.vertices.len(), 9 * 5);
/// ```
pub fn uv_sphere(radius: f32, width_segments: u32, height_segments: u32) -> Mesh {
    let width_segments = width_segments.max(3);
    let height_segments = height_segments.max(2);

    let mut vertices = Vec::with_capacity(((width_segments + 1) * (height_segments + 1)) as usize);
    for iy in 0..=height_segments {
        let v = iy as f32 / height_segments as f32;
        for ix in 0..=width_segments {
            let u = ix as f32 / width_segments as f32;
            let normal = [
                -(u * 2.0 * PI).cos() * (v * PI).sin(),
                (v * PI).cos(),
                (u * 2.0 * PI).sin() * (v * PI).sin(),
            ];
            vertices.push(MeshVertex {
                position: [normal[0] * radius, normal[1] * radius, normal[2] * radius],
                normal,
                uv: [u, v],
            });
        }
    }

    let row = width_segments + 1;
    let mut indices = Vec::new();
    for iy in 0..height_segments {
        for ix in 0..width_segments {
            let a = iy * row + ix + 1;
            let b = iy * row + ix;
            let c = (iy + 1) * row + ix;
            let d = (iy + 1) * row + ix + 1;

            // The pole rows collapse to single points, so skip the degenerate half
            if iy != 0 {
                indices.extend_from_slice(&[a, b, d]);
            }
            if iy != height_segments - 1 {
                indices.extend_from_slice(&[b, c, d]);
            }
        }
    }

    Mesh { vertices, indices }
}

/// Generate a subdivided plane in the XY plane, facing +Z, centered at the origin.
pub fn plane(width: f32, height: f32, segments_x: u32, segments_y: u32) -> Mesh {
    let segments_x = segments_x.max(1);
    let segments_y = segments_y.max(1);
    let step_x = width / segments_x as f32;
    let step_y = height / segments_y as f32;

    let mut vertices = Vec::with_capacity(((segments_x + 1) * (segments_y + 1)) as usize);
    for iy in 0..=segments_y {
        let y = height / 2.0 - iy as f32 * step_y;
        for ix in 0..=segments_x {
            let x = ix as f32 * step_x - width / 2.0;
            vertices.push(MeshVertex {
                position: [x, y, 0.0],
                normal: [0.0, 0.0, 1.0],
                uv: [
                    ix as f32 / segments_x as f32,
                    iy as f32 / segments_y as f32,
                ],
            });
        }
    }

    let row = segments_x + 1;
    let mut indices = Vec::with_capacity((segments_x * segments_y * 6) as usize);
    for iy in 0..segments_y {
        for ix in 0..segments_x {
            let a = ix + row * iy;
            let b = ix + row * (iy + 1);
            let c = ix + 1 + row * (iy + 1);
            let d = ix + 1 + row * iy;
            indices.extend_from_slice(&[a, b, d, b, c, d]);
        }
    }

    Mesh { vertices, indices }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn length(v: [f32; 3]) -> f32 {
        (v[0] * v[0] + v[1] * v[1] + v[2] * v[2]).sqrt()
    }

    #[test]
    fn sphere_vertices_lie_on_radius() {
        let mesh = uv_sphere(SPHERE_RADIUS, 16, 8);
        for vertex in &mesh.vertices {
            assert!((length(vertex.position) - SPHERE_RADIUS).abs() < 1e-3);
        }
    }

    #[test]
    fn sphere_vertex_and_triangle_counts() {
        let mesh = uv_sphere(1.0, 16, 8);
        assert_eq!(mesh.vertices.len(), 17 * 9);
        // Two triangles per quad, minus one per quad on each pole row
        assert_eq!(mesh.triangle_count(), 16 * 8 * 2 - 16 * 2);
    }

    #[test]
    fn sphere_indices_in_range() {
        let mesh = uv_sphere(1.0, SPHERE_SEGMENTS, SPHERE_SEGMENTS);
        let max = mesh.vertices.len() as u32;
        assert!(mesh.indices.iter().all(|&i| i < max));
    }

    #[test]
    fn sphere_uv_starts_at_top() {
        let mesh = uv_sphere(1.0, 4, 4);
        assert_eq!(mesh.vertices[0].uv[1], 0.0);
        assert!(mesh.vertices[0].position[1] > 0.99);
    }

    #[test]
    fn plane_counts_and_bounds() {
        let mesh = plane(1.0, 1.0, PLANE_SEGMENTS, PLANE_SEGMENTS);
        assert_eq!(mesh.vertices.len(), 33 * 33);
        assert_eq!(mesh.triangle_count(), 32 * 32 * 2);
        for vertex in &mesh.vertices {
            assert!(vertex.position[0].abs() <= 0.5 + 1e-6);
            assert!(vertex.position[1].abs() <= 0.5 + 1e-6);
            assert_eq!(vertex.position[2], 0.0);
        }
    }

    #[test]
    fn plane_uv_corners() {
        let mesh = plane(2.0, 2.0, 1, 1);
        assert_eq!(mesh.vertices[0].position, [-1.0, 1.0, 0.0]);
        assert_eq!(mesh.vertices[0].uv, [0.0, 0.0]);
        assert_eq!(mesh.vertices[3].position, [1.0, -1.0, 0.0]);
        assert_eq!(mesh.vertices[3].uv, [1.0, 1.0]);
    }
}
