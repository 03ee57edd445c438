use bytemuck::{Pod, Zeroable};
use glam::{Mat4, Vec4};

/// Per-vertex input (16 bytes).
///
///  offset 0  position   [f32; 2]   loc 0
///  offset 8  tex_coord  [f32; 2]   loc 1
#[repr(C)]
#[derive(Debug, Copy, Clone, Default, PartialEq, Pod, Zeroable)]
pub struct QuadVertex {
    pub position: [f32; 2],
    pub tex_coord: [f32; 2],
}

impl QuadVertex {
    const ATTRS: [wgpu::VertexAttribute; 2] = wgpu::vertex_attr_array![
        0 => Float32x2, // position
        1 => Float32x2  // tex_coord
    ];

    #[inline]
    pub const fn new(position: [f32; 2], tex_coord: [f32; 2]) -> Self {
        Self { position, tex_coord }
    }

    pub fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<QuadVertex>() as u64,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRS,
        }
    }
}

/// Vertex stage output: clip-space position and the interpolated coordinate.
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct QuadVertexOut {
    pub position: Vec4,
    pub tex_coord: [f32; 2],
}

/// Full-quad triangle strip in NDC. Texture `v` grows downwards.
pub const QUAD_VERTICES: [QuadVertex; 4] = [
    QuadVertex::new([-1.0, 1.0], [0.0, 0.0]),  // left-top
    QuadVertex::new([1.0, 1.0], [1.0, 0.0]),   // right-top
    QuadVertex::new([-1.0, -1.0], [0.0, 1.0]), // left-bottom
    QuadVertex::new([1.0, -1.0], [1.0, 1.0]),  // right-bottom
];

/// Projection matrix as uploaded to `@group(0) @binding(0)` (64 bytes, column-major).
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
pub struct ProjectionUniform {
    pub matrix: [[f32; 4]; 4],
}

impl From<Mat4> for ProjectionUniform {
    #[inline]
    fn from(m: Mat4) -> Self {
        Self {
            matrix: m.to_cols_array_2d(),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::mem::{offset_of, size_of};

    use super::*;

    #[test]
    fn vertex_layout_matches_attributes() {
        assert_eq!(size_of::<QuadVertex>(), 16);
        assert_eq!(offset_of!(QuadVertex, position), 0);
        assert_eq!(offset_of!(QuadVertex, tex_coord), 8);

        let layout = QuadVertex::layout();
        assert_eq!(layout.array_stride, 16);
        assert_eq!(layout.attributes.len(), 2);
        assert_eq!(layout.attributes[0].shader_location, 0);
        assert_eq!(layout.attributes[0].offset, 0);
        assert_eq!(layout.attributes[1].shader_location, 1);
        assert_eq!(layout.attributes[1].offset, 8);
        assert_eq!(layout.attributes[1].format, wgpu::VertexFormat::Float32x2);
    }

    #[test]
    fn quad_corners_map_to_texture_corners() {
        // Top of clip space (y = +1) samples the top row (v = 0).
        for v in QUAD_VERTICES {
            assert_eq!(v.tex_coord[0], (v.position[0] + 1.0) * 0.5);
            assert_eq!(v.tex_coord[1], (1.0 - v.position[1]) * 0.5);
        }
    }

    #[test]
    fn projection_uniform_is_column_major() {
        let m = Mat4::from_translation(glam::Vec3::new(3.0, 4.0, 5.0));
        let u = ProjectionUniform::from(m);
        assert_eq!(size_of::<ProjectionUniform>(), 64);
        assert_eq!(u.matrix[3], [3.0, 4.0, 5.0, 1.0]);
    }
}
