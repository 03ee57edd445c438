//! CPU rendition of `quad.wgsl`, one function per shader stage.

use glam::{Mat4, Vec4};

use crate::render::{CpuTexture, SamplerState};

use super::vertex::{QuadVertex, QuadVertexOut};

/// `vs_main`: promotes the 2D position to clip space and forwards the texture
/// coordinate untouched.
#[inline]
pub fn vertex_stage(vertex: QuadVertex, projection: &Mat4) -> QuadVertexOut {
    let [x, y] = vertex.position;
    QuadVertexOut {
        position: *projection * Vec4::new(x, y, 0.0, 1.0),
        tex_coord: vertex.tex_coord,
    }
}

/// `fs_main`: the texture sample at the interpolated coordinate, unmodified.
#[inline]
pub fn fragment_stage(
    fragment: &QuadVertexOut,
    texture: &CpuTexture,
    sampler: &SamplerState,
) -> [f32; 4] {
    texture.sample(sampler, fragment.tex_coord)
}

#[cfg(test)]
mod tests {
    use glam::Vec3;

    use super::super::vertex::QUAD_VERTICES;
    use super::*;
    use crate::render::AddressMode;

    fn matrices() -> Vec<Mat4> {
        vec![
            Mat4::IDENTITY,
            Mat4::from_scale(Vec3::new(0.5, 2.0, 1.0)),
            Mat4::from_translation(Vec3::new(0.25, -0.75, 0.1)),
            Mat4::from_rotation_z(0.7),
            Mat4::orthographic_rh(-2.0, 3.0, -1.0, 4.0, 0.1, 10.0),
            Mat4::perspective_rh(1.1, 1.6, 0.1, 100.0),
            Mat4::from_cols_array(&[
                1.0, 2.0, 3.0, 4.0, //
                5.0, 6.0, 7.0, 8.0, //
                9.0, 10.0, 11.0, 12.0, //
                13.0, 14.0, 15.0, 16.0,
            ]),
        ]
    }

    fn positions() -> Vec<[f32; 2]> {
        let mut p: Vec<[f32; 2]> = QUAD_VERTICES.iter().map(|v| v.position).collect();
        p.extend([[0.0, 0.0], [0.3, -0.8], [-12.5, 7.25], [1e3, -1e-3]]);
        p
    }

    // ── vertex stage ──────────────────────────────────────────────────────

    #[test]
    fn vertex_position_is_projection_times_homogeneous_point() {
        for m in matrices() {
            for p in positions() {
                let out = vertex_stage(QuadVertex::new(p, [0.0, 0.0]), &m);
                // M * (x, y, 0, 1) = x * col0 + y * col1 + col3
                let expected = m.x_axis * p[0] + m.y_axis * p[1] + m.w_axis;
                let tol = 1e-4 * expected.abs().max_element().max(1.0);
                assert!(
                    out.position.abs_diff_eq(expected, tol),
                    "m={m:?} p={p:?}: {:?} != {expected:?}",
                    out.position
                );
            }
        }
    }

    #[test]
    fn vertex_ignores_projection_z_column() {
        let mut m = Mat4::IDENTITY;
        m.z_axis = Vec4::new(9.0, 9.0, 9.0, 9.0);
        let out = vertex_stage(QuadVertex::new([0.5, 0.5], [0.0, 0.0]), &m);
        assert_eq!(out.position, Vec4::new(0.5, 0.5, 0.0, 1.0));
    }

    #[test]
    fn vertex_passes_tex_coord_through_exactly() {
        let coords = [[0.0, 0.0], [1.0, 1.0], [0.123_456_7, 0.987_654_3], [-3.5, 42.0]];
        for m in matrices() {
            for uv in coords {
                let out = vertex_stage(QuadVertex::new([0.2, 0.4], uv), &m);
                assert_eq!(out.tex_coord, uv);
            }
        }
    }

    #[test]
    fn identity_projection_keeps_quad_in_clip_space() {
        for v in QUAD_VERTICES {
            let out = vertex_stage(v, &Mat4::IDENTITY);
            assert_eq!(out.position, Vec4::new(v.position[0], v.position[1], 0.0, 1.0));
        }
    }

    // ── fragment stage ────────────────────────────────────────────────────

    fn gradient() -> CpuTexture {
        let texels = (0..16u32)
            .map(|i| {
                let f = i as f32 / 15.0;
                [f, 1.0 - f, f * 0.5, 0.25 + f * 0.75]
            })
            .collect();
        CpuTexture::new(4, 4, texels).unwrap()
    }

    #[test]
    fn fragment_returns_texel_values() {
        const T0: [f32; 4] = [0.0, 0.0, 0.0, 1.0];
        const T1: [f32; 4] = [1.0, 0.5, 0.0, 1.0];
        const T2: [f32; 4] = [0.0, 1.0, 0.0, 0.5];
        const T3: [f32; 4] = [0.25, 0.25, 0.25, 0.25];
        let tex = CpuTexture::new(2, 2, vec![T0, T1, T2, T3]).unwrap();

        let linear = SamplerState::default();
        let nearest = SamplerState::nearest();
        let cases = [
            (nearest, [0.25, 0.25], T0),
            (nearest, [0.75, 0.25], T1),
            (nearest, [0.75, 0.75], T3),
            (linear, [0.25, 0.75], T2),
            // Halfway between T0 and T1.
            (linear, [0.5, 0.25], [0.5, 0.25, 0.0, 1.0]),
            // Wraps to T1 on the left, so the same blend.
            (linear.with_address_mode(AddressMode::Repeat), [0.0, 0.25], [0.5, 0.25, 0.0, 1.0]),
            (linear, [-1.0, 0.75], T2),
            (nearest.with_address_mode(AddressMode::MirrorRepeat), [1.25, 0.25], T1),
        ];
        for (s, uv, want) in cases {
            let frag = QuadVertexOut {
                position: Vec4::ZERO,
                tex_coord: uv,
            };
            assert_eq!(fragment_stage(&frag, &tex, &s), want, "{s:?} at {uv:?}");
        }
    }

    #[test]
    fn fragment_keeps_alpha() {
        // No blending or premultiplication happens in the stage.
        let tex = CpuTexture::new(1, 1, vec![[0.8, 0.6, 0.4, 0.2]]).unwrap();
        let frag = QuadVertexOut {
            position: Vec4::ZERO,
            tex_coord: [0.5, 0.5],
        };
        assert_eq!(fragment_stage(&frag, &tex, &SamplerState::nearest()), [0.8, 0.6, 0.4, 0.2]);
    }

    #[test]
    fn quad_corners_sample_texture_corners() {
        let tex = gradient();
        let s = SamplerState::nearest();
        let expected = [tex.texel(0, 0), tex.texel(3, 0), tex.texel(0, 3), tex.texel(3, 3)];
        for (v, want) in QUAD_VERTICES.iter().zip(expected) {
            let out = vertex_stage(*v, &Mat4::IDENTITY);
            // Nudge inwards: exactly 1.0 falls on the far edge.
            let uv = out.tex_coord.map(|c| c.clamp(0.01, 0.99));
            let frag = QuadVertexOut { tex_coord: uv, ..out };
            assert_eq!(fragment_stage(&frag, &tex, &s), want);
        }
    }
}
