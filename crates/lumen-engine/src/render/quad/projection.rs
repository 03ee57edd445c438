use glam::Mat4;

use crate::coords::Viewport;

/// Scale that fits an `image_width` x `image_height` image inside `viewport`
/// without distortion, centred on the full-viewport quad.
///
/// The axis along which the view is longer (relative to the image) is scaled
/// down; the other stays at 1. Degenerate sizes give the identity.
pub fn aspect_fit(image_width: u32, image_height: u32, viewport: Viewport) -> Mat4 {
    let Some(view_aspect) = viewport.aspect() else {
        return Mat4::IDENTITY;
    };
    if image_width == 0 || image_height == 0 {
        return Mat4::IDENTITY;
    }
    let image_aspect = image_width as f32 / image_height as f32;

    let (sx, sy) = if view_aspect > image_aspect {
        (image_aspect / view_aspect, 1.0)
    } else {
        (1.0, view_aspect / image_aspect)
    };

    Mat4::from_scale(glam::Vec3::new(sx, sy, 1.0))
}

#[cfg(test)]
mod tests {
    use glam::Vec4;

    use super::*;

    #[test]
    fn wide_view_shrinks_x() {
        let m = aspect_fit(200, 100, Viewport::new(400.0, 100.0));
        assert_eq!(m, Mat4::from_scale(glam::Vec3::new(0.5, 1.0, 1.0)));
    }

    #[test]
    fn tall_view_shrinks_y() {
        let m = aspect_fit(100, 100, Viewport::new(100.0, 200.0));
        assert_eq!(m, Mat4::from_scale(glam::Vec3::new(1.0, 0.5, 1.0)));
    }

    #[test]
    fn matching_aspect_is_identity() {
        assert_eq!(aspect_fit(320, 240, Viewport::new(640.0, 480.0)), Mat4::IDENTITY);
    }

    #[test]
    fn degenerate_inputs_are_identity() {
        assert_eq!(aspect_fit(0, 10, Viewport::new(10.0, 10.0)), Mat4::IDENTITY);
        assert_eq!(aspect_fit(10, 10, Viewport::new(0.0, 10.0)), Mat4::IDENTITY);
        assert_eq!(aspect_fit(10, 10, Viewport::new(10.0, f32::NAN)), Mat4::IDENTITY);
    }

    #[test]
    fn fitted_quad_keeps_image_aspect() {
        let view = Viewport::new(1600.0, 900.0);
        let m = aspect_fit(300, 400, view);
        let right_top = m * Vec4::new(1.0, 1.0, 0.0, 1.0);
        // Back to pixels: NDC half-extent times half the viewport.
        let w = right_top.x * view.width;
        let h = right_top.y * view.height;
        assert!((w / h - 0.75).abs() < 1e-5);
        assert!(right_top.x <= 1.0 && right_top.y <= 1.0);
    }
}
