//! Transform engine: per-screen model matrices, the canvas projection, and the
//! rotated-rectangle hit test.
//!
//! Two spaces are involved:
//! - *presentation space*: canvas pixels, origin top-left, +Y down; input,
//!   hit-testing and the selection overlay live here
//! - *composite space*: the same canvas with Y mirrored (`H - y`); feedback
//!   quads are placed here so that, together with the top-down UV flip in the
//!   shaders, each composite is read back mirrored and the recursion keeps its
//!   handedness

use glam::{Mat4, Vec3};

use crate::coords::{Vec2, Viewport};

/// Orthographic canvas projection: `(0, 0)` top-left, `(w, h)` bottom-right.
pub fn canvas_projection(canvas: Viewport) -> Mat4 {
    Mat4::orthographic_rh(0.0, canvas.width, canvas.height, 0.0, -1.0, 1.0)
}

/// Maps the unit quad `(0,0)-(1,1)` onto a screen's footprint in composite space.
///
/// Composition order (applied right to left to the quad):
/// `T(x, H - y) * R(180 - rotation) * T(w/2, -h/2) * S(-w, h)`.
/// The order and the 180 degree flip are load-bearing; changing either
/// mirrors the feedback loop.
pub fn model_matrix(
    position: Vec2,
    width: u32,
    height: u32,
    rotation_deg: f32,
    canvas_height: f32,
) -> Mat4 {
    let w = width as f32;
    let h = height as f32;

    Mat4::from_translation(Vec3::new(position.x, canvas_height - position.y, 0.0))
        * Mat4::from_rotation_z((-rotation_deg + 180.0).to_radians())
        * Mat4::from_translation(Vec3::new(w / 2.0, -h / 2.0, 0.0))
        * Mat4::from_scale(Vec3::new(-w, h, 1.0))
}

/// Maps the unit quad onto the whole canvas (presentation blit).
pub fn full_canvas_matrix(canvas: Viewport) -> Mat4 {
    Mat4::from_scale(Vec3::new(canvas.width, canvas.height, 1.0))
}

/// Returns true when `point` lies inside (or on the edge of) the rectangle of
/// `width` × `height` centred at `center` and rotated by `rotation_deg`.
///
/// The point is brought into the rectangle's local frame by the inverse
/// rotation about `center`, then bounds-checked against the half extents.
pub fn point_in_rotated_rect(
    point: Vec2,
    center: Vec2,
    width: f32,
    height: f32,
    rotation_deg: f32,
) -> bool {
    let local = point.rotated_about(center, -rotation_deg) - center;
    let hw = width / 2.0;
    let hh = height / 2.0;

    local.x >= -hw && local.x <= hw && local.y >= -hh && local.y <= hh
}

/// Unit-quad transforms for the four bands of a selection outline, in
/// presentation space.
///
/// Bands sit inside the footprint and do not overlap, so a translucent outline
/// has uniform alpha at the corners. Order: top, bottom, left, right.
pub fn outline_edges(
    center: Vec2,
    width: f32,
    height: f32,
    rotation_deg: f32,
    thickness: f32,
) -> [Mat4; 4] {
    let w = width.max(0.0);
    let h = height.max(0.0);
    let t = thickness.min(w / 2.0).min(h / 2.0).max(0.0);

    let base = Mat4::from_translation(Vec3::new(center.x, center.y, 0.0))
        * Mat4::from_rotation_z(rotation_deg.to_radians());

    let band = |x: f32, y: f32, bw: f32, bh: f32| {
        base * Mat4::from_translation(Vec3::new(x, y, 0.0)) * Mat4::from_scale(Vec3::new(bw, bh, 1.0))
    };

    let side = (h - 2.0 * t).max(0.0);

    [
        band(-w / 2.0, -h / 2.0, w, t),
        band(-w / 2.0, h / 2.0 - t, w, t),
        band(-w / 2.0, -h / 2.0 + t, t, side),
        band(w / 2.0 - t, -h / 2.0 + t, t, side),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    const H: f32 = 950.0;

    fn apply(m: Mat4, x: f32, y: f32) -> Vec2 {
        let p = m.transform_point3(Vec3::new(x, y, 0.0));
        Vec2::new(p.x, p.y)
    }

    fn close(a: Vec2, b: Vec2) -> bool {
        (a.x - b.x).abs() < 1e-3 && (a.y - b.y).abs() < 1e-3
    }

    // ── model_matrix ──────────────────────────────────────────────────────

    #[test]
    fn unrotated_corners_match_bounding_box() {
        let m = model_matrix(Vec2::new(800.0, 475.0), 400, 237, 0.0, H);

        // Composite space mirrors Y around the canvas: centre y' = H - y.
        let cy = H - 475.0;
        assert!(close(apply(m, 0.0, 0.0), Vec2::new(600.0, cy + 118.5)));
        assert!(close(apply(m, 1.0, 0.0), Vec2::new(1000.0, cy + 118.5)));
        assert!(close(apply(m, 1.0, 1.0), Vec2::new(1000.0, cy - 118.5)));
        assert!(close(apply(m, 0.0, 1.0), Vec2::new(600.0, cy - 118.5)));
    }

    #[test]
    fn quad_centre_maps_to_anchor_for_any_rotation() {
        for rot in [0.0, 33.0, 90.0, 181.5, 359.0] {
            let m = model_matrix(Vec2::new(120.0, 300.0), 64, 48, rot, H);
            assert!(close(apply(m, 0.5, 0.5), Vec2::new(120.0, H - 300.0)));
        }
    }

    #[test]
    fn footprint_mirrored_back_agrees_with_hit_test() {
        let center = Vec2::new(700.0, 400.0);
        let (w, h, rot) = (300u32, 120u32, 37.0);
        let m = model_matrix(center, w, h, rot, H);

        let to_presentation = |p: Vec2| Vec2::new(p.x, H - p.y);

        for (u, v) in [(0.05, 0.05), (0.95, 0.1), (0.5, 0.95), (0.1, 0.9)] {
            let p = to_presentation(apply(m, u, v));
            assert!(point_in_rotated_rect(p, center, w as f32, h as f32, rot), "({u}, {v})");
        }
        for (u, v) in [(-0.05, 0.5), (1.05, 0.5), (0.5, -0.05), (0.5, 1.05)] {
            let p = to_presentation(apply(m, u, v));
            assert!(!point_in_rotated_rect(p, center, w as f32, h as f32, rot), "({u}, {v})");
        }
    }

    #[test]
    fn projection_maps_canvas_corners_to_ndc() {
        let p = canvas_projection(Viewport::new(1600.0, 950.0));
        let tl = p.transform_point3(Vec3::ZERO);
        let br = p.transform_point3(Vec3::new(1600.0, 950.0, 0.0));
        assert!((tl.x + 1.0).abs() < 1e-5 && (tl.y - 1.0).abs() < 1e-5);
        assert!((br.x - 1.0).abs() < 1e-5 && (br.y + 1.0).abs() < 1e-5);
    }

    // ── point_in_rotated_rect ─────────────────────────────────────────────

    #[test]
    fn edges_are_inclusive() {
        let c = Vec2::new(0.0, 0.0);
        assert!(point_in_rotated_rect(Vec2::new(50.0, 10.0), c, 100.0, 20.0, 0.0));
        assert!(!point_in_rotated_rect(Vec2::new(50.1, 0.0), c, 100.0, 20.0, 0.0));
    }

    #[test]
    fn quarter_turn_swaps_extents() {
        let c = Vec2::new(10.0, 10.0);
        assert!(point_in_rotated_rect(Vec2::new(10.0, 50.0), c, 100.0, 20.0, 90.0));
        assert!(!point_in_rotated_rect(Vec2::new(50.0, 10.0), c, 100.0, 20.0, 90.0));
    }

    #[test]
    fn zero_sized_rect_contains_only_its_centre() {
        let c = Vec2::new(3.0, 4.0);
        assert!(point_in_rotated_rect(c, c, 0.0, 0.0, 45.0));
        assert!(!point_in_rotated_rect(Vec2::new(3.5, 4.0), c, 0.0, 0.0, 45.0));
    }

    // ── outline_edges ─────────────────────────────────────────────────────

    #[test]
    fn outline_bands_hug_unrotated_footprint() {
        let [top, bottom, left, right] =
            outline_edges(Vec2::new(200.0, 100.0), 100.0, 50.0, 0.0, 5.0);

        assert!(close(apply(top, 0.0, 0.0), Vec2::new(150.0, 75.0)));
        assert!(close(apply(top, 1.0, 1.0), Vec2::new(250.0, 80.0)));
        assert!(close(apply(bottom, 1.0, 1.0), Vec2::new(250.0, 125.0)));
        assert!(close(apply(left, 0.0, 0.0), Vec2::new(150.0, 80.0)));
        assert!(close(apply(left, 1.0, 1.0), Vec2::new(155.0, 120.0)));
        assert!(close(apply(right, 0.0, 0.0), Vec2::new(245.0, 80.0)));
    }

    #[test]
    fn outline_thickness_clamped_for_tiny_screens() {
        let [top, _, left, _] = outline_edges(Vec2::zero(), 4.0, 4.0, 0.0, 5.0);
        assert!(close(apply(top, 1.0, 1.0), Vec2::new(2.0, 0.0)));
        // Side bands collapse to zero height.
        assert!(close(apply(left, 0.0, 0.0), apply(left, 0.0, 1.0)));
    }
}
