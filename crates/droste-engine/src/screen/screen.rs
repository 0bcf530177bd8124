use glam::Mat4;

use crate::coords::Vec2;
use crate::paint::Rgba8;

use super::transform;

/// Stable identifier of a placed screen.
///
/// Identifiers are assigned by the registry in creation order and never reused,
/// so a stored id can always be re-resolved (or found missing) after the
/// registry's storage changes.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, PartialOrd, Ord)]
pub struct ScreenId(pub(crate) u64);

impl ScreenId {
    #[inline]
    pub fn raw(self) -> u64 {
        self.0
    }
}

/// A placed rectangular feedback window.
///
/// Invariants:
/// - `rotation` is always within `[0, 360)`
/// - dimensions are clamped by the owning registry
#[derive(Debug, Clone, PartialEq)]
pub struct Screen {
    id: ScreenId,
    position: Vec2,
    width: u32,
    height: u32,
    rotation: f32,
    color: Rgba8,
}

impl Screen {
    pub(crate) fn new(id: ScreenId, position: Vec2, width: u32, height: u32, color: Rgba8) -> Self {
        Self {
            id,
            position,
            width,
            height,
            rotation: 0.0,
            color,
        }
    }

    #[inline]
    pub fn id(&self) -> ScreenId {
        self.id
    }

    /// Centre in canvas pixels.
    #[inline]
    pub fn position(&self) -> Vec2 {
        self.position
    }

    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Rotation in degrees, `[0, 360)`.
    #[inline]
    pub fn rotation(&self) -> f32 {
        self.rotation
    }

    #[inline]
    pub fn color(&self) -> Rgba8 {
        self.color
    }

    #[inline]
    pub fn area(&self) -> u64 {
        self.width as u64 * self.height as u64
    }

    /// Point-in-footprint test in presentation space.
    pub fn contains(&self, point: Vec2) -> bool {
        transform::point_in_rotated_rect(
            point,
            self.position,
            self.width as f32,
            self.height as f32,
            self.rotation,
        )
    }

    /// Unit-quad transform into composite space for a canvas of `canvas_height`.
    pub fn model_matrix(&self, canvas_height: f32) -> Mat4 {
        transform::model_matrix(
            self.position,
            self.width,
            self.height,
            self.rotation,
            canvas_height,
        )
    }

    pub(crate) fn set_position(&mut self, position: Vec2) {
        self.position = position;
    }

    pub(crate) fn set_size(&mut self, width: u32, height: u32) {
        self.width = width;
        self.height = height;
    }

    pub(crate) fn set_color(&mut self, color: Rgba8) {
        self.color = color;
    }

    /// Adds `degrees` and wraps the result into `[0, 360)`.
    pub(crate) fn rotate(&mut self, degrees: f32) {
        self.rotation = normalize_degrees(self.rotation + degrees);
    }
}

/// Wraps any finite angle into `[0, 360)`.
pub(crate) fn normalize_degrees(degrees: f32) -> f32 {
    let r = degrees.rem_euclid(360.0);
    // rem_euclid can round up to exactly 360.0 for tiny negative inputs.
    if r >= 360.0 { 0.0 } else { r }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn screen() -> Screen {
        Screen::new(ScreenId(0), Vec2::new(100.0, 100.0), 40, 20, Rgba8::default())
    }

    #[test]
    fn rotation_wraps_positive() {
        let mut s = screen();
        s.rotate(725.0);
        assert!((s.rotation() - 5.0).abs() < 1e-4);
    }

    #[test]
    fn rotation_wraps_negative() {
        let mut s = screen();
        s.rotate(-1.0);
        assert!((s.rotation() - 359.0).abs() < 1e-4);
    }

    #[test]
    fn tiny_negative_angle_never_yields_360() {
        let r = normalize_degrees(-1e-7);
        assert!((0.0..360.0).contains(&r));
    }

    #[test]
    fn area_does_not_overflow() {
        let s = Screen::new(ScreenId(1), Vec2::zero(), u32::MAX, 2, Rgba8::default());
        assert_eq!(s.area(), u32::MAX as u64 * 2);
    }

    #[test]
    fn contains_uses_rotation() {
        let mut s = screen();
        assert!(s.contains(Vec2::new(118.0, 100.0)));
        s.rotate(90.0);
        assert!(!s.contains(Vec2::new(118.0, 100.0)));
        assert!(s.contains(Vec2::new(100.0, 118.0)));
    }
}
