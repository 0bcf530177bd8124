use core::ops::{Add, Mul, Sub};

/// 2D point or offset in canvas pixels (top-left origin, +Y down).
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct Vec2 {
    pub x: f32,
    pub y: f32,
}

impl Vec2 {
    #[inline]
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    #[inline]
    pub const fn zero() -> Self {
        Self { x: 0.0, y: 0.0 }
    }

    /// Rotates `self` about `center` by `degrees`, using the y-down canvas
    /// convention (positive angles turn clockwise on screen).
    #[inline]
    pub fn rotated_about(self, center: Vec2, degrees: f32) -> Vec2 {
        let (sin, cos) = degrees.to_radians().sin_cos();
        let d = self - center;
        Vec2::new(
            center.x + d.x * cos - d.y * sin,
            center.y + d.x * sin + d.y * cos,
        )
    }
}

impl From<(f32, f32)> for Vec2 {
    #[inline]
    fn from((x, y): (f32, f32)) -> Self {
        Vec2::new(x, y)
    }
}

impl Add for Vec2 {
    type Output = Vec2;
    #[inline]
    fn add(self, rhs: Vec2) -> Vec2 {
        Vec2::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for Vec2 {
    type Output = Vec2;
    #[inline]
    fn sub(self, rhs: Vec2) -> Vec2 {
        Vec2::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl Mul<f32> for Vec2 {
    type Output = Vec2;
    #[inline]
    fn mul(self, rhs: f32) -> Vec2 {
        Vec2::new(self.x * rhs, self.y * rhs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: Vec2, b: Vec2) -> bool {
        (a.x - b.x).abs() < 1e-4 && (a.y - b.y).abs() < 1e-4
    }

    #[test]
    fn rotate_quarter_turn_is_clockwise_on_screen() {
        let p = Vec2::new(10.0, 0.0).rotated_about(Vec2::zero(), 90.0);
        assert!(approx(p, Vec2::new(0.0, 10.0)));
    }

    #[test]
    fn rotate_about_offset_center() {
        let c = Vec2::new(5.0, 5.0);
        let p = Vec2::new(6.0, 5.0).rotated_about(c, 180.0);
        assert!(approx(p, Vec2::new(4.0, 5.0)));
    }

    #[test]
    fn full_turn_is_identity() {
        let c = Vec2::new(-3.0, 2.0);
        let p = Vec2::new(7.5, -1.25);
        assert!(approx(p.rotated_about(c, 360.0), p));
    }
}
