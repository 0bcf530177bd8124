use super::Color;

/// Straight-alpha 8-bit RGBA color, the storage format of a screen's tint.
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq, Hash)]
pub struct Rgba8 {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba8 {
    #[inline]
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    #[inline]
    pub const fn with_alpha(self, a: u8) -> Self {
        Self { a, ..self }
    }

    /// Converts to the premultiplied form the compositor's blend function expects:
    /// `(r/255 * a/255, g/255 * a/255, b/255 * a/255, a/255)`.
    #[inline]
    pub fn to_premul(self) -> Color {
        Color::from_straight(
            self.r as f32 / 255.0,
            self.g as f32 / 255.0,
            self.b as f32 / 255.0,
            self.a as f32 / 255.0,
        )
    }
}
