//! Linear RGBA colors.

/// A color in the linear sRGB color space with an alpha component.
///
/// Channels are `f32`s, typically in `[0.0, 1.0]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Color {
    /// Red.
    pub r: f32,
    /// Green.
    pub g: f32,
    /// Blue.
    pub b: f32,
    /// Alpha.
    pub a: f32,
}

impl Color {
    /// Fully transparent black.
    pub const TRANSPARENT: Color = Color::new(0.0, 0.0, 0.0, 0.0);

    /// Creates a color from linear components.
    #[inline]
    pub const fn new(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    /// Creates an opaque color from linear components.
    #[inline]
    pub const fn from_rgb(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b, a: 1.0 }
    }

    /// Returns the same color with alpha replaced.
    #[inline]
    pub fn with_alpha(self, a: f32) -> Self {
        Self { a, ..self }
    }

    /// Packs into a gamma-encoded `0xAARRGGBB` integer.
    pub fn to_argb(self) -> u32 {
        let r = (linear_to_srgb_channel(self.r) * 255.0 + 0.5) as u32;
        let g = (linear_to_srgb_channel(self.g) * 255.0 + 0.5) as u32;
        let b = (linear_to_srgb_channel(self.b) * 255.0 + 0.5) as u32;
        let a = (self.a.clamp(0.0, 1.0) * 255.0 + 0.5) as u32;
        (a << 24) | (r << 16) | (g << 8) | b
    }

    /// Unpacks a gamma-encoded `0xAARRGGBB` integer.
    pub fn from_argb(argb: u32) -> Self {
        let a = ((argb >> 24) & 0xFF) as f32 / 255.0;
        let r = ((argb >> 16) & 0xFF) as f32 / 255.0;
        let g = ((argb >> 8) & 0xFF) as f32 / 255.0;
        let b = (argb & 0xFF) as f32 / 255.0;
        Color::new(
            srgb_to_linear_channel(r),
            srgb_to_linear_channel(g),
            srgb_to_linear_channel(b),
            a,
        )
    }
}

/// The default color is fully transparent.
impl Default for Color {
    #[inline]
    fn default() -> Self {
        Self::TRANSPARENT
    }
}

fn linear_to_srgb_channel(v: f32) -> f32 {
    let v = v.clamp(0.0, 1.0);
    if v <= 0.003_130_8 {
        v * 12.92
    } else {
        1.055 * v.powf(1.0 / 2.4) - 0.055
    }
}

fn srgb_to_linear_channel(v: f32) -> f32 {
    let v = v.clamp(0.0, 1.0);
    if v <= 0.04045 {
        v / 12.92
    } else {
        ((v + 0.055) / 1.055).powf(2.4)
    }
}

#[cfg(test)]
mod tests {
    use super::Color;

    #[test]
    fn argb_survives_packing() {
        for argb in [0xFF6750A4u32, 0x80FFFFFF, 0xFF000000, 0xFFB3261E] {
            assert_eq!(Color::from_argb(argb).to_argb(), argb);
        }
    }
}
