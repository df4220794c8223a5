//! Colors used by the face, plus the `Paint` wrapper that adds transparency
//! on top of RGB565.

use embedded_graphics::pixelcolor::Rgb565;

/// A fill or stroke paint. `Clear` draws nothing, leaving whatever is
/// already on the panel.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum Paint {
    #[default]
    Clear,
    Solid(Rgb565),
}

impl Paint {
    pub const fn color(self) -> Option<Rgb565> {
        match self {
            Paint::Clear => None,
            Paint::Solid(c) => Some(c),
        }
    }
}

impl From<Rgb565> for Paint {
    fn from(c: Rgb565) -> Self {
        Paint::Solid(c)
    }
}

// 2-bit-per-channel palette, widened to RGB565 (0x55 -> 10/21, 0xAA -> 21/42).
pub const CYAN: Rgb565 = Rgb565::new(0, 63, 31);
pub const ELECTRIC_BLUE: Rgb565 = Rgb565::new(10, 63, 31);
pub const CELESTE: Rgb565 = Rgb565::new(21, 63, 31);
pub const BLUE_MOON: Rgb565 = Rgb565::new(0, 21, 31);
pub const YELLOW: Rgb565 = Rgb565::new(31, 63, 0);
pub const DARK_CANDY_APPLE_RED: Rgb565 = Rgb565::new(21, 0, 0);

/// Number of sky bands drawn around the dial.
pub const SKY_BANDS: usize = 3;

/// Colors for one face. `Default` gives the blue-sky palette.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct FaceStyle {
    pub background: Paint,
    /// Outermost band first.
    pub sky_fill: [Rgb565; SKY_BANDS],
    pub sky_stroke: Rgb565,
    pub sun_fill: Rgb565,
    pub sun_stroke: Rgb565,
}

impl Default for FaceStyle {
    fn default() -> Self {
        Self {
            background: Paint::Clear,
            sky_fill: [CYAN, ELECTRIC_BLUE, CELESTE],
            sky_stroke: BLUE_MOON,
            sun_fill: YELLOW,
            sun_stroke: DARK_CANDY_APPLE_RED,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use embedded_graphics::prelude::RgbColor;

    #[test]
    fn clear_paint_has_no_color() {
        assert_eq!(Paint::Clear.color(), None);
        assert_eq!(Paint::from(Rgb565::RED).color(), Some(Rgb565::RED));
    }

    #[test]
    fn default_sky_runs_outer_to_inner() {
        let style = FaceStyle::default();
        assert_eq!(style.sky_fill, [CYAN, ELECTRIC_BLUE, CELESTE]);
        assert_eq!(style.background, Paint::Clear);
    }
}
