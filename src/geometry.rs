//! Fixed-point angle and dial geometry helpers.
//!
//! A full turn is `TRIG_MAX_ANGLE` units. Angle 0 points at 12 o'clock and
//! angles grow clockwise, matching a watch hand on a panel whose y axis
//! points down. Trig results are scaled so `TRIG_MAX_RATIO` is 1.0.

use core::f64::consts::TAU;

use embedded_graphics::{
    prelude::{Point, Size},
    primitives::Rectangle,
};

/// One full turn.
pub const TRIG_MAX_ANGLE: i32 = 0x1_0000;
/// Fixed-point 1.0 for `sin`/`cos` results.
pub const TRIG_MAX_RATIO: i32 = 0xFFFF;

// Sub-pixel precision used when projecting onto a circle (1/8 px).
const PRECISE_SHIFT: i32 = 3;
const PRECISE_ONE: i32 = 1 << PRECISE_SHIFT;

/// An angle in `TRIG_MAX_ANGLE` units, always kept in `0..TRIG_MAX_ANGLE`.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct FixedAngle(i32);

impl FixedAngle {
    pub const ZERO: Self = Self(0);

    /// Wraps any raw value into a single turn.
    pub const fn from_raw(raw: i32) -> Self {
        Self(raw.rem_euclid(TRIG_MAX_ANGLE))
    }

    pub const fn from_degrees(degrees: i32) -> Self {
        Self::from_raw(degrees * (TRIG_MAX_ANGLE / 8) / 45)
    }

    /// `numerator / denominator` of a turn, truncated toward zero.
    pub const fn turn_fraction(numerator: i32, denominator: i32) -> Self {
        Self::from_raw(TRIG_MAX_ANGLE * numerator / denominator)
    }

    #[inline]
    pub const fn raw(self) -> i32 {
        self.0
    }

    pub const fn wrapping_add(self, other: Self) -> Self {
        Self::from_raw(self.0 + other.0)
    }

    /// Nearest whole degree in `0..360`.
    pub const fn to_degrees(self) -> i32 {
        ((self.0 * 360 + TRIG_MAX_ANGLE / 2) / TRIG_MAX_ANGLE) % 360
    }

    pub fn to_degrees_f32(self) -> f32 {
        self.0 as f32 * 360.0 / TRIG_MAX_ANGLE as f32
    }

    fn radians(self) -> f64 {
        self.0 as f64 * TAU / TRIG_MAX_ANGLE as f64
    }

    /// Sine scaled to `TRIG_MAX_RATIO`.
    pub fn sin(self) -> i32 {
        libm::round(libm::sin(self.radians()) * TRIG_MAX_RATIO as f64) as i32
    }

    /// Cosine scaled to `TRIG_MAX_RATIO`.
    pub fn cos(self) -> i32 {
        libm::round(libm::cos(self.radians()) * TRIG_MAX_RATIO as f64) as i32
    }
}

/// Shrinks `rect` by `trim` pixels on every side. Sizes bottom out at zero.
pub fn rect_trim(rect: &Rectangle, trim: i32) -> Rectangle {
    let width = (rect.size.width as i32 - trim * 2).max(0);
    let height = (rect.size.height as i32 - trim * 2).max(0);
    Rectangle::new(
        rect.top_left + Point::new(trim, trim),
        Size::new(width as u32, height as u32),
    )
}

/// Largest circle that fits in `rect`, centered: `(top_left, diameter)`.
pub fn fitted_circle(rect: &Rectangle) -> (Point, u32) {
    let diameter = rect.size.width.min(rect.size.height);
    let offset = Point::new(
        ((rect.size.width - diameter) / 2) as i32,
        ((rect.size.height - diameter) / 2) as i32,
    );
    (rect.top_left + offset, diameter)
}

/// Point on the circle fitted into `rect` at `angle`.
///
/// Center and radius are computed in 1/8 pixel units: the center sits at
/// `origin + (size - 1) / 2` on each axis and the radius is
/// `(min(w, h) - 1) / 2`, so the projected point lands on the outermost
/// pixel ring of the rectangle. The result is floored back to whole pixels.
pub fn point_from_polar(rect: &Rectangle, angle: FixedAngle) -> Point {
    let one = i64::from(PRECISE_ONE);
    let width = i64::from(rect.size.width);
    let height = i64::from(rect.size.height);

    let center_x = i64::from(rect.top_left.x) * one + (width - 1) * one / 2;
    let center_y = i64::from(rect.top_left.y) * one + (height - 1) * one / 2;
    let radius = ((width.min(height) - 1) * one / 2).max(0);

    let ratio = i64::from(TRIG_MAX_RATIO);
    let x = center_x + i64::from(angle.sin()) * radius / ratio;
    let y = center_y - i64::from(angle.cos()) * radius / ratio;

    Point::new(to_pixel(x), to_pixel(y))
}

// Floors 1/8 px units back to whole pixels, saturating at the `i32` range.
fn to_pixel(precise: i64) -> i32 {
    (precise >> PRECISE_SHIFT).clamp(i32::MIN.into(), i32::MAX.into()) as i32
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square(side: u32) -> Rectangle {
        Rectangle::new(Point::zero(), Size::new(side, side))
    }

    #[test]
    fn angles_wrap_into_one_turn() {
        assert_eq!(FixedAngle::from_raw(TRIG_MAX_ANGLE).raw(), 0);
        assert_eq!(FixedAngle::from_raw(-1).raw(), TRIG_MAX_ANGLE - 1);
        assert_eq!(FixedAngle::from_degrees(450), FixedAngle::from_degrees(90));
        let half = FixedAngle::from_degrees(180);
        assert_eq!(half.wrapping_add(half), FixedAngle::ZERO);
    }

    #[test]
    fn degrees_round_trip_on_quarter_turns() {
        for degrees in [0, 90, 180, 270] {
            assert_eq!(FixedAngle::from_degrees(degrees).to_degrees(), degrees);
        }
        assert_eq!(FixedAngle::from_raw(TRIG_MAX_ANGLE - 1).to_degrees(), 0);
    }

    #[test]
    fn sin_cos_cardinal_values() {
        let right = FixedAngle::from_degrees(90);
        assert_eq!(right.sin(), TRIG_MAX_RATIO);
        assert_eq!(right.cos(), 0);
        let bottom = FixedAngle::from_degrees(180);
        assert_eq!(bottom.sin(), 0);
        assert_eq!(bottom.cos(), -TRIG_MAX_RATIO);
    }

    #[test]
    fn trim_shrinks_every_side() {
        let trimmed = rect_trim(&square(180), 15);
        assert_eq!(trimmed, Rectangle::new(Point::new(15, 15), Size::new(150, 150)));
        assert_eq!(rect_trim(&square(10), 8).size, Size::zero());
    }

    #[test]
    fn fitted_circle_centers_in_wide_rect() {
        let rect = Rectangle::new(Point::new(10, 0), Size::new(200, 100));
        assert_eq!(fitted_circle(&rect), (Point::new(60, 0), 100));
    }

    #[test]
    fn polar_points_hit_rect_edges() {
        let rect = square(180);
        assert_eq!(point_from_polar(&rect, FixedAngle::ZERO), Point::new(89, 0));
        assert_eq!(point_from_polar(&rect, FixedAngle::from_degrees(90)), Point::new(179, 89));
        assert_eq!(point_from_polar(&rect, FixedAngle::from_degrees(180)), Point::new(89, 179));
        assert_eq!(point_from_polar(&rect, FixedAngle::from_degrees(270)), Point::new(0, 89));
    }

    #[test]
    fn polar_points_on_huge_rects_do_not_overflow() {
        let rect = square(100_000);
        assert_eq!(point_from_polar(&rect, FixedAngle::from_degrees(90)), Point::new(99_999, 49_999));
        assert_eq!(point_from_polar(&rect, FixedAngle::ZERO), Point::new(49_999, 0));
        let far = Rectangle::new(Point::new(i32::MAX - 10, 0), Size::new(u32::MAX, 8));
        assert_eq!(point_from_polar(&far, FixedAngle::ZERO).x, i32::MAX);
    }

    #[test]
    fn polar_points_use_the_fitted_circle_on_wide_rects() {
        let rect = Rectangle::new(Point::zero(), Size::new(200, 100));
        // Radius follows the short side; the center stays in the middle.
        assert_eq!(point_from_polar(&rect, FixedAngle::from_degrees(90)), Point::new(149, 49));
        assert_eq!(point_from_polar(&rect, FixedAngle::ZERO), Point::new(99, 0));
    }
}
