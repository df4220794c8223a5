//! Stateful drawing context over an embedded-graphics `DrawTarget`.
//!
//! Mirrors the way a watch layer paints: set a fill or stroke paint and a
//! stroke width once, then issue several primitives with that state. Angles
//! for radial fills are raw `TRIG_MAX_ANGLE` units so a sweep of exactly one
//! turn can be expressed.

use embedded_graphics::{
    geometry::Angle,
    pixelcolor::Rgb565,
    prelude::*,
    primitives::{
        Arc, Circle, Line, PrimitiveStyle, PrimitiveStyleBuilder, Rectangle, StrokeAlignment,
    },
};

use crate::geometry::{fitted_circle, TRIG_MAX_ANGLE};
use crate::palette::Paint;

/// Paint and stroke state over a draw target. The antialias flag is stored
/// for callers to query; output is always aliased.
pub struct GContext<'a, D> {
    target: &'a mut D,
    fill: Paint,
    stroke: Paint,
    stroke_width: u8,
    antialiased: bool,
}

impl<'a, D> GContext<'a, D>
where
    D: DrawTarget<Color = Rgb565>,
{
    pub fn new(target: &'a mut D) -> Self {
        Self {
            target,
            fill: Paint::Solid(Rgb565::BLACK),
            stroke: Paint::Solid(Rgb565::BLACK),
            stroke_width: 1,
            antialiased: true,
        }
    }

    pub fn set_fill_color(&mut self, paint: impl Into<Paint>) {
        self.fill = paint.into();
    }

    pub fn set_stroke_color(&mut self, paint: impl Into<Paint>) {
        self.stroke = paint.into();
    }

    /// Zero is treated as one, a stroke is never invisible by width alone.
    pub fn set_stroke_width(&mut self, width: u8) {
        self.stroke_width = width.max(1);
    }

    // The embedded-graphics rasterizer has no coverage blending, so this only
    // records what the caller asked for.
    pub fn set_antialiased(&mut self, enabled: bool) {
        self.antialiased = enabled;
    }

    pub fn fill_color(&self) -> Paint {
        self.fill
    }

    pub fn stroke_color(&self) -> Paint {
        self.stroke
    }

    pub fn stroke_width(&self) -> u8 {
        self.stroke_width
    }

    pub fn antialiased(&self) -> bool {
        self.antialiased
    }

    pub fn fill_rect(&mut self, rect: &Rectangle) -> Result<(), D::Error> {
        match self.fill.color() {
            Some(color) => self.target.fill_solid(rect, color),
            None => Ok(()),
        }
    }

    /// Fills the ring between the circle fitted into `rect` and a circle
    /// `inset` pixels further in, over the clockwise sweep
    /// `angle_start..angle_end`.
    ///
    /// A sweep of a full turn or more paints the whole ring; an inset of at
    /// least the radius paints a disc.
    pub fn fill_radial(
        &mut self,
        rect: &Rectangle,
        inset: u32,
        angle_start: i32,
        angle_end: i32,
    ) -> Result<(), D::Error> {
        let Some(color) = self.fill.color() else {
            return Ok(());
        };
        let (top_left, diameter) = fitted_circle(rect);
        let sweep = angle_end - angle_start;
        if diameter == 0 || inset == 0 || sweep <= 0 {
            return Ok(());
        }
        let inset = inset.min(diameter / 2 + diameter % 2);
        let circle = Circle::new(top_left, diameter);

        if sweep >= TRIG_MAX_ANGLE {
            let style = if inset * 2 >= diameter {
                PrimitiveStyle::with_fill(color)
            } else {
                PrimitiveStyleBuilder::new()
                    .stroke_color(color)
                    .stroke_width(inset)
                    .stroke_alignment(StrokeAlignment::Inside)
                    .build()
            };
            return circle.into_styled(style).draw(&mut *self.target);
        }

        // Arc strokes are centered on the arc, so run the arc through the
        // middle of the ring. Angle 0 is 12 o'clock here and 3 o'clock there.
        let start = Angle::from_degrees(raw_to_degrees(angle_start) - 90.0);
        let sweep = Angle::from_degrees(raw_to_degrees(sweep));
        Arc::with_center(circle.center(), diameter - inset, start, sweep)
            .into_styled(PrimitiveStyle::with_stroke(color, inset))
            .draw(&mut *self.target)
    }

    /// Filled disc of `radius` around `center`.
    pub fn fill_circle(&mut self, center: Point, radius: u32) -> Result<(), D::Error> {
        match self.fill.color() {
            Some(color) => Circle::with_center(center, radius * 2 + 1)
                .into_styled(PrimitiveStyle::with_fill(color))
                .draw(&mut *self.target),
            None => Ok(()),
        }
    }

    /// Circle outline of `radius` around `center` using the stroke state.
    pub fn draw_circle(&mut self, center: Point, radius: u32) -> Result<(), D::Error> {
        match self.stroke.color() {
            Some(color) => Circle::with_center(center, radius * 2 + 1)
                .into_styled(PrimitiveStyle::with_stroke(color, self.stroke_width as u32))
                .draw(&mut *self.target),
            None => Ok(()),
        }
    }

    pub fn draw_line(&mut self, p0: Point, p1: Point) -> Result<(), D::Error> {
        match self.stroke.color() {
            Some(color) => Line::new(p0, p1)
                .into_styled(PrimitiveStyle::with_stroke(color, self.stroke_width as u32))
                .draw(&mut *self.target),
            None => Ok(()),
        }
    }
}

fn raw_to_degrees(raw: i32) -> f32 {
    raw as f32 * 360.0 / TRIG_MAX_ANGLE as f32
}
