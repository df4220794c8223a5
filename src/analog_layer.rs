//! The Blue Sky analog face: a 24-hour dial with a three band sky ring,
//! 24 hour ticks and a sun that goes round once a day.
//!
//! Midnight sits at the bottom of the dial and noon at the top. Everything a
//! redraw paints is derived from the layer bounds and the wall time through
//! [`DialGeometry`], so the layout can be checked without rasterizing.

use embedded_graphics::{pixelcolor::Rgb565, prelude::*, primitives::Rectangle};
use log::{debug, trace};

use crate::clock::{localtime, TimeZone, Utc, WallTime};
use crate::error::FaceError;
use crate::geometry::{point_from_polar, rect_trim, FixedAngle, TRIG_MAX_ANGLE};
use crate::graphics::GContext;
use crate::layer::{Layer, LayerUpdate};
use crate::palette::{FaceStyle, SKY_BANDS};

pub const HOUR_TICKS: usize = 24;
/// Every third hour gets a heavy tick.
pub const MAJOR_TICK_EVERY: usize = 3;
pub const MAJOR_TICK_WIDTH: u8 = 3;
pub const MINOR_TICK_WIDTH: u8 = 1;
pub const SUN_STROKE_WIDTH: u8 = 2;

/// Where 00:00 points: straight down.
pub const MIDNIGHT_ANGLE: FixedAngle = FixedAngle::from_raw(TRIG_MAX_ANGLE / 2);

/// Width of the whole sky ring for a layer of this size.
pub fn sky_thickness(bounds: &Rectangle) -> i32 {
    (bounds.size.width.min(bounds.size.height) / 6) as i32
}

/// Angle of the tick for `hour` (0-23).
pub const fn hour_angle(hour: i32) -> FixedAngle {
    MIDNIGHT_ANGLE.wrapping_add(FixedAngle::turn_fraction(hour, HOUR_TICKS as i32))
}

/// Sun position for a wall-clock hour and minute, one turn per day.
pub const fn sun_angle(hour: u8, minute: u8) -> FixedAngle {
    MIDNIGHT_ANGLE
        .wrapping_add(FixedAngle::turn_fraction(hour as i32, 24))
        .wrapping_add(FixedAngle::turn_fraction(minute as i32, 24 * 60))
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct SkyBand {
    /// Distance from the layer edge to this band's outer edge.
    pub trim: i32,
    pub rect: Rectangle,
    /// Ring width.
    pub thickness: u32,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct HourTick {
    pub hour: u8,
    pub angle: FixedAngle,
    /// On the inner edge of the sky ring.
    pub inner: Point,
    /// On the layer edge.
    pub outer: Point,
    pub width: u8,
}

impl HourTick {
    pub fn is_major(&self) -> bool {
        self.hour as usize % MAJOR_TICK_EVERY == 0
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Sun {
    pub angle: FixedAngle,
    pub orbit: Rectangle,
    pub center: Point,
    pub diameter: i32,
}

impl Sun {
    pub fn radius(&self) -> u32 {
        (self.diameter / 2).max(0) as u32
    }
}

/// Everything one redraw paints, in local layer coordinates.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct DialGeometry {
    pub sky_thickness: i32,
    /// Outermost first.
    pub bands: [SkyBand; SKY_BANDS],
    /// Inner edge of the sky ring.
    pub sky_inset: Rectangle,
    pub ticks: [HourTick; HOUR_TICKS],
    pub sun: Sun,
}

impl DialGeometry {
    pub fn compute(bounds: &Rectangle, wall_time: &WallTime) -> Self {
        let thickness = sky_thickness(bounds);
        let band_count = SKY_BANDS as i32;

        let bands = core::array::from_fn(|i| {
            let trim = thickness * i as i32 / band_count;
            SkyBand {
                trim,
                rect: rect_trim(bounds, trim),
                thickness: (thickness / band_count) as u32,
            }
        });

        let sky_inset = rect_trim(bounds, thickness);
        let ticks = core::array::from_fn(|hour| {
            let angle = hour_angle(hour as i32);
            HourTick {
                hour: hour as u8,
                angle,
                inner: point_from_polar(&sky_inset, angle),
                outer: point_from_polar(bounds, angle),
                width: if hour % MAJOR_TICK_EVERY == 0 {
                    MAJOR_TICK_WIDTH
                } else {
                    MINOR_TICK_WIDTH
                },
            }
        });

        let angle = sun_angle(wall_time.hour, wall_time.minute);
        let orbit = rect_trim(bounds, thickness / 2);
        let sun = Sun {
            angle,
            orbit,
            center: point_from_polar(&orbit, angle),
            diameter: thickness * 3 / 4,
        };

        Self {
            sky_thickness: thickness,
            bands,
            sky_inset,
            ticks,
            sun,
        }
    }
}

/// Time fields kept alongside the layer.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct FaceState {
    /// Seconds since the epoch being displayed.
    pub unix_time: i64,
    /// `unix_time` in the face's timezone.
    pub wall_time: WallTime,
    /// Sky ring width used by the last redraw.
    pub sky_thickness: i16,
}

// Paints one frame; borrowed from the face for the duration of a render.
struct Dial<'a> {
    wall_time: &'a WallTime,
    style: &'a FaceStyle,
}

impl LayerUpdate for Dial<'_> {
    fn update<T>(&self, ctx: &mut GContext<'_, T>, bounds: Rectangle) -> Result<(), T::Error>
    where
        T: DrawTarget<Color = Rgb565>,
    {
        let dial = DialGeometry::compute(&bounds, self.wall_time);

        ctx.set_fill_color(self.style.background);
        ctx.fill_rect(&bounds)?;

        for (band, color) in dial.bands.iter().zip(self.style.sky_fill) {
            ctx.set_fill_color(color);
            ctx.fill_radial(&band.rect, band.thickness, 0, TRIG_MAX_ANGLE)?;
        }

        ctx.set_stroke_color(self.style.sky_stroke);
        ctx.set_antialiased(true);
        for tick in &dial.ticks {
            ctx.set_stroke_width(tick.width);
            ctx.draw_line(tick.inner, tick.outer)?;
        }

        let sun = dial.sun;
        ctx.set_fill_color(self.style.sun_fill);
        ctx.fill_circle(sun.center, sun.radius())?;
        ctx.set_stroke_color(self.style.sun_stroke);
        ctx.set_stroke_width(SUN_STROKE_WIDTH);
        ctx.draw_circle(sun.center, sun.radius())
    }
}

/// A drawable analog face. Owns its layer and time state; dropping it
/// releases both.
pub struct AnalogFaceLayer<Z = Utc> {
    layer: Layer,
    state: FaceState,
    zone: Z,
    style: FaceStyle,
}

impl<Z: TimeZone> AnalogFaceLayer<Z> {
    /// Builds a face filling `frame`. The time starts at the epoch with
    /// zeroed wall fields until [`set_time`](Self::set_time) is called.
    pub fn create(frame: Rectangle, zone: Z) -> Result<Self, FaceError> {
        let layer = Layer::new(frame)?;
        debug!(
            "analog face created at ({}, {}) {}x{}",
            frame.top_left.x, frame.top_left.y, frame.size.width, frame.size.height
        );
        Ok(Self {
            layer,
            state: FaceState::default(),
            zone,
            style: FaceStyle::default(),
        })
    }

    pub fn with_style(mut self, style: FaceStyle) -> Self {
        self.style = style;
        self.layer.mark_dirty();
        self
    }

    /// Explicit teardown; same as letting the value drop.
    pub fn destroy(self) {
        trace!("analog face destroyed");
    }

    /// The region to place in a parent view.
    pub fn layer(&self) -> &Layer {
        &self.layer
    }

    pub fn layer_mut(&mut self) -> &mut Layer {
        &mut self.layer
    }

    /// Shows `unix_time`, converted through the face's timezone, and asks for
    /// a redraw.
    pub fn set_time(&mut self, unix_time: i64) {
        self.state.unix_time = unix_time;
        self.state.wall_time = localtime(unix_time, &self.zone);
        self.layer.mark_dirty();
        trace!(
            "face time {} -> {:02}:{:02}",
            unix_time,
            self.state.wall_time.hour,
            self.state.wall_time.minute
        );
    }

    pub fn state(&self) -> &FaceState {
        &self.state
    }

    pub fn unix_time(&self) -> i64 {
        self.state.unix_time
    }

    pub fn wall_time(&self) -> &WallTime {
        &self.state.wall_time
    }

    pub fn sky_thickness(&self) -> i16 {
        self.state.sky_thickness
    }

    pub fn zone(&self) -> &Z {
        &self.zone
    }

    pub fn style(&self) -> &FaceStyle {
        &self.style
    }

    /// Layout the next redraw would paint.
    pub fn geometry(&self) -> DialGeometry {
        DialGeometry::compute(&self.layer.bounds(), &self.state.wall_time)
    }

    /// Paints the face into `target` at the layer's frame.
    pub fn render<D>(&mut self, target: &mut D) -> Result<(), D::Error>
    where
        D: DrawTarget<Color = Rgb565>,
    {
        let bounds = self.layer.bounds();
        self.state.sky_thickness = i16::try_from(sky_thickness(&bounds)).unwrap_or(i16::MAX);
        let dial = Dial {
            wall_time: &self.state.wall_time,
            style: &self.style,
        };
        self.layer.render(target, &dial)?;
        trace!("face rendered");
        Ok(())
    }

    /// Paints only when a redraw was requested. Returns whether it painted.
    pub fn render_if_dirty<D>(&mut self, target: &mut D) -> Result<bool, D::Error>
    where
        D: DrawTarget<Color = Rgb565>,
    {
        if !self.layer.is_dirty() {
            return Ok(false);
        }
        self.render(target)?;
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use embedded_graphics::primitives::PointsIter;

    use super::*;
    use crate::clock::FixedOffset;
    use crate::framebuffer::Framebuffer;
    use crate::palette::{BLUE_MOON, CELESTE, CYAN, DARK_CANDY_APPLE_RED, ELECTRIC_BLUE, YELLOW};

    const DAY: i64 = 86_400;
    // 2024-03-10 00:00:00 UTC
    const SOME_MIDNIGHT: i64 = 1_710_028_800;

    fn square(side: u32) -> Rectangle {
        Rectangle::new(Point::zero(), Size::new(side, side))
    }

    fn wall(hour: u8, minute: u8) -> WallTime {
        WallTime {
            hour,
            minute,
            ..WallTime::default()
        }
    }

    #[test]
    fn create_starts_at_epoch() {
        let face = AnalogFaceLayer::create(square(180), Utc).unwrap();
        assert_eq!(face.unix_time(), 0);
        assert_eq!(face.wall_time(), &WallTime::default());
        assert_eq!(face.sky_thickness(), 0);
        assert_eq!(face.layer().frame(), square(180));
        face.destroy();
    }

    #[test]
    fn create_rejects_empty_frame() {
        let frame = Rectangle::new(Point::new(3, 3), Size::new(40, 0));
        assert!(matches!(
            AnalogFaceLayer::create(frame, Utc),
            Err(FaceError::EmptyFrame { width: 40, height: 0 })
        ));
    }

    #[test]
    fn band_insets_divide_the_sky() {
        let dial = DialGeometry::compute(&square(180), &wall(0, 0));
        assert_eq!(dial.sky_thickness, 30);
        let trims: [i32; SKY_BANDS] = core::array::from_fn(|i| dial.bands[i].trim);
        assert_eq!(trims, [0, 10, 20]);
        for pair in dial.bands.windows(2) {
            assert!(pair[1].rect.size.width < pair[0].rect.size.width);
        }
        assert!(dial.bands.iter().all(|b| b.thickness == 10));
        assert_eq!(dial.sky_inset, rect_trim(&square(180), 30));
    }

    #[test]
    fn hour_ticks_are_evenly_spaced_from_midnight() {
        let dial = DialGeometry::compute(&square(180), &wall(0, 0));
        for tick in &dial.ticks {
            let h = tick.hour as i32;
            assert_eq!(tick.angle.raw(), (TRIG_MAX_ANGLE / 2 + h * TRIG_MAX_ANGLE / 24) % TRIG_MAX_ANGLE);
            assert_eq!(tick.angle.to_degrees(), (180 + h * 15) % 360);
            let expected = if h % 3 == 0 { 3 } else { 1 };
            assert_eq!(tick.width, expected);
            assert_eq!(tick.is_major(), h % 3 == 0);
        }
        // Midnight tick runs straight down from the sky ring to the edge.
        assert_eq!(dial.ticks[0].inner, Point::new(89, 149));
        assert_eq!(dial.ticks[0].outer, Point::new(89, 179));
        // Noon tick runs straight up.
        assert_eq!(dial.ticks[12].inner, Point::new(89, 30));
        assert_eq!(dial.ticks[12].outer, Point::new(89, 0));
    }

    #[test]
    fn sun_angle_sweeps_once_a_day() {
        assert_eq!(sun_angle(0, 0).to_degrees(), 180);
        assert_eq!(sun_angle(6, 0).to_degrees(), 270);
        assert_eq!(sun_angle(12, 0), FixedAngle::ZERO);
        assert_eq!(sun_angle(18, 0).to_degrees(), 90);
        let half_tick = sun_angle(0, 30).to_degrees_f32();
        assert!((half_tick - 187.5).abs() < 0.01);
        assert!(sun_angle(23, 59).raw() < MIDNIGHT_ANGLE.raw());
    }

    #[test]
    fn noon_scenario_on_a_180px_face() {
        let mut face = AnalogFaceLayer::create(square(180), Utc).unwrap();
        face.set_time(SOME_MIDNIGHT + 12 * 3600);
        let dial = face.geometry();

        assert_eq!(face.layer().bounds(), square(180));
        assert_eq!(dial.sky_thickness, 30);
        assert_eq!(dial.sun.angle, FixedAngle::ZERO);
        assert_eq!(dial.sun.orbit, rect_trim(&square(180), 15));
        assert_eq!(dial.sun.diameter, 22);
        assert_eq!(dial.sun.radius(), 11);
        assert_eq!(dial.sun.center, Point::new(89, 15));
    }

    #[test]
    fn set_time_uses_the_injected_zone() {
        let zone = FixedOffset::east_opt(2 * 3600).unwrap();
        let mut face = AnalogFaceLayer::create(square(120), zone).unwrap();
        face.set_time(SOME_MIDNIGHT + 10 * 3600 + 15 * 60);

        assert_eq!(face.wall_time().hour, 12);
        assert_eq!(face.wall_time().minute, 15);
        assert_eq!(face.unix_time(), SOME_MIDNIGHT + 10 * 3600 + 15 * 60);
        assert_eq!(face.geometry().sun.angle, sun_angle(12, 15));

        face.set_time(SOME_MIDNIGHT + DAY - 3600);
        assert_eq!(face.wall_time().hour, 1);
        assert_eq!(face.wall_time().day, 11);
    }

    #[test]
    fn set_time_follows_daylight_saving() {
        let mut face = AnalogFaceLayer::create(square(120), chrono_tz::Europe::London).unwrap();
        // 2024-07-01 06:00 UTC is 07:00 BST.
        face.set_time(1_719_813_600);
        assert_eq!(face.wall_time().hour, 7);
        assert_eq!(face.geometry().sun.angle, sun_angle(7, 0));
    }

    #[test]
    fn far_future_time_saturates() {
        let mut face = AnalogFaceLayer::create(square(60), Utc).unwrap();
        face.set_time(i64::MAX);
        assert_eq!(face.unix_time(), i64::MAX);
        assert!(face.wall_time().year > 200_000);
        assert!(face.wall_time().hour < 24);
    }

    #[test]
    fn large_frames_project_without_overflow() {
        let mut face = AnalogFaceLayer::create(square(9000), Utc).unwrap();
        face.set_time(SOME_MIDNIGHT + 12 * 3600);
        let dial = face.geometry();
        assert_eq!(dial.sky_thickness, 1500);
        assert_eq!(dial.ticks[12].outer, Point::new(4499, 0));
        assert_eq!(dial.ticks[6].outer, Point::new(0, 4499));
        assert_eq!(dial.sun.center, Point::new(4499, 750));

        let mut buf = vec![0u16; 64 * 64];
        let mut fb = Framebuffer::new(64, 64, &mut buf).unwrap();
        face.render(&mut fb).unwrap();
        assert_eq!(face.sky_thickness(), 1500);
    }

    #[test]
    fn frames_beyond_i16_are_rejected() {
        let wide = Rectangle::new(Point::zero(), Size::new(40_000, 10));
        assert!(matches!(
            AnalogFaceLayer::create(wide, Utc),
            Err(FaceError::FrameTooLarge { .. })
        ));
    }

    #[test]
    fn set_time_requests_a_redraw() {
        let mut buf = vec![0u16; 60 * 60];
        let mut fb = Framebuffer::new(60, 60, &mut buf).unwrap();
        let mut face = AnalogFaceLayer::create(square(60), Utc).unwrap();

        assert!(face.render_if_dirty(&mut fb).unwrap());
        assert!(!face.layer().is_dirty());
        assert!(!face.render_if_dirty(&mut fb).unwrap());

        face.set_time(SOME_MIDNIGHT);
        assert!(face.layer().is_dirty());
        assert!(face.render_if_dirty(&mut fb).unwrap());
        assert_eq!(face.sky_thickness(), 10);
    }

    #[test]
    fn render_paints_sky_ticks_and_sun() {
        let mut buf = vec![0u16; 180 * 180];
        let mut fb = Framebuffer::new(180, 180, &mut buf).unwrap();
        fb.clear(Rgb565::GREEN).unwrap();

        let mut face = AnalogFaceLayer::create(square(180), Utc).unwrap();
        face.set_time(SOME_MIDNIGHT + 12 * 3600);
        face.render(&mut fb).unwrap();

        // Sample each band between the 17:00 and 18:00 ticks.
        let between = FixedAngle::from_raw(47_787);
        for (trim, color) in [(5, CYAN), (15, ELECTRIC_BLUE), (25, CELESTE)] {
            let p = point_from_polar(&rect_trim(&square(180), trim), between);
            assert_eq!(fb.pixel(p), Some(color), "band at trim {trim}");
        }

        // 06:00 tick is a heavy horizontal line on the left.
        assert_eq!(fb.pixel(Point::new(15, 89)), Some(BLUE_MOON));
        assert_eq!(fb.pixel(Point::new(15, 90)), Some(BLUE_MOON));

        // Sun at the top, outlined.
        assert_eq!(fb.pixel(Point::new(89, 15)), Some(YELLOW));
        assert_eq!(fb.pixel(Point::new(89, 4)), Some(DARK_CANDY_APPLE_RED));

        // Clear background leaves the middle untouched.
        assert_eq!(fb.pixel(Point::new(89, 89)), Some(Rgb565::GREEN));
        assert_eq!(fb.pixel(Point::new(0, 0)), Some(Rgb565::GREEN));
    }

    #[test]
    fn render_lands_inside_an_offset_frame() {
        let mut buf = vec![0u16; 100 * 100];
        let mut fb = Framebuffer::new(100, 100, &mut buf).unwrap();
        let frame = Rectangle::new(Point::new(40, 40), Size::new(60, 60));

        let mut face = AnalogFaceLayer::create(frame, Utc).unwrap();
        face.render(&mut fb).unwrap();

        let outside = Rectangle::new(Point::zero(), Size::new(40, 100));
        assert!(outside
            .points()
            .all(|p| fb.pixel(p) == Some(Rgb565::BLACK)));
        // Midnight sun sits at the bottom of the orbit.
        let sun = face.geometry().sun;
        assert_eq!(fb.pixel(sun.center + frame.top_left), Some(YELLOW));
    }

    #[test]
    fn custom_style_changes_the_sun() {
        let style = FaceStyle {
            sun_fill: Rgb565::MAGENTA,
            ..FaceStyle::default()
        };
        let mut buf = vec![0u16; 90 * 90];
        let mut fb = Framebuffer::new(90, 90, &mut buf).unwrap();
        let mut face = AnalogFaceLayer::create(square(90), Utc)
            .unwrap()
            .with_style(style);
        face.render(&mut fb).unwrap();

        assert_eq!(face.style().sun_fill, Rgb565::MAGENTA);
        assert_eq!(fb.pixel(face.geometry().sun.center), Some(Rgb565::MAGENTA));
    }
}
