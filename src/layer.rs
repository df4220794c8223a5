//! Drawable regions.
//!
//! A `Layer` is a rectangle placed in its parent's coordinates plus a dirty
//! flag. Rendering clips to the frame and shifts the origin so the update
//! routine always draws in local bounds starting at (0, 0).

use embedded_graphics::{
    draw_target::DrawTargetExt,
    pixelcolor::Rgb565,
    prelude::*,
    primitives::Rectangle,
};

use crate::error::FaceError;
use crate::graphics::GContext;

/// Paints the content of a layer. `bounds` is the layer's local rectangle.
pub trait LayerUpdate {
    fn update<T>(&self, ctx: &mut GContext<'_, T>, bounds: Rectangle) -> Result<(), T::Error>
    where
        T: DrawTarget<Color = Rgb565>;
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Layer {
    frame: Rectangle,
    dirty: bool,
}

impl Layer {
    /// New layers start dirty so the first frame gets painted.
    pub fn new(frame: Rectangle) -> Result<Self, FaceError> {
        check_frame(&frame)?;
        Ok(Self { frame, dirty: true })
    }

    /// Position and size in parent coordinates.
    #[inline]
    pub fn frame(&self) -> Rectangle {
        self.frame
    }

    /// Local drawing rectangle: origin (0, 0), frame size.
    #[inline]
    pub fn bounds(&self) -> Rectangle {
        Rectangle::new(Point::zero(), self.frame.size)
    }

    pub fn set_frame(&mut self, frame: Rectangle) -> Result<(), FaceError> {
        check_frame(&frame)?;
        if frame != self.frame {
            self.frame = frame;
            self.dirty = true;
        }
        Ok(())
    }

    /// Requests a redraw on the host's next pass.
    pub fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    #[inline]
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Runs `content` against `target` inside this layer's frame and clears
    /// the dirty flag. The flag stays set if drawing fails.
    pub fn render<D, U>(&mut self, target: &mut D, content: &U) -> Result<(), D::Error>
    where
        D: DrawTarget<Color = Rgb565>,
        U: LayerUpdate,
    {
        let bounds = self.bounds();
        let mut clipped = target.clipped(&self.frame);
        let mut local = clipped.translated(self.frame.top_left);
        let mut ctx = GContext::new(&mut local);
        content.update(&mut ctx, bounds)?;
        self.dirty = false;
        Ok(())
    }
}

fn check_frame(frame: &Rectangle) -> Result<(), FaceError> {
    if frame.is_zero_sized() {
        return Err(FaceError::EmptyFrame {
            width: frame.size.width,
            height: frame.size.height,
        });
    }
    let max = i16::MAX as u32;
    let fits = |v: i32| i16::try_from(v).is_ok();
    if !fits(frame.top_left.x)
        || !fits(frame.top_left.y)
        || frame.size.width > max
        || frame.size.height > max
    {
        return Err(FaceError::FrameTooLarge {
            x: frame.top_left.x,
            y: frame.top_left.y,
            width: frame.size.width,
            height: frame.size.height,
        });
    }
    Ok(())
}
