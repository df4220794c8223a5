//! RGB565 off-screen render target.
//!
//! Backed by a caller-owned `&mut [u16]` so it works without an allocator,
//! the same storage layout the panel driver keeps for its own framebuffer.
//! Useful for snapshotting a redraw or composing before a blit.

use core::convert::Infallible;

use embedded_graphics::{
    pixelcolor::{raw::RawU16, Rgb565},
    prelude::*,
    primitives::Rectangle,
    Pixel,
};

use crate::error::FaceError;

pub struct Framebuffer<'fb> {
    w: u32,
    h: u32,
    fb: &'fb mut [u16],
}

impl<'fb> Framebuffer<'fb> {
    /// Wraps `fb`, which must hold exactly `width * height` pixels.
    pub fn new(width: u32, height: u32, fb: &'fb mut [u16]) -> Result<Self, FaceError> {
        let expected = (width as usize) * (height as usize);
        if fb.len() != expected {
            return Err(FaceError::BufferSize {
                expected,
                actual: fb.len(),
            });
        }
        Ok(Self {
            w: width,
            h: height,
            fb,
        })
    }

    #[inline]
    pub fn width(&self) -> u32 {
        self.w
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.h
    }

    /// Color at `p`, `None` outside the buffer.
    pub fn pixel(&self, p: Point) -> Option<Rgb565> {
        self.index(p)
            .map(|i| Rgb565::from(RawU16::new(self.fb[i])))
    }

    /// Every pixel, row-major.
    pub fn pixels(&self) -> impl Iterator<Item = Rgb565> + '_ {
        self.fb.iter().map(|raw| Rgb565::from(RawU16::new(*raw)))
    }

    /// Raw RGB565 words, row-major, ready for a panel blit.
    pub fn as_raw(&self) -> &[u16] {
        self.fb
    }

    fn index(&self, p: Point) -> Option<usize> {
        if p.x < 0 || p.y < 0 {
            return None;
        }
        let (x, y) = (p.x as u32, p.y as u32);
        if x >= self.w || y >= self.h {
            return None;
        }
        Some((y as usize) * (self.w as usize) + (x as usize))
    }
}

impl OriginDimensions for Framebuffer<'_> {
    fn size(&self) -> Size {
        Size::new(self.w, self.h)
    }
}

impl DrawTarget for Framebuffer<'_> {
    type Color = Rgb565;
    type Error = Infallible;

    fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Rgb565>>,
    {
        for Pixel(p, c) in pixels {
            if let Some(i) = self.index(p) {
                self.fb[i] = c.into_storage();
            }
        }
        Ok(())
    }

    fn fill_solid(&mut self, area: &Rectangle, color: Rgb565) -> Result<(), Self::Error> {
        let area = area.intersection(&self.bounding_box());
        let Some(bottom_right) = area.bottom_right() else {
            return Ok(());
        };
        let raw = color.into_storage();
        let row_w = self.w as usize;
        for y in area.top_left.y..=bottom_right.y {
            let base = (y as usize) * row_w;
            let row = &mut self.fb[base + area.top_left.x as usize..=base + bottom_right.x as usize];
            row.fill(raw);
        }
        Ok(())
    }
}
