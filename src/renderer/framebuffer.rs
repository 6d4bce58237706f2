//! In-memory display for headless runs and tests

use std::convert::Infallible;

use embedded_graphics::{pixelcolor::Rgb565, prelude::*};

use crate::assets::Sprite;
use crate::assets::colors::BLACK;
use crate::consts::{SCREEN_HEIGHT, SCREEN_WIDTH};

/// A full-screen RGB565 canvas. Writes outside the screen are dropped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Framebuffer {
    canvas: Sprite,
    /// Pixels written since creation (clipped writes excluded)
    pub pixels_written: u64,
}

impl Framebuffer {
    pub fn new() -> Self {
        Self {
            canvas: Sprite::filled(SCREEN_WIDTH as u32, SCREEN_HEIGHT as u32, BLACK),
            pixels_written: 0,
        }
    }

    pub fn pixel(&self, x: i32, y: i32) -> Option<Rgb565> {
        self.canvas.pixel(x, y)
    }

    /// Number of pixels of `color` inside the rectangle `x, y, w, h`
    pub fn count_in(&self, x: i32, y: i32, w: i32, h: i32, color: Rgb565) -> usize {
        (y..y + h)
            .flat_map(|py| (x..x + w).map(move |px| (px, py)))
            .filter(|&(px, py)| self.pixel(px, py) == Some(color))
            .count()
    }

    pub fn count(&self, color: Rgb565) -> usize {
        self.count_in(0, 0, SCREEN_WIDTH, SCREEN_HEIGHT, color)
    }
}

impl Default for Framebuffer {
    fn default() -> Self {
        Self::new()
    }
}

impl OriginDimensions for Framebuffer {
    fn size(&self) -> Size {
        self.canvas.size()
    }
}

impl DrawTarget for Framebuffer {
    type Color = Rgb565;
    type Error = Infallible;

    fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        let bounds = self.bounding_box();
        let mut written = 0;
        let visible = pixels.into_iter().filter(|Pixel(p, _)| {
            let inside = bounds.contains(*p);
            written += inside as u64;
            inside
        });
        self.canvas.draw_iter(visible)?;
        self.pixels_written += written;
        Ok(())
    }
}
