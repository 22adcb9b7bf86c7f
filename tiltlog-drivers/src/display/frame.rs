//! Monochrome frame buffer in SSD1306 page layout
//!
//! Byte `x + page * WIDTH` holds eight vertical pixels of column `x`,
//! least significant bit on top.

use core::convert::Infallible;

use embedded_graphics::mono_font::ascii::FONT_6X10;
use embedded_graphics::mono_font::MonoTextStyle;
use embedded_graphics::pixelcolor::BinaryColor;
use embedded_graphics::prelude::*;
use embedded_graphics::text::{Baseline, Text};

pub const WIDTH: usize = 128;
pub const HEIGHT: usize = 64;
pub const PAGES: usize = HEIGHT / 8;
pub const BUFFER_LEN: usize = WIDTH * PAGES;

/// 128x64 one bit per pixel frame
pub struct Frame {
    buf: [u8; BUFFER_LEN],
}

impl Frame {
    pub const fn new() -> Self {
        Self {
            buf: [0; BUFFER_LEN],
        }
    }

    pub fn clear(&mut self) {
        self.buf.fill(0);
    }

    pub fn as_bytes(&self) -> &[u8; BUFFER_LEN] {
        &self.buf
    }

    /// Set one pixel; points outside the panel are ignored
    pub fn set_pixel(&mut self, x: i32, y: i32, on: bool) {
        if x < 0 || y < 0 || x as usize >= WIDTH || y as usize >= HEIGHT {
            return;
        }
        let (x, y) = (x as usize, y as usize);
        let index = x + (y / 8) * WIDTH;
        let mask = 1 << (y % 8);
        if on {
            self.buf[index] |= mask;
        } else {
            self.buf[index] &= !mask;
        }
    }

    pub fn pixel(&self, x: usize, y: usize) -> bool {
        x < WIDTH && y < HEIGHT && self.buf[x + (y / 8) * WIDTH] & (1 << (y % 8)) != 0
    }

    /// Render text in the 6x10 font with its top-left corner at `(x, y)`
    pub fn draw_text(&mut self, text: &str, x: i32, y: i32) {
        let style = MonoTextStyle::new(&FONT_6X10, BinaryColor::On);
        let _ = Text::with_baseline(text, Point::new(x, y), style, Baseline::Top).draw(self);
    }
}

impl Default for Frame {
    fn default() -> Self {
        Self::new()
    }
}

impl OriginDimensions for Frame {
    fn size(&self) -> Size {
        Size::new(WIDTH as u32, HEIGHT as u32)
    }
}

impl DrawTarget for Frame {
    type Color = BinaryColor;
    type Error = Infallible;

    fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        for Pixel(point, color) in pixels {
            self.set_pixel(point.x, point.y, color.is_on());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_layout() {
        let mut frame = Frame::new();
        frame.set_pixel(3, 0, true);
        frame.set_pixel(3, 9, true);
        assert_eq!(frame.as_bytes()[3], 0x01);
        assert_eq!(frame.as_bytes()[WIDTH + 3], 0x02);

        frame.set_pixel(3, 9, false);
        assert_eq!(frame.as_bytes()[WIDTH + 3], 0x00);
    }

    #[test]
    fn test_out_of_bounds_ignored() {
        let mut frame = Frame::new();
        frame.set_pixel(-1, 0, true);
        frame.set_pixel(0, 64, true);
        frame.set_pixel(128, 5, true);
        assert!(frame.as_bytes().iter().all(|b| *b == 0));
    }

    #[test]
    fn test_text_stays_in_band() {
        let mut frame = Frame::new();
        frame.draw_text("Started", 2, 37);

        let lit = |rows: core::ops::Range<usize>| {
            rows.flat_map(|y| (0..WIDTH).map(move |x| (x, y)))
                .filter(|&(x, y)| frame.pixel(x, y))
                .count()
        };
        assert!(lit(37..47) > 0);
        assert_eq!(lit(0..37), 0);
        assert_eq!(lit(47..HEIGHT), 0);
        // Seven glyphs of six pixels starting at x = 2
        assert!((0..HEIGHT).all(|y| !frame.pixel(0, y) && !frame.pixel(1, y)));
        assert!((0..HEIGHT).all(|y| !frame.pixel(44, y)));
    }

    #[test]
    fn test_clear() {
        let mut frame = Frame::new();
        frame.draw_text("X", 0, 0);
        frame.clear();
        assert!(frame.as_bytes().iter().all(|b| *b == 0));
    }
}
