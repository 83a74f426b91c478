use std::path::Path;

use image::{ImageBuffer, Rgb, RgbImage};

use crate::color::Color;
use crate::error::Result;

/// Position of pixel (x, y) in a row-major buffer, computed in `usize` so large
/// canvases do not wrap
fn pixel_index(width: u32, x: u32, y: u32) -> usize {
    y as usize * width as usize + x as usize
}

/// Finished image in linear float colors. Row 0 is the top of the image.
#[derive(Clone, Debug)]
pub struct Canvas {
    pixels: Vec<Color>,
    width: u32,
    height: u32,
}

impl Canvas {
    pub fn new(width: u32, height: u32, fill: Color) -> Canvas {
        Canvas {
            pixels: vec![fill; width as usize * height as usize],
            width,
            height,
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn pixel(&self, x: u32, y: u32) -> Color {
        self.pixels[pixel_index(self.width, x, y)]
    }

    pub fn set_pixel(&mut self, x: u32, y: u32, c: Color) {
        self.pixels[pixel_index(self.width, x, y)] = c;
    }

    pub fn update_row(&mut self, y: u32, row: &[Color]) {
        let start = pixel_index(self.width, 0, y);
        self.pixels[start..start + row.len()].copy_from_slice(row);
    }

    pub fn to_image(&self) -> RgbImage {
        ImageBuffer::from_fn(self.width, self.height, |x, y| {
            Rgb(self.pixel(x, y).to_rgb8())
        })
    }

    pub fn save_png(&self, path: &Path) -> Result<()> {
        self.to_image().save(path)?;
        Ok(())
    }
}
