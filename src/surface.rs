//! CPU Pixel Buffer
//!
//! RGBA8 pixel storage the picker paints into before the frame is uploaded
//! to the GPU. Rows are stored top to bottom, four bytes per pixel.

use crate::color::Rgb;

pub struct PixelBuffer {
    width: u32,
    height: u32,
    data: Vec<u8>,
}

impl PixelBuffer {
    /// Create a zeroed (transparent black) buffer
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            data: vec![0; width as usize * height as usize * 4],
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Raw RGBA bytes, ready for texture upload
    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    pub fn as_bytes_mut(&mut self) -> &mut [u8] {
        &mut self.data
    }

    #[inline]
    fn in_bounds(&self, x: u32, y: u32) -> bool {
        x < self.width && y < self.height
    }

    #[inline]
    fn offset(&self, x: u32, y: u32) -> usize {
        (y as usize * self.width as usize + x as usize) * 4
    }

    pub fn get_pixel(&self, x: u32, y: u32) -> Option<Rgb> {
        if !self.in_bounds(x, y) {
            return None;
        }
        let i = self.offset(x, y);
        Some(Rgb::new(self.data[i], self.data[i + 1], self.data[i + 2]))
    }

    /// Write an opaque pixel. Out of bounds writes are ignored.
    #[inline]
    pub fn put_pixel(&mut self, x: u32, y: u32, color: Rgb) {
        if !self.in_bounds(x, y) {
            return;
        }
        let i = self.offset(x, y);
        self.data[i..i + 4].copy_from_slice(&color.to_rgba());
    }

    /// Read the pixel under a pointer position.
    ///
    /// Fractional coordinates are floored. The far edges (`x == width`,
    /// `y == height`) are valid pointer positions and map onto the last
    /// column/row.
    pub fn sample(&self, x: f32, y: f32) -> Option<Rgb> {
        if self.width == 0 || self.height == 0 {
            return None;
        }
        if !(0.0..=self.width as f32).contains(&x) || !(0.0..=self.height as f32).contains(&y) {
            return None;
        }
        let px = (x.floor() as u32).min(self.width - 1);
        let py = (y.floor() as u32).min(self.height - 1);
        self.get_pixel(px, py)
    }

    /// Find the first pixel (row-major order) holding `color`
    pub fn find_color(&self, color: Rgb) -> Option<(u32, u32)> {
        let needle = [color.r, color.g, color.b];
        let index = self
            .data
            .chunks_exact(4)
            .position(|pixel| pixel[..3] == needle)?;
        let width = self.width as usize;
        Some(((index % width) as u32, (index / width) as u32))
    }

    /// Copy another buffer into this one with its top-left corner at `(x, y)`.
    /// Parts falling outside this buffer are clipped.
    pub fn blit_from(&mut self, src: &PixelBuffer, x: u32, y: u32) {
        if x >= self.width || y >= self.height {
            return;
        }
        let copy_w = src.width.min(self.width - x) as usize;
        let copy_h = src.height.min(self.height - y);
        for row in 0..copy_h {
            let src_start = src.offset(0, row);
            let dst_start = self.offset(x, y + row);
            self.data[dst_start..dst_start + copy_w * 4]
                .copy_from_slice(&src.data[src_start..src_start + copy_w * 4]);
        }
    }
}
