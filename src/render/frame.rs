use crate::foundation::core::Rgb;
use crate::foundation::error::{StrataError, StrataResult};

/// An RGBA8 frame in row-major order, top row first.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FrameRGBA {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// `width * height * 4` bytes.
    pub data: Vec<u8>,
    /// Whether color channels are premultiplied by alpha.
    pub premultiplied: bool,
}

impl FrameRGBA {
    /// Transparent black frame with straight alpha.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            data: vec![0; width as usize * height as usize * 4],
            premultiplied: false,
        }
    }

    /// Frame filled with one pixel value.
    pub fn filled(width: u32, height: u32, rgba: [u8; 4]) -> Self {
        let mut frame = Self::new(width, height);
        frame.clear(rgba);
        frame
    }

    /// Overwrite every pixel.
    pub fn clear(&mut self, rgba: [u8; 4]) {
        for px in self.data.chunks_exact_mut(4) {
            px.copy_from_slice(&rgba);
        }
    }

    /// Change dimensions, discarding contents.
    pub fn resize(&mut self, width: u32, height: u32) {
        self.width = width;
        self.height = height;
        self.data.clear();
        self.data.resize(width as usize * height as usize * 4, 0);
    }

    /// Check the buffer length against the dimensions.
    pub fn validate(&self) -> StrataResult<()> {
        let expected = self.width as usize * self.height as usize * 4;
        if self.data.len() != expected {
            return Err(StrataError::render(format!(
                "frame {}x{} holds {} bytes, expected {expected}",
                self.width,
                self.height,
                self.data.len()
            )));
        }
        Ok(())
    }

    /// Return `true` when both frames have the same dimensions.
    pub fn same_size(&self, other: &Self) -> bool {
        self.width == other.width && self.height == other.height
    }

    fn offset(&self, x: u32, y: u32) -> usize {
        (y as usize * self.width as usize + x as usize) * 4
    }

    /// Pixel at `(x, y)`. Panics when out of bounds.
    pub fn pixel(&self, x: u32, y: u32) -> [u8; 4] {
        let i = self.offset(x, y);
        [self.data[i], self.data[i + 1], self.data[i + 2], self.data[i + 3]]
    }

    /// Write the pixel at `(x, y)`. Panics when out of bounds.
    pub fn put(&mut self, x: u32, y: u32, rgba: [u8; 4]) {
        let i = self.offset(x, y);
        self.data[i..i + 4].copy_from_slice(&rgba);
    }

    /// Nearest sample at texture coordinates with `v` pointing up, clamped to the edges.
    pub fn sample_uv(&self, u: f32, v: f32) -> [u8; 4] {
        if self.width == 0 || self.height == 0 {
            return [0; 4];
        }
        let x = (u * self.width as f32).floor().clamp(0.0, (self.width - 1) as f32) as u32;
        let y = ((1.0 - v) * self.height as f32)
            .floor()
            .clamp(0.0, (self.height - 1) as f32) as u32;
        self.pixel(x, y)
    }
}

/// Quantize a color and alpha to straight RGBA8.
pub fn to_rgba8(c: Rgb, alpha: f32) -> [u8; 4] {
    let [r, g, b] = c.to_u8();
    [r, g, b, (alpha.clamp(0.0, 1.0) * 255.0).round() as u8]
}
