use std::io::{BufWriter, Read, Write};

use log::{debug, error};

use crate::{Color, Error, Result};

/// The RGBA pixel buffer the rasterizer draws into.
#[derive(Clone)]
pub struct Frame {
    width: usize,
    height: usize,

    /// The pixels stored row by row from top to bottom with 4 bytes per pixel in RGBA order.
    pixels: Vec<u8>,
}

impl Frame {
    /// Creates a new frame with the given width and height where all pixels are transparent black.
    ///
    /// # Arguments
    /// * `width` - The width of the frame.
    /// * `height` - The height of the frame.
    pub fn new_empty(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            pixels: vec![0u8; width * height * 4],
        }
    }

    /// Returns the width of the frame.
    #[inline]
    pub fn get_width(&self) -> usize {
        self.width
    }

    /// Returns the height of the frame.
    #[inline]
    pub fn get_height(&self) -> usize {
        self.height
    }

    /// Returns the RGBA bytes of the frame.
    #[inline]
    pub fn get_pixels(&self) -> &[u8] {
        &self.pixels
    }

    /// Sets all pixels to the given color.
    pub fn clear(&mut self, color: Color) {
        let bytes = color.to_bytes();
        for pixel in self.pixels.chunks_exact_mut(4) {
            pixel.copy_from_slice(&bytes);
        }
    }

    /// Sets the pixel at the given position. The position must be within the frame.
    ///
    /// # Arguments
    /// * `x` - The x-coordinate of the pixel.
    /// * `y` - The y-coordinate of the pixel.
    /// * `color` - The new color of the pixel.
    #[inline]
    pub fn set_pixel(&mut self, x: usize, y: usize, color: Color) {
        debug_assert!(x < self.width && y < self.height);

        let index = (y * self.width + x) * 4;
        self.pixels[index..index + 4].copy_from_slice(&color.to_bytes());
    }

    /// Returns the pixel at the given position. The position must be within the frame.
    #[inline]
    pub fn get_pixel(&self, x: usize, y: usize) -> Color {
        debug_assert!(x < self.width && y < self.height);

        let index = (y * self.width + x) * 4;
        let p = &self.pixels[index..index + 4];

        Color::from_bytes([p[0], p[1], p[2], p[3]])
    }

    /// Sets the pixel at the given position and fails if the position is outside of the frame.
    pub fn try_set_pixel(&mut self, x: i64, y: i64, color: Color) -> Result<()> {
        let (x, y) = self.check_bounds(x, y)?;
        self.set_pixel(x, y, color);

        Ok(())
    }

    /// Returns the pixel at the given position and fails if the position is outside of the frame.
    pub fn try_get_pixel(&self, x: i64, y: i64) -> Result<Color> {
        let (x, y) = self.check_bounds(x, y)?;

        Ok(self.get_pixel(x, y))
    }

    fn check_bounds(&self, x: i64, y: i64) -> Result<(usize, usize)> {
        if x < 0 || y < 0 || x as usize >= self.width || y as usize >= self.height {
            return Err(Error::OutOfBounds {
                x,
                y,
                width: self.width,
                height: self.height,
            });
        }

        Ok((x as usize, y as usize))
    }

    /// Writes the frame as binary PPM (P6). The alpha channel is dropped.
    ///
    /// # Arguments
    /// * `writer` - The writer to which the frame will be serialized.
    pub fn write_as_ppm<W: Write>(&self, writer: W) -> Result<()> {
        let mut out = BufWriter::new(writer);

        debug!("Writing {}x{} frame as PPM", self.width, self.height);

        writeln!(out, "P6")?;
        writeln!(out, "{} {}", self.get_width(), self.get_height())?;
        writeln!(out, "255")?;

        for pixel in self.pixels.chunks_exact(4) {
            out.write_all(&pixel[..3])?;
        }

        out.flush()?;

        Ok(())
    }

    /// Writes the frame as plain text PPM (P3). The alpha channel is dropped.
    ///
    /// # Arguments
    /// * `writer` - The writer to which the frame will be serialized.
    pub fn write_as_ascii_ppm<W: Write>(&self, writer: W) -> Result<()> {
        let mut out = BufWriter::new(writer);

        writeln!(out, "P3")?;
        writeln!(out, "{} {}", self.get_width(), self.get_height())?;
        writeln!(out, "255")?;

        self.pixels
            .chunks_exact(4)
            .enumerate()
            .try_for_each(|(index, p)| -> std::io::Result<()> {
                write!(out, "{} {} {} ", p[0], p[1], p[2])?;

                if (index + 1) % self.get_width() == 0 {
                    writeln!(out)?;
                }

                Ok(())
            })?;

        out.flush()?;

        Ok(())
    }

    /// Writes the frame as binary data.
    ///
    /// # Arguments
    /// * `w` - The writer to which the frame will be serialized as binary data.
    pub fn write_binary<W: Write>(&self, mut w: W) -> Result<()> {
        let width = self.get_width() as u32;
        let height = self.get_height() as u32;

        w.write_all(&width.to_le_bytes())?;
        w.write_all(&height.to_le_bytes())?;
        w.write_all(&self.pixels)?;

        Ok(())
    }

    /// Reads the frame from binary data.
    ///
    /// # Arguments
    /// * `r` - The reader from which the frame will be deserialized.
    pub fn read_binary<R: Read>(mut r: R) -> Result<Self> {
        let mut buffer = [0u8; 4];

        r.read_exact(&mut buffer)?;
        let width = u32::from_le_bytes(buffer) as usize;

        r.read_exact(&mut buffer)?;
        let height = u32::from_le_bytes(buffer) as usize;

        let num_bytes = width
            .checked_mul(height)
            .and_then(|n| n.checked_mul(4))
            .ok_or_else(|| {
                error!("Frame size {}x{} is too large", width, height);
                Error::InvalidFrame(format!("Frame size {}x{} is too large", width, height))
            })?;

        // the header is not trusted, so the buffer only grows with the data actually read
        let mut pixels = Vec::new();
        r.take(num_bytes as u64).read_to_end(&mut pixels)?;

        if pixels.len() != num_bytes {
            error!(
                "Frame {}x{} needs {} bytes, but only {} are available",
                width,
                height,
                num_bytes,
                pixels.len()
            );
            return Err(Error::InvalidFrame(format!(
                "Expected {} bytes of pixel data, but got {}",
                num_bytes,
                pixels.len()
            )));
        }

        Ok(Self {
            width,
            height,
            pixels,
        })
    }
}
