use std::io::{BufWriter, Write};

use log::debug;

use crate::{Error, Result};

/// Per pixel depth of the nearest surface written so far.
///
/// The stored depth is the clip-space w of the surface, i.e., the distance to the camera along the
/// view direction. Cells that have not been written since the last clear hold [`DepthBuffer::EMPTY`].
#[derive(Clone)]
pub struct DepthBuffer {
    width: usize,
    height: usize,
    depths: Vec<f32>,
}

impl DepthBuffer {
    /// The depth of a cell nothing has been written to. Every finite depth is nearer.
    pub const EMPTY: f32 = f32::INFINITY;

    /// Creates a new cleared depth buffer.
    ///
    /// # Arguments
    /// * `width` - The width of the depth buffer in pixels.
    /// * `height` - The height of the depth buffer in pixels.
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            depths: vec![Self::EMPTY; width * height],
        }
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    /// Returns the depths stored row by row.
    #[inline]
    pub fn depths(&self) -> &[f32] {
        &self.depths
    }

    /// Resets all cells to [`DepthBuffer::EMPTY`].
    #[inline]
    pub fn clear(&mut self) {
        self.clear_to(Self::EMPTY);
    }

    /// Resets all cells to the given value.
    #[inline]
    pub fn clear_to(&mut self, value: f32) {
        self.depths.fill(value);
    }

    /// Returns the depth at the given position. The caller is responsible for the position being
    /// within the buffer.
    #[inline]
    pub fn get(&self, x: usize, y: usize) -> f32 {
        debug_assert!(x < self.width && y < self.height);
        self.depths[y * self.width + x]
    }

    /// Sets the depth at the given position. The caller is responsible for the position being
    /// within the buffer.
    #[inline]
    pub fn set(&mut self, x: usize, y: usize, depth: f32) {
        debug_assert!(x < self.width && y < self.height);
        self.depths[y * self.width + x] = depth;
    }

    /// Returns the depth at the given position or an error if it is outside of the buffer.
    pub fn try_get(&self, x: i64, y: i64) -> Result<f32> {
        let (x, y) = self.check_bounds(x, y)?;

        Ok(self.get(x, y))
    }

    /// Sets the depth at the given position or returns an error if it is outside of the buffer.
    pub fn try_set(&mut self, x: i64, y: i64, depth: f32) -> Result<()> {
        let (x, y) = self.check_bounds(x, y)?;
        self.set(x, y, depth);

        Ok(())
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

    /// Writes the depth buffer as PGM file with gray colors. Nearer surfaces are brighter and
    /// empty cells are black.
    ///
    /// # Arguments
    /// * `writer` - The writer to which the depth-buffer will be serialized as PGM.
    pub fn write_as_pgm<W: Write>(&self, writer: W) -> Result<()> {
        let mut out = BufWriter::new(writer);

        // determine min/max of the written cells
        let (min, max) = self
            .depths
            .iter()
            .filter(|d| d.is_finite())
            .fold((f32::MAX, f32::MIN), |(min, max), d| (min.min(*d), max.max(*d)));

        debug!("Writing depth buffer: Min/Max={}/{}", min, max);

        writeln!(out, "P2")?;
        writeln!(out, "{} {}", self.width, self.height)?;
        writeln!(out, "255")?;

        self.depths
            .iter()
            .map(|depth| {
                if !depth.is_finite() {
                    0u32
                } else if max > min {
                    ((1f32 - ((*depth - min) / (max - min))) * 254f32).round() as u32 + 1
                } else {
                    128u32
                }
            })
            .enumerate()
            .try_for_each(|(index, value)| -> std::io::Result<()> {
                write!(out, "{} ", value)?;

                if (index + 1) % self.width == 0 {
                    writeln!(out)?;
                }

                Ok(())
            })?;

        out.flush()?;

        Ok(())
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_clear_get_set() {
        let mut d = DepthBuffer::new(3, 2);
        assert!(d.depths().iter().all(|v| *v == DepthBuffer::EMPTY));

        d.set(2, 1, 4.5);
        assert_eq!(d.get(2, 1), 4.5);
        assert_eq!(d.try_get(2, 1).unwrap(), 4.5);

        d.clear_to(0.0);
        assert!(d.depths().iter().all(|v| *v == 0.0));

        d.clear();
        assert_eq!(d.get(2, 1), DepthBuffer::EMPTY);
    }

    #[test]
    fn test_bounds_checks() {
        let mut d = DepthBuffer::new(3, 2);

        assert!(d.try_set(3, 0, 1.0).is_err());
        assert!(d.try_set(0, 2, 1.0).is_err());
        assert!(d.try_get(-1, 0).is_err());
        assert!(matches!(
            d.try_get(0, -5),
            Err(Error::OutOfBounds { y: -5, .. })
        ));

        d.try_set(1, 1, 2.0).unwrap();
        assert_eq!(d.get(1, 1), 2.0);
    }

    #[test]
    fn test_write_as_pgm() {
        let mut d = DepthBuffer::new(2, 2);
        d.set(0, 0, 1.0);
        d.set(1, 0, 3.0);
        d.set(0, 1, 2.0);

        let mut buffer = Vec::new();
        d.write_as_pgm(&mut buffer).unwrap();

        let text = String::from_utf8(buffer).unwrap();
        assert_eq!(text, "P2\n2 2\n255\n255 1 \n128 0 \n");
    }
}
