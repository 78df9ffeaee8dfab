use std::path::Path;

use image::DynamicImage;
use log::{debug, error};

use crate::{Color, Error, Result};

/// A texture that can be sampled with nearest-neighbor lookups.
pub trait Texture {
    /// Returns the width of the texture in texels.
    fn width(&self) -> usize;

    /// Returns the height of the texture in texels.
    fn height(&self) -> usize;

    /// Returns the texel in the given column and row. Row 0 is the top of the image.
    fn pixel_at(&self, x: usize, y: usize) -> Color;

    /// Samples the texture at the given texture coordinate.
    ///
    /// The coordinate (0, 0) is the bottom-left corner of the image and (1, 1) the top-right.
    /// Coordinates outside of [0, 1) wrap around, s.t. the texture repeats in both directions.
    ///
    /// # Arguments
    /// * `u` - The horizontal texture coordinate.
    /// * `v` - The vertical texture coordinate.
    fn pixel_at_uv(&self, u: f32, v: f32) -> Color {
        let (w, h) = (self.width() as i64, self.height() as i64);
        debug_assert!(w > 0 && h > 0);

        let x = ((u * w as f32).floor() as i64).rem_euclid(w);
        let y = ((v * h as f32).floor() as i64).rem_euclid(h);

        self.pixel_at(x as usize, (h - 1 - y) as usize)
    }
}

/// A texture whose texels are held in memory.
#[derive(Debug, Clone)]
pub struct ImageTexture {
    width: usize,
    height: usize,

    /// The texels stored row by row from top to bottom.
    texels: Vec<Color>,
}

impl ImageTexture {
    /// Creates a new texture from the given texels.
    ///
    /// # Arguments
    /// * `width` - The width of the texture. Must be positive.
    /// * `height` - The height of the texture. Must be positive.
    /// * `texels` - The texels row by row from top to bottom.
    pub fn new(width: usize, height: usize, texels: Vec<Color>) -> Result<Self> {
        if width == 0 || height == 0 {
            error!("Texture size {}x{} is empty", width, height);
            return Err(Error::InvalidTexture(format!(
                "Texture size {}x{} is empty",
                width, height
            )));
        }

        if texels.len() != width * height {
            error!(
                "Expected {} texels, but got {}",
                width * height,
                texels.len()
            );
            return Err(Error::InvalidTexture(format!(
                "Expected {} texels for {}x{}, but got {}",
                width * height,
                width,
                height,
                texels.len()
            )));
        }

        Ok(Self {
            width,
            height,
            texels,
        })
    }

    /// Creates a square checkerboard texture.
    ///
    /// # Arguments
    /// * `size` - The edge length of the texture in texels.
    /// * `tiles` - The number of tiles per row and column.
    /// * `a` - The color of the tile in the top-left corner.
    /// * `b` - The second tile color.
    pub fn checkerboard(size: usize, tiles: usize, a: Color, b: Color) -> Result<Self> {
        let tile_size = (size / tiles.max(1)).max(1);

        let texels = (0..size * size)
            .map(|i| {
                let (x, y) = (i % size, i / size);
                if (x / tile_size + y / tile_size) % 2 == 0 {
                    a
                } else {
                    b
                }
            })
            .collect();

        Self::new(size, size, texels)
    }

    /// Converts the given decoded image into a texture.
    pub fn from_image(img: &DynamicImage) -> Result<Self> {
        let rgba = img.to_rgba8();
        let (width, height) = rgba.dimensions();

        let texels = rgba
            .pixels()
            .map(|p| Color::new(p[0], p[1], p[2], p[3]))
            .collect();

        Self::new(width as usize, height as usize, texels)
    }

    /// Loads the texture from the given image file.
    ///
    /// # Arguments
    /// * `path` - The path of a PNG, JPEG or BMP image.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let img = image::open(path).map_err(|err| {
            error!("Failed to load texture {}: {}", path.display(), err);
            Error::Image(err)
        })?;

        let texture = Self::from_image(&img)?;
        debug!(
            "Loaded texture {} ({}x{})",
            path.display(),
            texture.width,
            texture.height
        );

        Ok(texture)
    }

    /// Decodes the texture from the given encoded image bytes.
    pub fn from_memory(bytes: &[u8]) -> Result<Self> {
        let img = image::load_from_memory(bytes)?;

        Self::from_image(&img)
    }
}

impl Texture for ImageTexture {
    #[inline]
    fn width(&self) -> usize {
        self.width
    }

    #[inline]
    fn height(&self) -> usize {
        self.height
    }

    #[inline]
    fn pixel_at(&self, x: usize, y: usize) -> Color {
        self.texels[y * self.width + x]
    }
}

#[cfg(test)]
mod test {
    use super::*;

    /// Creates a texture where every texel encodes its own column and row.
    fn create_coordinate_texture(width: usize, height: usize) -> ImageTexture {
        let texels = (0..width * height)
            .map(|i| Color::new((i % width) as u8, (i / width) as u8, 0, 255))
            .collect();

        ImageTexture::new(width, height, texels).unwrap()
    }

    #[test]
    fn test_invalid_texture() {
        assert!(ImageTexture::new(0, 4, Vec::new()).is_err());
        assert!(ImageTexture::new(2, 2, vec![Color::RED; 3]).is_err());
        assert!(ImageTexture::new(2, 2, vec![Color::RED; 4]).is_ok());
    }

    #[test]
    fn test_checkerboard() {
        let t = ImageTexture::checkerboard(8, 4, Color::WHITE, Color::BLACK).unwrap();

        assert_eq!(t.pixel_at(0, 0), Color::WHITE);
        assert_eq!(t.pixel_at(1, 1), Color::WHITE);
        assert_eq!(t.pixel_at(2, 0), Color::BLACK);
        assert_eq!(t.pixel_at(0, 2), Color::BLACK);
        assert_eq!(t.pixel_at(2, 2), Color::WHITE);
    }

    #[test]
    fn test_v_is_flipped() {
        let t = create_coordinate_texture(4, 4);

        // v = 0 is the bottom row of the image
        assert_eq!(t.pixel_at_uv(0.0, 0.0), t.pixel_at(0, 3));
        assert_eq!(t.pixel_at_uv(0.99, 0.99), t.pixel_at(3, 0));
        assert_eq!(t.pixel_at_uv(0.5, 0.5), t.pixel_at(2, 1));
    }

    #[test]
    fn test_wrapping() {
        let t = create_coordinate_texture(64, 64);

        assert_eq!(t.pixel_at_uv(1.3, 0.5), t.pixel_at_uv(0.3, 0.5));
        assert_eq!(t.pixel_at_uv(-0.2, 0.5), t.pixel_at_uv(0.8, 0.5));
        assert_eq!(t.pixel_at_uv(0.5, 1.3), t.pixel_at_uv(0.5, 0.3));
        assert_eq!(t.pixel_at_uv(0.5, -0.2), t.pixel_at_uv(0.5, 0.8));
        assert_eq!(t.pixel_at_uv(-3.0, -3.0), t.pixel_at_uv(0.0, 0.0));
        assert_eq!(t.pixel_at_uv(1.0, 0.0), t.pixel_at_uv(0.0, 0.0));
    }

    #[test]
    fn test_from_memory() {
        let img = image::RgbaImage::from_fn(3, 2, |x, y| image::Rgba([x as u8, y as u8, 7, 255]));

        let mut bytes = Vec::new();
        DynamicImage::ImageRgba8(img)
            .write_to(
                &mut std::io::Cursor::new(&mut bytes),
                image::ImageFormat::Png,
            )
            .unwrap();

        let t = ImageTexture::from_memory(&bytes).unwrap();
        assert_eq!(t.width(), 3);
        assert_eq!(t.height(), 2);
        assert_eq!(t.pixel_at(2, 1), Color::new(2, 1, 7, 255));

        assert!(ImageTexture::from_memory(&[1, 2, 3]).is_err());
    }
}
