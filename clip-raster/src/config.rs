use log::{error, info};
use serde::{Deserialize, Serialize};

use crate::{rasterizer::ImageTexture, Color, Error, RenderSettings, Result};

/// The configuration for rendering the cube animation
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RenderConfig {
    /// The width of the frame in pixels
    pub width: usize,

    /// The height of the frame in pixels
    pub height: usize,

    /// The number of frames of the animation
    pub num_frames: usize,

    /// The render setups. Each setup renders the whole animation into its own directory.
    pub setups: Vec<RenderSettings>,

    #[serde(default)]
    pub camera: CameraConfig,

    #[serde(default)]
    pub cube: CubeConfig,

    #[serde(default)]
    pub texture: TextureSource,

    /// Should the depth buffer be written as image next to each frame
    #[serde(default)]
    pub write_depth: bool,
}

impl RenderConfig {
    /// Reads the configuration from the provided reader.
    ///
    /// # Arguments
    /// * `reader` - The reader to read the configuration from.
    pub fn read<R: std::io::Read>(reader: R) -> Result<Self> {
        // deserialize into the render config
        let config: RenderConfig = serde_yaml::from_reader(reader).map_err(|e| {
            error!("Failed to parse the configuration: {:?}", e);

            Error::DeserializationError(Box::new(e))
        })?;

        Ok(config)
    }

    /// Writes the configuration to the provided writer.
    ///
    /// # Arguments
    /// * `writer` - The writer to write the configuration to.
    pub fn write<W: std::io::Write>(&self, mut writer: W) -> Result<()> {
        // serialize the configuration into a string
        let yaml = serde_yaml::to_string(&self).map_err(|e| {
            error!("Failed to serialize the configuration: {:?}", e);

            Error::SerializationError(Box::new(e))
        })?;

        // write the string to the writer
        writer.write_all(yaml.as_bytes())?;

        Ok(())
    }
}

/// The direction the camera moves in every frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
pub enum Movement {
    /// Towards the cube
    Forward,

    /// Away from the cube
    Backward,

    #[default]
    Still,
}

/// The camera looking along the negative z-axis onto the cube.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct CameraConfig {
    /// The vertical field of view in degrees
    pub fov_degrees: f32,

    /// The distance of the near plane
    pub near: f32,

    /// The distance of the far plane
    pub far: f32,

    /// The z-offset of the cube in the first frame
    pub start_z: f32,

    /// The change of the z-offset per frame
    pub z_step: f32,

    /// The z-offset is kept below this limit
    pub z_max: f32,

    pub movement: Movement,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            fov_degrees: 90f32,
            near: 0.1f32,
            far: 1000f32,
            start_z: -200f32,
            z_step: 4f32,
            z_max: -128f32,
            movement: Movement::Still,
        }
    }
}

/// The animated cube
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct CubeConfig {
    /// Half of the edge length of the cube
    pub half_size: f32,

    /// The rotation around the x- and y-axis per frame in degrees
    pub rotation_step_degrees: f32,
}

impl Default for CubeConfig {
    fn default() -> Self {
        Self {
            half_size: 64f32,
            rotation_step_degrees: 1f32,
        }
    }
}

/// Where the texture for the textured render modes comes from.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(tag = "type")]
pub enum TextureSource {
    /// A generated black and white checkerboard
    Checkerboard { size: usize, tiles: usize },

    /// An image file
    File { path: String },
}

impl Default for TextureSource {
    fn default() -> Self {
        TextureSource::Checkerboard { size: 64, tiles: 8 }
    }
}

impl TextureSource {
    /// Creates the texture described by the source.
    pub fn load(&self) -> Result<ImageTexture> {
        match self {
            TextureSource::Checkerboard { size, tiles } => {
                info!("Generating {}x{} checkerboard texture...", size, size);
                ImageTexture::checkerboard(*size, *tiles, Color::WHITE, Color::BLACK)
            }
            TextureSource::File { path } => {
                info!("Loading texture '{}'...", path);
                ImageTexture::from_file(path)
            }
        }
    }
}
