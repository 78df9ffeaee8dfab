use log::trace;
use nalgebra_glm::{perspective, translate, Mat4, Vec3};

use crate::{CameraConfig, Movement};

/// A camera at the origin looking along the negative z-axis. The scene is moved along z instead
/// of the camera.
#[derive(Debug, Clone)]
pub struct Camera {
    config: CameraConfig,

    /// The current z-offset of the scene
    z: f32,
}

impl Camera {
    /// Creates a new camera with the scene at the configured start offset.
    pub fn new(config: CameraConfig) -> Self {
        let z = config.start_z;

        Self { config, z }
    }

    /// Returns the current z-offset of the scene.
    #[inline]
    pub fn z(&self) -> f32 {
        self.z
    }

    /// Moves the scene by one step in the configured direction. A step is only taken if the new
    /// offset stays below the configured limit.
    pub fn advance(&mut self) {
        let new_z = match self.config.movement {
            Movement::Forward => self.z + self.config.z_step,
            Movement::Backward => self.z - self.config.z_step,
            Movement::Still => return,
        };

        if new_z < self.config.z_max {
            self.z = new_z;
            trace!("Camera moved to z={}", self.z);
        }
    }

    /// Moves the scene back to the start offset.
    pub fn reset(&mut self) {
        self.z = self.config.start_z;
    }

    /// Returns the matrix that moves the scene in front of the camera.
    pub fn view_matrix(&self) -> Mat4 {
        translate(&Mat4::identity(), &Vec3::new(0f32, 0f32, self.z))
    }

    /// Returns the perspective projection matrix.
    ///
    /// # Arguments
    /// * `width` - The width of the frame in pixels.
    /// * `height` - The height of the frame in pixels.
    pub fn projection_matrix(&self, width: usize, height: usize) -> Mat4 {
        let aspect = width as f32 / height.max(1) as f32;

        perspective(
            aspect,
            self.config.fov_degrees.to_radians(),
            self.config.near,
            self.config.far,
        )
    }

    /// Returns the model-view-projection matrix for an object at the origin.
    pub fn mvp(&self, width: usize, height: usize) -> Mat4 {
        self.projection_matrix(width, height) * self.view_matrix()
    }
}
