mod camera;
pub mod clipper;
mod config;
mod error;
mod executor;
pub mod math;
pub mod rasterizer;
mod renderer;
mod scene;
mod stats;

pub use camera::*;
pub use config::*;
pub use error::*;
pub use executor::*;
pub use rasterizer::{DepthBuffer, Frame, ImageTexture, Texture};
pub use renderer::*;
pub use scene::*;
pub use stats::*;

/// A general progress callback function to give updates on the progress.
///
/// # Arguments
/// * `current_stage` - The current stage of the progress starting at 0.
/// * `total_stages` - The total number of stages.
/// * `progress` - The progress of the current stage in percent.
/// * `msg` - The message to display.
pub type ProgressCallback = fn(current_stage: usize, total_stages: usize, progress: f32, msg: &str);
