use std::{
    fs::File,
    path::{Path, PathBuf},
};

use log::{debug, info};

use crate::{
    create_cube,
    rasterizer::{ImageTexture, Texture},
    Camera, Error, ProgressCallback, RenderConfig, RenderSettings, RenderStats, Renderer, Result,
    StatsNode, StatsNodeTrait,
};

/// An executor for rendering the configured cube animation with every configured setup.
pub struct RenderExecutor {
    config: RenderConfig,
    texture: Option<ImageTexture>,
    out_dir: PathBuf,
}

impl RenderExecutor {
    /// Creates a new render executor.
    ///
    /// # Arguments
    /// * `config` - The render configuration.
    /// * `texture` - Optionally, a texture that is used instead of the configured texture.
    /// * `out_dir` - The output directory.
    pub fn new(config: RenderConfig, texture: Option<ImageTexture>, out_dir: PathBuf) -> Self {
        Self {
            config,
            texture,
            out_dir,
        }
    }

    /// Runs the render executor and returns the accumulated stats over all setups.
    ///
    /// # Arguments
    /// * `s` - The stats node to write the timings to.
    pub fn run(&self, s: StatsNode) -> Result<RenderStats> {
        info!("Num Setups: {}", self.config.setups.len());
        info!("Num Frames: {}", self.config.num_frames);
        info!("Frame Size: {}x{}", self.config.width, self.config.height);

        info!("Initialize the render executor...");
        let texture = self.initialize().map_err(|err| {
            log::error!("Failed to initialize the render executor: {:?}", err);
            err
        })?;

        let mut total = RenderStats::default();
        for (index, setup) in self.config.setups.iter().enumerate() {
            info!(
                "Rendering setup {}/{} ({})...",
                index + 1,
                self.config.setups.len(),
                setup.mode.name()
            );

            let texture = texture.as_ref().map(|t| t as &dyn Texture);
            match self.render_setup(index, setup, texture, s.clone(), Self::print_progress) {
                Ok(stats) => total += stats,
                Err(err) => {
                    log::error!("Failed to render setup {}: {:?}", index, err);
                }
            }
        }

        Ok(total)
    }

    /// Renders the whole animation with the given setup.
    ///
    /// # Arguments
    /// * `index` - The index of the setup.
    /// * `setup` - The render settings of the setup.
    /// * `texture` - The texture for the textured render modes, if any setup needs one.
    /// * `s` - The stats node to write the timings to.
    /// * `progress` - The callback for reporting the rendered frames.
    fn render_setup(
        &self,
        index: usize,
        setup: &RenderSettings,
        texture: Option<&dyn Texture>,
        s: StatsNode,
        progress: ProgressCallback,
    ) -> Result<RenderStats> {
        let setup_name = format!("setup_{}_{}", index, setup.mode.name());
        let s = s.get_child(&setup_name);
        let _t = s.register_timing();

        // make sure the directory for the setup exists
        let setup_dir = self.out_dir.join(&setup_name);
        std::fs::create_dir_all(&setup_dir).map_err(|err| {
            log::error!("Failed to create the setup directory: {:?}", err);
            Error::Io(err)
        })?;

        let (width, height) = (self.config.width, self.config.height);
        let frame_stats = s.get_child("frame");
        let mut renderer = Renderer::new(width, height, frame_stats.clone());
        let mut camera = Camera::new(self.config.camera.clone());

        let step = self.config.cube.rotation_step_degrees;
        let mut angle = 0f32;

        let mut stats = RenderStats::default();
        for frame_index in 0..self.config.num_frames {
            let mesh = create_cube(
                self.config.cube.half_size,
                angle.to_radians(),
                angle.to_radians(),
            );

            {
                let _t = frame_stats.register_timing();
                stats += renderer.render(&mesh, &camera.mvp(width, height), texture, setup)?;
            }

            let frame_path = setup_dir.join(format!("frame_{:04}.ppm", frame_index));
            if let Err(err) = Self::write_file(&frame_path, |w| renderer.frame().write_as_ppm(w)) {
                log::error!("Failed to save the frame: {:?}", err);
            }

            if self.config.write_depth {
                let depth_path = setup_dir.join(format!("depth_{:04}.pgm", frame_index));
                if let Err(err) =
                    Self::write_file(&depth_path, |w| renderer.depth_buffer().write_as_pgm(w))
                {
                    log::error!("Failed to save the depth buffer: {:?}", err);
                }
            }

            progress(
                index,
                self.config.setups.len(),
                (frame_index + 1) as f32 * 100f32 / self.config.num_frames as f32,
                &format!("Frame {}/{}", frame_index + 1, self.config.num_frames),
            );

            angle = (angle + step) % 360f32;
            camera.advance();
        }

        debug!("Setup {} done: {:?}", setup_name, stats);

        Ok(stats)
    }

    /// Creates the file at the given path and passes it to the given write function.
    fn write_file<F>(path: &Path, write: F) -> Result<()>
    where
        F: FnOnce(File) -> Result<()>,
    {
        let file = File::create(path)?;
        write(file)
    }

    /// Prints the progress of the current stage.
    ///
    /// # Arguments
    /// * `current_stage` - The current stage.
    /// * `total_stages` - The total number of stages.
    /// * `progress` - The progress of the current stage.
    /// * `msg` - The message to print.
    fn print_progress(current_stage: usize, total_stages: usize, progress: f32, msg: &str) {
        info!(
            "Stage {}/{} ({:.2}%): {}",
            current_stage + 1,
            total_stages,
            progress,
            msg
        );
    }

    /// Initializes the render executor and returns the texture to use. No texture is loaded if
    /// none of the setups samples one.
    fn initialize(&self) -> Result<Option<ImageTexture>> {
        // make sure the specified output directory exists and is a directory
        std::fs::create_dir_all(&self.out_dir).map_err(|err| {
            log::error!("Failed to create the output directory: {:?}", err);

            Error::Io(err)
        })?;

        if !self.config.setups.iter().any(|s| s.mode.is_textured()) {
            debug!("No textured setup, skipping the texture");
            return Ok(None);
        }

        match self.texture.as_ref() {
            Some(texture) => Ok(Some(texture.clone())),
            None => self.config.texture.load().map(Some),
        }
    }
}
