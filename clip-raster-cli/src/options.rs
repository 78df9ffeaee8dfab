use clap::{Parser, ValueEnum};
use log::{info, LevelFilter};

/// Workaround for parsing the different log level
#[derive(ValueEnum, Clone, Copy, Debug)]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl From<LogLevel> for LevelFilter {
    fn from(value: LogLevel) -> Self {
        match value {
            LogLevel::Trace => LevelFilter::Trace,
            LogLevel::Debug => LevelFilter::Debug,
            LogLevel::Info => LevelFilter::Info,
            LogLevel::Warn => LevelFilter::Warn,
            LogLevel::Error => LevelFilter::Error,
        }
    }
}

/// CLI for rendering a rotating textured cube with the clip-space software rasterizer.
#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
pub struct Options {
    /// The log level
    #[arg(short, value_enum, long, default_value_t = LogLevel::Info)]
    pub log_level: LogLevel,

    /// The render configuration file
    #[arg(short, long)]
    pub config: String,

    /// The directory the frames are written to
    #[arg(short, long)]
    pub output: String,

    /// Overrides the number of frames of the configuration
    #[arg(short, long)]
    pub frames: Option<usize>,

    /// Overrides the configured texture with the first image matching the pattern, e.g. `*.png`
    #[arg(short, long)]
    pub texture: Option<String>,
}

impl Options {
    /// Dumps the options to the log.
    pub fn dump_to_log(&self) {
        info!("Log Level: {:?}", self.log_level);
        info!("Config file: {:?}", self.config);
        info!("Output directory: {:?}", self.output);

        if let Some(frames) = self.frames {
            info!("Frames: {}", frames);
        }

        if let Some(texture) = self.texture.as_ref() {
            info!("Texture: {:?}", texture);
        }
    }
}
