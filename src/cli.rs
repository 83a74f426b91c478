use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use log::LevelFilter;

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<LogLevel> for LevelFilter {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Error => LevelFilter::Error,
            LogLevel::Warn => LevelFilter::Warn,
            LogLevel::Info => LevelFilter::Info,
            LogLevel::Debug => LevelFilter::Debug,
            LogLevel::Trace => LevelFilter::Trace,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum DemoScene {
    /// Carved sphere and hollow cube over a reflective floor
    Showcase,
    /// Carved sphere alone
    CarvedSphere,
    /// Mirror and glass spheres
    Spheres,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum Mode {
    Shaded,
    Normals,
    ForwardNormals,
}

#[derive(Parser)]
#[command(name = "rusty_csg_tracer")]
#[command(about = "Recursive ray tracer for CSG scenes")]
pub struct Args {
    /// Output png, defaults to a timestamped name in the results directory
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    #[arg(long, value_enum, default_value = "showcase")]
    pub scene: DemoScene,

    #[arg(long, value_enum, default_value = "shaded")]
    pub mode: Mode,

    /// Image width in pixels
    #[arg(long, default_value = "640")]
    pub width: u32,

    /// Image height in pixels
    #[arg(long, default_value = "480")]
    pub height: u32,

    /// Samples per pixel along each axis
    #[arg(short, long, default_value = "2")]
    pub supersampling: usize,

    /// Maximum number of reflection and refraction bounces
    #[arg(short, long, default_value = "4")]
    pub depth: usize,

    /// Shadow rays per light
    #[arg(long, default_value = "1")]
    pub shadow_rays: usize,

    /// Jitter radius around each light for soft shadows
    #[arg(long, default_value = "0.0")]
    pub light_radius: f64,

    /// Number of render threads, defaults to the number of physical cores
    #[arg(short, long)]
    pub threads: Option<usize>,

    #[arg(long, value_enum, default_value = "info")]
    pub log_level: LogLevel,
}
