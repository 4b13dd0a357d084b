use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use log::LevelFilter;

use crate::config;

#[derive(Debug, Clone, ValueEnum)]
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

#[derive(Debug, Parser)]
#[command(name = "tile_raycaster")]
#[command(about = "First-person raycaster over a 2D tile map")]
pub struct Args {
    /// Text map, one row per line (defaults to the built-in map)
    #[arg(short, long)]
    pub map: Option<PathBuf>,

    #[arg(long, default_value = "info")]
    pub log_level: LogLevel,

    /// Horizontal field of view in degrees
    #[arg(long, default_value_t = config::FOV_DEG)]
    pub fov: f64,

    /// Distance of the plane the view cone is sampled on
    #[arg(long, default_value_t = config::NEAR_CLIPPING_PLANE)]
    pub near: f64,

    /// Walls farther than this are not drawn
    #[arg(long, default_value_t = config::FAR_CLIPPING_PLANE)]
    pub far: f64,

    /// Number of screen columns (rays) per frame
    #[arg(long, default_value_t = config::SCREEN_COLUMNS)]
    pub columns: usize,

    /// Distance moved per key press, in cells
    #[arg(long, default_value_t = config::STEP_LENGTH)]
    pub step: f64,

    /// Rotation per key press in degrees
    #[arg(long, default_value_t = config::TURN_STEP_DEG)]
    pub turn: f64,

    /// Internal framebuffer width
    #[arg(long, default_value_t = 640)]
    pub width: usize,

    /// Internal framebuffer height
    #[arg(long, default_value_t = 480)]
    pub height: usize,
}
