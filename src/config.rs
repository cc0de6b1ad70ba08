use std::f32::consts::PI;
use std::path::PathBuf;

use clap::Parser;
use thiserror::Error;

use crate::geometry::Color;

const BACKGROUND_COLOR: Color = Color::rgb(50, 50, 50);

/// First-person wall viewer.
#[derive(Debug, Parser)]
#[command(version, about)]
pub struct Cli {
    /// Internal framebuffer width in pixels
    #[arg(long, default_value_t = 800)]
    pub width: usize,
    /// Internal framebuffer height in pixels
    #[arg(long, default_value_t = 600)]
    pub height: usize,
    /// Target frames per second
    #[arg(long, default_value_t = 30)]
    pub fps: u32,
    /// World units moved per frame while W/S is held
    #[arg(long, default_value_t = 10.0)]
    pub speed: f32,
    /// Radians turned per frame while A/D is held
    #[arg(long, default_value_t = PI / 15.0)]
    pub turn_step: f32,
    /// Scene file, one wall per line: `x0 y0 x1 y1 height r g b [a]`
    #[arg(long)]
    pub scene: Option<PathBuf>,
    /// Log verbosity
    #[arg(long, default_value_t = log::LevelFilter::Info)]
    pub log_level: log::LevelFilter,
}

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("framebuffer size must be non-zero, got {width}x{height}")]
    EmptyFramebuffer { width: usize, height: usize },
    #[error("target fps must be non-zero")]
    ZeroFps,
    #[error("{name} must be finite, got {value}")]
    NotFinite { name: &'static str, value: f32 },
}

/// Everything the event loop needs, fixed at startup.
#[derive(Clone, Debug, PartialEq)]
pub struct Config {
    pub title: String,
    pub width: usize,
    pub height: usize,
    pub target_fps: u32,
    pub background: Color,
    pub move_speed: f32,
    pub turn_step: f32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            title: "Wall View".to_string(),
            width: 800,
            height: 600,
            target_fps: 30,
            background: BACKGROUND_COLOR,
            move_speed: 10.0,
            turn_step: PI / 15.0,
        }
    }
}

impl TryFrom<&Cli> for Config {
    type Error = ConfigError;

    fn try_from(cli: &Cli) -> Result<Self, Self::Error> {
        if cli.width == 0 || cli.height == 0 {
            return Err(ConfigError::EmptyFramebuffer {
                width: cli.width,
                height: cli.height,
            });
        }
        if cli.fps == 0 {
            return Err(ConfigError::ZeroFps);
        }
        for (name, value) in [("speed", cli.speed), ("turn step", cli.turn_step)] {
            if !value.is_finite() {
                return Err(ConfigError::NotFinite { name, value });
            }
        }

        Ok(Self {
            width: cli.width,
            height: cli.height,
            target_fps: cli.fps,
            move_speed: cli.speed,
            turn_step: cli.turn_step,
            ..Self::default()
        })
    }
}
