use std::path::PathBuf;

use crate::cli::Args;

pub const FOV_DEG: f64 = 60.0;
pub const NEAR_CLIPPING_PLANE: f64 = 1.25;
pub const FAR_CLIPPING_PLANE: f64 = 32.0;
pub const SCREEN_COLUMNS: usize = 160;
pub const STEP_LENGTH: f64 = 0.25;
pub const TURN_STEP_DEG: f64 = 5.0;

/// Viewing cone and column layout of the perspective view
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct View {
    /// Horizontal field of view, radians
    pub fov: f64,
    pub near: f64,
    pub far: f64,
    pub columns: usize,
}

impl Default for View {
    fn default() -> Self {
        Self {
            fov: FOV_DEG.to_radians(),
            near: NEAR_CLIPPING_PLANE,
            far: FAR_CLIPPING_PLANE,
            columns: SCREEN_COLUMNS,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Motion {
    pub step_length: f64,
    /// radians
    pub turn_step: f64,
}

impl Default for Motion {
    fn default() -> Self {
        Self {
            step_length: STEP_LENGTH,
            turn_step: TURN_STEP_DEG.to_radians(),
        }
    }
}

/// Everything fixed at process start
#[derive(Debug, Clone)]
pub struct Settings {
    pub view: View,
    pub motion: Motion,
    pub fb_width: usize,
    pub fb_height: usize,
    pub map: Option<PathBuf>,
}

impl From<&Args> for Settings {
    fn from(args: &Args) -> Self {
        Self {
            view: View {
                fov: args.fov.clamp(1.0, 179.0).to_radians(),
                near: args.near.max(f64::MIN_POSITIVE),
                far: args.far,
                columns: args.columns.max(1),
            },
            motion: Motion {
                step_length: args.step,
                turn_step: args.turn.to_radians(),
            },
            fb_width: args.width.max(1),
            fb_height: args.height.max(1),
            map: args.map.clone(),
        }
    }
}
