//! Curvecast - a pseudo-3D raycaster whose only wall is a curve
//!
//! Core modules:
//! - `sim`: Per-frame ray/curve intersection and projection (pure, deterministic)
//! - `renderer`: Top-down and projected views, WebGPU pipeline
//! - `settings`: Configuration surface and presets

pub mod renderer;
pub mod settings;
pub mod sim;

pub use settings::{DensityPreset, Settings, WallStyle};

use glam::DVec2;

/// Default configuration constants
pub mod consts {
    /// Angular spacing of the ray fan (degrees)
    pub const ANGLE_STEP_DEG: f64 = 2.0;
    /// Densest fan accepted (a 0.1 degree step)
    pub const MAX_ANGLE_SAMPLES: usize = 3600;
    /// Rays further than this never count as hits
    pub const MAX_SCAN_LENGTH: f64 = 20.0;
    /// Numerator of the inverse-distance wall height
    pub const PROJECTION_CONSTANT: f64 = 10.0;
    /// Distances below this are clamped before projecting
    pub const MIN_SAFE_RADIUS: f64 = 0.5;

    /// Newton solver defaults
    pub const NEWTON_INITIAL_GUESS: f64 = 1.0;
    pub const NEWTON_MAX_ITERATIONS: u32 = 10;
    pub const NEWTON_CONVERGENCE_EPS: f64 = 1e-6;
    pub const NEWTON_DERIVATIVE_EPS: f64 = 1e-6;

    /// World units moved per key press
    pub const MOVE_STEP: f64 = 0.5;
    /// Viewpoint at startup
    pub const START_POSITION: (f64, f64) = (0.0, -5.0);
    /// Curvature of the default boundary `y = a * x^2`
    pub const DEFAULT_PARABOLA: f64 = 0.1;
}

/// Unit direction vector for an angle (radians, counterclockwise from +x)
#[inline]
pub fn direction(theta: f64) -> DVec2 {
    DVec2::new(theta.cos(), theta.sin())
}

/// Point at distance `r` from `origin` along `theta`
#[inline]
pub fn polar_to_cartesian(origin: DVec2, r: f64, theta: f64) -> DVec2 {
    origin + direction(theta) * r
}
