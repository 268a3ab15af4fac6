//! View settings and presets
//!
//! Persisted in LocalStorage on the web, or read from a JSON file natively
//! (path from `CURVECAST_SETTINGS`). Everything in here is fixed for the
//! session once the frame loop starts.

use glam::DVec2;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::consts::*;
use crate::sim::state::require_positive;
use crate::sim::{
    AngleSamples, ConfigError, FrameSolver, MovementController, NewtonSolver, Polynomial,
    ViewConfig, ViewportState,
};

/// Failure to load or store settings
#[derive(Error, Debug)]
pub enum SettingsError {
    #[error("settings file I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("settings JSON is malformed: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid settings: {0}")]
    Invalid(#[from] ConfigError),
}

/// Angular density of the ray fan
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum DensityPreset {
    Low,
    #[default]
    Medium,
    High,
}

impl DensityPreset {
    pub fn as_str(&self) -> &'static str {
        match self {
            DensityPreset::Low => "Low",
            DensityPreset::Medium => "Medium",
            DensityPreset::High => "High",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "low" => Some(DensityPreset::Low),
            "medium" | "med" => Some(DensityPreset::Medium),
            "high" => Some(DensityPreset::High),
            _ => None,
        }
    }

    /// Degrees between neighbouring rays
    pub fn angle_step_deg(&self) -> f64 {
        match self {
            DensityPreset::Low => 4.0,
            DensityPreset::Medium => ANGLE_STEP_DEG,
            DensityPreset::High => 1.0,
        }
    }

    /// Newton budget that keeps the frame cost roughly level across presets
    pub fn max_iterations(&self) -> u32 {
        match self {
            DensityPreset::Low => 12,
            DensityPreset::Medium => NEWTON_MAX_ITERATIONS,
            DensityPreset::High => 8,
        }
    }
}

/// How a wall column is drawn in the projected view
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum WallStyle {
    /// Column spans `-h..h` around the horizon
    Symmetric,
    /// Column spans `-h..2h`, eye height below the middle of the wall
    #[default]
    Raised,
}

impl WallStyle {
    /// Vertical extent `(bottom, top)` of a column of height `h`
    pub fn extent(&self, h: f32) -> (f32, f32) {
        match self {
            WallStyle::Symmetric => (-h, h),
            WallStyle::Raised => (-h, 2.0 * h),
        }
    }
}

/// Newton solver tuning
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SolverSettings {
    pub initial_guess: f64,
    /// Overrides the density preset's budget when set
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_iterations: Option<u32>,
    pub convergence_epsilon: f64,
    pub derivative_epsilon: f64,
}

impl Default for SolverSettings {
    fn default() -> Self {
        Self {
            initial_guess: NEWTON_INITIAL_GUESS,
            max_iterations: None,
            convergence_epsilon: NEWTON_CONVERGENCE_EPS,
            derivative_epsilon: NEWTON_DERIVATIVE_EPS,
        }
    }
}

/// Full configuration surface
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Ray density preset
    pub density: DensityPreset,
    /// Degrees between rays; overrides the preset's spacing when set
    #[serde(skip_serializing_if = "Option::is_none")]
    pub angle_step_deg: Option<f64>,

    // === Projection ===
    pub max_scan_length: f64,
    pub projection_constant: f64,
    pub min_safe_radius: f64,

    // === Solver ===
    pub solver: SolverSettings,

    // === Movement ===
    /// World units per key press
    pub move_step: f64,
    /// Viewpoint at startup
    pub start_position: [f64; 2],

    // === Scene ===
    /// The boundary curve, coefficients in ascending powers
    pub curve: Polynomial,

    // === Display ===
    pub wall_style: WallStyle,
    /// Draw the faint dashed rays that miss
    pub show_miss_rays: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            density: DensityPreset::Medium,
            angle_step_deg: None,

            max_scan_length: MAX_SCAN_LENGTH,
            projection_constant: PROJECTION_CONSTANT,
            min_safe_radius: MIN_SAFE_RADIUS,

            solver: SolverSettings::default(),

            move_step: MOVE_STEP,
            start_position: [START_POSITION.0, START_POSITION.1],

            curve: Polynomial::default(),

            wall_style: WallStyle::Raised,
            show_miss_rays: true,
        }
    }
}

impl Settings {
    /// Settings with a density preset applied
    pub fn from_preset(preset: DensityPreset) -> Self {
        let mut settings = Self::default();
        settings.apply_preset(preset);
        settings
    }

    /// Switch density preset, dropping any spacing or budget override
    pub fn apply_preset(&mut self, preset: DensityPreset) {
        self.density = preset;
        self.angle_step_deg = None;
        self.solver.max_iterations = None;
    }

    /// Apply a preset given by name (command line or page URL)
    pub fn apply_preset_name(&mut self, name: &str) -> Option<DensityPreset> {
        let preset = DensityPreset::parse(name)?;
        self.apply_preset(preset);
        Some(preset)
    }

    /// Ray spacing in effect: the override, else the preset's
    pub fn effective_angle_step_deg(&self) -> f64 {
        self.angle_step_deg.unwrap_or_else(|| self.density.angle_step_deg())
    }

    /// Newton budget in effect: the override, else the preset's
    pub fn effective_max_iterations(&self) -> u32 {
        self.solver
            .max_iterations
            .unwrap_or_else(|| self.density.max_iterations())
    }

    /// Check every value the core depends on
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.view_config()?;
        self.newton_solver()?;
        require_positive("move_step", self.move_step)?;
        Ok(())
    }

    pub fn view_config(&self) -> Result<ViewConfig, ConfigError> {
        ViewConfig::new(
            AngleSamples::from_step_degrees(self.effective_angle_step_deg())?,
            self.max_scan_length,
            self.projection_constant,
            self.min_safe_radius,
        )
    }

    pub fn newton_solver(&self) -> Result<NewtonSolver, ConfigError> {
        let s = &self.solver;
        let max_iterations = self.effective_max_iterations();
        if max_iterations == 0 {
            return Err(ConfigError::ZeroIterations);
        }
        require_positive("convergence_epsilon", s.convergence_epsilon)?;
        require_positive("derivative_epsilon", s.derivative_epsilon)?;
        if !s.initial_guess.is_finite() {
            return Err(ConfigError::NotPositive {
                field: "initial_guess",
                value: s.initial_guess,
            });
        }
        Ok(NewtonSolver {
            initial_guess: s.initial_guess,
            derivative_epsilon: s.derivative_epsilon,
            ..NewtonSolver::default()
        }
        .with_max_iterations(max_iterations)
        .with_convergence_epsilon(s.convergence_epsilon))
    }

    pub fn frame_solver(&self) -> Result<FrameSolver<NewtonSolver>, ConfigError> {
        Ok(FrameSolver::new(self.newton_solver()?))
    }

    pub fn movement(&self) -> Result<MovementController, ConfigError> {
        Ok(MovementController::new(require_positive(
            "move_step",
            self.move_step,
        )?))
    }

    /// Fresh viewport at the configured start position
    pub fn viewport(&self) -> Result<ViewportState, ConfigError> {
        let [x, y] = self.start_position;
        Ok(ViewportState::new(DVec2::new(x, y), self.view_config()?))
    }

    /// Parse and validate settings from JSON
    pub fn from_json(json: &str) -> Result<Self, SettingsError> {
        let settings: Self = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn to_json(&self) -> Result<String, SettingsError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Environment variable naming a native settings file
    pub const ENV_PATH: &'static str = "CURVECAST_SETTINGS";

    /// LocalStorage key (used only in wasm32)
    #[allow(dead_code)]
    const STORAGE_KEY: &'static str = "curvecast_settings";

    /// Load settings from LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(Some(json)) = storage.get_item(Self::STORAGE_KEY) {
                match Self::from_json(&json) {
                    Ok(settings) => {
                        log::info!("Loaded settings from LocalStorage");
                        return settings;
                    }
                    Err(e) => log::warn!("Ignoring stored settings: {}", e),
                }
            }
        }

        log::info!("Using default settings");
        Self::default()
    }

    /// Save settings to LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn save(&self) {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(json) = self.to_json() {
                let _ = storage.set_item(Self::STORAGE_KEY, &json);
                log::info!("Settings saved");
            }
        }
    }

    /// Load from the file named by `CURVECAST_SETTINGS`, falling back to defaults
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Self {
        let Some(path) = std::env::var_os(Self::ENV_PATH) else {
            log::info!("Using default settings");
            return Self::default();
        };

        match Self::load_from(&path) {
            Ok(settings) => {
                log::info!("Loaded settings from {}", path.to_string_lossy());
                settings
            }
            Err(e) => {
                log::warn!(
                    "Failed to load settings from {}: {}; using defaults",
                    path.to_string_lossy(),
                    e
                );
                Self::default()
            }
        }
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn load_from(path: impl AsRef<std::path::Path>) -> Result<Self, SettingsError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn save_to(&self, path: impl AsRef<std::path::Path>) -> Result<(), SettingsError> {
        std::fs::write(path, self.to_json()?)?;
        Ok(())
    }
}
