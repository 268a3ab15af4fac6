//! Viewport state and fixed view configuration
//!
//! `ViewConfig` is set once at startup. `ViewportState::position` is the only
//! thing that changes afterwards, and only through `MovementController`.

use glam::DVec2;
use thiserror::Error;

use crate::consts::*;

/// Rejected view or solver configuration
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    /// A value that must be strictly positive and finite was not
    #[error("{field} must be positive and finite, got {value}")]
    NotPositive { field: &'static str, value: f64 },

    /// Safe radius must stay inside the scan range
    #[error("min_safe_radius ({min_safe_radius}) must be less than max_scan_length ({max_scan_length})")]
    SafeRadiusOutOfRange {
        min_safe_radius: f64,
        max_scan_length: f64,
    },

    /// The ray fan needs at least one angle
    #[error("at least one angle sample is required")]
    NoAngles,

    /// The ray fan would be too dense to solve every frame
    #[error("{count} angle samples exceeds the limit of {max}")]
    TooManyAngles { count: usize, max: usize },

    /// An angle sample was NaN or infinite
    #[error("angle sample {index} is not finite")]
    NonFiniteAngle { index: usize },

    /// The Newton solver needs at least one step
    #[error("iteration budget must be at least 1")]
    ZeroIterations,
}

/// Check that `value` is finite and `> 0`
pub(crate) fn require_positive(field: &'static str, value: f64) -> Result<f64, ConfigError> {
    if value.is_finite() && value > 0.0 {
        Ok(value)
    } else {
        Err(ConfigError::NotPositive { field, value })
    }
}

/// Ordered ray angles (radians), fixed for the whole session
#[derive(Debug, Clone, PartialEq)]
pub struct AngleSamples(Vec<f64>);

impl AngleSamples {
    /// Explicit angle list, kept in the given order
    pub fn new(angles: Vec<f64>) -> Self {
        Self(angles)
    }

    /// `count` evenly spaced angles over a full turn, starting at 0
    pub fn full_turn(count: usize) -> Self {
        let spacing = std::f64::consts::TAU / count.max(1) as f64;
        Self((0..count).map(|i| i as f64 * spacing).collect())
    }

    /// `0, step, 2*step, ...` degrees, stopping before 360
    ///
    /// The count is checked against `MAX_ANGLE_SAMPLES` before anything is
    /// allocated.
    pub fn from_step_degrees(step_deg: f64) -> Result<Self, ConfigError> {
        let step_deg = require_positive("angle_step_deg", step_deg)?;
        let count = (360.0 / step_deg).ceil();
        if count > MAX_ANGLE_SAMPLES as f64 {
            return Err(ConfigError::TooManyAngles {
                count: count as usize,
                max: MAX_ANGLE_SAMPLES,
            });
        }
        Ok(Self::stepped(step_deg, count as usize))
    }

    fn stepped(step_deg: f64, count: usize) -> Self {
        Self(
            (0..count)
                .map(|i| i as f64 * step_deg)
                .filter(|deg| *deg < 360.0)
                .map(f64::to_radians)
                .collect(),
        )
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = f64> + '_ {
        self.0.iter().copied()
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.0
    }
}

/// Fixed parameters of the ray fan and its projection
#[derive(Debug, Clone, PartialEq)]
pub struct ViewConfig {
    angles: AngleSamples,
    max_scan_length: f64,
    projection_constant: f64,
    min_safe_radius: f64,
}

impl ViewConfig {
    /// Validate and build a view configuration
    pub fn new(
        angles: AngleSamples,
        max_scan_length: f64,
        projection_constant: f64,
        min_safe_radius: f64,
    ) -> Result<Self, ConfigError> {
        if angles.is_empty() {
            return Err(ConfigError::NoAngles);
        }
        if angles.len() > MAX_ANGLE_SAMPLES {
            return Err(ConfigError::TooManyAngles {
                count: angles.len(),
                max: MAX_ANGLE_SAMPLES,
            });
        }
        if let Some(index) = angles.iter().position(|a| !a.is_finite()) {
            return Err(ConfigError::NonFiniteAngle { index });
        }
        require_positive("max_scan_length", max_scan_length)?;
        require_positive("projection_constant", projection_constant)?;
        require_positive("min_safe_radius", min_safe_radius)?;
        if min_safe_radius >= max_scan_length {
            return Err(ConfigError::SafeRadiusOutOfRange {
                min_safe_radius,
                max_scan_length,
            });
        }

        Ok(Self {
            angles,
            max_scan_length,
            projection_constant,
            min_safe_radius,
        })
    }

    #[inline]
    pub fn angles(&self) -> &AngleSamples {
        &self.angles
    }

    #[inline]
    pub fn max_scan_length(&self) -> f64 {
        self.max_scan_length
    }

    #[inline]
    pub fn projection_constant(&self) -> f64 {
        self.projection_constant
    }

    #[inline]
    pub fn min_safe_radius(&self) -> f64 {
        self.min_safe_radius
    }

    /// Tallest wall any frame can produce
    pub fn max_height(&self) -> f64 {
        self.projection_constant / self.min_safe_radius
    }
}

impl Default for ViewConfig {
    fn default() -> Self {
        Self {
            angles: AngleSamples::stepped(
                ANGLE_STEP_DEG,
                (360.0 / ANGLE_STEP_DEG).ceil() as usize,
            ),
            max_scan_length: MAX_SCAN_LENGTH,
            projection_constant: PROJECTION_CONSTANT,
            min_safe_radius: MIN_SAFE_RADIUS,
        }
    }
}

/// Where the viewer stands, plus the fixed view configuration
#[derive(Debug, Clone, PartialEq)]
pub struct ViewportState {
    pub(crate) position: DVec2,
    config: ViewConfig,
}

impl ViewportState {
    pub fn new(position: DVec2, config: ViewConfig) -> Self {
        Self { position, config }
    }

    #[inline]
    pub fn position(&self) -> DVec2 {
        self.position
    }

    #[inline]
    pub fn config(&self) -> &ViewConfig {
        &self.config
    }
}

impl Default for ViewportState {
    fn default() -> Self {
        Self::new(
            DVec2::new(START_POSITION.0, START_POSITION.1),
            ViewConfig::default(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::{PI, TAU};

    #[test]
    fn test_default_matches_two_degree_sweep() {
        let cfg = ViewConfig::default();
        assert_eq!(cfg.angles().len(), 180);
        assert_eq!(cfg.angles().as_slice()[0], 0.0);
        assert!((cfg.angles().as_slice()[45] - PI / 2.0).abs() < 1e-12);
        assert!((cfg.max_height() - 20.0).abs() < 1e-12);
    }

    #[test]
    fn test_full_turn_spacing() {
        let angles = AngleSamples::full_turn(8);
        assert_eq!(angles.len(), 8);
        for (i, a) in angles.iter().enumerate() {
            assert!((a - i as f64 * TAU / 8.0).abs() < 1e-12);
        }
        assert!(AngleSamples::full_turn(0).is_empty());
    }

    #[test]
    fn test_step_degrees_stops_before_full_turn() {
        let angles = AngleSamples::from_step_degrees(7.0).unwrap();
        // 0, 7, ..., 357
        assert_eq!(angles.len(), 52);
        assert!(angles.iter().all(|a| a < TAU));
        assert_eq!(
            AngleSamples::from_step_degrees(2.0).unwrap(),
            ViewConfig::default().angles().clone()
        );
        assert!(matches!(
            AngleSamples::from_step_degrees(0.0),
            Err(ConfigError::NotPositive { field: "angle_step_deg", .. })
        ));
        assert!(matches!(
            AngleSamples::from_step_degrees(f64::NAN),
            Err(ConfigError::NotPositive { .. })
        ));
    }

    #[test]
    fn test_tiny_step_is_rejected_before_allocating() {
        assert_eq!(AngleSamples::from_step_degrees(0.25).unwrap().len(), 1440);
        assert!(matches!(
            AngleSamples::from_step_degrees(1e-5),
            Err(ConfigError::TooManyAngles { max: MAX_ANGLE_SAMPLES, .. })
        ));
        // Saturates instead of looping forever
        assert!(matches!(
            AngleSamples::from_step_degrees(1e-300),
            Err(ConfigError::TooManyAngles { count: usize::MAX, .. })
        ));
        assert!(matches!(
            ViewConfig::new(AngleSamples::full_turn(MAX_ANGLE_SAMPLES + 1), 20.0, 10.0, 0.5),
            Err(ConfigError::TooManyAngles { .. })
        ));
    }

    #[test]
    fn test_config_validation() {
        let angles = || AngleSamples::full_turn(4);
        assert!(ViewConfig::new(angles(), 20.0, 10.0, 0.5).is_ok());

        assert_eq!(
            ViewConfig::new(AngleSamples::new(vec![]), 20.0, 10.0, 0.5),
            Err(ConfigError::NoAngles)
        );
        assert_eq!(
            ViewConfig::new(AngleSamples::new(vec![0.0, f64::NAN]), 20.0, 10.0, 0.5),
            Err(ConfigError::NonFiniteAngle { index: 1 })
        );
        assert!(matches!(
            ViewConfig::new(angles(), -1.0, 10.0, 0.5),
            Err(ConfigError::NotPositive {
                field: "max_scan_length",
                ..
            })
        ));
        assert!(matches!(
            ViewConfig::new(angles(), 20.0, 0.0, 0.5),
            Err(ConfigError::NotPositive {
                field: "projection_constant",
                ..
            })
        ));
        assert!(matches!(
            ViewConfig::new(angles(), 20.0, 10.0, 20.0),
            Err(ConfigError::SafeRadiusOutOfRange { .. })
        ));
    }

    #[test]
    fn test_default_viewport_position() {
        let state = ViewportState::default();
        assert_eq!(state.position(), DVec2::new(0.0, -5.0));
    }
}
