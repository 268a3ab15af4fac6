//! Ray/curve intersection by Newton-Raphson
//!
//! A ray from `origin` at angle `theta` meets the curve where
//!
//! ```text
//! g(r)  = height(x0 + r cos θ) - (y0 + r sin θ) = 0
//! g'(r) = slope(x0 + r cos θ) cos θ - sin θ
//! ```
//!
//! The solver is local: it follows Newton steps from a fixed initial guess and
//! reports at most one root. It does not promise the nearest crossing when the
//! ray meets the curve more than once.

use glam::DVec2;
use thiserror::Error;

use super::curve::BoundaryCurve;
use crate::consts::*;
use crate::polar_to_cartesian;

/// A single ray to solve (not stored between frames)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RayQuery {
    pub origin: DVec2,
    /// Radians, counterclockwise from +x
    pub angle: f64,
}

impl RayQuery {
    pub fn new(origin: DVec2, angle: f64) -> Self {
        Self { origin, angle }
    }

    /// Point at distance `r` along the ray
    #[inline]
    pub fn at(&self, r: f64) -> DVec2 {
        polar_to_cartesian(self.origin, r, self.angle)
    }
}

/// Outcome of casting one ray
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RayOutcome {
    /// Ray meets the curve at `point`, `distance` along the ray
    Hit { distance: f64, point: DVec2 },
    /// No usable intersection
    Miss,
}

impl RayOutcome {
    #[inline]
    pub fn is_hit(&self) -> bool {
        matches!(self, RayOutcome::Hit { .. })
    }

    pub fn distance(&self) -> Option<f64> {
        match *self {
            RayOutcome::Hit { distance, .. } => Some(distance),
            RayOutcome::Miss => None,
        }
    }

    pub fn point(&self) -> Option<DVec2> {
        match *self {
            RayOutcome::Hit { point, .. } => Some(point),
            RayOutcome::Miss => None,
        }
    }
}

/// Why a ray produced no intersection
#[derive(Error, Debug, Clone, Copy, PartialEq)]
pub enum SolveFailure {
    /// The ray is (nearly) parallel to the curve's local tangent
    #[error("degenerate tangent at r = {r} (|g'| = {derivative:e})")]
    DegenerateTangent { r: f64, derivative: f64 },

    /// Iteration budget exhausted before the step size fell under tolerance
    #[error("no convergence after {iterations} iterations (last r = {last_r})")]
    NonConvergence { iterations: u32, last_r: f64 },

    /// Converged, but the root lies behind the ray origin
    #[error("root r = {r} lies behind the origin")]
    BehindOrigin { r: f64 },
}

/// A converged, positive root
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Root {
    pub distance: f64,
    /// Newton steps taken to converge
    pub iterations: u32,
}

/// Anything that can intersect a ray with a boundary curve
pub trait RayIntersector {
    /// Cast one ray; every failure collapses to `Miss`
    fn intersect<C: BoundaryCurve + ?Sized>(&self, curve: &C, query: RayQuery) -> RayOutcome;
}

/// Newton-Raphson solver along the ray parameter
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NewtonSolver {
    /// Starting distance for the iteration
    pub initial_guess: f64,
    /// Maximum Newton steps per ray
    pub max_iterations: u32,
    /// Converged once a step moves `r` by less than this
    pub convergence_epsilon: f64,
    /// `|g'|` below this is treated as a degenerate tangent
    pub derivative_epsilon: f64,
}

impl Default for NewtonSolver {
    fn default() -> Self {
        Self {
            initial_guess: NEWTON_INITIAL_GUESS,
            max_iterations: NEWTON_MAX_ITERATIONS,
            convergence_epsilon: NEWTON_CONVERGENCE_EPS,
            derivative_epsilon: NEWTON_DERIVATIVE_EPS,
        }
    }
}

impl NewtonSolver {
    pub fn with_max_iterations(mut self, max_iterations: u32) -> Self {
        self.max_iterations = max_iterations;
        self
    }

    pub fn with_convergence_epsilon(mut self, eps: f64) -> Self {
        self.convergence_epsilon = eps;
        self
    }

    /// Run the iteration and report either the root or the reason there is none
    pub fn solve<C: BoundaryCurve + ?Sized>(
        &self,
        curve: &C,
        query: RayQuery,
    ) -> Result<Root, SolveFailure> {
        let (sin_t, cos_t) = query.angle.sin_cos();
        let (x0, y0) = (query.origin.x, query.origin.y);

        let mut r = self.initial_guess;
        for step in 1..=self.max_iterations {
            let x = x0 + r * cos_t;
            let g = curve.height(x) - (y0 + r * sin_t);
            let dg = curve.slope(x) * cos_t - sin_t;

            // NaN/inf can only come from a curve evaluated far outside its
            // sane range; treat it like a run that never settles
            if !g.is_finite() || !dg.is_finite() {
                return Err(SolveFailure::NonConvergence {
                    iterations: step,
                    last_r: r,
                });
            }

            if dg.abs() < self.derivative_epsilon {
                return Err(SolveFailure::DegenerateTangent { r, derivative: dg });
            }

            let r_new = r - g / dg;
            if (r_new - r).abs() < self.convergence_epsilon {
                return if r_new > 0.0 {
                    Ok(Root {
                        distance: r_new,
                        iterations: step,
                    })
                } else {
                    Err(SolveFailure::BehindOrigin { r: r_new })
                };
            }
            r = r_new;
        }

        Err(SolveFailure::NonConvergence {
            iterations: self.max_iterations,
            last_r: r,
        })
    }
}

impl RayIntersector for NewtonSolver {
    fn intersect<C: BoundaryCurve + ?Sized>(&self, curve: &C, query: RayQuery) -> RayOutcome {
        match self.solve(curve, query) {
            Ok(root) => RayOutcome::Hit {
                distance: root.distance,
                point: query.at(root.distance),
            },
            Err(failure) => {
                log::trace!("ray at {:.4} rad: {}", query.angle, failure);
                RayOutcome::Miss
            }
        }
    }
}
