//! Deterministic raycasting core
//!
//! Everything that decides what the viewer sees lives here. This module must
//! stay pure and deterministic:
//! - Every frame recomputes from scratch
//! - Stable iteration order (angle sample order)
//! - No rendering or platform dependencies

pub mod curve;
pub mod frame;
pub mod movement;
pub mod solver;
pub mod state;
pub mod tick;

pub use curve::{BoundaryCurve, FnCurve, Polynomial};
pub use frame::{FrameResult, FrameSolver, RayRecord, projected_height};
pub use movement::{Direction, MovementController};
pub use solver::{NewtonSolver, RayIntersector, RayOutcome, RayQuery, Root, SolveFailure};
pub use state::{AngleSamples, ConfigError, ViewConfig, ViewportState};
pub use tick::{FrameInput, tick};
