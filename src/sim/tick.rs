//! One logical frame: apply queued movement, then recompute every ray
//!
//! Movement is fully applied before the solve starts, so a frame never sees a
//! viewpoint that changes halfway through the ray fan.

use super::curve::BoundaryCurve;
use super::frame::{FrameResult, FrameSolver};
use super::movement::{Direction, MovementController};
use super::solver::RayIntersector;
use super::state::ViewportState;

/// Input collected since the previous frame
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FrameInput {
    /// Movement events in arrival order
    pub moves: Vec<Direction>,
}

impl FrameInput {
    pub fn push(&mut self, direction: Direction) {
        self.moves.push(direction);
    }

    pub fn is_empty(&self) -> bool {
        self.moves.is_empty()
    }

    /// Take the queued events, leaving the input empty for the next frame
    pub fn take(&mut self) -> FrameInput {
        std::mem::take(self)
    }
}

/// Advance the view by one frame and return what it sees
pub fn tick<I, C>(
    state: &mut ViewportState,
    controller: &MovementController,
    solver: &FrameSolver<I>,
    curve: &C,
    input: &FrameInput,
) -> FrameResult
where
    I: RayIntersector,
    C: BoundaryCurve + ?Sized,
{
    controller.apply_all(state, input.moves.iter().copied());
    solver.solve(state, curve)
}
