//! Movement input: discrete key events to viewpoint deltas
//!
//! This is the only code allowed to change `ViewportState::position`.

use glam::DVec2;
use serde::{Deserialize, Serialize};

use super::state::ViewportState;
use crate::consts::MOVE_STEP;

/// One discrete movement event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    /// Unit world-space delta (+y is up)
    pub fn unit(&self) -> DVec2 {
        match self {
            Direction::Up => DVec2::Y,
            Direction::Down => DVec2::NEG_Y,
            Direction::Left => DVec2::NEG_X,
            Direction::Right => DVec2::X,
        }
    }

    /// Map a keyboard key name (DOM `KeyboardEvent.key` style) to a direction
    pub fn from_key(key: &str) -> Option<Self> {
        match key {
            "ArrowUp" | "Up" | "up" | "w" | "W" => Some(Direction::Up),
            "ArrowDown" | "Down" | "down" | "s" | "S" => Some(Direction::Down),
            "ArrowLeft" | "Left" | "left" | "a" | "A" => Some(Direction::Left),
            "ArrowRight" | "Right" | "right" | "d" | "D" => Some(Direction::Right),
            _ => None,
        }
    }

    pub fn opposite(&self) -> Self {
        match self {
            Direction::Up => Direction::Down,
            Direction::Down => Direction::Up,
            Direction::Left => Direction::Right,
            Direction::Right => Direction::Left,
        }
    }

    pub const ALL: [Direction; 4] = [
        Direction::Up,
        Direction::Down,
        Direction::Left,
        Direction::Right,
    ];
}

/// Applies movement events to the viewport with a fixed step size
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MovementController {
    step: f64,
}

impl Default for MovementController {
    fn default() -> Self {
        Self { step: MOVE_STEP }
    }
}

impl MovementController {
    pub fn new(step: f64) -> Self {
        Self { step }
    }

    #[inline]
    pub fn step(&self) -> f64 {
        self.step
    }

    /// Move the viewpoint one step. No bounds are enforced.
    pub fn apply(&self, state: &mut ViewportState, direction: Direction) {
        state.position += direction.unit() * self.step;
    }

    /// Apply a batch of events in order
    pub fn apply_all<I>(&self, state: &mut ViewportState, directions: I)
    where
        I: IntoIterator<Item = Direction>,
    {
        for direction in directions {
            self.apply(state, direction);
        }
    }
}
