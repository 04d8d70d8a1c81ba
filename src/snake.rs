use std::collections::VecDeque;

use crate::grid::{Grid, Vector2i};
use crate::input::{Direction, direction_change_is_valid};

/// Direction a fresh or reset snake travels in.
pub const START_DIRECTION: Direction = Direction::Right;

/// Mutable snake state and turn buffering behavior.
///
/// The body is stored tail first: `body[0]` is the tail and the last
/// element is the head.
#[derive(Debug, Clone)]
pub struct Snake {
    body: VecDeque<Vector2i>,
    direction: Direction,
    pending_direction: Option<Direction>,
    target_length: usize,
    start: Vector2i,
}

impl Snake {
    /// Creates a one-cell snake at `start` heading right.
    #[must_use]
    pub fn new(start: Vector2i) -> Self {
        Self {
            body: VecDeque::from([start]),
            direction: START_DIRECTION,
            pending_direction: None,
            target_length: 1,
            start,
        }
    }

    /// Creates a snake from explicit segments, tail first.
    ///
    /// The target length matches the segment count. `reset` returns the
    /// snake to `start`.
    #[must_use]
    pub fn from_segments(start: Vector2i, segments: Vec<Vector2i>, direction: Direction) -> Self {
        assert!(!segments.is_empty(), "snake needs at least one segment");

        Self {
            target_length: segments.len(),
            body: VecDeque::from(segments),
            direction,
            pending_direction: None,
            start,
        }
    }

    /// Returns the snake to a single segment on its start cell.
    pub fn reset(&mut self) {
        self.body.clear();
        self.body.push_back(self.start);
        self.direction = START_DIRECTION;
        self.pending_direction = None;
        self.target_length = 1;
    }

    /// Queues a turn for the next tick, rejecting reversal of the current direction.
    ///
    /// Returns whether the request was accepted. A later accepted request
    /// replaces an earlier one; requesting the current direction leaves no
    /// turn pending.
    pub fn request_turn(&mut self, direction: Direction) -> bool {
        if !direction_change_is_valid(self.direction, direction) {
            return false;
        }

        self.pending_direction = (direction != self.direction).then_some(direction);
        true
    }

    /// Applies the pending turn, if any.
    pub fn update_direction(&mut self) {
        if let Some(direction) = self.pending_direction.take() {
            self.direction = direction;
        }
    }

    /// Advances the head one cell and drops tail segments beyond the target length.
    pub fn move_forward(&mut self, grid: Grid) {
        let next_head = grid.wrap(self.head() + self.direction.delta());

        self.body.push_back(next_head);
        while self.body.len() > self.target_length {
            let _ = self.body.pop_front();
        }
    }

    pub fn grow(&mut self) {
        self.target_length += 1;
    }

    /// Lowers the target length by one, keeping at least one segment.
    pub fn shrink(&mut self) {
        self.target_length = self.target_length.saturating_sub(1).max(1);
    }

    /// Returns the current head position.
    #[must_use]
    pub fn head(&self) -> Vector2i {
        *self
            .body
            .back()
            .expect("snake body must always contain at least one segment")
    }

    /// Returns true if any segment occupies `position`.
    #[must_use]
    pub fn occupies(&self, position: Vector2i) -> bool {
        self.body.contains(&position)
    }

    /// Returns true if the head overlaps any non-head segment.
    #[must_use]
    pub fn head_overlaps_body(&self) -> bool {
        let head = self.head();
        self.body
            .iter()
            .take(self.body.len() - 1)
            .any(|segment| *segment == head)
    }

    /// Returns current segment count.
    #[must_use]
    pub fn len(&self) -> usize {
        self.body.len()
    }

    /// Returns true when there are no segments.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.body.is_empty()
    }

    #[must_use]
    pub fn target_length(&self) -> usize {
        self.target_length
    }

    /// Returns the direction applied on the last move.
    #[must_use]
    pub fn direction(&self) -> Direction {
        self.direction
    }

    #[must_use]
    pub fn pending_direction(&self) -> Option<Direction> {
        self.pending_direction
    }

    #[must_use]
    pub fn start(&self) -> Vector2i {
        self.start
    }

    /// Iterates over body segments from tail to head.
    pub fn segments(&self) -> impl Iterator<Item = &Vector2i> {
        self.body.iter()
    }
}
