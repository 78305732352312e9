use crate::error::{MazeError, Result};
use crate::maze::{Coordinate, Direction};

const DEFAULT_CAPACITY: usize = 100;

/// Forward moves taken from the start cell, oldest first.
///
/// The capacity only sizes the first allocation; the stack grows as needed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Breadcrumbs {
    moves: Vec<Direction>,
}

impl Breadcrumbs {
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            moves: Vec::with_capacity(capacity),
        }
    }

    pub fn len(&self) -> usize {
        self.moves.len()
    }

    pub fn is_empty(&self) -> bool {
        self.moves.is_empty()
    }

    pub fn push(&mut self, direction: Direction) {
        self.moves.push(direction);
    }

    pub fn pop(&mut self) -> Result<Direction> {
        self.moves.pop().ok_or(MazeError::EmptyHistory)
    }

    pub fn as_slice(&self) -> &[Direction] {
        &self.moves
    }

    /// Position reached by walking every breadcrumb from `start`.
    pub fn replay(&self, start: Coordinate) -> Coordinate {
        self.moves
            .iter()
            .fold(start, |c, &direction| c.transform(direction))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pop_empty() {
        let mut crumbs = Breadcrumbs::new();
        assert_eq!(crumbs.pop(), Err(MazeError::EmptyHistory));
    }

    #[test]
    fn test_lifo_order() {
        let mut crumbs = Breadcrumbs::new();
        crumbs.push(Direction::Down);
        crumbs.push(Direction::Right);
        assert_eq!(crumbs.len(), 2);
        assert_eq!(crumbs.pop(), Ok(Direction::Right));
        assert_eq!(crumbs.pop(), Ok(Direction::Down));
        assert!(crumbs.is_empty());
    }

    #[test]
    fn test_grows_past_capacity() {
        let mut crumbs = Breadcrumbs::with_capacity(2);
        for _ in 0..500 {
            crumbs.push(Direction::Right);
        }
        assert_eq!(crumbs.len(), 500);
        assert_eq!(crumbs.replay(Coordinate::ORIGIN), Coordinate::new(500, 0));
    }

    #[test]
    fn test_replay() {
        let mut crumbs = Breadcrumbs::new();
        for direction in [Direction::Down, Direction::Down, Direction::Left, Direction::Up] {
            crumbs.push(direction);
        }
        assert_eq!(crumbs.replay(Coordinate::ORIGIN), Coordinate::new(-1, 1));
        assert_eq!(crumbs.replay(Coordinate::new(5, 5)), Coordinate::new(4, 6));
    }
}
