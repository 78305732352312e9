use crate::error::MazeError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Order in which the solver tries to leave a cell.
pub const SEARCH_ORDER: [Direction; 4] = [
    Direction::Down,
    Direction::Right,
    Direction::Up,
    Direction::Left,
];

/// Cell position relative to the cell the agent woke up in.
///
/// `y` grows downwards: `Down` adds one, `Up` subtracts one.
#[derive(Debug, Clone, Copy, Default, Hash, Eq, PartialEq)]
pub struct Coordinate {
    pub x: i32,
    pub y: i32,
}

impl Coordinate {
    pub const ORIGIN: Coordinate = Coordinate { x: 0, y: 0 };

    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    pub fn transform(self, direction: Direction) -> Self {
        let (dx, dy) = direction.delta();
        Self {
            x: self.x + dx,
            y: self.y + dy,
        }
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

#[derive(Debug, Clone, Copy, Hash, Eq, PartialEq)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    pub const ALL: [Direction; 4] = [
        Direction::Up,
        Direction::Down,
        Direction::Left,
        Direction::Right,
    ];

    pub fn delta(self) -> (i32, i32) {
        match self {
            Direction::Up => (0, -1),
            Direction::Down => (0, 1),
            Direction::Left => (-1, 0),
            Direction::Right => (1, 0),
        }
    }

    pub fn inverse(self) -> Self {
        match self {
            Direction::Up => Direction::Down,
            Direction::Down => Direction::Up,
            Direction::Left => Direction::Right,
            Direction::Right => Direction::Left,
        }
    }

    /// Token used in the authority's `/move/{token}` endpoint.
    pub fn as_str(self) -> &'static str {
        match self {
            Direction::Up => "up",
            Direction::Down => "down",
            Direction::Left => "left",
            Direction::Right => "right",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Direction {
    type Err = MazeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "up" => Ok(Direction::Up),
            "down" => Ok(Direction::Down),
            "left" => Ok(Direction::Left),
            "right" => Ok(Direction::Right),
            other => Err(MazeError::InvalidDirection(other.to_string())),
        }
    }
}

/// Walls around the agent's current cell, as reported by the authority.
#[derive(Debug, Clone, Copy, Default, Eq, PartialEq, Serialize, Deserialize)]
pub struct Survey {
    #[serde(default, alias = "Top")]
    pub top: bool,
    #[serde(default, alias = "Right")]
    pub right: bool,
    #[serde(default, alias = "Bottom")]
    pub bottom: bool,
    #[serde(default, alias = "Left")]
    pub left: bool,
}

impl Survey {
    pub const OPEN: Survey = Survey {
        top: false,
        right: false,
        bottom: false,
        left: false,
    };

    pub const CLOSED: Survey = Survey {
        top: true,
        right: true,
        bottom: true,
        left: true,
    };

    /// A fully walled cell with the given sides opened.
    pub fn open_towards(directions: &[Direction]) -> Self {
        let mut survey = Survey::CLOSED;
        for &direction in directions {
            *survey.wall_mut(direction) = false;
        }
        survey
    }

    pub fn has_wall(&self, direction: Direction) -> bool {
        match direction {
            Direction::Up => self.top,
            Direction::Down => self.bottom,
            Direction::Left => self.left,
            Direction::Right => self.right,
        }
    }

    pub fn is_open(&self, direction: Direction) -> bool {
        !self.has_wall(direction)
    }

    pub(crate) fn wall_mut(&mut self, direction: Direction) -> &mut bool {
        match direction {
            Direction::Up => &mut self.top,
            Direction::Down => &mut self.bottom,
            Direction::Left => &mut self.left,
            Direction::Right => &mut self.right,
        }
    }
}
