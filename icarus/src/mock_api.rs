use crate::api_trait::{Authority, MoveOutcome};
use crate::error::{MazeError, Result};
use crate::maze::{Direction, Survey};
use async_trait::async_trait;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use std::collections::VecDeque;
use tokio::sync::Mutex;

const VICTORY_MESSAGE: &str = "Icarus escaped the labyrinth!";

/// Calls received by a mock authority.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CallLog {
    pub awakes: usize,
    pub moves: Vec<Direction>,
    pub dones: usize,
}

/// Rectangular maze with per-cell walls. Cell `(0, 0)` is the top-left
/// corner and `Down` increases the row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GridMaze {
    width: usize,
    height: usize,
    walls: Vec<Survey>,
    start: (usize, usize),
    exit: (usize, usize),
}

impl GridMaze {
    /// Every cell fully walled.
    pub fn closed(
        width: usize,
        height: usize,
        start: (usize, usize),
        exit: (usize, usize),
    ) -> Self {
        Self {
            width,
            height,
            walls: vec![Survey::CLOSED; width * height],
            start,
            exit,
        }
    }

    /// Perfect maze carved by a seeded recursive backtracker, from the
    /// top-left start to the bottom-right exit.
    pub fn generate(width: usize, height: usize, seed: u64) -> Self {
        let width = width.max(1);
        let height = height.max(1);
        let mut rng = rand::rngs::StdRng::seed_from_u64(seed);
        let mut maze = Self::closed(width, height, (0, 0), (width - 1, height - 1));

        let mut seen = vec![false; width * height];
        let mut stack = vec![(0usize, 0usize)];
        seen[0] = true;

        while let Some(&(x, y)) = stack.last() {
            let candidates: Vec<(Direction, (usize, usize))> = Direction::ALL
                .into_iter()
                .filter_map(|d| maze.neighbor((x, y), d).map(|n| (d, n)))
                .filter(|&(_, (nx, ny))| !seen[ny * width + nx])
                .collect();

            match candidates.choose(&mut rng) {
                Some(&(direction, (nx, ny))) => {
                    maze = maze.with_passage((x, y), direction);
                    seen[ny * width + nx] = true;
                    stack.push((nx, ny));
                }
                None => {
                    stack.pop();
                }
            }
        }

        maze
    }

    /// Removes the wall between `cell` and its neighbour towards
    /// `direction`. Passages leading off the grid are ignored.
    pub fn with_passage(mut self, cell: (usize, usize), direction: Direction) -> Self {
        if let Some(next) = self.neighbor(cell, direction) {
            *self.wall_mut(cell, direction) = false;
            *self.wall_mut(next, direction.inverse()) = false;
        }
        self
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn start(&self) -> (usize, usize) {
        self.start
    }

    pub fn exit(&self) -> (usize, usize) {
        self.exit
    }

    pub fn survey(&self, (x, y): (usize, usize)) -> Survey {
        self.walls[y * self.width + x]
    }

    pub fn neighbor(&self, (x, y): (usize, usize), direction: Direction) -> Option<(usize, usize)> {
        let (dx, dy) = direction.delta();
        let nx = x.checked_add_signed(dx as isize)?;
        let ny = y.checked_add_signed(dy as isize)?;
        (nx < self.width && ny < self.height).then_some((nx, ny))
    }

    fn wall_mut(&mut self, (x, y): (usize, usize), direction: Direction) -> &mut bool {
        self.walls[y * self.width + x].wall_mut(direction)
    }
}

#[derive(Debug)]
struct GridState {
    position: (usize, usize),
    log: CallLog,
}

/// In-process authority backed by a [`GridMaze`]. Every `awake` starts a
/// new episode at the maze's start cell.
#[derive(Debug)]
pub struct GridAuthority {
    maze: GridMaze,
    state: Mutex<GridState>,
}

impl GridAuthority {
    pub fn new(maze: GridMaze) -> Self {
        let position = maze.start;
        Self {
            maze,
            state: Mutex::new(GridState {
                position,
                log: CallLog::default(),
            }),
        }
    }

    pub fn maze(&self) -> &GridMaze {
        &self.maze
    }

    pub async fn log(&self) -> CallLog {
        self.state.lock().await.log.clone()
    }

    pub async fn position(&self) -> (usize, usize) {
        self.state.lock().await.position
    }
}

#[async_trait]
impl Authority for GridAuthority {
    async fn awake(&self) -> Result<Survey> {
        let mut state = self.state.lock().await;
        state.log.awakes += 1;
        state.position = self.maze.start;
        Ok(self.maze.survey(state.position))
    }

    async fn step(&self, direction: Direction) -> Result<MoveOutcome> {
        let mut state = self.state.lock().await;
        state.log.moves.push(direction);
        let endpoint = format!("move/{}", direction);

        if self.maze.survey(state.position).has_wall(direction) {
            return Err(MazeError::transport(endpoint, "Cannot move through walls"));
        }
        let next = self
            .maze
            .neighbor(state.position, direction)
            .ok_or_else(|| MazeError::transport(endpoint, "Cannot leave the labyrinth"))?;

        state.position = next;
        let survey = self.maze.survey(next);
        if next == self.maze.exit {
            Ok(MoveOutcome::Victory {
                survey,
                message: Some(VICTORY_MESSAGE.to_string()),
            })
        } else {
            Ok(MoveOutcome::Continue(survey))
        }
    }

    async fn done(&self) -> Result<()> {
        self.state.lock().await.log.dones += 1;
        Ok(())
    }
}

/// Authority that replays a fixed list of move outcomes, in order.
#[derive(Debug)]
pub struct ScriptedAuthority {
    wake: Survey,
    script: Mutex<VecDeque<Result<MoveOutcome>>>,
    log: Mutex<CallLog>,
}

impl ScriptedAuthority {
    pub fn new(wake: Survey, script: Vec<Result<MoveOutcome>>) -> Self {
        Self {
            wake,
            script: Mutex::new(script.into()),
            log: Mutex::new(CallLog::default()),
        }
    }

    pub async fn log(&self) -> CallLog {
        self.log.lock().await.clone()
    }

    pub async fn moves(&self) -> Vec<Direction> {
        self.log.lock().await.moves.clone()
    }
}

#[async_trait]
impl Authority for ScriptedAuthority {
    async fn awake(&self) -> Result<Survey> {
        self.log.lock().await.awakes += 1;
        Ok(self.wake)
    }

    async fn step(&self, direction: Direction) -> Result<MoveOutcome> {
        self.log.lock().await.moves.push(direction);
        self.script
            .lock()
            .await
            .pop_front()
            .unwrap_or_else(|| {
                Err(MazeError::transport(
                    format!("move/{}", direction),
                    "Script exhausted",
                ))
            })
    }

    async fn done(&self) -> Result<()> {
        self.log.lock().await.dones += 1;
        Ok(())
    }
}
