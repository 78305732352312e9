use crate::api_trait::{Authority, MoveOutcome};
use crate::breadcrumbs::Breadcrumbs;
use crate::error::{MazeError, Result};
use crate::maze::{Coordinate, Direction, SEARCH_ORDER, Survey};
use std::collections::HashSet;
use std::sync::Arc;
use tracing::{debug, info};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineState {
    Exploring,
    Backtracking,
    Solved,
    Stuck,
    Failed,
}

impl EngineState {
    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            EngineState::Solved | EngineState::Stuck | EngineState::Failed
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EpisodeOutcome {
    Solved {
        steps: usize,
        message: Option<String>,
    },
    Stuck,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MoveStats {
    pub forward: usize,
    pub backtrack: usize,
}

/// Depth-first explorer for one maze episode.
///
/// Every move, including each backtracking step, is a round trip to the
/// authority, and the survey it returns replaces the current one.
pub struct Solver {
    api: Arc<dyn Authority>,
    state: EngineState,
    position: Coordinate,
    survey: Survey,
    visited: HashSet<Coordinate>,
    breadcrumbs: Breadcrumbs,
    stats: MoveStats,
    message: Option<String>,
}

impl Solver {
    /// Wakes up in a new maze and prepares to explore it.
    pub async fn start(api: Arc<dyn Authority>) -> Result<Self> {
        let survey = api.awake().await?;
        Ok(Self::with_survey(api, survey))
    }

    pub fn with_survey(api: Arc<dyn Authority>, survey: Survey) -> Self {
        let mut visited = HashSet::new();
        visited.insert(Coordinate::ORIGIN);
        Self {
            api,
            state: EngineState::Exploring,
            position: Coordinate::ORIGIN,
            survey,
            visited,
            breadcrumbs: Breadcrumbs::new(),
            stats: MoveStats::default(),
            message: None,
        }
    }

    pub fn state(&self) -> EngineState {
        self.state
    }

    pub fn position(&self) -> Coordinate {
        self.position
    }

    pub fn survey(&self) -> Survey {
        self.survey
    }

    pub fn visited(&self) -> &HashSet<Coordinate> {
        &self.visited
    }

    pub fn breadcrumbs(&self) -> &Breadcrumbs {
        &self.breadcrumbs
    }

    pub fn stats(&self) -> MoveStats {
        self.stats
    }

    /// First open direction, in search order, leading to an unvisited cell.
    pub fn next_move(&self) -> Option<Direction> {
        SEARCH_ORDER.into_iter().find(|&direction| {
            self.survey.is_open(direction)
                && !self.visited.contains(&self.position.transform(direction))
        })
    }

    /// Advances the state machine by at most one move.
    pub async fn step(&mut self) -> Result<EngineState> {
        if self.state.is_terminal() {
            return Ok(self.state);
        }

        let result = match self.next_move() {
            Some(direction) => self.advance(direction).await,
            None => self.backtrack().await,
        };

        match result {
            Ok(state) => {
                self.state = state;
                Ok(state)
            }
            Err(e) => {
                self.state = EngineState::Failed;
                Err(e)
            }
        }
    }

    /// Steps until the maze is solved or proven stuck.
    pub async fn solve(&mut self) -> Result<EpisodeOutcome> {
        loop {
            match self.step().await? {
                EngineState::Solved => {
                    info!(
                        steps = self.breadcrumbs.len(),
                        forward = self.stats.forward,
                        backtrack = self.stats.backtrack,
                        "Solution found"
                    );
                    return Ok(EpisodeOutcome::Solved {
                        steps: self.breadcrumbs.len(),
                        message: self.message.clone(),
                    });
                }
                EngineState::Stuck => {
                    info!(
                        visited = self.visited.len(),
                        forward = self.stats.forward,
                        backtrack = self.stats.backtrack,
                        "No solution found"
                    );
                    return Ok(EpisodeOutcome::Stuck);
                }
                _ => {}
            }
        }
    }

    async fn advance(&mut self, direction: Direction) -> Result<EngineState> {
        debug!(from = %self.position, %direction, "Moving forward");
        let outcome = self.api.step(direction).await?;
        self.stats.forward += 1;
        self.breadcrumbs.push(direction);
        self.position = self.position.transform(direction);
        self.visited.insert(self.position);
        Ok(self.absorb(outcome, EngineState::Exploring))
    }

    async fn backtrack(&mut self) -> Result<EngineState> {
        let last = match self.breadcrumbs.pop() {
            Ok(direction) => direction,
            Err(MazeError::EmptyHistory) => return Ok(EngineState::Stuck),
            Err(e) => return Err(e),
        };
        let direction = last.inverse();
        debug!(from = %self.position, %direction, "Backtracking");

        let outcome = match self.api.step(direction).await {
            Ok(outcome) => outcome,
            Err(e) => {
                // The agent did not move, so the breadcrumb still applies.
                self.breadcrumbs.push(last);
                return Err(e);
            }
        };
        self.stats.backtrack += 1;
        self.position = self.position.transform(direction);
        Ok(self.absorb(outcome, EngineState::Backtracking))
    }

    fn absorb(&mut self, outcome: MoveOutcome, next: EngineState) -> EngineState {
        match outcome {
            MoveOutcome::Continue(survey) => {
                self.survey = survey;
                next
            }
            MoveOutcome::Victory { survey, message } => {
                self.survey = survey;
                self.message = message;
                EngineState::Solved
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock_api::ScriptedAuthority;

    fn solver_for(api: &Arc<ScriptedAuthority>, survey: Survey) -> Solver {
        Solver::with_survey(api.clone(), survey)
    }

    #[test]
    fn test_next_move_priority_order() {
        let api = Arc::new(ScriptedAuthority::new(Survey::OPEN, vec![]));
        let solver = solver_for(&api, Survey::OPEN);
        assert_eq!(solver.next_move(), Some(Direction::Down));

        let solver = solver_for(&api, Survey::open_towards(&[Direction::Left, Direction::Up]));
        assert_eq!(solver.next_move(), Some(Direction::Up));

        let solver = solver_for(&api, Survey::open_towards(&[Direction::Left, Direction::Right]));
        assert_eq!(solver.next_move(), Some(Direction::Right));

        let solver = solver_for(&api, Survey::CLOSED);
        assert_eq!(solver.next_move(), None);
    }

    #[test]
    fn test_next_move_skips_visited() {
        let api = Arc::new(ScriptedAuthority::new(Survey::OPEN, vec![]));
        let survey = Survey::open_towards(&[Direction::Down, Direction::Left]);
        let mut solver = solver_for(&api, survey);
        solver.visited.insert(Coordinate::new(0, 1));
        assert_eq!(solver.next_move(), Some(Direction::Left));
        solver.visited.insert(Coordinate::new(-1, 0));
        assert_eq!(solver.next_move(), None);
    }

    #[tokio::test]
    async fn test_forward_then_backtrack_uses_fresh_survey() {
        let api = Arc::new(ScriptedAuthority::new(
            Survey::open_towards(&[Direction::Down, Direction::Right]),
            vec![
                // down into a dead end
                Ok(MoveOutcome::Continue(Survey::open_towards(&[Direction::Up]))),
                // back up: the authority now reports only right open
                Ok(MoveOutcome::Continue(Survey::open_towards(&[Direction::Right]))),
            ],
        ));
        let mut solver = Solver::start(api.clone()).await.unwrap();

        assert_eq!(solver.step().await.unwrap(), EngineState::Exploring);
        assert_eq!(solver.position(), Coordinate::new(0, 1));
        assert_eq!(solver.breadcrumbs().as_slice(), &[Direction::Down]);

        assert_eq!(solver.step().await.unwrap(), EngineState::Backtracking);
        assert_eq!(solver.position(), Coordinate::ORIGIN);
        assert!(solver.breadcrumbs().is_empty());
        assert_eq!(solver.survey(), Survey::open_towards(&[Direction::Right]));
        assert_eq!(solver.next_move(), Some(Direction::Right));
        assert_eq!(api.moves().await, vec![Direction::Down, Direction::Up]);
        assert_eq!(solver.stats(), MoveStats { forward: 1, backtrack: 1 });
    }

    #[tokio::test]
    async fn test_victory_on_kth_move() {
        let api = Arc::new(ScriptedAuthority::new(
            Survey::open_towards(&[Direction::Right]),
            vec![
                Ok(MoveOutcome::Continue(Survey::open_towards(&[
                    Direction::Left,
                    Direction::Right,
                ]))),
                Ok(MoveOutcome::Continue(Survey::open_towards(&[
                    Direction::Left,
                    Direction::Down,
                ]))),
                Ok(MoveOutcome::Victory {
                    survey: Survey::open_towards(&[Direction::Up]),
                    message: Some("Victory!".to_string()),
                }),
            ],
        ));
        let mut solver = Solver::start(api.clone()).await.unwrap();
        let outcome = solver.solve().await.unwrap();
        assert_eq!(
            outcome,
            EpisodeOutcome::Solved {
                steps: 3,
                message: Some("Victory!".to_string())
            }
        );
        assert_eq!(solver.breadcrumbs().len(), 3);
        assert_eq!(api.moves().await.len(), 3);
        assert_eq!(solver.position(), Coordinate::new(2, 1));
    }

    #[tokio::test]
    async fn test_transport_failure_is_fatal() {
        let api = Arc::new(ScriptedAuthority::new(
            Survey::open_towards(&[Direction::Down]),
            vec![Err(MazeError::transport("move/down", "connection reset"))],
        ));
        let mut solver = Solver::start(api.clone()).await.unwrap();
        let err = solver.solve().await.unwrap_err();
        assert!(matches!(err, MazeError::Transport { .. }));
        assert_eq!(solver.state(), EngineState::Failed);
        assert_eq!(solver.position(), Coordinate::ORIGIN);
        assert!(solver.breadcrumbs().is_empty());

        // A failed engine never calls the authority again.
        assert_eq!(solver.step().await.unwrap(), EngineState::Failed);
        assert_eq!(api.moves().await.len(), 1);
    }

    #[tokio::test]
    async fn test_failed_backtrack_keeps_history_consistent() {
        let api = Arc::new(ScriptedAuthority::new(
            Survey::open_towards(&[Direction::Down]),
            vec![
                Ok(MoveOutcome::Continue(Survey::open_towards(&[Direction::Up]))),
                Err(MazeError::transport("move/up", "timed out")),
            ],
        ));
        let mut solver = Solver::start(api).await.unwrap();
        assert!(solver.solve().await.is_err());
        assert_eq!(
            solver.breadcrumbs().replay(Coordinate::ORIGIN),
            solver.position()
        );
    }
}
