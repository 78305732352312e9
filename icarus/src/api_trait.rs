use crate::error::Result;
use crate::maze::{Direction, Survey};
use async_trait::async_trait;

/// Result of a single accepted move.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MoveOutcome {
    Continue(Survey),
    Victory {
        survey: Survey,
        message: Option<String>,
    },
}

impl MoveOutcome {
    pub fn survey(&self) -> Survey {
        match self {
            MoveOutcome::Continue(survey) => *survey,
            MoveOutcome::Victory { survey, .. } => *survey,
        }
    }

    pub fn is_victory(&self) -> bool {
        matches!(self, MoveOutcome::Victory { .. })
    }
}

/// The maze authority: sole source of truth about walls and the exit.
#[async_trait]
pub trait Authority: Send + Sync {
    /// Survey of the start cell. Does not consume a move.
    async fn awake(&self) -> Result<Survey>;
    /// Moves the agent one cell; exactly one round trip.
    async fn step(&self, direction: Direction) -> Result<MoveOutcome>;
    /// Sent once after all episodes have finished.
    async fn done(&self) -> Result<()>;
}
