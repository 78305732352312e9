use crate::api_trait::Authority;
use crate::config::Config;
use crate::error::Result;
use crate::solver::{EpisodeOutcome, Solver};
use std::sync::Arc;
use tracing::{error, warn};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EpisodeReport {
    Solved {
        steps: usize,
        forward_moves: usize,
        backtrack_moves: usize,
        message: Option<String>,
    },
    Stuck,
    Failed(String),
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub episodes: Vec<EpisodeReport>,
}

impl RunSummary {
    pub fn solved(&self) -> usize {
        self.count(|r| matches!(r, EpisodeReport::Solved { .. }))
    }

    pub fn stuck(&self) -> usize {
        self.count(|r| matches!(r, EpisodeReport::Stuck))
    }

    pub fn failed(&self) -> usize {
        self.count(|r| matches!(r, EpisodeReport::Failed(_)))
    }

    fn count(&self, pred: impl Fn(&EpisodeReport) -> bool) -> usize {
        self.episodes.iter().filter(|r| pred(r)).count()
    }
}

/// Solves `times` mazes one after another, then tells the authority it is done.
pub struct Runner {
    api: Arc<dyn Authority>,
    times: usize,
}

impl Runner {
    pub fn new(api: Arc<dyn Authority>, config: &Config) -> Self {
        Self {
            api,
            times: config.times,
        }
    }

    pub async fn run(&self) -> RunSummary {
        let mut summary = RunSummary::default();

        for episode in 0..self.times {
            let report = match self.run_episode().await {
                Ok(report) => report,
                Err(e) => {
                    error!(episode = episode + 1, "Episode failed: {}", e);
                    EpisodeReport::Failed(e.to_string())
                }
            };
            summary.episodes.push(report);
        }

        if let Err(e) = self.api.done().await {
            warn!("Failed to notify authority of completion: {}", e);
        }
        summary
    }

    async fn run_episode(&self) -> Result<EpisodeReport> {
        let mut solver = Solver::start(self.api.clone()).await?;
        let outcome = solver.solve().await?;
        let stats = solver.stats();
        Ok(match outcome {
            EpisodeOutcome::Solved { steps, message } => EpisodeReport::Solved {
                steps,
                forward_moves: stats.forward,
                backtrack_moves: stats.backtrack,
                message,
            },
            EpisodeOutcome::Stuck => EpisodeReport::Stuck,
        })
    }
}
