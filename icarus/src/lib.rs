pub mod api;
pub mod api_trait;
pub mod breadcrumbs;
pub mod config;
pub mod error;
pub mod maze;
pub mod mock_api;
pub mod runner;
pub mod solver;

pub use api::ApiClient;
pub use api_trait::{Authority, MoveOutcome};
pub use config::Config;
pub use error::MazeError;
pub use maze::{Coordinate, Direction, Survey};
pub use runner::{EpisodeReport, RunSummary, Runner};
pub use solver::{EngineState, EpisodeOutcome, Solver};
