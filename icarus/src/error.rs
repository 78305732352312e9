use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum MazeError {
    #[error("Invalid direction: {0:?}")]
    InvalidDirection(String),

    #[error("No breadcrumbs left to backtrack")]
    EmptyHistory,

    #[error("Transport failure at {endpoint}: {reason}")]
    Transport { endpoint: String, reason: String },
}

impl MazeError {
    pub fn transport(endpoint: impl Into<String>, reason: impl ToString) -> Self {
        MazeError::Transport {
            endpoint: endpoint.into(),
            reason: reason.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, MazeError>;
