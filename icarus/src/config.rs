use std::time::Duration;

pub const DEFAULT_PORT: u16 = 8001;
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);
pub const BASE_URL_ENV: &str = "ICARUS_BASE_URL";

/// Settings for one run of the explorer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Address of the maze authority, without trailing slash.
    pub base_url: String,
    /// Number of mazes to solve before sending `done`.
    pub times: usize,
    /// Per-request timeout; `None` waits forever.
    pub move_timeout: Option<Duration>,
}

impl Config {
    pub fn new(base_url: impl Into<String>, times: usize, move_timeout: Option<Duration>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            base_url,
            times,
            move_timeout,
        }
    }

    pub fn local(port: u16) -> Self {
        Self::new(format!("http://127.0.0.1:{}", port), 1, Some(DEFAULT_TIMEOUT))
    }

    pub fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::local(DEFAULT_PORT)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_points_at_local_authority() {
        let config = Config::default();
        assert_eq!(config.base_url, "http://127.0.0.1:8001");
        assert_eq!(config.times, 1);
        assert_eq!(config.move_timeout, Some(DEFAULT_TIMEOUT));
    }

    #[test]
    fn test_endpoint_joins_single_slash() {
        let config = Config::new("http://maze.local:9000/", 3, None);
        assert_eq!(config.endpoint("awake"), "http://maze.local:9000/awake");
        assert_eq!(config.endpoint("/move/up"), "http://maze.local:9000/move/up");
    }
}
