use anyhow::{Context, Result};
use clap::Parser;
use icarus::config::{BASE_URL_ENV, DEFAULT_PORT};
use icarus::mock_api::{GridAuthority, GridMaze};
use icarus::{ApiClient, Authority, Config, EpisodeReport, Runner};
use std::sync::Arc;
use std::time::Duration;

#[derive(Parser, Debug)]
#[command(name = "icarus")]
#[command(about = "Wakes up in a dark labyrinth and feels its way to the exit", long_about = None)]
struct Args {
    /// Port of the local maze authority
    #[arg(short, long, default_value_t = DEFAULT_PORT)]
    port: u16,

    /// Full authority address (defaults to ICARUS_BASE_URL, then 127.0.0.1:<port>)
    #[arg(long)]
    base_url: Option<String>,

    /// Number of mazes to solve
    #[arg(short, long, default_value = "1")]
    times: usize,

    /// Per-request timeout in seconds, 0 to wait forever
    #[arg(long, default_value = "30")]
    timeout_secs: u64,

    /// Solve generated mazes in-process instead of calling an authority
    #[arg(long)]
    mock: bool,

    /// Mock maze width
    #[arg(long, default_value = "15")]
    width: usize,

    /// Mock maze height
    #[arg(long, default_value = "10")]
    height: usize,

    /// Mock maze seed
    #[arg(long, default_value = "42")]
    seed: u64,
}

impl Args {
    fn config(&self) -> Config {
        let base_url = self
            .base_url
            .clone()
            .or_else(|| std::env::var(BASE_URL_ENV).ok())
            .unwrap_or_else(|| Config::local(self.port).base_url);
        let timeout = (self.timeout_secs > 0).then(|| Duration::from_secs(self.timeout_secs));
        Config::new(base_url, self.times, timeout)
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let args = Args::parse();
    let config = args.config();

    let api: Arc<dyn Authority> = if args.mock {
        println!(
            "Using generated {}x{} maze (seed {})",
            args.width, args.height, args.seed
        );
        Arc::new(GridAuthority::new(GridMaze::generate(
            args.width, args.height, args.seed,
        )))
    } else {
        println!("Authority: {}", config.base_url);
        Arc::new(ApiClient::new(config.clone()).context("Failed to build HTTP client")?)
    };

    println!("Solving {} times", config.times);
    let summary = Runner::new(api, &config).run().await;

    for (i, report) in summary.episodes.iter().enumerate() {
        match report {
            EpisodeReport::Solved {
                steps,
                forward_moves,
                backtrack_moves,
                message,
            } => {
                if let Some(message) = message {
                    println!("[{}] {}", i + 1, message);
                }
                println!(
                    "[{}] Solution with {} steps found ({} forward, {} backtracking moves)",
                    i + 1,
                    steps,
                    forward_moves,
                    backtrack_moves
                );
            }
            EpisodeReport::Stuck => println!("[{}] No solution found.", i + 1),
            EpisodeReport::Failed(reason) => println!("[{}] An error happened: {}", i + 1, reason),
        }
    }
    println!(
        "Solved {}, stuck {}, failed {}",
        summary.solved(),
        summary.stuck(),
        summary.failed()
    );

    if summary.failed() > 0 {
        anyhow::bail!("{} of {} episodes failed", summary.failed(), summary.episodes.len());
    }
    Ok(())
}
