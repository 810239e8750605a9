//! Worker configuration from environment variables

use std::env;
use std::path::PathBuf;

use tracing::info;

use crate::error::WorkerError;

#[derive(Clone, Debug)]
pub struct WorkerConfig {
    /// PGN file to load
    pub pgn_path: PathBuf,

    /// JSON-lines analysis feed (`{"node_id": ..., "result": ...}` per line)
    pub analysis_path: Option<PathBuf>,

    /// Where to write the JSON report (stdout when unset)
    pub output_path: Option<PathBuf>,

    /// UCI lines explored from the root, e.g. `d2d4 d7d5;c2c4`
    pub explore_lines: Vec<Vec<String>>,

    /// Capacity of the analysis feed channel
    pub feed_channel_capacity: usize,
}

impl WorkerConfig {
    /// Load configuration from environment variables.
    /// A `--pgn <path>` argument takes precedence over PGN_PATH.
    pub fn load() -> Result<Self, WorkerError> {
        let args: Vec<String> = env::args().collect();
        let config = Self::from_lookup(|key| env::var(key).ok(), &args)?;
        info!(
            pgn_path = %config.pgn_path.display(),
            analysis = config.analysis_path.is_some(),
            explore_lines = config.explore_lines.len(),
            "Worker config loaded"
        );
        Ok(config)
    }

    /// Build the configuration from a variable lookup and CLI arguments.
    pub fn from_lookup<F>(lookup: F, args: &[String]) -> Result<Self, WorkerError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let pgn_path = parse_pgn_arg(args)
            .or_else(|| lookup("PGN_PATH"))
            .map(PathBuf::from)
            .ok_or(WorkerError::Config("PGN_PATH not set"))?;

        let analysis_path = lookup("ANALYSIS_PATH").map(PathBuf::from);
        let output_path = lookup("OUTPUT_PATH").map(PathBuf::from);

        let explore_lines = lookup("EXPLORE_LINES")
            .map(|v| parse_explore_lines(&v))
            .unwrap_or_default();

        let feed_channel_capacity = lookup("FEED_CHANNEL_CAPACITY")
            .and_then(|v| v.parse().ok())
            .filter(|&n: &usize| n > 0)
            .unwrap_or(64);

        Ok(Self {
            pgn_path,
            analysis_path,
            output_path,
            explore_lines,
            feed_channel_capacity,
        })
    }
}

/// Parse --pgn path/to/game.pgn from CLI args
fn parse_pgn_arg(args: &[String]) -> Option<String> {
    args.iter()
        .position(|a| a == "--pgn")
        .and_then(|i| args.get(i + 1))
        .cloned()
}

fn parse_explore_lines(value: &str) -> Vec<Vec<String>> {
    value
        .split(';')
        .map(|line| line.split_whitespace().map(String::from).collect::<Vec<_>>())
        .filter(|line| !line.is_empty())
        .collect()
}
