//! Move tree worker
//!
//! Loads a PGN game into a move tree, explores configured side lines,
//! attaches analysis results from a JSON-lines feed, and writes a JSON report.

use move_tree::pgn::parse_metadata;
use move_tree::{ChessGame, MoveTree};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use tree_worker::config::WorkerConfig;
use tree_worker::explore::explore_line;
use tree_worker::feed::{apply_feed, spawn_feed};
use tree_worker::report::{write_report, Report};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file for local dev
    let _ = dotenvy::dotenv();

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with_writer(std::io::stderr)
        .init();

    let config = WorkerConfig::load()?;

    // Start reading analysis while the tree is being built
    let feed = config
        .analysis_path
        .clone()
        .map(|path| spawn_feed(path, config.feed_channel_capacity));

    let pgn = tokio::fs::read_to_string(&config.pgn_path).await?;
    let mut tree = MoveTree::new();
    let mut game = ChessGame::new();
    let history = tree.build_from_notation(&pgn, &mut game)?;
    info!(
        plies = history.len(),
        clocks = tree.iter().filter(|n| n.clock_remaining.is_some()).count(),
        "Tree built"
    );

    for line in &config.explore_lines {
        explore_line(&mut tree, line)?;
    }

    if let Some((mut rx, handle)) = feed {
        let (applied, dropped) = apply_feed(&mut tree, &mut rx).await;
        match handle.await? {
            Ok(sent) => info!(sent, applied, dropped, "Analysis attached"),
            Err(e) => warn!(error = %e, applied, "Analysis feed failed"),
        }
    }

    let report = Report::new(parse_metadata(&pgn), &tree);
    write_report(&report, config.output_path.as_deref()).await?;

    info!(nodes = tree.len(), mainline = tree.mainline_len(), "Done");
    Ok(())
}
