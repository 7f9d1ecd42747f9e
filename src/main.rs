//! devconsole - Entry Point

use clap::Parser;
use devconsole::model::AppError;
use devconsole::overlay::OverlayOptions;
use devconsole::view::ColorConfig;
use std::path::PathBuf;
use tracing::info;

/// devconsole - virtualized developer console for JSONL console calls
#[derive(Parser, Debug)]
#[command(name = "devconsole")]
#[command(version)]
#[command(about = "Virtualized developer console for JSONL console calls")]
pub struct Args {
    /// Path to JSONL call file (reads from stdin if not provided)
    pub file: Option<PathBuf>,

    /// Follow the file for new calls (like tail -f)
    #[arg(short, long)]
    pub follow: bool,

    /// Disable colors
    #[arg(long)]
    pub no_color: bool,

    /// Path to configuration file
    #[arg(long)]
    pub config: Option<PathBuf>,
}

fn main() -> Result<(), AppError> {
    let args = Args::parse();

    // Defaults → Config File → Env Vars → CLI Args
    let config = {
        let config_file = devconsole::config::load_config_with_precedence(args.config.clone())?;
        let merged = devconsole::config::merge_config(config_file);
        let with_env = devconsole::config::apply_env_overrides(merged);

        // Only an explicit flag overrides follow
        let follow_override = args.follow.then_some(true);
        devconsole::config::apply_cli_overrides(with_env, follow_override)
    };

    devconsole::logging::init(&config.log_file_path)?;

    info!(config = ?config, "Configuration loaded and resolved");

    let input_source = devconsole::source::detect_input_source(args.file.clone(), config.follow)?;

    devconsole::view::run_with_source(
        input_source,
        OverlayOptions::from(&config),
        ColorConfig::from_env_and_args(args.no_color),
    )?;

    Ok(())
}
