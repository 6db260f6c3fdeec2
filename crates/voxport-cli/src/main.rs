//! voxport - Speech corpus exporter
//!
//! Streams a speech dataset split from the Hugging Face hub and writes
//! selected audio clips plus a metadata index to local disk.

use std::process::ExitCode;
use std::sync::Arc;

use clap::{Parser, Subcommand};

mod cmd;
mod config;

use config::FileConfig;

#[derive(Parser)]
#[command(name = "voxport")]
#[command(about = "Export speech datasets from the Hugging Face hub to a local corpus")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Enable debug logging
    #[arg(long, global = true)]
    debug: bool,

    /// Config file path (default: ./voxport.toml or ~/.config/voxport/config.toml)
    #[arg(short, long, global = true)]
    config: Option<std::path::PathBuf>,
}

#[derive(Subcommand)]
enum Command {
    /// Export a dataset split to WAV files plus a metadata index
    Export(cmd::export::ExportArgs),
    /// Show current configuration
    Config,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    // Progress context (TTY auto-detect)
    let progress = Arc::new(voxport_core::ProgressContext::new());

    // Logging:
    //   TTY:     quiet (warn) unless --debug  — progress bars show activity
    //   non-TTY: info unless --debug          — logs are the only progress indicator
    let is_tty = progress.is_tty();
    let multi = if is_tty { Some(progress.multi()) } else { None };
    let quiet = if is_tty { !cli.debug } else { false };
    voxport_core::init_logging(quiet, cli.debug, multi);

    let file_config = match FileConfig::resolve(cli.config.as_deref()) {
        Ok(c) => c,
        Err(e) => {
            log::error!("Configuration error: {e:#}");
            return ExitCode::from(2);
        }
    };

    match cli.command {
        Command::Export(args) => cmd::export::run(args, &file_config, &progress),
        Command::Config => {
            use comfy_table::{
                Cell, Color, Table, modifiers::UTF8_ROUND_CORNERS, presets::UTF8_FULL,
            };

            let mut table = Table::new();
            table
                .load_preset(UTF8_FULL)
                .apply_modifier(UTF8_ROUND_CORNERS)
                .set_header(vec![
                    Cell::new("Setting").fg(Color::Cyan),
                    Cell::new("Value").fg(Color::Cyan),
                ]);

            table.add_row(vec![
                "Hub token",
                if file_config.hub.token.is_some() {
                    "configured"
                } else {
                    "not set"
                },
            ]);
            table.add_row(vec![
                "Page cache",
                &file_config
                    .hub
                    .cache_dir
                    .as_ref()
                    .map_or("disabled".to_string(), |d| d.display().to_string()),
            ]);
            table.add_row(vec!["Dataset", &file_config.dataset.repo]);
            table.add_row(vec!["Language", &file_config.dataset.language]);
            table.add_row(vec!["Split", &file_config.dataset.split]);
            table.add_row(vec![
                "Locale filter",
                file_config
                    .dataset
                    .locale_filter
                    .as_deref()
                    .unwrap_or("none"),
            ]);
            table.add_row(vec![
                "Output directory",
                &file_config.output.dir.display().to_string(),
            ]);
            table.add_row(vec!["Layout", &file_config.output.layout]);

            eprintln!("\n{table}");
            ExitCode::SUCCESS
        }
    }
}
