//! Export subcommand - run the Common Voice pipeline

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Args;

use voxport_commonvoice::Config;
use voxport_core::{Layout, SharedProgress, install_signal_handlers};

use crate::config::FileConfig;

#[derive(Args, Debug)]
pub struct ExportArgs {
    /// Dataset repository id on the hub
    #[arg(long)]
    pub dataset: Option<String>,

    /// Dataset config name (language code)
    #[arg(long)]
    pub language: Option<String>,

    /// Split to export
    #[arg(long)]
    pub split: Option<String>,

    /// Output directory
    #[arg(short, long)]
    pub output_dir: Option<PathBuf>,

    /// Keep only records with this locale
    #[arg(long)]
    pub locale: Option<String>,

    /// Audio file layout: flat | client-prefix
    #[arg(long)]
    pub layout: Option<String>,

    /// Max records to consume (for testing)
    #[arg(long)]
    pub max_records: Option<usize>,
}

/// Merge CLI overrides over file config into the pipeline config.
fn build_config(args: &ExportArgs, file: &FileConfig) -> anyhow::Result<Config> {
    let layout_name = args
        .layout
        .clone()
        .unwrap_or_else(|| file.output.layout.clone());
    let layout = Layout::from_name(&layout_name)
        .ok_or_else(|| anyhow::anyhow!("Unknown layout: {layout_name}"))?;

    Ok(Config {
        token: file.hub.token.clone().unwrap_or_default(),
        dataset: args
            .dataset
            .clone()
            .unwrap_or_else(|| file.dataset.repo.clone()),
        language: args
            .language
            .clone()
            .unwrap_or_else(|| file.dataset.language.clone()),
        split: args
            .split
            .clone()
            .unwrap_or_else(|| file.dataset.split.clone()),
        output_dir: args
            .output_dir
            .clone()
            .unwrap_or_else(|| file.output.dir.clone()),
        cache_dir: file.hub.cache_dir.clone(),
        locale_filter: args
            .locale
            .clone()
            .or_else(|| file.dataset.locale_filter.clone()),
        layout,
        max_records: args.max_records,
    })
}

pub fn run(args: ExportArgs, file: &FileConfig, progress: &SharedProgress) -> ExitCode {
    if let Err(e) = install_signal_handlers() {
        log::error!("Failed to register signal handlers: {e}");
        return ExitCode::from(2);
    }

    let config = match build_config(&args, file) {
        Ok(c) => c,
        Err(e) => {
            log::error!("Configuration error: {e:#}");
            return ExitCode::from(2);
        }
    };

    match voxport_commonvoice::run(&config, progress) {
        Ok(summary) if summary.interrupted => ExitCode::from(130),
        Ok(_) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("Fatal error: {e:#}");
            ExitCode::from(2)
        }
    }
}
