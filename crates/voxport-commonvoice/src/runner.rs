//! Main execution logic for the Common Voice exporter

use std::time::Instant;

use anyhow::Context;

use voxport_core::progress::fmt_num;
use voxport_core::{
    ExportOptions, Exporter, SharedProgress, WavAudioWriter, cleanup_tmp_files,
    is_shutdown_requested,
};

use crate::config::Config;
use crate::hub::{self, HubRowSource};
use crate::stats::Summary;

/// Run the Common Voice export pipeline.
///
/// Startup failures (missing/rejected credential, unwritable output
/// directory) abort before any record is consumed; everything after that is
/// handled at the record boundary and the run always ends with a summary.
pub fn run(config: &Config, progress: &SharedProgress) -> anyhow::Result<Summary> {
    let start = Instant::now();

    anyhow::ensure!(
        !config.token.is_empty(),
        "hub credential is missing; set HF_TOKEN or `token` in voxport.toml"
    );

    let stage = progress.stage_line("auth");
    stage.set_message("verifying hub credential...");
    let account = hub::verify_token(&config.token)?;
    stage.finish_and_clear();
    log::info!("Authenticated as {account}");

    std::fs::create_dir_all(&config.output_dir).context("Cannot create output directory")?;
    cleanup_tmp_files(&config.output_dir).context("Failed to clean stale tmp files")?;

    log::info!(
        "voxport starting: dataset={}, config={}, split={}, locale_filter={:?}, layout={}, output={}",
        config.dataset,
        config.language,
        config.split,
        config.locale_filter,
        config.layout,
        config.output_dir.display()
    );

    let options = ExportOptions {
        output_dir: config.output_dir.clone(),
        layout: config.layout,
        locale_filter: config.locale_filter.clone(),
    };
    let mut exporter =
        Exporter::new(options, WavAudioWriter).context("Cannot open metadata index")?;

    let mut source = HubRowSource::new(config);
    let pb = progress.record_bar("records", config.max_records.map(|n| n as u64));
    let mut consumed = 0usize;
    let mut interrupted = false;

    for item in &mut source {
        if is_shutdown_requested() {
            interrupted = true;
            break;
        }
        if config.max_records.is_some_and(|max| consumed >= max) {
            break;
        }
        consumed += 1;

        exporter.process(item);

        let stats = exporter.stats();
        pb.inc(1);
        pb.set_message(format!(
            "{} saved, {} skipped",
            fmt_num(stats.saved),
            fmt_num(stats.skipped())
        ));
        if consumed % 100 == 0 {
            log::debug!(
                "{} records consumed: {} saved, {} skipped",
                fmt_num(consumed),
                fmt_num(stats.saved),
                fmt_num(stats.skipped())
            );
        }
    }
    pb.finish_and_clear();

    if let Some(total) = source.total_rows() {
        log::debug!(
            "Split reports {} total rows; consumed {}",
            fmt_num(total as usize),
            fmt_num(consumed)
        );
    }

    let metadata_path = exporter.metadata_path().to_path_buf();
    let stats = exporter.finish().context("Cannot finalize metadata index")?;
    if interrupted {
        log::warn!("Shutdown requested, stopping early");
    }

    let summary = Summary {
        dataset: config.dataset.clone(),
        split: config.split.clone(),
        stats,
        interrupted,
        elapsed: start.elapsed(),
    };

    if progress.is_tty() {
        summary.print();
    } else {
        summary.log();
    }
    log::info!(
        "Corpus saved at {}; metadata at {}",
        config.output_dir.display(),
        metadata_path.display()
    );

    Ok(summary)
}
