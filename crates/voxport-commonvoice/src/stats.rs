//! Summary reporting for an export run.
//!
//! TTY mode renders a table; non-TTY mode logs the same numbers so they land
//! in aggregated logs.

use std::time::Duration;

use comfy_table::{Cell, Color, Table, modifiers::UTF8_ROUND_CORNERS, presets::UTF8_FULL};

use voxport_core::ExportStats;
use voxport_core::progress::fmt_num;

/// Aggregated result of one export run.
#[derive(Debug)]
pub struct Summary {
    pub dataset: String,
    pub split: String,
    pub stats: ExportStats,
    /// True when the run stopped early on a shutdown request.
    pub interrupted: bool,
    pub elapsed: Duration,
}

fn pct(part: usize, total: usize) -> f64 {
    if total == 0 {
        0.0
    } else {
        part as f64 / total as f64 * 100.0
    }
}

impl Summary {
    /// Format summary table as a string.
    pub fn format_table(&self) -> String {
        let s = &self.stats;
        let mut table = Table::new();
        table
            .load_preset(UTF8_FULL)
            .apply_modifier(UTF8_ROUND_CORNERS)
            .set_header(vec![
                Cell::new(format!("Corpus Export: {} [{}]", self.dataset, self.split))
                    .fg(Color::Cyan)
                    .add_attribute(comfy_table::Attribute::Bold),
                Cell::new("Value").fg(Color::Cyan),
                Cell::new("%").fg(Color::Cyan),
            ]);

        table.add_row(vec![
            Cell::new("Considered"),
            Cell::new(fmt_num(s.considered)),
            Cell::new(""),
        ]);
        table.add_row(vec![
            Cell::new("Saved"),
            Cell::new(fmt_num(s.saved)).fg(Color::Green),
            Cell::new(format!("{:.1}", pct(s.saved, s.considered))),
        ]);
        table.add_row(vec![
            Cell::new("Invalid audio"),
            Cell::new(fmt_num(s.invalid_audio)),
            Cell::new(format!("{:.1}", pct(s.invalid_audio, s.considered))),
        ]);
        table.add_row(vec![
            Cell::new("Empty audio"),
            Cell::new(fmt_num(s.empty_audio)),
            Cell::new(format!("{:.1}", pct(s.empty_audio, s.considered))),
        ]);
        table.add_row(vec![
            Cell::new("Write failures"),
            Cell::new(fmt_num(s.write_failed)),
            Cell::new(format!("{:.1}", pct(s.write_failed, s.considered))),
        ]);
        table.add_row(vec![
            Cell::new("Record errors"),
            Cell::new(fmt_num(s.record_errors)),
            Cell::new(format!("{:.1}", pct(s.record_errors, s.considered))),
        ]);
        table.add_row(vec![
            Cell::new("Locale filtered"),
            Cell::new(fmt_num(s.filtered)),
            Cell::new(""),
        ]);
        table.add_row(vec![
            Cell::new("Time"),
            Cell::new(format!("{:.1}s", self.elapsed.as_secs_f64())),
            Cell::new(""),
        ]);

        table.to_string()
    }

    /// Print the summary table (TTY mode).
    pub fn print(&self) {
        eprintln!("\n{}", self.format_table());
        if self.interrupted {
            eprintln!("(run interrupted — partial export)");
        }
    }

    /// Log the summary (non-TTY mode).
    pub fn log(&self) {
        let s = &self.stats;
        log::info!("=== Corpus Export Summary ===");
        log::info!("Dataset: {} [{}]", self.dataset, self.split);
        log::info!(
            "Records: {} considered, {} saved, {} skipped",
            fmt_num(s.considered),
            fmt_num(s.saved),
            fmt_num(s.skipped())
        );
        log::info!(
            "Skips: {} invalid audio, {} empty audio, {} write failures, {} record errors",
            fmt_num(s.invalid_audio),
            fmt_num(s.empty_audio),
            fmt_num(s.write_failed),
            fmt_num(s.record_errors)
        );
        if s.filtered > 0 {
            log::info!("Locale filtered: {}", fmt_num(s.filtered));
        }
        log::info!("Time: {:.1}s", self.elapsed.as_secs_f64());
        if self.interrupted {
            log::warn!("Run interrupted — partial export");
        }
    }
}
