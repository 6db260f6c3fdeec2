//! The corpus exporter — turns a sequence of raw records into a directory of
//! WAV files plus a metadata index, skipping malformed input without aborting
//! the run.

use std::error::Error;
use std::io;
use std::path::{Path, PathBuf};

use crate::audio::AudioWriter;
use crate::metadata::{MetadataEntry, MetadataSink};
use crate::record::{Record, SkipReason};

/// Items consumed by the exporter: a record, or a per-record source failure.
pub type RecordResult = Result<Record, Box<dyn Error + Send + Sync>>;

/// Filename of the metadata index inside the output directory.
pub const METADATA_FILENAME: &str = "metadata.csv";

/// On-disk arrangement of saved audio files.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Layout {
    /// `<output_dir>/<client_id>_<index>.wav`
    Flat,
    /// `<output_dir>/<first two chars of client_id>/<client_id>_<index>.wav`,
    /// keeps any single directory from accumulating excessive files.
    #[default]
    ClientPrefix,
}

impl Layout {
    /// Parse CLI/config string into enum
    pub fn from_name(s: &str) -> Option<Self> {
        match s {
            "flat" => Some(Self::Flat),
            "client-prefix" => Some(Self::ClientPrefix),
            _ => None,
        }
    }

    /// Relative destination for a record. The positional index keeps paths
    /// unique even when records share a `client_id`.
    pub fn relative_path(self, client_id: &str, index: usize) -> PathBuf {
        let filename = format!("{client_id}_{index}.wav");
        match self {
            Self::Flat => PathBuf::from(filename),
            Self::ClientPrefix => {
                let prefix: String = client_id.chars().take(2).collect();
                PathBuf::from(prefix).join(filename)
            }
        }
    }
}

impl std::fmt::Display for Layout {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::Flat => "flat",
            Self::ClientPrefix => "client-prefix",
        })
    }
}

/// Exporter configuration.
#[derive(Debug, Clone)]
pub struct ExportOptions {
    /// Destination directory, created if absent.
    pub output_dir: PathBuf,
    pub layout: Layout,
    /// Records whose locale differs are excluded before validation.
    pub locale_filter: Option<String>,
}

/// Per-record outcome.
#[derive(Debug, Clone, PartialEq)]
pub enum ExportOutcome {
    /// Audio written and metadata line appended; holds the on-disk path.
    Saved(PathBuf),
    Skipped(SkipReason),
    /// Excluded by the locale filter — consumes no index and no tally.
    Filtered,
}

/// Running counters for one export run.
///
/// Invariant: `saved + skipped() == considered`. Filtered records appear in
/// neither side of that equation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ExportStats {
    /// Records considered after the locale filter.
    pub considered: usize,
    pub saved: usize,
    pub invalid_audio: usize,
    pub empty_audio: usize,
    pub write_failed: usize,
    pub record_errors: usize,
    /// Locale mismatches, excluded upstream.
    pub filtered: usize,
}

impl ExportStats {
    /// Total skipped, all reasons.
    pub fn skipped(&self) -> usize {
        self.invalid_audio + self.empty_audio + self.write_failed + self.record_errors
    }
}

/// The corpus exporter.
///
/// Single-threaded and synchronous: each record is fully processed before the
/// next is considered. The metadata index is opened on construction and
/// flushed by [`finish`](Self::finish); its `Drop` fallback covers early
/// termination, so stopping mid-stream never corrupts the index.
#[derive(Debug)]
pub struct Exporter<W> {
    options: ExportOptions,
    writer: W,
    metadata: MetadataSink,
    stats: ExportStats,
    index: usize,
}

impl<W: AudioWriter> Exporter<W> {
    /// Create the output directory and open the metadata index.
    pub fn new(options: ExportOptions, writer: W) -> io::Result<Self> {
        std::fs::create_dir_all(&options.output_dir)?;
        let metadata = MetadataSink::create(&options.output_dir.join(METADATA_FILENAME))?;
        Ok(Self {
            options,
            writer,
            metadata,
            stats: ExportStats::default(),
            index: 0,
        })
    }

    pub fn stats(&self) -> &ExportStats {
        &self.stats
    }

    /// Path of the metadata index file.
    pub fn metadata_path(&self) -> &Path {
        self.metadata.path()
    }

    /// Process one item from the source.
    ///
    /// Failures never cross the record boundary: every error path is
    /// classified, counted, and logged with the record's positional index.
    pub fn process(&mut self, item: RecordResult) -> ExportOutcome {
        let record = match item {
            Ok(record) => record,
            Err(e) => {
                let index = self.bump_index();
                log::warn!("record {index}: {e}");
                return self.skip(SkipReason::RecordError);
            }
        };

        if let Some(filter) = &self.options.locale_filter {
            if record.locale != *filter {
                self.stats.filtered += 1;
                return ExportOutcome::Filtered;
            }
        }

        let index = self.bump_index();

        let audio = match record.valid_audio() {
            Ok(audio) => audio,
            Err(reason) => {
                log::warn!("record {index} ({}): {reason}", record.client_id);
                return self.skip(reason);
            }
        };

        let relative = self.options.layout.relative_path(&record.client_id, index);
        let audio_path = self.options.output_dir.join(&relative);
        if let Some(parent) = audio_path.parent() {
            if let Err(e) = std::fs::create_dir_all(parent) {
                log::warn!(
                    "record {index} ({}): cannot create {}: {e}",
                    record.client_id,
                    parent.display()
                );
                return self.skip(SkipReason::WriteFailed);
            }
        }

        // sampling_rate validated positive above
        let rate = audio.sampling_rate as u32;
        if let Err(e) = self.writer.write(&audio_path, &audio.samples, rate) {
            log::warn!("record {index} ({}): write failed: {e}", record.client_id);
            return self.skip(SkipReason::WriteFailed);
        }
        if !audio_path.exists() {
            log::warn!(
                "record {index} ({}): writer left no file at {}",
                record.client_id,
                audio_path.display()
            );
            return self.skip(SkipReason::WriteFailed);
        }

        let entry = MetadataEntry {
            client_id: record.client_id,
            sentence: record.sentence,
            audio_path: relative,
        };
        if let Err(e) = self.metadata.append(&entry) {
            log::warn!("record {index} ({}): metadata append failed: {e}", entry.client_id);
            return self.skip(SkipReason::WriteFailed);
        }

        self.stats.saved += 1;
        ExportOutcome::Saved(audio_path)
    }

    /// Flush the metadata index and return the final counters.
    pub fn finish(self) -> io::Result<ExportStats> {
        self.metadata.finalize()?;
        Ok(self.stats)
    }

    fn bump_index(&mut self) -> usize {
        let index = self.index;
        self.index += 1;
        self.stats.considered += 1;
        index
    }

    fn skip(&mut self, reason: SkipReason) -> ExportOutcome {
        match reason {
            SkipReason::InvalidAudio => self.stats.invalid_audio += 1,
            SkipReason::EmptyAudio => self.stats.empty_audio += 1,
            SkipReason::WriteFailed => self.stats.write_failed += 1,
            SkipReason::RecordError => self.stats.record_errors += 1,
        }
        ExportOutcome::Skipped(reason)
    }
}

/// Drive a full export over `records`.
///
/// Convenience wrapper around [`Exporter`] for callers that need no
/// per-record interleaving (progress bars, shutdown checks).
pub fn export<W: AudioWriter>(
    records: impl IntoIterator<Item = RecordResult>,
    options: ExportOptions,
    writer: W,
) -> io::Result<ExportStats> {
    let mut exporter = Exporter::new(options, writer)?;
    for item in records {
        exporter.process(item);
    }
    exporter.finish()
}
