//! Voxport Core - Common infrastructure for speech corpus export
//!
//! This crate provides the reusable pieces of the corpus pipeline:
//! record validation, the export loop, WAV and metadata sinks, and the
//! shared HTTP/progress/logging plumbing.

pub mod audio;
pub mod export;
pub mod logging;
pub mod metadata;
pub mod progress;
pub mod record;
pub mod shutdown;
pub mod stream;

// Re-exports for convenience
pub use audio::{AudioWriter, WavAudioWriter, cleanup_tmp_files, is_valid_wav};
pub use export::{ExportOptions, ExportOutcome, ExportStats, Exporter, Layout, RecordResult, export};
pub use logging::{IndicatifLogger, init_logging};
pub use metadata::{METADATA_HEADER, MetadataEntry, MetadataSink};
pub use progress::{ProgressContext, SharedProgress};
pub use record::{AudioData, Record, SkipReason};
pub use shutdown::{
    install_signal_handlers, is_shutdown_requested, request_shutdown, shutdown_flag,
};
pub use stream::{SHARED_RUNTIME, StreamError, http_client};
