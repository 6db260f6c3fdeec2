//! Voxport Common Voice - speech corpus export pipeline
//!
//! Streams Common Voice rows from the Hugging Face hub and materializes
//! valid rows as WAV files plus a pipe-delimited metadata index.
//!
//! # Example
//!
//! ```ignore
//! use voxport_commonvoice::{Config, run};
//!
//! let config = Config {
//!     token: std::env::var("HF_TOKEN")?,
//!     output_dir: "filtered_common_voice".into(),
//!     max_records: Some(500),
//!     ..Default::default()
//! };
//!
//! let summary = run(&config, &progress)?;
//! println!("Saved {} clips", summary.stats.saved);
//! ```

pub mod config;
pub mod hub;
pub mod rows;
pub mod runner;
pub mod stats;

// Re-exports
pub use config::Config;
pub use runner::run;
pub use stats::Summary;
