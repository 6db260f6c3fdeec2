//! Audio output — WAV encoding behind a capability trait, atomic tmp→rename

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use hound::{SampleFormat, WavSpec, WavWriter};

/// Capability for persisting one record's samples to disk.
///
/// The exporter treats encoding as an injected dependency so tests can
/// substitute fakes and failure injectors.
pub trait AudioWriter {
    fn write(&self, path: &Path, samples: &[f32], sampling_rate: u32) -> io::Result<()>;
}

/// WAV encoder: mono, 32-bit float samples, written to a `.tmp` sibling and
/// renamed into place so a crash never leaves a truncated `.wav`.
#[derive(Debug, Clone, Copy, Default)]
pub struct WavAudioWriter;

impl AudioWriter for WavAudioWriter {
    fn write(&self, path: &Path, samples: &[f32], sampling_rate: u32) -> io::Result<()> {
        let tmp_path = tmp_path_for(path);

        // Clean up stale tmp file
        if tmp_path.exists() {
            fs::remove_file(&tmp_path)?;
        }

        let spec = WavSpec {
            channels: 1,
            sample_rate: sampling_rate,
            bits_per_sample: 32,
            sample_format: SampleFormat::Float,
        };
        let mut writer = WavWriter::create(&tmp_path, spec).map_err(io::Error::other)?;
        for &sample in samples {
            writer.write_sample(sample).map_err(io::Error::other)?;
        }
        writer.finalize().map_err(io::Error::other)?;

        fs::rename(&tmp_path, path)
    }
}

fn tmp_path_for(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_default();
    name.push(".tmp");
    path.with_file_name(name)
}

/// Check if a completed WAV file exists and has a readable header
pub fn is_valid_wav(path: &Path) -> bool {
    path.exists() && hound::WavReader::open(path).is_ok()
}

/// Remove stale .tmp files under the output directory, recursing into
/// per-client subdirectories.
pub fn cleanup_tmp_files(output_dir: &Path) -> io::Result<()> {
    for entry in fs::read_dir(output_dir)? {
        let entry = entry?;
        let path = entry.path();
        if path.is_dir() {
            cleanup_tmp_files(&path)?;
        } else if path.extension().is_some_and(|ext| ext == "tmp") {
            log::warn!("Removing stale tmp file: {}", path.display());
            fs::remove_file(&path)?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn write_produces_valid_wav() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("a.wav");
        WavAudioWriter
            .write(&path, &[0.1, -0.2, 0.3], 16_000)
            .unwrap();

        assert!(is_valid_wav(&path));
        let reader = hound::WavReader::open(&path).unwrap();
        assert_eq!(reader.spec().channels, 1);
        assert_eq!(reader.spec().sample_rate, 16_000);
        assert_eq!(reader.len(), 3);
    }

    #[test]
    fn write_leaves_no_tmp_behind() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("a.wav");
        WavAudioWriter.write(&path, &[0.0], 8_000).unwrap();
        assert!(!dir.path().join("a.wav.tmp").exists());
    }

    #[test]
    fn is_valid_wav_missing_file() {
        let dir = TempDir::new().unwrap();
        assert!(!is_valid_wav(&dir.path().join("nope.wav")));
    }

    #[test]
    fn is_valid_wav_not_wav() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("bad.wav");
        std::fs::write(&path, b"this is not a wav").unwrap();
        assert!(!is_valid_wav(&path));
    }

    #[test]
    fn cleanup_tmp_files_recurses_and_keeps_wavs() {
        let dir = TempDir::new().unwrap();
        let sub = dir.path().join("ab");
        std::fs::create_dir(&sub).unwrap();
        std::fs::write(dir.path().join("a.wav.tmp"), b"stale").unwrap();
        std::fs::write(sub.join("b.wav.tmp"), b"stale").unwrap();
        std::fs::write(sub.join("keep.wav"), b"keep").unwrap();

        cleanup_tmp_files(dir.path()).unwrap();

        assert!(!dir.path().join("a.wav.tmp").exists());
        assert!(!sub.join("b.wav.tmp").exists());
        assert!(sub.join("keep.wav").exists());
    }
}
