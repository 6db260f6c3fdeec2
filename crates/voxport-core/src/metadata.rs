//! Pipe-delimited metadata index for saved audio files

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

/// Header line written at the top of every index file.
pub const METADATA_HEADER: &str = "client_id|sentence|audio_path";

/// Field delimiter. Embedded `|` or newlines in `sentence` are not escaped;
/// a transcript containing either produces an ambiguous line.
const DELIMITER: char = '|';

/// One line of the index: maps a saved audio file back to its transcript
/// and contributor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetadataEntry {
    pub client_id: String,
    pub sentence: String,
    /// Path of the saved audio, relative to the output directory.
    pub audio_path: PathBuf,
}

impl MetadataEntry {
    fn line(&self) -> String {
        format!(
            "{}{DELIMITER}{}{DELIMITER}{}",
            self.client_id,
            self.sentence,
            self.audio_path.display()
        )
    }
}

/// Buffered writer for the metadata index.
///
/// Opened once per run; the header goes out on creation. Appends are buffered
/// and flushed by [`finalize`](Self::finalize); dropping an unfinalized sink
/// flushes best-effort so early termination still leaves a readable file.
#[derive(Debug)]
pub struct MetadataSink {
    writer: Option<BufWriter<File>>,
    path: PathBuf,
    lines: usize,
}

impl MetadataSink {
    pub fn create(path: &Path) -> io::Result<Self> {
        let file = File::create(path)?;
        let mut writer = BufWriter::new(file);
        writeln!(writer, "{METADATA_HEADER}")?;
        Ok(Self {
            writer: Some(writer),
            path: path.to_path_buf(),
            lines: 0,
        })
    }

    pub fn append(&mut self, entry: &MetadataEntry) -> io::Result<()> {
        // `finalize` consumes self, so the writer is always live here
        let writer = self.writer.as_mut().expect("metadata sink closed");
        writeln!(writer, "{}", entry.line())?;
        self.lines += 1;
        Ok(())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Data lines appended so far (header excluded).
    pub fn lines(&self) -> usize {
        self.lines
    }

    /// Flush and close, returning the number of data lines written.
    pub fn finalize(mut self) -> io::Result<usize> {
        if let Some(mut writer) = self.writer.take() {
            writer.flush()?;
        }
        Ok(self.lines)
    }
}

impl Drop for MetadataSink {
    fn drop(&mut self) {
        if let Some(mut writer) = self.writer.take() {
            let _ = writer.flush();
        }
    }
}
