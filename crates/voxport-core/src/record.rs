//! Dataset record types and per-record validation

/// One row of the source dataset.
///
/// Records are transient: produced by the upstream source, classified once,
/// never mutated.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Record {
    /// Identifies the recording contributor. `"unknown"` when the source omits it.
    pub client_id: String,
    /// Transcript text, may be empty.
    pub sentence: String,
    /// Decoded audio. `None` when the source row carried none, or carried
    /// something that is not a numeric sample array.
    pub audio: Option<AudioData>,
    /// Language/region tag, used only for filtering.
    pub locale: String,
}

/// Decoded audio payload of a record.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AudioData {
    pub samples: Vec<f32>,
    /// Signed so that malformed upstream values survive to validation
    /// instead of failing at parse time.
    pub sampling_rate: i32,
}

/// Why a record was skipped instead of saved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// Audio missing, or its sample array absent or non-numeric.
    InvalidAudio,
    /// Sample array empty, or sampling rate not positive.
    EmptyAudio,
    /// The audio writer failed or left no file behind.
    WriteFailed,
    /// Malformed row from the source, caught at the record boundary.
    RecordError,
}

impl std::fmt::Display for SkipReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let msg = match self {
            Self::InvalidAudio => "invalid audio data",
            Self::EmptyAudio => "empty or invalid audio",
            Self::WriteFailed => "write failed",
            Self::RecordError => "record error",
        };
        f.write_str(msg)
    }
}

impl Record {
    /// Classify this record's audio, returning the payload if exportable.
    pub fn valid_audio(&self) -> Result<&AudioData, SkipReason> {
        let audio = self.audio.as_ref().ok_or(SkipReason::InvalidAudio)?;
        if audio.samples.is_empty() || audio.sampling_rate <= 0 {
            return Err(SkipReason::EmptyAudio);
        }
        Ok(audio)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record_with(audio: Option<AudioData>) -> Record {
        Record {
            client_id: "c1".to_string(),
            sentence: "hello".to_string(),
            audio,
            locale: "sk".to_string(),
        }
    }

    #[test]
    fn missing_audio_is_invalid() {
        let record = record_with(None);
        assert_eq!(record.valid_audio(), Err(SkipReason::InvalidAudio));
    }

    #[test]
    fn empty_samples_are_empty_audio() {
        let record = record_with(Some(AudioData {
            samples: vec![],
            sampling_rate: 16_000,
        }));
        assert_eq!(record.valid_audio(), Err(SkipReason::EmptyAudio));
    }

    #[test]
    fn zero_sampling_rate_is_empty_audio() {
        let record = record_with(Some(AudioData {
            samples: vec![0.1, 0.2],
            sampling_rate: 0,
        }));
        assert_eq!(record.valid_audio(), Err(SkipReason::EmptyAudio));
    }

    #[test]
    fn negative_sampling_rate_is_empty_audio() {
        let record = record_with(Some(AudioData {
            samples: vec![0.1, 0.2],
            sampling_rate: -16_000,
        }));
        assert_eq!(record.valid_audio(), Err(SkipReason::EmptyAudio));
    }

    #[test]
    fn valid_audio_passes_through() {
        let record = record_with(Some(AudioData {
            samples: vec![0.1, 0.2],
            sampling_rate: 16_000,
        }));
        let audio = record.valid_audio().expect("should be valid");
        assert_eq!(audio.samples.len(), 2);
        assert_eq!(audio.sampling_rate, 16_000);
    }

    #[test]
    fn skip_reason_messages() {
        assert_eq!(SkipReason::InvalidAudio.to_string(), "invalid audio data");
        assert_eq!(SkipReason::EmptyAudio.to_string(), "empty or invalid audio");
        assert_eq!(SkipReason::WriteFailed.to_string(), "write failed");
    }
}
