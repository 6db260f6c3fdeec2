//! Datasets-server row envelope and row → `Record` mapping

use serde::Deserialize;
use serde_json::Value;

use voxport_core::{AudioData, Record};

/// One page returned by the datasets-server `/rows` endpoint.
#[derive(Debug, Deserialize)]
pub struct RowsPage {
    #[serde(default)]
    pub rows: Vec<RowEnvelope>,
    #[serde(default)]
    pub num_rows_total: Option<u64>,
}

/// A row with its global index within the split.
#[derive(Debug, Deserialize)]
pub struct RowEnvelope {
    pub row_idx: u64,
    pub row: Value,
}

/// Map a raw row onto a [`Record`].
///
/// Never fails: missing or malformed fields degrade to values the exporter's
/// validation will classify (`"unknown"` contributor, empty transcript,
/// absent audio).
pub fn map_row(row: &Value) -> Record {
    Record {
        client_id: row
            .get("client_id")
            .and_then(Value::as_str)
            .unwrap_or("unknown")
            .to_string(),
        sentence: row
            .get("sentence")
            .and_then(Value::as_str)
            .unwrap_or("")
            .trim()
            .to_string(),
        audio: row.get("audio").and_then(decode_audio),
        locale: row
            .get("locale")
            .and_then(Value::as_str)
            .unwrap_or("")
            .to_string(),
    }
}

/// Decode the row's audio field.
///
/// Returns `None` for anything that is not an object carrying a numeric
/// sample array — the exporter reports those as invalid audio data. A
/// missing or out-of-range sampling rate maps to 0, which validation
/// classifies as empty-or-invalid.
fn decode_audio(audio: &Value) -> Option<AudioData> {
    let array = audio.get("array")?.as_array()?;
    let mut samples = Vec::with_capacity(array.len());
    for value in array {
        samples.push(value.as_f64()? as f32);
    }

    let sampling_rate = audio
        .get("sampling_rate")
        .and_then(Value::as_i64)
        .map(|rate| i32::try_from(rate).unwrap_or(0))
        .unwrap_or(0);

    Some(AudioData {
        samples,
        sampling_rate,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn maps_complete_row() {
        let row = json!({
            "client_id": "abc123",
            "sentence": "  Dobrý deň.  ",
            "audio": {"array": [0.1, -0.2], "sampling_rate": 16000},
            "locale": "sk",
        });

        let record = map_row(&row);
        assert_eq!(record.client_id, "abc123");
        assert_eq!(record.sentence, "Dobrý deň.");
        assert_eq!(record.locale, "sk");
        let audio = record.audio.expect("audio should decode");
        assert_eq!(audio.samples, vec![0.1f32, -0.2f32]);
        assert_eq!(audio.sampling_rate, 16_000);
    }

    #[test]
    fn missing_client_id_defaults_to_unknown() {
        let row = json!({"sentence": "x", "audio": null, "locale": "sk"});
        assert_eq!(map_row(&row).client_id, "unknown");
    }

    #[test]
    fn null_audio_maps_to_none() {
        let row = json!({"client_id": "c", "audio": null});
        assert!(map_row(&row).audio.is_none());
    }

    #[test]
    fn non_object_audio_maps_to_none() {
        let row = json!({"client_id": "c", "audio": "path/to/clip.mp3"});
        assert!(map_row(&row).audio.is_none());
    }

    #[test]
    fn non_numeric_samples_map_to_none() {
        let row = json!({
            "client_id": "c",
            "audio": {"array": [0.1, "oops"], "sampling_rate": 16000},
        });
        assert!(map_row(&row).audio.is_none());
    }

    #[test]
    fn missing_sampling_rate_maps_to_zero() {
        let row = json!({"client_id": "c", "audio": {"array": [0.1]}});
        let audio = map_row(&row).audio.expect("array decodes");
        assert_eq!(audio.sampling_rate, 0);
    }

    #[test]
    fn negative_sampling_rate_survives_to_validation() {
        let row = json!({
            "client_id": "c",
            "audio": {"array": [0.1], "sampling_rate": -8000},
        });
        let audio = map_row(&row).audio.expect("array decodes");
        assert_eq!(audio.sampling_rate, -8_000);
    }

    #[test]
    fn out_of_range_sampling_rate_maps_to_zero() {
        let row = json!({
            "client_id": "c",
            "audio": {"array": [0.1], "sampling_rate": 10_000_000_000i64},
        });
        let audio = map_row(&row).audio.expect("array decodes");
        assert_eq!(audio.sampling_rate, 0);
    }

    #[test]
    fn parses_rows_page_envelope() {
        let body = r#"{
            "features": [{"name": "client_id", "type": {"dtype": "string"}}],
            "rows": [
                {"row_idx": 0, "row": {"client_id": "a", "sentence": "x"}},
                {"row_idx": 1, "row": {"client_id": "b", "sentence": "y"}}
            ],
            "num_rows_total": 2
        }"#;

        let page: RowsPage = serde_json::from_str(body).unwrap();
        assert_eq!(page.rows.len(), 2);
        assert_eq!(page.num_rows_total, Some(2));
        assert_eq!(page.rows[1].row_idx, 1);
        assert_eq!(map_row(&page.rows[0].row).client_id, "a");
    }
}
