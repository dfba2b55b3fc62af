//! Textual encoding of [`Snapshot`]s.
//!
//! The save file is pretty-printed JSON so that two saves can be diffed by
//! eye. Row, column, and ant order are preserved exactly in both
//! directions; `decode(encode(s)) == s` for every snapshot.

use crate::snapshot::Snapshot;

/// Errors from encoding or decoding a snapshot.
#[derive(Debug, thiserror::Error)]
pub enum CodecError {
    /// The text is not a snapshot-shaped JSON document.
    #[error("malformed snapshot: {source}")]
    Json {
        /// The underlying JSON error.
        #[from]
        source: serde_json::Error,
    },
}

/// Encode a snapshot as pretty-printed JSON.
///
/// # Errors
///
/// Returns [`CodecError::Json`] if serialization fails.
pub fn encode(snapshot: &Snapshot) -> Result<String, CodecError> {
    Ok(serde_json::to_string_pretty(snapshot)?)
}

/// Decode a snapshot from JSON text.
///
/// Only the shape is checked here (both keys present, no unknown keys,
/// correct value types). Board consistency is checked on load.
///
/// # Errors
///
/// Returns [`CodecError::Json`] for anything that is not snapshot-shaped.
pub fn decode(text: &str) -> Result<Snapshot, CodecError> {
    Ok(serde_json::from_str(text)?)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::snapshot::AntRecord;

    fn ant(x: i64, y: i64, direction: &str, id: u32) -> AntRecord {
        AntRecord {
            x,
            y,
            direction: direction.to_owned(),
            id,
        }
    }

    #[test]
    fn round_trip_preserves_order() {
        let snapshot = Snapshot {
            grid: vec![vec![0, 1, 1, 0], vec![1, 0, 0, 0]],
            ants: vec![ant(3, 1, "S", 7), ant(0, 0, "O", 2), ant(1, 1, "N", 4)],
        };
        let decoded = decode(&encode(&snapshot).unwrap()).unwrap();
        assert_eq!(decoded, snapshot);
        let ids: Vec<u32> = decoded.ants.iter().map(|a| a.id).collect();
        assert_eq!(ids, vec![7, 2, 4]);
    }

    #[test]
    fn round_trip_keeps_invalid_content_verbatim() {
        // The codec is shape-only; an unknown heading survives untouched.
        let snapshot = Snapshot {
            grid: vec![vec![0]],
            ants: vec![ant(0, 0, "Q", 0)],
        };
        assert_eq!(decode(&encode(&snapshot).unwrap()).unwrap(), snapshot);
    }

    #[test]
    fn encoding_is_multi_line() {
        let snapshot = Snapshot {
            grid: vec![vec![0, 0]],
            ants: Vec::new(),
        };
        let text = encode(&snapshot).unwrap();
        assert!(text.contains('\n'));
        assert!(text.contains("\"grille\""));
        assert!(text.contains("\"fourmis\""));
    }

    #[test]
    fn decodes_the_documented_shape() {
        let text = r#"{"grille": [[1, 0], [0, 1]],
                       "fourmis": [{"x": 1, "y": 0, "direction": "E", "id": 0}]}"#;
        let snapshot = decode(text).unwrap();
        assert_eq!(snapshot.grid, vec![vec![1, 0], vec![0, 1]]);
        assert_eq!(snapshot.ants, vec![ant(1, 0, "E", 0)]);
    }

    #[test]
    fn missing_keys_and_extra_keys_are_rejected() {
        assert!(decode(r#"{"grille": [[0]]}"#).is_err());
        assert!(decode(r#"{"grille": [[0]], "fourmis": [], "tick": 3}"#).is_err());
        assert!(decode(r#"{"grille": [[0]], "fourmis": [{"x": 0, "y": 0, "direction": "N"}]}"#).is_err());
        assert!(decode("not json").is_err());
    }

    #[test]
    fn negative_cells_do_not_decode() {
        assert!(decode(r#"{"grille": [[-1]], "fourmis": []}"#).is_err());
    }
}
