//! Transport string codec
//!
//! Converts a record document to and from the opaque string handed to the
//! host's storage. Debug builds keep plain JSON for inspectability;
//! production builds compress with brotli and wrap the bytes in standard
//! base64 so the string survives any text channel.
//!
//! An empty map round-trips through an empty document, and loading "no
//! data" (an empty string, or an empty sequence) is a harmless no-op in
//! both modes rather than a parse failure.

use std::io::Cursor;

use super::document::{CodecError, Record};

/// Which transport path to use. The host supplies this from its build
/// mode; it is not stored in the document itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransportMode {
    /// Plain JSON text.
    Debug,
    /// JSON, brotli-compressed, base64-encoded.
    Production,
}

/// Serialize a document to its transport string.
pub fn serialize(records: &[Record], mode: TransportMode) -> Result<String, CodecError> {
    match mode {
        TransportMode::Debug => Ok(serde_json::to_string(records)?),
        TransportMode::Production => {
            let json = serde_json::to_vec(records)?;
            let compressed = compress(&json)?;
            Ok(base64::Engine::encode(
                &base64::engine::general_purpose::STANDARD,
                compressed,
            ))
        }
    }
}

/// Deserialize a transport string back into a document.
pub fn deserialize(text: &str, mode: TransportMode) -> Result<Vec<Record>, CodecError> {
    let trimmed = text.trim();
    // An absent or empty save slot loads as an empty map.
    if trimmed.is_empty() || trimmed == "[]" {
        return Ok(Vec::new());
    }

    match mode {
        TransportMode::Debug => Ok(serde_json::from_str(trimmed)?),
        TransportMode::Production => {
            let compressed = base64::Engine::decode(
                &base64::engine::general_purpose::STANDARD,
                trimmed,
            )?;
            let json = decompress(&compressed)?;
            Ok(serde_json::from_slice(&json)?)
        }
    }
}

fn compress(bytes: &[u8]) -> Result<Vec<u8>, CodecError> {
    let mut out = Vec::new();
    let params = brotli::enc::BrotliEncoderParams {
        quality: 6,
        lgwin: 22,
        ..Default::default()
    };
    brotli::BrotliCompress(&mut Cursor::new(bytes), &mut out, &params)
        .map_err(|e| CodecError::Compression(format!("brotli compression failed: {}", e)))?;
    Ok(out)
}

fn decompress(bytes: &[u8]) -> Result<Vec<u8>, CodecError> {
    let mut out = Vec::new();
    brotli::BrotliDecompress(&mut Cursor::new(bytes), &mut out)
        .map_err(|e| CodecError::Compression(format!("brotli decompression failed: {}", e)))?;
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use super::super::document::DocPosition;

    fn sample_records() -> Vec<Record> {
        vec![
            Record {
                id: 7,
                category: 0,
                position: DocPosition { x: 0.0, y: 50.0 },
                angle: None,
                children: vec![Record {
                    id: 3,
                    category: 0,
                    position: DocPosition { x: 0.0, y: 0.0 },
                    angle: None,
                    children: vec![],
                }],
            },
            Record {
                id: -1,
                category: 1,
                position: DocPosition { x: 25.0, y: 50.0 },
                angle: Some(-90.0),
                children: vec![],
            },
        ]
    }

    #[test]
    fn test_debug_round_trip() {
        let records = sample_records();
        let text = serialize(&records, TransportMode::Debug).unwrap();
        assert!(text.starts_with('['));
        let back = deserialize(&text, TransportMode::Debug).unwrap();
        assert_eq!(back, records);
    }

    #[test]
    fn test_production_round_trip() {
        let records = sample_records();
        let text = serialize(&records, TransportMode::Production).unwrap();
        // Base64 of compressed bytes, not raw JSON.
        assert!(!text.contains('{'));
        let back = deserialize(&text, TransportMode::Production).unwrap();
        assert_eq!(back, records);
    }

    #[test]
    fn test_empty_document_round_trip_both_modes() {
        for mode in [TransportMode::Debug, TransportMode::Production] {
            let text = serialize(&[], mode).unwrap();
            let back = deserialize(&text, mode).unwrap();
            assert!(back.is_empty());
        }
    }

    #[test]
    fn test_empty_input_is_harmless() {
        for mode in [TransportMode::Debug, TransportMode::Production] {
            assert!(deserialize("", mode).unwrap().is_empty());
            assert!(deserialize("   ", mode).unwrap().is_empty());
            assert!(deserialize("[]", mode).unwrap().is_empty());
        }
    }

    #[test]
    fn test_angle_omitted_from_json_when_absent() {
        let records = sample_records();
        let text = serialize(&records, TransportMode::Debug).unwrap();
        // The floor record carries no angle key at all; the wall does.
        assert_eq!(text.matches("\"angle\"").count(), 1);
    }

    #[test]
    fn test_corrupt_input_surfaces_errors() {
        assert!(matches!(
            deserialize("not json", TransportMode::Debug),
            Err(CodecError::Json(_))
        ));
        assert!(matches!(
            deserialize("!!!not base64!!!", TransportMode::Production),
            Err(CodecError::Encoding(_))
        ));
        // Valid base64, garbage bytes underneath.
        let garbage =
            base64::Engine::encode(&base64::engine::general_purpose::STANDARD, b"garbage");
        assert!(matches!(
            deserialize(&garbage, TransportMode::Production),
            Err(CodecError::Compression(_))
        ));
    }
}
