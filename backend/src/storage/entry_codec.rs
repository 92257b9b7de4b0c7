//! Encoding of the two persisted values.
//!
//! `entries` holds a JSON array of [`Entry`] records and `income` holds the
//! accumulator as plain decimal text. Decoding never panics: absent values
//! decode to their empty form, and a bad collection is reported as a
//! [`DecodeError`] for the caller to recover from.

use serde_json::Value;
use shared::Entry;

use crate::error::DecodeError;

/// Some clients persisted the literal string `undefined` instead of nothing
const UNDEFINED_SENTINEL: &str = "undefined";

pub fn decode_entries(raw: Option<&str>) -> Result<Vec<Entry>, DecodeError> {
    let raw = match raw.map(str::trim) {
        None | Some("") | Some(UNDEFINED_SENTINEL) => return Ok(Vec::new()),
        Some(raw) => raw,
    };

    let value: Value = serde_json::from_str(raw)?;
    if !value.is_array() {
        return Err(DecodeError::NotAnArray);
    }
    Ok(serde_json::from_value(value)?)
}

pub fn encode_entries(entries: &[Entry]) -> serde_json::Result<String> {
    serde_json::to_string(entries)
}

/// Absent, unparsable or non-finite text all read as zero
pub fn decode_income(raw: Option<&str>) -> f64 {
    raw.and_then(|text| text.trim().parse::<f64>().ok())
        .filter(|value| value.is_finite())
        .unwrap_or(0.0)
}

pub fn encode_income(value: f64) -> String {
    value.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn entry(id: &str, amount: f64, is_income: bool, created_at: Option<i64>) -> Entry {
        Entry {
            id: id.to_string(),
            amount,
            description: format!("entry {}", id),
            date: Some(Utc.with_ymd_and_hms(2025, 3, 1, 12, 0, 0).unwrap()),
            is_income,
            created_at,
            extra: Default::default(),
        }
    }

    #[test]
    fn test_absent_values_decode_empty() {
        assert!(decode_entries(None).unwrap().is_empty());
        assert!(decode_entries(Some("undefined")).unwrap().is_empty());
        assert!(decode_entries(Some("  ")).unwrap().is_empty());
        assert_eq!(decode_income(None), 0.0);
    }

    #[test]
    fn test_malformed_collection_is_reported() {
        assert!(matches!(decode_entries(Some("{not json")), Err(DecodeError::Malformed(_))));
        assert!(matches!(decode_entries(Some(r#"{"id":"a"}"#)), Err(DecodeError::NotAnArray)));
        assert!(matches!(decode_entries(Some("42")), Err(DecodeError::NotAnArray)));
        assert!(matches!(decode_entries(Some(r#"[{"id":1}]"#)), Err(DecodeError::Malformed(_))));
    }

    #[test]
    fn test_collection_round_trip_ignores_order() {
        let entries = vec![
            entry("a", 500.0, true, Some(3)),
            entry("b", 19.99, false, None),
            Entry {
                date: None,
                ..entry("d", 7.0, true, None)
            },
            entry("c", 0.5, false, Some(1)),
        ];

        let encoded = encode_entries(&entries).unwrap();
        let mut decoded = decode_entries(Some(encoded.as_str())).unwrap();
        decoded.sort_by(|x, y| x.id.cmp(&y.id));

        assert_eq!(decoded, entries);
    }

    #[test]
    fn test_foreign_fields_are_kept() {
        let raw = r#"[{"id":"x","amount":2.5,"description":"Tea","isIncome":false,"note":{"by":"web"}}]"#;
        let decoded = decode_entries(Some(raw)).unwrap();
        assert_eq!(decoded[0].date, None);
        assert_eq!(decoded[0].extra["note"]["by"], "web");

        let encoded = encode_entries(&decoded).unwrap();
        let reencoded: Value = serde_json::from_str(&encoded).unwrap();
        assert_eq!(reencoded, serde_json::from_str::<Value>(raw).unwrap());
    }

    #[test]
    fn test_income_text() {
        assert_eq!(decode_income(Some("300")), 300.0);
        assert_eq!(decode_income(Some(" 12.75 ")), 12.75);
        assert_eq!(decode_income(Some("abc")), 0.0);
        assert_eq!(decode_income(Some("NaN")), 0.0);
        assert_eq!(decode_income(Some("inf")), 0.0);
        assert_eq!(encode_income(500.0), "500");
        assert_eq!(encode_income(12.5), "12.5");
        assert_eq!(decode_income(Some(encode_income(-3.25).as_str())), -3.25);
    }
}
