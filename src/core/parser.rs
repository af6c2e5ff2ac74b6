//! Response message parsing
//!
//! Turns the body of one queue message into export records. The body is the
//! JSON response of the trade-export API:
//!
//! ```json
//! { "Lines": [ { "StyleNo": "9780023381737", "Status": "Error", "Error": "Invalid price" } ] }
//! ```
//!
//! Parsing is all-or-nothing: the first bad line fails the whole message.

use crate::domain::{ExportRecord, ItemId, ParseError, ResultStatus};
use serde_json::{Map, Value};

const LINES: &str = "Lines";
const STYLE_NO: &str = "StyleNo";
const STATUS: &str = "Status";
const ERROR: &str = "Error";

/// Parses a raw message body into records, preserving line order.
///
/// # Errors
///
/// Returns a [`ParseError`] if the body is not UTF-8 JSON, `Lines` is
/// missing or not an array, or any line lacks a usable `StyleNo` or
/// `Status`.
///
/// # Examples
///
/// ```
/// use trade_importer::core::parser::parse_message;
///
/// let body = br#"{"Lines":[{"StyleNo":"9780023381737","Status":"Successful","Error":null}]}"#;
/// let records = parse_message(body).unwrap();
/// assert_eq!(records.len(), 1);
/// assert!(records[0].error_message.is_none());
/// ```
pub fn parse_message(body: &[u8]) -> Result<Vec<ExportRecord>, ParseError> {
    let text = std::str::from_utf8(body).map_err(|e| ParseError::InvalidUtf8(e.to_string()))?;
    let document: Value =
        serde_json::from_str(text).map_err(|e| ParseError::InvalidJson(e.to_string()))?;

    let root = document.as_object().ok_or(ParseError::NotAnObject)?;
    let lines = match root.get(LINES) {
        None | Some(Value::Null) => {
            return Err(ParseError::MissingField {
                index: None,
                field: LINES,
            })
        }
        Some(Value::Array(lines)) => lines,
        Some(_) => return Err(ParseError::LinesNotArray),
    };

    lines
        .iter()
        .enumerate()
        .map(|(index, line)| parse_line(index, line))
        .collect()
}

fn parse_line(index: usize, line: &Value) -> Result<ExportRecord, ParseError> {
    let line = line
        .as_object()
        .ok_or(ParseError::LineNotObject { index })?;

    let style_no = required_scalar(line, index, STYLE_NO)?;
    let item_id = ItemId::new(style_no).map_err(|_| ParseError::EmptyItemId { index })?;
    let result_status = ResultStatus::from(required_scalar(line, index, STATUS)?);
    let error_message = match line.get(ERROR) {
        None | Some(Value::Null) => None,
        Some(Value::String(text)) => Some(text.clone()),
        Some(other) => Some(other.to_string()),
    };

    Ok(ExportRecord {
        item_id,
        result_status,
        error_message,
    })
}

/// Reads a required field as a string; numbers and booleans use their JSON text.
fn required_scalar(
    line: &Map<String, Value>,
    index: usize,
    field: &'static str,
) -> Result<String, ParseError> {
    match line.get(field) {
        None | Some(Value::Null) => Err(ParseError::MissingField {
            index: Some(index),
            field,
        }),
        Some(Value::String(text)) => Ok(text.clone()),
        Some(value @ (Value::Number(_) | Value::Bool(_))) => Ok(value.to_string()),
        Some(_) => Err(ParseError::InvalidField { index, field }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_successful_line() {
        let body = br#"{"Lines":[{"StyleNo":"9780023381737","Status":"Successful","Error":null}]}"#;
        let records = parse_message(body).unwrap();

        assert_eq!(records.len(), 1);
        assert_eq!(records[0].item_id.as_str(), "9780023381737");
        assert_eq!(records[0].result_status, ResultStatus::Successful);
        assert!(records[0].error_message.is_none());
    }

    #[test]
    fn test_parse_error_line_keeps_message() {
        let body = br#"{"Lines":[{"StyleNo":"9780023381737","Status":"Error","Error":"Price is required"}]}"#;
        let records = parse_message(body).unwrap();

        assert_eq!(records[0].result_status, ResultStatus::Error);
        assert_eq!(
            records[0].error_message.as_deref(),
            Some("Price is required")
        );
    }

    #[test]
    fn test_parse_preserves_order_and_count() {
        let body = br#"{"Lines":[
            {"StyleNo":"a","Status":"Successful","Error":null},
            {"StyleNo":"b","Status":"Error","Error":"x"},
            {"StyleNo":"c","Status":"Successful","Error":null}
        ]}"#;
        let ids: Vec<_> = parse_message(body)
            .unwrap()
            .into_iter()
            .map(|r| r.item_id.into_inner())
            .collect();
        assert_eq!(ids, vec!["a", "b", "c"]);
    }

    #[test]
    fn test_parse_empty_lines() {
        let records = parse_message(br#"{"Lines":[]}"#).unwrap();
        assert!(records.is_empty());
    }

    #[test]
    fn test_parse_invalid_json_fails() {
        let result = parse_message(br#"{"Lines":[{"StyleNo":"a","#);
        assert!(matches!(result, Err(ParseError::InvalidJson(_))));
    }

    #[test]
    fn test_parse_invalid_utf8_fails() {
        let result = parse_message(&[0x7b, 0xff, 0xfe, 0x7d]);
        assert!(matches!(result, Err(ParseError::InvalidUtf8(_))));
    }

    #[test]
    fn test_parse_requires_object_root() {
        assert_eq!(parse_message(b"[]"), Err(ParseError::NotAnObject));
    }

    #[test]
    fn test_parse_missing_lines() {
        assert_eq!(
            parse_message(br#"{"Items":[]}"#),
            Err(ParseError::MissingField {
                index: None,
                field: "Lines"
            })
        );
    }

    #[test]
    fn test_parse_lines_not_array() {
        assert_eq!(
            parse_message(br#"{"Lines":{"StyleNo":"a"}}"#),
            Err(ParseError::LinesNotArray)
        );
    }

    #[test]
    fn test_parse_line_not_object() {
        assert_eq!(
            parse_message(br#"{"Lines":["a"]}"#),
            Err(ParseError::LineNotObject { index: 0 })
        );
    }

    #[test]
    fn test_parse_missing_status_fails_whole_message() {
        let body = br#"{"Lines":[
            {"StyleNo":"a","Status":"Successful","Error":null},
            {"StyleNo":"b","Error":null}
        ]}"#;
        assert_eq!(
            parse_message(body),
            Err(ParseError::MissingField {
                index: Some(1),
                field: "Status"
            })
        );
    }

    #[test]
    fn test_parse_null_style_no_fails() {
        let body = br#"{"Lines":[{"StyleNo":null,"Status":"Successful","Error":null}]}"#;
        assert_eq!(
            parse_message(body),
            Err(ParseError::MissingField {
                index: Some(0),
                field: "StyleNo"
            })
        );
    }

    #[test]
    fn test_parse_blank_style_no_fails() {
        let body = br#"{"Lines":[{"StyleNo":"  ","Status":"Successful","Error":null}]}"#;
        assert_eq!(
            parse_message(body),
            Err(ParseError::EmptyItemId { index: 0 })
        );
    }

    #[test]
    fn test_parse_object_style_no_fails() {
        let body = br#"{"Lines":[{"StyleNo":{"isbn":"1"},"Status":"Successful","Error":null}]}"#;
        assert_eq!(
            parse_message(body),
            Err(ParseError::InvalidField {
                index: 0,
                field: "StyleNo"
            })
        );
    }

    #[test]
    fn test_parse_numeric_style_no_cast_to_string() {
        let body = br#"{"Lines":[{"StyleNo":9780023381737,"Status":"Successful","Error":null}]}"#;
        let records = parse_message(body).unwrap();
        assert_eq!(records[0].item_id.as_str(), "9780023381737");
    }

    #[test]
    fn test_parse_absent_error_is_none() {
        let body = br#"{"Lines":[{"StyleNo":"a","Status":"Successful"}]}"#;
        let records = parse_message(body).unwrap();
        assert!(records[0].error_message.is_none());
    }

    #[test]
    fn test_parse_non_string_error_uses_json_text() {
        let body = br#"{"Lines":[{"StyleNo":"a","Status":"Error","Error":{"Code":42}}]}"#;
        let records = parse_message(body).unwrap();
        assert_eq!(records[0].error_message.as_deref(), Some(r#"{"Code":42}"#));
    }

    #[test]
    fn test_parse_unrecognized_status_kept() {
        let body = br#"{"Lines":[{"StyleNo":"a","Status":"Invalid","Error":null}]}"#;
        let records = parse_message(body).unwrap();
        assert_eq!(
            records[0].result_status,
            ResultStatus::Unrecognized("Invalid".to_string())
        );
    }
}
