use serde_json::{Map, Value};

/// Outcome of interpreting scanned or typed lookup input
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScanParse {
    /// Input was an encoded identity payload; carries its chip id field
    /// (empty when the payload had none)
    Payload { chip_id: String },
    /// Input was not a payload; carries the trimmed raw text
    Literal(String),
}

impl ScanParse {
    /// The chip id the caller should look up, trimmed
    pub fn chip_id(&self) -> &str {
        match self {
            ScanParse::Payload { chip_id } => chip_id.trim(),
            ScanParse::Literal(raw) => raw.trim(),
        }
    }
}

/// Chip id of a payload object; numeric ids from other encoders are accepted
fn payload_chip_id(payload: &Map<String, Value>) -> String {
    match payload.get("chip_id") {
        Some(Value::String(chip_id)) => chip_id.clone(),
        Some(Value::Number(chip_id)) => chip_id.to_string(),
        _ => String::new(),
    }
}

/// Classifies lookup input. Only a JSON object counts as a payload; anything
/// else (plain digits, legacy codes, malformed text) is returned as a literal.
pub fn parse_scan(raw: &str) -> ScanParse {
    let trimmed = raw.trim();
    match serde_json::from_str::<Map<String, Value>>(trimmed) {
        Ok(payload) => ScanParse::Payload {
            chip_id: payload_chip_id(&payload),
        },
        Err(_) => ScanParse::Literal(trimmed.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_payload_json_is_parsed() {
        let parsed = parse_scan(r#"{"type":"animal","id":1,"chip_id":"123456789012345"}"#);
        assert_eq!(
            parsed,
            ScanParse::Payload {
                chip_id: "123456789012345".to_string()
            }
        );
        assert_eq!(parsed.chip_id(), "123456789012345");
    }

    #[test]
    fn test_plain_digits_are_literal() {
        // Valid JSON number, but not a payload object
        let parsed = parse_scan("  123456789012345 \n");
        assert_eq!(parsed, ScanParse::Literal("123456789012345".to_string()));
    }

    #[test]
    fn test_malformed_json_is_literal() {
        let parsed = parse_scan(r#"{"chip_id": "1234"#);
        assert!(matches!(parsed, ScanParse::Literal(_)));
    }

    #[test]
    fn test_payload_without_chip_id_yields_empty() {
        let parsed = parse_scan(r#"{"name":"Rex"}"#);
        assert_eq!(parsed.chip_id(), "");
        assert!(matches!(parsed, ScanParse::Payload { .. }));
    }

    #[test]
    fn test_numeric_chip_id_in_payload() {
        let parsed = parse_scan(r#"{"type":"animal","chip_id":123456789012345}"#);
        assert_eq!(
            parsed,
            ScanParse::Payload {
                chip_id: "123456789012345".to_string()
            }
        );
    }

    #[test]
    fn test_non_scalar_chip_id_yields_empty() {
        let parsed = parse_scan(r#"{"chip_id":null}"#);
        assert!(matches!(parsed, ScanParse::Payload { .. }));
        assert_eq!(parsed.chip_id(), "");
    }

    #[test]
    fn test_whitespace_input_is_empty_literal() {
        assert_eq!(parse_scan("   ").chip_id(), "");
    }
}
