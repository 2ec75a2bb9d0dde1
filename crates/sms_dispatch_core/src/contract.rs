use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Flat key/value pairs attached to every structured log line, carrying at
/// minimum the correlation id once it is known.
pub type LogContext = BTreeMap<String, Value>;

pub fn correlation_context(correlation_id: &str) -> LogContext {
    BTreeMap::from([("correlation_id".to_string(), Value::from(correlation_id))])
}

pub fn context_with(context: &LogContext, key: &str, value: &str) -> LogContext {
    let mut extended = context.clone();
    extended.insert(key.to_string(), Value::from(value));
    extended
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DispatchRequest {
    pub message: String,
    #[serde(rename = "phoneNumber")]
    pub phone_number: String,
}

/// Entry published onto the dispatch topic and read back as the `Message`
/// field of a queue record. Declaration order matches the producer's wire
/// layout; `correlationId` is omitted entirely when not supplied.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PublishedEntry {
    #[serde(
        rename = "correlationId",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub correlation_id: Option<String>,
    pub message: String,
    #[serde(rename = "phoneNumber")]
    pub phone_number: String,
}

impl PublishedEntry {
    /// Copy of this entry carrying the caller's correlation id on the wire.
    /// Whatever id the entry already held is replaced, not merged.
    pub fn tagged(&self, correlation_id: Option<&str>) -> PublishedEntry {
        PublishedEntry {
            correlation_id: correlation_id.map(str::to_string),
            message: self.message.clone(),
            phone_number: self.phone_number.clone(),
        }
    }
}

/// Outer wrapper of one queue delivery; the topic places the published entry
/// JSON inside the `Message` field.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct QueueRecordBody {
    #[serde(rename = "Message")]
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    message: String,
}

impl ValidationError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.message)
    }
}

impl std::error::Error for ValidationError {}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseError {
    message: String,
}

impl ParseError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl std::fmt::Display for ParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.message)
    }
}

impl std::error::Error for ParseError {}

pub fn parse_dispatch_request(raw_body: &str) -> Result<DispatchRequest, ValidationError> {
    let body: Value = serde_json::from_str(raw_body)
        .map_err(|_| ValidationError::new("request body is not valid JSON"))?;

    let message = required_text(&body, "message");
    let phone_number = required_text(&body, "phoneNumber");
    match (message, phone_number) {
        (Some(message), Some(phone_number)) => Ok(DispatchRequest {
            message,
            phone_number,
        }),
        _ => Err(ValidationError::new(
            "request body is missing required fields",
        )),
    }
}

// A field counts as missing unless it holds a non-empty string; null, 0,
// false, and "" are all rejected.
fn required_text(body: &Value, field: &str) -> Option<String> {
    body.get(field)
        .and_then(Value::as_str)
        .filter(|text| !text.is_empty())
        .map(str::to_string)
}

pub fn decode_queue_record(body: &str) -> Result<PublishedEntry, ParseError> {
    let envelope: QueueRecordBody = serde_json::from_str(body)
        .map_err(|error| ParseError::new(format!("invalid queue record envelope: {error}")))?;

    serde_json::from_str(&envelope.message)
        .map_err(|error| ParseError::new(format!("invalid published entry: {error}")))
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn parses_request_with_both_fields() {
        let raw_body = json!({
            "message": "Hello world!",
            "phoneNumber": "+441234567890",
        })
        .to_string();

        let request = parse_dispatch_request(&raw_body).expect("request should pass");
        assert_eq!(
            request,
            DispatchRequest {
                message: "Hello world!".to_string(),
                phone_number: "+441234567890".to_string(),
            }
        );
    }

    #[test]
    fn rejects_unparseable_body() {
        let error = parse_dispatch_request("foo bar").expect_err("request should fail");
        assert_eq!(error.message(), "request body is not valid JSON");
    }

    #[test]
    fn rejects_body_missing_message() {
        let raw_body = json!({ "phoneNumber": "+441234567890" }).to_string();

        let error = parse_dispatch_request(&raw_body).expect_err("request should fail");
        assert_eq!(error.message(), "request body is missing required fields");
    }

    #[test]
    fn rejects_body_missing_phone_number() {
        let raw_body = json!({ "message": "Hello world!" }).to_string();

        let error = parse_dispatch_request(&raw_body).expect_err("request should fail");
        assert_eq!(error.message(), "request body is missing required fields");
    }

    #[test]
    fn rejects_empty_and_non_string_field_values() {
        let bodies = [
            json!({ "message": "", "phoneNumber": "+441234567890" }),
            json!({ "message": "Hello world!", "phoneNumber": null }),
            json!({ "message": 0, "phoneNumber": "+441234567890" }),
            json!({ "message": "Hello world!", "phoneNumber": false }),
        ];

        for body in bodies {
            let error =
                parse_dispatch_request(&body.to_string()).expect_err("request should fail");
            assert_eq!(error.message(), "request body is missing required fields");
        }
    }

    #[test]
    fn rejects_non_object_body() {
        let error = parse_dispatch_request("[1, 2, 3]").expect_err("request should fail");
        assert_eq!(error.message(), "request body is missing required fields");
    }

    #[test]
    fn published_entry_omits_absent_correlation_id() {
        let entry = PublishedEntry {
            correlation_id: None,
            message: "Hello world!".to_string(),
            phone_number: "+441234567890".to_string(),
        };

        let encoded = serde_json::to_string(&entry).expect("entry should serialize");
        assert_eq!(
            encoded,
            r#"{"message":"Hello world!","phoneNumber":"+441234567890"}"#
        );
    }

    #[test]
    fn published_entry_preserves_fields_verbatim() {
        let entry = PublishedEntry {
            correlation_id: Some("uuid".to_string()),
            message: "Hello world!".to_string(),
            phone_number: "+441234567890".to_string(),
        };

        let encoded = serde_json::to_string(&entry).expect("entry should serialize");
        assert_eq!(
            encoded,
            r#"{"correlationId":"uuid","message":"Hello world!","phoneNumber":"+441234567890"}"#
        );
    }

    #[test]
    fn tagged_entry_carries_the_caller_id_on_the_wire() {
        let entry = PublishedEntry {
            correlation_id: Some("stale".to_string()),
            message: "Hello world!".to_string(),
            phone_number: "+441234567890".to_string(),
        };

        let tagged = entry.tagged(Some("uuid"));
        let encoded = serde_json::to_string(&tagged).expect("entry should serialize");
        assert_eq!(
            encoded,
            r#"{"correlationId":"uuid","message":"Hello world!","phoneNumber":"+441234567890"}"#
        );
    }

    #[test]
    fn tagged_entry_drops_correlation_id_when_caller_has_none() {
        let entry = PublishedEntry {
            correlation_id: Some("stale".to_string()),
            message: "Hello world!".to_string(),
            phone_number: "+441234567890".to_string(),
        };

        let tagged = entry.tagged(None);
        assert_eq!(tagged.correlation_id, None);
        assert_eq!(tagged.message, "Hello world!");
        assert_eq!(tagged.phone_number, "+441234567890");
    }

    #[test]
    fn decodes_queue_record_with_correlation_id() {
        let body = json!({
            "Message": json!({
                "correlationId": "uuid",
                "message": "Hello world!",
                "phoneNumber": "+441234567890",
            })
            .to_string(),
        })
        .to_string();

        let entry = decode_queue_record(&body).expect("record should decode");
        assert_eq!(entry.correlation_id.as_deref(), Some("uuid"));
        assert_eq!(entry.message, "Hello world!");
        assert_eq!(entry.phone_number, "+441234567890");
    }

    #[test]
    fn decodes_queue_record_without_correlation_id() {
        let body = json!({
            "Message": json!({
                "message": "Hello world!",
                "phoneNumber": "+441234567890",
            })
            .to_string(),
        })
        .to_string();

        let entry = decode_queue_record(&body).expect("record should decode");
        assert_eq!(entry.correlation_id, None);
    }

    #[test]
    fn rejects_record_with_malformed_envelope() {
        let error = decode_queue_record("not json").expect_err("record should fail");
        assert!(error.message().starts_with("invalid queue record envelope"));
    }

    #[test]
    fn rejects_record_missing_message_field() {
        let body = json!({ "Type": "Notification" }).to_string();

        let error = decode_queue_record(&body).expect_err("record should fail");
        assert!(error.message().starts_with("invalid queue record envelope"));
    }

    #[test]
    fn rejects_record_with_malformed_published_entry() {
        let body = json!({ "Message": "not json" }).to_string();

        let error = decode_queue_record(&body).expect_err("record should fail");
        assert!(error.message().starts_with("invalid published entry"));
    }

    #[test]
    fn correlation_context_carries_the_id() {
        let context = correlation_context("uuid");
        assert_eq!(context.get("correlation_id"), Some(&Value::from("uuid")));
    }

    #[test]
    fn context_with_extends_without_mutating_base() {
        let base = correlation_context("uuid");
        let extended = context_with(&base, "reason", "missing field");

        assert_eq!(extended.get("reason"), Some(&Value::from("missing field")));
        assert_eq!(extended.get("correlation_id"), Some(&Value::from("uuid")));
        assert_eq!(base.get("reason"), None);
    }
}
