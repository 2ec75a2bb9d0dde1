use serde::{Deserialize, Serialize};
use serde_json::json;
use sms_dispatch_core::contract::{
    context_with, correlation_context, parse_dispatch_request, LogContext, PublishedEntry,
};

use crate::adapters::transport::MessageTransport;

const REQUIRED_FIELDS_MESSAGE: &str =
    "\"message\" and \"phoneNumber\" are both required properties";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ApiGatewayResponse {
    #[serde(rename = "statusCode")]
    pub status_code: u16,
    pub body: String,
}

/// Validates one inbound dispatch request and forwards it onto the topic.
///
/// Every outcome maps to a response; no error leaves this function. Malformed
/// JSON and well-formed JSON missing a field are indistinguishable to the
/// caller: both answer 400 with the same body.
pub fn handle_dispatch_event(
    raw_body: Option<&str>,
    correlation_id: &str,
    transport: &dyn MessageTransport,
) -> ApiGatewayResponse {
    let context = correlation_context(correlation_id);

    let Some(raw_body) = raw_body else {
        log_dispatch_warn(
            "request_rejected",
            &context_with(&context, "reason", "request body is absent"),
        );
        return message_response(400, REQUIRED_FIELDS_MESSAGE);
    };

    let request = match parse_dispatch_request(raw_body) {
        Ok(value) => value,
        Err(error) => {
            log_dispatch_warn(
                "request_rejected",
                &context_with(&context, "reason", error.message()),
            );
            return message_response(400, REQUIRED_FIELDS_MESSAGE);
        }
    };

    let entry = PublishedEntry {
        correlation_id: None,
        message: request.message,
        phone_number: request.phone_number,
    };

    log_dispatch_info("publishing_entry", &context);
    match transport.publish(&entry, Some(correlation_id)) {
        Ok(()) => {
            log_dispatch_info("entry_published", &context);
            message_response(202, "Accepted")
        }
        Err(error) => {
            log_dispatch_error(
                "publish_failed",
                &context_with(&context, "error", &error.to_string()),
            );
            message_response(500, "Internal Server Error")
        }
    }
}

fn message_response(status_code: u16, text: &str) -> ApiGatewayResponse {
    ApiGatewayResponse {
        status_code,
        body: json!({ "message": text }).to_string(),
    }
}

fn log_dispatch_info(event: &str, context: &LogContext) {
    eprintln!(
        "{}",
        json!({
            "component": "dispatch_handler",
            "event": event,
            "timestamp": chrono::Utc::now().to_rfc3339(),
            "details": context,
        })
    );
}

fn log_dispatch_warn(event: &str, context: &LogContext) {
    eprintln!(
        "{}",
        json!({
            "component": "dispatch_handler",
            "level": "warn",
            "event": event,
            "timestamp": chrono::Utc::now().to_rfc3339(),
            "details": context,
        })
    );
}

fn log_dispatch_error(event: &str, context: &LogContext) {
    eprintln!(
        "{}",
        json!({
            "component": "dispatch_handler",
            "level": "error",
            "event": event,
            "timestamp": chrono::Utc::now().to_rfc3339(),
            "details": context,
        })
    );
}
