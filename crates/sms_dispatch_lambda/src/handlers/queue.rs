use serde_json::{json, Value};
use sms_dispatch_core::contract::{
    context_with, correlation_context, decode_queue_record, DispatchRequest, LogContext,
};

use crate::adapters::transport::MessageTransport;

/// Drains one batch of queue records, sending one SMS per record.
///
/// A record that fails to decode or send is logged and skipped; the batch
/// itself always runs to completion.
pub fn handle_queue_event(records: &[Value], transport: &dyn MessageTransport) {
    log_consumer_info(
        "batch_received",
        &LogContext::from([("record_count".to_string(), Value::from(records.len()))]),
    );

    // Strictly in order, one send in flight at a time: a record's send call
    // is not issued before the previous record's call has returned.
    for record in records {
        process_record(record, transport);
    }
}

fn process_record(record: &Value, transport: &dyn MessageTransport) {
    let body = match record.get("body").and_then(Value::as_str) {
        Some(value) => value,
        None => {
            log_consumer_error(
                "record_failed",
                &error_context("queue record has no body field"),
            );
            return;
        }
    };

    let entry = match decode_queue_record(body) {
        Ok(value) => value,
        Err(error) => {
            log_consumer_error("record_failed", &error_context(error.message()));
            return;
        }
    };

    let context = entry
        .correlation_id
        .as_deref()
        .map(correlation_context)
        .unwrap_or_default();
    log_consumer_info("sending_sms", &context);

    let delivery = DispatchRequest {
        message: entry.message,
        phone_number: entry.phone_number,
    };
    match transport.send_sms(&delivery) {
        Ok(()) => log_consumer_info("sms_sent", &context),
        Err(error) => log_consumer_error(
            "record_failed",
            &context_with(&context, "error", &error.to_string()),
        ),
    }
}

fn error_context(error: &str) -> LogContext {
    context_with(&LogContext::new(), "error", error)
}

fn log_consumer_info(event: &str, context: &LogContext) {
    eprintln!(
        "{}",
        json!({
            "component": "queue_consumer",
            "event": event,
            "timestamp": chrono::Utc::now().to_rfc3339(),
            "details": context,
        })
    );
}

fn log_consumer_error(event: &str, context: &LogContext) {
    eprintln!(
        "{}",
        json!({
            "component": "queue_consumer",
            "level": "error",
            "event": event,
            "timestamp": chrono::Utc::now().to_rfc3339(),
            "details": context,
        })
    );
}
