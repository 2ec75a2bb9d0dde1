use lambda_runtime::{service_fn, Error, LambdaEvent};
use serde_json::{json, Value};
use sms_dispatch_lambda::adapters::sns::SnsMessageTransport;
use sms_dispatch_lambda::handlers::queue::handle_queue_event;

async fn handle_request(
    event: LambdaEvent<Value>,
    transport: &SnsMessageTransport,
) -> Result<Value, Error> {
    let records = batch_records(&event.payload)?;
    handle_queue_event(records, transport);
    Ok(json!({ "status": "ok" }))
}

fn batch_records(event: &Value) -> Result<&[Value], Error> {
    event
        .get("Records")
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .ok_or_else(|| Error::from("queue event must include Records array"))
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    let config = aws_config::load_defaults(aws_config::BehaviorVersion::latest()).await;
    let transport = SnsMessageTransport::new(
        aws_sdk_sns::Client::new(&config),
        std::env::var("SNS_TOPIC_ARN").ok(),
    );
    let transport = &transport;

    lambda_runtime::run(service_fn(move |event| async move {
        handle_request(event, transport).await
    }))
    .await
}
