use lambda_runtime::{service_fn, Error, LambdaEvent};
use serde_json::Value;
use sms_dispatch_lambda::adapters::sns::SnsMessageTransport;
use sms_dispatch_lambda::handlers::ingress::{handle_dispatch_event, ApiGatewayResponse};

async fn handle_request(
    event: LambdaEvent<Value>,
    transport: &SnsMessageTransport,
) -> Result<ApiGatewayResponse, Error> {
    let raw_body = event.payload.get("body").and_then(Value::as_str);
    let response = handle_dispatch_event(raw_body, &event.context.request_id, transport);
    Ok(response)
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
