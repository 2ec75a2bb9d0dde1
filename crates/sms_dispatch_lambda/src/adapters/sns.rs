use sms_dispatch_core::contract::{DispatchRequest, PublishedEntry};

use crate::adapters::transport::{MessageTransport, TransportError};

/// SNS-backed transport. Topic publishes and direct SMS sends go through the
/// same client; the topic ARN is optional at construction and checked when a
/// publish is attempted.
pub struct SnsMessageTransport {
    sns_client: aws_sdk_sns::Client,
    topic_arn: Option<String>,
}

impl SnsMessageTransport {
    pub fn new(sns_client: aws_sdk_sns::Client, topic_arn: Option<String>) -> Self {
        Self {
            sns_client,
            topic_arn,
        }
    }
}

impl MessageTransport for SnsMessageTransport {
    fn publish(
        &self,
        entry: &PublishedEntry,
        correlation_id: Option<&str>,
    ) -> Result<(), TransportError> {
        let topic_arn = match &self.topic_arn {
            Some(value) if !value.trim().is_empty() => value.clone(),
            _ => {
                return Err(TransportError::configuration(
                    "SNS_TOPIC_ARN must be configured",
                ))
            }
        };

        let payload = serde_json::to_string(&entry.tagged(correlation_id)).map_err(|error| {
            TransportError::delivery(format!("failed to encode published entry: {error}"))
        })?;

        let client = self.sns_client.clone();
        tokio::task::block_in_place(|| {
            tokio::runtime::Handle::current().block_on(async move {
                client
                    .publish()
                    .topic_arn(topic_arn)
                    .message(payload)
                    .send()
                    .await
                    .map(|_| ())
                    .map_err(|error| {
                        TransportError::delivery(format!("failed to publish to topic: {error}"))
                    })
            })
        })
    }

    fn send_sms(&self, delivery: &DispatchRequest) -> Result<(), TransportError> {
        let client = self.sns_client.clone();
        let phone_number = delivery.phone_number.clone();
        let message = delivery.message.clone();

        tokio::task::block_in_place(|| {
            tokio::runtime::Handle::current().block_on(async move {
                client
                    .publish()
                    .phone_number(phone_number)
                    .message(message)
                    .send()
                    .await
                    .map(|_| ())
                    .map_err(|error| {
                        TransportError::delivery(format!("failed to send sms: {error}"))
                    })
            })
        })
    }
}
