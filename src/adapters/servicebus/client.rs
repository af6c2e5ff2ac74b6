//! Azure Service Bus queue receiver
//!
//! Talks to the Service Bus REST API with peek-lock semantics: a receive
//! locks the head message, and completing it with its lock token removes it
//! from the queue. A message that is never completed becomes visible again
//! once its lock expires.

use super::models::{split_ack_token, BrokerProperties, BROKER_PROPERTIES_HEADER};
use crate::adapters::traits::{AckToken, MessageSource, QueueMessage};
use crate::config::{QueueAuthType, QueueConfig, SecretString};
use crate::domain::{ImporterError, QueueError, Result};
use async_trait::async_trait;
use azure_core::credentials::TokenCredential;
use azure_identity::ClientSecretCredential;
use reqwest::header::{AUTHORIZATION, CONTENT_LENGTH};
use reqwest::{Client, StatusCode};
use secrecy::ExposeSecret;
use std::sync::Arc;
use std::time::Duration;
use url::Url;

/// OAuth scope of the Service Bus data plane
pub const SERVICE_BUS_SCOPE: &str = "https://servicebus.azure.net/.default";

/// How requests are authorized
enum QueueAuth {
    /// Bearer token from an Azure AD app registration
    AzureAd(Arc<ClientSecretCredential>),
    /// Pre-issued `SharedAccessSignature ...` value
    SasToken(SecretString),
}

/// Peek-lock receiver for one queue
pub struct ServiceBusReceiver {
    http_client: Client,
    queue_url: Url,
    queue_name: String,
    auth: QueueAuth,
}

impl ServiceBusReceiver {
    /// Connects to the queue described by `config`
    ///
    /// One authorization value is produced up front so bad credentials
    /// surface before the first receive.
    ///
    /// # Errors
    ///
    /// Returns [`ImporterError::Configuration`] for an unusable endpoint,
    /// [`QueueError::AuthenticationFailed`] when no token can be acquired.
    pub async fn connect(config: &QueueConfig) -> Result<Self> {
        let queue_url = queue_url(&config.endpoint, &config.queue_name)?;
        let auth = QueueAuth::from_config(config)?;

        // Long-poll receives hold the request open for the receive timeout.
        let http_client = Client::builder()
            .timeout(Duration::from_secs(
                config.receive_timeout_seconds + config.request_timeout_seconds,
            ))
            .connect_timeout(Duration::from_secs(config.request_timeout_seconds))
            .build()
            .map_err(|e| {
                ImporterError::Configuration(format!("Failed to create HTTP client: {}", e))
            })?;

        let receiver = Self {
            http_client,
            queue_url,
            queue_name: config.queue_name.clone(),
            auth,
        };
        receiver.authorization().await?;

        tracing::info!(
            queue = %receiver.queue_name,
            endpoint = %receiver.queue_url.host_str().unwrap_or_default(),
            auth_type = %config.auth_type,
            "Connected to Service Bus queue"
        );

        Ok(receiver)
    }

    async fn authorization(&self) -> std::result::Result<String, QueueError> {
        match &self.auth {
            QueueAuth::AzureAd(credential) => {
                let token = TokenCredential::get_token(&**credential, &[SERVICE_BUS_SCOPE], None)
                    .await
                    .map_err(|e| {
                        QueueError::AuthenticationFailed(format!(
                            "Failed to acquire Azure AD token: {}",
                            e
                        ))
                    })?;
                Ok(format!("Bearer {}", token.token.secret()))
            }
            QueueAuth::SasToken(token) => Ok(token.expose_secret().as_str().to_string()),
        }
    }

    fn endpoint_url(&self, segments: &[&str]) -> std::result::Result<Url, QueueError> {
        let mut url = self.queue_url.clone();
        url.path_segments_mut()
            .map_err(|_| QueueError::InvalidResponse("Queue URL cannot take a path".to_string()))?
            .extend(segments);
        Ok(url)
    }

    async fn try_receive(
        &self,
        timeout: Duration,
    ) -> std::result::Result<Option<QueueMessage>, QueueError> {
        let mut url = self.endpoint_url(&["messages", "head"])?;
        url.set_query(Some(&format!("timeout={}", timeout.as_secs().max(1))));

        let response = self
            .http_client
            .post(url)
            .header(AUTHORIZATION, self.authorization().await?)
            .header(CONTENT_LENGTH, 0)
            .send()
            .await
            .map_err(|e| transport_error(e, QueueError::ReceiveFailed))?;

        let status = response.status();
        match status {
            StatusCode::NO_CONTENT => Ok(None),
            StatusCode::CREATED | StatusCode::OK => {
                let header = response
                    .headers()
                    .get(BROKER_PROPERTIES_HEADER)
                    .ok_or_else(|| {
                        QueueError::InvalidResponse(format!(
                            "Locked message has no {BROKER_PROPERTIES_HEADER} header"
                        ))
                    })?
                    .to_str()
                    .map_err(|e| QueueError::InvalidResponse(e.to_string()))?;
                let properties = BrokerProperties::from_header(header)?;

                let body = response
                    .bytes()
                    .await
                    .map_err(|e| transport_error(e, QueueError::ReceiveFailed))?;

                tracing::trace!(
                    message_id = %properties.message_id,
                    delivery_count = properties.delivery_count,
                    body_bytes = body.len(),
                    "Locked message"
                );

                let mut message = QueueMessage::new(body.to_vec(), properties.ack_token());
                message.delivery_count = properties.delivery_count;
                message.message_id = Some(properties.message_id);
                Ok(Some(message))
            }
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
                Err(QueueError::AuthenticationFailed(format!(
                    "Queue rejected credentials ({status}): {}",
                    error_body(response).await
                )))
            }
            _ => Err(QueueError::ReceiveFailed(format!(
                "Unexpected status {status}: {}",
                error_body(response).await
            ))),
        }
    }

    async fn try_acknowledge(&self, token: &AckToken) -> std::result::Result<(), QueueError> {
        let (message_id, lock_token) = split_ack_token(token)?;
        let url = self.endpoint_url(&["messages", message_id, lock_token])?;

        let response = self
            .http_client
            .delete(url)
            .header(AUTHORIZATION, self.authorization().await?)
            .send()
            .await
            .map_err(|e| transport_error(e, QueueError::AcknowledgeFailed))?;

        let status = response.status();
        if status.is_success() {
            return Ok(());
        }

        let detail = error_body(response).await;
        match status {
            StatusCode::NOT_FOUND | StatusCode::GONE => Err(QueueError::AcknowledgeFailed(
                format!("Lock for message {message_id} expired or was lost: {detail}"),
            )),
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => Err(
                QueueError::AuthenticationFailed(format!("Queue rejected credentials ({status})")),
            ),
            _ => Err(QueueError::AcknowledgeFailed(format!(
                "Unexpected status {status}: {detail}"
            ))),
        }
    }
}

impl QueueAuth {
    fn from_config(config: &QueueConfig) -> Result<Self> {
        match config.auth_type {
            QueueAuthType::AzureAd => {
                let missing = |key: &str| {
                    ImporterError::Configuration(format!(
                        "queue.{key} is required when auth_type is 'azure_ad'"
                    ))
                };
                let tenant_id = config.tenant_id.as_ref().ok_or_else(|| missing("tenant_id"))?;
                let client_id = config
                    .client_id
                    .clone()
                    .ok_or_else(|| missing("client_id"))?;
                let client_secret = config
                    .client_secret
                    .as_ref()
                    .ok_or_else(|| missing("client_secret"))?;

                let secret = azure_core::credentials::Secret::new(
                    client_secret.expose_secret().as_str().to_string(),
                );
                let credential = ClientSecretCredential::new(tenant_id, client_id, secret, None)
                    .map_err(|e| {
                        QueueError::AuthenticationFailed(format!(
                            "Failed to create Azure AD credential: {}",
                            e
                        ))
                    })?;
                Ok(QueueAuth::AzureAd(credential))
            }
            QueueAuthType::SasToken => config
                .sas_token
                .clone()
                .map(QueueAuth::SasToken)
                .ok_or_else(|| {
                    ImporterError::Configuration(
                        "queue.sas_token is required when auth_type is 'sas_token'".to_string(),
                    )
                }),
        }
    }
}

#[async_trait]
impl MessageSource for ServiceBusReceiver {
    async fn receive(&self, timeout: Duration) -> Result<Option<QueueMessage>> {
        Ok(self.try_receive(timeout).await?)
    }

    async fn acknowledge(&self, token: &AckToken) -> Result<()> {
        Ok(self.try_acknowledge(token).await?)
    }

    async fn close(&self) -> Result<()> {
        tracing::debug!(queue = %self.queue_name, "Closing Service Bus receiver");
        Ok(())
    }

    fn describe(&self) -> String {
        format!(
            "servicebus queue '{}' at {}",
            self.queue_name,
            self.queue_url.host_str().unwrap_or_default()
        )
    }
}

/// Builds `{endpoint}/{queue}` with the queue name as one path segment
fn queue_url(endpoint: &str, queue_name: &str) -> Result<Url> {
    let mut url = Url::parse(endpoint).map_err(|e| {
        ImporterError::Configuration(format!("Invalid queue.endpoint '{endpoint}': {e}"))
    })?;
    url.path_segments_mut()
        .map_err(|_| {
            ImporterError::Configuration(format!("queue.endpoint '{endpoint}' is not a base URL"))
        })?
        .pop_if_empty()
        .push(queue_name);
    Ok(url)
}

fn transport_error(e: reqwest::Error, otherwise: fn(String) -> QueueError) -> QueueError {
    if e.is_timeout() {
        QueueError::Timeout(e.to_string())
    } else if e.is_connect() {
        QueueError::ConnectionFailed(e.to_string())
    } else {
        otherwise(e.to_string())
    }
}

async fn error_body(response: reqwest::Response) -> String {
    response
        .text()
        .await
        .unwrap_or_else(|_| "Unknown error".to_string())
}
