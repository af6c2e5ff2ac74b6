//! Service Bus REST models
//!
//! A peek-locked message comes back with its metadata in the
//! `BrokerProperties` response header as a JSON object.

use crate::adapters::traits::AckToken;
use crate::domain::QueueError;
use serde::Deserialize;

/// Name of the header carrying [`BrokerProperties`]
pub const BROKER_PROPERTIES_HEADER: &str = "BrokerProperties";

/// Broker metadata of a locked message
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct BrokerProperties {
    /// Message ID assigned by the sender or broker
    pub message_id: String,

    /// Lock token needed to complete the message
    pub lock_token: String,

    /// Delivery attempts including this one
    #[serde(default)]
    pub delivery_count: Option<u32>,

    /// Broker sequence number
    #[serde(default)]
    pub sequence_number: Option<i64>,
}

impl BrokerProperties {
    /// Parses the header value
    ///
    /// # Errors
    ///
    /// Returns [`QueueError::InvalidResponse`] if the header is not the
    /// expected JSON object.
    pub fn from_header(value: &str) -> Result<Self, QueueError> {
        let properties: Self = serde_json::from_str(value).map_err(|e| {
            QueueError::InvalidResponse(format!("Malformed {BROKER_PROPERTIES_HEADER} header: {e}"))
        })?;

        if properties.message_id.is_empty() || properties.lock_token.is_empty() {
            return Err(QueueError::InvalidResponse(format!(
                "{BROKER_PROPERTIES_HEADER} header lacks MessageId or LockToken"
            )));
        }
        Ok(properties)
    }

    /// Token that completes this message
    pub fn ack_token(&self) -> AckToken {
        AckToken::new(format!("{}/{}", self.message_id, self.lock_token))
    }
}

/// Splits an [`AckToken`] issued by [`BrokerProperties::ack_token`]
///
/// Lock tokens are GUIDs, so the last `/` separates them from the message ID.
pub fn split_ack_token(token: &AckToken) -> Result<(&str, &str), QueueError> {
    match token.as_str().rsplit_once('/') {
        Some((message_id, lock_token)) if !message_id.is_empty() && !lock_token.is_empty() => {
            Ok((message_id, lock_token))
        }
        _ => Err(QueueError::AcknowledgeFailed(
            "Acknowledge token was not issued by this queue".to_string(),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_broker_properties() {
        let header = r#"{"DeliveryCount":2,"EnqueuedSequenceNumber":0,"LockToken":"6a9c1d5e-0b4e-4a8b-9f0e-5c7b3d2a1f00","LockedUntilUtc":"Sat, 18 Oct 2026 10:00:00 GMT","MessageId":"b3c1","SequenceNumber":11,"State":"Active","TimeToLive":1209600}"#;

        let properties = BrokerProperties::from_header(header).unwrap();

        assert_eq!(properties.message_id, "b3c1");
        assert_eq!(
            properties.lock_token,
            "6a9c1d5e-0b4e-4a8b-9f0e-5c7b3d2a1f00"
        );
        assert_eq!(properties.delivery_count, Some(2));
        assert_eq!(properties.sequence_number, Some(11));
    }

    #[test]
    fn test_parse_broker_properties_missing_lock() {
        let err = BrokerProperties::from_header(r#"{"MessageId":"a"}"#).unwrap_err();
        assert!(matches!(err, QueueError::InvalidResponse(_)));

        let err =
            BrokerProperties::from_header(r#"{"MessageId":"a","LockToken":""}"#).unwrap_err();
        assert!(matches!(err, QueueError::InvalidResponse(_)));
    }

    #[test]
    fn test_ack_token_round_trip() {
        let properties = BrokerProperties::from_header(
            r#"{"MessageId":"orders/17","LockToken":"6a9c1d5e"}"#,
        )
        .unwrap();

        let token = properties.ack_token();
        assert_eq!(split_ack_token(&token).unwrap(), ("orders/17", "6a9c1d5e"));
    }

    #[test]
    fn test_split_foreign_token() {
        assert!(split_ack_token(&AckToken::new("lock-1")).is_err());
        assert!(split_ack_token(&AckToken::new("abc/")).is_err());
    }
}
