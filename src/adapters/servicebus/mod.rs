//! Azure Service Bus adapter
//!
//! Receives trade-export responses from a Service Bus queue over the REST
//! API using peek-lock receive and explicit completion.

pub mod client;
pub mod models;

pub use client::{ServiceBusReceiver, SERVICE_BUS_SCOPE};
pub use models::BrokerProperties;
