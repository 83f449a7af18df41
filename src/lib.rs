//! Typed Rust client for Bangladeshi SMS gateway HTTP APIs.
//!
//! The crate has three layers: a domain layer of validated types, a transport
//! layer for wire-format details (headers, form/JSON bodies, response envelopes),
//! and a client layer that dispatches requests and normalizes failures into
//! [`GatewayError`]. [`SmsGateway`] selects a vendor adapter by name; today
//! `sms-net-bd` is implemented.
//!
//! ```rust,no_run
//! use bdsms::{AdapterKind, SendSmsPayload, SmsGateway, SmsNetBdConfig};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), bdsms::GatewayError> {
//!     let gateway = SmsGateway::new(AdapterKind::SmsNetBd, SmsNetBdConfig::new("..."))?;
//!     let payload = SendSmsPayload::new("+8801711111111, 01811111111", "hello");
//!     let _envelope = gateway.client().send_sms(payload).await?;
//!     Ok(())
//! }
//! ```
#![forbid(unsafe_code)]

pub mod client;
pub mod domain;
pub mod transport;

pub use client::{
    AdapterConfig, AdapterKind, BoxFuture, DEFAULT_BASE_URL, GatewayError, HttpMethod,
    SmsAdapter, SmsGateway, SmsNetBd, SmsNetBdBuilder, SmsNetBdConfig,
};
pub use domain::{
    ApiKey, BdPhoneNumber, Envelope, EnvelopeData, ErrorCode, KnownErrorCode, MessageText,
    RecipientReport, Recipients, RequestId, Schedule, SendSms, SendSmsPayload, ValidationError,
    ValidationErrors,
};
