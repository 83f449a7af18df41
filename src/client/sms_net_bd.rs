use std::sync::Arc;
use std::time::Duration;

use serde::Deserialize;
use tracing::{debug, warn};
use url::Url;

use super::gateway::{AdapterKind, SmsAdapter};
use super::http::{Call, HttpMethod, HttpTransport, ReqwestTransport, invoke};
use super::{BoxFuture, GatewayError};
use crate::domain::{ApiKey, Envelope, RequestId, SendSms, SendSmsPayload, ValidationError};
use crate::transport::sms_net_bd::{
    BALANCE_PATH, EnvelopeJson, REPORT_PATH_PREFIX, SEND_SMS_PATH, encode_api_key_form,
    encode_send_sms_form,
};
use crate::transport::{BodyTarget, ContentType, Payload, RequestHeaders};

/// Production API root of sms.net.bd.
pub const DEFAULT_BASE_URL: &str = "https://api.sms.net.bd";

const API_KEY_ENV: &str = "SMS_NET_BD_API_KEY";
const BASE_URL_ENV: &str = "SMS_NET_BD_BASE_URL";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
/// Configuration of an [`SmsNetBd`] adapter.
///
/// Deserializable from any serde source; `base` is accepted as an alias of
/// `base_url`.
pub struct SmsNetBdConfig {
    /// API key issued by sms.net.bd. Required.
    pub api_key: String,
    /// API root, [`DEFAULT_BASE_URL`] when unset.
    #[serde(default, alias = "base")]
    pub base_url: Option<String>,
}

impl SmsNetBdConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: None,
        }
    }

    /// Override the API root (e.g. a staging or mock server).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    /// Read `SMS_NET_BD_API_KEY` (required) and `SMS_NET_BD_BASE_URL` (optional).
    pub fn from_env() -> Result<Self, ValidationError> {
        let api_key = std::env::var(API_KEY_ENV).map_err(|_| ValidationError::Empty {
            field: ApiKey::FIELD,
        })?;
        let base_url = std::env::var(BASE_URL_ENV)
            .ok()
            .filter(|it| !it.trim().is_empty());
        Ok(Self { api_key, base_url })
    }
}

#[derive(Debug, Clone)]
/// Builder for [`SmsNetBd`].
///
/// Use this when you need a request timeout or a custom user-agent.
pub struct SmsNetBdBuilder {
    config: SmsNetBdConfig,
    timeout: Option<Duration>,
    user_agent: Option<String>,
}

impl SmsNetBdBuilder {
    pub fn new(config: SmsNetBdConfig) -> Self {
        Self {
            config,
            timeout: None,
            user_agent: None,
        }
    }

    /// Deadline applied to every call made by the adapter.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Override the HTTP `User-Agent` header.
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }

    /// Validate the configuration and build an [`SmsNetBd`].
    pub fn build(self) -> Result<SmsNetBd, GatewayError> {
        let mut builder = reqwest::Client::builder();
        if let Some(user_agent) = self.user_agent {
            builder = builder.user_agent(user_agent);
        }
        let client = builder.build().map_err(|err| GatewayError::Transport {
            status: None,
            message: err.to_string(),
            source: Some(Box::new(err)),
        })?;

        SmsNetBd::with_transport(
            self.config,
            self.timeout,
            Arc::new(ReqwestTransport { client }),
        )
    }
}

#[derive(Clone)]
/// Adapter for the [sms.net.bd](https://sms.net.bd/api) HTTP API.
///
/// Every request is a form-encoded `POST` carrying the configured `api_key`.
/// Responses are `{error, msg, data}` envelopes; a non-zero `error` is returned
/// as [`GatewayError::Vendor`].
pub struct SmsNetBd {
    api_key: ApiKey,
    base_url: Url,
    timeout: Option<Duration>,
    http: Arc<dyn HttpTransport>,
}

impl SmsNetBd {
    /// Create an adapter with default HTTP settings.
    ///
    /// Fails with [`GatewayError::Validation`] if the API key is blank or the
    /// base URL cannot be parsed.
    pub fn new(config: SmsNetBdConfig) -> Result<Self, GatewayError> {
        SmsNetBdBuilder::new(config).build()
    }

    pub fn builder(config: SmsNetBdConfig) -> SmsNetBdBuilder {
        SmsNetBdBuilder::new(config)
    }

    pub(crate) fn with_transport(
        config: SmsNetBdConfig,
        timeout: Option<Duration>,
        http: Arc<dyn HttpTransport>,
    ) -> Result<Self, GatewayError> {
        let api_key = ApiKey::new(config.api_key)?;
        let base_url = parse_base_url(config.base_url.as_deref().unwrap_or(DEFAULT_BASE_URL))?;
        Ok(Self {
            api_key,
            base_url,
            timeout,
            http,
        })
    }

    /// API root requests are sent to.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Send one message to one or more recipients (`POST /sendsms`).
    ///
    /// Errors:
    /// - [`GatewayError::Validation`] if the payload is invalid (nothing is sent),
    /// - [`GatewayError::Transport`] for network failures and non-2xx responses,
    /// - [`GatewayError::Vendor`] when sms.net.bd answers with `error != 0`.
    pub async fn send_sms(&self, payload: SendSmsPayload) -> Result<Envelope, GatewayError> {
        let request = SendSms::validate(payload).inspect_err(|err| {
            debug!(error = %err, "send_sms payload rejected");
        })?;
        let url = self.endpoint(SEND_SMS_PATH)?;
        self.dispatch("send_sms", url, encode_send_sms_form(&request, &self.api_key))
            .await
    }

    /// Fetch the account balance (`POST /user/balance/`).
    pub async fn get_balance(&self) -> Result<Envelope, GatewayError> {
        let url = self.endpoint(BALANCE_PATH)?;
        self.dispatch("get_balance", url, encode_api_key_form(&self.api_key))
            .await
    }

    /// Fetch the delivery report of an earlier send (`POST /report/request/{id}/`).
    pub async fn get_report(&self, request_id: RequestId) -> Result<Envelope, GatewayError> {
        let mut segments = REPORT_PATH_PREFIX.to_vec();
        segments.extend([request_id.as_str(), ""]);
        let url = self.endpoint(&segments)?;
        self.dispatch("get_report", url, encode_api_key_form(&self.api_key))
            .await
    }

    fn endpoint(&self, segments: &[&str]) -> Result<Url, GatewayError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| GatewayError::unexpected("base URL cannot carry a path"))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    async fn dispatch(
        &self,
        operation: &'static str,
        url: Url,
        payload: Payload,
    ) -> Result<Envelope, GatewayError> {
        let call = Call {
            method: HttpMethod::Post,
            endpoint: url.as_str(),
            headers: RequestHeaders::new(ContentType::FormUrlEncoded).compose(),
            body: Some(payload.into()),
            target: BodyTarget::Form,
            timeout: self.timeout,
        };

        let envelope = invoke::<EnvelopeJson>(self.http.as_ref(), call)
            .await?
            .into_envelope();

        if !envelope.error.is_success() {
            warn!(
                operation,
                code = envelope.error.as_i64(),
                msg = %envelope.msg,
                "sms.net.bd rejected the request"
            );
            return Err(GatewayError::Vendor {
                code: envelope.error,
                message: envelope.msg,
            });
        }
        Ok(envelope)
    }
}

impl SmsAdapter for SmsNetBd {
    fn kind(&self) -> AdapterKind {
        AdapterKind::SmsNetBd
    }

    fn send_sms(&self, payload: SendSmsPayload) -> BoxFuture<'_, Result<Envelope, GatewayError>> {
        Box::pin(SmsNetBd::send_sms(self, payload))
    }

    fn get_balance(&self) -> BoxFuture<'_, Result<Envelope, GatewayError>> {
        Box::pin(SmsNetBd::get_balance(self))
    }

    fn get_report(&self, request_id: RequestId) -> BoxFuture<'_, Result<Envelope, GatewayError>> {
        Box::pin(SmsNetBd::get_report(self, request_id))
    }
}

fn parse_base_url(input: &str) -> Result<Url, ValidationError> {
    let invalid = |reason: String| ValidationError::InvalidBaseUrl {
        input: input.to_owned(),
        reason,
    };

    let url = Url::parse(input.trim()).map_err(|err| invalid(err.to_string()))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(invalid(format!("unsupported scheme {:?}", url.scheme())));
    }
    if url.cannot_be_a_base() {
        return Err(invalid("URL cannot carry a path".to_owned()));
    }
    Ok(url)
}
