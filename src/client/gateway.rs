use std::fmt;
use std::str::FromStr;

use super::sms_net_bd::{SmsNetBd, SmsNetBdConfig};
use super::{BoxFuture, GatewayError};
use crate::domain::{Envelope, RequestId, SendSmsPayload};

/// Operations every SMS adapter offers, whatever vendor is behind it.
pub trait SmsAdapter: Send + Sync {
    fn kind(&self) -> AdapterKind;

    fn send_sms(&self, payload: SendSmsPayload) -> BoxFuture<'_, Result<Envelope, GatewayError>>;

    fn get_balance(&self) -> BoxFuture<'_, Result<Envelope, GatewayError>>;

    fn get_report(&self, request_id: RequestId) -> BoxFuture<'_, Result<Envelope, GatewayError>>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
/// Vendors known to the registry.
pub enum AdapterKind {
    /// [sms.net.bd](https://sms.net.bd), identifier `sms-net-bd`.
    SmsNetBd,
    /// Bulk SMS Dhaka, identifier `bulk-sms-dhaka`. Not implemented yet.
    BulkSmsDhaka,
}

impl AdapterKind {
    pub const ALL: [Self; 2] = [Self::SmsNetBd, Self::BulkSmsDhaka];

    /// Registry identifier.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::SmsNetBd => "sms-net-bd",
            Self::BulkSmsDhaka => "bulk-sms-dhaka",
        }
    }

    /// Whether [`SmsGateway::new`] can build this adapter.
    pub fn is_available(self) -> bool {
        matches!(self, Self::SmsNetBd)
    }
}

impl fmt::Display for AdapterKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AdapterKind {
    type Err = GatewayError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| GatewayError::UnsupportedAdapter(s.to_owned()))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
/// Vendor-specific configuration handed to [`SmsGateway::new`].
pub enum AdapterConfig {
    SmsNetBd(SmsNetBdConfig),
}

impl From<SmsNetBdConfig> for AdapterConfig {
    fn from(value: SmsNetBdConfig) -> Self {
        Self::SmsNetBd(value)
    }
}

/// Front door selecting an adapter by vendor.
///
/// ```rust,no_run
/// use bdsms::{AdapterKind, SendSmsPayload, SmsGateway, SmsNetBdConfig};
///
/// # async fn run() -> Result<(), bdsms::GatewayError> {
/// let gateway = SmsGateway::new(AdapterKind::SmsNetBd, SmsNetBdConfig::new("..."))?;
/// let payload = SendSmsPayload::new("01711111111", "hello");
/// let envelope = gateway.client().send_sms(payload).await?;
/// println!("{:?}", envelope.data.request_id);
/// # Ok(())
/// # }
/// ```
pub struct SmsGateway {
    client: Box<dyn SmsAdapter>,
}

impl SmsGateway {
    /// Build the adapter for `kind`.
    ///
    /// Fails with [`GatewayError::AdapterUnavailable`] for placeholder kinds and
    /// with [`GatewayError::Validation`] for an invalid configuration.
    pub fn new(kind: AdapterKind, config: impl Into<AdapterConfig>) -> Result<Self, GatewayError> {
        let client = load_adapter(kind, config.into())?;
        Ok(Self { client })
    }

    /// Like [`SmsGateway::new`], selecting the adapter by its identifier
    /// (`"sms-net-bd"`, ...).
    pub fn from_name(name: &str, config: impl Into<AdapterConfig>) -> Result<Self, GatewayError> {
        let kind = name.parse::<AdapterKind>()?;
        Self::new(kind, config)
    }

    pub fn kind(&self) -> AdapterKind {
        self.client.kind()
    }

    /// The selected adapter.
    pub fn client(&self) -> &dyn SmsAdapter {
        self.client.as_ref()
    }

    pub fn into_client(self) -> Box<dyn SmsAdapter> {
        self.client
    }
}

fn load_adapter(kind: AdapterKind, config: AdapterConfig) -> Result<Box<dyn SmsAdapter>, GatewayError> {
    match (kind, config) {
        (AdapterKind::SmsNetBd, AdapterConfig::SmsNetBd(config)) => {
            Ok(Box::new(SmsNetBd::new(config)?))
        }
        (AdapterKind::BulkSmsDhaka, _) => Err(GatewayError::AdapterUnavailable(kind)),
    }
}
