use crate::domain::value::ErrorCode;

/// Response envelope shared by every sms.net.bd endpoint.
///
/// `error == 0` signals success; adapters turn any other code into an error, so
/// an envelope handed back to callers is always a successful one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Envelope {
    pub error: ErrorCode,
    pub msg: String,
    pub data: EnvelopeData,
}

/// `data` object of an [`Envelope`]. Which fields are set depends on the endpoint.
///
/// Money-like and id fields are kept as text, even when sent as JSON numbers.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EnvelopeData {
    pub balance: Option<String>,
    pub request_id: Option<String>,
    pub request_status: Option<String>,
    pub request_charge: Option<String>,
    pub recipients: Vec<RecipientReport>,
}

/// Per-recipient line of a delivery report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecipientReport {
    pub number: String,
    pub charge: Option<String>,
    pub status: Option<String>,
}
