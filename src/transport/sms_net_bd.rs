use std::fmt;

use serde::Deserialize;
use serde::de::value::MapAccessDeserializer;
use serde::de::{IgnoredAny, MapAccess, SeqAccess, Visitor};

use super::body::Payload;
use super::money::LooseText;
use crate::domain::{
    ApiKey, Envelope, EnvelopeData, ErrorCode, MessageText, RecipientReport, Recipients,
    Schedule, SendSms,
};

pub const SEND_SMS_PATH: &[&str] = &["sendsms"];
pub const BALANCE_PATH: &[&str] = &["user", "balance", ""];
/// `report/request/{id}/`; the id segment goes between the prefix and the trailing slash.
pub const REPORT_PATH_PREFIX: &[&str] = &["report", "request"];

#[derive(Debug, Clone, Deserialize)]
pub struct EnvelopeJson {
    error: i64,
    #[serde(default)]
    msg: String,
    #[serde(default, deserialize_with = "object_or_empty")]
    data: Option<EnvelopeDataJson>,
}

#[derive(Debug, Clone, Default, Deserialize)]
struct EnvelopeDataJson {
    #[serde(default)]
    balance: Option<LooseText>,
    #[serde(default)]
    request_id: Option<LooseText>,
    #[serde(default)]
    request_status: Option<String>,
    #[serde(default)]
    request_charge: Option<LooseText>,
    #[serde(default)]
    recipients: Option<Vec<RecipientJson>>,
}

#[derive(Debug, Clone, Deserialize)]
struct RecipientJson {
    number: String,
    #[serde(default)]
    charge: Option<LooseText>,
    #[serde(default)]
    status: Option<String>,
}

/// Error envelopes may carry `"data": []` or `null` instead of an object.
fn object_or_empty<'de, D>(deserializer: D) -> Result<Option<EnvelopeDataJson>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    struct DataVisitor;

    impl<'de> Visitor<'de> for DataVisitor {
        type Value = Option<EnvelopeDataJson>;

        fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str("data object, array or null")
        }

        fn visit_map<A>(self, map: A) -> Result<Self::Value, A::Error>
        where
            A: MapAccess<'de>,
        {
            EnvelopeDataJson::deserialize(MapAccessDeserializer::new(map)).map(Some)
        }

        fn visit_seq<A>(self, mut seq: A) -> Result<Self::Value, A::Error>
        where
            A: SeqAccess<'de>,
        {
            while seq.next_element::<IgnoredAny>()?.is_some() {}
            Ok(None)
        }

        fn visit_unit<E>(self) -> Result<Self::Value, E> {
            Ok(None)
        }
    }

    deserializer.deserialize_any(DataVisitor)
}

impl EnvelopeJson {
    pub fn into_envelope(self) -> Envelope {
        let data = self.data.unwrap_or_default();
        Envelope {
            error: ErrorCode::new(self.error),
            msg: self.msg,
            data: EnvelopeData {
                balance: data.balance.map(LooseText::into_string),
                request_id: data.request_id.map(LooseText::into_string),
                request_status: data.request_status,
                request_charge: data.request_charge.map(LooseText::into_string),
                recipients: data
                    .recipients
                    .unwrap_or_default()
                    .into_iter()
                    .map(|it| RecipientReport {
                        number: it.number,
                        charge: it.charge.map(LooseText::into_string),
                        status: it.status,
                    })
                    .collect(),
            },
        }
    }
}

pub fn encode_send_sms_form(request: &SendSms, api_key: &ApiKey) -> Payload {
    let mut payload = Payload::new();
    payload.push(MessageText::FIELD, request.msg().as_str());
    payload.push(Recipients::FIELD, request.to().to_field_value());
    payload.push_opt(Schedule::FIELD, request.schedule_at().map(Schedule::as_str));
    payload.push_opt("sender_id", request.sender_id());
    payload.push_opt("content_id", request.content_id());
    payload.push(ApiKey::FIELD, api_key.as_str());
    payload
}

/// Balance and report lookups carry nothing but the key.
pub fn encode_api_key_form(api_key: &ApiKey) -> Payload {
    let mut payload = Payload::new();
    payload.push(ApiKey::FIELD, api_key.as_str());
    payload
}
