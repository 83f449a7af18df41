use serde::Deserialize;
use serde::de::Error as DeError;

/// Text-like value sent by sms.net.bd as either JSON string or JSON number.
///
/// Decodes `data.balance` (`user/balance/`), `data.request_id` (`sendsms` and
/// `report/request/{id}/`), `data.request_charge` and `data.recipients[].charge`
/// (delivery reports).
///
/// For numbers, the raw JSON token is preserved to avoid formatting drift
/// (`10.00` remains `"10.00"` instead of becoming `"10.0"`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LooseText(String);

impl LooseText {
    pub fn into_string(self) -> String {
        self.0
    }
}

impl<'de> Deserialize<'de> for LooseText {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let raw: Box<serde_json::value::RawValue> = Deserialize::deserialize(deserializer)?;
        let token = raw.get();

        match token.as_bytes().first().copied() {
            Some(b'"') => {
                let parsed = serde_json::from_str::<String>(token).map_err(D::Error::custom)?;
                Ok(Self(parsed))
            }
            Some(b'-' | b'0'..=b'9') => Ok(Self(token.to_owned())),
            _ => Err(D::Error::custom(
                "expected field to be JSON string or number",
            )),
        }
    }
}
