use serde::Deserialize;

use crate::domain::validation::{ValidationError, ValidationErrors};
use crate::domain::value::{BdPhoneNumber, MessageText, Recipients, Schedule};

/// Unvalidated input for `sendsms`, as a caller would assemble it.
///
/// Validate it with [`SendSms::validate`]; adapters do this on every call.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct SendSmsPayload {
    pub msg: String,
    /// One or more numbers separated by `,`.
    pub to: String,
    /// `Y-m-d H:i:s`; an empty string counts as no schedule.
    #[serde(default)]
    pub schedule: Option<String>,
    #[serde(default)]
    pub sender_id: Option<String>,
    /// Approved campaign content id (needed for bulk SMS).
    #[serde(default)]
    pub content_id: Option<String>,
}

impl SendSmsPayload {
    pub fn new(to: impl Into<String>, msg: impl Into<String>) -> Self {
        Self {
            msg: msg.into(),
            to: to.into(),
            ..Self::default()
        }
    }

    /// Build a payload addressed to already-parsed numbers.
    pub fn to_numbers(numbers: &[BdPhoneNumber], msg: impl Into<String>) -> Self {
        let to = Recipients::from_numbers(numbers)
            .map(|it| it.to_field_value())
            .unwrap_or_default();
        Self::new(to, msg)
    }

    pub fn schedule(mut self, schedule: impl Into<String>) -> Self {
        self.schedule = Some(schedule.into());
        self
    }

    pub fn sender_id(mut self, sender_id: impl Into<String>) -> Self {
        self.sender_id = Some(sender_id.into());
        self
    }

    pub fn content_id(mut self, content_id: impl Into<String>) -> Self {
        self.content_id = Some(content_id.into());
        self
    }
}

/// Validated `sendsms` request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SendSms {
    msg: MessageText,
    to: Recipients,
    schedule: Option<Schedule>,
    sender_id: Option<String>,
    content_id: Option<String>,
}

impl SendSms {
    /// Check every field of `payload`, collecting all issues before failing.
    pub fn validate(payload: SendSmsPayload) -> Result<Self, ValidationErrors> {
        let msg = MessageText::new(payload.msg);
        let to = Recipients::parse(&payload.to);
        let schedule = payload
            .schedule
            .filter(|it| !it.is_empty())
            .map(Schedule::new)
            .transpose();

        match (msg, to, schedule) {
            (Ok(msg), Ok(to), Ok(schedule)) => Ok(Self {
                msg,
                to,
                schedule,
                sender_id: payload.sender_id,
                content_id: payload.content_id,
            }),
            (msg, to, schedule) => {
                let mut issues = Vec::<ValidationError>::new();
                if let Err(err) = msg {
                    issues.push(err);
                }
                if let Err(err) = to {
                    issues.extend(err.into_issues());
                }
                if let Err(err) = schedule {
                    issues.push(err);
                }
                Err(ValidationErrors(issues))
            }
        }
    }

    pub fn msg(&self) -> &MessageText {
        &self.msg
    }

    pub fn to(&self) -> &Recipients {
        &self.to
    }

    pub fn schedule_at(&self) -> Option<&Schedule> {
        self.schedule.as_ref()
    }

    pub fn sender_id(&self) -> Option<&str> {
        self.sender_id.as_deref()
    }

    pub fn content_id(&self) -> Option<&str> {
        self.content_id.as_deref()
    }
}

impl TryFrom<SendSmsPayload> for SendSms {
    type Error = ValidationErrors;

    fn try_from(value: SendSmsPayload) -> Result<Self, Self::Error> {
        Self::validate(value)
    }
}
