use std::fmt;

use phonenumber::country;

use crate::domain::validation::{ValidationError, ValidationErrors};

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
/// sms.net.bd `api_key` credential.
///
/// Invariant: non-empty after trimming.
pub struct ApiKey(String);

impl ApiKey {
    /// Form field name used by sms.net.bd (`api_key`).
    pub const FIELD: &'static str = "api_key";

    /// Create a validated [`ApiKey`].
    pub fn new(value: impl Into<String>) -> Result<Self, ValidationError> {
        let value = value.into();
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err(ValidationError::Empty { field: Self::FIELD });
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Borrow the validated key.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
/// SMS message body (`msg`).
///
/// Invariant: not empty. The original value (including whitespace) is preserved.
pub struct MessageText(String);

impl MessageText {
    /// Form field name used by sms.net.bd (`msg`).
    pub const FIELD: &'static str = "msg";

    /// Create validated message text.
    pub fn new(value: impl Into<String>) -> Result<Self, ValidationError> {
        let value = value.into();
        if value.is_empty() {
            return Err(ValidationError::Empty { field: Self::FIELD });
        }
        Ok(Self(value))
    }

    /// Borrow the message text as provided.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
/// Comma-separated recipient list (`to`).
///
/// Invariant: at least one number, and every number matches `+8801XXXXXXXXX`,
/// `8801XXXXXXXXX` or `01XXXXXXXXX`.
pub struct Recipients(Vec<String>);

impl Recipients {
    /// Form field name used by sms.net.bd (`to`).
    pub const FIELD: &'static str = "to";

    /// Split on commas, trim every number and check it against the recipient pattern.
    ///
    /// Every offending number is reported, not only the first one.
    pub fn parse(value: &str) -> Result<Self, ValidationErrors> {
        if value.is_empty() {
            return Err(ValidationError::Empty { field: Self::FIELD }.into());
        }

        let numbers: Vec<String> = value.split(',').map(|it| it.trim().to_owned()).collect();
        let issues = numbers
            .iter()
            .filter(|number| !is_recipient_number(number))
            .map(|number| ValidationError::InvalidRecipient {
                input: number.clone(),
            })
            .collect();
        ValidationErrors::check(issues)?;

        Ok(Self(numbers))
    }

    /// Build a recipient list from already-normalized phone numbers.
    pub fn from_numbers(numbers: &[BdPhoneNumber]) -> Result<Self, ValidationError> {
        if numbers.is_empty() {
            return Err(ValidationError::Empty { field: Self::FIELD });
        }
        Ok(Self(
            numbers.iter().map(|it| it.e164().to_owned()).collect(),
        ))
    }

    /// Trimmed numbers in request order.
    pub fn numbers(&self) -> &[String] {
        &self.0
    }

    /// Value as sent on the wire (numbers joined with `,`).
    pub fn to_field_value(&self) -> String {
        self.0.join(",")
    }
}

/// `^(\+?8801\d{9}|01\d{9})$`
fn is_recipient_number(value: &str) -> bool {
    let subscriber = value
        .strip_prefix("+8801")
        .or_else(|| value.strip_prefix("8801"))
        .or_else(|| value.strip_prefix("01"));

    match subscriber {
        Some(digits) => digits.len() == 9 && digits.bytes().all(|b| b.is_ascii_digit()),
        None => false,
    }
}

#[derive(Debug, Clone)]
/// Parsed Bangladeshi mobile number with an E.164 representation.
///
/// Equality and hashing are based on the E.164 form.
pub struct BdPhoneNumber {
    raw: String,
    e164: String,
}

impl BdPhoneNumber {
    /// Parse a number in any common notation (`01711-111111`, `+880 1711 111111`, ...).
    ///
    /// National numbers are interpreted in the `BD` region. The normalized number
    /// must be a mobile number accepted by sms.net.bd.
    pub fn parse(input: impl Into<String>) -> Result<Self, ValidationError> {
        let input = input.into();
        let raw = input.trim().to_owned();
        if raw.is_empty() {
            return Err(ValidationError::Empty {
                field: Recipients::FIELD,
            });
        }

        let parsed = phonenumber::parse(Some(country::Id::BD), &raw)
            .map_err(|_| ValidationError::InvalidPhoneNumber { input: raw.clone() })?;
        let e164 = phonenumber::format(&parsed)
            .mode(phonenumber::Mode::E164)
            .to_string();

        if !is_recipient_number(&e164) {
            return Err(ValidationError::InvalidPhoneNumber { input: raw });
        }

        Ok(Self { raw, e164 })
    }

    /// Raw input after trimming.
    pub fn raw(&self) -> &str {
        &self.raw
    }

    /// Normalized E.164 representation (`+8801XXXXXXXXX`).
    pub fn e164(&self) -> &str {
        &self.e164
    }
}

impl PartialEq for BdPhoneNumber {
    fn eq(&self, other: &Self) -> bool {
        self.e164 == other.e164
    }
}

impl Eq for BdPhoneNumber {}

impl std::hash::Hash for BdPhoneNumber {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.e164.hash(state);
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
/// Scheduled send time (`schedule`), `Y-m-d H:i:s` in the vendor's local time.
///
/// Invariant: matches `\d{4}-\d{2}-\d{2} \d{2}:\d{2}:\d{2}` exactly. Calendar
/// ranges are left to the vendor.
pub struct Schedule(String);

impl Schedule {
    /// Form field name used by sms.net.bd (`schedule`).
    pub const FIELD: &'static str = "schedule";

    const TEMPLATE: &'static [u8; 19] = b"dddd-dd-dd dd:dd:dd";

    /// Create a validated [`Schedule`].
    pub fn new(value: impl Into<String>) -> Result<Self, ValidationError> {
        let value = value.into();
        let bytes = value.as_bytes();
        let matches = bytes.len() == Self::TEMPLATE.len()
            && bytes
                .iter()
                .zip(Self::TEMPLATE.iter())
                .all(|(actual, expected)| match expected {
                    b'd' => actual.is_ascii_digit(),
                    other => actual == other,
                });

        if !matches {
            return Err(ValidationError::InvalidSchedule { input: value });
        }
        Ok(Self(value))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
/// Id returned by `sendsms` (`request_id`), used to look up a delivery report.
///
/// Accepted as text or integer; always carried as text. Invariant: non-empty
/// after trimming and not `.` or `..`, since it becomes one URL path segment.
pub struct RequestId(String);

impl RequestId {
    /// Field name used by sms.net.bd (`request_id`).
    pub const FIELD: &'static str = "request_id";

    /// Create a validated [`RequestId`] from text.
    pub fn new(value: impl Into<String>) -> Result<Self, ValidationError> {
        let value = value.into();
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err(ValidationError::Empty { field: Self::FIELD });
        }
        if matches!(trimmed, "." | "..") {
            return Err(ValidationError::InvalidRequestId {
                input: trimmed.to_owned(),
            });
        }
        Ok(Self(trimmed.to_owned()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<u64> for RequestId {
    fn from(value: u64) -> Self {
        Self(value.to_string())
    }
}

impl From<u32> for RequestId {
    fn from(value: u32) -> Self {
        Self(value.to_string())
    }
}

impl fmt::Display for RequestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
/// sms.net.bd envelope `error` code.
///
/// This value is preserved as-is even when the code is unknown to this crate.
pub struct ErrorCode(i64);

impl ErrorCode {
    pub const SUCCESS: Self = Self(0);

    /// Construct a code from its integer representation.
    pub fn new(code: i64) -> Self {
        Self(code)
    }

    /// Get the integer code as provided by sms.net.bd.
    pub fn as_i64(self) -> i64 {
        self.0
    }

    /// `error == 0`.
    pub fn is_success(self) -> bool {
        self.0 == 0
    }

    /// Map this code to a known variant, if one exists.
    pub fn known(self) -> Option<KnownErrorCode> {
        KnownErrorCode::from_code(self.0)
    }

    /// Human-readable description of a known code.
    pub fn description(self) -> Option<&'static str> {
        self.known().map(KnownErrorCode::description)
    }

    /// Returns `true` if this code represents an authentication/authorization error.
    pub fn is_auth_error(self) -> bool {
        matches!(self.known(), Some(kind) if kind.is_auth_error())
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[non_exhaustive]
/// Error codes documented by sms.net.bd.
pub enum KnownErrorCode {
    Success,
    InvalidParameter,
    PermissionDenied,
    NotFound,
    AuthorizationRequired,
    ServerError,
    AccountExpired,
    ResellerAccountExpired,
    InvalidSchedule,
    InvalidSenderId,
    EmptyMessage,
    MessageTooLong,
    NoValidNumber,
    InsufficientBalance,
    ContentBlocked,
}

impl KnownErrorCode {
    /// Convert a raw sms.net.bd code into a known variant.
    pub fn from_code(code: i64) -> Option<Self> {
        Some(match code {
            0 => Self::Success,
            400 => Self::InvalidParameter,
            403 => Self::PermissionDenied,
            404 => Self::NotFound,
            405 => Self::AuthorizationRequired,
            409 => Self::ServerError,
            410 => Self::AccountExpired,
            411 => Self::ResellerAccountExpired,
            412 => Self::InvalidSchedule,
            413 => Self::InvalidSenderId,
            414 => Self::EmptyMessage,
            415 => Self::MessageTooLong,
            416 => Self::NoValidNumber,
            417 => Self::InsufficientBalance,
            420 => Self::ContentBlocked,
            _ => return None,
        })
    }

    pub fn code(self) -> ErrorCode {
        ErrorCode(match self {
            Self::Success => 0,
            Self::InvalidParameter => 400,
            Self::PermissionDenied => 403,
            Self::NotFound => 404,
            Self::AuthorizationRequired => 405,
            Self::ServerError => 409,
            Self::AccountExpired => 410,
            Self::ResellerAccountExpired => 411,
            Self::InvalidSchedule => 412,
            Self::InvalidSenderId => 413,
            Self::EmptyMessage => 414,
            Self::MessageTooLong => 415,
            Self::NoValidNumber => 416,
            Self::InsufficientBalance => 417,
            Self::ContentBlocked => 420,
        })
    }

    /// Description as documented by sms.net.bd.
    pub fn description(self) -> &'static str {
        match self {
            Self::Success => "Success. Everything worked as expected.",
            Self::InvalidParameter => {
                "The request was rejected, due to a missing or invalid parameter."
            }
            Self::PermissionDenied => "You don't have permissions to perform the request.",
            Self::NotFound => "The requested resource not found.",
            Self::AuthorizationRequired => "Authorization required.",
            Self::ServerError => "Unknown error occurred on Server end.",
            Self::AccountExpired => "Account expired",
            Self::ResellerAccountExpired => "Reseller Account expired or suspended",
            Self::InvalidSchedule => "Invalid Schedule",
            Self::InvalidSenderId => "Invalid Sender ID",
            Self::EmptyMessage => "Message is empty",
            Self::MessageTooLong => "Message is too long",
            Self::NoValidNumber => "No valid number found",
            Self::InsufficientBalance => "Insufficient balance",
            Self::ContentBlocked => "Content Blocked",
        }
    }

    /// Whether this code indicates missing or insufficient credentials.
    pub fn is_auth_error(self) -> bool {
        matches!(self, Self::PermissionDenied | Self::AuthorizationRequired)
    }
}
