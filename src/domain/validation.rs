use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    Empty { field: &'static str },
    InvalidRecipient { input: String },
    InvalidPhoneNumber { input: String },
    InvalidSchedule { input: String },
    InvalidRequestId { input: String },
    InvalidBaseUrl { input: String, reason: String },
}

impl ValidationError {
    /// Payload field the issue refers to.
    pub fn field(&self) -> &'static str {
        match self {
            Self::Empty { field } => *field,
            Self::InvalidRecipient { .. } | Self::InvalidPhoneNumber { .. } => "to",
            Self::InvalidSchedule { .. } => "schedule",
            Self::InvalidRequestId { .. } => "request_id",
            Self::InvalidBaseUrl { .. } => "base_url",
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty { field } => write!(f, "{field} must not be empty"),
            Self::InvalidRecipient { input } => write!(
                f,
                "to: recipient number must start with country code (880) or standard 01X and be valid: {input:?}"
            ),
            Self::InvalidPhoneNumber { input } => {
                write!(f, "to: invalid Bangladeshi mobile number: {input:?}")
            }
            Self::InvalidSchedule { input } => write!(
                f,
                "schedule must be formatted as Y-m-d H:i:s (e.g. 2021-10-13 16:00:52): {input:?}"
            ),
            Self::InvalidRequestId { input } => {
                write!(f, "request_id must not be a dot segment: {input:?}")
            }
            Self::InvalidBaseUrl { input, reason } => {
                write!(f, "base_url is invalid ({reason}): {input:?}")
            }
        }
    }
}

impl std::error::Error for ValidationError {}

/// Every issue found while validating one payload.
///
/// Invariant: never empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationErrors(pub(crate) Vec<ValidationError>);

impl ValidationErrors {
    /// Returns `Ok(())` when no issue was collected.
    pub fn check(issues: Vec<ValidationError>) -> Result<(), Self> {
        if issues.is_empty() {
            Ok(())
        } else {
            Err(Self(issues))
        }
    }

    pub fn issues(&self) -> &[ValidationError] {
        &self.0
    }

    pub fn into_issues(self) -> Vec<ValidationError> {
        self.0
    }

    /// Returns `true` if any issue refers to `field`.
    pub fn mentions(&self, field: &str) -> bool {
        self.0.iter().any(|issue| issue.field() == field)
    }
}

impl From<ValidationError> for ValidationErrors {
    fn from(value: ValidationError) -> Self {
        Self(vec![value])
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (idx, issue) in self.0.iter().enumerate() {
            if idx > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{issue}")?;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationErrors {}

#[cfg(test)]
mod tests {
    use super::{ValidationError, ValidationErrors};

    #[test]
    fn display_messages_are_human_readable() {
        let err = ValidationError::Empty { field: "msg" };
        assert_eq!(err.to_string(), "msg must not be empty");

        let err = ValidationError::InvalidRecipient {
            input: "123".to_owned(),
        };
        assert!(err.to_string().starts_with("to: "));
        assert!(err.to_string().contains("\"123\""));

        let err = ValidationError::InvalidSchedule {
            input: "tomorrow".to_owned(),
        };
        assert_eq!(
            err.to_string(),
            "schedule must be formatted as Y-m-d H:i:s (e.g. 2021-10-13 16:00:52): \"tomorrow\""
        );
    }

    #[test]
    fn aggregate_joins_with_comma_and_space() {
        let errors = ValidationErrors::check(vec![
            ValidationError::Empty { field: "msg" },
            ValidationError::Empty { field: "to" },
        ])
        .unwrap_err();
        assert_eq!(
            errors.to_string(),
            "msg must not be empty, to must not be empty"
        );
        assert!(errors.mentions("to"));
        assert!(!errors.mentions("schedule"));
    }

    #[test]
    fn check_accepts_no_issues() {
        assert!(ValidationErrors::check(Vec::new()).is_ok());
    }
}
