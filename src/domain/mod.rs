//! Domain layer: strong types with validation and invariants (no I/O).

mod request;
mod response;
mod validation;
mod value;

pub use request::{SendSms, SendSmsPayload};
pub use response::{Envelope, EnvelopeData, RecipientReport};
pub use validation::{ValidationError, ValidationErrors};
pub use value::{
    ApiKey, BdPhoneNumber, ErrorCode, KnownErrorCode, MessageText, Recipients, RequestId,
    Schedule,
};
