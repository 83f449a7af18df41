//! Transport layer: wire-format details (headers, body encoding, envelope decoding).

pub mod body;
pub mod headers;
mod money;
pub(crate) mod sms_net_bd;

pub use body::{BodyTarget, FieldValue, Payload, RequestBody, serialize_body};
pub use headers::{CONTENT_TYPE, ContentType, HeaderMap, RequestHeaders, set_content_type};
