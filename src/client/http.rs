use std::error::Error as StdError;
use std::fmt;
use std::time::Duration;

use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use super::{BoxFuture, GatewayError};
use crate::transport::{BodyTarget, HeaderMap, RequestBody, serialize_body, set_content_type};

const NO_RESPONSE_DATA: &str = "no response data received from the API";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Patch,
    Delete,
}

impl HttpMethod {
    /// Write methods carry a request body; `GET` never does.
    pub fn is_write(self) -> bool {
        !matches!(self, Self::Get)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Put => "PUT",
            Self::Patch => "PATCH",
            Self::Delete => "DELETE",
        }
    }

    fn as_reqwest(self) -> reqwest::Method {
        match self {
            Self::Get => reqwest::Method::GET,
            Self::Post => reqwest::Method::POST,
            Self::Put => reqwest::Method::PUT,
            Self::Patch => reqwest::Method::PATCH,
            Self::Delete => reqwest::Method::DELETE,
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone)]
pub(crate) struct HttpRequest {
    pub method: HttpMethod,
    pub url: String,
    pub headers: HeaderMap,
    pub body: Option<String>,
    pub timeout: Option<Duration>,
}

#[derive(Debug, Clone)]
pub(crate) struct HttpResponse {
    pub status: u16,
    pub body: String,
}

pub(crate) trait HttpTransport: Send + Sync {
    fn execute<'a>(
        &'a self,
        request: HttpRequest,
    ) -> BoxFuture<'a, Result<HttpResponse, Box<dyn StdError + Send + Sync>>>;
}

#[derive(Debug, Clone)]
pub(crate) struct ReqwestTransport {
    pub client: reqwest::Client,
}

impl HttpTransport for ReqwestTransport {
    fn execute<'a>(
        &'a self,
        request: HttpRequest,
    ) -> BoxFuture<'a, Result<HttpResponse, Box<dyn StdError + Send + Sync>>> {
        Box::pin(async move {
            let mut builder = self
                .client
                .request(request.method.as_reqwest(), request.url.as_str());
            for (name, value) in &request.headers {
                builder = builder.header(name.as_str(), value.as_str());
            }
            if let Some(timeout) = request.timeout {
                builder = builder.timeout(timeout);
            }
            if let Some(body) = request.body {
                builder = builder.body(body);
            }

            let response = builder.send().await?;
            let status = response.status().as_u16();
            let body = response.text().await?;
            Ok(HttpResponse { status, body })
        })
    }
}

/// One outgoing call, before body serialization.
#[derive(Debug, Clone)]
pub(crate) struct Call<'a> {
    pub method: HttpMethod,
    pub endpoint: &'a str,
    pub headers: HeaderMap,
    pub body: Option<RequestBody>,
    pub target: BodyTarget,
    /// Per-call deadline handed to the HTTP client.
    pub timeout: Option<Duration>,
}

/// Serialize, send and decode one call.
///
/// Only write methods attach the body, and when they do `Content-Type` is
/// overwritten to match `target`. The decoded payload is returned as-is:
/// vendor-level codes inside it are left to the caller.
pub(crate) async fn invoke<R: DeserializeOwned>(
    http: &dyn HttpTransport,
    call: Call<'_>,
) -> Result<R, GatewayError> {
    let Call {
        method,
        endpoint,
        mut headers,
        body,
        target,
        timeout,
    } = call;

    let body = match body {
        Some(body) if method.is_write() => {
            set_content_type(&mut headers, &target.content_type());
            Some(serialize_body(&body, target))
        }
        Some(_) => {
            debug!(%method, endpoint, "read method, request body not sent");
            None
        }
        None => None,
    };

    debug!(%method, endpoint, ?target, "dispatching request");
    let response = http
        .execute(HttpRequest {
            method,
            url: endpoint.to_owned(),
            headers,
            body,
            timeout,
        })
        .await
        .map_err(|err| {
            warn!(%method, endpoint, error = %err, "HTTP request failed");
            GatewayError::Transport {
                status: None,
                message: err.to_string(),
                source: Some(err),
            }
        })?;
    debug!(%method, endpoint, status = response.status, "received response");

    if !(200..=299).contains(&response.status) {
        let message = remote_message(&response.body)
            .unwrap_or_else(|| format!("unexpected HTTP status: {}", response.status));
        warn!(%method, endpoint, status = response.status, %message, "non-success HTTP status");
        return Err(GatewayError::Transport {
            status: Some(response.status),
            message,
            source: None,
        });
    }

    if response.body.trim().is_empty() {
        return Err(GatewayError::unexpected(NO_RESPONSE_DATA));
    }

    serde_json::from_str(&response.body)
        .map_err(|err| GatewayError::unexpected(format!("invalid JSON response: {err}")))
}

/// `msg` field of a JSON error body, when there is a non-empty one.
fn remote_message(body: &str) -> Option<String> {
    let value: serde_json::Value = serde_json::from_str(body).ok()?;
    let msg = value.get("msg")?.as_str()?.trim();
    if msg.is_empty() {
        None
    } else {
        Some(msg.to_owned())
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use std::sync::{Arc, Mutex};

    use super::*;
    use crate::transport::{CONTENT_TYPE, ContentType, FieldValue, Payload, RequestHeaders};

    #[derive(Debug, Clone)]
    pub(crate) struct FakeTransport {
        state: Arc<Mutex<FakeTransportState>>,
    }

    #[derive(Debug)]
    struct FakeTransportState {
        last_request: Option<HttpRequest>,
        calls: usize,
        response: Result<HttpResponse, String>,
    }

    impl FakeTransport {
        pub(crate) fn new(response_status: u16, response_body: impl Into<String>) -> Self {
            Self::with_response(Ok(HttpResponse {
                status: response_status,
                body: response_body.into(),
            }))
        }

        pub(crate) fn failing(message: impl Into<String>) -> Self {
            Self::with_response(Err(message.into()))
        }

        fn with_response(response: Result<HttpResponse, String>) -> Self {
            Self {
                state: Arc::new(Mutex::new(FakeTransportState {
                    last_request: None,
                    calls: 0,
                    response,
                })),
            }
        }

        pub(crate) fn last_request(&self) -> Option<HttpRequest> {
            self.state.lock().unwrap().last_request.clone()
        }

        pub(crate) fn calls(&self) -> usize {
            self.state.lock().unwrap().calls
        }
    }

    impl HttpTransport for FakeTransport {
        fn execute<'a>(
            &'a self,
            request: HttpRequest,
        ) -> BoxFuture<'a, Result<HttpResponse, Box<dyn StdError + Send + Sync>>> {
            Box::pin(async move {
                let response = {
                    let mut state = self.state.lock().unwrap();
                    state.last_request = Some(request);
                    state.calls += 1;
                    state.response.clone()
                };
                response.map_err(Into::into)
            })
        }
    }

    fn form_call(method: HttpMethod) -> Call<'static> {
        let mut payload = Payload::new();
        payload.push("a", "1");
        payload.push_opt::<FieldValue>("b", None);
        Call {
            method,
            endpoint: "https://example.invalid/x",
            headers: RequestHeaders::new(ContentType::Json)
                .with("X-Trace", "abc")
                .compose(),
            body: Some(payload.into()),
            target: BodyTarget::Form,
            timeout: None,
        }
    }

    #[test]
    fn only_get_is_a_read_method() {
        assert!(!HttpMethod::Get.is_write());
        for method in [
            HttpMethod::Post,
            HttpMethod::Put,
            HttpMethod::Patch,
            HttpMethod::Delete,
        ] {
            assert!(method.is_write(), "{method} should carry a body");
        }
    }

    #[tokio::test]
    async fn write_call_serializes_body_and_overrides_content_type() {
        let transport = FakeTransport::new(200, r#"{"ok":true}"#);
        let value: serde_json::Value = invoke(&transport, form_call(HttpMethod::Post))
            .await
            .unwrap();
        assert_eq!(value, serde_json::json!({ "ok": true }));

        let request = transport.last_request().unwrap();
        assert_eq!(request.method, HttpMethod::Post);
        assert_eq!(request.url, "https://example.invalid/x");
        assert_eq!(request.body.as_deref(), Some("a=1"));
        assert_eq!(
            request.headers.get(CONTENT_TYPE).map(String::as_str),
            Some("application/x-www-form-urlencoded")
        );
        assert_eq!(
            request.headers.get("X-Trace").map(String::as_str),
            Some("abc")
        );
    }

    #[tokio::test]
    async fn json_target_sets_json_content_type() {
        let transport = FakeTransport::new(200, "{}");
        let mut call = form_call(HttpMethod::Put);
        call.target = BodyTarget::Json;
        call.headers = RequestHeaders::new(ContentType::FormUrlEncoded).compose();
        let _: serde_json::Value = invoke(&transport, call).await.unwrap();

        let request = transport.last_request().unwrap();
        assert_eq!(request.body.as_deref(), Some(r#"{"a":"1"}"#));
        assert_eq!(
            request.headers.get(CONTENT_TYPE).map(String::as_str),
            Some("application/json")
        );
    }

    #[tokio::test]
    async fn read_call_sends_no_body() {
        let transport = FakeTransport::new(200, "{}");
        let _: serde_json::Value = invoke(&transport, form_call(HttpMethod::Get))
            .await
            .unwrap();

        let request = transport.last_request().unwrap();
        assert_eq!(request.body, None);
        assert_eq!(
            request.headers.get(CONTENT_TYPE).map(String::as_str),
            Some("application/json")
        );
    }

    #[tokio::test]
    async fn deadline_is_passed_through() {
        let transport = FakeTransport::new(200, "{}");
        let mut call = form_call(HttpMethod::Post);
        call.timeout = Some(Duration::from_secs(5));
        let _: serde_json::Value = invoke(&transport, call).await.unwrap();
        assert_eq!(
            transport.last_request().unwrap().timeout,
            Some(Duration::from_secs(5))
        );
    }

    #[tokio::test]
    async fn network_failure_maps_to_transport_error() {
        let transport = FakeTransport::failing("connection refused");
        let err = invoke::<serde_json::Value>(&transport, form_call(HttpMethod::Post))
            .await
            .unwrap_err();
        match err {
            GatewayError::Transport {
                status,
                message,
                source,
            } => {
                assert_eq!(status, None);
                assert_eq!(message, "connection refused");
                assert!(source.is_some());
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn http_status_error_prefers_remote_msg() {
        let transport = FakeTransport::new(401, r#"{"error":405,"msg":"Authorization required"}"#);
        let err = invoke::<serde_json::Value>(&transport, form_call(HttpMethod::Post))
            .await
            .unwrap_err();
        assert!(matches!(
            &err,
            GatewayError::Transport { status: Some(401), message, .. } if message == "Authorization required"
        ));
        assert_eq!(err.to_string(), "API error: Authorization required");
    }

    #[tokio::test]
    async fn http_status_error_without_msg_uses_status_text() {
        let transport = FakeTransport::new(502, "<html>bad gateway</html>");
        let err = invoke::<serde_json::Value>(&transport, form_call(HttpMethod::Post))
            .await
            .unwrap_err();
        assert!(matches!(
            &err,
            GatewayError::Transport { status: Some(502), message, .. } if message == "unexpected HTTP status: 502"
        ));
    }

    #[tokio::test]
    async fn empty_body_is_unexpected() {
        let transport = FakeTransport::new(200, "  ");
        let err = invoke::<serde_json::Value>(&transport, form_call(HttpMethod::Post))
            .await
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "unexpected error: no response data received from the API"
        );
    }

    #[tokio::test]
    async fn undecodable_body_is_unexpected() {
        let transport = FakeTransport::new(200, "{ not json }");
        let err = invoke::<serde_json::Value>(&transport, form_call(HttpMethod::Post))
            .await
            .unwrap_err();
        assert!(matches!(err, GatewayError::Unexpected(message) if message.starts_with("invalid JSON response")));
    }
}
