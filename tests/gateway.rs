//! End-to-end dispatch through `SmsGateway` against a one-shot local HTTP server.
//!
//! The server accepts a single connection, records the raw request and replies
//! with a canned status and body, so the reqwest transport, URL building and
//! form encoding are exercised over a real socket.

use bdsms::{AdapterKind, GatewayError, RequestId, SendSmsPayload, SmsGateway, SmsNetBdConfig};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

struct RecordedRequest {
    head: String,
    body: String,
}

impl RecordedRequest {
    fn request_line(&self) -> &str {
        self.head.lines().next().unwrap_or_default()
    }

    fn header(&self, name: &str) -> Option<&str> {
        header_value(&self.head, name)
    }
}

fn header_value<'a>(head: &'a str, name: &str) -> Option<&'a str> {
    head.lines().skip(1).find_map(|line| {
        let (key, value) = line.split_once(':')?;
        key.trim().eq_ignore_ascii_case(name).then_some(value.trim())
    })
}

async fn serve_once(
    status_line: &'static str,
    reply: &'static str,
) -> (String, JoinHandle<RecordedRequest>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let base = format!("http://{}", listener.local_addr().unwrap());

    let handle = tokio::spawn(async move {
        let (mut socket, _) = listener.accept().await.unwrap();

        let mut buf = Vec::new();
        let mut chunk = [0_u8; 1024];
        let (head, body_start) = loop {
            let n = socket.read(&mut chunk).await.unwrap();
            assert!(n > 0, "connection closed before headers were complete");
            buf.extend_from_slice(&chunk[..n]);
            if let Some(pos) = buf.windows(4).position(|w| w == b"\r\n\r\n") {
                break (String::from_utf8_lossy(&buf[..pos]).into_owned(), pos + 4);
            }
        };

        let content_length = header_value(&head, "content-length")
            .and_then(|it| it.parse::<usize>().ok())
            .unwrap_or(0);
        while buf.len() < body_start + content_length {
            let n = socket.read(&mut chunk).await.unwrap();
            assert!(n > 0, "connection closed before body was complete");
            buf.extend_from_slice(&chunk[..n]);
        }
        let body =
            String::from_utf8_lossy(&buf[body_start..body_start + content_length]).into_owned();

        let response = format!(
            "HTTP/1.1 {status_line}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{reply}",
            reply.len(),
        );
        socket.write_all(response.as_bytes()).await.unwrap();
        socket.shutdown().await.unwrap();

        RecordedRequest { head, body }
    });

    (base, handle)
}

fn gateway(base: &str) -> SmsGateway {
    SmsGateway::from_name(
        "sms-net-bd",
        SmsNetBdConfig::new("live_key").with_base_url(base),
    )
    .unwrap()
}

#[tokio::test]
async fn send_sms_round_trip_over_http() {
    let (base, server) = serve_once(
        "200 OK",
        r#"{"error":0,"msg":"Request successfully submitted","data":{"request_id":991}}"#,
    )
    .await;

    let gateway = gateway(&base);
    assert_eq!(gateway.kind(), AdapterKind::SmsNetBd);

    let payload = SendSmsPayload::new("+8801711111111, 01811111111", "hello & welcome")
        .sender_id("ACME");
    let envelope = gateway.client().send_sms(payload).await.unwrap();
    assert_eq!(envelope.msg, "Request successfully submitted");
    assert_eq!(envelope.data.request_id.as_deref(), Some("991"));

    let request = server.await.unwrap();
    assert_eq!(request.request_line(), "POST /sendsms HTTP/1.1");
    assert_eq!(
        request.header("content-type"),
        Some("application/x-www-form-urlencoded")
    );
    assert_eq!(
        request.body,
        "msg=hello+%26+welcome&to=%2B8801711111111%2C01811111111&sender_id=ACME&api_key=live_key"
    );
}

#[tokio::test]
async fn report_lookup_hits_substituted_path() {
    let (base, server) = serve_once(
        "200 OK",
        r#"{"error":0,"msg":"Success","data":{"request_id":991,"request_status":"Complete","request_charge":"0.25","recipients":[{"number":"8801711111111","charge":"0.25","status":"Sent"}]}}"#,
    )
    .await;

    let envelope = gateway(&base)
        .client()
        .get_report(RequestId::from(991_u64))
        .await
        .unwrap();
    assert_eq!(envelope.data.recipients[0].status.as_deref(), Some("Sent"));

    let request = server.await.unwrap();
    assert_eq!(request.request_line(), "POST /report/request/991/ HTTP/1.1");
    assert_eq!(request.body, "api_key=live_key");
}

#[tokio::test]
async fn vendor_error_is_surfaced() {
    let (base, server) = serve_once(
        "200 OK",
        r#"{"error":405,"msg":"Authorization required","data":[]}"#,
    )
    .await;

    let err = gateway(&base).client().get_balance().await.unwrap_err();
    assert!(matches!(
        err,
        GatewayError::Vendor { ref message, .. } if message == "Authorization required"
    ));
    assert!(err.vendor_code().is_some_and(|code| code.is_auth_error()));

    let request = server.await.unwrap();
    assert_eq!(request.request_line(), "POST /user/balance/ HTTP/1.1");
}

#[tokio::test]
async fn http_error_status_is_a_transport_error() {
    let (base, server) = serve_once(
        "500 Internal Server Error",
        r#"{"error":409,"msg":"Unknown error occurred on Server end."}"#,
    )
    .await;

    let err = gateway(&base).client().get_balance().await.unwrap_err();
    assert!(matches!(
        err,
        GatewayError::Transport { status: Some(500), ref message, .. }
            if message == "Unknown error occurred on Server end."
    ));
    server.await.unwrap();
}

#[tokio::test]
async fn unreachable_host_is_a_transport_error() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let base = format!("http://{}", listener.local_addr().unwrap());
    drop(listener);

    let err = gateway(&base).client().get_balance().await.unwrap_err();
    assert!(matches!(err, GatewayError::Transport { status: None, .. }));
}
