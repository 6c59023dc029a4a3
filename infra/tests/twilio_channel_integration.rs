//! Integration tests for the Twilio WhatsApp channel against a local stub
//! of the Messages API

use og_core::services::DeliveryChannel;
use og_infra::delivery::{TwilioConfig, TwilioWhatsAppChannel};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use tokio::sync::oneshot;

/// Serve a single request with `status` and `body`, handing back the raw request
async fn stub_server(status: &'static str, body: &'static str) -> (String, oneshot::Receiver<String>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let (tx, rx) = oneshot::channel();

    tokio::spawn(async move {
        let (mut socket, _) = listener.accept().await.unwrap();
        let mut request = Vec::new();
        let mut buf = [0u8; 4096];

        // Read headers, then as much body as Content-Length announces
        loop {
            let n = socket.read(&mut buf).await.unwrap();
            if n == 0 {
                break;
            }
            request.extend_from_slice(&buf[..n]);
            let text = String::from_utf8_lossy(&request);
            if let Some(header_end) = text.find("\r\n\r\n") {
                let content_length = text[..header_end]
                    .lines()
                    .find_map(|l| {
                        let lower = l.to_ascii_lowercase();
                        lower
                            .strip_prefix("content-length:")
                            .map(|v| v.trim().parse::<usize>().unwrap_or(0))
                    })
                    .unwrap_or(0);
                if request.len() >= header_end + 4 + content_length {
                    break;
                }
            }
        }

        let response = format!(
            "HTTP/1.1 {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
            status,
            body.len(),
            body
        );
        socket.write_all(response.as_bytes()).await.unwrap();
        let _ = tx.send(String::from_utf8_lossy(&request).into_owned());
    });

    (format!("http://{}", addr), rx)
}

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter("og_infra=debug")
        .with_test_writer()
        .try_init();
}

fn config(api_base: String) -> TwilioConfig {
    TwilioConfig {
        account_sid: "ACtest".to_string(),
        auth_token: "token".to_string(),
        from: "whatsapp:+14155238886".to_string(),
        api_base,
        request_timeout_secs: 5,
    }
}

#[tokio::test]
async fn test_send_posts_whatsapp_message() {
    init_tracing();
    let (base, request) = stub_server("201 Created", r#"{"sid":"SM123","status":"queued"}"#).await;
    let channel = TwilioWhatsAppChannel::new(config(base)).unwrap();

    let sid = channel
        .send("+910000000001", "Your verification code is 482913.")
        .await
        .unwrap();
    assert_eq!(sid, "SM123");

    let request = request.await.unwrap();
    assert!(request.starts_with("POST /2010-04-01/Accounts/ACtest/Messages.json"));
    assert!(request.to_ascii_lowercase().contains("authorization: basic"));
    assert!(request.contains("To=whatsapp%3A%2B910000000001"));
    assert!(request.contains("From=whatsapp%3A%2B14155238886"));
    assert!(request.contains("482913"));
}

#[tokio::test]
async fn test_provider_error_is_reported() {
    init_tracing();
    let (base, _request) = stub_server(
        "400 Bad Request",
        r#"{"code":63007,"message":"Twilio could not find a Channel with the specified From address","status":400}"#,
    )
    .await;
    let channel = TwilioWhatsAppChannel::new(config(base)).unwrap();

    let err = channel.send("+910000000001", "text").await.unwrap_err();
    assert!(err.contains("400"));
    assert!(err.contains("63007"));
}
