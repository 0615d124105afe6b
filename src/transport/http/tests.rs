use std::collections::{BTreeMap, VecDeque};
use std::io::{Read, Write};
use std::net::TcpListener;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;

use serde_json::json;

use crate::core::error::{ConfigError, EngineError};
use crate::core::types::{EngineId, ProxySpec};
use crate::transport::http::{
    DEFAULT_TIMEOUT_SECS, HttpClient, HttpRequest, ReqwestTransport, TransportError,
};

#[derive(Debug, Clone)]
struct MockResponse {
    status_code: u16,
    body: String,
}

impl MockResponse {
    fn new(status_code: u16, body: &str) -> Self {
        Self {
            status_code,
            body: body.to_string(),
        }
    }
}

struct MockServer {
    addr: std::net::SocketAddr,
    request_count: Arc<AtomicUsize>,
    captured_requests: Arc<Mutex<Vec<String>>>,
    handle: Option<thread::JoinHandle<()>>,
}

impl MockServer {
    fn start(responses: Vec<MockResponse>) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").expect("bind test listener");
        listener
            .set_nonblocking(false)
            .expect("configure blocking listener");
        let addr = listener.local_addr().expect("listener addr");

        let queue = Arc::new(Mutex::new(VecDeque::from(responses)));
        let request_count = Arc::new(AtomicUsize::new(0));
        let captured_requests = Arc::new(Mutex::new(Vec::new()));

        let queue_clone = Arc::clone(&queue);
        let request_count_clone = Arc::clone(&request_count);
        let captured_clone = Arc::clone(&captured_requests);

        let handle = thread::spawn(move || {
            loop {
                let next_response = {
                    let mut queue = queue_clone.lock().expect("queue lock");
                    queue.pop_front()
                };

                let Some(response) = next_response else {
                    break;
                };

                let (mut stream, _) = listener.accept().expect("accept connection");
                stream
                    .set_read_timeout(Some(Duration::from_secs(3)))
                    .expect("set stream timeout");

                let request = read_http_request(&mut stream);
                captured_clone.lock().expect("capture lock").push(request);
                request_count_clone.fetch_add(1, Ordering::SeqCst);

                let response_text = build_http_response(&response);
                stream
                    .write_all(response_text.as_bytes())
                    .expect("write response");
                stream.flush().expect("flush response");
            }
        });

        Self {
            addr,
            request_count,
            captured_requests,
            handle: Some(handle),
        }
    }

    fn url(&self) -> String {
        format!("http://{}", self.addr)
    }

    fn request_count(&self) -> usize {
        self.request_count.load(Ordering::SeqCst)
    }

    fn captured_requests(&self) -> Vec<String> {
        self.captured_requests.lock().expect("capture lock").clone()
    }

    fn shutdown(&mut self) {
        if let Some(handle) = self.handle.take() {
            handle.join().expect("join mock server");
        }
    }
}

impl Drop for MockServer {
    fn drop(&mut self) {
        self.shutdown();
    }
}

#[test]
fn test_transport_rejects_zero_timeout() {
    let result = ReqwestTransport::new(0, None);
    assert!(matches!(
        result,
        Err(ConfigError::InvalidTimeout { timeout_secs: 0 })
    ));

    let transport = ReqwestTransport::new(DEFAULT_TIMEOUT_SECS, None).expect("create transport");
    assert_eq!(transport.timeout(), Duration::from_secs(10));
}

#[tokio::test]
async fn test_transport_returns_non_success_status_as_response() {
    let mut server = MockServer::start(vec![MockResponse::new(503, r#"{"error":"busy"}"#)]);
    let transport = ReqwestTransport::new(5, None).expect("create transport");

    let response = transport
        .send(HttpRequest::get(format!("{}/status", server.url())))
        .await
        .expect("status responses are not transport errors");

    assert_eq!(response.status_code, 503);
    assert!(!response.is_success());
    assert_eq!(response.body, r#"{"error":"busy"}"#);

    server.shutdown();
    assert_eq!(server.request_count(), 1);
}

#[tokio::test]
async fn test_transport_sends_headers_query_and_json_body() {
    let mut server = MockServer::start(vec![MockResponse::new(200, r#"{"ok":true}"#)]);
    let transport = ReqwestTransport::new(5, None).expect("create transport");

    let url = format!("{}/translate", server.url());
    let request = HttpRequest::post_json(url, json!([{"text": "hi"}]))
        .with_query("api-version", "3.0")
        .with_header("X-Custom-Header", "custom-value");

    let response = transport.send(request).await.expect("successful response");
    assert!(response.is_success());
    assert_eq!(response.body, r#"{"ok":true}"#);

    server.shutdown();
    let captured = server.captured_requests();
    assert_eq!(captured.len(), 1);

    let raw = &captured[0];
    assert!(raw.starts_with("POST /translate?api-version=3.0 HTTP/1.1"));

    let headers = parse_request_headers(raw);
    assert_eq!(
        headers.get("x-custom-header"),
        Some(&"custom-value".to_string())
    );
    assert_eq!(
        headers.get("content-type"),
        Some(&"application/json".to_string())
    );
    assert!(raw.ends_with(r#"[{"text":"hi"}]"#));
}

#[tokio::test]
async fn test_transport_routes_plain_http_through_configured_proxy() {
    let mut proxy_server = MockServer::start(vec![MockResponse::new(200, "via proxy")]);
    let proxy = ProxySpec {
        scheme: "http".to_string(),
        host: "127.0.0.1".to_string(),
        port: proxy_server.addr.port().to_string(),
    };
    let transport = ReqwestTransport::new(5, Some(&proxy)).expect("create transport");

    let response = transport
        .send(HttpRequest::get("http://translate.example.invalid/ping"))
        .await
        .expect("proxy should answer");
    assert_eq!(response.body, "via proxy");

    proxy_server.shutdown();
    let captured = proxy_server.captured_requests();
    assert_eq!(captured.len(), 1);
    assert!(captured[0].starts_with("GET http://translate.example.invalid/ping HTTP/1.1"));
}

#[tokio::test]
async fn test_unusable_proxy_surfaces_as_network_error_on_send() {
    let proxy = ProxySpec {
        scheme: "bogus".to_string(),
        host: "127.0.0.1".to_string(),
        port: "7890".to_string(),
    };
    let transport = ReqwestTransport::new(5, Some(&proxy)).expect("construction never fails");

    let error = transport
        .send(HttpRequest::get("http://127.0.0.1:9/unused"))
        .await
        .expect_err("proxy cannot be used");
    assert!(matches!(error, TransportError::Network { .. }));

    let engine_error = error.into_engine_error(EngineId::Custom);
    assert!(matches!(
        engine_error,
        EngineError::Network {
            engine: EngineId::Custom,
            ..
        }
    ));
}

#[tokio::test]
async fn test_invalid_header_is_reported_as_invalid_request() {
    let transport = ReqwestTransport::new(5, None).expect("create transport");
    let request = HttpRequest::get("http://127.0.0.1:9/unused").with_header("bad header", "x");

    let error = transport
        .send(request)
        .await
        .expect_err("header is invalid");
    assert!(matches!(error, TransportError::InvalidRequest { .. }));
    assert!(matches!(
        error.into_engine_error(EngineId::Microsoft),
        EngineError::Config { .. }
    ));
}

#[tokio::test]
async fn test_relative_url_is_reported_as_invalid_request() {
    let transport = ReqwestTransport::new(5, None).expect("create transport");

    let error = transport
        .send(HttpRequest::post_json("not a url", json!({"text": "hi"})))
        .await
        .expect_err("url has no base");
    assert!(matches!(error, TransportError::InvalidRequest { .. }));
    assert!(error.to_string().contains("relative URL without a base"));
}

#[test]
fn test_request_header_lookup_is_case_insensitive() {
    let request =
        HttpRequest::get("http://localhost").with_header("Content-Type", "application/json");
    assert_eq!(request.header("content-type"), Some("application/json"));
    assert_eq!(request.header("authorization"), None);
}

fn read_http_request(stream: &mut std::net::TcpStream) -> String {
    let mut request = Vec::new();
    let mut chunk = [0_u8; 1024];

    loop {
        match stream.read(&mut chunk) {
            Ok(0) => break,
            Ok(bytes_read) => {
                request.extend_from_slice(&chunk[..bytes_read]);

                if let Some(header_end) =
                    request.windows(4).position(|window| window == b"\r\n\r\n")
                {
                    let headers = String::from_utf8_lossy(&request[..header_end]).to_string();
                    let content_length = headers
                        .lines()
                        .find_map(|line| {
                            let (name, value) = line.split_once(':')?;
                            if name.eq_ignore_ascii_case("content-length") {
                                value.trim().parse::<usize>().ok()
                            } else {
                                None
                            }
                        })
                        .unwrap_or(0);
                    if request.len() >= header_end + 4 + content_length {
                        break;
                    }
                }
            }
            Err(error)
                if error.kind() == std::io::ErrorKind::WouldBlock
                    || error.kind() == std::io::ErrorKind::TimedOut =>
            {
                break;
            }
            Err(error) => panic!("failed reading request: {error}"),
        }
    }

    String::from_utf8_lossy(&request).to_string()
}

fn parse_request_headers(raw_request: &str) -> BTreeMap<String, String> {
    raw_request
        .split("\r\n")
        .skip(1)
        .take_while(|line| !line.is_empty())
        .filter_map(|line| {
            let (name, value) = line.split_once(':')?;
            Some((name.trim().to_ascii_lowercase(), value.trim().to_string()))
        })
        .collect()
}

fn build_http_response(response: &MockResponse) -> String {
    format!(
        "HTTP/1.1 {} {}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
        response.status_code,
        status_reason(response.status_code),
        response.body.len(),
        response.body,
    )
}

fn status_reason(status_code: u16) -> &'static str {
    match status_code {
        200 => "OK",
        401 => "Unauthorized",
        429 => "Too Many Requests",
        500 => "Internal Server Error",
        503 => "Service Unavailable",
        _ => "Unknown",
    }
}
