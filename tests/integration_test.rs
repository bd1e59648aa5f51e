//! Tests de integración para el servidor HTTP
//! tests/integration_test.rs
//!
//! Cada test levanta su propio servidor en un puerto efímero dentro del
//! proceso y le habla HTTP crudo por `TcpStream`.

use codecrafters_http::config::Config;
use codecrafters_http::server::Server;
use std::io::{Read, Write};
use std::net::{SocketAddr, TcpStream};
use std::path::Path;
use std::thread;
use std::time::Duration;
use tempfile::tempdir;

/// Helper: arranca un servidor y retorna su dirección
fn start_server(directory: Option<&Path>) -> SocketAddr {
    let mut config = Config::default();
    config.port = 0;
    config.directory = directory.map(Path::to_path_buf);
    config.read_timeout_ms = 5_000;

    let mut server = Server::new(config);
    let addr = server.bind().expect("bind");
    thread::spawn(move || server.run());
    addr
}

/// Helper: envía bytes crudos y retorna la response completa
fn send_raw(addr: SocketAddr, raw: &[u8]) -> Result<Vec<u8>, Box<dyn std::error::Error>> {
    let mut stream = TcpStream::connect(addr)?;

    // Configurar timeouts
    stream.set_read_timeout(Some(Duration::from_secs(5)))?;
    stream.set_write_timeout(Some(Duration::from_secs(5)))?;

    stream.write_all(raw)?;
    stream.flush()?;

    let mut response = Vec::new();
    stream.read_to_end(&mut response)?;
    Ok(response)
}

fn send_request(addr: SocketAddr, raw: &str) -> String {
    let bytes = send_raw(addr, raw.as_bytes()).expect("Failed to send request");
    String::from_utf8_lossy(&bytes).into_owned()
}

/// Helper: separa status line, headers y body
fn split_response(response: &[u8]) -> (String, Vec<(String, String)>, Vec<u8>) {
    let end = response
        .windows(4)
        .position(|w| w == b"\r\n\r\n")
        .expect("response without header terminator");
    let head = String::from_utf8_lossy(&response[..end]).into_owned();
    let body = response[end + 4..].to_vec();

    let mut lines = head.split("\r\n");
    let status_line = lines.next().unwrap_or("").to_string();
    let headers = lines
        .filter_map(|line| line.split_once(": "))
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    (status_line, headers, body)
}

fn header<'a>(headers: &'a [(String, String)], name: &str) -> Option<&'a str> {
    headers
        .iter()
        .find(|(k, _)| k.eq_ignore_ascii_case(name))
        .map(|(_, v)| v.as_str())
}

#[test]
fn test_root_endpoint() {
    let addr = start_server(None);
    let response = send_request(addr, "GET / HTTP/1.1\r\nHost: localhost\r\nX-Whatever: 1\r\n\r\n");

    let (status, headers, body) = split_response(response.as_bytes());
    assert_eq!(status, "HTTP/1.1 200 OK");
    assert_eq!(header(&headers, "Content-Type"), Some("text/plain"));
    assert_eq!(header(&headers, "Content-Length"), Some("0"));
    assert!(body.is_empty());
}

#[test]
fn test_echo_endpoint() {
    let addr = start_server(None);
    for text in ["abc", "hello%20world", "a/b/c", "ñ"] {
        let raw = send_raw(addr, format!("GET /echo/{} HTTP/1.1\r\n\r\n", text).as_bytes()).unwrap();
        let (status, headers, body) = split_response(&raw);

        assert_eq!(status, "HTTP/1.1 200 OK");
        assert_eq!(body, text.as_bytes());
        assert_eq!(header(&headers, "Content-Length"), Some(text.len().to_string().as_str()));
    }
}

#[test]
fn test_echo_is_not_compressed() {
    let addr = start_server(None);
    let raw = send_raw(
        addr,
        b"GET /echo/hello HTTP/1.1\r\nAccept-Encoding: gzip, deflate\r\n\r\n",
    )
    .unwrap();
    let (status, headers, body) = split_response(&raw);

    assert_eq!(status, "HTTP/1.1 200 OK");
    assert_eq!(header(&headers, "Content-Encoding"), None);
    assert_eq!(header(&headers, "Content-Length"), Some("5"));
    assert_eq!(body, b"hello");
}

#[test]
fn test_user_agent_endpoint() {
    let addr = start_server(None);
    let response = send_request(
        addr,
        "GET /user-agent HTTP/1.1\r\nHost: localhost\r\nUser-Agent: test-client/1.0\r\n\r\n",
    );

    let (status, _, body) = split_response(response.as_bytes());
    assert_eq!(status, "HTTP/1.1 200 OK");
    assert_eq!(body, b"test-client/1.0");
}

#[test]
fn test_not_found() {
    let addr = start_server(None);
    for path in ["/nonexistent", "/echo", "/index.html", "/user-agents"] {
        let response = send_request(addr, &format!("GET {} HTTP/1.1\r\n\r\n", path));
        let (status, headers, body) = split_response(response.as_bytes());

        assert_eq!(status, "HTTP/1.1 404 Not Found", "path {}", path);
        assert_eq!(header(&headers, "Content-Length"), Some("0"));
        assert!(body.is_empty());
    }
}

#[test]
fn test_file_write_then_read() {
    let dir = tempdir().unwrap();
    let addr = start_server(Some(dir.path()));

    let payload = "line one\r\nline two";
    let response = send_request(
        addr,
        &format!(
            "POST /files/name.txt HTTP/1.1\r\nContent-Length: {}\r\n\r\n{}",
            payload.len(),
            payload
        ),
    );
    let (status, _, body) = split_response(response.as_bytes());
    assert_eq!(status, "HTTP/1.1 201 Created");
    assert!(body.is_empty());

    let response = send_request(addr, "GET /files/name.txt HTTP/1.1\r\n\r\n");
    let (status, headers, body) = split_response(response.as_bytes());
    assert_eq!(status, "HTTP/1.1 200 OK");
    assert_eq!(header(&headers, "Content-Type"), Some("application/octet-stream"));
    assert_eq!(body, payload.as_bytes());
}

#[test]
fn test_file_missing() {
    let dir = tempdir().unwrap();
    let addr = start_server(Some(dir.path()));

    let response = send_request(addr, "GET /files/missing.txt HTTP/1.1\r\n\r\n");
    let (status, _, body) = split_response(response.as_bytes());
    assert_eq!(status, "HTTP/1.1 404 Not Found");
    assert!(body.is_empty());
}

#[test]
fn test_files_without_directory() {
    let addr = start_server(None);
    let response = send_request(addr, "GET /files/anything HTTP/1.1\r\n\r\n");
    assert!(response.starts_with("HTTP/1.1 404 Not Found\r\n"));
}

#[test]
fn test_file_traversal_is_blocked() {
    let outer = tempdir().unwrap();
    let root = outer.path().join("root");
    std::fs::create_dir(&root).unwrap();
    std::fs::write(outer.path().join("secret.txt"), b"secret").unwrap();
    let addr = start_server(Some(&root));

    let response = send_request(addr, "GET /files/../secret.txt HTTP/1.1\r\n\r\n");
    assert!(response.starts_with("HTTP/1.1 404 Not Found\r\n"));
    assert!(!response.contains("secret"));
}

#[test]
fn test_post_without_content_length_is_rejected() {
    let dir = tempdir().unwrap();
    let addr = start_server(Some(dir.path()));

    let response = send_request(addr, "POST /files/x HTTP/1.1\r\nHost: localhost\r\n\r\n");
    assert!(response.starts_with("HTTP/1.1 400 Bad Request\r\n"));
    assert!(!dir.path().join("x").exists());
}

#[test]
fn test_malformed_request_line() {
    let addr = start_server(None);
    let response = send_request(addr, "GARBAGE\r\n");
    assert!(response.starts_with("HTTP/1.1 400 Bad Request\r\n"));
}

#[test]
fn test_concurrent_requests() {
    let addr = start_server(None);

    let handles: Vec<_> = (0..8)
        .map(|i| {
            thread::spawn(move || {
                let response = send_request(addr, &format!("GET /echo/req{} HTTP/1.1\r\n\r\n", i));
                let (_, _, body) = split_response(response.as_bytes());
                assert_eq!(body, format!("req{}", i).as_bytes());
            })
        })
        .collect();

    for handle in handles {
        handle.join().unwrap();
    }
}

#[test]
fn test_server_survives_dropped_connection() {
    let addr = start_server(None);

    // Cliente que conecta y cierra sin mandar nada
    drop(TcpStream::connect(addr).unwrap());

    let response = send_request(addr, "GET / HTTP/1.1\r\n\r\n");
    assert!(response.starts_with("HTTP/1.1 200 OK\r\n"));
}
