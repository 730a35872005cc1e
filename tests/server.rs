//! End-to-end tests driving a real listener over raw TCP.

use std::net::SocketAddr;

use bytes::BytesMut;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;

use greeter::app::app;
use greeter::server::{Server, ServerError};

/// Boots the application on an ephemeral port and returns its address.
async fn start_server() -> SocketAddr {
    let server = Server::bind("127.0.0.1:0").await.expect("bind");
    let addr = server.local_addr();
    tokio::spawn(server.serve(app()));
    addr
}

/// Sends one request with `Connection: close` and returns the raw response.
async fn roundtrip(addr: SocketAddr, request: &str) -> String {
    let mut stream = TcpStream::connect(addr).await.expect("connect");
    stream.write_all(request.as_bytes()).await.expect("write");
    let mut response = Vec::new();
    stream.read_to_end(&mut response).await.expect("read");
    String::from_utf8(response).expect("utf-8 response")
}

#[tokio::test]
async fn get_root_returns_200() {
    let addr = start_server().await;
    let response = roundtrip(
        addr,
        "GET / HTTP/1.1\r\nHost: localhost\r\nConnection: close\r\n\r\n",
    )
    .await;
    assert!(response.starts_with("HTTP/1.1 200 OK\r\n"), "{response}");
}

#[tokio::test]
async fn get_root_body_is_exactly_the_greeting() {
    let addr = start_server().await;
    let response = roundtrip(
        addr,
        "GET / HTTP/1.1\r\nHost: localhost\r\nConnection: close\r\n\r\n",
    )
    .await;
    let body = response
        .split_once("\r\n\r\n")
        .map(|(_, body)| body)
        .expect("header/body separator");
    assert_eq!(body, "Hello World!");
    assert!(response.contains("Content-Length: 12\r\n"));
    assert!(response.contains("Content-Type: text/plain; charset=utf-8\r\n"));
}

#[tokio::test]
async fn unknown_path_returns_404() {
    let addr = start_server().await;
    let response = roundtrip(
        addr,
        "GET /missing HTTP/1.1\r\nHost: localhost\r\nConnection: close\r\n\r\n",
    )
    .await;
    assert!(response.starts_with("HTTP/1.1 404 Not Found\r\n"), "{response}");
}

#[tokio::test]
async fn unregistered_method_returns_404() {
    let addr = start_server().await;
    let response = roundtrip(
        addr,
        "POST / HTTP/1.1\r\nHost: localhost\r\nContent-Length: 0\r\nConnection: close\r\n\r\n",
    )
    .await;
    assert!(response.starts_with("HTTP/1.1 404 Not Found\r\n"), "{response}");
}

#[tokio::test]
async fn malformed_request_returns_400() {
    let addr = start_server().await;
    let response = roundtrip(addr, "GET / HTP/1.1\r\n\r\n").await;
    assert!(response.starts_with("HTTP/1.1 400 Bad Request\r\n"), "{response}");
    assert!(response.contains("Connection: close\r\n"));
}

#[tokio::test]
async fn keep_alive_serves_two_requests_on_one_connection() {
    let addr = start_server().await;
    let mut stream = TcpStream::connect(addr).await.expect("connect");

    for _ in 0..2 {
        stream
            .write_all(b"GET / HTTP/1.1\r\nHost: localhost\r\n\r\n")
            .await
            .expect("write");

        // The greeting is the last bytes of the response, so reading until
        // the buffer ends with it consumes exactly one response.
        let mut buf = BytesMut::new();
        while !buf.ends_with(b"Hello World!") {
            let n = stream.read_buf(&mut buf).await.expect("read");
            assert!(n > 0, "server closed a keep-alive connection");
        }
        let response = String::from_utf8(buf.to_vec()).expect("utf-8 response");
        assert!(response.starts_with("HTTP/1.1 200 OK\r\n"), "{response}");
        assert!(response.contains("Connection: keep-alive\r\n"));
    }
}

#[tokio::test]
async fn binding_a_taken_port_fails() {
    let first = Server::bind("127.0.0.1:0").await.expect("bind");
    let addr = first.local_addr();

    let second = Server::bind(addr.to_string()).await;
    assert!(matches!(second, Err(ServerError::Bind { .. })));
}
