//! Local HTTP fixtures for client tests.

use tokio::{
    io::{AsyncReadExt, AsyncWriteExt},
    net::TcpListener,
    task::JoinHandle,
};

pub(crate) struct CannedResponse {
    status: u16,
    body: String,
}

impl CannedResponse {
    pub(crate) fn json(status: u16, body: &str) -> Self {
        Self {
            status,
            body: body.to_string(),
        }
    }
}

pub(crate) struct OneShotServer {
    pub(crate) url: String,
    handle: JoinHandle<String>,
}

impl OneShotServer {
    /// First line of the request the server received.
    pub(crate) async fn request_line(self) -> String {
        self.handle.await.expect("server task panicked")
    }
}

/// Serve exactly one request with `response`, then shut down.
pub(crate) async fn serve_once(response: CannedResponse) -> OneShotServer {
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind test listener");
    let addr = listener.local_addr().expect("listener address");

    let handle = tokio::spawn(async move {
        let (mut socket, _) = listener.accept().await.expect("accept");

        let mut raw = Vec::new();
        let mut chunk = [0u8; 1024];
        while !raw.windows(4).any(|w| w == b"\r\n\r\n") {
            let n = socket.read(&mut chunk).await.expect("read request");
            if n == 0 {
                break;
            }
            raw.extend_from_slice(&chunk[..n]);
        }

        let reply = format!(
            "HTTP/1.1 {} Canned\r\n\
             content-type: application/json\r\n\
             content-length: {}\r\n\
             connection: close\r\n\r\n{}",
            response.status,
            response.body.len(),
            response.body,
        );
        socket.write_all(reply.as_bytes()).await.expect("write response");
        socket.shutdown().await.ok();

        String::from_utf8_lossy(&raw)
            .lines()
            .next()
            .unwrap_or_default()
            .to_string()
    });

    OneShotServer {
        url: format!("http://{addr}/data/2.5/weather"),
        handle,
    }
}

/// URL of a local port with nothing listening on it.
pub(crate) async fn closed_port_url() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind test listener");
    let addr = listener.local_addr().expect("listener address");
    drop(listener);
    format!("http://{addr}/data/2.5/weather")
}
