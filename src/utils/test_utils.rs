//! In-process HTTP stub used by the network tests.
//!
//! Each accepted connection is answered by the next scripted [`StubResponse`]
//! and closed. Streamed bodies are written chunk by chunk with a short pause
//! in between so the client observes separate reads.

use std::sync::Arc;
use std::time::Duration;

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::Mutex;
use tokio::task::JoinHandle;

pub struct StubResponse {
    status: u16,
    content_type: &'static str,
    chunks: Vec<Vec<u8>>,
    declared_length: Option<usize>,
    stall: Option<Duration>,
}

impl StubResponse {
    pub fn json(status: u16, body: &str) -> Self {
        Self {
            status,
            content_type: "application/json",
            declared_length: Some(body.len()),
            chunks: vec![body.as_bytes().to_vec()],
            stall: None,
        }
    }

    /// A close-delimited body written as the given chunks.
    pub fn streamed<I, C>(chunks: I) -> Self
    where
        I: IntoIterator<Item = C>,
        C: AsRef<[u8]>,
    {
        Self {
            status: 200,
            content_type: "text/plain",
            chunks: chunks.into_iter().map(|c| c.as_ref().to_vec()).collect(),
            declared_length: None,
            stall: None,
        }
    }

    /// Announces a longer body than it sends, so the client sees a read error
    /// after the last chunk.
    pub fn truncated<I, C>(chunks: I) -> Self
    where
        I: IntoIterator<Item = C>,
        C: AsRef<[u8]>,
    {
        let mut response = Self::streamed(chunks);
        let sent: usize = response.chunks.iter().map(Vec::len).sum();
        response.declared_length = Some(sent + 1024);
        response
    }

    /// Holds the connection open without answering.
    pub fn stalled(duration: Duration) -> Self {
        Self {
            status: 200,
            content_type: "application/json",
            chunks: Vec::new(),
            declared_length: None,
            stall: Some(duration),
        }
    }
}

#[derive(Debug, Clone)]
pub struct CapturedRequest {
    pub request_line: String,
    pub body: Vec<u8>,
}

impl CapturedRequest {
    pub fn json_body(&self) -> serde_json::Value {
        serde_json::from_slice(&self.body).expect("request body should be JSON")
    }
}

pub struct StubServer {
    pub base_url: String,
    captured: Arc<Mutex<Vec<CapturedRequest>>>,
    handle: JoinHandle<()>,
}

impl StubServer {
    pub async fn requests(&self) -> Vec<CapturedRequest> {
        self.captured.lock().await.clone()
    }
}

impl Drop for StubServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

pub async fn spawn_stub_server(responses: Vec<StubResponse>) -> StubServer {
    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("listener should bind");
    let addr = listener.local_addr().expect("local addr should resolve");
    let captured = Arc::new(Mutex::new(Vec::new()));
    let captured_for_server = Arc::clone(&captured);

    let handle = tokio::spawn(async move {
        for response in responses {
            let Ok((mut stream, _)) = listener.accept().await else {
                return;
            };
            let Ok(request) = read_http_request(&mut stream).await else {
                continue;
            };
            captured_for_server.lock().await.push(request);
            let _ = write_response(&mut stream, response).await;
        }
    });

    StubServer {
        base_url: format!("http://{addr}"),
        captured,
        handle,
    }
}

/// An address nothing is listening on.
pub async fn unreachable_base_url() -> String {
    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("listener should bind");
    let addr = listener.local_addr().expect("local addr should resolve");
    drop(listener);
    format!("http://{addr}")
}

async fn read_http_request(stream: &mut TcpStream) -> Result<CapturedRequest, String> {
    let mut buffer = Vec::new();
    let mut chunk = [0u8; 1024];
    let header_end = loop {
        if let Some(pos) = buffer.windows(4).position(|w| w == b"\r\n\r\n") {
            break pos;
        }
        let read = stream
            .read(&mut chunk)
            .await
            .map_err(|err| err.to_string())?;
        if read == 0 {
            return Err("connection closed before headers".to_string());
        }
        buffer.extend_from_slice(&chunk[..read]);
    };

    let head = String::from_utf8_lossy(&buffer[..header_end]).to_string();
    let mut lines = head.split("\r\n");
    let request_line = lines.next().unwrap_or_default().to_string();
    let content_length = lines
        .filter_map(|line| line.split_once(':'))
        .find(|(name, _)| name.trim().eq_ignore_ascii_case("content-length"))
        .and_then(|(_, value)| value.trim().parse::<usize>().ok())
        .unwrap_or(0);

    let mut body = buffer[header_end + 4..].to_vec();
    while body.len() < content_length {
        let read = stream
            .read(&mut chunk)
            .await
            .map_err(|err| err.to_string())?;
        if read == 0 {
            return Err("connection closed before body".to_string());
        }
        body.extend_from_slice(&chunk[..read]);
    }
    body.truncate(content_length);

    Ok(CapturedRequest { request_line, body })
}

async fn write_response(stream: &mut TcpStream, response: StubResponse) -> std::io::Result<()> {
    if let Some(stall) = response.stall {
        tokio::time::sleep(stall).await;
        return stream.shutdown().await;
    }

    let mut head = format!(
        "HTTP/1.1 {} {}\r\nContent-Type: {}\r\nConnection: close\r\n",
        response.status,
        reason_phrase(response.status),
        response.content_type
    );
    if let Some(length) = response.declared_length {
        head.push_str(&format!("Content-Length: {length}\r\n"));
    }
    head.push_str("\r\n");
    stream.write_all(head.as_bytes()).await?;
    stream.flush().await?;

    for chunk in response.chunks {
        stream.write_all(&chunk).await?;
        stream.flush().await?;
        tokio::time::sleep(Duration::from_millis(15)).await;
    }
    stream.shutdown().await
}

fn reason_phrase(status: u16) -> &'static str {
    match status {
        200 => "OK",
        404 => "Not Found",
        500 => "Internal Server Error",
        503 => "Service Unavailable",
        _ => "Status",
    }
}
