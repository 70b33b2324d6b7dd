//! Scripted JSON-RPC node on a loopback socket.
//!
//! Exercises the real HTTP transport without a chain: each request gets the
//! next reply from a script, and every request body is recorded.

use serde_json::Value;
use std::collections::VecDeque;
use std::io;
use std::sync::{Arc, Mutex};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::task::JoinHandle;

pub struct StubNode {
    url: String,
    requests: Arc<Mutex<Vec<Value>>>,
    server: JoinHandle<()>,
}

impl StubNode {
    /// Serve `replies` in order, one per request. The last reply repeats
    /// once the script runs out.
    pub async fn start(replies: Vec<Value>) -> io::Result<Self> {
        let listener = TcpListener::bind("127.0.0.1:0").await?;
        let url = format!("http://{}", listener.local_addr()?);
        let requests = Arc::new(Mutex::new(Vec::new()));
        let log = requests.clone();
        let mut script: VecDeque<Value> = replies.into();

        let server = tokio::spawn(async move {
            while let Ok((mut stream, _)) = listener.accept().await {
                let reply = if script.len() > 1 {
                    script.pop_front()
                } else {
                    script.front().cloned()
                }
                .unwrap_or(Value::Null);

                let request = match read_request(&mut stream).await {
                    Ok(request) => request,
                    Err(_) => continue,
                };
                log.lock().unwrap().push(request);
                let _ = write_reply(&mut stream, &reply).await;
            }
        });

        Ok(Self {
            url,
            requests,
            server,
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// Request bodies received so far, oldest first.
    pub fn requests(&self) -> Vec<Value> {
        self.requests.lock().unwrap().clone()
    }

    pub fn request_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }
}

impl Drop for StubNode {
    fn drop(&mut self) {
        self.server.abort();
    }
}

async fn read_request(stream: &mut TcpStream) -> io::Result<Value> {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 1024];
    let body_start = loop {
        if let Some(pos) = buf.windows(4).position(|w| w == b"\r\n\r\n") {
            break pos + 4;
        }
        let n = stream.read(&mut chunk).await?;
        if n == 0 {
            return Err(io::ErrorKind::UnexpectedEof.into());
        }
        buf.extend_from_slice(&chunk[..n]);
    };

    let headers = String::from_utf8_lossy(&buf[..body_start]).to_ascii_lowercase();
    let length = headers
        .lines()
        .find_map(|line| line.strip_prefix("content-length:"))
        .and_then(|v| v.trim().parse::<usize>().ok())
        .unwrap_or(0);

    while buf.len() < body_start + length {
        let n = stream.read(&mut chunk).await?;
        if n == 0 {
            return Err(io::ErrorKind::UnexpectedEof.into());
        }
        buf.extend_from_slice(&chunk[..n]);
    }

    serde_json::from_slice(&buf[body_start..body_start + length])
        .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))
}

async fn write_reply(stream: &mut TcpStream, reply: &Value) -> io::Result<()> {
    let body = reply.to_string();
    let response = format!(
        "HTTP/1.1 200 OK\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
        body.len(),
        body
    );
    stream.write_all(response.as_bytes()).await?;
    stream.shutdown().await
}
