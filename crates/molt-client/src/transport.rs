// crates/molt-client/src/transport.rs
//
// Streaming byte transport between the source gateway and the
// destination-provided upload URLs. Bodies are piped chunk by chunk,
// never buffered whole, so shard size is bounded only by the wire.

use std::collections::BTreeMap;

use async_trait::async_trait;
use futures::TryStreamExt;

use molt_core::{ByteStream, ByteTransport, MoltError};

/// reqwest-backed transport. Follows redirects on both legs, as the
/// destination's presigned URLs may bounce through one.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: reqwest::Client,
}

impl HttpTransport {
    pub fn new() -> Self {
        let client = reqwest::Client::builder()
            .redirect(reqwest::redirect::Policy::limited(10))
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());
        Self { client }
    }
}

impl Default for HttpTransport {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ByteTransport for HttpTransport {
    async fn fetch(&self, url: &str) -> Result<ByteStream, MoltError> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| MoltError::Network(format!("fetch from {} failed: {}", url, e)))?;

        let status = response.status().as_u16();
        let content_length = response.content_length();
        let body = response
            .bytes_stream()
            .map_err(|e| MoltError::Network(format!("fetch body read failed: {}", e)));

        Ok(ByteStream {
            status,
            content_length,
            body: Box::pin(body),
        })
    }

    async fn transfer(
        &self,
        url: &str,
        headers: &BTreeMap<String, String>,
        body: ByteStream,
    ) -> Result<u16, MoltError> {
        let mut request = self
            .client
            .put(url)
            .body(reqwest::Body::wrap_stream(body.body));
        for (name, value) in headers {
            request = request.header(name, value);
        }

        let response = request
            .send()
            .await
            .map_err(|e| MoltError::Network(format!("transfer to {} failed: {}", url, e)))?;

        Ok(response.status().as_u16())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bytes::Bytes;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    /// Helper to start a mock HTTP server with a fixed status and body.
    async fn mock_server(status: u16, body: &str) -> (String, tokio::task::JoinHandle<()>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let base_url = format!("http://{}", addr);
        let response = format!(
            "HTTP/1.1 {} X\r\nContent-Type: application/octet-stream\r\nContent-Length: {}\r\n\r\n{}",
            status,
            body.len(),
            body
        );

        let handle = tokio::spawn(async move {
            if let Ok((mut stream, _)) = listener.accept().await {
                let mut buf = vec![0u8; 8192];
                let _ = stream.read(&mut buf).await;
                let _ = stream.write_all(response.as_bytes()).await;
            }
        });

        (base_url, handle)
    }

    fn memory_stream(chunks: Vec<&'static [u8]>) -> ByteStream {
        let items: Vec<Result<Bytes, MoltError>> =
            chunks.into_iter().map(|c| Ok(Bytes::from_static(c))).collect();
        ByteStream {
            status: 200,
            content_length: None,
            body: Box::pin(futures::stream::iter(items)),
        }
    }

    #[tokio::test]
    async fn fetch_returns_status_and_streamed_body() {
        let (base_url, _handle) = mock_server(200, "car bytes").await;
        let transport = HttpTransport::new();

        let stream = transport.fetch(&base_url).await.unwrap();
        assert_eq!(stream.status, 200);
        assert_eq!(stream.content_length, Some(9));

        let chunks: Vec<Bytes> = stream.body.try_collect().await.unwrap();
        let collected: Vec<u8> = chunks.into_iter().flatten().collect();
        assert_eq!(collected, b"car bytes");
    }

    #[tokio::test]
    async fn fetch_surfaces_non_200_status_without_failing() {
        let (base_url, _handle) = mock_server(404, "not found").await;
        let transport = HttpTransport::new();

        // A 404 is not a transport error; the engine decides what to do
        // with the status.
        let stream = transport.fetch(&base_url).await.unwrap();
        assert_eq!(stream.status, 404);
    }

    #[tokio::test]
    async fn fetch_connection_error_is_a_network_error() {
        let transport = HttpTransport::new();
        let result = transport.fetch("http://127.0.0.1:1/shard").await; // Nothing listening
        assert!(matches!(result, Err(MoltError::Network(_))));
    }

    #[tokio::test]
    async fn transfer_reports_response_status() {
        let (base_url, _handle) = mock_server(201, "").await;
        let transport = HttpTransport::new();

        let headers = BTreeMap::from([("content-length".to_string(), "3".to_string())]);
        let status = transport
            .transfer(&base_url, &headers, memory_stream(vec![b"car"]))
            .await
            .unwrap();
        assert_eq!(status, 201);
    }

    #[tokio::test]
    async fn transfer_connection_error_is_a_network_error() {
        let transport = HttpTransport::new();
        let result = transport
            .transfer(
                "http://127.0.0.1:1/upload",
                &BTreeMap::new(),
                memory_stream(vec![b"car"]),
            )
            .await;
        assert!(matches!(result, Err(MoltError::Network(_))));
    }
}
