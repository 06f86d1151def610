use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use parking_lot::Mutex;

use fauna_client::transport::{Request, Response, Transport};
use fauna_client::{Builder, Client, Config, Error};

/// Answers every request with the same canned response.
#[derive(Debug)]
pub struct MockTransport {
    status: u16,
    body: Bytes,
    delay: Duration,
    pub requests: Mutex<Vec<Request>>,
}

impl MockTransport {
    pub fn new(status: u16, body: &'static str) -> Arc<MockTransport> {
        MockTransport::delayed(status, body, Duration::ZERO)
    }

    pub fn delayed(status: u16, body: &'static str, delay: Duration)
        -> Arc<MockTransport>
    {
        Arc::new(MockTransport {
            status,
            body: Bytes::from_static(body.as_bytes()),
            delay,
            requests: Mutex::new(Vec::new()),
        })
    }
}

#[async_trait]
impl Transport for MockTransport {
    async fn send(&self, request: Request) -> Result<Response, Error> {
        self.requests.lock().push(request);
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        Ok(Response { status: self.status, body: self.body.clone() })
    }
}

pub fn config() -> Config {
    Builder::new()
        .secret("test-secret")
        .endpoint("http://localhost:8443/")
        .and_then(|b| b.build())
        .expect("valid config")
}

pub fn client(transport: &Arc<MockTransport>) -> Client {
    Client::with_transport(&config(), transport.clone())
        .expect("client is created")
}
