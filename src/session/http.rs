use async_trait::async_trait;
use log::debug;
use reqwest::Client as HttpClient;
use std::time::Duration;

use super::{ RelayTransport, TransportError };
use crate::models::chat::{ ChatRequest, ChatResponse };
use crate::server::api::CHAT_ROUTE;

pub const DEFAULT_RELAY_URL: &str = "http://127.0.0.1:3000";

/// Posts chat requests to a running relay server.
pub struct HttpRelayClient {
    http: HttpClient,
    url: String,
}

impl HttpRelayClient {
    pub fn new(relay_url: &str, timeout: Duration) -> Result<Self, TransportError> {
        let http = HttpClient::builder().timeout(timeout).build()?;
        Ok(Self {
            http,
            url: format!("{}{}", relay_url.trim_end_matches('/'), CHAT_ROUTE),
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait]
impl RelayTransport for HttpRelayClient {
    async fn send(&self, request: &ChatRequest) -> Result<ChatResponse, TransportError> {
        debug!("POST {} ({} prior turn(s))", self.url, request.conversation_history.len());
        let resp = self.http.post(&self.url).json(request).send().await?;
        let status = resp.status();
        if !status.is_success() {
            return Err(TransportError::Status(status.as_u16()));
        }
        Ok(resp.json::<ChatResponse>().await?)
    }
}
