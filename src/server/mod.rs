pub mod api;

use crate::relay::Relay;
use log::info;
use std::error::Error;
use std::sync::Arc;
use tokio::net::TcpListener;

pub struct Server {
    addr: String,
    relay: Arc<Relay>,
}

impl Server {
    pub fn new(addr: String, relay: Arc<Relay>) -> Self {
        Self { addr, relay }
    }

    pub async fn run(&self) -> Result<(), Box<dyn Error + Send + Sync>> {
        let listener = TcpListener::bind(&self.addr).await.map_err(|e|
            format!("Failed to bind HTTP server to {}: {}. Try a different address.", self.addr, e)
        )?;
        info!("Chat relay listening on: http://{}{}", listener.local_addr()?, api::CHAT_ROUTE);

        let app = api::router(self.relay.clone());
        axum::serve(listener, app.into_make_service()).await?;
        Ok(())
    }
}
