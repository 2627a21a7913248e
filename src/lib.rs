pub mod models;
pub mod server;
pub mod llm;
pub mod cli;
pub mod history;
pub mod relay;
pub mod session;
pub mod repl;

use cli::{ Args, ChatArgs, Command, ServeArgs };
use history::{ ConversationStore, FileConversationStore, MemoryConversationStore };
use log::info;
use relay::Relay;
use server::Server;
use session::{ ChatSession, HttpRelayClient };
use std::error::Error;
use std::sync::Arc;
use std::time::Duration;

pub async fn run(args: Args) -> Result<(), Box<dyn Error + Send + Sync>> {
    match args.command {
        Command::Serve(serve_args) => serve(serve_args).await,
        Command::Chat(chat_args) => chat(chat_args).await,
    }
}

async fn serve(args: ServeArgs) -> Result<(), Box<dyn Error + Send + Sync>> {
    let config = args.llm_config();

    info!("--- Core Configuration ---");
    info!("Server Address: {}", args.server_addr);
    info!("Chat LLM Type: {}", config.provider);
    info!("Chat Model: {}", config.model.as_deref().unwrap_or("adapter default"));
    info!("Chat Base URL: {}", config.base_url.as_deref().unwrap_or("adapter default"));
    info!("API Key Configured: {}", config.api_key.is_some());
    info!("Upstream Timeout: {}s", config.timeout.as_secs());
    info!("-------------------------");

    let relay = Arc::new(Relay::from_config(&config)?);
    let server = Server::new(args.server_addr.clone(), relay);
    server.run().await
}

async fn chat(args: ChatArgs) -> Result<(), Box<dyn Error + Send + Sync>> {
    let store: Arc<dyn ConversationStore> = if args.ephemeral {
        info!("Conversation will not be persisted");
        Arc::new(MemoryConversationStore::new())
    } else {
        info!("Conversation will be stored in: {}", args.history_path);
        Arc::new(FileConversationStore::new(&args.history_path))
    };
    let transport = HttpRelayClient::new(
        &args.relay_url,
        Duration::from_secs(args.relay_timeout_secs)
    )?;
    info!("Relay endpoint: {}", transport.url());

    let session = Arc::new(ChatSession::restore(store, Arc::new(transport)));
    repl::run(session).await
}
