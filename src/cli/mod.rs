use clap::{ Args as ClapArgs, Parser, Subcommand };

use crate::history::file::DEFAULT_HISTORY_PATH;
use crate::llm::{ LlmConfig, ProviderType, DEFAULT_TIMEOUT_SECS };
use crate::session::http::DEFAULT_RELAY_URL;
use std::time::Duration;

#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Run the chat relay HTTP endpoint.
    Serve(ServeArgs),
    /// Chat with a running relay from the terminal.
    Chat(ChatArgs),
}

#[derive(ClapArgs, Debug, Clone)]
pub struct ServeArgs {
    /// Host address and port for the server to listen on.
    #[arg(long, env = "SERVER_ADDR", default_value = "127.0.0.1:3000")]
    pub server_addr: String,

    // --- Chat LLM Provider Args ---
    /// Upstream provider strategy (openai, gemini)
    #[arg(long, env = "CHAT_LLM_TYPE", default_value = "gemini")]
    pub chat_llm_type: ProviderType,

    /// API Key for the upstream provider. Falls back to OPENAI_API_KEY / GEMINI_API_KEY.
    #[arg(long, env = "CHAT_API_KEY", default_value = "", hide_env_values = true)]
    pub chat_api_key: String,

    /// Model name (e.g., gpt-3.5-turbo, gemini-2.0-flash)
    #[arg(long, env = "CHAT_MODEL")] // No default, rely on adapter defaults if None
    pub chat_model: Option<String>,

    /// Base URL for the provider API (e.g., https://api.openai.com)
    #[arg(long, env = "CHAT_BASE_URL")]
    pub chat_base_url: Option<String>,

    /// Whole-request timeout in seconds for the upstream call.
    #[arg(long, env = "UPSTREAM_TIMEOUT_SECS", default_value_t = DEFAULT_TIMEOUT_SECS)]
    pub upstream_timeout_secs: u64,
}

impl ServeArgs {
    pub fn llm_config(&self) -> LlmConfig {
        LlmConfig {
            provider: self.chat_llm_type,
            api_key: Some(self.chat_api_key.clone()).filter(|k| !k.trim().is_empty()),
            model: self.chat_model.clone(),
            base_url: self.chat_base_url.clone(),
            timeout: Duration::from_secs(self.upstream_timeout_secs),
        }.with_env_fallback()
    }
}

#[derive(ClapArgs, Debug, Clone)]
pub struct ChatArgs {
    /// Base URL of the relay server.
    #[arg(long, env = "RELAY_URL", default_value = DEFAULT_RELAY_URL)]
    pub relay_url: String,

    /// File holding the conversation between runs.
    #[arg(long, env = "HISTORY_PATH", default_value = DEFAULT_HISTORY_PATH)]
    pub history_path: String,

    /// Keep the conversation in memory only.
    #[arg(long, default_value = "false")]
    pub ephemeral: bool,

    /// Timeout in seconds for each relay call.
    #[arg(long, env = "RELAY_TIMEOUT_SECS", default_value = "60")]
    pub relay_timeout_secs: u64,
}
