//! kalenteri - Voice-Driven Calendar Assistant
//!
//! Main entry point for the service.

use clap::Parser;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

use kalenteri::agent::Orchestrator;
use kalenteri::core::Config;
use kalenteri::llm::OpenAiChatClient;
use kalenteri::server::{AppState, TranscriptionClient};
use kalenteri::store::CalDavStore;
use kalenteri::tools::ToolRegistry;

/// kalenteri - Voice-Driven Calendar Assistant
#[derive(Parser, Debug)]
#[command(name = "kalenteri")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Run a single prompt and exit instead of starting the HTTP service
    #[arg(long, short = 'p')]
    prompt: Option<String>,

    /// Chat model override
    #[arg(long, short = 'm')]
    model: Option<String>,

    /// Bind host override for the HTTP service
    #[arg(long)]
    host: Option<String>,

    /// Bind port override for the HTTP service
    #[arg(long)]
    port: Option<u16>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("kalenteri=info")),
        )
        .init();

    let args = Args::parse();

    // Build configuration
    let mut config = Config::load();

    // Apply CLI overrides
    if let Some(ref model) = args.model {
        config.chat.model = model.clone();
    }

    if let Some(ref host) = args.host {
        config.server.host = host.clone();
    }

    if let Some(port) = args.port {
        config.server.port = port;
    }

    // Missing or malformed endpoints are fatal here, before any session
    config.validate()?;

    let store = Arc::new(CalDavStore::new(
        &config.store.endpoint,
        config.store.timeout_secs,
    ));
    let registry = Arc::new(ToolRegistry::new(store));

    if let Some(prompt) = args.prompt {
        // One-shot mode: connect to the in-process registry directly
        let chat = OpenAiChatClient::new(
            &config.chat.endpoint,
            config.chat.api_key.clone(),
            config.chat.timeout_secs,
        );
        let orchestrator = Orchestrator::new(
            Arc::new(chat),
            Arc::new(Arc::clone(&registry)),
            &config.chat.model,
            config.agent.max_rounds,
        );

        let outcome = orchestrator.run(&prompt).await?;
        println!("{}", outcome.answer);
        eprintln!("({} tool call(s))", outcome.tool_call_count);
        return Ok(());
    }

    let transcriber = config
        .transcription
        .endpoint
        .as_ref()
        .map(|endpoint| TranscriptionClient::new(endpoint, &config.transcription.model));

    let state = Arc::new(AppState {
        orchestrator: Orchestrator::from_config(&config),
        registry,
        transcriber,
    });

    kalenteri::server::serve(state, &config.server.host, config.server.port).await?;

    Ok(())
}
