use anyhow::{Context, Result};
use enquiry_handler::mailer::SmtpMailer;
use enquiry_handler::server;
use enquiry_handler::store::NotionClient;
use enquiry_handler::{Config, EnquiryHandler, RequestEvent};
use std::sync::Arc;
use tokio::io::AsyncReadExt;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let config = Config::from_env().context("Failed to load configuration")?;
    info!("Loaded configuration: {:?}", config);

    let store = NotionClient::with_base_url(config.notion_token.clone(), config.notion_api_url.clone())?;
    let mailer = SmtpMailer::new(config.smtp.clone()).context("Invalid EMAIL_USER sender address")?;
    let handler = Arc::new(EnquiryHandler::new(
        Arc::new(store),
        Arc::new(mailer),
        config.databases.clone(),
    ));

    match std::env::args().nth(1).as_deref() {
        Some("invoke") => invoke(handler).await,
        Some(other) => anyhow::bail!("Unknown command: {other} (expected no argument or 'invoke')"),
        None => {
            let listener = tokio::net::TcpListener::bind(config.bind_addr)
                .await
                .with_context(|| format!("Failed to bind {}", config.bind_addr))?;
            server::serve(listener, handler).await
        }
    }
}

/// Read one event from stdin and print the response
async fn invoke(handler: Arc<EnquiryHandler>) -> Result<()> {
    let mut input = String::new();
    tokio::io::stdin()
        .read_to_string(&mut input)
        .await
        .context("Failed to read event from stdin")?;

    let event: RequestEvent = serde_json::from_str(&input).context("Event is not valid JSON")?;
    let response = server::dispatch(handler, event).await;

    println!("{}", serde_json::to_string(&response)?);
    Ok(())
}
