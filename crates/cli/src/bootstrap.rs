//! Shared startup for the request-processing commands: logging, config
//! injection, and collaborator construction.

use std::sync::Arc;

use anyhow::Result;
use crmpilot_agent::{Dispatcher, LlmClient, OpenAiClient};
use crmpilot_core::config::AppConfig;
use crmpilot_crm::HubSpotClient;
use crmpilot_notify::SmtpMailer;

pub struct App {
    pub dispatcher: Dispatcher<HubSpotClient, SmtpMailer>,
}

pub fn init_logging(config: &AppConfig) {
    use crmpilot_core::config::LogFormat::*;
    use tracing::Level;

    let log_level = config.logging.level.parse::<Level>().unwrap_or(Level::INFO);

    let result = match config.logging.format {
        Compact => tracing_subscriber::fmt()
            .with_target(false)
            .with_max_level(log_level)
            .compact()
            .try_init(),
        Pretty => tracing_subscriber::fmt()
            .with_target(false)
            .with_max_level(log_level)
            .pretty()
            .try_init(),
        Json => {
            tracing_subscriber::fmt().with_target(false).with_max_level(log_level).json().try_init()
        }
    };
    // A second init in the same process keeps the first subscriber.
    let _ = result;
}

/// Builds the dispatcher from an already-validated config. The config is
/// loaded once by the caller and injected here; nothing re-reads it later.
pub fn build_app(config: &AppConfig) -> Result<App> {
    let crm = HubSpotClient::new(config.crm.base_url.clone(), config.crm.api_key.clone());
    let mailer = SmtpMailer::new(
        config.notify.smtp_host.clone(),
        config.notify.smtp_port,
        config.notify.sender.clone(),
        config.notify.password.clone(),
    );
    let llm = OpenAiClient::from_config(&config.llm)?
        .map(|client| Arc::new(client) as Arc<dyn LlmClient>);

    tracing::info!(
        crm_base_url = %config.crm.base_url,
        smtp_host = %config.notify.smtp_host,
        llm_attached = llm.is_some(),
        "crmpilot dispatcher ready"
    );

    Ok(App { dispatcher: Dispatcher::new(crm, mailer, llm) })
}
