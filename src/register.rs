//! Integration wiring from configuration.

use std::sync::Arc;
use std::time::Duration;

use anyhow::{bail, Context};
use tracing::{info, warn};

use taskflow_config::Config;
use taskflow_protocols::Integrations;
use taskflow_tasks_http::ReqwestHttpClient;
use taskflow_tasks_kv::InMemoryKvStore;

/// Build the integrations the configuration enables.
pub(crate) fn build_integrations(config: &Config) -> anyhow::Result<Integrations> {
    let mut integrations = Integrations::new();
    let settings = &config.integrations;

    if settings.http.enabled {
        let client = ReqwestHttpClient::new(
            &settings.http.user_agent,
            Duration::from_secs(settings.http.timeout_seconds),
        )
        .context("Failed to build HTTP client")?;
        integrations = integrations.with_http(Arc::new(client));
        info!(user_agent = %settings.http.user_agent, "HTTP integration enabled");
    }

    if settings.kv.enabled {
        match settings.kv.backend.as_str() {
            "memory" => {
                integrations = integrations.with_kv(Arc::new(InMemoryKvStore::new()));
                info!("Key-value integration enabled (in-memory)");
            }
            other => bail!("Unsupported key-value backend '{}'", other),
        }
    }

    if settings.crm.enabled {
        warn!(
            provider = %settings.crm.provider,
            "CRM integration enabled but no client is bundled with the CLI; CRM tasks stay unavailable"
        );
    }

    Ok(integrations)
}
