//! Proposal server
//!
//! Configuration is read from the YAML file named by `PROPOSALS_CONFIG`.
//! Set `PROPOSALS_SEED_DEMO=1` to start with a demo account holding a few
//! quotes and templates.

use anyhow::{Context, Result};
use proposals::prelude::*;
use tracing_subscriber::EnvFilter;

const DEMO_ACCOUNT: Uuid = Uuid::from_u128(0x0000_0000_0000_4000_8000_0000_0000_0001);

async fn seed_demo(store: &InMemoryStore) -> Result<()> {
    let clients = [
        ("Acme Corp", Some("US")),
        ("Globex", Some("DE")),
        ("Initech", None),
    ];

    for (i, (name, country)) in clients.into_iter().enumerate() {
        let public_id = i as u32 + 1;
        let client = Client {
            name: name.to_string(),
            contacts: vec![],
            country: country.map(str::to_string),
        };
        store
            .insert_invoice(Invoice::quote(
                DEMO_ACCOUNT,
                public_id,
                &format!("Q-{:04}", public_id),
                client,
            ))
            .await?;
    }

    store
        .insert_template(ProposalTemplate::new(None, 1, "Clean"))
        .await?;
    store
        .insert_template(ProposalTemplate::new(Some(DEMO_ACCOUNT), 2, "Acme branded"))
        .await?;

    tracing::info!(account_id = %DEMO_ACCOUNT, "demo data seeded");
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = match std::env::var("PROPOSALS_CONFIG") {
        Ok(path) => AppConfig::from_yaml_file(&path)
            .with_context(|| format!("loading configuration from {}", path))?,
        Err(_) => AppConfig::default_config(),
    };

    let store = InMemoryStore::new();
    if std::env::var("PROPOSALS_SEED_DEMO").is_ok_and(|v| v == "1") {
        seed_demo(&store).await?;
    }

    tracing::info!(locale = %config.locale, addr = %config.server.addr(), "starting proposal server");

    ServerBuilder::new()
        .with_config(config)
        .with_store(store)
        .serve()
        .await
}
