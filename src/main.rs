/// ensgate - Offchain ENS resolver core for business subdomains
///
/// Resolves address, text and content-hash records for names of the form
/// `subdomain.business.eth` by combining an external business registry
/// with each business's on-chain user-records contract. Sits behind a
/// CCIP-Read gateway which handles the wire protocol and signing.

mod api;
mod config;
mod context;
mod contract;
mod error;
mod name;
mod registry;
mod resolver;
mod server;

use config::GatewayConfig;
use context::AppContext;
use error::GatewayResult;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> GatewayResult<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "ensgate=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config = GatewayConfig::from_env()?;

    // Create application context
    let ctx = AppContext::new(config)?;

    // Start server
    server::serve(ctx).await?;

    Ok(())
}
