use anyhow::Result;
use tracing::info;
use tracing_subscriber::EnvFilter;

use stormfeed_common::Config;
use stormfeed_poller::Poller;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    let filter = EnvFilter::from_default_env()
        .add_directive("stormfeed=info".parse()?)
        .add_directive("stormfeed_poller=info".parse()?)
        .add_directive("nws_client=info".parse()?)
        .add_directive("spc_client=info".parse()?);

    // Structured output for log shippers
    if std::env::var("LOG_FORMAT").is_ok_and(|v| v.eq_ignore_ascii_case("json")) {
        tracing_subscriber::fmt().with_env_filter(filter).json().init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }

    info!("stormfeed starting...");

    let config = Config::from_env()?;
    config.log_summary();

    let poller = Poller::from_config(&config)?;
    poller.spawn().await?;

    Ok(())
}
