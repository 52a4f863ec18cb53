use std::env;
use std::sync::Arc;

use anyhow::{Context as _, Result};
use env_logger::Env;
use log::info;
use tokio::net::TcpListener;

use infodarts::{cache, cli, server, AdsConfig, Clock, Config, Context};

fn setup_logging() {
    env_logger::Builder::from_env(
        Env::new().filter_or("LOG", "infodarts=info,infodarts_core=info"),
    )
    .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = cli::parse(env::args().skip(1).collect());

    setup_logging();

    let context = Context::new(Config {
        content_dir: args.content_dir,
        feed: args.feed,
        ranking: args.ranking,
        cache: cache::Config {
            enabled: args.enable_cache,
            ttl: args.cache_ttl,
        },
        ads: AdsConfig {
            client: args.ad_client,
            slots: args.ad_slots,
        },
        clock: Clock::Local,
    });

    info!("Feed: {}, ranking: {}", context.feed, context.ranking);

    let router = server::router(Arc::new(context));

    let listener = TcpListener::bind(args.address)
        .await
        .with_context(|| format!("failed to bind {}", args.address))?;
    info!("Listening at http://{}", args.address);

    axum::serve(listener, router)
        .with_graceful_shutdown(server::shutdown_signal())
        .await?;

    Ok(())
}
