use culture_news::api::newsapi::NewsApiClient;
use culture_news::db::NewsStorage;
use culture_news::router::{NewsState, news_router};
use culture_news::service::news_service::NewsService;
use mimalloc::MiMalloc;
use tokio::net::TcpListener;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    let cfg = &culture_news::config::CONFIG;

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(cfg.basic.loglevel.clone()));
    tracing_subscriber::registry()
        .with(env_filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_level(true)
                .with_target(false),
        )
        .init();

    info!(
        database_url = %cfg.basic.database_url,
        newsapi = %cfg.newsapi.base_url,
        proxy = %cfg.newsapi.proxy.as_ref().map(|u| u.as_str()).unwrap_or("<none>"),
        loglevel = %cfg.basic.loglevel,
    );
    if cfg.newsapi.api_key.is_empty() {
        warn!("NEWS_NEWSAPI__API_KEY is not set; every NewsAPI fetch will come back empty");
    }

    let storage = NewsStorage::connect(&cfg.basic.database_url).await?;
    storage.init_schema().await?;

    let api = NewsApiClient::new(&cfg.newsapi)?;
    let news = NewsService::new(api, storage.clone(), &cfg.newsapi);

    let state = NewsState::new(storage, news, &cfg.basic);
    let app = news_router(state);

    let addr = cfg.basic.listen_addr.as_str();
    let listener = TcpListener::bind(addr).await?;
    info!("HTTP server listening on {}", addr);
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "failed to listen for ctrl-c");
        std::future::pending::<()>().await;
    }
    info!("shutdown signal received");
}
