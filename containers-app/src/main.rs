use crate::config::AppConfig;
use axum::Router;
use containers_core::{AssetRepository, VideoRepository};
use containers_routes::state::ContainerAppState;
use dotenv::dotenv;
use engine::app::{AppError, AppProperties, AppResult};
use error_stack::ResultExt;
use error_stack::fmt::ColorMode;
use repositories::postgres::ConnectionDetails;
use repositories::postgres::assets::AssetRepo;
use repositories::postgres::initializer::RepoCreator;
use repositories::postgres::videos::VideoRepo;
use tracing::{debug, error, info, instrument, warn};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, fmt};

mod config;

#[tokio::main]
async fn main() {
    match try_main().await {
        Ok(_) => info!("container service shutting down"),
        Err(e) => {
            error!("container service exited with error: {e:?}");
        }
    }
}

fn init_logging() {
    error_stack::Report::set_color_mode(ColorMode::None);

    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(EnvFilter::from_env("CONTAINERS_LOG"))
        .init();
}

async fn try_main() -> AppResult<()> {
    init_logging();

    if let Err(e) = dotenv() {
        warn!("failed to load .env file: {e}");
    }

    let config = AppConfig::from_env().change_context(AppError)?;
    debug!(
        port = config.port,
        pool_size = config.pool_size,
        metrics_enabled = config.metrics_enabled,
        "configuration loaded"
    );

    let routes = build_routes(&config).await?;

    engine::app::run(routes, AppProperties { port: config.port }).await
}

async fn build_routes(config: &AppConfig) -> AppResult<Router> {
    let (videos, assets) = build_repos(config).await?;
    let engine = PostgresEngine::new(videos, assets);

    debug!("building routes..");
    let state = if config.metrics_enabled {
        ContainerAppState::new_with_metrics(engine).change_context(AppError)?
    } else {
        ContainerAppState::new_without_metrics(engine)
    };

    Ok(containers_routes::routes::build(state)).inspect(|_| debug!("routes built"))
}

#[instrument(skip_all)]
async fn build_repos(config: &AppConfig) -> AppResult<(VideoRepo, AssetRepo)> {
    debug!("initializing repositories");
    RepoCreator::default()
        .with_videos()
        .with_assets()
        .create(
            ConnectionDetails::Url(config.database_url.clone()),
            config.pool_size,
        )
        .await
        .change_context(AppError)
}

#[derive(Debug, Clone)]
struct PostgresEngine<V, A> {
    videos: V,
    assets: A,
}

impl<V, A> PostgresEngine<V, A> {
    fn new(videos: V, assets: A) -> Self {
        Self { videos, assets }
    }
}

impl<V, A> containers_core::ContainerEngine for PostgresEngine<V, A>
where
    V: VideoRepository + Clone + Send + Sync + 'static,
    A: AssetRepository + Clone + Send + Sync + 'static,
{
    type Videos = V;
    type Assets = A;

    fn videos(&self) -> Self::Videos {
        self.videos.clone()
    }

    fn assets(&self) -> Self::Assets {
        self.assets.clone()
    }
}
