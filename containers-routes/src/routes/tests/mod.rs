//! Contract tests for the http layer: status codes, json shape and how gateway
//! failures surface. The gateway itself is mocked.
use crate::routes;
use crate::state::ContainerAppState;
use axum::http::StatusCode;
use axum_test::TestServer;
use containers_core::model::{Asset, AssetKind, ContainerId, Video, VideoId, VideoType};
use containers_core::{ContainerEngine, MockAssetRepository, MockVideoRepository};
use std::sync::Arc;

mod assets;
mod containers;

#[derive(Clone)]
struct TestEngine {
    videos: Arc<MockVideoRepository>,
    assets: Arc<MockAssetRepository>,
}

impl ContainerEngine for TestEngine {
    type Videos = Arc<MockVideoRepository>;
    type Assets = Arc<MockAssetRepository>;

    fn videos(&self) -> Self::Videos {
        Arc::clone(&self.videos)
    }

    fn assets(&self) -> Self::Assets {
        Arc::clone(&self.assets)
    }
}

fn init_test_server(videos: MockVideoRepository, assets: MockAssetRepository) -> TestServer {
    let engine = TestEngine {
        videos: Arc::new(videos),
        assets: Arc::new(assets),
    };

    // the prometheus recorder is global, so tests never install it
    let routes = routes::build(ContainerAppState::new_without_metrics(engine));

    TestServer::new(routes).expect("test server created")
}

fn video_server(videos: MockVideoRepository) -> TestServer {
    init_test_server(videos, MockAssetRepository::new())
}

fn asset_server(assets: MockAssetRepository) -> TestServer {
    init_test_server(MockVideoRepository::new(), assets)
}

fn asset(id: u64, kind: AssetKind) -> Asset {
    let name = match kind {
        AssetKind::Advertisement => format!("ad-{id}"),
        AssetKind::Image => format!("image-{id}"),
    };
    Asset::new(id, name, format!("https://cdn.example.com/{id}"), kind)
}

fn video(id: VideoId, container_id: ContainerId, assets: Vec<Asset>) -> Video {
    Video {
        id,
        container_id,
        title: format!("video {id}"),
        description: format!("description {id}"),
        expiration_date: "2030-06-01".to_string(),
        playback_url: format!("https://cdn.example.com/{id}.m3u8"),
        video_type: VideoType::Movie,
        assets,
    }
}

#[tokio::test]
async fn metrics_disabled_returns_service_unavailable() {
    let server = init_test_server(MockVideoRepository::new(), MockAssetRepository::new());

    let response = server.get("/metrics").await;

    response.assert_status(StatusCode::SERVICE_UNAVAILABLE);
}

#[tokio::test]
async fn openapi_document_is_served() {
    let server = init_test_server(MockVideoRepository::new(), MockAssetRepository::new());

    let response = server.get("/api-docs/openapi.json").await;

    response.assert_status_ok();
    let doc = response.json::<serde_json::Value>();
    assert!(doc["paths"]["/containers/{container_id}"].is_object());
    assert!(doc["paths"]["/assets/{asset_id}"]["patch"].is_object());
}
