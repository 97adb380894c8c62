use super::{asset, init_test_server, video, video_server};
use axum::http::StatusCode;
use containers_core::MockAssetRepository;
use containers_core::MockVideoRepository;
use containers_core::model::AssetKind;
use containers_core::result::{Reason, VideoRepoError};
use error_stack::IntoReport;
use futures::FutureExt;
use mockall::predicate;
use serde_json::json;

#[tokio::test]
async fn no_videos_lists_no_content() {
    let mut videos = MockVideoRepository::new();
    videos
        .expect_list()
        .once()
        .return_once(|| async { Ok(vec![]) }.boxed());

    let response = video_server(videos).get("/containers").await;

    response.assert_status(StatusCode::NO_CONTENT);
}

#[tokio::test]
async fn containers_are_listed_in_first_seen_order() {
    let stored = vec![
        video(1, 20, vec![asset(100, AssetKind::Image)]),
        video(2, 10, vec![]),
        video(3, 20, vec![asset(101, AssetKind::Advertisement)]),
    ];
    let mut videos = MockVideoRepository::new();
    videos
        .expect_list()
        .once()
        .return_once(move || async move { Ok(stored) }.boxed());

    let response = video_server(videos).get("/containers").await;

    response.assert_status_ok();
    let body = response.json::<serde_json::Value>();
    assert_eq!(json!(20), body[0]["id"]);
    assert_eq!(json!("container-20_ads_images_videos"), body[0]["name"]);
    assert_eq!(json!([1, 3]), json!([body[0]["videos"][0]["id"], body[0]["videos"][1]["id"]]));
    assert_eq!(json!(10), body[1]["id"]);
    assert_eq!(json!("container-10_videos"), body[1]["name"]);
}

#[tokio::test]
async fn container_json_shape() {
    let stored = vec![video(
        1,
        5,
        vec![asset(7, AssetKind::Advertisement), asset(8, AssetKind::Image)],
    )];
    let mut videos = MockVideoRepository::new();
    videos
        .expect_list_by_container()
        .with(predicate::eq(5))
        .once()
        .return_once(move |_| async move { Ok(stored) }.boxed());

    let response = video_server(videos).get("/containers/5").await;

    response.assert_status_ok();
    response.assert_json(&json!({
        "id": 5,
        "name": "container-5_ads_images_videos",
        "advertisements": [
            { "id": 7, "name": "ad-7", "url": "https://cdn.example.com/7", "assetType": "ADVERTISEMENT" }
        ],
        "images": [
            { "id": 8, "name": "image-8", "url": "https://cdn.example.com/8", "assetType": "IMAGE" }
        ],
        "videos": [{
            "id": 1,
            "containerId": 5,
            "title": "video 1",
            "description": "description 1",
            "expirationDate": "2030-06-01",
            "playbackUrl": "https://cdn.example.com/1.m3u8",
            "videoType": "MOVIE",
            "assets": [7, 8]
        }]
    }));
}

#[tokio::test]
async fn container_without_videos_is_still_returned() {
    let mut videos = MockVideoRepository::new();
    videos
        .expect_list_by_container()
        .once()
        .return_once(|_| async { Ok(vec![]) }.boxed());

    let response = video_server(videos).get("/containers/9").await;

    response.assert_status_ok();
    response.assert_json(&json!({
        "id": 9,
        "name": "container-9_videos",
        "advertisements": [],
        "images": [],
        "videos": []
    }));
}

#[tokio::test]
async fn gateway_failure_is_internal_server_error() {
    let mut videos = MockVideoRepository::new();
    videos
        .expect_list()
        .once()
        .return_once(|| async { Err(VideoRepoError::List(Reason::Db).into_report()) }.boxed());

    let response = video_server(videos).get("/containers").await;

    response.assert_status(StatusCode::INTERNAL_SERVER_ERROR);
    response.assert_json(&json!({ "message": "the request could not be completed" }));
}

#[tokio::test]
async fn single_container_gateway_failure_is_internal_server_error() {
    let mut videos = MockVideoRepository::new();
    videos
        .expect_list_by_container()
        .once()
        .return_once(|_| {
            async { Err(VideoRepoError::List(Reason::Decode).into_report()) }.boxed()
        });

    let response = video_server(videos).get("/containers/1/images").await;

    response.assert_status(StatusCode::INTERNAL_SERVER_ERROR);
}

#[tokio::test]
async fn malformed_container_id_is_bad_request() {
    let server = init_test_server(MockVideoRepository::new(), MockAssetRepository::new());

    let response = server.get("/containers/not-a-number").await;

    response.assert_status_bad_request();
}

#[tokio::test]
async fn advertisements_only_contain_advertisements() {
    let stored = vec![
        video(1, 3, vec![asset(1, AssetKind::Image), asset(2, AssetKind::Advertisement)]),
        video(2, 3, vec![asset(3, AssetKind::Advertisement)]),
    ];
    let mut videos = MockVideoRepository::new();
    videos
        .expect_list_by_container()
        .with(predicate::eq(3))
        .once()
        .return_once(move |_| async move { Ok(stored) }.boxed());

    let response = video_server(videos).get("/containers/3/advertisements").await;

    response.assert_status_ok();
    let ids: Vec<u64> = response
        .json::<Vec<serde_json::Value>>()
        .iter()
        .map(|a| a["id"].as_u64().unwrap())
        .collect();
    assert_eq!(vec![2, 3], ids);
}

#[tokio::test]
async fn container_without_images_lists_no_content() {
    let stored = vec![video(1, 3, vec![asset(1, AssetKind::Advertisement)])];
    let mut videos = MockVideoRepository::new();
    videos
        .expect_list_by_container()
        .once()
        .return_once(move |_| async move { Ok(stored) }.boxed());

    let response = video_server(videos).get("/containers/3/images").await;

    response.assert_status(StatusCode::NO_CONTENT);
}

#[tokio::test]
async fn container_videos_carry_asset_ids() {
    let stored = vec![
        video(4, 2, vec![asset(9, AssetKind::Image), asset(10, AssetKind::Advertisement)]),
        video(5, 2, vec![]),
    ];
    let mut videos = MockVideoRepository::new();
    videos
        .expect_list_by_container()
        .with(predicate::eq(2))
        .once()
        .return_once(move |_| async move { Ok(stored) }.boxed());

    let response = video_server(videos).get("/containers/2/videos").await;

    response.assert_status_ok();
    let body = response.json::<serde_json::Value>();
    assert_eq!(json!([9, 10]), body[0]["assets"]);
    assert_eq!(json!([]), body[1]["assets"]);
}
