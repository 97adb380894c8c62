use super::{asset, asset_server};
use axum::http::StatusCode;
use containers_core::MockAssetRepository;
use containers_core::model::{AssetKind, NewAsset, PatchAsset};
use containers_core::result::{AssetRepoError, Reason};
use error_stack::IntoReport;
use futures::FutureExt;
use mockall::predicate;
use rstest::rstest;
use serde_json::json;

#[tokio::test]
async fn get_asset() {
    let mut assets = MockAssetRepository::new();
    assets
        .expect_get()
        .with(predicate::eq(12))
        .once()
        .return_once(|id| async move { Ok(Some(asset(id, AssetKind::Image))) }.boxed());

    let response = asset_server(assets).get("/assets/12").await;

    response.assert_status_ok();
    response.assert_json(&json!({
        "id": 12,
        "name": "image-12",
        "url": "https://cdn.example.com/12",
        "assetType": "IMAGE"
    }));
}

#[tokio::test]
async fn get_missing_asset_is_not_found() {
    let mut assets = MockAssetRepository::new();
    assets
        .expect_get()
        .once()
        .return_once(|_| async { Ok(None) }.boxed());

    let response = asset_server(assets).get("/assets/12").await;

    response.assert_status(StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn create_asset_returns_created() {
    let expected = NewAsset {
        video_id: 3,
        name: "bumper".to_string(),
        url: "https://cdn.example.com/bumper".to_string(),
        kind: AssetKind::Advertisement,
    };
    let mut assets = MockAssetRepository::new();
    assets
        .expect_create()
        .with(predicate::eq(expected))
        .once()
        .return_once(|_| async { Ok(asset(50, AssetKind::Advertisement)) }.boxed());

    let response = asset_server(assets)
        .post("/assets")
        .json(&json!({
            "videoId": 3,
            "name": "bumper",
            "url": "https://cdn.example.com/bumper",
            "assetType": "ADVERTISEMENT"
        }))
        .await;

    response.assert_status(StatusCode::CREATED);
    response.assert_json_contains(&json!({ "id": 50, "assetType": "ADVERTISEMENT" }));
}

#[tokio::test]
async fn create_asset_for_missing_video_is_not_found() {
    let mut assets = MockAssetRepository::new();
    assets.expect_create().once().return_once(|_| {
        async { Err(AssetRepoError::Create(Reason::VideoNotFound).into_report()) }.boxed()
    });

    let response = asset_server(assets)
        .post("/assets")
        .json(&json!({
            "videoId": 99,
            "name": "orphan",
            "url": "https://cdn.example.com/orphan",
            "assetType": "IMAGE"
        }))
        .await;

    response.assert_status(StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn create_asset_db_failure_is_internal_server_error() {
    let mut assets = MockAssetRepository::new();
    assets.expect_create().once().return_once(|_| {
        async { Err(AssetRepoError::Create(Reason::Db).into_report()) }.boxed()
    });

    let response = asset_server(assets)
        .post("/assets")
        .json(&json!({
            "videoId": 1,
            "name": "a",
            "url": "b",
            "assetType": "IMAGE"
        }))
        .await;

    response.assert_status(StatusCode::INTERNAL_SERVER_ERROR);
}

#[tokio::test]
async fn patch_asset_forwards_kind_change() {
    let mut assets = MockAssetRepository::new();
    assets
        .expect_patch()
        .with(
            predicate::eq(5),
            predicate::eq(PatchAsset {
                kind: Some(AssetKind::Advertisement),
                ..Default::default()
            }),
        )
        .once()
        .return_once(|id, _| async move { Ok(Some(asset(id, AssetKind::Advertisement))) }.boxed());

    let response = asset_server(assets)
        .patch("/assets/5")
        .json(&json!({ "assetType": "ADVERTISEMENT" }))
        .await;

    response.assert_status_ok();
    response.assert_json_contains(&json!({ "id": 5, "assetType": "ADVERTISEMENT" }));
}

#[rstest]
#[case::missing_asset(Ok(None))]
#[case::missing_target_video(Err(Reason::VideoNotFound))]
#[tokio::test]
async fn patch_asset_not_found(#[case] outcome: Result<Option<()>, Reason>) {
    let mut assets = MockAssetRepository::new();
    assets.expect_patch().once().return_once(move |_, _| {
        async move {
            match outcome {
                Ok(_) => Ok(None),
                Err(reason) => Err(AssetRepoError::Patch(reason).into_report()),
            }
        }
        .boxed()
    });

    let response = asset_server(assets)
        .patch("/assets/5")
        .json(&json!({ "videoId": 77 }))
        .await;

    response.assert_status(StatusCode::NOT_FOUND);
}

#[rstest]
#[case::video_id(json!({ "videoId": null }))]
#[case::name(json!({ "name": null, "url": "https://cdn.example.com/x" }))]
#[case::asset_type(json!({ "assetType": null }))]
#[tokio::test]
async fn patch_asset_with_null_field_is_unprocessable(#[case] body: serde_json::Value) {
    let response = asset_server(MockAssetRepository::new())
        .patch("/assets/5")
        .json(&body)
        .await;

    response.assert_status(StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn delete_asset() {
    let mut assets = MockAssetRepository::new();
    assets
        .expect_delete()
        .with(predicate::eq(8))
        .once()
        .return_once(|_| async { Ok(Some(())) }.boxed());

    let response = asset_server(assets).delete("/assets/8").await;

    response.assert_status(StatusCode::NO_CONTENT);
}

#[tokio::test]
async fn delete_missing_asset_is_not_found() {
    let mut assets = MockAssetRepository::new();
    assets
        .expect_delete()
        .once()
        .return_once(|_| async { Ok(None) }.boxed());

    let response = asset_server(assets).delete("/assets/8").await;

    response.assert_status(StatusCode::NOT_FOUND);
}
