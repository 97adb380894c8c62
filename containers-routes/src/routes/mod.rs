use crate::error::ContainerServiceError;
use crate::metrics;
use crate::service::{ContainerService, WriteOutcome};
use crate::state::ContainerAppState;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::middleware;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use containers_core::ContainerEngine;
use containers_core::model::{
    Asset, AssetId, AssetKind, Container, ContainerId, PatchAsset, PatchVideo, VideoId, VideoView,
};
use engine::error::EndpointError;
use engine::stream::StreamingResponse;
use requests::{AssetPatchRequest, CreateAssetRequest, CreateVideoRequest, VideoPatchRequest};
use responses::{ApiError, ResourceResponse};
use tracing::{info, instrument};
use utoipa::OpenApi;
use utoipa_axum::router::OpenApiRouter;
use utoipa_swagger_ui::SwaggerUi;

mod requests;
mod responses;
#[cfg(test)]
mod tests;

#[derive(OpenApi)]
#[openapi(
    paths(
        list_containers,
        get_container,
        list_container_advertisements,
        list_container_images,
        list_container_videos,
        create_video,
        get_video,
        patch_video,
        delete_video,
        create_asset,
        get_asset,
        patch_asset,
        delete_asset,
    ),
    components(schemas(
        Container,
        VideoView,
        Asset,
        AssetKind,
        containers_core::model::VideoType,
        ApiError,
    ))
)]
struct ApiDoc;

const CONTAINERS_PATH: &str = "/containers";
const CONTAINER_PATH: &str = "/containers/{container_id}";
const CONTAINER_ADVERTISEMENTS_PATH: &str = "/containers/{container_id}/advertisements";
const CONTAINER_IMAGES_PATH: &str = "/containers/{container_id}/images";
const CONTAINER_VIDEOS_PATH: &str = "/containers/{container_id}/videos";
const VIDEOS_PATH: &str = "/videos";
const VIDEO_PATH: &str = "/videos/{video_id}";
const ASSETS_PATH: &str = "/assets";
const ASSET_PATH: &str = "/assets/{asset_id}";

pub fn build<T: ContainerEngine>(app_state: ContainerAppState<T>) -> Router {
    let (router, api) = OpenApiRouter::with_openapi(ApiDoc::openapi())
        .merge(routes(app_state))
        .split_for_parts();

    router.merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", api))
}

fn routes<S, T: ContainerEngine>(app_state: ContainerAppState<T>) -> OpenApiRouter<S> {
    let main_router = OpenApiRouter::new()
        .route(CONTAINERS_PATH, get(list_containers))
        .route(CONTAINER_PATH, get(get_container))
        .route(
            CONTAINER_ADVERTISEMENTS_PATH,
            get(list_container_advertisements),
        )
        .route(CONTAINER_IMAGES_PATH, get(list_container_images))
        .route(CONTAINER_VIDEOS_PATH, get(list_container_videos))
        .route(VIDEOS_PATH, post(create_video))
        .route(
            VIDEO_PATH,
            get(get_video).patch(patch_video).delete(delete_video),
        )
        .route(ASSETS_PATH, post(create_asset))
        .route(
            ASSET_PATH,
            get(get_asset).patch(patch_asset).delete(delete_asset),
        );

    let router = match app_state.metrics.clone() {
        Some(handle) => {
            info!("metrics enabled, setting up metrics handler");
            main_router
                .route("/metrics", get(|| async move { handle.render() }))
                .route_layer(middleware::from_fn(metrics::track_http))
        }
        None => {
            info!("metrics not enabled, setting up service unavailable metrics handler");
            main_router.route(
                "/metrics",
                get(|| async {
                    (
                        StatusCode::SERVICE_UNAVAILABLE,
                        "Metrics endpoint is disabled. Metrics must be enabled and the service restarted",
                    )
                }),
            )
        }
    };

    router.with_state(app_state)
}

fn list_or_no_content<I>(items: I) -> Response
where
    I: IntoIterator,
    I::Item: serde::Serialize + Send + Sync + 'static,
    I::IntoIter: ExactSizeIterator + Send + Sync + 'static,
{
    let items = items.into_iter();
    if items.len() == 0 {
        StatusCode::NO_CONTENT.into_response()
    } else {
        StreamingResponse::ok(items).into_response()
    }
}

/// Every container that has at least one video.
#[utoipa::path(
    get,
    path = CONTAINERS_PATH,
    responses(
        (status = OK, description = "Containers, in the order their id first appears among the stored videos", body = Vec<Container>),
        (status = NO_CONTENT, description = "No videos exist, so there are no containers"),
    )
)]
#[instrument(skip(service), err(Debug))]
async fn list_containers<T>(
    State(service): State<ContainerService<T>>,
) -> Result<Response, EndpointError<ContainerServiceError>>
where
    T: ContainerEngine,
{
    let containers = service.containers().await?;
    Ok(list_or_no_content(containers))
}

/// The container with the given id. A container without videos is still returned, empty.
#[utoipa::path(
    get,
    path = CONTAINER_PATH,
    responses(
        (status = OK, description = "The container assembled from its videos", body = Container),
    ),
    params(
        ("container_id" = u64, Path, description = "The container to assemble"),
    )
)]
#[instrument(skip(service), err(Debug))]
async fn get_container<T>(
    State(service): State<ContainerService<T>>,
    Path(container_id): Path<ContainerId>,
) -> Result<Response, EndpointError<ContainerServiceError>>
where
    T: ContainerEngine,
{
    let container = service.container(container_id).await?;
    Ok(ResourceResponse::ok(container).into_response())
}

async fn list_container_assets<T>(
    service: ContainerService<T>,
    container_id: ContainerId,
    kind: AssetKind,
) -> Result<Response, EndpointError<ContainerServiceError>>
where
    T: ContainerEngine,
{
    let assets = service.assets(container_id, kind).await?;
    Ok(list_or_no_content(assets))
}

/// Advertisements of every video in the container.
#[utoipa::path(
    get,
    path = CONTAINER_ADVERTISEMENTS_PATH,
    responses(
        (status = OK, description = "Advertisements in video order", body = Vec<Asset>),
        (status = NO_CONTENT, description = "The container has no advertisements"),
    ),
    params(
        ("container_id" = u64, Path, description = "The container to look in"),
    )
)]
#[instrument(skip(service), err(Debug))]
async fn list_container_advertisements<T>(
    State(service): State<ContainerService<T>>,
    Path(container_id): Path<ContainerId>,
) -> Result<Response, EndpointError<ContainerServiceError>>
where
    T: ContainerEngine,
{
    list_container_assets(service, container_id, AssetKind::Advertisement).await
}

/// Images of every video in the container.
#[utoipa::path(
    get,
    path = CONTAINER_IMAGES_PATH,
    responses(
        (status = OK, description = "Images in video order", body = Vec<Asset>),
        (status = NO_CONTENT, description = "The container has no images"),
    ),
    params(
        ("container_id" = u64, Path, description = "The container to look in"),
    )
)]
#[instrument(skip(service), err(Debug))]
async fn list_container_images<T>(
    State(service): State<ContainerService<T>>,
    Path(container_id): Path<ContainerId>,
) -> Result<Response, EndpointError<ContainerServiceError>>
where
    T: ContainerEngine,
{
    list_container_assets(service, container_id, AssetKind::Image).await
}

/// Videos in the container, with their assets reduced to ids.
#[utoipa::path(
    get,
    path = CONTAINER_VIDEOS_PATH,
    responses(
        (status = OK, description = "Videos of the container", body = Vec<VideoView>),
        (status = NO_CONTENT, description = "The container has no videos"),
    ),
    params(
        ("container_id" = u64, Path, description = "The container to look in"),
    )
)]
#[instrument(skip(service), err(Debug))]
async fn list_container_videos<T>(
    State(service): State<ContainerService<T>>,
    Path(container_id): Path<ContainerId>,
) -> Result<Response, EndpointError<ContainerServiceError>>
where
    T: ContainerEngine,
{
    let videos = service.videos(container_id).await?;
    Ok(list_or_no_content(videos))
}

#[utoipa::path(
    post,
    path = VIDEOS_PATH,
    responses(
        (status = CREATED, description = "The video was created", body = VideoView),
        (status = UNPROCESSABLE_ENTITY, description = "The container id cannot be stored", body = ApiError),
    ),
    request_body = CreateVideoRequest
)]
#[instrument(skip_all, err(Debug), fields(req.container_id = video.container_id, req.title = video.title))]
async fn create_video<T>(
    State(service): State<ContainerService<T>>,
    Json(video): Json<CreateVideoRequest>,
) -> Result<Response, EndpointError<ContainerServiceError>>
where
    T: ContainerEngine,
{
    let res = match service.create_video(video.into()).await? {
        WriteOutcome::Success(video) => {
            ResourceResponse::created(VideoView::from(&video)).into_response()
        }
        WriteOutcome::Invalid => {
            ApiError::unprocessable_entity("containerId is out of range").into_response()
        }
        WriteOutcome::NotFound | WriteOutcome::VideoNotFound => {
            ApiError::video_not_found().into_response()
        }
    };
    Ok(res)
}

#[utoipa::path(
    get,
    path = VIDEO_PATH,
    responses(
        (status = OK, description = "The video, with its assets reduced to ids", body = VideoView),
        (status = NOT_FOUND, description = "No video has the given id", body = ApiError),
    ),
    params(
        ("video_id" = u64, Path, description = "The video to find"),
    )
)]
#[instrument(skip(service), err(Debug))]
async fn get_video<T>(
    State(service): State<ContainerService<T>>,
    Path(video_id): Path<VideoId>,
) -> Result<Response, EndpointError<ContainerServiceError>>
where
    T: ContainerEngine,
{
    let video = service.video(video_id).await?;

    Ok(video
        .map(|v| ResourceResponse::ok(VideoView::from(&v)).into_response())
        .unwrap_or_else(|| ApiError::video_not_found().into_response()))
}

/// Update the given fields of a video. Fields left out keep their value.
#[utoipa::path(
    patch,
    path = VIDEO_PATH,
    responses(
        (status = OK, description = "The video was patched", body = VideoView),
        (status = NOT_FOUND, description = "No video has the given id", body = ApiError),
        (status = UNPROCESSABLE_ENTITY, description = "A field was set to null or cannot be stored", body = ApiError),
    ),
    params(
        ("video_id" = u64, Path, description = "The video to patch"),
    ),
    request_body = VideoPatchRequest,
)]
#[instrument(skip(service, patch), err(Debug))]
async fn patch_video<T>(
    State(service): State<ContainerService<T>>,
    Path(video_id): Path<VideoId>,
    Json(patch): Json<VideoPatchRequest>,
) -> Result<Response, EndpointError<ContainerServiceError>>
where
    T: ContainerEngine,
{
    let patch = match PatchVideo::try_from(patch) {
        Ok(patch) => patch,
        Err(null) => return Ok(ApiError::unprocessable_entity(null.message()).into_response()),
    };

    let res = match service.patch_video(video_id, patch).await? {
        WriteOutcome::Success(video) => ResourceResponse::ok(VideoView::from(&video)).into_response(),
        WriteOutcome::NotFound | WriteOutcome::VideoNotFound => {
            ApiError::video_not_found().into_response()
        }
        WriteOutcome::Invalid => {
            ApiError::unprocessable_entity("containerId is out of range").into_response()
        }
    };
    Ok(res)
}

/// Delete a video along with every asset it owns.
#[utoipa::path(
    delete,
    path = VIDEO_PATH,
    responses(
        (status = NO_CONTENT, description = "The video and its assets were deleted"),
        (status = NOT_FOUND, description = "No video has the given id", body = ApiError),
    ),
    params(
        ("video_id" = u64, Path, description = "The video to delete"),
    )
)]
#[instrument(skip(service), err(Debug))]
async fn delete_video<T>(
    State(service): State<ContainerService<T>>,
    Path(video_id): Path<VideoId>,
) -> Result<Response, EndpointError<ContainerServiceError>>
where
    T: ContainerEngine,
{
    match service.delete_video(video_id).await? {
        Some(_) => Ok(StatusCode::NO_CONTENT.into_response()),
        None => Ok(ApiError::video_not_found().into_response()),
    }
}

#[utoipa::path(
    post,
    path = ASSETS_PATH,
    responses(
        (status = CREATED, description = "The asset was created", body = Asset),
        (status = NOT_FOUND, description = "The video the asset should belong to does not exist", body = ApiError),
    ),
    request_body = CreateAssetRequest
)]
#[instrument(skip_all, err(Debug), fields(req.video_id = asset.video_id, req.name = asset.name))]
async fn create_asset<T>(
    State(service): State<ContainerService<T>>,
    Json(asset): Json<CreateAssetRequest>,
) -> Result<Response, EndpointError<ContainerServiceError>>
where
    T: ContainerEngine,
{
    let res = match service.create_asset(asset.into()).await? {
        WriteOutcome::Success(asset) => ResourceResponse::created(asset).into_response(),
        WriteOutcome::VideoNotFound | WriteOutcome::NotFound | WriteOutcome::Invalid => {
            ApiError::owning_video_not_found().into_response()
        }
    };
    Ok(res)
}

#[utoipa::path(
    get,
    path = ASSET_PATH,
    responses(
        (status = OK, description = "The asset", body = Asset),
        (status = NOT_FOUND, description = "No asset has the given id", body = ApiError),
    ),
    params(
        ("asset_id" = u64, Path, description = "The asset to find"),
    )
)]
#[instrument(skip(service), err(Debug))]
async fn get_asset<T>(
    State(service): State<ContainerService<T>>,
    Path(asset_id): Path<AssetId>,
) -> Result<Response, EndpointError<ContainerServiceError>>
where
    T: ContainerEngine,
{
    let asset = service.asset(asset_id).await?;

    Ok(asset
        .map(|a| ResourceResponse::ok(a).into_response())
        .unwrap_or_else(|| ApiError::asset_not_found().into_response()))
}

/// Update the given fields of an asset. Setting `videoId` moves it to another video.
#[utoipa::path(
    patch,
    path = ASSET_PATH,
    responses(
        (status = OK, description = "The asset was patched", body = Asset),
        (status = NOT_FOUND, description = "The asset, or the video it should move to, does not exist", body = ApiError),
        (status = UNPROCESSABLE_ENTITY, description = "A field was set to null", body = ApiError),
    ),
    params(
        ("asset_id" = u64, Path, description = "The asset to patch"),
    ),
    request_body = AssetPatchRequest,
)]
#[instrument(skip(service, patch), err(Debug))]
async fn patch_asset<T>(
    State(service): State<ContainerService<T>>,
    Path(asset_id): Path<AssetId>,
    Json(patch): Json<AssetPatchRequest>,
) -> Result<Response, EndpointError<ContainerServiceError>>
where
    T: ContainerEngine,
{
    let patch = match PatchAsset::try_from(patch) {
        Ok(patch) => patch,
        Err(null) => return Ok(ApiError::unprocessable_entity(null.message()).into_response()),
    };

    let res = match service.patch_asset(asset_id, patch).await? {
        WriteOutcome::Success(asset) => ResourceResponse::ok(asset).into_response(),
        WriteOutcome::NotFound | WriteOutcome::Invalid => {
            ApiError::asset_not_found().into_response()
        }
        WriteOutcome::VideoNotFound => ApiError::owning_video_not_found().into_response(),
    };
    Ok(res)
}

#[utoipa::path(
    delete,
    path = ASSET_PATH,
    responses(
        (status = NO_CONTENT, description = "The asset was deleted"),
        (status = NOT_FOUND, description = "No asset has the given id", body = ApiError),
    ),
    params(
        ("asset_id" = u64, Path, description = "The asset to delete"),
    )
)]
#[instrument(skip(service), err(Debug))]
async fn delete_asset<T>(
    State(service): State<ContainerService<T>>,
    Path(asset_id): Path<AssetId>,
) -> Result<Response, EndpointError<ContainerServiceError>>
where
    T: ContainerEngine,
{
    match service.delete_asset(asset_id).await? {
        Some(_) => Ok(StatusCode::NO_CONTENT.into_response()),
        None => Ok(ApiError::asset_not_found().into_response()),
    }
}
