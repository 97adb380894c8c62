use crate::error::ContainerServiceError;
use crate::metrics;
use crate::{OptServiceResult, ServiceResult};
use containers_core::aggregate::{
    build_all_containers, build_container, project_assets_by_kind, project_videos,
};
use containers_core::model::{
    Asset, AssetId, AssetKind, Container, ContainerId, NewAsset, NewVideo, PatchAsset, PatchVideo,
    Video, VideoId, VideoView,
};
use containers_core::result::{Reason, RepoResult, VideoRepoError};
use containers_core::{AssetRepository, ContainerEngine, VideoRepository};
use error_stack::ResultExt;
use tracing::{debug, instrument};

/// Result of a write that can be refused for reasons the caller should hear about,
/// as opposed to failures of the layer below.
#[derive(Debug, PartialEq, Eq)]
pub enum WriteOutcome<T> {
    Success(T),
    /// The resource being patched does not exist.
    NotFound,
    /// The video an asset should belong to does not exist.
    VideoNotFound,
    /// A value was rejected by the store, e.g. an id it cannot represent.
    Invalid,
}

#[derive(Debug, Clone)]
pub struct ContainerService<T> {
    engine: T,
}

impl<T> ContainerService<T>
where
    T: ContainerEngine,
{
    pub fn new(engine: T) -> Self {
        ContainerService { engine }
    }

    async fn container_videos(&self, container_id: ContainerId) -> ServiceResult<Vec<Video>> {
        self.engine
            .videos()
            .list_by_container(container_id)
            .await
            .change_context(ContainerServiceError)
            .attach_with(|| format!("container {container_id}"))
    }

    #[instrument(skip_all, name = "service#containers")]
    pub async fn containers(&self) -> ServiceResult<Vec<Container>> {
        let videos = self
            .engine
            .videos()
            .list()
            .await
            .change_context(ContainerServiceError)?;

        let containers = build_all_containers(videos);
        debug!("built {} containers", containers.len());
        metrics::increment_containers_built_by(containers.len());
        Ok(containers)
    }

    #[instrument(skip(self), name = "service#container")]
    pub async fn container(&self, container_id: ContainerId) -> ServiceResult<Container> {
        let videos = self.container_videos(container_id).await?;

        metrics::increment_containers_built_by(1);
        Ok(build_container(container_id, videos))
    }

    #[instrument(skip(self), name = "service#assets")]
    pub async fn assets(
        &self,
        container_id: ContainerId,
        kind: AssetKind,
    ) -> ServiceResult<Vec<Asset>> {
        let videos = self.container_videos(container_id).await?;

        let assets = project_assets_by_kind(videos, kind);
        metrics::increment_assets_retrieved_by(assets.len());
        Ok(assets)
    }

    #[instrument(skip(self), name = "service#container_videos")]
    pub async fn videos(&self, container_id: ContainerId) -> ServiceResult<Vec<VideoView>> {
        let videos = self.container_videos(container_id).await?;

        let views = project_videos(videos);
        metrics::increment_videos_retrieved_by(views.len());
        Ok(views)
    }

    #[instrument(skip(self), name = "service#video")]
    pub async fn video(&self, video_id: VideoId) -> OptServiceResult<Video> {
        let video = self
            .engine
            .videos()
            .get(video_id)
            .await
            .change_context(ContainerServiceError)?;

        if video.is_some() {
            metrics::increment_videos_retrieved_by(1);
        }
        Ok(video)
    }

    #[instrument(skip_all, name = "service#create_video")]
    pub async fn create_video(&self, new_video: NewVideo) -> ServiceResult<WriteOutcome<Video>> {
        let result = self.engine.videos().create(new_video).await;

        let outcome = video_write_outcome(result.map(Some))?;
        if let WriteOutcome::Success(video) = &outcome {
            debug!("created video {}", video.id);
            metrics::increment_videos_created();
        }
        Ok(outcome)
    }

    #[instrument(skip(self, patch), name = "service#patch_video")]
    pub async fn patch_video(
        &self,
        video_id: VideoId,
        patch: PatchVideo,
    ) -> ServiceResult<WriteOutcome<Video>> {
        let result = self.engine.videos().patch(video_id, patch).await;

        let outcome = video_write_outcome(result)?;
        if let WriteOutcome::Success(_) = &outcome {
            debug!("patched video {video_id}");
            metrics::increment_videos_patched();
        }
        Ok(outcome)
    }

    #[instrument(skip(self), name = "service#delete_video")]
    pub async fn delete_video(&self, video_id: VideoId) -> OptServiceResult<()> {
        let deleted = self
            .engine
            .videos()
            .delete(video_id)
            .await
            .change_context(ContainerServiceError)?;

        if deleted.is_some() {
            debug!("deleted video {video_id}");
            metrics::increment_videos_deleted();
        }
        Ok(deleted)
    }

    #[instrument(skip(self), name = "service#asset")]
    pub async fn asset(&self, asset_id: AssetId) -> OptServiceResult<Asset> {
        let asset = self
            .engine
            .assets()
            .get(asset_id)
            .await
            .change_context(ContainerServiceError)?;

        if asset.is_some() {
            metrics::increment_assets_retrieved_by(1);
        }
        Ok(asset)
    }

    #[instrument(skip_all, name = "service#create_asset")]
    pub async fn create_asset(&self, new_asset: NewAsset) -> ServiceResult<WriteOutcome<Asset>> {
        let outcome = match self.engine.assets().create(new_asset).await {
            Ok(asset) => WriteOutcome::Success(asset),
            Err(e) if e.current_context().reason() == Reason::VideoNotFound => {
                debug!("asset not created: {e:?}");
                WriteOutcome::VideoNotFound
            }
            Err(e) => return Err(e.change_context(ContainerServiceError)),
        };

        if let WriteOutcome::Success(asset) = &outcome {
            debug!("created asset {}", asset.id);
            metrics::increment_assets_created();
        }
        Ok(outcome)
    }

    #[instrument(skip(self, patch), name = "service#patch_asset")]
    pub async fn patch_asset(
        &self,
        asset_id: AssetId,
        patch: PatchAsset,
    ) -> ServiceResult<WriteOutcome<Asset>> {
        let outcome = match self.engine.assets().patch(asset_id, patch).await {
            Ok(Some(asset)) => WriteOutcome::Success(asset),
            Ok(None) => WriteOutcome::NotFound,
            Err(e) if e.current_context().reason() == Reason::VideoNotFound => {
                debug!("asset {asset_id} not patched: {e:?}");
                WriteOutcome::VideoNotFound
            }
            Err(e) => return Err(e.change_context(ContainerServiceError)),
        };

        if let WriteOutcome::Success(_) = &outcome {
            debug!("patched asset {asset_id}");
            metrics::increment_assets_patched();
        }
        Ok(outcome)
    }

    #[instrument(skip(self), name = "service#delete_asset")]
    pub async fn delete_asset(&self, asset_id: AssetId) -> OptServiceResult<()> {
        let deleted = self
            .engine
            .assets()
            .delete(asset_id)
            .await
            .change_context(ContainerServiceError)?;

        if deleted.is_some() {
            debug!("deleted asset {asset_id}");
            metrics::increment_assets_deleted();
        }
        Ok(deleted)
    }
}

fn video_write_outcome(
    result: RepoResult<Option<Video>, VideoRepoError>,
) -> ServiceResult<WriteOutcome<Video>> {
    match result {
        Ok(Some(video)) => Ok(WriteOutcome::Success(video)),
        Ok(None) => Ok(WriteOutcome::NotFound),
        Err(e) if e.current_context().reason() == Reason::Validation => {
            debug!("video write rejected: {e:?}");
            Ok(WriteOutcome::Invalid)
        }
        Err(e) => Err(e.change_context(ContainerServiceError)),
    }
}
