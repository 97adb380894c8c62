use model::{
    Asset, AssetId, ContainerId, NewAsset, NewVideo, PatchAsset, PatchVideo, Video, VideoId,
};
use result::{AssetRepoError, OptRepoResult, RepoResult, VideoRepoError};
use std::sync::Arc;

pub mod aggregate;
pub mod model;
pub mod result;

/// Handle to the data access layer, handed to every service that needs it.
/// Implementations are expected to be cheap to clone (a pool or an `Arc`).
pub trait ContainerEngine: Clone + Send + Sync + 'static {
    type Videos: VideoRepository + Send + Sync + 'static;
    type Assets: AssetRepository + Send + Sync + 'static;

    fn videos(&self) -> Self::Videos;
    fn assets(&self) -> Self::Assets;
}

/// Read/write access to videos. Every returned `Video` carries its assets,
/// in the order the store keeps them.
#[cfg_attr(feature = "mock", mockall::automock)]
pub trait VideoRepository {
    /// Every video in the store.
    fn list(&self) -> impl Future<Output = RepoResult<Vec<Video>, VideoRepoError>> + Send;

    /// Every video whose `container_id` equals `container_id`.
    fn list_by_container(
        &self,
        container_id: ContainerId,
    ) -> impl Future<Output = RepoResult<Vec<Video>, VideoRepoError>> + Send;

    fn get(
        &self,
        video_id: VideoId,
    ) -> impl Future<Output = OptRepoResult<Video, VideoRepoError>> + Send;

    fn create(
        &self,
        new_video: NewVideo,
    ) -> impl Future<Output = RepoResult<Video, VideoRepoError>> + Send;

    fn patch(
        &self,
        video_id: VideoId,
        patch: PatchVideo,
    ) -> impl Future<Output = OptRepoResult<Video, VideoRepoError>> + Send;

    /// Deletes the video together with the assets it owns.
    fn delete(
        &self,
        video_id: VideoId,
    ) -> impl Future<Output = OptRepoResult<(), VideoRepoError>> + Send;
}

#[cfg_attr(feature = "mock", mockall::automock)]
pub trait AssetRepository {
    fn get(
        &self,
        asset_id: AssetId,
    ) -> impl Future<Output = OptRepoResult<Asset, AssetRepoError>> + Send;

    /// Fails with `Reason::VideoNotFound` when `new_asset.video_id` does not exist.
    fn create(
        &self,
        new_asset: NewAsset,
    ) -> impl Future<Output = RepoResult<Asset, AssetRepoError>> + Send;

    fn patch(
        &self,
        asset_id: AssetId,
        patch: PatchAsset,
    ) -> impl Future<Output = OptRepoResult<Asset, AssetRepoError>> + Send;

    fn delete(
        &self,
        asset_id: AssetId,
    ) -> impl Future<Output = OptRepoResult<(), AssetRepoError>> + Send;
}

impl<T> VideoRepository for Arc<T>
where
    T: VideoRepository + Send + Sync,
{
    async fn list(&self) -> RepoResult<Vec<Video>, VideoRepoError> {
        (**self).list().await
    }

    async fn list_by_container(
        &self,
        container_id: ContainerId,
    ) -> RepoResult<Vec<Video>, VideoRepoError> {
        (**self).list_by_container(container_id).await
    }

    async fn get(&self, video_id: VideoId) -> OptRepoResult<Video, VideoRepoError> {
        (**self).get(video_id).await
    }

    async fn create(&self, new_video: NewVideo) -> RepoResult<Video, VideoRepoError> {
        (**self).create(new_video).await
    }

    async fn patch(
        &self,
        video_id: VideoId,
        patch: PatchVideo,
    ) -> OptRepoResult<Video, VideoRepoError> {
        (**self).patch(video_id, patch).await
    }

    async fn delete(&self, video_id: VideoId) -> OptRepoResult<(), VideoRepoError> {
        (**self).delete(video_id).await
    }
}

impl<T> AssetRepository for Arc<T>
where
    T: AssetRepository + Send + Sync,
{
    async fn get(&self, asset_id: AssetId) -> OptRepoResult<Asset, AssetRepoError> {
        (**self).get(asset_id).await
    }

    async fn create(&self, new_asset: NewAsset) -> RepoResult<Asset, AssetRepoError> {
        (**self).create(new_asset).await
    }

    async fn patch(
        &self,
        asset_id: AssetId,
        patch: PatchAsset,
    ) -> OptRepoResult<Asset, AssetRepoError> {
        (**self).patch(asset_id, patch).await
    }

    async fn delete(&self, asset_id: AssetId) -> OptRepoResult<(), AssetRepoError> {
        (**self).delete(asset_id).await
    }
}
