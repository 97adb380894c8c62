use crate::postgres::codec::encode_video_type;
use crate::postgres::rows::{VideoRow, decode_joined_rows};
use crate::postgres::statements::videos as statements;
use crate::postgres::{RepoInitErr, to_db_id};
use containers_core::VideoRepository;
use containers_core::model::{ContainerId, NewVideo, PatchVideo, Video, VideoId};
use containers_core::result::{OptRepoResult, Reason, RepoResult, VideoRepoError};
use deadpool_postgres::{Object, Pool};
use error_stack::{IntoReport, Report, ResultExt};
use tokio_postgres::Statement;
use tokio_postgres::types::ToSql;
use tracing::debug;

#[derive(Clone)]
pub struct VideoRepo {
    pool: Pool,
}

impl VideoRepo {
    pub async fn new(pool: Pool) -> Result<Self, Report<RepoInitErr>> {
        let handle = pool.get().await.change_context(RepoInitErr::videos())?;

        statements::validate(&handle)
            .await
            .change_context(RepoInitErr::videos())?;

        drop(handle);
        Ok(Self { pool })
    }

    async fn client(&self, on_err: VideoRepoError) -> RepoResult<Object, VideoRepoError> {
        self.pool.get().await.change_context(on_err)
    }

    async fn query_joined(
        &self,
        client: &Object,
        statement: &Statement,
        params: &[&(dyn ToSql + Sync)],
        on_err: fn(Reason) -> VideoRepoError,
    ) -> RepoResult<Vec<Video>, VideoRepoError> {
        let rows = client
            .query(statement, params)
            .await
            .change_context(on_err(Reason::Db))?;

        decode_joined_rows(&rows).change_context(on_err(Reason::Decode))
    }
}

impl VideoRepository for VideoRepo {
    async fn list(&self) -> RepoResult<Vec<Video>, VideoRepoError> {
        let client = self.client(VideoRepoError::List(Reason::Db)).await?;
        let statement = statements::list(&client)
            .await
            .change_context(VideoRepoError::List(Reason::Db))?;

        let videos = self
            .query_joined(&client, &statement, &[], VideoRepoError::List)
            .await?;
        debug!("listed {} videos", videos.len());
        Ok(videos)
    }

    async fn list_by_container(
        &self,
        container_id: ContainerId,
    ) -> RepoResult<Vec<Video>, VideoRepoError> {
        let Some(db_container_id) = to_db_id(container_id) else {
            debug!("container id {container_id} is out of range, no videos can reference it");
            return Ok(Vec::new());
        };

        let client = self.client(VideoRepoError::List(Reason::Db)).await?;
        let statement = statements::list_by_container(&client)
            .await
            .change_context(VideoRepoError::List(Reason::Db))?;

        self.query_joined(
            &client,
            &statement,
            &[&db_container_id],
            VideoRepoError::List,
        )
        .await
    }

    async fn get(&self, video_id: VideoId) -> OptRepoResult<Video, VideoRepoError> {
        let Some(db_video_id) = to_db_id(video_id) else {
            return Ok(None);
        };

        let client = self.client(VideoRepoError::Get(Reason::Db)).await?;
        let statement = statements::get(&client)
            .await
            .change_context(VideoRepoError::Get(Reason::Db))?;

        let videos = self
            .query_joined(&client, &statement, &[&db_video_id], VideoRepoError::Get)
            .await?;

        Ok(videos.into_iter().next())
    }

    async fn create(&self, new_video: NewVideo) -> RepoResult<Video, VideoRepoError> {
        let container_id = to_db_id(new_video.container_id)
            .ok_or_else(|| VideoRepoError::Create(Reason::Validation).into_report())
            .attach_with(|| format!("container id {} is out of range", new_video.container_id))?;

        let client = self.client(VideoRepoError::Create(Reason::Db)).await?;
        let statement = statements::create(&client)
            .await
            .change_context(VideoRepoError::Create(Reason::Db))?;

        let row = client
            .query_one(
                &statement,
                &[
                    &container_id,
                    &new_video.title,
                    &new_video.description,
                    &new_video.expiration_date,
                    &new_video.playback_url,
                    &encode_video_type(new_video.video_type),
                ],
            )
            .await
            .change_context(VideoRepoError::Create(Reason::Db))?;

        let video = VideoRow::from_row(&row)
            .change_context(VideoRepoError::Create(Reason::Decode))?
            .decode()
            .change_context(VideoRepoError::Create(Reason::Decode))?;

        debug!("created video {} in container {}", video.id, video.container_id);
        Ok(video)
    }

    async fn patch(
        &self,
        video_id: VideoId,
        patch: PatchVideo,
    ) -> OptRepoResult<Video, VideoRepoError> {
        let Some(db_video_id) = to_db_id(video_id) else {
            return Ok(None);
        };

        let container_id = match patch.container_id {
            Some(id) => Some(
                to_db_id(id)
                    .ok_or_else(|| VideoRepoError::Patch(Reason::Validation).into_report())
                    .attach_with(|| format!("container id {id} is out of range"))?,
            ),
            None => None,
        };

        let client = self.client(VideoRepoError::Patch(Reason::Db)).await?;
        let statement = statements::patch(&client)
            .await
            .change_context(VideoRepoError::Patch(Reason::Db))?;

        let videos = self
            .query_joined(
                &client,
                &statement,
                &[
                    &db_video_id,
                    &container_id,
                    &patch.title.as_deref(),
                    &patch.description.as_deref(),
                    &patch.expiration_date.as_deref(),
                    &patch.playback_url.as_deref(),
                    &patch.video_type.map(encode_video_type),
                ],
                VideoRepoError::Patch,
            )
            .await?;

        Ok(videos.into_iter().next())
    }

    async fn delete(&self, video_id: VideoId) -> OptRepoResult<(), VideoRepoError> {
        let Some(db_video_id) = to_db_id(video_id) else {
            return Ok(None);
        };

        let client = self.client(VideoRepoError::Delete(Reason::Db)).await?;
        let statement = statements::delete(&client)
            .await
            .change_context(VideoRepoError::Delete(Reason::Db))?;

        let deleted = client
            .execute(&statement, &[&db_video_id])
            .await
            .change_context(VideoRepoError::Delete(Reason::Db))?;

        debug!("deleted {deleted} video(s) with id {video_id}");
        Ok((deleted > 0).then_some(()))
    }
}
