use crate::postgres::codec::encode_asset_kind;
use crate::postgres::rows::AssetRow;
use crate::postgres::statements::assets as statements;
use crate::postgres::{RepoInitErr, to_db_id};
use containers_core::AssetRepository;
use containers_core::model::{Asset, AssetId, NewAsset, PatchAsset};
use containers_core::result::{AssetRepoError, OptRepoResult, Reason, RepoResult};
use deadpool_postgres::{Object, Pool};
use error_stack::{IntoReport, Report, ResultExt};
use tokio_postgres::Row;
use tokio_postgres::error::SqlState;
use tracing::debug;

#[derive(Clone)]
pub struct AssetRepo {
    pool: Pool,
}

impl AssetRepo {
    pub async fn new(pool: Pool) -> Result<Self, Report<RepoInitErr>> {
        let handle = pool.get().await.change_context(RepoInitErr::assets())?;

        statements::validate(&handle)
            .await
            .change_context(RepoInitErr::assets())?;

        drop(handle);
        Ok(Self { pool })
    }

    async fn client(&self, on_err: AssetRepoError) -> RepoResult<Object, AssetRepoError> {
        self.pool.get().await.change_context(on_err)
    }
}

fn decode_row(row: &Row, on_err: AssetRepoError) -> RepoResult<Asset, AssetRepoError> {
    AssetRow::from_row(row)
        .change_context(on_err)?
        .decode()
        .change_context(on_err)
}

fn is_foreign_key_violation(e: &tokio_postgres::Error) -> bool {
    e.code()
        .is_some_and(|c| c.code() == SqlState::FOREIGN_KEY_VIOLATION.code())
}

impl AssetRepository for AssetRepo {
    async fn get(&self, asset_id: AssetId) -> OptRepoResult<Asset, AssetRepoError> {
        let Some(db_asset_id) = to_db_id(asset_id) else {
            return Ok(None);
        };

        let client = self.client(AssetRepoError::Get(Reason::Db)).await?;
        let statement = statements::get(&client)
            .await
            .change_context(AssetRepoError::Get(Reason::Db))?;

        client
            .query_opt(&statement, &[&db_asset_id])
            .await
            .change_context(AssetRepoError::Get(Reason::Db))?
            .map(|row| decode_row(&row, AssetRepoError::Get(Reason::Decode)))
            .transpose()
    }

    async fn create(&self, new_asset: NewAsset) -> RepoResult<Asset, AssetRepoError> {
        let Some(video_id) = to_db_id(new_asset.video_id) else {
            return Err(AssetRepoError::Create(Reason::VideoNotFound).into_report())
                .attach_with(|| format!("video id {} is out of range", new_asset.video_id));
        };

        let client = self.client(AssetRepoError::Create(Reason::Db)).await?;
        let statement = statements::create(&client)
            .await
            .change_context(AssetRepoError::Create(Reason::Db))?;

        let result = client
            .query_one(
                &statement,
                &[
                    &video_id,
                    &new_asset.name,
                    &new_asset.url,
                    &encode_asset_kind(new_asset.kind),
                ],
            )
            .await;

        match result {
            Ok(row) => {
                let asset = decode_row(&row, AssetRepoError::Create(Reason::Decode))?;
                debug!("created asset {} for video {}", asset.id, new_asset.video_id);
                Ok(asset)
            }
            Err(e) if is_foreign_key_violation(&e) => Err(e.into_report())
                .change_context(AssetRepoError::Create(Reason::VideoNotFound))
                .attach_with(|| format!("video {}", new_asset.video_id)),
            Err(e) => Err(e.into_report()).change_context(AssetRepoError::Create(Reason::Db)),
        }
    }

    async fn patch(
        &self,
        asset_id: AssetId,
        patch: PatchAsset,
    ) -> OptRepoResult<Asset, AssetRepoError> {
        let Some(db_asset_id) = to_db_id(asset_id) else {
            return Ok(None);
        };

        let video_id = match patch.video_id {
            Some(id) => match to_db_id(id) {
                Some(id) => Some(id),
                None => {
                    return Err(AssetRepoError::Patch(Reason::VideoNotFound).into_report())
                        .attach_with(|| format!("video id {id} is out of range"));
                }
            },
            None => None,
        };

        let client = self.client(AssetRepoError::Patch(Reason::Db)).await?;
        let statement = statements::patch(&client)
            .await
            .change_context(AssetRepoError::Patch(Reason::Db))?;

        let result = client
            .query_opt(
                &statement,
                &[
                    &db_asset_id,
                    &video_id,
                    &patch.name.as_deref(),
                    &patch.url.as_deref(),
                    &patch.kind.map(encode_asset_kind),
                ],
            )
            .await;

        match result {
            Ok(row) => row
                .map(|row| decode_row(&row, AssetRepoError::Patch(Reason::Decode)))
                .transpose(),
            Err(e) if is_foreign_key_violation(&e) => Err(e.into_report())
                .change_context(AssetRepoError::Patch(Reason::VideoNotFound)),
            Err(e) => Err(e.into_report()).change_context(AssetRepoError::Patch(Reason::Db)),
        }
    }

    async fn delete(&self, asset_id: AssetId) -> OptRepoResult<(), AssetRepoError> {
        let Some(db_asset_id) = to_db_id(asset_id) else {
            return Ok(None);
        };

        let client = self.client(AssetRepoError::Delete(Reason::Db)).await?;
        let statement = statements::delete(&client)
            .await
            .change_context(AssetRepoError::Delete(Reason::Db))?;

        let deleted = client
            .execute(&statement, &[&db_asset_id])
            .await
            .change_context(AssetRepoError::Delete(Reason::Db))?;

        Ok((deleted > 0).then_some(()))
    }
}
