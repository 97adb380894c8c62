//! SQL for both repos. Statements are prepared through deadpool's per-connection
//! cache, since a prepared statement only exists on the connection that prepared it.

use const_format::concatcp;
use deadpool_postgres::Client;
use error_stack::{Report, ResultExt};
use tokio_postgres::Statement;
use tokio_postgres::types::Type;

#[derive(Debug, thiserror::Error)]
#[error("failed to prepare {0} statement")]
pub struct StatementPrepareError(&'static str);

type PrepareResult = Result<Statement, tokio_postgres::Error>;

const VIDEO_COLUMNS: &str =
    "id, container_id, title, description, expiration_date, playback_url, video_type";

const ASSET_COLUMNS: &str = "id as asset_id, name as asset_name, url as asset_url, asset_type";

const JOINED_COLUMNS: &str = "v.id, v.container_id, v.title, v.description, \
    v.expiration_date, v.playback_url, v.video_type, \
    a.id as asset_id, a.name as asset_name, a.url as asset_url, a.asset_type";

const JOIN_ASSETS: &str = " left join assets a on a.video_id = v.id";

const SELECT_VIDEOS_WITH_ASSETS: &str =
    concatcp!("select ", JOINED_COLUMNS, " from videos v", JOIN_ASSETS);

const VIDEO_ASSET_ORDER: &str = " order by v.id, a.id";

pub mod videos {
    use super::*;

    pub async fn list(client: &Client) -> PrepareResult {
        client
            .prepare_typed_cached(concatcp!(SELECT_VIDEOS_WITH_ASSETS, VIDEO_ASSET_ORDER), &[])
            .await
    }

    pub async fn list_by_container(client: &Client) -> PrepareResult {
        client
            .prepare_typed_cached(
                concatcp!(
                    SELECT_VIDEOS_WITH_ASSETS,
                    " where v.container_id = $1",
                    VIDEO_ASSET_ORDER
                ),
                &[Type::INT8],
            )
            .await
    }

    pub async fn get(client: &Client) -> PrepareResult {
        client
            .prepare_typed_cached(
                concatcp!(SELECT_VIDEOS_WITH_ASSETS, " where v.id = $1", VIDEO_ASSET_ORDER),
                &[Type::INT8],
            )
            .await
    }

    pub async fn create(client: &Client) -> PrepareResult {
        client
            .prepare_typed_cached(
                concatcp!(
                    "insert into videos (container_id, title, description, expiration_date, playback_url, video_type) \
                    values ($1, $2, $3, $4, $5, $6) returning ",
                    VIDEO_COLUMNS
                ),
                &[
                    Type::INT8,
                    Type::VARCHAR,
                    Type::VARCHAR,
                    Type::VARCHAR,
                    Type::VARCHAR,
                    Type::VARCHAR,
                ],
            )
            .await
    }

    /// Updates the video and returns its joined rows.
    pub async fn patch(client: &Client) -> PrepareResult {
        client
            .prepare_typed_cached(
                concatcp!(
                    "with v as (update videos set \
                    container_id = coalesce($2, container_id), \
                    title = coalesce($3, title), \
                    description = coalesce($4, description), \
                    expiration_date = coalesce($5, expiration_date), \
                    playback_url = coalesce($6, playback_url), \
                    video_type = coalesce($7, video_type) \
                    where id = $1 returning ",
                    VIDEO_COLUMNS,
                    ") select ",
                    JOINED_COLUMNS,
                    " from v",
                    JOIN_ASSETS,
                    VIDEO_ASSET_ORDER
                ),
                &[
                    Type::INT8,
                    Type::INT8,
                    Type::VARCHAR,
                    Type::VARCHAR,
                    Type::VARCHAR,
                    Type::VARCHAR,
                    Type::VARCHAR,
                ],
            )
            .await
    }

    pub async fn delete(client: &Client) -> PrepareResult {
        client
            .prepare_typed_cached("delete from videos where id = $1", &[Type::INT8])
            .await
    }

    /// Prepares everything once so bad SQL fails at startup instead of on first use.
    pub async fn validate(client: &Client) -> Result<(), Report<StatementPrepareError>> {
        list(client).await.change_context(StatementPrepareError("video"))?;
        list_by_container(client).await.change_context(StatementPrepareError("video"))?;
        get(client).await.change_context(StatementPrepareError("video"))?;
        create(client).await.change_context(StatementPrepareError("video"))?;
        patch(client).await.change_context(StatementPrepareError("video"))?;
        delete(client).await.change_context(StatementPrepareError("video"))?;
        Ok(())
    }
}

pub mod assets {
    use super::*;

    pub async fn get(client: &Client) -> PrepareResult {
        client
            .prepare_typed_cached(
                concatcp!("select ", ASSET_COLUMNS, " from assets where id = $1"),
                &[Type::INT8],
            )
            .await
    }

    pub async fn create(client: &Client) -> PrepareResult {
        client
            .prepare_typed_cached(
                concatcp!(
                    "insert into assets (video_id, name, url, asset_type) values ($1, $2, $3, $4) returning ",
                    ASSET_COLUMNS
                ),
                &[Type::INT8, Type::VARCHAR, Type::VARCHAR, Type::VARCHAR],
            )
            .await
    }

    pub async fn patch(client: &Client) -> PrepareResult {
        client
            .prepare_typed_cached(
                concatcp!(
                    "update assets set \
                    video_id = coalesce($2, video_id), \
                    name = coalesce($3, name), \
                    url = coalesce($4, url), \
                    asset_type = coalesce($5, asset_type) \
                    where id = $1 returning ",
                    ASSET_COLUMNS
                ),
                &[
                    Type::INT8,
                    Type::INT8,
                    Type::VARCHAR,
                    Type::VARCHAR,
                    Type::VARCHAR,
                ],
            )
            .await
    }

    pub async fn delete(client: &Client) -> PrepareResult {
        client
            .prepare_typed_cached("delete from assets where id = $1", &[Type::INT8])
            .await
    }

    pub async fn validate(client: &Client) -> Result<(), Report<StatementPrepareError>> {
        get(client).await.change_context(StatementPrepareError("asset"))?;
        create(client).await.change_context(StatementPrepareError("asset"))?;
        patch(client).await.change_context(StatementPrepareError("asset"))?;
        delete(client).await.change_context(StatementPrepareError("asset"))?;
        Ok(())
    }
}
