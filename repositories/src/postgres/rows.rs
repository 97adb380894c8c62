use crate::postgres::codec::{DecodeError, decode_asset_kind, decode_id, decode_video_type};
use containers_core::model::{Asset, Video};
use error_stack::{Report, ResultExt};
use tokio_postgres::Row;

/// Columns of the `videos` table, as selected by every video statement.
#[derive(Debug, Clone)]
pub struct VideoRow {
    pub id: i64,
    pub container_id: i64,
    pub title: String,
    pub description: String,
    pub expiration_date: String,
    pub playback_url: String,
    pub video_type: String,
}

/// Columns of the `assets` table, aliased with an `asset_` prefix so they read
/// the same whether they come from the join or from the table alone.
#[derive(Debug, Clone)]
pub struct AssetRow {
    pub id: i64,
    pub name: String,
    pub url: String,
    pub asset_type: String,
}

/// One row of `videos left join assets`. `asset` is `None` for a video that owns no assets.
#[derive(Debug, Clone)]
pub struct JoinedRow {
    pub video: VideoRow,
    pub asset: Option<AssetRow>,
}

type RowResult<T> = Result<T, Report<DecodeError>>;

impl VideoRow {
    pub fn from_row(row: &Row) -> Result<Self, tokio_postgres::Error> {
        Ok(Self {
            id: row.try_get("id")?,
            container_id: row.try_get("container_id")?,
            title: row.try_get("title")?,
            description: row.try_get("description")?,
            expiration_date: row.try_get("expiration_date")?,
            playback_url: row.try_get("playback_url")?,
            video_type: row.try_get("video_type")?,
        })
    }

    pub fn decode(self) -> RowResult<Video> {
        Ok(Video {
            id: decode_id(self.id)?,
            container_id: decode_id(self.container_id).attach("container_id")?,
            title: self.title,
            description: self.description,
            expiration_date: self.expiration_date,
            playback_url: self.playback_url,
            video_type: decode_video_type(&self.video_type)
                .attach_with(|| format!("video {}", self.id))?,
            assets: Vec::new(),
        })
    }
}

impl AssetRow {
    pub fn from_row(row: &Row) -> Result<Self, tokio_postgres::Error> {
        Ok(Self {
            id: row.try_get("asset_id")?,
            name: row.try_get("asset_name")?,
            url: row.try_get("asset_url")?,
            asset_type: row.try_get("asset_type")?,
        })
    }

    pub fn decode(self) -> RowResult<Asset> {
        Ok(Asset {
            id: decode_id(self.id)?,
            kind: decode_asset_kind(&self.asset_type)
                .attach_with(|| format!("asset {}", self.id))?,
            name: self.name,
            url: self.url,
        })
    }
}

impl JoinedRow {
    pub fn from_row(row: &Row) -> Result<Self, tokio_postgres::Error> {
        let asset_id: Option<i64> = row.try_get("asset_id")?;
        let asset = match asset_id {
            Some(_) => Some(AssetRow::from_row(row)?),
            None => None,
        };

        Ok(Self {
            video: VideoRow::from_row(row)?,
            asset,
        })
    }
}

/// Folds join rows into videos. Rows must be grouped by video id (the statements
/// order by `v.id, a.id`); within a video, assets keep row order.
pub fn fold_rows<I>(rows: I) -> RowResult<Vec<Video>>
where
    I: IntoIterator<Item = JoinedRow>,
{
    let mut videos: Vec<Video> = Vec::new();

    for JoinedRow { video, asset } in rows {
        let video_id = decode_id(video.id)?;

        if videos.last().is_none_or(|v| v.id != video_id) {
            videos.push(video.decode()?);
        }

        if let (Some(asset), Some(current)) = (asset, videos.last_mut()) {
            current.assets.push(asset.decode()?);
        }
    }

    Ok(videos)
}

/// Reads and folds the rows of one of the joined video statements.
pub fn decode_joined_rows(rows: &[Row]) -> RowResult<Vec<Video>> {
    let joined = rows
        .iter()
        .map(JoinedRow::from_row)
        .collect::<Result<Vec<_>, _>>()
        .change_context(DecodeError("joined video row"))?;

    fold_rows(joined)
}

#[cfg(test)]
mod tests {
    use super::*;
    use containers_core::model::{AssetKind, VideoType};

    fn video_row(id: i64, container_id: i64) -> VideoRow {
        VideoRow {
            id,
            container_id,
            title: format!("video {id}"),
            description: "desc".to_string(),
            expiration_date: "2031-12-31".to_string(),
            playback_url: format!("https://play.test/{id}"),
            video_type: "MOVIE".to_string(),
        }
    }

    fn asset_row(id: i64, asset_type: &str) -> AssetRow {
        AssetRow {
            id,
            name: format!("asset {id}"),
            url: format!("https://cdn.test/{id}"),
            asset_type: asset_type.to_string(),
        }
    }

    fn joined(video: VideoRow, asset: Option<AssetRow>) -> JoinedRow {
        JoinedRow { video, asset }
    }

    #[test]
    fn rows_fold_into_videos_with_assets_in_row_order() {
        let rows = vec![
            joined(video_row(1, 5), Some(asset_row(10, "AD"))),
            joined(video_row(1, 5), Some(asset_row(11, "IMAGE"))),
            joined(video_row(2, 5), Some(asset_row(12, "IMAGE"))),
        ];

        let videos = fold_rows(rows).unwrap();

        assert_eq!(2, videos.len());
        assert_eq!(1, videos[0].id);
        assert_eq!(5, videos[0].container_id);
        assert_eq!(VideoType::Movie, videos[0].video_type);
        assert_eq!(
            vec![(10, AssetKind::Advertisement), (11, AssetKind::Image)],
            videos[0]
                .assets
                .iter()
                .map(|a| (a.id, a.kind))
                .collect::<Vec<_>>()
        );
        assert_eq!(vec![12], videos[1].assets.iter().map(|a| a.id).collect::<Vec<_>>());
    }

    #[test]
    fn video_without_assets_folds_to_empty_asset_list() {
        let rows = vec![
            joined(video_row(1, 1), None),
            joined(video_row(2, 1), Some(asset_row(3, "AD"))),
        ];

        let videos = fold_rows(rows).unwrap();

        assert_eq!(2, videos.len());
        assert!(videos[0].assets.is_empty());
        assert_eq!(1, videos[1].assets.len());
    }

    #[test]
    fn no_rows_no_videos() {
        assert!(fold_rows(Vec::new()).unwrap().is_empty());
    }

    #[test]
    fn unknown_asset_type_fails_the_whole_fold() {
        let rows = vec![
            joined(video_row(1, 1), Some(asset_row(1, "IMAGE"))),
            joined(video_row(1, 1), Some(asset_row(2, "BANNER"))),
        ];

        assert!(fold_rows(rows).is_err());
    }

    #[test]
    fn unknown_video_type_fails_the_whole_fold() {
        let mut row = video_row(1, 1);
        row.video_type = "SHORT".to_string();

        assert!(fold_rows(vec![joined(row, None)]).is_err());
    }
}
