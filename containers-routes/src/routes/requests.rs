use containers_core::model::{
    AssetKind, ContainerId, NewAsset, NewVideo, PatchAsset, PatchVideo, VideoId, VideoType,
};
use optional_field::{Field, serde_optional_fields};
use serde::Deserialize;
use utoipa::openapi::{RefOr, Schema};
use utoipa::{PartialSchema, ToSchema};

fn nullable_string_schema() -> impl Into<RefOr<Schema>> {
    <Option<String> as PartialSchema>::schema()
}

fn nullable_id_schema() -> impl Into<RefOr<Schema>> {
    <Option<u64> as PartialSchema>::schema()
}

fn nullable_video_type_schema() -> impl Into<RefOr<Schema>> {
    <Option<VideoType> as PartialSchema>::schema()
}

fn nullable_asset_kind_schema() -> impl Into<RefOr<Schema>> {
    <Option<AssetKind> as PartialSchema>::schema()
}

/// A patch field that was sent as an explicit `null`. None of the patchable
/// fields can be cleared, so this is always rejected.
#[derive(Debug, PartialEq, Eq)]
pub struct NullField(pub &'static str);

impl NullField {
    pub fn message(&self) -> String {
        format!("'{}' cannot be null", self.0)
    }
}

fn non_null<T>(field: Field<T>, name: &'static str) -> Result<Option<T>, NullField> {
    match field {
        Field::Missing => Ok(None),
        Field::Present(Some(value)) => Ok(Some(value)),
        Field::Present(None) => Err(NullField(name)),
    }
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateVideoRequest {
    pub container_id: ContainerId,
    pub title: String,
    pub description: String,
    pub expiration_date: String,
    pub playback_url: String,
    pub video_type: VideoType,
}

impl From<CreateVideoRequest> for NewVideo {
    fn from(req: CreateVideoRequest) -> Self {
        NewVideo {
            container_id: req.container_id,
            title: req.title,
            description: req.description,
            expiration_date: req.expiration_date,
            playback_url: req.playback_url,
            video_type: req.video_type,
        }
    }
}

/// Fields left out are not updated. None of them may be set to null.
#[serde_optional_fields]
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct VideoPatchRequest {
    /// Moves the video to another container.
    #[schema(schema_with = nullable_id_schema)]
    pub container_id: Field<ContainerId>,
    #[schema(schema_with = nullable_string_schema)]
    pub title: Field<String>,
    #[schema(schema_with = nullable_string_schema)]
    pub description: Field<String>,
    #[schema(schema_with = nullable_string_schema)]
    pub expiration_date: Field<String>,
    #[schema(schema_with = nullable_string_schema)]
    pub playback_url: Field<String>,
    #[schema(schema_with = nullable_video_type_schema)]
    pub video_type: Field<VideoType>,
}

impl TryFrom<VideoPatchRequest> for PatchVideo {
    type Error = NullField;

    fn try_from(req: VideoPatchRequest) -> Result<Self, Self::Error> {
        Ok(PatchVideo {
            container_id: non_null(req.container_id, "containerId")?,
            title: non_null(req.title, "title")?,
            description: non_null(req.description, "description")?,
            expiration_date: non_null(req.expiration_date, "expirationDate")?,
            playback_url: non_null(req.playback_url, "playbackUrl")?,
            video_type: non_null(req.video_type, "videoType")?,
        })
    }
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateAssetRequest {
    pub video_id: VideoId,
    pub name: String,
    pub url: String,
    pub asset_type: AssetKind,
}

impl From<CreateAssetRequest> for NewAsset {
    fn from(req: CreateAssetRequest) -> Self {
        NewAsset {
            video_id: req.video_id,
            name: req.name,
            url: req.url,
            kind: req.asset_type,
        }
    }
}

/// Fields left out are not updated. None of them may be set to null.
#[serde_optional_fields]
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AssetPatchRequest {
    /// Moves the asset to another video.
    #[schema(schema_with = nullable_id_schema)]
    pub video_id: Field<VideoId>,
    #[schema(schema_with = nullable_string_schema)]
    pub name: Field<String>,
    #[schema(schema_with = nullable_string_schema)]
    pub url: Field<String>,
    #[schema(schema_with = nullable_asset_kind_schema)]
    pub asset_type: Field<AssetKind>,
}

impl TryFrom<AssetPatchRequest> for PatchAsset {
    type Error = NullField;

    fn try_from(req: AssetPatchRequest) -> Result<Self, Self::Error> {
        Ok(PatchAsset {
            video_id: non_null(req.video_id, "videoId")?,
            name: non_null(req.name, "name")?,
            url: non_null(req.url, "url")?,
            kind: non_null(req.asset_type, "assetType")?,
        })
    }
}
