use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

pub type ContainerId = u64;
pub type VideoId = u64;
pub type AssetId = u64;

#[derive(Debug, Serialize, Deserialize, ToSchema, Copy, Clone, PartialEq, Eq, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AssetKind {
    Advertisement,
    Image,
}

#[derive(Debug, Serialize, Deserialize, ToSchema, Copy, Clone, PartialEq, Eq, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum VideoType {
    Clip,
    Episode,
    Movie,
}

/// An advertisement or image owned by exactly one video.
#[derive(Debug, Serialize, Deserialize, ToSchema, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Asset {
    pub id: AssetId,
    pub name: String,
    pub url: String,
    #[serde(rename = "assetType")]
    pub kind: AssetKind,
}

impl Asset {
    pub fn new(id: AssetId, name: impl Into<String>, url: impl Into<String>, kind: AssetKind) -> Self {
        Self {
            id,
            name: name.into(),
            url: url.into(),
            kind,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Video {
    pub id: VideoId,
    pub container_id: ContainerId,
    pub title: String,
    pub description: String,
    pub expiration_date: String,
    pub playback_url: String,
    pub video_type: VideoType,
    pub assets: Vec<Asset>,
}

/// A video as it appears inside a container: assets are reduced to their ids,
/// in the order the video owns them.
#[derive(Debug, Serialize, Deserialize, ToSchema, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct VideoView {
    pub id: VideoId,
    pub container_id: ContainerId,
    pub title: String,
    pub description: String,
    pub expiration_date: String,
    pub playback_url: String,
    pub video_type: VideoType,
    pub assets: Vec<AssetId>,
}

impl From<&Video> for VideoView {
    fn from(video: &Video) -> Self {
        Self {
            id: video.id,
            container_id: video.container_id,
            title: video.title.clone(),
            description: video.description.clone(),
            expiration_date: video.expiration_date.clone(),
            playback_url: video.playback_url.clone(),
            video_type: video.video_type,
            assets: video.assets.iter().map(|a| a.id).collect(),
        }
    }
}

/// Videos sharing a container id, with every asset they own split by kind.
/// Containers are never stored; they are derived from video rows on each request.
#[derive(Debug, Serialize, Deserialize, ToSchema, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Container {
    pub id: ContainerId,
    pub name: String,
    pub advertisements: Vec<Asset>,
    pub images: Vec<Asset>,
    pub videos: Vec<VideoView>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewVideo {
    pub container_id: ContainerId,
    pub title: String,
    pub description: String,
    pub expiration_date: String,
    pub playback_url: String,
    pub video_type: VideoType,
}

/// `None` leaves the stored value untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PatchVideo {
    pub container_id: Option<ContainerId>,
    pub title: Option<String>,
    pub description: Option<String>,
    pub expiration_date: Option<String>,
    pub playback_url: Option<String>,
    pub video_type: Option<VideoType>,
}

impl PatchVideo {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewAsset {
    pub video_id: VideoId,
    pub name: String,
    pub url: String,
    pub kind: AssetKind,
}

/// `None` leaves the stored value untouched. Setting `video_id` moves the asset
/// to another video.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PatchAsset {
    pub video_id: Option<VideoId>,
    pub name: Option<String>,
    pub url: Option<String>,
    pub kind: Option<AssetKind>,
}

impl PatchAsset {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}
