//! Reshapes flat video rows into the nested container view.
//!
//! Everything in here is a pure transform: no I/O, no failure paths, no reordering.
//! Assets keep the order their video lists them in and videos keep the order the
//! data layer returned them in.

use crate::model::{Asset, AssetKind, Container, ContainerId, Video, VideoView};
use std::collections::HashMap;

/// Builds the container for `container_id` out of `videos`, which are expected to
/// all carry that container id. An empty `videos` still produces a container,
/// just with nothing in it.
pub fn build_container<I>(container_id: ContainerId, videos: I) -> Container
where
    I: IntoIterator<Item = Video>,
{
    let mut builder = ContainerBuilder::new(container_id);
    for video in videos {
        builder.push(video);
    }
    builder.build()
}

/// Groups `videos` by container id and builds one container per distinct id.
///
/// Containers come back in the order their id is first seen in `videos`. A
/// container id with no videos never shows up here.
pub fn build_all_containers<I>(videos: I) -> Vec<Container>
where
    I: IntoIterator<Item = Video>,
{
    let mut positions: HashMap<ContainerId, usize> = HashMap::new();
    let mut builders: Vec<ContainerBuilder> = Vec::new();

    for video in videos {
        let idx = *positions.entry(video.container_id).or_insert_with(|| {
            builders.push(ContainerBuilder::new(video.container_id));
            builders.len() - 1
        });
        builders[idx].push(video);
    }

    builders.into_iter().map(ContainerBuilder::build).collect()
}

/// `container-<id>`, then `_ads` if there are advertisements, `_images` if there
/// are images, and always `_videos`.
pub fn synthesize_name(container_id: ContainerId, advertisements: &[Asset], images: &[Asset]) -> String {
    let mut name = format!("container-{container_id}");
    if !advertisements.is_empty() {
        name.push_str("_ads");
    }
    if !images.is_empty() {
        name.push_str("_images");
    }
    name.push_str("_videos");
    name
}

/// Only the assets of `kind` across all `videos`, flattened in video-then-asset order.
pub fn project_assets_by_kind<I>(videos: I, kind: AssetKind) -> Vec<Asset>
where
    I: IntoIterator<Item = Video>,
{
    let mut advertisements = Vec::new();
    let mut images = Vec::new();
    for video in videos {
        partition_assets(video.assets, &mut advertisements, &mut images);
    }

    match kind {
        AssetKind::Advertisement => advertisements,
        AssetKind::Image => images,
    }
}

pub fn project_videos<I>(videos: I) -> Vec<VideoView>
where
    I: IntoIterator<Item = Video>,
{
    videos.into_iter().map(|v| VideoView::from(&v)).collect()
}

struct ContainerBuilder {
    id: ContainerId,
    advertisements: Vec<Asset>,
    images: Vec<Asset>,
    videos: Vec<VideoView>,
}

impl ContainerBuilder {
    fn new(id: ContainerId) -> Self {
        Self {
            id,
            advertisements: Vec::new(),
            images: Vec::new(),
            videos: Vec::new(),
        }
    }

    fn push(&mut self, video: Video) {
        let (view, assets) = split_video(video);
        partition_assets(assets, &mut self.advertisements, &mut self.images);
        self.videos.push(view);
    }

    fn build(self) -> Container {
        Container {
            name: synthesize_name(self.id, &self.advertisements, &self.images),
            id: self.id,
            advertisements: self.advertisements,
            images: self.images,
            videos: self.videos,
        }
    }
}

/// The one place assets are classified. Every aggregation goes through here.
fn partition_assets(assets: Vec<Asset>, advertisements: &mut Vec<Asset>, images: &mut Vec<Asset>) {
    for asset in assets {
        match asset.kind {
            AssetKind::Advertisement => advertisements.push(asset),
            AssetKind::Image => images.push(asset),
        }
    }
}

fn split_video(mut video: Video) -> (VideoView, Vec<Asset>) {
    let view = VideoView::from(&video);
    (view, std::mem::take(&mut video.assets))
}
