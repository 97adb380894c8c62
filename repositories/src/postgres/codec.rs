//! Stored representations of the closed enums. Decoding is strict: a code this
//! service didn't write fails the read instead of being guessed at.

use containers_core::model::{AssetKind, VideoType};
use error_stack::{IntoReport, Report, ResultExt};

#[derive(Debug, thiserror::Error)]
#[error("failed to decode stored {0}")]
pub struct DecodeError(pub(super) &'static str);

pub fn encode_asset_kind(kind: AssetKind) -> &'static str {
    match kind {
        AssetKind::Advertisement => "AD",
        AssetKind::Image => "IMAGE",
    }
}

pub fn decode_asset_kind(code: &str) -> Result<AssetKind, Report<DecodeError>> {
    match code {
        "AD" => Ok(AssetKind::Advertisement),
        "IMAGE" => Ok(AssetKind::Image),
        other => Err(DecodeError("asset type").into_report())
            .attach_with(|| format!("unrecognized asset type '{other}'")),
    }
}

pub fn encode_video_type(video_type: VideoType) -> &'static str {
    match video_type {
        VideoType::Clip => "CLIP",
        VideoType::Episode => "EPISODE",
        VideoType::Movie => "MOVIE",
    }
}

pub fn decode_video_type(code: &str) -> Result<VideoType, Report<DecodeError>> {
    match code {
        "CLIP" => Ok(VideoType::Clip),
        "EPISODE" => Ok(VideoType::Episode),
        "MOVIE" => Ok(VideoType::Movie),
        other => Err(DecodeError("video type").into_report())
            .attach_with(|| format!("unrecognized video type '{other}'")),
    }
}

pub fn decode_id(id: i64) -> Result<u64, Report<DecodeError>> {
    u64::try_from(id)
        .map_err(|_| DecodeError("id").into_report())
        .attach_with(|| format!("negative id {id}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn asset_kinds_survive_storage() {
        for kind in [AssetKind::Advertisement, AssetKind::Image] {
            assert_eq!(kind, decode_asset_kind(encode_asset_kind(kind)).unwrap());
        }
    }

    #[test]
    fn video_types_survive_storage() {
        for video_type in [VideoType::Clip, VideoType::Episode, VideoType::Movie] {
            assert_eq!(
                video_type,
                decode_video_type(encode_video_type(video_type)).unwrap()
            );
        }
    }

    #[test]
    fn unknown_asset_code_is_rejected_not_treated_as_image() {
        assert!(decode_asset_kind("VIDEO").is_err());
        assert!(decode_asset_kind("image").is_err());
        assert!(decode_asset_kind("").is_err());
    }

    #[test]
    fn unknown_video_code_is_rejected() {
        assert!(decode_video_type("TRAILER").is_err());
        assert!(decode_video_type("clip").is_err());
    }

    #[test]
    fn negative_ids_are_rejected() {
        assert_eq!(5, decode_id(5).unwrap());
        assert!(decode_id(-1).is_err());
    }
}
