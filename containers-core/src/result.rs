use error_stack::Report;

pub type RepoResult<T, E> = Result<T, Report<E>>;
pub type OptRepoResult<T, E> = Result<Option<T>, Report<E>>;

#[derive(Debug, thiserror::Error, PartialEq, Eq, Copy, Clone)]
pub enum VideoRepoError {
    #[error("failed to list videos: {0}")]
    List(Reason),
    #[error("failed to get video: {0}")]
    Get(Reason),
    #[error("failed to create video: {0}")]
    Create(Reason),
    #[error("failed to patch video: {0}")]
    Patch(Reason),
    #[error("failed to delete video: {0}")]
    Delete(Reason),
}

impl VideoRepoError {
    pub fn reason(&self) -> Reason {
        match self {
            VideoRepoError::List(r)
            | VideoRepoError::Get(r)
            | VideoRepoError::Create(r)
            | VideoRepoError::Patch(r)
            | VideoRepoError::Delete(r) => *r,
        }
    }
}

#[derive(Debug, thiserror::Error, PartialEq, Eq, Copy, Clone)]
pub enum AssetRepoError {
    #[error("failed to get asset: {0}")]
    Get(Reason),
    #[error("failed to create asset: {0}")]
    Create(Reason),
    #[error("failed to patch asset: {0}")]
    Patch(Reason),
    #[error("failed to delete asset: {0}")]
    Delete(Reason),
}

impl AssetRepoError {
    pub fn reason(&self) -> Reason {
        match self {
            AssetRepoError::Get(r)
            | AssetRepoError::Create(r)
            | AssetRepoError::Patch(r)
            | AssetRepoError::Delete(r) => *r,
        }
    }
}

#[derive(Debug, thiserror::Error, PartialEq, Eq, Copy, Clone)]
pub enum Reason {
    #[error("video associated with asset was not found")]
    VideoNotFound,
    #[error("database call failed")]
    Db,
    #[error("stored value could not be decoded")]
    Decode,
    #[error("input failed validation")]
    Validation,
}
