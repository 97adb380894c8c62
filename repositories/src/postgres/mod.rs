pub mod assets;
mod codec;
pub mod initializer;
mod rows;
mod statements;
pub mod videos;

pub enum ConnectionDetails {
    Url(String),
}

#[derive(Debug, thiserror::Error)]
#[error("failed to initialize postgres {0} repo")]
pub struct RepoInitErr(&'static str);
impl RepoInitErr {
    fn videos() -> Self {
        Self("videos")
    }

    fn assets() -> Self {
        Self("assets")
    }
}

#[derive(Debug, thiserror::Error)]
#[error("failed to run postgres migrations")]
pub struct RepoMigrationErr;

/// Ids are unsigned in the domain but stored as `bigint`. Anything past
/// `i64::MAX` can't have been stored, so callers treat `None` as "doesn't exist".
fn to_db_id(id: u64) -> Option<i64> {
    i64::try_from(id).ok()
}
