use adapter::ApiError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SectionError {
    #[error(transparent)]
    Api(#[from] ApiError),
    /// The change was saved, only the refreshed listing could not be fetched.
    #[error("saved, but reloading comments failed: {0}")]
    Reload(#[source] ApiError),
    #[error("no board loaded")]
    NotLoaded,
    #[error("comment content is empty")]
    EmptyContent,
}
