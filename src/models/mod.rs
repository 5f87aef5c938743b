pub mod api;
pub mod booking;
pub mod dates;
pub mod notification;
pub mod user;

use thiserror::Error;

/// Failure turning a transport or cache record into a domain model.
#[derive(Debug, Error)]
pub enum MappingError {
    #[error(transparent)]
    Date(#[from] dates::DateError),
    #[error("invalid role list: {0}")]
    Roles(#[from] serde_json::Error),
    #[error("unknown street '{0}'")]
    Street(String),
}
