//! Remote-then-cache orchestration, one repository per entity.
//!
//! Reads refresh the local mirror when the network is up and then always
//! answer from the mirror, so online and offline reads share one mapping
//! path. Writes need the network and fail with [`RepositoryError::Offline`]
//! otherwise.

pub mod booking;
pub mod notification;
pub mod user;

pub use booking::BookingRepository;
pub use notification::NotificationRepository;
pub use user::UserRepository;

use thiserror::Error;

use crate::client::ApiError;
use crate::db::CacheError;
use crate::models::MappingError;
use crate::models::dates::DateError;

/// Advisory shown when a call needs the network and there is none.
pub const OFFLINE_MESSAGE: &str = "You appear to be offline. Displaying local data until reconnection. \n You will not be able to create a new booking, edit a booking or edit your personal data.";

#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("{}", OFFLINE_MESSAGE)]
    Offline,
    #[error(transparent)]
    Api(#[from] ApiError),
    #[error(transparent)]
    Cache(#[from] CacheError),
    #[error(transparent)]
    Mapping(#[from] MappingError),
}

impl From<DateError> for RepositoryError {
    fn from(value: DateError) -> Self {
        RepositoryError::Mapping(MappingError::Date(value))
    }
}

impl RepositoryError {
    pub fn is_offline(&self) -> bool {
        matches!(self, RepositoryError::Offline)
    }
}
