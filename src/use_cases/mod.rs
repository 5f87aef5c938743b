//! Single-operation wrappers the view-state holders call into.

pub mod booking;
pub mod notification;
pub mod user;

pub use booking::{CreateBooking, GetBookingsSortedByDate, GetFreeTimeSlots, GetSelectableDates, SelectableDates, UpdateBooking};
pub use notification::{GetNotifications, ToggleNotificationRead};
pub use user::{GetUser, Login, Logout, RegisterUser, UpdateUser};

use thiserror::Error;

use crate::auth::AuthError;
use crate::repositories::RepositoryError;
use crate::session::SessionError;

#[derive(Debug, Error)]
pub enum UseCaseError {
    #[error("Error fetching bookings: {0}")]
    FetchBookings(#[source] RepositoryError),
    #[error("Error fetching notifications: {0}")]
    FetchNotifications(#[source] RepositoryError),
    #[error("Error updating user: {0}")]
    UpdateUser(#[source] RepositoryError),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
    #[error(transparent)]
    Session(#[from] SessionError),
    #[error(transparent)]
    Auth(#[from] AuthError),
}

impl UseCaseError {
    pub fn is_offline(&self) -> bool {
        match self {
            UseCaseError::FetchBookings(e)
            | UseCaseError::FetchNotifications(e)
            | UseCaseError::UpdateUser(e)
            | UseCaseError::Repository(e) => e.is_offline(),
            _ => false,
        }
    }
}
