use chrono::NaiveDate;
use log::{debug, warn};
use std::rc::Rc;

use crate::client::BookingApi;
use crate::connectivity::NetworkConnectivity;
use crate::db::Cache;
use crate::models::api::{BookingDto, BookingUpdateDto};
use crate::models::booking::{Booking, TimeSlot};
use crate::repositories::RepositoryError;

pub struct BookingRepository {
    api: Box<dyn BookingApi>,
    cache: Rc<Cache>,
    network: Box<dyn NetworkConnectivity>,
}

impl BookingRepository {
    pub fn new(
        api: impl BookingApi + 'static,
        cache: Rc<Cache>,
        network: impl NetworkConnectivity + 'static,
    ) -> Self {
        BookingRepository {
            api: Box::new(api),
            cache,
            network: Box::new(network),
        }
    }

    /// Bookings of `user_id` in cache order. Refreshes the mirror first when
    /// online; a failed refresh is an error, not a silent fallback.
    pub fn get_all_bookings_from_user(&self, user_id: &str) -> Result<Vec<Booking>, RepositoryError> {
        if self.network.is_network_available() {
            self.refresh_bookings(user_id)?;
        } else {
            debug!("Bookings: offline, serving cache for {user_id}");
        }
        let rows = self.cache.bookings_by_user(user_id)?;
        let bookings = rows.iter().map(|r| r.to_booking()).collect::<Result<Vec<_>, _>>()?;
        Ok(bookings)
    }

    /// Overwrite the mirror for `user_id` with the server's list.
    pub fn refresh_bookings(&self, user_id: &str) -> Result<usize, RepositoryError> {
        let remote = self.api.get_all_bookings_from_user(user_id).map_err(|e| {
            warn!("Bookings: refresh for {user_id} failed: {e}");
            e
        })?;
        let rows = remote.iter().map(|b| b.to_local_booking(user_id)).collect::<Vec<_>>();
        let stored = self.cache.replace_bookings_for_user(user_id, &rows)?;
        debug!("Bookings: cached {stored} for {user_id}");
        Ok(stored)
    }

    pub fn get_available_days(&self) -> Result<Vec<TimeSlot>, RepositoryError> {
        self.require_network()?;
        let days = self.api.get_available_days()?;
        Ok(days.iter().map(|d| d.to_time_slot()).collect::<Result<Vec<_>, _>>()?)
    }

    /// Free slots on one day.
    pub fn get_free_time_slots_for_date(&self, date: NaiveDate) -> Result<Vec<TimeSlot>, RepositoryError> {
        self.require_network()?;
        let slots = self.api.get_free_time_slots_in_range(date, date)?;
        Ok(slots.iter().map(|s| s.to_time_slot()).collect::<Result<Vec<_>, _>>()?)
    }

    pub fn create_booking(&self, booking: &BookingDto) -> Result<(), RepositoryError> {
        self.require_network()?;
        self.api.create_booking(booking)?;
        self.refresh_bookings(booking.user_id.as_deref().unwrap_or_default())?;
        Ok(())
    }

    pub fn update_booking(
        &self,
        booking_id: &str,
        user_id: &str,
        booking: &BookingUpdateDto,
    ) -> Result<(), RepositoryError> {
        self.require_network()?;
        self.api.update_booking(booking_id, booking)?;
        self.refresh_bookings(user_id)?;
        Ok(())
    }

    fn require_network(&self) -> Result<(), RepositoryError> {
        if self.network.is_network_available() {
            Ok(())
        } else {
            Err(RepositoryError::Offline)
        }
    }
}
