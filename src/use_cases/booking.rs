use chrono::NaiveDate;
use std::collections::BTreeSet;

use crate::models::booking::{Booking, TimeSlot, sort_by_date_descending};
use crate::repositories::BookingRepository;
use crate::use_cases::{GetUser, UseCaseError};

pub struct GetBookingsSortedByDate<'a> {
    bookings: &'a BookingRepository,
}

impl<'a> GetBookingsSortedByDate<'a> {
    pub fn new(bookings: &'a BookingRepository) -> Self {
        GetBookingsSortedByDate { bookings }
    }

    pub fn execute(&self, user_id: &str) -> Result<Vec<Booking>, UseCaseError> {
        let mut bookings = self
            .bookings
            .get_all_bookings_from_user(user_id)
            .map_err(UseCaseError::FetchBookings)?;
        sort_by_date_descending(&mut bookings);
        Ok(bookings)
    }
}

/// Days on which at least one slot can still be booked.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectableDates {
    dates: BTreeSet<NaiveDate>,
}

impl SelectableDates {
    pub fn from_slots(slots: &[TimeSlot]) -> Self {
        SelectableDates {
            dates: slots.iter().filter(|s| s.available).map(|s| s.date.date()).collect(),
        }
    }

    pub fn is_selectable(&self, date: NaiveDate) -> bool {
        self.dates.contains(&date)
    }

    pub fn first(&self) -> Option<NaiveDate> {
        self.dates.first().copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = NaiveDate> + '_ {
        self.dates.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.dates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }
}

pub struct GetSelectableDates<'a> {
    bookings: &'a BookingRepository,
}

impl<'a> GetSelectableDates<'a> {
    pub fn new(bookings: &'a BookingRepository) -> Self {
        GetSelectableDates { bookings }
    }

    pub fn execute(&self) -> Result<SelectableDates, UseCaseError> {
        let days = self.bookings.get_available_days()?;
        Ok(SelectableDates::from_slots(&days))
    }
}

pub struct GetFreeTimeSlots<'a> {
    bookings: &'a BookingRepository,
}

impl<'a> GetFreeTimeSlots<'a> {
    pub fn new(bookings: &'a BookingRepository) -> Self {
        GetFreeTimeSlots { bookings }
    }

    pub fn execute(&self, date: NaiveDate) -> Result<Vec<TimeSlot>, UseCaseError> {
        Ok(self.bookings.get_free_time_slots_for_date(date)?)
    }
}

/// Book `slot` for the signed-in member.
pub struct CreateBooking<'a> {
    bookings: &'a BookingRepository,
    get_user: GetUser<'a>,
}

impl<'a> CreateBooking<'a> {
    pub fn new(bookings: &'a BookingRepository, get_user: GetUser<'a>) -> Self {
        CreateBooking { bookings, get_user }
    }

    pub fn execute(&self, slot: &TimeSlot) -> Result<(), UseCaseError> {
        let user_id = self.get_user.execute()?.id;
        self.bookings.create_booking(&slot.to_booking_dto(&user_id))?;
        Ok(())
    }
}

/// Move an existing booking to the date of `slot`.
pub struct UpdateBooking<'a> {
    bookings: &'a BookingRepository,
    get_user: GetUser<'a>,
}

impl<'a> UpdateBooking<'a> {
    pub fn new(bookings: &'a BookingRepository, get_user: GetUser<'a>) -> Self {
        UpdateBooking { bookings, get_user }
    }

    pub fn execute(&self, booking_id: &str, slot: &TimeSlot) -> Result<(), UseCaseError> {
        let user_id = self.get_user.execute()?.id;
        self.bookings
            .update_booking(booking_id, &user_id, &slot.to_booking_update_dto(booking_id))?;
        Ok(())
    }
}
