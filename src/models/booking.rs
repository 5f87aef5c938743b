use chrono::NaiveDateTime;

use crate::db::models::LocalBooking;
use crate::models::api::{BookingDto, BookingUpdateDto, TimeSlotDto};
use crate::models::dates::{DateError, format_api_datetime, parse_api_datetime};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Booking {
    pub id: String,
    pub date: NaiveDateTime,
    pub time_slot: Option<String>,
    pub boat: Option<String>,
    pub battery: Option<String>,
    pub battery_user_first_name: Option<String>,
    pub battery_user_last_name: Option<String>,
    pub battery_user_email: Option<String>,
    pub battery_user_phone_number: Option<String>,
}

/// A bookable part of a day ("Morning", "Afternoon", "Evening").
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TimeSlot {
    pub date: NaiveDateTime,
    pub slot: String,
    pub available: bool,
}

/// Newest first; ties keep their incoming order.
pub fn sort_by_date_descending(bookings: &mut [Booking]) {
    bookings.sort_by(|a, b| b.date.cmp(&a.date));
}

impl BookingDto {
    pub fn to_booking(&self) -> Result<Booking, DateError> {
        let holder = self.battery.as_ref().and_then(|b| b.current_user.as_ref());
        Ok(Booking {
            id: self.id.clone().unwrap_or_default(),
            date: parse_api_datetime(&self.date)?,
            time_slot: self.time_slot.clone(),
            boat: self.boat.as_ref().map(|b| b.name.clone()),
            battery: self.battery.as_ref().map(|b| b.name.clone()),
            battery_user_first_name: holder.map(|u| u.first_name.clone()),
            battery_user_last_name: holder.map(|u| u.last_name.clone()),
            battery_user_email: holder.map(|u| u.email.clone()),
            battery_user_phone_number: holder.map(|u| u.phone_number.clone()),
        })
    }

    /// Cache row owned by `user_id`. The date string is stored untouched.
    pub fn to_local_booking(&self, user_id: &str) -> LocalBooking {
        let holder = self.battery.as_ref().and_then(|b| b.current_user.as_ref());
        LocalBooking {
            id: self.id.clone().unwrap_or_default(),
            date: self.date.clone(),
            time: self.time_slot.clone(),
            boat: self.boat.as_ref().map(|b| b.name.clone()),
            battery: self.battery.as_ref().map(|b| b.name.clone()),
            battery_user_first_name: holder.map(|u| u.first_name.clone()),
            battery_user_last_name: holder.map(|u| u.last_name.clone()),
            battery_user_email: holder.map(|u| u.email.clone()),
            battery_user_phone_number: holder.map(|u| u.phone_number.clone()),
            user_id: Some(user_id.to_string()),
        }
    }
}

impl LocalBooking {
    pub fn to_booking(&self) -> Result<Booking, DateError> {
        Ok(Booking {
            id: self.id.clone(),
            date: parse_api_datetime(&self.date)?,
            time_slot: self.time.clone(),
            boat: self.boat.clone(),
            battery: self.battery.clone(),
            battery_user_first_name: self.battery_user_first_name.clone(),
            battery_user_last_name: self.battery_user_last_name.clone(),
            battery_user_email: self.battery_user_email.clone(),
            battery_user_phone_number: self.battery_user_phone_number.clone(),
        })
    }
}

impl Booking {
    pub fn to_local_booking(&self, user_id: &str) -> LocalBooking {
        LocalBooking {
            id: self.id.clone(),
            date: format_api_datetime(&self.date),
            time: self.time_slot.clone(),
            boat: self.boat.clone(),
            battery: self.battery.clone(),
            battery_user_first_name: self.battery_user_first_name.clone(),
            battery_user_last_name: self.battery_user_last_name.clone(),
            battery_user_email: self.battery_user_email.clone(),
            battery_user_phone_number: self.battery_user_phone_number.clone(),
            user_id: Some(user_id.to_string()),
        }
    }
}

impl TimeSlotDto {
    pub fn to_time_slot(&self) -> Result<TimeSlot, DateError> {
        Ok(TimeSlot {
            date: parse_api_datetime(&self.date)?,
            slot: self.slot.clone(),
            available: self.available,
        })
    }
}

impl TimeSlot {
    /// New booking request for this slot.
    pub fn to_booking_dto(&self, user_id: &str) -> BookingDto {
        BookingDto {
            id: None,
            date: format_api_datetime(&self.date),
            time_slot: Some(self.slot.clone()),
            boat: None,
            battery: None,
            user_id: Some(user_id.to_string()),
        }
    }

    /// Move `booking_id` to this slot's date.
    pub fn to_booking_update_dto(&self, booking_id: &str) -> BookingUpdateDto {
        BookingUpdateDto {
            id: Some(booking_id.to_string()),
            date: format_api_datetime(&self.date),
        }
    }
}
