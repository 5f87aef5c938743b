use chrono::NaiveDate;
use log::{info, warn};

use crate::app::App;
use crate::models::booking::TimeSlot;
use crate::use_cases::{CreateBooking, GetFreeTimeSlots, GetSelectableDates, SelectableDates, UpdateBooking};

pub const SLOT_UNAVAILABLE_MESSAGE: &str = "This time slot is no longer available";
pub const DATE_NOT_SELECTABLE_MESSAGE: &str = "There are no free time slots on this date";

/// The same screen books a new slot or moves an existing booking.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BookingFormMode {
    Create,
    Update { booking_id: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookingFormState {
    pub mode: BookingFormMode,
    pub selectable_dates: SelectableDates,
    pub selected_date: Option<NaiveDate>,
    pub free_slots: Vec<TimeSlot>,
    pub is_loading: bool,
    pub api_error: Option<String>,
    pub confirmed: bool,
}

pub struct BookingFormHolder<'a> {
    app: &'a App,
    pub state: BookingFormState,
}

impl<'a> BookingFormHolder<'a> {
    pub fn new(app: &'a App, mode: BookingFormMode) -> Self {
        BookingFormHolder {
            app,
            state: BookingFormState {
                mode,
                selectable_dates: SelectableDates::default(),
                selected_date: None,
                free_slots: Vec::new(),
                is_loading: true,
                api_error: None,
                confirmed: false,
            },
        }
    }

    /// Fetch the bookable days and preselect the earliest one.
    pub fn load(&mut self) {
        self.state.is_loading = true;
        match GetSelectableDates::new(&self.app.bookings).execute() {
            Ok(dates) => {
                let first = dates.first();
                self.state.selectable_dates = dates;
                self.state.api_error = None;
                match first {
                    Some(date) => self.load_slots(date),
                    None => {
                        self.state.selected_date = None;
                        self.state.free_slots.clear();
                    }
                }
            }
            Err(e) => {
                warn!("Booking form: {e}");
                self.state.api_error = Some(e.to_string());
            }
        }
        self.state.is_loading = false;
    }

    pub fn on_date_selected(&mut self, date: NaiveDate) {
        if !self.state.selectable_dates.is_selectable(date) {
            self.state.api_error = Some(DATE_NOT_SELECTABLE_MESSAGE.to_string());
            return;
        }
        self.state.is_loading = true;
        self.load_slots(date);
        self.state.is_loading = false;
    }

    fn load_slots(&mut self, date: NaiveDate) {
        self.state.selected_date = Some(date);
        match GetFreeTimeSlots::new(&self.app.bookings).execute(date) {
            Ok(slots) => {
                self.state.free_slots = slots;
                self.state.api_error = None;
            }
            Err(e) => {
                self.state.free_slots.clear();
                self.state.api_error = Some(e.to_string());
            }
        }
    }

    /// Book or move to `slot`. Returns whether the server accepted it.
    pub fn on_confirm(&mut self, slot: &TimeSlot) -> bool {
        if !slot.available {
            self.state.api_error = Some(SLOT_UNAVAILABLE_MESSAGE.to_string());
            return false;
        }
        self.state.is_loading = true;
        let result = match &self.state.mode {
            BookingFormMode::Create => CreateBooking::new(&self.app.bookings, self.app.get_user()).execute(slot),
            BookingFormMode::Update { booking_id } => {
                UpdateBooking::new(&self.app.bookings, self.app.get_user()).execute(booking_id, slot)
            }
        };
        self.state.is_loading = false;
        match result {
            Ok(()) => {
                info!("Booked {} on {}", slot.slot, slot.date.date());
                self.state.confirmed = true;
                self.state.api_error = None;
                true
            }
            Err(e) => {
                self.state.api_error = Some(e.to_string());
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repositories::OFFLINE_MESSAGE;
    use crate::testing::{Harness, fixtures};

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 11, d).unwrap()
    }

    fn with_slots() -> Harness {
        let h = Harness::signed_in("fg");
        h.booking_api.set_slots(vec![
            fixtures::time_slot_dto("2024-11-07T00:00:00", "Morning", false),
            fixtures::time_slot_dto("2024-11-07T00:00:00", "Evening", true),
            fixtures::time_slot_dto("2024-11-09T00:00:00", "Afternoon", true),
        ]);
        h
    }

    #[test]
    fn load_preselects_first_free_day() {
        let h = with_slots();
        let mut form = BookingFormHolder::new(&h, BookingFormMode::Create);

        form.load();

        assert_eq!(form.state.selected_date, Some(day(7)));
        assert_eq!(form.state.free_slots.len(), 2);
        assert_eq!(form.state.selectable_dates.len(), 2);
        assert!(!form.state.is_loading);
    }

    #[test]
    fn picking_a_day_without_free_slots_is_refused() {
        let h = with_slots();
        let mut form = BookingFormHolder::new(&h, BookingFormMode::Create);
        form.load();

        form.on_date_selected(day(8));
        assert_eq!(form.state.api_error.as_deref(), Some(DATE_NOT_SELECTABLE_MESSAGE));
        assert_eq!(form.state.selected_date, Some(day(7)));

        form.on_date_selected(day(9));
        assert_eq!(form.state.selected_date, Some(day(9)));
        assert_eq!(form.state.free_slots[0].slot, "Afternoon");
        assert_eq!(form.state.api_error, None);
    }

    #[test]
    fn confirm_creates_booking() {
        let h = with_slots();
        let mut form = BookingFormHolder::new(&h, BookingFormMode::Create);
        form.load();
        let slot = form.state.free_slots.iter().find(|s| s.available).cloned().unwrap();

        assert!(form.on_confirm(&slot));

        assert!(form.state.confirmed);
        assert_eq!(h.booking_api.created()[0].time_slot.as_deref(), Some("Evening"));
    }

    #[test]
    fn taken_slot_is_not_sent() {
        let h = with_slots();
        let mut form = BookingFormHolder::new(&h, BookingFormMode::Create);
        form.load();
        let taken = fixtures::time_slot("2024-11-07T00:00:00", "Morning", false);

        assert!(!form.on_confirm(&taken));

        assert_eq!(form.state.api_error.as_deref(), Some(SLOT_UNAVAILABLE_MESSAGE));
        assert!(h.booking_api.created().is_empty());
    }

    #[test]
    fn update_mode_moves_existing_booking() {
        let h = with_slots();
        h.booking_api
            .set_bookings("fg", vec![fixtures::booking_dto("b1", "2024-11-01T09:00:00")]);
        let mut form = BookingFormHolder::new(
            &h,
            BookingFormMode::Update {
                booking_id: "b1".into(),
            },
        );
        form.load();

        assert!(form.on_confirm(&fixtures::time_slot("2024-11-09T00:00:00", "Afternoon", true)));

        assert!(h.booking_api.calls().contains(&"update_booking b1".to_string()));
        assert_eq!(h.cache.bookings_by_user("fg").unwrap()[0].date, "2024-11-09T00:00:00");
    }

    #[test]
    fn offline_load_shows_advisory() {
        let h = with_slots();
        h.network.set(false);
        let mut form = BookingFormHolder::new(&h, BookingFormMode::Create);
        form.load();
        assert_eq!(form.state.api_error.as_deref(), Some(OFFLINE_MESSAGE));
        assert!(form.state.selectable_dates.is_empty());
    }
}
