use log::warn;

use crate::app::App;
use crate::models::booking::Booking;
use crate::models::notification::{Notification, count_unread};
use crate::models::user::User;
use crate::repositories::OFFLINE_MESSAGE;
use crate::use_cases::{GetBookingsSortedByDate, GetNotifications, ToggleNotificationRead};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HomeState {
    pub user: Option<User>,
    pub bookings: Vec<Booking>,
    pub notifications: Vec<Notification>,
    pub is_loading: bool,
    pub api_error: Option<String>,
    pub unread_notifications: usize,
    pub is_network_available: bool,
}

impl Default for HomeState {
    fn default() -> Self {
        HomeState {
            user: None,
            bookings: Vec::new(),
            notifications: Vec::new(),
            is_loading: true,
            api_error: None,
            unread_notifications: 0,
            is_network_available: true,
        }
    }
}

pub struct HomeHolder<'a> {
    app: &'a App,
    pub state: HomeState,
}

impl<'a> HomeHolder<'a> {
    pub fn new(app: &'a App) -> Self {
        HomeHolder {
            app,
            state: HomeState::default(),
        }
    }

    /// Load profile, bookings and notifications. Stops at the first failure
    /// and shows it; offline reads still fill the lists from the cache.
    pub fn load(&mut self) {
        self.state.is_loading = true;
        self.state.is_network_available = self.app.is_network_available();
        self.state.api_error = None;

        if let Err(message) = self.load_inner() {
            warn!("Home: {message}");
            self.state.api_error = Some(message);
        } else if !self.state.is_network_available {
            self.state.api_error = Some(OFFLINE_MESSAGE.to_string());
        }
        self.state.is_loading = false;
    }

    fn load_inner(&mut self) -> Result<(), String> {
        let user = self.app.get_user().execute().map_err(|e| e.to_string())?;
        let bookings = GetBookingsSortedByDate::new(&self.app.bookings)
            .execute(&user.id)
            .map_err(|e| e.to_string())?;
        let notifications = GetNotifications::new(&self.app.notifications)
            .execute(&user.id)
            .map_err(|e| e.to_string())?;

        self.state.unread_notifications = count_unread(&notifications);
        self.state.user = Some(user);
        self.state.bookings = bookings;
        self.state.notifications = notifications;
        Ok(())
    }

    /// Toggle the read flag of a notification the screen shows.
    pub fn on_notification_click(&mut self, notification_id: &str) {
        let Some(index) = self.state.notifications.iter().position(|n| n.id == notification_id) else {
            return;
        };
        match ToggleNotificationRead::new(&self.app.notifications).execute(&self.state.notifications[index]) {
            Ok(is_read) => {
                self.state.notifications[index].is_read = is_read;
                self.state.unread_notifications = count_unread(&self.state.notifications);
                self.state.api_error = None;
            }
            Err(e) => self.state.api_error = Some(e.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{Harness, fixtures};

    fn seeded() -> Harness {
        let h = Harness::signed_in("fg");
        h.booking_api.set_bookings(
            "fg",
            vec![
                fixtures::booking_dto("old", "2024-01-01T10:00:00"),
                fixtures::booking_dto("new", "2024-06-01T10:00:00"),
            ],
        );
        h.notification_api.set_notifications(
            "fg",
            vec![
                fixtures::notification_dto("n1", "2024-11-01T08:00:00", false),
                fixtures::notification_dto("n2", "2024-11-02T08:00:00", true),
            ],
        );
        h
    }

    #[test]
    fn load_fills_state() {
        let h = seeded();
        let mut home = HomeHolder::new(&h);

        home.load();

        let s = &home.state;
        assert!(!s.is_loading);
        assert_eq!(s.api_error, None);
        assert_eq!(s.user.as_ref().map(|u| u.id.as_str()), Some("fg"));
        assert_eq!(s.bookings.iter().map(|b| b.id.as_str()).collect::<Vec<_>>(), vec!["new", "old"]);
        assert_eq!(s.notifications.len(), 2);
        assert_eq!(s.unread_notifications, 1);
    }

    #[test]
    fn offline_load_shows_cached_data_and_advisory() {
        let h = seeded();
        HomeHolder::new(&h).load();
        h.network.set(false);

        let mut home = HomeHolder::new(&h);
        home.load();

        assert!(!home.state.is_network_available);
        assert_eq!(home.state.bookings.len(), 2);
        assert_eq!(home.state.api_error.as_deref(), Some(OFFLINE_MESSAGE));
    }

    #[test]
    fn load_failure_becomes_api_error() {
        let h = seeded();
        h.booking_api.fail_with(500, "boom");
        let mut home = HomeHolder::new(&h);
        home.load();
        assert_eq!(home.state.api_error.as_deref(), Some("Error fetching bookings: boom"));
        assert!(!home.state.is_loading);
    }

    #[test]
    fn clicking_notification_toggles_it() {
        let h = seeded();
        let mut home = HomeHolder::new(&h);
        home.load();

        home.on_notification_click("n1");

        assert_eq!(home.state.unread_notifications, 0);
        assert!(home.state.notifications.iter().all(|n| n.is_read));

        h.network.set(false);
        home.on_notification_click("n1");
        assert_eq!(home.state.api_error.as_deref(), Some(OFFLINE_MESSAGE));
    }
}
