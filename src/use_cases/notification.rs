use crate::models::notification::Notification;
use crate::repositories::NotificationRepository;
use crate::use_cases::UseCaseError;

pub struct GetNotifications<'a> {
    notifications: &'a NotificationRepository,
}

impl<'a> GetNotifications<'a> {
    pub fn new(notifications: &'a NotificationRepository) -> Self {
        GetNotifications { notifications }
    }

    pub fn execute(&self, user_id: &str) -> Result<Vec<Notification>, UseCaseError> {
        self.notifications
            .get_all_notifications_from_user(user_id)
            .map_err(UseCaseError::FetchNotifications)
    }
}

pub struct ToggleNotificationRead<'a> {
    notifications: &'a NotificationRepository,
}

impl<'a> ToggleNotificationRead<'a> {
    pub fn new(notifications: &'a NotificationRepository) -> Self {
        ToggleNotificationRead { notifications }
    }

    /// Returns the flag now stored.
    pub fn execute(&self, notification: &Notification) -> Result<bool, UseCaseError> {
        Ok(self
            .notifications
            .toggle_notification_read_status(&notification.id, notification.is_read)?)
    }
}
