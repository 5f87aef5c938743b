use chrono::NaiveDateTime;

use crate::db::models::LocalNotification;
use crate::models::api::NotificationDto;
use crate::models::dates::{DateError, parse_api_datetime};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub id: String,
    pub user_id: String,
    pub title: String,
    pub message: String,
    pub notification_type: String,
    pub is_read: bool,
    pub created_at: NaiveDateTime,
}

pub fn count_unread(notifications: &[Notification]) -> usize {
    notifications.iter().filter(|n| !n.is_read).count()
}

impl NotificationDto {
    /// Cache row for `user_id`; the owner comes from the request, not the payload.
    pub fn to_local_notification(&self, user_id: &str) -> LocalNotification {
        LocalNotification {
            id: self.id.clone(),
            user_id: user_id.to_string(),
            title: self.title.clone(),
            message: self.message.clone(),
            notification_type: self.notification_type.clone(),
            is_read: self.is_read,
            created_at: self.created_at.clone(),
        }
    }
}

impl LocalNotification {
    pub fn to_notification(&self) -> Result<Notification, DateError> {
        Ok(Notification {
            id: self.id.clone(),
            user_id: self.user_id.clone(),
            title: self.title.clone(),
            message: self.message.clone(),
            notification_type: self.notification_type.clone(),
            is_read: self.is_read,
            created_at: parse_api_datetime(&self.created_at)?,
        })
    }
}
