use log::{debug, warn};
use std::rc::Rc;

use crate::client::NotificationApi;
use crate::connectivity::NetworkConnectivity;
use crate::db::Cache;
use crate::models::api::NotificationIsReadDto;
use crate::models::notification::Notification;
use crate::repositories::RepositoryError;

pub struct NotificationRepository {
    api: Box<dyn NotificationApi>,
    cache: Rc<Cache>,
    network: Box<dyn NetworkConnectivity>,
}

impl NotificationRepository {
    pub fn new(
        api: impl NotificationApi + 'static,
        cache: Rc<Cache>,
        network: impl NetworkConnectivity + 'static,
    ) -> Self {
        NotificationRepository {
            api: Box::new(api),
            cache,
            network: Box::new(network),
        }
    }

    /// Notifications of `user_id`, newest first.
    pub fn get_all_notifications_from_user(&self, user_id: &str) -> Result<Vec<Notification>, RepositoryError> {
        if self.network.is_network_available() {
            self.refresh_notifications(user_id)?;
        }
        let rows = self.cache.notifications_by_user(user_id)?;
        let mut notifications = rows
            .iter()
            .map(|r| r.to_notification())
            .collect::<Result<Vec<_>, _>>()?;
        notifications.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(notifications)
    }

    pub fn refresh_notifications(&self, user_id: &str) -> Result<usize, RepositoryError> {
        let remote = self.api.get_all_notifications_from_user(user_id).map_err(|e| {
            warn!("Notifications: refresh for {user_id} failed: {e}");
            e
        })?;
        let rows = remote
            .iter()
            .map(|n| n.to_local_notification(user_id))
            .collect::<Vec<_>>();
        let stored = self.cache.replace_notifications_for_user(user_id, &rows)?;
        debug!("Notifications: cached {stored} for {user_id}");
        Ok(stored)
    }

    /// Flip the read flag on the server, then mirror it locally. Returns the
    /// new flag.
    pub fn toggle_notification_read_status(
        &self,
        notification_id: &str,
        current_status: bool,
    ) -> Result<bool, RepositoryError> {
        if !self.network.is_network_available() {
            return Err(RepositoryError::Offline);
        }
        let is_read = !current_status;
        self.api.mark_notification_read(&NotificationIsReadDto {
            notification_id: notification_id.to_string(),
            is_read,
        })?;
        if !self.cache.set_notification_read(notification_id, is_read)? {
            debug!("Notifications: {notification_id} not cached, nothing to mirror");
        }
        Ok(is_read)
    }
}
