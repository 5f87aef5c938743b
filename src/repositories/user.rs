use log::{debug, info, warn};
use std::rc::Rc;

use crate::client::UserApi;
use crate::connectivity::NetworkConnectivity;
use crate::db::Cache;
use crate::models::api::{PutUserDto, UserDto};
use crate::models::user::User;
use crate::repositories::RepositoryError;

pub struct UserRepository {
    api: Box<dyn UserApi>,
    cache: Rc<Cache>,
    network: Box<dyn NetworkConnectivity>,
}

impl UserRepository {
    pub fn new(api: impl UserApi + 'static, cache: Rc<Cache>, network: impl NetworkConnectivity + 'static) -> Self {
        UserRepository {
            api: Box::new(api),
            cache,
            network: Box::new(network),
        }
    }

    /// Profile of `id`. A cached row wins without touching the network; a
    /// miss is fetched when online and otherwise answered with the offline
    /// placeholder. An empty id (nobody signed in) gets the placeholder too.
    /// Once mirrored, a profile is only refreshed by `update_user`; reads
    /// never go back to the server for it.
    pub fn get_user(&self, id: &str) -> Result<User, RepositoryError> {
        if let Some(row) = self.cache.user_by_id(id)? {
            return Ok(row.to_user()?);
        }
        if id.is_empty() || !self.network.is_network_available() {
            debug!("Users: no cached profile for '{id}', using placeholder");
            return Ok(User::offline_placeholder());
        }
        let remote = self.api.get_user(id).map_err(|e| {
            warn!("Users: fetching {id} failed: {e}");
            e
        })?;
        let row = remote.to_local_user()?;
        self.cache.upsert_user(&row)?;
        Ok(row.to_user()?)
    }

    pub fn register_user(&self, user: &UserDto) -> Result<(), RepositoryError> {
        self.require_network()?;
        self.api.register_user(user)?;
        info!("Users: registered {}", user.email);
        Ok(())
    }

    /// Push the changes, then re-read the server's copy into the mirror.
    pub fn update_user(&self, user: &PutUserDto) -> Result<User, RepositoryError> {
        self.require_network()?;
        self.api.update_user(user)?;
        let remote = self.api.get_user(&user.id)?;
        let row = remote.to_local_user()?;
        self.cache.upsert_user(&row)?;
        Ok(row.to_user()?)
    }

    /// Push the changes without touching the mirror.
    pub fn update_remote_user(&self, user: &PutUserDto) -> Result<(), RepositoryError> {
        self.require_network()?;
        self.api.update_user(user)?;
        Ok(())
    }

    /// Drop the cached profile. Returns whether one was present.
    pub fn delete_user(&self, user: &User) -> Result<bool, RepositoryError> {
        Ok(self.cache.delete_user(&user.id)?)
    }

    fn require_network(&self) -> Result<(), RepositoryError> {
        if self.network.is_network_available() {
            Ok(())
        } else {
            Err(RepositoryError::Offline)
        }
    }
}
