//! Constructor wiring: one `App` per thread, built from `Config`.

use log::info;
use std::rc::Rc;
use thiserror::Error;

use crate::auth::AuthClient;
use crate::client::{BookingApi, BuutClient, NotificationApi, UserApi};
use crate::config::Config;
use crate::connectivity::{NetworkConnectivity, TcpProbe};
use crate::db::{Cache, CacheError};
use crate::repositories::{BookingRepository, NotificationRepository, UserRepository};
use crate::session::SessionStore;
use crate::use_cases::GetUser;
use crate::validation::Validator;

#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Cache(#[from] CacheError),
    #[error("BUUT_API_URL '{0}' has no host")]
    InvalidApiUrl(String),
    #[error("validation patterns failed to compile: {0}")]
    Validator(#[from] regex::Error),
    #[error("spawning {name} thread failed: {source}")]
    Thread {
        name: &'static str,
        #[source]
        source: std::io::Error,
    },
}

pub struct App {
    pub session: SessionStore,
    pub cache: Rc<Cache>,
    pub users: UserRepository,
    pub bookings: BookingRepository,
    pub notifications: NotificationRepository,
    /// Present when an Auth0 tenant is configured.
    pub auth: Option<AuthClient>,
    pub network: Box<dyn NetworkConnectivity>,
    pub validator: Validator,
}

impl App {
    pub fn new<N>(
        session: SessionStore,
        cache: Rc<Cache>,
        user_api: impl UserApi + 'static,
        booking_api: impl BookingApi + 'static,
        notification_api: impl NotificationApi + 'static,
        network: N,
        auth: Option<AuthClient>,
    ) -> Result<Self, AppError>
    where
        N: NetworkConnectivity + Clone + 'static,
    {
        Ok(App {
            users: UserRepository::new(user_api, cache.clone(), network.clone()),
            bookings: BookingRepository::new(booking_api, cache.clone(), network.clone()),
            notifications: NotificationRepository::new(notification_api, cache.clone(), network.clone()),
            network: Box::new(network),
            session,
            cache,
            auth,
            validator: Validator::new()?,
        })
    }

    pub fn from_config(config: &Config) -> Result<Self, AppError> {
        let session = SessionStore::new(&config.session_file);
        let cache = Rc::new(Cache::open(&config.cache_path)?);
        let auth = config
            .auth0
            .as_ref()
            .map(|a| AuthClient::new(&a.domain, a.client_id.clone(), a.audience.clone(), config.http_timeout));
        let client = BuutClient::new(&config.api_url, session.clone(), auth.clone(), config.http_timeout);
        let probe = TcpProbe::for_base_url(&config.api_url, config.connectivity_timeout)
            .ok_or_else(|| AppError::InvalidApiUrl(config.api_url.clone()))?;
        info!(
            "Wired API {} (cache={}, session={}, auth={})",
            client.base_url(),
            config.cache_path,
            config.session_file,
            if auth.is_some() { "auth0" } else { "none" }
        );
        App::new(session, cache, client.clone(), client.clone(), client, probe, auth)
    }

    pub fn get_user(&self) -> GetUser<'_> {
        GetUser::new(&self.users, &self.session)
    }

    pub fn is_network_available(&self) -> bool {
        self.network.is_network_available()
    }
}
