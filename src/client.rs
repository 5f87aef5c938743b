//! Blocking HTTP client for the Buut REST API.
//!
//! - One `ureq` agent per client; non-2xx statuses are read as responses, not
//!   transport errors, so the body can be surfaced as the error message.
//! - Bearer token comes from the persisted session on every call.
//! - On 401 the session is refreshed through Auth0 once and the call retried.
//!
//! The three `*Api` traits are the seam the repositories are written against.

use chrono::NaiveDate;
use http::StatusCode;
use log::{debug, info, warn};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::time::Duration;
use thiserror::Error;

use crate::auth::{AuthClient, AuthError};
use crate::models::api::{
    AvailableDaysDto, BookingDto, BookingUpdateDto, NotificationDto, NotificationIsReadDto, PutUserDto, RemoteUser,
    TimeSlotDto, UserDto,
};
use crate::models::dates::format_api_date;
use crate::session::{Session, SessionError, SessionStore};

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("transport error: {0}")]
    Transport(String),
    /// `message` is the response body as sent by the server.
    #[error("{message}")]
    Http { status: u16, message: String },
    #[error("unexpected response: {0}")]
    Json(#[from] serde_path_to_error::Error<serde_json::Error>),
    #[error("cannot encode request: {0}")]
    Encode(#[source] serde_json::Error),
    #[error(transparent)]
    Session(#[from] SessionError),
    #[error(transparent)]
    Auth(#[from] AuthError),
}

impl ApiError {
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Http { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// Message for a failed call: the body text, or a stock phrase when empty.
pub fn api_error_message(body: &str) -> String {
    let trimmed = body.trim();
    if trimmed.is_empty() {
        "Unknown error".to_string()
    } else {
        trimmed.to_string()
    }
}

pub trait UserApi {
    fn register_user(&self, user: &UserDto) -> Result<(), ApiError>;
    fn get_user(&self, id: &str) -> Result<RemoteUser, ApiError>;
    fn update_user(&self, user: &PutUserDto) -> Result<(), ApiError>;
}

pub trait BookingApi {
    fn get_all_bookings_from_user(&self, user_id: &str) -> Result<Vec<BookingDto>, ApiError>;
    fn get_available_days(&self) -> Result<Vec<TimeSlotDto>, ApiError>;
    fn get_free_time_slots_in_range(&self, start: NaiveDate, end: NaiveDate) -> Result<Vec<TimeSlotDto>, ApiError>;
    fn create_booking(&self, booking: &BookingDto) -> Result<(), ApiError>;
    fn update_booking(&self, booking_id: &str, booking: &BookingUpdateDto) -> Result<(), ApiError>;
}

pub trait NotificationApi {
    fn get_all_notifications_from_user(&self, user_id: &str) -> Result<Vec<NotificationDto>, ApiError>;
    fn mark_notification_read(&self, body: &NotificationIsReadDto) -> Result<(), ApiError>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Verb {
    Get,
    Post,
    Put,
}

#[derive(Debug, Clone)]
pub struct BuutClient {
    agent: ureq::Agent,
    base_url: String,
    session: SessionStore,
    auth: Option<AuthClient>,
}

impl BuutClient {
    pub fn new(base_url: &str, session: SessionStore, auth: Option<AuthClient>, timeout: Duration) -> Self {
        let config = ureq::Agent::config_builder()
            .http_status_as_error(false)
            .timeout_global(Some(timeout))
            .build();
        let mut base_url = base_url.trim().to_string();
        if !base_url.ends_with('/') {
            base_url.push('/');
        }
        BuutClient {
            agent: ureq::Agent::new_with_config(config),
            base_url,
            session,
            auth,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path.trim_start_matches('/'))
    }

    fn get_json<T: DeserializeOwned>(&self, path: &str, query: &[(&str, String)]) -> Result<T, ApiError> {
        let text = self.request(Verb::Get, path, query, None)?;
        decode(&text)
    }

    fn send_json<B: Serialize>(&self, verb: Verb, path: &str, body: &B) -> Result<(), ApiError> {
        let body = serde_json::to_value(body).map_err(ApiError::Encode)?;
        self.request(verb, path, &[], Some(&body)).map(|_| ())
    }

    /// Perform a call and return the body of a 2xx response.
    fn request(
        &self,
        verb: Verb,
        path: &str,
        query: &[(&str, String)],
        body: Option<&serde_json::Value>,
    ) -> Result<String, ApiError> {
        let url = self.url(path);
        let token = self.session.access_token()?;
        let (status, text) = self.send_once(verb, &url, query, body, token.as_deref())?;

        let (status, text) = if status == StatusCode::UNAUTHORIZED {
            match self.refresh_session()? {
                Some(token) => {
                    debug!("API: retrying {:?} {} with refreshed token", verb, path);
                    self.send_once(verb, &url, query, body, Some(&token))?
                }
                None => (status, text),
            }
        } else {
            (status, text)
        };

        if status.is_success() {
            Ok(text)
        } else {
            warn!("API: {:?} {} -> {}", verb, path, status.as_u16());
            Err(ApiError::Http {
                status: status.as_u16(),
                message: api_error_message(&text),
            })
        }
    }

    fn send_once(
        &self,
        verb: Verb,
        url: &str,
        query: &[(&str, String)],
        body: Option<&serde_json::Value>,
        token: Option<&str>,
    ) -> Result<(StatusCode, String), ApiError> {
        let result = match verb {
            Verb::Get => decorate(self.agent.get(url), query, token).call(),
            Verb::Post | Verb::Put => {
                let req = if verb == Verb::Post { self.agent.post(url) } else { self.agent.put(url) };
                let req = decorate(req, query, token);
                match body {
                    Some(body) => req.send_json(body),
                    None => req.send_empty(),
                }
            }
        };
        let mut res = result.map_err(|e| ApiError::Transport(e.to_string()))?;
        let status = res.status();
        let text = res
            .body_mut()
            .read_to_string()
            .map_err(|e| ApiError::Transport(e.to_string()))?;
        Ok((status, text))
    }

    /// Exchange the stored refresh token for a new access token and persist it.
    /// `None` when there is nothing to refresh with.
    fn refresh_session(&self) -> Result<Option<String>, ApiError> {
        let Some(auth) = &self.auth else {
            return Ok(None);
        };
        let Some(current) = self.session.load()? else {
            return Ok(None);
        };
        let Some(refresh_token) = current.refresh_token.as_deref() else {
            return Ok(None);
        };
        let fresh = auth.refresh(refresh_token)?;
        let merged = Session {
            access_token: fresh.access_token,
            id_token: fresh.id_token.or(current.id_token),
            refresh_token: fresh.refresh_token.or(current.refresh_token),
        };
        self.session.save(&merged)?;
        info!("API: access token refreshed");
        Ok(Some(merged.access_token))
    }
}

fn decorate<B>(req: ureq::RequestBuilder<B>, query: &[(&str, String)], token: Option<&str>) -> ureq::RequestBuilder<B> {
    let mut req = req.header("Accept", "application/json");
    if let Some(token) = token {
        req = req.header("Authorization", format!("Bearer {token}"));
    }
    for (key, value) in query {
        req = req.query(*key, value);
    }
    req
}

fn decode<T: DeserializeOwned>(text: &str) -> Result<T, ApiError> {
    let de = &mut serde_json::Deserializer::from_str(text);
    Ok(serde_path_to_error::deserialize(de)?)
}

/// Percent-encode one path segment (user ids look like `auth0|abc`).
fn segment(value: &str) -> String {
    urlencoding::encode(value).into_owned()
}

impl UserApi for BuutClient {
    fn register_user(&self, user: &UserDto) -> Result<(), ApiError> {
        self.send_json(Verb::Post, "api/User", user)
    }

    fn get_user(&self, id: &str) -> Result<RemoteUser, ApiError> {
        self.get_json(&format!("api/User/{}/details", segment(id)), &[])
    }

    fn update_user(&self, user: &PutUserDto) -> Result<(), ApiError> {
        self.send_json(Verb::Put, "api/User", user)
    }
}

impl BookingApi for BuutClient {
    fn get_all_bookings_from_user(&self, user_id: &str) -> Result<Vec<BookingDto>, ApiError> {
        self.get_json(&format!("api/Booking/byUserId/{}", segment(user_id)), &[])
    }

    fn get_available_days(&self) -> Result<Vec<TimeSlotDto>, ApiError> {
        let days: AvailableDaysDto = self.get_json("api/Booking/availableDays", &[])?;
        Ok(days.value)
    }

    fn get_free_time_slots_in_range(&self, start: NaiveDate, end: NaiveDate) -> Result<Vec<TimeSlotDto>, ApiError> {
        let query = [("startDate", format_api_date(start)), ("endDate", format_api_date(end))];
        self.get_json("api/Booking/freeTimeSlots", &query)
    }

    fn create_booking(&self, booking: &BookingDto) -> Result<(), ApiError> {
        self.send_json(Verb::Post, "api/Booking", booking)
    }

    fn update_booking(&self, booking_id: &str, booking: &BookingUpdateDto) -> Result<(), ApiError> {
        self.send_json(Verb::Put, &format!("api/Booking/{}", segment(booking_id)), booking)
    }
}

impl NotificationApi for BuutClient {
    fn get_all_notifications_from_user(&self, user_id: &str) -> Result<Vec<NotificationDto>, ApiError> {
        self.get_json(&format!("api/Notification/user/{}", segment(user_id)), &[])
    }

    fn mark_notification_read(&self, body: &NotificationIsReadDto) -> Result<(), ApiError> {
        self.send_json(Verb::Put, "api/Notification/isRead", body)
    }
}
