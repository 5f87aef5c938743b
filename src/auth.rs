//! Auth0 sign-in for members.
//!
//! - Resource-owner password grant for login, refresh-token grant afterwards.
//! - Only accounts whose access token carries the `User` role may sign in.

use serde::Deserialize;
use serde_json::{Value, json};
use std::time::Duration;
use thiserror::Error;

use crate::models::user::USER_ROLE;
use crate::session::{Session, TokenError, decode_claims};

pub const ROLE_CLAIM: &str = "http://schemas.microsoft.com/ws/2008/06/identity/claims/role";
const LOGIN_SCOPE: &str = "openid profile email offline_access";

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("transport error: {0}")]
    Transport(String),
    #[error("{0}")]
    Rejected(String),
    #[error("This account does not have the required roles to use the app")]
    MissingRole,
    #[error("invalid token: {0}")]
    Token(#[from] TokenError),
    #[error("invalid token response: {0}")]
    Json(#[from] serde_path_to_error::Error<serde_json::Error>),
}

#[derive(Debug, Clone)]
pub struct AuthClient {
    agent: ureq::Agent,
    token_url: String,
    client_id: String,
    audience: Option<String>,
}

#[derive(Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default)]
    id_token: Option<String>,
    #[serde(default)]
    refresh_token: Option<String>,
}

impl AuthClient {
    /// `domain` is either a bare tenant host (`buut.eu.auth0.com`) or a full
    /// base URL.
    pub fn new(domain: &str, client_id: impl Into<String>, audience: Option<String>, timeout: Duration) -> Self {
        let base = if domain.starts_with("http://") || domain.starts_with("https://") {
            domain.trim_end_matches('/').to_string()
        } else {
            format!("https://{}", domain.trim_end_matches('/'))
        };
        let config = ureq::Agent::config_builder()
            .http_status_as_error(false)
            .timeout_global(Some(timeout))
            .build();
        AuthClient {
            agent: ureq::Agent::new_with_config(config),
            token_url: format!("{base}/oauth/token"),
            client_id: client_id.into(),
            audience,
        }
    }

    pub fn login(&self, email: &str, password: &str) -> Result<Session, AuthError> {
        let mut body = json!({
            "grant_type": "password",
            "client_id": self.client_id,
            "username": email,
            "password": password,
            "scope": LOGIN_SCOPE,
        });
        if let Some(audience) = &self.audience {
            body["audience"] = Value::String(audience.clone());
        }
        let token = self.token_grant(&body)?;
        ensure_user_role(&token.access_token)?;
        Ok(Session {
            access_token: token.access_token,
            id_token: token.id_token,
            refresh_token: token.refresh_token,
        })
    }

    /// Exchange a refresh token. Auth0 may omit the id or refresh token on
    /// refresh; the caller keeps its previous ones in that case.
    pub fn refresh(&self, refresh_token: &str) -> Result<Session, AuthError> {
        let body = json!({
            "grant_type": "refresh_token",
            "client_id": self.client_id,
            "refresh_token": refresh_token,
        });
        let token = self.token_grant(&body)?;
        Ok(Session {
            access_token: token.access_token,
            id_token: token.id_token,
            refresh_token: token.refresh_token,
        })
    }

    fn token_grant(&self, body: &Value) -> Result<TokenResponse, AuthError> {
        let mut res = self
            .agent
            .post(&self.token_url)
            .header("Accept", "application/json")
            .send_json(body)
            .map_err(|e| AuthError::Transport(e.to_string()))?;
        let status = res.status();
        let text = res
            .body_mut()
            .read_to_string()
            .map_err(|e| AuthError::Transport(e.to_string()))?;
        if !status.is_success() {
            return Err(AuthError::Rejected(rejection_message(&text)));
        }
        let de = &mut serde_json::Deserializer::from_str(&text);
        Ok(serde_path_to_error::deserialize(de)?)
    }
}

/// Auth0 reports failures as `{"error": ..., "error_description": ...}`.
fn rejection_message(body: &str) -> String {
    let parsed: Option<Value> = serde_json::from_str(body).ok();
    parsed
        .as_ref()
        .and_then(|v| v.get("error_description").or_else(|| v.get("error")))
        .and_then(Value::as_str)
        .map(str::to_string)
        .or_else(|| (!body.trim().is_empty()).then(|| body.trim().to_string()))
        .unwrap_or_else(|| "Login failed".to_string())
}

/// Role names in the access token; the claim is a string for a single role.
pub fn roles_from_access_token(token: &str) -> Result<Vec<String>, AuthError> {
    let claims = decode_claims(token)?;
    let roles = match claims.get(ROLE_CLAIM) {
        Some(Value::String(role)) => vec![role.clone()],
        Some(Value::Array(items)) => items.iter().filter_map(Value::as_str).map(str::to_string).collect(),
        _ => Vec::new(),
    };
    Ok(roles)
}

pub fn ensure_user_role(token: &str) -> Result<(), AuthError> {
    if roles_from_access_token(token)?.iter().any(|r| r == USER_ROLE) {
        Ok(())
    } else {
        Err(AuthError::MissingRole)
    }
}
