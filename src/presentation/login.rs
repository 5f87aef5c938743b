use log::warn;

use crate::app::App;
use crate::use_cases::Login;

pub const LOGIN_NOT_CONFIGURED_MESSAGE: &str = "Login is not configured for this installation";
pub const MISSING_CREDENTIALS_MESSAGE: &str = "Enter your email address and password";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoginState {
    pub email: String,
    pub password: String,
    pub is_loading: bool,
    pub api_error: Option<String>,
    pub logged_in: bool,
}

pub struct LoginHolder<'a> {
    app: &'a App,
    pub state: LoginState,
}

impl<'a> LoginHolder<'a> {
    pub fn new(app: &'a App) -> Self {
        LoginHolder {
            app,
            state: LoginState::default(),
        }
    }

    pub fn set_email(&mut self, email: &str) {
        self.state.email = email.to_string();
    }

    pub fn set_password(&mut self, password: &str) {
        self.state.password = password.to_string();
    }

    pub fn on_login(&mut self) -> bool {
        let Some(auth) = self.app.auth.as_ref() else {
            self.state.api_error = Some(LOGIN_NOT_CONFIGURED_MESSAGE.to_string());
            return false;
        };
        if self.state.email.trim().is_empty() || self.state.password.is_empty() {
            self.state.api_error = Some(MISSING_CREDENTIALS_MESSAGE.to_string());
            return false;
        }

        self.state.is_loading = true;
        let result = Login::new(auth, &self.app.session).execute(&self.state.email, &self.state.password);
        self.state.is_loading = false;
        match result {
            Ok(()) => {
                self.state.password.clear();
                self.state.logged_in = true;
                self.state.api_error = None;
                true
            }
            Err(e) => {
                warn!("Login failed: {e}");
                self.state.api_error = Some(e.to_string());
                false
            }
        }
    }
}
