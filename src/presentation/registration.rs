use log::info;

use crate::app::App;
use crate::models::user::{Role, USER_ROLE};
use crate::presentation::ProfileForm;
use crate::use_cases::RegisterUser;
use crate::validation::{self, InputKey, ValidationError};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RegistrationState {
    pub form: ProfileForm,
    pub password: String,
    pub repeated_password: String,
    pub accepted_terms: bool,
    pub accepted_privacy_consent: bool,

    pub password_error: Option<ValidationError>,
    pub repeated_password_error: Option<ValidationError>,
    pub terms_error: Option<ValidationError>,
    pub privacy_error: Option<ValidationError>,

    pub is_loading: bool,
    pub registration_success: bool,
    pub api_error: Option<String>,
}

impl RegistrationState {
    fn has_errors(&self) -> bool {
        self.form.has_errors()
            || self.password_error.is_some()
            || self.repeated_password_error.is_some()
            || self.terms_error.is_some()
            || self.privacy_error.is_some()
    }
}

pub struct RegistrationHolder<'a> {
    app: &'a App,
    pub state: RegistrationState,
}

impl<'a> RegistrationHolder<'a> {
    pub fn new(app: &'a App) -> Self {
        RegistrationHolder {
            app,
            state: RegistrationState::default(),
        }
    }

    pub fn update(&mut self, input: &str, key: InputKey) {
        match key {
            InputKey::Password => self.state.password = input.to_string(),
            InputKey::RepeatPassword => self.state.repeated_password = input.to_string(),
            _ => {
                self.state.form.set(key, input);
            }
        }
    }

    pub fn validate(&mut self, key: InputKey) {
        match key {
            InputKey::Password => self.state.password_error = validation::password(&self.state.password),
            InputKey::RepeatPassword => {
                self.state.repeated_password_error =
                    validation::repeat_password(&self.state.password, &self.state.repeated_password)
            }
            _ => self.state.form.validate(key, &self.app.validator),
        }
    }

    pub fn toggle_terms(&mut self) {
        self.state.accepted_terms = !self.state.accepted_terms;
    }

    pub fn toggle_privacy_consent(&mut self) {
        self.state.accepted_privacy_consent = !self.state.accepted_privacy_consent;
    }

    /// Validate everything and register on success. Returns whether the
    /// account was created.
    pub fn on_register(&mut self) -> bool {
        self.state.form.validate_all(&self.app.validator);
        self.validate(InputKey::Password);
        self.validate(InputKey::RepeatPassword);
        self.state.terms_error = (!self.state.accepted_terms).then_some(ValidationError::TermsNotAccepted);
        self.state.privacy_error =
            (!self.state.accepted_privacy_consent).then_some(ValidationError::PrivacyNotAccepted);
        if self.state.has_errors() {
            return false;
        }

        let roles = vec![Role {
            name: USER_ROLE.to_string(),
        }];
        let Some(user) = self
            .state
            .form
            .to_user("", Some(self.state.password.clone()), roles)
        else {
            return false;
        };

        self.state.is_loading = true;
        let result = RegisterUser::new(&self.app.users).execute(&user);
        self.state.is_loading = false;
        match result {
            Ok(()) => {
                info!("Registered {}", user.email);
                self.state.registration_success = true;
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
    use crate::testing::Harness;

    fn fill(holder: &mut RegistrationHolder<'_>) {
        for (key, value) in [
            (InputKey::FirstName, "Jan"),
            (InputKey::LastName, "Peeters"),
            (InputKey::Email, "jan@buut.be"),
            (InputKey::Phone, "+32471234567"),
            (InputKey::Street, "Londenstraat"),
            (InputKey::HouseNumber, "4"),
            (InputKey::DateOfBirth, "19/8/1996"),
            (InputKey::Password, "Secret12!"),
            (InputKey::RepeatPassword, "Secret12!"),
        ] {
            holder.update(value, key);
        }
        holder.toggle_terms();
        holder.toggle_privacy_consent();
    }

    #[test]
    fn complete_form_registers() {
        let h = Harness::signed_out();
        let mut holder = RegistrationHolder::new(&h);
        fill(&mut holder);

        assert!(holder.on_register(), "{:?}", holder.state);

        let sent = &h.user_api.registered()[0];
        assert_eq!(sent.email, "jan@buut.be");
        assert_eq!(sent.password, "Secret12!");
        assert_eq!(sent.date_of_birth, "1996-08-19T00:00:00");
        assert!(holder.state.registration_success);
    }

    #[test]
    fn missing_consent_and_mismatch_are_reported() {
        let h = Harness::signed_out();
        let mut holder = RegistrationHolder::new(&h);
        fill(&mut holder);
        holder.toggle_terms();
        holder.update("Secret12?", InputKey::RepeatPassword);

        assert!(!holder.on_register());

        assert_eq!(holder.state.terms_error, Some(ValidationError::TermsNotAccepted));
        assert_eq!(holder.state.repeated_password_error, Some(ValidationError::PasswordsDoNotMatch));
        assert_eq!(holder.state.privacy_error, None);
        assert!(h.user_api.registered().is_empty());
    }

    #[test]
    fn offline_registration_is_refused() {
        let h = Harness::signed_out();
        h.network.set(false);
        let mut holder = RegistrationHolder::new(&h);
        fill(&mut holder);
        assert!(!holder.on_register());
        assert_eq!(holder.state.api_error.as_deref(), Some(OFFLINE_MESSAGE));
    }
}
