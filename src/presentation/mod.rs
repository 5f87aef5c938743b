//! View-state holders: a state record per screen plus the actions the screen
//! can trigger. Failures end up in `api_error` on the state rather than being
//! returned, matching how a screen renders them.

pub mod booking_form;
pub mod edit_profile;
pub mod home;
pub mod login;
pub mod profile;
pub mod registration;

pub use booking_form::{BookingFormHolder, BookingFormMode, BookingFormState};
pub use edit_profile::{EditProfileHolder, EditProfileState};
pub use home::{HomeHolder, HomeState};
pub use login::{LoginHolder, LoginState};
pub use profile::{ProfileHolder, ProfileState};
pub use registration::{RegistrationHolder, RegistrationState};

use chrono::NaiveTime;

use crate::models::dates::{format_api_date, parse_form_date};
use crate::models::user::{Address, Role, StreetType, User};
use crate::validation::{self, InputKey, ValidationError, Validator};

/// Personal-data fields shared by the edit-profile and registration forms,
/// kept as typed text alongside the error of each field.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProfileForm {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    pub street: String,
    pub house_number: String,
    pub r#box: String,
    pub date_of_birth: String,

    pub first_name_error: Option<ValidationError>,
    pub last_name_error: Option<ValidationError>,
    pub email_error: Option<ValidationError>,
    pub phone_error: Option<ValidationError>,
    pub street_error: Option<ValidationError>,
    pub house_number_error: Option<ValidationError>,
    pub box_error: Option<ValidationError>,
    pub date_of_birth_error: Option<ValidationError>,
}

impl ProfileForm {
    pub fn from_user(user: &User) -> Self {
        ProfileForm {
            first_name: user.first_name.clone(),
            last_name: user.last_name.clone(),
            email: user.email.clone(),
            phone: user.phone.clone(),
            street: user.address.street.street_name().to_string(),
            house_number: user.address.house_number.clone(),
            r#box: user.address.r#box.clone().unwrap_or_default(),
            date_of_birth: user
                .date_of_birth
                .map(|d| format_api_date(d.date()))
                .unwrap_or_default(),
            ..ProfileForm::default()
        }
    }

    /// Store typed text. Returns false for keys this form does not own.
    pub fn set(&mut self, key: InputKey, input: &str) -> bool {
        let field = match key {
            InputKey::FirstName => &mut self.first_name,
            InputKey::LastName => &mut self.last_name,
            InputKey::Email => &mut self.email,
            InputKey::Phone => &mut self.phone,
            InputKey::Street => &mut self.street,
            InputKey::HouseNumber => &mut self.house_number,
            InputKey::Box => &mut self.r#box,
            InputKey::DateOfBirth => &mut self.date_of_birth,
            InputKey::Password | InputKey::RepeatPassword => return false,
        };
        *field = input.to_string();
        true
    }

    pub fn validate(&mut self, key: InputKey, validator: &Validator) {
        match key {
            InputKey::FirstName => self.first_name_error = validation::first_name(&self.first_name),
            InputKey::LastName => self.last_name_error = validation::last_name(&self.last_name),
            InputKey::Email => self.email_error = validator.email(&self.email),
            InputKey::Phone => self.phone_error = validator.phone(&self.phone),
            InputKey::Street => self.street_error = validation::street(&self.street),
            InputKey::HouseNumber => self.house_number_error = validation::house_number(&self.house_number),
            // Box is free text.
            InputKey::Box => self.box_error = None,
            InputKey::DateOfBirth => self.date_of_birth_error = validation::date_of_birth(&self.date_of_birth),
            InputKey::Password | InputKey::RepeatPassword => {}
        }
    }

    pub fn validate_all(&mut self, validator: &Validator) {
        for key in InputKey::PROFILE {
            self.validate(key, validator);
        }
    }

    pub fn has_errors(&self) -> bool {
        [
            self.first_name_error,
            self.last_name_error,
            self.email_error,
            self.phone_error,
            self.street_error,
            self.house_number_error,
            self.box_error,
            self.date_of_birth_error,
        ]
        .iter()
        .any(Option::is_some)
    }

    /// Build the user the form describes. Only meaningful once validation
    /// passed; returns `None` otherwise.
    pub fn to_user(&self, id: &str, password: Option<String>, roles: Vec<Role>) -> Option<User> {
        let street = StreetType::from_name(&self.street)?;
        let born = parse_form_date(&self.date_of_birth).ok()?;
        let r#box = Some(self.r#box.trim().to_string()).filter(|b| !b.is_empty());
        Some(User {
            id: id.to_string(),
            first_name: self.first_name.trim().to_string(),
            last_name: self.last_name.trim().to_string(),
            email: self.email.trim().to_string(),
            password,
            phone: self.phone.trim().to_string(),
            date_of_birth: Some(born.and_time(NaiveTime::MIN)),
            address: Address {
                street,
                house_number: self.house_number.trim().to_string(),
                r#box,
            },
            roles,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::fixtures;

    #[test]
    fn form_round_trips_user() {
        let user = fixtures::user("fg");
        let form = ProfileForm::from_user(&user);
        assert_eq!(form.street, "Afrikalaan");
        assert_eq!(form.date_of_birth, "1996-08-19");

        let rebuilt = form.to_user("fg", None, user.roles.clone()).unwrap();
        assert_eq!(rebuilt.address, user.address);
        assert_eq!(rebuilt.date_of_birth.unwrap().date(), user.date_of_birth.unwrap().date());
    }

    #[test]
    fn validate_sets_and_clears_field_errors() {
        let validator = Validator::new().unwrap();
        let mut form = ProfileForm::default();
        form.set(InputKey::Phone, "1234");
        form.validate(InputKey::Phone, &validator);
        assert_eq!(form.phone_error, Some(ValidationError::PhoneInvalid));

        form.set(InputKey::Phone, "0471234567");
        form.validate(InputKey::Phone, &validator);
        assert_eq!(form.phone_error, None);
        assert!(!form.set(InputKey::Password, "x"));
    }
}
