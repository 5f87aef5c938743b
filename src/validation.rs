//! Profile and registration form checks.
//!
//! Each check returns `None` when the input is acceptable, or the error to
//! show next to the field.

use chrono::{Local, Months, NaiveDate};
use regex::Regex;
use thiserror::Error;

use crate::models::dates::parse_form_date;
use crate::models::user::StreetType;

/// Belgian mobile number without country code.
pub const MOBILE_REGEX: &str = r"^04[0-9]{8}$";
/// Belgian mobile number with `+32` prefix.
pub const MOBILE_COUNTRY_CODE_REGEX: &str = r"^\+324[0-9]{8}$";
pub const LANDLINE_REGEX: &str = r"^0[1-9][0-9]{7}$";
const EMAIL_REGEX: &str = r"^[^@\s]+@[^@\s]+\.[^@\s.]+$";

pub const MINIMUM_AGE_YEARS: u32 = 18;
pub const MINIMUM_PASSWORD_LENGTH: usize = 8;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("First name can't be empty")]
    FirstNameBlank,
    #[error("Last name can't be empty")]
    LastNameBlank,
    #[error("Email can't be empty")]
    EmailBlank,
    #[error("Invalid email address")]
    EmailInvalid,
    #[error("Invalid phone number")]
    PhoneInvalid,
    #[error("Street can't be empty")]
    StreetBlank,
    #[error("This street is not within the Buut service area")]
    StreetInvalid,
    #[error("House number must be a number greater than 0")]
    HouseNumberInvalid,
    #[error("Date of birth can't be empty")]
    DateOfBirthBlank,
    #[error("Invalid date, use yyyy-mm-dd or dd/mm/yyyy")]
    DateOfBirthInvalid,
    #[error("Date of birth can't be in the future")]
    DateOfBirthInFuture,
    #[error("You must be at least 18 years old")]
    TooYoung,
    #[error("Password must be at least 8 characters long")]
    PasswordTooShort,
    #[error("Password needs an uppercase letter, a lowercase letter, a digit and a special character")]
    PasswordTooWeak,
    #[error("Passwords do not match")]
    PasswordsDoNotMatch,
    #[error("You must accept the terms and conditions")]
    TermsNotAccepted,
    #[error("You must accept the privacy policy")]
    PrivacyNotAccepted,
}

/// Form fields the holders validate one at a time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InputKey {
    FirstName,
    LastName,
    Email,
    Phone,
    Street,
    HouseNumber,
    Box,
    DateOfBirth,
    Password,
    RepeatPassword,
}

impl InputKey {
    /// Fields shared by the profile and registration forms.
    pub const PROFILE: [InputKey; 8] = [
        InputKey::FirstName,
        InputKey::LastName,
        InputKey::Email,
        InputKey::Phone,
        InputKey::Street,
        InputKey::HouseNumber,
        InputKey::Box,
        InputKey::DateOfBirth,
    ];
}

/// Compiled patterns; build once and share.
#[derive(Debug, Clone)]
pub struct Validator {
    mobile: Regex,
    mobile_country_code: Regex,
    landline: Regex,
    email: Regex,
}

impl Validator {
    pub fn new() -> Result<Self, regex::Error> {
        Ok(Validator {
            mobile: Regex::new(MOBILE_REGEX)?,
            mobile_country_code: Regex::new(MOBILE_COUNTRY_CODE_REGEX)?,
            landline: Regex::new(LANDLINE_REGEX)?,
            email: Regex::new(EMAIL_REGEX)?,
        })
    }

    pub fn phone(&self, phone: &str) -> Option<ValidationError> {
        let ok = self.mobile.is_match(phone)
            || self.mobile_country_code.is_match(phone)
            || self.landline.is_match(phone);
        (!ok).then_some(ValidationError::PhoneInvalid)
    }

    pub fn email(&self, email: &str) -> Option<ValidationError> {
        if email.trim().is_empty() {
            Some(ValidationError::EmailBlank)
        } else if !self.email.is_match(email.trim()) {
            Some(ValidationError::EmailInvalid)
        } else {
            None
        }
    }
}

pub fn first_name(value: &str) -> Option<ValidationError> {
    value.trim().is_empty().then_some(ValidationError::FirstNameBlank)
}

pub fn last_name(value: &str) -> Option<ValidationError> {
    value.trim().is_empty().then_some(ValidationError::LastNameBlank)
}

pub fn street(value: &str) -> Option<ValidationError> {
    if value.trim().is_empty() {
        Some(ValidationError::StreetBlank)
    } else if StreetType::from_name(value).is_none() {
        Some(ValidationError::StreetInvalid)
    } else {
        None
    }
}

pub fn house_number(value: &str) -> Option<ValidationError> {
    match value.trim().parse::<u32>() {
        Ok(n) if n >= 1 => None,
        _ => Some(ValidationError::HouseNumberInvalid),
    }
}

pub fn date_of_birth(value: &str) -> Option<ValidationError> {
    date_of_birth_on(value, Local::now().date_naive())
}

/// Date of birth check against a fixed `today`.
pub fn date_of_birth_on(value: &str, today: NaiveDate) -> Option<ValidationError> {
    if value.trim().is_empty() {
        return Some(ValidationError::DateOfBirthBlank);
    }
    let Ok(born) = parse_form_date(value) else {
        return Some(ValidationError::DateOfBirthInvalid);
    };
    if born > today {
        return Some(ValidationError::DateOfBirthInFuture);
    }
    match born.checked_add_months(Months::new(MINIMUM_AGE_YEARS * 12)) {
        Some(adult) if adult <= today => None,
        _ => Some(ValidationError::TooYoung),
    }
}

pub fn password(value: &str) -> Option<ValidationError> {
    if value.chars().count() < MINIMUM_PASSWORD_LENGTH {
        return Some(ValidationError::PasswordTooShort);
    }
    let upper = value.chars().any(char::is_uppercase);
    let lower = value.chars().any(char::is_lowercase);
    let digit = value.chars().any(|c| c.is_ascii_digit());
    let special = value.chars().any(|c| !c.is_alphanumeric() && !c.is_whitespace());
    (!(upper && lower && digit && special)).then_some(ValidationError::PasswordTooWeak)
}

pub fn repeat_password(password: &str, repeated: &str) -> Option<ValidationError> {
    (password != repeated).then_some(ValidationError::PasswordsDoNotMatch)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn validator() -> Validator {
        Validator::new().unwrap()
    }

    #[test]
    fn phone_accepts_the_three_belgian_formats() {
        let v = validator();
        for ok in ["0471234567", "+32471234567", "021234567"] {
            assert_eq!(v.phone(ok), None, "{ok}");
        }
    }

    #[test]
    fn phone_rejects_everything_else() {
        let v = validator();
        for bad in [
            "",
            "1234",
            "04712345670",
            "1471234567",
            "0171234567",
            "+324712345670",
            "+3247123456",
            "-32471234567",
            "+33471234567",
            "001234567",
            "0212345678",
            " 0471234567",
            "04\u{0664}\u{0667}\u{0661}\u{0662}\u{0663}\u{0664}\u{0665}\u{0666}",
            "+324\u{FF17}\u{FF11}\u{FF12}\u{FF13}\u{FF14}\u{FF15}\u{FF16}\u{FF17}",
        ] {
            assert_eq!(v.phone(bad), Some(ValidationError::PhoneInvalid), "{bad}");
        }
    }

    #[test]
    fn email_needs_domain_with_tld() {
        let v = validator();
        assert_eq!(v.email(""), Some(ValidationError::EmailBlank));
        assert_eq!(v.email("jan"), Some(ValidationError::EmailInvalid));
        assert_eq!(v.email("jan@buut"), Some(ValidationError::EmailInvalid));
        assert_eq!(v.email("jan@buut.be"), None);
    }

    #[test]
    fn street_is_matched_case_insensitively() {
        assert_eq!(street(""), Some(ValidationError::StreetBlank));
        assert_eq!(street("   "), Some(ValidationError::StreetBlank));
        assert_eq!(street("Kerkstraat"), Some(ValidationError::StreetInvalid));
        assert_eq!(street("afrikalaan"), None);
        assert_eq!(street("AFRIKALAAN"), None);
    }

    #[test]
    fn house_number_must_be_positive_integer() {
        assert_eq!(house_number("12"), None);
        for bad in ["", "0", "-3", "12a", "TestHouseNumber"] {
            assert_eq!(house_number(bad), Some(ValidationError::HouseNumberInvalid), "{bad}");
        }
    }

    #[test]
    fn names_must_not_be_blank() {
        assert_eq!(first_name(" "), Some(ValidationError::FirstNameBlank));
        assert_eq!(last_name(""), Some(ValidationError::LastNameBlank));
        assert_eq!(first_name("Jan"), None);
    }

    #[test]
    fn date_of_birth_rules() {
        let today = NaiveDate::from_ymd_opt(2024, 11, 5).unwrap();
        assert_eq!(date_of_birth_on("", today), Some(ValidationError::DateOfBirthBlank));
        assert_eq!(date_of_birth_on("yesterday", today), Some(ValidationError::DateOfBirthInvalid));
        assert_eq!(date_of_birth_on("2025-01-01", today), Some(ValidationError::DateOfBirthInFuture));
        assert_eq!(date_of_birth_on("2006-11-06", today), Some(ValidationError::TooYoung));
        assert_eq!(date_of_birth_on("2006-11-05", today), None);
        assert_eq!(date_of_birth_on("19/8/1996", today), None);
    }

    #[test]
    fn password_strength() {
        assert_eq!(password("Ab1!"), Some(ValidationError::PasswordTooShort));
        assert_eq!(password("abcdefgh1!"), Some(ValidationError::PasswordTooWeak));
        assert_eq!(password("ABCDEFGH1!"), Some(ValidationError::PasswordTooWeak));
        assert_eq!(password("Abcdefgh!"), Some(ValidationError::PasswordTooWeak));
        assert_eq!(password("Abcdefgh1"), Some(ValidationError::PasswordTooWeak));
        assert_eq!(password("Abcdefg1!"), None);
        assert_eq!(repeat_password("Abcdefg1!", "Abcdefg1?"), Some(ValidationError::PasswordsDoNotMatch));
        assert_eq!(repeat_password("Abcdefg1!", "Abcdefg1!"), None);
    }
}
