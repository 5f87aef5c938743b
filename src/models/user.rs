use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::db::models::LocalUser;
use crate::models::MappingError;
use crate::models::api::{AddressDto, PutUserDto, RemoteUser, RoleDto, UserDto};
use crate::models::dates::{format_api_datetime, parse_api_datetime};

/// Role that grants access to the member app.
pub const USER_ROLE: &str = "User";

/// Streets of the harbour area served by Buut.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum StreetType {
    Afrikalaan,
    Bataviabrug,
    Koopvaardijlaan,
    Londenstraat,
    Nieuwevaart,
    Oktrooiplein,
    Rigakaai,
    Voorhavenlaan,
}

impl StreetType {
    pub const ALL: [StreetType; 8] = [
        StreetType::Afrikalaan,
        StreetType::Bataviabrug,
        StreetType::Koopvaardijlaan,
        StreetType::Londenstraat,
        StreetType::Nieuwevaart,
        StreetType::Oktrooiplein,
        StreetType::Rigakaai,
        StreetType::Voorhavenlaan,
    ];

    /// Name as shown to (and typed by) users.
    pub fn street_name(self) -> &'static str {
        match self {
            StreetType::Afrikalaan => "Afrikalaan",
            StreetType::Bataviabrug => "Bataviabrug",
            StreetType::Koopvaardijlaan => "Koopvaardijlaan",
            StreetType::Londenstraat => "Londenstraat",
            StreetType::Nieuwevaart => "Nieuwevaart",
            StreetType::Oktrooiplein => "Oktrooiplein",
            StreetType::Rigakaai => "Rigakaai",
            StreetType::Voorhavenlaan => "Voorhavenlaan",
        }
    }

    /// Constant name used on the wire and in the local cache.
    pub fn as_str(self) -> &'static str {
        match self {
            StreetType::Afrikalaan => "AFRIKALAAN",
            StreetType::Bataviabrug => "BATAVIABRUG",
            StreetType::Koopvaardijlaan => "KOOPVAARDIJLAAN",
            StreetType::Londenstraat => "LONDENSTRAAT",
            StreetType::Nieuwevaart => "NIEUWEVAART",
            StreetType::Oktrooiplein => "OKTROOIPLEIN",
            StreetType::Rigakaai => "RIGAKAAI",
            StreetType::Voorhavenlaan => "VOORHAVENLAAN",
        }
    }

    /// Match user input against the street names, ignoring case.
    pub fn from_name(input: &str) -> Option<StreetType> {
        let normalized = normalize_street_name(input);
        Self::ALL.into_iter().find(|s| s.street_name() == normalized)
    }
}

/// Lowercase everything, then uppercase the first character.
pub fn normalize_street_name(input: &str) -> String {
    let lower = input.trim().to_lowercase();
    let mut chars = lower.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

impl fmt::Display for StreetType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.street_name())
    }
}

impl FromStr for StreetType {
    type Err = MappingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|street| street.as_str() == s)
            .ok_or_else(|| MappingError::Street(s.to_string()))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Address {
    pub street: StreetType,
    pub house_number: String,
    pub r#box: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Role {
    pub name: String,
}

impl Role {
    pub fn to_role_dto(&self) -> RoleDto {
        RoleDto {
            name: self.name.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub id: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password: Option<String>,
    pub phone: String,
    pub date_of_birth: Option<NaiveDateTime>,
    pub address: Address,
    pub roles: Vec<Role>,
}

impl User {
    /// Stand-in profile served when nothing is cached and the network is down.
    pub fn offline_placeholder() -> Self {
        User {
            id: String::new(),
            first_name: String::new(),
            last_name: String::new(),
            email: String::new(),
            password: None,
            phone: String::new(),
            date_of_birth: None,
            address: Address {
                street: StreetType::Afrikalaan,
                house_number: "1".to_string(),
                r#box: None,
            },
            roles: vec![Role {
                name: USER_ROLE.to_string(),
            }],
        }
    }

    pub fn has_role(&self, name: &str) -> bool {
        self.roles.iter().any(|r| r.name == name)
    }

    pub fn to_local_user(&self) -> Result<LocalUser, MappingError> {
        Ok(LocalUser {
            id: self.id.clone(),
            first_name: self.first_name.clone(),
            last_name: self.last_name.clone(),
            email: self.email.clone(),
            phone: self.phone.clone(),
            date_of_birth: self.date_of_birth.as_ref().map(format_api_datetime),
            street: self.address.street.as_str().to_string(),
            house_number: self.address.house_number.clone(),
            address_box: self.address.r#box.clone(),
            roles: encode_roles(&self.roles)?,
        })
    }

    pub fn to_put_user_dto(&self) -> PutUserDto {
        PutUserDto {
            id: self.id.clone(),
            first_name: self.first_name.clone(),
            last_name: self.last_name.clone(),
            email: self.email.clone(),
            password: self.password.clone(),
            phone: self.phone.clone(),
            date_of_birth: self
                .date_of_birth
                .as_ref()
                .map(format_api_datetime)
                .unwrap_or_default(),
            address: self.address.to_address_dto(),
            roles: self.roles.iter().map(Role::to_role_dto).collect(),
        }
    }

    /// Registration payload; the password is sent as entered.
    pub fn to_user_dto(&self) -> UserDto {
        UserDto {
            first_name: self.first_name.clone(),
            last_name: self.last_name.clone(),
            email: self.email.clone(),
            password: self.password.clone().unwrap_or_default(),
            phone: self.phone.clone(),
            date_of_birth: self
                .date_of_birth
                .as_ref()
                .map(format_api_datetime)
                .unwrap_or_default(),
            address: self.address.to_address_dto(),
        }
    }
}

impl Address {
    pub fn to_address_dto(&self) -> AddressDto {
        AddressDto {
            street: self.street,
            house_number: self.house_number.clone(),
            r#box: self.r#box.clone(),
        }
    }
}

impl RemoteUser {
    pub fn to_local_user(&self) -> Result<LocalUser, MappingError> {
        let roles = self
            .roles
            .iter()
            .map(|r| Role { name: r.name.clone() })
            .collect::<Vec<_>>();
        Ok(LocalUser {
            id: self.id.clone(),
            first_name: self.first_name.clone(),
            last_name: self.last_name.clone(),
            email: self.email.clone(),
            phone: self.phone_number.clone(),
            date_of_birth: self.birth_date.clone(),
            street: self.address.street.as_str().to_string(),
            house_number: self.address.house_number.clone(),
            address_box: self.address.r#box.clone(),
            roles: encode_roles(&roles)?,
        })
    }
}

impl LocalUser {
    pub fn to_user(&self) -> Result<User, MappingError> {
        let date_of_birth = match self.date_of_birth.as_deref() {
            Some(s) if !s.trim().is_empty() => Some(parse_api_datetime(s)?),
            _ => None,
        };
        Ok(User {
            id: self.id.clone(),
            first_name: self.first_name.clone(),
            last_name: self.last_name.clone(),
            email: self.email.clone(),
            password: None,
            phone: self.phone.clone(),
            date_of_birth,
            address: Address {
                street: self.street.parse()?,
                house_number: self.house_number.clone(),
                r#box: self.address_box.clone(),
            },
            roles: decode_roles(&self.roles)?,
        })
    }
}

pub fn encode_roles(roles: &[Role]) -> Result<String, MappingError> {
    Ok(serde_json::to_string(roles)?)
}

/// Decode the cached role list; a blank column means no roles.
pub fn decode_roles(value: &str) -> Result<Vec<Role>, MappingError> {
    if value.trim().is_empty() {
        return Ok(Vec::new());
    }
    Ok(serde_json::from_str(value)?)
}
