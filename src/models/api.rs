//! Transport records shaped after the Buut REST API JSON contract.
//!
//! Field names follow the API (camelCase). Dates stay strings here; parsing
//! happens when mapping into domain models (see `models::dates`).

use serde::{Deserialize, Serialize};

use crate::models::user::StreetType;

// =====================
// Bookings
// =====================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingDto {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(rename = "bookingDate")]
    pub date: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time_slot: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub boat: Option<BoatDto>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub battery: Option<BatteryDto>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoatDto {
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BatteryDto {
    pub name: String,
    #[serde(default)]
    pub current_user: Option<UserBatteryDto>,
}

/// Contact details of whoever currently holds a battery.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserBatteryDto {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone_number: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookingUpdateDto {
    #[serde(rename = "bookingId", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(rename = "bookingDate")]
    pub date: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeSlotDto {
    pub date: String,
    pub slot: String,
    pub available: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AvailableDaysDto {
    #[serde(default)]
    pub value: Vec<TimeSlotDto>,
}

// =====================
// Users
// =====================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddressDto {
    pub street: StreetType,
    #[serde(rename = "number")]
    pub house_number: String,
    #[serde(default)]
    pub r#box: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoleDto {
    pub name: String,
}

/// User as returned by `GET api/User/{id}/details`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoteUser {
    pub id: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone_number: String,
    #[serde(default)]
    pub birth_date: Option<String>,
    pub address: AddressDto,
    #[serde(default)]
    pub roles: Vec<RoleDto>,
}

/// Registration payload for `POST api/User`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserDto {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password: String,
    #[serde(rename = "phoneNumber")]
    pub phone: String,
    #[serde(rename = "birthDate")]
    pub date_of_birth: String,
    pub address: AddressDto,
}

/// Update payload for `PUT api/User`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PutUserDto {
    pub id: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    #[serde(rename = "phoneNumber")]
    pub phone: String,
    #[serde(rename = "birthDate")]
    pub date_of_birth: String,
    pub address: AddressDto,
    #[serde(default)]
    pub roles: Vec<RoleDto>,
}

// =====================
// Notifications
// =====================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationDto {
    pub id: String,
    #[serde(default)]
    pub user_id: Option<String>,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub message: String,
    #[serde(rename = "type", default)]
    pub notification_type: String,
    #[serde(default)]
    pub is_read: bool,
    pub created_at: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationIsReadDto {
    pub notification_id: String,
    pub is_read: bool,
}
