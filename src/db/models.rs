//! Diesel row structs for the local mirror tables.
//!
//! Rows keep the API's string shapes (dates as sent by the server, roles as a
//! JSON list) so that online and offline reads share one mapping path into the
//! domain models.

use diesel::prelude::*;

use crate::schema;

#[derive(Debug, Clone, PartialEq, Eq, Queryable, Selectable, Insertable)]
#[diesel(table_name = schema::bookings)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct LocalBooking {
    pub id: String,
    pub date: String,
    pub time: Option<String>,
    pub boat: Option<String>,
    pub battery: Option<String>,
    pub battery_user_first_name: Option<String>,
    pub battery_user_last_name: Option<String>,
    pub battery_user_email: Option<String>,
    pub battery_user_phone_number: Option<String>,
    pub user_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Queryable, Selectable, Insertable)]
#[diesel(table_name = schema::users)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct LocalUser {
    pub id: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    pub date_of_birth: Option<String>,
    /// Street constant name, e.g. `AFRIKALAAN`.
    pub street: String,
    pub house_number: String,
    pub address_box: Option<String>,
    /// JSON list of `{"name": ...}` objects.
    pub roles: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Queryable, Selectable, Insertable)]
#[diesel(table_name = schema::notifications)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct LocalNotification {
    pub id: String,
    pub user_id: String,
    pub title: String,
    pub message: String,
    pub notification_type: String,
    pub is_read: bool,
    pub created_at: String,
}
