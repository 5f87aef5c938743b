//! Test doubles shared by the unit tests: fixtures, in-memory API fakes, a
//! one-shot HTTP server and a wired `App` over all of them.

use chrono::NaiveDate;
use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::ops::Deref;
use std::rc::Rc;

use crate::app::App;
use crate::auth::AuthClient;
use crate::client::{ApiError, BookingApi, NotificationApi, UserApi};
use crate::connectivity::NetworkConnectivity;
use crate::db::Cache;
use crate::models::api::{
    BookingDto, BookingUpdateDto, NotificationDto, NotificationIsReadDto, PutUserDto, RemoteUser, TimeSlotDto, UserDto,
};
use crate::models::dates::parse_api_datetime;
use crate::session::SessionStore;

pub mod fixtures {
    use base64::Engine;
    use base64::engine::general_purpose::URL_SAFE_NO_PAD;
    use chrono::NaiveDate;
    use serde_json::{Value, json};

    use crate::auth::ROLE_CLAIM;
    use crate::models::api::{
        AddressDto, BatteryDto, BoatDto, BookingDto, NotificationDto, RemoteUser, RoleDto, TimeSlotDto,
        UserBatteryDto,
    };
    use crate::models::booking::TimeSlot;
    use crate::models::user::{Address, Role, StreetType, User};
    use crate::session::Session;

    pub fn booking_dto(id: &str, date: &str) -> BookingDto {
        BookingDto {
            id: Some(id.to_string()),
            date: date.to_string(),
            time_slot: Some("Morning".to_string()),
            boat: Some(BoatDto {
                name: "TestBoat".to_string(),
            }),
            battery: Some(BatteryDto {
                name: "TestBattery".to_string(),
                current_user: Some(UserBatteryDto {
                    first_name: "TestUserName".to_string(),
                    last_name: "TestLastName".to_string(),
                    email: "TestEmail".to_string(),
                    phone_number: "TestPhone".to_string(),
                }),
            }),
            user_id: None,
        }
    }

    pub fn remote_user(id: &str) -> RemoteUser {
        RemoteUser {
            id: id.to_string(),
            first_name: "TestFirstName".to_string(),
            last_name: "TestLastName".to_string(),
            email: "test.user@buut.be".to_string(),
            phone_number: "0412345678".to_string(),
            birth_date: Some("1996-08-19T00:00:01".to_string()),
            address: AddressDto {
                street: StreetType::Afrikalaan,
                house_number: "12".to_string(),
                r#box: Some("B".to_string()),
            },
            roles: vec![RoleDto {
                name: "User".to_string(),
            }],
        }
    }

    /// Domain twin of `remote_user(id)`.
    pub fn user(id: &str) -> User {
        User {
            id: id.to_string(),
            first_name: "TestFirstName".to_string(),
            last_name: "TestLastName".to_string(),
            email: "test.user@buut.be".to_string(),
            password: None,
            phone: "0412345678".to_string(),
            date_of_birth: NaiveDate::from_ymd_opt(1996, 8, 19).and_then(|d| d.and_hms_opt(0, 0, 1)),
            address: Address {
                street: StreetType::Afrikalaan,
                house_number: "12".to_string(),
                r#box: Some("B".to_string()),
            },
            roles: vec![Role {
                name: "User".to_string(),
            }],
        }
    }

    pub fn notification_dto(id: &str, created_at: &str, is_read: bool) -> NotificationDto {
        NotificationDto {
            id: id.to_string(),
            user_id: Some("TestUserId".to_string()),
            title: "TestTitle".to_string(),
            message: "TestMessage".to_string(),
            notification_type: "GENERAL".to_string(),
            is_read,
            created_at: created_at.to_string(),
        }
    }

    pub fn time_slot(date: &str, slot: &str, available: bool) -> TimeSlot {
        time_slot_dto(date, slot, available).to_time_slot().unwrap()
    }

    pub fn time_slot_dto(date: &str, slot: &str, available: bool) -> TimeSlotDto {
        TimeSlotDto {
            date: date.to_string(),
            slot: slot.to_string(),
            available,
        }
    }

    /// Unsigned JWT carrying `claims`.
    pub fn jwt(claims: &Value) -> String {
        let header = URL_SAFE_NO_PAD.encode(br#"{"alg":"none","typ":"JWT"}"#);
        let payload = URL_SAFE_NO_PAD.encode(claims.to_string());
        format!("{header}.{payload}.signature")
    }

    pub fn access_token(roles: &[&str]) -> String {
        jwt(&json!({ ROLE_CLAIM: roles }))
    }

    pub fn session(sub: &str) -> Session {
        Session {
            access_token: "access-token".to_string(),
            id_token: Some(jwt(&json!({ "sub": sub }))),
            refresh_token: Some("refresh-token".to_string()),
        }
    }
}

/// Minimal HTTP/1.1 server answering one connection per canned reply.
pub mod server {
    use std::io::{BufRead, BufReader, Read, Write};
    use std::net::{TcpListener, TcpStream};
    use std::thread::JoinHandle;
    use std::time::Duration;

    pub struct Reply {
        status: u16,
        body: String,
    }

    impl Reply {
        pub fn ok(body: &str) -> Self {
            Reply::status(200, body)
        }

        pub fn status(status: u16, body: &str) -> Self {
            Reply {
                status,
                body: body.to_string(),
            }
        }
    }

    pub struct Server {
        pub base_url: String,
        handle: JoinHandle<Vec<String>>,
    }

    impl Server {
        /// Wait until every reply was served; returns the raw requests.
        pub fn finish(self) -> Vec<String> {
            self.handle.join().unwrap()
        }
    }

    /// JSON body of a recorded request.
    pub fn request_json(request: &str) -> serde_json::Value {
        let (_, body) = request.split_once("\r\n\r\n").unwrap();
        serde_json::from_str(body).unwrap()
    }

    pub fn serve(replies: Vec<Reply>) -> Server {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let port = listener.local_addr().unwrap().port();
        let handle = std::thread::spawn(move || {
            let mut requests = Vec::new();
            for reply in replies {
                let (stream, _) = listener.accept().unwrap();
                requests.push(answer(stream, &reply));
            }
            requests
        });
        Server {
            base_url: format!("http://127.0.0.1:{port}/"),
            handle,
        }
    }

    fn answer(mut stream: TcpStream, reply: &Reply) -> String {
        stream.set_read_timeout(Some(Duration::from_secs(5))).unwrap();
        let mut reader = BufReader::new(stream.try_clone().unwrap());
        let mut head = String::new();
        let mut content_length = 0usize;
        let mut chunked = false;
        loop {
            let mut line = String::new();
            if reader.read_line(&mut line).unwrap() == 0 || line == "\r\n" {
                break;
            }
            let lower = line.to_ascii_lowercase();
            if let Some(v) = lower.strip_prefix("content-length:") {
                content_length = v.trim().parse().unwrap();
            }
            if lower.starts_with("transfer-encoding:") && lower.contains("chunked") {
                chunked = true;
            }
            head.push_str(&line);
        }
        let body = if chunked {
            read_chunked(&mut reader)
        } else {
            let mut buf = vec![0; content_length];
            reader.read_exact(&mut buf).unwrap();
            buf
        };

        let reason = http::StatusCode::from_u16(reply.status)
            .ok()
            .and_then(|s| s.canonical_reason())
            .unwrap_or("Unknown");
        let response = format!(
            "HTTP/1.1 {} {reason}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
            reply.status,
            reply.body.len(),
            reply.body
        );
        stream.write_all(response.as_bytes()).unwrap();
        stream.flush().unwrap();

        format!("{head}\r\n{}", String::from_utf8_lossy(&body))
    }

    fn read_chunked(reader: &mut impl BufRead) -> Vec<u8> {
        let mut body = Vec::new();
        loop {
            let mut size_line = String::new();
            reader.read_line(&mut size_line).unwrap();
            let size = usize::from_str_radix(size_line.trim(), 16).unwrap();
            let mut chunk = vec![0; size + 2];
            reader.read_exact(&mut chunk).unwrap();
            if size == 0 {
                return body;
            }
            body.extend_from_slice(&chunk[..size]);
        }
    }
}

/// Connectivity switch tests can flip after wiring.
#[derive(Debug, Clone)]
pub struct FakeNetwork(Rc<Cell<bool>>);

impl FakeNetwork {
    pub fn online() -> Self {
        FakeNetwork(Rc::new(Cell::new(true)))
    }

    pub fn offline() -> Self {
        FakeNetwork(Rc::new(Cell::new(false)))
    }

    pub fn set(&self, available: bool) {
        self.0.set(available);
    }
}

impl NetworkConnectivity for FakeNetwork {
    fn is_network_available(&self) -> bool {
        self.0.get()
    }
}

fn http_error(status: u16, message: &str) -> ApiError {
    ApiError::Http {
        status,
        message: message.to_string(),
    }
}

#[derive(Default)]
struct UserApiState {
    users: HashMap<String, RemoteUser>,
    registered: Vec<UserDto>,
    calls: Vec<String>,
}

#[derive(Clone, Default)]
pub struct FakeUserApi(Rc<RefCell<UserApiState>>);

impl FakeUserApi {
    pub fn put_remote(&self, user: RemoteUser) {
        self.0.borrow_mut().users.insert(user.id.clone(), user);
    }

    pub fn calls(&self) -> Vec<String> {
        self.0.borrow().calls.clone()
    }

    pub fn registered(&self) -> Vec<UserDto> {
        self.0.borrow().registered.clone()
    }
}

impl UserApi for FakeUserApi {
    fn register_user(&self, user: &UserDto) -> Result<(), ApiError> {
        let mut state = self.0.borrow_mut();
        state.calls.push(format!("register_user {}", user.email));
        state.registered.push(user.clone());
        Ok(())
    }

    fn get_user(&self, id: &str) -> Result<RemoteUser, ApiError> {
        let mut state = self.0.borrow_mut();
        state.calls.push(format!("get_user {id}"));
        state.users.get(id).cloned().ok_or_else(|| http_error(404, "User not found"))
    }

    fn update_user(&self, user: &PutUserDto) -> Result<(), ApiError> {
        let mut state = self.0.borrow_mut();
        state.calls.push(format!("update_user {}", user.id));
        let stored = state
            .users
            .get_mut(&user.id)
            .ok_or_else(|| http_error(404, "User not found"))?;
        stored.first_name = user.first_name.clone();
        stored.last_name = user.last_name.clone();
        stored.email = user.email.clone();
        stored.phone_number = user.phone.clone();
        stored.birth_date = Some(user.date_of_birth.clone());
        stored.address = user.address.clone();
        Ok(())
    }
}

#[derive(Default)]
struct BookingApiState {
    bookings: HashMap<String, Vec<BookingDto>>,
    slots: Vec<TimeSlotDto>,
    created: Vec<BookingDto>,
    failure: Option<(u16, String)>,
    calls: Vec<String>,
}

impl BookingApiState {
    fn call(&mut self, call: String) -> Result<(), ApiError> {
        self.calls.push(call);
        match &self.failure {
            Some((status, message)) => Err(http_error(*status, message)),
            None => Ok(()),
        }
    }
}

#[derive(Clone, Default)]
pub struct FakeBookingApi(Rc<RefCell<BookingApiState>>);

impl FakeBookingApi {
    pub fn set_bookings(&self, user_id: &str, bookings: Vec<BookingDto>) {
        self.0.borrow_mut().bookings.insert(user_id.to_string(), bookings);
    }

    pub fn set_slots(&self, slots: Vec<TimeSlotDto>) {
        self.0.borrow_mut().slots = slots;
    }

    /// Every later call fails with this status and body.
    pub fn fail_with(&self, status: u16, message: &str) {
        self.0.borrow_mut().failure = Some((status, message.to_string()));
    }

    pub fn calls(&self) -> Vec<String> {
        self.0.borrow().calls.clone()
    }

    pub fn created(&self) -> Vec<BookingDto> {
        self.0.borrow().created.clone()
    }
}

impl BookingApi for FakeBookingApi {
    fn get_all_bookings_from_user(&self, user_id: &str) -> Result<Vec<BookingDto>, ApiError> {
        let mut state = self.0.borrow_mut();
        state.call(format!("get_all_bookings_from_user {user_id}"))?;
        Ok(state.bookings.get(user_id).cloned().unwrap_or_default())
    }

    fn get_available_days(&self) -> Result<Vec<TimeSlotDto>, ApiError> {
        let mut state = self.0.borrow_mut();
        state.call("get_available_days".to_string())?;
        Ok(state.slots.clone())
    }

    fn get_free_time_slots_in_range(&self, start: NaiveDate, end: NaiveDate) -> Result<Vec<TimeSlotDto>, ApiError> {
        let mut state = self.0.borrow_mut();
        state.call(format!("get_free_time_slots_in_range {start} {end}"))?;
        Ok(state
            .slots
            .iter()
            .filter(|s| {
                parse_api_datetime(&s.date)
                    .map(|d| (start..=end).contains(&d.date()))
                    .unwrap_or(false)
            })
            .cloned()
            .collect())
    }

    fn create_booking(&self, booking: &BookingDto) -> Result<(), ApiError> {
        let mut state = self.0.borrow_mut();
        state.call("create_booking".to_string())?;
        let mut stored = booking.clone();
        stored.id = Some(format!("created-{}", state.created.len() + 1));
        state.created.push(booking.clone());
        let owner = booking.user_id.clone().unwrap_or_default();
        state.bookings.entry(owner).or_default().push(stored);
        Ok(())
    }

    fn update_booking(&self, booking_id: &str, booking: &BookingUpdateDto) -> Result<(), ApiError> {
        let mut state = self.0.borrow_mut();
        state.call(format!("update_booking {booking_id}"))?;
        let target = state
            .bookings
            .values_mut()
            .flatten()
            .find(|b| b.id.as_deref() == Some(booking_id))
            .ok_or_else(|| http_error(404, "Booking not found"))?;
        target.date = booking.date.clone();
        Ok(())
    }
}

#[derive(Default)]
struct NotificationApiState {
    notifications: HashMap<String, Vec<NotificationDto>>,
    failure: Option<(u16, String)>,
    calls: Vec<String>,
}

#[derive(Clone, Default)]
pub struct FakeNotificationApi(Rc<RefCell<NotificationApiState>>);

impl FakeNotificationApi {
    pub fn set_notifications(&self, user_id: &str, notifications: Vec<NotificationDto>) {
        self.0
            .borrow_mut()
            .notifications
            .insert(user_id.to_string(), notifications);
    }

    pub fn fail_with(&self, status: u16, message: &str) {
        self.0.borrow_mut().failure = Some((status, message.to_string()));
    }

    pub fn calls(&self) -> Vec<String> {
        self.0.borrow().calls.clone()
    }
}

impl NotificationApi for FakeNotificationApi {
    fn get_all_notifications_from_user(&self, user_id: &str) -> Result<Vec<NotificationDto>, ApiError> {
        let mut state = self.0.borrow_mut();
        state.calls.push(format!("get_all_notifications_from_user {user_id}"));
        if let Some((status, message)) = &state.failure {
            return Err(http_error(*status, message));
        }
        Ok(state.notifications.get(user_id).cloned().unwrap_or_default())
    }

    fn mark_notification_read(&self, body: &NotificationIsReadDto) -> Result<(), ApiError> {
        let mut state = self.0.borrow_mut();
        state
            .calls
            .push(format!("mark_notification_read {} {}", body.notification_id, body.is_read));
        if let Some((status, message)) = &state.failure {
            return Err(http_error(*status, message));
        }
        if let Some(n) = state
            .notifications
            .values_mut()
            .flatten()
            .find(|n| n.id == body.notification_id)
        {
            n.is_read = body.is_read;
        }
        Ok(())
    }
}

/// `App` wired to the fakes, an in-memory cache and a session file in a
/// temporary directory. Derefs to the `App`.
pub struct Harness {
    _dir: tempfile::TempDir,
    app: App,
    pub network: FakeNetwork,
    pub user_api: FakeUserApi,
    pub booking_api: FakeBookingApi,
    pub notification_api: FakeNotificationApi,
}

impl Harness {
    fn build(auth: Option<AuthClient>) -> Self {
        let dir = tempfile::tempdir().unwrap();
        let session = SessionStore::new(dir.path().join("session.json"));
        let cache = Rc::new(Cache::open(":memory:").unwrap());
        let network = FakeNetwork::online();
        let user_api = FakeUserApi::default();
        let booking_api = FakeBookingApi::default();
        let notification_api = FakeNotificationApi::default();
        let app = App::new(
            session,
            cache,
            user_api.clone(),
            booking_api.clone(),
            notification_api.clone(),
            network.clone(),
            auth,
        )
        .unwrap();
        Harness {
            _dir: dir,
            app,
            network,
            user_api,
            booking_api,
            notification_api,
        }
    }

    pub fn signed_out() -> Self {
        Harness::build(None)
    }

    pub fn with_auth(auth: AuthClient) -> Self {
        Harness::build(Some(auth))
    }

    /// Session for `id` stored and the server knows the profile.
    pub fn signed_in(id: &str) -> Self {
        let h = Harness::build(None);
        h.app.session.save(&fixtures::session(id)).unwrap();
        h.user_api.put_remote(fixtures::remote_user(id));
        h
    }
}

impl Deref for Harness {
    type Target = App;

    fn deref(&self) -> &App {
        &self.app
    }
}
