//! In-process mock of the reservation backend.
//!
//! Serves the REST contract on `127.0.0.1:0` with in-memory users, rooms
//! and bookings. Double-booking is rejected with 409 under one lock, so
//! concurrent clients race exactly as they would against the real server.

#![allow(dead_code)]

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, AtomicI64, AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::extract::{Path, Query, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post, put};
use axum::{Json, Router};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde_json::{json, Value};

use hotel_booking::infrastructure::{FileCredentialStore, InMemoryCredentialStore};
use hotel_booking::{AppConfig, ClientHandle};

#[derive(Clone)]
struct MockUser {
    id: i64,
    email: String,
    password: String,
    role: String,
}

impl MockUser {
    fn to_json(&self) -> Value {
        json!({ "id": self.id, "email": self.email, "role": self.role })
    }
}

#[derive(Clone)]
struct MockRoom {
    id: i64,
    room_type: &'static str,
    price: f64,
    capacity: u32,
    available: bool,
}

impl MockRoom {
    fn to_json(&self) -> Value {
        json!({
            "id": self.id,
            "roomNumber": format!("{}", 100 + self.id),
            "type": self.room_type,
            "price": self.price,
            "capacity": self.capacity,
            "available": self.available,
            "description": format!("{} with a view", self.room_type),
        })
    }
}

#[derive(Clone)]
struct MockBooking {
    id: i64,
    room_id: i64,
    user_id: i64,
    start: DateTime<Utc>,
    end: DateTime<Utc>,
    total: f64,
    status: String,
    reason: Option<String>,
}

impl MockBooking {
    fn is_active(&self) -> bool {
        self.status != "cancelled"
    }

    fn overlaps(&self, start: DateTime<Utc>, end: DateTime<Utc>) -> bool {
        self.is_active() && self.start < end && start < self.end
    }

    fn to_json(&self) -> Value {
        json!({
            "id": self.id,
            "roomId": self.room_id,
            "userId": self.user_id,
            "startDate": self.start.to_rfc3339(),
            "endDate": self.end.to_rfc3339(),
            "totalPrice": self.total,
            "status": self.status,
            "paymentStatus": "pending",
            "cancellationDeadline": (self.start - chrono::Duration::days(1)).to_rfc3339(),
            "cancellationReason": self.reason,
        })
    }
}

/// Backend state plus the knobs tests turn.
pub struct MockBackend {
    users: Mutex<Vec<MockUser>>,
    tokens: Mutex<HashMap<String, i64>>,
    rooms: Mutex<Vec<MockRoom>>,
    bookings: Mutex<Vec<MockBooking>>,
    next_id: AtomicI64,
    token_seq: AtomicU64,
    fail_logout: AtomicBool,
    fail_check: AtomicBool,
    fail_rooms: AtomicBool,
    fail_bookings: AtomicBool,
    booking_delay_ms: AtomicU64,
    create_calls: AtomicU64,
}

impl MockBackend {
    fn new() -> Self {
        let rooms = vec![
            MockRoom { id: 1, room_type: "Basic Room", price: 100.0, capacity: 2, available: true },
            MockRoom { id: 2, room_type: "Premium Room", price: 180.0, capacity: 3, available: true },
            MockRoom { id: 3, room_type: "Suite", price: 350.0, capacity: 4, available: true },
            MockRoom { id: 4, room_type: "Basic Room", price: 90.0, capacity: 1, available: false },
        ];
        Self {
            users: Mutex::new(vec![
                MockUser {
                    id: 1,
                    email: "alice@example.com".into(),
                    password: "wonderland".into(),
                    role: "customer".into(),
                },
                MockUser {
                    id: 2,
                    email: "bob@example.com".into(),
                    password: "builder1".into(),
                    role: "customer".into(),
                },
            ]),
            tokens: Mutex::new(HashMap::new()),
            rooms: Mutex::new(rooms),
            bookings: Mutex::new(Vec::new()),
            next_id: AtomicI64::new(100),
            token_seq: AtomicU64::new(1),
            fail_logout: AtomicBool::new(false),
            fail_check: AtomicBool::new(false),
            fail_rooms: AtomicBool::new(false),
            fail_bookings: AtomicBool::new(false),
            booking_delay_ms: AtomicU64::new(0),
            create_calls: AtomicU64::new(0),
        }
    }

    /// Make `POST /logout` answer 500.
    pub fn fail_logout(&self, fail: bool) {
        self.fail_logout.store(fail, Ordering::SeqCst);
    }

    /// Make `GET /auth/check` answer 503.
    pub fn fail_check(&self, fail: bool) {
        self.fail_check.store(fail, Ordering::SeqCst);
    }

    /// Make every `/rooms` endpoint answer 500.
    pub fn fail_rooms(&self, fail: bool) {
        self.fail_rooms.store(fail, Ordering::SeqCst);
    }

    /// Make `POST /bookings` answer 500 once the caller is authenticated.
    pub fn fail_bookings(&self, fail: bool) {
        self.fail_bookings.store(fail, Ordering::SeqCst);
    }

    fn rooms_down(&self) -> Option<Response> {
        self.fail_rooms
            .load(Ordering::SeqCst)
            .then(|| message(StatusCode::INTERNAL_SERVER_ERROR, "Room service unavailable"))
    }

    /// Delay `POST /bookings` before it takes the booking lock.
    pub fn delay_bookings(&self, delay: Duration) {
        self.booking_delay_ms
            .store(delay.as_millis() as u64, Ordering::SeqCst);
    }

    /// Invalidate every issued token, as a server-side expiry would.
    pub fn expire_tokens(&self) {
        self.tokens.lock().unwrap().clear();
    }

    pub fn create_calls(&self) -> u64 {
        self.create_calls.load(Ordering::SeqCst)
    }

    pub fn booking_count(&self) -> usize {
        self.bookings.lock().unwrap().len()
    }

    /// Insert a booking owned by `email` directly.
    pub fn seed_booking(&self, email: &str, room_id: i64, start: &str, end: &str) -> i64 {
        let user_id = self.user_id(email).expect("seeded user");
        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        self.bookings.lock().unwrap().push(MockBooking {
            id,
            room_id,
            user_id,
            start: parse_date(start).expect("valid date"),
            end: parse_date(end).expect("valid date"),
            total: 0.0,
            status: "confirmed".into(),
            reason: None,
        });
        id
    }

    fn user_id(&self, email: &str) -> Option<i64> {
        self.users
            .lock()
            .unwrap()
            .iter()
            .find(|u| u.email == email)
            .map(|u| u.id)
    }

    fn issue_token(&self, user_id: i64) -> String {
        let token = format!(
            "token-{}-{}",
            user_id,
            self.token_seq.fetch_add(1, Ordering::SeqCst)
        );
        self.tokens.lock().unwrap().insert(token.clone(), user_id);
        token
    }

    fn authenticate(&self, headers: &HeaderMap) -> Option<MockUser> {
        let token = headers
            .get("authorization")?
            .to_str()
            .ok()?
            .strip_prefix("Bearer ")?;
        let user_id = *self.tokens.lock().unwrap().get(token)?;
        self.users
            .lock()
            .unwrap()
            .iter()
            .find(|u| u.id == user_id)
            .cloned()
    }
}

pub struct MockServer {
    pub url: String,
    pub backend: Arc<MockBackend>,
}

impl MockServer {
    pub async fn start() -> Self {
        let backend = Arc::new(MockBackend::new());
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind mock backend");
        let addr = listener.local_addr().expect("local addr");
        let app = router(backend.clone());
        tokio::spawn(async move {
            axum::serve(listener, app).await.expect("mock backend");
        });
        Self {
            url: format!("http://{addr}"),
            backend,
        }
    }

    pub fn config(&self) -> AppConfig {
        let mut config = AppConfig::default();
        config.api.base_url = self.url.clone();
        config.api.timeout_secs = 5;
        config
    }

    /// Client with an in-memory credential store.
    pub fn client(&self) -> ClientHandle {
        ClientHandle::with_credential_store(
            &self.config(),
            Arc::new(InMemoryCredentialStore::new()),
        )
        .expect("client")
    }

    /// Client persisting its credential at `path`; a second client over the
    /// same path behaves like a restarted process.
    pub fn file_client(&self, path: &PathBuf) -> ClientHandle {
        ClientHandle::with_credential_store(
            &self.config(),
            Arc::new(FileCredentialStore::new(path.clone())),
        )
        .expect("client")
    }
}

pub fn temp_credential_path() -> PathBuf {
    std::env::temp_dir()
        .join(format!("hotel-booking-test-{}", uuid::Uuid::new_v4()))
        .join("credential")
}

fn router(backend: Arc<MockBackend>) -> Router {
    Router::new()
        .route("/login", post(login))
        .route("/register", post(register))
        .route("/logout", post(logout))
        .route("/auth/check", get(check))
        .route("/rooms", get(list_rooms))
        .route("/rooms/available", get(available_rooms))
        .route("/rooms/{id}", get(get_room))
        .route("/bookings", post(create_booking).get(list_bookings))
        .route("/bookings/{id}", get(get_booking))
        .route("/bookings/{id}/cancel", put(cancel_booking))
        .with_state(backend)
}

type Shared = State<Arc<MockBackend>>;

fn message(status: StatusCode, text: &str) -> Response {
    (status, Json(json!({ "message": text }))).into_response()
}

fn data(status: StatusCode, value: Value) -> Response {
    (status, Json(json!({ "data": value, "message": "ok" }))).into_response()
}

fn parse_date(value: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(value)
        .ok()
        .map(|d| d.with_timezone(&Utc))
}

// ── Auth ────────────────────────────────────────────────────

#[derive(Deserialize)]
struct Credentials {
    email: String,
    password: String,
    role: Option<String>,
}

async fn login(State(backend): Shared, Json(body): Json<Credentials>) -> Response {
    let user = backend
        .users
        .lock()
        .unwrap()
        .iter()
        .find(|u| u.email == body.email && u.password == body.password)
        .cloned();
    match user {
        Some(user) => {
            let token = backend.issue_token(user.id);
            Json(json!({ "token": token, "user": user.to_json() })).into_response()
        }
        None => message(StatusCode::UNAUTHORIZED, "Invalid credentials"),
    }
}

async fn register(State(backend): Shared, Json(body): Json<Credentials>) -> Response {
    let user = {
        let mut users = backend.users.lock().unwrap();
        if users.iter().any(|u| u.email == body.email) {
            return message(StatusCode::CONFLICT, "User already exists");
        }
        let user = MockUser {
            id: backend.next_id.fetch_add(1, Ordering::SeqCst),
            email: body.email,
            password: body.password,
            role: body.role.unwrap_or_else(|| "customer".into()),
        };
        users.push(user.clone());
        user
    };
    let token = backend.issue_token(user.id);
    (
        StatusCode::CREATED,
        Json(json!({ "token": token, "user": user.to_json() })),
    )
        .into_response()
}

async fn logout(State(backend): Shared, headers: HeaderMap) -> Response {
    if backend.fail_logout.load(Ordering::SeqCst) {
        return message(StatusCode::INTERNAL_SERVER_ERROR, "Logout failed");
    }
    if let Some(token) = headers
        .get("authorization")
        .and_then(|h| h.to_str().ok())
        .and_then(|h| h.strip_prefix("Bearer "))
    {
        backend.tokens.lock().unwrap().remove(token);
    }
    message(StatusCode::OK, "Logged out")
}

async fn check(State(backend): Shared, headers: HeaderMap) -> Response {
    if backend.fail_check.load(Ordering::SeqCst) {
        return message(StatusCode::SERVICE_UNAVAILABLE, "Auth service unavailable");
    }
    match backend.authenticate(&headers) {
        Some(user) => data(StatusCode::OK, user.to_json()),
        None => message(StatusCode::UNAUTHORIZED, "Token expired"),
    }
}

// ── Rooms ───────────────────────────────────────────────────

async fn list_rooms(State(backend): Shared) -> Response {
    if let Some(down) = backend.rooms_down() {
        return down;
    }
    let rooms: Vec<Value> = backend.rooms.lock().unwrap().iter().map(MockRoom::to_json).collect();
    data(StatusCode::OK, Value::Array(rooms))
}

async fn available_rooms(
    State(backend): Shared,
    Query(query): Query<HashMap<String, String>>,
) -> Response {
    if let Some(down) = backend.rooms_down() {
        return down;
    }
    let range = query
        .get("startDate")
        .and_then(|s| parse_date(s))
        .zip(query.get("endDate").and_then(|s| parse_date(s)));
    let Some((start, end)) = range.filter(|(start, end)| start < end) else {
        return message(StatusCode::BAD_REQUEST, "Invalid date range");
    };

    let bookings = backend.bookings.lock().unwrap().clone();
    let rooms: Vec<Value> = backend
        .rooms
        .lock()
        .unwrap()
        .iter()
        .filter(|room| room.available)
        .filter(|room| {
            !bookings
                .iter()
                .any(|b| b.room_id == room.id && b.overlaps(start, end))
        })
        .map(MockRoom::to_json)
        .collect();
    data(StatusCode::OK, json!({ "rooms": rooms }))
}

async fn get_room(State(backend): Shared, Path(id): Path<i64>) -> Response {
    if let Some(down) = backend.rooms_down() {
        return down;
    }
    let room = backend
        .rooms
        .lock()
        .unwrap()
        .iter()
        .find(|r| r.id == id)
        .map(MockRoom::to_json);
    match room {
        Some(room) => data(StatusCode::OK, room),
        None => message(StatusCode::NOT_FOUND, "Room not found"),
    }
}

// ── Bookings ────────────────────────────────────────────────

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct NewBooking {
    room_id: i64,
    start_date: String,
    end_date: String,
    total_price: f64,
}

async fn create_booking(
    State(backend): Shared,
    headers: HeaderMap,
    Json(body): Json<NewBooking>,
) -> Response {
    let Some(user) = backend.authenticate(&headers) else {
        return message(StatusCode::UNAUTHORIZED, "Token expired");
    };
    backend.create_calls.fetch_add(1, Ordering::SeqCst);
    if backend.fail_bookings.load(Ordering::SeqCst) {
        return message(StatusCode::INTERNAL_SERVER_ERROR, "Could not save booking");
    }

    let delay = backend.booking_delay_ms.load(Ordering::SeqCst);
    if delay > 0 {
        tokio::time::sleep(Duration::from_millis(delay)).await;
    }

    let (Some(start), Some(end)) = (parse_date(&body.start_date), parse_date(&body.end_date)) else {
        return message(StatusCode::BAD_REQUEST, "Invalid dates");
    };
    if start >= end {
        return message(StatusCode::BAD_REQUEST, "End date must be after start date");
    }
    if !backend.rooms.lock().unwrap().iter().any(|r| r.id == body.room_id) {
        return message(StatusCode::NOT_FOUND, "Room not found");
    }

    let mut bookings = backend.bookings.lock().unwrap();
    if bookings
        .iter()
        .any(|b| b.room_id == body.room_id && b.overlaps(start, end))
    {
        return message(StatusCode::CONFLICT, "Room already booked for these dates");
    }
    let booking = MockBooking {
        id: backend.next_id.fetch_add(1, Ordering::SeqCst),
        room_id: body.room_id,
        user_id: user.id,
        start,
        end,
        total: body.total_price,
        status: "confirmed".into(),
        reason: None,
    };
    bookings.push(booking.clone());
    data(StatusCode::CREATED, booking.to_json())
}

async fn list_bookings(State(backend): Shared, headers: HeaderMap) -> Response {
    let Some(user) = backend.authenticate(&headers) else {
        return message(StatusCode::UNAUTHORIZED, "Token expired");
    };
    let bookings: Vec<Value> = backend
        .bookings
        .lock()
        .unwrap()
        .iter()
        .filter(|b| b.user_id == user.id)
        .map(MockBooking::to_json)
        .collect();
    data(StatusCode::OK, json!({ "bookings": bookings }))
}

async fn get_booking(State(backend): Shared, headers: HeaderMap, Path(id): Path<i64>) -> Response {
    let Some(user) = backend.authenticate(&headers) else {
        return message(StatusCode::UNAUTHORIZED, "Token expired");
    };
    let booking = backend
        .bookings
        .lock()
        .unwrap()
        .iter()
        .find(|b| b.id == id)
        .cloned();
    match booking {
        None => message(StatusCode::NOT_FOUND, "Booking not found"),
        Some(b) if b.user_id != user.id => message(StatusCode::FORBIDDEN, "Not your booking"),
        Some(b) => data(StatusCode::OK, b.to_json()),
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct CancelBody {
    cancellation_reason: String,
}

async fn cancel_booking(
    State(backend): Shared,
    headers: HeaderMap,
    Path(id): Path<i64>,
    Json(body): Json<CancelBody>,
) -> Response {
    let Some(user) = backend.authenticate(&headers) else {
        return message(StatusCode::UNAUTHORIZED, "Token expired");
    };
    let mut bookings = backend.bookings.lock().unwrap();
    let Some(booking) = bookings.iter_mut().find(|b| b.id == id) else {
        return message(StatusCode::NOT_FOUND, "Booking not found");
    };
    if booking.user_id != user.id {
        return message(StatusCode::FORBIDDEN, "Not your booking");
    }
    booking.status = "cancelled".into();
    booking.reason = Some(body.cancellation_reason);
    data(StatusCode::OK, booking.to_json())
}
