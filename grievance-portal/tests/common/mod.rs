//! Common test utilities for portal integration tests

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, RwLock};

use axum::http::header::AUTHORIZATION;
use axum::http::HeaderValue;
use axum_test::TestServer;
use chrono::Duration;
use grievance_core::SecretStore;
use grievance_portal::store::{AdminStore, NewAdminUser};
use grievance_portal::{routes, AppState, InMemoryStore, Notifier, TokenAuthority};
use serde_json::json;

pub const TEST_ENCRYPTION_KEY: &str = "integration-test-encryption-key";
pub const TEST_JWT_SECRET: &str = "integration-test-jwt-secret";
pub const ADMIN_USERNAME: &str = "registrar";
pub const ADMIN_PASSWORD: &str = "Initial!Pass1";

/// Mock notifier that captures outgoing mail and can be switched to fail
#[derive(Default, Clone)]
pub struct MockNotifier {
    /// Captured (to, subject, html_body) triples
    pub sent: Arc<RwLock<Vec<(String, String, String)>>>,
    failing: Arc<AtomicBool>,
}

impl MockNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every subsequent send fail
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    /// Get the last OTP code mailed to an address (first run of exactly
    /// six digits in the body)
    pub fn last_code(&self, email: &str) -> Option<String> {
        self.sent
            .read()
            .unwrap()
            .iter()
            .rev()
            .find(|(to, _, _)| to == email)
            .and_then(|(_, _, body)| extract_six_digits(body))
    }

    /// Subjects of all mail sent to an address
    pub fn subjects_for(&self, email: &str) -> Vec<String> {
        self.sent
            .read()
            .unwrap()
            .iter()
            .filter(|(to, _, _)| to == email)
            .map(|(_, subject, _)| subject.clone())
            .collect()
    }
}

fn extract_six_digits(body: &str) -> Option<String> {
    let bytes = body.as_bytes();
    let mut start = 0;
    while start < bytes.len() {
        if bytes[start].is_ascii_digit() {
            let mut end = start;
            while end < bytes.len() && bytes[end].is_ascii_digit() {
                end += 1;
            }
            if end - start == 6 {
                return Some(body[start..end].to_string());
            }
            start = end;
        } else {
            start += 1;
        }
    }
    None
}

impl Notifier for MockNotifier {
    fn send(&self, to: &str, subject: &str, html_body: &str) -> Result<(), String> {
        if self.failing.load(Ordering::SeqCst) {
            return Err("mock delivery failure".to_string());
        }
        self.sent.write().unwrap().push((
            to.to_string(),
            subject.to_string(),
            html_body.to_string(),
        ));
        Ok(())
    }
}

/// Create a test server over an in-memory store with a mock notifier.
/// Returns the store handle so tests can reach behind the HTTP surface
/// (e.g. to backdate OTP expiry).
pub fn create_test_server() -> (TestServer, MockNotifier, Arc<InMemoryStore>) {
    let store = Arc::new(InMemoryStore::new());
    let notifier = MockNotifier::new();

    seed_admin(store.as_ref());

    let state = Arc::new(AppState {
        store: store.clone(),
        notifier: Arc::new(notifier.clone()),
        secrets: SecretStore::new(TEST_ENCRYPTION_KEY),
        tokens: TokenAuthority::new(TEST_JWT_SECRET, 24),
        otp_ttl: Duration::minutes(5),
    });

    let app = routes::create_router(state);
    let server = TestServer::new(app).expect("Failed to create test server");

    (server, notifier, store)
}

fn seed_admin<S: AdminStore>(store: &S) {
    // Low bcrypt cost keeps the test suite fast
    let password_hash = bcrypt::hash(ADMIN_PASSWORD, 4).unwrap();
    store
        .create_admin(NewAdminUser {
            username: ADMIN_USERNAME.to_string(),
            password_hash,
            email: "registrar@srivasaviengg.ac.in".to_string(),
            full_name: "College Registrar".to_string(),
            role: "admin".to_string(),
        })
        .unwrap();
}

/// Issue and verify an OTP for an email, leaving it authorized for submission
pub async fn verify_email(server: &TestServer, notifier: &MockNotifier, email: &str) {
    let response = server
        .post("/api/send-otp")
        .json(&json!({ "email": email }))
        .await;
    assert_eq!(response.status_code(), 200);

    let code = notifier.last_code(email).expect("No OTP code sent");

    let response = server
        .post("/api/verify-otp")
        .json(&json!({ "email": email, "otp": code }))
        .await;
    assert_eq!(response.status_code(), 200);
}

/// A well-formed student submission payload
pub fn student_payload(email: &str) -> serde_json::Value {
    json!({
        "name": "A. Student",
        "role": "student",
        "id": "22A81A0501",
        "department": "CSE",
        "year": "3",
        "email": email,
        "mobile": "9876543210",
        "grievanceType": "Academic",
        "grievance": "Lab equipment in the CSE block has been broken for a month."
    })
}

/// Submit a grievance for an already-verified email, returning the tracking id
pub async fn submit_grievance(server: &TestServer, payload: &serde_json::Value) -> u64 {
    let response = server.post("/api/submit-grievance").json(payload).await;
    assert_eq!(response.status_code(), 200);
    let body: serde_json::Value = response.json();
    assert_eq!(body["success"], true);
    body["trackingId"].as_u64().expect("trackingId missing")
}

/// Log in as the seeded admin and return the bearer token
pub async fn admin_login(server: &TestServer) -> String {
    let response = server
        .post("/api/admin/login")
        .json(&json!({ "username": ADMIN_USERNAME, "password": ADMIN_PASSWORD }))
        .await;
    assert_eq!(response.status_code(), 200);
    let body: serde_json::Value = response.json();
    body["token"].as_str().expect("token missing").to_string()
}

/// Authorization header value for a bearer token
pub fn bearer(token: &str) -> (axum::http::HeaderName, HeaderValue) {
    (
        AUTHORIZATION,
        HeaderValue::from_str(&format!("Bearer {token}")).unwrap(),
    )
}
