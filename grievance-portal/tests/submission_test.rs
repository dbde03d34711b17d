//! Tests for the grievance submission workflow and public tracking

mod common;

use common::{create_test_server, student_payload, submit_grievance, verify_email};
use grievance_portal::store::GrievanceStore;
use serde_json::{json, Value};

#[tokio::test]
async fn test_submit_without_verified_otp_is_forbidden() {
    let (server, _, _) = create_test_server();

    // Well-formed payload, but no OTP was ever verified for the email
    let response = server
        .post("/api/submit-grievance")
        .json(&student_payload("s@sves.org.in"))
        .await;

    assert_eq!(response.status_code(), 403);
    let body: Value = response.json();
    assert_eq!(body["message"], "Email not verified. Please verify OTP first.");
}

#[tokio::test]
async fn test_issued_but_unverified_otp_does_not_authorize() {
    let (server, _, _) = create_test_server();
    let email = "s@sves.org.in";

    server
        .post("/api/send-otp")
        .json(&json!({ "email": email }))
        .await
        .assert_status_ok();

    let response = server
        .post("/api/submit-grievance")
        .json(&student_payload(email))
        .await;

    assert_eq!(response.status_code(), 403);
}

#[tokio::test]
async fn test_valid_submission_returns_tracking_id() {
    let (server, notifier, _) = create_test_server();
    let email = "s@sves.org.in";

    verify_email(&server, &notifier, email).await;
    let id = submit_grievance(&server, &student_payload(email)).await;
    assert!(id >= 1);

    // Confirmation mail carries the tracking id in the subject
    let subjects = notifier.subjects_for(email);
    assert!(subjects
        .iter()
        .any(|s| s.contains(&format!("Tracking ID: {id}"))));
}

#[tokio::test]
async fn test_tracking_ids_strictly_increase() {
    let (server, notifier, _) = create_test_server();

    let mut last = 0;
    for email in ["a@sves.org.in", "b@sves.org.in", "c@sves.org.in"] {
        verify_email(&server, &notifier, email).await;
        let id = submit_grievance(&server, &student_payload(email)).await;
        assert!(id > last, "expected {id} > {last}");
        last = id;
    }
}

#[tokio::test]
async fn test_missing_fields_are_listed() {
    let (server, notifier, _) = create_test_server();
    let email = "s@sves.org.in";
    verify_email(&server, &notifier, email).await;

    let mut payload = student_payload(email);
    payload["name"] = json!("");
    payload.as_object_mut().unwrap().remove("mobile");

    let response = server.post("/api/submit-grievance").json(&payload).await;

    assert_eq!(response.status_code(), 400);
    let body: Value = response.json();
    let message = body["message"].as_str().unwrap();
    assert!(message.contains("name"));
    assert!(message.contains("mobile"));
}

#[tokio::test]
async fn test_student_with_faculty_domain_names_expected_domain() {
    let (server, notifier, _) = create_test_server();
    let email = "x@srivasaviengg.ac.in";
    verify_email(&server, &notifier, email).await;

    // role=student but faculty-domain email
    let response = server
        .post("/api/submit-grievance")
        .json(&student_payload(email))
        .await;

    assert_eq!(response.status_code(), 400);
    let body: Value = response.json();
    let message = body["message"].as_str().unwrap();
    assert!(message.contains("@sves.org.in"), "got: {message}");
    assert!(message.contains("Students"), "got: {message}");
}

#[tokio::test]
async fn test_teaching_id_format_enforced() {
    let (server, notifier, _) = create_test_server();
    let email = "prof@srivasaviengg.ac.in";
    verify_email(&server, &notifier, email).await;

    let mut payload = student_payload(email);
    payload["role"] = json!("teaching");
    payload["id"] = json!("T-A-1"); // middle segment too short

    let response = server.post("/api/submit-grievance").json(&payload).await;
    assert_eq!(response.status_code(), 400);
    let body: Value = response.json();
    assert!(body["message"].as_str().unwrap().contains("ID format"));

    payload["id"] = json!("T-AB-1");
    let id = submit_grievance(&server, &payload).await;
    assert!(id >= 1);
}

#[tokio::test]
async fn test_non_teaching_id_format_enforced() {
    let (server, notifier, _) = create_test_server();
    let email = "clerk@srivasaviengg.ac.in";
    verify_email(&server, &notifier, email).await;

    let mut payload = student_payload(email);
    payload["role"] = json!("non-teaching");
    payload["id"] = json!("N-ABC-1");

    let response = server.post("/api/submit-grievance").json(&payload).await;
    assert_eq!(response.status_code(), 400);

    payload["id"] = json!("nt-abcd-12"); // lowercase accepted, normalized
    submit_grievance(&server, &payload).await;
}

#[tokio::test]
async fn test_unknown_role_rejected() {
    let (server, notifier, _) = create_test_server();
    let email = "s@sves.org.in";
    verify_email(&server, &notifier, email).await;

    let mut payload = student_payload(email);
    payload["role"] = json!("alumni");

    let response = server.post("/api/submit-grievance").json(&payload).await;
    assert_eq!(response.status_code(), 400);
    let body: Value = response.json();
    assert_eq!(body["message"], "Invalid role: alumni");
}

#[tokio::test]
async fn test_sensitive_fields_are_encrypted_at_rest() {
    let (server, notifier, store) = create_test_server();
    let email = "s@sves.org.in";
    verify_email(&server, &notifier, email).await;

    let payload = student_payload(email);
    let id = submit_grievance(&server, &payload).await;

    let record = store.get_grievance(id).unwrap().unwrap();
    assert!(record.grievance_type.starts_with("enc:v1:"));
    assert!(record.grievance.starts_with("enc:v1:"));
    assert_ne!(record.grievance_type, payload["grievanceType"]);
    assert_ne!(record.grievance, payload["grievance"]);
    // Non-sensitive fields stay plain
    assert_eq!(record.name, "A. Student");
}

#[tokio::test]
async fn test_confirmation_failure_does_not_roll_back() {
    let (server, notifier, store) = create_test_server();
    let email = "s@sves.org.in";
    verify_email(&server, &notifier, email).await;

    // OTP is verified; now break delivery so only the confirmation fails
    notifier.set_failing(true);

    let id = submit_grievance(&server, &student_payload(email)).await;
    assert!(store.get_grievance(id).unwrap().is_some());
}

#[tokio::test]
async fn test_two_verified_submissions_create_two_records() {
    // No idempotency key: a verified OTP authorizes repeat submissions until
    // it is superseded
    let (server, notifier, _) = create_test_server();
    let email = "s@sves.org.in";
    verify_email(&server, &notifier, email).await;

    let first = submit_grievance(&server, &student_payload(email)).await;
    let second = submit_grievance(&server, &student_payload(email)).await;
    assert_ne!(first, second);
}

#[tokio::test]
async fn test_tracking_view_is_redacted() {
    let (server, notifier, _) = create_test_server();
    let email = "s@sves.org.in";
    verify_email(&server, &notifier, email).await;
    let id = submit_grievance(&server, &student_payload(email)).await;

    let response = server.get(&format!("/api/grievances/track/{id}")).await;
    assert_eq!(response.status_code(), 200);
    let body: Value = response.json();

    assert_eq!(body["id"], id);
    assert_eq!(body["name"], "A. Student");
    assert_eq!(body["department"], "CSE");
    // grievance type decrypted for display
    assert_eq!(body["grievance_type"], "Academic");
    assert_eq!(body["status"], "pending");
    // privacy boundary: no body text or contact details
    assert!(body.get("grievance").is_none());
    assert!(body.get("email").is_none());
    assert!(body.get("mobile").is_none());
}

#[tokio::test]
async fn test_tracking_unknown_id_is_not_found() {
    let (server, _, _) = create_test_server();

    let response = server.get("/api/grievances/track/9999").await;
    assert_eq!(response.status_code(), 404);
    let body: Value = response.json();
    assert_eq!(
        body["message"],
        "Grievance not found. Please check your tracking ID."
    );
}
