mod support;

use attendance_form::errors::FormError;
use attendance_form::models::{AttendancePayload, TaskEntry};
use attendance_form::{AttendanceApi, HttpBackend};
use axum::http::StatusCode;
use serde_json::json;
use std::net::TcpListener;
use std::time::Duration;
use support::MockBackend;

fn backend(base_url: &str) -> HttpBackend {
    HttpBackend::new(base_url, Duration::from_secs(5)).expect("build client")
}

fn checkout_payload() -> AttendancePayload {
    AttendancePayload::new(
        "a@x.com",
        "checkout",
        vec![TaskEntry {
            task_for: "Acme".into(),
            task_name: "Release".into(),
            task_details: "Shipped".into(),
            my_role: "Lead".into(),
        }],
    )
}

#[tokio::test]
async fn reads_directory_and_companies() {
    let mock = MockBackend::new();
    let api = backend(&mock.start().await);

    let employees = api.employees().await.unwrap();
    assert_eq!(employees.len(), 2);
    assert_eq!(employees[0].id, "101");
    assert_eq!(employees[1].id, "E-202");
    assert!(employees[0].matches_email("a@X.com"));

    let companies = api.companies().await.unwrap();
    assert_eq!(companies, vec!["Acme", "Globex"]);
    assert_eq!(mock.company_hits(), 1);
}

#[tokio::test]
async fn trailing_slash_in_base_url_is_ignored() {
    let mock = MockBackend::new();
    let base = format!("{}/", mock.start().await);
    let api = backend(&base);
    assert!(!api.base_url().ends_with('/'));
    assert_eq!(api.companies().await.unwrap().len(), 2);
}

#[tokio::test]
async fn submit_posts_json_and_parses_receipt() {
    let mock = MockBackend::new();
    let api = backend(&mock.start().await);

    let receipt = api.submit(&checkout_payload()).await.unwrap();
    assert_eq!(receipt.status.as_deref(), Some("checked_in"));
    assert_eq!(
        mock.received(),
        vec![json!({
            "email": "a@x.com",
            "action": "checkout",
            "tasks": [{
                "task_for": "Acme",
                "task_name": "Release",
                "task_details": "Shipped",
                "my_role": "Lead"
            }]
        })]
    );
}

#[tokio::test]
async fn rejection_carries_server_detail() {
    let mock = MockBackend::new();
    mock.reply_with(StatusCode::BAD_REQUEST, json!({ "detail": "late checkout" }));
    let api = backend(&mock.start().await);

    let err = api.submit(&checkout_payload()).await.unwrap_err();
    assert_eq!(
        err,
        FormError::Rejected {
            status: 400,
            detail: "late checkout".into()
        }
    );
    assert_eq!(err.user_message(), "Error: late checkout");
}

#[tokio::test]
async fn rejection_without_detail_uses_raw_body() {
    let mock = MockBackend::new();
    mock.reply_with(StatusCode::FORBIDDEN, json!({ "reason": "ip" }));
    let api = backend(&mock.start().await);

    let err = api.submit(&checkout_payload()).await.unwrap_err();
    assert_eq!(err.user_message(), r#"Error: {"reason":"ip"}"#);
}

#[tokio::test]
async fn unreachable_backend_is_a_transport_failure() {
    let port = {
        let listener = TcpListener::bind("127.0.0.1:0").expect("bind random port");
        listener.local_addr().unwrap().port()
    };
    let api = backend(&format!("http://127.0.0.1:{port}"));

    let err = api.employees().await.unwrap_err();
    assert!(matches!(err, FormError::Transport(_)), "unexpected error: {err:?}");
}
