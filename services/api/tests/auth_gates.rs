//! Router tests that stop before any query runs
//!
//! Auth and role checks, id parsing and body validation all reject a request
//! before a repository is called, so these run against a pool that never
//! connects.

mod support;

use axum::http::{Method, StatusCode};
use hope_sanctuary_api::models::Role;
use serde_json::json;
use support::{TestApp, empty_request, file_count, json_request, multipart_request};
use uuid::Uuid;

#[tokio::test]
async fn adoption_form_without_token_is_unauthorized() {
    let app = TestApp::without_database().await;

    let body = json!({
        "pet": Uuid::new_v4(),
        "name": "Jane Doe",
        "phoneNumber": "555-0100",
        "email": "jane@example.org",
        "addressLine": "1 Main St",
        "city": "Springfield",
        "zipCode": "12345"
    });
    let (status, body) = app
        .send(json_request(Method::POST, "/api/adoption-forms", None, body))
        .await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["message"], "Unauthorized");
    app.cleanup().await;
}

#[tokio::test]
async fn user_token_cannot_delete_pets() {
    let app = TestApp::without_database().await;
    let token = app.token(Role::User);

    let uri = format!("/api/pets/{}", Uuid::new_v4());
    let (status, body) = app
        .send(empty_request(Method::DELETE, &uri, Some(&token)))
        .await;

    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["message"], "Forbidden");
    app.cleanup().await;
}

#[tokio::test]
async fn garbage_token_is_unauthorized() {
    let app = TestApp::without_database().await;

    let uri = format!("/api/pets/{}", Uuid::new_v4());
    let (status, _) = app
        .send(empty_request(Method::DELETE, &uri, Some("not-a-token")))
        .await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    app.cleanup().await;
}

#[tokio::test]
async fn admin_only_listings_reject_users() {
    let app = TestApp::without_database().await;
    let token = app.token(Role::User);

    for uri in ["/api/users", "/api/adoption-forms", "/api/contact-forms"] {
        let (status, _) = app.send(empty_request(Method::GET, uri, Some(&token))).await;
        assert_eq!(status, StatusCode::FORBIDDEN, "GET {uri}");
    }

    for uri in ["/api/users", "/api/adoption-forms", "/api/contact-forms"] {
        let (status, _) = app.send(empty_request(Method::GET, uri, None)).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED, "GET {uri}");
    }
    app.cleanup().await;
}

#[tokio::test]
async fn user_token_cannot_flag_contact_forms() {
    let app = TestApp::without_database().await;
    let token = app.token(Role::User);

    let uri = format!("/api/contact-forms/{}/flags", Uuid::new_v4());
    let (status, _) = app
        .send(json_request(Method::PATCH, &uri, Some(&token), json!({ "read": true })))
        .await;

    assert_eq!(status, StatusCode::FORBIDDEN);
    app.cleanup().await;
}

#[tokio::test]
async fn admin_signup_needs_an_admin_token() {
    let app = TestApp::without_database().await;
    let body = json!({
        "firstName": "Eve",
        "lastName": "Sneaky",
        "email": "eve@example.org",
        "phoneNumber": "555-0199",
        "password": "Password123",
        "role": "admin"
    });

    let (status, _) = app
        .send(json_request(Method::POST, "/api/users/signup", None, body.clone()))
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let token = app.token(Role::User);
    let (status, _) = app
        .send(json_request(Method::POST, "/api/users/signup", Some(&token), body))
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    app.cleanup().await;
}

#[tokio::test]
async fn malformed_id_is_a_bad_request() {
    let app = TestApp::without_database().await;
    let token = app.token(Role::Admin);

    let (status, body) = app
        .send(empty_request(Method::DELETE, "/api/pets/not-an-id", Some(&token)))
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Invalid id");
    app.cleanup().await;
}

#[tokio::test]
async fn invalid_pet_fields_are_reported() {
    let app = TestApp::without_database().await;
    let token = app.token(Role::Admin);

    let body = json!({ "name": "Biscuit", "age": "three", "vaccinated": "true" });
    let (status, body) = app
        .send(json_request(Method::POST, "/api/pets", Some(&token), body))
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Validation failed");
    let fields: Vec<&str> = body["details"]
        .as_array()
        .unwrap()
        .iter()
        .filter_map(|detail| detail["field"].as_str())
        .collect();
    assert!(fields.contains(&"species"));
    assert!(fields.contains(&"age"));
    assert!(fields.contains(&"adoptionFee"));
    assert!(!fields.contains(&"name"));
    app.cleanup().await;
}

#[tokio::test]
async fn rejected_pet_upload_is_removed() {
    let app = TestApp::without_database().await;
    let token = app.token(Role::Admin);

    let request = multipart_request(
        Method::POST,
        "/api/pets",
        Some(&token),
        &[
            ("name", None, b"Biscuit".as_slice()),
            ("picture", Some("biscuit.png"), b"\x89PNG\r\n\x1a\n".as_slice()),
        ],
    );
    let (status, body) = app.send(request).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Validation failed");
    assert_eq!(file_count(&app.uploads_dir()).await, 0);
    app.cleanup().await;
}

#[tokio::test]
async fn unexpected_file_field_is_rejected() {
    let app = TestApp::without_database().await;
    let token = app.token(Role::Admin);

    let request = multipart_request(
        Method::POST,
        "/api/pets",
        Some(&token),
        &[
            ("picture", Some("biscuit.png"), b"first".as_slice()),
            ("photo", Some("other.png"), b"second".as_slice()),
        ],
    );
    let (status, _) = app.send(request).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(file_count(&app.uploads_dir()).await, 0);
    app.cleanup().await;
}

#[tokio::test]
async fn adoption_form_requires_a_pet() {
    let app = TestApp::without_database().await;
    let token = app.token(Role::User);

    let body = json!({
        "name": "Jane Doe",
        "phoneNumber": "555-0100",
        "email": "jane@example.org",
        "addressLine": "1 Main St",
        "city": "Springfield",
        "zipCode": "12345"
    });
    let (status, body) = app
        .send(json_request(Method::POST, "/api/adoption-forms", Some(&token), body))
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["details"][0]["field"], "pet");
    app.cleanup().await;
}

#[tokio::test]
async fn unknown_routes_use_the_error_shape() {
    let app = TestApp::without_database().await;

    let (status, body) = app
        .send(empty_request(Method::GET, "/api/kennels", None))
        .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "Route not found");
    app.cleanup().await;
}

#[tokio::test]
async fn health_reports_unreachable_database() {
    let app = TestApp::without_database().await;

    let (status, body) = app.send(empty_request(Method::GET, "/health", None)).await;

    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body["database"], false);
    app.cleanup().await;
}

#[tokio::test]
async fn rejected_pet_update_removes_its_upload() {
    let app = TestApp::without_database().await;
    let token = app.token(Role::Admin);

    let uri = format!("/api/pets/{}", Uuid::new_v4());
    let request = multipart_request(
        Method::PUT,
        &uri,
        Some(&token),
        &[
            ("age", None, b"three".as_slice()),
            ("picture", Some("biscuit.png"), b"\x89PNG\r\n\x1a\n".as_slice()),
        ],
    );
    let (status, body) = app.send(request).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["details"][0]["field"], "age");
    assert_eq!(file_count(&app.uploads_dir()).await, 0);
    app.cleanup().await;
}

#[tokio::test]
async fn oversized_upload_is_payload_too_large() {
    let app = TestApp::without_database().await;
    let token = app.token(Role::Admin);

    let picture = vec![0u8; 2 * 1024 * 1024];
    let request = multipart_request(
        Method::POST,
        "/api/pets",
        Some(&token),
        &[
            ("name", None, b"Biscuit".as_slice()),
            ("picture", Some("huge.png"), picture.as_slice()),
        ],
    );
    let (status, body) = app.send(request).await;

    assert_eq!(status, StatusCode::PAYLOAD_TOO_LARGE);
    assert_eq!(body["message"], "Payload too large");
    assert_eq!(file_count(&app.uploads_dir()).await, 0);
    app.cleanup().await;
}

#[tokio::test]
async fn adoption_form_update_cannot_blank_required_fields() {
    let app = TestApp::without_database().await;
    let token = app.token(Role::Admin);

    let uri = format!("/api/adoption-forms/{}", Uuid::new_v4());
    let body = json!({ "name": "", "email": "not-an-email" });
    let (status, body) = app
        .send(json_request(Method::PUT, &uri, Some(&token), body))
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    let fields: Vec<&str> = body["details"]
        .as_array()
        .unwrap()
        .iter()
        .filter_map(|detail| detail["field"].as_str())
        .collect();
    assert_eq!(fields, ["name", "email"]);
    app.cleanup().await;
}
