// End-to-end tests for the HTTP surface, running the router against
// in-memory doubles for the document store and the media store.

use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use serde_json::{json, Value};
use tower::ServiceExt;

use server_core::domains::auth::{AdminAccount, JwtService};
use server_core::kernel::test_dependencies::{
    InMemoryAdminDirectory, InMemoryListingRepo, MockMediaStore,
};
use server_core::kernel::{BaseAdminDirectory, ServerDeps};
use server_core::server::build_app;

const ADMIN_USERNAME: &str = "marketplace_admin";
const ADMIN_PASSWORD: &str = "correct horse battery staple";

struct TestApp {
    app: Router,
    media: Arc<MockMediaStore>,
}

async fn test_app() -> TestApp {
    test_app_with_media(MockMediaStore::new()).await
}

async fn test_app_with_media(media: MockMediaStore) -> TestApp {
    let admins = Arc::new(InMemoryAdminDirectory::new());
    admins
        .insert(&AdminAccount::new(ADMIN_USERNAME, ADMIN_PASSWORD).unwrap())
        .await
        .unwrap();

    let media = Arc::new(media);
    let deps = ServerDeps::new(
        Arc::new(InMemoryListingRepo::new()),
        admins,
        media.clone(),
        Arc::new(JwtService::new("test_secret", "test_issuer".to_string())),
    );

    TestApp {
        app: build_app(deps, Vec::new()),
        media,
    }
}

/// Build a multipart/form-data body from text fields.
fn multipart_body(fields: &[(&str, &str)]) -> (String, Body) {
    let boundary = "test-boundary-7MA4YWxkTrZu0gW";
    let mut body = String::new();
    for (name, value) in fields {
        body.push_str(&format!(
            "--{boundary}\r\nContent-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n"
        ));
    }
    body.push_str(&format!("--{boundary}--\r\n"));
    (
        format!("multipart/form-data; boundary={boundary}"),
        Body::from(body),
    )
}

fn lamp_fields() -> Vec<(&'static str, &'static str)> {
    vec![
        ("name", "Lamp"),
        ("description", "Desk lamp"),
        ("price", "10"),
        ("sellerName", "A"),
        ("sellerContact", "123"),
        ("productAge", "1yr"),
    ]
}

async fn read_json(response: axum::response::Response) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

async fn submit_product(app: &Router) -> Value {
    let (content_type, body) = multipart_body(&lamp_fields());
    let response = app
        .clone()
        .oneshot(
            Request::post("/listings/products")
                .header(header::CONTENT_TYPE, content_type)
                .body(body)
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    read_json(response).await
}

async fn login(app: &Router) -> String {
    let response = app
        .clone()
        .oneshot(
            Request::post("/admin/login")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(
                    json!({ "username": ADMIN_USERNAME, "password": ADMIN_PASSWORD }).to_string(),
                ))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = read_json(response).await;
    assert_eq!(body["username"], ADMIN_USERNAME);
    body["token"].as_str().unwrap().to_string()
}

#[tokio::test]
async fn login_rejects_bad_credentials() {
    let test = test_app().await;

    let response = test
        .app
        .oneshot(
            Request::post("/admin/login")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(
                    json!({ "username": ADMIN_USERNAME, "password": "wrong" }).to_string(),
                ))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let body = read_json(response).await;
    assert_eq!(body["message"], "Invalid credentials");
}

#[tokio::test]
async fn admin_routes_require_a_token() {
    let test = test_app().await;

    let response = test
        .app
        .clone()
        .oneshot(
            Request::get("/admin/listings/products/pending")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let response = test
        .app
        .oneshot(
            Request::get("/admin/listings/products/pending")
                .header(header::AUTHORIZATION, "Bearer not-a-token")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn submitted_product_starts_pending_and_hidden() {
    let test = test_app().await;

    let created = submit_product(&test.app).await;
    assert_eq!(created["status"], "pending");
    assert_eq!(created["isApproved"], false);
    assert_eq!(created["isSold"], false);
    assert_eq!(created["imageUrl"], Value::Null);

    // Not visible on the storefront yet
    let response = test
        .app
        .clone()
        .oneshot(Request::get("/listings/products").body(Body::empty()).unwrap())
        .await
        .unwrap();
    let listings = read_json(response).await;
    assert_eq!(listings.as_array().unwrap().len(), 0);

    // But reachable directly by id
    let id = created["id"].as_str().unwrap();
    let response = test
        .app
        .oneshot(
            Request::get(format!("/listings/products/{id}"))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let fetched = read_json(response).await;
    assert_eq!(fetched["name"], "Lamp");
    assert_eq!(fetched["price"], 10.0);
}

#[tokio::test]
async fn empty_title_is_rejected_with_no_side_effects() {
    let test = test_app().await;

    let mut fields = lamp_fields();
    fields[0] = ("name", "");
    let (content_type, body) = multipart_body(&fields);

    let response = test
        .app
        .clone()
        .oneshot(
            Request::post("/listings/products")
                .header(header::CONTENT_TYPE, content_type)
                .body(body)
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = read_json(response).await;
    assert_eq!(body["message"], "Product name is required");
    assert!(test.media.upload_calls().is_empty());

    // Nothing stored
    let response = test
        .app
        .oneshot(Request::get("/listings/products").body(Body::empty()).unwrap())
        .await
        .unwrap();
    let listings = read_json(response).await;
    assert_eq!(listings.as_array().unwrap().len(), 0);
}

#[tokio::test]
async fn non_numeric_price_is_rejected() {
    let test = test_app().await;

    let mut fields = lamp_fields();
    fields[2] = ("price", "ten");
    let (content_type, body) = multipart_body(&fields);

    let response = test
        .app
        .oneshot(
            Request::post("/listings/products")
                .header(header::CONTENT_TYPE, content_type)
                .body(body)
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = read_json(response).await;
    assert_eq!(body["message"], "Price must be a number");
}

#[tokio::test]
async fn moderation_flow_reject_then_approve() {
    let test = test_app().await;
    let created = submit_product(&test.app).await;
    let id = created["id"].as_str().unwrap().to_string();
    let token = login(&test.app).await;

    // Reject with a reason
    let response = test
        .app
        .clone()
        .oneshot(
            Request::patch(format!("/admin/listings/products/{id}/reject"))
                .header(header::AUTHORIZATION, format!("Bearer {token}"))
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(json!({ "reason": "blurry photo" }).to_string()))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = read_json(response).await;
    assert_eq!(body["listing"]["status"], "rejected");
    assert_eq!(body["listing"]["reason"], "blurry photo");
    assert_eq!(body["listing"]["isApproved"], false);

    // Approve on re-review
    let response = test
        .app
        .clone()
        .oneshot(
            Request::put(format!("/admin/listings/products/{id}/approve"))
                .header(header::AUTHORIZATION, format!("Bearer {token}"))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = read_json(response).await;
    assert_eq!(body["listing"]["status"], "approved");
    assert_eq!(body["listing"]["isApproved"], true);

    // Now visible on the storefront
    let response = test
        .app
        .oneshot(Request::get("/listings/products").body(Body::empty()).unwrap())
        .await
        .unwrap();
    let listings = read_json(response).await;
    let listings = listings.as_array().unwrap();
    assert_eq!(listings.len(), 1);
    assert_eq!(listings[0]["id"], id.as_str());
}

#[tokio::test]
async fn approve_twice_is_a_no_op_success() {
    let test = test_app().await;
    let created = submit_product(&test.app).await;
    let id = created["id"].as_str().unwrap().to_string();
    let token = login(&test.app).await;

    for _ in 0..2 {
        let response = test
            .app
            .clone()
            .oneshot(
                Request::put(format!("/admin/listings/products/{id}/approve"))
                    .header(header::AUTHORIZATION, format!("Bearer {token}"))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = read_json(response).await;
        assert_eq!(body["listing"]["status"], "approved");
    }
}

#[tokio::test]
async fn marking_sold_flips_legacy_flags_and_hides_listing() {
    let test = test_app().await;
    let created = submit_product(&test.app).await;
    let id = created["id"].as_str().unwrap().to_string();
    let token = login(&test.app).await;

    test.app
        .clone()
        .oneshot(
            Request::put(format!("/admin/listings/products/{id}/approve"))
                .header(header::AUTHORIZATION, format!("Bearer {token}"))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    let response = test
        .app
        .clone()
        .oneshot(
            Request::patch(format!("/listings/products/{id}/status"))
                .header(header::AUTHORIZATION, format!("Bearer {token}"))
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(json!({ "status": "sold" }).to_string()))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = read_json(response).await;
    assert_eq!(body["listing"]["isSold"], true);
    assert_eq!(body["listing"]["isApproved"], false);

    let response = test
        .app
        .oneshot(Request::get("/listings/products").body(Body::empty()).unwrap())
        .await
        .unwrap();
    let listings = read_json(response).await;
    assert_eq!(listings.as_array().unwrap().len(), 0);
}

#[tokio::test]
async fn status_values_are_kind_specific() {
    let test = test_app().await;
    let created = submit_product(&test.app).await;
    let id = created["id"].as_str().unwrap().to_string();
    let token = login(&test.app).await;

    let response = test
        .app
        .oneshot(
            Request::patch(format!("/listings/products/{id}/status"))
                .header(header::AUTHORIZATION, format!("Bearer {token}"))
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(json!({ "status": "out_of_service" }).to_string()))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn service_listings_use_service_field_names() {
    let test = test_app().await;

    let (content_type, body) = multipart_body(&[
        ("serviceTitle", "Math tutoring"),
        ("description", "Calculus help"),
        ("price", "15"),
        ("sellerName", "B"),
        ("sellerContact", "456"),
        ("serviceCategory", "Tutoring"),
        ("priceType", "hourly"),
        ("duration", "1 hour session"),
    ]);

    let response = test
        .app
        .oneshot(
            Request::post("/listings/services")
                .header(header::CONTENT_TYPE, content_type)
                .body(body)
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::CREATED);
    let created = read_json(response).await;
    assert_eq!(created["serviceTitle"], "Math tutoring");
    assert_eq!(created["priceType"], "hourly");
    assert_eq!(created["serviceCategory"], "Tutoring");
    assert_eq!(created["isOutOfService"], false);
    assert!(created.get("name").is_none());
}

#[tokio::test]
async fn unknown_listing_is_404() {
    let test = test_app().await;

    let response = test
        .app
        .oneshot(
            Request::get("/listings/products/does-not-exist")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body = read_json(response).await;
    assert_eq!(body["message"], "Product not found");
}

#[tokio::test]
async fn delete_requires_auth_and_removes_listing() {
    let test = test_app().await;
    let created = submit_product(&test.app).await;
    let id = created["id"].as_str().unwrap().to_string();

    // Without a token the record survives
    let response = test
        .app
        .clone()
        .oneshot(
            Request::delete(format!("/listings/products/{id}"))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let token = login(&test.app).await;
    let response = test
        .app
        .clone()
        .oneshot(
            Request::delete(format!("/listings/products/{id}"))
                .header(header::AUTHORIZATION, format!("Bearer {token}"))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = test
        .app
        .oneshot(
            Request::get(format!("/listings/products/{id}"))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn full_edit_updates_fields_and_syncs_status() {
    let test = test_app().await;
    let created = submit_product(&test.app).await;
    let id = created["id"].as_str().unwrap().to_string();
    let token = login(&test.app).await;

    let (content_type, body) = multipart_body(&[
        ("description", "Desk lamp, lightly used"),
        ("price", "8"),
        ("status", "approved"),
    ]);

    let response = test
        .app
        .oneshot(
            Request::put(format!("/listings/products/{id}"))
                .header(header::AUTHORIZATION, format!("Bearer {token}"))
                .header(header::CONTENT_TYPE, content_type)
                .body(body)
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = read_json(response).await;
    assert_eq!(body["listing"]["description"], "Desk lamp, lightly used");
    assert_eq!(body["listing"]["price"], 8.0);
    assert_eq!(body["listing"]["status"], "approved");
    assert_eq!(body["listing"]["isApproved"], true);
}

#[tokio::test]
async fn full_edit_rejects_empty_required_fields() {
    let test = test_app().await;
    let created = submit_product(&test.app).await;
    let id = created["id"].as_str().unwrap().to_string();
    let token = login(&test.app).await;

    let (content_type, body) = multipart_body(&[("name", ""), ("price", "8")]);
    let response = test
        .app
        .clone()
        .oneshot(
            Request::put(format!("/listings/products/{id}"))
                .header(header::AUTHORIZATION, format!("Bearer {token}"))
                .header(header::CONTENT_TYPE, content_type)
                .body(body)
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = read_json(response).await;
    assert_eq!(body["message"], "Product name is required");

    // Listing unchanged
    let response = test
        .app
        .oneshot(
            Request::get(format!("/listings/products/{id}"))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    let fetched = read_json(response).await;
    assert_eq!(fetched["name"], "Lamp");
    assert_eq!(fetched["price"], 10.0);
}

#[tokio::test]
async fn health_endpoint_reports_ok() {
    let test = test_app().await;

    let response = test
        .app
        .oneshot(Request::get("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = read_json(response).await;
    assert_eq!(body["status"], "healthy");
}
