//! End-to-end API tests over the full router with an in-memory backend.

use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode, header},
};
use medvisit_auth::AuthConfig;
use medvisit_server::{AppState, build_app};
use serde_json::{Value, json};
use tower::ServiceExt;

fn app() -> Router {
    let auth = AuthConfig {
        bootstrap_admin_email: Some("boss@example.com".to_string()),
        ..AuthConfig::default()
    };
    build_app(AppState::new(auth))
}

fn get(uri: &str, user: &str, role: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().uri(uri).header("x-auth-user", user);
    if let Some(role) = role {
        builder = builder.header("x-auth-role", role);
    }
    builder.body(Body::empty()).unwrap()
}

fn send_json(method: &str, uri: &str, user: &str, role: Option<&str>, body: Value) -> Request<Body> {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header("x-auth-user", user)
        .header(header::CONTENT_TYPE, "application/json");
    if let Some(role) = role {
        builder = builder.header("x-auth-role", role);
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

async fn body_json(response: axum::response::Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn test_health() {
    let response = app().oneshot(get("/health", "anyone", None)).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_missing_identity_rejected() {
    let response = app()
        .oneshot(Request::builder().uri("/profile").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let body = body_json(response).await;
    assert_eq!(body["error"], "not_authenticated");
}

#[tokio::test]
async fn test_profile_seeded_from_claim_once() {
    let app = app();

    let response = app
        .clone()
        .oneshot(get("/profile", "a1", Some("admin")))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["role"], "admin");

    // Claims never change an existing profile.
    let response = app
        .clone()
        .oneshot(get("/profile", "a1", Some("visitor")))
        .await
        .unwrap();
    assert_eq!(body_json(response).await["role"], "admin");

    // Unknown claim seeds visitor.
    let response = app
        .oneshot(get("/profile", "u2", Some("superuser")))
        .await
        .unwrap();
    assert_eq!(body_json(response).await["role"], "visitor");
}

#[tokio::test]
async fn test_promote_self() {
    let app = app();

    let request = Request::builder()
        .method("POST")
        .uri("/profile/promote-self")
        .header("x-auth-user", "u1")
        .header("x-auth-email", "Boss@Example.com")
        .body(Body::empty())
        .unwrap();
    let response = app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["role"], "admin");

    // Non-allow-listed email is rejected and the profile stays visitor.
    let request = Request::builder()
        .method("POST")
        .uri("/profile/promote-self")
        .header("x-auth-user", "u2")
        .header("x-auth-email", "other@example.com")
        .body(Body::empty())
        .unwrap();
    let response = app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let response = app.oneshot(get("/profile", "u2", None)).await.unwrap();
    assert_eq!(body_json(response).await["role"], "visitor");
}

#[tokio::test]
async fn test_role_update_admin_gated() {
    let app = app();

    // Seed both profiles.
    app.clone()
        .oneshot(get("/profile", "a1", Some("admin")))
        .await
        .unwrap();
    app.clone().oneshot(get("/profile", "v1", None)).await.unwrap();

    // Visitor cannot change roles.
    let response = app
        .clone()
        .oneshot(send_json(
            "POST",
            "/users/a1/role",
            "v1",
            None,
            json!({"role": "visitor"}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    // Target unchanged.
    let response = app
        .clone()
        .oneshot(get("/profile", "a1", None))
        .await
        .unwrap();
    assert_eq!(body_json(response).await["role"], "admin");

    // Admin can.
    let response = app
        .clone()
        .oneshot(send_json(
            "POST",
            "/users/v1/role",
            "a1",
            None,
            json!({"role": "admin"}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["role"], "admin");

    // Unknown role value fails deserialization.
    let response = app
        .oneshot(send_json(
            "POST",
            "/users/v1/role",
            "a1",
            None,
            json!({"role": "root"}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn test_catalog_scoping_end_to_end() {
    let app = app();

    // Admin creates two doctors.
    let response = app
        .clone()
        .oneshot(send_json(
            "POST",
            "/doctors",
            "a1",
            Some("admin"),
            json!({"name": "Dr. Reyes"}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    let d1 = body_json(response).await["id"].as_str().unwrap().to_string();

    let response = app
        .clone()
        .oneshot(send_json(
            "POST",
            "/doctors",
            "a1",
            Some("admin"),
            json!({"name": "Dr. Gomez"}),
        ))
        .await
        .unwrap();
    let d2 = body_json(response).await["id"].as_str().unwrap().to_string();

    // Visitor with no assignments sees nothing.
    app.clone().oneshot(get("/profile", "v1", None)).await.unwrap();
    let response = app.clone().oneshot(get("/doctors", "v1", None)).await.unwrap();
    assert_eq!(body_json(response).await.as_array().unwrap().len(), 0);

    // Assign one doctor.
    let response = app
        .clone()
        .oneshot(send_json(
            "PUT",
            "/users/v1/assignments",
            "a1",
            None,
            json!({"doctors": [d1]}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = app.clone().oneshot(get("/doctors", "v1", None)).await.unwrap();
    let listed = body_json(response).await;
    assert_eq!(listed.as_array().unwrap().len(), 1);
    assert_eq!(listed[0]["name"], "Dr. Reyes");

    // The unassigned doctor reads as missing for the visitor.
    let response = app
        .clone()
        .oneshot(get(&format!("/doctors/{d2}"), "v1", None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    // Visitor cannot create doctors.
    let response = app
        .oneshot(send_json(
            "POST",
            "/doctors",
            "v1",
            None,
            json!({"name": "Dr. Mine"}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_doctor_center_limit_over_http() {
    let response = app()
        .oneshot(send_json(
            "POST",
            "/doctors",
            "a1",
            Some("admin"),
            json!({"name": "Dr. Reyes", "medicalCenters": ["c1", "c2", "c3"]}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert_eq!(body["error"], "validation_error");
}

#[tokio::test]
async fn test_visit_referential_validation() {
    let app = app();

    // Admin creates a doctor and assigns it to v1.
    let response = app
        .clone()
        .oneshot(send_json(
            "POST",
            "/doctors",
            "a1",
            Some("admin"),
            json!({"name": "Dr. Reyes"}),
        ))
        .await
        .unwrap();
    let d1 = body_json(response).await["id"].as_str().unwrap().to_string();

    app.clone().oneshot(get("/profile", "v1", None)).await.unwrap();
    app.clone()
        .oneshot(send_json(
            "PUT",
            "/users/v1/assignments",
            "a1",
            None,
            json!({"doctors": [d1]}),
        ))
        .await
        .unwrap();

    // In-scope visit succeeds.
    let response = app
        .clone()
        .oneshot(send_json(
            "POST",
            "/visits",
            "v1",
            None,
            json!({"doctorId": d1, "date": "2026-08-20T10:00:00Z"}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);

    // Out-of-scope doctor is rejected.
    let response = app
        .clone()
        .oneshot(send_json(
            "POST",
            "/visits",
            "v1",
            None,
            json!({"doctorId": "ghost", "date": "2026-08-20T10:00:00Z"}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    // Visitor sees only their own visits.
    let response = app.clone().oneshot(get("/visits", "v1", None)).await.unwrap();
    assert_eq!(body_json(response).await.as_array().unwrap().len(), 1);
    let response = app.oneshot(get("/visits", "v2", None)).await.unwrap();
    assert_eq!(body_json(response).await.as_array().unwrap().len(), 0);
}

#[tokio::test]
async fn test_admin_endpoints_gated() {
    let app = app();
    app.clone().oneshot(get("/profile", "v1", None)).await.unwrap();

    for uri in ["/users", "/admin/stats", "/admin/activity"] {
        let response = app.clone().oneshot(get(uri, "v1", None)).await.unwrap();
        assert_eq!(response.status(), StatusCode::FORBIDDEN, "{uri}");
    }

    let response = app
        .clone()
        .oneshot(get("/admin/stats", "a1", Some("admin")))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let stats = body_json(response).await;
    assert_eq!(stats["users"], 2);
    assert_eq!(stats["visits"], 0);

    // Mutations above were audited; the log lists newest first.
    let response = app
        .oneshot(get("/admin/activity", "a1", None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_webhook_sync() {
    let app = app();

    let event = json!({
        "type": "user.created",
        "data": {"externalId": "u1", "name": "Ana", "role": "visitor"}
    });
    let request = Request::builder()
        .method("POST")
        .uri("/webhooks/identity")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(event.to_string()))
        .unwrap();
    let response = app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let profile = body_json(response).await;
    assert_eq!(profile["name"], "Ana");
    assert_eq!(profile["role"], "visitor");

    // Role-less update preserves the stored role.
    let event = json!({
        "type": "user.updated",
        "data": {"externalId": "u1", "name": "Ana Maria"}
    });
    let request = Request::builder()
        .method("POST")
        .uri("/webhooks/identity")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(event.to_string()))
        .unwrap();
    let response = app.oneshot(request).await.unwrap();
    let profile = body_json(response).await;
    assert_eq!(profile["name"], "Ana Maria");
    assert_eq!(profile["role"], "visitor");
}

#[tokio::test]
async fn test_user_deletion() {
    let app = app();
    app.clone().oneshot(get("/profile", "v1", None)).await.unwrap();

    let request = Request::builder()
        .method("DELETE")
        .uri("/users/v1")
        .header("x-auth-user", "a1")
        .header("x-auth-role", "admin")
        .body(Body::empty())
        .unwrap();
    let response = app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let request = Request::builder()
        .method("DELETE")
        .uri("/users/ghost")
        .header("x-auth-user", "a1")
        .body(Body::empty())
        .unwrap();
    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
