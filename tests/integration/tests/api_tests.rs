//! API integration tests
//!
//! The router runs in process over the in-memory store and cache, so these
//! tests need no external services.

use axum::http::StatusCode;
use integration_tests::*;
use serde_json::json;

async fn create(app: &MemoryApp, body: &CreateUserBody) -> UserBody {
    oneshot_post(&app.router, "/users", body)
        .await
        .unwrap()
        .json(StatusCode::CREATED)
        .unwrap()
}

// ============================================================================
// Health Tests
// ============================================================================

#[tokio::test]
async fn test_health_check() {
    let app = MemoryApp::new();

    let response = oneshot_get(&app.router, "/health").await.unwrap();
    let body: serde_json::Value = response.json(StatusCode::OK).unwrap();

    assert_eq!(body["status"], "healthy");
    assert!(response.header("x-request-id").is_some());
}

#[tokio::test]
async fn test_readiness_reports_dependencies() {
    let app = MemoryApp::new();

    let response = oneshot_get(&app.router, "/health/ready").await.unwrap();
    let body: serde_json::Value = response.json(StatusCode::OK).unwrap();
    assert_eq!(body["status"], "ready");
    assert_eq!(body["checks"]["cache"], "healthy");

    app.cache.set_offline(true);
    let response = oneshot_get(&app.router, "/health/ready").await.unwrap();
    let body: serde_json::Value = response.json(StatusCode::SERVICE_UNAVAILABLE).unwrap();
    assert_eq!(body["checks"]["database"], "healthy");
    assert_eq!(body["checks"]["cache"], "unhealthy");
}

#[tokio::test]
async fn test_cache_health() {
    let app = MemoryApp::new();

    let response = oneshot_get(&app.router, "/health/cache").await.unwrap();
    let body: serde_json::Value = response.json(StatusCode::OK).unwrap();
    assert_eq!(body["connection"]["phase"], "connected");
    assert!(body["stats"]["usedMemory"].is_string());

    app.cache.set_offline(true);
    let response = oneshot_get(&app.router, "/health/cache").await.unwrap();
    let body: serde_json::Value = response.json(StatusCode::SERVICE_UNAVAILABLE).unwrap();
    assert_eq!(body["connection"]["phase"], "disconnected");
}

// ============================================================================
// Create Tests
// ============================================================================

#[tokio::test]
async fn test_create_user_echoes_profile() {
    let app = MemoryApp::new();
    let request = CreateUserBody::full();

    let response = oneshot_post(&app.router, "/users", &request).await.unwrap();
    let raw: serde_json::Value = response.json(StatusCode::CREATED).unwrap();
    assert!(raw.get("password").is_none());
    assert!(raw.get("passwordHash").is_none());

    let user: UserBody = serde_json::from_value(raw).unwrap();
    assert_eq!(user.email, request.email);
    assert_eq!(user.name, request.name);
    assert_eq!(user.phone, request.phone);
    assert_eq!(user.avatar, request.avatar);
    assert_eq!(user.address, request.address);
    assert_eq!(user.bio, request.bio);
    assert_eq!(user.role, "USER");
    assert_eq!(user.status, "ACTIVE");
    assert!(!user.is_email_verified);
    assert!(user.last_login.is_none());
    assert_eq!(
        user.birthdate.unwrap().to_rfc3339(),
        "1990-12-10T00:00:00+00:00"
    );

    let stored = app.repo.hash_by_email(&request.email).unwrap();
    assert_ne!(stored, request.password);
}

#[tokio::test]
async fn test_create_duplicate_email() {
    let app = MemoryApp::new();
    let request = CreateUserBody::unique();
    create(&app, &request).await;

    let response = oneshot_post(&app.router, "/users", &request).await.unwrap();
    let body: ErrorBody = response.json(StatusCode::CONFLICT).unwrap();

    assert_eq!(body.error.code, "EMAIL_ALREADY_EXISTS");
    assert_eq!(app.repo.len(), 1);
}

#[tokio::test]
async fn test_create_missing_password() {
    let app = MemoryApp::new();
    let body = json!({ "email": "nopass@example.com" }).to_string();

    let response = oneshot_post_raw(&app.router, "/users", body).await.unwrap();
    let body: ErrorBody = response.json(StatusCode::BAD_REQUEST).unwrap();

    assert_eq!(body.error.code, "VALIDATION_ERROR");
    assert!(app.repo.is_empty());
}

#[tokio::test]
async fn test_create_invalid_email() {
    let app = MemoryApp::new();
    let request = CreateUserBody {
        email: "not-an-email".to_string(),
        ..CreateUserBody::unique()
    };

    let response = oneshot_post(&app.router, "/users", &request).await.unwrap();
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_create_malformed_json() {
    let app = MemoryApp::new();

    let response = oneshot_post_raw(&app.router, "/users", "{\"email\": ").await.unwrap();
    let body: ErrorBody = response.json(StatusCode::BAD_REQUEST).unwrap();

    assert_eq!(body.error.code, "INVALID_BODY");
}

#[tokio::test]
async fn test_create_bad_birthdate() {
    let app = MemoryApp::new();
    let request = CreateUserBody {
        birthdate: Some("the tenth of december".to_string()),
        ..CreateUserBody::unique()
    };

    let response = oneshot_post(&app.router, "/users", &request).await.unwrap();
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert!(app.repo.is_empty());
}

// ============================================================================
// Fetch Tests
// ============================================================================

#[tokio::test]
async fn test_get_user_by_id() {
    let app = MemoryApp::new();
    let created = create(&app, &CreateUserBody::full()).await;

    let response = oneshot_get(&app.router, &format!("/users/{}", created.id))
        .await
        .unwrap();
    let fetched: UserBody = response.json(StatusCode::OK).unwrap();

    assert_eq!(fetched.id, created.id);
    assert_eq!(fetched.email, created.email);
    assert_eq!(fetched.created_at, created.created_at);
}

#[tokio::test]
async fn test_get_unknown_user() {
    let app = MemoryApp::new();

    let response = oneshot_get(&app.router, "/users/999999999").await.unwrap();
    let body: ErrorBody = response.json(StatusCode::NOT_FOUND).unwrap();

    assert_eq!(body.error.code, "NOT_FOUND");
    assert!(body.error.message.contains("999999999"));
}

#[tokio::test]
async fn test_get_non_numeric_id() {
    let app = MemoryApp::new();

    for path in ["/users/abc", "/users/-1", "/users/1.5"] {
        let response = oneshot_get(&app.router, path).await.unwrap();
        let body: ErrorBody = response.json(StatusCode::BAD_REQUEST).unwrap();
        assert_eq!(body.error.code, "INVALID_PATH_PARAMETER", "{path}");
    }
}

#[tokio::test]
async fn test_store_failure_hides_details() {
    let app = MemoryApp::new();
    app.repo.set_failing(true);

    let response = oneshot_get(&app.router, "/users/1").await.unwrap();
    let body: ErrorBody = response.json(StatusCode::INTERNAL_SERVER_ERROR).unwrap();

    assert_eq!(body.error.message, "Internal server error");
    assert!(!body.error.message.contains("connection refused"));
}

// ============================================================================
// Listing Tests
// ============================================================================

#[tokio::test]
async fn test_listing_is_cached_until_create() {
    let app = MemoryApp::new();
    create(&app, &CreateUserBody::unique()).await;

    let first = oneshot_get(&app.router, "/users").await.unwrap();
    assert_eq!(first.header("x-cache"), Some("MISS"));
    let first_users: Vec<UserSummaryBody> = first.json(StatusCode::OK).unwrap();
    assert_eq!(first_users.len(), 1);

    let second = oneshot_get(&app.router, "/users").await.unwrap();
    assert_eq!(second.header("x-cache"), Some("HIT"));
    let second_users: Vec<UserSummaryBody> = second.json(StatusCode::OK).unwrap();
    assert_eq!(second_users, first_users);

    create(&app, &CreateUserBody::unique()).await;

    let third = oneshot_get(&app.router, "/users").await.unwrap();
    assert_eq!(third.header("x-cache"), Some("MISS"));
    let third_users: Vec<UserSummaryBody> = third.json(StatusCode::OK).unwrap();
    assert_eq!(third_users.len(), 2);
}

#[tokio::test]
async fn test_listing_pages() {
    let app = MemoryApp::new();
    let mut emails = Vec::new();
    for _ in 0..3 {
        emails.push(create(&app, &CreateUserBody::unique()).await.email);
    }

    let response = oneshot_get(&app.router, "/users?page=2&limit=2").await.unwrap();
    let users: Vec<UserSummaryBody> = response.json(StatusCode::OK).unwrap();
    assert_eq!(users.len(), 1);
    assert_eq!(users[0].email, emails[2]);

    let response = oneshot_get(&app.router, "/users?page=9&limit=2").await.unwrap();
    let users: Vec<UserSummaryBody> = response.json(StatusCode::OK).unwrap();
    assert!(users.is_empty());
}

#[tokio::test]
async fn test_listing_rejects_bad_paging() {
    let app = MemoryApp::new();

    for uri in ["/users?page=0", "/users?limit=0"] {
        let response = oneshot_get(&app.router, uri).await.unwrap();
        let body: ErrorBody = response.json(StatusCode::BAD_REQUEST).unwrap();
        assert_eq!(body.error.code, "VALIDATION_ERROR", "{uri}");
    }

    for uri in ["/users?limit=abc", "/users?page=-5"] {
        let response = oneshot_get(&app.router, uri).await.unwrap();
        let body: ErrorBody = response.json(StatusCode::BAD_REQUEST).unwrap();
        assert_eq!(body.error.code, "INVALID_QUERY_PARAMETER", "{uri}");
    }
}

#[tokio::test]
async fn test_listing_bypasses_offline_cache() {
    let app = MemoryApp::new();
    let created = create(&app, &CreateUserBody::unique()).await;
    app.cache.set_offline(true);

    let response = oneshot_get(&app.router, "/users").await.unwrap();
    assert_eq!(response.header("x-cache"), Some("BYPASS"));
    let users: Vec<UserSummaryBody> = response.json(StatusCode::OK).unwrap();
    assert_eq!(users[0].email, created.email);

    app.cache.set_offline(false);
    assert!(app.cache.is_empty());
}

#[tokio::test]
async fn test_create_survives_offline_cache() {
    let app = MemoryApp::new();
    app.cache.set_offline(true);

    let response = oneshot_post(&app.router, "/users", &CreateUserBody::unique())
        .await
        .unwrap();

    assert_eq!(response.status, StatusCode::CREATED);
    assert_eq!(app.repo.len(), 1);
}

// ============================================================================
// Served over TCP
// ============================================================================

#[tokio::test]
async fn test_served_over_tcp() {
    let app = MemoryApp::new();
    let server = TestServer::serve(app.router.clone()).await.unwrap();

    let request = CreateUserBody::unique();
    let response = server.post("/users", &request).await.unwrap();
    let created: UserBody = assert_json(response, StatusCode::CREATED).await.unwrap();

    let response = server.get(&format!("/users/{}", created.id)).await.unwrap();
    let fetched: UserBody = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(fetched.email, request.email);

    let response = server.get("/users/abc").await.unwrap();
    assert_status(response, StatusCode::BAD_REQUEST).await.unwrap();
}
