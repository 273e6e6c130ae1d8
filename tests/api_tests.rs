//! End-to-end tests for the warehouse API over an isolated SQLite database.

use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode},
};
use depotr::config::Config;
use http_body_util::BodyExt;
use tower::ServiceExt;

const TEST_SECRET: &str = "test-secret";

async fn spawn_app() -> Router {
    let db_path = std::env::temp_dir().join(format!("depotr-test-{}.db", uuid::Uuid::new_v4()));

    let mut config = Config::default();
    config.general.database_url = format!("sqlite:{}", db_path.display());
    config.auth.jwt_secret = TEST_SECRET.to_string();

    let state = depotr::api::create_app_state(config)
        .await
        .expect("Failed to create app state");
    depotr::api::router(state)
}

async fn body_json(response: axum::response::Response) -> serde_json::Value {
    let body = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&body).unwrap()
}

fn json_request(method: &str, uri: &str, token: Option<&str>, body: &serde_json::Value) -> Request<Body> {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header("Content-Type", "application/json");
    if let Some(token) = token {
        builder = builder.header("Authorization", format!("Bearer {token}"));
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

fn get_request(uri: &str, token: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().uri(uri);
    if let Some(token) = token {
        builder = builder.header("Authorization", format!("Bearer {token}"));
    }
    builder.body(Body::empty()).unwrap()
}

/// Login as a seeded account and return a bearer token.
async fn login(app: &Router, username: &str, password: &str) -> String {
    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/login",
            None,
            &serde_json::json!({ "username": username, "password": password }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    body["access_token"].as_str().unwrap().to_string()
}

#[tokio::test]
async fn login_returns_token_with_matching_identity() {
    let app = spawn_app().await;

    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/login",
            None,
            &serde_json::json!({ "username": "salah", "password": "salah123" }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;

    assert_eq!(body["token_type"], "bearer");
    assert_eq!(body["user"]["username"], "salah");
    assert_eq!(body["user"]["name"], "Salah Abdi Ismail");
    assert_eq!(body["user"]["role"], "storekeeper");

    let claims =
        depotr::auth::verify_token(body["access_token"].as_str().unwrap(), TEST_SECRET).unwrap();
    assert_eq!(claims.sub, "salah");
    assert_eq!(claims.role, depotr::models::Role::Storekeeper);
}

#[tokio::test]
async fn login_with_wrong_password_is_unauthorized() {
    let app = spawn_app().await;

    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/login",
            None,
            &serde_json::json!({ "username": "salah", "password": "not-the-password" }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let body = body_json(response).await;
    assert!(body.get("access_token").is_none());

    // Unknown users get the same answer as bad passwords.
    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/login",
            None,
            &serde_json::json!({ "username": "nobody", "password": "whatever" }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn protected_routes_require_bearer_token() {
    let app = spawn_app().await;

    let response = app
        .clone()
        .oneshot(get_request("/api/items", None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let response = app
        .clone()
        .oneshot(get_request("/api/users", Some("not-a-real-token")))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn duplicate_create_conflicts_but_migrate_skips() {
    let app = spawn_app().await;
    let token = login(&app, "admin", "admin123").await;

    let new_user = serde_json::json!({
        "username": "faarax",
        "password": "faarax123",
        "name": "Faarax Warsame",
        "role": "storekeeper"
    });

    let response = app
        .clone()
        .oneshot(json_request("POST", "/api/users", Some(&token), &new_user))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    // Direct create of the same username errors.
    let response = app
        .clone()
        .oneshot(json_request("POST", "/api/users", Some(&token), &new_user))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert_eq!(body["detail"], "duplicate username");

    // Migrating the same record is silently skipped.
    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/migrate-users",
            Some(&token),
            &serde_json::json!([{ "username": "faarax", "password": "other" }]),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["status"], "success");

    // Still exactly one faarax.
    let response = app
        .clone()
        .oneshot(get_request("/api/users", Some(&token)))
        .await
        .unwrap();
    let users = body_json(response).await;
    let count = users
        .as_array()
        .unwrap()
        .iter()
        .filter(|u| u["username"] == "faarax")
        .count();
    assert_eq!(count, 1);
}

#[tokio::test]
async fn migrated_users_get_legacy_defaults() {
    let app = spawn_app().await;
    let token = login(&app, "admin", "admin123").await;

    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/migrate-users",
            Some(&token),
            &serde_json::json!([{ "username": "xaliimo" }]),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = app
        .clone()
        .oneshot(get_request("/api/users", Some(&token)))
        .await
        .unwrap();
    let users = body_json(response).await;
    let user = users
        .as_array()
        .unwrap()
        .iter()
        .find(|u| u["username"] == "xaliimo")
        .expect("migrated user missing")
        .clone();

    assert_eq!(user["name"], "xaliimo");
    assert_eq!(user["role"], "storekeeper");
    assert_eq!(user["status"], "Active");
    assert!(user.get("password_hash").is_none());

    // The default migration password works for login.
    login(&app, "xaliimo", "change_me").await;
}

#[tokio::test]
async fn patching_activity_status_changes_only_status() {
    let app = spawn_app().await;
    let token = login(&app, "salah", "salah123").await;

    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/activities",
            Some(&token),
            &serde_json::json!({
                "date": "07/02/2026",
                "action": "Geliyay: 20 Cupboard",
                "item_category": "Furniture",
                "recipient": "Main Warehouse",
                "user": "Salah Abdi Ismail",
                "comment": "Quarterly restock",
                "status": "Pending"
            }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let before = body_json(response).await;
    let id = before["id"].as_i64().unwrap();
    assert!(!before["created_at"].as_str().unwrap().is_empty());

    let response = app
        .clone()
        .oneshot(json_request(
            "PATCH",
            &format!("/api/activities/{id}"),
            Some(&token),
            &serde_json::json!({ "status": "Approved" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let after = body_json(response).await;

    assert_eq!(after["status"], "Approved");
    let mut expected = before.clone();
    expected["status"] = serde_json::json!("Approved");
    assert_eq!(after, expected);
}

#[tokio::test]
async fn invalid_activity_status_is_rejected() {
    let app = spawn_app().await;
    let token = login(&app, "salah", "salah123").await;

    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/activities",
            Some(&token),
            &serde_json::json!({
                "date": "07/02/2026",
                "action": "Bixiyay: 2 Chair",
                "recipient": "Xafiiska Waxbarashada",
                "user": "Salah Abdi Ismail"
            }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let created = body_json(response).await;
    // Unspecified status defaults to Approved.
    assert_eq!(created["status"], "Approved");
    let id = created["id"].as_i64().unwrap();

    let response = app
        .clone()
        .oneshot(json_request(
            "PATCH",
            &format!("/api/activities/{id}"),
            Some(&token),
            &serde_json::json!({ "status": "Shipped" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    // Rejection is part of the workflow, not an error.
    let response = app
        .clone()
        .oneshot(json_request(
            "PATCH",
            &format!("/api/activities/{id}"),
            Some(&token),
            &serde_json::json!({ "status": "Rejected" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["status"], "Rejected");
}

#[tokio::test]
async fn patching_missing_ids_returns_not_found() {
    let app = spawn_app().await;
    let token = login(&app, "admin", "admin123").await;

    let response = app
        .clone()
        .oneshot(json_request(
            "PATCH",
            "/api/activities/9999",
            Some(&token),
            &serde_json::json!({ "status": "Approved" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = app
        .clone()
        .oneshot(json_request(
            "PATCH",
            "/api/users/9999",
            Some(&token),
            &serde_json::json!({ "name": "Ghost" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("DELETE")
                .uri("/api/users/9999")
                .header("Authorization", format!("Bearer {token}"))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn deleting_user_removes_it_from_listing() {
    let app = spawn_app().await;
    let token = login(&app, "admin", "admin123").await;

    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/users",
            Some(&token),
            &serde_json::json!({
                "username": "cumar",
                "password": "cumar123",
                "name": "Cumar Maxamuud",
                "role": "manager",
                "status": "Active"
            }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let created = body_json(response).await;
    let id = created["id"].as_i64().unwrap();

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("DELETE")
                .uri(format!("/api/users/{id}"))
                .header("Authorization", format!("Bearer {token}"))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["status"], "success");

    let response = app
        .clone()
        .oneshot(get_request("/api/users", Some(&token)))
        .await
        .unwrap();
    let users = body_json(response).await;
    assert!(
        users
            .as_array()
            .unwrap()
            .iter()
            .all(|u| u["username"] != "cumar")
    );
}

#[tokio::test]
async fn partial_user_update_rehashes_password() {
    let app = spawn_app().await;
    let token = login(&app, "admin", "admin123").await;

    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/users",
            Some(&token),
            &serde_json::json!({
                "username": "hodan",
                "password": "hodan123",
                "name": "Hodan Yusuf",
                "role": "storekeeper"
            }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let id = body_json(response).await["id"].as_i64().unwrap();

    // Name-only patch: everything else stays, old password still works.
    let response = app
        .clone()
        .oneshot(json_request(
            "PATCH",
            &format!("/api/users/{id}"),
            Some(&token),
            &serde_json::json!({ "name": "Hodan Y. Cali", "password": "" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let updated = body_json(response).await;
    assert_eq!(updated["name"], "Hodan Y. Cali");
    assert_eq!(updated["username"], "hodan");
    assert_eq!(updated["role"], "storekeeper");
    login(&app, "hodan", "hodan123").await;

    // Password patch invalidates the old credential.
    let response = app
        .clone()
        .oneshot(json_request(
            "PATCH",
            &format!("/api/users/{id}"),
            Some(&token),
            &serde_json::json!({ "password": "brand-new-pass" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/login",
            None,
            &serde_json::json!({ "username": "hodan", "password": "hodan123" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    login(&app, "hodan", "brand-new-pass").await;
}

#[tokio::test]
async fn items_allow_duplicates() {
    let app = spawn_app().await;
    let token = login(&app, "salah", "salah123").await;

    let item = serde_json::json!({ "name": "Chair", "category": "Furniture" });

    for _ in 0..2 {
        let response = app
            .clone()
            .oneshot(json_request("POST", "/api/items", Some(&token), &item))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    let response = app
        .clone()
        .oneshot(get_request("/api/items", Some(&token)))
        .await
        .unwrap();
    let items = body_json(response).await;
    let count = items
        .as_array()
        .unwrap()
        .iter()
        .filter(|i| i["name"] == "Chair")
        .count();
    assert_eq!(count, 2);
}

#[tokio::test]
async fn end_to_end_truck_approval_flow() {
    let app = spawn_app().await;
    let token = login(&app, "salah", "salah123").await;

    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/items",
            Some(&token),
            &serde_json::json!({ "name": "Logistics Truck 500", "category": "Vehicles" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/activities",
            Some(&token),
            &serde_json::json!({
                "date": "07/02/2026",
                "action": "Geliyay: 1 Logistics Truck 500",
                "item_category": "Vehicles",
                "recipient": "Main Warehouse",
                "user": "salah",
                "comment": "Testing new item",
                "status": "Pending"
            }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let created = body_json(response).await;
    let id = created["id"].as_i64().unwrap();
    assert_eq!(created["status"], "Pending");

    // The manager approves the movement.
    let manager_token = login(&app, "abdinur", "abdinur123").await;
    let response = app
        .clone()
        .oneshot(json_request(
            "PATCH",
            &format!("/api/activities/{id}"),
            Some(&manager_token),
            &serde_json::json!({ "status": "Approved" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = app
        .clone()
        .oneshot(get_request("/api/activities", Some(&token)))
        .await
        .unwrap();
    let activities = body_json(response).await;
    let activity = activities
        .as_array()
        .unwrap()
        .iter()
        .find(|a| a["id"].as_i64() == Some(id))
        .expect("activity missing from listing")
        .clone();

    assert_eq!(activity["status"], "Approved");
    assert_eq!(activity["action"], "Geliyay: 1 Logistics Truck 500");
    assert_eq!(activity["item_category"], "Vehicles");
    assert_eq!(activity["recipient"], "Main Warehouse");
    assert_eq!(activity["user"], "salah");
    assert_eq!(activity["comment"], "Testing new item");
    assert_eq!(activity["date"], "07/02/2026");
}
