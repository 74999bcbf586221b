mod common;

use axum::http::StatusCode;
use common::{TestApp, generate_unique_email, test_jwt_config};
use gatekeep_auth::create_access_token;
use gatekeep_config::JwtConfig;
use serde_json::{Value, json};
use uuid::Uuid;

fn editor_role() -> Value {
    json!({ "name": "EDITOR", "permissions": ["posts:update"] })
}

#[tokio::test]
async fn test_missing_token_and_missing_scope_look_the_same() {
    let app = TestApp::new();
    let application_id = app.bootstrap_id("Blog").await;
    let user_token = app
        .token_for(&application_id, &generate_unique_email(), false)
        .await;

    let anonymous = app
        .send("POST", "/api/roles", Some(editor_role()), None)
        .await;
    let insufficient = app
        .send("POST", "/api/roles", Some(editor_role()), Some(&user_token))
        .await;

    assert_eq!(anonymous.0, StatusCode::UNAUTHORIZED);
    assert_eq!(anonymous, insufficient);
    assert_eq!(anonymous.1["code"], "UNAUTHORIZED");
}

#[tokio::test]
async fn test_invalid_token_is_rejected_on_protected_routes() {
    let app = TestApp::new();
    let application_id = app.bootstrap_id("Blog").await;

    let expired = create_access_token(
        Uuid::new_v4(),
        "a@example.com",
        application_id.parse().unwrap(),
        vec!["roles:write".to_string()],
        &JwtConfig {
            access_token_expiry: -600,
            ..test_jwt_config()
        },
    )
    .unwrap();
    let foreign = create_access_token(
        Uuid::new_v4(),
        "a@example.com",
        application_id.parse().unwrap(),
        vec!["roles:write".to_string()],
        &JwtConfig {
            secret: "some-other-secret-that-is-long-enough".to_string(),
            access_token_expiry: 3600,
        },
    )
    .unwrap();

    for token in [expired.as_str(), foreign.as_str(), "garbage"] {
        let (status, body) = app
            .send("POST", "/api/roles", Some(editor_role()), Some(token))
            .await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["code"], "UNAUTHORIZED");

        let (status, _) = app.send("GET", "/api/users/me", None, Some(token)).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }
}

#[tokio::test]
async fn test_invalid_token_does_not_block_public_routes() {
    let app = TestApp::new();

    let (status, _) = app
        .send(
            "POST",
            "/api/applications",
            Some(json!({ "name": "Blog" })),
            Some("garbage"),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, _) = app
        .send("GET", "/api/permissions", None, Some("garbage"))
        .await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_role_creation_requires_roles_write() {
    let app = TestApp::new();
    let application_id = app.bootstrap_id("Blog").await;
    let admin_token = app
        .token_for(&application_id, &generate_unique_email(), true)
        .await;

    let (status, body) = app
        .send("POST", "/api/roles", Some(editor_role()), Some(&admin_token))
        .await;
    assert_eq!(status, StatusCode::CREATED, "{body}");
    assert_eq!(body["application_id"], application_id);
    assert_eq!(body["permissions"], json!(["posts:update"]));

    let (status, body) = app
        .send("POST", "/api/roles", Some(editor_role()), Some(&admin_token))
        .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["code"], "ROLE_ALREADY_EXISTS");

    let (status, body) = app
        .send(
            "POST",
            "/api/roles",
            Some(json!({ "name": "ROGUE", "permissions": ["payments:refund"] })),
            Some(&admin_token),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "INVALID_PERMISSION");
}

#[tokio::test]
async fn test_role_listing_needs_any_valid_token_and_is_tenant_scoped() {
    let app = TestApp::new();
    let blog = app.bootstrap_id("Blog").await;
    let shop = app.bootstrap_id("Shop").await;

    let (status, _) = app.send("GET", "/api/roles", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let shop_admin = app.token_for(&shop, &generate_unique_email(), true).await;
    let (status, _) = app
        .send("POST", "/api/roles", Some(editor_role()), Some(&shop_admin))
        .await;
    assert_eq!(status, StatusCode::CREATED);

    let blog_user = app.token_for(&blog, &generate_unique_email(), false).await;
    let (status, body) = app.send("GET", "/api/roles", None, Some(&blog_user)).await;
    assert_eq!(status, StatusCode::OK);

    let roles = body.as_array().unwrap();
    assert_eq!(roles.len(), 2);
    assert!(roles.iter().all(|r| r["application_id"] == blog));
    assert!(roles.iter().all(|r| r["name"] != "EDITOR"));
}

#[tokio::test]
async fn test_permission_registry_is_public() {
    let app = TestApp::new();

    let (status, body) = app.send("GET", "/api/permissions", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["permissions"].as_array().unwrap().len(), 7);
    assert_eq!(body["version"], 1);
    assert_eq!(
        body["system_roles"],
        json!(["SUPER_ADMIN", "APPLICATION_USER"])
    );
}
