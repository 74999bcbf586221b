mod common;

use std::collections::BTreeSet;

use axum::http::StatusCode;
use common::{PASSWORD, TestApp, test_jwt_config};
use gatekeep_auth::verify_token;
use gatekeep_core::permissions::ALL_PERMISSIONS;
use serde_json::{Value, json};

fn permission_set(value: &Value) -> BTreeSet<String> {
    value
        .as_array()
        .unwrap()
        .iter()
        .map(|p| p.as_str().unwrap().to_string())
        .collect()
}

fn all_permissions() -> BTreeSet<String> {
    ALL_PERMISSIONS.iter().map(|p| p.to_string()).collect()
}

#[tokio::test]
async fn test_tenant_lifecycle() {
    let app = TestApp::new();

    let provisioned = app.bootstrap("T1").await;
    let application_id = provisioned["application"]["id"].as_str().unwrap().to_string();

    let super_admin = &provisioned["super_admin_role"];
    assert_eq!(super_admin["name"], "SUPER_ADMIN");
    assert_eq!(
        permission_set(&super_admin["permissions"]),
        all_permissions()
    );

    let app_user = &provisioned["application_user_role"];
    assert_eq!(app_user["name"], "APPLICATION_USER");
    assert_eq!(
        permission_set(&app_user["permissions"]),
        BTreeSet::from(["posts:read".to_string(), "posts:write".to_string()])
    );

    let (status, body) = app.register(&application_id, "u1@x.com", true).await;
    assert_eq!(status, StatusCode::CREATED, "{body}");

    let (status, body) = app.register(&application_id, "u2@x.com", true).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "APPLICATION_ALREADY_SUPER_USER");

    let (status, body) = app.login(&application_id, "u1@x.com", PASSWORD).await;
    assert_eq!(status, StatusCode::OK, "{body}");
    let claims = verify_token(body["access_token"].as_str().unwrap(), &test_jwt_config()).unwrap();
    assert_eq!(
        claims.scopes.into_iter().collect::<BTreeSet<_>>(),
        all_permissions()
    );

    let (status, body) = app.login(&application_id, "u1@x.com", "wrong-password").await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body, json!({ "error": "Invalid credentials", "code": "INVALID_CREDENTIALS" }));

    let (status, body) = app.login(&application_id, "u2@x.com", PASSWORD).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["code"], "INVALID_CREDENTIALS");
}
