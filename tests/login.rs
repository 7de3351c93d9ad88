//! End-to-end login verification against a local stand-in for the
//! workspace API.

use axum::{
    http::{header, HeaderMap, StatusCode},
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use serde_json::json;
use workspace_auth::auth::{
    check_login, set_user_info, update_user_permissions, AccessTokenPair, LoginCheck,
    MemoryUserStore, OAuthConfig, PermissionConfig, UserRecord,
};

const GOOD_TOKEN: &str = "good-token";

fn token() -> AccessTokenPair {
    AccessTokenPair::new(GOOD_TOKEN, "token-secret")
}

/// Serve the router on an ephemeral port and return a config pointed at it.
async fn serve(router: Router) -> OAuthConfig {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });

    OAuthConfig::new(
        "app-key",
        "app-secret",
        format!("http://{addr}/").parse().unwrap(),
    )
}

/// Profile endpoint that checks the bearer token before answering.
fn profile_route(profile: serde_json::Value) -> Router {
    Router::new().route(
        "/hr/v2/users/me",
        get(move |headers: HeaderMap| async move {
            if bearer(&headers).as_deref() != Some(GOOD_TOKEN) {
                return StatusCode::FORBIDDEN.into_response();
            }
            Json(profile).into_response()
        }),
    )
}

fn bearer(headers: &HeaderMap) -> Option<String> {
    headers
        .get(header::AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
        .map(str::to_owned)
}

#[tokio::test]
async fn active_user_logs_in() {
    let config = serve(profile_route(json!({
        "first_name": "Ada",
        "last_name": "Lovelace",
        "email": "ada@example.com",
        "status": "active",
    })))
    .await;

    let check = check_login(&config, &token()).await;
    assert_eq!(check.as_tuple(), (true, "OK"));
    assert_eq!(check.profile().unwrap().get_str("first_name"), Some("Ada"));
}

#[tokio::test]
async fn rejected_token_is_invalid() {
    let config = serve(profile_route(json!({"status": "active"}))).await;

    let bad = AccessTokenPair::new("stale-token", "stale-secret");
    let check = check_login(&config, &bad).await;
    assert_eq!(check.as_tuple(), (false, "Invalid access token"));
}

#[tokio::test]
async fn suspended_user_is_inactive() {
    let config = serve(profile_route(json!({"status": "suspended"}))).await;

    let check = check_login(&config, &token()).await;
    assert_eq!(check.as_tuple(), (false, "User is inactive"));
}

#[tokio::test]
async fn unparseable_body_is_a_value_error() {
    let router = Router::new().route("/hr/v2/users/me", get(|| async { "no json here" }));
    let config = serve(router).await;

    let check = check_login(&config, &token()).await;
    assert_eq!(check.as_tuple(), (false, "Value error"));
}

#[tokio::test]
async fn unreachable_api_is_a_network_error() {
    // Bind and immediately drop to get a port nothing listens on.
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let config = OAuthConfig::new(
        "app-key",
        "app-secret",
        format!("http://{addr}/").parse().unwrap(),
    );

    let check = check_login(&config, &token()).await;
    assert_eq!(check.as_tuple(), (false, "Network error"));
}

#[tokio::test]
async fn login_to_permissions_flow() {
    let router = profile_route(json!({
        "first_name": "Ada",
        "last_name": "Lovelace",
        "email": "ada@example.com",
        "status": "active",
    }))
    .route(
        "/hr/v2/teams",
        get(|| async { Json(json!([{"id": "acme:teamA", "name": "teamA"}])) }),
    );
    let config = serve(router).await;

    let check = check_login(&config, &token()).await;
    assert_eq!(check.message(), "OK");
    let LoginCheck::Valid(profile) = check else {
        panic!("expected a valid login");
    };

    let store = MemoryUserStore::new();
    let mut user = UserRecord::new("ada");
    set_user_info(&mut user, &profile, &store).await.unwrap();

    let teams = config
        .client(Some(token()))
        .current_teams()
        .await
        .unwrap();
    assert_eq!(teams, vec!["teamA".to_owned()]);

    let perms = PermissionConfig::new().with_admin_teams(["teamA"]);
    update_user_permissions(&mut user, teams, &perms, &store)
        .await
        .unwrap();

    assert!(user.is_staff);
    assert!(user.is_active);
    assert!(!user.is_superuser);
    assert_eq!(user.email, "ada@example.com");

    let saved = store.get("ada").unwrap();
    assert_eq!(saved, user);
}
