mod common;

use anyhow::Result;
use reqwest::StatusCode;
use serde_json::{json, Value};

#[tokio::test]
async fn health_endpoint_responds() -> Result<()> {
    let server = common::ensure_server().await?;
    let client = reqwest::Client::new();

    let res = client
        .get(format!("{}/health", server.base_url))
        .send()
        .await?;

    // We consider OK or SERVICE_UNAVAILABLE acceptable as a basic liveness check
    assert!(
        res.status() == StatusCode::OK || res.status() == StatusCode::SERVICE_UNAVAILABLE,
        "unexpected status: {}",
        res.status()
    );

    // Should be valid JSON
    let _body = res.json::<Value>().await?;
    Ok(())
}

#[tokio::test]
async fn register_then_login_round_trip() -> Result<()> {
    let server = common::ensure_server().await?;
    let client = reqwest::Client::new();
    let email = common::unique_email("roundtrip");

    let (register_token, registered_user) =
        common::register_user(server, &client, &email).await?;
    assert!(!register_token.is_empty());
    assert_eq!(registered_user["email"], email.as_str());
    assert!(
        registered_user.get("password_hash").is_none(),
        "password hash must never appear in a response: {}",
        registered_user
    );

    let res = client
        .post(format!("{}/auth/login", server.base_url))
        .json(&json!({ "email": email, "password": "secret1" }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::OK);

    let body = res.json::<Value>().await?;
    assert_eq!(body["success"], true);
    let login_token = body["data"]["token"].as_str().unwrap_or_default();
    assert!(!login_token.is_empty());
    assert_eq!(body["data"]["user"]["id"], registered_user["id"]);
    assert!(body["data"]["user"].get("password_hash").is_none());

    // The token's embedded identity must match the registered user
    let res = client
        .get(format!("{}/auth/whoami", server.base_url))
        .bearer_auth(login_token)
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::OK);
    let body = res.json::<Value>().await?;
    assert_eq!(body["data"]["id"], registered_user["id"]);
    assert_eq!(body["data"]["email"], email.as_str());

    Ok(())
}

#[tokio::test]
async fn duplicate_email_registration_conflicts() -> Result<()> {
    let server = common::ensure_server().await?;
    let client = reqwest::Client::new();
    let email = common::unique_email("duplicate");

    common::register_user(server, &client, &email).await?;

    // Same email, different password: still a conflict
    let res = client
        .post(format!("{}/auth/register", server.base_url))
        .json(&json!({
            "email": email,
            "password": "different-password",
            "first_name": "Other",
            "last_name": "Person"
        }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::CONFLICT);

    let body = res.json::<Value>().await?;
    assert_eq!(body["success"], false);
    assert_eq!(body["code"], "CONFLICT");

    Ok(())
}

#[tokio::test]
async fn login_failures_are_indistinguishable() -> Result<()> {
    let server = common::ensure_server().await?;
    let client = reqwest::Client::new();
    let email = common::unique_email("enumeration");

    common::register_user(server, &client, &email).await?;

    let wrong_password = client
        .post(format!("{}/auth/login", server.base_url))
        .json(&json!({ "email": email, "password": "wrong-password" }))
        .send()
        .await?;
    let unknown_email = client
        .post(format!("{}/auth/login", server.base_url))
        .json(&json!({
            "email": common::unique_email("never-registered"),
            "password": "secret1"
        }))
        .send()
        .await?;

    assert_eq!(wrong_password.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(unknown_email.status(), StatusCode::UNAUTHORIZED);

    // Identical bodies: no signal about whether the email exists
    let body_a = wrong_password.json::<Value>().await?;
    let body_b = unknown_email.json::<Value>().await?;
    assert_eq!(body_a, body_b);

    Ok(())
}

#[tokio::test]
async fn register_rejects_invalid_input() -> Result<()> {
    let server = common::ensure_server().await?;
    let client = reqwest::Client::new();

    // Missing fields
    let res = client
        .post(format!("{}/auth/register", server.base_url))
        .json(&json!({ "email": common::unique_email("invalid") }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    // Password below the minimum length
    let res = client
        .post(format!("{}/auth/register", server.base_url))
        .json(&json!({
            "email": common::unique_email("shortpw"),
            "password": "12345",
            "first_name": "A",
            "last_name": "B"
        }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    Ok(())
}

#[tokio::test]
async fn protected_routes_reject_bad_tokens() -> Result<()> {
    let server = common::ensure_server().await?;
    let client = reqwest::Client::new();

    // No Authorization header
    let res = client
        .get(format!("{}/notes", server.base_url))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);

    // Garbage token
    let res = client
        .get(format!("{}/notes", server.base_url))
        .bearer_auth("not.a.token")
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);

    // Valid token with one payload character flipped
    let email = common::unique_email("tamper");
    let (token, _) = common::register_user(server, &client, &email).await?;
    let mut tampered = token.into_bytes();
    let mid = tampered.len() / 2;
    tampered[mid] = if tampered[mid] == b'a' { b'b' } else { b'a' };
    let res = client
        .get(format!("{}/notes", server.base_url))
        .bearer_auth(String::from_utf8(tampered)?)
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);

    Ok(())
}
