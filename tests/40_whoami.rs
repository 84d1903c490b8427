mod common;

use anyhow::Result;
use chrono::Utc;
use jsonwebtoken::{encode, EncodingKey, Header};
use reqwest::StatusCode;
use serde_json::{json, Value};

async fn assert_unauthorized(res: reqwest::Response) -> Result<()> {
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    let body: Value = res.json().await?;
    assert_eq!(body["code"], "UNAUTHORIZED");
    Ok(())
}

#[tokio::test]
async fn whoami_returns_email() -> Result<()> {
    let server = common::spawn_server().await?;
    server.register("a@b.com", "pw1").await?;
    let token = server.token_for("a@b.com", "pw1").await?;

    let res = server.whoami(&token).await?;
    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = res.json().await?;
    assert_eq!(body, json!({ "success": true, "data": "a@b.com" }));
    Ok(())
}

#[tokio::test]
async fn whoami_survives_session_expiry() -> Result<()> {
    let server = common::spawn_server().await?;
    server.register("a@b.com", "pw1").await?;
    let token = server.token_for("a@b.com", "pw1").await?;

    // Past the session TTL the account is reloaded from the directory
    tokio::time::sleep(std::time::Duration::from_millis(400)).await;

    let res = server.whoami(&token).await?;
    assert_eq!(res.status(), StatusCode::OK);
    Ok(())
}

#[tokio::test]
async fn missing_token_is_unauthorized() -> Result<()> {
    let server = common::spawn_server().await?;
    let res = server.client.get(server.url("/v1/user/whoami")).send().await?;
    assert_unauthorized(res).await
}

#[tokio::test]
async fn non_bearer_scheme_is_unauthorized() -> Result<()> {
    let server = common::spawn_server().await?;
    let res = server
        .client
        .get(server.url("/v1/user/whoami"))
        .header("authorization", "Basic YTpi")
        .send()
        .await?;
    assert_unauthorized(res).await
}

#[tokio::test]
async fn garbage_token_is_unauthorized() -> Result<()> {
    let server = common::spawn_server().await?;
    assert_unauthorized(server.whoami("not.a.jwt").await?).await
}

#[tokio::test]
async fn token_signed_with_other_secret_is_unauthorized() -> Result<()> {
    let server = common::spawn_server().await?;
    server.register("a@b.com", "pw1").await?;

    let now = Utc::now().timestamp();
    let claims = json!({
        "sub": uuid::Uuid::new_v4(),
        "email": "a@b.com",
        "iat": now,
        "exp": now + 3600,
    });
    let forged = encode(&Header::default(), &claims, &EncodingKey::from_secret(b"someone-else"))?;

    assert_unauthorized(server.whoami(&forged).await?).await
}

#[tokio::test]
async fn valid_token_for_unknown_account_is_unauthorized() -> Result<()> {
    let server = common::spawn_server().await?;

    let now = Utc::now().timestamp();
    let claims = json!({
        "sub": uuid::Uuid::new_v4(),
        "email": "ghost@b.com",
        "iat": now,
        "exp": now + 3600,
    });
    let token = encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(common::TEST_SECRET.as_bytes()),
    )?;

    assert_unauthorized(server.whoami(&token).await?).await
}

#[tokio::test]
async fn expired_token_is_unauthorized() -> Result<()> {
    let server = common::spawn_server().await?;
    server.register("a@b.com", "pw1").await?;

    let now = Utc::now().timestamp();
    let claims = json!({
        "sub": uuid::Uuid::new_v4(),
        "email": "a@b.com",
        "iat": now - 7200,
        "exp": now - 3600,
    });
    let token = encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(common::TEST_SECRET.as_bytes()),
    )?;

    assert_unauthorized(server.whoami(&token).await?).await
}
