//! Login, registration, logout, and session behavior.

use rocket::http::Status;
use rocket::tokio;
use serde_json::json;

mod common;
use common::{bearer, login, seed, test_client};

#[tokio::test]
async fn login_sets_cookie_and_returns_token() {
    let client = test_client().await;
    let chain = seed(&client, "Alpha").await;

    let resp = client
        .post("/api/1/login")
        .json(&json!({ "email": chain.user.email, "password": chain.password }))
        .dispatch()
        .await;
    assert_eq!(resp.status(), Status::Ok);
    assert!(resp.cookies().get("session").is_some(), "Session cookie should be set");

    let body: serde_json::Value = resp.into_json().await.unwrap();
    assert_eq!(body["user"]["email"], chain.user.email.as_str());
    assert!(body["user"].get("password_hash").is_none(), "hash must never leak");
    let token = body["token"].as_str().unwrap();

    // The token works as a Bearer credential.
    let me = client.get("/api/1/user").header(bearer(token)).dispatch().await;
    assert_eq!(me.status(), Status::Ok);
    let me: serde_json::Value = me.into_json().await.unwrap();
    assert_eq!(me["id"].as_i64().unwrap() as i32, chain.user.id);
}

#[tokio::test]
async fn login_rejects_empty_and_bad_credentials() {
    let client = test_client().await;
    let chain = seed(&client, "Alpha").await;

    let resp = client
        .post("/api/1/login")
        .json(&json!({ "email": "", "password": "" }))
        .dispatch()
        .await;
    assert_eq!(resp.status(), Status::BadRequest);

    let resp = client
        .post("/api/1/login")
        .json(&json!({ "email": chain.user.email, "password": "wrong-password" }))
        .dispatch()
        .await;
    assert_eq!(resp.status(), Status::Unauthorized);

    let resp = client
        .post("/api/1/login")
        .json(&json!({ "email": "ghost@example.com", "password": "whatever123" }))
        .dispatch()
        .await;
    assert_eq!(resp.status(), Status::Unauthorized);
}

#[tokio::test]
async fn register_validates_all_fields_at_once() {
    let client = test_client().await;
    let chain = seed(&client, "Alpha").await;

    // Bad email, short password, and a company that doesn't exist: every
    // failure shows up in the error list and nothing is persisted.
    let resp = client
        .post("/api/1/register")
        .json(&json!({ "email": "not-an-email", "password": "short", "company_id": 99999 }))
        .dispatch()
        .await;
    assert_eq!(resp.status(), Status::UnprocessableEntity);
    let body: serde_json::Value = resp.into_json().await.unwrap();
    let fields: Vec<&str> = body["errors"]
        .as_array()
        .unwrap()
        .iter()
        .map(|e| e["field"].as_str().unwrap())
        .collect();
    assert!(fields.contains(&"email"));
    assert!(fields.contains(&"password"));
    assert!(fields.contains(&"company_id"));

    // Duplicate email is a validation failure too.
    let resp = client
        .post("/api/1/register")
        .json(&json!({
            "email": chain.user.email,
            "password": "long enough password",
            "company_id": chain.company.id
        }))
        .dispatch()
        .await;
    assert_eq!(resp.status(), Status::UnprocessableEntity);
}

#[tokio::test]
async fn register_then_login_yields_two_valid_tokens() {
    let client = test_client().await;
    let chain = seed(&client, "Alpha").await;

    let resp = client
        .post("/api/1/register")
        .json(&json!({
            "email": "fresh@example.com",
            "password": "a fine password",
            "company_id": chain.company.id
        }))
        .dispatch()
        .await;
    assert_eq!(resp.status(), Status::Ok);
    let body: serde_json::Value = resp.into_json().await.unwrap();
    let register_token = body["token"].as_str().unwrap().to_string();

    let login_token = login(&client, "fresh@example.com", "a fine password").await;
    assert_ne!(register_token, login_token);

    // Both sessions validate independently.
    for token in [&register_token, &login_token] {
        let me = client.get("/api/1/user").header(bearer(token)).dispatch().await;
        assert_eq!(me.status(), Status::Ok);
    }
}

#[tokio::test]
async fn logout_revokes_the_presented_token_only() {
    let client = test_client().await;
    let chain = seed(&client, "Alpha").await;

    let first = login(&client, &chain.user.email, &chain.password).await;
    let second = login(&client, &chain.user.email, &chain.password).await;

    let resp = client.post("/api/1/logout").header(bearer(&first)).dispatch().await;
    assert_eq!(resp.status(), Status::Ok);

    let me = client.get("/api/1/user").header(bearer(&first)).dispatch().await;
    assert_eq!(me.status(), Status::Unauthorized);

    let me = client.get("/api/1/user").header(bearer(&second)).dispatch().await;
    assert_eq!(me.status(), Status::Ok);
}

#[tokio::test]
async fn protected_routes_require_a_session() {
    let client = test_client().await;
    let _chain = seed(&client, "Alpha").await;

    let resp = client.get("/api/1/user").dispatch().await;
    assert_eq!(resp.status(), Status::Unauthorized);

    let resp = client.get("/api/1/Machines").dispatch().await;
    assert_eq!(resp.status(), Status::Unauthorized);

    let resp = client.get("/api/1/Machines").header(bearer("bogus-token")).dispatch().await;
    assert_eq!(resp.status(), Status::Unauthorized);
}
