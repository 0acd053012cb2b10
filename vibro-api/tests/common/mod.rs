//! Shared helpers for integration tests.

use rocket::http::Header;
use rocket::local::asynchronous::Client;
use serde_json::json;

use vibro_api::DbConn;
use vibro_api::orm::testing::{SeededChain, seed_chain, seed_staff, test_rocket};

pub async fn test_client() -> Client {
    Client::tracked(test_rocket()).await.expect("valid rocket instance")
}

/// Seeds one tenant chain through the test Rocket's own pool.
pub async fn seed(client: &Client, prefix: &'static str) -> SeededChain {
    let db = DbConn::get_one(client.rocket()).await.expect("db connection");
    db.run(move |conn| seed_chain(conn, prefix)).await
}

/// Seeds a staff user in the given company and returns (email, password).
pub async fn seed_staff_user(client: &Client, prefix: &'static str, company_id: i32) -> (String, String) {
    let db = DbConn::get_one(client.rocket()).await.expect("db connection");
    let (user, password) = db.run(move |conn| seed_staff(conn, prefix, company_id)).await;
    (user.email, password)
}

/// Logs in and returns the session token from the response body.
pub async fn login(client: &Client, email: &str, password: &str) -> String {
    let resp = client
        .post("/api/1/login")
        .json(&json!({ "email": email, "password": password }))
        .dispatch()
        .await;
    assert_eq!(resp.status().code, 200, "login should succeed for {email}");
    let body: serde_json::Value = resp.into_json().await.expect("json body");
    body["token"].as_str().expect("token in login response").to_string()
}

pub fn bearer(token: &str) -> Header<'static> {
    Header::new("Authorization", format!("Bearer {token}"))
}
