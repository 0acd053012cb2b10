//! Tenant isolation across the list and retrieve endpoints.

use rocket::http::Status;
use rocket::tokio;
use time_test::time_test;

mod common;
use common::{bearer, login, seed, seed_staff_user, test_client};

#[tokio::test]
async fn lists_are_scoped_to_the_callers_company() {
    time_test!();
    let client = test_client().await;
    let a = seed(&client, "Alpha").await;
    let b = seed(&client, "Beta").await;
    let token = login(&client, &a.user.email, &a.password).await;

    // Every chained resource only shows the caller's own records.
    for (path, own_id, other_id) in [
        ("/api/1/Machines", a.machine.id, b.machine.id),
        ("/api/1/Measurements", a.measurement.id, b.measurement.id),
        ("/api/1/Points", a.point.id, b.point.id),
        ("/api/1/Tendencies", a.tendency.id, b.tendency.id),
        ("/api/1/Espectras", a.espectra.id, b.espectra.id),
        ("/api/1/TimeSignals", a.time_signal.id, b.time_signal.id),
        ("/api/1/Images", a.image.id, b.image.id),
        ("/api/1/TermoImages", a.termo_image.id, b.termo_image.id),
    ] {
        let resp = client.get(path).header(bearer(&token)).dispatch().await;
        assert_eq!(resp.status(), Status::Ok, "{path}");
        let rows: Vec<serde_json::Value> = resp.into_json().await.unwrap();
        let ids: Vec<i64> = rows.iter().map(|r| r["id"].as_i64().unwrap()).collect();
        assert!(ids.contains(&(own_id as i64)), "{path} should contain own record");
        assert!(!ids.contains(&(other_id as i64)), "{path} leaked another tenant");
    }
}

#[tokio::test]
async fn staff_see_all_companies_without_filters() {
    let client = test_client().await;
    let a = seed(&client, "Alpha").await;
    let b = seed(&client, "Beta").await;
    let (email, password) = seed_staff_user(&client, "Root", a.company.id).await;
    let token = login(&client, &email, &password).await;

    let resp = client.get("/api/1/Machines").header(bearer(&token)).dispatch().await;
    assert_eq!(resp.status(), Status::Ok);
    let rows: Vec<serde_json::Value> = resp.into_json().await.unwrap();
    let ids: Vec<i64> = rows.iter().map(|r| r["id"].as_i64().unwrap()).collect();
    assert!(ids.contains(&(a.machine.id as i64)));
    assert!(ids.contains(&(b.machine.id as i64)));

    let resp = client.get("/api/1/Companies").header(bearer(&token)).dispatch().await;
    let rows: Vec<serde_json::Value> = resp.into_json().await.unwrap();
    assert!(rows.len() >= 2);
}

#[tokio::test]
async fn cross_tenant_retrieve_looks_like_a_miss() {
    let client = test_client().await;
    let a = seed(&client, "Alpha").await;
    let b = seed(&client, "Beta").await;
    let token = login(&client, &a.user.email, &a.password).await;

    let resp = client
        .get(format!("/api/1/Machines/{}", b.machine.id))
        .header(bearer(&token))
        .dispatch()
        .await;
    assert_eq!(resp.status(), Status::NotFound);

    let resp = client
        .get(format!("/api/1/Tendencies/{}", b.tendency.id))
        .header(bearer(&token))
        .dispatch()
        .await;
    assert_eq!(resp.status(), Status::NotFound);

    let resp = client
        .get(format!("/api/1/Machines/{}/report", b.machine.id))
        .header(bearer(&token))
        .dispatch()
        .await;
    assert_eq!(resp.status(), Status::NotFound);

    // Own records resolve normally.
    let resp = client
        .get(format!("/api/1/Machines/{}", a.machine.id))
        .header(bearer(&token))
        .dispatch()
        .await;
    assert_eq!(resp.status(), Status::Ok);
}

#[tokio::test]
async fn companies_and_profiles_are_scoped_too() {
    let client = test_client().await;
    let a = seed(&client, "Alpha").await;
    let b = seed(&client, "Beta").await;
    let token = login(&client, &a.user.email, &a.password).await;

    let resp = client.get("/api/1/Companies").header(bearer(&token)).dispatch().await;
    let rows: Vec<serde_json::Value> = resp.into_json().await.unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0]["id"].as_i64().unwrap() as i32, a.company.id);

    let resp = client.get("/api/1/Profiles").header(bearer(&token)).dispatch().await;
    let rows: Vec<serde_json::Value> = resp.into_json().await.unwrap();
    assert!(rows.iter().any(|p| p["id"].as_i64().unwrap() as i32 == a.profile.id));
    assert!(!rows.iter().any(|p| p["id"].as_i64().unwrap() as i32 == b.profile.id));
}
