//! Query-parameter filter semantics on the list endpoints.

use rocket::http::Status;
use rocket::tokio;

mod common;
use common::{bearer, login, seed, seed_staff_user, test_client};

async fn ids(client: &rocket::local::asynchronous::Client, token: &str, path: String) -> Vec<i64> {
    let resp = client.get(path).header(bearer(token)).dispatch().await;
    assert_eq!(resp.status(), Status::Ok);
    let rows: Vec<serde_json::Value> = resp.into_json().await.unwrap();
    rows.iter().map(|r| r["id"].as_i64().unwrap()).collect()
}

#[tokio::test]
async fn two_filters_equal_the_intersection_of_each() {
    let client = test_client().await;
    let a = seed(&client, "Alpha").await;
    let b = seed(&client, "Beta").await;
    let (email, password) = seed_staff_user(&client, "Root", a.company.id).await;
    let token = login(&client, &email, &password).await;

    let by_identifier =
        ids(&client, &token, "/api/1/Machines?identifier=M-Alpha".to_string()).await;
    let by_company = ids(&client, &token, format!("/api/1/Machines?company={}", a.company.id)).await;
    let by_both = ids(
        &client,
        &token,
        format!("/api/1/Machines?identifier=M-Alpha&company={}", a.company.id),
    )
    .await;

    let intersection: Vec<i64> =
        by_identifier.iter().copied().filter(|id| by_company.contains(id)).collect();
    assert_eq!(by_both, intersection);
    assert_eq!(by_both, vec![a.machine.id as i64]);

    // Mismatched pair: each side nonempty, the AND empty.
    let crossed = ids(
        &client,
        &token,
        format!("/api/1/Machines?identifier=M-Alpha&company={}", b.company.id),
    )
    .await;
    assert!(crossed.is_empty());
}

#[tokio::test]
async fn nonexistent_id_filters_yield_empty_lists() {
    let client = test_client().await;
    let a = seed(&client, "Alpha").await;
    let token = login(&client, &a.user.email, &a.password).await;

    for path in [
        "/api/1/Machines?id=99999".to_string(),
        "/api/1/Machines?company=99999".to_string(),
        "/api/1/Measurements?machine=99999".to_string(),
        "/api/1/Points?measurement=99999".to_string(),
        "/api/1/Tendencies?point=99999".to_string(),
        "/api/1/Espectras?point=99999".to_string(),
        "/api/1/TimeSignals?point=99999".to_string(),
        "/api/1/Images?machine=99999".to_string(),
        "/api/1/TermoImages?measurement=99999".to_string(),
    ] {
        let rows = ids(&client, &token, path.clone()).await;
        assert!(rows.is_empty(), "{path} should be empty, not an error");
    }
}

#[tokio::test]
async fn measurement_filters_cover_every_recognized_parameter() {
    let client = test_client().await;
    let a = seed(&client, "Alpha").await;
    let token = login(&client, &a.user.email, &a.password).await;

    let own = a.measurement.id as i64;
    let severity = a.measurement.severity.replace(' ', "%20");

    for path in [
        format!("/api/1/Measurements?id={}", a.measurement.id),
        format!("/api/1/Measurements?severity={severity}"),
        "/api/1/Measurements?date=2026-03-10".to_string(),
        "/api/1/Measurements?revised=false&resolved=false".to_string(),
        "/api/1/Measurements?measurement_type=Espectral".to_string(),
        format!("/api/1/Measurements?machine={}", a.machine.id),
        format!("/api/1/Measurements?engineer_one={}", a.user.id),
    ] {
        let rows = ids(&client, &token, path.clone()).await;
        assert_eq!(rows, vec![own], "{path}");
    }

    // A malformed date matches nothing rather than erroring.
    let rows = ids(&client, &token, "/api/1/Measurements?date=10-03-2026".to_string()).await;
    assert!(rows.is_empty());
}

#[tokio::test]
async fn city_and_company_filters_apply_to_their_own_columns() {
    let client = test_client().await;
    let a = seed(&client, "Alpha").await;
    let _b = seed(&client, "Beta").await;
    let (email, password) = seed_staff_user(&client, "Root", a.company.id).await;
    let token = login(&client, &email, &password).await;

    let rows = ids(&client, &token, "/api/1/Cities?name=Alpha%20City".to_string()).await;
    assert_eq!(rows, vec![a.company.city_id as i64]);

    let rows = ids(&client, &token, "/api/1/Companies?nit=NIT-Alpha".to_string()).await;
    assert_eq!(rows, vec![a.company.id as i64]);

    let rows = ids(
        &client,
        &token,
        format!("/api/1/Companies?city={}&rut_city={}", a.company.city_id, a.company.rut_city_id),
    )
    .await;
    assert_eq!(rows, vec![a.company.id as i64]);
}
