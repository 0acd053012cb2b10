//! Authorization on the write endpoints.

use rocket::http::Status;
use rocket::tokio;
use serde_json::json;

mod common;
use common::{bearer, login, seed, seed_staff_user, test_client};

#[tokio::test]
async fn machine_crud_respects_tenancy() {
    let client = test_client().await;
    let a = seed(&client, "Alpha").await;
    let b = seed(&client, "Beta").await;
    let token = login(&client, &a.user.email, &a.password).await;

    // Creating inside the caller's own company is allowed.
    let resp = client
        .post("/api/1/Machines")
        .header(bearer(&token))
        .json(&json!({
            "company_id": a.company.id,
            "identifier": "M-NEW",
            "name": "New Fan",
            "machine_type": "Ventilador"
        }))
        .dispatch()
        .await;
    assert_eq!(resp.status(), Status::Created);
    let created: serde_json::Value = resp.into_json().await.unwrap();
    let created_id = created["id"].as_i64().unwrap();

    // Creating for another company is forbidden.
    let resp = client
        .post("/api/1/Machines")
        .header(bearer(&token))
        .json(&json!({
            "company_id": b.company.id,
            "identifier": "M-EVIL",
            "name": "Not Ours",
            "machine_type": "Bomba"
        }))
        .dispatch()
        .await;
    assert_eq!(resp.status(), Status::Forbidden);

    // Updating a machine may not move it to a foreign company either.
    let resp = client
        .put(format!("/api/1/Machines/{created_id}"))
        .header(bearer(&token))
        .json(&json!({ "company_id": b.company.id }))
        .dispatch()
        .await;
    assert_eq!(resp.status(), Status::Forbidden);

    // A partial update in place works and preserves the rest.
    let resp = client
        .put(format!("/api/1/Machines/{created_id}"))
        .header(bearer(&token))
        .json(&json!({ "name": "Renamed Fan" }))
        .dispatch()
        .await;
    assert_eq!(resp.status(), Status::Ok);
    let updated: serde_json::Value = resp.into_json().await.unwrap();
    assert_eq!(updated["name"], "Renamed Fan");
    assert_eq!(updated["identifier"], "M-NEW");

    // Deleting another tenant's machine is forbidden; deleting our own
    // succeeds.
    let resp = client
        .delete(format!("/api/1/Machines/{}", b.machine.id))
        .header(bearer(&token))
        .dispatch()
        .await;
    assert_eq!(resp.status(), Status::Forbidden);

    let resp = client
        .delete(format!("/api/1/Machines/{created_id}"))
        .header(bearer(&token))
        .dispatch()
        .await;
    assert_eq!(resp.status(), Status::NoContent);
}

#[tokio::test]
async fn staff_write_across_tenants() {
    let client = test_client().await;
    let a = seed(&client, "Alpha").await;
    let b = seed(&client, "Beta").await;
    let (email, password) = seed_staff_user(&client, "Root", a.company.id).await;
    let token = login(&client, &email, &password).await;

    let resp = client
        .post("/api/1/Measurements")
        .header(bearer(&token))
        .json(&json!({
            "machine_id": b.machine.id,
            "date": "2026-04-01",
            "severity": "Normal",
            "analysis": "Sin novedad.",
            "recommendation": "Ninguna.",
            "revised": true,
            "resolved": false,
            "measurement_type": "Espectral",
            "engineer_one_id": null,
            "engineer_two_id": null
        }))
        .dispatch()
        .await;
    assert_eq!(resp.status(), Status::Created);

    // Company and city writes are staff-only.
    let resp = client
        .post("/api/1/Cities")
        .header(bearer(&token))
        .json(&json!({ "name": "Medellin" }))
        .dispatch()
        .await;
    assert_eq!(resp.status(), Status::Created);

    let member = login(&client, &a.user.email, &a.password).await;
    let resp = client
        .post("/api/1/Cities")
        .header(bearer(&member))
        .json(&json!({ "name": "Cali" }))
        .dispatch()
        .await;
    assert_eq!(resp.status(), Status::Forbidden);
}

#[tokio::test]
async fn foreign_company_updates_look_like_a_miss() {
    let client = test_client().await;
    let a = seed(&client, "Alpha").await;
    let b = seed(&client, "Beta").await;
    let token = login(&client, &a.user.email, &a.password).await;

    // Another tenant's company id is indistinguishable from a
    // nonexistent one.
    let resp = client
        .put(format!("/api/1/Companies/{}", b.company.id))
        .header(bearer(&token))
        .json(&json!({ "pbx": "601 555 9999" }))
        .dispatch()
        .await;
    assert_eq!(resp.status(), Status::NotFound);

    // Updating the caller's own company works.
    let resp = client
        .put(format!("/api/1/Companies/{}", a.company.id))
        .header(bearer(&token))
        .json(&json!({ "pbx": "601 555 9999" }))
        .dispatch()
        .await;
    assert_eq!(resp.status(), Status::Ok);
    let updated: serde_json::Value = resp.into_json().await.unwrap();
    assert_eq!(updated["pbx"], "601 555 9999");
    assert_eq!(updated["name"], a.company.name.as_str());
}

#[tokio::test]
async fn leaf_writes_walk_the_ownership_chain() {
    let client = test_client().await;
    let a = seed(&client, "Alpha").await;
    let b = seed(&client, "Beta").await;
    let token = login(&client, &a.user.email, &a.password).await;

    // Recording a tendency on our own point works.
    let resp = client
        .post("/api/1/Tendencies")
        .header(bearer(&token))
        .json(&json!({
            "point_id": a.point.id,
            "name": "2HOR",
            "date": "20260401",
            "value": 3.1
        }))
        .dispatch()
        .await;
    assert_eq!(resp.status(), Status::Created);

    // Recording against another tenant's point is forbidden.
    let resp = client
        .post("/api/1/Tendencies")
        .header(bearer(&token))
        .json(&json!({
            "point_id": b.point.id,
            "name": "2HOR",
            "date": "20260401",
            "value": 3.1
        }))
        .dispatch()
        .await;
    assert_eq!(resp.status(), Status::Forbidden);

    // A nonexistent parent is a validation problem, not a permission one.
    let resp = client
        .post("/api/1/Tendencies")
        .header(bearer(&token))
        .json(&json!({
            "point_id": 99999,
            "name": "2HOR",
            "date": "20260401",
            "value": 3.1
        }))
        .dispatch()
        .await;
    assert_eq!(resp.status(), Status::UnprocessableEntity);

    // Deleting a missing record is a 404.
    let resp = client
        .delete("/api/1/Tendencies/99999")
        .header(bearer(&token))
        .dispatch()
        .await;
    assert_eq!(resp.status(), Status::NotFound);
}
