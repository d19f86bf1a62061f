//! HTTP handler tests for API endpoints.

mod common;

use axum_test::TestServer;
use common::*;
use farm_manager::api::build_router;
use serde_json::{Value, json};
use time::{Duration, OffsetDateTime};

const FARM_PHONE: &str = "0911000000";

// =============================================================================
// Health
// =============================================================================

#[tokio::test]
async fn health_endpoint_returns_ok() {
    let (resources, _gateway) = create_test_resources().await;
    let server = TestServer::new(build_router(resources)).expect("create test server");

    let response = server.get("/healthz").await;

    response.assert_status_ok();
    response.assert_text("ok");
}

#[tokio::test]
async fn api_docs_are_served() {
    let (resources, _gateway) = create_test_resources().await;
    let server = TestServer::new(build_router(resources)).expect("create test server");

    server.get("/api-docs").await.assert_status_ok();
}

// =============================================================================
// Alerts
// =============================================================================

#[tokio::test]
async fn run_alerts_returns_summary() {
    let (resources, gateway) = create_test_resources().await;
    let db = resources.db.as_ref();
    insert_farm(db, "F1", FARM_PHONE, None).await;
    let cow = insert_cow(db, "F1", "C1", 1).await;
    insert_heat_record(db, &cow, OffsetDateTime::now_utc() - Duration::days(21)).await;
    let server = TestServer::new(build_router(resources)).expect("create test server");

    let response = server.post("/api/alerts/run").await;
    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["heat"]["sent"], 1);
    assert_eq!(body["pregnancy"]["scanned"], 0);
    assert_eq!(gateway.sent().len(), 1);

    let again: Value = server.post("/api/alerts/run").await.json();
    assert_eq!(again["heat"]["sent"], 0);
    assert_eq!(again["heat"]["skipped"], 1);
}

// =============================================================================
// Messages
// =============================================================================

async fn seed_three_heat_alerts(server: &TestServer, db: &sea_orm::DatabaseConnection) {
    insert_farm(db, "F1", FARM_PHONE, None).await;
    insert_farm(db, "F2", "0933000000", None).await;
    let c1 = insert_cow(db, "F1", "C1", 1).await;
    let c2 = insert_cow(db, "F1", "C2", 1).await;
    let other = insert_cow(db, "F2", "C1", 1).await;
    for cow in [&c1, &c2, &other] {
        insert_heat_record(db, cow, OffsetDateTime::now_utc() - Duration::days(30)).await;
    }
    server.post("/api/alerts/run").await.assert_status_ok();
}

#[tokio::test]
async fn messages_are_filtered_by_farm_and_cow() {
    let (resources, _gateway) = create_test_resources().await;
    let db = resources.db.clone();
    let server = TestServer::new(build_router(resources)).expect("create test server");
    seed_three_heat_alerts(&server, &db).await;

    let all: Value = server.get("/api/messages").await.json();
    assert_eq!(all["count"], 3);
    assert_eq!(all["results"].as_array().unwrap().len(), 3);

    let farm: Value = server
        .get("/api/messages")
        .add_query_param("farm_id", "F1")
        .await
        .json();
    assert_eq!(farm["results"].as_array().unwrap().len(), 2);

    let cow: Value = server
        .get("/api/messages")
        .add_query_param("farm_id", "F1")
        .add_query_param("cow_id", "C2")
        .await
        .json();
    let results = cow["results"].as_array().unwrap();
    assert_eq!(results.len(), 1);
    assert_eq!(results[0]["cow_id"], "C2");
    assert_eq!(results[0]["farm_id"], "F1");
    assert_eq!(results[0]["message_type"], "heat_monitoring_alert");
    assert_eq!(results[0]["is_sent"], true);
}

#[tokio::test]
async fn cow_filter_without_farm_returns_empty_list() {
    let (resources, _gateway) = create_test_resources().await;
    let db = resources.db.as_ref();
    insert_farm(db, "F1", FARM_PHONE, None).await;
    let cow = insert_cow(db, "F1", "C1", 1).await;
    insert_heat_record(db, &cow, OffsetDateTime::now_utc() - Duration::days(30)).await;
    let server = TestServer::new(build_router(resources)).expect("create test server");
    server.post("/api/alerts/run").await.assert_status_ok();

    let response = server
        .get("/api/messages")
        .add_query_param("cow_id", "C1")
        .await;
    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["count"], 0);
    assert!(body["results"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn messages_search_matches_text_and_type() {
    let (resources, _gateway) = create_test_resources().await;
    let db = resources.db.clone();
    let server = TestServer::new(build_router(resources)).expect("create test server");
    seed_three_heat_alerts(&server, &db).await;

    let by_type: Value = server
        .get("/api/messages")
        .add_query_param("search", "heat_monitoring")
        .await
        .json();
    assert_eq!(by_type["count"], 3);

    let by_text: Value = server
        .get("/api/messages")
        .add_query_param("search", "C2")
        .await
        .json();
    assert_eq!(by_text["count"], 1);
    assert_eq!(by_text["results"][0]["cow_id"], "C2");

    let no_match: Value = server
        .get("/api/messages")
        .add_query_param("search", "C2 pregnancy")
        .await
        .json();
    assert_eq!(no_match["count"], 0);
}

#[tokio::test]
async fn messages_are_paginated() {
    let (resources, _gateway) = create_test_resources().await;
    let db = resources.db.clone();
    let server = TestServer::new(build_router(resources)).expect("create test server");
    seed_three_heat_alerts(&server, &db).await;

    let first: Value = server
        .get("/api/messages")
        .add_query_param("page_size", 2)
        .await
        .json();
    assert_eq!(first["count"], 3);
    assert_eq!(first["total_pages"], 2);
    assert_eq!(first["current_page"], 1);
    assert_eq!(first["page_size"], 2);
    assert_eq!(first["next"], 2);
    assert_eq!(first["previous"], Value::Null);
    assert_eq!(first["results"].as_array().unwrap().len(), 2);

    let second: Value = server
        .get("/api/messages")
        .add_query_param("page_size", 2)
        .add_query_param("page", 2)
        .await
        .json();
    assert_eq!(second["next"], Value::Null);
    assert_eq!(second["previous"], 1);
    assert_eq!(second["results"].as_array().unwrap().len(), 1);

    let capped: Value = server
        .get("/api/messages")
        .add_query_param("page_size", 1000)
        .await
        .json();
    assert_eq!(capped["page_size"], 100);

    let response = server
        .get("/api/messages")
        .add_query_param("page_size", 2)
        .add_query_param("page", 3)
        .expect_failure()
        .await;
    response.assert_status_not_found();
    response.assert_json(&json!({ "error": "Invalid page." }));
}

// =============================================================================
// Reproduction events
// =============================================================================

#[tokio::test]
async fn heat_sign_endpoint_records_and_notifies() {
    let (resources, gateway) = create_test_resources().await;
    let db = resources.db.as_ref();
    let inseminator = insert_inseminator(db, "Tesfaye", "0922000000", true).await;
    insert_farm(db, "F1", FARM_PHONE, Some(inseminator.id)).await;
    insert_cow(db, "F1", "C1", 1).await;
    let server = TestServer::new(build_router(resources)).expect("create test server");

    let response = server
        .post("/api/reproduction/heat-sign")
        .json(&json!({
            "farm_id": "F1",
            "cow_id": "C1",
            "heat_signs": "mounting",
            "heat_start_time": "2025-10-01T06:00:00Z"
        }))
        .await;

    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["cow_id"], "C1");
    assert_eq!(body["heat_sign_start"], "2025-10-01T06:00:00Z");
    assert_eq!(body["notifications_sent"]["inseminator_sent"], true);
    assert_eq!(body["notifications_sent"]["farmer_sent"], true);
    assert_eq!(gateway.sent().len(), 2);
}

#[tokio::test]
async fn heat_sign_for_unknown_cow_is_404() {
    let (resources, _gateway) = create_test_resources().await;
    insert_farm(resources.db.as_ref(), "F1", FARM_PHONE, None).await;
    let server = TestServer::new(build_router(resources)).expect("create test server");

    let response = server
        .post("/api/reproduction/heat-sign")
        .json(&json!({
            "farm_id": "F1",
            "cow_id": "missing",
            "heat_signs": "mounting",
            "heat_start_time": "2025-10-01T06:00:00Z"
        }))
        .expect_failure()
        .await;

    response.assert_status_not_found();
    let body: Value = response.json();
    assert!(body["error"].as_str().unwrap().contains("missing"));
}

#[tokio::test]
async fn pregnancy_endpoint_returns_expected_calving_date() {
    let (resources, _gateway) = create_test_resources().await;
    let db = resources.db.as_ref();
    insert_farm(db, "F1", FARM_PHONE, None).await;
    insert_cow(db, "F1", "C1", 0).await;
    let server = TestServer::new(build_router(resources)).expect("create test server");

    let response = server
        .post("/api/reproduction/pregnancy")
        .json(&json!({
            "farm_id": "F1",
            "cow_id": "C1",
            "pregnancy_date": "2026-01-10",
            "days_until_calving": 283,
            "lactation_number": 1,
            "service_per_conception": 2
        }))
        .await;

    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["expected_calving_date"], "2026-10-20");
    assert_eq!(body["service_per_conception"], 2);
    assert_eq!(body["notification_sent"], true);
}

#[tokio::test]
async fn invalid_pregnancy_payload_is_400() {
    let (resources, _gateway) = create_test_resources().await;
    let db = resources.db.as_ref();
    insert_farm(db, "F1", FARM_PHONE, None).await;
    insert_cow(db, "F1", "C1", 0).await;
    let server = TestServer::new(build_router(resources)).expect("create test server");

    let response = server
        .post("/api/reproduction/pregnancy")
        .json(&json!({
            "farm_id": "F1",
            "cow_id": "C1",
            "pregnancy_date": "2026-01-10",
            "days_until_calving": 283,
            "lactation_number": -1,
            "service_per_conception": 2
        }))
        .expect_failure()
        .await;

    response.assert_status_bad_request();
}

#[tokio::test]
async fn pregnancy_without_days_until_calving_is_rejected() {
    let (resources, _gateway) = create_test_resources().await;
    let db = resources.db.as_ref();
    insert_farm(db, "F1", FARM_PHONE, None).await;
    insert_cow(db, "F1", "C1", 0).await;
    let server = TestServer::new(build_router(resources)).expect("create test server");

    let response = server
        .post("/api/reproduction/pregnancy")
        .json(&json!({
            "farm_id": "F1",
            "cow_id": "C1",
            "pregnancy_date": "2026-01-10",
            "lactation_number": 1,
            "service_per_conception": 2
        }))
        .expect_failure()
        .await;

    assert!(response.status_code().is_client_error());
}

#[tokio::test]
async fn birth_endpoint_counts_the_lactation() {
    let (resources, gateway) = create_test_resources().await;
    let db = resources.db.as_ref();
    insert_farm(db, "F1", FARM_PHONE, None).await;
    insert_cow(db, "F1", "C1", 2).await;
    let server = TestServer::new(build_router(resources)).expect("create test server");

    let response = server
        .post("/api/reproduction/birth")
        .json(&json!({
            "farm_id": "F1",
            "cow_id": "C1",
            "calving_date": "2026-10-18",
            "last_calving_date": "2025-09-02",
            "calf_sex": "female"
        }))
        .await;

    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["calving_date"], "2026-10-18");
    assert_eq!(body["calf_sex"], "F");
    assert_eq!(body["lactation_number"], 3);
    assert_eq!(body["notification_sent"], true);
    assert_eq!(gateway.sent()[0].phone_number, FARM_PHONE);
}

// =============================================================================
// Medical events
// =============================================================================

#[tokio::test]
async fn medical_report_needs_an_assigned_doctor() {
    let (resources, gateway) = create_test_resources().await;
    let db = resources.db.as_ref();
    insert_farm(db, "F1", FARM_PHONE, None).await;
    insert_cow(db, "F1", "C1", 1).await;
    let server = TestServer::new(build_router(resources)).expect("create test server");

    let response = server
        .post("/api/medical/report")
        .json(&json!({
            "farm_id": "F1",
            "cow_id": "C1",
            "sickness_description": "Limping on the left hind leg"
        }))
        .expect_failure()
        .await;

    response.assert_status_bad_request();
    let body: Value = response.json();
    assert!(body["error"].as_str().unwrap().contains("F1"));
    assert!(gateway.sent().is_empty());
}

#[tokio::test]
async fn medical_report_and_assessment_round_trip() {
    let (resources, gateway) = create_test_resources().await;
    let db = resources.db.as_ref();
    let doctor = insert_doctor(db, "Hana", "0944000000", true).await;
    let farm = insert_farm(db, "F1", FARM_PHONE, None).await;
    assign_doctor(db, farm, doctor.id).await;
    insert_cow(db, "F1", "C1", 1).await;
    let server = TestServer::new(build_router(resources)).expect("create test server");

    let report = server
        .post("/api/medical/report")
        .json(&json!({
            "farm_id": "F1",
            "cow_id": "C1",
            "sickness_description": "Limping on the left hind leg"
        }))
        .await;
    report.assert_status_ok();
    let body: Value = report.json();
    assert_eq!(body["notifications_sent"]["doctor_sent"], true);
    assert_eq!(body["notifications_sent"]["farmer_sent"], true);

    let assessment = server
        .post("/api/medical/assessment")
        .json(&json!({
            "farm_id": "F1",
            "cow_id": "C1",
            "is_cow_sick": false,
            "has_lameness": true
        }))
        .await;
    assessment.assert_status_ok();
    let body: Value = assessment.json();
    assert_eq!(body["doctor_id"], doctor.id);
    assert_eq!(body["notifications_sent"]["farmer_sent"], true);
    assert_eq!(gateway.sent().len(), 4);
    assert!(gateway.sent()[2].body.contains("N/A"));
}

// =============================================================================
// Farm staff
// =============================================================================

#[tokio::test]
async fn doctor_change_endpoint_notifies_farmer() {
    let (resources, gateway) = create_test_resources().await;
    let db = resources.db.as_ref();
    let doctor = insert_doctor(db, "Hana", "0944000000", true).await;
    insert_farm(db, "F1", FARM_PHONE, None).await;
    let server = TestServer::new(build_router(resources)).expect("create test server");

    let response = server
        .post("/api/farms/F1/doctor")
        .json(&json!({ "staff_id": doctor.id }))
        .await;

    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["new_staff_id"], doctor.id);
    assert_eq!(body["old_staff_id"], Value::Null);
    assert_eq!(body["notifications_sent"]["farmer_sent"], true);
    assert_eq!(gateway.sent().len(), 2);
}

#[tokio::test]
async fn inactive_inseminator_assignment_is_400() {
    let (resources, gateway) = create_test_resources().await;
    let db = resources.db.as_ref();
    let retired = insert_inseminator(db, "Tesfaye", "0922000000", false).await;
    insert_farm(db, "F1", FARM_PHONE, None).await;
    let server = TestServer::new(build_router(resources)).expect("create test server");

    server
        .post("/api/farms/F1/inseminator")
        .json(&json!({ "staff_id": retired.id }))
        .expect_failure()
        .await
        .assert_status_bad_request();
    server
        .post("/api/farms/NOPE/inseminator")
        .json(&json!({ "staff_id": retired.id }))
        .expect_failure()
        .await
        .assert_status_not_found();
    assert!(gateway.sent().is_empty());
}
