//! Endpoint integration tests: the assembled router driven end to end with a
//! wiremock stand-in for the durable store.

use axum::body::{to_bytes, Body};
use axum::http::{Request, StatusCode};
use chrono::{Duration, Utc};
use serde_json::{json, Value};
use tower::ServiceExt;
use uuid::Uuid;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use endpoint_integration_tests::{
    appointment_json, facility_json, provider_json, test_app, test_state, window_json,
};
use shared_utils::test_utils::TEST_ADMIN_KEY;

async fn body_json(body: Body) -> Value {
    let bytes = to_bytes(body, usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

fn json_request(method: &str, uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(serde_json::to_vec(&body).unwrap()))
        .unwrap()
}

#[tokio::test]
async fn provider_listing_is_filtered_to_approved_in_the_store_query() {
    let mock_server = MockServer::start().await;
    let provider_id = Uuid::new_v4();
    let facility_id = Uuid::new_v4();

    // Only the approval-filtered query is answered; an unfiltered one would
    // miss every mock and surface as a 500.
    Mock::given(method("GET"))
        .and(path("/rest/v1/providers"))
        .and(query_param("approval_status", "eq.approved"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            provider_json(&provider_id, &facility_id, "approved")
        ])))
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/rest/v1/availability_windows"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            window_json(&provider_id, "Thu", "08:30:00", "11:30:00")
        ])))
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/rest/v1/facilities"))
        .respond_with(ResponseTemplate::new(200)
            .set_body_json(json!([facility_json(&facility_id, "Lakeside Clinic")])))
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/rest/v1/ratings"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&mock_server)
        .await;

    let app = test_app(test_state(&mock_server.uri()));
    let response = app.oneshot(get("/providers")).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response.into_body()).await;
    assert_eq!(body["total"], 1);
    assert_eq!(body["providers"][0]["facility"], "Lakeside Clinic");
    assert_eq!(
        body["providers"][0]["availability_summary"],
        "Thu: 8:30 AM - 11:30 AM"
    );
    assert_eq!(body["providers"][0]["review_count"], 0);
    assert_eq!(body["providers"][0]["avg_rating"], Value::Null);
}

#[tokio::test]
async fn slot_endpoint_returns_empty_list_for_unapproved_provider() {
    let mock_server = MockServer::start().await;
    let provider_id = Uuid::new_v4();
    let facility_id = Uuid::new_v4();

    Mock::given(method("GET"))
        .and(path("/rest/v1/providers"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            provider_json(&provider_id, &facility_id, "rejected")
        ])))
        .mount(&mock_server)
        .await;

    let app = test_app(test_state(&mock_server.uri()));
    let response = app
        .oneshot(get(&format!("/providers/{}/slots?date=2025-06-02", provider_id)))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response.into_body()).await, json!([]));
}

#[tokio::test]
async fn booking_returns_201_with_the_full_view() {
    let mock_server = MockServer::start().await;
    let patient_id = Uuid::new_v4();
    let provider_id = Uuid::new_v4();
    let facility_id = Uuid::new_v4();
    let appointment_id = Uuid::new_v4();

    Mock::given(method("GET"))
        .and(path("/rest/v1/patients"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([{ "id": patient_id }])))
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/rest/v1/providers"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            provider_json(&provider_id, &facility_id, "approved")
        ])))
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/rest/v1/facilities"))
        .respond_with(ResponseTemplate::new(200)
            .set_body_json(json!([facility_json(&facility_id, "Lakeside Clinic")])))
        .mount(&mock_server)
        .await;
    Mock::given(method("POST"))
        .and(path("/rest/v1/appointments"))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!([
            appointment_json(&appointment_id, &patient_id, &provider_id, "2025-06-02", "scheduled")
        ])))
        .mount(&mock_server)
        .await;

    let app = test_app(test_state(&mock_server.uri()));
    let response = app
        .oneshot(json_request(
            "POST",
            "/bookings",
            json!({
                "patient_id": patient_id,
                "provider_id": provider_id,
                "date": "2025-06-02",
                "time": "09:00"
            }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::CREATED);
    let body = body_json(response.into_body()).await;
    assert_eq!(body["id"], json!(appointment_id));
    assert_eq!(body["time"], "09:00");
    assert_eq!(body["provider_name"], "Dr. Carol Jones");
    assert_eq!(body["facility"], "Lakeside Clinic");
    assert_eq!(body["reason"], "Unstated");
}

#[tokio::test]
async fn losing_a_slot_race_maps_to_http_409_conflict() {
    let mock_server = MockServer::start().await;
    let patient_id = Uuid::new_v4();
    let provider_id = Uuid::new_v4();
    let facility_id = Uuid::new_v4();

    Mock::given(method("GET"))
        .and(path("/rest/v1/patients"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([{ "id": patient_id }])))
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/rest/v1/providers"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            provider_json(&provider_id, &facility_id, "approved")
        ])))
        .mount(&mock_server)
        .await;
    Mock::given(method("POST"))
        .and(path("/rest/v1/appointments"))
        .respond_with(ResponseTemplate::new(409).set_body_json(json!({
            "code": "23505",
            "message": "duplicate key value violates unique constraint \"uniq_provider_slot\""
        })))
        .mount(&mock_server)
        .await;

    let app = test_app(test_state(&mock_server.uri()));
    let response = app
        .oneshot(json_request(
            "POST",
            "/bookings",
            json!({
                "patient_id": patient_id,
                "provider_id": provider_id,
                "date": "2025-06-02",
                "time": "09:00",
                "reason": "Follow-up"
            }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::CONFLICT);
    let body = body_json(response.into_body()).await;
    assert_eq!(body["code"], "conflict");
}

#[tokio::test]
async fn re_cancelling_maps_to_http_400_already_cancelled() {
    let mock_server = MockServer::start().await;
    let appointment_id = Uuid::new_v4();

    Mock::given(method("PATCH"))
        .and(path("/rest/v1/appointments"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/rest/v1/appointments"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            appointment_json(&appointment_id, &Uuid::new_v4(), &Uuid::new_v4(), "2025-06-02", "cancelled")
        ])))
        .mount(&mock_server)
        .await;

    let app = test_app(test_state(&mock_server.uri()));
    let response = app
        .oneshot(
            Request::builder()
                .method("PUT")
                .uri(&format!("/bookings/{}/cancel", appointment_id))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response.into_body()).await;
    assert_eq!(body["code"], "already_cancelled");
}

#[tokio::test]
async fn admin_routes_reject_missing_or_wrong_credentials() {
    let mock_server = MockServer::start().await;
    let app = test_app(test_state(&mock_server.uri()));

    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            &format!("/admin/providers/{}/approve", Uuid::new_v4()),
            json!({}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let mut request = json_request(
        "POST",
        &format!("/admin/providers/{}/approve", Uuid::new_v4()),
        json!({}),
    );
    request
        .headers_mut()
        .insert("x-admin-key", "wrong-key".parse().unwrap());
    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn admin_approval_succeeds_with_the_shared_secret() {
    let mock_server = MockServer::start().await;
    let provider_id = Uuid::new_v4();
    let facility_id = Uuid::new_v4();

    Mock::given(method("GET"))
        .and(path("/rest/v1/providers"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            provider_json(&provider_id, &facility_id, "pending")
        ])))
        .mount(&mock_server)
        .await;

    let mut approved = provider_json(&provider_id, &facility_id, "approved");
    approved["approved_at"] = json!(Utc::now().to_rfc3339());
    Mock::given(method("PATCH"))
        .and(path("/rest/v1/providers"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([approved])))
        .mount(&mock_server)
        .await;

    let app = test_app(test_state(&mock_server.uri()));
    let mut request = json_request(
        "POST",
        &format!("/admin/providers/{}/approve", provider_id),
        json!({ "approved_by": "ops@medbook.test" }),
    );
    request
        .headers_mut()
        .insert("x-admin-key", TEST_ADMIN_KEY.parse().unwrap());

    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response.into_body()).await;
    assert_eq!(body["approval_status"], "approved");
}

#[tokio::test]
async fn rating_a_future_visit_maps_to_http_400_precondition_failed() {
    let mock_server = MockServer::start().await;
    let appointment_id = Uuid::new_v4();
    let tomorrow = (Utc::now().date_naive() + Duration::days(1))
        .format("%Y-%m-%d")
        .to_string();

    Mock::given(method("GET"))
        .and(path("/rest/v1/appointments"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            appointment_json(&appointment_id, &Uuid::new_v4(), &Uuid::new_v4(), &tomorrow, "scheduled")
        ])))
        .mount(&mock_server)
        .await;

    let app = test_app(test_state(&mock_server.uri()));
    let response = app
        .oneshot(json_request(
            "POST",
            &format!("/bookings/{}/rating", appointment_id),
            json!({ "score": 4.0, "comment": "Great" }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response.into_body()).await;
    assert_eq!(body["code"], "precondition_failed");
}

#[tokio::test]
async fn out_of_range_rating_score_maps_to_http_400_invalid() {
    let mock_server = MockServer::start().await;

    let app = test_app(test_state(&mock_server.uri()));
    let response = app
        .oneshot(json_request(
            "POST",
            &format!("/bookings/{}/rating", Uuid::new_v4()),
            json!({ "score": 0.2 }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response.into_body()).await;
    assert_eq!(body["code"], "invalid");
}
