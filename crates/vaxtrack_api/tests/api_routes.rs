use axum::body::{to_bytes, Body};
use axum::http::{header, Method, Request, StatusCode};
use axum::Router;
use serde_json::{json, Value};
use tower::ServiceExt;
use uuid::Uuid;
use vaxtrack_api::{build_router, AppState};
use vaxtrack_core::open_db_in_memory;

fn test_app() -> Router {
    build_router(AppState::new(open_db_in_memory().unwrap()))
}

async fn send(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), 1024 * 1024).await.unwrap();
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, json)
}

async fn create_mmr(app: &Router) -> Value {
    let (status, vaccine) = send(
        app,
        Method::POST,
        "/api/vaccines",
        Some(json!({
            "name": "MMR",
            "recommendedAge": "12 months",
            "doses": "2",
            "interval": "4 weeks"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    vaccine
}

async fn create_jane(app: &Router) -> Value {
    let (status, patient) = send(
        app,
        Method::POST,
        "/api/patients",
        Some(json!({
            "name": "Jane Doe",
            "dateOfBirth": "2023-01-15",
            "gender": "Female",
            "guardian": "John Doe"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    patient
}

async fn create_record(app: &Router, patient: &Value, vaccine: &Value) -> Value {
    let (status, record) = send(
        app,
        Method::POST,
        "/api/records",
        Some(json!({
            "patientId": patient["id"],
            "vaccineId": vaccine["id"],
            "dose": 1,
            "administered": "2024-01-10",
            "nextDue": "2024-02-10",
            "status": "Completed"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    record
}

#[tokio::test]
async fn health_reports_ok_and_version() {
    let app = test_app();
    let (status, body) = send(&app, Method::GET, "/api/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    assert_eq!(body["version"], vaxtrack_core::core_version());
}

#[tokio::test]
async fn mmr_jane_doe_scenario_round_trips_through_joined_views() {
    let app = test_app();
    let vaccine = create_mmr(&app).await;
    assert_eq!(vaccine["doses"], 2);
    let patient = create_jane(&app).await;
    let record = create_record(&app, &patient, &vaccine).await;
    assert_eq!(record["patientId"], patient["id"]);
    assert_eq!(record["vaccineId"], vaccine["id"]);

    let (status, records) = send(&app, Method::GET, "/api/records", None).await;
    assert_eq!(status, StatusCode::OK);
    let records = records.as_array().unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0]["id"], record["id"]);
    assert_eq!(records[0]["patient"]["name"], "Jane Doe");
    assert_eq!(records[0]["patient"]["id"], patient["id"]);
    assert_eq!(records[0]["vaccine"]["name"], "MMR");
    assert_eq!(records[0]["nextDue"], "2024-02-10");
    assert_eq!(records[0]["status"], "Completed");

    let uri = format!("/api/records/{}", record["id"].as_str().unwrap());
    let (status, view) = send(&app, Method::GET, &uri, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(&view, &records[0]);
}

#[tokio::test]
async fn delete_order_scenario_enforces_referential_integrity() {
    let app = test_app();
    let vaccine = create_mmr(&app).await;
    let patient = create_jane(&app).await;
    let record = create_record(&app, &patient, &vaccine).await;

    let patient_uri = format!("/api/patients/{}", patient["id"].as_str().unwrap());
    let vaccine_uri = format!("/api/vaccines/{}", vaccine["id"].as_str().unwrap());
    let record_uri = format!("/api/records/{}", record["id"].as_str().unwrap());

    let (status, body) = send(&app, Method::DELETE, &patient_uri, None).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"]["code"], "referential_conflict");

    let (status, _) = send(&app, Method::DELETE, &vaccine_uri, None).await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (_, patients) = send(&app, Method::GET, "/api/patients", None).await;
    assert_eq!(patients.as_array().unwrap().len(), 1);

    let (status, body) = send(&app, Method::DELETE, &record_uri, None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    assert_eq!(body, Value::Null);

    let (status, _) = send(&app, Method::DELETE, &patient_uri, None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    let (status, _) = send(&app, Method::DELETE, &vaccine_uri, None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (_, patients) = send(&app, Method::GET, "/api/patients", None).await;
    assert!(patients.as_array().unwrap().is_empty());
    let (status, _) = send(&app, Method::GET, &patient_uri, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn dangling_reference_returns_422_and_persists_nothing() {
    let app = test_app();
    let vaccine = create_mmr(&app).await;

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/records",
        Some(json!({
            "patientId": Uuid::new_v4().to_string(),
            "vaccineId": vaccine["id"],
            "dose": 1,
            "administered": "2024-01-10",
            "status": "Due"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["error"]["code"], "dangling_reference");

    let (_, records) = send(&app, Method::GET, "/api/records", None).await;
    assert!(records.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn next_due_before_administered_returns_400_on_create_and_update() {
    let app = test_app();
    let vaccine = create_mmr(&app).await;
    let patient = create_jane(&app).await;

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/records",
        Some(json!({
            "patientId": patient["id"],
            "vaccineId": vaccine["id"],
            "dose": 1,
            "administered": "2024-02-01",
            "nextDue": "2024-01-01",
            "status": "Due"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "validation_failed");

    let record = create_record(&app, &patient, &vaccine).await;
    let uri = format!("/api/records/{}", record["id"].as_str().unwrap());
    let (status, _) = send(
        &app,
        Method::PUT,
        &uri,
        Some(json!({ "administered": "2024-03-01" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn put_merges_fields_and_clears_next_due() {
    let app = test_app();
    let vaccine = create_mmr(&app).await;
    let patient = create_jane(&app).await;
    let record = create_record(&app, &patient, &vaccine).await;
    let uri = format!("/api/records/{}", record["id"].as_str().unwrap());

    let (status, updated) = send(
        &app,
        Method::PUT,
        &uri,
        Some(json!({ "status": "Overdue", "nextDue": "" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["status"], "Overdue");
    assert_eq!(updated["nextDue"], Value::Null);
    assert_eq!(updated["dose"], 1);
    assert_eq!(updated["administered"], "2024-01-10");

    // Dose past the 2-dose series is accepted.
    let (status, updated) = send(&app, Method::PUT, &uri, Some(json!({ "dose": "3" }))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["dose"], 3);
    assert_eq!(updated["status"], "Overdue");
}

#[tokio::test]
async fn record_list_applies_query_filters() {
    let app = test_app();
    let vaccine = create_mmr(&app).await;
    let jane = create_jane(&app).await;
    let (_, sam) = send(
        &app,
        Method::POST,
        "/api/patients",
        Some(json!({
            "name": "Sam Roe",
            "dateOfBirth": "2022-05-01",
            "gender": "Male",
            "guardian": "Ann Roe"
        })),
    )
    .await;
    create_record(&app, &jane, &vaccine).await;
    create_record(&app, &sam, &vaccine).await;

    let uri = format!("/api/records?patientId={}", sam["id"].as_str().unwrap());
    let (status, records) = send(&app, Method::GET, &uri, None).await;
    assert_eq!(status, StatusCode::OK);
    let records = records.as_array().unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0]["patient"]["name"], "Sam Roe");

    let (_, due) = send(&app, Method::GET, "/api/records?status=Due", None).await;
    assert!(due.as_array().unwrap().is_empty());

    let (status, body) = send(&app, Method::GET, "/api/records?status=Later", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "bad_request");
}

#[tokio::test]
async fn duplicate_vaccine_name_returns_409() {
    let app = test_app();
    create_mmr(&app).await;

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/vaccines",
        Some(json!({ "name": "mmr", "doses": 1 })),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"]["code"], "duplicate_name");
}

#[tokio::test]
async fn invalid_payloads_return_400() {
    let app = test_app();

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/patients",
        Some(json!({
            "name": "Jane Doe",
            "dateOfBirth": "2023-01-15",
            "gender": "Female",
            "guardian": ""
        })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "validation_failed");

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/vaccines",
        Some(json!({ "name": "BCG" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "validation_failed");

    let request = Request::builder()
        .method(Method::POST)
        .uri("/api/vaccines")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{not json"))
        .unwrap();
    let response = app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn unknown_and_unparseable_ids_return_404() {
    let app = test_app();

    let uri = format!("/api/vaccines/{}", Uuid::new_v4());
    let (status, body) = send(&app, Method::GET, &uri, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"]["code"], "not_found");

    let (status, _) = send(&app, Method::GET, "/api/records/not-an-id", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = send(
        &app,
        Method::PUT,
        "/api/patients/not-an-id",
        Some(json!({ "name": "X" })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn summary_counts_collections() {
    let app = test_app();
    let vaccine = create_mmr(&app).await;
    let patient = create_jane(&app).await;
    create_record(&app, &patient, &vaccine).await;

    let (status, summary) = send(&app, Method::GET, "/api/summary", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(summary["vaccines"], 1);
    assert_eq!(summary["patients"], 1);
    assert_eq!(summary["records"], 1);
    assert_eq!(summary["recordsByStatus"]["completed"], 1);
    assert_eq!(summary["recordsByStatus"]["due"], 0);
}

#[tokio::test]
async fn cors_preflight_is_allowed() {
    let app = test_app();
    let request = Request::builder()
        .method(Method::OPTIONS)
        .uri("/api/vaccines")
        .header(header::ORIGIN, "http://localhost:3000")
        .header(header::ACCESS_CONTROL_REQUEST_METHOD, "POST")
        .body(Body::empty())
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    assert!(response.status().is_success());
    assert!(response
        .headers()
        .contains_key(header::ACCESS_CONTROL_ALLOW_ORIGIN));
}
