use std::sync::Arc;

use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use tower::ServiceExt;
use uuid::Uuid;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use catalog_cell::router::catalog_routes;
use shared_config::AppConfig;

fn test_config(mock_uri: &str) -> AppConfig {
    AppConfig {
        supabase_url: mock_uri.to_string(),
        supabase_service_key: "test-service-key".to_string(),
        mail_relay_url: String::new(),
        facility_name: "Sadiqabad Medical Complex".to_string(),
        facility_phone: "+92-300-1234567".to_string(),
        facility_email: "info@sadiqabadmedical.com".to_string(),
    }
}

fn create_test_app(config: AppConfig) -> Router {
    catalog_routes(Arc::new(config))
}

async fn get_json(app: Router, uri: &str) -> (StatusCode, Value) {
    let response = app
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let body = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, serde_json::from_slice(&body).unwrap())
}

fn doctor_row(doctor_id: Uuid, name: &str) -> Value {
    json!({
        "id": doctor_id,
        "name": name,
        "specialty_id": Uuid::new_v4(),
        "qualifications": "MBBS, FCPS",
        "bio": "Consultant physician",
        "fee": "Call for price",
        "tags": [],
        "gender": "female",
        "languages": ["Urdu", "English"],
        "experience_years": 12,
        "active": true,
        "created_at": "2025-01-01T00:00:00Z"
    })
}

#[tokio::test]
async fn get_doctor_returns_the_row() {
    let mock_server = MockServer::start().await;
    let doctor_id = Uuid::new_v4();

    Mock::given(method("GET"))
        .and(path("/rest/v1/doctors"))
        .and(query_param("id", format!("eq.{}", doctor_id)))
        .and(query_param("active", "eq.true"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!([doctor_row(doctor_id, "Dr. Sana Javed")])),
        )
        .mount(&mock_server)
        .await;

    let app = create_test_app(test_config(&mock_server.uri()));
    let (status, body) = get_json(app, &format!("/doctors/{}", doctor_id)).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["name"], "Dr. Sana Javed");
}

#[tokio::test]
async fn missing_doctor_is_a_not_found() {
    let mock_server = MockServer::start().await;
    let doctor_id = Uuid::new_v4();

    Mock::given(method("GET"))
        .and(path("/rest/v1/doctors"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&mock_server)
        .await;

    let app = create_test_app(test_config(&mock_server.uri()));
    let (status, body) = get_json(app, &format!("/doctors/{}", doctor_id)).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Doctor not found");
}

#[tokio::test]
async fn doctors_can_be_filtered_by_specialty() {
    let mock_server = MockServer::start().await;
    let specialty_id = Uuid::new_v4();

    Mock::given(method("GET"))
        .and(path("/rest/v1/doctors"))
        .and(query_param("specialty_id", format!("eq.{}", specialty_id)))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!([doctor_row(Uuid::new_v4(), "Dr. Hassan Ali")])),
        )
        .mount(&mock_server)
        .await;

    let app = create_test_app(test_config(&mock_server.uri()));
    let (status, body) = get_json(app, &format!("/doctors?specialty_id={}", specialty_id)).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn tests_can_be_filtered_by_category_and_search() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/rest/v1/diagnostic_tests"))
        .and(query_param("category", "eq.lab_tests"))
        .and(query_param("name", "ilike.*lipid*"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([{
            "id": Uuid::new_v4(),
            "name": "Lipid Profile",
            "category": "lab_tests",
            "description": "Cholesterol and triglycerides",
            "preparation": "12 hours fasting required",
            "price": "Call for price",
            "report_time": "Same day",
            "duration_minutes": 15,
            "active": true,
            "created_at": "2025-01-01T00:00:00Z"
        }])))
        .mount(&mock_server)
        .await;

    let app = create_test_app(test_config(&mock_server.uri()));
    let (status, body) = get_json(app, "/tests?category=lab_tests&search=lipid").await;

    assert_eq!(status, StatusCode::OK);
    let tests = body.as_array().unwrap();
    assert_eq!(tests.len(), 1);
    assert_eq!(tests[0]["name"], "Lipid Profile");
}

#[tokio::test]
async fn missing_test_is_a_not_found() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/rest/v1/diagnostic_tests"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&mock_server)
        .await;

    let app = create_test_app(test_config(&mock_server.uri()));
    let (status, body) = get_json(app, &format!("/tests/{}", Uuid::new_v4())).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Test not found");
}
