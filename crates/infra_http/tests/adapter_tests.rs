//! REST adapter tests
//!
//! Runs `BrokerHttpAdapter` against a fake brokerage backend served by axum
//! on an ephemeral loopback port. The fake mimics the backend's rules:
//! unknown policy types are rejected, dealers other than D1 have no policy
//! series, duplicate plates conflict.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use axum::extract::{Path, Query, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use rust_decimal_macros::dec;
use serde_json::{json, Value};

use core_kernel::{
    AdapterHealth, CircuitBreakerConfig, ExternalAuthConfig, HealthCheckable, OperationMetadata,
    PortError,
};
use domain_policy::{IssueKind, PolicyFormService, PolicyPort, SubmissionError, UpdatePolicyRequest};
use domain_pricing::{PriceCalculationRequest, PricingPort};
use domain_reference::{LookupPort, NewVehicle};
use infra_http::{BrokerHttpAdapter, HttpAdapterConfig, CORRELATION_ID_HEADER};
use test_utils::{
    assert_has_notice, IdFixtures, PolicyFormBuilder, ReferenceFixtures, TemporalFixtures,
};

// ============================================================================
// FAKE BACKEND
// ============================================================================

#[derive(Debug, Clone)]
struct Seen {
    method: &'static str,
    path: String,
    headers: HeaderMap,
    body: Option<Value>,
}

#[derive(Clone, Default)]
struct Backend {
    seen: Arc<Mutex<Vec<Seen>>>,
    hits: Arc<AtomicUsize>,
}

impl Backend {
    fn record(&self, method: &'static str, path: String, headers: HeaderMap, body: Option<Value>) {
        self.hits.fetch_add(1, Ordering::SeqCst);
        self.seen.lock().unwrap().push(Seen {
            method,
            path,
            headers,
            body,
        });
    }

    fn last(&self) -> Seen {
        self.seen.lock().unwrap().last().cloned().unwrap()
    }

    fn hits(&self) -> usize {
        self.hits.load(Ordering::SeqCst)
    }
}

fn error(status: StatusCode, body: Value) -> Response {
    (status, Json(body)).into_response()
}

async fn dealers(State(b): State<Backend>, headers: HeaderMap) -> Json<Value> {
    b.record("GET", "/dealers".into(), headers, None);
    Json(json!([ReferenceFixtures::dealer(), ReferenceFixtures::other_dealer()]))
}

async fn customers(
    State(b): State<Backend>,
    headers: HeaderMap,
    Query(query): Query<HashMap<String, String>>,
) -> Json<Value> {
    b.record("GET", "/customers".into(), headers, None);
    let d1 = IdFixtures::dealer().as_uuid().to_string();
    if query.get("dealerId") == Some(&d1) {
        Json(json!([ReferenceFixtures::customer(), ReferenceFixtures::other_customer()]))
    } else {
        Json(json!([]))
    }
}

async fn vehicles(State(b): State<Backend>, headers: HeaderMap, Path(id): Path<String>) -> Json<Value> {
    b.record("GET", format!("/vehicles/customer/{}", id), headers, None);
    if id == IdFixtures::customer().as_uuid().to_string() {
        Json(json!([ReferenceFixtures::vehicle()]))
    } else {
        Json(json!([]))
    }
}

async fn policy_types(State(b): State<Backend>, headers: HeaderMap) -> Json<Value> {
    b.record("GET", "/policy-types".into(), headers, None);
    Json(json!([ReferenceFixtures::kasko(), ReferenceFixtures::traffic()]))
}

async fn currencies(State(b): State<Backend>, headers: HeaderMap) -> Json<Value> {
    b.record("GET", "/currencies".into(), headers, None);
    Json(json!([ReferenceFixtures::currency_try(), ReferenceFixtures::currency_eur()]))
}

async fn create_vehicle(State(b): State<Backend>, headers: HeaderMap, Json(body): Json<Value>) -> Response {
    b.record("POST", "/vehicles".into(), headers, Some(body.clone()));
    if body["plateNumber"] == "34ABC123" {
        return error(
            StatusCode::CONFLICT,
            json!({ "message": "Vehicle with plate 34ABC123 already exists" }),
        );
    }
    let vehicle = json!({
        "id": "00000000-0000-0000-0000-000000000072",
        "plateNumber": body["plateNumber"],
        "brand": body["brand"],
        "model": body["model"],
    });
    (StatusCode::CREATED, Json(vehicle)).into_response()
}

async fn calculate(State(b): State<Backend>, headers: HeaderMap, Json(body): Json<Value>) -> Response {
    b.record("POST", "/pricing/calculate".into(), headers, Some(body.clone()));
    if body["policyType"] != "Kasko" {
        return error(
            StatusCode::NOT_FOUND,
            json!({ "message": format!("No price list for {}", body["policyType"]) }),
        );
    }
    Json(json!({
        "basePrice": 1000.00,
        "taxes": 180.00,
        "total": 1180.00,
        "currency": { "id": IdFixtures::currency_try(), "code": "TRY", "symbol": "₺" },
        "dealerCommission": 100.00,
        "observerCommission": 20.00,
        "pricesInOtherCurrencies": [{ "currencyCode": "EUR", "total": 34.50 }]
    }))
    .into_response()
}

async fn create_policy(State(b): State<Backend>, headers: HeaderMap, Json(body): Json<Value>) -> Response {
    b.record("POST", "/policies".into(), headers, Some(body.clone()));
    let policy_type = body["policyType"].as_str().unwrap_or_default().to_string();
    if policy_type != "Kasko" && policy_type != "Traffic" {
        return error(
            StatusCode::BAD_REQUEST,
            json!({ "message": format!("Policy type not found: {}", policy_type) }),
        );
    }
    let mut warnings = Vec::new();
    if body["dealerId"] != json!(IdFixtures::dealer()) {
        warnings.push(format!(
            "No active policy series for dealer {}; a new series will be provisioned",
            body["dealerId"]
        ));
    }
    let mut stored = body.clone();
    stored["id"] = json!(IdFixtures::policy());
    stored["policyNumber"] = json!("POL-000042");
    stored["warnings"] = json!(warnings);
    (StatusCode::CREATED, Json(stored)).into_response()
}

fn stored_policy() -> Value {
    json!({
        "id": IdFixtures::policy(),
        "policyNumber": "POL-000042",
        "dealerId": IdFixtures::dealer(),
        "customerId": IdFixtures::customer(),
        "vehicleId": IdFixtures::vehicle(),
        "policyType": "Kasko",
        "startDate": "2024-01-01",
        "endDate": "2024-12-31",
        "premium": 1180.00
    })
}

async fn get_policy(State(b): State<Backend>, headers: HeaderMap, Path(id): Path<String>) -> Response {
    b.record("GET", format!("/policies/{}", id), headers, None);
    if id != IdFixtures::policy().as_uuid().to_string() {
        return error(StatusCode::NOT_FOUND, json!({ "title": "Not Found" }));
    }
    Json(stored_policy()).into_response()
}

async fn update_policy(
    State(b): State<Backend>,
    headers: HeaderMap,
    Path(id): Path<String>,
    Json(body): Json<Value>,
) -> Response {
    b.record("PUT", format!("/policies/{}", id), headers, Some(body.clone()));
    let mut stored = stored_policy();
    for key in ["policyType", "startDate", "endDate"] {
        stored[key] = body[key].clone();
    }
    Json(stored).into_response()
}

async fn health(State(b): State<Backend>, headers: HeaderMap) -> &'static str {
    b.record("GET", "/health".into(), headers, None);
    "ok"
}

fn brokerage_routes(backend: Backend) -> Router {
    let api = Router::new()
        .route("/dealers", get(dealers))
        .route("/customers", get(customers))
        .route("/vehicles", post(create_vehicle))
        .route("/vehicles/customer/:id", get(vehicles))
        .route("/policy-types", get(policy_types))
        .route("/currencies", get(currencies))
        .route("/pricing/calculate", post(calculate))
        .route("/policies", post(create_policy))
        .route("/policies/:id", get(get_policy).put(update_policy))
        .route("/health", get(health))
        .with_state(backend);
    Router::new().nest("/api", api)
}

/// Serves `app` on an ephemeral port and returns its base URL
async fn serve(app: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{}/api", addr)
}

async fn start() -> (Backend, BrokerHttpAdapter) {
    let backend = Backend::default();
    let base_url = serve(brokerage_routes(backend.clone())).await;
    let adapter = BrokerHttpAdapter::new(HttpAdapterConfig::new(base_url).with_timeout_secs(5)).unwrap();
    (backend, adapter)
}

// ============================================================================
// LOOKUPS
// ============================================================================

mod lookups {
    use super::*;

    #[tokio::test]
    async fn test_dealers_decode() {
        let (_, adapter) = start().await;
        let dealers = adapter.list_dealers(None).await.unwrap();
        assert_eq!(dealers, vec![ReferenceFixtures::dealer(), ReferenceFixtures::other_dealer()]);
    }

    #[tokio::test]
    async fn test_customers_are_scoped_by_dealer_query() {
        let (backend, adapter) = start().await;

        let customers = adapter.list_customers(IdFixtures::dealer(), None).await.unwrap();
        assert_eq!(customers.len(), 2);

        let none = adapter.list_customers(IdFixtures::other_dealer(), None).await.unwrap();
        assert!(none.is_empty());
        assert_eq!(backend.last().path, "/customers");
    }

    #[tokio::test]
    async fn test_vehicles_use_customer_path() {
        let (backend, adapter) = start().await;
        let vehicles = adapter.list_vehicles(IdFixtures::customer(), None).await.unwrap();

        assert_eq!(vehicles, vec![ReferenceFixtures::vehicle()]);
        assert_eq!(
            backend.last().path,
            format!("/vehicles/customer/{}", IdFixtures::customer().as_uuid())
        );
    }

    #[tokio::test]
    async fn test_policy_types_and_currencies() {
        let (_, adapter) = start().await;
        let types = adapter.list_policy_types(None).await.unwrap();
        assert_eq!(types[0].code.as_str(), "Kasko");

        let currencies = adapter.list_currencies(None).await.unwrap();
        assert_eq!(currencies[1].code.as_str(), "EUR");
    }

    #[tokio::test]
    async fn test_create_vehicle_and_duplicate_plate() {
        let (backend, adapter) = start().await;

        let created = adapter
            .create_vehicle(NewVehicle::new(IdFixtures::customer(), "06 xyz 99", "Fiat", "Egea"), None)
            .await
            .unwrap();
        assert_eq!(created.plate_number, "06XYZ99");
        assert_eq!(backend.last().body.unwrap()["customerId"], json!(IdFixtures::customer()));

        let err = adapter
            .create_vehicle(NewVehicle::new(IdFixtures::customer(), "34ABC123", "Renault", "Clio"), None)
            .await
            .unwrap_err();
        assert!(matches!(err, PortError::Conflict { ref message } if message.contains("34ABC123")));
    }
}

// ============================================================================
// PRICING
// ============================================================================

mod pricing {
    use super::*;

    fn request(policy_type: &str) -> PriceCalculationRequest {
        PriceCalculationRequest {
            customer_id: IdFixtures::customer(),
            vehicle_id: IdFixtures::vehicle(),
            policy_type: policy_type.into(),
            currency: None,
            start_date: TemporalFixtures::policy_start(),
            end_date: TemporalFixtures::thirty_days_later(),
            duration_days: Some(30),
        }
    }

    #[tokio::test]
    async fn test_price_is_decoded_into_money() {
        let (backend, adapter) = start().await;
        let price = adapter.calculate_price(request("Kasko"), None).await.unwrap();

        assert_eq!(price.total.amount(), dec!(1180.00));
        assert_eq!(price.suggested_premium(), dec!(1180.00));
        assert_eq!(price.currency.id, Some(IdFixtures::currency_try()));
        assert_eq!(price.prices_in_other_currencies.len(), 1);

        let body = backend.last().body.unwrap();
        assert_eq!(body["startDate"], "2024-01-01");
        assert_eq!(body["durationDays"], 30);
    }

    #[tokio::test]
    async fn test_missing_price_list_is_not_found() {
        let (_, adapter) = start().await;
        let err = adapter.calculate_price(request("Trafik"), None).await.unwrap_err();
        assert!(err.is_not_found());
    }
}

// ============================================================================
// POLICIES
// ============================================================================

mod policies {
    use super::*;

    #[tokio::test]
    async fn test_get_policy_and_missing_policy() {
        let (_, adapter) = start().await;
        let record = adapter.get_policy(IdFixtures::policy(), None).await.unwrap();
        assert_eq!(record.policy_number.as_deref(), Some("POL-000042"));
        assert_eq!(record.premium, Some(dec!(1180)));

        let err = adapter.get_policy(core_kernel::PolicyId::new(), None).await.unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn test_update_sends_put_with_mutable_fields() {
        let (backend, adapter) = start().await;
        let request = UpdatePolicyRequest {
            policy_type: "Traffic".into(),
            start_date: TemporalFixtures::policy_start(),
            end_date: TemporalFixtures::thirty_days_later(),
        };

        let receipt = adapter.update_policy(IdFixtures::policy(), request, None).await.unwrap();
        assert_eq!(receipt.policy.policy_type.as_str(), "Traffic");
        assert!(receipt.warnings.is_empty());

        let seen = backend.last();
        assert_eq!(seen.method, "PUT");
        let body = seen.body.unwrap();
        assert!(body.get("dealerId").is_none());
        assert_eq!(body.as_object().unwrap().len(), 3);
    }
}

// ============================================================================
// END TO END
// ============================================================================

mod end_to_end {
    use super::*;

    async fn service() -> (
        Backend,
        PolicyFormService<BrokerHttpAdapter, BrokerHttpAdapter, BrokerHttpAdapter>,
    ) {
        let (backend, adapter) = start().await;
        let adapter = Arc::new(adapter);
        let service = PolicyFormService::new(adapter.clone(), adapter.clone(), adapter)
            .with_metadata(OperationMetadata::with_correlation_id("corr-42"));
        (backend, service)
    }

    #[tokio::test]
    async fn test_create_flow_over_http() {
        let (backend, service) = service().await;
        let mut form = PolicyFormBuilder::complete().build();
        service.sync(&mut form).await;

        assert_eq!(form.dealers().len(), 2);
        assert!(form.vehicle_select_enabled());
        assert_eq!(form.effective_premium(), Some(dec!(1180)));

        let outcome = service.submit(&mut form).await.unwrap();
        assert!(outcome.created);
        assert!(outcome.notices.is_empty());
        assert!(form.is_editing());

        let seen = backend.last();
        assert_eq!(seen.path, "/policies");
        assert_eq!(seen.headers[CORRELATION_ID_HEADER], "corr-42");
        let body = seen.body.unwrap();
        let premium: rust_decimal::Decimal = serde_json::from_value(body["premium"].clone()).unwrap();
        assert_eq!(premium, dec!(1180.00));
        assert_eq!(body["endDate"], "2024-01-31");
    }

    #[tokio::test]
    async fn test_missing_series_warning_is_a_notice() {
        let (_, service) = service().await;
        let mut form = PolicyFormBuilder::complete()
            .dealer(IdFixtures::other_dealer())
            .build();

        let outcome = service.submit(&mut form).await.unwrap();
        assert_has_notice(&outcome, IssueKind::NoActivePolicySeries);
    }

    #[tokio::test]
    async fn test_unknown_policy_type_is_blocking() {
        let (_, service) = service().await;
        let mut form = PolicyFormBuilder::complete().policy_type("Trafik").build();
        service.sync(&mut form).await;
        assert!(form.price_state().is_failed());

        let err = service.submit(&mut form).await.unwrap_err();
        assert!(matches!(err, SubmissionError::PolicyTypeNotFound(ref m) if m == "Policy type not found: Trafik"));
    }

    #[tokio::test]
    async fn test_policy_type_not_found_on_404_is_classified() {
        let app = Router::new().route(
            "/api/policies",
            post(|| async {
                error(
                    StatusCode::NOT_FOUND,
                    json!({ "message": "Policy type not found: Trafik" }),
                )
            }),
        );
        let adapter = Arc::new(BrokerHttpAdapter::new(HttpAdapterConfig::new(serve(app).await)).unwrap());
        let service = PolicyFormService::new(adapter.clone(), adapter.clone(), adapter);
        let mut form = PolicyFormBuilder::complete().policy_type("Trafik").build();

        let err = service.submit(&mut form).await.unwrap_err();
        assert!(matches!(err, SubmissionError::PolicyTypeNotFound(ref m) if m == "Policy type not found: Trafik"));
        assert!(!form.is_editing());
    }

    #[tokio::test]
    async fn test_plain_404_shows_backend_text() {
        let app = Router::new().route(
            "/api/policies",
            post(|| async { error(StatusCode::NOT_FOUND, json!({ "message": "Dealer is archived" })) }),
        );
        let adapter = Arc::new(BrokerHttpAdapter::new(HttpAdapterConfig::new(serve(app).await)).unwrap());
        let service = PolicyFormService::new(adapter.clone(), adapter.clone(), adapter);
        let mut form = PolicyFormBuilder::complete().build();

        let err = service.submit(&mut form).await.unwrap_err();
        assert!(matches!(err, SubmissionError::Server(ref m) if m == "Dealer is archived"));
    }
}

// ============================================================================
// TRANSPORT
// ============================================================================

mod transport {
    use super::*;

    #[tokio::test]
    async fn test_bearer_token_is_sent() {
        let backend = Backend::default();
        let base_url = serve(brokerage_routes(backend.clone())).await;
        let config = HttpAdapterConfig::new(base_url).with_auth(ExternalAuthConfig::BearerToken {
            token: "s3cret".to_string(),
        });
        let adapter = BrokerHttpAdapter::new(config).unwrap();

        adapter.list_dealers(None).await.unwrap();
        assert_eq!(backend.last().headers["authorization"], "Bearer s3cret");
    }

    #[tokio::test]
    async fn test_api_key_header_is_sent() {
        let backend = Backend::default();
        let base_url = serve(brokerage_routes(backend.clone())).await;
        let config = HttpAdapterConfig::new(base_url).with_auth(ExternalAuthConfig::ApiKey {
            header_name: "X-Api-Key".to_string(),
            key: "k-123".to_string(),
        });
        let adapter = BrokerHttpAdapter::new(config).unwrap();

        adapter.list_policy_types(None).await.unwrap();
        assert_eq!(backend.last().headers["x-api-key"], "k-123");
    }

    #[tokio::test]
    async fn test_health_check() {
        let (backend, adapter) = start().await;
        let result = adapter.health_check().await;
        assert_eq!(result.status, AdapterHealth::Healthy);
        assert_eq!(backend.last().path, "/health");
    }

    #[tokio::test]
    async fn test_rate_limit_reads_retry_after() {
        let app = Router::new().route(
            "/api/dealers",
            get(|| async {
                (
                    StatusCode::TOO_MANY_REQUESTS,
                    [("retry-after", "12")],
                    Json(json!({ "message": "slow down" })),
                )
            }),
        );
        let adapter = BrokerHttpAdapter::new(HttpAdapterConfig::new(serve(app).await)).unwrap();

        let err = adapter.list_dealers(None).await.unwrap_err();
        assert!(matches!(err, PortError::RateLimited { retry_after_secs: 12 }));
    }

    #[tokio::test]
    async fn test_undecodable_body_is_a_transformation_error() {
        let app = Router::new().route("/api/dealers", get(|| async { Json(json!({ "not": "a list" })) }));
        let adapter = BrokerHttpAdapter::new(HttpAdapterConfig::new(serve(app).await)).unwrap();

        let err = adapter.list_dealers(None).await.unwrap_err();
        assert!(matches!(err, PortError::Transformation { .. }));
    }

    #[tokio::test]
    async fn test_circuit_opens_after_repeated_server_errors() {
        let backend = Backend::default();
        let failing = Router::new()
            .route(
                "/api/dealers",
                get(|State(b): State<Backend>, headers: HeaderMap| async move {
                    b.record("GET", "/dealers".into(), headers, None);
                    (StatusCode::SERVICE_UNAVAILABLE, Json(json!({ "error": "maintenance" })))
                }),
            )
            .with_state(backend.clone());
        let config = HttpAdapterConfig::new(serve(failing).await).with_circuit_breaker(Some(
            CircuitBreakerConfig {
                failure_threshold: 2,
                reset_timeout_secs: 60,
                success_threshold: 1,
            },
        ));
        let adapter = BrokerHttpAdapter::new(config).unwrap();

        for _ in 0..2 {
            let err = adapter.list_dealers(None).await.unwrap_err();
            assert_eq!(err.server_message(), "maintenance");
        }
        assert!(adapter.is_circuit_open().await);

        let err = adapter.list_dealers(None).await.unwrap_err();
        assert!(matches!(err, PortError::ServiceUnavailable { ref service } if service.contains("Circuit breaker")));
        assert_eq!(backend.hits(), 2);

        let health = adapter.health_check().await;
        assert_eq!(health.status, AdapterHealth::Degraded);
    }

    #[tokio::test]
    async fn test_client_errors_do_not_trip_the_breaker() {
        let (_, adapter) = start().await;
        for _ in 0..6 {
            let _ = adapter.get_policy(core_kernel::PolicyId::new(), None).await;
        }
        assert!(!adapter.is_circuit_open().await);
    }
}
