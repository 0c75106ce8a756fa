//! Integration tests for the leave ledger HTTP API and local snapshot backend.
//!
//! This test suite covers:
//! - Employee creation with default resolution and lenient day counts
//! - Leave request round-trips and date normalization
//! - Overlap filtering
//! - Annual usage reports
//! - Snapshot persistence and recovery on disk
//! - Error cases

use std::sync::Arc;

use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use tempfile::TempDir;
use tower::ServiceExt;

use leave_ledger::api::{create_router, AppState};
use leave_ledger::config::{ConfigLoader, EmployeeDeletion};
use leave_ledger::store::{
    open_ledger, FileStorage, LeaveFilter, LedgerStore, LocalSnapshotLedger, MemoryStorage,
    NewLeaveRequest,
};

// =============================================================================
// Test Helpers
// =============================================================================

fn create_test_ledger() -> Arc<dyn LedgerStore> {
    Arc::new(
        LocalSnapshotLedger::builder(Arc::new(MemoryStorage::new()))
            .seed_year(2024)
            .open(),
    )
}

fn create_router_for_test() -> Router {
    create_router(AppState::new(create_test_ledger()))
}

async fn call(
    router: &Router,
    method: &str,
    uri: &str,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    let body = match body {
        Some(value) => {
            builder = builder.header("Content-Type", "application/json");
            Body::from(value.to_string())
        }
        None => Body::empty(),
    };

    let response = router
        .clone()
        .oneshot(builder.body(body).unwrap())
        .await
        .unwrap();

    let status = response.status();
    let body_bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json = if body_bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&body_bytes).unwrap()
    };

    (status, json)
}

async fn create_employee(router: &Router, body: Value) -> Value {
    let (status, employee) = call(router, "POST", "/employees", Some(body)).await;
    assert_eq!(status, StatusCode::CREATED, "unexpected body: {}", employee);
    employee
}

async fn create_leave(router: &Router, body: Value) -> Value {
    let (status, request) = call(router, "POST", "/leave-requests", Some(body)).await;
    assert_eq!(status, StatusCode::CREATED, "unexpected body: {}", request);
    request
}

// =============================================================================
// Employees
// =============================================================================

#[tokio::test]
async fn test_create_employee_fills_defaults() {
    let router = create_router_for_test();
    let employee = create_employee(&router, json!({"first_name": "Zoe"})).await;

    assert_eq!(employee["first_name"], "Zoe");
    assert_eq!(employee["last_name"], "Employee");
    assert_eq!(employee["team"], "General");
    assert_eq!(employee["role"], "employee");
    assert_eq!(employee["allowance_days"], 20.0);
    assert_eq!(employee["carryover_days"], 0.0);
    assert_eq!(employee["timezone"], "Europe/Paris");
    assert_eq!(employee["active"], true);
    assert!(employee["email"]
        .as_str()
        .unwrap()
        .ends_with("@example.com"));

    let id = employee["id"].as_str().unwrap();
    let (status, fetched) = call(&router, "GET", &format!("/employees/{}", id), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched, employee);
}

#[tokio::test]
async fn test_non_numeric_allowance_coerces_to_default() {
    let router = create_router_for_test();
    let employee = create_employee(
        &router,
        json!({"first_name": "Lee", "allowance_days": "abc", "carryover_days": "1.5"}),
    )
    .await;

    assert_eq!(employee["allowance_days"], 20.0);
    assert_eq!(employee["carryover_days"], 1.5);
}

#[tokio::test]
async fn test_unknown_employee_returns_404() {
    let router = create_router_for_test();
    let (status, error) = call(&router, "GET", "/employees/emp-nobody", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(error["code"], "NOT_FOUND");

    let (status, _) = call(&router, "DELETE", "/employees/emp-nobody", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_delete_employee_keeps_requests_by_default() {
    let router = create_router_for_test();
    let (status, _) = call(&router, "DELETE", "/employees/emp-ava", None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (_, requests) = call(&router, "GET", "/leave-requests?employeeId=emp-ava", None).await;
    assert_eq!(requests.as_array().unwrap().len(), 1);

    let (status, _) = call(&router, "GET", "/reports/emp-ava?year=2024", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_delete_employee_cascades_when_configured() {
    let config = ConfigLoader::from_yaml(
        "snapshot:\n  directory: null\nemployee_deletion: cascade\n",
    )
    .unwrap()
    .into_config();
    assert_eq!(config.employee_deletion, EmployeeDeletion::Cascade);

    let ledger = open_ledger(&config).unwrap();
    assert!(ledger.delete_employee("emp-noah").await.unwrap());

    let orphans = ledger
        .list_leave_requests(&LeaveFilter::for_employee("emp-noah"))
        .await
        .unwrap();
    assert!(orphans.is_empty());
}

// =============================================================================
// Leave requests
// =============================================================================

#[tokio::test]
async fn test_create_then_read_back_round_trip() {
    let router = create_router_for_test();
    let created = create_leave(
        &router,
        json!({"employee_id": "emp-noah", "start_date": "2024-03-04"}),
    )
    .await;

    let id = created["id"].as_str().unwrap();
    let (status, fetched) = call(&router, "GET", &format!("/leave-requests/{}", id), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched, created);
    assert_eq!(fetched["start_date"], "2024-03-04");
    assert_eq!(fetched["end_date"], "2024-03-04");
    assert_eq!(fetched["type"], "ANNUAL");
    assert_eq!(fetched["status"], "APPROVED");
    assert_eq!(fetched["notes"], "");
}

#[tokio::test]
async fn test_reversed_dates_are_normalized() {
    let router = create_router_for_test();
    let created = create_leave(
        &router,
        json!({
            "employee_id": "emp-ava",
            "start_date": "2024-06-14",
            "end_date": "2024-06-10"
        }),
    )
    .await;

    assert_eq!(created["start_date"], "2024-06-10");
    assert_eq!(created["end_date"], "2024-06-14");
}

#[tokio::test]
async fn test_patch_renormalizes_dates() {
    let router = create_router_for_test();
    let (status, updated) = call(
        &router,
        "PATCH",
        "/leave-requests/vac-ava-summer",
        Some(json!({"start_date": "2024-06-20", "status": "CANCELLED"})),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["start_date"], "2024-06-14");
    assert_eq!(updated["end_date"], "2024-06-20");
    assert_eq!(updated["status"], "CANCELLED");
    assert_eq!(updated["notes"], "Summer holiday");
}

#[tokio::test]
async fn test_missing_employee_id_returns_400() {
    let router = create_router_for_test();
    let (status, error) = call(
        &router,
        "POST",
        "/leave-requests",
        Some(json!({"employee_id": "   ", "start_date": "2024-06-10"})),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(error["code"], "VALIDATION_ERROR");
    assert_eq!(error["details"], "employee_id");

    let (_, requests) = call(&router, "GET", "/leave-requests", None).await;
    assert_eq!(requests.as_array().unwrap().len(), 3);
}

#[tokio::test]
async fn test_delete_nonexistent_request_is_not_found() {
    let ledger = create_test_ledger();
    assert!(!ledger.delete_leave_request("vac-missing").await.unwrap());
    assert_eq!(
        ledger
            .list_leave_requests(&LeaveFilter::default())
            .await
            .unwrap()
            .len(),
        3
    );
}

#[tokio::test]
async fn test_overlap_filter_over_http() {
    let router = create_router_for_test();

    let (status, requests) = call(
        &router,
        "GET",
        "/leave-requests?from=2024-06-14&to=2024-07-02",
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let ids: Vec<_> = requests
        .as_array()
        .unwrap()
        .iter()
        .map(|r| r["id"].as_str().unwrap().to_string())
        .collect();
    assert_eq!(ids, vec!["vac-ava-summer", "vac-noah-sick"]);

    let (_, requests) = call(
        &router,
        "GET",
        "/leave-requests?from=2024-06-15&to=2024-07-01",
        None,
    )
    .await;
    assert!(requests.as_array().unwrap().is_empty());

    let (_, requests) = call(&router, "GET", "/leave-requests?type=SICK", None).await;
    assert_eq!(requests.as_array().unwrap().len(), 1);
    assert_eq!(requests[0]["employee_id"], "emp-noah");
}

// =============================================================================
// Reports
// =============================================================================

#[tokio::test]
async fn test_report_scenario_allowance_with_carryover() {
    let router = create_router_for_test();
    let employee = create_employee(
        &router,
        json!({
            "first_name": "Ava",
            "last_name": "Reyes",
            "allowance_days": 22,
            "carryover_days": 2
        }),
    )
    .await;
    let id = employee["id"].as_str().unwrap();

    create_leave(
        &router,
        json!({
            "employee_id": id,
            "start_date": "2024-06-10",
            "end_date": "2024-06-14",
            "type": "ANNUAL"
        }),
    )
    .await;

    let (status, report) = call(&router, "GET", &format!("/reports/{}?year=2024", id), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(report["year"], 2024);
    assert_eq!(report["daysTaken"], 5);
    assert_eq!(report["remaining"], 19.0);
    assert_eq!(report["byType"], json!({"ANNUAL": 5}));
    assert_eq!(report["employee"]["name"], "Ava Reyes");
    assert_eq!(report["employee"]["allowance"], 24.0);
    assert_eq!(report["employee"]["carryover"], 2.0);
    assert_eq!(report["vacations"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_report_attributes_cross_year_request_to_start_year() {
    let router = create_router_for_test();
    create_leave(
        &router,
        json!({
            "employee_id": "emp-noah",
            "start_date": "2024-12-30",
            "end_date": "2025-01-02"
        }),
    )
    .await;

    let (_, report) = call(&router, "GET", "/reports/emp-noah?year=2024", None).await;
    // 2 seeded sick days plus the 4-day span.
    assert_eq!(report["daysTaken"], 6);
    assert_eq!(report["byType"]["ANNUAL"], 4);
    assert_eq!(report["byType"]["SICK"], 2);

    let (_, report) = call(&router, "GET", "/reports/emp-noah?year=2025", None).await;
    assert_eq!(report["daysTaken"], 0);
    assert_eq!(report["remaining"], 20.0);
}

#[tokio::test]
async fn test_report_ignores_pending_requests() {
    let router = create_router_for_test();
    create_leave(
        &router,
        json!({
            "employee_id": "emp-mia",
            "start_date": "2024-03-01",
            "end_date": "2024-03-05",
            "status": "PENDING"
        }),
    )
    .await;

    let (_, report) = call(&router, "GET", "/reports/emp-mia?year=2024", None).await;
    assert_eq!(report["daysTaken"], 10);
    assert_eq!(report["remaining"], 18.0);
}

// =============================================================================
// Snapshot persistence
// =============================================================================

#[tokio::test]
async fn test_file_snapshot_survives_reopen() {
    let dir = TempDir::new().unwrap();

    let created = {
        let ledger = LocalSnapshotLedger::open(Arc::new(FileStorage::new(dir.path())));
        ledger
            .create_leave_request(NewLeaveRequest::new(
                "emp-mia",
                chrono::NaiveDate::from_ymd_opt(2024, 4, 1).unwrap(),
                None,
            ))
            .await
            .unwrap()
    };

    let reopened = LocalSnapshotLedger::open(Arc::new(FileStorage::new(dir.path())));
    let fetched = reopened.get_leave_request(&created.id).await.unwrap();
    assert_eq!(fetched, Some(created));
    assert!(dir.path().join("vacation-tracker-data.json").exists());
}

#[tokio::test]
async fn test_empty_stored_employees_fall_back_to_seed() {
    let dir = TempDir::new().unwrap();
    std::fs::write(
        dir.path().join("vacation-tracker-data.json"),
        r#"{"employees": [], "holidays": [], "vacations": []}"#,
    )
    .unwrap();

    let ledger = LocalSnapshotLedger::open(Arc::new(FileStorage::new(dir.path())));
    let employees = ledger.list_employees().await.unwrap();
    assert_eq!(employees.len(), 3);
    assert!(ledger
        .list_leave_requests(&LeaveFilter::default())
        .await
        .unwrap()
        .is_empty());
}

#[tokio::test]
async fn test_reset_restores_seed_dataset() {
    let router = create_router_for_test();
    call(&router, "DELETE", "/leave-requests/vac-mia-winter", None).await;
    create_employee(&router, json!({"first_name": "Temp"})).await;

    let (status, _) = call(&router, "POST", "/reset", None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (_, employees) = call(&router, "GET", "/employees", None).await;
    assert_eq!(employees.as_array().unwrap().len(), 3);
    let (status, _) = call(&router, "GET", "/leave-requests/vac-mia-winter", None).await;
    assert_eq!(status, StatusCode::OK);
}
