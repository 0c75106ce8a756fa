//! HTTP request handlers for the ledger API.
//!
//! This module contains the handler functions for all API endpoints. Each
//! request is tagged with a correlation id that appears in every log line it
//! produces.

use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Path, Query, State,
    },
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::Serialize;
use tracing::{info, warn};
use uuid::Uuid;

use crate::calculation::compute_report;
use crate::error::LedgerError;
use crate::store::{LeaveFilter, LeaveRequestPatch, NewEmployee, NewLeaveRequest};

use super::request::{HolidayQuery, ReportQuery};
use super::response::{ApiError, ApiErrorResponse};
use super::state::AppState;

type ApiResult = Result<Response, ApiErrorResponse>;

/// Creates the API router with all endpoints.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/employees", get(list_employees).post(create_employee))
        .route("/employees/:id", get(get_employee).delete(delete_employee))
        .route(
            "/leave-requests",
            get(list_leave_requests).post(create_leave_request),
        )
        .route(
            "/leave-requests/:id",
            get(get_leave_request)
                .patch(update_leave_request)
                .delete(delete_leave_request),
        )
        .route("/holidays", get(list_holidays))
        .route("/reports/:employee_id", get(get_report))
        .route("/reset", post(reset))
        .with_state(state)
}

fn json<T: Serialize>(status: StatusCode, body: T) -> Response {
    (
        status,
        [(header::CONTENT_TYPE, "application/json")],
        Json(body),
    )
        .into_response()
}

/// Logs a failed operation and converts it into its HTTP answer.
fn failed(correlation_id: Uuid, error: LedgerError) -> ApiErrorResponse {
    warn!(correlation_id = %correlation_id, error = %error, "Request failed");
    error.into()
}

fn not_found(correlation_id: Uuid, entity: &str, id: &str) -> ApiErrorResponse {
    info!(correlation_id = %correlation_id, entity, id, "Record not found");
    ApiErrorResponse::new(StatusCode::NOT_FOUND, ApiError::not_found(entity, id))
}

/// Unwraps a JSON body, turning extractor rejections into error responses.
fn body<T>(
    correlation_id: Uuid,
    payload: Result<Json<T>, JsonRejection>,
) -> Result<T, ApiErrorResponse> {
    let rejection = match payload {
        Ok(Json(value)) => return Ok(value),
        Err(rejection) => rejection,
    };

    let error = match rejection {
        JsonRejection::JsonDataError(err) => {
            let body_text = err.body_text();
            warn!(correlation_id = %correlation_id, error = %body_text, "JSON data error");
            ApiError::malformed_json(body_text)
        }
        JsonRejection::JsonSyntaxError(err) => {
            warn!(correlation_id = %correlation_id, error = %err, "JSON syntax error");
            ApiError::malformed_json(format!("Invalid JSON syntax: {}", err))
        }
        JsonRejection::MissingJsonContentType(_) => {
            ApiError::malformed_json("Content-Type must be application/json")
        }
        _ => ApiError::malformed_json("Failed to parse request body"),
    };
    Err(ApiErrorResponse::new(StatusCode::BAD_REQUEST, error))
}

/// Unwraps a query string, answering malformed parameters with 400.
fn query<T>(
    correlation_id: Uuid,
    query: Result<Query<T>, QueryRejection>,
) -> Result<T, ApiErrorResponse> {
    query.map(|Query(value)| value).map_err(|rejection| {
        let message = rejection.body_text();
        warn!(correlation_id = %correlation_id, error = %message, "Invalid query string");
        ApiErrorResponse::new(
            StatusCode::BAD_REQUEST,
            ApiError::validation_error("query", message),
        )
    })
}

/// Handler for GET /employees.
async fn list_employees(State(state): State<AppState>) -> ApiResult {
    let correlation_id = Uuid::new_v4();
    let employees = state
        .ledger()
        .list_employees()
        .await
        .map_err(|e| failed(correlation_id, e))?;
    info!(correlation_id = %correlation_id, count = employees.len(), "Listed employees");
    Ok(json(StatusCode::OK, employees))
}

/// Handler for POST /employees.
async fn create_employee(
    State(state): State<AppState>,
    payload: Result<Json<NewEmployee>, JsonRejection>,
) -> ApiResult {
    let correlation_id = Uuid::new_v4();
    let input = body(correlation_id, payload)?;
    let employee = state
        .ledger()
        .create_employee(input)
        .await
        .map_err(|e| failed(correlation_id, e))?;
    info!(correlation_id = %correlation_id, employee_id = %employee.id, "Created employee");
    Ok(json(StatusCode::CREATED, employee))
}

/// Handler for GET /employees/:id.
async fn get_employee(State(state): State<AppState>, Path(id): Path<String>) -> ApiResult {
    let correlation_id = Uuid::new_v4();
    let employee = state
        .ledger()
        .require_employee(&id)
        .await
        .map_err(|e| failed(correlation_id, e))?;
    Ok(json(StatusCode::OK, employee))
}

/// Handler for DELETE /employees/:id.
async fn delete_employee(State(state): State<AppState>, Path(id): Path<String>) -> ApiResult {
    let correlation_id = Uuid::new_v4();
    let deleted = state
        .ledger()
        .delete_employee(&id)
        .await
        .map_err(|e| failed(correlation_id, e))?;
    if !deleted {
        return Err(not_found(correlation_id, "Employee", &id));
    }
    info!(correlation_id = %correlation_id, employee_id = %id, "Deleted employee");
    Ok(StatusCode::NO_CONTENT.into_response())
}

/// Handler for GET /leave-requests.
async fn list_leave_requests(
    State(state): State<AppState>,
    filter: Result<Query<LeaveFilter>, QueryRejection>,
) -> ApiResult {
    let correlation_id = Uuid::new_v4();
    let filter = query(correlation_id, filter)?;
    let requests = state
        .ledger()
        .list_leave_requests(&filter)
        .await
        .map_err(|e| failed(correlation_id, e))?;
    info!(
        correlation_id = %correlation_id,
        count = requests.len(),
        "Listed leave requests"
    );
    Ok(json(StatusCode::OK, requests))
}

/// Handler for POST /leave-requests.
async fn create_leave_request(
    State(state): State<AppState>,
    payload: Result<Json<NewLeaveRequest>, JsonRejection>,
) -> ApiResult {
    let correlation_id = Uuid::new_v4();
    let input = body(correlation_id, payload)?;
    let request = state
        .ledger()
        .create_leave_request(input)
        .await
        .map_err(|e| failed(correlation_id, e))?;
    info!(
        correlation_id = %correlation_id,
        request_id = %request.id,
        employee_id = %request.employee_id,
        days = request.days(),
        "Created leave request"
    );
    Ok(json(StatusCode::CREATED, request))
}

/// Handler for GET /leave-requests/:id.
async fn get_leave_request(State(state): State<AppState>, Path(id): Path<String>) -> ApiResult {
    let correlation_id = Uuid::new_v4();
    match state
        .ledger()
        .get_leave_request(&id)
        .await
        .map_err(|e| failed(correlation_id, e))?
    {
        Some(request) => Ok(json(StatusCode::OK, request)),
        None => Err(not_found(correlation_id, "Leave request", &id)),
    }
}

/// Handler for PATCH /leave-requests/:id.
async fn update_leave_request(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<LeaveRequestPatch>, JsonRejection>,
) -> ApiResult {
    let correlation_id = Uuid::new_v4();
    let patch = body(correlation_id, payload)?;
    match state
        .ledger()
        .update_leave_request(&id, patch)
        .await
        .map_err(|e| failed(correlation_id, e))?
    {
        Some(request) => {
            info!(correlation_id = %correlation_id, request_id = %id, "Updated leave request");
            Ok(json(StatusCode::OK, request))
        }
        None => Err(not_found(correlation_id, "Leave request", &id)),
    }
}

/// Handler for DELETE /leave-requests/:id.
async fn delete_leave_request(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult {
    let correlation_id = Uuid::new_v4();
    let deleted = state
        .ledger()
        .delete_leave_request(&id)
        .await
        .map_err(|e| failed(correlation_id, e))?;
    if !deleted {
        return Err(not_found(correlation_id, "Leave request", &id));
    }
    info!(correlation_id = %correlation_id, request_id = %id, "Deleted leave request");
    Ok(StatusCode::NO_CONTENT.into_response())
}

/// Handler for GET /holidays.
async fn list_holidays(
    State(state): State<AppState>,
    params: Result<Query<HolidayQuery>, QueryRejection>,
) -> ApiResult {
    let correlation_id = Uuid::new_v4();
    let filter = query(correlation_id, params)?.into_filter();
    let holidays = state
        .ledger()
        .list_holidays(&filter)
        .await
        .map_err(|e| failed(correlation_id, e))?;
    Ok(json(StatusCode::OK, holidays))
}

/// Handler for GET /reports/:employee_id.
async fn get_report(
    State(state): State<AppState>,
    Path(employee_id): Path<String>,
    params: Result<Query<ReportQuery>, QueryRejection>,
) -> ApiResult {
    let correlation_id = Uuid::new_v4();
    let year = query(correlation_id, params)?.year_or_current();
    let report = compute_report(state.ledger(), &employee_id, year)
        .await
        .map_err(|e| failed(correlation_id, e))?;
    match report {
        Some(report) => {
            info!(
                correlation_id = %correlation_id,
                employee_id = %employee_id,
                year,
                days_taken = report.days_taken,
                remaining = %report.remaining,
                "Report computed"
            );
            Ok(json(StatusCode::OK, report))
        }
        None => Err(not_found(correlation_id, "Employee", &employee_id)),
    }
}

/// Handler for POST /reset.
async fn reset(State(state): State<AppState>) -> ApiResult {
    let correlation_id = Uuid::new_v4();
    state
        .ledger()
        .reset()
        .await
        .map_err(|e| failed(correlation_id, e))?;
    info!(correlation_id = %correlation_id, "Ledger reset to seed data");
    Ok(StatusCode::NO_CONTENT.into_response())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Employee, Holiday, LeaveRequest, Report};
    use crate::store::{LocalSnapshotLedger, MemoryStorage};
    use axum::{body::Body, http::Request};
    use chrono::{Datelike, Utc};
    use serde::de::DeserializeOwned;
    use serde_json::{json as json_value, Value};
    use std::sync::Arc;
    use tower::ServiceExt;

    fn create_test_router() -> Router {
        let ledger = LocalSnapshotLedger::open(Arc::new(MemoryStorage::new()));
        create_router(AppState::new(Arc::new(ledger)))
    }

    async fn send(router: Router, method: &str, uri: &str, body: Option<Value>) -> Response {
        let mut builder = Request::builder().method(method).uri(uri);
        let body = match body {
            Some(value) => {
                builder = builder.header("Content-Type", "application/json");
                Body::from(value.to_string())
            }
            None => Body::empty(),
        };
        router.oneshot(builder.body(body).unwrap()).await.unwrap()
    }

    async fn read<T: DeserializeOwned>(response: Response) -> T {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_list_employees_returns_seed() {
        let response = send(create_test_router(), "GET", "/employees", None).await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers().get("content-type").unwrap(),
            "application/json"
        );
        let employees: Vec<Employee> = read(response).await;
        let names: Vec<_> = employees.iter().map(|e| e.first_name.as_str()).collect();
        assert_eq!(names, vec!["Ava", "Mia", "Noah"]);
    }

    #[tokio::test]
    async fn test_create_leave_request_missing_employee_returns_400() {
        let response = send(
            create_test_router(),
            "POST",
            "/leave-requests",
            Some(json_value!({"start_date": "2024-06-10"})),
        )
        .await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let error: ApiError = read(response).await;
        assert_eq!(error.code, "VALIDATION_ERROR");
        assert_eq!(error.details.as_deref(), Some("employee_id"));
    }

    #[tokio::test]
    async fn test_malformed_json_returns_400() {
        let router = create_test_router();
        let response = router
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/employees")
                    .header("Content-Type", "application/json")
                    .body(Body::from("{invalid json"))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let error: ApiError = read(response).await;
        assert_eq!(error.code, "MALFORMED_JSON");
    }

    #[tokio::test]
    async fn test_wrongly_typed_field_is_malformed_json() {
        let body = json_value!({"employee_id": "emp-ava", "start_date": "next tuesday"});
        let response = send(create_test_router(), "POST", "/leave-requests", Some(body)).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let error: ApiError = read(response).await;
        assert_eq!(error.code, "MALFORMED_JSON");
        assert!(error.message.contains("start_date"));
    }

    #[tokio::test]
    async fn test_unknown_leave_request_returns_404() {
        let router = create_test_router();
        let response = send(router.clone(), "GET", "/leave-requests/nope", None).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let response = send(
            router.clone(),
            "PATCH",
            "/leave-requests/nope",
            Some(json_value!({"notes": "x"})),
        )
        .await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let response = send(router, "DELETE", "/leave-requests/nope", None).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let error: ApiError = read(response).await;
        assert_eq!(error.code, "NOT_FOUND");
    }

    #[tokio::test]
    async fn test_invalid_query_parameter_returns_400() {
        let response = send(
            create_test_router(),
            "GET",
            "/leave-requests?status=MAYBE",
            None,
        )
        .await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let error: ApiError = read(response).await;
        assert_eq!(error.code, "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn test_blank_query_parameters_are_ignored() {
        let response = send(
            create_test_router(),
            "GET",
            "/leave-requests?employeeId=&type=&status=&from=&to=",
            None,
        )
        .await;
        assert_eq!(response.status(), StatusCode::OK);
        let requests: Vec<LeaveRequest> = read(response).await;
        assert_eq!(requests.len(), 3);

        let response = send(create_test_router(), "GET", "/holidays?region=&year=", None).await;
        assert_eq!(response.status(), StatusCode::OK);
        let holidays: Vec<Holiday> = read(response).await;
        assert_eq!(holidays.len(), 4);

        let response = send(create_test_router(), "GET", "/reports/emp-ava?year=", None).await;
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_holidays_filter_by_region_and_year() {
        let year = Utc::now().year();
        let uri = format!("/holidays?region=US&year={}", year);
        let response = send(create_test_router(), "GET", &uri, None).await;
        assert_eq!(response.status(), StatusCode::OK);
        let holidays: Vec<Holiday> = read(response).await;
        assert_eq!(holidays.len(), 4);
        assert!(holidays.iter().all(|h| h.region == "US"));

        let response = send(create_test_router(), "GET", "/holidays?region=FR", None).await;
        let holidays: Vec<Holiday> = read(response).await;
        assert!(holidays.is_empty());
    }

    #[tokio::test]
    async fn test_report_defaults_to_current_year() {
        let response = send(create_test_router(), "GET", "/reports/emp-ava", None).await;
        assert_eq!(response.status(), StatusCode::OK);
        let report: Report = read(response).await;
        assert_eq!(report.year, Utc::now().year());
        assert_eq!(report.days_taken, 5);
    }

    #[tokio::test]
    async fn test_report_for_unknown_employee_returns_404() {
        let response = send(create_test_router(), "GET", "/reports/emp-nobody", None).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_delete_then_reset_restores_seed() {
        let router = create_test_router();
        let response = send(router.clone(), "DELETE", "/leave-requests/vac-ava-summer", None).await;
        assert_eq!(response.status(), StatusCode::NO_CONTENT);

        let response = send(router.clone(), "POST", "/reset", None).await;
        assert_eq!(response.status(), StatusCode::NO_CONTENT);

        let response = send(router, "GET", "/leave-requests?employeeId=emp-ava", None).await;
        let requests: Vec<LeaveRequest> = read(response).await;
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].id, "vac-ava-summer");
    }
}
