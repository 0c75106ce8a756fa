//! Remote backend: the ledger reached over HTTP.
//!
//! Speaks the JSON dialect served by [`crate::api`]. Every operation is one or
//! more network calls; failures surface as [`LedgerError::Backend`] carrying
//! the server's message, and nothing is retried.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION};
use reqwest::{Client, RequestBuilder, Response, StatusCode, Url};
use serde::de::DeserializeOwned;
use tracing::{debug, info, warn};

use crate::api::ApiError;
use crate::config::{EmployeeDeletion, RemoteConfig};
use crate::error::{LedgerError, LedgerResult};
use crate::models::{Employee, Holiday, LeaveRequest};

use super::filter::{sort_employees, sort_holidays, sort_leave_requests};
use super::{
    HolidayFilter, LeaveFilter, LeaveRequestPatch, LedgerStore, NewEmployee, NewLeaveRequest,
};

/// Ledger served by a remote ledger service.
#[derive(Debug, Clone)]
pub struct RemoteLedger {
    client: Client,
    base_url: Url,
    deletion: EmployeeDeletion,
}

impl RemoteLedger {
    /// A client for the service at `base_url`, authenticating with `api_key`.
    ///
    /// `timeout` bounds each request.
    pub fn new(base_url: &str, api_key: &str, timeout: Duration) -> LedgerResult<Self> {
        let base_url = Url::parse(base_url.trim()).map_err(|e| LedgerError::ConfigParseError {
            path: "remote.base_url".to_string(),
            message: e.to_string(),
        })?;
        if base_url.cannot_be_a_base() {
            return Err(LedgerError::ConfigParseError {
                path: "remote.base_url".to_string(),
                message: format!("'{}' cannot be used as a base URL", base_url),
            });
        }

        let mut headers = HeaderMap::new();
        let key = HeaderValue::from_str(api_key.trim()).map_err(|e| LedgerError::ConfigParseError {
            path: "remote.api_key".to_string(),
            message: e.to_string(),
        })?;
        let bearer = HeaderValue::from_str(&format!("Bearer {}", api_key.trim())).map_err(|e| {
            LedgerError::ConfigParseError {
                path: "remote.api_key".to_string(),
                message: e.to_string(),
            }
        })?;
        headers.insert("apikey", key);
        headers.insert(AUTHORIZATION, bearer);

        let client = Client::builder()
            .default_headers(headers)
            .timeout(timeout)
            .build()
            .map_err(|e| LedgerError::backend(format!("failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url,
            deletion: EmployeeDeletion::default(),
        })
    }

    /// A client built from configuration.
    pub fn from_config(config: &RemoteConfig, deletion: EmployeeDeletion) -> LedgerResult<Self> {
        let base_url = config.base_url.as_deref().unwrap_or_default();
        let api_key = config.api_key.as_deref().unwrap_or_default();
        let ledger = Self::new(base_url, api_key, Duration::from_secs(config.timeout_secs))?;
        Ok(ledger.with_employee_deletion(deletion))
    }

    /// Sets the effect of deleting an employee on their leave requests.
    pub fn with_employee_deletion(mut self, deletion: EmployeeDeletion) -> Self {
        self.deletion = deletion;
        self
    }

    /// The service base URL.
    pub fn base_url(&self) -> &str {
        self.base_url.as_str()
    }

    fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    async fn send(&self, request: RequestBuilder) -> LedgerResult<Response> {
        request.send().await.map_err(|err| {
            warn!(error = %err, "remote ledger unreachable");
            LedgerError::backend(err.to_string())
        })
    }

    /// Sends `request`, treating 404 as absence.
    async fn send_by_id(&self, request: RequestBuilder) -> LedgerResult<Option<Response>> {
        let response = self.send(request).await?;
        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        Ok(Some(response))
    }

    async fn decode<T: DeserializeOwned>(response: Response) -> LedgerResult<T> {
        if !response.status().is_success() {
            return Err(failure(response).await);
        }
        response
            .json::<T>()
            .await
            .map_err(|err| LedgerError::backend(format!("unreadable response: {}", err)))
    }

    async fn expect_success(response: Response) -> LedgerResult<()> {
        if response.status().is_success() {
            Ok(())
        } else {
            Err(failure(response).await)
        }
    }
}

/// Converts a failed response into the matching error.
async fn failure(response: Response) -> LedgerError {
    let status = response.status();
    let text = response.text().await.unwrap_or_default();
    let body = serde_json::from_str::<ApiError>(&text).ok();

    let message = body
        .as_ref()
        .map(|error| error.message.clone())
        .or_else(|| Some(text.trim().to_string()).filter(|t| !t.is_empty()))
        .unwrap_or_else(|| format!("remote ledger request failed ({})", status));

    warn!(status = %status, message = %message, "remote ledger rejected request");

    match status {
        StatusCode::BAD_REQUEST | StatusCode::UNPROCESSABLE_ENTITY => LedgerError::Validation {
            field: body
                .and_then(|error| error.details)
                .unwrap_or_else(|| "request".to_string()),
            message,
        },
        _ => LedgerError::Backend { message },
    }
}

#[async_trait]
impl LedgerStore for RemoteLedger {
    async fn list_employees(&self) -> LedgerResult<Vec<Employee>> {
        let response = self.send(self.client.get(self.endpoint(&["employees"]))).await?;
        let mut employees: Vec<Employee> = Self::decode(response).await?;
        sort_employees(&mut employees);
        Ok(employees)
    }

    async fn get_employee(&self, id: &str) -> LedgerResult<Option<Employee>> {
        let request = self.client.get(self.endpoint(&["employees", id]));
        match self.send_by_id(request).await? {
            Some(response) => Self::decode(response).await.map(Some),
            None => Ok(None),
        }
    }

    async fn create_employee(&self, input: NewEmployee) -> LedgerResult<Employee> {
        let request = self.client.post(self.endpoint(&["employees"])).json(&input);
        let employee: Employee = Self::decode(self.send(request).await?).await?;
        info!(employee_id = %employee.id, "employee created remotely");
        Ok(employee)
    }

    async fn delete_employee(&self, id: &str) -> LedgerResult<bool> {
        let request = self.client.delete(self.endpoint(&["employees", id]));
        let Some(response) = self.send_by_id(request).await? else {
            return Ok(false);
        };
        Self::expect_success(response).await?;

        if self.deletion == EmployeeDeletion::Cascade {
            let orphans = self
                .list_leave_requests(&LeaveFilter::for_employee(id))
                .await?;
            for request in &orphans {
                self.delete_leave_request(&request.id).await?;
            }
            info!(employee_id = id, cascaded_requests = orphans.len(), "employee deleted remotely");
        }
        Ok(true)
    }

    async fn list_leave_requests(&self, filter: &LeaveFilter) -> LedgerResult<Vec<LeaveRequest>> {
        let request = self
            .client
            .get(self.endpoint(&["leave-requests"]))
            .query(filter);
        let mut requests: Vec<LeaveRequest> = Self::decode(self.send(request).await?).await?;
        sort_leave_requests(&mut requests);
        debug!(count = requests.len(), "leave requests fetched");
        Ok(requests)
    }

    async fn get_leave_request(&self, id: &str) -> LedgerResult<Option<LeaveRequest>> {
        let request = self.client.get(self.endpoint(&["leave-requests", id]));
        match self.send_by_id(request).await? {
            Some(response) => Self::decode(response).await.map(Some),
            None => Ok(None),
        }
    }

    async fn create_leave_request(&self, input: NewLeaveRequest) -> LedgerResult<LeaveRequest> {
        input.validate()?;
        let request = self
            .client
            .post(self.endpoint(&["leave-requests"]))
            .json(&input);
        Self::decode(self.send(request).await?).await
    }

    async fn update_leave_request(
        &self,
        id: &str,
        patch: LeaveRequestPatch,
    ) -> LedgerResult<Option<LeaveRequest>> {
        patch.validate()?;
        let request = self
            .client
            .patch(self.endpoint(&["leave-requests", id]))
            .json(&patch);
        match self.send_by_id(request).await? {
            Some(response) => Self::decode(response).await.map(Some),
            None => Ok(None),
        }
    }

    async fn delete_leave_request(&self, id: &str) -> LedgerResult<bool> {
        let request = self.client.delete(self.endpoint(&["leave-requests", id]));
        match self.send_by_id(request).await? {
            Some(response) => Self::expect_success(response).await.map(|_| true),
            None => Ok(false),
        }
    }

    async fn list_holidays(&self, filter: &HolidayFilter) -> LedgerResult<Vec<Holiday>> {
        let request = self.client.get(self.endpoint(&["holidays"])).query(filter);
        let mut holidays: Vec<Holiday> = Self::decode(self.send(request).await?).await?;
        sort_holidays(&mut holidays);
        Ok(holidays)
    }

    async fn reset(&self) -> LedgerResult<()> {
        let response = self.send(self.client.post(self.endpoint(&["reset"]))).await?;
        Self::expect_success(response).await
    }
}
