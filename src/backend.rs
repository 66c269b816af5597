use crate::errors::FormError;
use crate::models::{AttendancePayload, AttendanceReceipt, CompanyList, Employee, error_detail};
use reqwest::Client;
use serde_json::Value;
use std::future::Future;
use std::time::Duration;
use tracing::{debug, warn};

/// The configuration and attendance endpoints the form talks to.
pub trait AttendanceApi {
    fn employees(&self) -> impl Future<Output = Result<Vec<Employee>, FormError>> + Send;

    fn companies(&self) -> impl Future<Output = Result<Vec<String>, FormError>> + Send;

    fn submit(
        &self,
        payload: &AttendancePayload,
    ) -> impl Future<Output = Result<AttendanceReceipt, FormError>> + Send;
}

#[derive(Debug, Clone)]
pub struct HttpBackend {
    client: Client,
    base_url: String,
}

impl HttpBackend {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, FormError> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self::with_client(client, base_url))
    }

    pub fn with_client(client: Client, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { client, base_url }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }
}

impl AttendanceApi for HttpBackend {
    async fn employees(&self) -> Result<Vec<Employee>, FormError> {
        let response = self.client.get(self.url("/config/employees")).send().await?;
        let response = ensure_success(response).await?;
        Ok(response.json().await?)
    }

    async fn companies(&self) -> Result<Vec<String>, FormError> {
        let response = self.client.get(self.url("/config/companies")).send().await?;
        let response = ensure_success(response).await?;
        let list: CompanyList = response.json().await?;
        Ok(list.companies)
    }

    async fn submit(&self, payload: &AttendancePayload) -> Result<AttendanceReceipt, FormError> {
        debug!(action = %payload.action, "posting attendance");
        let response = self
            .client
            .post(self.url("/attendance"))
            .json(payload)
            .send()
            .await?;
        let response = ensure_success(response).await?;
        let body = response.text().await?;
        if body.trim().is_empty() {
            return Ok(AttendanceReceipt::default());
        }
        serde_json::from_str(&body).map_err(|err| FormError::Decode(err.to_string()))
    }
}

/// Turns a non-success status into [`FormError::Rejected`] carrying the server's detail.
async fn ensure_success(response: reqwest::Response) -> Result<reqwest::Response, FormError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await?;
    let detail = match serde_json::from_str::<Value>(&body) {
        Ok(value) => error_detail(&value),
        Err(_) if body.trim().is_empty() => status.to_string(),
        Err(_) => body,
    };
    warn!(status = status.as_u16(), %detail, "backend rejected request");
    Err(FormError::Rejected {
        status: status.as_u16(),
        detail,
    })
}
