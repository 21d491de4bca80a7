use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Response};
use shared::{
    domain::AppointmentId,
    error::ApiError,
    protocol::{Appointment, AppointmentDraft, AppointmentPatch},
};
use tracing::{debug, info};

use crate::error::{RemoteError, RemoteOperation};

/// The remote appointment collection.
#[async_trait]
pub trait AppointmentTransport: Send + Sync {
    async fn list(&self) -> Result<Vec<Appointment>, RemoteError>;
    /// `Ok(None)` when the service accepted the record but its response body
    /// could not be read as an appointment.
    async fn create(&self, draft: &AppointmentDraft) -> Result<Option<Appointment>, RemoteError>;
    async fn update(&self, id: &AppointmentId, patch: &AppointmentPatch)
        -> Result<(), RemoteError>;
    async fn delete(&self, id: &AppointmentId) -> Result<(), RemoteError>;
}

pub struct MissingAppointmentTransport;

#[async_trait]
impl AppointmentTransport for MissingAppointmentTransport {
    async fn list(&self) -> Result<Vec<Appointment>, RemoteError> {
        Err(RemoteError::new(
            RemoteOperation::List,
            "appointment service is not configured",
        ))
    }

    async fn create(&self, _draft: &AppointmentDraft) -> Result<Option<Appointment>, RemoteError> {
        Err(RemoteError::new(
            RemoteOperation::Create,
            "appointment service is not configured",
        ))
    }

    async fn update(
        &self,
        _id: &AppointmentId,
        _patch: &AppointmentPatch,
    ) -> Result<(), RemoteError> {
        Err(RemoteError::new(
            RemoteOperation::Update,
            "appointment service is not configured",
        ))
    }

    async fn delete(&self, _id: &AppointmentId) -> Result<(), RemoteError> {
        Err(RemoteError::new(
            RemoteOperation::Delete,
            "appointment service is not configured",
        ))
    }
}

pub struct AppointmentsClient {
    http: Client,
    server_url: String,
}

impl AppointmentsClient {
    pub fn new(server_url: impl Into<String>) -> Self {
        Self::with_http(Client::new(), server_url)
    }

    pub fn with_timeout(
        server_url: impl Into<String>,
        timeout: Duration,
    ) -> reqwest::Result<Self> {
        let http = Client::builder().timeout(timeout).build()?;
        Ok(Self::with_http(http, server_url))
    }

    pub fn with_http(http: Client, server_url: impl Into<String>) -> Self {
        Self {
            http,
            server_url: server_url.into().trim_end_matches('/').to_string(),
        }
    }

    pub fn server_url(&self) -> &str {
        &self.server_url
    }

    fn appointment_url(&self, id: &AppointmentId) -> String {
        format!("{}/appointments/{}", self.server_url, id)
    }
}

async fn ensure_success(
    operation: RemoteOperation,
    res: Response,
) -> Result<Response, RemoteError> {
    let status = res.status();
    if status.is_success() {
        return Ok(res);
    }

    let body = res.text().await.unwrap_or_default();
    let reason = match ApiError::from_body(&body) {
        Some(api) => format!("server returned {status}: {}", api.message),
        None => format!("server returned {status}"),
    };
    Err(RemoteError::new(operation, reason))
}

#[async_trait]
impl AppointmentTransport for AppointmentsClient {
    async fn list(&self) -> Result<Vec<Appointment>, RemoteError> {
        let op = RemoteOperation::List;
        let res = self
            .http
            .get(format!("{}/appointments", self.server_url))
            .send()
            .await
            .map_err(|err| RemoteError::from_http(op, err))?;
        let res = ensure_success(op, res).await?;
        let appointments: Vec<Appointment> = res
            .json()
            .await
            .map_err(|err| RemoteError::from_http(op, err))?;
        debug!(count = appointments.len(), "fetched appointments");
        Ok(appointments)
    }

    async fn create(&self, draft: &AppointmentDraft) -> Result<Option<Appointment>, RemoteError> {
        let op = RemoteOperation::Create;
        let res = self
            .http
            .post(format!("{}/appointment", self.server_url))
            .json(draft)
            .send()
            .await
            .map_err(|err| RemoteError::from_http(op, err))?;
        let res = ensure_success(op, res).await?;
        let body = res
            .text()
            .await
            .map_err(|err| RemoteError::from_http(op, err))?;

        match serde_json::from_str::<Appointment>(&body) {
            Ok(created) => {
                info!(appointment_id = %created.id, "appointment created");
                Ok(Some(created))
            }
            Err(err) => {
                info!("appointment created; response body not usable as a record: {err}");
                Ok(None)
            }
        }
    }

    async fn update(
        &self,
        id: &AppointmentId,
        patch: &AppointmentPatch,
    ) -> Result<(), RemoteError> {
        let op = RemoteOperation::Update;
        let res = self
            .http
            .patch(self.appointment_url(id))
            .json(patch)
            .send()
            .await
            .map_err(|err| RemoteError::from_http(op, err))?;
        ensure_success(op, res).await?;
        info!(appointment_id = %id, "appointment updated");
        Ok(())
    }

    async fn delete(&self, id: &AppointmentId) -> Result<(), RemoteError> {
        let op = RemoteOperation::Delete;
        let res = self
            .http
            .delete(self.appointment_url(id))
            .send()
            .await
            .map_err(|err| RemoteError::from_http(op, err))?;
        ensure_success(op, res).await?;
        info!(appointment_id = %id, "appointment deleted");
        Ok(())
    }
}

#[cfg(test)]
#[path = "tests/transport_tests.rs"]
mod tests;
