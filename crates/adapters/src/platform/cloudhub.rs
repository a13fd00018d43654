// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! CloudHub management API client

use super::{PlatformClient, PlatformError};
use async_trait::async_trait;
use chd_core::{ArtifactId, Connection, DeploymentStatus};
use reqwest::{Client, RequestBuilder, Response, StatusCode, Url};
use std::fmt::Display;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::num::NonZeroU32;
use std::path::Path;

/// Header selecting the target environment
const ENVIRONMENT_HEADER: &str = "X-ANYPNT-ENV-ID";

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct UploadResponse {
    artifact_id: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ConfigureRequest<'a> {
    artifact_id: &'a str,
    mule_version: &'a str,
    workers: u32,
    properties: &'a BTreeMap<String, String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct StatusChangeRequest<'a> {
    artifact_id: &'a str,
    status: &'static str,
}

#[derive(Debug, Deserialize)]
struct StatusResponse {
    status: String,
}

#[derive(Debug, Deserialize)]
struct ErrorResponse {
    message: String,
}

/// HTTP client for one application domain on a CloudHub-style platform
#[derive(Clone)]
pub struct CloudHubClient {
    client: Client,
    base_url: Url,
    domain: String,
    username: String,
    password: String,
    environment: Option<String>,
}

impl CloudHubClient {
    pub fn new(connection: &Connection) -> Result<Self, PlatformError> {
        let client = Client::builder()
            .timeout(connection.request_timeout)
            .build()
            .map_err(|e| PlatformError::Transport(e.to_string()))?;
        let base_url = Url::parse(&connection.url).map_err(|e| {
            PlatformError::Transport(format!(
                "invalid management API URL {}: {}",
                connection.url, e
            ))
        })?;
        if base_url.cannot_be_a_base() {
            return Err(PlatformError::Transport(format!(
                "invalid management API URL {}: not a base URL",
                connection.url
            )));
        }

        Ok(Self {
            client,
            base_url,
            domain: connection.domain.clone(),
            username: connection.username.clone(),
            password: connection.password.clone(),
            environment: connection.environment.clone(),
        })
    }

    /// `<base>/api/applications/<domain>/<tail..>`, each segment percent-encoded
    pub(crate) fn endpoint(&self, tail: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut segments) = url.path_segments_mut() {
            segments
                .pop_if_empty()
                .extend(["api", "applications", self.domain.as_str()])
                .extend(tail);
        }
        url
    }

    fn authorized(&self, request: RequestBuilder) -> RequestBuilder {
        let request = request.basic_auth(&self.username, Some(&self.password));
        match &self.environment {
            Some(env) => request.header(ENVIRONMENT_HEADER, env),
            None => request,
        }
    }

    async fn send(&self, request: RequestBuilder) -> Result<Response, PlatformError> {
        let response = self
            .authorized(request)
            .send()
            .await
            .map_err(|e| PlatformError::Transport(e.to_string()))?;
        check_status(response).await
    }
}

#[async_trait]
impl PlatformClient for CloudHubClient {
    async fn upload(&self, artifact: &Path) -> Result<ArtifactId, PlatformError> {
        let bytes = tokio::fs::read(artifact)
            .await
            .map_err(|source| PlatformError::Io {
                path: artifact.to_path_buf(),
                source,
            })?;

        let response = self
            .send(
                self.client
                    .post(self.endpoint(&["deploy"]))
                    .header(reqwest::header::CONTENT_TYPE, "application/octet-stream")
                    .body(bytes),
            )
            .await?;

        let body: UploadResponse = decode(response).await?;
        Ok(ArtifactId::new(body.artifact_id))
    }

    async fn configure(
        &self,
        artifact: &ArtifactId,
        runtime_version: &str,
        workers: NonZeroU32,
        properties: &BTreeMap<String, String>,
    ) -> Result<(), PlatformError> {
        let body = ConfigureRequest {
            artifact_id: artifact.as_str(),
            mule_version: runtime_version,
            workers: workers.get(),
            properties,
        };
        self.send(self.client.put(self.endpoint(&[])).json(&body))
            .await?;
        Ok(())
    }

    async fn start(&self, artifact: &ArtifactId) -> Result<(), PlatformError> {
        let body = StatusChangeRequest {
            artifact_id: artifact.as_str(),
            status: "START",
        };
        self.send(self.client.post(self.endpoint(&["status"])).json(&body))
            .await?;
        Ok(())
    }

    async fn status(&self, artifact: &ArtifactId) -> Result<DeploymentStatus, PlatformError> {
        let url = self.endpoint(&["deployments", artifact.as_str()]);
        let response = self.send(self.client.get(url)).await?;
        let body: StatusResponse = decode(response).await?;
        Ok(parse_status(&body.status))
    }
}

/// Map a platform status string onto the statuses the orchestrator knows
pub(crate) fn parse_status(status: &str) -> DeploymentStatus {
    match status.to_ascii_uppercase().as_str() {
        "STARTED" => DeploymentStatus::Started,
        "DEPLOYING" | "STARTING" | "UPDATING" => DeploymentStatus::Deploying,
        "FAILED" | "DEPLOY_FAILED" | "START_FAILED" => DeploymentStatus::Failed,
        _ => DeploymentStatus::Pending,
    }
}

async fn check_status(response: Response) -> Result<Response, PlatformError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let message = error_message(status, response.text().await);

    Err(match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => PlatformError::Authentication(message),
        StatusCode::BAD_REQUEST
        | StatusCode::NOT_FOUND
        | StatusCode::CONFLICT
        | StatusCode::UNPROCESSABLE_ENTITY => PlatformError::Rejected {
            status: status.as_u16(),
            message,
        },
        _ => PlatformError::Transport(format!("{}: {}", status, message)),
    })
}

/// Best message for a failed response: the JSON `message`, the raw body,
/// or the status line when the body is empty or unreadable
pub(crate) fn error_message<E: Display>(status: StatusCode, body: Result<String, E>) -> String {
    let body = match body {
        Ok(body) => body,
        Err(e) => {
            tracing::debug!(%status, error = %e, "failed to read error response body");
            return format!("{} (body unreadable: {})", status, e);
        }
    };
    match serde_json::from_str::<ErrorResponse>(&body) {
        Ok(error) => error.message,
        Err(_) if body.trim().is_empty() => status.to_string(),
        Err(_) => body,
    }
}

async fn decode<T: serde::de::DeserializeOwned>(response: Response) -> Result<T, PlatformError> {
    let body = response
        .text()
        .await
        .map_err(|e| PlatformError::Transport(e.to_string()))?;
    serde_json::from_str(&body).map_err(|e| PlatformError::Protocol(e.to_string()))
}

#[cfg(test)]
#[path = "cloudhub_tests.rs"]
mod tests;
