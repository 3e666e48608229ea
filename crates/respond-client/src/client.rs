//! RESPOND API Client
//!
//! This module provides an HTTP client for the RESPOND incident API. It covers
//! every operation the operator dashboard performs:
//!
//! - **Incidents**: ingest reports, search, update status
//! - **Recommendations**: suggested response actions for a query
//! - **Media** (`media` feature): image upload, audio reinforcement, image search
//! - **Deployments** (`deployments` feature): create, update and fetch deployments
//!
//! # Connection Behavior
//!
//! | Operation | Default Timeout | Notes |
//! |-----------|-----------------|-------|
//! | JSON requests | 30 seconds | `RESPOND_REQUEST_TIMEOUT_SECS` |
//! | Uploads | 2 minutes | Transcription and embedding run server-side |
//!
//! The client is `Clone` and shares one `reqwest` connection pool between
//! clones. It does **not** retry; use [`RespondError::is_retryable`] to decide.
//!
//! # Example
//!
//! ```rust,ignore
//! use respond_client::{RespondClient, SearchRequest};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = RespondClient::from_env()?;
//!     let response = client.search_incidents(&SearchRequest::new("flooding", 10)).await?;
//!     println!("{} results", response.count);
//!     Ok(())
//! }
//! ```
//!
//! # Error Handling
//!
//! | Status | Error Type |
//! |--------|------------|
//! | 404 | `NotFound` |
//! | other non-2xx | `Api { status, detail }` |
//! | timeout | `Timeout` |
//! | refused / DNS | `ConnectionError` |

use crate::config::{ClientConfig, ClientConfigBuilder};
use crate::error::{ErrorBody, RespondError, RespondResult};
use crate::types::{
    HealthResponse, IngestIncidentRequest, IngestResponse, RecommendRequest, RecommendResponse,
    SearchRequest, StatusUpdateRequest, StatusUpdateResponse,
};
use reqwest::{Client, RequestBuilder, StatusCode};
use respond_core::{IncidentStatus, SearchResponse};
use serde::de::DeserializeOwned;
use std::sync::Arc;
use tracing::{debug, info};
use url::Url;

#[cfg(feature = "media")]
use crate::types::{
    AudioReinforcementResponse, ImageSearchRequest, ImageSearchResponse, ImageType,
    ImageUploadResponse,
};
#[cfg(feature = "media")]
use std::path::Path;

#[cfg(feature = "deployments")]
use crate::types::{
    CreateDeploymentRequest, CreateDeploymentResponse, Deployment, DeploymentStatus,
    UpdateDeploymentStatusRequest, UpdateDeploymentStatusResponse,
};

/// Client for the RESPOND incident API
#[derive(Clone)]
pub struct RespondClient {
    config: Arc<ClientConfig>,
    http: Client,
}

impl std::fmt::Debug for RespondClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RespondClient")
            .field("api_base", &self.config.api_base.as_str())
            .finish()
    }
}

impl RespondClient {
    /// Create a client from a validated configuration
    pub fn new(config: ClientConfig) -> RespondResult<Self> {
        let http = Client::builder()
            .timeout(config.request_timeout)
            .user_agent(format!("respond-client/{}", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| {
                RespondError::connection_error(format!("Failed to create HTTP client: {}", e))
            })?;

        Ok(Self::with_http_client(config, http))
    }

    /// Create a client configured from `RESPOND_*` environment variables
    pub fn from_env() -> RespondResult<Self> {
        let config = ClientConfigBuilder::from_env()?.build()?;
        Self::new(config)
    }

    /// Create a client for an explicit base URL with default settings
    pub fn for_base_url(api_base: impl Into<String>) -> RespondResult<Self> {
        let config = ClientConfigBuilder::new().api_base(api_base).build()?;
        Self::new(config)
    }

    /// Create a client with a custom HTTP client
    pub fn with_http_client(config: ClientConfig, http: Client) -> Self {
        Self {
            config: Arc::new(config),
            http,
        }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn base_url(&self) -> &Url {
        &self.config.api_base
    }

    /// Build an endpoint URL below the API base.
    ///
    /// Segments are appended to any path the base already has and are
    /// percent-encoded, so ids cannot escape their path position.
    fn endpoint(&self, segments: &[&str]) -> RespondResult<Url> {
        let mut url = self.config.api_base.clone();
        url.path_segments_mut()
            .map_err(|_| {
                RespondError::protocol_error(format!(
                    "API base cannot take a path: {}",
                    self.config.api_base
                ))
            })?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    /// Send a request and decode a JSON body, mapping failures
    async fn send_json<T: DeserializeOwned>(
        &self,
        request: RequestBuilder,
        fallback: &str,
    ) -> RespondResult<T> {
        let response = request.send().await.map_err(|e| self.transport_error(e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(handle_error_response(status, response, fallback).await);
        }

        response.json::<T>().await.map_err(|e| {
            RespondError::protocol_error(format!("Failed to parse response: {}", e))
        })
    }

    fn transport_error(&self, error: reqwest::Error) -> RespondError {
        if error.is_timeout() {
            RespondError::Timeout {
                timeout_ms: self.config.request_timeout.as_millis() as u64,
            }
        } else if error.is_connect() {
            RespondError::connection_error(format!(
                "Failed to reach {}: {}",
                self.config.api_base, error
            ))
        } else {
            RespondError::HttpError(error)
        }
    }

    // =========================================================================
    // Incidents
    // =========================================================================

    /// Check that the API is up
    pub async fn health(&self) -> RespondResult<HealthResponse> {
        let url = self.endpoint(&["health"])?;
        debug!(url = %url, "Checking API health");

        self.send_json(self.http.get(url), "Health check failed")
            .await
    }

    /// Submit a new incident report
    ///
    /// The server may merge the report into an existing incident; see
    /// [`IngestResponse::outcome`].
    pub async fn ingest_incident(
        &self,
        request: &IngestIncidentRequest,
    ) -> RespondResult<IngestResponse> {
        request.validate().map_err(RespondError::invalid_request)?;

        let url = self.endpoint(&["ingest", "incident"])?;
        debug!(url = %url, urgency = %request.urgency, "Ingesting incident");

        let response: IngestResponse = self
            .send_json(self.http.post(url).json(request), "Ingestion failed")
            .await?;

        info!(
            incident_id = %response.incident_id,
            outcome = %response.outcome(),
            "Incident ingested"
        );
        Ok(response)
    }

    /// Search incidents by text and filters
    pub async fn search_incidents(&self, request: &SearchRequest) -> RespondResult<SearchResponse> {
        request.validate().map_err(RespondError::invalid_request)?;

        let url = self.endpoint(&["search", "incidents"])?;
        debug!(url = %url, query = %request.query, limit = request.limit, "Searching incidents");

        let response: SearchResponse = self
            .send_json(self.http.post(url).json(request), "Search failed")
            .await?;

        debug!(count = response.count, "Search completed");
        Ok(response)
    }

    /// Change an incident's status
    ///
    /// The server enforces which transitions are allowed.
    pub async fn update_status(
        &self,
        incident_id: &str,
        status: IncidentStatus,
    ) -> RespondResult<StatusUpdateResponse> {
        require_id("incident_id", incident_id)?;

        let url = self.endpoint(&["memory", "incident", incident_id, "status"])?;
        debug!(incident_id = %incident_id, status = %status, "Updating incident status");

        let response: StatusUpdateResponse = self
            .send_json(
                self.http.patch(url).json(&StatusUpdateRequest { status }),
                "Update failed",
            )
            .await?;

        info!(
            incident_id = %response.incident_id,
            old_status = %response.old_status,
            new_status = %response.new_status,
            "Incident status updated"
        );
        Ok(response)
    }

    /// Mark a pending incident as acknowledged
    pub async fn acknowledge(&self, incident_id: &str) -> RespondResult<StatusUpdateResponse> {
        self.update_status(incident_id, IncidentStatus::Acknowledged)
            .await
    }

    // =========================================================================
    // Recommendations
    // =========================================================================

    /// Ask for recommended response actions
    pub async fn recommend_actions(
        &self,
        request: &RecommendRequest,
    ) -> RespondResult<RecommendResponse> {
        if request.query.trim().is_empty() {
            return Err(RespondError::invalid_request(
                "enter a search query before requesting recommendations",
            ));
        }

        let url = self.endpoint(&["recommend", "actions"])?;
        debug!(url = %url, query = %request.query, "Requesting action recommendations");

        let response: RecommendResponse = self
            .send_json(self.http.post(url).json(request), "Recommendation failed")
            .await?;

        info!(actions = response.actions.len(), "Received recommendations");
        Ok(response)
    }

    // =========================================================================
    // Media
    // =========================================================================

    /// Upload an image and attach it to an incident
    #[cfg(feature = "media")]
    pub async fn upload_image(
        &self,
        incident_id: &str,
        path: &Path,
        image_type: ImageType,
        zone_id: Option<&str>,
    ) -> RespondResult<ImageUploadResponse> {
        use crate::types::media::IMAGE_EXTENSIONS;
        use reqwest::multipart::Form;

        require_id("incident_id", incident_id)?;
        let part = file_part(path, &IMAGE_EXTENSIONS).await?;

        let mut form = Form::new()
            .part("file", part)
            .text("image_type", image_type.as_str());
        if let Some(zone) = zone_id.filter(|z| !z.trim().is_empty()) {
            form = form.text("zone_id", zone.to_string());
        }

        let url = self.endpoint(&["ingest", "incident", incident_id, "image"])?;
        debug!(url = %url, path = %path.display(), "Uploading image");

        let response: ImageUploadResponse = self
            .send_json(
                self.http
                    .post(url)
                    .timeout(self.config.upload_timeout)
                    .multipart(form),
                "Image upload failed",
            )
            .await?;

        info!(
            incident_id = %response.incident_id,
            image_point_id = %response.image_point_id,
            "Image uploaded"
        );
        Ok(response)
    }

    /// Upload an audio recording as reinforcing evidence for an incident
    ///
    /// The server transcribes it and decides whether it corroborates the
    /// incident; see [`AudioReinforcementResponse::accepted`].
    #[cfg(feature = "media")]
    pub async fn reinforce_with_audio(
        &self,
        incident_id: &str,
        path: &Path,
        source_type: &str,
    ) -> RespondResult<AudioReinforcementResponse> {
        use crate::types::media::AUDIO_EXTENSIONS;
        use reqwest::multipart::Form;

        require_id("incident_id", incident_id)?;
        let part = file_part(path, &AUDIO_EXTENSIONS).await?;

        let form = Form::new()
            .part("file", part)
            .text("source_type", source_type.to_string());

        let url = self.endpoint(&["memory", "incident", incident_id, "reinforce_audio"])?;
        debug!(url = %url, path = %path.display(), "Uploading audio evidence");

        let response: AudioReinforcementResponse = self
            .send_json(
                self.http
                    .post(url)
                    .timeout(self.config.upload_timeout)
                    .multipart(form),
                "Audio upload failed",
            )
            .await?;

        info!(
            incident_id = %response.incident_id,
            accepted = response.accepted,
            similarity = response.similarity,
            "Audio reinforcement processed"
        );
        Ok(response)
    }

    /// Find incident images matching a text description
    #[cfg(feature = "media")]
    pub async fn search_images(
        &self,
        request: &ImageSearchRequest,
    ) -> RespondResult<ImageSearchResponse> {
        if request.query.trim().is_empty() {
            return Err(RespondError::invalid_request(
                "image search query must not be empty",
            ));
        }

        let url = self.endpoint(&["search", "images"])?;
        debug!(url = %url, query = %request.query, "Searching images");

        self.send_json(self.http.post(url).json(request), "Image search failed")
            .await
    }

    // =========================================================================
    // Deployments
    // =========================================================================

    /// Assign a unit to respond to one or more incidents
    #[cfg(feature = "deployments")]
    pub async fn create_deployment(
        &self,
        request: &CreateDeploymentRequest,
    ) -> RespondResult<CreateDeploymentResponse> {
        request.validate().map_err(RespondError::invalid_request)?;

        let url = self.endpoint(&["deployments", "create"])?;
        debug!(url = %url, unit = %request.assigned_unit, "Creating deployment");

        let response: CreateDeploymentResponse = self
            .send_json(
                self.http.post(url).json(request),
                "Deployment creation failed",
            )
            .await?;

        info!(
            deployment_id = %response.deployment_id,
            incident_count = response.incident_count,
            "Deployment created"
        );
        Ok(response)
    }

    /// Move a deployment to a new status
    #[cfg(feature = "deployments")]
    pub async fn update_deployment_status(
        &self,
        deployment_id: &str,
        status: DeploymentStatus,
        notes: Option<String>,
    ) -> RespondResult<UpdateDeploymentStatusResponse> {
        require_id("deployment_id", deployment_id)?;

        let url = self.endpoint(&["deployments", deployment_id, "status"])?;
        debug!(deployment_id = %deployment_id, status = %status, "Updating deployment status");

        let body = UpdateDeploymentStatusRequest {
            status,
            notes: notes.filter(|n| !n.trim().is_empty()),
        };
        let response: UpdateDeploymentStatusResponse = self
            .send_json(self.http.patch(url).json(&body), "Status update failed")
            .await?;

        info!(
            deployment_id = %response.deployment_id,
            old_status = %response.old_status,
            new_status = %response.new_status,
            "Deployment status updated"
        );
        Ok(response)
    }

    /// Fetch a deployment
    #[cfg(feature = "deployments")]
    pub async fn get_deployment(&self, deployment_id: &str) -> RespondResult<Deployment> {
        require_id("deployment_id", deployment_id)?;

        let url = self.endpoint(&["deployments", deployment_id])?;
        debug!(deployment_id = %deployment_id, "Fetching deployment");

        self.send_json(self.http.get(url), "Deployment lookup failed")
            .await
    }
}

fn require_id(name: &str, value: &str) -> RespondResult<()> {
    if value.trim().is_empty() {
        return Err(RespondError::invalid_request(format!(
            "{} must not be empty",
            name
        )));
    }
    Ok(())
}

/// Read a file into a multipart part after checking its extension
#[cfg(feature = "media")]
async fn file_part(path: &Path, allowed: &[&str]) -> RespondResult<reqwest::multipart::Part> {
    use crate::types::media::has_extension;

    let file_name = path
        .file_name()
        .and_then(|name| name.to_str())
        .ok_or_else(|| {
            RespondError::invalid_request(format!("not a file path: {}", path.display()))
        })?
        .to_string();

    if !has_extension(&file_name, allowed) {
        return Err(RespondError::invalid_request(format!(
            "unsupported file type '{}', expected one of: {}",
            file_name,
            allowed.join(", ")
        )));
    }

    let bytes = tokio::fs::read(path).await?;
    Ok(reqwest::multipart::Part::bytes(bytes).file_name(file_name))
}

/// Turn a non-success response into an error carrying the API's detail
async fn handle_error_response(
    status: StatusCode,
    response: reqwest::Response,
    fallback: &str,
) -> RespondError {
    let body = response.text().await.unwrap_or_default();
    let detail = serde_json::from_str::<ErrorBody>(&body)
        .ok()
        .and_then(|body| body.message())
        .unwrap_or_else(|| fallback.to_string());

    debug!(status = status.as_u16(), detail = %detail, "API returned an error");

    match status {
        StatusCode::NOT_FOUND => RespondError::NotFound { detail },
        _ => RespondError::api(status.as_u16(), detail),
    }
}
