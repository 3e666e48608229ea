//! Request and response types for the RESPOND API.
//!
//! Search results themselves live in `respond_core` so the presenter can be
//! used without the HTTP client.

#[cfg(feature = "deployments")]
pub mod deployment;
pub mod incident;
#[cfg(feature = "media")]
pub mod media;
pub mod recommend;

#[cfg(feature = "deployments")]
pub use deployment::{
    CreateDeploymentRequest, CreateDeploymentResponse, Deployment, DeploymentStatus,
    UpdateDeploymentStatusRequest, UpdateDeploymentStatusResponse, parse_incident_ids,
};
pub use incident::{
    DEFAULT_LOCATION, HealthResponse, IngestIncidentRequest, IngestOutcome, IngestResponse,
    Location, SOURCE_TYPES, SearchRequest, StatusUpdateRequest, StatusUpdateResponse,
    UNKNOWN_ZONE,
};
#[cfg(feature = "media")]
pub use media::{
    AudioReinforcementResponse, ImageSearchRequest, ImageSearchResponse, ImageSearchResult,
    ImageType, ImageUploadResponse,
};
pub use recommend::{
    DEFAULT_RECOMMEND_LIMIT, EvidenceUsed, RecommendRequest, RecommendResponse,
    RecommendedAction,
};
