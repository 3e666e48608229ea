//! Resource deployment types.

use serde::{Deserialize, Serialize};

/// Deployment lifecycle status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeploymentStatus {
    #[default]
    Assigned,
    EnRoute,
    OnSite,
    Completed,
    Cancelled,
}

impl DeploymentStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            DeploymentStatus::Assigned => "assigned",
            DeploymentStatus::EnRoute => "en_route",
            DeploymentStatus::OnSite => "on_site",
            DeploymentStatus::Completed => "completed",
            DeploymentStatus::Cancelled => "cancelled",
        }
    }
}

impl std::fmt::Display for DeploymentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for DeploymentStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "assigned" => Ok(DeploymentStatus::Assigned),
            "en_route" => Ok(DeploymentStatus::EnRoute),
            "on_site" => Ok(DeploymentStatus::OnSite),
            "completed" => Ok(DeploymentStatus::Completed),
            "cancelled" => Ok(DeploymentStatus::Cancelled),
            other => Err(format!(
                "unknown deployment status '{}', expected assigned/en_route/on_site/completed/cancelled",
                other
            )),
        }
    }
}

/// Split a comma-separated list of incident ids, dropping blanks
pub fn parse_incident_ids(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|id| !id.is_empty())
        .map(str::to_string)
        .collect()
}

/// Body of `POST /deployments/create`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CreateDeploymentRequest {
    pub action_type: String,
    pub incident_ids: Vec<String>,
    pub assigned_unit: String,
    pub status: DeploymentStatus,
    pub zone_id: Option<String>,
    pub notes: Option<String>,
}

impl CreateDeploymentRequest {
    pub fn new(
        action_type: impl Into<String>,
        incident_ids: Vec<String>,
        assigned_unit: impl Into<String>,
    ) -> Self {
        Self {
            action_type: action_type.into(),
            incident_ids,
            assigned_unit: assigned_unit.into(),
            status: DeploymentStatus::Assigned,
            zone_id: None,
            notes: None,
        }
    }

    /// Set the zone; blank input leaves it unset
    pub fn with_zone(mut self, zone_id: impl Into<String>) -> Self {
        self.zone_id = Some(zone_id.into()).filter(|z: &String| !z.trim().is_empty());
        self
    }

    /// Set operator notes; blank input leaves them unset
    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = Some(notes.into()).filter(|n: &String| !n.trim().is_empty());
        self
    }

    pub(crate) fn validate(&self) -> Result<(), String> {
        if self.action_type.trim().is_empty() {
            return Err("action_type must not be empty".to_string());
        }
        if self.incident_ids.is_empty() {
            return Err("at least one incident id is required".to_string());
        }
        if self.assigned_unit.trim().is_empty() {
            return Err("assigned_unit must not be empty".to_string());
        }
        Ok(())
    }
}

/// Response of `POST /deployments/create`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateDeploymentResponse {
    pub deployment_id: String,
    pub action_type: String,
    pub assigned_unit: String,
    pub status: String,
    pub incident_count: usize,
    pub message: String,
}

/// Body of `PATCH /deployments/{id}/status`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UpdateDeploymentStatusRequest {
    pub status: DeploymentStatus,
    pub notes: Option<String>,
}

/// Response of a deployment status update
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UpdateDeploymentStatusResponse {
    pub deployment_id: String,
    pub old_status: String,
    pub new_status: String,
    pub message: String,
}

/// Response of `GET /deployments/{id}`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Deployment {
    pub deployment_id: String,
    pub action_type: String,
    pub assigned_unit: String,
    pub status: String,
    #[serde(default)]
    pub incident_ids: Vec<String>,
    #[serde(default)]
    pub zone_id: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}
