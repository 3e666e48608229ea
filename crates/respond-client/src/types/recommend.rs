//! Action recommendation types.

use respond_core::presenter::short_id;
use serde::{Deserialize, Serialize};

/// Default number of incidents the recommender looks at
pub const DEFAULT_RECOMMEND_LIMIT: u32 = 5;

/// Body of `POST /recommend/actions`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RecommendRequest {
    pub query: String,
    pub limit: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub zone_id: Option<String>,
}

impl RecommendRequest {
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            limit: DEFAULT_RECOMMEND_LIMIT,
            zone_id: None,
        }
    }

    pub fn with_limit(mut self, limit: u32) -> Self {
        self.limit = limit;
        self
    }

    pub fn with_zone(mut self, zone_id: impl Into<String>) -> Self {
        self.zone_id = Some(zone_id.into());
        self
    }
}

/// A recommended response action linked to the incidents that triggered it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecommendedAction {
    /// e.g. `DISPATCH_SEARCH_AND_RESCUE`
    pub action_type: String,
    /// 1 (low) to 5 (urgent)
    pub priority: u8,
    pub reason: String,
    #[serde(default)]
    pub incident_ids: Vec<String>,
}

impl RecommendedAction {
    /// Action type with underscores shown as spaces
    pub fn label(&self) -> String {
        self.action_type.replace('_', " ")
    }

    /// Linked incident ids shortened for display, comma separated
    pub fn linked_incidents(&self) -> String {
        self.incident_ids
            .iter()
            .map(|id| short_id(id))
            .collect::<Vec<_>>()
            .join(", ")
    }
}

/// Incident the recommender based its actions on
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvidenceUsed {
    pub id: String,
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub urgency: String,
    #[serde(default)]
    pub status: String,
}

/// Response of `POST /recommend/actions`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecommendResponse {
    pub query: String,
    #[serde(default)]
    pub actions: Vec<RecommendedAction>,
    #[serde(default)]
    pub evidence_used: Vec<EvidenceUsed>,
}
