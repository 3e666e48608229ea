//! Incident search result types as returned by the RESPOND search endpoint.
//!
//! These mirror the JSON the API produces for `POST /search/incidents`. Scores,
//! decay and evidence are computed server-side; nothing here recomputes them.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Response body of an incident search.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchResponse {
    /// Number of results the server reports
    pub count: usize,
    /// Results in server ranking order
    #[serde(default)]
    pub results: Vec<IncidentResult>,
}

impl SearchResponse {
    /// An empty response
    pub fn empty() -> Self {
        Self {
            count: 0,
            results: Vec::new(),
        }
    }
}

/// A single ranked incident with decay and evidence information.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IncidentResult {
    /// Opaque incident identifier
    pub id: String,
    /// Raw retrieval similarity
    pub score: f64,
    /// Composite ranking value combining similarity and decay
    pub final_score: f64,
    /// Time-based relevance multiplier
    pub decay_factor: f64,
    /// Seconds since the incident was created
    pub age_seconds: u64,
    pub payload: IncidentPayload,
    pub evidence: Evidence,
}

/// Incident fields stored by the backend.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct IncidentPayload {
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub urgency: Urgency,
    #[serde(default)]
    pub status: IncidentStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub zone_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<String>,
}

/// Evidence summary and chain attached to a search result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Evidence {
    /// Confidence in the incident, 0.0 to 1.0
    pub confidence_score: f64,
    /// Whether at least one independent source was accepted
    pub is_multi_source_confirmed: bool,
    pub evidence_count: usize,
    pub accepted_evidence_count: usize,
    /// Corroborating observations in the order they were recorded
    #[serde(default)]
    pub evidence_chain: Vec<EvidenceItem>,
}

impl Evidence {
    /// Check `accepted_evidence_count <= evidence_count == evidence_chain.len()`.
    ///
    /// The API guarantees this; the presenter never enforces it.
    pub fn is_consistent(&self) -> bool {
        self.accepted_evidence_count <= self.evidence_count
            && self.evidence_count == self.evidence_chain.len()
    }
}

/// One corroborating observation in an evidence chain.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvidenceItem {
    pub source_type: String,
    pub accepted: bool,
    /// Similarity to the original report, 0.0 to 1.0
    pub similarity: f64,
    #[serde(default)]
    pub text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<DateTime<Utc>>,
}

/// Incident urgency level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Urgency {
    Critical,
    High,
    #[default]
    Medium,
    Low,
    /// A level this client does not know about
    #[serde(other)]
    Unknown,
}

impl Urgency {
    pub fn as_str(self) -> &'static str {
        match self {
            Urgency::Critical => "critical",
            Urgency::High => "high",
            Urgency::Medium => "medium",
            Urgency::Low => "low",
            Urgency::Unknown => "unknown",
        }
    }
}

impl std::fmt::Display for Urgency {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Urgency {
    type Err = crate::CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "critical" => Ok(Urgency::Critical),
            "high" => Ok(Urgency::High),
            "medium" => Ok(Urgency::Medium),
            "low" => Ok(Urgency::Low),
            other => Err(crate::CoreError::invalid_value("urgency", other)),
        }
    }
}

/// Incident lifecycle status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IncidentStatus {
    #[default]
    Pending,
    Acknowledged,
    Resolved,
    #[serde(other)]
    Unknown,
}

impl IncidentStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            IncidentStatus::Pending => "pending",
            IncidentStatus::Acknowledged => "acknowledged",
            IncidentStatus::Resolved => "resolved",
            IncidentStatus::Unknown => "unknown",
        }
    }

    pub fn is_pending(self) -> bool {
        self == IncidentStatus::Pending
    }
}

impl std::fmt::Display for IncidentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for IncidentStatus {
    type Err = crate::CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(IncidentStatus::Pending),
            "acknowledged" => Ok(IncidentStatus::Acknowledged),
            "resolved" => Ok(IncidentStatus::Resolved),
            other => Err(crate::CoreError::invalid_value("status", other)),
        }
    }
}
