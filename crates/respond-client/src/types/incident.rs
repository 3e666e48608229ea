//! Incident ingestion, search and status types.

use respond_core::{IncidentStatus, Urgency};
use serde::{Deserialize, Serialize};

/// Default location used when the operator leaves coordinates blank
pub const DEFAULT_LOCATION: Location = Location {
    lat: 28.6139,
    lon: 77.2090,
};

/// Zone recorded when the operator leaves the zone blank
pub const UNKNOWN_ZONE: &str = "unknown";

/// Evidence source types the API accepts
pub const SOURCE_TYPES: [&str; 5] = ["social", "satellite", "call", "sensor", "report"];

/// Geographic point
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub lat: f64,
    pub lon: f64,
}

/// Body of `POST /ingest/incident`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IngestIncidentRequest {
    pub text: String,
    pub source_type: String,
    pub urgency: Urgency,
    pub status: IncidentStatus,
    pub zone_id: String,
    pub location: Location,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub confidence_score: Option<f64>,
}

impl IngestIncidentRequest {
    /// Create a request with the dashboard form defaults
    pub fn new(text: impl Into<String>, source_type: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            source_type: source_type.into(),
            urgency: Urgency::Medium,
            status: IncidentStatus::Pending,
            zone_id: UNKNOWN_ZONE.to_string(),
            location: DEFAULT_LOCATION,
            timestamp: None,
            confidence_score: None,
        }
    }

    pub fn with_urgency(mut self, urgency: Urgency) -> Self {
        self.urgency = urgency;
        self
    }

    pub fn with_status(mut self, status: IncidentStatus) -> Self {
        self.status = status;
        self
    }

    /// Set the zone; blank zones are recorded as `unknown`
    pub fn with_zone(mut self, zone_id: impl Into<String>) -> Self {
        let zone_id = zone_id.into();
        self.zone_id = if zone_id.trim().is_empty() {
            UNKNOWN_ZONE.to_string()
        } else {
            zone_id
        };
        self
    }

    /// Set coordinates; a missing or non-finite component keeps the default
    pub fn with_location(mut self, lat: Option<f64>, lon: Option<f64>) -> Self {
        self.location = Location {
            lat: lat.filter(|v| v.is_finite()).unwrap_or(DEFAULT_LOCATION.lat),
            lon: lon.filter(|v| v.is_finite()).unwrap_or(DEFAULT_LOCATION.lon),
        };
        self
    }

    pub fn with_timestamp(mut self, timestamp: impl Into<String>) -> Self {
        self.timestamp = Some(timestamp.into());
        self
    }

    pub fn with_confidence(mut self, confidence_score: f64) -> Self {
        self.confidence_score = Some(confidence_score);
        self
    }

    pub(crate) fn validate(&self) -> Result<(), String> {
        if self.text.trim().is_empty() {
            return Err("incident text must not be empty".to_string());
        }
        if self
            .confidence_score
            .is_some_and(|confidence| !(0.0..=1.0).contains(&confidence))
        {
            return Err("confidence_score must be between 0.0 and 1.0".to_string());
        }
        Ok(())
    }
}

/// Response of `POST /ingest/incident`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IngestResponse {
    pub incident_id: String,
    pub message: String,
}

impl IngestResponse {
    /// Whether the server merged the report into an existing incident
    pub fn outcome(&self) -> IngestOutcome {
        if self.message.contains("deduplicated") {
            IngestOutcome::Deduplicated
        } else {
            IngestOutcome::New
        }
    }
}

/// How the server stored an ingested report
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IngestOutcome {
    New,
    Deduplicated,
}

impl std::fmt::Display for IngestOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            IngestOutcome::New => write!(f, "NEW"),
            IngestOutcome::Deduplicated => write!(f, "DEDUPLICATED"),
        }
    }
}

/// Body of `POST /search/incidents`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchRequest {
    pub query: String,
    pub limit: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub zone_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub urgency: Option<Urgency>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<IncidentStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_hours: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub center: Option<Location>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub radius_km: Option<f64>,
}

impl SearchRequest {
    pub fn new(query: impl Into<String>, limit: u32) -> Self {
        Self {
            query: query.into(),
            limit,
            zone_id: None,
            urgency: None,
            status: None,
            last_hours: None,
            center: None,
            radius_km: None,
        }
    }

    pub fn with_zone(mut self, zone_id: impl Into<String>) -> Self {
        self.zone_id = Some(zone_id.into());
        self
    }

    pub fn with_urgency(mut self, urgency: Urgency) -> Self {
        self.urgency = Some(urgency);
        self
    }

    pub fn with_status(mut self, status: IncidentStatus) -> Self {
        self.status = Some(status);
        self
    }

    pub fn within_last_hours(mut self, hours: u32) -> Self {
        self.last_hours = Some(hours);
        self
    }

    /// Restrict results to a radius around a point
    pub fn near(mut self, center: Location, radius_km: f64) -> Self {
        self.center = Some(center);
        self.radius_km = Some(radius_km);
        self
    }

    pub(crate) fn validate(&self) -> Result<(), String> {
        if self.query.trim().is_empty() {
            return Err("search query must not be empty".to_string());
        }
        if self.limit == 0 {
            return Err("limit must be greater than 0".to_string());
        }
        if self.radius_km.is_some_and(|radius| radius <= 0.0) {
            return Err("radius_km must be positive".to_string());
        }
        Ok(())
    }
}

/// Body of `PATCH /memory/incident/{id}/status`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StatusUpdateRequest {
    pub status: IncidentStatus,
}

/// Response of an incident status update
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatusUpdateResponse {
    pub incident_id: String,
    pub old_status: String,
    pub new_status: String,
    #[serde(default)]
    pub message: String,
}

/// Response of `GET /health`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
}

impl HealthResponse {
    pub fn is_ok(&self) -> bool {
        self.status == "ok"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_ingest_request_defaults() {
        let request = IngestIncidentRequest::new("Smoke over sector 4", "call")
            .with_zone("  ")
            .with_location(None, Some(f64::NAN));

        assert_eq!(request.zone_id, "unknown");
        assert_eq!(request.location, DEFAULT_LOCATION);

        let body = serde_json::to_value(&request).unwrap();
        assert_eq!(
            body,
            json!({
                "text": "Smoke over sector 4",
                "source_type": "call",
                "urgency": "medium",
                "status": "pending",
                "zone_id": "unknown",
                "location": {"lat": 28.6139, "lon": 77.2090}
            })
        );
    }

    #[test]
    fn test_ingest_request_validation() {
        assert!(IngestIncidentRequest::new(" ", "call").validate().is_err());
        assert!(
            IngestIncidentRequest::new("fire", "call")
                .with_confidence(1.5)
                .validate()
                .is_err()
        );
        assert!(IngestIncidentRequest::new("fire", "call").validate().is_ok());
    }

    #[test]
    fn test_ingest_outcome() {
        let response = IngestResponse {
            incident_id: "abc".to_string(),
            message: "Incident deduplicated into existing abc".to_string(),
        };
        assert_eq!(response.outcome(), IngestOutcome::Deduplicated);

        let response = IngestResponse {
            incident_id: "abc".to_string(),
            message: "Incident ingested successfully".to_string(),
        };
        assert_eq!(response.outcome(), IngestOutcome::New);
        assert_eq!(response.outcome().to_string(), "NEW");
    }

    #[test]
    fn test_search_request_skips_unset_filters() {
        let request = SearchRequest::new("flood", 10)
            .within_last_hours(24)
            .with_urgency(Urgency::Critical);

        let body = serde_json::to_value(&request).unwrap();
        assert_eq!(
            body,
            json!({"query": "flood", "limit": 10, "last_hours": 24, "urgency": "critical"})
        );
    }

    #[test]
    fn test_search_request_validation() {
        assert!(SearchRequest::new("", 10).validate().is_err());
        assert!(SearchRequest::new("flood", 0).validate().is_err());
        assert!(
            SearchRequest::new("flood", 5)
                .near(DEFAULT_LOCATION, -1.0)
                .validate()
                .is_err()
        );
    }
}
