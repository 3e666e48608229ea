//! # Result Presenter
//!
//! Turns a fetched incident result set into something a UI layer can draw:
//! a re-sorted view under an operator-selected key and a per-incident
//! [`DisplayRecord`] with the derived labels.
//!
//! Everything here is pure. Sorting borrows the input slice and returns a new
//! ordering; the records themselves are never touched.
//!
//! ```rust
//! use respond_core::presenter::{format_age, SortKey};
//!
//! assert_eq!(format_age(125), "2m ago");
//! assert_eq!("age_seconds".parse::<SortKey>().unwrap(), SortKey::AgeSeconds);
//! ```

use crate::error::CoreError;
use crate::model::{EvidenceItem, IncidentResult};
use std::cmp::Ordering;
use tracing::debug;

const MINUTE: u64 = 60;
const HOUR: u64 = 60 * MINUTE;
const DAY: u64 = 24 * HOUR;

/// Characters of the incident id shown on cards
pub const SHORT_ID_LEN: usize = 8;

/// Format an incident age as a coarse "time ago" label.
///
/// Uses floor division into a single unit: seconds below a minute, minutes
/// below an hour, hours below a day, days otherwise.
pub fn format_age(age_seconds: u64) -> String {
    if age_seconds < MINUTE {
        format!("{}s ago", age_seconds)
    } else if age_seconds < HOUR {
        format!("{}m ago", age_seconds / MINUTE)
    } else if age_seconds < DAY {
        format!("{}h ago", age_seconds / HOUR)
    } else {
        format!("{}d ago", age_seconds / DAY)
    }
}

/// Header text for a result set of `count` incidents
pub fn results_title(count: usize) -> String {
    if count == 1 {
        "1 incident found".to_string()
    } else {
        format!("{} incidents found", count)
    }
}

/// Keys an operator can re-sort a result set by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SortKey {
    /// Descending by server composite score
    #[default]
    FinalScore,
    /// Descending by evidence confidence
    ConfidenceScore,
    /// Ascending by age, youngest first
    AgeSeconds,
}

impl SortKey {
    /// All keys in the order the dashboard offers them
    pub const ALL: [SortKey; 3] = [
        SortKey::FinalScore,
        SortKey::ConfidenceScore,
        SortKey::AgeSeconds,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            SortKey::FinalScore => "final_score",
            SortKey::ConfidenceScore => "confidence_score",
            SortKey::AgeSeconds => "age_seconds",
        }
    }

    fn compare(self, a: &IncidentResult, b: &IncidentResult) -> Ordering {
        match self {
            SortKey::FinalScore => descending(a.final_score, b.final_score),
            SortKey::ConfidenceScore => {
                descending(a.evidence.confidence_score, b.evidence.confidence_score)
            }
            SortKey::AgeSeconds => a.age_seconds.cmp(&b.age_seconds),
        }
    }
}

impl std::fmt::Display for SortKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for SortKey {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "final_score" => Ok(SortKey::FinalScore),
            "confidence_score" => Ok(SortKey::ConfidenceScore),
            "age_seconds" => Ok(SortKey::AgeSeconds),
            other => Err(CoreError::unknown_sort_key(other)),
        }
    }
}

/// NaN sorts below every real score so the comparator stays a total order.
fn rank_value(value: f64) -> f64 {
    if value.is_nan() {
        f64::NEG_INFINITY
    } else {
        value
    }
}

fn descending(a: f64, b: f64) -> Ordering {
    rank_value(b)
        .partial_cmp(&rank_value(a))
        .unwrap_or(Ordering::Equal)
}

/// Order `results` by a typed key.
///
/// The sort is stable: results with equal keys keep their input order.
pub fn sort_by_key(results: &[IncidentResult], key: SortKey) -> Vec<&IncidentResult> {
    let mut view: Vec<&IncidentResult> = results.iter().collect();
    view.sort_by(|a, b| key.compare(a, b));
    view
}

/// Order `results` by a sort key as sent by the UI.
///
/// Recognized keys are `final_score`, `confidence_score` and `age_seconds`.
/// Any other string leaves the input order unchanged.
pub fn sort_results<'a>(results: &'a [IncidentResult], sort_key: &str) -> Vec<&'a IncidentResult> {
    match sort_key.parse::<SortKey>() {
        Ok(key) => sort_by_key(results, key),
        Err(_) => {
            debug!(sort_key = %sort_key, "Unknown sort key, keeping server order");
            results.iter().collect()
        }
    }
}

/// Presentational fields derived from one incident result.
#[derive(Debug, Clone, PartialEq)]
pub struct DisplayRecord {
    /// `round(confidence_score * 100)`, clamped to 0..=100
    pub confidence_percent: u8,
    /// `"{accepted}/{total}"` evidence count
    pub evidence_summary: String,
    pub age_label: String,
    pub is_confirmed: bool,
    pub short_id: String,
    pub final_score_label: String,
    /// Zone id, or `N/A` when the incident has none
    pub zone_label: String,
    pub evidence_lines: Vec<EvidenceLine>,
    /// Only pending incidents offer the quick acknowledge action
    pub can_acknowledge: bool,
}

/// One rendered row of an evidence chain.
#[derive(Debug, Clone, PartialEq)]
pub struct EvidenceLine {
    pub source_label: String,
    pub accepted: bool,
    /// Similarity as a percentage with one decimal, e.g. `81.0`
    pub similarity_percent: String,
    pub text: String,
}

impl EvidenceLine {
    fn from_item(item: &EvidenceItem) -> Self {
        Self {
            source_label: item.source_type.to_uppercase(),
            accepted: item.accepted,
            similarity_percent: to_fixed(item.similarity * 100.0, 1),
            text: item.text.clone(),
        }
    }
}

/// Convert a 0..1 confidence into a whole percentage.
pub fn confidence_percent(confidence_score: f64) -> u8 {
    if confidence_score.is_nan() {
        return 0;
    }
    (confidence_score * 100.0).round().clamp(0.0, 100.0) as u8
}

/// Format `value` with `digits` decimals, rounding exact ties away from zero.
///
/// `format!("{:.N}")` breaks ties to even, so `81.25` would show as `81.2`
/// where the web dashboard shows `81.3`.
pub fn to_fixed(value: f64, digits: u8) -> String {
    let factor = 10f64.powi(i32::from(digits));
    let rounded = (value * factor).round() / factor;
    format!("{:.*}", usize::from(digits), rounded)
}

/// Leading characters of an incident id, cut on a char boundary.
pub fn short_id(id: &str) -> String {
    id.chars().take(SHORT_ID_LEN).collect()
}

/// Derive the display record for one result.
pub fn build_display_record(result: &IncidentResult) -> DisplayRecord {
    let evidence = &result.evidence;

    DisplayRecord {
        confidence_percent: confidence_percent(evidence.confidence_score),
        evidence_summary: format!(
            "{}/{}",
            evidence.accepted_evidence_count, evidence.evidence_count
        ),
        age_label: format_age(result.age_seconds),
        is_confirmed: evidence.is_multi_source_confirmed,
        short_id: short_id(&result.id),
        final_score_label: to_fixed(result.final_score, 3),
        zone_label: result
            .payload
            .zone_id
            .as_deref()
            .filter(|zone| !zone.is_empty())
            .unwrap_or("N/A")
            .to_string(),
        evidence_lines: evidence
            .evidence_chain
            .iter()
            .map(EvidenceLine::from_item)
            .collect(),
        can_acknowledge: result.payload.status.is_pending(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Evidence, IncidentPayload, IncidentStatus, Urgency};
    use rstest::rstest;

    fn result(id: &str, final_score: f64, confidence: f64, age: u64) -> IncidentResult {
        IncidentResult {
            id: id.to_string(),
            score: final_score,
            final_score,
            decay_factor: 1.0,
            age_seconds: age,
            payload: IncidentPayload {
                text: format!("incident {}", id),
                urgency: Urgency::Medium,
                status: IncidentStatus::Pending,
                zone_id: None,
                source_type: None,
                timestamp: None,
            },
            evidence: Evidence {
                confidence_score: confidence,
                is_multi_source_confirmed: false,
                evidence_count: 0,
                accepted_evidence_count: 0,
                evidence_chain: Vec::new(),
            },
        }
    }

    fn ids(view: &[&IncidentResult]) -> Vec<String> {
        view.iter().map(|r| r.id.clone()).collect()
    }

    #[rstest]
    #[case(0, "0s ago")]
    #[case(45, "45s ago")]
    #[case(59, "59s ago")]
    #[case(60, "1m ago")]
    #[case(125, "2m ago")]
    #[case(3599, "59m ago")]
    #[case(3600, "1h ago")]
    #[case(7300, "2h ago")]
    #[case(86399, "23h ago")]
    #[case(86400, "1d ago")]
    #[case(200000, "2d ago")]
    fn test_format_age(#[case] seconds: u64, #[case] expected: &str) {
        assert_eq!(format_age(seconds), expected);
    }

    #[test]
    fn test_sort_by_final_score_is_stable() {
        let results = vec![
            result("a", 0.5, 0.1, 10),
            result("b", 0.9, 0.2, 20),
            result("c", 0.9, 0.3, 30),
        ];

        let sorted = sort_results(&results, "final_score");
        assert_eq!(ids(&sorted), vec!["b", "c", "a"]);
    }

    #[test]
    fn test_sort_by_confidence_descending() {
        let results = vec![
            result("a", 0.5, 0.4, 10),
            result("b", 0.9, 0.8, 20),
            result("c", 0.1, 0.6, 30),
        ];

        let sorted = sort_results(&results, "confidence_score");
        assert_eq!(ids(&sorted), vec!["b", "c", "a"]);
    }

    #[test]
    fn test_sort_by_age_youngest_first() {
        let results = vec![
            result("a", 0.5, 0.4, 300),
            result("b", 0.9, 0.8, 20),
            result("c", 0.1, 0.6, 300),
            result("d", 0.1, 0.6, 5),
        ];

        let sorted = sort_results(&results, "age_seconds");
        assert_eq!(ids(&sorted), vec!["d", "b", "a", "c"]);
    }

    #[test]
    fn test_unknown_key_keeps_order() {
        let results = vec![result("a", 0.1, 0.1, 1), result("b", 0.9, 0.9, 2)];

        let sorted = sort_results(&results, "urgency");
        assert_eq!(ids(&sorted), vec!["a", "b"]);
    }

    #[test]
    fn test_sort_empty() {
        for key in SortKey::ALL {
            assert!(sort_by_key(&[], key).is_empty());
        }
        assert!(sort_results(&[], "unknown_key").is_empty());
    }

    #[test]
    fn test_sort_does_not_mutate_input() {
        let results = vec![result("a", 0.1, 0.1, 1), result("b", 0.9, 0.9, 2)];
        let before = results.clone();

        let _ = sort_results(&results, "final_score");
        assert_eq!(results, before);
    }

    #[test]
    fn test_nan_scores_sort_last() {
        let results = vec![
            result("nan", f64::NAN, 0.1, 1),
            result("low", 0.1, 0.1, 1),
            result("high", 0.9, 0.1, 1),
        ];

        let sorted = sort_results(&results, "final_score");
        assert_eq!(ids(&sorted), vec!["high", "low", "nan"]);
    }

    #[test]
    fn test_sort_key_round_trip_strings() {
        for key in SortKey::ALL {
            assert_eq!(key.as_str().parse::<SortKey>().unwrap(), key);
        }
        assert_eq!(
            "score".parse::<SortKey>().unwrap_err(),
            CoreError::unknown_sort_key("score")
        );
    }

    #[test]
    fn test_build_display_record() {
        let mut incident = result("0123456789abcdef", 0.71234, 0.873, 45);
        incident.evidence.is_multi_source_confirmed = true;
        incident.evidence.evidence_count = 3;
        incident.evidence.accepted_evidence_count = 2;

        let record = build_display_record(&incident);
        assert_eq!(record.confidence_percent, 87);
        assert_eq!(record.evidence_summary, "2/3");
        assert_eq!(record.age_label, "45s ago");
        assert!(record.is_confirmed);
        assert_eq!(record.short_id, "01234567");
        assert_eq!(record.final_score_label, "0.712");
        assert_eq!(record.zone_label, "N/A");
        assert!(record.can_acknowledge);
    }

    #[test]
    fn test_display_record_evidence_lines() {
        let mut incident = result("abc", 0.5, 0.5, 4000);
        incident.payload.zone_id = Some("zone-3".to_string());
        incident.payload.status = IncidentStatus::Acknowledged;
        incident.evidence.evidence_chain = vec![EvidenceItem {
            source_type: "social".to_string(),
            accepted: true,
            similarity: 0.8123,
            text: "bridge closed".to_string(),
            timestamp: None,
        }];
        incident.evidence.evidence_count = 1;
        incident.evidence.accepted_evidence_count = 1;

        let record = build_display_record(&incident);
        assert_eq!(record.zone_label, "zone-3");
        assert_eq!(record.short_id, "abc");
        assert!(!record.can_acknowledge);
        assert_eq!(
            record.evidence_lines,
            vec![EvidenceLine {
                source_label: "SOCIAL".to_string(),
                accepted: true,
                similarity_percent: "81.2".to_string(),
                text: "bridge closed".to_string(),
            }]
        );
    }

    #[rstest]
    #[case(0.0, 0)]
    #[case(0.006, 1)]
    #[case(0.994, 99)]
    #[case(1.0, 100)]
    #[case(1.2, 100)]
    #[case(-0.3, 0)]
    fn test_confidence_percent(#[case] score: f64, #[case] expected: u8) {
        assert_eq!(confidence_percent(score), expected);
    }

    #[rstest]
    #[case(81.25, 1, "81.3")]
    #[case(81.24, 1, "81.2")]
    #[case(0.0625, 3, "0.063")]
    #[case(0.8123, 3, "0.812")]
    #[case(42.0, 1, "42.0")]
    #[case(-0.0625, 3, "-0.063")]
    #[case(87.5, 0, "88")]
    fn test_to_fixed_rounds_ties_up(
        #[case] value: f64,
        #[case] digits: u8,
        #[case] expected: &str,
    ) {
        assert_eq!(to_fixed(value, digits), expected);
    }

    #[test]
    fn test_display_labels_round_ties_up() {
        let mut incident = result("abc", 0.0625, 0.5, 10);
        incident.evidence.evidence_chain = vec![EvidenceItem {
            source_type: "call".to_string(),
            accepted: false,
            similarity: 0.8125,
            text: String::new(),
            timestamp: None,
        }];

        let record = build_display_record(&incident);
        assert_eq!(record.final_score_label, "0.063");
        assert_eq!(record.evidence_lines[0].similarity_percent, "81.3");
    }

    #[test]
    fn test_results_title() {
        assert_eq!(results_title(0), "0 incidents found");
        assert_eq!(results_title(1), "1 incident found");
        assert_eq!(results_title(12), "12 incidents found");
    }
}
