//! Plain-text rendering of API results.
//!
//! Every function returns a `String` so output can be tested without a
//! terminal. Incident cards are built from `DisplayRecord`, never from raw
//! scores.

use respond_client::{
    IngestOutcome, IngestResponse, RecentIncident, RecommendResponse, StatusUpdateResponse,
};
use respond_core::presenter::{short_id, to_fixed};
use respond_core::{DisplayRecord, IncidentResult, ResultSet};
use std::fmt::Write;

/// Width of the confidence bar in characters
const BAR_WIDTH: usize = 20;

/// Render a result set under a sort key, title first
pub fn render_results(results: &ResultSet, sort_key: &str) -> String {
    let mut out = format!("{} (sorted by {})\n", results.title(), sort_key);

    if results.is_empty() {
        out.push_str("🔍 No incidents found matching your query\n");
        return out;
    }

    for (result, record) in results.display(sort_key) {
        out.push('\n');
        out.push_str(&render_card(result, &record));
    }
    out
}

/// Render one incident card
pub fn render_card(result: &IncidentResult, record: &DisplayRecord) -> String {
    let payload = &result.payload;
    let mut out = String::new();

    let _ = write!(
        out,
        "ID: {}...  [{}] [{}]",
        record.short_id, payload.urgency, payload.status
    );
    if record.is_confirmed {
        out.push_str(" ✓ Multi-source");
    }
    out.push('\n');

    let _ = writeln!(out, "  {}", payload.text);
    let _ = writeln!(
        out,
        "  Confidence {} {}%",
        confidence_bar(record.confidence_percent),
        record.confidence_percent
    );
    let _ = writeln!(
        out,
        "  Final score {} | Decay {} | Age {} | Zone {} | Evidence {}",
        record.final_score_label,
        result.decay_factor,
        record.age_label,
        record.zone_label,
        record.evidence_summary
    );

    if record.evidence_lines.is_empty() {
        out.push_str("  No evidence chain\n");
    } else {
        for line in &record.evidence_lines {
            let verdict = if line.accepted {
                "✅ Accepted"
            } else {
                "❌ Rejected"
            };
            let _ = writeln!(
                out,
                "    {} • {} • Similarity {}%",
                line.source_label, verdict, line.similarity_percent
            );
            if !line.text.is_empty() {
                let _ = writeln!(out, "      {}", line.text);
            }
        }
    }

    if record.can_acknowledge {
        let _ = writeln!(out, "  ↳ respond ack {}", result.id);
    }
    out
}

fn confidence_bar(percent: u8) -> String {
    let filled = (usize::from(percent) * BAR_WIDTH + 50) / 100;
    format!(
        "[{}{}]",
        "#".repeat(filled),
        "-".repeat(BAR_WIDTH - filled)
    )
}

pub fn render_ingest(response: &IngestResponse) -> String {
    let headline = match response.outcome() {
        IngestOutcome::Deduplicated => "🔁 Incident deduplicated",
        IngestOutcome::New => "✓ Incident ingested",
    };
    format!(
        "{} [{}]\nID: {}\n{}\n",
        headline,
        response.outcome(),
        response.incident_id,
        response.message
    )
}

pub fn render_status_update(response: &StatusUpdateResponse) -> String {
    format!(
        "✓ Status updated for {}: {} → {}\n",
        short_id(&response.incident_id),
        response.old_status,
        response.new_status
    )
}

pub fn render_recommendations(response: &RecommendResponse) -> String {
    if response.actions.is_empty() {
        return "No actions recommended\n".to_string();
    }

    let mut out = format!("💡 Recommended actions for \"{}\"\n", response.query);
    for action in &response.actions {
        let _ = writeln!(
            out,
            "\n{}  (Priority {}/5)\n  {}\n  Linked incidents: {}",
            action.label(),
            action.priority,
            action.reason,
            action.linked_incidents()
        );
    }
    if !response.evidence_used.is_empty() {
        let _ = writeln!(
            out,
            "\nBased on {} incident(s)",
            response.evidence_used.len()
        );
    }
    out
}

pub fn render_recent(recent: &[RecentIncident]) -> String {
    if recent.is_empty() {
        return "No incidents submitted this session\n".to_string();
    }

    let mut out = String::from("Recent incidents:\n");
    for incident in recent {
        let _ = writeln!(out, "  {}  {}", incident.short_id(), incident.text);
    }
    out
}

#[cfg(feature = "media")]
pub fn render_image_upload(response: &respond_client::ImageUploadResponse) -> String {
    format!(
        "🖼️  {}\nIncident: {} | Image: {}\n",
        response.message,
        short_id(&response.incident_id),
        response.image_point_id
    )
}

#[cfg(feature = "media")]
pub fn render_audio(response: &respond_client::AudioReinforcementResponse) -> String {
    let verdict = if response.accepted {
        "✅ Reinforcement Accepted"
    } else {
        "❌ Reinforcement Rejected"
    };

    let mut out = format!(
        "{}\nSimilarity: {}% | Confidence: {}\n",
        verdict,
        to_fixed(response.similarity * 100.0, 1),
        response.confidence_change()
    );
    if !response.transcript.is_empty() {
        let _ = writeln!(out, "📝 Transcript\n  {}", response.transcript);
    }
    out
}

#[cfg(feature = "media")]
pub fn render_image_results(response: &respond_client::ImageSearchResponse) -> String {
    if response.count == 0 {
        return format!("🔍 No images found for \"{}\"\n", response.query);
    }

    let mut out = format!(
        "✓ Found {} image(s) for \"{}\"\n",
        response.count, response.query
    );
    for image in &response.results {
        let _ = writeln!(
            out,
            "  [{}] {}%  {}  Incident: {}...",
            image.image_type,
            to_fixed(image.score * 100.0, 0),
            image.image_path,
            short_id(&image.incident_id)
        );
    }
    out
}

#[cfg(feature = "deployments")]
pub fn render_deployment_created(response: &respond_client::CreateDeploymentResponse) -> String {
    let id: String = response.deployment_id.chars().take(12).collect();
    format!(
        "🚀 Deployment Created!\nID: {}... | Unit: {} | Incidents: {}\n",
        id, response.assigned_unit, response.incident_count
    )
}

#[cfg(feature = "deployments")]
pub fn render_deployment_update(
    response: &respond_client::UpdateDeploymentStatusResponse,
) -> String {
    format!(
        "✓ Status Updated!\n{} → {}\n",
        response.old_status, response.new_status
    )
}

#[cfg(feature = "deployments")]
pub fn render_deployment(deployment: &respond_client::Deployment) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Deployment {}", deployment.deployment_id);
    let _ = writeln!(
        out,
        "  {} → {} [{}]",
        deployment.action_type.replace('_', " "),
        deployment.assigned_unit,
        deployment.status
    );
    let _ = writeln!(
        out,
        "  Zone: {}",
        deployment.zone_id.as_deref().unwrap_or("N/A")
    );
    let linked: Vec<String> = deployment.incident_ids.iter().map(|id| short_id(id)).collect();
    let _ = writeln!(out, "  Incidents: {}", linked.join(", "));
    let _ = writeln!(
        out,
        "  Created {} | Updated {}",
        deployment.created_at, deployment.updated_at
    );
    out
}
