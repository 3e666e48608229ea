use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

mod commands;
mod error;
mod render;
mod shell;

use respond_client::SOURCE_TYPES;
use respond_core::{IncidentStatus, Urgency};

#[derive(Parser, Debug)]
#[command(name = "respond", version)]
#[command(about = "RESPOND CLI - Incident search, triage and response from the terminal")]
struct Cli {
    /// API base URL (overrides RESPOND_API_BASE)
    #[arg(long, global = true)]
    api_base: Option<String>,

    /// Request timeout in seconds (overrides RESPOND_REQUEST_TIMEOUT_SECS)
    #[arg(long, global = true)]
    timeout: Option<u64>,

    /// Log at debug level
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Check that the API is reachable
    Health,
    /// Submit a new incident report
    Ingest(IngestArgs),
    /// Search incidents and show them as cards
    Search(SearchArgs),
    /// Change an incident's status
    Status {
        /// Incident id
        id: String,
        /// New status (pending, acknowledged, resolved)
        status: IncidentStatus,
    },
    /// Acknowledge a pending incident
    Ack {
        /// Incident id
        id: String,
    },
    /// Recommend response actions for a query
    Recommend {
        query: String,
        /// Maximum number of incidents to base actions on
        #[arg(long, default_value_t = respond_client::DEFAULT_RECOMMEND_LIMIT)]
        limit: u32,
        #[arg(long)]
        zone: Option<String>,
    },
    /// Image upload and image search
    #[cfg(feature = "media")]
    Image {
        #[command(subcommand)]
        image_command: ImageCommands,
    },
    /// Reinforce an incident with an audio recording
    #[cfg(feature = "media")]
    Audio {
        /// Incident id
        id: String,
        /// Audio file (mp3, wav, m4a, flac, ogg, webm)
        file: PathBuf,
        #[arg(long, default_value = "call", value_parser = clap::builder::PossibleValuesParser::new(SOURCE_TYPES))]
        source: String,
    },
    /// Manage resource deployments
    #[cfg(feature = "deployments")]
    Deploy {
        #[command(subcommand)]
        deploy_command: DeployCommands,
    },
    /// Interactive session with re-sortable results
    Shell,
}

#[derive(Args, Debug)]
struct IngestArgs {
    /// Incident report text
    text: String,
    #[arg(long, default_value = "report", value_parser = clap::builder::PossibleValuesParser::new(SOURCE_TYPES))]
    source: String,
    /// critical, high, medium or low
    #[arg(long, default_value = "medium")]
    urgency: Urgency,
    #[arg(long, default_value = "pending")]
    status: IncidentStatus,
    /// Zone id (recorded as "unknown" when omitted)
    #[arg(long)]
    zone: Option<String>,
    #[arg(long, allow_hyphen_values = true)]
    lat: Option<f64>,
    #[arg(long, allow_hyphen_values = true)]
    lon: Option<f64>,
    /// Report time as ISO 8601
    #[arg(long)]
    timestamp: Option<String>,
    /// Source confidence between 0.0 and 1.0
    #[arg(long)]
    confidence: Option<f64>,
}

#[derive(Args, Debug)]
struct SearchArgs {
    query: String,
    /// Result limit (default RESPOND_DEFAULT_SEARCH_LIMIT)
    #[arg(long)]
    limit: Option<u32>,
    /// Sort key: final_score, confidence_score or age_seconds
    #[arg(long, default_value = "final_score")]
    sort: String,
    #[arg(long)]
    zone: Option<String>,
    #[arg(long)]
    urgency: Option<Urgency>,
    #[arg(long)]
    status: Option<IncidentStatus>,
    /// Only incidents from the last N hours
    #[arg(long)]
    last_hours: Option<u32>,
    #[arg(long, allow_hyphen_values = true, requires_all = ["lon", "radius_km"])]
    lat: Option<f64>,
    #[arg(long, allow_hyphen_values = true, requires_all = ["lat", "radius_km"])]
    lon: Option<f64>,
    #[arg(long, requires_all = ["lat", "lon"])]
    radius_km: Option<f64>,
    /// Print sorted results as JSON instead of cards
    #[arg(long)]
    json: bool,
}

#[cfg(feature = "media")]
#[derive(Subcommand, Debug)]
enum ImageCommands {
    /// Attach an image to an incident
    Upload {
        /// Incident id
        id: String,
        /// Image file (jpg, jpeg, png, webp, gif, bmp)
        file: PathBuf,
        /// photo, satellite, drone, cctv or screenshot
        #[arg(long, default_value = "photo")]
        image_type: respond_client::ImageType,
        #[arg(long)]
        zone: Option<String>,
    },
    /// Find incident images matching a description
    Search {
        query: String,
        #[arg(long, default_value_t = 10)]
        limit: u32,
        #[arg(long)]
        image_type: Option<respond_client::ImageType>,
        #[arg(long)]
        zone: Option<String>,
    },
}

#[cfg(feature = "deployments")]
#[derive(Subcommand, Debug)]
enum DeployCommands {
    /// Assign a unit to one or more incidents
    Create {
        /// Action type, e.g. DEPLOY_BOATS
        action_type: String,
        /// Comma-separated incident ids
        incident_ids: String,
        /// Unit to assign
        #[arg(long)]
        unit: String,
        #[arg(long)]
        zone: Option<String>,
        #[arg(long)]
        notes: Option<String>,
    },
    /// Move a deployment to a new status
    Update {
        id: String,
        /// assigned, en_route, on_site, completed or cancelled
        status: respond_client::DeploymentStatus,
        #[arg(long)]
        notes: Option<String>,
    },
    /// Show a deployment
    Get { id: String },
}

/// `RUST_LOG` wins when set; otherwise `info`, or `debug` with `--verbose`
fn env_filter(verbose: bool) -> tracing_subscriber::EnvFilter {
    let default_level = if verbose { "debug" } else { "info" };
    tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level))
}

fn init_tracing(verbose: bool) {
    let env_filter = env_filter(verbose);

    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .json()
        .try_init();
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if let Err(e) = commands::run(cli).await {
        tracing::debug!(error = ?e, "Command failed");
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;
    use serial_test::serial;
    use tracing_subscriber::filter::LevelFilter;

    fn set_rust_log(value: Option<&str>) {
        unsafe {
            match value {
                Some(value) => std::env::set_var("RUST_LOG", value),
                None => std::env::remove_var("RUST_LOG"),
            }
        }
    }

    #[test]
    #[serial]
    fn test_rust_log_overrides_default_level() {
        set_rust_log(Some("error"));
        let quiet = env_filter(false).max_level_hint();
        let verbose = env_filter(true).max_level_hint();
        set_rust_log(None);

        assert_eq!(quiet, Some(LevelFilter::ERROR));
        assert_eq!(verbose, Some(LevelFilter::ERROR));
    }

    #[test]
    #[serial]
    fn test_default_level_without_rust_log() {
        set_rust_log(None);

        assert_eq!(env_filter(false).max_level_hint(), Some(LevelFilter::INFO));
        assert_eq!(env_filter(true).max_level_hint(), Some(LevelFilter::DEBUG));
    }

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_search_args() {
        let cli = Cli::try_parse_from([
            "respond",
            "--api-base",
            "http://localhost:9000",
            "search",
            "bridge collapse",
            "--sort",
            "age_seconds",
            "--urgency",
            "critical",
            "--lat",
            "-12.5",
            "--lon",
            "77.2",
            "--radius-km",
            "5",
        ])
        .unwrap();

        assert_eq!(cli.api_base.as_deref(), Some("http://localhost:9000"));
        match cli.command {
            Commands::Search(args) => {
                assert_eq!(args.query, "bridge collapse");
                assert_eq!(args.sort, "age_seconds");
                assert_eq!(args.urgency, Some(Urgency::Critical));
                assert_eq!(args.lat, Some(-12.5));
                assert!(!args.json);
            }
            other => panic!("expected search, got {:?}", other),
        }
    }

    #[test]
    fn test_radius_requires_center() {
        assert!(Cli::try_parse_from(["respond", "search", "flood", "--radius-km", "5"]).is_err());
    }

    #[test]
    fn test_invalid_status_rejected() {
        assert!(Cli::try_parse_from(["respond", "status", "abc", "closed"]).is_err());
    }

    #[test]
    fn test_ingest_defaults() {
        let cli = Cli::try_parse_from(["respond", "ingest", "Smoke over sector 4"]).unwrap();
        match cli.command {
            Commands::Ingest(args) => {
                assert_eq!(args.source, "report");
                assert_eq!(args.urgency, Urgency::Medium);
                assert_eq!(args.status, IncidentStatus::Pending);
                assert!(args.zone.is_none());
            }
            other => panic!("expected ingest, got {:?}", other),
        }
    }

    #[test]
    fn test_ingest_rejects_unknown_source() {
        assert!(Cli::try_parse_from(["respond", "ingest", "fire", "--source", "pigeon"]).is_err());
    }
}
