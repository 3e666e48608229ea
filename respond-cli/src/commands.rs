//! Subcommand execution

use crate::error::CliResult;
use crate::render;
use crate::shell;
use crate::{Cli, Commands, IngestArgs, SearchArgs};
use respond_client::{
    ClientConfigBuilder, Dashboard, IngestIncidentRequest, Location, RecommendRequest,
    RespondClient, SearchRequest,
};
use respond_core::IncidentStatus;
use tracing::info;

/// Build the client from env plus CLI overrides, then run the command
pub async fn run(cli: Cli) -> CliResult<()> {
    let client = build_client(&cli)?;
    let dashboard = Dashboard::new(client);

    match cli.command {
        Commands::Health => {
            let health = dashboard.client().health().await?;
            if health.is_ok() {
                println!("✅ API healthy at {}", dashboard.client().base_url());
            } else {
                println!("⚠️  API reports status '{}'", health.status);
            }
        }
        Commands::Ingest(args) => ingest(&dashboard, args).await?,
        Commands::Search(args) => search(&dashboard, args).await?,
        Commands::Status { id, status } => {
            let response = dashboard.client().update_status(&id, status).await?;
            print!("{}", render::render_status_update(&response));
        }
        Commands::Ack { id } => {
            let response = dashboard
                .client()
                .update_status(&id, IncidentStatus::Acknowledged)
                .await?;
            print!("{}", render::render_status_update(&response));
        }
        Commands::Recommend { query, limit, zone } => {
            let mut request = RecommendRequest::new(query).with_limit(limit);
            if let Some(zone) = zone {
                request = request.with_zone(zone);
            }
            let response = dashboard.client().recommend_actions(&request).await?;
            print!("{}", render::render_recommendations(&response));
        }
        #[cfg(feature = "media")]
        Commands::Image { image_command } => media::image(&dashboard, image_command).await?,
        #[cfg(feature = "media")]
        Commands::Audio { id, file, source } => {
            println!("⏳ Transcribing audio...");
            let response = dashboard
                .client()
                .reinforce_with_audio(&id, &file, &source)
                .await?;
            print!("{}", render::render_audio(&response));
        }
        #[cfg(feature = "deployments")]
        Commands::Deploy { deploy_command } => {
            deployments::deploy(&dashboard, deploy_command).await?
        }
        Commands::Shell => shell::run(dashboard).await?,
    }
    Ok(())
}

fn build_client(cli: &Cli) -> CliResult<RespondClient> {
    let mut builder = ClientConfigBuilder::from_env()?;
    if let Some(api_base) = &cli.api_base {
        builder = builder.api_base(api_base.clone());
    }
    if let Some(timeout) = cli.timeout {
        builder = builder.request_timeout_secs(timeout);
    }

    let config = builder.build()?;
    info!(api_base = %config.api_base, "Using RESPOND API");
    Ok(RespondClient::new(config)?)
}

async fn ingest(dashboard: &Dashboard, args: IngestArgs) -> CliResult<()> {
    let mut request = IngestIncidentRequest::new(args.text, args.source)
        .with_urgency(args.urgency)
        .with_status(args.status)
        .with_location(args.lat, args.lon);
    if let Some(zone) = args.zone {
        request = request.with_zone(zone);
    }
    if let Some(timestamp) = args.timestamp {
        request = request.with_timestamp(timestamp);
    }
    if let Some(confidence) = args.confidence {
        request = request.with_confidence(confidence);
    }

    let response = dashboard.ingest(&request).await?;
    print!("{}", render::render_ingest(&response));
    Ok(())
}

fn search_request(args: &SearchArgs, default_limit: u32) -> SearchRequest {
    let mut request = SearchRequest::new(args.query.clone(), args.limit.unwrap_or(default_limit));
    if let Some(zone) = &args.zone {
        request = request.with_zone(zone.clone());
    }
    if let Some(urgency) = args.urgency {
        request = request.with_urgency(urgency);
    }
    if let Some(status) = args.status {
        request = request.with_status(status);
    }
    if let Some(hours) = args.last_hours {
        request = request.within_last_hours(hours);
    }
    if let (Some(lat), Some(lon), Some(radius_km)) = (args.lat, args.lon, args.radius_km) {
        request = request.near(Location { lat, lon }, radius_km);
    }
    request
}

async fn search(dashboard: &Dashboard, args: SearchArgs) -> CliResult<()> {
    let request = search_request(&args, dashboard.client().config().default_search_limit);
    dashboard.set_sort_key(args.sort.clone());
    let results = dashboard.search(&request).await?;

    if args.json {
        let sorted = results.sorted(&args.sort);
        println!("{}", serde_json::to_string_pretty(&sorted)?);
    } else {
        print!("{}", render::render_results(&results, &args.sort));
    }
    Ok(())
}

#[cfg(feature = "media")]
mod media {
    use crate::ImageCommands;
    use crate::error::CliResult;
    use crate::render;
    use respond_client::{Dashboard, ImageSearchRequest};

    pub async fn image(dashboard: &Dashboard, command: ImageCommands) -> CliResult<()> {
        match command {
            ImageCommands::Upload {
                id,
                file,
                image_type,
                zone,
            } => {
                let response = dashboard
                    .client()
                    .upload_image(&id, &file, image_type, zone.as_deref())
                    .await?;
                print!("{}", render::render_image_upload(&response));
            }
            ImageCommands::Search {
                query,
                limit,
                image_type,
                zone,
            } => {
                let mut request = ImageSearchRequest::new(query).with_limit(limit);
                if let Some(image_type) = image_type {
                    request = request.with_image_type(image_type);
                }
                request.zone_id = zone;
                let response = dashboard.client().search_images(&request).await?;
                print!("{}", render::render_image_results(&response));
            }
        }
        Ok(())
    }
}

#[cfg(feature = "deployments")]
mod deployments {
    use crate::DeployCommands;
    use crate::error::{CliError, CliResult};
    use crate::render;
    use respond_client::{CreateDeploymentRequest, Dashboard, parse_incident_ids};

    pub async fn deploy(dashboard: &Dashboard, command: DeployCommands) -> CliResult<()> {
        match command {
            DeployCommands::Create {
                action_type,
                incident_ids,
                unit,
                zone,
                notes,
            } => {
                let ids = parse_incident_ids(&incident_ids);
                if ids.is_empty() {
                    return Err(CliError::invalid_argument(
                        "at least one incident id is required",
                    ));
                }

                let mut request = CreateDeploymentRequest::new(action_type, ids, unit);
                if let Some(zone) = zone {
                    request = request.with_zone(zone);
                }
                if let Some(notes) = notes {
                    request = request.with_notes(notes);
                }
                let response = dashboard.client().create_deployment(&request).await?;
                print!("{}", render::render_deployment_created(&response));
            }
            DeployCommands::Update { id, status, notes } => {
                let response = dashboard
                    .client()
                    .update_deployment_status(&id, status, notes)
                    .await?;
                print!("{}", render::render_deployment_update(&response));
            }
            DeployCommands::Get { id } => {
                let deployment = dashboard.client().get_deployment(&id).await?;
                print!("{}", render::render_deployment(&deployment));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use respond_core::Urgency;
    use serde_json::json;

    fn search_args(args: &[&str]) -> SearchArgs {
        let cli = Cli::try_parse_from(args.iter().copied()).unwrap();
        match cli.command {
            Commands::Search(args) => args,
            other => panic!("expected search, got {:?}", other),
        }
    }

    #[test]
    fn test_search_request_uses_default_limit() {
        let args = search_args(&["respond", "search", "flood"]);
        let request = search_request(&args, 25);

        assert_eq!(
            serde_json::to_value(&request).unwrap(),
            json!({"query": "flood", "limit": 25})
        );
    }

    #[test]
    fn test_search_request_filters() {
        let args = search_args(&[
            "respond",
            "search",
            "flood",
            "--limit",
            "5",
            "--urgency",
            "high",
            "--last-hours",
            "6",
            "--lat",
            "28.6",
            "--lon",
            "77.2",
            "--radius-km",
            "3",
        ]);
        let request = search_request(&args, 25);

        assert_eq!(request.limit, 5);
        assert_eq!(request.urgency, Some(Urgency::High));
        assert_eq!(request.last_hours, Some(6));
        assert_eq!(request.center, Some(Location { lat: 28.6, lon: 77.2 }));
        assert_eq!(request.radius_km, Some(3.0));
    }

    #[test]
    fn test_cli_overrides_env_config() {
        let cli = Cli::try_parse_from([
            "respond",
            "--api-base",
            "http://10.0.0.5:8000",
            "--timeout",
            "7",
            "health",
        ])
        .unwrap();

        let client = build_client(&cli).unwrap();
        assert_eq!(client.base_url().as_str(), "http://10.0.0.5:8000/");
        assert_eq!(client.config().request_timeout.as_secs(), 7);
    }

    #[test]
    fn test_invalid_timeout_rejected() {
        let cli = Cli::try_parse_from(["respond", "--timeout", "0", "health"]).unwrap();
        assert!(build_client(&cli).is_err());
    }
}
