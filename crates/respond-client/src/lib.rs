//! # Respond Client
//!
//! Async client and operator session state for the RESPOND incident API.
//!
//! ## Features
//!
//! - **Incidents**: ingest, search, status updates, action recommendations
//! - **Media** (`media`, default): image upload, audio reinforcement, image search
//! - **Deployments** (`deployments`, default): create, update and look up deployments
//! - **Session**: [`Dashboard`] keeps the displayed result set, sort key and
//!   recently submitted incidents, and discards superseded search responses
//!
//! ## Example
//!
//! ```rust,ignore
//! use respond_client::{Dashboard, RespondClient, SearchRequest};
//!
//! let dashboard = Dashboard::new(RespondClient::from_env()?);
//! let results = dashboard.search(&SearchRequest::new("bridge collapse", 10)).await?;
//!
//! for (result, record) in results.display(&dashboard.sort_key()) {
//!     println!("{} {}% {}", record.short_id, record.confidence_percent, result.payload.text);
//! }
//! ```

pub mod client;
pub mod config;
pub mod dashboard;
pub mod error;
pub mod types;

pub use client::RespondClient;
pub use config::{ClientConfig, ClientConfigBuilder, ConfigError, DEFAULT_API_BASE};
pub use dashboard::{Dashboard, RECENT_INCIDENT_CAPACITY, RecentIncident};
pub use error::{RespondError, RespondResult};
pub use types::*;

pub use respond_core;
