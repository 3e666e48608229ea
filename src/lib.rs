//! # RESPOND
//!
//! Operator-side client for the RESPOND incident API.
//!
//! - [`core`]: incident result model, client-side sorting and display records,
//!   and the generation-tracked result store
//! - [`client`]: async API client, configuration and the [`Dashboard`] session
//!
//! ```rust
//! use respond::{ResultStore, SearchResponse, results_title};
//!
//! let store = ResultStore::new();
//! let ticket = store.begin_search();
//! let results = store.complete(ticket, SearchResponse::empty()).unwrap();
//! assert_eq!(results_title(results.count), "0 incidents found");
//! ```

pub use respond_client as client;
pub use respond_core as core;

pub use respond_client::{
    ClientConfig, ClientConfigBuilder, Dashboard, RespondClient, RespondError, RespondResult,
    SearchRequest,
};
pub use respond_core::{
    CoreError, DisplayRecord, IncidentResult, ResultSet, ResultStore, SearchResponse, SortKey,
    build_display_record, format_age, results_title, sort_results,
};
