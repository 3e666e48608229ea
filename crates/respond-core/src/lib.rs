//! # Respond Core
//!
//! Result model and presentation logic for the RESPOND incident dashboard.
//!
//! Incident ranking, decay and evidence tracking all happen behind the
//! RESPOND API. This crate takes the results that API returns and shapes
//! them for display:
//!
//! - **Model**: [`IncidentResult`] and friends, decoded from search responses
//! - **Presenter**: stable client-side re-sorting and per-incident
//!   [`DisplayRecord`]s
//! - **Store**: the current result set, guarded by search generation
//!   tickets so a slow response never overwrites a newer one
//!
//! ## Example
//!
//! ```rust
//! use respond_core::{ResultStore, SearchResponse};
//!
//! let store = ResultStore::new();
//! let ticket = store.begin_search();
//! let set = store.complete(ticket, SearchResponse::empty()).unwrap();
//!
//! assert_eq!(set.title(), "0 incidents found");
//! assert!(set.sorted("age_seconds").is_empty());
//! ```

pub mod error;
pub mod model;
pub mod presenter;
pub mod store;

pub use error::CoreError;
pub use model::{
    Evidence, EvidenceItem, IncidentPayload, IncidentResult, IncidentStatus, SearchResponse,
    Urgency,
};
pub use presenter::{
    DisplayRecord, EvidenceLine, SortKey, build_display_record, format_age, results_title,
    sort_by_key, sort_results, to_fixed,
};
pub use store::{ResultSet, ResultStore, SearchTicket};
