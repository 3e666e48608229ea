//! # Dashboard Session
//!
//! [`Dashboard`] is the state an operator session carries between actions:
//! the result set on screen, the sort key it is shown under, the last search,
//! and the incidents this operator recently submitted.
//!
//! Searches go through the session's [`ResultStore`], so when two searches
//! overlap only the one started last can replace what is displayed.

use crate::client::RespondClient;
use crate::error::RespondResult;
use crate::types::{
    IngestIncidentRequest, IngestResponse, RecommendRequest, RecommendResponse, SearchRequest,
    StatusUpdateResponse,
};
use respond_core::presenter::short_id;
use respond_core::{IncidentStatus, ResultSet, ResultStore, SortKey};
use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard};
use tracing::{debug, info};

/// How many recently ingested incidents a session remembers
pub const RECENT_INCIDENT_CAPACITY: usize = 10;

/// Characters of incident text kept for the recent list
const RECENT_TEXT_LEN: usize = 30;

/// An incident this session submitted
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecentIncident {
    pub id: String,
    /// Leading characters of the report text
    pub text: String,
}

impl RecentIncident {
    pub fn short_id(&self) -> String {
        short_id(&self.id)
    }
}

#[derive(Debug)]
struct SessionState {
    sort_key: String,
    last_search: Option<SearchRequest>,
    last_incident_id: Option<String>,
    recent: VecDeque<RecentIncident>,
}

/// Operator session state on top of a [`RespondClient`]
#[derive(Debug)]
pub struct Dashboard {
    client: RespondClient,
    results: ResultStore,
    state: Mutex<SessionState>,
}

impl Dashboard {
    pub fn new(client: RespondClient) -> Self {
        Self {
            client,
            results: ResultStore::new(),
            state: Mutex::new(SessionState {
                sort_key: SortKey::default().as_str().to_string(),
                last_search: None,
                last_incident_id: None,
                recent: VecDeque::with_capacity(RECENT_INCIDENT_CAPACITY),
            }),
        }
    }

    pub fn client(&self) -> &RespondClient {
        &self.client
    }

    pub fn results(&self) -> &ResultStore {
        &self.results
    }

    fn state(&self) -> MutexGuard<'_, SessionState> {
        self.state
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Run a search and make its results current.
    ///
    /// Returns `RespondError::Core(StaleResponse)` when another search was
    /// started while this one was in flight; the newer one wins. A failed
    /// search that is still the latest clears the displayed results.
    pub async fn search(&self, request: &SearchRequest) -> RespondResult<Arc<ResultSet>> {
        let ticket = self.results.begin_search();
        self.state().last_search = Some(request.clone());

        match self.client.search_incidents(request).await {
            Ok(response) => Ok(self.results.complete(ticket, response)?),
            Err(err) => {
                self.results.fail(ticket);
                Err(err)
            }
        }
    }

    /// Repeat the last search with all its filters, e.g. after a status change
    pub async fn refresh(&self) -> RespondResult<Option<Arc<ResultSet>>> {
        let Some(request) = self.last_search() else {
            return Ok(None);
        };
        self.search(&request).await.map(Some)
    }

    /// Current sort key string as the operator chose it
    pub fn sort_key(&self) -> String {
        self.state().sort_key.clone()
    }

    /// Change the sort key; unknown keys are kept and show server order
    pub fn set_sort_key(&self, sort_key: impl Into<String>) {
        let sort_key = sort_key.into();
        debug!(sort_key = %sort_key, "Sort key changed");
        self.state().sort_key = sort_key;
    }

    /// The last search request as it was sent
    pub fn last_search(&self) -> Option<SearchRequest> {
        self.state().last_search.clone()
    }

    pub fn last_query(&self) -> Option<String> {
        self.state().last_search.as_ref().map(|r| r.query.clone())
    }

    /// Submit an incident and remember it in the recent list
    pub async fn ingest(&self, request: &IngestIncidentRequest) -> RespondResult<IngestResponse> {
        let response = self.client.ingest_incident(request).await?;
        self.remember(&response.incident_id, &request.text);
        Ok(response)
    }

    fn remember(&self, incident_id: &str, text: &str) {
        let mut state = self.state();
        state.last_incident_id = Some(incident_id.to_string());
        state.recent.retain(|recent| recent.id != incident_id);
        state.recent.push_front(RecentIncident {
            id: incident_id.to_string(),
            text: text.chars().take(RECENT_TEXT_LEN).collect(),
        });
        state.recent.truncate(RECENT_INCIDENT_CAPACITY);
    }

    /// Most recently ingested incident id
    pub fn last_incident_id(&self) -> Option<String> {
        self.state().last_incident_id.clone()
    }

    /// Recently ingested incidents, newest first
    pub fn recent_incidents(&self) -> Vec<RecentIncident> {
        self.state().recent.iter().cloned().collect()
    }

    /// Update an incident's status, then re-run the last search
    pub async fn update_status(
        &self,
        incident_id: &str,
        status: IncidentStatus,
    ) -> RespondResult<StatusUpdateResponse> {
        let response = self.client.update_status(incident_id, status).await?;
        info!(
            incident_id = %incident_id,
            "Status changed, refreshing results"
        );

        match self.refresh().await {
            Ok(_) => {}
            Err(err) if err.is_stale() => {}
            Err(err) => debug!(error = %err, "Refresh after status update failed"),
        }
        Ok(response)
    }

    /// Acknowledge a pending incident, then re-run the last search
    pub async fn acknowledge(&self, incident_id: &str) -> RespondResult<StatusUpdateResponse> {
        self.update_status(incident_id, IncidentStatus::Acknowledged)
            .await
    }

    /// Recommend actions for the last query, or `query` when given
    pub async fn recommend(&self, query: Option<&str>) -> RespondResult<RecommendResponse> {
        let query = match query {
            Some(q) => q.to_string(),
            None => self.last_query().unwrap_or_default(),
        };
        self.client
            .recommend_actions(&RecommendRequest::new(query))
            .await
    }
}
