//! # Result Store
//!
//! Holds the result set the operator is currently looking at. Each search
//! takes a [`SearchTicket`] before its request goes out; when the response
//! arrives it is installed only if no newer search was started in the
//! meantime. A slow response can therefore never overwrite fresher results.
//!
//! The current set is always replaced as a whole and shared as an
//! `Arc<ResultSet>`, so readers keep a consistent snapshot while a new
//! search lands.

use crate::error::CoreError;
use crate::model::{IncidentResult, SearchResponse};
use crate::presenter::{self, DisplayRecord};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};
use tracing::{debug, warn};

/// Proof that a search was started, carrying its generation number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SearchTicket {
    generation: u64,
}

impl SearchTicket {
    pub fn generation(&self) -> u64 {
        self.generation
    }
}

/// One accepted search response.
#[derive(Debug, Clone, PartialEq)]
pub struct ResultSet {
    pub generation: u64,
    /// Count reported by the server
    pub count: usize,
    /// Results in server order
    pub results: Vec<IncidentResult>,
}

impl ResultSet {
    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }

    /// Results re-ordered by `sort_key`; unknown keys keep server order
    pub fn sorted(&self, sort_key: &str) -> Vec<&IncidentResult> {
        presenter::sort_results(&self.results, sort_key)
    }

    /// Sorted results paired with their display records
    pub fn display(&self, sort_key: &str) -> Vec<(&IncidentResult, DisplayRecord)> {
        self.sorted(sort_key)
            .into_iter()
            .map(|result| (result, presenter::build_display_record(result)))
            .collect()
    }

    pub fn title(&self) -> String {
        presenter::results_title(self.count)
    }

    pub fn find(&self, id: &str) -> Option<&IncidentResult> {
        self.results.iter().find(|result| result.id == id)
    }
}

/// Owner of the current result set.
#[derive(Debug, Default)]
pub struct ResultStore {
    latest: AtomicU64,
    current: Mutex<Option<Arc<ResultSet>>>,
}

impl ResultStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn slot(&self) -> MutexGuard<'_, Option<Arc<ResultSet>>> {
        self.current
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Start a search, superseding every ticket issued before
    pub fn begin_search(&self) -> SearchTicket {
        let generation = self.latest.fetch_add(1, Ordering::SeqCst) + 1;
        debug!(generation, "Search started");
        SearchTicket { generation }
    }

    /// Generation of the most recently started search (0 before any)
    pub fn latest_generation(&self) -> u64 {
        self.latest.load(Ordering::SeqCst)
    }

    /// Install a search response if its ticket is still the latest.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::StaleResponse`] when a newer search was started
    /// after `ticket`; the current set is left as it was.
    pub fn complete(
        &self,
        ticket: SearchTicket,
        response: SearchResponse,
    ) -> Result<Arc<ResultSet>, CoreError> {
        let mut slot = self.slot();

        let latest = self.latest_generation();
        if ticket.generation != latest {
            warn!(
                generation = ticket.generation,
                latest, "Discarding superseded search response"
            );
            return Err(CoreError::StaleResponse {
                generation: ticket.generation,
                latest,
            });
        }

        let set = Arc::new(ResultSet {
            generation: ticket.generation,
            count: response.count,
            results: response.results,
        });
        *slot = Some(Arc::clone(&set));

        debug!(
            generation = set.generation,
            count = set.count,
            "Result set replaced"
        );
        Ok(set)
    }

    /// Snapshot of the current result set, if any search has completed
    pub fn current(&self) -> Option<Arc<ResultSet>> {
        self.slot().clone()
    }

    /// Record that the search behind `ticket` failed.
    ///
    /// Clears the current set only while `ticket` is still the latest, and
    /// returns whether it did. The check and the clear happen under the same
    /// lock `complete` takes, so a newer set installed concurrently survives.
    pub fn fail(&self, ticket: SearchTicket) -> bool {
        let mut slot = self.slot();

        let latest = self.latest_generation();
        if ticket.generation != latest {
            debug!(
                generation = ticket.generation,
                latest, "Ignoring failure of superseded search"
            );
            return false;
        }

        *slot = None;
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Evidence, IncidentPayload};

    fn response(ids: &[&str]) -> SearchResponse {
        let results = ids
            .iter()
            .enumerate()
            .map(|(i, id)| IncidentResult {
                id: id.to_string(),
                score: 0.5,
                final_score: i as f64 / 10.0,
                decay_factor: 1.0,
                age_seconds: 100 - i as u64,
                payload: IncidentPayload {
                    text: String::new(),
                    urgency: Default::default(),
                    status: Default::default(),
                    zone_id: None,
                    source_type: None,
                    timestamp: None,
                },
                evidence: Evidence {
                    confidence_score: 0.5,
                    is_multi_source_confirmed: false,
                    evidence_count: 0,
                    accepted_evidence_count: 0,
                    evidence_chain: Vec::new(),
                },
            })
            .collect::<Vec<_>>();

        SearchResponse {
            count: results.len(),
            results,
        }
    }

    #[test]
    fn test_complete_installs_latest() {
        let store = ResultStore::new();
        assert!(store.current().is_none());

        let ticket = store.begin_search();
        let set = store.complete(ticket, response(&["a", "b"])).unwrap();

        assert_eq!(set.generation, 1);
        assert_eq!(set.count, 2);
        assert_eq!(store.current().unwrap().results.len(), 2);
    }

    #[test]
    fn test_stale_response_is_discarded() {
        let store = ResultStore::new();

        let slow = store.begin_search();
        let fast = store.begin_search();

        store.complete(fast, response(&["new"])).unwrap();
        let err = store.complete(slow, response(&["old"])).unwrap_err();

        assert_eq!(
            err,
            CoreError::StaleResponse {
                generation: 1,
                latest: 2
            }
        );
        assert_eq!(store.current().unwrap().results[0].id, "new");
    }

    #[test]
    fn test_stale_response_before_newer_completes() {
        let store = ResultStore::new();

        let first = store.begin_search();
        store.complete(first, response(&["first"])).unwrap();

        let slow = store.begin_search();
        let _pending = store.begin_search();

        assert!(store.complete(slow, response(&["slow"])).is_err());
        assert_eq!(store.current().unwrap().results[0].id, "first");
    }

    #[test]
    fn test_snapshot_survives_replacement() {
        let store = ResultStore::new();

        let first = store.begin_search();
        store.complete(first, response(&["a"])).unwrap();
        let snapshot = store.current().unwrap();

        let second = store.begin_search();
        store.complete(second, response(&["b", "c"])).unwrap();

        assert_eq!(snapshot.results[0].id, "a");
        assert_eq!(store.current().unwrap().count, 2);
    }

    #[test]
    fn test_result_set_sorting_and_display() {
        let store = ResultStore::new();
        let ticket = store.begin_search();
        let set = store.complete(ticket, response(&["a", "b", "c"])).unwrap();

        let by_score: Vec<_> = set
            .sorted("final_score")
            .into_iter()
            .map(|r| r.id.as_str())
            .collect();
        assert_eq!(by_score, ["c", "b", "a"]);

        let by_age: Vec<_> = set
            .sorted("age_seconds")
            .into_iter()
            .map(|r| r.id.as_str())
            .collect();
        assert_eq!(by_age, ["c", "b", "a"]);

        let shown = set.display("bogus");
        assert_eq!(shown[0].0.id, "a");
        assert_eq!(shown[0].1.age_label, "1m ago");
        assert_eq!(set.title(), "3 incidents found");
        assert!(set.find("b").is_some());
    }

    #[test]
    fn test_fail_clears_latest() {
        let store = ResultStore::new();
        store.complete(store.begin_search(), response(&["a"])).unwrap();

        let failed = store.begin_search();
        assert!(store.fail(failed));
        assert!(store.current().is_none());
        assert_eq!(store.latest_generation(), 2);
    }

    #[test]
    fn test_fail_of_superseded_search_keeps_newer_set() {
        let store = ResultStore::new();

        let failing = store.begin_search();
        let newer = store.begin_search();
        store.complete(newer, response(&["newer"])).unwrap();

        assert!(!store.fail(failing));
        assert_eq!(store.current().unwrap().results[0].id, "newer");
    }

    #[test]
    fn test_fail_races_with_newer_search() {
        let store = Arc::new(ResultStore::new());
        let failing = store.begin_search();

        let handle = {
            let store = Arc::clone(&store);
            std::thread::spawn(move || {
                let ticket = store.begin_search();
                store.complete(ticket, response(&["newer"])).unwrap();
            })
        };
        store.fail(failing);
        handle.join().unwrap();

        assert_eq!(store.current().unwrap().results[0].id, "newer");
    }

    #[test]
    fn test_concurrent_searches_keep_only_latest() {
        let store = Arc::new(ResultStore::new());
        let tickets: Vec<_> = (0..8).map(|_| store.begin_search()).collect();
        let last = *tickets.last().unwrap();

        let handles: Vec<_> = tickets
            .into_iter()
            .map(|ticket| {
                let store = Arc::clone(&store);
                std::thread::spawn(move || {
                    let id = format!("gen-{}", ticket.generation());
                    store.complete(ticket, response(&[id.as_str()])).is_ok()
                })
            })
            .collect();

        let accepted = handles
            .into_iter()
            .map(|h| h.join().unwrap())
            .filter(|ok| *ok)
            .count();

        assert_eq!(accepted, 1);
        assert_eq!(store.current().unwrap().generation, last.generation());
    }
}
