//! Background search service
//!
//! Resolves debounced queries from the search box against the catalog on a
//! worker thread, so a slow lookup never blocks the UI loop. Only the answer
//! to the most recently submitted query is ever handed back.

use crate::model::{Candidate, Catalog};
use std::sync::mpsc::{self, Receiver, Sender, TryRecvError};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

/// A lookup request sent to the worker
#[derive(Debug)]
struct SearchRequest {
    seq: u64,
    query: String,
}

/// A completed lookup
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchResponse {
    pub seq: u64,
    pub query: String,
    pub results: Vec<Candidate>,
}

/// Handle to the search worker thread
pub struct SearchWorker {
    requests: Sender<SearchRequest>,
    responses: Receiver<SearchResponse>,
    /// Sequence number of the last submitted request
    latest: u64,
    /// Set once the worker thread has gone away
    disconnected: bool,
    /// Last sequence number answered with an empty response after a disconnect
    reported: u64,
}

impl SearchWorker {
    /// Start a worker serving lookups against `catalog`
    ///
    /// `limit` caps each result list; `latency` delays every answer.
    pub fn spawn(catalog: Arc<Catalog>, limit: usize, latency: Option<Duration>) -> Self {
        let (req_tx, req_rx) = mpsc::channel::<SearchRequest>();
        let (resp_tx, resp_rx) = mpsc::channel();

        thread::spawn(move || Self::serve(&catalog, limit, latency, req_rx, resp_tx));

        Self {
            requests: req_tx,
            responses: resp_rx,
            latest: 0,
            disconnected: false,
            reported: 0,
        }
    }

    /// Submit a query, superseding any outstanding one
    pub fn submit(&mut self, query: &str) -> u64 {
        self.latest += 1;
        let request = SearchRequest {
            seq: self.latest,
            query: query.to_string(),
        };
        tracing::debug!(seq = request.seq, query = %request.query, "search submitted");
        if self.requests.send(request).is_err() {
            tracing::error!("search worker is gone");
            self.disconnected = true;
        }
        self.latest
    }

    /// Return the response to the latest request, if it has arrived
    ///
    /// Responses to superseded requests are drained and dropped. A dead
    /// worker yields one empty response so the caller can stop loading.
    pub fn poll(&mut self) -> Option<SearchResponse> {
        let mut current = None;

        loop {
            match self.responses.try_recv() {
                Ok(response) if response.seq == self.latest => current = Some(response),
                Ok(response) => {
                    tracing::trace!(seq = response.seq, "dropping stale search response");
                }
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Disconnected) => {
                    self.disconnected = true;
                    break;
                }
            }
        }

        if current.is_none() && self.disconnected && self.reported != self.latest {
            // report once per submit
            self.reported = self.latest;
            return Some(SearchResponse {
                seq: self.latest,
                query: String::new(),
                results: Vec::new(),
            });
        }

        current
    }

    fn serve(
        catalog: &Catalog,
        limit: usize,
        latency: Option<Duration>,
        requests: Receiver<SearchRequest>,
        responses: Sender<SearchResponse>,
    ) {
        while let Ok(mut request) = requests.recv() {
            // skip straight to the newest queued request
            while let Ok(newer) = requests.try_recv() {
                request = newer;
            }

            if let Some(delay) = latency {
                thread::sleep(delay);
            }

            let results = catalog.search(&request.query, Some(limit));
            tracing::debug!(
                seq = request.seq,
                query = %request.query,
                hits = results.len(),
                "search resolved"
            );

            let response = SearchResponse {
                seq: request.seq,
                query: request.query,
                results,
            };
            if responses.send(response).is_err() {
                break;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Instant;

    fn catalog() -> Arc<Catalog> {
        Arc::new(Catalog::sample())
    }

    fn wait_for(worker: &mut SearchWorker) -> SearchResponse {
        let deadline = Instant::now() + Duration::from_secs(5);
        loop {
            if let Some(response) = worker.poll() {
                return response;
            }
            assert!(Instant::now() < deadline, "search worker did not answer");
            thread::sleep(Duration::from_millis(5));
        }
    }

    #[test]
    fn test_resolves_query() {
        let mut worker = SearchWorker::spawn(catalog(), 5, None);
        let seq = worker.submit("dune");
        let response = wait_for(&mut worker);
        assert_eq!(response.seq, seq);
        assert_eq!(response.results.len(), 1);
        assert_eq!(response.results[0].title, "Dune");
    }

    #[test]
    fn test_limit_applies() {
        let mut worker = SearchWorker::spawn(catalog(), 3, None);
        worker.submit("");
        assert_eq!(wait_for(&mut worker).results.len(), 3);
    }

    #[test]
    fn test_latest_request_wins() {
        let mut worker = SearchWorker::spawn(catalog(), 10, Some(Duration::from_millis(20)));
        worker.submit("clean");
        worker.submit("rust");
        let last = worker.submit("dune");

        let response = wait_for(&mut worker);
        assert_eq!(response.seq, last);
        assert_eq!(response.query, "dune");

        // anything still in flight belongs to superseded requests
        thread::sleep(Duration::from_millis(100));
        assert!(worker.poll().is_none());
    }
}
