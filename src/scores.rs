use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::thread;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, error};

use crate::config::FETCH_COOLDOWN_MS;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreEntry {
    pub name: String,
    pub score: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rank: Option<usize>,
}

impl ScoreEntry {
    pub fn new(name: impl Into<String>, score: i64) -> Self {
        Self { name: name.into(), score, rank: None }
    }
}

#[derive(Debug, Error)]
pub enum ScoreFetchError {
    #[error("score request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("score server answered with status {0}")]
    Status(u16),
    #[error("score request ended without a reply")]
    Dropped,
}

pub type FetchResult = Result<Vec<ScoreEntry>, ScoreFetchError>;

/// Where the top-scores list comes from. A fetch must not block the caller;
/// the outcome is delivered on the returned channel.
pub trait ScoreSource {
    fn start_fetch(&self) -> Receiver<FetchResult>;
}

/// Reads `GET <url>` on a worker thread.
#[derive(Debug, Clone)]
pub struct HttpScoreSource {
    url: String,
}

impl HttpScoreSource {
    pub fn new(url: impl Into<String>) -> Self { Self { url: url.into() } }
}

fn fetch_blocking(url: &str) -> FetchResult {
    let client = reqwest::blocking::Client::builder()
        .timeout(Duration::from_secs(8))
        .build()?;
    let response = client.get(url).send()?;
    if !response.status().is_success() {
        return Err(ScoreFetchError::Status(response.status().as_u16()));
    }
    Ok(response.json::<Vec<ScoreEntry>>()?)
}

impl ScoreSource for HttpScoreSource {
    fn start_fetch(&self) -> Receiver<FetchResult> {
        let (tx, rx) = mpsc::channel();
        let url = self.url.clone();
        thread::spawn(move || {
            let _ = tx.send(fetch_blocking(&url));
        });
        rx
    }
}

/// Rate-limited cache of the remote leaderboard.
pub struct ScoreCache {
    source: Box<dyn ScoreSource>,
    entries: Vec<ScoreEntry>,
    last_fetch: Option<f64>,
    pending: Option<(f64, Receiver<FetchResult>)>,
}

impl ScoreCache {
    pub fn new(source: Box<dyn ScoreSource>) -> Self {
        Self { source, entries: Vec::new(), last_fetch: None, pending: None }
    }

    pub fn entries(&self) -> &[ScoreEntry] { &self.entries }

    pub fn is_loading(&self) -> bool { self.pending.is_some() }

    /// Safe to call every frame: collects a finished request, and starts a new
    /// one only when none is in flight and the cooldown since the last
    /// successful fetch has passed. Failures do not start the cooldown.
    pub fn refresh(&mut self, now: f64) {
        self.poll();
        if self.pending.is_some() {
            return;
        }
        if let Some(last) = self.last_fetch {
            if now - last < FETCH_COOLDOWN_MS {
                return;
            }
        }

        debug!(now, "requesting scores");
        self.pending = Some((now, self.source.start_fetch()));
        self.poll();
    }

    fn poll(&mut self) {
        let Some((started, rx)) = &self.pending else { return };
        let started = *started;
        let outcome = match rx.try_recv() {
            Ok(outcome) => outcome,
            Err(TryRecvError::Empty) => return,
            Err(TryRecvError::Disconnected) => Err(ScoreFetchError::Dropped),
        };
        self.pending = None;

        match outcome {
            Ok(list) => {
                self.last_fetch = Some(started);
                self.entries = list
                    .into_iter()
                    .enumerate()
                    .map(|(i, entry)| ScoreEntry { rank: Some(i + 1), ..entry })
                    .collect();
            }
            Err(err) => error!(%err, "error fetching scores"),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::cell::{Cell, RefCell};
    use std::rc::Rc;
    use std::sync::mpsc::Sender;

    use super::*;

    /// Answers from a queue of canned replies, counting requests.
    #[derive(Clone, Default)]
    struct CannedSource {
        requests: Rc<Cell<usize>>,
        replies: Rc<RefCell<Vec<FetchResult>>>,
        held: Rc<RefCell<Vec<Sender<FetchResult>>>>,
    }

    impl CannedSource {
        fn reply(&self, result: FetchResult) { self.replies.borrow_mut().push(result); }
    }

    impl ScoreSource for CannedSource {
        fn start_fetch(&self) -> Receiver<FetchResult> {
            self.requests.set(self.requests.get() + 1);
            let (tx, rx) = mpsc::channel();
            let mut replies = self.replies.borrow_mut();
            if replies.is_empty() {
                // leave the request in flight
                self.held.borrow_mut().push(tx);
            } else {
                let _ = tx.send(replies.remove(0));
            }
            rx
        }
    }

    fn entries(names: &[(&str, i64)]) -> Vec<ScoreEntry> {
        names.iter().map(|(n, s)| ScoreEntry::new(*n, *s)).collect()
    }

    #[test]
    fn calls_within_cooldown_issue_one_request() {
        let source = CannedSource::default();
        source.reply(Ok(entries(&[("Ada", 42)])));
        source.reply(Ok(entries(&[("Bob", 7)])));
        let mut cache = ScoreCache::new(Box::new(source.clone()));

        cache.refresh(1000.0);
        cache.refresh(5999.0);
        assert_eq!(source.requests.get(), 1);

        cache.refresh(6001.0);
        assert_eq!(source.requests.get(), 2);
        assert_eq!(cache.entries()[0].name, "Bob");
    }

    #[test]
    fn success_replaces_list_and_assigns_ranks() {
        let source = CannedSource::default();
        source.reply(Ok(entries(&[("Ada", 42), ("Bob", 30), ("Cy", 30)])));
        let mut cache = ScoreCache::new(Box::new(source));

        cache.refresh(0.0);

        let ranks: Vec<_> = cache.entries().iter().map(|e| (e.name.as_str(), e.rank)).collect();
        assert_eq!(ranks, vec![("Ada", Some(1)), ("Bob", Some(2)), ("Cy", Some(3))]);
    }

    #[test]
    fn failure_keeps_previous_entries() {
        let source = CannedSource::default();
        source.reply(Ok(entries(&[("Ada", 42)])));
        source.reply(Err(ScoreFetchError::Status(500)));
        let mut cache = ScoreCache::new(Box::new(source.clone()));

        cache.refresh(0.0);
        cache.refresh(FETCH_COOLDOWN_MS + 1.0);

        assert_eq!(source.requests.get(), 2);
        assert_eq!(cache.entries(), &[ScoreEntry { rank: Some(1), ..ScoreEntry::new("Ada", 42) }]);
    }

    #[test]
    fn failure_does_not_start_cooldown() {
        let source = CannedSource::default();
        source.reply(Err(ScoreFetchError::Status(503)));
        source.reply(Ok(entries(&[("Ada", 42)])));
        let mut cache = ScoreCache::new(Box::new(source.clone()));

        cache.refresh(0.0);
        assert!(cache.entries().is_empty());
        cache.refresh(100.0);

        assert_eq!(source.requests.get(), 2);
        assert_eq!(cache.entries()[0].name, "Ada");

        // the success at t=100 now gates further requests
        cache.refresh(200.0);
        assert_eq!(source.requests.get(), 2);
    }

    #[test]
    fn in_flight_request_is_not_duplicated() {
        let source = CannedSource::default();
        let mut cache = ScoreCache::new(Box::new(source.clone()));

        cache.refresh(0.0);
        assert!(cache.is_loading());
        cache.refresh(FETCH_COOLDOWN_MS * 3.0);
        assert_eq!(source.requests.get(), 1);

        let tx = source.held.borrow_mut().remove(0);
        tx.send(Ok(entries(&[("Late", 1)]))).unwrap();
        cache.refresh(FETCH_COOLDOWN_MS * 3.0 + 1.0);

        assert_eq!(cache.entries()[0].name, "Late");
        // the cooldown counts from when the successful request started
        assert_eq!(source.requests.get(), 2);
    }

    #[test]
    fn dropped_request_is_retried() {
        let source = CannedSource::default();
        let mut cache = ScoreCache::new(Box::new(source.clone()));

        cache.refresh(0.0);
        source.held.borrow_mut().clear();
        cache.refresh(1.0);

        assert_eq!(source.requests.get(), 2);
        assert!(cache.is_loading());
        assert!(cache.entries().is_empty());
    }

    #[test]
    fn entries_decode_from_server_rows() {
        let rows = r#"[{"name":"Ada","score":42,"created_at":"2026-01-01T00:00:00Z"}]"#;
        let parsed: Vec<ScoreEntry> = serde_json::from_str(rows).unwrap();
        assert_eq!(parsed, vec![ScoreEntry::new("Ada", 42)]);
    }
}
