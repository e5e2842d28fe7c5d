//! In-process [`Fetcher`] with per-id scripted responses and concurrency
//! instrumentation.

use std::collections::HashMap;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use icon_audit::{FetchError, FetchResponse, Fetcher};

/// Template whose URLs [`ScriptedFetcher`] can map back to ids.
pub const TEMPLATE: &str = "http://icons.test/apps/icons/100/{id}/icon.png";

/// Canned behavior for one id.
#[derive(Debug, Clone)]
pub enum Script {
    /// Respond with this status and body.
    Respond(u16, Vec<u8>),
    /// Fail at the connection level.
    TransportError,
}

/// Scripted transport that counts calls and concurrent in-flight fetches.
#[derive(Debug)]
pub struct ScriptedFetcher {
    scripts: HashMap<u32, Script>,
    fallback: Script,
    delay: Duration,
    in_flight: AtomicUsize,
    peak: AtomicUsize,
    calls: Mutex<Vec<u32>>,
}

impl ScriptedFetcher {
    /// Every id gets `fallback` unless scripted otherwise.
    #[must_use]
    pub fn new(fallback: Script) -> Self {
        Self {
            scripts: HashMap::new(),
            fallback,
            delay: Duration::ZERO,
            in_flight: AtomicUsize::new(0),
            peak: AtomicUsize::new(0),
            calls: Mutex::new(Vec::new()),
        }
    }

    #[must_use]
    pub fn script(mut self, id: u32, script: Script) -> Self {
        self.scripts.insert(id, script);
        self
    }

    /// Holds every fetch for `delay` so that tasks overlap.
    #[must_use]
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    /// Highest number of fetches observed in flight at once.
    #[must_use]
    pub fn peak_in_flight(&self) -> usize {
        self.peak.load(Ordering::SeqCst)
    }

    /// Ids fetched, in call order.
    #[must_use]
    pub fn calls(&self) -> Vec<u32> {
        self.calls
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .clone()
    }
}

fn id_from_url(url: &str) -> u32 {
    url.trim_end_matches("/icon.png")
        .rsplit('/')
        .next()
        .and_then(|segment| segment.parse().ok())
        .unwrap_or_else(|| panic!("unexpected url {url}"))
}

#[async_trait]
impl Fetcher for ScriptedFetcher {
    async fn fetch(&self, url: &str) -> Result<FetchResponse, FetchError> {
        let id = id_from_url(url);
        self.calls
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .push(id);

        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak.fetch_max(now, Ordering::SeqCst);
        if self.delay.is_zero() {
            tokio::task::yield_now().await;
        } else {
            tokio::time::sleep(self.delay).await;
        }
        self.in_flight.fetch_sub(1, Ordering::SeqCst);

        match self.scripts.get(&id).unwrap_or(&self.fallback) {
            Script::Respond(status, body) => Ok(FetchResponse::new(*status, body.clone())),
            Script::TransportError => Err(FetchError::transport(
                url,
                std::io::Error::new(std::io::ErrorKind::ConnectionRefused, "connection refused"),
            )),
        }
    }
}
