//! Aggregation controller: initial catalog load, search lifecycle, reload.
//!
//! The controller is the only writer of [`ViewState`]. Every write goes
//! through one mutex; network calls are awaited outside of it. Two
//! generation counters decide whether a response that arrives late may
//! still touch state:
//!
//! - `load_generation` is bumped by every load and reload, so responses of an
//!   abandoned load are dropped.
//! - `search_generation` is bumped when a search is issued, so only the most
//!   recently issued search may write `search` (last-issued wins).

use std::{future::Future, num::NonZeroU32, sync::Arc, time::Duration};

use futures::future::join3;
use shared::{domain::Category, protocol::CatalogItem};
use tokio::{
    sync::{broadcast, Mutex},
    task::JoinHandle,
};
use tracing::{debug, info, warn};

use crate::{
    error::FetchError,
    view_state::{LoadPhase, SearchStatus, ViewState},
    CatalogApi,
};

/// Only the first page of each list is ever requested.
pub const FIRST_PAGE: NonZeroU32 = NonZeroU32::MIN;

/// Upper bound on any single request, independent of the client in use.
pub const DEFAULT_REQUEST_DEADLINE: Duration = Duration::from_secs(30);

const EVENT_CAPACITY: usize = 256;

#[derive(Debug, Clone)]
pub enum ControllerEvent {
    LoadPhaseChanged(LoadPhase),
    CategorySettled {
        category: Category,
        outcome: Result<usize, FetchError>,
    },
    FeaturedSelected(CatalogItem),
    SearchStarted {
        query: String,
    },
    SearchSettled {
        query: String,
        status: SearchStatus,
    },
    SearchSuperseded {
        query: String,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchOutcome {
    /// Empty or whitespace-only query; nothing was sent or changed.
    Rejected,
    /// The response was written to state with the given status.
    Applied(SearchStatus),
    /// A newer search was issued before this one finished; its response was dropped.
    Superseded,
}

/// A search that has been issued (state is `Pending`) but not yet sent.
#[derive(Debug)]
pub struct SearchTicket {
    generation: u64,
    query: String,
}

struct ControllerState {
    view: ViewState,
    load_generation: u64,
    search_generation: u64,
}

pub struct AggregationController {
    api: Arc<dyn CatalogApi>,
    request_deadline: Duration,
    inner: Mutex<ControllerState>,
    events: broadcast::Sender<ControllerEvent>,
}

impl AggregationController {
    pub fn new(api: Arc<dyn CatalogApi>) -> Arc<Self> {
        Self::new_with_request_deadline(api, DEFAULT_REQUEST_DEADLINE)
    }

    pub fn new_with_request_deadline(
        api: Arc<dyn CatalogApi>,
        request_deadline: Duration,
    ) -> Arc<Self> {
        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        Arc::new(Self {
            api,
            request_deadline,
            inner: Mutex::new(ControllerState {
                view: ViewState::default(),
                load_generation: 0,
                search_generation: 0,
            }),
            events,
        })
    }

    pub fn subscribe_events(&self) -> broadcast::Receiver<ControllerEvent> {
        self.events.subscribe()
    }

    pub async fn snapshot(&self) -> ViewState {
        self.inner.lock().await.view.clone()
    }

    /// Runs the initial load: the three popular lists are requested
    /// concurrently and each response is applied as soon as it arrives. Returns
    /// once all three have settled.
    ///
    /// The requests run on their own task, so dropping the returned future
    /// does not leave the view stuck in [`LoadPhase::Loading`].
    ///
    /// Only valid from [`LoadPhase::Idle`]; otherwise it does nothing and returns
    /// the current phase. Use [`Self::reload`] to start over.
    pub async fn load(self: &Arc<Self>) -> LoadPhase {
        let generation = {
            let mut inner = self.inner.lock().await;
            if inner.view.phase != LoadPhase::Idle {
                warn!(
                    phase = ?inner.view.phase,
                    "catalog: initial load already started; ignoring (reload to start over)"
                );
                return inner.view.phase;
            }
            inner.load_generation += 1;
            inner.view.phase = LoadPhase::Loading;
            self.emit(ControllerEvent::LoadPhaseChanged(LoadPhase::Loading));
            inner.load_generation
        };
        info!(generation, "catalog: initial load started");

        let controller = Arc::clone(self);
        let settled = tokio::spawn(async move { controller.settle_load(generation).await });
        match settled.await {
            Ok(phase) => phase,
            Err(err) => {
                warn!(generation, error = %err, "catalog: initial load task failed");
                self.inner.lock().await.view.phase
            }
        }
    }

    /// Discards the whole view state (lists, featured item, search) and runs
    /// the initial load again from `Idle`. Responses still in flight from
    /// before the reload are ignored.
    pub async fn reload(self: &Arc<Self>) -> LoadPhase {
        {
            let mut inner = self.inner.lock().await;
            inner.load_generation += 1;
            inner.search_generation += 1;
            inner.view = ViewState::default();
            self.emit(ControllerEvent::LoadPhaseChanged(LoadPhase::Idle));
        }
        info!("catalog: reload requested");
        self.load().await
    }

    /// Issues a search and waits for it to settle.
    pub async fn search(&self, query: &str) -> SearchOutcome {
        match self.begin_search(query).await {
            Some(ticket) => self.run_search(ticket).await,
            None => SearchOutcome::Rejected,
        }
    }

    /// Issues a search and sends it in the background. Issue order is fixed
    /// when this returns, so a later `submit_search` always supersedes this one.
    /// Returns `None` for an empty query.
    pub async fn submit_search(self: &Arc<Self>, query: &str) -> Option<JoinHandle<SearchOutcome>> {
        let ticket = self.begin_search(query).await?;
        let controller = Arc::clone(self);
        Some(tokio::spawn(async move { controller.run_search(ticket).await }))
    }

    /// Moves search to `Pending` for `query` and reserves its generation.
    pub async fn begin_search(&self, query: &str) -> Option<SearchTicket> {
        let query = query.trim();
        if query.is_empty() {
            debug!("catalog: empty search query ignored");
            return None;
        }

        let mut inner = self.inner.lock().await;
        inner.search_generation += 1;
        let generation = inner.search_generation;
        inner.view.search.begin(query);
        self.emit(ControllerEvent::SearchStarted {
            query: query.to_string(),
        });
        debug!(generation, query, "catalog: search issued");

        Some(SearchTicket {
            generation,
            query: query.to_string(),
        })
    }

    pub async fn run_search(&self, ticket: SearchTicket) -> SearchOutcome {
        let result = self
            .bounded(self.api.search(&ticket.query, FIRST_PAGE))
            .await;

        let mut inner = self.inner.lock().await;
        if inner.search_generation != ticket.generation {
            debug!(
                query = %ticket.query,
                generation = ticket.generation,
                current = inner.search_generation,
                "catalog: superseded search response dropped"
            );
            self.emit(ControllerEvent::SearchSuperseded {
                query: ticket.query,
            });
            return SearchOutcome::Superseded;
        }

        let status = inner.view.search.settle(result);
        match &inner.view.search.error {
            Some(err) => warn!(query = %ticket.query, error = %err, "catalog: search failed"),
            None => info!(
                query = %ticket.query,
                results = inner.view.search.results.len(),
                "catalog: search settled"
            ),
        }
        self.emit(ControllerEvent::SearchSettled {
            query: ticket.query,
            status,
        });
        SearchOutcome::Applied(status)
    }

    async fn settle_load(&self, generation: u64) -> LoadPhase {
        join3(
            self.settle_category(generation, Category::Movies),
            self.settle_category(generation, Category::Tv),
            self.settle_category(generation, Category::People),
        )
        .await;

        let mut inner = self.inner.lock().await;
        if inner.load_generation != generation {
            debug!(generation, "catalog: load abandoned by reload");
            return inner.view.phase;
        }
        let phase = inner.view.finish_load();
        self.emit(ControllerEvent::LoadPhaseChanged(phase));
        info!(?phase, "catalog: initial load settled");
        phase
    }

    async fn settle_category(&self, generation: u64, category: Category) {
        debug!(%category, "catalog: requesting popular list");
        let result = self
            .bounded(self.api.fetch_popular(category, FIRST_PAGE))
            .await;

        let mut inner = self.inner.lock().await;
        if inner.load_generation != generation {
            debug!(%category, generation, "catalog: stale popular response dropped");
            return;
        }

        let applied = inner.view.apply_popular(category, result);
        match &applied.outcome {
            Ok(count) => info!(%category, count, "catalog: popular list loaded"),
            Err(err) => warn!(
                %category,
                error = %err,
                "catalog: popular list failed; showing it empty"
            ),
        }
        self.emit(ControllerEvent::CategorySettled {
            category,
            outcome: applied.outcome,
        });
        if let Some(featured) = applied.featured {
            debug!(id = featured.id.0, "catalog: featured item selected");
            self.emit(ControllerEvent::FeaturedSelected(featured));
        }
    }

    async fn bounded<T>(
        &self,
        request: impl Future<Output = Result<T, FetchError>>,
    ) -> Result<T, FetchError> {
        match tokio::time::timeout(self.request_deadline, request).await {
            Ok(result) => result,
            Err(_) => Err(FetchError::network(format!(
                "request timed out after {:?}",
                self.request_deadline
            ))),
        }
    }

    // Called with the state lock held so event order matches write order.
    fn emit(&self, event: ControllerEvent) {
        let _ = self.events.send(event);
    }
}

#[cfg(test)]
#[path = "tests/controller_tests.rs"]
mod tests;
