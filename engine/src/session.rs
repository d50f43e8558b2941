//! Per-client search session: latest input wins, pages follow the current query

use crate::error::AyatError;
use crate::query::ParsedQuery;
use crate::search::ResultSet;
use crate::state::{AppState, SearchPage};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

/// What became of one input
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// Page 1 of the new query
    Page(SearchPage),
    /// Same validated query as the previous input; nothing was recomputed
    Unchanged,
    /// A newer input arrived while this one was running
    Superseded,
}

#[derive(Default)]
struct Current {
    /// Last input accepted, whether or not its results arrived yet
    last_query: Option<ParsedQuery>,
    /// Query and results currently on display
    shown: Option<(ParsedQuery, Arc<ResultSet>)>,
    page: usize,
}

struct Pending {
    ticket: u64,
    query: ParsedQuery,
}

pub struct SearchSession {
    state: Arc<AppState>,
    latest: AtomicU64,
    current: Mutex<Current>,
}

impl SearchSession {
    pub fn new(state: Arc<AppState>) -> Self {
        Self { state, latest: AtomicU64::new(0), current: Mutex::new(Current::default()) }
    }

    /// Run a new input. The corpus it needs is loaded on first use.
    pub async fn input(&self, raw: &str) -> Result<Outcome, AyatError> {
        let Some(pending) = self.begin(raw) else {
            return Ok(Outcome::Unchanged);
        };

        let results = self.compute(&pending.query).await;
        self.commit(pending, results)
    }

    /// Show another page of the current query, clamped into range
    pub fn goto_page(&self, page: usize) -> Result<Option<SearchPage>, AyatError> {
        let mut current = self.lock();
        let Some((query, results)) = current.shown.clone() else {
            return Ok(None);
        };
        let rendered = self.state.render(&query, &results, page)?;
        current.page = rendered.page;
        Ok(Some(rendered))
    }

    pub fn current_page(&self) -> usize {
        self.lock().page
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Current> {
        self.current.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn begin(&self, raw: &str) -> Option<Pending> {
        let query = ParsedQuery::parse(raw);
        let mut current = self.lock();
        if current.last_query.as_ref() == Some(&query) {
            return None;
        }
        current.last_query = Some(query.clone());
        let ticket = self.latest.fetch_add(1, Ordering::SeqCst) + 1;
        Some(Pending { ticket, query })
    }

    async fn compute(&self, query: &ParsedQuery) -> Result<Arc<ResultSet>, AyatError> {
        if let Some(variant) = query.variant() {
            self.state.load(variant).await?;
        }
        self.state.results(query)
    }

    fn commit(
        &self,
        pending: Pending,
        results: Result<Arc<ResultSet>, AyatError>,
    ) -> Result<Outcome, AyatError> {
        let mut current = self.lock();
        if pending.ticket != self.latest.load(Ordering::SeqCst) {
            tracing::debug!(ticket = pending.ticket, "discarding superseded query");
            return Ok(Outcome::Superseded);
        }

        let results = match results {
            Ok(results) => results,
            Err(e) => {
                // let the same input be retried
                current.last_query = None;
                return Err(e);
            }
        };

        let page = self.state.render(&pending.query, &results, 1)?;
        current.page = 1;
        current.shown = pending.query.is_valid().then(|| (pending.query, results));
        Ok(Outcome::Page(page))
    }
}
