//! Professional search with debounce and out-of-order protection.
//!
//! Every keystroke updates the query and starts a debounce timer. When the
//! timer fires and no newer keystroke arrived, the search is sent. Requests
//! already in flight are not cancelled; their answers are sequence-checked
//! by [`SearchState`] instead.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use tokio::task::JoinHandle;

use profesionales_core::{text, Route, SearchState, SearchTicket, SearchView};
use profesionales_types::{ProfessionalProfile, UserId};

use super::ScreenError;
use crate::gateway::Gateway;
use crate::nav::Navigator;

/// The search screen.
pub struct SearchScreen {
    gateway: Arc<dyn Gateway>,
    navigator: Arc<dyn Navigator>,
    debounce: Duration,
    state: Arc<Mutex<SearchState>>,
    tasks: Mutex<Vec<JoinHandle<()>>>,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

async fn run(
    gateway: &dyn Gateway,
    state: &Mutex<SearchState>,
    ticket: SearchTicket,
) -> Result<Vec<ProfessionalProfile>, ScreenError> {
    let result = gateway.search_professionals(&ticket.term).await;

    let mut state = lock(state);
    match result {
        Ok(results) => {
            if !state.apply(ticket.seq, results.clone()) {
                tracing::debug!(term = %ticket.term, seq = ticket.seq, "Discarding stale search results");
            }
            Ok(results)
        }
        Err(e) => {
            let err = ScreenError::backend(e, text::SEARCH_FAILED);
            if !state.fail(ticket.seq, err.to_string()) {
                tracing::debug!(term = %ticket.term, seq = ticket.seq, "Discarding stale search failure");
            }
            Err(err)
        }
    }
}

impl SearchScreen {
    pub(crate) fn new(
        gateway: Arc<dyn Gateway>,
        navigator: Arc<dyn Navigator>,
        debounce: Duration,
    ) -> Self {
        Self {
            gateway,
            navigator,
            debounce,
            state: Arc::new(Mutex::new(SearchState::new())),
            tasks: Mutex::new(Vec::new()),
        }
    }

    /// A keystroke: update the query and search after the debounce period.
    pub fn type_query(&self, query: &str) {
        let Some(ticket) = lock(&self.state).set_query(query) else {
            return;
        };

        let gateway = Arc::clone(&self.gateway);
        let state = Arc::clone(&self.state);
        let debounce = self.debounce;
        let handle = tokio::spawn(async move {
            tokio::time::sleep(debounce).await;
            if lock(&state).latest() != ticket.seq {
                return;
            }
            tracing::debug!(term = %ticket.term, seq = ticket.seq, "Searching");
            // Failures are recorded in the state for the view
            let _ = run(gateway.as_ref(), &state, ticket).await;
        });

        let mut tasks = lock(&self.tasks);
        tasks.retain(|task| !task.is_finished());
        tasks.push(handle);
    }

    /// Search immediately, without debounce.
    ///
    /// An empty query shows the prompt and sends nothing.
    pub async fn search(&self, query: &str) -> Result<Vec<ProfessionalProfile>, ScreenError> {
        let Some(ticket) = lock(&self.state).set_query(query) else {
            return Ok(Vec::new());
        };
        run(self.gateway.as_ref(), &self.state, ticket).await
    }

    /// Current query.
    pub fn query(&self) -> String {
        lock(&self.state).query().to_string()
    }

    /// Results currently on screen.
    pub fn results(&self) -> Vec<ProfessionalProfile> {
        lock(&self.state).results().to_vec()
    }

    /// True while a newer search is pending.
    pub fn is_loading(&self) -> bool {
        lock(&self.state).is_loading()
    }

    /// Render with the current view.
    pub fn with_view<R>(&self, render: impl FnOnce(SearchView<'_>) -> R) -> R {
        render(lock(&self.state).view())
    }

    /// Open a result card.
    pub fn open(&self, id: UserId) {
        self.navigator.navigate(Route::ProfessionalProfile { id });
    }
}

impl Drop for SearchScreen {
    fn drop(&mut self) {
        for task in lock(&self.tasks).drain(..) {
            task.abort();
        }
    }
}
