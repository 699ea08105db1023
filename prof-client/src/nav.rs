//! Navigation seam.
//!
//! Screens and the connection workflow ask a [`Navigator`] to move; the
//! host (a UI shell, the CLI, a test) decides what moving means.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use profesionales_core::Route;

/// Carries out navigation requests.
pub trait Navigator: Send + Sync {
    /// Navigate to `route`.
    fn navigate(&self, route: Route);
}

/// Navigator that only logs.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogNavigator;

impl Navigator for LogNavigator {
    fn navigate(&self, route: Route) {
        tracing::info!(screen = route.name(), ?route, "Navigate");
    }
}

/// Navigator that records every request, for tests.
#[derive(Debug, Clone, Default)]
pub struct RecordingNavigator {
    routes: Arc<Mutex<Vec<Route>>>,
}

impl RecordingNavigator {
    /// Create an empty recorder.
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, Vec<Route>> {
        self.routes.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// All routes navigated to, oldest first.
    pub fn routes(&self) -> Vec<Route> {
        self.lock().clone()
    }

    /// The most recent route.
    pub fn last(&self) -> Option<Route> {
        self.lock().last().cloned()
    }
}

impl Navigator for RecordingNavigator {
    fn navigate(&self, route: Route) {
        tracing::debug!(screen = route.name(), "Navigate");
        self.lock().push(route);
    }
}
