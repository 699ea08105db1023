//! Full professionals listing with pull-to-refresh.

use std::sync::Arc;

use profesionales_core::{text, Route};
use profesionales_types::{ProfessionalProfile, UserId};

use super::ScreenError;
use crate::gateway::Gateway;
use crate::nav::Navigator;

/// The professionals list screen.
pub struct ProfessionalsScreen {
    gateway: Arc<dyn Gateway>,
    navigator: Arc<dyn Navigator>,
    professionals: Vec<ProfessionalProfile>,
    loading: bool,
}

impl ProfessionalsScreen {
    pub(crate) fn new(gateway: Arc<dyn Gateway>, navigator: Arc<dyn Navigator>) -> Self {
        Self {
            gateway,
            navigator,
            professionals: Vec::new(),
            loading: false,
        }
    }

    /// Fetch the list (initial load and pull-to-refresh alike).
    ///
    /// A failed fetch keeps whatever was shown before.
    pub async fn refresh(&mut self) -> Result<&[ProfessionalProfile], ScreenError> {
        self.loading = true;
        let result = self.gateway.list_professionals().await;
        self.loading = false;

        match result {
            Ok(professionals) => {
                tracing::debug!(count = professionals.len(), "Professionals loaded");
                self.professionals = professionals;
                Ok(&self.professionals)
            }
            Err(e) => {
                tracing::warn!(error = %e, "Failed to load professionals");
                Err(ScreenError::backend(e, text::PROFESSIONALS_FAILED))
            }
        }
    }

    /// Professionals on screen.
    pub fn professionals(&self) -> &[ProfessionalProfile] {
        &self.professionals
    }

    /// True while fetching.
    pub fn is_loading(&self) -> bool {
        self.loading
    }

    /// Open a professional's profile.
    pub fn open(&self, id: UserId) {
        self.navigator.navigate(Route::ProfessionalProfile { id });
    }
}
