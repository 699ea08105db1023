//! The messaging list: the signed-in client's active connections.

use std::sync::Arc;

use profesionales_core::{text, MessagingList, Route, SessionStore};
use profesionales_types::{Connection, ConnectionId};

use super::ScreenError;
use crate::gateway::Gateway;
use crate::nav::Navigator;

/// The messaging screen.
pub struct MessagingScreen {
    gateway: Arc<dyn Gateway>,
    session: SessionStore,
    navigator: Arc<dyn Navigator>,
    list: MessagingList,
}

impl MessagingScreen {
    pub(crate) fn new(
        gateway: Arc<dyn Gateway>,
        session: SessionStore,
        navigator: Arc<dyn Navigator>,
    ) -> Self {
        Self {
            gateway,
            session,
            navigator,
            list: MessagingList::new(),
        }
    }

    /// Screen gained focus: refetch.
    pub async fn on_enter(&mut self) -> Result<&[Connection], ScreenError> {
        self.refresh().await
    }

    /// Fetch the client's connections (pull-to-refresh).
    ///
    /// Logged out users are sent to Login. A failed fetch keeps the
    /// previous list.
    pub async fn refresh(&mut self) -> Result<&[Connection], ScreenError> {
        let identity = match self.session.require() {
            Ok(identity) => identity,
            Err(e) => {
                self.navigator.navigate(Route::Login);
                return Err(e.into());
            }
        };

        self.list.begin_refresh();
        match self.gateway.client_connections(&identity.id).await {
            Ok(connections) => {
                tracing::debug!(client = %identity.id, count = connections.len(), "Connections loaded");
                self.list.apply(connections);
                Ok(self.list.connections())
            }
            Err(e) => {
                tracing::warn!(client = %identity.id, error = %e, "Failed to load connections");
                self.list.fail();
                Err(ScreenError::backend(e, text::CONNECTIONS_FAILED))
            }
        }
    }

    /// Filter by professional name or profession. Never refetches.
    pub fn set_filter(&mut self, query: &str) {
        self.list.set_filter(query);
    }

    /// Connections matching the filter.
    pub fn visible(&self) -> Vec<&Connection> {
        self.list.visible()
    }

    /// Underlying list state.
    pub fn list(&self) -> &MessagingList {
        &self.list
    }

    /// Open the conversation for a connection.
    pub fn open_chat(&self, connection_id: ConnectionId) {
        self.navigator.navigate(Route::Chat { connection_id });
    }

    /// Delete a connection and drop it from the list.
    pub async fn disconnect(&mut self, connection_id: &ConnectionId) -> Result<(), ScreenError> {
        self.gateway
            .delete_connection(connection_id)
            .await
            .map_err(|e| ScreenError::backend(e, text::DISCONNECT_FAILED))?;
        self.list.remove(connection_id);
        Ok(())
    }
}
