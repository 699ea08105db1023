//! ConnectionWorkflow - connect/disconnect for one profile screen.
//!
//! # Architecture
//!
//! The workflow uses the pure state machine from prof-core for the
//! connection logic and interprets its actions to perform the actual I/O:
//! backend calls through the [`Gateway`], the delayed redirect as a spawned
//! tokio task, and navigation through the [`Navigator`].
//!
//! ```text
//! ProfileScreen → ConnectionWorkflow → Gateway → Backend
//!                        ↓
//!              prof-core (pure state machine)
//! ```
//!
//! Results of backend calls started during an earlier visit are dropped,
//! so a slow check from a previous profile never lands on the current one.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex as StdMutex, MutexGuard, PoisonError};
use std::time::Duration;

use tokio::sync::Mutex;
use tokio::task::JoinHandle;

use profesionales_core::{
    text, Action, ConnectionState, Event, Pair, Route, SessionStore, WorkflowEvent,
};
use profesionales_types::{CreateConnectionRequest, UserId};

use crate::gateway::Gateway;
use crate::nav::Navigator;

/// Drives the connection state machine for a (client, professional) pair.
pub struct ConnectionWorkflow {
    gateway: Arc<dyn Gateway>,
    session: SessionStore,
    navigator: Arc<dyn Navigator>,
    redirect_delay: Duration,
    state: Mutex<ConnectionState>,
    professional: StdMutex<Option<UserId>>,
    visit: AtomicU64,
    redirect: StdMutex<Option<JoinHandle<()>>>,
    events: StdMutex<Vec<WorkflowEvent>>,
}

fn lock<T>(mutex: &StdMutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

impl ConnectionWorkflow {
    /// Create a workflow. `redirect_delay` is the pause between the
    /// "connected" banner and the redirect to Messages.
    pub fn new(
        gateway: Arc<dyn Gateway>,
        session: SessionStore,
        navigator: Arc<dyn Navigator>,
        redirect_delay: Duration,
    ) -> Self {
        Self {
            gateway,
            session,
            navigator,
            redirect_delay,
            state: Mutex::new(ConnectionState::new()),
            professional: StdMutex::new(None),
            visit: AtomicU64::new(0),
            redirect: StdMutex::new(None),
            events: StdMutex::new(Vec::new()),
        }
    }

    /// Current state.
    pub async fn state(&self) -> ConnectionState {
        self.state.lock().await.clone()
    }

    /// Professional of the current visit.
    pub fn professional(&self) -> Option<UserId> {
        lock(&self.professional).clone()
    }

    /// Drain the events surfaced since the last call.
    pub fn take_events(&self) -> Vec<WorkflowEvent> {
        std::mem::take(&mut *lock(&self.events))
    }

    /// True while a redirect is scheduled and has not fired.
    pub fn redirect_pending(&self) -> bool {
        lock(&self.redirect)
            .as_ref()
            .is_some_and(|handle| !handle.is_finished())
    }

    fn client(&self) -> Option<UserId> {
        self.session.current().map(|identity| identity.id.clone())
    }

    /// Enter (or re-enter) the profile of `professional`.
    ///
    /// Resets to Unknown and re-checks the pair with the backend.
    pub async fn enter(&self, professional: UserId) -> ConnectionState {
        self.visit.fetch_add(1, Ordering::SeqCst);
        *lock(&self.professional) = Some(professional.clone());
        tracing::debug!(%professional, "Entering profile");

        self.dispatch(Event::Entered {
            client: self.client(),
            professional: Some(professional),
        })
        .await;
        self.state().await
    }

    /// Connect the signed-in client with the current professional.
    pub async fn connect(&self) -> ConnectionState {
        self.dispatch(Event::ConnectRequested {
            client: self.client(),
            professional: self.professional(),
        })
        .await;
        self.state().await
    }

    /// Tear down the current connection.
    pub async fn disconnect(&self) -> ConnectionState {
        self.dispatch(Event::DisconnectRequested).await;
        self.state().await
    }

    /// Leave the screen. Any pending redirect is cancelled.
    pub async fn leave(&self) {
        self.visit.fetch_add(1, Ordering::SeqCst);
        self.dispatch(Event::Left).await;
        *lock(&self.professional) = None;
    }

    async fn dispatch(&self, event: Event) {
        let visit = self.visit.load(Ordering::SeqCst);
        let mut queue = VecDeque::from([event]);

        while let Some(event) = queue.pop_front() {
            if self.visit.load(Ordering::SeqCst) != visit {
                tracing::debug!(?event, "Dropping result from an earlier visit");
                return;
            }

            let actions = {
                let mut state = self.state.lock().await;
                let before = state.button_label();
                let (new_state, actions) = state.clone().on_event(event);
                if new_state.button_label() != before {
                    tracing::debug!(from = before, to = new_state.button_label(), "Connection state");
                }
                *state = new_state;
                actions
            };

            for action in actions {
                if let Some(next) = self.execute(action, visit).await {
                    queue.push_back(next);
                }
            }
        }
    }

    async fn execute(&self, action: Action, visit: u64) -> Option<Event> {
        match action {
            Action::CheckStatus { pair } => Some(self.check(&pair).await),
            Action::CreateConnection { pair } => Some(self.create(pair).await),
            Action::DeleteConnection { connection_id } => {
                match self.gateway.delete_connection(&connection_id).await {
                    Ok(()) => {
                        tracing::info!(%connection_id, "Connection deleted");
                        Some(Event::DisconnectSucceeded)
                    }
                    Err(e) => {
                        tracing::warn!(%connection_id, error = %e, "Disconnect failed");
                        Some(Event::DisconnectFailed {
                            message: e.user_message(text::DISCONNECT_FAILED),
                        })
                    }
                }
            }
            Action::ScheduleRedirect { route } => {
                self.schedule_redirect(route, visit);
                None
            }
            Action::CancelRedirect => {
                self.cancel_redirect();
                None
            }
            Action::Emit(event) => {
                tracing::debug!(?event, "Workflow event");
                lock(&self.events).push(event);
                None
            }
        }
    }

    async fn check(&self, pair: &Pair) -> Event {
        match self
            .gateway
            .check_connection(&pair.client, &pair.professional)
            .await
        {
            Ok(connection_id) => Event::CheckCompleted { connection_id },
            Err(e) => {
                tracing::warn!(professional = %pair.professional, error = %e, "Connection check failed");
                Event::CheckFailed {
                    error: e.to_string(),
                }
            }
        }
    }

    async fn create(&self, pair: Pair) -> Event {
        let request = CreateConnectionRequest {
            client_id: pair.client,
            professional_id: pair.professional,
        };
        match self.gateway.create_connection(&request).await {
            Ok(connection_id) => {
                tracing::info!(%connection_id, professional = %request.professional_id, "Connection created");
                Event::ConnectSucceeded { connection_id }
            }
            Err(e) if e.is_conflict() => {
                tracing::info!(professional = %request.professional_id, "Already connected");
                Event::AlreadyConnected
            }
            Err(e) => {
                tracing::warn!(professional = %request.professional_id, error = %e, "Connect failed");
                Event::ConnectFailed {
                    message: e.user_message(text::CONNECT_FAILED),
                }
            }
        }
    }

    /// Schedule the redirect unless `visit` is no longer current.
    ///
    /// The visit is re-checked under the redirect lock: `leave()` bumps the
    /// visit before cancelling, so a redirect either lands before the
    /// cancel and is aborted, or sees the new visit and is skipped.
    fn schedule_redirect(&self, route: Route, visit: u64) {
        let mut slot = lock(&self.redirect);
        if self.visit.load(Ordering::SeqCst) != visit {
            tracing::debug!(route = route.name(), "Screen left, redirect skipped");
            return;
        }

        let navigator = Arc::clone(&self.navigator);
        let delay = self.redirect_delay;
        let handle = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            navigator.navigate(route);
        });
        if let Some(previous) = slot.replace(handle) {
            previous.abort();
        }
    }

    fn cancel_redirect(&self) {
        if let Some(handle) = lock(&self.redirect).take() {
            if !handle.is_finished() {
                tracing::debug!("Cancelling pending redirect");
            }
            handle.abort();
        }
    }
}

impl Drop for ConnectionWorkflow {
    fn drop(&mut self) {
        if let Some(handle) = lock(&self.redirect).take() {
            handle.abort();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gateway::{GatewayCall, GatewayError, MockGateway};
    use crate::nav::RecordingNavigator;
    use profesionales_types::{ApiError, ConnectionId, Identity, ProfessionalFields, Role};

    const DELAY: Duration = Duration::from_millis(1500);

    fn client_identity() -> Identity {
        Identity {
            id: UserId::new("c1"),
            first_name: "Ana".into(),
            last_name: "López".into(),
            role: Role::Client,
            email: "ana@example.com".into(),
            phone: None,
            address: None,
            professional_fields: ProfessionalFields::default(),
        }
    }

    struct Harness {
        gateway: MockGateway,
        session: SessionStore,
        navigator: RecordingNavigator,
        workflow: ConnectionWorkflow,
    }

    fn harness() -> Harness {
        let gateway = MockGateway::seeded();
        let session = SessionStore::new();
        session.login(client_identity());
        let navigator = RecordingNavigator::new();
        let workflow = ConnectionWorkflow::new(
            Arc::new(gateway.clone()),
            session.clone(),
            Arc::new(navigator.clone()),
            DELAY,
        );
        Harness {
            gateway,
            session,
            navigator,
            workflow,
        }
    }

    fn p1() -> UserId {
        UserId::new("p1")
    }

    #[tokio::test]
    async fn enter_checks_and_resolves_disconnected() {
        let h = harness();
        let state = h.workflow.enter(p1()).await;

        assert_eq!(state, ConnectionState::Disconnected);
        assert_eq!(
            h.gateway.calls(),
            vec![GatewayCall::CheckConnection {
                client: UserId::new("c1"),
                professional: p1()
            }]
        );
    }

    #[tokio::test]
    async fn enter_logged_out_skips_check() {
        let h = harness();
        h.session.logout();

        let state = h.workflow.enter(p1()).await;

        assert_eq!(state, ConnectionState::Unknown);
        assert_eq!(state.button_label(), "Conectar");
        assert!(h.gateway.calls().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn connect_stores_id_and_redirects_after_delay() {
        let h = harness();
        h.gateway.queue_connection_id("conn1");
        h.workflow.enter(p1()).await;

        let state = h.workflow.connect().await;
        assert_eq!(
            state,
            ConnectionState::Connected {
                connection_id: ConnectionId::new("conn1")
            }
        );
        assert_eq!(
            h.workflow.take_events(),
            vec![WorkflowEvent::Connected {
                connection_id: ConnectionId::new("conn1")
            }]
        );

        // Banner first, redirect only after the delay
        assert!(h.navigator.routes().is_empty());
        assert!(h.workflow.redirect_pending());
        tokio::time::sleep(DELAY + Duration::from_millis(10)).await;
        assert_eq!(h.navigator.routes(), vec![Route::Messages]);
    }

    #[tokio::test]
    async fn check_after_connect_reports_same_id() {
        let h = harness();
        h.workflow.enter(p1()).await;
        let ConnectionState::Connected { connection_id } = h.workflow.connect().await else {
            panic!("expected connected");
        };

        let state = h.workflow.enter(p1()).await;
        assert_eq!(state.connection_id(), Some(&connection_id));
    }

    #[tokio::test]
    async fn check_after_disconnect_reports_disconnected() {
        let h = harness();
        h.workflow.enter(p1()).await;
        h.workflow.connect().await;

        let state = h.workflow.disconnect().await;
        assert_eq!(state, ConnectionState::Disconnected);

        let state = h.workflow.enter(p1()).await;
        assert_eq!(state, ConnectionState::Disconnected);
        assert!(h.gateway.connections().is_empty());
    }

    #[tokio::test]
    async fn connect_failure_reverts_with_server_message() {
        let h = harness();
        h.workflow.enter(p1()).await;
        h.gateway.fail_next(GatewayError::Api(ApiError::Rejected {
            status: 400,
            message: Some("Cliente bloqueado".into()),
        }));

        let state = h.workflow.connect().await;

        assert_eq!(state, ConnectionState::Disconnected);
        assert_eq!(
            h.workflow.take_events(),
            vec![WorkflowEvent::Failed {
                message: "Cliente bloqueado".into()
            }]
        );
        assert!(!h.workflow.redirect_pending());
    }

    #[tokio::test]
    async fn connect_network_failure_uses_generic_message() {
        let h = harness();
        h.workflow.enter(p1()).await;
        h.gateway.fail_next(GatewayError::Timeout);

        h.workflow.connect().await;
        assert_eq!(
            h.workflow.take_events(),
            vec![WorkflowEvent::Failed {
                message: text::NETWORK_ERROR.into()
            }]
        );
    }

    #[tokio::test]
    async fn duplicate_connect_rederives_connected_state() {
        let h = harness();
        // Connected from elsewhere (e.g. another device) after the check
        h.workflow.enter(p1()).await;
        h.gateway
            .create_connection(&CreateConnectionRequest {
                client_id: UserId::new("c1"),
                professional_id: p1(),
            })
            .await
            .unwrap();

        let state = h.workflow.connect().await;

        assert!(state.is_connected());
        assert_eq!(
            h.workflow.take_events(),
            vec![WorkflowEvent::AlreadyConnected]
        );
        assert!(!h.workflow.redirect_pending());
    }

    #[tokio::test]
    async fn disconnect_failure_reverts_to_connected() {
        let h = harness();
        h.workflow.enter(p1()).await;
        h.workflow.connect().await;
        h.workflow.take_events();

        h.gateway.fail_next(GatewayError::ConnectionFailed("reset".into()));
        let state = h.workflow.disconnect().await;

        assert!(state.is_connected());
        assert!(matches!(
            h.workflow.take_events().as_slice(),
            [WorkflowEvent::Failed { .. }]
        ));
        assert_eq!(h.gateway.connections().len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn leave_cancels_redirect() {
        let h = harness();
        h.workflow.enter(p1()).await;
        h.workflow.connect().await;
        assert!(h.workflow.redirect_pending());

        h.workflow.leave().await;
        tokio::time::sleep(DELAY * 2).await;

        assert!(h.navigator.routes().is_empty());
        assert_eq!(h.workflow.state().await, ConnectionState::Unknown);
        assert_eq!(h.workflow.professional(), None);
    }

    #[tokio::test(start_paused = true)]
    async fn drop_cancels_redirect() {
        let h = harness();
        h.workflow.enter(p1()).await;
        h.workflow.connect().await;

        let navigator = h.navigator.clone();
        drop(h.workflow);
        tokio::time::sleep(DELAY * 2).await;

        assert!(navigator.routes().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn redirect_from_a_left_visit_is_skipped() {
        let h = harness();
        h.workflow.enter(p1()).await;
        let visit = h.workflow.visit.load(Ordering::SeqCst);

        // leave() lands between the transition and the redirect
        h.workflow.leave().await;
        h.workflow.schedule_redirect(Route::Messages, visit);

        assert!(!h.workflow.redirect_pending());
        tokio::time::sleep(DELAY * 2).await;
        assert!(h.navigator.routes().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn redirect_for_current_visit_is_scheduled() {
        let h = harness();
        h.workflow.enter(p1()).await;
        let visit = h.workflow.visit.load(Ordering::SeqCst);

        h.workflow.schedule_redirect(Route::Messages, visit);
        assert!(h.workflow.redirect_pending());

        h.workflow.leave().await;
        tokio::time::sleep(DELAY * 2).await;
        assert!(h.navigator.routes().is_empty());
    }

    #[tokio::test]
    async fn rapid_double_connect_creates_once() {
        let h = harness();
        h.workflow.enter(p1()).await;

        let (a, b) = tokio::join!(h.workflow.connect(), h.workflow.connect());

        assert!(a.is_connected());
        assert!(b.is_connected() || b.is_busy());
        assert_eq!(
            h.gateway
                .count_calls(|c| matches!(c, GatewayCall::CreateConnection { .. })),
            1
        );
    }

    #[tokio::test]
    async fn connect_logged_out_is_refused_locally() {
        let h = harness();
        h.workflow.enter(p1()).await;
        h.session.logout();
        h.gateway.clear_calls();

        let state = h.workflow.connect().await;

        assert_eq!(state, ConnectionState::Disconnected);
        assert!(h.gateway.calls().is_empty());
        assert_eq!(
            h.workflow.take_events(),
            vec![WorkflowEvent::Failed {
                message: text::LOGIN_TO_CONNECT.into()
            }]
        );
    }
}
