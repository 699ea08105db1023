//! Connection state machine for a (client, professional) pair.
//!
//! This module provides a pure, side-effect-free state machine for the
//! connect/disconnect workflow of a profile screen. The state machine takes
//! events as input and produces a new state plus a list of actions to execute.
//!
//! The actual I/O (backend calls, timers, navigation) is performed by
//! prof-client, not by this module.

use std::time::Duration;

use profesionales_types::{ConnectionId, UserId};

use crate::nav::Route;
use crate::text;

/// Delay between the "connected" banner and the redirect to Messages.
pub const DEFAULT_REDIRECT_DELAY: Duration = Duration::from_millis(1500);

/// The two sides of a connection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pair {
    /// Signed-in client.
    pub client: UserId,
    /// Professional whose profile is open.
    pub professional: UserId,
}

impl Pair {
    /// Build a pair when both ids are present and non-blank.
    pub fn from_parts(client: Option<UserId>, professional: Option<UserId>) -> Option<Self> {
        match (client, professional) {
            (Some(client), Some(professional)) if !client.is_blank() && !professional.is_blank() => {
                Some(Self {
                    client,
                    professional,
                })
            }
            _ => None,
        }
    }
}

/// Connection state as seen from one profile screen visit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConnectionState {
    /// Not checked yet in this visit (shown as "Connect").
    Unknown,
    /// Lookup confirmed there is no active connection.
    Disconnected,
    /// A create request is in flight.
    Connecting {
        /// Pair being connected.
        pair: Pair,
    },
    /// An active connection exists.
    Connected {
        /// Id needed for teardown.
        connection_id: ConnectionId,
    },
    /// A delete request is in flight.
    Disconnecting {
        /// Connection being torn down.
        connection_id: ConnectionId,
    },
}

impl ConnectionState {
    /// Create a new state machine in the Unknown state.
    pub fn new() -> Self {
        Self::Unknown
    }

    /// Process an event and return the new state plus actions to execute.
    ///
    /// This is a pure function - no side effects. The caller (prof-client)
    /// is responsible for executing the returned actions.
    pub fn on_event(self, event: Event) -> (Self, Vec<Action>) {
        match (self, event) {
            // Entering (or re-entering) a profile never trusts earlier state
            (_, Event::Entered { client, professional }) => {
                match Pair::from_parts(client, professional) {
                    Some(pair) => (Self::Unknown, vec![Action::CheckStatus { pair }]),
                    None => (Self::Unknown, vec![]),
                }
            }

            // From Unknown
            (Self::Unknown, Event::CheckCompleted { connection_id }) => match connection_id {
                Some(connection_id) => (Self::Connected { connection_id }, vec![]),
                None => (Self::Disconnected, vec![]),
            },
            (Self::Unknown, Event::CheckFailed { error }) => (
                Self::Unknown,
                vec![Action::Emit(WorkflowEvent::StatusUnavailable { error })],
            ),

            // Connect is offered from Unknown and Disconnected alike
            (
                state @ (Self::Unknown | Self::Disconnected),
                Event::ConnectRequested {
                    client,
                    professional,
                },
            ) => match Pair::from_parts(client, professional) {
                Some(pair) => (
                    Self::Connecting { pair: pair.clone() },
                    vec![Action::CreateConnection { pair }],
                ),
                None => (
                    state,
                    vec![Action::Emit(WorkflowEvent::Failed {
                        message: text::LOGIN_TO_CONNECT.to_string(),
                    })],
                ),
            },

            // From Connecting
            (Self::Connecting { .. }, Event::ConnectSucceeded { connection_id }) => (
                Self::Connected {
                    connection_id: connection_id.clone(),
                },
                vec![
                    Action::Emit(WorkflowEvent::Connected { connection_id }),
                    Action::ScheduleRedirect {
                        route: Route::Messages,
                    },
                ],
            ),
            (Self::Connecting { .. }, Event::ConnectFailed { message }) => (
                Self::Disconnected,
                vec![Action::Emit(WorkflowEvent::Failed { message })],
            ),
            (Self::Connecting { pair }, Event::AlreadyConnected) => (
                Self::Unknown,
                vec![
                    Action::Emit(WorkflowEvent::AlreadyConnected),
                    Action::CheckStatus { pair },
                ],
            ),

            // From Connected
            (Self::Connected { connection_id }, Event::DisconnectRequested) => (
                Self::Disconnecting {
                    connection_id: connection_id.clone(),
                },
                vec![
                    Action::CancelRedirect,
                    Action::DeleteConnection { connection_id },
                ],
            ),

            // From Disconnecting
            (Self::Disconnecting { .. }, Event::DisconnectSucceeded) => (
                Self::Disconnected,
                vec![Action::Emit(WorkflowEvent::Disconnected)],
            ),
            (Self::Disconnecting { connection_id }, Event::DisconnectFailed { message }) => (
                Self::Connected { connection_id },
                vec![Action::Emit(WorkflowEvent::Failed { message })],
            ),

            // Leaving the screen drops any pending redirect
            (_, Event::Left) => (Self::Unknown, vec![Action::CancelRedirect]),

            // Invalid transitions - stay in current state
            (state, _) => (state, vec![]),
        }
    }

    /// Check if an active connection is known.
    pub fn is_connected(&self) -> bool {
        matches!(self, Self::Connected { .. })
    }

    /// Check if a create or delete request is in flight.
    pub fn is_busy(&self) -> bool {
        matches!(self, Self::Connecting { .. } | Self::Disconnecting { .. })
    }

    /// The stored connection id, if any.
    pub fn connection_id(&self) -> Option<&ConnectionId> {
        match self {
            Self::Connected { connection_id } | Self::Disconnecting { connection_id } => {
                Some(connection_id)
            }
            _ => None,
        }
    }

    /// Label of the connect/disconnect button.
    pub fn button_label(&self) -> &'static str {
        match self {
            Self::Unknown | Self::Disconnected => text::CONNECT_LABEL,
            Self::Connecting { .. } => text::CONNECTING_LABEL,
            Self::Connected { .. } => text::DISCONNECT_LABEL,
            Self::Disconnecting { .. } => text::DISCONNECTING_LABEL,
        }
    }
}

impl Default for ConnectionState {
    fn default() -> Self {
        Self::new()
    }
}

/// Events that can occur during a profile screen visit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    /// The profile screen was (re-)entered.
    Entered {
        /// Current client, if signed in.
        client: Option<UserId>,
        /// Professional from the navigation parameters.
        professional: Option<UserId>,
    },
    /// Existence check answered.
    CheckCompleted {
        /// Active connection, if any.
        connection_id: Option<ConnectionId>,
    },
    /// Existence check failed.
    CheckFailed {
        /// Error message describing the failure.
        error: String,
    },
    /// User pressed "Connect".
    ConnectRequested {
        /// Current client, if signed in.
        client: Option<UserId>,
        /// Target professional.
        professional: Option<UserId>,
    },
    /// Backend created the connection.
    ConnectSucceeded {
        /// Id of the new connection.
        connection_id: ConnectionId,
    },
    /// Backend refused or the call failed.
    ConnectFailed {
        /// Message to show.
        message: String,
    },
    /// Backend reported the pair is already connected.
    AlreadyConnected,
    /// User pressed "Disconnect".
    DisconnectRequested,
    /// Backend deleted the connection.
    DisconnectSucceeded,
    /// Delete refused or the call failed.
    DisconnectFailed {
        /// Message to show.
        message: String,
    },
    /// The screen was left or torn down.
    Left,
}

/// Actions to be executed by prof-client.
///
/// These are instructions, not side effects.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// Ask the backend whether the pair is connected.
    CheckStatus {
        /// Pair to check.
        pair: Pair,
    },
    /// Ask the backend to create a connection.
    CreateConnection {
        /// Pair to connect.
        pair: Pair,
    },
    /// Ask the backend to delete a connection.
    DeleteConnection {
        /// Connection to delete.
        connection_id: ConnectionId,
    },
    /// Navigate after the redirect delay, unless cancelled first.
    ScheduleRedirect {
        /// Destination.
        route: Route,
    },
    /// Cancel a pending redirect, if any.
    CancelRedirect,
    /// Surface an event to the user.
    Emit(WorkflowEvent),
}

/// Events surfaced to the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WorkflowEvent {
    /// Connection created.
    Connected {
        /// Id of the new connection.
        connection_id: ConnectionId,
    },
    /// Connection removed.
    Disconnected,
    /// Backend says the pair was already connected.
    AlreadyConnected,
    /// Connect or disconnect failed.
    Failed {
        /// Message to show.
        message: String,
    },
    /// Existence check failed; the button falls back to "Connect".
    StatusUnavailable {
        /// Error message describing the failure.
        error: String,
    },
}

impl WorkflowEvent {
    /// Banner text for this event, if it is shown to the user.
    pub fn banner(&self) -> Option<String> {
        match self {
            WorkflowEvent::Connected { .. } => Some(text::CONNECTED.to_string()),
            WorkflowEvent::Disconnected => Some(text::DISCONNECTED.to_string()),
            WorkflowEvent::AlreadyConnected => Some(text::ALREADY_CONNECTED.to_string()),
            WorkflowEvent::Failed { message } => Some(message.clone()),
            WorkflowEvent::StatusUnavailable { .. } => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn c1() -> Option<UserId> {
        Some(UserId::new("c1"))
    }

    fn p1() -> Option<UserId> {
        Some(UserId::new("p1"))
    }

    fn pair() -> Pair {
        Pair {
            client: UserId::new("c1"),
            professional: UserId::new("p1"),
        }
    }

    fn conn1() -> ConnectionId {
        ConnectionId::new("conn1")
    }

    #[test]
    fn starts_unknown() {
        let state = ConnectionState::new();
        assert!(matches!(state, ConnectionState::Unknown));
        assert_eq!(state.button_label(), "Conectar");
    }

    #[test]
    fn entering_checks_status() {
        let (state, actions) = ConnectionState::new().on_event(Event::Entered {
            client: c1(),
            professional: p1(),
        });

        assert_eq!(state, ConnectionState::Unknown);
        assert_eq!(actions, vec![Action::CheckStatus { pair: pair() }]);
    }

    #[test]
    fn entering_without_ids_skips_check() {
        let (state, actions) = ConnectionState::new().on_event(Event::Entered {
            client: None,
            professional: p1(),
        });
        assert_eq!(state, ConnectionState::Unknown);
        assert!(actions.is_empty());

        let (_, actions) = ConnectionState::new().on_event(Event::Entered {
            client: c1(),
            professional: Some(UserId::new(" ")),
        });
        assert!(actions.is_empty());
    }

    #[test]
    fn check_resolves_unknown() {
        let (state, _) = ConnectionState::Unknown.on_event(Event::CheckCompleted {
            connection_id: Some(conn1()),
        });
        assert_eq!(state.connection_id(), Some(&conn1()));

        let (state, _) = ConnectionState::Unknown.on_event(Event::CheckCompleted {
            connection_id: None,
        });
        assert_eq!(state, ConnectionState::Disconnected);
    }

    #[test]
    fn check_failure_stays_unknown() {
        let (state, actions) = ConnectionState::Unknown.on_event(Event::CheckFailed {
            error: "timeout".into(),
        });
        assert_eq!(state, ConnectionState::Unknown);
        assert!(matches!(
            actions.as_slice(),
            [Action::Emit(WorkflowEvent::StatusUnavailable { .. })]
        ));
    }

    #[test]
    fn reentering_resets_connected_state() {
        let state = ConnectionState::Connected {
            connection_id: conn1(),
        };
        let (state, actions) = state.on_event(Event::Entered {
            client: c1(),
            professional: p1(),
        });

        assert_eq!(state, ConnectionState::Unknown);
        assert!(matches!(actions.as_slice(), [Action::CheckStatus { .. }]));
    }

    #[test]
    fn connect_request_transitions_to_connecting() {
        let (state, actions) = ConnectionState::Disconnected.on_event(Event::ConnectRequested {
            client: c1(),
            professional: p1(),
        });

        assert!(state.is_busy());
        assert_eq!(state.button_label(), "Conectando...");
        assert_eq!(actions, vec![Action::CreateConnection { pair: pair() }]);
    }

    #[test]
    fn connect_allowed_from_unknown() {
        let (state, _) = ConnectionState::Unknown.on_event(Event::ConnectRequested {
            client: c1(),
            professional: p1(),
        });
        assert!(matches!(state, ConnectionState::Connecting { .. }));
    }

    #[test]
    fn connect_without_identity_is_refused_locally() {
        let (state, actions) = ConnectionState::Disconnected.on_event(Event::ConnectRequested {
            client: None,
            professional: p1(),
        });

        assert_eq!(state, ConnectionState::Disconnected);
        assert_eq!(
            actions,
            vec![Action::Emit(WorkflowEvent::Failed {
                message: text::LOGIN_TO_CONNECT.into()
            })]
        );
    }

    #[test]
    fn connect_success_stores_id_and_schedules_redirect() {
        let state = ConnectionState::Connecting { pair: pair() };
        let (state, actions) = state.on_event(Event::ConnectSucceeded {
            connection_id: conn1(),
        });

        assert_eq!(
            state,
            ConnectionState::Connected {
                connection_id: conn1()
            }
        );
        assert!(actions.iter().any(|a| matches!(
            a,
            Action::Emit(WorkflowEvent::Connected { connection_id }) if *connection_id == conn1()
        )));
        assert!(actions.contains(&Action::ScheduleRedirect {
            route: Route::Messages
        }));
    }

    #[test]
    fn connect_failure_reverts_to_disconnected() {
        let state = ConnectionState::Connecting { pair: pair() };
        let (state, actions) = state.on_event(Event::ConnectFailed {
            message: "Profesional no encontrado".into(),
        });

        assert_eq!(state, ConnectionState::Disconnected);
        assert_eq!(
            actions,
            vec![Action::Emit(WorkflowEvent::Failed {
                message: "Profesional no encontrado".into()
            })]
        );
    }

    #[test]
    fn duplicate_connect_rederives_status() {
        let state = ConnectionState::Connecting { pair: pair() };
        let (state, actions) = state.on_event(Event::AlreadyConnected);

        assert_eq!(state, ConnectionState::Unknown);
        assert_eq!(
            actions,
            vec![
                Action::Emit(WorkflowEvent::AlreadyConnected),
                Action::CheckStatus { pair: pair() },
            ]
        );
    }

    #[test]
    fn rapid_second_connect_is_ignored() {
        let state = ConnectionState::Connecting { pair: pair() };
        let (state, actions) = state.on_event(Event::ConnectRequested {
            client: c1(),
            professional: p1(),
        });
        assert!(matches!(state, ConnectionState::Connecting { .. }));
        assert!(actions.is_empty());
    }

    #[test]
    fn connect_while_connected_is_ignored() {
        let state = ConnectionState::Connected {
            connection_id: conn1(),
        };
        let (state, actions) = state.on_event(Event::ConnectRequested {
            client: c1(),
            professional: p1(),
        });
        assert!(state.is_connected());
        assert!(actions.is_empty());
    }

    #[test]
    fn stale_check_does_not_override_connecting() {
        let state = ConnectionState::Connecting { pair: pair() };
        let (state, _) = state.on_event(Event::CheckCompleted {
            connection_id: None,
        });
        assert!(matches!(state, ConnectionState::Connecting { .. }));
    }

    #[test]
    fn disconnect_request_from_connected() {
        let state = ConnectionState::Connected {
            connection_id: conn1(),
        };
        let (state, actions) = state.on_event(Event::DisconnectRequested);

        assert_eq!(
            state,
            ConnectionState::Disconnecting {
                connection_id: conn1()
            }
        );
        assert!(actions.contains(&Action::CancelRedirect));
        assert!(actions.contains(&Action::DeleteConnection {
            connection_id: conn1()
        }));
    }

    #[test]
    fn disconnect_without_connection_is_ignored() {
        let (state, actions) = ConnectionState::Disconnected.on_event(Event::DisconnectRequested);
        assert_eq!(state, ConnectionState::Disconnected);
        assert!(actions.is_empty());
    }

    #[test]
    fn disconnect_success_transitions_to_disconnected() {
        let state = ConnectionState::Disconnecting {
            connection_id: conn1(),
        };
        let (state, actions) = state.on_event(Event::DisconnectSucceeded);

        assert_eq!(state, ConnectionState::Disconnected);
        assert_eq!(actions, vec![Action::Emit(WorkflowEvent::Disconnected)]);
    }

    #[test]
    fn disconnect_failure_reverts_to_connected() {
        let state = ConnectionState::Disconnecting {
            connection_id: conn1(),
        };
        let (state, actions) = state.on_event(Event::DisconnectFailed {
            message: "Error de red".into(),
        });

        assert_eq!(state.connection_id(), Some(&conn1()));
        assert!(state.is_connected());
        assert!(matches!(
            actions.as_slice(),
            [Action::Emit(WorkflowEvent::Failed { .. })]
        ));
    }

    #[test]
    fn leaving_cancels_redirect() {
        let state = ConnectionState::Connected {
            connection_id: conn1(),
        };
        let (state, actions) = state.on_event(Event::Left);
        assert_eq!(state, ConnectionState::Unknown);
        assert_eq!(actions, vec![Action::CancelRedirect]);
    }

    #[test]
    fn full_connect_disconnect_cycle() {
        let state = ConnectionState::new();

        let (state, _) = state.on_event(Event::Entered {
            client: c1(),
            professional: p1(),
        });
        let (state, _) = state.on_event(Event::CheckCompleted {
            connection_id: None,
        });
        assert_eq!(state.button_label(), "Conectar");

        let (state, _) = state.on_event(Event::ConnectRequested {
            client: c1(),
            professional: p1(),
        });
        let (state, _) = state.on_event(Event::ConnectSucceeded {
            connection_id: conn1(),
        });
        assert_eq!(state.button_label(), "Desconectar");

        let (state, _) = state.on_event(Event::DisconnectRequested);
        assert_eq!(state.button_label(), "Desconectando...");
        let (state, _) = state.on_event(Event::DisconnectSucceeded);
        assert_eq!(state, ConnectionState::Disconnected);
    }

    #[test]
    fn banners() {
        assert_eq!(
            WorkflowEvent::Connected {
                connection_id: conn1()
            }
            .banner()
            .as_deref(),
            Some(text::CONNECTED)
        );
        assert!(WorkflowEvent::StatusUnavailable {
            error: "x".into()
        }
        .banner()
        .is_none());
    }
}
