//! # prof-core
//!
//! Pure logic for ProfesionalesUY (no I/O, instant tests).
//!
//! This crate implements the session store, the connection state machine,
//! form validation and the list/search screen state without any network or
//! timer I/O, enabling fast unit tests.
//!
//! ## Design Philosophy
//!
//! The state machine in [`state`] is **pure**: it takes an event and
//! produces a new state plus a list of actions. The actual I/O (backend
//! calls, redirect timers, navigation) is performed by `prof-client`, which
//! interprets those actions.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod inbox;
pub mod nav;
pub mod search;
pub mod session;
pub mod state;
pub mod text;
pub mod validation;

pub use inbox::{filter_connections, MessagingList};
pub use nav::Route;
pub use search::{SearchState, SearchTicket, SearchView};
pub use session::{SessionContext, SessionError, SessionStore};
pub use state::{Action, ConnectionState, Event, Pair, WorkflowEvent, DEFAULT_REDIRECT_DELAY};
pub use validation::{
    ForgotPasswordForm, LoginForm, ProfessionalExtras, ProfileEditForm, Registration, SignUpForm,
    ValidationError,
};
