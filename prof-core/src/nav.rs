//! Navigation targets.
//!
//! Screens never navigate themselves; they return or emit a [`Route`] and
//! the client's navigator carries it out.

use profesionales_types::{ConnectionId, UserId};

/// A screen the app can navigate to, with its parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    /// Authentication entry point.
    Login,
    /// Registration form.
    SignUp,
    /// Password recovery form.
    ForgotPassword,
    /// Landing feed.
    Home,
    /// Professional search.
    Search,
    /// Full professionals listing.
    ProfessionalsList,
    /// A professional's profile.
    ProfessionalProfile {
        /// Professional to show.
        id: UserId,
    },
    /// The messaging list (active connections).
    Messages,
    /// A single conversation.
    Chat {
        /// Connection backing the conversation.
        connection_id: ConnectionId,
    },
    /// The signed-in user's own profile.
    Account,
}

impl Route {
    /// Stable screen name, used in logs.
    pub fn name(&self) -> &'static str {
        match self {
            Route::Login => "Login",
            Route::SignUp => "SignUp",
            Route::ForgotPassword => "ForgotPassword",
            Route::Home => "Home",
            Route::Search => "Search",
            Route::ProfessionalsList => "ProfessionalsList",
            Route::ProfessionalProfile { .. } => "ProfessionalProfile",
            Route::Messages => "Messages",
            Route::Chat { .. } => "Chat",
            Route::Account => "Account",
        }
    }

    /// Screens reachable without a signed-in user.
    pub fn is_public(&self) -> bool {
        matches!(self, Route::Login | Route::SignUp | Route::ForgotPassword)
    }
}
