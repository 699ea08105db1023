//! Screen controllers.
//!
//! Each controller holds one screen's local state (form fields, loading
//! flag, last error) and calls the gateway and workflow. Errors never
//! escape a screen as panics: they come back as [`ScreenError`], whose
//! `Display` is the text to show.

mod account;
mod auth;
mod chat;
mod messages;
mod professionals;
mod profile;
mod search;

pub use account::{AccountScreen, AccountSettings};
pub use auth::{ForgotPasswordScreen, LoginScreen, SignUpScreen};
pub use chat::{ChatMessage, ChatScreen};
pub use messages::MessagingScreen;
pub use professionals::ProfessionalsScreen;
pub use profile::{whatsapp_link, ProfessionalProfileScreen};
pub use search::SearchScreen;

use thiserror::Error;

use profesionales_core::{SessionError, ValidationError};

use crate::gateway::GatewayError;

/// Screen-level errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ScreenError {
    /// Input rejected before any network call.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// The backend call failed; `message` is what the user sees.
    #[error("{message}")]
    Backend {
        /// Server message verbatim, or the screen's fallback.
        message: String,
        /// Underlying gateway error.
        #[source]
        source: GatewayError,
    },

    /// Session missing or not provided.
    #[error(transparent)]
    Session(#[from] SessionError),
}

impl ScreenError {
    /// Wrap a gateway error with the screen's fallback message.
    pub fn backend(source: GatewayError, fallback: &str) -> Self {
        ScreenError::Backend {
            message: source.user_message(fallback),
            source,
        }
    }

    /// True when the user has to sign in first.
    pub fn needs_login(&self) -> bool {
        matches!(self, ScreenError::Session(SessionError::LoggedOut))
    }
}
