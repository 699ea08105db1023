//! The signed-in user's own profile: view, local edits, settings, logout.

use std::sync::Arc;

use profesionales_core::{ProfileEditForm, Route, SessionStore};
use profesionales_types::Identity;

use super::ScreenError;
use crate::gateway::Gateway;
use crate::nav::Navigator;

/// Account toggles. Kept on the screen; the backend has no endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AccountSettings {
    /// Hide the profile from search.
    pub private_profile: bool,
    /// Push notifications.
    pub notifications: bool,
    /// Accept messages from users without a connection.
    pub receive_messages: bool,
}

impl Default for AccountSettings {
    fn default() -> Self {
        Self {
            private_profile: true,
            notifications: true,
            receive_messages: false,
        }
    }
}

/// The account screen.
pub struct AccountScreen {
    gateway: Arc<dyn Gateway>,
    session: SessionStore,
    navigator: Arc<dyn Navigator>,
    settings: AccountSettings,
}

impl AccountScreen {
    pub(crate) fn new(
        gateway: Arc<dyn Gateway>,
        session: SessionStore,
        navigator: Arc<dyn Navigator>,
    ) -> Self {
        Self {
            gateway,
            session,
            navigator,
            settings: AccountSettings::default(),
        }
    }

    /// Current toggle values.
    pub fn settings(&self) -> AccountSettings {
        self.settings
    }

    /// Toggle "private profile".
    pub fn set_private_profile(&mut self, on: bool) {
        self.settings.private_profile = on;
    }

    /// Toggle notifications.
    pub fn set_notifications(&mut self, on: bool) {
        self.settings.notifications = on;
    }

    /// Toggle "receive messages".
    pub fn set_receive_messages(&mut self, on: bool) {
        self.settings.receive_messages = on;
    }

    /// The signed-in identity.
    pub fn identity(&self) -> Result<Arc<Identity>, ScreenError> {
        Ok(self.session.require()?)
    }

    /// An edit form prefilled with the current identity.
    pub fn edit_form(&self) -> Result<ProfileEditForm, ScreenError> {
        Ok(ProfileEditForm::from_identity(&*self.identity()?))
    }

    /// Apply an edit to the session. Nothing is sent to the backend.
    pub fn save(&self, form: &ProfileEditForm) -> Result<Arc<Identity>, ScreenError> {
        let current = self.identity()?;
        let edited = form.apply(&current)?;
        tracing::info!(user = %edited.id, "Profile updated locally");
        self.session.update_user(edited);
        self.identity()
    }

    /// Sign out and return to Login.
    pub fn logout(&self) {
        if let Some(identity) = self.session.current() {
            tracing::info!(user = %identity.id, "Logging out");
        }
        self.session.logout();
        self.gateway.set_token(None);
        self.navigator.navigate(Route::Login);
    }
}
