//! App - the initializer that wires screens to their collaborators.
//!
//! # Architecture
//!
//! ```text
//! App ─┬─ Gateway (HTTP or in-memory)
//!      ├─ Geocoder
//!      ├─ SessionContext (store provided here, once)
//!      ├─ Navigator
//!      └─ ClientConfig
//!            ↓
//!      screen controllers / ConnectionWorkflow
//! ```
//!
//! Every screen built by one `App` shares the same session store and
//! gateway, so a login on one screen is visible to all others.

use std::path::Path;
use std::sync::Arc;

use thiserror::Error;

use profesionales_core::{SessionContext, SessionError, SessionStore};
use profesionales_types::{Connection, Identity};

use crate::config::{ClientConfig, ConfigError};
use crate::gateway::{Gateway, GatewayError, HttpGateway, MockGateway};
use crate::geocode::{self, FixedGeocoder, GeocodeError, Geocoder};
use crate::nav::Navigator;
use crate::screens::{
    AccountScreen, ChatScreen, ForgotPasswordScreen, LoginScreen, MessagingScreen,
    ProfessionalProfileScreen, ProfessionalsScreen, ScreenError, SearchScreen, SignUpScreen,
};
use crate::workflow::ConnectionWorkflow;

/// Errors building an [`App`].
#[derive(Debug, Error)]
pub enum ClientError {
    /// The HTTP gateway could not be built.
    #[error("gateway error: {0}")]
    Gateway(#[from] GatewayError),

    /// The geocoder could not be built.
    #[error("geocoder error: {0}")]
    Geocode(#[from] GeocodeError),

    /// The configuration file could not be loaded.
    #[error("config error: {0}")]
    Config(#[from] ConfigError),
}

/// Shared collaborators for every screen.
#[derive(Clone)]
pub struct App {
    gateway: Arc<dyn Gateway>,
    geocoder: Arc<dyn Geocoder>,
    context: SessionContext,
    navigator: Arc<dyn Navigator>,
    config: ClientConfig,
}

impl App {
    /// Wire an app from explicit parts. The session store is provided here.
    pub fn new(
        gateway: Arc<dyn Gateway>,
        geocoder: Arc<dyn Geocoder>,
        navigator: Arc<dyn Navigator>,
        config: ClientConfig,
    ) -> Self {
        Self {
            gateway,
            geocoder,
            context: SessionContext::provided(),
            navigator,
            config,
        }
    }

    /// Talk to the configured backend over HTTP.
    pub fn from_config(
        config: ClientConfig,
        navigator: Arc<dyn Navigator>,
    ) -> Result<Self, ClientError> {
        let gateway = HttpGateway::from_config(&config.api)?;
        let timeout = std::time::Duration::from_secs(config.api.timeout_secs);
        let geocoder = geocode::from_config(&config.geocoding, timeout)?;
        tracing::info!(
            api = gateway.base_url(),
            geocoding = config.geocoding.enabled,
            "Client configured"
        );
        Ok(Self::new(
            Arc::new(gateway),
            Arc::from(geocoder),
            navigator,
            config,
        ))
    }

    /// Load `path` (defaults when missing) and build an HTTP app.
    pub fn load(path: &Path, navigator: Arc<dyn Navigator>) -> Result<Self, ClientError> {
        let config = ClientConfig::load_or_default(path)?;
        Self::from_config(config, navigator)
    }

    /// Run against an in-memory backend; addresses are never geocoded.
    pub fn mock(gateway: MockGateway, navigator: Arc<dyn Navigator>) -> Self {
        Self::new(
            Arc::new(gateway),
            Arc::new(FixedGeocoder::new()),
            navigator,
            ClientConfig::default(),
        )
    }

    /// The shared session store.
    pub fn session(&self) -> Result<SessionStore, SessionError> {
        self.context.session()
    }

    /// The provider slot handed to screens.
    pub fn context(&self) -> &SessionContext {
        &self.context
    }

    /// Loaded configuration.
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// The backend gateway.
    pub fn gateway(&self) -> &Arc<dyn Gateway> {
        &self.gateway
    }

    /// Restore a persisted session: identity plus bearer token.
    pub fn restore(&self, identity: Identity, token: Option<String>) -> Result<(), SessionError> {
        let session = self.session()?;
        tracing::debug!(user = %identity.id, "Restoring session");
        session.login(identity);
        self.gateway.set_token(token);
        Ok(())
    }

    /// Login screen.
    pub fn login_screen(&self) -> Result<LoginScreen, ScreenError> {
        Ok(LoginScreen::new(
            Arc::clone(&self.gateway),
            self.session()?,
            Arc::clone(&self.navigator),
        ))
    }

    /// Sign-up screen.
    pub fn sign_up_screen(&self) -> Result<SignUpScreen, ScreenError> {
        Ok(SignUpScreen::new(
            Arc::clone(&self.gateway),
            Arc::clone(&self.geocoder),
            self.session()?,
            Arc::clone(&self.navigator),
        ))
    }

    /// Password recovery screen.
    pub fn forgot_password_screen(&self) -> ForgotPasswordScreen {
        ForgotPasswordScreen::new(Arc::clone(&self.navigator))
    }

    /// Search screen, debounced per `[ui]`.
    pub fn search_screen(&self) -> SearchScreen {
        SearchScreen::new(
            Arc::clone(&self.gateway),
            Arc::clone(&self.navigator),
            self.config.ui.search_debounce(),
        )
    }

    /// Professionals listing.
    pub fn professionals_screen(&self) -> ProfessionalsScreen {
        ProfessionalsScreen::new(Arc::clone(&self.gateway), Arc::clone(&self.navigator))
    }

    /// A connection workflow bound to the shared session.
    pub fn workflow(&self) -> Result<ConnectionWorkflow, ScreenError> {
        Ok(ConnectionWorkflow::new(
            Arc::clone(&self.gateway),
            self.session()?,
            Arc::clone(&self.navigator),
            self.config.ui.redirect_delay(),
        ))
    }

    /// Professional profile screen.
    pub fn profile_screen(&self) -> Result<ProfessionalProfileScreen, ScreenError> {
        Ok(ProfessionalProfileScreen::new(
            Arc::clone(&self.gateway),
            self.workflow()?,
        ))
    }

    /// Messaging list.
    pub fn messaging_screen(&self) -> Result<MessagingScreen, ScreenError> {
        Ok(MessagingScreen::new(
            Arc::clone(&self.gateway),
            self.session()?,
            Arc::clone(&self.navigator),
        ))
    }

    /// Conversation for one of the signed-in client's connections.
    pub fn chat_screen(&self, connection: &Connection) -> Result<ChatScreen, ScreenError> {
        self.session()?.require()?;
        Ok(ChatScreen::new(
            connection.id.clone(),
            connection.professional.display_name(),
        ))
    }

    /// The signed-in user's account screen.
    pub fn account_screen(&self) -> Result<AccountScreen, ScreenError> {
        Ok(AccountScreen::new(
            Arc::clone(&self.gateway),
            self.session()?,
            Arc::clone(&self.navigator),
        ))
    }
}
