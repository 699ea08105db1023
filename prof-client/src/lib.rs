//! # prof-client
//!
//! Client library for the ProfesionalesUY marketplace.
//!
//! This is the library a UI shell (or the CLI) drives: it talks to the REST
//! backend, keeps the session, and runs the connect/disconnect workflow.
//!
//! ## Features
//!
//! - **Backend Gateway**: typed calls over the `{ success, data, message }`
//!   envelope, with an in-memory stand-in for tests and demos
//! - **Session**: one shared identity per [`App`]
//! - **Connection Workflow**: pure state machine from prof-core, driven here
//! - **Screens**: search with debounce, listings, messaging, auth forms
//!
//! ## Example
//!
//! ```ignore
//! use profesionales_client::{App, ClientConfig, LogNavigator};
//!
//! let app = App::from_config(ClientConfig::default(), Arc::new(LogNavigator))?;
//!
//! let mut login = app.login_screen()?;
//! login.form.email = "ana@example.com".into();
//! login.form.password = "Abc12345!".into();
//! login.submit().await?;
//!
//! let mut profile = app.profile_screen()?;
//! profile.enter(UserId::new("p1")).await?;
//! profile.connect().await;
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod app;
pub mod config;
pub mod gateway;
pub mod geocode;
pub mod nav;
pub mod screens;
pub mod workflow;

pub use app::{App, ClientError};
pub use config::{ApiConfig, ClientConfig, ConfigError, GeocodingConfig, UiConfig};
pub use gateway::{
    Gateway, GatewayCall, GatewayError, HttpGateway, MockAccount, MockBackend, MockGateway,
};
pub use geocode::{FixedGeocoder, GeocodeError, Geocoder, NominatimGeocoder};
pub use nav::{LogNavigator, Navigator, RecordingNavigator};
pub use screens::{
    whatsapp_link, AccountScreen, AccountSettings, ChatMessage, ChatScreen, ForgotPasswordScreen,
    LoginScreen, MessagingScreen, ProfessionalProfileScreen, ProfessionalsScreen, ScreenError,
    SearchScreen, SignUpScreen,
};
pub use workflow::ConnectionWorkflow;

#[cfg(test)]
pub(crate) mod testing {
    use std::sync::Arc;

    use profesionales_types::{Identity, ProfessionalFields, Role, UserId};

    use crate::{App, ClientConfig, FixedGeocoder, MockGateway, RecordingNavigator};

    /// The seeded demo client.
    pub fn client_identity() -> Identity {
        Identity {
            id: UserId::new("c1"),
            first_name: "Ana".into(),
            last_name: "López".into(),
            role: Role::Client,
            email: "ana@example.com".into(),
            phone: Some("099123456".into()),
            address: Some("18 de Julio 1234, Montevideo".into()),
            professional_fields: ProfessionalFields::default(),
        }
    }

    pub struct Fixture {
        pub app: App,
        pub gateway: MockGateway,
        pub navigator: RecordingNavigator,
    }

    impl Fixture {
        pub fn new() -> Self {
            Self::with_geocoder(FixedGeocoder::new())
        }

        pub fn with_geocoder(geocoder: FixedGeocoder) -> Self {
            let gateway = MockGateway::seeded();
            let navigator = RecordingNavigator::new();
            let app = App::new(
                Arc::new(gateway.clone()),
                Arc::new(geocoder),
                Arc::new(navigator.clone()),
                ClientConfig::default(),
            );
            Self {
                app,
                gateway,
                navigator,
            }
        }

        /// Signed in as the seeded client.
        pub fn logged_in() -> Self {
            let fx = Self::new();
            fx.app
                .restore(client_identity(), Some("mock-token-c1".into()))
                .unwrap();
            fx
        }
    }
}
