//! A professional's profile: details, contact link, connect/disconnect.

use std::sync::Arc;

use reqwest::Url;

use profesionales_core::{text, ConnectionState, WorkflowEvent};
use profesionales_types::{ProfessionalProfile, UserId};

use super::ScreenError;
use crate::gateway::Gateway;
use crate::workflow::ConnectionWorkflow;

/// Uruguayan country calling code.
const COUNTRY_CODE: &str = "598";

/// WhatsApp contact link for a Uruguayan phone number.
///
/// Local numbers drop their trunk `0` and get the `598` prefix; numbers
/// already carrying the prefix are kept. Returns `None` without digits.
pub fn whatsapp_link(phone: &str) -> Option<String> {
    let digits: String = phone.chars().filter(char::is_ascii_digit).collect();
    let national = match digits.strip_prefix(COUNTRY_CODE) {
        Some(rest) if digits.len() > 9 => rest,
        _ => digits.as_str(),
    };
    let national = national.trim_start_matches('0');
    if national.is_empty() {
        return None;
    }

    let base = format!("https://wa.me/{COUNTRY_CODE}{national}");
    Url::parse_with_params(&base, &[("text", text::WHATSAPP_GREETING)])
        .ok()
        .map(String::from)
}

/// The profile screen.
pub struct ProfessionalProfileScreen {
    gateway: Arc<dyn Gateway>,
    workflow: ConnectionWorkflow,
    profile: Option<ProfessionalProfile>,
    error: Option<String>,
}

impl ProfessionalProfileScreen {
    pub(crate) fn new(gateway: Arc<dyn Gateway>, workflow: ConnectionWorkflow) -> Self {
        Self {
            gateway,
            workflow,
            profile: None,
            error: None,
        }
    }

    /// Enter (or re-enter) the screen for `id`.
    ///
    /// Loads the profile and re-checks the connection status. A failed
    /// profile fetch is reported but the status check still runs.
    pub async fn enter(&mut self, id: UserId) -> Result<&ProfessionalProfile, ScreenError> {
        self.error = None;
        let (profile, _) = tokio::join!(
            self.gateway.professional(&id),
            self.workflow.enter(id.clone())
        );

        match profile {
            Ok(profile) => Ok(self.profile.insert(profile)),
            Err(e) => {
                tracing::warn!(professional = %id, error = %e, "Failed to load profile");
                let err = ScreenError::backend(e, text::PROFILE_FAILED);
                self.error = Some(err.to_string());
                Err(err)
            }
        }
    }

    /// Press "Connect". Returns the banner to show, if any.
    pub async fn connect(&mut self) -> Option<String> {
        self.workflow.connect().await;
        self.banner()
    }

    /// Press "Disconnect". Returns the banner to show, if any.
    pub async fn disconnect(&mut self) -> Option<String> {
        self.workflow.disconnect().await;
        self.banner()
    }

    /// Leave the screen; cancels a pending redirect.
    pub async fn leave(&mut self) {
        self.workflow.leave().await;
    }

    fn banner(&self) -> Option<String> {
        let events = self.workflow.take_events();
        events.iter().rev().find_map(WorkflowEvent::banner)
    }

    /// Loaded profile.
    pub fn profile(&self) -> Option<&ProfessionalProfile> {
        self.profile.as_ref()
    }

    /// Error from the last profile fetch.
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Connection state.
    pub async fn state(&self) -> ConnectionState {
        self.workflow.state().await
    }

    /// Label of the connect/disconnect button.
    pub async fn button_label(&self) -> &'static str {
        self.workflow.state().await.button_label()
    }

    /// WhatsApp link for the loaded profile.
    pub fn contact_link(&self) -> Option<String> {
        self.profile
            .as_ref()
            .and_then(|p| p.phone.as_deref())
            .and_then(whatsapp_link)
    }

    /// The workflow driving this screen.
    pub fn workflow(&self) -> &ConnectionWorkflow {
        &self.workflow
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gateway::GatewayError;
    use crate::testing::Fixture;
    use profesionales_core::Route;
    use profesionales_types::ConnectionId;
    use std::time::Duration;

    #[test]
    fn whatsapp_link_normalizes_local_numbers() {
        let link = whatsapp_link("099 123 456").unwrap();
        assert!(link.starts_with("https://wa.me/59899123456?text="));
        assert!(link.contains("ProfesionalesUY"));

        assert_eq!(
            whatsapp_link("+598 99 123 456").unwrap(),
            whatsapp_link("099123456").unwrap()
        );
        assert!(whatsapp_link("").is_none());
        assert!(whatsapp_link("000").is_none());
    }

    #[tokio::test]
    async fn enter_loads_profile_and_status() {
        let fx = Fixture::logged_in();
        let mut screen = fx.app.profile_screen().unwrap();

        let profile = screen.enter(UserId::new("p1")).await.unwrap();
        assert_eq!(profile.first_name, "Juan");

        assert_eq!(screen.state().await, ConnectionState::Disconnected);
        assert_eq!(screen.button_label().await, "Conectar");
        assert!(screen.contact_link().unwrap().contains("59899111222"));
    }

    #[tokio::test(start_paused = true)]
    async fn connect_shows_banner_then_redirects() {
        let fx = Fixture::logged_in();
        fx.gateway.queue_connection_id("conn1");
        let mut screen = fx.app.profile_screen().unwrap();
        screen.enter(UserId::new("p1")).await.unwrap();

        let banner = screen.connect().await;

        assert_eq!(banner.as_deref(), Some(text::CONNECTED));
        assert_eq!(
            screen.state().await.connection_id(),
            Some(&ConnectionId::new("conn1"))
        );
        assert_eq!(screen.button_label().await, "Desconectar");

        tokio::time::sleep(Duration::from_millis(1600)).await;
        assert_eq!(fx.navigator.last(), Some(Route::Messages));
    }

    #[tokio::test(start_paused = true)]
    async fn leaving_before_redirect_stays_put() {
        let fx = Fixture::logged_in();
        let mut screen = fx.app.profile_screen().unwrap();
        screen.enter(UserId::new("p1")).await.unwrap();
        screen.connect().await;

        screen.leave().await;
        tokio::time::sleep(Duration::from_secs(3)).await;
        assert!(fx.navigator.routes().is_empty());
    }

    #[tokio::test]
    async fn disconnect_shows_banner() {
        let fx = Fixture::logged_in();
        let mut screen = fx.app.profile_screen().unwrap();
        screen.enter(UserId::new("p1")).await.unwrap();
        screen.connect().await;

        let banner = screen.disconnect().await;
        assert_eq!(banner.as_deref(), Some(text::DISCONNECTED));
        assert_eq!(screen.state().await, ConnectionState::Disconnected);
    }

    #[tokio::test]
    async fn missing_profile_reports_error_but_checks_status() {
        let fx = Fixture::logged_in();
        let mut screen = fx.app.profile_screen().unwrap();

        let err = screen.enter(UserId::new("nobody")).await.unwrap_err();
        assert_eq!(err.to_string(), "Profesional no encontrado");
        assert_eq!(screen.error(), Some("Profesional no encontrado"));
        assert!(screen.profile().is_none());
    }

    #[tokio::test]
    async fn connect_failure_banner_uses_fallback() {
        let fx = Fixture::logged_in();
        let mut screen = fx.app.profile_screen().unwrap();
        screen.enter(UserId::new("p1")).await.unwrap();

        fx.gateway.fail_next(GatewayError::Api(
            profesionales_types::ApiError::from_status(500, None),
        ));
        let banner = screen.connect().await;

        assert_eq!(banner.as_deref(), Some(text::CONNECT_FAILED));
        assert_eq!(screen.button_label().await, "Conectar");
    }
}
