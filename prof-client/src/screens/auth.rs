//! Login, sign-up and password recovery.

use std::sync::Arc;

use profesionales_core::{
    text, ForgotPasswordForm, LoginForm, Registration, Route, SessionStore, SignUpForm,
};
use profesionales_types::Identity;

use super::ScreenError;
use crate::gateway::Gateway;
use crate::geocode::Geocoder;
use crate::nav::Navigator;

/// The login screen.
pub struct LoginScreen {
    gateway: Arc<dyn Gateway>,
    session: SessionStore,
    navigator: Arc<dyn Navigator>,
    /// Form fields.
    pub form: LoginForm,
    error: Option<String>,
    loading: bool,
}

impl LoginScreen {
    pub(crate) fn new(
        gateway: Arc<dyn Gateway>,
        session: SessionStore,
        navigator: Arc<dyn Navigator>,
    ) -> Self {
        Self {
            gateway,
            session,
            navigator,
            form: LoginForm::default(),
            error: None,
            loading: false,
        }
    }

    /// Inline error under the form.
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// True while the request is in flight.
    pub fn is_loading(&self) -> bool {
        self.loading
    }

    /// Validate, sign in, and go Home.
    pub async fn submit(&mut self) -> Result<Arc<Identity>, ScreenError> {
        let result = self.try_submit().await;
        self.loading = false;
        self.error = result.as_ref().err().map(ToString::to_string);
        result
    }

    async fn try_submit(&mut self) -> Result<Arc<Identity>, ScreenError> {
        let request = self.form.validate()?;
        self.loading = true;

        let response = self
            .gateway
            .login(&request)
            .await
            .map_err(|e| ScreenError::backend(e, text::LOGIN_FAILED))?;

        self.session.login(response.user);
        self.navigator.navigate(Route::Home);
        Ok(self.session.require()?)
    }

    /// Open the sign-up form.
    pub fn go_to_sign_up(&self) {
        self.navigator.navigate(Route::SignUp);
    }

    /// Open password recovery.
    pub fn go_to_forgot_password(&self) {
        self.navigator.navigate(Route::ForgotPassword);
    }
}

/// The registration screen, for clients and professionals.
pub struct SignUpScreen {
    gateway: Arc<dyn Gateway>,
    geocoder: Arc<dyn Geocoder>,
    session: SessionStore,
    navigator: Arc<dyn Navigator>,
    /// Form fields. Set `form.professional` to register a professional.
    pub form: SignUpForm,
    error: Option<String>,
    loading: bool,
}

impl SignUpScreen {
    pub(crate) fn new(
        gateway: Arc<dyn Gateway>,
        geocoder: Arc<dyn Geocoder>,
        session: SessionStore,
        navigator: Arc<dyn Navigator>,
    ) -> Self {
        Self {
            gateway,
            geocoder,
            session,
            navigator,
            form: SignUpForm::default(),
            error: None,
            loading: false,
        }
    }

    /// Inline error under the form.
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// True while geocoding or registering.
    pub fn is_loading(&self) -> bool {
        self.loading
    }

    /// Validate, geocode the address, register, sign in, and go Home.
    pub async fn submit(&mut self) -> Result<Arc<Identity>, ScreenError> {
        let result = self.try_submit().await;
        self.loading = false;
        self.error = result.as_ref().err().map(ToString::to_string);
        result
    }

    async fn try_submit(&mut self) -> Result<Arc<Identity>, ScreenError> {
        let registration = self.form.validate()?;
        self.loading = true;

        let location = self.geocoder.locate(registration.address()).await;
        let registration = registration.with_location(location);
        tracing::debug!(
            email = registration.email(),
            role = registration.role().as_str(),
            origin = location.is_origin(),
            "Registering"
        );

        let response = match &registration {
            Registration::Client(request) => self.gateway.register_client(request).await,
            Registration::Professional(request) => {
                self.gateway.register_professional(request).await
            }
        }
        .map_err(|e| ScreenError::backend(e, text::REGISTER_FAILED))?;

        tracing::info!(user = %response.user.id, "Registered");
        self.session.login(response.user);
        self.navigator.navigate(Route::Home);
        Ok(self.session.require()?)
    }

    /// Back to login.
    pub fn back(&self) {
        self.navigator.navigate(Route::Login);
    }
}

/// The password recovery screen.
///
/// Only validates the email and confirms; no request is sent.
pub struct ForgotPasswordScreen {
    navigator: Arc<dyn Navigator>,
    /// Form fields.
    pub form: ForgotPasswordForm,
    error: Option<String>,
    notice: Option<&'static str>,
}

impl ForgotPasswordScreen {
    pub(crate) fn new(navigator: Arc<dyn Navigator>) -> Self {
        Self {
            navigator,
            form: ForgotPasswordForm::default(),
            error: None,
            notice: None,
        }
    }

    /// Inline error under the form.
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Confirmation shown after a valid submit.
    pub fn notice(&self) -> Option<&'static str> {
        self.notice
    }

    /// Validate the email and show the confirmation.
    pub fn submit(&mut self) -> Result<&'static str, ScreenError> {
        match self.form.validate() {
            Ok(email) => {
                tracing::info!(%email, "Password reset requested");
                self.error = None;
                self.notice = Some(text::RESET_REQUESTED);
                Ok(text::RESET_REQUESTED)
            }
            Err(e) => {
                self.error = Some(e.to_string());
                self.notice = None;
                Err(e.into())
            }
        }
    }

    /// Back to login.
    pub fn back(&self) {
        self.navigator.navigate(Route::Login);
    }
}
