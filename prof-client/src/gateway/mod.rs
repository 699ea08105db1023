//! Backend gateway abstraction for ProfesionalesUY.
//!
//! This module provides a pluggable gateway that abstracts how the REST
//! backend is reached (reqwest over HTTP, in-memory mock for testing).
//!
//! # Design
//!
//! One async method per backend endpoint. Every method returns the decoded
//! payload or a [`GatewayError`]; callers never see raw status codes or
//! envelopes.
//!
//! # Example
//!
//! ```ignore
//! let gateway = MockGateway::new();
//! let session = gateway.login(&request).await?;
//! let list = gateway.client_connections(&session.user.id).await?;
//! ```

mod http;
mod mock;

pub use http::HttpGateway;
pub use mock::{GatewayCall, MockAccount, MockBackend, MockGateway};

use async_trait::async_trait;
use thiserror::Error;

use profesionales_core::text;
use profesionales_types::{
    ApiError, Connection, ConnectionId, CreateConnectionRequest, LoginRequest, LoginResponse,
    ProfessionalProfile, RegisterClientRequest, RegisterProfessionalRequest, UserId,
};

/// Gateway errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GatewayError {
    /// The backend answered with an error.
    #[error(transparent)]
    Api(#[from] ApiError),

    /// The backend could not be reached.
    #[error("connection failed: {0}")]
    ConnectionFailed(String),

    /// The request timed out.
    #[error("request timed out")]
    Timeout,

    /// Any other HTTP-level failure.
    #[error("http error: {0}")]
    Http(String),
}

impl From<reqwest::Error> for GatewayError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            GatewayError::Timeout
        } else if e.is_connect() {
            GatewayError::ConnectionFailed(e.to_string())
        } else if e.is_decode() {
            GatewayError::Api(ApiError::Malformed(e.to_string()))
        } else {
            GatewayError::Http(e.to_string())
        }
    }
}

impl GatewayError {
    /// True for a duplicate-resource answer (HTTP 409).
    pub fn is_conflict(&self) -> bool {
        matches!(self, GatewayError::Api(ApiError::Conflict { .. }))
    }

    /// True when the backend was never reached or did not answer.
    pub fn is_transport(&self) -> bool {
        matches!(
            self,
            GatewayError::ConnectionFailed(_) | GatewayError::Timeout | GatewayError::Http(_)
        )
    }

    /// Text to show the user.
    ///
    /// Server messages are shown verbatim. Transport failures use the
    /// generic network message; other failures use `fallback`.
    pub fn user_message(&self, fallback: &str) -> String {
        match self {
            GatewayError::Api(e) => e.user_message(fallback),
            _ => text::NETWORK_ERROR.to_string(),
        }
    }
}

/// The ProfesionalesUY REST backend.
///
/// Implementations handle how requests reach the backend (HTTP, mock).
#[async_trait]
pub trait Gateway: Send + Sync {
    /// `POST /auth/login`. Retains the returned token for later calls.
    async fn login(&self, request: &LoginRequest) -> Result<LoginResponse, GatewayError>;

    /// `POST /auth/registro/cliente`.
    async fn register_client(
        &self,
        request: &RegisterClientRequest,
    ) -> Result<LoginResponse, GatewayError>;

    /// `POST /auth/registro/profesional`.
    async fn register_professional(
        &self,
        request: &RegisterProfessionalRequest,
    ) -> Result<LoginResponse, GatewayError>;

    /// `GET /profiles/profesionales`.
    async fn list_professionals(&self) -> Result<Vec<ProfessionalProfile>, GatewayError>;

    /// `GET /profiles/profesionales/buscar?profesion=<term>`.
    async fn search_professionals(
        &self,
        term: &str,
    ) -> Result<Vec<ProfessionalProfile>, GatewayError>;

    /// `GET /profiles/profesional/:id`.
    async fn professional(&self, id: &UserId) -> Result<ProfessionalProfile, GatewayError>;

    /// `POST /connections/crear`. Returns the new connection's id.
    async fn create_connection(
        &self,
        request: &CreateConnectionRequest,
    ) -> Result<ConnectionId, GatewayError>;

    /// `GET /connections/verificar`. Returns the active connection, if any.
    async fn check_connection(
        &self,
        client: &UserId,
        professional: &UserId,
    ) -> Result<Option<ConnectionId>, GatewayError>;

    /// `GET /connections/cliente/:clienteId`.
    async fn client_connections(&self, client: &UserId) -> Result<Vec<Connection>, GatewayError>;

    /// `DELETE /connections/:connectionId`.
    async fn delete_connection(&self, id: &ConnectionId) -> Result<(), GatewayError>;

    /// Replace the bearer token (restored session or logout).
    fn set_token(&self, token: Option<String>);

    /// The bearer token currently attached to requests.
    fn token(&self) -> Option<String>;
}
