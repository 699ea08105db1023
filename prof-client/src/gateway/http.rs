//! HTTP gateway: the real backend over reqwest.

use std::sync::{PoisonError, RwLock};
use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Url};
use serde::de::DeserializeOwned;

use profesionales_types::{
    Acknowledgement, Connection, ConnectionCheck, ConnectionId, CreateConnectionRequest,
    CreatedConnection, Envelope, LoginRequest, LoginResponse, ProfessionalProfile,
    RegisterClientRequest, RegisterProfessionalRequest, UserId,
};

use super::{Gateway, GatewayError};
use crate::config::ApiConfig;

/// Gateway that talks JSON over HTTP.
#[derive(Debug)]
pub struct HttpGateway {
    base_url: Url,
    http: Client,
    token: RwLock<Option<String>>,
}

impl HttpGateway {
    /// Create a gateway for `base_url` (e.g. `http://127.0.0.1:4000/api`).
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, GatewayError> {
        let parsed = Url::parse(base_url.trim_end_matches('/'))
            .map_err(|e| GatewayError::Http(format!("invalid base URL {base_url}: {e}")))?;
        if parsed.cannot_be_a_base() {
            return Err(GatewayError::Http(format!("invalid base URL {base_url}")));
        }

        let http = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            base_url: parsed,
            http,
            token: RwLock::new(None),
        })
    }

    /// Create a gateway from the `[api]` config section.
    pub fn from_config(config: &ApiConfig) -> Result<Self, GatewayError> {
        Self::new(&config.base_url, Duration::from_secs(config.timeout_secs))
    }

    /// Get the base URL.
    pub fn base_url(&self) -> &str {
        self.base_url.as_str()
    }

    /// Build the URL for an endpoint. Each segment is percent-encoded, so
    /// ids can never change which endpoint is called.
    pub fn url(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        match self.token() {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    async fn fetch<T: DeserializeOwned>(
        &self,
        request: RequestBuilder,
        endpoint: &str,
    ) -> Result<T, GatewayError> {
        let response = self.authorize(request).send().await.map_err(|e| {
            tracing::warn!(endpoint, error = %e, "Request failed");
            GatewayError::from(e)
        })?;
        let status = response.status().as_u16();
        let body = response.bytes().await?;

        tracing::debug!(endpoint, status, bytes = body.len(), "Response received");
        Envelope::parse(status, &body).map_err(|e| {
            tracing::debug!(endpoint, status, error = %e, "Backend rejected request");
            GatewayError::from(e)
        })
    }
}

#[async_trait]
impl Gateway for HttpGateway {
    async fn login(&self, request: &LoginRequest) -> Result<LoginResponse, GatewayError> {
        let request = self.http.post(self.url(&["auth", "login"])).json(request);
        let response: LoginResponse = self.fetch(request, "auth/login").await?;
        self.set_token(Some(response.token.clone()));
        tracing::info!(user = %response.user.id, "Logged in");
        Ok(response)
    }

    async fn register_client(
        &self,
        request: &RegisterClientRequest,
    ) -> Result<LoginResponse, GatewayError> {
        let request = self
            .http
            .post(self.url(&["auth", "registro", "cliente"]))
            .json(request);
        let response: LoginResponse = self.fetch(request, "auth/registro/cliente").await?;
        self.set_token(Some(response.token.clone()));
        Ok(response)
    }

    async fn register_professional(
        &self,
        request: &RegisterProfessionalRequest,
    ) -> Result<LoginResponse, GatewayError> {
        let request = self
            .http
            .post(self.url(&["auth", "registro", "profesional"]))
            .json(request);
        let response: LoginResponse = self.fetch(request, "auth/registro/profesional").await?;
        self.set_token(Some(response.token.clone()));
        Ok(response)
    }

    async fn list_professionals(&self) -> Result<Vec<ProfessionalProfile>, GatewayError> {
        let request = self.http.get(self.url(&["profiles", "profesionales"]));
        self.fetch(request, "profiles/profesionales").await
    }

    async fn search_professionals(
        &self,
        term: &str,
    ) -> Result<Vec<ProfessionalProfile>, GatewayError> {
        let request = self
            .http
            .get(self.url(&["profiles", "profesionales", "buscar"]))
            .query(&[("profesion", term)]);
        self.fetch(request, "profiles/profesionales/buscar").await
    }

    async fn professional(&self, id: &UserId) -> Result<ProfessionalProfile, GatewayError> {
        let request = self
            .http
            .get(self.url(&["profiles", "profesional", id.as_str()]));
        self.fetch(request, "profiles/profesional").await
    }

    async fn create_connection(
        &self,
        request: &CreateConnectionRequest,
    ) -> Result<ConnectionId, GatewayError> {
        let request = self.http.post(self.url(&["connections", "crear"])).json(request);
        let created: CreatedConnection = self.fetch(request, "connections/crear").await?;
        Ok(created.id)
    }

    async fn check_connection(
        &self,
        client: &UserId,
        professional: &UserId,
    ) -> Result<Option<ConnectionId>, GatewayError> {
        let request = self.http.get(self.url(&["connections", "verificar"])).query(&[
            ("clienteId", client.as_str()),
            ("profesionalId", professional.as_str()),
        ]);
        let check: ConnectionCheck = self.fetch(request, "connections/verificar").await?;
        Ok(check.active())
    }

    async fn client_connections(&self, client: &UserId) -> Result<Vec<Connection>, GatewayError> {
        let request = self
            .http
            .get(self.url(&["connections", "cliente", client.as_str()]));
        self.fetch(request, "connections/cliente").await
    }

    async fn delete_connection(&self, id: &ConnectionId) -> Result<(), GatewayError> {
        let request = self.http.delete(self.url(&["connections", id.as_str()]));
        let response = self.authorize(request).send().await?;
        let status = response.status().as_u16();
        let body = response.bytes().await?;

        tracing::debug!(endpoint = "connections/delete", status, "Response received");
        Acknowledgement::parse(status, &body)?;
        Ok(())
    }

    fn set_token(&self, token: Option<String>) {
        *self.token.write().unwrap_or_else(PoisonError::into_inner) = token;
    }

    fn token(&self) -> Option<String> {
        self.token
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn url_joins_without_double_slash() {
        let gateway = HttpGateway::new("http://127.0.0.1:4000/api/", Duration::from_secs(5)).unwrap();
        assert_eq!(gateway.base_url(), "http://127.0.0.1:4000/api");
        assert_eq!(
            gateway.url(&["auth", "login"]).as_str(),
            "http://127.0.0.1:4000/api/auth/login"
        );

        let bare = HttpGateway::new("http://localhost", Duration::from_secs(5)).unwrap();
        assert_eq!(bare.url(&["auth", "login"]).as_str(), "http://localhost/auth/login");
    }

    #[test]
    fn ids_are_escaped_into_one_segment() {
        let gateway = HttpGateway::new("http://127.0.0.1:4000/api", Duration::from_secs(5)).unwrap();
        let url = gateway.url(&["connections", "k1/../auth?x=1#frag"]);

        assert_eq!(
            url.as_str(),
            "http://127.0.0.1:4000/api/connections/k1%2F..%2Fauth%3Fx=1%23frag"
        );
        assert_eq!(url.query(), None);
        assert_eq!(url.fragment(), None);
    }

    #[test]
    fn rejects_unusable_base_url() {
        assert!(HttpGateway::new("not a url", Duration::from_secs(5)).is_err());
        assert!(HttpGateway::new("mailto:ana@example.com", Duration::from_secs(5)).is_err());
    }

    #[test]
    fn token_round_trip() {
        let gateway = HttpGateway::new("http://localhost", Duration::from_secs(5)).unwrap();
        assert_eq!(gateway.token(), None);
        gateway.set_token(Some("jwt".into()));
        assert_eq!(gateway.token().as_deref(), Some("jwt"));
        gateway.set_token(None);
        assert_eq!(gateway.token(), None);
    }
}
