//! Mock gateway for testing.
//!
//! An in-memory backend: accounts, professionals and connections live in a
//! shared store, every call is recorded, and failures can be forced.

use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use profesionales_types::{
    ApiError, Connection, ConnectionId, CreateConnectionRequest, Identity, LoginRequest,
    LoginResponse, ProfessionalFields, ProfessionalProfile, RegisterClientRequest,
    RegisterProfessionalRequest, Role, UserId,
};

use super::{Gateway, GatewayError};

/// A recorded gateway call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GatewayCall {
    /// `login`.
    Login {
        /// Email used.
        email: String,
    },
    /// `register_client` or `register_professional`.
    Register {
        /// Email registered.
        email: String,
        /// Role registered.
        role: Role,
    },
    /// `list_professionals`.
    ListProfessionals,
    /// `search_professionals`.
    Search {
        /// Search term.
        term: String,
    },
    /// `professional`.
    Professional {
        /// Requested id.
        id: UserId,
    },
    /// `create_connection`.
    CreateConnection {
        /// Client side.
        client: UserId,
        /// Professional side.
        professional: UserId,
    },
    /// `check_connection`.
    CheckConnection {
        /// Client side.
        client: UserId,
        /// Professional side.
        professional: UserId,
    },
    /// `client_connections`.
    ClientConnections {
        /// Client whose list was fetched.
        client: UserId,
    },
    /// `delete_connection`.
    DeleteConnection {
        /// Connection deleted.
        id: ConnectionId,
    },
}

/// A registered account.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MockAccount {
    /// The account's identity.
    pub identity: Identity,
    /// Plain password.
    pub password: String,
}

/// Persistable backend contents.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MockBackend {
    /// Registered accounts.
    #[serde(default)]
    pub accounts: Vec<MockAccount>,
    /// Professional profiles.
    #[serde(default)]
    pub professionals: Vec<ProfessionalProfile>,
    /// Active connections.
    #[serde(default)]
    pub connections: Vec<Connection>,
}

#[derive(Debug, Default)]
struct MockGatewayInner {
    backend: MockBackend,
    calls: Vec<GatewayCall>,
    token: Option<String>,
    next_connection_ids: VecDeque<ConnectionId>,
    fail_next: Option<GatewayError>,
    search_delays: HashMap<String, Duration>,
}

/// Mock gateway for testing.
///
/// Cloning yields another handle to the same backend.
#[derive(Debug, Clone, Default)]
pub struct MockGateway {
    inner: Arc<Mutex<MockGatewayInner>>,
}

impl MockGateway {
    /// Create an empty backend.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a backend from persisted contents.
    pub fn from_backend(backend: MockBackend) -> Self {
        let gateway = Self::new();
        gateway.lock().backend = backend;
        gateway
    }

    /// Backend seeded with a demo client and a few professionals.
    pub fn seeded() -> Self {
        let gateway = Self::new();
        gateway.add_account(
            Identity {
                id: UserId::new("c1"),
                first_name: "Ana".into(),
                last_name: "López".into(),
                role: Role::Client,
                email: "ana@example.com".into(),
                phone: Some("099123456".into()),
                address: Some("18 de Julio 1234, Montevideo".into()),
                professional_fields: ProfessionalFields::default(),
            },
            "Abc12345!",
        );
        for (id, first, last, profession, phone) in [
            ("p1", "Juan", "Pérez", "Plomero", "099111222"),
            ("p2", "Carlos", "Ruiz", "Plomero", "098333444"),
            ("p3", "María", "Gómez", "Gasista", "097555666"),
            ("p4", "Karen", "Han", "Arquitecta", "096777888"),
        ] {
            gateway.add_professional(ProfessionalProfile {
                id: UserId::new(id),
                first_name: first.into(),
                last_name: last.into(),
                profession: Some(profession.into()),
                specialties: vec![],
                years_of_experience: Some(5),
                services: vec![],
                ratings: vec![],
                avatar: None,
                phone: Some(phone.into()),
            });
        }
        gateway
    }

    fn lock(&self) -> MutexGuard<'_, MockGatewayInner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Snapshot of the backend contents.
    pub fn backend(&self) -> MockBackend {
        self.lock().backend.clone()
    }

    /// Register an account directly.
    pub fn add_account(&self, identity: Identity, password: &str) {
        self.lock().backend.accounts.push(MockAccount {
            identity,
            password: password.to_string(),
        });
    }

    /// Add a professional profile.
    pub fn add_professional(&self, profile: ProfessionalProfile) {
        self.lock().backend.professionals.push(profile);
    }

    /// Current connections.
    pub fn connections(&self) -> Vec<Connection> {
        self.lock().backend.connections.clone()
    }

    /// Make the next created connection use this id.
    pub fn queue_connection_id(&self, id: &str) {
        self.lock()
            .next_connection_ids
            .push_back(ConnectionId::new(id));
    }

    /// Cause the next call to fail with the given error.
    pub fn fail_next(&self, error: GatewayError) {
        self.lock().fail_next = Some(error);
    }

    /// Delay answers to searches for `term`.
    pub fn delay_search(&self, term: &str, delay: Duration) {
        self.lock().search_delays.insert(term.to_string(), delay);
    }

    /// Get all calls that were made.
    pub fn calls(&self) -> Vec<GatewayCall> {
        self.lock().calls.clone()
    }

    /// Count calls matching `predicate`.
    pub fn count_calls(&self, predicate: impl Fn(&GatewayCall) -> bool) -> usize {
        self.lock().calls.iter().filter(|c| predicate(c)).count()
    }

    /// Forget recorded calls.
    pub fn clear_calls(&self) {
        self.lock().calls.clear();
    }

    /// Record a call and take any forced failure.
    fn begin(&self, call: GatewayCall) -> Result<MutexGuard<'_, MockGatewayInner>, GatewayError> {
        let mut inner = self.lock();
        inner.calls.push(call);
        match inner.fail_next.take() {
            Some(error) => Err(error),
            None => Ok(inner),
        }
    }

    fn register(
        &self,
        request: &RegisterClientRequest,
        role: Role,
        professional_fields: ProfessionalFields,
    ) -> Result<LoginResponse, GatewayError> {
        let mut inner = self.begin(GatewayCall::Register {
            email: request.email.clone(),
            role,
        })?;

        if inner
            .backend
            .accounts
            .iter()
            .any(|a| a.identity.email.eq_ignore_ascii_case(&request.email))
        {
            return Err(ApiError::Rejected {
                status: 400,
                message: Some("El email ya está registrado".into()),
            }
            .into());
        }

        let identity = Identity {
            id: UserId::new(uuid::Uuid::new_v4().simple().to_string()),
            first_name: request.first_name.clone(),
            last_name: request.last_name.clone(),
            role,
            email: request.email.clone(),
            phone: Some(request.phone.clone()),
            address: Some(request.address.clone()),
            professional_fields,
        };

        if role == Role::Professional {
            let fields = &identity.professional_fields;
            inner.backend.professionals.push(ProfessionalProfile {
                id: identity.id.clone(),
                first_name: identity.first_name.clone(),
                last_name: identity.last_name.clone(),
                profession: fields.profession.clone(),
                specialties: fields.specialties.clone(),
                years_of_experience: fields.years_of_experience,
                services: fields.services.clone(),
                ratings: vec![],
                avatar: None,
                phone: identity.phone.clone(),
            });
        }

        inner.backend.accounts.push(MockAccount {
            identity: identity.clone(),
            password: request.password.clone(),
        });
        let token = format!("mock-token-{}", identity.id);
        inner.token = Some(token.clone());
        Ok(LoginResponse {
            user: identity,
            token,
        })
    }
}

fn not_found(message: &str) -> GatewayError {
    ApiError::NotFound {
        message: Some(message.to_string()),
    }
    .into()
}

#[async_trait]
impl Gateway for MockGateway {
    async fn login(&self, request: &LoginRequest) -> Result<LoginResponse, GatewayError> {
        let mut inner = self.begin(GatewayCall::Login {
            email: request.email.clone(),
        })?;

        let identity = inner
            .backend
            .accounts
            .iter()
            .find(|a| {
                a.identity.email.eq_ignore_ascii_case(&request.email)
                    && a.password == request.password
            })
            .map(|a| a.identity.clone())
            .ok_or(GatewayError::Api(ApiError::Rejected {
                status: 401,
                message: Some("Credenciales inválidas".into()),
            }))?;

        let token = format!("mock-token-{}", identity.id);
        inner.token = Some(token.clone());
        Ok(LoginResponse {
            user: identity,
            token,
        })
    }

    async fn register_client(
        &self,
        request: &RegisterClientRequest,
    ) -> Result<LoginResponse, GatewayError> {
        self.register(request, Role::Client, ProfessionalFields::default())
    }

    async fn register_professional(
        &self,
        request: &RegisterProfessionalRequest,
    ) -> Result<LoginResponse, GatewayError> {
        let fields = ProfessionalFields {
            profession: Some(request.profession.clone()),
            specialties: request.specialties.clone(),
            years_of_experience: Some(request.years_of_experience),
            services: request.services.clone(),
            coverage_radius_km: Some(request.coverage_radius_km),
        };
        self.register(&request.base, Role::Professional, fields)
    }

    async fn list_professionals(&self) -> Result<Vec<ProfessionalProfile>, GatewayError> {
        let inner = self.begin(GatewayCall::ListProfessionals)?;
        Ok(inner.backend.professionals.clone())
    }

    async fn search_professionals(
        &self,
        term: &str,
    ) -> Result<Vec<ProfessionalProfile>, GatewayError> {
        let (results, delay) = {
            let inner = self.begin(GatewayCall::Search {
                term: term.to_string(),
            })?;
            let needle = term.to_lowercase();
            let results: Vec<_> = inner
                .backend
                .professionals
                .iter()
                .filter(|p| {
                    p.profession
                        .as_deref()
                        .is_some_and(|prof| prof.to_lowercase().contains(&needle))
                })
                .cloned()
                .collect();
            (results, inner.search_delays.get(term).copied())
        };

        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        Ok(results)
    }

    async fn professional(&self, id: &UserId) -> Result<ProfessionalProfile, GatewayError> {
        let inner = self.begin(GatewayCall::Professional { id: id.clone() })?;
        inner
            .backend
            .professionals
            .iter()
            .find(|p| &p.id == id)
            .cloned()
            .ok_or_else(|| not_found("Profesional no encontrado"))
    }

    async fn create_connection(
        &self,
        request: &CreateConnectionRequest,
    ) -> Result<ConnectionId, GatewayError> {
        let mut inner = self.begin(GatewayCall::CreateConnection {
            client: request.client_id.clone(),
            professional: request.professional_id.clone(),
        })?;

        let summary = inner
            .backend
            .professionals
            .iter()
            .find(|p| p.id == request.professional_id)
            .map(ProfessionalProfile::summary)
            .ok_or_else(|| not_found("Profesional no encontrado"))?;

        let duplicate = inner.backend.connections.iter().any(|c| {
            c.client_id == request.client_id && c.professional.id == request.professional_id
        });
        if duplicate {
            return Err(ApiError::Conflict {
                message: Some("Ya existe una conexión con este profesional".into()),
            }
            .into());
        }

        let id = inner
            .next_connection_ids
            .pop_front()
            .unwrap_or_else(|| ConnectionId::new(uuid::Uuid::new_v4().simple().to_string()));
        inner.backend.connections.push(Connection {
            id: id.clone(),
            client_id: request.client_id.clone(),
            professional: summary,
            created_at: None,
        });
        Ok(id)
    }

    async fn check_connection(
        &self,
        client: &UserId,
        professional: &UserId,
    ) -> Result<Option<ConnectionId>, GatewayError> {
        let inner = self.begin(GatewayCall::CheckConnection {
            client: client.clone(),
            professional: professional.clone(),
        })?;
        Ok(inner
            .backend
            .connections
            .iter()
            .find(|c| &c.client_id == client && &c.professional.id == professional)
            .map(|c| c.id.clone()))
    }

    async fn client_connections(&self, client: &UserId) -> Result<Vec<Connection>, GatewayError> {
        let inner = self.begin(GatewayCall::ClientConnections {
            client: client.clone(),
        })?;
        Ok(inner
            .backend
            .connections
            .iter()
            .filter(|c| &c.client_id == client)
            .cloned()
            .collect())
    }

    async fn delete_connection(&self, id: &ConnectionId) -> Result<(), GatewayError> {
        let mut inner = self.begin(GatewayCall::DeleteConnection { id: id.clone() })?;
        let before = inner.backend.connections.len();
        inner.backend.connections.retain(|c| &c.id != id);
        if inner.backend.connections.len() == before {
            return Err(not_found("Conexión no encontrada"));
        }
        Ok(())
    }

    fn set_token(&self, token: Option<String>) {
        self.lock().token = token;
    }

    fn token(&self) -> Option<String> {
        self.lock().token.clone()
    }
}
