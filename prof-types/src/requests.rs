//! Request bodies sent to the backend.

use serde::{Deserialize, Serialize, Serializer};

use crate::{Identity, Service, UserId};

/// A `[longitude, latitude]` pair.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates(pub [f64; 2]);

impl Coordinates {
    /// Placeholder used when an address cannot be geocoded.
    pub const ORIGIN: Coordinates = Coordinates([0.0, 0.0]);

    /// Build from longitude and latitude.
    pub fn new(longitude: f64, latitude: f64) -> Self {
        Self([longitude, latitude])
    }

    /// Longitude in degrees.
    pub fn longitude(&self) -> f64 {
        self.0[0]
    }

    /// Latitude in degrees.
    pub fn latitude(&self) -> f64 {
        self.0[1]
    }

    /// True for the `[0, 0]` placeholder.
    pub fn is_origin(&self) -> bool {
        *self == Self::ORIGIN
    }
}

impl Default for Coordinates {
    fn default() -> Self {
        Self::ORIGIN
    }
}

/// Serializes coordinates as a GeoJSON point.
fn geo_point<S>(coordinates: &Coordinates, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    #[derive(Serialize)]
    struct Point<'a> {
        #[serde(rename = "type")]
        kind: &'static str,
        coordinates: &'a [f64; 2],
    }

    Point {
        kind: "Point",
        coordinates: &coordinates.0,
    }
    .serialize(serializer)
}

/// `POST /auth/login`.
#[derive(Clone, Serialize)]
pub struct LoginRequest {
    /// Account email.
    pub email: String,
    /// Plain password (sent over TLS).
    pub password: String,
}

impl std::fmt::Debug for LoginRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoginRequest")
            .field("email", &self.email)
            .field("password", &"[REDACTED]")
            .finish()
    }
}

/// Successful login payload (`data` of the envelope).
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct LoginResponse {
    /// The signed-in user.
    #[serde(rename = "usuario")]
    pub user: Identity,
    /// Bearer token for subsequent calls.
    pub token: String,
}

/// `POST /auth/registro/cliente`.
#[derive(Clone, Serialize)]
pub struct RegisterClientRequest {
    /// First name.
    #[serde(rename = "nombre")]
    pub first_name: String,
    /// Last name.
    #[serde(rename = "apellido")]
    pub last_name: String,
    /// Email.
    pub email: String,
    /// Password.
    pub password: String,
    /// Phone.
    #[serde(rename = "telefono")]
    pub phone: String,
    /// Free-text address.
    #[serde(rename = "direccion")]
    pub address: String,
    /// Geocoded address.
    #[serde(rename = "ubicacion", serialize_with = "geo_point")]
    pub location: Coordinates,
}

impl std::fmt::Debug for RegisterClientRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RegisterClientRequest")
            .field("email", &self.email)
            .field("password", &"[REDACTED]")
            .field("location", &self.location)
            .finish_non_exhaustive()
    }
}

/// `POST /auth/registro/profesional`.
#[derive(Clone, Serialize)]
pub struct RegisterProfessionalRequest {
    /// Common identity fields.
    #[serde(flatten)]
    pub base: RegisterClientRequest,
    /// Main profession.
    #[serde(rename = "profesion")]
    pub profession: String,
    /// Specialties, in listed order.
    #[serde(rename = "especialidades")]
    pub specialties: Vec<String>,
    /// Years of experience.
    #[serde(rename = "experiencia")]
    pub years_of_experience: u32,
    /// Services offered.
    #[serde(rename = "servicios")]
    pub services: Vec<Service>,
    /// Coverage radius in kilometres.
    #[serde(rename = "radioCobertura")]
    pub coverage_radius_km: f64,
}

impl std::fmt::Debug for RegisterProfessionalRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RegisterProfessionalRequest")
            .field("base", &self.base)
            .field("profession", &self.profession)
            .finish_non_exhaustive()
    }
}

/// `POST /connections/crear`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CreateConnectionRequest {
    /// Requesting client.
    #[serde(rename = "clienteId")]
    pub client_id: UserId,
    /// Target professional.
    #[serde(rename = "profesionalId")]
    pub professional_id: UserId,
}
