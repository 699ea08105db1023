//! The signed-in actor and its role-specific fields.

use serde::{Deserialize, Serialize};

use crate::{Service, UserId};

/// Account role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Role {
    /// Browses professionals and opens connections.
    #[serde(rename = "cliente")]
    Client,
    /// Exposes a profile and receives connections.
    #[serde(rename = "profesional")]
    Professional,
}

impl Role {
    /// Backend spelling of the role (also used in registration paths).
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Client => "cliente",
            Role::Professional => "profesional",
        }
    }
}

/// Fields that only carry meaning for professionals.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProfessionalFields {
    /// Main profession ("Plomero", "Electricista", ...).
    #[serde(rename = "profesion", default, skip_serializing_if = "Option::is_none")]
    pub profession: Option<String>,
    /// Specialties, in the order the professional listed them.
    #[serde(rename = "especialidades", default, skip_serializing_if = "Vec::is_empty")]
    pub specialties: Vec<String>,
    /// Years of experience.
    #[serde(rename = "experiencia", default, skip_serializing_if = "Option::is_none")]
    pub years_of_experience: Option<u32>,
    /// Services offered.
    #[serde(rename = "servicios", default, skip_serializing_if = "Vec::is_empty")]
    pub services: Vec<Service>,
    /// Coverage radius in kilometres.
    #[serde(rename = "radioCobertura", default, skip_serializing_if = "Option::is_none")]
    pub coverage_radius_km: Option<f64>,
}

/// The signed-in user, as returned by login and registration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Identity {
    /// Backend id.
    #[serde(rename = "_id")]
    pub id: UserId,
    /// First name.
    #[serde(rename = "nombre")]
    pub first_name: String,
    /// Last name.
    #[serde(rename = "apellido", default)]
    pub last_name: String,
    /// Role of the account.
    #[serde(rename = "rol")]
    pub role: Role,
    /// Contact email.
    pub email: String,
    /// Contact phone.
    #[serde(rename = "telefono", default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    /// Free-text address.
    #[serde(rename = "direccion", default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    /// Role-specific fields, populated only for professionals.
    #[serde(flatten)]
    pub professional_fields: ProfessionalFields,
}

impl Identity {
    /// "First Last", trimmed when the last name is missing.
    pub fn display_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
            .trim()
            .to_string()
    }

    /// Check the role.
    pub fn is_professional(&self) -> bool {
        self.role == Role::Professional
    }

    /// Role-specific fields, or `None` for clients.
    ///
    /// Client payloads may still carry stray professional keys; they are
    /// ignored here.
    pub fn professional(&self) -> Option<&ProfessionalFields> {
        if self.is_professional() {
            Some(&self.professional_fields)
        } else {
            None
        }
    }
}
