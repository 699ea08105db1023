//! Professional profiles as listed, searched and viewed by clients.

use serde::{Deserialize, Serialize};

use crate::UserId;

/// A service offered by a professional.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Service {
    /// Service name.
    #[serde(rename = "nombre")]
    pub name: String,
    /// Optional description.
    #[serde(rename = "descripcion", default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Optional reference price.
    #[serde(rename = "precio", default, skip_serializing_if = "Option::is_none")]
    pub price: Option<f64>,
}

/// A client's rating of a professional.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Rating {
    /// Score, 1 to 5.
    #[serde(rename = "puntaje")]
    pub score: f64,
    /// Free-text comment.
    #[serde(rename = "comentario", default)]
    pub comment: String,
}

/// A professional as returned by the listing, search and detail endpoints.
///
/// List and search results omit services and ratings; every collection
/// defaults to empty so one type serves all three endpoints.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProfessionalProfile {
    /// Backend id.
    #[serde(rename = "_id")]
    pub id: UserId,
    /// First name.
    #[serde(rename = "nombre")]
    pub first_name: String,
    /// Last name.
    #[serde(rename = "apellido", default)]
    pub last_name: String,
    /// Main profession.
    #[serde(rename = "profesion", default)]
    pub profession: Option<String>,
    /// Specialties, in listed order.
    #[serde(rename = "especialidades", default)]
    pub specialties: Vec<String>,
    /// Years of experience.
    #[serde(rename = "experiencia", default)]
    pub years_of_experience: Option<u32>,
    /// Services offered (detail endpoint only).
    #[serde(rename = "servicios", default)]
    pub services: Vec<Service>,
    /// Ratings received (detail endpoint only).
    #[serde(rename = "calificaciones", default)]
    pub ratings: Vec<Rating>,
    /// Avatar URL.
    #[serde(default)]
    pub avatar: Option<String>,
    /// Contact phone.
    #[serde(rename = "telefono", default)]
    pub phone: Option<String>,
}

impl ProfessionalProfile {
    /// "First Last".
    pub fn display_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
            .trim()
            .to_string()
    }

    /// Profession, or the generic label shown when none is set.
    pub fn profession_label(&self) -> &str {
        self.profession.as_deref().unwrap_or("Profesional")
    }

    /// Mean rating score, `None` when unrated.
    pub fn average_rating(&self) -> Option<f64> {
        if self.ratings.is_empty() {
            return None;
        }
        let total: f64 = self.ratings.iter().map(|r| r.score).sum();
        Some(total / self.ratings.len() as f64)
    }

    /// Snapshot stored on a connection.
    pub fn summary(&self) -> ProfessionalSummary {
        ProfessionalSummary {
            id: self.id.clone(),
            first_name: self.first_name.clone(),
            last_name: self.last_name.clone(),
            profession: self.profession.clone(),
            avatar: self.avatar.clone(),
            rating: self.average_rating(),
        }
    }
}

/// Denormalized professional snapshot embedded in a connection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProfessionalSummary {
    /// Backend id of the professional.
    #[serde(rename = "_id")]
    pub id: UserId,
    /// First name.
    #[serde(rename = "nombre")]
    pub first_name: String,
    /// Last name.
    #[serde(rename = "apellido", default)]
    pub last_name: String,
    /// Main profession.
    #[serde(rename = "profesion", default)]
    pub profession: Option<String>,
    /// Avatar URL.
    #[serde(default)]
    pub avatar: Option<String>,
    /// Average rating at the time of the snapshot.
    #[serde(rename = "calificacion", default)]
    pub rating: Option<f64>,
}

impl ProfessionalSummary {
    /// "First Last".
    pub fn display_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
            .trim()
            .to_string()
    }
}
