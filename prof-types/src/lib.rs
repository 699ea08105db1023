//! # prof-types
//!
//! Wire types for the ProfesionalesUY marketplace backend.
//!
//! This crate provides the foundational types used across all crates:
//! - [`UserId`], [`ConnectionId`] - Backend identifiers
//! - [`Identity`], [`Role`] - The signed-in actor
//! - [`ProfessionalProfile`], [`Connection`] - Marketplace entities
//! - [`Envelope`] - Response wrapper shared by every endpoint
//! - [`ApiError`] - Errors reported by the backend

#![warn(missing_docs)]
#![warn(clippy::all)]

mod connection;
mod envelope;
mod error;
mod identity;
mod ids;
mod profile;
mod requests;

pub use connection::{Connection, ConnectionCheck, CreatedConnection};
pub use envelope::{Acknowledgement, Envelope};
pub use error::ApiError;
pub use identity::{Identity, ProfessionalFields, Role};
pub use ids::{ConnectionId, UserId};
pub use profile::{ProfessionalProfile, ProfessionalSummary, Rating, Service};
pub use requests::{
    Coordinates, CreateConnectionRequest, LoginRequest, LoginResponse,
    RegisterClientRequest, RegisterProfessionalRequest,
};
