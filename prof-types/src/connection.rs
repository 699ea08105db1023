//! Client/professional connections.

use serde::{Deserialize, Deserializer, Serialize};

use crate::{ConnectionId, ProfessionalSummary, UserId};

/// An active connection: the client's authorization to message a professional.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Connection {
    /// Backend id, used for teardown.
    #[serde(rename = "_id")]
    pub id: ConnectionId,
    /// The client side of the pair.
    #[serde(rename = "clienteId", deserialize_with = "user_ref")]
    pub client_id: UserId,
    /// Profile snapshot of the professional side.
    #[serde(rename = "profesional")]
    pub professional: ProfessionalSummary,
    /// Creation timestamp as sent by the backend (ISO-8601).
    #[serde(rename = "createdAt", default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
}

/// Payload of `POST /connections/crear`; only the id is relied on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreatedConnection {
    /// Id of the new connection.
    #[serde(rename = "_id")]
    pub id: ConnectionId,
}

/// Answer of the existence check for a (client, professional) pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConnectionCheck {
    /// Whether an active connection exists.
    #[serde(rename = "conectado")]
    pub connected: bool,
    /// Id of the active connection, when one exists.
    #[serde(rename = "conexionId", default, skip_serializing_if = "Option::is_none")]
    pub connection_id: Option<ConnectionId>,
}

impl ConnectionCheck {
    /// The connection id, only when the pair is reported connected.
    pub fn active(self) -> Option<ConnectionId> {
        if self.connected {
            self.connection_id
        } else {
            None
        }
    }
}

/// A reference the backend may send either as a bare id or populated.
#[derive(Deserialize)]
#[serde(untagged)]
enum Reference {
    Id(UserId),
    Populated {
        #[serde(rename = "_id")]
        id: UserId,
    },
}

fn user_ref<'de, D>(deserializer: D) -> Result<UserId, D::Error>
where
    D: Deserializer<'de>,
{
    match Reference::deserialize(deserializer)? {
        Reference::Id(id) | Reference::Populated { id } => Ok(id),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn connection_with_bare_client_id() {
        let json = r#"{
            "_id": "conn1",
            "clienteId": "c1",
            "profesional": {"_id": "p1", "nombre": "Juan", "apellido": "Perez", "profesion": "Plomero"},
            "createdAt": "2025-06-01T12:00:00.000Z"
        }"#;
        let conn: Connection = serde_json::from_str(json).unwrap();

        assert_eq!(conn.id, ConnectionId::new("conn1"));
        assert_eq!(conn.client_id, UserId::new("c1"));
        assert_eq!(conn.professional.display_name(), "Juan Perez");
        assert!(conn.created_at.is_some());
    }

    #[test]
    fn connection_with_populated_client() {
        let json = r#"{
            "_id": "conn2",
            "clienteId": {"_id": "c7", "nombre": "Ana"},
            "profesional": {"_id": "p1", "nombre": "Juan"}
        }"#;
        let conn: Connection = serde_json::from_str(json).unwrap();
        assert_eq!(conn.client_id, UserId::new("c7"));
    }

    #[test]
    fn check_reports_active_id_only_when_connected() {
        let yes: ConnectionCheck =
            serde_json::from_str(r#"{"conectado": true, "conexionId": "conn1"}"#).unwrap();
        assert_eq!(yes.active(), Some(ConnectionId::new("conn1")));

        let stale: ConnectionCheck =
            serde_json::from_str(r#"{"conectado": false, "conexionId": "conn1"}"#).unwrap();
        assert_eq!(stale.active(), None);

        let no: ConnectionCheck = serde_json::from_str(r#"{"conectado": false}"#).unwrap();
        assert_eq!(no.active(), None);
    }

    #[test]
    fn created_connection_needs_only_the_id() {
        let created: CreatedConnection =
            serde_json::from_str(r#"{"_id": "conn1", "clienteId": "c1"}"#).unwrap();
        assert_eq!(created.id.as_str(), "conn1");
    }
}
