//! A single conversation with a connected professional.
//!
//! Messages live on the screen only; nothing is sent to the backend.

use profesionales_types::ConnectionId;

/// One bubble in the conversation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatMessage {
    /// Text as typed.
    pub text: String,
    /// Sent by the signed-in user.
    pub from_me: bool,
}

/// The chat screen.
#[derive(Debug)]
pub struct ChatScreen {
    connection_id: ConnectionId,
    peer: String,
    draft: String,
    messages: Vec<ChatMessage>,
}

impl ChatScreen {
    pub(crate) fn new(connection_id: ConnectionId, peer: String) -> Self {
        Self {
            connection_id,
            peer,
            draft: String::new(),
            messages: Vec::new(),
        }
    }

    /// Connection backing the conversation.
    pub fn connection_id(&self) -> &ConnectionId {
        &self.connection_id
    }

    /// Name shown in the header.
    pub fn peer(&self) -> &str {
        &self.peer
    }

    /// Replace the input text.
    pub fn set_draft(&mut self, text: &str) {
        self.draft = text.to_string();
    }

    /// Current input text.
    pub fn draft(&self) -> &str {
        &self.draft
    }

    /// Send the draft.
    ///
    /// A blank draft is ignored and left in place. Otherwise the message is
    /// appended and the input cleared.
    pub fn send(&mut self) -> Option<&ChatMessage> {
        if self.draft.trim().is_empty() {
            return None;
        }

        let text = std::mem::take(&mut self.draft);
        tracing::debug!(connection = %self.connection_id, chars = text.len(), "Message sent");
        self.messages.push(ChatMessage {
            text,
            from_me: true,
        });
        self.messages.last()
    }

    /// Messages in display order.
    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::Fixture;
    use profesionales_types::{Connection, ProfessionalSummary, UserId};

    fn connection() -> Connection {
        Connection {
            id: ConnectionId::new("k1"),
            client_id: UserId::new("c1"),
            professional: ProfessionalSummary {
                id: UserId::new("p1"),
                first_name: "Juan".into(),
                last_name: "Pérez".into(),
                profession: Some("Plomero".into()),
                avatar: None,
                rating: None,
            },
            created_at: None,
        }
    }

    #[test]
    fn send_appends_and_clears_input() {
        let fx = Fixture::logged_in();
        let mut screen = fx.app.chat_screen(&connection()).unwrap();
        assert_eq!(screen.peer(), "Juan Pérez");

        screen.set_draft("Hola, ¿estás disponible mañana?");
        let sent = screen.send().cloned().unwrap();

        assert_eq!(sent.text, "Hola, ¿estás disponible mañana?");
        assert!(sent.from_me);
        assert_eq!(screen.draft(), "");

        screen.set_draft("Gracias");
        screen.send();
        let texts: Vec<_> = screen.messages().iter().map(|m| m.text.as_str()).collect();
        assert_eq!(texts, ["Hola, ¿estás disponible mañana?", "Gracias"]);
        assert!(fx.gateway.calls().is_empty());
    }

    #[test]
    fn blank_input_is_ignored() {
        let fx = Fixture::logged_in();
        let mut screen = fx.app.chat_screen(&connection()).unwrap();

        assert!(screen.send().is_none());
        screen.set_draft("   \n\t");
        assert!(screen.send().is_none());

        assert!(screen.messages().is_empty());
        assert_eq!(screen.draft(), "   \n\t");
    }

    #[test]
    fn requires_login() {
        let fx = Fixture::new();
        let err = fx.app.chat_screen(&connection()).unwrap_err();
        assert!(err.needs_login());
    }
}
