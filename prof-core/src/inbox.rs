//! Messaging list: the client's active connections.
//!
//! The list is replaced wholesale on every successful fetch and left
//! untouched by a failed one. Filtering runs over the fetched list only and
//! never asks for a refetch.

use profesionales_types::{Connection, ConnectionId};

/// Connections whose professional name or profession contains `query`,
/// ignoring case. A blank query matches everything.
///
/// The input slice is never modified.
pub fn filter_connections<'a>(connections: &'a [Connection], query: &str) -> Vec<&'a Connection> {
    let needle = query.trim().to_lowercase();
    if needle.is_empty() {
        return connections.iter().collect();
    }

    connections
        .iter()
        .filter(|c| {
            let professional = &c.professional;
            professional.display_name().to_lowercase().contains(&needle)
                || professional
                    .profession
                    .as_deref()
                    .is_some_and(|p| p.to_lowercase().contains(&needle))
        })
        .collect()
}

/// State behind the Messaging screen.
#[derive(Debug, Clone, Default)]
pub struct MessagingList {
    connections: Vec<Connection>,
    loaded: bool,
    loading: bool,
    query: String,
}

impl MessagingList {
    /// Create an empty, never-loaded list.
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark a fetch as started (initial load or pull-to-refresh).
    pub fn begin_refresh(&mut self) {
        self.loading = true;
    }

    /// Replace the list with a fresh fetch.
    pub fn apply(&mut self, connections: Vec<Connection>) {
        self.connections = connections;
        self.loaded = true;
        self.loading = false;
    }

    /// Record a failed fetch. The previous list is kept.
    pub fn fail(&mut self) {
        self.loading = false;
    }

    /// Drop a connection locally after it was deleted.
    pub fn remove(&mut self, connection_id: &ConnectionId) -> bool {
        let before = self.connections.len();
        self.connections.retain(|c| &c.id != connection_id);
        self.connections.len() != before
    }

    /// Set the filter query.
    pub fn set_filter(&mut self, query: impl Into<String>) {
        self.query = query.into();
    }

    /// Current filter query.
    pub fn filter(&self) -> &str {
        &self.query
    }

    /// Connections matching the current filter.
    pub fn visible(&self) -> Vec<&Connection> {
        filter_connections(&self.connections, &self.query)
    }

    /// Everything fetched, ignoring the filter.
    pub fn connections(&self) -> &[Connection] {
        &self.connections
    }

    /// True while a fetch is in flight.
    pub fn is_loading(&self) -> bool {
        self.loading
    }

    /// True once any fetch has succeeded.
    pub fn is_loaded(&self) -> bool {
        self.loaded
    }

    /// True when loaded and nothing is connected.
    pub fn is_empty(&self) -> bool {
        self.loaded && self.connections.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use profesionales_types::{ProfessionalSummary, UserId};

    fn connection(id: &str, first: &str, last: &str, profession: Option<&str>) -> Connection {
        Connection {
            id: ConnectionId::new(id),
            client_id: UserId::new("c1"),
            professional: ProfessionalSummary {
                id: UserId::new(format!("p-{id}")),
                first_name: first.into(),
                last_name: last.into(),
                profession: profession.map(str::to_string),
                avatar: None,
                rating: None,
            },
            created_at: None,
        }
    }

    fn fetched() -> Vec<Connection> {
        vec![
            connection("1", "Juan", "Pérez", Some("Plomero")),
            connection("2", "María", "Gómez", Some("Electricista")),
            connection("3", "Pedro", "Plomer", None),
        ]
    }

    #[test]
    fn blank_filter_shows_everything() {
        let list = fetched();
        assert_eq!(filter_connections(&list, "").len(), 3);
        assert_eq!(filter_connections(&list, "   ").len(), 3);
    }

    #[test]
    fn filter_matches_name_or_profession_ignoring_case() {
        let list = fetched();

        let ids: Vec<_> = filter_connections(&list, "PLOMER")
            .iter()
            .map(|c| c.id.as_str())
            .collect();
        assert_eq!(ids, vec!["1", "3"]);

        let ids: Vec<_> = filter_connections(&list, "maría")
            .iter()
            .map(|c| c.id.as_str())
            .collect();
        assert_eq!(ids, vec!["2"]);

        assert!(filter_connections(&list, "carpintero").is_empty());
    }

    #[test]
    fn filter_is_pure() {
        let list = fetched();
        let snapshot = list.clone();

        let first: Vec<_> = filter_connections(&list, "ez").into_iter().cloned().collect();
        let second: Vec<_> = filter_connections(&list, "ez").into_iter().cloned().collect();

        assert_eq!(first, second);
        assert_eq!(list, snapshot);
    }

    #[test]
    fn refresh_replaces_wholesale() {
        let mut inbox = MessagingList::new();
        inbox.begin_refresh();
        assert!(inbox.is_loading());
        inbox.apply(fetched());
        assert!(!inbox.is_loading());
        assert_eq!(inbox.connections().len(), 3);

        inbox.begin_refresh();
        inbox.apply(vec![connection("9", "Ana", "Ruiz", Some("Pintora"))]);
        assert_eq!(inbox.connections().len(), 1);
        assert_eq!(inbox.connections()[0].id.as_str(), "9");
    }

    #[test]
    fn failed_refresh_keeps_previous_list() {
        let mut inbox = MessagingList::new();
        inbox.apply(fetched());

        inbox.begin_refresh();
        inbox.fail();

        assert!(!inbox.is_loading());
        assert_eq!(inbox.connections().len(), 3);
    }

    #[test]
    fn visible_applies_filter_without_touching_list() {
        let mut inbox = MessagingList::new();
        inbox.apply(fetched());
        inbox.set_filter("electric");

        assert_eq!(inbox.visible().len(), 1);
        assert_eq!(inbox.connections().len(), 3);
        assert_eq!(inbox.filter(), "electric");
    }

    #[test]
    fn empty_only_after_load() {
        let mut inbox = MessagingList::new();
        assert!(!inbox.is_empty());
        inbox.apply(vec![]);
        assert!(inbox.is_empty());
    }

    #[test]
    fn remove_drops_one_connection() {
        let mut inbox = MessagingList::new();
        inbox.apply(fetched());
        assert!(inbox.remove(&ConnectionId::new("2")));
        assert!(!inbox.remove(&ConnectionId::new("2")));
        assert_eq!(inbox.connections().len(), 2);
    }
}
