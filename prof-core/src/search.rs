//! Search sequencing.
//!
//! Each search request gets a sequence number from a monotonically
//! increasing counter. A response is applied only if it is newer than the
//! last one applied (or the last time the query was cleared), so a slow
//! response for an old query never overwrites a newer result.

use profesionales_types::ProfessionalProfile;

/// A search to run, handed out by [`SearchState::set_query`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchTicket {
    /// Sequence number to pass back with the result.
    pub seq: u64,
    /// Trimmed search term.
    pub term: String,
}

/// What the search screen shows.
#[derive(Debug, Clone, PartialEq)]
pub enum SearchView<'a> {
    /// Empty query: show the prompt, no request issued.
    Prompt(&'static str),
    /// Waiting for the first answer to this query.
    Loading,
    /// Result cards.
    Results(&'a [ProfessionalProfile]),
    /// The search ran and matched nothing.
    Empty(&'static str),
    /// The last request failed.
    Failed(&'a str),
}

/// Search screen state.
#[derive(Debug, Clone, Default)]
pub struct SearchState {
    query: String,
    issued: u64,
    floor: u64,
    results: Option<Vec<ProfessionalProfile>>,
    error: Option<String>,
}

impl SearchState {
    /// Create an empty search.
    pub fn new() -> Self {
        Self::default()
    }

    /// Update the query.
    ///
    /// Returns the request to run, or `None` when the trimmed query is
    /// empty. Clearing the query also makes every in-flight response stale.
    pub fn set_query(&mut self, query: impl Into<String>) -> Option<SearchTicket> {
        self.query = query.into();
        self.issued += 1;

        let term = self.query.trim();
        if term.is_empty() {
            self.floor = self.issued;
            self.results = None;
            self.error = None;
            return None;
        }

        self.error = None;
        Some(SearchTicket {
            seq: self.issued,
            term: term.to_string(),
        })
    }

    /// Apply a successful response. Returns false if it was stale.
    pub fn apply(&mut self, seq: u64, results: Vec<ProfessionalProfile>) -> bool {
        if !self.accepts(seq) {
            return false;
        }
        self.floor = seq;
        self.results = Some(results);
        self.error = None;
        true
    }

    /// Apply a failed response. Returns false if it was stale.
    ///
    /// Results from an earlier query stay on screen under the error.
    pub fn fail(&mut self, seq: u64, message: impl Into<String>) -> bool {
        if !self.accepts(seq) {
            return false;
        }
        self.floor = seq;
        self.error = Some(message.into());
        true
    }

    fn accepts(&self, seq: u64) -> bool {
        seq > self.floor && seq <= self.issued
    }

    /// Sequence number of the newest query.
    pub fn latest(&self) -> u64 {
        self.issued
    }

    /// Current query, as typed.
    pub fn query(&self) -> &str {
        &self.query
    }

    /// True while a newer request than the last applied one is pending.
    pub fn is_loading(&self) -> bool {
        !self.query.trim().is_empty() && self.floor < self.issued
    }

    /// Last applied results.
    pub fn results(&self) -> &[ProfessionalProfile] {
        self.results.as_deref().unwrap_or_default()
    }

    /// What to render.
    pub fn view(&self) -> SearchView<'_> {
        if self.query.trim().is_empty() {
            return SearchView::Prompt(crate::text::SEARCH_PROMPT);
        }
        if let Some(error) = &self.error {
            return SearchView::Failed(error);
        }
        match &self.results {
            None => SearchView::Loading,
            Some(results) if results.is_empty() => SearchView::Empty(crate::text::SEARCH_EMPTY),
            Some(results) => SearchView::Results(results),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use profesionales_types::UserId;

    fn professional(id: &str, profession: &str) -> ProfessionalProfile {
        ProfessionalProfile {
            id: UserId::new(id),
            first_name: format!("Nombre {id}"),
            last_name: String::new(),
            profession: Some(profession.into()),
            specialties: vec![],
            years_of_experience: None,
            services: vec![],
            ratings: vec![],
            avatar: None,
            phone: None,
        }
    }

    #[test]
    fn empty_query_shows_prompt_without_request() {
        let mut search = SearchState::new();
        assert_eq!(search.set_query("   "), None);
        assert_eq!(
            search.view(),
            SearchView::Prompt("Ingresa una profesión para buscar")
        );
        assert!(!search.is_loading());
    }

    #[test]
    fn query_issues_trimmed_ticket() {
        let mut search = SearchState::new();
        let ticket = search.set_query(" Plomero ").unwrap();
        assert_eq!(ticket.term, "Plomero");
        assert_eq!(search.view(), SearchView::Loading);
        assert!(search.is_loading());
    }

    #[test]
    fn results_render_as_cards() {
        let mut search = SearchState::new();
        let ticket = search.set_query("Plomero").unwrap();
        assert!(search.apply(
            ticket.seq,
            vec![professional("1", "Plomero"), professional("2", "Plomero")]
        ));

        match search.view() {
            SearchView::Results(cards) => assert_eq!(cards.len(), 2),
            other => panic!("unexpected view: {other:?}"),
        }
        assert!(!search.is_loading());
    }

    #[test]
    fn no_matches_shows_empty_message() {
        let mut search = SearchState::new();
        let ticket = search.set_query("Astronauta").unwrap();
        search.apply(ticket.seq, vec![]);
        assert_eq!(search.view(), SearchView::Empty(crate::text::SEARCH_EMPTY));
    }

    #[test]
    fn stale_response_is_discarded() {
        let mut search = SearchState::new();
        let old = search.set_query("Plo").unwrap();
        let new = search.set_query("Plomero").unwrap();
        assert!(new.seq > old.seq);

        // Network reorders: newest answers first
        assert!(search.apply(new.seq, vec![professional("1", "Plomero")]));
        assert!(!search.apply(
            old.seq,
            vec![professional("2", "Plomero"), professional("3", "Plomería")]
        ));

        assert_eq!(search.results().len(), 1);
        assert_eq!(search.results()[0].id, UserId::new("1"));
    }

    #[test]
    fn in_order_responses_both_apply() {
        let mut search = SearchState::new();
        let old = search.set_query("Plo").unwrap();
        let new = search.set_query("Plomero").unwrap();

        assert!(search.apply(old.seq, vec![professional("2", "Plomero")]));
        assert!(search.is_loading());
        assert!(search.apply(new.seq, vec![professional("1", "Plomero")]));
        assert!(!search.is_loading());
    }

    #[test]
    fn clearing_query_makes_in_flight_stale() {
        let mut search = SearchState::new();
        let ticket = search.set_query("Plomero").unwrap();
        search.set_query("");

        assert!(!search.apply(ticket.seq, vec![professional("1", "Plomero")]));
        assert!(matches!(search.view(), SearchView::Prompt(_)));
    }

    #[test]
    fn failure_keeps_previous_results() {
        let mut search = SearchState::new();
        let first = search.set_query("Plomero").unwrap();
        search.apply(first.seq, vec![professional("1", "Plomero")]);

        let second = search.set_query("Plomeros").unwrap();
        assert!(search.fail(second.seq, "Error de red"));

        assert_eq!(search.view(), SearchView::Failed("Error de red"));
        assert_eq!(search.results().len(), 1);
    }

    #[test]
    fn latest_tracks_newest_query() {
        let mut search = SearchState::new();
        let first = search.set_query("Plo").unwrap();
        assert_eq!(search.latest(), first.seq);
        search.set_query("");
        assert!(search.latest() > first.seq);
    }

    #[test]
    fn unknown_sequence_is_rejected() {
        let mut search = SearchState::new();
        search.set_query("Plomero");
        assert!(!search.apply(99, vec![]));
    }
}
