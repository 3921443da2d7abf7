//! Keyed query slots
//!
//! A `KeyedQuery` holds the result of one remote fetch together with the key
//! it was requested for (a parent id, a price request, ...). Re-keying the
//! slot invalidates its data. Every fetch is issued against a `QueryTicket`;
//! completing with a ticket from an older generation is a no-op, so a slow
//! response for a previous key can never overwrite the current state.
//!
//! ```text
//!   set_key(D1) ──> Idle ──begin()──> Loading ──complete(t1)──> Ready / Failed
//!        │                               │
//!   set_key(D2)  (generation + 1)        └── complete(t0) ignored: stale
//! ```

use serde::Serialize;

/// Observable state of a keyed query
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "state", content = "value", rename_all = "snake_case")]
pub enum QueryState<V> {
    /// No fetch has been issued for the current key (or there is no key)
    Idle,
    /// A fetch is in flight for the current key
    Loading,
    /// The fetch for the current key succeeded
    Ready(V),
    /// The fetch for the current key failed
    Failed(String),
}

impl<V> QueryState<V> {
    pub fn is_failed(&self) -> bool {
        matches!(self, QueryState::Failed(_))
    }
}

/// Proof that a fetch was issued for a given key and generation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryTicket<K> {
    key: K,
    generation: u64,
}

impl<K> QueryTicket<K> {
    /// The key the fetch must be issued for
    pub fn key(&self) -> &K {
        &self.key
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }
}

/// A fetch slot whose data is only valid for the key it was issued under
#[derive(Debug, Clone)]
pub struct KeyedQuery<K, V> {
    key: Option<K>,
    generation: u64,
    state: QueryState<V>,
}

impl<K, V> Default for KeyedQuery<K, V> {
    fn default() -> Self {
        Self {
            key: None,
            generation: 0,
            state: QueryState::Idle,
        }
    }
}

impl<K: Clone + PartialEq, V> KeyedQuery<K, V> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the key, returning true if it changed
    ///
    /// A changed key drops any data and bumps the generation so that
    /// outstanding tickets become stale.
    pub fn set_key(&mut self, key: Option<K>) -> bool {
        if self.key == key {
            return false;
        }
        self.key = key;
        self.generation += 1;
        self.state = QueryState::Idle;
        true
    }

    pub fn key(&self) -> Option<&K> {
        self.key.as_ref()
    }

    /// Forces a refetch for the current key
    pub fn invalidate(&mut self) {
        self.generation += 1;
        self.state = QueryState::Idle;
    }

    /// True when there is a key and nothing has been requested for it yet
    pub fn needs_fetch(&self) -> bool {
        self.key.is_some() && matches!(self.state, QueryState::Idle)
    }

    /// Marks the slot as loading and hands out a ticket for the current key
    ///
    /// Returns `None` when there is nothing to fetch.
    pub fn begin(&mut self) -> Option<QueryTicket<K>> {
        if !self.needs_fetch() {
            return None;
        }
        let key = self.key.clone()?;
        self.state = QueryState::Loading;
        Some(QueryTicket {
            key,
            generation: self.generation,
        })
    }

    /// Stores the outcome of a fetch
    ///
    /// Returns false (and leaves the slot untouched) if the ticket is stale.
    pub fn complete(&mut self, ticket: QueryTicket<K>, outcome: Result<V, String>) -> bool {
        if ticket.generation != self.generation || self.key.as_ref() != Some(&ticket.key) {
            return false;
        }
        self.state = match outcome {
            Ok(value) => QueryState::Ready(value),
            Err(message) => QueryState::Failed(message),
        };
        true
    }

    pub fn state(&self) -> &QueryState<V> {
        &self.state
    }

    /// The data for the current key, if loaded
    pub fn data(&self) -> Option<&V> {
        match &self.state {
            QueryState::Ready(value) => Some(value),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match &self.state {
            QueryState::Failed(message) => Some(message),
            _ => None,
        }
    }

    pub fn is_loading(&self) -> bool {
        matches!(self.state, QueryState::Loading)
    }

    pub fn is_ready(&self) -> bool {
        matches!(self.state, QueryState::Ready(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_key_means_nothing_to_fetch() {
        let mut query: KeyedQuery<u32, Vec<u32>> = KeyedQuery::new();
        assert!(!query.needs_fetch());
        assert!(query.begin().is_none());
    }

    #[test]
    fn test_fetch_lifecycle() {
        let mut query: KeyedQuery<u32, Vec<u32>> = KeyedQuery::new();
        assert!(query.set_key(Some(1)));

        let ticket = query.begin().unwrap();
        assert_eq!(*ticket.key(), 1);
        assert!(query.is_loading());
        assert!(query.begin().is_none(), "no duplicate fetch while loading");

        assert!(query.complete(ticket, Ok(vec![10, 11])));
        assert_eq!(query.data(), Some(&vec![10, 11]));
    }

    #[test]
    fn test_same_key_does_not_refetch() {
        let mut query: KeyedQuery<u32, u32> = KeyedQuery::new();
        query.set_key(Some(1));
        let ticket = query.begin().unwrap();
        query.complete(ticket, Ok(5));

        assert!(!query.set_key(Some(1)));
        assert!(!query.needs_fetch());
        assert_eq!(query.data(), Some(&5));
    }

    #[test]
    fn test_stale_response_is_discarded() {
        let mut query: KeyedQuery<u32, &str> = KeyedQuery::new();
        query.set_key(Some(1));
        let old = query.begin().unwrap();

        query.set_key(Some(2));
        let current = query.begin().unwrap();

        assert!(!query.complete(old, Ok("for key 1")));
        assert!(query.is_loading());

        assert!(query.complete(current, Ok("for key 2")));
        assert_eq!(query.data(), Some(&"for key 2"));
    }

    #[test]
    fn test_returning_to_old_key_still_rejects_old_ticket() {
        let mut query: KeyedQuery<u32, &str> = KeyedQuery::new();
        query.set_key(Some(1));
        let first = query.begin().unwrap();
        query.set_key(Some(2));
        query.set_key(Some(1));

        assert!(!query.complete(first, Ok("old")));
        assert!(query.needs_fetch());
    }

    #[test]
    fn test_failure_and_invalidate() {
        let mut query: KeyedQuery<u32, u32> = KeyedQuery::new();
        query.set_key(Some(7));
        let ticket = query.begin().unwrap();
        query.complete(ticket, Err("boom".to_string()));
        assert_eq!(query.error(), Some("boom"));
        assert!(query.data().is_none());

        query.invalidate();
        assert!(query.needs_fetch());
    }
}
