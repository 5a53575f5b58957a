//! Owner of the history and its backing store

use tracing::{info, warn};

use crate::error::HistoryError;
use crate::history::History;
use crate::record::OperationRecord;
use crate::store::HistoryStore;

/// A [`History`] bound to the store it is persisted in.
///
/// The history is read from the store on first access and written back in
/// full after every transition.
pub struct Journal<S: HistoryStore> {
    store: S,
    history: Option<History>,
}

impl<S: HistoryStore> Journal<S> {
    /// Create a journal; nothing is read until the history is first used
    pub fn new(store: S) -> Self {
        Journal {
            store,
            history: None,
        }
    }

    /// The backing store
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Read the history from the store unless that already happened.
    ///
    /// Needs `&mut` because the first call fills the cache; use
    /// [`Journal::loaded`] for shared access afterwards.
    pub fn load(&mut self) -> &History {
        self.history_mut()
    }

    /// The history, if it has been read yet
    pub fn loaded(&self) -> Option<&History> {
        self.history.as_ref()
    }

    /// Current history for in-place transitions, loading it if needed
    pub fn history_mut(&mut self) -> &mut History {
        let store = &self.store;
        self.history.get_or_insert_with(|| store.load())
    }

    /// Whether the history has been read yet
    pub fn is_loaded(&self) -> bool {
        self.loaded().is_some()
    }

    /// Record a forward action and persist.
    ///
    /// The in-memory history keeps the record even when persisting fails.
    pub fn append(&mut self, record: OperationRecord) -> Result<(), HistoryError> {
        info!(record = %record, "recording operation");
        self.history_mut().record(record);
        self.persist()
    }

    /// Write the current history to the store
    pub fn persist(&mut self) -> Result<(), HistoryError> {
        let Self { store, history } = self;
        let history = history.get_or_insert_with(|| store.load());
        store.save(history).map_err(|e| {
            warn!(error = %e, "history not saved");
            e
        })
    }
}
