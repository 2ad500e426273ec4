use std::sync::Arc;

use crate::{
    db::LocalStorage,
    error::AppResult,
    models::{TitleId, TitleSummary},
};

/// Storage key holding the serialized watchlist array
pub const WATCHLIST_KEY: &str = "watchlist";

/// The user's saved titles, keyed by identifier.
///
/// Every mutation rewrites the full list to storage before returning.
pub struct WatchlistStore {
    storage: Arc<dyn LocalStorage>,
    entries: Vec<TitleSummary>,
}

impl WatchlistStore {
    /// Loads the saved list; a missing or unreadable value yields an empty list
    pub fn load(storage: Arc<dyn LocalStorage>) -> Self {
        let entries = match storage.get_item(WATCHLIST_KEY) {
            Ok(Some(raw)) => serde_json::from_str(&raw).unwrap_or_else(|e| {
                tracing::warn!(error = %e, "Discarding corrupt watchlist");
                Vec::new()
            }),
            Ok(None) => Vec::new(),
            Err(e) => {
                tracing::warn!(error = %e, "Failed to read watchlist, starting empty");
                Vec::new()
            }
        };

        tracing::info!(entries = entries.len(), "Watchlist loaded");

        Self { storage, entries }
    }

    pub fn entries(&self) -> &[TitleSummary] {
        &self.entries
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains(&self, id: &TitleId) -> bool {
        self.entries.iter().any(|entry| &entry.id == id)
    }

    /// Adds the entry, or removes it when its identifier is already saved.
    ///
    /// Returns whether the title is in the watchlist afterwards.
    pub fn toggle(&mut self, entry: TitleSummary) -> AppResult<bool> {
        let present = if self.contains(&entry.id) {
            self.entries.retain(|saved| saved.id != entry.id);
            false
        } else {
            self.entries.push(entry);
            true
        };

        self.persist()?;
        Ok(present)
    }

    /// Removes by identifier; returns false (and writes nothing) if absent
    pub fn remove(&mut self, id: &TitleId) -> AppResult<bool> {
        if !self.contains(id) {
            return Ok(false);
        }

        self.entries.retain(|saved| &saved.id != id);
        self.persist()?;
        Ok(true)
    }

    fn persist(&self) -> AppResult<()> {
        let json = serde_json::to_string(&self.entries)?;
        self.storage.set_item(WATCHLIST_KEY, &json)?;
        tracing::debug!(entries = self.entries.len(), "Watchlist persisted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{FileStorage, MemoryStorage};
    use crate::models::TitleKind;

    fn entry(id: &str, title: &str) -> TitleSummary {
        TitleSummary {
            id: TitleId::new(id),
            title: title.to_string(),
            year: "2010".to_string(),
            kind: TitleKind::Movie,
            poster_url: "N/A".to_string(),
        }
    }

    #[test]
    fn test_load_missing_value_is_empty() {
        let store = WatchlistStore::load(Arc::new(MemoryStorage::new()));
        assert!(store.is_empty());
    }

    #[test]
    fn test_load_corrupt_value_is_empty() {
        let storage = Arc::new(MemoryStorage::new());
        storage.set_item(WATCHLIST_KEY, "{not json").unwrap();

        let store = WatchlistStore::load(storage);
        assert!(store.is_empty());
    }

    #[test]
    fn test_toggle_twice_restores_initial_set() {
        let mut store = WatchlistStore::load(Arc::new(MemoryStorage::new()));
        store.toggle(entry("tt1", "Heat")).unwrap();

        assert!(store.toggle(entry("tt2", "Ronin")).unwrap());
        assert!(!store.toggle(entry("tt2", "Ronin")).unwrap());

        let ids: Vec<_> = store.entries().iter().map(|e| e.id.as_str()).collect();
        assert_eq!(ids, vec!["tt1"]);
    }

    #[test]
    fn test_toggle_matches_by_identifier_not_value() {
        let mut store = WatchlistStore::load(Arc::new(MemoryStorage::new()));
        store.toggle(entry("tt1", "Heat")).unwrap();

        // Same id, different payload still counts as present
        assert!(!store.toggle(entry("tt1", "Heat (1995)")).unwrap());
        assert!(store.is_empty());
    }

    #[test]
    fn test_remove_absent_is_noop() {
        let storage = Arc::new(MemoryStorage::new());
        let mut store = WatchlistStore::load(storage.clone());

        assert!(!store.remove(&TitleId::new("tt404")).unwrap());
        assert_eq!(storage.get_item(WATCHLIST_KEY).unwrap(), None);
    }

    #[test]
    fn test_every_mutation_overwrites_storage() {
        let storage = Arc::new(MemoryStorage::new());
        let mut store = WatchlistStore::load(storage.clone());

        store.toggle(entry("tt1", "Heat")).unwrap();
        store.toggle(entry("tt2", "Ronin")).unwrap();
        store.remove(&TitleId::new("tt1")).unwrap();

        let raw = storage.get_item(WATCHLIST_KEY).unwrap().unwrap();
        let saved: Vec<TitleSummary> = serde_json::from_str(&raw).unwrap();
        assert_eq!(saved, vec![entry("tt2", "Ronin")]);
    }

    #[test]
    fn test_watchlist_survives_reload_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let storage: Arc<dyn LocalStorage> = Arc::new(FileStorage::open(dir.path()).unwrap());

        let mut store = WatchlistStore::load(storage.clone());
        store.toggle(entry("tt0468569", "The Dark Knight")).unwrap();
        drop(store);

        let reloaded = WatchlistStore::load(storage);
        assert!(reloaded.contains(&TitleId::new("tt0468569")));
        assert_eq!(reloaded.entries().len(), 1);
    }
}
