//! Generic in-memory record collection.
//!
//! The step index holds two record collections (step declarations and
//! per-document language tags) with identical storage semantics: append-only
//! insertion with no uniqueness checks, predicate-filtered reads that return
//! clones, and predicate-driven removal. [`RecordStore`] captures those
//! semantics without any knowledge of what the records mean.

/// An append-only collection of records queried by predicate.
///
/// Reads return cloned records; the store retains exclusive ownership of its
/// contents, so callers never hold live references into the collection.
#[derive(Debug, Clone)]
pub struct RecordStore<T> {
    records: Vec<T>,
}

impl<T> Default for RecordStore<T> {
    fn default() -> Self {
        Self {
            records: Vec::new(),
        }
    }
}

impl<T: Clone> RecordStore<T> {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append one record. Duplicates are not checked; multiple records with
    /// identical fields coexist and are all returned by matching queries.
    pub fn insert(&mut self, record: T) {
        self.records.push(record);
    }

    /// Return clones of every record matching the predicate, in insertion
    /// order. A predicate that accepts everything returns the whole store.
    pub fn find(&self, predicate: impl Fn(&T) -> bool) -> Vec<T> {
        self.records
            .iter()
            .filter(|record| predicate(record))
            .cloned()
            .collect()
    }

    /// Return a clone of the first record matching the predicate.
    pub fn find_first(&self, predicate: impl Fn(&T) -> bool) -> Option<T> {
        self.records.iter().find(|record| predicate(record)).cloned()
    }

    /// Delete every record matching the predicate.
    pub fn remove_where(&mut self, predicate: impl Fn(&T) -> bool) {
        self.records.retain(|record| !predicate(record));
    }

    /// Number of records currently held.
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the store holds no records.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Sort records ascending by a string key, case-insensitively.
///
/// The sort is stable: records with equal keys keep their insertion order.
#[must_use]
pub fn sort_by_field<T>(mut records: Vec<T>, key: impl Fn(&T) -> &str) -> Vec<T> {
    records.sort_by(|a, b| key(a).to_lowercase().cmp(&key(b).to_lowercase()));
    records
}

#[cfg(test)]
#[expect(
    clippy::indexing_slicing,
    reason = "tests index into known-length fixtures for clarity"
)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, PartialEq, Eq)]
    struct Entry {
        name: String,
        file: String,
    }

    fn entry(name: &str, file: &str) -> Entry {
        Entry {
            name: name.to_string(),
            file: file.to_string(),
        }
    }

    #[test]
    fn insert_keeps_duplicates() {
        let mut store = RecordStore::new();
        store.insert(entry("a step", "one.feature"));
        store.insert(entry("a step", "two.feature"));

        let found = store.find(|e| e.name == "a step");
        assert_eq!(found.len(), 2);
    }

    #[test]
    fn find_with_accept_all_predicate_returns_everything() {
        let mut store = RecordStore::new();
        store.insert(entry("a", "f"));
        store.insert(entry("b", "f"));

        assert_eq!(store.find(|_| true).len(), 2);
    }

    #[test]
    fn remove_where_deletes_only_matching_records() {
        let mut store = RecordStore::new();
        store.insert(entry("a", "one.feature"));
        store.insert(entry("b", "two.feature"));
        store.insert(entry("c", "one.feature"));

        store.remove_where(|e| e.file == "one.feature");

        let remaining = store.find(|_| true);
        assert_eq!(remaining, vec![entry("b", "two.feature")]);
    }

    #[test]
    fn find_first_returns_earliest_match() {
        let mut store = RecordStore::new();
        store.insert(entry("a", "one.feature"));
        store.insert(entry("a", "two.feature"));

        let first = store.find_first(|e| e.name == "a");
        assert_eq!(first, Some(entry("a", "one.feature")));
    }

    #[test]
    fn sort_by_field_is_case_insensitive_and_stable() {
        let records = vec![
            entry("Banana", "1"),
            entry("apple", "2"),
            entry("banana", "3"),
        ];

        let sorted = sort_by_field(records, |e| &e.name);

        assert_eq!(sorted[0].name, "apple");
        // Equal keys keep insertion order.
        assert_eq!(sorted[1].file, "1");
        assert_eq!(sorted[2].file, "3");
    }

    #[test]
    fn empty_store_reports_empty() {
        let store: RecordStore<Entry> = RecordStore::new();
        assert!(store.is_empty());
        assert_eq!(store.len(), 0);
        assert!(store.find(|_| true).is_empty());
    }
}
