//! A keyed collection of records

use crate::error::Result;
use crate::record::Record;
use ahash::AHashMap;

/// Key-uniqueness oracle consulted while resolving citation keys
pub trait CollectionView {
    /// True if a record with this key is already present
    fn contains(&self, key: &str) -> bool;
}

/// An ordered collection of records with unique citation keys.
///
/// Insertion resolves key collisions by walking the record's candidate keys
/// until a free one is found; `&mut self` serializes insertions, so two
/// records can never race to the same candidate.
#[derive(Debug, Clone, Default)]
pub struct Bibliography {
    records: Vec<Record>,
    index: AHashMap<String, usize>,
}

impl Bibliography {
    /// Create an empty bibliography
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of records
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// True if there are no records
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// All records, in insertion (or sorted) order
    #[must_use]
    pub fn records(&self) -> &[Record] {
        &self.records
    }

    /// Iterate over the records
    pub fn iter(&self) -> std::slice::Iter<'_, Record> {
        self.records.iter()
    }

    /// True if a record with this key is present
    #[must_use]
    pub fn contains_key(&self, key: &str) -> bool {
        self.index.contains_key(key)
    }

    /// Look up a record by its assigned key
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Record> {
        self.index.get(key).map(|&i| &self.records[i])
    }

    /// Insert a record, resolving key collisions, and return the key it was
    /// registered under
    pub fn insert(&mut self, mut record: Record) -> Result<String> {
        let mut key = record.key().into_owned();
        if self.contains_key(&key) {
            key = record.resolve_key(&*self)?;
        }
        record.set_key(key.clone());
        self.index.insert(key.clone(), self.records.len());
        self.records.push(record);
        Ok(key)
    }

    /// Remove a record by key
    pub fn remove(&mut self, key: &str) -> Option<Record> {
        let index = self.index.remove(key)?;
        let record = self.records.remove(index);
        self.reindex();
        Some(record)
    }

    /// Sort records by key, ascending; equal keys keep their relative order
    pub fn sort(&mut self) {
        self.records.sort();
        self.reindex();
    }

    fn reindex(&mut self) {
        self.index = self
            .records
            .iter()
            .enumerate()
            .map(|(i, record)| (record.key().into_owned(), i))
            .collect();
    }
}

impl CollectionView for Bibliography {
    fn contains(&self, key: &str) -> bool {
        self.index.contains_key(key)
    }
}

impl<'a> IntoIterator for &'a Bibliography {
    type Item = &'a Record;
    type IntoIter = std::slice::Iter<'a, Record>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}
