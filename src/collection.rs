//! # Collection
//!
//! The ordered result set returned by [`Resource::read`](crate::resource::Resource::read).
//! A `Collection` owns a snapshot of its records; nothing that happens to the
//! resource afterwards changes it.

use crate::model::Record;
use serde::de::DeserializeOwned;

/// A fixed, ordered list of records.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Collection {
    items: Vec<Record>,
}

impl Collection {
    pub fn new(items: Vec<Record>) -> Self {
        Self { items }
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Record> {
        self.items.get(index)
    }

    /// Iterates from the first record. Each call starts over.
    pub fn iter(&self) -> std::slice::Iter<'_, Record> {
        self.items.iter()
    }

    pub fn into_records(self) -> Vec<Record> {
        self.items
    }

    /// Maps every record into `T`, in order.
    pub fn deserialize<T: DeserializeOwned>(&self) -> Result<Vec<T>, serde_json::Error> {
        self.items
            .iter()
            .map(|record| serde_json::from_value(serde_json::Value::Object(record.clone())))
            .collect()
    }
}

impl From<Vec<Record>> for Collection {
    fn from(items: Vec<Record>) -> Self {
        Self::new(items)
    }
}

impl<'a> IntoIterator for &'a Collection {
    type Item = &'a Record;
    type IntoIter = std::slice::Iter<'a, Record>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl IntoIterator for Collection {
    type Item = Record;
    type IntoIter = std::vec::IntoIter<Record>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.into_iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::into_record;
    use serde::Deserialize;
    use serde_json::json;

    fn items() -> Vec<Record> {
        (1..=3)
            .map(|id| into_record(json!({ "id": id })).unwrap())
            .collect()
    }

    #[test]
    fn test_acts_as_a_sequence() {
        let collection = Collection::new(items());
        assert_eq!(collection.len(), 3);

        let seen: Vec<Record> = collection.iter().cloned().collect();
        assert_eq!(seen, items());
    }

    #[test]
    fn test_iteration_restarts() {
        let collection = Collection::new(items());
        let first: Vec<_> = (&collection).into_iter().collect();
        let second: Vec<_> = (&collection).into_iter().collect();
        assert_eq!(first, second);
        assert_eq!(first.len(), 3);
    }

    #[test]
    fn test_deserialize_into_typed_values() {
        #[derive(Debug, Deserialize, PartialEq)]
        struct Post {
            id: u32,
        }

        let posts: Vec<Post> = Collection::new(items()).deserialize().unwrap();
        assert_eq!(posts, vec![Post { id: 1 }, Post { id: 2 }, Post { id: 3 }]);
    }

    #[test]
    fn test_empty() {
        let collection = Collection::default();
        assert!(collection.is_empty());
        assert!(collection.get(0).is_none());
    }
}
