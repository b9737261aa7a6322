//! Request statistics derived from audit records

use std::borrow::Borrow;
use std::collections::HashMap;
use std::hash::Hash;

use serde::ser::{Serialize, SerializeMap, Serializer};

/// Frequency histogram ordered by descending count
///
/// Ties are ordered by ascending key so that two aggregations over the same
/// rows always produce the same sequence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Histogram<K> {
    buckets: Vec<(K, i64)>,
}

impl<K> Default for Histogram<K> {
    fn default() -> Self {
        Self {
            buckets: Vec::new(),
        }
    }
}

impl<K: Ord> Histogram<K> {
    /// Build from pre-aggregated `(key, count)` pairs
    pub fn from_counts(counts: impl IntoIterator<Item = (K, i64)>) -> Self {
        let mut buckets: Vec<(K, i64)> = counts.into_iter().collect();
        buckets.sort_by(|(ka, ca), (kb, cb)| cb.cmp(ca).then_with(|| ka.cmp(kb)));
        Self { buckets }
    }
}

impl<K: Ord + Hash + Eq> Histogram<K> {
    /// Count occurrences of each key
    pub fn tally(items: impl IntoIterator<Item = K>) -> Self {
        let mut counts: HashMap<K, i64> = HashMap::new();

        for item in items {
            *counts.entry(item).or_insert(0) += 1;
        }

        Self::from_counts(counts)
    }
}

impl<K> Histogram<K> {
    pub fn get<Q>(&self, key: &Q) -> Option<i64>
    where
        K: Borrow<Q>,
        Q: PartialEq + ?Sized,
    {
        self.buckets
            .iter()
            .find(|(k, _)| k.borrow() == key)
            .map(|(_, count)| *count)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&K, i64)> {
        self.buckets.iter().map(|(k, count)| (k, *count))
    }

    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }
}

/// Serialized as a JSON object whose key order follows the histogram order
impl<K: Serialize> Serialize for Histogram<K> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.buckets.len()))?;

        for (key, count) in &self.buckets {
            map.serialize_entry(key, count)?;
        }

        map.end()
    }
}

/// Aggregate view over all logged requests and responses
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Serialize)]
pub struct RequestStats {
    pub total_requests: i64,
    pub unique_ip_count: i64,
    pub path_counts: Histogram<String>,
    pub status_counts: Histogram<u16>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tally_orders_by_descending_count() {
        let histogram = Histogram::tally(["/b", "/a", "/a", "/c", "/a", "/c"].map(String::from));
        let keys: Vec<&str> = histogram.iter().map(|(k, _)| k.as_str()).collect();

        assert_eq!(keys, vec!["/a", "/c", "/b"]);
        assert_eq!(histogram.get("/a"), Some(3));
        assert_eq!(histogram.get("/missing"), None);
    }

    #[test]
    fn test_ties_break_by_key() {
        let histogram = Histogram::from_counts([(404u16, 1), (200, 1), (500, 1)]);
        let keys: Vec<u16> = histogram.iter().map(|(k, _)| *k).collect();

        assert_eq!(keys, vec![200, 404, 500]);
    }

    #[test]
    fn test_empty_histogram() {
        let histogram: Histogram<u16> = Histogram::tally(Vec::new());
        assert!(histogram.is_empty());
        assert_eq!(serde_json::to_string(&histogram).unwrap(), "{}");
    }

    #[test]
    fn test_stats_serialization() {
        let stats = RequestStats {
            total_requests: 3,
            unique_ip_count: 2,
            path_counts: Histogram::from_counts([("/b".to_string(), 1), ("/a".to_string(), 2)]),
            status_counts: Histogram::from_counts([(200u16, 2), (404, 1)]),
        };

        let json = serde_json::to_string(&stats).unwrap();

        assert_eq!(
            json,
            r#"{"total_requests":3,"unique_ip_count":2,"path_counts":{"/a":2,"/b":1},"status_counts":{"200":2,"404":1}}"#
        );
    }
}
