use std::collections::BTreeMap;

/// Running sum of additive contributions per key.
///
/// Contributions are summed, so the totals do not depend on the order in which
/// they were added. Non-finite values are dropped.
#[derive(Debug, Clone)]
pub struct BonusStack<K: Ord> {
    totals: BTreeMap<K, f64>,
}

impl<K: Ord> Default for BonusStack<K> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: Ord> BonusStack<K> {
    pub fn new() -> Self {
        Self {
            totals: BTreeMap::new(),
        }
    }

    /// Returns false when the value was rejected.
    pub fn add(&mut self, key: K, value: f64) -> bool {
        if !value.is_finite() {
            return false;
        }
        *self.totals.entry(key).or_insert(0.0) += value;
        true
    }

    pub fn add_many<I>(&mut self, contributions: I)
    where
        I: IntoIterator<Item = (K, f64)>,
    {
        for (key, value) in contributions {
            self.add(key, value);
        }
    }

    pub fn total_for(&self, key: &K) -> Option<f64> {
        self.totals.get(key).copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&K, f64)> {
        self.totals.iter().map(|(key, total)| (key, *total))
    }

    pub fn is_empty(&self) -> bool {
        self.totals.is_empty()
    }

    pub fn merge_from(&mut self, other: &BonusStack<K>)
    where
        K: Clone,
    {
        for (key, total) in &other.totals {
            *self.totals.entry(key.clone()).or_insert(0.0) += total;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn totals_ignore_insertion_order() {
        let mut forward = BonusStack::new();
        forward.add_many([("ac", 1.0), ("hp", 10.0), ("ac", 2.0)]);
        let mut reverse = BonusStack::new();
        reverse.add_many([("ac", 2.0), ("hp", 10.0), ("ac", 1.0)]);

        assert_eq!(forward.total_for(&"ac"), Some(3.0));
        assert_eq!(
            forward.iter().collect::<Vec<_>>(),
            reverse.iter().collect::<Vec<_>>()
        );
    }

    #[test]
    fn non_finite_values_are_dropped() {
        let mut stack = BonusStack::new();
        assert!(!stack.add("ac", f64::NAN));
        assert!(!stack.add("ac", f64::INFINITY));
        assert!(stack.is_empty());
    }

    #[test]
    fn merge_sums_per_key() {
        let mut a = BonusStack::new();
        a.add("hp", 5.0);
        let mut b = BonusStack::new();
        b.add("hp", 7.0);
        b.add("ac", 1.0);
        a.merge_from(&b);
        assert_eq!(a.total_for(&"hp"), Some(12.0));
        assert_eq!(a.total_for(&"ac"), Some(1.0));
    }
}
