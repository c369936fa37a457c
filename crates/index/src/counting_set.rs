use std::borrow::Borrow;
use std::collections::HashMap;
use std::hash::Hash;

/// Multiset counting how many contributors currently assert each value.
///
/// A value is present iff its count is positive; entries are evicted when their
/// count drops to zero.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CountingSet<T: Eq + Hash> {
    counts: HashMap<T, usize>,
}

impl<T: Eq + Hash> Default for CountingSet<T> {
    fn default() -> Self {
        Self {
            counts: HashMap::new(),
        }
    }
}

impl<T: Eq + Hash> CountingSet<T> {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, value: T) {
        *self.counts.entry(value).or_insert(0) += 1;
    }

    /// Decrement the count for `value`, evicting it at zero. Absent values are ignored.
    pub fn remove<Q>(&mut self, value: &Q)
    where
        T: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let Some(count) = self.counts.get_mut(value) else {
            return;
        };
        *count -= 1;
        if *count == 0 {
            self.counts.remove(value);
        }
    }

    #[must_use]
    pub fn count<Q>(&self, value: &Q) -> usize
    where
        T: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.counts.get(value).copied().unwrap_or(0)
    }

    #[must_use]
    pub fn contains<Q>(&self, value: &Q) -> bool
    where
        T: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.counts.contains_key(value)
    }

    /// Entries with a positive count, in no particular order.
    pub fn items(&self) -> impl Iterator<Item = (&T, usize)> + '_ {
        self.counts.iter().map(|(value, count)| (value, *count))
    }

    pub fn values(&self) -> impl Iterator<Item = &T> + '_ {
        self.counts.keys()
    }

    /// Number of distinct values.
    #[must_use]
    pub fn len(&self) -> usize {
        self.counts.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    pub fn clear(&mut self) {
        self.counts.clear();
    }
}
