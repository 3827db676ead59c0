use std::collections::HashMap;
use std::hash::Hash;

/// Map that remembers the order keys were first inserted in.
///
/// Ranking ties are broken by that order, so iteration must be stable
/// rather than hash-ordered.
#[derive(Debug, Clone)]
pub struct InsertionOrderedMap<K, V> {
    index: HashMap<K, usize>,
    entries: Vec<(K, V)>,
}

impl<K: Eq + Hash + Clone, V> InsertionOrderedMap<K, V> {
    pub fn new() -> Self {
        Self {
            index: HashMap::new(),
            entries: Vec::new(),
        }
    }

    pub fn entry_or_insert_with<F>(&mut self, key: K, default: F) -> &mut V
    where
        F: FnOnce() -> V,
    {
        let slot = match self.index.get(&key) {
            Some(&slot) => slot,
            None => {
                let slot = self.entries.len();
                self.index.insert(key.clone(), slot);
                self.entries.push((key, default()));
                slot
            }
        };
        &mut self.entries[slot].1
    }

    #[cfg(test)]
    pub fn get(&self, key: &K) -> Option<&V> {
        self.index.get(key).map(|&slot| &self.entries[slot].1)
    }

    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[cfg(test)]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&K, &V)> {
        self.entries.iter().map(|(k, v)| (k, v))
    }

    pub fn into_entries(self) -> Vec<(K, V)> {
        self.entries
    }
}

impl<K: Eq + Hash + Clone> InsertionOrderedMap<K, u64> {
    pub fn add(&mut self, key: K, amount: u64) {
        *self.entry_or_insert_with(key, || 0) += amount;
    }

    /// Entry with the largest value; the earliest inserted key wins ties.
    pub fn max_entry(&self) -> Option<(&K, u64)> {
        self.entries.iter().fold(None, |best, (key, value)| match best {
            Some((_, best_value)) if best_value >= *value => best,
            _ => Some((key, *value)),
        })
    }
}

impl<K: Eq + Hash + Clone, V> Default for InsertionOrderedMap<K, V> {
    fn default() -> Self {
        Self::new()
    }
}
