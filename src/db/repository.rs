use std::collections::BTreeMap;

/// Keyed entity storage, hiding the backing container from the billing logic.
pub trait Repository<K: 'static, V: 'static> {
    /// Insert the value, returning the replaced one if the key was taken.
    fn insert(&mut self, key: K, value: V) -> Option<V>;

    fn get(&self, key: &K) -> Option<&V>;

    fn get_mut(&mut self, key: &K) -> Option<&mut V>;

    fn remove(&mut self, key: &K) -> Option<V>;

    /// Iterate over the values in key order.
    fn values(&self) -> impl Iterator<Item = &V>;

    fn values_mut(&mut self) -> impl Iterator<Item = &mut V>;

    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// In-memory repository.
#[derive(Clone, Debug)]
pub struct InMemory<K, V>(BTreeMap<K, V>);

impl<K, V> Default for InMemory<K, V> {
    fn default() -> Self {
        Self(BTreeMap::new())
    }
}

impl<K: Ord, V: Default> InMemory<K, V> {
    pub fn get_or_insert_default(&mut self, key: K) -> &mut V {
        self.0.entry(key).or_default()
    }
}

impl<K: Ord, V> FromIterator<(K, V)> for InMemory<K, V> {
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl<K: Ord + 'static, V: 'static> Repository<K, V> for InMemory<K, V> {
    fn insert(&mut self, key: K, value: V) -> Option<V> {
        self.0.insert(key, value)
    }

    fn get(&self, key: &K) -> Option<&V> {
        self.0.get(key)
    }

    fn get_mut(&mut self, key: &K) -> Option<&mut V> {
        self.0.get_mut(key)
    }

    fn remove(&mut self, key: &K) -> Option<V> {
        self.0.remove(key)
    }

    fn values(&self) -> impl Iterator<Item = &V> {
        self.0.values()
    }

    fn values_mut(&mut self) -> impl Iterator<Item = &mut V> {
        self.0.values_mut()
    }

    fn len(&self) -> usize {
        self.0.len()
    }
}
