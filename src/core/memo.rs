// IMACX Logistica - core/memo.rs
//
// Single-slot memoisation keyed on a comparable value.
// Scoped to one owner; there is no global cache.

/// Remembers the last key and the value computed for it.
#[derive(Debug, Clone)]
pub struct Memo<K, V> {
    slot: Option<(K, V)>,
}

impl<K, V> Default for Memo<K, V> {
    fn default() -> Self {
        Self { slot: None }
    }
}

impl<K: PartialEq, V: Clone> Memo<K, V> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the cached value if `key` equals the previous key, otherwise
    /// run `compute`, store its result under `key`, and return it.
    pub fn get_or_compute(&mut self, key: K, compute: impl FnOnce() -> V) -> V {
        if let Some((cached_key, value)) = &self.slot {
            if *cached_key == key {
                return value.clone();
            }
        }
        let value = compute();
        self.slot = Some((key, value.clone()));
        value
    }

    /// Drop the cached entry.
    pub fn invalidate(&mut self) {
        self.slot = None;
    }
}
