use std::{collections::HashSet, hash::Hash};

/// Tracks which entities were spawned, changed, or removed during a tick.
///
/// The renderer drains this once per tick to keep GPU buffers in sync with
/// the simulation without rewriting every instance.
pub struct ChangedSet<T: Eq + Hash> {
    _spawned: HashSet<T>,
    _changed: HashSet<T>,
    _removed: HashSet<T>,
}

impl<T: Eq + Hash> Default for ChangedSet<T> {
    fn default() -> Self {
        Self {
            _spawned: HashSet::new(),
            _changed: HashSet::new(),
            _removed: HashSet::new(),
        }
    }
}

impl<T: Eq + Hash> ChangedSet<T> {
    pub fn clear(&mut self) {
        self._spawned.clear();
        self._changed.clear();
        self._removed.clear();
    }

    pub fn spawn(&mut self, entity: T) {
        self._spawned.insert(entity);
    }

    pub fn spawned(&self) -> &HashSet<T> {
        &self._spawned
    }

    pub fn change(&mut self, entity: T) {
        self._changed.insert(entity);
    }

    pub fn changed(&self) -> &HashSet<T> {
        &self._changed
    }

    pub fn remove(&mut self, entity: T) {
        self._removed.insert(entity);
    }

    pub fn removed(&self) -> &HashSet<T> {
        &self._removed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tracks_each_kind_separately() {
        let mut set: ChangedSet<u32> = Default::default();

        set.spawn(1);
        set.change(2);
        set.change(2);
        set.remove(3);

        assert_eq!(set.spawned().len(), 1);
        assert_eq!(set.changed().len(), 1);
        assert_eq!(set.removed().len(), 1);

        set.clear();
        assert!(set.spawned().is_empty());
        assert!(set.changed().is_empty());
        assert!(set.removed().is_empty());
    }
}
