use std::sync::Arc;

use ckit_graph::EntityGraph;
use ckit_rules::RuleSet;
use parking_lot::RwLock;

/// A shared value replaced wholesale, never edited in place.
///
/// Readers take an [`Arc`] snapshot and keep using it for as long as they
/// like; [`publish`](Self::publish) swaps in a new value for later readers.
#[derive(Debug, Default)]
pub struct Published<T> {
    current: RwLock<Arc<T>>,
}

/// Current entity graph, rebuilt when the entity set changes.
pub type GraphHandle = Published<EntityGraph>;

/// Current rule set, swapped on reload.
pub type RuleSetHandle = Published<RuleSet>;

impl<T> Published<T> {
    pub fn new(value: T) -> Self {
        Self {
            current: RwLock::new(Arc::new(value)),
        }
    }

    /// The value as of now.
    pub fn snapshot(&self) -> Arc<T> {
        Arc::clone(&self.current.read())
    }

    /// Replace the value, returning the one it superseded.
    pub fn publish(&self, value: T) -> Arc<T> {
        let next = Arc::new(value);
        std::mem::replace(&mut *self.current.write(), next)
    }
}

#[cfg(test)]
mod tests {
    use std::thread;

    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn snapshots_survive_publish() {
        let cell = Published::new(vec![1, 2]);
        let before = cell.snapshot();

        let previous = cell.publish(vec![3]);
        assert_eq!(*previous, vec![1, 2]);
        assert_eq!(*before, vec![1, 2]);
        assert_eq!(*cell.snapshot(), vec![3]);
    }

    #[test]
    fn readers_never_see_torn_values() {
        let cell = Published::new((0_u32, 0_u32));
        thread::scope(|scope| {
            scope.spawn(|| {
                for n in 1..=200 {
                    cell.publish((n, n));
                }
            });
            for _ in 0..4 {
                scope.spawn(|| {
                    for _ in 0..200 {
                        let pair = cell.snapshot();
                        assert_eq!(pair.0, pair.1);
                    }
                });
            }
        });
        assert_eq!(*cell.snapshot(), (200, 200));
    }
}
