use std::collections::BTreeMap;

use parking_lot::{Mutex, MutexGuard};
use shared_resources::call::{Demand, Direction};

/// Unserved call requests keyed by floor.
///
/// Contended by the controller's `pick` misses, every unit's backlog
/// delivery, and the skip rule; every read-modify-write step on a key
/// happens under the one lock.
pub struct PendingBacklog {
    entries: Mutex<BTreeMap<u8, Demand>>,
}

impl PendingBacklog {
    pub fn new() -> PendingBacklog {
        PendingBacklog {
            entries: Mutex::new(BTreeMap::new()),
        }
    }

    pub fn add_entry(&self, floor: u8, direction: Direction) {
        let mut entries = self.entries.lock();
        Self::add_locked(&mut entries, floor, direction);
    }

    pub fn remove_entry(&self, floor: u8, direction: Direction) {
        let mut entries = self.entries.lock();
        Self::remove_locked(&mut entries, floor, direction);
    }

    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }

    pub fn snapshot(&self) -> BTreeMap<u8, Demand> {
        self.entries.lock().clone()
    }

    /// The controller holds this guard across a whole select-and-consume
    /// step so no entry can be handed to two units.
    pub(crate) fn guard(&self) -> MutexGuard<'_, BTreeMap<u8, Demand>> {
        self.entries.lock()
    }

    pub(crate) fn add_locked(entries: &mut BTreeMap<u8, Demand>, floor: u8, direction: Direction) {
        let demand = match entries.get(&floor) {
            Some(present) => present.merge(direction),
            None => Demand::from_direction(direction),
        };
        entries.insert(floor, demand);
    }

    pub(crate) fn remove_locked(
        entries: &mut BTreeMap<u8, Demand>,
        floor: u8,
        direction: Direction,
    ) {
        if let Some(&present) = entries.get(&floor) {
            match present.remove(direction) {
                Some(rest) => {
                    entries.insert(floor, rest);
                }
                None => {
                    entries.remove(&floor);
                }
            }
        }
    }
}
