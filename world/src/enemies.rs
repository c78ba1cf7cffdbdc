//! Enemy storage keyed by generation-checked handles.

use glam::Vec2;
use lane_defence_core::{EnemyId, EnemySnapshot};
use slotmap::SlotMap;

#[derive(Clone, Debug, PartialEq)]
pub(crate) struct EnemyState {
    pub(crate) position: Vec2,
    pub(crate) path_index: usize,
    pub(crate) speed: f32,
    pub(crate) health: i32,
}

/// Arena of enemies that also remembers spawn order.
///
/// Slots are recycled with a bumped generation, so handles held by
/// projectiles stop resolving once their enemy is gone.
#[derive(Debug, Default)]
pub(crate) struct EnemyStore {
    slots: SlotMap<EnemyId, EnemyState>,
    order: Vec<EnemyId>,
}

impl EnemyStore {
    pub(crate) fn insert(&mut self, state: EnemyState) -> EnemyId {
        let id = self.slots.insert(state);
        self.order.push(id);
        id
    }

    pub(crate) fn get(&self, id: EnemyId) -> Option<&EnemyState> {
        self.slots.get(id)
    }

    pub(crate) fn get_mut(&mut self, id: EnemyId) -> Option<&mut EnemyState> {
        self.slots.get_mut(id)
    }

    pub(crate) fn remove(&mut self, id: EnemyId) -> Option<EnemyState> {
        let removed = self.slots.remove(id)?;
        if let Some(position) = self.order.iter().position(|entry| *entry == id) {
            let _ = self.order.remove(position);
        }
        Some(removed)
    }

    pub(crate) fn len(&self) -> usize {
        self.order.len()
    }

    /// Snapshots of every enemy in spawn order.
    pub(crate) fn snapshots(&self) -> Vec<EnemySnapshot> {
        self.order
            .iter()
            .filter_map(|id| {
                self.slots.get(*id).map(|enemy| EnemySnapshot {
                    id: *id,
                    position: enemy.position,
                    path_index: enemy.path_index,
                    speed: enemy.speed,
                    health: enemy.health,
                })
            })
            .collect()
    }
}
