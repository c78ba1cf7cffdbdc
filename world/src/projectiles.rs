//! Projectiles in flight.

use std::collections::BTreeMap;

use glam::Vec2;
use lane_defence_core::{EnemyId, ProjectileId, ProjectileSnapshot};

#[derive(Clone, Debug, PartialEq)]
pub(crate) struct ProjectileState {
    pub(crate) position: Vec2,
    /// Weak reference; the enemy may vanish before impact.
    pub(crate) target: EnemyId,
    pub(crate) speed: f32,
    pub(crate) damage: i32,
}

/// Registry ordered by firing sequence.
#[derive(Debug)]
pub(crate) struct ProjectileRegistry {
    entries: BTreeMap<ProjectileId, ProjectileState>,
    next_projectile_id: ProjectileId,
}

impl ProjectileRegistry {
    pub(crate) fn new() -> Self {
        Self {
            entries: BTreeMap::new(),
            next_projectile_id: ProjectileId::new(0),
        }
    }

    pub(crate) fn insert(&mut self, state: ProjectileState) -> ProjectileId {
        let id = self.next_projectile_id;
        self.next_projectile_id = ProjectileId::new(id.get().wrapping_add(1));
        let _ = self.entries.insert(id, state);
        id
    }

    pub(crate) fn get_mut(&mut self, id: ProjectileId) -> Option<&mut ProjectileState> {
        self.entries.get_mut(&id)
    }

    pub(crate) fn remove(&mut self, id: ProjectileId) -> Option<ProjectileState> {
        self.entries.remove(&id)
    }

    pub(crate) fn snapshots(&self) -> Vec<ProjectileSnapshot> {
        self.entries
            .iter()
            .map(|(id, projectile)| ProjectileSnapshot {
                id: *id,
                position: projectile.position,
                target: projectile.target,
                speed: projectile.speed,
                damage: projectile.damage,
            })
            .collect()
    }
}
