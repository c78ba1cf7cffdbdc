//! Authoritative defense state management utilities.

use std::{collections::BTreeMap, time::Duration};

use glam::Vec2;
use lane_defence_core::{
    CellCoord, DefenseId, DefenseKind, DefenseSnapshot, UPGRADE_COST_STEP, UPGRADE_DAMAGE_STEP,
    UPGRADE_RANGE_STEP, UPGRADE_RATE_STEP,
};

/// Mutable state of a defense stored inside the world.
#[derive(Clone, Debug, PartialEq)]
pub(crate) struct DefenseState {
    pub(crate) id: DefenseId,
    pub(crate) kind: DefenseKind,
    /// Cell claimed by the defense; the cell records the id in return.
    pub(crate) cell: CellCoord,
    pub(crate) center: Vec2,
    pub(crate) range: f32,
    pub(crate) damage: i32,
    pub(crate) rate: Duration,
    pub(crate) last_shot: Option<Duration>,
    pub(crate) level: u32,
    pub(crate) upgrade_cost: u32,
}

impl DefenseState {
    fn new(id: DefenseId, kind: DefenseKind, cell: CellCoord, center: Vec2) -> Self {
        Self {
            id,
            kind,
            cell,
            center,
            range: kind.base_range(),
            damage: kind.base_damage(),
            rate: kind.base_rate(),
            last_shot: None,
            level: 1,
            upgrade_cost: kind.base_upgrade_cost(),
        }
    }

    /// Reports whether strictly more than `rate` elapsed since the last volley.
    pub(crate) fn is_ready(&self, now: Duration) -> bool {
        match self.last_shot {
            None => true,
            Some(last_shot) => now.saturating_sub(last_shot) > self.rate,
        }
    }

    /// Reports whether a projectile may leave the defense at `now`.
    ///
    /// Projectiles of a volley share the timestamp of its first shot.
    pub(crate) fn can_fire(&self, now: Duration) -> bool {
        self.is_ready(now) || self.last_shot == Some(now)
    }

    pub(crate) fn upgrade(&mut self) {
        self.level += 1;
        self.damage += UPGRADE_DAMAGE_STEP;
        self.range += UPGRADE_RANGE_STEP;
        self.rate = self.rate.saturating_sub(UPGRADE_RATE_STEP);
        self.upgrade_cost = self.upgrade_cost.saturating_add(UPGRADE_COST_STEP);
    }

    pub(crate) fn snapshot(&self) -> DefenseSnapshot {
        DefenseSnapshot {
            id: self.id,
            kind: self.kind,
            cell: self.cell,
            center: self.center,
            range: self.range,
            damage: self.damage,
            rate: self.rate,
            last_shot: self.last_shot,
            level: self.level,
            upgrade_cost: self.upgrade_cost,
        }
    }
}

/// Registry that stores defenses and manages identifier allocation.
#[derive(Debug)]
pub(crate) struct DefenseRegistry {
    entries: BTreeMap<DefenseId, DefenseState>,
    next_defense_id: DefenseId,
}

impl DefenseRegistry {
    /// Creates an empty defense registry with a reset identifier counter.
    pub(crate) fn new() -> Self {
        Self {
            entries: BTreeMap::new(),
            next_defense_id: DefenseId::new(0),
        }
    }

    pub(crate) fn insert(&mut self, kind: DefenseKind, cell: CellCoord, center: Vec2) -> DefenseId {
        let id = self.next_defense_id;
        self.next_defense_id = DefenseId::new(id.get().wrapping_add(1));
        let _ = self
            .entries
            .insert(id, DefenseState::new(id, kind, cell, center));
        id
    }

    pub(crate) fn get_mut(&mut self, id: DefenseId) -> Option<&mut DefenseState> {
        self.entries.get_mut(&id)
    }

    pub(crate) fn remove(&mut self, id: DefenseId) -> Option<DefenseState> {
        self.entries.remove(&id)
    }

    pub(crate) fn iter(&self) -> impl Iterator<Item = &DefenseState> {
        self.entries.values()
    }
}
