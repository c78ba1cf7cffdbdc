#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure system that emits projectile firing commands from targeting data.

use lane_defence_core::{
    Command, DefenseCooldownSnapshot, DefenseCooldownView, DefenseId, DefenseTarget,
};

/// Defense combat system that queues a volley for every ready defense.
#[derive(Debug, Default)]
pub struct TowerCombat {
    scratch: Vec<Command>,
}

impl TowerCombat {
    /// Creates a new combat system with an empty scratch buffer.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Emits `Command::FireProjectile` for each target whose defense is ready.
    ///
    /// A ready defense fires at every enemy paired with it, so one frame may
    /// produce several projectiles from the same defense.
    pub fn handle(
        &mut self,
        cooldowns: DefenseCooldownView,
        targets: &[DefenseTarget],
        out: &mut Vec<Command>,
    ) {
        if targets.is_empty() {
            return;
        }

        let cooldowns = cooldowns.into_vec();
        if cooldowns.is_empty() {
            return;
        }

        self.scratch.clear();

        for target in targets {
            if find_cooldown(&cooldowns, target.defense).map_or(false, |snapshot| snapshot.ready) {
                self.scratch.push(Command::FireProjectile {
                    defense: target.defense,
                    target: target.enemy,
                });
            }
        }

        out.reserve(self.scratch.len());
        out.append(&mut self.scratch);
    }
}

fn find_cooldown(
    cooldowns: &[DefenseCooldownSnapshot],
    defense: DefenseId,
) -> Option<&DefenseCooldownSnapshot> {
    cooldowns
        .binary_search_by_key(&defense, |snapshot| snapshot.defense)
        .ok()
        .and_then(|index| cooldowns.get(index))
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec2;
    use lane_defence_core::EnemyId;

    #[test]
    fn ready_defense_fires_full_volley() {
        let mut system = TowerCombat::new();
        let cooldowns = DefenseCooldownView::from_snapshots(vec![snapshot(2, true)]);
        let first = EnemyId::default();
        let targets = vec![target(2, first), target(2, first)];
        let mut out = Vec::new();

        system.handle(cooldowns, &targets, &mut out);

        assert_eq!(out.len(), 2);
        assert!(out.iter().all(|command| matches!(
            command,
            Command::FireProjectile { defense, .. } if *defense == DefenseId::new(2)
        )));
    }

    #[test]
    fn cooling_or_missing_defenses_are_skipped() {
        let mut system = TowerCombat::new();
        let cooldowns = DefenseCooldownView::from_snapshots(vec![
            snapshot(8, true),
            snapshot(3, false),
        ]);
        let enemy = EnemyId::default();
        let targets = vec![target(3, enemy), target(8, enemy), target(42, enemy)];
        let mut out = Vec::new();

        system.handle(cooldowns, &targets, &mut out);

        assert_eq!(
            out,
            vec![Command::FireProjectile {
                defense: DefenseId::new(8),
                target: enemy,
            }],
        );
    }

    #[test]
    fn no_targets_means_no_commands() {
        let mut system = TowerCombat::new();
        let cooldowns = DefenseCooldownView::from_snapshots(vec![snapshot(1, true)]);
        let mut out = Vec::new();

        system.handle(cooldowns, &[], &mut out);

        assert!(out.is_empty());
    }

    fn snapshot(defense: u32, ready: bool) -> DefenseCooldownSnapshot {
        DefenseCooldownSnapshot {
            defense: DefenseId::new(defense),
            ready,
        }
    }

    fn target(defense: u32, enemy: EnemyId) -> DefenseTarget {
        DefenseTarget {
            defense: DefenseId::new(defense),
            enemy,
            defense_center: Vec2::ZERO,
            enemy_position: Vec2::ZERO,
        }
    }
}
