#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure system that pairs defenses with every enemy inside their range.

use glam::Vec2;
use lane_defence_core::{DefenseTarget, DefenseView, EnemyId, EnemyView};

/// Volley targeting system that reuses a scratch buffer between frames.
#[derive(Debug, Default)]
pub struct TowerTargeting {
    enemy_workspace: Vec<EnemyCandidate>,
}

impl TowerTargeting {
    /// Creates a new targeting system with an empty scratch buffer.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Computes defense targets for the provided world snapshot.
    ///
    /// The output buffer is cleared before populating it. Pairs are listed by
    /// defense identifier, then in enemy spawn order. An enemy exactly at the
    /// edge of a defense's range is out of reach.
    pub fn handle(
        &mut self,
        defenses: &DefenseView,
        enemies: &EnemyView,
        out: &mut Vec<DefenseTarget>,
    ) {
        out.clear();

        if defenses.iter().next().is_none() || enemies.is_empty() {
            return;
        }

        self.enemy_workspace.clear();
        self.enemy_workspace
            .extend(enemies.iter().map(|snapshot| EnemyCandidate {
                id: snapshot.id,
                position: snapshot.position,
            }));

        for defense in defenses.iter() {
            let reach_sq = defense.range * defense.range;
            for candidate in &self.enemy_workspace {
                if defense.center.distance_squared(candidate.position) < reach_sq {
                    out.push(DefenseTarget {
                        defense: defense.id,
                        enemy: candidate.id,
                        defense_center: defense.center,
                        enemy_position: candidate.position,
                    });
                }
            }
        }
    }
}

#[derive(Clone, Copy, Debug)]
struct EnemyCandidate {
    id: EnemyId,
    position: Vec2,
}
