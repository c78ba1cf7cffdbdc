#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure system that steers projectiles toward the current position of their target.

use glam::Vec2;
use lane_defence_core::{Command, EnemyView, Event, ProjectileSnapshot, ProjectileView};

/// Decision taken for a projectile during one frame.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Flight {
    /// The projectile keeps flying and ends the frame at `position`.
    Cruise {
        /// Position after the frame.
        position: Vec2,
    },
    /// The target is closer than one frame of travel.
    Impact,
    /// The target no longer exists.
    Orphaned,
}

/// Resolves a projectile against the current position of its target.
#[must_use]
pub fn steer(projectile: &ProjectileSnapshot, target: Option<Vec2>) -> Flight {
    let Some(target) = target else {
        return Flight::Orphaned;
    };

    let offset = target - projectile.position;
    if offset.length() < projectile.speed {
        return Flight::Impact;
    }

    Flight::Cruise {
        position: projectile.position + offset.normalize_or_zero() * projectile.speed,
    }
}

/// Homing system emitting one command per projectile for every simulated frame.
#[derive(Debug, Default)]
pub struct Projectiles;

impl Projectiles {
    /// Creates a new projectile system.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Consumes world events and views to emit projectile commands.
    ///
    /// Impacts are only proposed; the world resolves them one after another,
    /// so a second impact on an enemy killed earlier in the frame becomes a
    /// miss there.
    pub fn handle(
        &mut self,
        events: &[Event],
        projectiles: &ProjectileView,
        enemies: &EnemyView,
        out: &mut Vec<Command>,
    ) {
        if !events
            .iter()
            .any(|event| matches!(event, Event::TimeAdvanced { .. }))
        {
            return;
        }

        for projectile in projectiles.iter() {
            let target = enemies.get(projectile.target).map(|enemy| enemy.position);
            let command = match steer(projectile, target) {
                Flight::Cruise { position } => Command::MoveProjectile {
                    projectile: projectile.id,
                    position,
                },
                Flight::Impact => Command::ImpactProjectile {
                    projectile: projectile.id,
                },
                Flight::Orphaned => Command::DiscardProjectile {
                    projectile: projectile.id,
                },
            };
            out.push(command);
        }
    }
}
