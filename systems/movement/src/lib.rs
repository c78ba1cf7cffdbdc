#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure system that walks enemies along the shared route.

use glam::Vec2;
use lane_defence_core::{Command, EnemyView, Event};

/// Outcome of advancing a single enemy by one frame.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Step {
    /// The enemy remains on the route.
    Advance {
        /// Position after the frame.
        position: Vec2,
        /// Index of the last route point reached.
        path_index: usize,
    },
    /// No route point remains ahead of the enemy.
    Leak,
}

/// Advances an enemy by at most `speed` toward the route point after `path_index`.
///
/// An enemy closer than `speed` to that point snaps onto it and moves its
/// index forward; otherwise it travels exactly `speed` along the segment.
#[must_use]
pub fn advance(position: Vec2, path_index: usize, speed: f32, path: &[Vec2]) -> Step {
    let Some(&target) = path_index.checked_add(1).and_then(|next| path.get(next)) else {
        return Step::Leak;
    };

    let offset = target - position;
    if offset.length() < speed {
        return Step::Advance {
            position: target,
            path_index: path_index + 1,
        };
    }

    Step::Advance {
        position: position + offset.normalize_or_zero() * speed,
        path_index,
    }
}

/// Movement system that emits one step per enemy for every simulated frame.
#[derive(Debug, Default)]
pub struct Movement;

impl Movement {
    /// Creates a new movement system.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Consumes world events and the enemy view to emit movement commands.
    ///
    /// Nothing is emitted unless the batch contains a tick.
    pub fn handle(
        &mut self,
        events: &[Event],
        enemies: &EnemyView,
        path: &[Vec2],
        out: &mut Vec<Command>,
    ) {
        if !events
            .iter()
            .any(|event| matches!(event, Event::TimeAdvanced { .. }))
        {
            return;
        }

        for enemy in enemies.iter() {
            let command = match advance(enemy.position, enemy.path_index, enemy.speed, path) {
                Step::Advance {
                    position,
                    path_index,
                } => Command::MoveEnemy {
                    enemy: enemy.id,
                    position,
                    path_index,
                },
                Step::Leak => Command::LeakEnemy { enemy: enemy.id },
            };
            out.push(command);
        }
    }
}
