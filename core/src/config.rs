//! Tunable parameters of a Lane Defence session.

use std::time::Duration;

use glam::Vec2;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Parameters that shape the field, the economy and the wave cadence.
///
/// Every field has a default, so configuration files only need to list the
/// values they override.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GameConfig {
    /// Width of the playing field in world units.
    pub field_width: f32,
    /// Height of the playing field in world units.
    pub field_height: f32,
    /// Side length of a grid cell; also the spacing of generated path points.
    pub cell_size: f32,
    /// Sparse corner points of the enemy route, in travel order.
    pub waypoints: Vec<Vec2>,
    /// Coins available before the first wave.
    pub initial_coins: u32,
    /// Leaks the player may absorb before the game ends.
    pub initial_lives: u32,
    /// Per-frame speed of enemies spawned before the first speed increase.
    pub initial_enemy_speed: f32,
    /// Speed added to future spawns whenever a wave starts.
    pub enemy_speed_step: f32,
    /// Health of an enemy before the wave bonus is added.
    pub base_enemy_health: i32,
    /// Coins credited for every destroyed enemy.
    pub kill_reward: u32,
    /// Per-frame speed of projectiles.
    pub projectile_speed: f32,
    /// Highest level a defense can be upgraded to.
    pub max_defense_level: u32,
    /// Milliseconds between wave starts.
    pub wave_interval_ms: u64,
    /// Milliseconds between consecutive spawns of a wave.
    pub spawn_delay_ms: u64,
    /// Enemies spawned per wave number.
    pub enemies_per_wave: u32,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            field_width: 600.0,
            field_height: 400.0,
            cell_size: 50.0,
            waypoints: vec![
                Vec2::new(0.0, 200.0),
                Vec2::new(150.0, 200.0),
                Vec2::new(150.0, 100.0),
                Vec2::new(450.0, 100.0),
                Vec2::new(450.0, 300.0),
                Vec2::new(600.0, 300.0),
            ],
            initial_coins: 100,
            initial_lives: 3,
            initial_enemy_speed: 2.0,
            enemy_speed_step: 0.05,
            base_enemy_health: 3,
            kill_reward: 10,
            projectile_speed: 5.0,
            max_defense_level: 5,
            wave_interval_ms: 10_000,
            spawn_delay_ms: 500,
            enemies_per_wave: 5,
        }
    }
}

impl GameConfig {
    /// Interval between wave starts.
    #[must_use]
    pub const fn wave_interval(&self) -> Duration {
        Duration::from_millis(self.wave_interval_ms)
    }

    /// Delay between consecutive spawns of the same wave.
    #[must_use]
    pub const fn spawn_delay(&self) -> Duration {
        Duration::from_millis(self.spawn_delay_ms)
    }

    /// Checks the invariants the world relies on.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.field_width > 0.0 && self.field_height > 0.0) {
            return Err(ConfigError::EmptyField {
                width: self.field_width,
                height: self.field_height,
            });
        }
        if !(self.cell_size > 0.0) {
            return Err(ConfigError::InvalidCellSize(self.cell_size));
        }
        if self.waypoints.len() < 2 {
            return Err(ConfigError::TooFewWaypoints(self.waypoints.len()));
        }
        if !(self.projectile_speed > 0.0) {
            return Err(ConfigError::InvalidProjectileSpeed(self.projectile_speed));
        }
        if self.wave_interval_ms == 0 {
            return Err(ConfigError::ZeroWaveInterval);
        }
        if self.max_defense_level == 0 {
            return Err(ConfigError::ZeroMaxLevel);
        }
        Ok(())
    }
}

/// Reasons a [`GameConfig`] cannot drive a simulation.
#[derive(Clone, Debug, PartialEq, Error)]
pub enum ConfigError {
    /// The field has no area.
    #[error("field must have a positive area (received {width}x{height})")]
    EmptyField {
        /// Configured field width.
        width: f32,
        /// Configured field height.
        height: f32,
    },
    /// Cells must have a positive size.
    #[error("cell_size must be positive (received {0})")]
    InvalidCellSize(f32),
    /// A route needs a start and an end.
    #[error("at least two waypoints are required (received {0})")]
    TooFewWaypoints(usize),
    /// Projectiles that never move would never land.
    #[error("projectile_speed must be positive (received {0})")]
    InvalidProjectileSpeed(f32),
    /// Waves need a cadence.
    #[error("wave_interval_ms must be positive")]
    ZeroWaveInterval,
    /// Defenses start at level one.
    #[error("max_defense_level must be at least one")]
    ZeroMaxLevel,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_configuration_is_valid() {
        assert_eq!(GameConfig::default().validate(), Ok(()));
    }

    #[test]
    fn partial_toml_overrides_defaults() {
        let config: GameConfig = toml::from_str(
            r#"
                initial_coins = 40
                waypoints = [[0.0, 0.0], [100.0, 0.0]]
            "#,
        )
        .expect("partial configuration parses");

        assert_eq!(config.initial_coins, 40);
        assert_eq!(config.waypoints, vec![Vec2::ZERO, Vec2::new(100.0, 0.0)]);
        assert_eq!(config.initial_lives, 3);
        assert_eq!(config.wave_interval(), Duration::from_secs(10));
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let parsed: Result<GameConfig, _> = toml::from_str("lifes = 3");
        assert!(parsed.is_err(), "typos must not silently fall back to defaults");
    }

    #[test]
    fn validation_rejects_degenerate_routes() {
        let config = GameConfig {
            waypoints: vec![Vec2::ZERO],
            ..GameConfig::default()
        };
        assert_eq!(config.validate(), Err(ConfigError::TooFewWaypoints(1)));
    }

    #[test]
    fn validation_rejects_non_positive_cell_size() {
        let config = GameConfig {
            cell_size: 0.0,
            ..GameConfig::default()
        };
        assert_eq!(config.validate(), Err(ConfigError::InvalidCellSize(0.0)));
    }
}
