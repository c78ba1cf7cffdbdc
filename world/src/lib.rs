#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative world state management for Lane Defence.

mod defenses;
mod economy;
mod enemies;
mod grid;
mod navigation;
mod projectiles;

use std::time::Duration;

use glam::Vec2;
use lane_defence_core::{
    CellCoord, Command, ConfigError, DefenseId, DefenseKind, EnemyId, Event, GameConfig,
    GameStatus, PlacementError, ProjectileId, RemovalError, UpgradeError, WELCOME_BANNER,
};
use tracing::{debug, info};

use defenses::DefenseRegistry;
use economy::Economy;
use enemies::{EnemyState, EnemyStore};
use grid::Grid;
use projectiles::{ProjectileRegistry, ProjectileState};

pub use navigation::generate_path;

/// Represents the authoritative Lane Defence world state.
#[derive(Debug)]
pub struct World {
    banner: &'static str,
    config: GameConfig,
    path: Vec<Vec2>,
    grid: Grid,
    enemies: EnemyStore,
    defenses: DefenseRegistry,
    projectiles: ProjectileRegistry,
    economy: Economy,
    wave: u32,
    enemy_speed: f32,
    clock: Duration,
    status: GameStatus,
}

impl World {
    /// Creates a world laid out according to the provided configuration.
    ///
    /// The route is densified at one point per cell and the grid flags every
    /// cell the route passes through.
    pub fn new(config: GameConfig) -> Result<Self, ConfigError> {
        config.validate()?;

        let path = generate_path(&config.waypoints, config.cell_size);
        let grid = Grid::build(
            config.field_width,
            config.field_height,
            config.cell_size,
            &path,
        );

        Ok(Self {
            banner: WELCOME_BANNER,
            economy: Economy::new(config.initial_coins, config.initial_lives),
            enemy_speed: config.initial_enemy_speed,
            path,
            grid,
            enemies: EnemyStore::default(),
            defenses: DefenseRegistry::new(),
            projectiles: ProjectileRegistry::new(),
            wave: 0,
            clock: Duration::ZERO,
            status: GameStatus::Running,
            config,
        })
    }

    fn is_over(&self) -> bool {
        self.status == GameStatus::Lost
    }

    fn spawn_enemy(&mut self, wave: u32, out_events: &mut Vec<Event>) {
        let Some(&entry) = self.path.first() else {
            return;
        };
        let wave_bonus = i32::try_from(wave).unwrap_or(i32::MAX);
        let health = self.config.base_enemy_health.saturating_add(wave_bonus);
        let enemy = self.enemies.insert(EnemyState {
            position: entry,
            path_index: 0,
            speed: self.enemy_speed,
            health,
        });
        out_events.push(Event::EnemySpawned {
            enemy,
            wave,
            health,
        });
    }

    fn leak_enemy(&mut self, enemy: EnemyId, out_events: &mut Vec<Event>) {
        if self.enemies.remove(enemy).is_none() {
            return;
        }

        let lives_remaining = self.economy.lose_life();
        debug!(?enemy, lives_remaining, "enemy leaked");
        out_events.push(Event::EnemyLeaked {
            enemy,
            lives_remaining,
        });

        if lives_remaining == 0 {
            self.status = GameStatus::Lost;
            info!(wave = self.wave, "last life lost");
            out_events.push(Event::GameOver);
        }
    }

    fn fire_projectile(&mut self, defense: DefenseId, target: EnemyId, out_events: &mut Vec<Event>) {
        if self.enemies.get(target).is_none() {
            return;
        }
        let now = self.clock;
        let Some(state) = self.defenses.get_mut(defense) else {
            return;
        };
        if !state.can_fire(now) {
            return;
        }
        state.last_shot = Some(now);

        let projectile = self.projectiles.insert(ProjectileState {
            position: state.center,
            target,
            speed: self.config.projectile_speed,
            damage: state.damage,
        });
        out_events.push(Event::ProjectileFired {
            projectile,
            defense,
            target,
        });
    }

    fn resolve_impact(&mut self, projectile: ProjectileId, out_events: &mut Vec<Event>) {
        let Some(state) = self.projectiles.remove(projectile) else {
            return;
        };
        let target = state.target;

        let Some(enemy) = self.enemies.get_mut(target) else {
            out_events.push(Event::ProjectileMissed { projectile, target });
            return;
        };

        enemy.health = enemy.health.saturating_sub(state.damage);
        if enemy.health > 0 {
            out_events.push(Event::EnemyDamaged {
                enemy: target,
                remaining_health: enemy.health,
            });
            return;
        }

        let _ = self.enemies.remove(target);
        let reward = self.config.kill_reward;
        self.economy.earn(reward);
        out_events.push(Event::EnemyKilled {
            enemy: target,
            reward,
        });
    }

    fn place_defense(&mut self, kind: DefenseKind, cell: CellCoord) -> Result<DefenseId, PlacementError> {
        let center = {
            let slot = self.grid.cell(cell).ok_or(PlacementError::OutOfBounds)?;
            if slot.is_path() {
                return Err(PlacementError::PathCell);
            }
            if slot.is_occupied() {
                return Err(PlacementError::Occupied);
            }
            slot.center(self.grid.cell_size())
        };

        self.economy
            .try_spend(kind.cost())
            .map_err(|shortfall| PlacementError::InsufficientFunds {
                cost: shortfall.cost,
                available: shortfall.available,
            })?;

        let defense = self.defenses.insert(kind, cell, center);
        self.grid.occupy(cell, defense);
        Ok(defense)
    }

    fn upgrade_defense(&mut self, defense: DefenseId) -> Result<u32, UpgradeError> {
        let max_level = self.config.max_defense_level;
        let state = self
            .defenses
            .get_mut(defense)
            .ok_or(UpgradeError::MissingDefense)?;
        if state.level >= max_level {
            return Err(UpgradeError::MaxLevelReached { level: state.level });
        }

        self.economy
            .try_spend(state.upgrade_cost)
            .map_err(|shortfall| UpgradeError::InsufficientFunds {
                cost: shortfall.cost,
                available: shortfall.available,
            })?;
        state.upgrade();
        Ok(state.level)
    }

    fn remove_defense(&mut self, defense: DefenseId) -> Result<CellCoord, RemovalError> {
        let state = self
            .defenses
            .remove(defense)
            .ok_or(RemovalError::MissingDefense)?;
        self.grid.vacate(state.cell);
        Ok(state.cell)
    }
}

/// Applies the provided command to the world, mutating state deterministically.
///
/// Once the game is lost, player actions are answered with rejection events
/// and every other command is ignored.
pub fn apply(world: &mut World, command: Command, out_events: &mut Vec<Event>) {
    if world.is_over() {
        reject_after_game_over(command, out_events);
        return;
    }

    match command {
        Command::Tick { dt } => {
            world.clock = world.clock.saturating_add(dt);
            out_events.push(Event::TimeAdvanced { dt });
        }
        Command::StartWave => {
            world.wave = world.wave.saturating_add(1);
            world.enemy_speed += world.config.enemy_speed_step;
            info!(wave = world.wave, speed = world.enemy_speed, "wave started");
            out_events.push(Event::WaveStarted { wave: world.wave });
        }
        Command::SpawnEnemy { wave } => world.spawn_enemy(wave, out_events),
        Command::MoveEnemy {
            enemy,
            position,
            path_index,
        } => {
            let last_index = world.path.len().saturating_sub(1);
            if let Some(state) = world.enemies.get_mut(enemy) {
                state.position = position;
                state.path_index = path_index.min(last_index);
            }
        }
        Command::LeakEnemy { enemy } => world.leak_enemy(enemy, out_events),
        Command::FireProjectile { defense, target } => {
            world.fire_projectile(defense, target, out_events);
        }
        Command::MoveProjectile {
            projectile,
            position,
        } => {
            if let Some(state) = world.projectiles.get_mut(projectile) {
                state.position = position;
            }
        }
        Command::ImpactProjectile { projectile } => world.resolve_impact(projectile, out_events),
        Command::DiscardProjectile { projectile } => {
            if let Some(state) = world.projectiles.remove(projectile) {
                out_events.push(Event::ProjectileMissed {
                    projectile,
                    target: state.target,
                });
            }
        }
        Command::PlaceDefense { kind, cell } => match world.place_defense(kind, cell) {
            Ok(defense) => out_events.push(Event::DefensePlaced {
                defense,
                kind,
                cell,
            }),
            Err(reason) => {
                debug!(kind = kind.label(), ?cell, %reason, "placement rejected");
                out_events.push(Event::DefensePlacementRejected { kind, cell, reason });
            }
        },
        Command::UpgradeDefense { defense } => match world.upgrade_defense(defense) {
            Ok(level) => out_events.push(Event::DefenseUpgraded { defense, level }),
            Err(reason) => {
                debug!(?defense, %reason, "upgrade rejected");
                out_events.push(Event::DefenseUpgradeRejected { defense, reason });
            }
        },
        Command::RemoveDefense { defense } => match world.remove_defense(defense) {
            Ok(cell) => out_events.push(Event::DefenseRemoved { defense, cell }),
            Err(reason) => {
                debug!(?defense, %reason, "removal rejected");
                out_events.push(Event::DefenseRemovalRejected { defense, reason });
            }
        },
    }
}

fn reject_after_game_over(command: Command, out_events: &mut Vec<Event>) {
    match command {
        Command::PlaceDefense { kind, cell } => {
            out_events.push(Event::DefensePlacementRejected {
                kind,
                cell,
                reason: PlacementError::GameOver,
            });
        }
        Command::UpgradeDefense { defense } => {
            out_events.push(Event::DefenseUpgradeRejected {
                defense,
                reason: UpgradeError::GameOver,
            });
        }
        Command::RemoveDefense { defense } => {
            out_events.push(Event::DefenseRemovalRejected {
                defense,
                reason: RemovalError::GameOver,
            });
        }
        _ => {}
    }
}

/// Query functions that provide read-only access to the world state.
pub mod query {
    use std::time::Duration;

    use glam::Vec2;
    use lane_defence_core::{
        CellCoord, DefenseCooldownSnapshot, DefenseCooldownView, DefenseId, DefenseView,
        EnemyView, GameConfig, GameStatus, GridView, ProjectileView,
    };

    use super::World;

    /// Retrieves the welcome banner that adapters may display to players.
    #[must_use]
    pub fn welcome_banner(world: &World) -> &'static str {
        world.banner
    }

    /// Configuration the world was created from.
    #[must_use]
    pub fn config(world: &World) -> &GameConfig {
        &world.config
    }

    /// Provides read-only access to the cell lattice.
    #[must_use]
    pub fn grid_view(world: &World) -> GridView<'_> {
        world.grid.view()
    }

    /// Dense route followed by every enemy.
    #[must_use]
    pub fn path(world: &World) -> &[Vec2] {
        &world.path
    }

    /// Captures a read-only view of the enemies in spawn order.
    #[must_use]
    pub fn enemy_view(world: &World) -> EnemyView {
        EnemyView::from_snapshots(world.enemies.snapshots())
    }

    /// Captures a read-only view of the defenses sorted by identifier.
    #[must_use]
    pub fn defense_view(world: &World) -> DefenseView {
        DefenseView::from_snapshots(world.defenses.iter().map(|d| d.snapshot()).collect())
    }

    /// Reports which defenses finished their cooldown at the current time.
    #[must_use]
    pub fn defense_cooldowns(world: &World) -> DefenseCooldownView {
        let now = world.clock;
        DefenseCooldownView::from_snapshots(
            world
                .defenses
                .iter()
                .map(|defense| DefenseCooldownSnapshot {
                    defense: defense.id,
                    ready: defense.is_ready(now),
                })
                .collect(),
        )
    }

    /// Captures a read-only view of the projectiles in flight.
    #[must_use]
    pub fn projectile_view(world: &World) -> ProjectileView {
        ProjectileView::from_snapshots(world.projectiles.snapshots())
    }

    /// Defense occupying the provided cell, if any.
    #[must_use]
    pub fn defense_at(world: &World, cell: CellCoord) -> Option<DefenseId> {
        world.grid.cell(cell).and_then(|cell| cell.occupant())
    }

    /// Coins currently held by the player.
    #[must_use]
    pub fn coins(world: &World) -> u32 {
        world.economy.coins()
    }

    /// Lives left before the game is lost.
    #[must_use]
    pub fn lives(world: &World) -> u32 {
        world.economy.lives()
    }

    /// Number of the most recently started wave; zero before the first.
    #[must_use]
    pub fn wave(world: &World) -> u32 {
        world.wave
    }

    /// Speed assigned to the next spawned enemy.
    #[must_use]
    pub fn enemy_speed(world: &World) -> f32 {
        world.enemy_speed
    }

    /// Number of enemies currently on the path.
    #[must_use]
    pub fn enemy_count(world: &World) -> usize {
        world.enemies.len()
    }

    /// Lifecycle state of the simulation.
    #[must_use]
    pub fn status(world: &World) -> GameStatus {
        world.status
    }

    /// Simulated time accumulated from ticks.
    #[must_use]
    pub fn clock(world: &World) -> Duration {
        world.clock
    }
}
