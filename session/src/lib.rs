#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Single owned simulation context for Lane Defence.
//!
//! A [`Session`] owns the authoritative world together with every pure
//! system and advances them in a fixed order once per [`Session::step`]:
//! wave scheduling, enemy movement, defense fire control and projectile
//! homing. Player actions are applied immediately through the same command
//! surface the systems use and answer with typed rejections.

use std::{fmt, time::Duration};

use glam::Vec2;
use lane_defence_core::{
    CellCoord, Command, ConfigError, DefenseId, DefenseKind, DefenseTarget, DefenseView,
    EnemyView, Event, GameConfig, GameStatus, GridView, PlacementError, ProjectileView,
    RemovalError, UpgradeError,
};
use lane_defence_system_movement::Movement;
use lane_defence_system_projectiles::Projectiles;
use lane_defence_system_spawning::{Config as SpawningConfig, Spawning};
use lane_defence_system_tower_combat::TowerCombat;
use lane_defence_system_tower_targeting::TowerTargeting;
use lane_defence_world::{self as world, query, World};
use tracing::{debug, info};

/// Nominal duration of one simulated frame.
///
/// Enemy and projectile speeds are expressed per frame, so stepping with
/// other durations changes wave timing but not travel per step.
pub const FRAME: Duration = Duration::from_nanos(16_666_667);

/// Outcome of a single [`Session::step`] together with a consistent snapshot.
#[derive(Clone, Debug)]
pub struct FrameReport {
    /// One-based index of the completed step.
    pub frame: u64,
    /// Simulated time after the step.
    pub clock: Duration,
    /// Every event emitted since the previous report, in emission order.
    pub events: Vec<Event>,
    /// Enemies in spawn order.
    pub enemies: EnemyView,
    /// Defenses ordered by identifier.
    pub defenses: DefenseView,
    /// Projectiles in firing order.
    pub projectiles: ProjectileView,
    /// Coins held by the player.
    pub coins: u32,
    /// Lives left.
    pub lives: u32,
    /// Most recently started wave.
    pub wave: u32,
    /// Lifecycle state after the step.
    pub status: GameStatus,
}

impl FrameReport {
    /// Events that mark the course of the game rather than its internals.
    pub fn lifecycle(&self) -> impl Iterator<Item = &Event> {
        self.events.iter().filter(|event| {
            matches!(
                event,
                Event::WaveStarted { .. }
                    | Event::EnemyKilled { .. }
                    | Event::EnemyLeaked { .. }
                    | Event::GameOver
            )
        })
    }
}

type FrameHook = Box<dyn FnMut(&FrameReport)>;

/// Owns the world and the systems that drive it.
pub struct Session {
    world: World,
    spawning: Spawning,
    movement: Movement,
    targeting: TowerTargeting,
    combat: TowerCombat,
    projectiles: Projectiles,
    targets: Vec<DefenseTarget>,
    carried_events: Vec<Event>,
    hooks: Vec<FrameHook>,
    frame: u64,
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("world", &self.world)
            .field("spawning", &self.spawning)
            .field("frame", &self.frame)
            .field("hooks", &self.hooks.len())
            .finish_non_exhaustive()
    }
}

impl Session {
    /// Creates a session from validated game parameters.
    pub fn new(config: GameConfig) -> Result<Self, ConfigError> {
        let spawning = Spawning::new(SpawningConfig::from_game(&config));
        let world = World::new(config)?;
        Ok(Self {
            world,
            spawning,
            movement: Movement::new(),
            targeting: TowerTargeting::new(),
            combat: TowerCombat::new(),
            projectiles: Projectiles::new(),
            targets: Vec::new(),
            carried_events: Vec::new(),
            hooks: Vec::new(),
            frame: 0,
        })
    }

    /// Registers a hook invoked with the report of every completed step.
    pub fn on_frame<F>(&mut self, hook: F)
    where
        F: FnMut(&FrameReport) + 'static,
    {
        self.hooks.push(Box::new(hook));
    }

    /// Advances the simulation by one frame of `dt` simulated time.
    pub fn step(&mut self, dt: Duration) -> FrameReport {
        self.frame = self.frame.saturating_add(1);
        let mut frame_events = std::mem::take(&mut self.carried_events);

        let mut tick_events = Vec::new();
        world::apply(&mut self.world, Command::Tick { dt }, &mut tick_events);
        frame_events.extend(tick_events.iter().cloned());

        self.run_scheduler(&tick_events, &mut frame_events);
        self.run_movement(&tick_events, &mut frame_events);
        self.run_fire_control(&mut frame_events);
        self.run_projectiles(&tick_events, &mut frame_events);

        if frame_events.contains(&Event::GameOver) {
            self.spawning.handle(&[Event::GameOver], &mut Vec::new());
            info!(
                frame = self.frame,
                wave = query::wave(&self.world),
                "game over"
            );
        }

        let report = self.report(frame_events);
        for hook in &mut self.hooks {
            hook(&report);
        }
        report
    }

    /// Places a defense of `kind` on `cell`.
    pub fn place_defense(
        &mut self,
        kind: DefenseKind,
        cell: CellCoord,
    ) -> Result<DefenseId, PlacementError> {
        let events = self.perform(Command::PlaceDefense { kind, cell });
        events
            .iter()
            .find_map(|event| match event {
                Event::DefensePlaced { defense, .. } => Some(Ok(*defense)),
                Event::DefensePlacementRejected { reason, .. } => Some(Err(*reason)),
                _ => None,
            })
            .unwrap_or(Err(PlacementError::GameOver))
    }

    /// Upgrades an existing defense by one level.
    pub fn upgrade_defense(&mut self, defense: DefenseId) -> Result<(), UpgradeError> {
        let events = self.perform(Command::UpgradeDefense { defense });
        events
            .iter()
            .find_map(|event| match event {
                Event::DefenseUpgraded { .. } => Some(Ok(())),
                Event::DefenseUpgradeRejected { reason, .. } => Some(Err(*reason)),
                _ => None,
            })
            .unwrap_or(Err(UpgradeError::GameOver))
    }

    /// Removes an existing defense and frees its cell. Nothing is refunded.
    pub fn remove_defense(&mut self, defense: DefenseId) -> Result<(), RemovalError> {
        let events = self.perform(Command::RemoveDefense { defense });
        events
            .iter()
            .find_map(|event| match event {
                Event::DefenseRemoved { .. } => Some(Ok(())),
                Event::DefenseRemovalRejected { reason, .. } => Some(Err(*reason)),
                _ => None,
            })
            .unwrap_or(Err(RemovalError::GameOver))
    }

    /// Applies a player command produced by an interaction system.
    ///
    /// Only placement, upgrade and removal requests are accepted; simulation
    /// commands are reserved for the systems and are dropped. The resulting
    /// events are returned and also carried into the next frame report.
    pub fn perform(&mut self, command: Command) -> Vec<Event> {
        let is_player_action = matches!(
            command,
            Command::PlaceDefense { .. }
                | Command::UpgradeDefense { .. }
                | Command::RemoveDefense { .. }
        );
        if !is_player_action {
            debug!(?command, "ignoring simulation command from player surface");
            return Vec::new();
        }

        let mut events = Vec::new();
        world::apply(&mut self.world, command, &mut events);
        self.carried_events.extend(events.iter().cloned());
        events
    }

    /// Read-only access to the authoritative world.
    #[must_use]
    pub fn world(&self) -> &World {
        &self.world
    }

    /// Number of completed steps.
    #[must_use]
    pub fn frame(&self) -> u64 {
        self.frame
    }

    /// Simulated time accumulated so far.
    #[must_use]
    pub fn clock(&self) -> Duration {
        query::clock(&self.world)
    }

    /// Cell lattice with path flags and occupancy.
    #[must_use]
    pub fn grid(&self) -> GridView<'_> {
        query::grid_view(&self.world)
    }

    /// Dense route followed by the enemies.
    #[must_use]
    pub fn path(&self) -> &[Vec2] {
        query::path(&self.world)
    }

    /// Enemies in spawn order.
    #[must_use]
    pub fn enemies(&self) -> EnemyView {
        query::enemy_view(&self.world)
    }

    /// Defenses ordered by identifier.
    #[must_use]
    pub fn defenses(&self) -> DefenseView {
        query::defense_view(&self.world)
    }

    /// Projectiles in firing order.
    #[must_use]
    pub fn projectiles(&self) -> ProjectileView {
        query::projectile_view(&self.world)
    }

    /// Coins held by the player.
    #[must_use]
    pub fn coins(&self) -> u32 {
        query::coins(&self.world)
    }

    /// Lives left.
    #[must_use]
    pub fn lives(&self) -> u32 {
        query::lives(&self.world)
    }

    /// Most recently started wave.
    #[must_use]
    pub fn wave(&self) -> u32 {
        query::wave(&self.world)
    }

    /// Lifecycle state of the game.
    #[must_use]
    pub fn status(&self) -> GameStatus {
        query::status(&self.world)
    }

    /// Spawns queued by the wave scheduler that are not yet due.
    #[must_use]
    pub fn pending_spawns(&self) -> usize {
        self.spawning.pending_spawns()
    }

    fn run_scheduler(&mut self, tick_events: &[Event], frame_events: &mut Vec<Event>) {
        let mut events = tick_events.to_vec();
        loop {
            if events.is_empty() {
                break;
            }

            let mut commands = Vec::new();
            self.spawning.handle(&events, &mut commands);
            if commands.is_empty() {
                break;
            }

            events.clear();
            for command in commands {
                world::apply(&mut self.world, command, &mut events);
            }
            frame_events.extend(events.iter().cloned());
        }
    }

    fn run_movement(&mut self, tick_events: &[Event], frame_events: &mut Vec<Event>) {
        let mut commands = Vec::new();
        self.movement.handle(
            tick_events,
            &query::enemy_view(&self.world),
            query::path(&self.world),
            &mut commands,
        );
        self.apply_all(commands, frame_events);
    }

    fn run_fire_control(&mut self, frame_events: &mut Vec<Event>) {
        self.targeting.handle(
            &query::defense_view(&self.world),
            &query::enemy_view(&self.world),
            &mut self.targets,
        );

        let mut commands = Vec::new();
        self.combat.handle(
            query::defense_cooldowns(&self.world),
            &self.targets,
            &mut commands,
        );
        self.apply_all(commands, frame_events);
    }

    fn run_projectiles(&mut self, tick_events: &[Event], frame_events: &mut Vec<Event>) {
        let mut commands = Vec::new();
        self.projectiles.handle(
            tick_events,
            &query::projectile_view(&self.world),
            &query::enemy_view(&self.world),
            &mut commands,
        );
        self.apply_all(commands, frame_events);
    }

    fn apply_all(&mut self, commands: Vec<Command>, frame_events: &mut Vec<Event>) {
        for command in commands {
            world::apply(&mut self.world, command, frame_events);
        }
    }

    fn report(&self, events: Vec<Event>) -> FrameReport {
        FrameReport {
            frame: self.frame,
            clock: query::clock(&self.world),
            events,
            enemies: query::enemy_view(&self.world),
            defenses: query::defense_view(&self.world),
            projectiles: query::projectile_view(&self.world),
            coins: query::coins(&self.world),
            lives: query::lives(&self.world),
            wave: query::wave(&self.world),
            status: query::status(&self.world),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::{cell::RefCell, rc::Rc};

    #[test]
    fn hooks_run_once_per_step() {
        let mut session = Session::new(GameConfig::default()).expect("config");
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);
        session.on_frame(move |report| sink.borrow_mut().push(report.frame));

        for _ in 0..3 {
            let _ = session.step(FRAME);
        }

        assert_eq!(*seen.borrow(), vec![1, 2, 3]);
    }

    #[test]
    fn actions_surface_in_next_report() {
        let mut session = Session::new(GameConfig::default()).expect("config");
        let defense = session
            .place_defense(DefenseKind::Basic, CellCoord::new(0, 0))
            .expect("free grass cell");

        let report = session.step(FRAME);
        assert_eq!(
            report.events.first(),
            Some(&Event::DefensePlaced {
                defense,
                kind: DefenseKind::Basic,
                cell: CellCoord::new(0, 0),
            })
        );
        assert_eq!(report.coins, 80);

        let report = session.step(FRAME);
        assert!(!report
            .events
            .iter()
            .any(|event| matches!(event, Event::DefensePlaced { .. })));
    }

    #[test]
    fn simulation_commands_are_refused_on_player_surface() {
        let mut session = Session::new(GameConfig::default()).expect("config");
        assert!(session.perform(Command::StartWave).is_empty());
        assert!(session
            .perform(Command::SpawnEnemy { wave: 9 })
            .is_empty());
        assert_eq!(session.wave(), 0);
        assert!(session.enemies().is_empty());
    }

    #[test]
    fn typed_rejections_are_returned() {
        let mut session = Session::new(GameConfig::default()).expect("config");
        assert_eq!(
            session.place_defense(DefenseKind::Basic, CellCoord::new(0, 4)),
            Err(PlacementError::PathCell)
        );
        assert_eq!(
            session.upgrade_defense(DefenseId::new(7)),
            Err(UpgradeError::MissingDefense)
        );
        assert_eq!(
            session.remove_defense(DefenseId::new(7)),
            Err(RemovalError::MissingDefense)
        );
    }
}
