#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Lane Defence engine.
//!
//! This crate defines the message surface that connects adapters, the
//! authoritative world, and pure systems. Adapters and systems submit
//! [`Command`] values describing desired mutations, the world executes those
//! commands via its `apply` entry point, and then broadcasts [`Event`] values
//! for systems to react to deterministically. Systems consume event streams,
//! query immutable views, and respond exclusively with new command batches.

mod config;

use std::time::Duration;

use glam::Vec2;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use config::{ConfigError, GameConfig};

/// Canonical banner emitted when the experience boots.
pub const WELCOME_BANNER: &str = "Welcome to Lane Defence.";

/// Damage added to a defense by each upgrade.
pub const UPGRADE_DAMAGE_STEP: i32 = 1;

/// Range added to a defense by each upgrade, in world units.
pub const UPGRADE_RANGE_STEP: f32 = 10.0;

/// Cooldown removed from a defense by each upgrade.
pub const UPGRADE_RATE_STEP: Duration = Duration::from_millis(100);

/// Amount the upgrade price grows after every purchased upgrade.
pub const UPGRADE_COST_STEP: u32 = 10;

/// Lifecycle state of the simulation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GameStatus {
    /// Waves are running and the player may act.
    Running,
    /// Lives ran out. Terminal: the world rejects every further mutation.
    Lost,
}

/// Commands that express all permissible world mutations.
#[derive(Clone, Debug, PartialEq)]
pub enum Command {
    /// Advances the simulation clock by the provided delta time.
    Tick {
        /// Duration of simulated time that elapsed since the previous tick.
        dt: Duration,
    },
    /// Starts the next wave, raising the wave counter and the global enemy speed.
    StartWave,
    /// Requests that an enemy belonging to the provided wave enters the path.
    SpawnEnemy {
        /// Wave that scheduled the spawn; scales the enemy's health.
        wave: u32,
    },
    /// Moves an enemy to a new position along the path.
    MoveEnemy {
        /// Identifier of the enemy being moved.
        enemy: EnemyId,
        /// Position the enemy occupies after the move.
        position: Vec2,
        /// Index of the last path point the enemy has reached.
        path_index: usize,
    },
    /// Reports that an enemy ran out of path and leaks through the exit.
    LeakEnemy {
        /// Identifier of the leaking enemy.
        enemy: EnemyId,
    },
    /// Requests that a defense fires a projectile at the provided enemy.
    FireProjectile {
        /// Defense emitting the projectile.
        defense: DefenseId,
        /// Enemy the projectile homes in on.
        target: EnemyId,
    },
    /// Moves a projectile toward its target.
    MoveProjectile {
        /// Identifier of the projectile being moved.
        projectile: ProjectileId,
        /// Position the projectile occupies after the move.
        position: Vec2,
    },
    /// Resolves a projectile that reached its target.
    ImpactProjectile {
        /// Identifier of the projectile striking its target.
        projectile: ProjectileId,
    },
    /// Discards a projectile whose target no longer exists.
    DiscardProjectile {
        /// Identifier of the orphaned projectile.
        projectile: ProjectileId,
    },
    /// Requests placement of a defense on the provided cell.
    PlaceDefense {
        /// Type of defense to construct.
        kind: DefenseKind,
        /// Cell that should host the defense.
        cell: CellCoord,
    },
    /// Requests an upgrade of an existing defense.
    UpgradeDefense {
        /// Identifier of the defense targeted for the upgrade.
        defense: DefenseId,
    },
    /// Requests removal of an existing defense.
    RemoveDefense {
        /// Identifier of the defense targeted for removal.
        defense: DefenseId,
    },
}

/// Events broadcast by the world after processing commands.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Event {
    /// Indicates that the simulation clock advanced.
    TimeAdvanced {
        /// Duration of simulated time that elapsed in the tick.
        dt: Duration,
    },
    /// Announces that a new wave started.
    WaveStarted {
        /// One-based number of the wave that started.
        wave: u32,
    },
    /// Confirms that an enemy entered the path.
    EnemySpawned {
        /// Identifier assigned to the new enemy.
        enemy: EnemyId,
        /// Wave the enemy belongs to.
        wave: u32,
        /// Health the enemy spawned with.
        health: i32,
    },
    /// Reports that an enemy reached the end of the path.
    EnemyLeaked {
        /// Identifier of the enemy that leaked.
        enemy: EnemyId,
        /// Lives left after the leak was deducted.
        lives_remaining: u32,
    },
    /// Reports that a projectile damaged an enemy without killing it.
    EnemyDamaged {
        /// Identifier of the enemy that was hit.
        enemy: EnemyId,
        /// Health left after the hit.
        remaining_health: i32,
    },
    /// Reports that an enemy was destroyed by a projectile.
    EnemyKilled {
        /// Identifier of the enemy that was destroyed.
        enemy: EnemyId,
        /// Coins credited for the kill.
        reward: u32,
    },
    /// Confirms that a defense fired a projectile.
    ProjectileFired {
        /// Identifier assigned to the projectile.
        projectile: ProjectileId,
        /// Defense that fired the projectile.
        defense: DefenseId,
        /// Enemy targeted by the projectile.
        target: EnemyId,
    },
    /// Reports that a projectile was removed because its target vanished.
    ProjectileMissed {
        /// Identifier of the projectile that missed.
        projectile: ProjectileId,
        /// Enemy the projectile was homing in on.
        target: EnemyId,
    },
    /// Confirms that a defense was placed into the world.
    DefensePlaced {
        /// Identifier assigned to the defense by the world.
        defense: DefenseId,
        /// Type of defense that was placed.
        kind: DefenseKind,
        /// Cell claimed by the defense.
        cell: CellCoord,
    },
    /// Confirms that a defense was upgraded.
    DefenseUpgraded {
        /// Identifier of the upgraded defense.
        defense: DefenseId,
        /// Level reached after the upgrade.
        level: u32,
    },
    /// Confirms that a defense was removed from the world.
    DefenseRemoved {
        /// Identifier of the defense that was removed.
        defense: DefenseId,
        /// Cell released by the removal.
        cell: CellCoord,
    },
    /// Reports that a defense placement request was rejected.
    DefensePlacementRejected {
        /// Type of defense requested for placement.
        kind: DefenseKind,
        /// Cell provided in the placement request.
        cell: CellCoord,
        /// Specific reason the placement failed.
        reason: PlacementError,
    },
    /// Reports that a defense upgrade request was rejected.
    DefenseUpgradeRejected {
        /// Identifier of the defense targeted for the upgrade.
        defense: DefenseId,
        /// Specific reason the upgrade failed.
        reason: UpgradeError,
    },
    /// Reports that a defense removal request was rejected.
    DefenseRemovalRejected {
        /// Identifier of the defense targeted for removal.
        defense: DefenseId,
        /// Specific reason the removal failed.
        reason: RemovalError,
    },
    /// Announces that the last life was lost. No further events follow.
    GameOver,
}

slotmap::new_key_type! {
    /// Generation-checked handle to an enemy.
    ///
    /// Handles outlive the enemy they refer to; resolving a stale handle
    /// yields nothing rather than a recycled slot.
    pub struct EnemyId;
}

/// Unique identifier assigned to a defense.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct DefenseId(u32);

impl DefenseId {
    /// Creates a new defense identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the defense identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Unique identifier assigned to a projectile.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ProjectileId(u32);

impl ProjectileId {
    /// Creates a new projectile identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the projectile identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Location of a single grid cell expressed as column and row coordinates.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CellCoord {
    column: u32,
    row: u32,
}

impl CellCoord {
    /// Creates a new grid cell coordinate.
    #[must_use]
    pub const fn new(column: u32, row: u32) -> Self {
        Self { column, row }
    }

    /// Zero-based column index of the cell.
    #[must_use]
    pub const fn column(&self) -> u32 {
        self.column
    }

    /// Zero-based row index of the cell.
    #[must_use]
    pub const fn row(&self) -> u32 {
        self.row
    }
}

/// Square of the playing field that is either path terrain or buildable.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Cell {
    coord: CellCoord,
    origin: Vec2,
    is_path: bool,
    occupant: Option<DefenseId>,
}

impl Cell {
    /// Creates a new unoccupied cell anchored at the provided top-left corner.
    #[must_use]
    pub const fn new(coord: CellCoord, origin: Vec2, is_path: bool) -> Self {
        Self {
            coord,
            origin,
            is_path,
            occupant: None,
        }
    }

    /// Lattice coordinate of the cell.
    #[must_use]
    pub const fn coord(&self) -> CellCoord {
        self.coord
    }

    /// Top-left corner of the cell in world units.
    #[must_use]
    pub const fn origin(&self) -> Vec2 {
        self.origin
    }

    /// Centre of the cell in world units for the provided cell size.
    #[must_use]
    pub fn center(&self, cell_size: f32) -> Vec2 {
        self.origin + Vec2::splat(cell_size / 2.0)
    }

    /// Reports whether enemies travel across this cell.
    #[must_use]
    pub const fn is_path(&self) -> bool {
        self.is_path
    }

    /// Defense standing on the cell, if any.
    #[must_use]
    pub const fn occupant(&self) -> Option<DefenseId> {
        self.occupant
    }

    /// Reports whether a defense claims the cell.
    #[must_use]
    pub const fn is_occupied(&self) -> bool {
        self.occupant.is_some()
    }

    /// Reports whether a defense could be placed on the cell.
    #[must_use]
    pub const fn is_buildable(&self) -> bool {
        !self.is_path && self.occupant.is_none()
    }

    /// Assigns or clears the defense standing on the cell.
    pub fn set_occupant(&mut self, occupant: Option<DefenseId>) {
        self.occupant = occupant;
    }
}

/// Read-only view into the cell lattice.
#[derive(Clone, Copy, Debug)]
pub struct GridView<'a> {
    cells: &'a [Cell],
    columns: u32,
    rows: u32,
    cell_size: f32,
}

impl<'a> GridView<'a> {
    /// Captures a new grid view backed by the provided row-major cell slice.
    #[must_use]
    pub fn new(cells: &'a [Cell], columns: u32, rows: u32, cell_size: f32) -> Self {
        Self {
            cells,
            columns,
            rows,
            cell_size,
        }
    }

    /// Returns the cell stored at the provided lattice coordinate.
    #[must_use]
    pub fn cell(&self, coord: CellCoord) -> Option<&'a Cell> {
        self.index(coord).and_then(|index| self.cells.get(index))
    }

    /// Returns the cell strictly containing the provided point.
    ///
    /// Points lying exactly on a cell edge belong to no cell.
    #[must_use]
    pub fn cell_at(&self, point: Vec2) -> Option<&'a Cell> {
        let size = self.cell_size;
        self.cells.iter().find(|cell| {
            let origin = cell.origin();
            point.x > origin.x
                && point.x < origin.x + size
                && point.y > origin.y
                && point.y < origin.y + size
        })
    }

    /// Returns the cell whose centre coincides with the provided point.
    #[must_use]
    pub fn cell_by_center(&self, point: Vec2) -> Option<&'a Cell> {
        let tolerance = self.cell_size * 1.0e-3;
        self.cells
            .iter()
            .find(|cell| cell.center(self.cell_size).distance(point) <= tolerance)
    }

    /// Returns an iterator over all cells in row-major order.
    pub fn iter(&self) -> impl Iterator<Item = &'a Cell> + 'a {
        self.cells.iter()
    }

    /// Provides the dimensions of the lattice.
    #[must_use]
    pub const fn dimensions(&self) -> (u32, u32) {
        (self.columns, self.rows)
    }

    /// Side length of a single cell in world units.
    #[must_use]
    pub const fn cell_size(&self) -> f32 {
        self.cell_size
    }

    fn index(&self, coord: CellCoord) -> Option<usize> {
        if coord.column() < self.columns && coord.row() < self.rows {
            let row = usize::try_from(coord.row()).ok()?;
            let column = usize::try_from(coord.column()).ok()?;
            let width = usize::try_from(self.columns).ok()?;
            Some(row * width + column)
        } else {
            None
        }
    }
}

/// Types of defenses that can be constructed on buildable cells.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DefenseKind {
    /// Balanced defense with a one second cooldown.
    Basic,
    /// Rapid-fire defense with weak shots.
    Fast,
    /// Slow defense with heavy shots.
    Strong,
}

impl DefenseKind {
    /// Every kind in menu order.
    pub const ALL: [Self; 3] = [Self::Basic, Self::Fast, Self::Strong];

    /// Coins required to place the defense.
    #[must_use]
    pub const fn cost(self) -> u32 {
        match self {
            Self::Basic => 20,
            Self::Fast => 30,
            Self::Strong => 50,
        }
    }

    /// Targeting radius of a freshly placed defense, in world units.
    #[must_use]
    pub const fn base_range(self) -> f32 {
        100.0
    }

    /// Damage dealt by each projectile of a freshly placed defense.
    #[must_use]
    pub const fn base_damage(self) -> i32 {
        match self {
            Self::Basic | Self::Fast => 1,
            Self::Strong => 3,
        }
    }

    /// Cooldown between volleys of a freshly placed defense.
    #[must_use]
    pub const fn base_rate(self) -> Duration {
        match self {
            Self::Basic => Duration::from_millis(1_000),
            Self::Fast => Duration::from_millis(500),
            Self::Strong => Duration::from_millis(1_500),
        }
    }

    /// Price of the first upgrade.
    #[must_use]
    pub const fn base_upgrade_cost(self) -> u32 {
        self.cost()
    }

    /// Lower-case label used by adapters.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Basic => "basic",
            Self::Fast => "fast",
            Self::Strong => "strong",
        }
    }
}

/// Reasons a defense placement request may be rejected by the world.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, Error)]
pub enum PlacementError {
    /// The game is over, so placement is disabled.
    #[error("the game is over")]
    GameOver,
    /// The requested cell lies outside the grid.
    #[error("cell lies outside the grid")]
    OutOfBounds,
    /// The requested cell is part of the enemy path.
    #[error("cell is part of the enemy path")]
    PathCell,
    /// The requested cell already hosts a defense.
    #[error("cell is already occupied")]
    Occupied,
    /// The player cannot afford the defense.
    #[error("not enough coins: need {cost}, have {available}")]
    InsufficientFunds {
        /// Price of the requested defense.
        cost: u32,
        /// Coins available when the request was processed.
        available: u32,
    },
}

impl PlacementError {
    /// Reports whether the rejection stems from the cell rather than the purse.
    #[must_use]
    pub const fn is_cell_unavailable(&self) -> bool {
        matches!(self, Self::OutOfBounds | Self::PathCell | Self::Occupied)
    }
}

/// Reasons a defense upgrade request may be rejected by the world.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, Error)]
pub enum UpgradeError {
    /// The game is over, so upgrades are disabled.
    #[error("the game is over")]
    GameOver,
    /// No defense with the provided identifier exists.
    #[error("no such defense")]
    MissingDefense,
    /// The defense already reached the maximum level.
    #[error("defense is already at level {level}")]
    MaxLevelReached {
        /// Level of the defense when the request was processed.
        level: u32,
    },
    /// The player cannot afford the upgrade.
    #[error("not enough coins: need {cost}, have {available}")]
    InsufficientFunds {
        /// Price of the requested upgrade.
        cost: u32,
        /// Coins available when the request was processed.
        available: u32,
    },
}

/// Reasons a defense removal request may be rejected by the world.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, Error)]
pub enum RemovalError {
    /// The game is over, so removal is disabled.
    #[error("the game is over")]
    GameOver,
    /// No defense with the provided identifier exists.
    #[error("no such defense")]
    MissingDefense,
}

/// Immutable representation of a single enemy's state used for queries.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EnemySnapshot {
    /// Handle assigned to the enemy.
    pub id: EnemyId,
    /// Current position in world units.
    pub position: Vec2,
    /// Index of the last path point reached; the enemy heads for the next one.
    pub path_index: usize,
    /// Distance travelled per frame.
    pub speed: f32,
    /// Remaining health.
    pub health: i32,
}

/// Read-only snapshot describing all enemies on the path.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct EnemyView {
    snapshots: Vec<EnemySnapshot>,
}

impl EnemyView {
    /// Creates a new enemy view from snapshots listed in spawn order.
    #[must_use]
    pub fn from_snapshots(snapshots: Vec<EnemySnapshot>) -> Self {
        Self { snapshots }
    }

    /// Iterator over the captured enemy snapshots in spawn order.
    pub fn iter(&self) -> impl Iterator<Item = &EnemySnapshot> {
        self.snapshots.iter()
    }

    /// Looks up the snapshot of a specific enemy.
    #[must_use]
    pub fn get(&self, enemy: EnemyId) -> Option<&EnemySnapshot> {
        self.snapshots.iter().find(|snapshot| snapshot.id == enemy)
    }

    /// Number of enemies captured by the view.
    #[must_use]
    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    /// Reports whether the view is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    /// Consumes the view, yielding the underlying snapshots.
    #[must_use]
    pub fn into_vec(self) -> Vec<EnemySnapshot> {
        self.snapshots
    }
}

/// Immutable representation of a single defense's state used for queries.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DefenseSnapshot {
    /// Identifier allocated to the defense by the world.
    pub id: DefenseId,
    /// Kind of defense that was constructed.
    pub kind: DefenseKind,
    /// Cell claimed by the defense.
    pub cell: CellCoord,
    /// Centre of the claimed cell in world units.
    pub center: Vec2,
    /// Current targeting radius.
    pub range: f32,
    /// Current damage per projectile.
    pub damage: i32,
    /// Current cooldown between volleys.
    pub rate: Duration,
    /// Simulation time of the last volley, if the defense ever fired.
    pub last_shot: Option<Duration>,
    /// Current upgrade level, starting at one.
    pub level: u32,
    /// Price of the next upgrade.
    pub upgrade_cost: u32,
}

/// Read-only snapshot describing all defenses placed on the grid.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct DefenseView {
    snapshots: Vec<DefenseSnapshot>,
}

impl DefenseView {
    /// Creates a new defense view from the provided snapshots.
    #[must_use]
    pub fn from_snapshots(mut snapshots: Vec<DefenseSnapshot>) -> Self {
        snapshots.sort_by_key(|snapshot| snapshot.id);
        Self { snapshots }
    }

    /// Iterator over the captured defense snapshots in deterministic order.
    pub fn iter(&self) -> impl Iterator<Item = &DefenseSnapshot> {
        self.snapshots.iter()
    }

    /// Looks up the snapshot of a specific defense.
    #[must_use]
    pub fn get(&self, defense: DefenseId) -> Option<&DefenseSnapshot> {
        self.snapshots
            .binary_search_by_key(&defense, |snapshot| snapshot.id)
            .ok()
            .map(|index| &self.snapshots[index])
    }

    /// Consumes the view, yielding the underlying snapshots.
    #[must_use]
    pub fn into_vec(self) -> Vec<DefenseSnapshot> {
        self.snapshots
    }
}

/// Fire readiness of a single defense at the current simulation time.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DefenseCooldownSnapshot {
    /// Defense the readiness refers to.
    pub defense: DefenseId,
    /// Indicates whether the cooldown elapsed and the defense may fire.
    pub ready: bool,
}

/// Read-only snapshot of defense cooldowns sorted by identifier.
#[derive(Clone, Debug, Default)]
pub struct DefenseCooldownView {
    snapshots: Vec<DefenseCooldownSnapshot>,
}

impl DefenseCooldownView {
    /// Creates a new cooldown view from the provided snapshots.
    #[must_use]
    pub fn from_snapshots(mut snapshots: Vec<DefenseCooldownSnapshot>) -> Self {
        snapshots.sort_by_key(|snapshot| snapshot.defense);
        Self { snapshots }
    }

    /// Iterator over the captured cooldown snapshots in deterministic order.
    pub fn iter(&self) -> impl Iterator<Item = &DefenseCooldownSnapshot> {
        self.snapshots.iter()
    }

    /// Consumes the view, yielding the underlying snapshots.
    #[must_use]
    pub fn into_vec(self) -> Vec<DefenseCooldownSnapshot> {
        self.snapshots
    }
}

/// Pairing of a defense with an enemy inside its range.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DefenseTarget {
    /// Defense that covers the enemy.
    pub defense: DefenseId,
    /// Enemy inside the defense's range.
    pub enemy: EnemyId,
    /// Centre of the defense in world units.
    pub defense_center: Vec2,
    /// Position of the enemy in world units.
    pub enemy_position: Vec2,
}

/// Immutable representation of a single projectile's state used for queries.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ProjectileSnapshot {
    /// Identifier allocated to the projectile by the world.
    pub id: ProjectileId,
    /// Current position in world units.
    pub position: Vec2,
    /// Enemy the projectile homes in on. May refer to a removed enemy.
    pub target: EnemyId,
    /// Distance travelled per frame.
    pub speed: f32,
    /// Damage applied on impact.
    pub damage: i32,
}

/// Read-only snapshot describing all projectiles in flight.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ProjectileView {
    snapshots: Vec<ProjectileSnapshot>,
}

impl ProjectileView {
    /// Creates a new projectile view from the provided snapshots.
    #[must_use]
    pub fn from_snapshots(mut snapshots: Vec<ProjectileSnapshot>) -> Self {
        snapshots.sort_by_key(|snapshot| snapshot.id);
        Self { snapshots }
    }

    /// Iterator over the captured projectile snapshots in firing order.
    pub fn iter(&self) -> impl Iterator<Item = &ProjectileSnapshot> {
        self.snapshots.iter()
    }

    /// Number of projectiles captured by the view.
    #[must_use]
    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    /// Reports whether the view is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    /// Consumes the view, yielding the underlying snapshots.
    #[must_use]
    pub fn into_vec(self) -> Vec<ProjectileSnapshot> {
        self.snapshots
    }
}
