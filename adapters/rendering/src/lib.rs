#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Shared rendering contracts for Lane Defence adapters.

use anyhow::Result as AnyResult;
use glam::Vec2;
use lane_defence_core::{
    CellCoord, DefenseId, DefenseKind, DefenseView, EnemyView, GameStatus, GridView,
    ProjectileView,
};
use std::{error::Error, fmt, time::Duration};

/// Side length of the square drawn for an enemy, anchored at its top-left corner.
pub const ENEMY_SIZE: f32 = 20.0;

/// Side length of the square drawn for a defense, centred on its cell.
pub const DEFENSE_SIZE: f32 = 20.0;

/// Radius of the dot drawn for a projectile.
pub const PROJECTILE_RADIUS: f32 = 3.0;

/// RGBA color used when presenting frames.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Color {
    /// Red channel intensity in the range 0.0..=1.0.
    pub red: f32,
    /// Green channel intensity in the range 0.0..=1.0.
    pub green: f32,
    /// Blue channel intensity in the range 0.0..=1.0.
    pub blue: f32,
    /// Alpha channel intensity in the range 0.0..=1.0.
    pub alpha: f32,
}

impl Color {
    /// Creates a new color from floating point channels.
    #[must_use]
    pub const fn new(red: f32, green: f32, blue: f32, alpha: f32) -> Self {
        Self {
            red,
            green,
            blue,
            alpha,
        }
    }

    /// Creates an opaque color from byte RGB values.
    #[must_use]
    pub const fn from_rgb_u8(red: u8, green: u8, blue: u8) -> Self {
        Self {
            red: red as f32 / 255.0,
            green: green as f32 / 255.0,
            blue: blue as f32 / 255.0,
            alpha: 1.0,
        }
    }

    /// Returns a new color lightened towards white by the provided amount.
    #[must_use]
    pub fn lighten(self, amount: f32) -> Self {
        let amount = amount.clamp(0.0, 1.0);

        Self {
            red: lighten_channel(self.red, amount),
            green: lighten_channel(self.green, amount),
            blue: lighten_channel(self.blue, amount),
            alpha: self.alpha,
        }
    }
}

fn lighten_channel(channel: f32, amount: f32) -> f32 {
    channel + (1.0 - channel) * amount
}

/// Colors of the classic Lane Defence look.
pub mod palette {
    use super::Color;
    use lane_defence_core::DefenseKind;

    /// Fill of cells on the enemy route (wheat).
    pub const PATH: Color = Color::from_rgb_u8(0xf5, 0xde, 0xb3);
    /// Fill of buildable cells (lime green).
    pub const GRASS: Color = Color::from_rgb_u8(0x32, 0xcd, 0x32);
    /// Outline of free cells.
    pub const CELL_BORDER: Color = Color::from_rgb_u8(0xd3, 0xd3, 0xd3);
    /// Outline of cells that host a defense.
    pub const OCCUPIED_BORDER: Color = Color::from_rgb_u8(0x80, 0x80, 0x80);
    /// Enemy squares.
    pub const ENEMY: Color = Color::from_rgb_u8(0xff, 0x00, 0x00);
    /// Projectile dots.
    pub const PROJECTILE: Color = Color::from_rgb_u8(0x00, 0x00, 0x00);
    /// Level labels drawn on defenses.
    pub const LABEL: Color = Color::from_rgb_u8(0xff, 0xff, 0xff);
    /// Background behind the field.
    pub const BACKGROUND: Color = Color::from_rgb_u8(0xff, 0xff, 0xff);

    /// Body color of a defense kind.
    #[must_use]
    pub const fn defense(kind: DefenseKind) -> Color {
        match kind {
            DefenseKind::Basic => Color::from_rgb_u8(0x00, 0x00, 0xff),
            DefenseKind::Fast => Color::from_rgb_u8(0xff, 0xa5, 0x00),
            DefenseKind::Strong => Color::from_rgb_u8(0x80, 0x00, 0x80),
        }
    }
}

/// Input snapshot gathered by adapters before updating the scene.
#[derive(Clone, Debug, PartialEq, Default)]
pub struct FrameInput {
    /// Position of a click on the field during this frame, in world units.
    pub click_world_space: Option<Vec2>,
    /// Defense kind chosen in the build dialog.
    pub place: Option<DefenseKind>,
    /// Indicates whether the upgrade button was pressed.
    pub upgrade: bool,
    /// Indicates whether the remove button was pressed.
    pub remove: bool,
    /// Indicates whether the open dialog was closed.
    pub dismiss: bool,
}

/// Single lattice cell as it should be drawn.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CellPresentation {
    /// Lattice coordinate of the cell.
    pub coord: CellCoord,
    /// Top-left corner in world units.
    pub origin: Vec2,
    /// Fill color.
    pub fill: Color,
    /// Outline color.
    pub border: Color,
}

/// Enemy square anchored at its top-left corner.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EnemyPresentation {
    /// Top-left corner in world units.
    pub position: Vec2,
    /// Side length of the square.
    pub size: f32,
    /// Fill color.
    pub color: Color,
}

/// Defense body with its level label.
#[derive(Clone, Debug, PartialEq)]
pub struct DefensePresentation {
    /// Identifier of the defense.
    pub id: DefenseId,
    /// Centre of the defense in world units.
    pub center: Vec2,
    /// Side length of the square.
    pub size: f32,
    /// Kind of the defense.
    pub kind: DefenseKind,
    /// Fill color.
    pub color: Color,
    /// Short label such as `L2`.
    pub label: String,
}

/// Projectile dot.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ProjectilePresentation {
    /// Centre of the dot in world units.
    pub position: Vec2,
    /// Radius of the dot.
    pub radius: f32,
    /// Fill color.
    pub color: Color,
}

/// Counters shown next to the field.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct HudPresentation {
    /// Coins held by the player.
    pub coins: u32,
    /// Lives left.
    pub lives: u32,
    /// Most recently started wave.
    pub wave: u32,
    /// Lifecycle state of the game.
    pub status: GameStatus,
}

/// Dialog opened by a click on the field.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DialogPresentation {
    /// Lists the defense kinds that can be built on a free cell.
    Build {
        /// Cell that would host the defense.
        cell: CellCoord,
        /// Button captions, one per kind, with prices.
        options: Vec<String>,
    },
    /// Describes an existing defense.
    Defense {
        /// Summary line with kind and level.
        info: String,
        /// Caption of the upgrade button including its price.
        upgrade: String,
    },
}

impl DialogPresentation {
    /// Describes the build dialog for `cell`.
    #[must_use]
    pub fn build(cell: CellCoord) -> Self {
        Self::Build {
            cell,
            options: DefenseKind::ALL
                .iter()
                .map(|kind| format!("{} ({} coins)", kind.label(), kind.cost()))
                .collect(),
        }
    }

    /// Describes the dialog of an existing defense, if it is still present.
    #[must_use]
    pub fn defense(defenses: &DefenseView, defense: DefenseId) -> Option<Self> {
        let snapshot = defenses.get(defense)?;
        Some(Self::Defense {
            info: format!(
                "Type: {}, Level: {}",
                snapshot.kind.label(),
                snapshot.level
            ),
            upgrade: format!("Upgrade ({} coins)", snapshot.upgrade_cost),
        })
    }
}

/// Scene description combining the field and its inhabitants.
#[derive(Clone, Debug, PartialEq)]
pub struct Scene {
    /// Side length of a cell in world units.
    pub cell_size: f32,
    /// Every lattice cell in row-major order.
    pub cells: Vec<CellPresentation>,
    /// Enemies in spawn order.
    pub enemies: Vec<EnemyPresentation>,
    /// Defenses ordered by identifier.
    pub defenses: Vec<DefensePresentation>,
    /// Projectiles in firing order.
    pub projectiles: Vec<ProjectilePresentation>,
    /// Counters shown next to the field.
    pub hud: HudPresentation,
    /// Dialog opened by the last click, if any.
    pub dialog: Option<DialogPresentation>,
}

impl Scene {
    /// Composes a scene from world snapshots.
    pub fn compose(
        grid: &GridView<'_>,
        enemies: &EnemyView,
        defenses: &DefenseView,
        projectiles: &ProjectileView,
        hud: HudPresentation,
    ) -> Result<Self, RenderingError> {
        let cell_size = grid.cell_size();
        if cell_size.is_nan() || cell_size <= 0.0 {
            return Err(RenderingError::InvalidCellSize { cell_size });
        }

        let cells = grid
            .iter()
            .map(|cell| CellPresentation {
                coord: cell.coord(),
                origin: cell.origin(),
                fill: if cell.is_path() {
                    palette::PATH
                } else {
                    palette::GRASS
                },
                border: if cell.is_occupied() {
                    palette::OCCUPIED_BORDER
                } else {
                    palette::CELL_BORDER
                },
            })
            .collect();

        Ok(Self {
            cell_size,
            cells,
            enemies: enemies
                .iter()
                .map(|enemy| EnemyPresentation {
                    position: enemy.position,
                    size: ENEMY_SIZE,
                    color: palette::ENEMY,
                })
                .collect(),
            defenses: defenses
                .iter()
                .map(|defense| DefensePresentation {
                    id: defense.id,
                    center: defense.center,
                    size: DEFENSE_SIZE,
                    kind: defense.kind,
                    color: palette::defense(defense.kind),
                    label: format!("L{}", defense.level),
                })
                .collect(),
            projectiles: projectiles
                .iter()
                .map(|projectile| ProjectilePresentation {
                    position: projectile.position,
                    radius: PROJECTILE_RADIUS,
                    color: palette::PROJECTILE,
                })
                .collect(),
            hud,
            dialog: None,
        })
    }

    /// Lightens the cell under an open build dialog.
    pub fn highlight(&mut self, coord: CellCoord) {
        for cell in &mut self.cells {
            if cell.coord == coord {
                cell.fill = cell.fill.lighten(0.35);
            }
        }
    }

    /// Width and height of the field covered by the cells.
    #[must_use]
    pub fn extent(&self) -> Vec2 {
        self.cells
            .iter()
            .fold(Vec2::ZERO, |extent, cell| {
                extent.max(cell.origin + Vec2::splat(self.cell_size))
            })
    }
}

/// Presentation descriptor consumed by rendering backends.
#[derive(Clone, Debug, PartialEq)]
pub struct Presentation {
    /// Title used by the created window.
    pub window_title: String,
    /// Solid color used to clear each frame.
    pub clear_color: Color,
    /// Scene content that should be displayed.
    pub scene: Scene,
}

impl Presentation {
    /// Constructs a new presentation descriptor.
    #[must_use]
    pub fn new<T>(window_title: T, clear_color: Color, scene: Scene) -> Self
    where
        T: Into<String>,
    {
        Self {
            window_title: window_title.into(),
            clear_color,
            scene,
        }
    }
}

/// Rendering backend capable of presenting Lane Defence scenes.
pub trait RenderingBackend {
    /// Runs the rendering backend until it is requested to exit.
    ///
    /// The provided `update_scene` closure receives the simulated frame delta
    /// and per-frame input captured by the adapter, and refreshes the scene
    /// before it is presented.
    fn run<F>(self, presentation: Presentation, update_scene: F) -> AnyResult<()>
    where
        F: FnMut(Duration, FrameInput, &mut Scene) + 'static;
}

/// Errors that can occur when constructing rendering descriptors.
#[derive(Debug, PartialEq)]
pub enum RenderingError {
    /// Cells must have a positive side length to be drawn.
    InvalidCellSize {
        /// Side length that failed validation.
        cell_size: f32,
    },
}

impl fmt::Display for RenderingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidCellSize { cell_size } => {
                write!(f, "cell size must be positive (received {cell_size})")
            }
        }
    }
}

impl Error for RenderingError {}
