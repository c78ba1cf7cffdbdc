#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure interaction system that turns clicks and dialog choices into defense commands.

use glam::Vec2;
use lane_defence_core::{CellCoord, Command, DefenseId, DefenseKind, Event, GridView};

/// What a click on the field currently refers to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Selection {
    /// A free buildable cell awaiting a defense kind.
    Build(CellCoord),
    /// An existing defense awaiting an upgrade or removal decision.
    Defense(DefenseId),
}

/// Resolves a click position into a selection.
///
/// Clicks on cell borders, on path cells or outside the field select nothing.
#[must_use]
pub fn select(point: Vec2, grid: &GridView<'_>) -> Option<Selection> {
    let cell = grid.cell_at(point)?;
    if let Some(defense) = cell.occupant() {
        return Some(Selection::Defense(defense));
    }
    if cell.is_path() {
        return None;
    }
    Some(Selection::Build(cell.coord()))
}

/// Player input gathered by an adapter for a single frame.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub enum BuilderInput {
    /// Nothing happened.
    #[default]
    Idle,
    /// The player clicked the field at the provided world position.
    Click(Vec2),
    /// The player chose a defense kind for the selected build cell.
    Place(DefenseKind),
    /// The player asked to upgrade the selected defense.
    Upgrade,
    /// The player asked to remove the selected defense.
    Remove,
    /// The player closed the open dialog.
    Dismiss,
}

/// Interaction system that tracks the open selection and emits commands.
///
/// A selection stays open until the world confirms the action it led to, so
/// a rejected placement or upgrade keeps the dialog available for another try.
#[derive(Debug, Default, Clone)]
pub struct Builder {
    selection: Option<Selection>,
    locked: bool,
}

impl Builder {
    /// Creates a new builder system with no selection.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            selection: None,
            locked: false,
        }
    }

    /// Selection currently awaiting a decision.
    #[must_use]
    pub const fn selection(&self) -> Option<Selection> {
        self.selection
    }

    /// Consumes world events and adapter input to emit defense commands.
    pub fn handle(
        &mut self,
        events: &[Event],
        grid: &GridView<'_>,
        input: BuilderInput,
        out: &mut Vec<Command>,
    ) {
        for event in events {
            self.observe(event);
        }

        if self.locked {
            return;
        }

        match input {
            BuilderInput::Idle => {}
            BuilderInput::Click(point) => self.selection = select(point, grid),
            BuilderInput::Dismiss => self.selection = None,
            BuilderInput::Place(kind) => {
                if let Some(Selection::Build(cell)) = self.selection {
                    out.push(Command::PlaceDefense { kind, cell });
                }
            }
            BuilderInput::Upgrade => {
                if let Some(Selection::Defense(defense)) = self.selection {
                    out.push(Command::UpgradeDefense { defense });
                }
            }
            BuilderInput::Remove => {
                if let Some(Selection::Defense(defense)) = self.selection {
                    out.push(Command::RemoveDefense { defense });
                }
            }
        }
    }

    fn observe(&mut self, event: &Event) {
        match (event, self.selection) {
            (Event::GameOver, _) => {
                self.locked = true;
                self.selection = None;
            }
            (Event::DefensePlaced { cell, .. }, Some(Selection::Build(selected)))
                if *cell == selected =>
            {
                self.selection = None;
            }
            (
                Event::DefenseUpgraded { defense, .. } | Event::DefenseRemoved { defense, .. },
                Some(Selection::Defense(selected)),
            ) if *defense == selected => {
                self.selection = None;
            }
            _ => {}
        }
    }
}
