//! Cell lattice covering the playing field.

use glam::Vec2;
use lane_defence_core::{Cell, CellCoord, DefenseId, GridView};

/// Row-major lattice of cells with path flags and defense occupancy.
#[derive(Clone, Debug)]
pub(crate) struct Grid {
    columns: u32,
    rows: u32,
    cell_size: f32,
    cells: Vec<Cell>,
}

impl Grid {
    /// Lays cells over the field and flags those the route passes through.
    ///
    /// A cell is path terrain when any route point lies within half a cell of
    /// its top-left corner on both axes.
    pub(crate) fn build(width: f32, height: f32, cell_size: f32, path: &[Vec2]) -> Self {
        let columns = lattice_len(width, cell_size);
        let rows = lattice_len(height, cell_size);
        let half = cell_size / 2.0;

        let capacity = usize::try_from(u64::from(columns) * u64::from(rows)).unwrap_or(0);
        let mut cells = Vec::with_capacity(capacity);
        for row in 0..rows {
            for column in 0..columns {
                let origin = Vec2::new(column as f32 * cell_size, row as f32 * cell_size);
                let is_path = path.iter().any(|point| {
                    (point.x - origin.x).abs() < half && (point.y - origin.y).abs() < half
                });
                cells.push(Cell::new(CellCoord::new(column, row), origin, is_path));
            }
        }

        Self {
            columns,
            rows,
            cell_size,
            cells,
        }
    }

    pub(crate) fn view(&self) -> GridView<'_> {
        GridView::new(&self.cells, self.columns, self.rows, self.cell_size)
    }

    pub(crate) fn cell(&self, coord: CellCoord) -> Option<&Cell> {
        self.index(coord).and_then(|index| self.cells.get(index))
    }

    pub(crate) fn cell_size(&self) -> f32 {
        self.cell_size
    }

    pub(crate) fn occupy(&mut self, coord: CellCoord, defense: DefenseId) {
        if let Some(cell) = self.cell_mut(coord) {
            cell.set_occupant(Some(defense));
        }
    }

    pub(crate) fn vacate(&mut self, coord: CellCoord) {
        if let Some(cell) = self.cell_mut(coord) {
            cell.set_occupant(None);
        }
    }

    fn cell_mut(&mut self, coord: CellCoord) -> Option<&mut Cell> {
        self.index(coord).and_then(|index| self.cells.get_mut(index))
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

fn lattice_len(extent: f32, cell_size: f32) -> u32 {
    if !(extent > 0.0 && cell_size > 0.0) {
        return 0;
    }
    (extent / cell_size).ceil() as u32
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::navigation::generate_path;

    fn default_route() -> Vec<Vec2> {
        generate_path(
            &[
                Vec2::new(0.0, 200.0),
                Vec2::new(150.0, 200.0),
                Vec2::new(150.0, 100.0),
                Vec2::new(450.0, 100.0),
                Vec2::new(450.0, 300.0),
                Vec2::new(600.0, 300.0),
            ],
            50.0,
        )
    }

    #[test]
    fn lattice_covers_field() {
        let grid = Grid::build(600.0, 400.0, 50.0, &[]);
        assert_eq!(grid.view().dimensions(), (12, 8));
        assert_eq!(grid.view().iter().count(), 96);
        assert!(grid.view().iter().all(|cell| !cell.is_path()));
    }

    #[test]
    fn partial_cells_cover_remaining_extent() {
        let grid = Grid::build(120.0, 50.0, 50.0, &[]);
        assert_eq!(grid.view().dimensions(), (3, 1));
    }

    #[test]
    fn route_cells_are_flagged_by_top_left_corner() {
        let grid = Grid::build(600.0, 400.0, 50.0, &default_route());

        for column in 0..=3 {
            let cell = grid.cell(CellCoord::new(column, 4)).expect("cell exists");
            assert!(cell.is_path(), "column {column} of row 4 lies on the route");
        }
        assert!(grid.cell(CellCoord::new(3, 3)).map_or(false, Cell::is_path));
        assert!(grid.cell(CellCoord::new(9, 6)).map_or(false, Cell::is_path));
        assert!(grid.cell(CellCoord::new(11, 6)).map_or(false, Cell::is_path));
        assert!(!grid.cell(CellCoord::new(0, 0)).map_or(true, Cell::is_path));
        assert!(!grid.cell(CellCoord::new(5, 5)).map_or(true, Cell::is_path));
    }

    #[test]
    fn occupancy_is_tracked_per_cell() {
        let mut grid = Grid::build(100.0, 100.0, 50.0, &[]);
        let coord = CellCoord::new(1, 1);

        grid.occupy(coord, DefenseId::new(3));
        assert_eq!(grid.cell(coord).and_then(Cell::occupant), Some(DefenseId::new(3)));

        grid.vacate(coord);
        assert_eq!(grid.cell(coord).and_then(Cell::occupant), None);
    }

    #[test]
    fn out_of_bounds_occupancy_is_ignored() {
        let mut grid = Grid::build(100.0, 100.0, 50.0, &[]);
        grid.occupy(CellCoord::new(5, 5), DefenseId::new(1));
        assert!(grid.view().iter().all(|cell| !cell.is_occupied()));
    }
}
