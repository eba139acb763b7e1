use crate::error::FlightError;
use crate::types::{Cell, Position};

/// Neighbor offsets in enumeration order: S, N, E, ES, EN, W, WS, WN.
/// Detour selection depends on this order.
const NEIGHBOR_OFFSETS: [(i32, i32); 8] = [
    (0, 1),
    (0, -1),
    (1, 0),
    (1, 1),
    (1, -1),
    (-1, 0),
    (-1, 1),
    (-1, -1),
];

/// Rectangular grid of cells, stored row-major.
#[derive(Debug, Clone, Default)]
pub struct Grid {
    width: usize,
    height: usize,
    cells: Vec<Cell>,
}

impl Grid {
    /// Build a grid from rows of static values. Every row must have the
    /// same length; an empty matrix yields an empty grid.
    pub fn build(matrix: &[Vec<i32>]) -> Result<Self, FlightError> {
        let height = matrix.len();
        let width = matrix.first().map_or(0, Vec::len);
        let mut cells = Vec::with_capacity(width * height);

        for (y, row) in matrix.iter().enumerate() {
            if row.len() != width {
                return Err(FlightError::RaggedMatrix {
                    row: y,
                    expected: width,
                    actual: row.len(),
                });
            }
            for (x, &value) in row.iter().enumerate() {
                cells.push(Cell::new(x as i32, y as i32, value));
            }
        }

        if width == 0 {
            return Ok(Self::default());
        }

        Ok(Self {
            width,
            height,
            cells,
        })
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn in_bounds(&self, x: i32, y: i32) -> bool {
        x >= 0 && y >= 0 && (x as usize) < self.width && (y as usize) < self.height
    }

    fn index(&self, x: i32, y: i32) -> Option<usize> {
        if self.in_bounds(x, y) {
            Some(y as usize * self.width + x as usize)
        } else {
            None
        }
    }

    pub fn cell(&self, x: i32, y: i32) -> Option<&Cell> {
        self.index(x, y).map(|index| &self.cells[index])
    }

    fn cell_mut(&mut self, x: i32, y: i32) -> Option<&mut Cell> {
        let index = self.index(x, y)?;
        Some(&mut self.cells[index])
    }

    /// Snapshot of the cell at `(x, y)`, carrying its static value.
    pub fn position(&self, x: i32, y: i32) -> Option<Position> {
        self.cell(x, y).map(Cell::position)
    }

    pub fn cells(&self) -> impl Iterator<Item = &Cell> {
        self.cells.iter()
    }

    /// Static values in row-major order.
    pub fn values(&self) -> Vec<i32> {
        self.cells.iter().map(Cell::value).collect()
    }

    pub fn is_occupied(&self, x: i32, y: i32) -> bool {
        self.cell(x, y).map_or(false, Cell::is_occupied)
    }

    /// In-bounds neighbors of `position`, in the fixed enumeration order.
    pub fn neighbors(&self, position: &Position) -> Vec<Position> {
        NEIGHBOR_OFFSETS
            .iter()
            .filter_map(|&(dx, dy)| self.position(position.x + dx, position.y + dy))
            .collect()
    }

    /// Returns false when the coordinate is outside the grid.
    pub fn set_occupied(&mut self, x: i32, y: i32, occupied: bool) -> bool {
        match self.cell_mut(x, y) {
            Some(cell) => {
                cell.set_occupied(occupied);
                true
            }
            None => false,
        }
    }

    /// With `reset_all`, every cell's decay becomes `amount`. Otherwise
    /// occupied cells drop to zero and the rest age by `amount`.
    pub fn apply_decay(&mut self, amount: u32, reset_all: bool) {
        for cell in &mut self.cells {
            if reset_all {
                cell.set_decay(amount);
            } else if cell.is_occupied() {
                cell.set_decay(0);
            } else {
                cell.age(amount);
            }
        }
    }

    pub fn clear_occupancy(&mut self) {
        for cell in &mut self.cells {
            cell.set_occupied(false);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn uniform(width: usize, height: usize, value: i32) -> Grid {
        Grid::build(&vec![vec![value; width]; height]).expect("rectangular matrix")
    }

    #[test]
    fn builds_row_major_cells() {
        let grid = Grid::build(&[vec![1, 2, 3], vec![4, 5, 6]]).expect("grid");
        assert_eq!(grid.width(), 3);
        assert_eq!(grid.height(), 2);
        assert_eq!(grid.len(), 6);
        assert_eq!(grid.cell(2, 1).map(Cell::value), Some(6));
        assert_eq!(grid.position(1, 0).map(|p| p.value), Some(2));
        assert_eq!(grid.values(), vec![1, 2, 3, 4, 5, 6]);
    }

    #[test]
    fn rejects_ragged_rows() {
        let result = Grid::build(&[vec![1, 2], vec![3]]);
        assert_eq!(
            result.unwrap_err(),
            FlightError::RaggedMatrix {
                row: 1,
                expected: 2,
                actual: 1
            }
        );
    }

    #[test]
    fn empty_matrix_gives_empty_grid() {
        assert!(Grid::build(&[]).expect("grid").is_empty());
        assert!(Grid::build(&[vec![]]).expect("grid").is_empty());
    }

    #[test]
    fn bounds_are_not_clamped() {
        let grid = uniform(3, 2, 1);
        assert!(grid.in_bounds(0, 0));
        assert!(grid.in_bounds(2, 1));
        assert!(!grid.in_bounds(3, 0));
        assert!(!grid.in_bounds(0, 2));
        assert!(!grid.in_bounds(-1, 0));
        assert!(grid.cell(3, 0).is_none());
    }

    #[test]
    fn neighbors_follow_fixed_order() {
        let grid = uniform(3, 3, 1);
        let center = Position::at(1, 1);
        let coords: Vec<_> = grid.neighbors(&center).iter().map(Position::coords).collect();
        assert_eq!(
            coords,
            vec![
                (1, 2),
                (1, 0),
                (2, 1),
                (2, 2),
                (2, 0),
                (0, 1),
                (0, 2),
                (0, 0)
            ]
        );
    }

    #[test]
    fn corner_neighbors_skip_out_of_bounds() {
        let grid = uniform(3, 3, 1);
        let coords: Vec<_> = grid
            .neighbors(&Position::at(0, 0))
            .iter()
            .map(Position::coords)
            .collect();
        assert_eq!(coords, vec![(0, 1), (1, 0), (1, 1)]);
    }

    #[test]
    fn decay_ages_free_cells_only() {
        let mut grid = uniform(2, 1, 1);
        assert!(grid.set_occupied(0, 0, true));
        grid.apply_decay(1, false);
        grid.apply_decay(1, false);

        assert_eq!(grid.cell(0, 0).map(Cell::decay), Some(0));
        assert_eq!(grid.cell(1, 0).map(Cell::decay), Some(2));

        grid.apply_decay(0, true);
        assert!(grid.cells().all(|cell| cell.decay() == 0));
    }

    #[test]
    fn set_occupied_reports_out_of_bounds() {
        let mut grid = uniform(2, 2, 1);
        assert!(!grid.set_occupied(5, 5, true));
        assert!(!grid.is_occupied(5, 5));
    }

    proptest! {
        #[test]
        fn fresh_grid_has_no_decay_or_occupancy(
            width in 1usize..12,
            height in 1usize..12,
            seed in any::<i32>(),
        ) {
            let matrix: Vec<Vec<i32>> = (0..height)
                .map(|y| (0..width).map(|x| seed.wrapping_add((x * 31 + y) as i32)).collect())
                .collect();
            let grid = Grid::build(&matrix).expect("rectangular matrix");
            prop_assert_eq!(grid.len(), width * height);
            prop_assert!(grid.cells().all(|cell| cell.decay() == 0 && !cell.is_occupied()));
        }
    }
}
