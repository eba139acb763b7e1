use crate::constants::PATH_DISTANCE_CAP;
use crate::data::Grid;
use crate::types::Position;

/// Greedy king-move pathing with a per-request distance cap.
#[derive(Debug, Clone, Copy)]
pub struct Navigator {
    distance_cap: f64,
}

impl Default for Navigator {
    fn default() -> Self {
        Self::new(PATH_DISTANCE_CAP)
    }
}

impl Navigator {
    pub fn new(distance_cap: f64) -> Self {
        Self { distance_cap }
    }

    /// Steps from `start` toward `target`, excluding `start`.
    ///
    /// Targets further than the cap are replaced by the floored point `cap`
    /// units along the straight line; later requests continue from there.
    pub fn compute_path(&self, start: Position, target: Position, grid: &Grid) -> Vec<Position> {
        if grid.is_empty() || !grid.in_bounds(start.x, start.y) || !grid.in_bounds(target.x, target.y)
        {
            return Vec::new();
        }

        let goal = self.waypoint(&start, &target, grid);
        let mut path = Vec::new();
        let mut current = start;
        while current != goal {
            match next_step(grid, &current, &goal) {
                Some(next) if next != current => {
                    path.push(next);
                    current = next;
                }
                _ => break,
            }
        }
        path
    }

    fn waypoint(&self, start: &Position, target: &Position, grid: &Grid) -> Position {
        let distance = start.distance(target);
        if distance <= self.distance_cap {
            return *target;
        }
        let cap = self.distance_cap;
        let x = (f64::from(start.x) + f64::from(target.x - start.x) * cap / distance).floor() as i32;
        let y = (f64::from(start.y) + f64::from(target.y - start.y) * cap / distance).floor() as i32;
        match grid.position(x, y) {
            // Caps below one diagonal can floor back onto the start.
            Some(waypoint) if waypoint == *start => {
                next_step(grid, start, target).unwrap_or(*target)
            }
            Some(waypoint) => waypoint,
            None => *target,
        }
    }
}

fn clamp_axis(value: i32, len: usize) -> i32 {
    value.clamp(0, len.saturating_sub(1) as i32)
}

/// One king move from `current` toward `target`: diagonal while both axes
/// differ, otherwise along the remaining axis. Never leaves the grid.
pub fn next_step(grid: &Grid, current: &Position, target: &Position) -> Option<Position> {
    if current == target {
        return None;
    }
    let dx = (target.x - current.x).signum();
    let dy = (target.y - current.y).signum();
    let x = clamp_axis(current.x + dx, grid.width());
    let y = clamp_axis(current.y + dy, grid.height());
    grid.position(x, y)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn uniform(width: usize, height: usize) -> Grid {
        Grid::build(&vec![vec![1; width]; height]).expect("grid")
    }

    #[test]
    fn diagonal_first_then_straight() {
        let grid = uniform(6, 6);
        let path = Navigator::default().compute_path(Position::at(0, 0), Position::at(4, 2), &grid);
        let coords: Vec<_> = path.iter().map(Position::coords).collect();
        assert_eq!(coords, vec![(1, 1), (2, 2), (3, 2), (4, 2)]);
    }

    #[test]
    fn path_carries_cell_values() {
        let grid = Grid::build(&[vec![1, 2, 3]]).expect("grid");
        let path = Navigator::default().compute_path(Position::at(0, 0), Position::at(2, 0), &grid);
        let values: Vec<_> = path.iter().map(|p| p.value).collect();
        assert_eq!(values, vec![2, 3]);
    }

    #[test]
    fn start_equal_to_target_is_empty() {
        let grid = uniform(3, 3);
        let path = Navigator::default().compute_path(Position::at(1, 1), Position::at(1, 1), &grid);
        assert!(path.is_empty());
    }

    #[test]
    fn empty_grid_or_out_of_bounds_is_empty() {
        let navigator = Navigator::default();
        assert!(navigator
            .compute_path(Position::at(0, 0), Position::at(1, 1), &Grid::default())
            .is_empty());
        let grid = uniform(3, 3);
        assert!(navigator
            .compute_path(Position::at(0, 0), Position::at(3, 3), &grid)
            .is_empty());
        assert!(navigator
            .compute_path(Position::at(-1, 0), Position::at(1, 1), &grid)
            .is_empty());
    }

    #[test]
    fn long_legs_are_capped() {
        let grid = uniform(20, 20);
        let path = Navigator::default().compute_path(Position::at(0, 0), Position::at(10, 0), &grid);
        assert_eq!(path.len(), 6);
        assert_eq!(path.last(), Some(&Position::at(6, 0)));
    }

    #[test]
    fn capped_waypoint_floors_toward_origin() {
        let grid = uniform(20, 20);
        let path =
            Navigator::default().compute_path(Position::at(10, 10), Position::at(0, 0), &grid);
        // 10 - 6/sqrt(2) = 5.75.. floors to 5
        assert_eq!(path.last(), Some(&Position::at(5, 5)));
    }

    #[test]
    fn tiny_cap_still_makes_progress() {
        let grid = uniform(6, 6);
        let navigator = Navigator::new(1.2);
        assert_eq!(
            navigator.compute_path(Position::at(0, 0), Position::at(1, 1), &grid),
            vec![Position::at(1, 1)]
        );
        assert_eq!(
            navigator.compute_path(Position::at(5, 5), Position::at(0, 0), &grid),
            vec![Position::at(4, 4)]
        );
    }

    #[test]
    fn next_step_clamps_to_grid() {
        let grid = uniform(3, 3);
        let step = next_step(&grid, &Position::at(2, 1), &Position::at(0, 1));
        assert_eq!(step, Some(Position::at(1, 1)));
        assert_eq!(next_step(&grid, &Position::at(1, 1), &Position::at(1, 1)), None);
    }

    proptest! {
        #[test]
        fn proptest_short_paths_reach_target_in_chebyshev_steps(
            sx in 0i32..12, sy in 0i32..12, dx in -4i32..=4, dy in -4i32..=4,
        ) {
            let grid = uniform(12, 12);
            let start = Position::at(sx, sy);
            let target = Position::at((sx + dx).clamp(0, 11), (sy + dy).clamp(0, 11));

            let path = Navigator::default().compute_path(start, target, &grid);
            prop_assert_eq!(path.len() as u32, start.chebyshev(&target));

            let mut current = start;
            for step in &path {
                prop_assert_eq!(current.chebyshev(step), 1);
                current = *step;
            }
            prop_assert_eq!(current, target);
        }

        #[test]
        fn proptest_long_paths_stop_near_the_cap(
            sx in 0i32..30, sy in 0i32..30, tx in 0i32..30, ty in 0i32..30,
        ) {
            let grid = uniform(30, 30);
            let start = Position::at(sx, sy);
            let target = Position::at(tx, ty);
            prop_assume!(start.distance(&target) > PATH_DISTANCE_CAP);

            let path = Navigator::default().compute_path(start, target, &grid);
            let last = *path.last().expect("capped path is never empty");
            let travelled = start.distance(&last);
            prop_assert!((travelled - PATH_DISTANCE_CAP).abs() <= std::f64::consts::SQRT_2);
            prop_assert!(last.distance(&target) < start.distance(&target));
        }
    }
}
