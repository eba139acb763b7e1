use std::collections::HashSet;

use crate::data::Grid;
use crate::types::{Cell, Position};

/// Cells worth claiming next, best first.
///
/// Candidates are ranked by `value + decay` (then `value`), but the result
/// keeps every candidate whose static `value` equals the static value of the
/// top-ranked cell. Aging therefore decides the winner's value class, while
/// raw value decides membership.
pub fn most_valuable_targets(grid: &Grid, excluded: &HashSet<Position>) -> Vec<Position> {
    let mut candidates: Vec<&Cell> = grid
        .cells()
        .filter(|cell| !excluded.contains(&cell.position()))
        .collect();
    if candidates.is_empty() {
        return Vec::new();
    }

    // Stable: equal keys keep row-major order.
    candidates.sort_by(|a, b| {
        b.effective_value()
            .cmp(&a.effective_value())
            .then_with(|| b.value().cmp(&a.value()))
    });

    let max_value = candidates[0].value();
    candidates
        .into_iter()
        .filter(|cell| cell.value() == max_value)
        .map(Cell::position)
        .collect()
}

/// Nearest of the most valuable targets, excluding `from` itself.
/// Ties go to the earliest candidate in ranked order.
pub fn closest_target(
    from: &Position,
    grid: &Grid,
    excluded: &HashSet<Position>,
) -> Option<Position> {
    let mut closest: Option<(Position, f64)> = None;
    for candidate in most_valuable_targets(grid, excluded) {
        if candidate == *from {
            continue;
        }
        let distance = from.distance(&candidate);
        match closest {
            Some((_, best)) if distance >= best => {}
            _ => closest = Some((candidate, distance)),
        }
    }
    closest.map(|(position, _)| position)
}
