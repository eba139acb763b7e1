/// Background palette, lightest to hottest.
pub const PALETTE: [&str; 10] = [
    "#f0f0f0", "#e1f5fe", "#b3e5fc", "#81d4fa", "#4fc3f7", "#ffecb3", "#ffe082", "#ffcc80",
    "#ffab91", "#ef9a9a",
];

/// Receives occupancy notifications from the simulation and exposes the
/// resulting color matrix read-only.
pub trait OccupancyObserver: Send {
    /// Re-seed the background from a freshly built grid's values.
    fn reset(&mut self, width: usize, height: usize, values: &[i32]);

    /// Paint `(x, y)` with a palette index, or restore the background with `None`.
    fn set_color(&mut self, x: i32, y: i32, color: Option<usize>);

    /// Wipe every overlay color back to the background.
    fn clear(&mut self);

    fn colors(&self) -> Vec<Vec<String>>;
}

#[derive(Debug, Clone, Default)]
pub struct ColorGrid {
    width: usize,
    height: usize,
    base: Vec<usize>,
    overlay: Vec<Option<usize>>,
}

impl ColorGrid {
    pub fn new() -> Self {
        Self::default()
    }

    fn index(&self, x: i32, y: i32) -> Option<usize> {
        if x < 0 || y < 0 || x as usize >= self.width || y as usize >= self.height {
            return None;
        }
        Some(y as usize * self.width + x as usize)
    }

    fn bucket(value: i32, min: i32, range: i64) -> usize {
        let offset = (i64::from(value) - i64::from(min)) as f64;
        let bucket = (offset * (PALETTE.len() - 1) as f64 / range as f64).floor();
        bucket.clamp(0.0, (PALETTE.len() - 1) as f64) as usize
    }

    /// Palette index per cell in row-major order, overlay taking precedence.
    pub fn color_indices(&self) -> Vec<u32> {
        self.base
            .iter()
            .zip(&self.overlay)
            .map(|(&base, overlay)| (overlay.unwrap_or(base) % PALETTE.len()) as u32)
            .collect()
    }
}

impl OccupancyObserver for ColorGrid {
    fn reset(&mut self, width: usize, height: usize, values: &[i32]) {
        self.width = width;
        self.height = height;
        let min = values.iter().copied().min().unwrap_or(0);
        let max = values.iter().copied().max().unwrap_or(0);
        // All-equal matrices still need a non-zero divisor.
        let range = (i64::from(max) - i64::from(min)).max(1);
        self.base = values
            .iter()
            .map(|&value| Self::bucket(value, min, range))
            .collect();
        self.overlay = vec![None; values.len()];
    }

    fn set_color(&mut self, x: i32, y: i32, color: Option<usize>) {
        if let Some(index) = self.index(x, y) {
            self.overlay[index] = color;
        }
    }

    fn clear(&mut self) {
        for slot in &mut self.overlay {
            *slot = None;
        }
    }

    fn colors(&self) -> Vec<Vec<String>> {
        if self.width == 0 {
            return Vec::new();
        }
        self.color_indices()
            .chunks(self.width)
            .map(|row| {
                row.iter()
                    .map(|&index| PALETTE[index as usize].to_string())
                    .collect()
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn buckets_span_the_palette() {
        let mut grid = ColorGrid::new();
        grid.reset(3, 1, &[0, 5, 9]);
        assert_eq!(grid.color_indices(), vec![0, 5, 9]);
        assert_eq!(
            grid.colors(),
            vec![vec![
                PALETTE[0].to_string(),
                PALETTE[5].to_string(),
                PALETTE[9].to_string()
            ]]
        );
    }

    #[test]
    fn uniform_values_use_first_bucket() {
        let mut grid = ColorGrid::new();
        grid.reset(2, 2, &[4, 4, 4, 4]);
        assert_eq!(grid.color_indices(), vec![0, 0, 0, 0]);
    }

    #[test]
    fn overlay_paints_and_clears() {
        let mut grid = ColorGrid::new();
        grid.reset(2, 1, &[1, 1]);
        grid.set_color(1, 0, Some(3));
        grid.set_color(7, 7, Some(4));
        assert_eq!(grid.color_indices(), vec![0, 3]);

        grid.set_color(1, 0, None);
        assert_eq!(grid.color_indices(), vec![0, 0]);

        grid.set_color(0, 0, Some(12));
        assert_eq!(grid.color_indices(), vec![2, 0]);
        grid.clear();
        assert_eq!(grid.color_indices(), vec![0, 0]);
    }

    #[test]
    fn empty_grid_has_no_colors() {
        assert!(ColorGrid::new().colors().is_empty());
    }
}
