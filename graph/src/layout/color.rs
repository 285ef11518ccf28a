use serde::{Deserialize, Serialize};

pub const DEFAULT_PALETTE_SIZE: usize = 8;

/// Hands out palette indices to newly acquired lanes.
///
/// The counter only moves forward. A lane keeps the color it was given at
/// acquisition even when its slot index is later reused, so colors follow
/// acquisition order, not lane position.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColorAssigner {
    counter: u64,
    palette_size: usize,
}

impl Default for ColorAssigner {
    fn default() -> Self {
        Self::new(DEFAULT_PALETTE_SIZE)
    }
}

impl ColorAssigner {
    pub fn new(palette_size: usize) -> Self {
        Self {
            counter: 0,
            palette_size: palette_size.max(1),
        }
    }

    pub fn palette_size(&self) -> usize {
        self.palette_size
    }

    /// Take the next color. `in_use` holds the colors of the lanes active
    /// right now; a color they hold is skipped while a free one exists, which
    /// keeps concurrent lanes distinct up to `palette_size` of them.
    pub fn next_color(&mut self, in_use: &[usize]) -> usize {
        let size = self.palette_size as u64;
        let skip = (0..size)
            .find(|offset| {
                let candidate = ((self.counter + offset) % size) as usize;
                !in_use.contains(&candidate)
            })
            .unwrap_or(0);
        let color = ((self.counter + skip) % size) as usize;
        self.counter += skip + 1;
        color
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cycles_through_palette() {
        let mut colors = ColorAssigner::new(3);
        let taken: Vec<_> = (0..5).map(|_| colors.next_color(&[])).collect();
        assert_eq!(taken, vec![0, 1, 2, 0, 1]);
    }

    #[test]
    fn skips_colors_held_by_active_lanes() {
        let mut colors = ColorAssigner::new(4);
        assert_eq!(colors.next_color(&[]), 0);
        assert_eq!(colors.next_color(&[0]), 1);
        // counter sits at 2 and only color 1 is free
        assert_eq!(colors.next_color(&[0, 2, 3]), 1);
        assert_eq!(colors.next_color(&[1]), 2);
    }

    #[test]
    fn saturated_palette_falls_back_to_counter() {
        let mut colors = ColorAssigner::new(2);
        assert_eq!(colors.next_color(&[0, 1]), 0);
        assert_eq!(colors.next_color(&[0, 1]), 1);
    }

    #[test]
    fn zero_palette_is_clamped() {
        let mut colors = ColorAssigner::new(0);
        assert_eq!(colors.palette_size(), 1);
        assert_eq!(colors.next_color(&[]), 0);
    }
}
