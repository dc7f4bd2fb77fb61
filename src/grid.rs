use std::fmt;
use std::str::FromStr;

use rand::Rng;
use thiserror::Error;

use crate::PixelSize;
use crate::SCALE;
use crate::cell::Cell;
use crate::cell::Rgb;
use crate::engine::ColorMode;

/// Smallest side length of a grid derived from a display
pub const MIN_SIDE: usize = 10;

/// Largest side length of a grid derived from a display
pub const MAX_SIDE: usize = 100;

/// A random byte below this marks a cell for birth when seeding. About 11.7% of cells.
pub const SEED_THRESHOLD: u8 = 30;

/// A fixed-size, row-major grid of [`Cell`]s.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grid {
    w: usize,
    h: usize,
    cells: Vec<Cell>,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum GridParseError {
    #[error("Pattern has no rows")]
    Empty,

    #[error("Row {row} has {got} cells, expected {exp}")]
    Ragged { row: usize, exp: usize, got: usize },

    #[error("Unexpected character '{0}' in pattern")]
    UnexpectedChar(char),
}

impl Grid {
    /// Create a grid of dead cells. Both sides are at least 1.
    pub fn new(w: usize, h: usize) -> Self {
        let (w, h) = (w.max(1), h.max(1));

        Self {
            w,
            h,
            cells: vec![Cell::default(); w * h],
        }
    }

    /// Grid dimensions for a display of the given pixel size, at [`SCALE`] pixels per cell.
    pub fn dims_for_display(width: PixelSize, height: PixelSize) -> (usize, usize) {
        let side = |px: PixelSize| ((px / SCALE) as usize).clamp(MIN_SIDE, MAX_SIDE);

        (side(width), side(height))
    }

    /// Create a dead grid that fits a display of the given pixel size
    pub fn for_display(width: PixelSize, height: PixelSize) -> Self {
        let (w, h) = Self::dims_for_display(width, height);
        Self::new(w, h)
    }

    /// Build a grid whose live cells are pending births. `alive` is read row-major; missing
    /// entries are dead and extra ones are ignored.
    pub fn from_cells<I>(w: usize, h: usize, alive: I, color: Rgb) -> Self
    where
        I: IntoIterator<Item = bool>,
    {
        let mut grid = Self::new(w, h);

        for (cell, alive) in grid.cells.iter_mut().zip(alive) {
            if alive {
                cell.mark_birth(color);
            }
        }

        grid
    }

    /// Randomly mark cells for birth. Each cell is independently picked with probability
    /// `SEED_THRESHOLD / 256`.
    pub fn seed<R: Rng>(&mut self, mode: ColorMode, rng: &mut R) {
        for x in 0..self.w {
            for y in 0..self.h {
                if rng.random::<u8>() >= SEED_THRESHOLD {
                    continue;
                }

                let color = match mode {
                    ColorMode::Fixed => Rgb::WHITE,
                    ColorMode::BlendAverage => {
                        let b = rng.random::<u8>().min(100) / 2;
                        Rgb::new((x as u32) << 16 | (y as u32) << 8 | b as u32)
                    }
                };

                self.at_mut(x, y).mark_birth(color);
            }
        }
    }

    pub fn width(&self) -> usize {
        self.w
    }

    pub fn height(&self) -> usize {
        self.h
    }

    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    pub fn get(&self, x: usize, y: usize) -> Option<&Cell> {
        if x >= self.w || y >= self.h {
            return None;
        }

        self.cells.get(self.index(x, y))
    }

    /// Out of bounds coordinates are dead
    pub fn is_alive(&self, x: usize, y: usize) -> bool {
        self.get(x, y).is_some_and(Cell::is_alive)
    }

    pub fn live_count(&self) -> usize {
        self.cells.iter().filter(|c| c.alive).count()
    }

    pub fn dirty_count(&self) -> usize {
        self.cells.iter().filter(|c| c.is_dirty()).count()
    }

    /// Queue a birth at `(x, y)`. Does nothing out of bounds.
    pub fn mark_birth(&mut self, x: usize, y: usize, color: Rgb) {
        if x < self.w && y < self.h {
            self.at_mut(x, y).mark_birth(color);
        }
    }

    #[cfg(test)]
    pub(crate) fn cells_mut(&mut self) -> &mut [Cell] {
        &mut self.cells
    }

    pub(crate) fn at_mut(&mut self, x: usize, y: usize) -> &mut Cell {
        let i = self.index(x, y);
        &mut self.cells[i]
    }

    pub(crate) fn index(&self, x: usize, y: usize) -> usize {
        y * self.w + x
    }
}

/// Patterns use `#`, `O` or `*` for live cells and `.` for dead ones, one row per line. Blank lines
/// and surrounding whitespace are skipped. Live cells come out as white pending births.
impl FromStr for Grid {
    type Err = GridParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let rows: Vec<&str> = s.lines().map(str::trim).filter(|l| !l.is_empty()).collect();

        let Some(first) = rows.first() else {
            return Err(GridParseError::Empty);
        };

        let w = first.chars().count();
        let mut alive = Vec::with_capacity(w * rows.len());

        for (row, line) in rows.iter().enumerate() {
            let got = line.chars().count();
            if got != w {
                return Err(GridParseError::Ragged { row, exp: w, got });
            }

            for c in line.chars() {
                match c {
                    '#' | 'O' | '*' => alive.push(true),
                    '.' => alive.push(false),
                    c => return Err(GridParseError::UnexpectedChar(c)),
                }
            }
        }

        Ok(Self::from_cells(w, rows.len(), alive, Rgb::WHITE))
    }
}

impl fmt::Display for Grid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (y, row) in self.cells.chunks(self.w).enumerate() {
            if y > 0 {
                writeln!(f)?;
            }

            for cell in row {
                f.write_str(if cell.alive { "#" } else { "." })?;
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod test {
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    use super::Grid;
    use super::GridParseError;
    use crate::engine::ColorMode;

    #[test]
    fn dims_clamp_to_cap() {
        assert_eq!(Grid::dims_for_display(1920, 1080), (100, 100));
    }

    #[test]
    fn dims_clamp_to_floor() {
        assert_eq!(Grid::dims_for_display(99, 40), (10, 10));
        assert_eq!(Grid::dims_for_display(0, 0), (10, 10));
    }

    #[test]
    fn dims_in_range() {
        assert_eq!(Grid::dims_for_display(400, 240), (40, 24));
    }

    #[test]
    fn parse_marks_pending_births() {
        let grid: Grid = ".#.\n..#\n".parse().unwrap();

        assert_eq!((grid.width(), grid.height()), (3, 2));
        assert_eq!(grid.live_count(), 0);
        assert_eq!(grid.dirty_count(), 2);
        assert!(grid.get(1, 0).unwrap().flip_on());
        assert!(grid.get(2, 1).unwrap().flip_on());
    }

    #[test]
    fn parse_errors() {
        assert_eq!("".parse::<Grid>(), Err(GridParseError::Empty));
        assert_eq!(
            "..\n...".parse::<Grid>(),
            Err(GridParseError::Ragged {
                row: 1,
                exp: 2,
                got: 3
            })
        );
        assert_eq!(".x".parse::<Grid>(), Err(GridParseError::UnexpectedChar('x')));
    }

    #[test]
    fn out_of_bounds_is_dead() {
        let grid = Grid::new(3, 3);

        assert!(grid.get(3, 0).is_none());
        assert!(!grid.is_alive(0, 3));
    }

    #[test]
    fn seeding_marks_births_only() {
        let mut grid = Grid::new(100, 100);
        let mut rng = StdRng::seed_from_u64(7);
        grid.seed(ColorMode::BlendAverage, &mut rng);

        let births = grid.cells().iter().filter(|c| c.flip_on()).count();

        // ~1172 expected out of 10000
        assert!((800..1600).contains(&births), "got {births} births");
        assert_eq!(grid.live_count(), 0);
        assert!(grid.cells().iter().all(|c| !c.flip_off()));
    }

    #[test]
    fn blend_seed_colors_encode_position() {
        let mut grid = Grid::new(20, 20);
        let mut rng = StdRng::seed_from_u64(11);
        grid.seed(ColorMode::BlendAverage, &mut rng);

        for x in 0..20 {
            for y in 0..20 {
                let cell = grid.get(x, y).unwrap();
                if !cell.flip_on() {
                    continue;
                }

                let c = cell.color();
                assert_eq!(c.r() as usize, x);
                assert_eq!(c.g() as usize, y);
                assert!(c.b() <= 50);
            }
        }
    }
}
