use rand::Rng;

use crate::cell::Rgb;
use crate::config::Config;
use crate::grid::Grid;

/// A live cell with fewer neighbors than this dies of underpopulation
pub const SURVIVE_MIN: u8 = 2;

/// A live cell with more neighbors than this dies of overpopulation
pub const SURVIVE_MAX: u8 = 3;

/// A dead cell with exactly this many neighbors is born
pub const BIRTH: u8 = 3;

/// How live cells are colored
#[derive(Debug, Default, PartialEq, Eq, Clone, Copy)]
pub enum ColorMode {
    /// Every live cell is painted [`Rgb::WHITE`]
    Fixed,

    /// Seeds get a color derived from their position, newborns average their parents
    #[default]
    BlendAverage,
}

/// How the neighborhood scan treats the grid edges
#[derive(Debug, Default, PartialEq, Eq, Clone, Copy)]
pub enum Boundary {
    /// Neighbors outside the grid are dead
    #[default]
    Bounded,

    /// Only offsets strictly past the last row or column are dropped. A neighbor one past the
    /// right edge aliases the first cell of the next row, and anything past the end of the buffer
    /// counts as dead.
    Legacy,
}

/// Number of pending flags set by one update pass, or consumed by one render pass
#[derive(Debug, Default, PartialEq, Eq, Clone, Copy)]
pub struct Transitions {
    pub births: usize,
    pub deaths: usize,
}

impl Transitions {
    pub fn total(&self) -> usize {
        self.births + self.deaths
    }
}

/// Live neighbors of a cell along with the sum of their color channels
#[derive(Debug, Default, PartialEq, Eq, Clone, Copy)]
pub struct Neighborhood {
    pub count: u8,

    /// Red, green and blue sums
    pub sums: [u16; 3],
}

/// Scan the Moore neighborhood of `(x, y)`
pub fn neighborhood(grid: &Grid, x: usize, y: usize, boundary: Boundary) -> Neighborhood {
    let (w, h) = (grid.width() as isize, grid.height() as isize);
    let cells = grid.cells();
    let mut nbhd = Neighborhood::default();

    for dx in -1..=1isize {
        for dy in -1..=1isize {
            if dx == 0 && dy == 0 {
                continue;
            }

            let (nx, ny) = (x as isize + dx, y as isize + dy);
            if nx < 0 || ny < 0 {
                continue;
            }

            let outside = match boundary {
                Boundary::Bounded => nx >= w || ny >= h,
                Boundary::Legacy => nx > w || ny > h,
            };
            if outside {
                continue;
            }

            let Some(cell) = cells.get((ny * w + nx) as usize) else {
                continue;
            };

            if cell.alive {
                let c = cell.color;
                nbhd.count += 1;
                nbhd.sums[0] += c.r() as u16;
                nbhd.sums[1] += c.g() as u16;
                nbhd.sums[2] += c.b() as u16;
            }
        }
    }

    nbhd
}

/// Average the neighbor colors. Each channel starts from `jitter` before dividing, and the result
/// is truncated to 8 bits per channel. An empty neighborhood yields black.
pub fn blend(nbhd: &Neighborhood, jitter: [u8; 3]) -> Rgb {
    if nbhd.count == 0 {
        return Rgb::default();
    }

    let n = nbhd.count as u16;
    let channel = |i: usize| ((jitter[i] as u16 + nbhd.sums[i]) / n) as u8;

    Rgb::from_channels(channel(0), channel(1), channel(2))
}

/// Compute the next generation's pending flags.
///
/// Live cells with fewer than [`SURVIVE_MIN`] or more than [`SURVIVE_MAX`] neighbors are marked
/// to die, dead cells with exactly [`BIRTH`] neighbors are marked to be born. Nobody's `alive`
/// flag changes here; that is left to [`crate::render::apply_transitions`].
pub fn check_neighbors<R: Rng>(grid: &mut Grid, config: &Config, rng: &mut R) -> Transitions {
    let mut tr = Transitions::default();

    for x in 0..grid.width() {
        for y in 0..grid.height() {
            let nbhd = neighborhood(grid, x, y, config.boundary);
            let alive = grid.cells()[grid.index(x, y)].alive;
            let n = nbhd.count;

            if alive && !(SURVIVE_MIN..=SURVIVE_MAX).contains(&n) {
                if grid.at_mut(x, y).mark_death() {
                    tr.deaths += 1;
                }
            } else if !alive && n == BIRTH {
                let color = match config.color_mode {
                    ColorMode::Fixed => Rgb::WHITE,
                    ColorMode::BlendAverage => {
                        let jitter = if config.birth_jitter {
                            std::array::from_fn(|_| rng.random::<u8>() / 3)
                        } else {
                            [0; 3]
                        };

                        blend(&nbhd, jitter)
                    }
                };

                if grid.at_mut(x, y).mark_birth(color) {
                    tr.births += 1;
                }
            }
        }
    }

    tr
}
