use std::io;
use std::thread;
use std::time::Instant;
use std::time::SystemTime;
use std::time::UNIX_EPOCH;

use rand::SeedableRng;
use rand::rngs::StdRng;
use thiserror::Error;
use tracing::debug;
use tracing::info;
use tracing::trace;

use crate::BG_COLOR;
use crate::PixelSize;
use crate::config::Config;
use crate::config::QuitKey;
use crate::draw::DrawContext;
use crate::draw::SurfaceError;
use crate::engine;
use crate::engine::Transitions;
use crate::events::Command;
use crate::grid::Grid;
use crate::io::KeySource;
use crate::render;

#[derive(Debug, Error)]
pub enum RunError {
    #[error("Drawing failed: {0}")]
    Surface(#[from] SurfaceError),

    #[error("Reading input failed: {0}")]
    Input(#[from] io::Error),
}

/// Whether the main loop keeps going after a tick
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum Flow {
    Continue,
    Quit,
}

/// The automaton and everything it needs to advance: grid, RNG, settings and the pause state.
pub struct Simulation {
    grid: Grid,
    config: Config,
    rng: StdRng,
    paused: bool,
    generation: u64,
}

impl Simulation {
    /// A randomly seeded simulation sized for a display of `width` by `height` pixels
    pub fn new(config: Config, width: PixelSize, height: PixelSize) -> Self {
        let seed = config.seed.unwrap_or_else(clock_seed);
        let mut rng = StdRng::seed_from_u64(seed);

        let mut grid = Grid::for_display(width, height);
        grid.seed(config.color_mode, &mut rng);

        info!(
            width = grid.width(),
            height = grid.height(),
            seed,
            ?config,
            "seeded grid"
        );

        Self::from_parts(config, grid, rng)
    }

    /// Run an existing grid. Pending flags on `grid` are applied on the first tick.
    pub fn with_grid(config: Config, grid: Grid) -> Self {
        let seed = config.seed.unwrap_or_else(clock_seed);
        Self::from_parts(config, grid, StdRng::seed_from_u64(seed))
    }

    fn from_parts(config: Config, grid: Grid, rng: StdRng) -> Self {
        Self {
            grid,
            config,
            rng,
            paused: false,
            generation: 0,
        }
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    /// Number of apply and recompute cycles so far
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// One generation: apply pending transitions, commit the frame, compute the next flags.
    /// Returns the transitions that were painted.
    pub fn step<D>(&mut self, ctx: &mut D) -> Result<Transitions, SurfaceError>
    where
        D: DrawContext + ?Sized,
    {
        ctx.set_full_redraw(true);
        let painted = render::apply_transitions(&mut self.grid, ctx, self.config.color_mode)?;
        ctx.commit()?;

        let next = engine::check_neighbors(&mut self.grid, &self.config, &mut self.rng);
        self.generation += 1;

        debug!(
            generation = self.generation,
            births = painted.births,
            deaths = painted.deaths,
            pending = next.total(),
            "generation done"
        );

        Ok(painted)
    }

    /// One iteration of the main loop, given the command polled for it.
    pub fn tick<D>(&mut self, ctx: &mut D, command: Option<Command>) -> Result<Flow, SurfaceError>
    where
        D: DrawContext + ?Sized,
    {
        let mut step = false;

        match command {
            None => {}
            Some(Command::TogglePause) => {
                self.paused = !self.paused;
                debug!(paused = self.paused, "toggled pause");
            }
            Some(Command::Step) => step = true,
            Some(Command::Quit) => match self.config.quit_key {
                QuitKey::Enabled => return Ok(Flow::Quit),
                QuitKey::Disabled => trace!("quit key is disabled"),
            },
            Some(Command::Interrupt) => return Ok(Flow::Quit),
        }

        if !self.paused || step {
            self.step(ctx)?;
        }

        Ok(Flow::Continue)
    }
}

/// Drive `sim` until a quit command arrives. The surface is cleared first, then every iteration
/// polls one command, ticks, and sleeps out whatever is left of the configured tick interval.
pub fn run<D, K>(sim: &mut Simulation, ctx: &mut D, keys: &mut K) -> Result<(), RunError>
where
    D: DrawContext + ?Sized,
    K: KeySource + ?Sized,
{
    ctx.clear(BG_COLOR)?;
    ctx.commit()?;

    loop {
        let t = Instant::now();

        let command = keys.read_key()?;
        if sim.tick(ctx, command)? == Flow::Quit {
            info!(generation = sim.generation(), "quitting");
            return Ok(());
        }

        let time_left = sim.config.tick.saturating_sub(t.elapsed());
        if !time_left.is_zero() {
            thread::sleep(time_left);
        }
    }
}

fn clock_seed() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos() as u64)
        .unwrap_or_default()
}

#[cfg(test)]
mod test {
    use super::Flow;
    use super::Simulation;
    use crate::config::Config;
    use crate::config::QuitKey;
    use crate::draw::Framebuffer;
    use crate::events::Command;
    use crate::grid::Grid;

    fn blinker(quit_key: QuitKey) -> Simulation {
        let grid: Grid = ".....\n.....\n.###.\n.....\n.....".parse().unwrap();
        let config = Config {
            quit_key,
            seed: Some(1),
            ..Config::default()
        };

        Simulation::with_grid(config, grid)
    }

    #[test]
    fn new_sizes_grid_to_display() {
        let config = Config {
            seed: Some(3),
            ..Config::default()
        };
        let sim = Simulation::new(config, 1920, 1080);

        assert_eq!((sim.grid().width(), sim.grid().height()), (100, 100));
        assert!(sim.grid().dirty_count() > 0);
        assert_eq!(sim.grid().live_count(), 0);
    }

    #[test]
    fn same_seed_same_grid() {
        let config = Config {
            seed: Some(99),
            ..Config::default()
        };

        let a = Simulation::new(config.clone(), 400, 240);
        let b = Simulation::new(config, 400, 240);

        assert_eq!(a.grid(), b.grid());
    }

    #[test]
    fn paused_ticks_do_nothing() {
        let mut sim = blinker(QuitKey::Enabled);
        let mut fb = Framebuffer::new(50, 50);

        sim.tick(&mut fb, Some(Command::TogglePause)).unwrap();
        sim.tick(&mut fb, None).unwrap();

        assert!(sim.is_paused());
        assert_eq!(sim.generation(), 0);
        assert_eq!(fb.commits(), 0);
    }

    #[test]
    fn step_while_paused_runs_once() {
        let mut sim = blinker(QuitKey::Enabled);
        let mut fb = Framebuffer::new(50, 50);

        sim.tick(&mut fb, Some(Command::TogglePause)).unwrap();
        sim.tick(&mut fb, Some(Command::Step)).unwrap();
        sim.tick(&mut fb, None).unwrap();

        assert_eq!(sim.generation(), 1);
        assert_eq!(sim.grid().live_count(), 3);
        assert!(sim.is_paused());
    }

    #[test]
    fn quit_key_respects_config() {
        let mut fb = Framebuffer::new(50, 50);

        let mut sim = blinker(QuitKey::Enabled);
        assert_eq!(sim.tick(&mut fb, Some(Command::Quit)).unwrap(), Flow::Quit);

        let mut sim = blinker(QuitKey::Disabled);
        assert_eq!(
            sim.tick(&mut fb, Some(Command::Quit)).unwrap(),
            Flow::Continue
        );
        assert_eq!(sim.generation(), 1);
        assert_eq!(
            sim.tick(&mut fb, Some(Command::Interrupt)).unwrap(),
            Flow::Quit
        );
    }

    #[test]
    fn every_generation_commits_a_full_redraw() {
        let mut sim = blinker(QuitKey::Enabled);
        let mut fb = Framebuffer::new(50, 50);

        sim.tick(&mut fb, None).unwrap();
        sim.tick(&mut fb, None).unwrap();

        assert_eq!(fb.commits(), 2);
        assert_eq!(fb.redraw_commits(), 2);
    }

    #[test]
    fn step_while_running_is_one_generation() {
        let mut sim = blinker(QuitKey::Enabled);
        let mut fb = Framebuffer::new(50, 50);

        assert_eq!(
            sim.tick(&mut fb, Some(Command::Step)).unwrap(),
            Flow::Continue
        );

        assert_eq!(sim.generation(), 1);
        assert_eq!(fb.commits(), 1);
        assert!(!sim.is_paused());
    }
}
