use std::io;

use anyhow::Context;
use tracing_subscriber::EnvFilter;

use framelife::config::Config;
use framelife::draw::DrawContext;
use framelife::draw::TerminalSurface;
use framelife::io::CrosstermKeys;
use framelife::sim;
use framelife::sim::Simulation;

fn main() -> anyhow::Result<()> {
    // The terminal is the framebuffer, so logs go to stderr. Redirect it to read them.
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .with_ansi(false)
        .init();

    let config = Config::from_env().context("Failed to read configuration")?;

    let mut surface = TerminalSurface::acquire().context("Failed to acquire the terminal")?;
    let mut sim = Simulation::new(config, surface.width(), surface.height());

    sim::run(&mut sim, &mut surface, &mut CrosstermKeys).context("Simulation stopped")?;

    Ok(())
}
