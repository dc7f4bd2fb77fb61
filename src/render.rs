use crate::BG_COLOR;
use crate::PixelSize;
use crate::SCALE;
use crate::cell::Rgb;
use crate::draw::DrawContext;
use crate::draw::SurfaceError;
use crate::engine::ColorMode;
use crate::engine::Transitions;
use crate::grid::Grid;

/// Apply every pending transition and paint the cells that changed.
///
/// A cell pending birth is painted as a `SCALE` square in its own color (or [`Rgb::WHITE`] in
/// [`ColorMode::Fixed`]) and comes alive. A cell pending death is painted with [`BG_COLOR`] and
/// dies. Both flags are cleared on the way. Clean cells are not drawn at all, and nothing is
/// committed here.
pub fn apply_transitions<D>(
    grid: &mut Grid,
    ctx: &mut D,
    mode: ColorMode,
) -> Result<Transitions, SurfaceError>
where
    D: DrawContext + ?Sized,
{
    let mut tr = Transitions::default();
    let (w, h) = (grid.width(), grid.height());

    for x in 0..w {
        for y in 0..h {
            let cell = grid.at_mut(x, y);
            let (px, py) = (x as PixelSize * SCALE, y as PixelSize * SCALE);

            if cell.flip_on {
                let color = match mode {
                    ColorMode::Fixed => Rgb::WHITE,
                    ColorMode::BlendAverage => cell.color,
                };

                cell.flip_on = false;
                cell.alive = true;
                tr.births += 1;

                ctx.fill_rect(px, py, SCALE, SCALE, color.argb())?;
            } else if cell.flip_off {
                cell.flip_off = false;
                cell.alive = false;
                tr.deaths += 1;

                ctx.fill_rect(px, py, SCALE, SCALE, BG_COLOR)?;
            }
        }
    }

    Ok(tr)
}
