use std::io;
use std::io::BufWriter;
use std::io::Stdout;
use std::io::Write;

use crossterm::cursor;
use crossterm::execute;
use crossterm::queue;
use crossterm::style;
use crossterm::terminal;

use crate::Argb;
use crate::PixelSize;
use crate::draw::DrawContext;
use crate::draw::SurfaceError;
use crate::ext::term::ArgbColorExt;

/// Virtual pixels per terminal column
pub const PX_PER_COL: PixelSize = 5;

/// Virtual pixels per terminal row. Character cells are about twice as tall as they are wide, so
/// a square of [`crate::SCALE`] pixels comes out as two columns by one row.
pub const PX_PER_ROW: PixelSize = 10;

/// A [`DrawContext`] on the terminal. Pixels are virtual: every character cell covers a block of
/// [`PX_PER_COL`] by [`PX_PER_ROW`] pixels and is painted through its background color.
pub struct TerminalSurface<W: Write = BufWriter<Stdout>> {
    out: W,

    /// Terminal size in character cells
    cols: u16,
    rows: u16,

    /// Whether we own raw mode and the alternate screen, and have to give them back
    owns_terminal: bool,
}

impl TerminalSurface {
    /// Take over the terminal: raw mode, alternate screen, hidden cursor. Everything is restored
    /// when the surface is dropped.
    pub fn acquire() -> Result<Self, SurfaceError> {
        let (cols, rows) = terminal::size()?;
        terminal::enable_raw_mode()?;

        let mut surface = Self {
            out: BufWriter::new(io::stdout()),
            cols,
            rows,
            owns_terminal: true,
        };

        execute!(surface.out, terminal::EnterAlternateScreen, cursor::Hide)?;

        Ok(surface)
    }
}

impl<W: Write> TerminalSurface<W> {
    /// Draw into `out` as if it were a terminal of the given size. The terminal mode is left
    /// alone.
    pub fn with_writer(out: W, cols: u16, rows: u16) -> Self {
        Self {
            out,
            cols,
            rows,
            owns_terminal: false,
        }
    }

    pub fn into_inner(mut self) -> W
    where
        W: Default,
    {
        std::mem::take(&mut self.out)
    }

    /// Inclusive range of character cells covering `len` pixels from `start`, clipped to `max`
    fn span(start: PixelSize, len: PixelSize, per: PixelSize, max: u16) -> Option<(u16, u16)> {
        if len == 0 || max == 0 {
            return None;
        }

        let first = start / per;
        let last = (start.saturating_add(len - 1) / per).min(max as PixelSize - 1);

        if first > last {
            return None;
        }

        Some((first as u16, last as u16))
    }
}

impl<W: Write> DrawContext for TerminalSurface<W> {
    fn width(&self) -> PixelSize {
        self.cols as PixelSize * PX_PER_COL
    }

    fn height(&self) -> PixelSize {
        self.rows as PixelSize * PX_PER_ROW
    }

    fn clear(&mut self, color: Argb) -> Result<(), SurfaceError> {
        queue!(
            self.out,
            style::SetBackgroundColor(color.to_term_color()),
            terminal::Clear(terminal::ClearType::All)
        )?;

        Ok(())
    }

    fn fill_rect(
        &mut self,
        x: PixelSize,
        y: PixelSize,
        w: PixelSize,
        h: PixelSize,
        color: Argb,
    ) -> Result<(), SurfaceError> {
        let Some((c0, c1)) = Self::span(x, w, PX_PER_COL, self.cols) else {
            return Ok(());
        };
        let Some((r0, r1)) = Self::span(y, h, PX_PER_ROW, self.rows) else {
            return Ok(());
        };

        let blank = " ".repeat((c1 - c0 + 1) as usize);

        queue!(self.out, style::SetBackgroundColor(color.to_term_color()))?;
        for row in r0..=r1 {
            queue!(self.out, cursor::MoveTo(c0, row), style::Print(&blank))?;
        }

        Ok(())
    }

    fn commit(&mut self) -> Result<(), SurfaceError> {
        self.out.flush()?;
        Ok(())
    }
}

impl<W: Write> Drop for TerminalSurface<W> {
    fn drop(&mut self) {
        if !self.owns_terminal {
            return;
        }

        // Nothing sensible left to do if the terminal refuses to be restored
        let _ = execute!(
            self.out,
            style::ResetColor,
            cursor::Show,
            terminal::LeaveAlternateScreen
        );
        let _ = terminal::disable_raw_mode();
    }
}

#[cfg(test)]
mod test {
    use super::TerminalSurface;
    use crate::draw::DrawContext;

    #[test]
    fn size_in_virtual_pixels() {
        let surface = TerminalSurface::with_writer(Vec::new(), 80, 24);

        assert_eq!((surface.width(), surface.height()), (400, 240));
    }

    #[test]
    fn span_covers_cells() {
        type S = TerminalSurface<Vec<u8>>;

        // A 10 pixel cell is two columns and one row
        assert_eq!(S::span(10, 10, 5, 80), Some((2, 3)));
        assert_eq!(S::span(10, 10, 10, 24), Some((1, 1)));

        // clipped
        assert_eq!(S::span(395, 10, 5, 80), Some((79, 79)));
        assert_eq!(S::span(400, 10, 5, 80), None);
        assert_eq!(S::span(0, 0, 5, 80), None);
    }

    #[test]
    fn fill_writes_blanks_on_commit() {
        let mut surface = TerminalSurface::with_writer(Vec::new(), 4, 2);
        surface.fill_rect(0, 0, 10, 10, 0xFF_FF_FF_FF).unwrap();
        surface.commit().unwrap();

        let out = String::from_utf8(surface.into_inner()).unwrap();
        assert!(out.contains("  "));
        assert!(out.contains("\x1b[48;2;255;255;255m"));
    }

    #[test]
    fn offscreen_fill_writes_nothing() {
        let mut surface = TerminalSurface::with_writer(Vec::new(), 4, 2);
        surface.fill_rect(100, 100, 10, 10, 0).unwrap();
        surface.commit().unwrap();

        assert!(surface.into_inner().is_empty());
    }
}
