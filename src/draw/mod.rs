use std::io;

use thiserror::Error;

use crate::Argb;
use crate::PixelSize;

pub mod framebuffer;
pub mod terminal;

pub use self::framebuffer::Framebuffer;
pub use self::terminal::TerminalSurface;

#[derive(Debug, Error)]
pub enum SurfaceError {
    #[error("Surface I/O failed: {0}")]
    Io(#[from] io::Error),
}

/// A drawing surface measured in pixels. Nothing drawn is guaranteed to be visible until
/// [`DrawContext::commit`].
pub trait DrawContext {
    fn width(&self) -> PixelSize;

    fn height(&self) -> PixelSize;

    /// Fill the whole surface with `color`
    fn clear(&mut self, color: Argb) -> Result<(), SurfaceError>;

    /// Fill a rectangle. Parts that fall off the surface are dropped.
    fn fill_rect(
        &mut self,
        x: PixelSize,
        y: PixelSize,
        w: PixelSize,
        h: PixelSize,
        color: Argb,
    ) -> Result<(), SurfaceError>;

    /// Present the frame
    fn commit(&mut self) -> Result<(), SurfaceError>;

    /// Hint that the coming frame touches arbitrary parts of the surface
    fn set_full_redraw(&mut self, _full: bool) {}
}
