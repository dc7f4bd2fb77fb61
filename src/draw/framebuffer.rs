use crate::Argb;
use crate::PixelSize;
use crate::draw::DrawContext;
use crate::draw::SurfaceError;

/// An in-memory surface. This is an array of `0xAARRGGBB` pixels where `fb[y * width + x]` is
/// pixel `(x, y)`.
pub struct Framebuffer {
    fb: Vec<Argb>,

    /// Width of the surface in pixels
    width: PixelSize,

    /// Height of the surface in pixels
    height: PixelSize,

    full_redraw: bool,

    // bookkeeping, mostly useful to check what a frame did
    fills: usize,
    commits: usize,
    redraw_commits: usize,
}

impl Framebuffer {
    pub fn new(width: PixelSize, height: PixelSize) -> Self {
        let fb_size = (width as usize) * (height as usize);

        Self {
            fb: vec![0; fb_size],
            width,
            height,
            full_redraw: false,
            fills: 0,
            commits: 0,
            redraw_commits: 0,
        }
    }

    pub fn pixel(&self, x: PixelSize, y: PixelSize) -> Option<Argb> {
        if x >= self.width || y >= self.height {
            return None;
        }

        self.fb.get(self.at(x, y)).copied()
    }

    pub fn pixels(&self) -> &[Argb] {
        &self.fb
    }

    /// Number of [`DrawContext::fill_rect`] calls so far
    pub fn fills(&self) -> usize {
        self.fills
    }

    /// Number of [`DrawContext::commit`] calls so far
    pub fn commits(&self) -> usize {
        self.commits
    }

    /// Number of commits made while the full redraw hint was set
    pub fn redraw_commits(&self) -> usize {
        self.redraw_commits
    }

    pub fn full_redraw(&self) -> bool {
        self.full_redraw
    }

    fn at(&self, x: PixelSize, y: PixelSize) -> usize {
        y as usize * self.width as usize + x as usize
    }
}

impl DrawContext for Framebuffer {
    fn width(&self) -> PixelSize {
        self.width
    }

    fn height(&self) -> PixelSize {
        self.height
    }

    fn clear(&mut self, color: Argb) -> Result<(), SurfaceError> {
        self.fb.fill(color);
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
        self.fills += 1;

        let x1 = x.saturating_add(w).min(self.width);
        let y1 = y.saturating_add(h).min(self.height);

        for py in y..y1 {
            let row = self.at(x.min(x1), py);
            let end = self.at(x1, py);
            self.fb[row..end].fill(color);
        }

        Ok(())
    }

    fn commit(&mut self) -> Result<(), SurfaceError> {
        self.commits += 1;
        if self.full_redraw {
            self.redraw_commits += 1;
        }
        self.full_redraw = false;
        Ok(())
    }

    fn set_full_redraw(&mut self, full: bool) {
        self.full_redraw = full;
    }
}
