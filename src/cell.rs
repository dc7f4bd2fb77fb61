use crate::Argb;

/// A packed `0xRRGGBB` color. The top byte is always zero.
#[derive(Debug, Default, PartialEq, Eq, Clone, Copy)]
pub struct Rgb(u32);

impl Rgb {
    pub const WHITE: Rgb = Rgb(0xFF_FF_FF);

    /// Build a color from a packed value. Anything above the low 24 bits is dropped.
    pub const fn new(packed: u32) -> Self {
        Self(packed & 0xFF_FF_FF)
    }

    pub const fn from_channels(r: u8, g: u8, b: u8) -> Self {
        Self((r as u32) << 16 | (g as u32) << 8 | b as u32)
    }

    pub const fn r(self) -> u8 {
        (self.0 >> 16) as u8
    }

    pub const fn g(self) -> u8 {
        (self.0 >> 8) as u8
    }

    pub const fn b(self) -> u8 {
        self.0 as u8
    }

    pub const fn packed(self) -> u32 {
        self.0
    }

    /// The color as a fully opaque framebuffer pixel
    pub const fn argb(self) -> Argb {
        0xFF << 24 | self.0
    }
}

/// One unit of the grid.
///
/// `flip_on` and `flip_off` are the pending transitions computed by the update engine. They are
/// never both set, and the render pass clears them as it applies them to `alive`. Only the render
/// pass writes `alive`.
#[derive(Debug, Default, PartialEq, Eq, Clone, Copy)]
pub struct Cell {
    pub(crate) alive: bool,
    pub(crate) flip_on: bool,
    pub(crate) flip_off: bool,
    pub(crate) color: Rgb,
}

impl Cell {
    pub fn is_alive(&self) -> bool {
        self.alive
    }

    /// Pending birth
    pub fn flip_on(&self) -> bool {
        self.flip_on
    }

    /// Pending death
    pub fn flip_off(&self) -> bool {
        self.flip_off
    }

    pub fn color(&self) -> Rgb {
        self.color
    }

    /// Check if the cell has to be repainted on the next render pass
    pub fn is_dirty(&self) -> bool {
        self.flip_on || self.flip_off
    }

    /// Queue a birth with the given color. Live cells and cells already queued to die are left
    /// untouched, so the two flags stay exclusive. Returns whether a birth was newly queued.
    pub(crate) fn mark_birth(&mut self, color: Rgb) -> bool {
        if self.alive || self.flip_off {
            return false;
        }

        let queued = !self.flip_on;
        self.flip_on = true;
        self.color = color;

        queued
    }

    /// Returns whether a death was newly queued
    pub(crate) fn mark_death(&mut self) -> bool {
        if !self.alive || self.flip_on || self.flip_off {
            return false;
        }

        self.flip_off = true;
        true
    }
}
