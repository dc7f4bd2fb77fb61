pub mod cell;
pub mod config;
pub mod draw;
pub mod engine;
pub mod events;
pub mod grid;
pub mod io;
pub mod render;
pub mod sim;

mod ext;

/// Pixel coordinates and sizes on a [`draw::DrawContext`]
pub type PixelSize = u32;

/// Packed `0xAARRGGBB` pixel value
pub type Argb = u32;

/// Side length of a cell, in pixels
pub const SCALE: PixelSize = 10;

/// Color of dead cells and of the cleared framebuffer
pub const BG_COLOR: Argb = 0x0;
