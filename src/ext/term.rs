use crossterm::style::Color;

use crate::Argb;

pub trait ArgbColorExt {
    fn to_term_color(self) -> Color;
}

/// The alpha byte is ignored, terminals have nothing to blend against
impl ArgbColorExt for Argb {
    fn to_term_color(self) -> Color {
        Color::Rgb {
            r: (self >> 16) as u8,
            g: (self >> 8) as u8,
            b: self as u8,
        }
    }
}
