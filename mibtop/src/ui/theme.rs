//! Shared UI theme constants.

use ratatui::style::Color;

// One color per plotted line, reused modulo the palette length
pub const PALETTE: [Color; 10] = [
    Color::Blue,
    Color::Red,
    Color::Green,
    Color::Rgb(128, 0, 128), // purple
    Color::Rgb(255, 165, 0), // orange
    Color::Rgb(0, 128, 128), // teal
    Color::Magenta,
    Color::Rgb(165, 42, 42), // brown
    Color::Cyan,
    Color::LightGreen, // lime
];

pub fn series_color(i: usize) -> Color {
    PALETTE[i % PALETTE.len()]
}

pub const CURSOR_BG: Color = Color::Rgb(60, 60, 70);
