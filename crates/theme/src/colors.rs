/// 8-bit RGB colour.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const WHITE:  Self = Self { r: 0xcd, g: 0xd6, b: 0xf4 }; // #cdd6f4
    pub const PURPLE: Self = Self { r: 0x80, g: 0x00, b: 0x80 }; // #800080
    pub const GREY:   Self = Self { r: 0xa6, g: 0xad, b: 0xc8 }; // #a6adc8
    pub const VIOLET: Self = Self { r: 0xcb, g: 0xa6, b: 0xf7 }; // #cba6f7
    pub const YELLOW: Self = Self { r: 0xf9, g: 0xe2, b: 0xaf }; // #f9e2af

    /// Parse a CSS-style hex color string (`#RRGGBB` or `#RGB`).
    pub fn from_hex(hex: &str) -> Option<Self> {
        let hex = hex.trim().trim_start_matches('#');
        if !hex.is_ascii() {
            return None;
        }

        let byte = |s: &str| -> Option<u8> { u8::from_str_radix(s, 16).ok() };

        match hex.len() {
            6 => Some(Self {
                r: byte(&hex[0..2])?,
                g: byte(&hex[2..4])?,
                b: byte(&hex[4..6])?,
            }),
            // #RGB shorthand: each nibble doubled.
            3 => Some(Self {
                r: byte(&hex[0..1])? * 0x11,
                g: byte(&hex[1..2])? * 0x11,
                b: byte(&hex[2..3])? * 0x11,
            }),
            _ => None,
        }
    }
}

impl From<Color> for ratatui::style::Color {
    fn from(c: Color) -> Self {
        Self::Rgb(c.r, c.g, c.b)
    }
}
