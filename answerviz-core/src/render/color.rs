#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Rgba8 {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba8 {
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub const fn with_alpha(self, a: u8) -> Self {
        Self { a, ..self }
    }
}

/// `#rgb`, `#rrggbb` or `#rrggbbaa`. Anything else is `None`.
pub fn parse_css_color(s: &str) -> Option<Rgba8> {
    let hex = s.trim().strip_prefix('#')?;
    if !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
        return None;
    }

    let byte = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).ok();
    let nibble = |i: usize| u8::from_str_radix(&hex[i..i + 1], 16).ok().map(|v| v * 17);

    match hex.len() {
        3 => Some(Rgba8::new(nibble(0)?, nibble(1)?, nibble(2)?, 255)),
        6 => Some(Rgba8::new(byte(0)?, byte(2)?, byte(4)?, 255)),
        8 => Some(Rgba8::new(byte(0)?, byte(2)?, byte(4)?, byte(6)?)),
        _ => None,
    }
}

pub(crate) fn color_or(s: &str, fallback: &str) -> Rgba8 {
    parse_css_color(s)
        .or_else(|| parse_css_color(fallback))
        .unwrap_or(Rgba8::new(0, 0, 0, 255))
}

#[cfg(test)]
#[path = "../../tests/unit/render/color.rs"]
mod tests;
