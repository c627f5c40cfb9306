/// Straight (non-premultiplied) RGBA8 color.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Rgba8 {
    /// Red channel.
    pub r: u8,
    /// Green channel.
    pub g: u8,
    /// Blue channel.
    pub b: u8,
    /// Alpha channel.
    pub a: u8,
}

impl Rgba8 {
    /// Opaque black, the canvas default fill.
    pub const BLACK: Self = Self::rgb(0, 0, 0);

    /// Opaque color from RGB channels.
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    /// Color with explicit alpha.
    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }
}

const NAMED: &[(&str, Rgba8)] = &[
    ("black", Rgba8::rgb(0, 0, 0)),
    ("white", Rgba8::rgb(255, 255, 255)),
    ("red", Rgba8::rgb(255, 0, 0)),
    ("green", Rgba8::rgb(0, 128, 0)),
    ("lime", Rgba8::rgb(0, 255, 0)),
    ("blue", Rgba8::rgb(0, 0, 255)),
    ("yellow", Rgba8::rgb(255, 255, 0)),
    ("cyan", Rgba8::rgb(0, 255, 255)),
    ("aqua", Rgba8::rgb(0, 255, 255)),
    ("magenta", Rgba8::rgb(255, 0, 255)),
    ("fuchsia", Rgba8::rgb(255, 0, 255)),
    ("gray", Rgba8::rgb(128, 128, 128)),
    ("grey", Rgba8::rgb(128, 128, 128)),
    ("silver", Rgba8::rgb(192, 192, 192)),
    ("maroon", Rgba8::rgb(128, 0, 0)),
    ("olive", Rgba8::rgb(128, 128, 0)),
    ("navy", Rgba8::rgb(0, 0, 128)),
    ("purple", Rgba8::rgb(128, 0, 128)),
    ("teal", Rgba8::rgb(0, 128, 128)),
    ("orange", Rgba8::rgb(255, 165, 0)),
    ("pink", Rgba8::rgb(255, 192, 203)),
    ("brown", Rgba8::rgb(165, 42, 42)),
    ("gold", Rgba8::rgb(255, 215, 0)),
    ("transparent", Rgba8::rgba(0, 0, 0, 0)),
];

/// Parse a CSS-like color literal.
///
/// Accepts `#rgb`, `#rgba`, `#rrggbb`, `#rrggbbaa`, `rgb(r, g, b)`, `rgba(r, g, b, a)` with
/// `a` in `0..=1`, and a basic set of named colors. Matching is case-insensitive.
pub fn parse_css_color(s: &str) -> Result<Rgba8, String> {
    let s = s.trim();
    if let Some(hex) = s.strip_prefix('#') {
        return parse_hex(hex);
    }

    let lower = s.to_ascii_lowercase();
    if let Some(args) = lower
        .strip_prefix("rgba(")
        .or_else(|| lower.strip_prefix("rgb("))
        .and_then(|rest| rest.strip_suffix(')'))
    {
        return parse_rgb_fn(args);
    }

    NAMED
        .iter()
        .find(|(name, _)| *name == lower)
        .map(|(_, c)| *c)
        .ok_or_else(|| format!("unrecognized color \"{s}\""))
}

fn parse_hex(s: &str) -> Result<Rgba8, String> {
    fn nibble(c: u8) -> Result<u8, String> {
        (c as char)
            .to_digit(16)
            .map(|d| d as u8)
            .ok_or_else(|| format!("invalid hex digit \"{}\"", c as char))
    }
    fn hex_byte(pair: &[u8]) -> Result<u8, String> {
        Ok(nibble(pair[0])? << 4 | nibble(pair[1])?)
    }

    let b = s.as_bytes();
    match b.len() {
        3 | 4 => {
            let expand = |c: u8| -> Result<u8, String> { Ok(nibble(c)? * 17) };
            let a = if b.len() == 4 { expand(b[3])? } else { 255 };
            Ok(Rgba8::rgba(expand(b[0])?, expand(b[1])?, expand(b[2])?, a))
        }
        6 | 8 => {
            let a = if b.len() == 8 { hex_byte(&b[6..8])? } else { 255 };
            Ok(Rgba8::rgba(
                hex_byte(&b[0..2])?,
                hex_byte(&b[2..4])?,
                hex_byte(&b[4..6])?,
                a,
            ))
        }
        _ => Err("hex color must be #RGB, #RGBA, #RRGGBB or #RRGGBBAA".to_owned()),
    }
}

fn parse_rgb_fn(args: &str) -> Result<Rgba8, String> {
    let parts: Vec<&str> = args.split(',').map(str::trim).collect();
    if parts.len() != 3 && parts.len() != 4 {
        return Err("rgb()/rgba() take 3 or 4 arguments".to_owned());
    }

    let channel = |p: &str| -> Result<u8, String> {
        let v: f64 = p
            .parse()
            .map_err(|_| format!("invalid color channel \"{p}\""))?;
        Ok(v.clamp(0.0, 255.0).round() as u8)
    };
    let a = match parts.get(3) {
        Some(p) => {
            let v: f64 = p.parse().map_err(|_| format!("invalid alpha \"{p}\""))?;
            (v.clamp(0.0, 1.0) * 255.0).round() as u8
        }
        None => 255,
    };
    Ok(Rgba8::rgba(
        channel(parts[0])?,
        channel(parts[1])?,
        channel(parts[2])?,
        a,
    ))
}

#[cfg(test)]
#[path = "../../tests/unit/assets/color.rs"]
mod tests;
