pub use kurbo::{Affine, BezPath, Point, Rect};

/// Top/left placement in surface pixels.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Position {
    /// Distance from the top edge.
    pub top: i32,
    /// Distance from the left edge.
    pub left: i32,
}

/// Width/height of a drawn box in surface pixels.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Size {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

/// Axis-aligned box `{x, y, width, height}` in surface pixels.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Region {
    /// Left edge.
    pub x: i32,
    /// Top edge.
    pub y: i32,
    /// Box width.
    pub width: u32,
    /// Box height.
    pub height: u32,
}

impl Region {
    /// Build a region from a top/left position and a size.
    pub fn new(position: Position, size: Size) -> Self {
        Self {
            x: position.left,
            y: position.top,
            width: size.width,
            height: size.height,
        }
    }

    /// Top/left corner of the region.
    pub fn position(self) -> Position {
        Position {
            top: self.y,
            left: self.x,
        }
    }

    /// Extent of the region.
    pub fn size(self) -> Size {
        Size {
            width: self.width,
            height: self.height,
        }
    }

    /// Region as a floating-point rectangle.
    pub fn to_rect(self) -> Rect {
        Rect::new(
            f64::from(self.x),
            f64::from(self.y),
            f64::from(self.x) + f64::from(self.width),
            f64::from(self.y) + f64::from(self.height),
        )
    }
}

/// Parse the leading integer of a client-supplied value, `parseInt` style.
///
/// Leading whitespace and a sign are accepted, parsing stops at the first non-digit, so
/// `"100px"` yields `100` and `"12.7"` yields `12`. Returns `None` when no digit leads.
pub fn parse_leading_int(raw: &str) -> Option<i64> {
    let s = raw.trim_start();
    let (negative, digits) = match s.as_bytes().first() {
        Some(b'-') => (true, &s[1..]),
        Some(b'+') => (false, &s[1..]),
        _ => (false, s),
    };

    let end = digits
        .bytes()
        .position(|b| !b.is_ascii_digit())
        .unwrap_or(digits.len());
    if end == 0 {
        return None;
    }

    let mut value: i64 = 0;
    for b in digits[..end].bytes() {
        value = value.saturating_mul(10).saturating_add(i64::from(b - b'0'));
    }
    Some(if negative { -value } else { value })
}

/// Parse the leading decimal number of a value such as `"24px"` or `"1.5em"`.
///
/// Returns the number and the trimmed remainder (the unit suffix).
pub fn parse_leading_number(raw: &str) -> Option<(f64, &str)> {
    let s = raw.trim();
    let mut end = 0;
    let mut seen_digit = false;
    let mut seen_dot = false;
    for (i, c) in s.char_indices() {
        match c {
            '+' | '-' if i == 0 => {}
            '0'..='9' => seen_digit = true,
            '.' if !seen_dot => seen_dot = true,
            _ => break,
        }
        end = i + c.len_utf8();
    }
    if !seen_digit {
        return None;
    }
    let value: f64 = s[..end].parse().ok()?;
    value.is_finite().then(|| (value, s[end..].trim()))
}

/// Lenient coordinate: leading integer clamped to `i32`, or `default`.
pub fn coord_or(raw: &str, default: i32) -> i32 {
    parse_leading_int(raw)
        .map(|v| v.clamp(i64::from(i32::MIN), i64::from(i32::MAX)) as i32)
        .unwrap_or(default)
}

/// Lenient extent: leading positive integer, or `default` for missing, zero or negative values.
pub fn extent_or(raw: &str, default: u32) -> u32 {
    match parse_leading_int(raw) {
        Some(v) if v > 0 => v.min(i64::from(u32::MAX)) as u32,
        _ => default,
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
