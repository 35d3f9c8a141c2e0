use crate::error::{BackdropError, Result};
use std::fmt;

/// 8-bit RGB color with a floating-point alpha, matching CSS `rgba()`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: f32,
}

impl Rgba {
    pub const WHITE: Rgba = Rgba::rgb(255, 255, 255);
    pub const BLACK: Rgba = Rgba::rgb(0, 0, 0);
    pub const TRANSPARENT: Rgba = Rgba::new(0, 0, 0, 0.0);

    pub const fn new(r: u8, g: u8, b: u8, a: f32) -> Self {
        Self { r, g, b, a }
    }

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self::new(r, g, b, 1.0)
    }

    pub fn with_alpha(self, a: f32) -> Self {
        Self { a, ..self }
    }

    /// Parse `#rgb` or `#rrggbb` (leading `#` optional).
    pub fn from_hex(hex: &str) -> Result<Self> {
        let digits = hex.trim().trim_start_matches('#');
        let expanded: String = match digits.len() {
            3 => digits.chars().flat_map(|c| [c, c]).collect(),
            6 => digits.to_string(),
            _ => return Err(BackdropError::InvalidColor(hex.to_string())),
        };
        let n = u32::from_str_radix(&expanded, 16)
            .map_err(|_| BackdropError::InvalidColor(hex.to_string()))?;
        Ok(Self::rgb(
            ((n >> 16) & 0xff) as u8,
            ((n >> 8) & 0xff) as u8,
            (n & 0xff) as u8,
        ))
    }

    /// HSL to RGB; `h` in degrees, `s` and `l` in [0, 1].
    pub fn from_hsl(h: f32, s: f32, l: f32) -> Self {
        let h = h.rem_euclid(360.0) / 360.0;
        let s = s.clamp(0.0, 1.0);
        let l = l.clamp(0.0, 1.0);
        if s == 0.0 {
            let v = (l * 255.0).round() as u8;
            return Self::rgb(v, v, v);
        }
        let q = if l < 0.5 { l * (1.0 + s) } else { l + s - l * s };
        let p = 2.0 * l - q;
        let channel = |t: f32| {
            let t = t.rem_euclid(1.0);
            let v = if t < 1.0 / 6.0 {
                p + (q - p) * 6.0 * t
            } else if t < 0.5 {
                q
            } else if t < 2.0 / 3.0 {
                p + (q - p) * (2.0 / 3.0 - t) * 6.0
            } else {
                p
            };
            (v * 255.0).round().clamp(0.0, 255.0) as u8
        };
        Self::rgb(
            channel(h + 1.0 / 3.0),
            channel(h),
            channel(h - 1.0 / 3.0),
        )
    }

    /// Channel-wise linear blend; alpha is blended too.
    pub fn mix(self, other: Rgba, t: f32) -> Self {
        let t = t.clamp(0.0, 1.0);
        let ch = |a: u8, b: u8| (a as f32 + (b as f32 - a as f32) * t).round() as u8;
        Self {
            r: ch(self.r, other.r),
            g: ch(self.g, other.g),
            b: ch(self.b, other.b),
            a: self.a + (other.a - self.a) * t,
        }
    }
}

impl fmt::Display for Rgba {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "rgba({},{},{},{:.3})", self.r, self.g, self.b, self.a)
    }
}

/// Parse a list of hex stops. Invalid entries are an error.
pub fn parse_palette<S: AsRef<str>>(stops: &[S]) -> Result<Vec<Rgba>> {
    if stops.is_empty() {
        return Err(BackdropError::EmptyPalette);
    }
    stops.iter().map(|s| Rgba::from_hex(s.as_ref())).collect()
}

/// Like [`parse_palette`] but never fails: bad stops are skipped and an
/// empty result falls back to white.
pub fn palette_or_white<S: AsRef<str>>(stops: &[S]) -> Vec<Rgba> {
    let parsed: Vec<Rgba> = stops
        .iter()
        .filter_map(|s| match Rgba::from_hex(s.as_ref()) {
            Ok(c) => Some(c),
            Err(e) => {
                log::warn!("skipping palette stop: {e}");
                None
            }
        })
        .collect();
    if parsed.is_empty() {
        vec![Rgba::WHITE]
    } else {
        parsed
    }
}
