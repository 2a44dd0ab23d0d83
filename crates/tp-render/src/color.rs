use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: f64,
}

impl Color {
    pub const WHITE: Color = Color::rgb(255, 255, 255);
    pub const BLACK: Color = Color::rgb(0, 0, 0);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 1.0 }
    }

    pub const fn rgba(r: u8, g: u8, b: u8, a: f64) -> Self {
        Self { r, g, b, a }
    }

    pub fn hex(s: &str) -> Self {
        let s = s.strip_prefix('#').unwrap_or(s);
        let channel = |i: usize| s.get(i..i + 2).and_then(|h| u8::from_str_radix(h, 16).ok());
        Self { r: channel(0).unwrap_or(0), g: channel(2).unwrap_or(0), b: channel(4).unwrap_or(0), a: 1.0 }
    }

    /// Resolve a ROOT color index (`Color_t`).
    ///
    /// Indices 0-9 are the classic palette. The named wheels (`kRed` = 632,
    /// `kBlue` = 600, ...) accept `+1..+4` (darker) and `-1..-10` (lighter)
    /// offsets, approximated by scaling toward black or white.
    pub fn root(index: u16) -> Self {
        match index {
            0 | 10 => Self::WHITE,
            1 => Self::BLACK,
            2 => Self::hex("#ff0000"),
            3 => Self::hex("#00ff00"),
            4 => Self::hex("#0000ff"),
            5 => Self::hex("#ffff00"),
            6 => Self::hex("#ff00ff"),
            7 => Self::hex("#00ffff"),
            8 => Self::hex("#59d454"),
            9 => Self::hex("#5954d9"),
            11..=19 => {
                let v = 255 - (index - 10) as u8 * 20;
                Self::rgb(v, v, v)
            }
            _ => match wheel_base(index) {
                Some((base, offset)) => shade(base, offset),
                None => Self::BLACK,
            },
        }
    }

    pub const fn with_alpha(mut self, a: f64) -> Self {
        self.a = a;
        self
    }

    pub fn to_svg_fill(&self) -> String {
        if (self.a - 1.0).abs() < 1e-6 {
            format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
        } else {
            format!("rgba({},{},{},{:.3})", self.r, self.g, self.b, self.a)
        }
    }

    /// Linear interpolation between two colors (for colormaps).
    pub fn lerp(a: Color, b: Color, t: f64) -> Color {
        let t = t.clamp(0.0, 1.0);
        let mix = |x: u8, y: u8| (x as f64 * (1.0 - t) + y as f64 * t).round() as u8;
        Color { r: mix(a.r, b.r), g: mix(a.g, b.g), b: mix(a.b, b.b), a: a.a * (1.0 - t) + b.a * t }
    }
}

// ROOT color wheel anchors: (index, base color).
const WHEEL: &[(u16, &str)] = &[
    (400, "#ffff00"), // kYellow
    (416, "#00ff00"), // kGreen
    (432, "#00ffff"), // kCyan
    (600, "#0000ff"), // kBlue
    (616, "#ff00ff"), // kMagenta
    (632, "#ff0000"), // kRed
    (800, "#ffcc00"), // kOrange
    (820, "#ccff00"), // kSpring
    (840, "#00ffcc"), // kTeal
    (860, "#0099ff"), // kAzure
    (880, "#cc00ff"), // kViolet
    (900, "#ff0099"), // kPink
    (920, "#cccccc"), // kGray
];

fn wheel_base(index: u16) -> Option<(Color, i32)> {
    WHEEL.iter().find_map(|&(anchor, hex)| {
        let offset = index as i32 - anchor as i32;
        (-10..=4).contains(&offset).then(|| (Color::hex(hex), offset))
    })
}

fn shade(base: Color, offset: i32) -> Color {
    if offset >= 0 {
        Color::lerp(base, Color::BLACK, offset as f64 * 0.2)
    } else {
        Color::lerp(base, Color::WHITE, -offset as f64 * 0.09)
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_svg_fill())
    }
}

impl<'de> Deserialize<'de> for Color {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Ok(Color::hex(&s))
    }
}

impl Serialize for Color {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b))
    }
}

impl Default for Color {
    fn default() -> Self {
        Self::BLACK
    }
}

// --- kBird palette (ROOT default for COLZ) ---

const BIRD: [(f64, f64, f64); 9] = [
    (0.2082, 0.1664, 0.5293),
    (0.0592, 0.3599, 0.8684),
    (0.0780, 0.5041, 0.8385),
    (0.0232, 0.6419, 0.7914),
    (0.1802, 0.7178, 0.6425),
    (0.5301, 0.7492, 0.4662),
    (0.8186, 0.7328, 0.3499),
    (0.9956, 0.7862, 0.1968),
    (0.9764, 0.9832, 0.0539),
];

/// kBird colormap: 0.0 → deep blue, 1.0 → yellow.
pub fn bird(t: f64) -> Color {
    let t = t.clamp(0.0, 1.0) * (BIRD.len() - 1) as f64;
    let i = (t.floor() as usize).min(BIRD.len() - 2);
    let to_color =
        |(r, g, b): (f64, f64, f64)| Color::rgb((r * 255.0) as u8, (g * 255.0) as u8, (b * 255.0) as u8);
    Color::lerp(to_color(BIRD[i]), to_color(BIRD[i + 1]), t - i as f64)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hex_parsing() {
        let c = Color::hex("#1D4ED8");
        assert_eq!((c.r, c.g, c.b), (0x1D, 0x4E, 0xD8));
        assert_eq!(Color::hex("#12"), Color::rgb(0x12, 0, 0));
    }

    #[test]
    fn svg_fill_alpha() {
        let c = Color::rgb(29, 78, 216).with_alpha(0.5);
        assert_eq!(c.to_svg_fill(), "rgba(29,78,216,0.500)");
    }

    #[test]
    fn root_classic_indices() {
        assert_eq!(Color::root(1), Color::BLACK);
        assert_eq!(Color::root(2).to_svg_fill(), "#ff0000");
        assert_eq!(Color::root(4).to_svg_fill(), "#0000ff");
        assert_eq!(Color::root(632), Color::root(2));
    }

    #[test]
    fn root_wheel_offsets() {
        let red = Color::root(632);
        let dark = Color::root(634);
        let light = Color::root(628);
        assert!(dark.r < red.r);
        assert!(light.g > red.g);
        assert_eq!(Color::root(5000), Color::BLACK);
    }

    #[test]
    fn bird_endpoints() {
        let lo = bird(0.0);
        let hi = bird(1.0);
        assert!(lo.b > lo.r);
        assert!(hi.r > hi.b);
    }
}
