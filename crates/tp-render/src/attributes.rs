//! Drawing attributes in ROOT's terms: `TAttLine` style indices, `TAttText`
//! fonts and alignment codes, `TAttMarker` styles.

use crate::color::Color;

// ── Boxes ───────────────────────────────────────────────────────

/// Fill and border of rectangles and circles.
#[derive(Debug, Clone, Copy, Default)]
pub struct BoxAttr {
    pub fill: Option<Color>,
    /// Border color and width.
    pub border: Option<(Color, f64)>,
}

impl BoxAttr {
    pub fn filled(color: Color) -> Self {
        Self { fill: Some(color), border: None }
    }

    pub fn outlined(color: Color, width: f64) -> Self {
        Self { fill: None, border: Some((color, width)) }
    }

    pub fn with_border(mut self, color: Color, width: f64) -> Self {
        self.border = Some((color, width));
        self
    }
}

// ── Lines ───────────────────────────────────────────────────────

/// `TAttLine::SetLineStyle` index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LineKind {
    #[default]
    Solid,
    Dashed,
    Dotted,
    DashDotted,
}

impl LineKind {
    /// Unknown indices draw solid.
    pub fn from_root(style: u16) -> Self {
        match style {
            2 => Self::Dashed,
            3 => Self::Dotted,
            4 => Self::DashDotted,
            _ => Self::Solid,
        }
    }

    /// SVG `stroke-dasharray`, or `None` for solid lines.
    pub fn dash_array(self) -> Option<&'static str> {
        match self {
            Self::Solid => None,
            Self::Dashed => Some("6 3"),
            Self::Dotted => Some("2 2"),
            Self::DashDotted => Some("6 2 2 2"),
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct LineAttr {
    pub color: Color,
    pub width: f64,
    pub kind: LineKind,
}

impl Default for LineAttr {
    fn default() -> Self {
        Self::solid(Color::BLACK, 1.0)
    }
}

impl LineAttr {
    pub fn solid(color: Color, width: f64) -> Self {
        Self { color, width, kind: LineKind::Solid }
    }

    /// Line from ROOT color and style indices.
    pub fn root(color: u16, width: f64, style: u16) -> Self {
        Self { color: Color::root(color), width, kind: LineKind::from_root(style) }
    }

    pub fn with_kind(mut self, kind: LineKind) -> Self {
        self.kind = kind;
        self
    }
}

// ── Text ────────────────────────────────────────────────────────

/// ROOT font code `10 * face + precision`; only the face matters here.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RootFont(pub u16);

impl RootFont {
    /// Helvetica, ROOT's default text font.
    pub const HELVETICA: Self = Self(42);

    fn face(self) -> u16 {
        self.0 / 10
    }

    pub fn is_bold(self) -> bool {
        matches!(self.face(), 2 | 3 | 6 | 7 | 10 | 11)
    }

    pub fn is_italic(self) -> bool {
        matches!(self.face(), 1 | 3 | 5 | 7 | 9 | 11 | 15)
    }

    pub fn is_monospace(self) -> bool {
        (8..=11).contains(&self.face())
    }

    /// CSS font-family list for the face.
    pub fn family(self) -> &'static str {
        match self.face() {
            1..=3 | 13 => "Times New Roman, Liberation Serif, DejaVu Serif, serif",
            8..=11 => "Courier New, Liberation Mono, DejaVu Sans Mono, monospace",
            _ => "Helvetica, Arial, Liberation Sans, DejaVu Sans, sans-serif",
        }
    }
}

/// `TAttText::SetTextAlign` code: tens digit horizontal (1 left, 2 center,
/// 3 right), units digit vertical (1 bottom, 2 center, 3 top).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TextAlign(pub u8);

impl TextAlign {
    pub const LEFT_BOTTOM: Self = Self(11);
    pub const LEFT_CENTER: Self = Self(12);
    pub const CENTER: Self = Self(22);
    pub const CENTER_TOP: Self = Self(23);
    pub const RIGHT_BOTTOM: Self = Self(31);
    pub const RIGHT_CENTER: Self = Self(32);

    pub fn svg_anchor(self) -> &'static str {
        match self.0 / 10 {
            2 => "middle",
            3 => "end",
            _ => "start",
        }
    }

    pub fn svg_baseline(self) -> &'static str {
        match self.0 % 10 {
            2 => "central",
            3 => "hanging",
            _ => "auto",
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct TextAttr {
    /// Size in points.
    pub size: f64,
    pub color: Color,
    pub font: RootFont,
    pub align: TextAlign,
}

impl Default for TextAttr {
    fn default() -> Self {
        Self { size: 10.0, color: Color::BLACK, font: RootFont::HELVETICA, align: TextAlign::LEFT_BOTTOM }
    }
}

impl TextAttr {
    pub fn sized(size: f64) -> Self {
        Self { size, ..Default::default() }
    }

    pub fn aligned(mut self, align: TextAlign) -> Self {
        self.align = align;
        self
    }
}

// ── Markers ─────────────────────────────────────────────────────

/// `TAttMarker::SetMarkerStyle` index.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarkerKind {
    /// 1, a square dot of fixed size.
    Dot,
    /// 20
    FullCircle,
}

#[derive(Debug, Clone, Copy)]
pub struct MarkerAttr {
    pub kind: MarkerKind,
    /// Radius in points.
    pub size: f64,
    pub color: Color,
}

impl MarkerAttr {
    pub fn new(kind: MarkerKind, size: f64, color: Color) -> Self {
        Self { kind, size, color }
    }
}
