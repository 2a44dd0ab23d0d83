use std::fmt::Write as FmtWrite;

use crate::attributes::*;
use crate::color::Color;
use crate::text::{TextMetrics, measure_text};

/// An SVG element stored for deferred rendering.
#[derive(Debug, Clone)]
enum SvgElement {
    Rect { x: f64, y: f64, w: f64, h: f64, attr: BoxAttr },
    Line { x1: f64, y1: f64, x2: f64, y2: f64, attr: LineAttr },
    Polyline { points: Vec<(f64, f64)>, attr: LineAttr },
    Text { x: f64, y: f64, content: String, attr: TextAttr, rotate: Option<f64> },
    Circle { cx: f64, cy: f64, r: f64, attr: BoxAttr },
    Clipped { clip_id: String, inner: Box<SvgElement> },
}

/// Immediate-mode SVG canvas. Coordinates in points, origin top-left.
#[derive(Debug)]
pub struct SvgCanvas {
    pub width: f64,
    pub height: f64,
    elements: Vec<SvgElement>,
    defs: Vec<String>,
    clip_stack: Vec<String>,
    next_clip_id: usize,
}

impl SvgCanvas {
    pub fn new(width: f64, height: f64) -> crate::Result<Self> {
        if !(width > 0.0 && height > 0.0) {
            return Err(crate::RenderError::Layout(format!(
                "canvas size must be positive, got {width}x{height}"
            )));
        }
        Ok(Self {
            width,
            height,
            elements: Vec::new(),
            defs: Vec::new(),
            clip_stack: Vec::new(),
            next_clip_id: 0,
        })
    }

    // --- Drawing primitives ---

    pub fn rect(&mut self, x: f64, y: f64, w: f64, h: f64, attr: &BoxAttr) {
        self.push(SvgElement::Rect { x, y, w, h, attr: *attr });
    }

    pub fn line(&mut self, x1: f64, y1: f64, x2: f64, y2: f64, attr: &LineAttr) {
        self.push(SvgElement::Line { x1, y1, x2, y2, attr: *attr });
    }

    pub fn polyline(&mut self, points: &[(f64, f64)], attr: &LineAttr) {
        if points.len() < 2 {
            return;
        }
        self.push(SvgElement::Polyline { points: points.to_vec(), attr: *attr });
    }

    pub fn text(&mut self, x: f64, y: f64, content: &str, attr: &TextAttr) {
        self.push(SvgElement::Text { x, y, content: content.to_string(), attr: *attr, rotate: None });
    }

    pub fn text_rotated(&mut self, x: f64, y: f64, content: &str, attr: &TextAttr, angle: f64) {
        self.push(SvgElement::Text { x, y, content: content.to_string(), attr: *attr, rotate: Some(angle) });
    }

    pub fn circle(&mut self, cx: f64, cy: f64, r: f64, attr: &BoxAttr) {
        self.push(SvgElement::Circle { cx, cy, r, attr: *attr });
    }

    /// Vertical error bar without caps (ROOT's default `E` style).
    pub fn error_bar(&mut self, x: f64, y_lo: f64, y_hi: f64, attr: &LineAttr) {
        self.line(x, y_lo, x, y_hi, attr);
    }

    pub fn marker(&mut self, x: f64, y: f64, marker: &MarkerAttr) {
        let fill = BoxAttr::filled(marker.color);
        match marker.kind {
            MarkerKind::Dot => {
                let side = marker.size;
                self.rect(x - side / 2.0, y - side / 2.0, side, side, &fill);
            }
            MarkerKind::FullCircle => self.circle(x, y, marker.size, &fill),
        }
    }

    // --- Clip paths ---

    /// Clip every element pushed until the matching [`Self::pop_clip`].
    pub fn push_clip(&mut self, x: f64, y: f64, w: f64, h: f64) -> String {
        let id = format!("clip{}", self.next_clip_id);
        self.next_clip_id += 1;
        self.defs.push(format!(
            r#"<clipPath id="{id}"><rect x="{x:.2}" y="{y:.2}" width="{w:.2}" height="{h:.2}" /></clipPath>"#
        ));
        self.clip_stack.push(id.clone());
        id
    }

    pub fn pop_clip(&mut self) {
        self.clip_stack.pop();
    }

    pub fn measure_text(&self, content: &str, attr: &TextAttr) -> TextMetrics {
        measure_text(content, attr)
    }

    fn push(&mut self, elem: SvgElement) {
        let elem = match self.clip_stack.last() {
            Some(id) => SvgElement::Clipped { clip_id: id.clone(), inner: Box::new(elem) },
            None => elem,
        };
        self.elements.push(elem);
    }

    pub fn element_count(&self) -> usize {
        self.elements.len()
    }

    pub fn finish_svg(&self) -> String {
        let mut out = String::with_capacity(32 * 1024);
        let _ = writeln!(
            out,
            r#"<svg xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}" viewBox="0 0 {w} {h}">"#,
            w = self.width,
            h = self.height,
        );

        if !self.defs.is_empty() {
            out.push_str("<defs>\n");
            for d in &self.defs {
                out.push_str(d);
                out.push('\n');
            }
            out.push_str("</defs>\n");
        }

        let _ = writeln!(
            out,
            r#"<rect width="{}" height="{}" fill="{}" />"#,
            self.width,
            self.height,
            Color::WHITE.to_svg_fill()
        );

        for elem in &self.elements {
            render_element(&mut out, elem, None);
        }

        out.push_str("</svg>\n");
        out
    }
}

fn render_element(out: &mut String, elem: &SvgElement, clip: Option<&str>) {
    let clip_attr = clip.map(|id| format!(r#" clip-path="url(#{id})""#)).unwrap_or_default();
    match elem {
        SvgElement::Rect { x, y, w, h, attr } => {
            let _ = write!(
                out,
                r#"<rect x="{x:.2}" y="{y:.2}" width="{w:.2}" height="{h:.2}"{clip_attr}"#
            );
            write_box_attrs(out, attr);
            out.push_str(" />\n");
        }
        SvgElement::Line { x1, y1, x2, y2, attr } => {
            let _ = write!(
                out,
                r#"<line x1="{x1:.2}" y1="{y1:.2}" x2="{x2:.2}" y2="{y2:.2}"{clip_attr}"#
            );
            write_line_attrs(out, attr);
            out.push_str(" />\n");
        }
        SvgElement::Polyline { points, attr } => {
            out.push_str(r#"<polyline points=""#);
            for (i, (x, y)) in points.iter().enumerate() {
                if i > 0 {
                    out.push(' ');
                }
                let _ = write!(out, "{x:.2},{y:.2}");
            }
            let _ = write!(out, r#"" fill="none"{clip_attr}"#);
            write_line_attrs(out, attr);
            out.push_str(" />\n");
        }
        SvgElement::Text { x, y, content, attr, rotate } => {
            let _ = write!(out, r#"<text x="{x:.2}" y="{y:.2}""#);
            let _ = write!(out, r#" font-family="{}" font-size="{:.1}""#, attr.font.family(), attr.size);
            let _ = write!(out, r#" fill="{}""#, attr.color.to_svg_fill());
            let _ = write!(out, r#" text-anchor="{}""#, attr.align.svg_anchor());
            let _ = write!(out, r#" dominant-baseline="{}""#, attr.align.svg_baseline());
            if attr.font.is_bold() {
                out.push_str(r#" font-weight="bold""#);
            }
            if attr.font.is_italic() {
                out.push_str(r#" font-style="italic""#);
            }
            if let Some(angle) = rotate {
                let _ = write!(out, r#" transform="rotate({angle:.1},{x:.2},{y:.2})""#);
            }
            out.push_str(&clip_attr);
            out.push('>');
            escape_into(out, content);
            out.push_str("</text>\n");
        }
        SvgElement::Circle { cx, cy, r, attr } => {
            let _ = write!(out, r#"<circle cx="{cx:.2}" cy="{cy:.2}" r="{r:.2}"{clip_attr}"#);
            write_box_attrs(out, attr);
            out.push_str(" />\n");
        }
        SvgElement::Clipped { clip_id, inner } => render_element(out, inner, Some(clip_id)),
    }
}

fn escape_into(out: &mut String, content: &str) {
    for ch in content.chars() {
        match ch {
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '&' => out.push_str("&amp;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(ch),
        }
    }
}

fn write_box_attrs(out: &mut String, attr: &BoxAttr) {
    match &attr.fill {
        Some(fill) => {
            let _ = write!(out, r#" fill="{}""#, fill.to_svg_fill());
        }
        None => out.push_str(r#" fill="none""#),
    }
    if let Some((color, width)) = &attr.border {
        let _ = write!(out, r#" stroke="{}" stroke-width="{width:.2}""#, color.to_svg_fill());
    }
}

fn write_line_attrs(out: &mut String, attr: &LineAttr) {
    let _ = write!(out, r#" stroke="{}""#, attr.color.to_svg_fill());
    let _ = write!(out, r#" stroke-width="{:.2}""#, attr.width);
    if let Some(dash) = attr.kind.dash_array() {
        let _ = write!(out, r#" stroke-dasharray="{dash}""#);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_canvas() {
        let c = SvgCanvas::new(100.0, 50.0).unwrap();
        let svg = c.finish_svg();
        assert!(svg.contains("width=\"100\""));
        assert!(svg.contains("height=\"50\""));
        assert!(svg.ends_with("</svg>\n"));
    }

    #[test]
    fn rejects_degenerate_size() {
        assert!(SvgCanvas::new(0.0, 50.0).is_err());
    }

    #[test]
    fn clipped_elements_reference_clip() {
        let mut c = SvgCanvas::new(200.0, 100.0).unwrap();
        let id = c.push_clip(10.0, 10.0, 50.0, 50.0);
        c.line(0.0, 0.0, 100.0, 100.0, &LineAttr::default());
        c.pop_clip();
        c.line(0.0, 0.0, 1.0, 1.0, &LineAttr::default());
        let svg = c.finish_svg();
        assert!(svg.contains(&format!("<clipPath id=\"{id}\">")));
        assert_eq!(svg.matches(&format!("url(#{id})")).count(), 1);
    }

    #[test]
    fn text_is_escaped() {
        let mut c = SvgCanvas::new(200.0, 100.0).unwrap();
        c.text(10.0, 20.0, "wallv > 200 && MuGamma", &TextAttr::default());
        let svg = c.finish_svg();
        assert!(svg.contains("wallv &gt; 200 &amp;&amp; MuGamma"));
    }

    #[test]
    fn root_attributes_reach_svg() {
        let mut c = SvgCanvas::new(200.0, 100.0).unwrap();
        c.line(0.0, 0.0, 10.0, 0.0, &LineAttr::root(4, 2.0, 2));
        let bold = TextAttr { font: RootFont(62), ..TextAttr::sized(12.0).aligned(TextAlign::CENTER_TOP) };
        c.text(50.0, 20.0, "PDK", &bold);
        c.marker(5.0, 5.0, &MarkerAttr::new(MarkerKind::Dot, 1.0, Color::BLACK));
        let svg = c.finish_svg();
        assert!(svg.contains(r#"stroke-dasharray="6 3""#));
        assert!(svg.contains(r#"font-weight="bold""#));
        assert!(svg.contains(r#"text-anchor="middle" dominant-baseline="hanging""#));
        assert!(svg.contains(r#"<rect x="4.50" y="4.50" width="1.00" height="1.00""#));
    }
}
