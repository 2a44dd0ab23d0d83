use crate::color::Color;
use crate::layout::margins::ndc_to_px;
use crate::attributes::*;
use crate::scene::{Series1d, Series2d, StatFields, StatsSpec};
use crate::svg::SvgCanvas;

/// Contents of one stats box.
#[derive(Debug, Clone)]
pub struct StatsBox {
    pub header: Option<String>,
    pub rows: Vec<(String, String)>,
    pub color: u16,
}

pub fn stats_box_1d(series: &Series1d, fields: &StatFields) -> StatsBox {
    let n = series.axis.nbins;
    let mut rows = Vec::new();
    if fields.entries {
        rows.push(("Entries".to_string(), series.entries.to_string()));
    }
    if fields.mean {
        rows.push(("Mean".to_string(), format_stat(series.mean)));
    }
    if fields.rms {
        rows.push(("Std Dev".to_string(), format_stat(series.std_dev)));
    }
    if fields.underflow {
        rows.push(("Underflow".to_string(), format_stat(series.contents.first().copied().unwrap_or(0.0))));
    }
    if fields.overflow {
        rows.push(("Overflow".to_string(), format_stat(series.contents.get(n + 1).copied().unwrap_or(0.0))));
    }
    if fields.integral {
        rows.push(("Integral".to_string(), format_stat(series.integral())));
    }
    StatsBox { header: fields.name.then(|| series.name.clone()), rows, color: series.color }
}

pub fn stats_box_2d(series: &Series2d, fields: &StatFields) -> StatsBox {
    let mut rows = Vec::new();
    if fields.entries {
        rows.push(("Entries".to_string(), series.entries.to_string()));
    }
    if fields.mean {
        rows.push(("Mean x".to_string(), format_stat(series.mean_x)));
        rows.push(("Mean y".to_string(), format_stat(series.mean_y)));
    }
    if fields.rms {
        rows.push(("Std Dev x".to_string(), format_stat(series.std_dev_x)));
        rows.push(("Std Dev y".to_string(), format_stat(series.std_dev_y)));
    }
    StatsBox { header: fields.name.then(|| series.name.clone()), rows, color: series.color }
}

/// Draw the boxes, the first in `spec`'s NDC rectangle and each following one
/// directly below the previous (`sames` stacking).
pub fn draw_stats(canvas: &mut SvgCanvas, spec: &StatsSpec, boxes: &[StatsBox], font_size: f64) {
    let (w, h) = (canvas.width, canvas.height);
    let ndc_h = (spec.y2 - spec.y1).abs();

    for (i, stats) in boxes.iter().enumerate() {
        let lines = stats.rows.len() + usize::from(stats.header.is_some());
        if lines == 0 {
            continue;
        }
        let top = spec.y1.max(spec.y2) - ndc_h * i as f64;
        let (x1, y1) = ndc_to_px(spec.x1.min(spec.x2), top, w, h);
        let (x2, y2) = ndc_to_px(spec.x1.max(spec.x2), top - ndc_h, w, h);
        let (bw, bh) = (x2 - x1, y2 - y1);

        let frame = BoxAttr::filled(Color::WHITE).with_border(Color::root(stats.color), 1.0);
        canvas.rect(x1, y1, bw, bh, &frame);

        let row_h = bh / lines as f64;
        let size = font_size.min(row_h * 0.85);
        let pad = 4.0;
        let mut row = 0;
        if let Some(header) = &stats.header {
            let style = TextAttr::sized(size).aligned(TextAlign::CENTER);
            let cy = y1 + row_h * 0.5;
            canvas.text(x1 + bw / 2.0, cy, header, &style);
            canvas.line(x1, y1 + row_h, x2, y1 + row_h, &LineAttr::solid(Color::BLACK, 0.5));
            row += 1;
        }

        let key_style = TextAttr::sized(size).aligned(TextAlign::LEFT_CENTER);
        let value_style = key_style.aligned(TextAlign::RIGHT_CENTER);
        for (key, value) in &stats.rows {
            let cy = y1 + row_h * (row as f64 + 0.5);
            canvas.text(x1 + pad, cy, key, &key_style);
            canvas.text(x2 - pad, cy, value, &value_style);
            row += 1;
        }
    }
}

/// Four significant digits, `%g` style (ROOT's default stat format).
pub fn format_stat(v: f64) -> String {
    if v == 0.0 || !v.is_finite() {
        return if v.is_nan() { "nan".into() } else if v == 0.0 { "0".into() } else { v.to_string() };
    }
    let exp = v.abs().log10().floor() as i32;
    if !(-4..4).contains(&exp) {
        let s = format!("{v:.3e}");
        return match s.split_once('e') {
            Some((mantissa, e)) => {
                let mantissa = trim_zeros(mantissa);
                let e: i32 = e.parse().unwrap_or(0);
                format!("{mantissa}e{}{:02}", if e < 0 { '-' } else { '+' }, e.abs())
            }
            None => s,
        };
    }
    let decimals = (3 - exp).max(0) as usize;
    trim_zeros(&format!("{v:.decimals$}")).to_string()
}

fn trim_zeros(s: &str) -> &str {
    if s.contains('.') { s.trim_end_matches('0').trim_end_matches('.') } else { s }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::{BinAxis, Draw1d};

    fn series() -> Series1d {
        Series1d {
            name: "h1".into(),
            title: String::new(),
            axis: BinAxis { nbins: 2, min: 0.0, max: 2.0 },
            contents: vec![1.0, 3.0, 4.0, 2.0],
            errors: vec![1.0; 4],
            entries: 10,
            mean: 1.0714285,
            std_dev: 0.4948,
            color: 4,
            line_width: 2.0,
            draw: Draw1d::Hist,
        }
    }

    #[test]
    fn stat_format() {
        assert_eq!(format_stat(0.0), "0");
        assert_eq!(format_stat(1.0714285), "1.071");
        assert_eq!(format_stat(250.0), "250");
        assert_eq!(format_stat(123456.0), "1.235e+05");
        assert_eq!(format_stat(-0.5), "-0.5");
        assert_eq!(format_stat(0.00001234), "1.234e-05");
    }

    #[test]
    fn emr_rows() {
        let fields = StatFields { entries: true, mean: true, rms: true, ..Default::default() };
        let b = stats_box_1d(&series(), &fields);
        assert!(b.header.is_none());
        let keys: Vec<_> = b.rows.iter().map(|(k, _)| k.as_str()).collect();
        assert_eq!(keys, ["Entries", "Mean", "Std Dev"]);
        assert_eq!(b.rows[0].1, "10");
    }

    #[test]
    fn flows_and_integral() {
        let fields = StatFields { name: true, underflow: true, overflow: true, integral: true, ..Default::default() };
        let b = stats_box_1d(&series(), &fields);
        assert_eq!(b.header.as_deref(), Some("h1"));
        assert_eq!(b.rows, vec![
            ("Underflow".to_string(), "1".to_string()),
            ("Overflow".to_string(), "2".to_string()),
            ("Integral".to_string(), "7".to_string()),
        ]);
    }

    #[test]
    fn boxes_stack_downward() {
        let spec = StatsSpec {
            fields: StatFields { entries: true, ..Default::default() },
            x1: 0.72,
            x2: 0.92,
            y1: 0.80,
            y2: 0.92,
        };
        let boxes = vec![stats_box_1d(&series(), &spec.fields); 2];
        let mut c = SvgCanvas::new(700.0, 500.0).unwrap();
        draw_stats(&mut c, &spec, &boxes, 11.0);
        let svg = c.finish_svg();
        // 0.92 -> 40px, second box starts at 0.80 -> 100px
        assert!(svg.contains(r#"y="40.00""#));
        assert!(svg.contains(r#"y="100.00""#));
    }
}
