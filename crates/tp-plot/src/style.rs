//! Display style: stats box options and placement, legend geometry.
//!
//! ROOT keeps these in the process-wide `gStyle`; here they live in a
//! [`DisplayStyle`] value that the caller owns and passes to every helper.

use std::fmt;

use serde::{Deserialize, Serialize};
use tp_render::{StatFields, StatsSpec};

use crate::canvas::Canvas;
use crate::error::{PlotError, Result};

// ── Stats options ───────────────────────────────────────────────

/// Which statistics the stats box prints (`gStyle->SetOptStat`).
///
/// Accepts the letter form (`"nemr"`, `"emr"`, `"ou"`) and the integer form,
/// read digit by digit from the right as `n e m r u o i` (`111` is name,
/// entries and mean; `1111` adds the RMS). `0` or an empty string hides the
/// box.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct StatOptions {
    fields: StatFields,
}

/// Field order of the integer form, least significant digit first.
const DIGIT_ORDER: [char; 7] = ['n', 'e', 'm', 'r', 'u', 'o', 'i'];

impl StatOptions {
    pub fn hidden() -> Self {
        Self { fields: StatFields::default() }
    }

    pub fn parse(option: &str) -> Result<Self> {
        let option = option.trim();
        if option.is_empty() {
            return Ok(Self::hidden());
        }
        if option.chars().all(|c| c.is_ascii_digit()) {
            return Ok(Self::from_digits(option));
        }

        let mut fields = StatFields::default();
        for c in option.chars() {
            match c.to_ascii_lowercase() {
                'n' => fields.name = true,
                'e' => fields.entries = true,
                'm' => fields.mean = true,
                'r' => fields.rms = true,
                'u' => fields.underflow = true,
                'o' => fields.overflow = true,
                'i' => fields.integral = true,
                // skewness and kurtosis are accepted and not shown
                's' | 'k' => {}
                _ => return Err(PlotError::InvalidStatOption(option.to_string())),
            }
        }
        Ok(Self { fields })
    }

    fn from_digits(digits: &str) -> Self {
        let mut fields = StatFields::default();
        for (pos, d) in digits.chars().rev().enumerate() {
            if d == '0' {
                continue;
            }
            match DIGIT_ORDER.get(pos) {
                Some('n') => fields.name = true,
                Some('e') => fields.entries = true,
                Some('m') => fields.mean = true,
                Some('r') => fields.rms = true,
                Some('u') => fields.underflow = true,
                Some('o') => fields.overflow = true,
                Some('i') => fields.integral = true,
                _ => {}
            }
        }
        Self { fields }
    }

    pub fn fields(&self) -> StatFields {
        self.fields
    }

    pub fn is_hidden(&self) -> bool {
        self.fields.is_empty()
    }

    /// Letter form, `"0"` when hidden.
    pub fn to_letters(&self) -> String {
        if self.is_hidden() {
            return "0".to_string();
        }
        let f = &self.fields;
        [
            (f.name, 'n'),
            (f.entries, 'e'),
            (f.mean, 'm'),
            (f.rms, 'r'),
            (f.underflow, 'u'),
            (f.overflow, 'o'),
            (f.integral, 'i'),
        ]
        .iter()
        .filter_map(|(on, c)| on.then_some(*c))
        .collect()
    }
}

impl Default for StatOptions {
    /// ROOT's default, `1111`.
    fn default() -> Self {
        Self::from_digits("1111")
    }
}

impl fmt::Display for StatOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_letters())
    }
}

impl TryFrom<String> for StatOptions {
    type Error = PlotError;

    fn try_from(value: String) -> Result<Self> {
        Self::parse(&value)
    }
}

impl From<StatOptions> for String {
    fn from(value: StatOptions) -> Self {
        value.to_letters()
    }
}

// ── Style ───────────────────────────────────────────────────────

/// Legend placement and text, in NDC.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LegendStyle {
    pub x1: f64,
    pub y1: f64,
    pub x2: f64,
    pub y2: f64,
    pub border_size: u32,
    /// ROOT color index of the fill, transparent when unset.
    pub fill_color: Option<u16>,
    pub text_font: u16,
    pub text_size: f64,
}

impl Default for LegendStyle {
    fn default() -> Self {
        Self {
            x1: 0.70,
            y1: 0.32,
            x2: 0.94,
            y2: 0.53,
            border_size: 0,
            fill_color: None,
            text_font: 42,
            text_size: 0.035,
        }
    }
}

/// Explicit stats box rectangle in NDC.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NdcBox {
    pub x1: f64,
    pub x2: f64,
    pub y1: f64,
    pub y2: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplayStyle {
    pub stat_options: StatOptions,
    /// Top-right corner of the stats box.
    pub stat_x: f64,
    pub stat_y: f64,
    pub stat_w: f64,
    pub stat_h: f64,
    /// Overrides the anchored placement when set.
    pub stat_box: Option<NdcBox>,
    pub legend: LegendStyle,
}

impl Default for DisplayStyle {
    fn default() -> Self {
        Self {
            stat_options: StatOptions::default(),
            stat_x: 0.98,
            stat_y: 0.935,
            stat_w: 0.20,
            stat_h: 0.16,
            stat_box: None,
            legend: LegendStyle::default(),
        }
    }
}

impl DisplayStyle {
    /// Stats box for the next draw, `None` when hidden.
    pub fn stats_spec(&self) -> Option<StatsSpec> {
        if self.stat_options.is_hidden() {
            return None;
        }
        let fields = self.stat_options.fields();
        Some(match self.stat_box {
            Some(b) => StatsSpec { fields, x1: b.x1, x2: b.x2, y1: b.y1, y2: b.y2 },
            None => StatsSpec {
                fields,
                x1: self.stat_x - self.stat_w,
                x2: self.stat_x,
                y1: self.stat_y - self.stat_h,
                y2: self.stat_y,
            },
        })
    }
}

/// Reset the stats box to entries/mean/RMS anchored at (0.92, 0.92), or hide it.
pub fn set_stats_box(style: &mut DisplayStyle, show: bool) {
    style.stat_options = if show {
        StatOptions::from_digits("1110")
    } else {
        StatOptions::hidden()
    };
    style.stat_x = 0.92;
    style.stat_y = 0.92;
    style.stat_box = None;
}

/// Move the stats box to an explicit NDC rectangle showing name, entries and
/// mean (`111`).
///
/// The style keeps the placement for later draws and the box already on
/// `canvas`, if any, is moved and redisplayed.
pub fn draw_box(
    canvas: &mut Canvas,
    style: &mut DisplayStyle,
    x1: f64,
    x2: f64,
    y1: f64,
    y2: f64,
) -> Result<()> {
    style.stat_options = StatOptions::from_digits("111");
    style.stat_box = Some(NdcBox { x1, x2, y1, y2 });
    if canvas.scene().stats.is_some() {
        canvas.scene_mut().stats = style.stats_spec();
        canvas.display()?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn letters_and_digits_agree() {
        assert_eq!(StatOptions::parse("111").unwrap(), StatOptions::parse("nem").unwrap());
        assert_eq!(StatOptions::parse("1111").unwrap(), StatOptions::parse("nemr").unwrap());
        assert_eq!(StatOptions::parse("1110").unwrap().to_letters(), "emr");
        assert_eq!(StatOptions::parse("emr").unwrap().to_letters(), "emr");
    }

    #[test]
    fn zero_and_empty_hide() {
        assert!(StatOptions::parse("0").unwrap().is_hidden());
        assert!(StatOptions::parse("").unwrap().is_hidden());
        assert_eq!(StatOptions::hidden().to_letters(), "0");
    }

    #[test]
    fn error_digits_count_as_on() {
        // ROOT uses 2 for "with errors"
        let opt = StatOptions::parse("1220").unwrap();
        assert!(opt.fields().entries && opt.fields().mean && opt.fields().rms);
        assert!(!opt.fields().name);
    }

    #[test]
    fn unknown_letter_rejected() {
        assert!(matches!(StatOptions::parse("emx"), Err(PlotError::InvalidStatOption(_))));
    }

    #[test]
    fn set_stats_box_anchor() {
        let mut style = DisplayStyle::default();
        style.stat_box = Some(NdcBox { x1: 0.1, x2: 0.3, y1: 0.1, y2: 0.3 });
        set_stats_box(&mut style, true);
        assert_eq!(style.stat_options.to_letters(), "emr");
        let spec = style.stats_spec().unwrap();
        assert_relative_eq!(spec.x2, 0.92);
        assert_relative_eq!(spec.y2, 0.92);
        assert_relative_eq!(spec.x1, 0.72);

        set_stats_box(&mut style, false);
        assert!(style.stats_spec().is_none());
    }

    #[test]
    fn draw_box_on_empty_canvas_only_updates_style() {
        let mut canvas = Canvas::new("c1");
        let mut style = DisplayStyle::default();
        draw_box(&mut canvas, &mut style, 0.6, 0.9, 0.6, 0.9).unwrap();
        let spec = style.stats_spec().unwrap();
        assert_relative_eq!(spec.x1, 0.6);
        assert_relative_eq!(spec.y2, 0.9);
        assert!(spec.fields.name && spec.fields.entries && spec.fields.mean);
        assert!(!spec.fields.rms);
        assert!(canvas.displayed_svg().is_none());
    }

    #[test]
    fn style_from_yaml() {
        let style: DisplayStyle =
            serde_yaml_ng::from_str("stat_options: \"1111\"\nlegend:\n  text_size: 0.05\n").unwrap();
        assert_eq!(style.stat_options.to_letters(), "nemr");
        assert_relative_eq!(style.legend.text_size, 0.05);
        assert_relative_eq!(style.legend.x1, 0.70);
    }
}
