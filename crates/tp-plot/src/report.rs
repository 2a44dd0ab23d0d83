//! Efficiency and background-rejection printouts.
//!
//! Both reports count events inside the fiducial volume and express a
//! selection as a percentage of one or more reference counts.

use std::fmt;
use std::io::{self, Write};

use serde::{Deserialize, Serialize};
use tp_tree::{Dataset, count_entries};

use crate::error::{PlotError, Result};

/// Cuts and names the reports are phrased in.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportConfig {
    /// Fiducial volume cut every total is counted under.
    pub fiducial: String,
    /// Signal category, conjoined with `fiducial`.
    pub signal: String,
    /// Name of the signal sample in messages.
    pub sample_name: String,
    /// Name of the signal category in messages.
    pub signal_name: String,
    /// Name of the background sample in messages.
    pub background_name: String,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            fiducial: "wallv > 200".into(),
            signal: "MuGamma".into(),
            sample_name: "PDK".into(),
            signal_name: "MuGamma".into(),
            background_name: "atm nu MC".into(),
        }
    }
}

impl ReportConfig {
    fn signal_cut(&self) -> String {
        conjoin(&self.fiducial, &self.signal)
    }
}

fn conjoin(a: &str, b: &str) -> String {
    match (a.trim().is_empty(), b.trim().is_empty()) {
        (true, _) => b.to_string(),
        (_, true) => a.to_string(),
        _ => format!("{a} && {b}"),
    }
}

/// `100 * n / total` rounded to two decimals, halves to even.
///
/// Rounds the exact binary value of the ratio, so `1/800` (`0.125`) gives
/// `0.12` while `1/3` gives `33.33`.
pub fn percent(n: u64, total: u64) -> f64 {
    let x = 100.0 * n as f64 / total as f64;
    let scaled = x * 100.0;
    // x * 100 == scaled + residual exactly
    let residual = x.mul_add(100.0, -scaled);
    let rounded = if (scaled - scaled.trunc()).abs() == 0.5 {
        if residual > 0.0 {
            scaled.ceil()
        } else if residual < 0.0 {
            scaled.floor()
        } else {
            scaled.round_ties_even()
        }
    } else {
        scaled.round()
    };
    rounded / 100.0
}

/// Percentage with at least one decimal: `25.0`, `62.5`, `33.33`.
fn fmt_percent(value: f64) -> String {
    if value.fract() == 0.0 { format!("{value:.1}") } else { format!("{value}") }
}

fn ratio(n: u64, total: u64) -> String {
    format!("{n}/{total} = {}%", fmt_percent(percent(n, total)))
}

fn nonzero(total: u64, what: &str) -> Result<u64> {
    if total == 0 {
        return Err(PlotError::ZeroDenominator { what: what.to_string() });
    }
    Ok(total)
}

fn given_sample(sample: Option<&str>) -> Option<&str> {
    sample.filter(|s| !s.trim().is_empty())
}

/// One printed line and the count it divides by.
struct Line {
    text: String,
    denominator: Option<(u64, String)>,
}

impl Line {
    fn plain(text: String) -> Self {
        Self { text, denominator: None }
    }

    fn ratio(text: String, total: u64, what: impl Into<String>) -> Self {
        Self { text, denominator: Some((total, what.into())) }
    }
}

/// Write `lines` in order, stopping at the first one whose denominator is zero.
fn write_lines(out: &mut impl Write, lines: &[Line]) -> Result<()> {
    for line in lines {
        if let Some((total, what)) = &line.denominator {
            nonzero(*total, what)?;
        }
        writeln!(out, "{}", line.text)?;
    }
    Ok(())
}

fn display_lines(f: &mut fmt::Formatter<'_>, lines: &[Line]) -> fmt::Result {
    lines.iter().try_for_each(|l| writeln!(f, "{}", l.text))
}

fn print_lines(lines: &[Line]) -> Result<()> {
    let mut stdout = io::stdout().lock();
    write_lines(&mut stdout, lines)?;
    stdout.flush()?;
    Ok(())
}

// ── Efficiency ──────────────────────────────────────────────────

/// Signal efficiency of one selection.
#[derive(Debug, Clone, PartialEq)]
pub struct EfficiencyReport {
    /// Events inside the fiducial volume.
    pub total: u64,
    /// Signal-category events inside the fiducial volume.
    pub total_signal: u64,
    /// Events passing the selection.
    pub selected: u64,
    /// Events of the reference sample, when one was given.
    pub sample_total: Option<u64>,
    pub sample_name: String,
    pub signal_name: String,
}

impl EfficiencyReport {
    pub fn efficiency(&self) -> f64 {
        percent(self.selected, self.total)
    }

    pub fn signal_efficiency(&self) -> f64 {
        percent(self.selected, self.total_signal)
    }

    pub fn sample_efficiency(&self) -> Option<f64> {
        self.sample_total.map(|t| percent(self.selected, t))
    }

    fn lines(&self) -> Vec<Line> {
        let mut lines = vec![
            Line::plain(format!("Total number of {} events inside true FV is {}.", self.sample_name, self.total)),
            Line::plain(format!(
                "Total number of {} events inside true FV is {}.",
                self.signal_name, self.total_signal
            )),
            Line::ratio(
                format!("Efficiency after this cut is: {}.", ratio(self.selected, self.total)),
                self.total,
                "the fiducial volume",
            ),
            Line::ratio(
                format!(
                    "With Respect to {}s inside FV: {}.",
                    self.signal_name,
                    ratio(self.selected, self.total_signal)
                ),
                self.total_signal,
                format!("{} events in the fiducial volume", self.signal_name),
            ),
        ];
        if let Some(t) = self.sample_total {
            lines.push(Line::ratio(
                format!("With Respect to this sample inside FV: {}.", ratio(self.selected, t)),
                t,
                "the reference sample",
            ));
        }
        lines
    }
}

impl fmt::Display for EfficiencyReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        display_lines(f, &self.lines())
    }
}

/// Count the efficiency of `selection` on a signal `dataset` and print it.
///
/// `sample`, when given and not blank, is a further cut whose count is used as
/// an extra denominator.
pub fn report_efficiency(
    dataset: &Dataset,
    selection: &str,
    sample: Option<&str>,
    config: &ReportConfig,
) -> Result<EfficiencyReport> {
    let total = count_entries(dataset, &config.fiducial)?;
    let total_signal = count_entries(dataset, &config.signal_cut())?;
    let selected = count_entries(dataset, selection)?;
    let sample_total = given_sample(sample).map(|cut| count_entries(dataset, cut)).transpose()?;

    let report = EfficiencyReport {
        total,
        total_signal,
        selected,
        sample_total,
        sample_name: config.sample_name.clone(),
        signal_name: config.signal_name.clone(),
    };
    print_lines(&report.lines())?;
    log::debug!("efficiency of '{selection}': {}%", report.efficiency());
    Ok(report)
}

// ── Rejection ───────────────────────────────────────────────────

/// Background rejection of one selection.
#[derive(Debug, Clone, PartialEq)]
pub struct RejectionReport {
    /// Events inside the fiducial volume.
    pub total: u64,
    /// Events passing the selection.
    pub selected: u64,
    pub sample_total: Option<u64>,
    pub background_name: String,
}

impl RejectionReport {
    pub fn rejection(&self) -> f64 {
        percent(self.selected, self.total)
    }

    pub fn sample_rejection(&self) -> Option<f64> {
        self.sample_total.map(|t| percent(self.selected, t))
    }

    fn lines(&self) -> Vec<Line> {
        let mut lines = vec![
            Line::plain(format!(
                "Total number of {} events inside true FV is {}.",
                self.background_name, self.total
            )),
            Line::ratio(
                format!("Rejection after this cut is {}.", ratio(self.selected, self.total)),
                self.total,
                "the fiducial volume",
            ),
        ];
        if let Some(t) = self.sample_total {
            lines.push(Line::ratio(
                format!("Rejection with respect to this sample inside FV: {}.", ratio(self.selected, t)),
                t,
                "the reference sample",
            ));
        }
        lines
    }
}

impl fmt::Display for RejectionReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        display_lines(f, &self.lines())
    }
}

/// Count how much of a background `dataset` survives `selection` and print it.
pub fn report_rejection(
    dataset: &Dataset,
    selection: &str,
    sample: Option<&str>,
    config: &ReportConfig,
) -> Result<RejectionReport> {
    let total = count_entries(dataset, &config.fiducial)?;
    let selected = count_entries(dataset, selection)?;
    let sample_total = given_sample(sample).map(|cut| count_entries(dataset, cut)).transpose()?;

    let report = RejectionReport {
        total,
        selected,
        sample_total,
        background_name: config.background_name.clone(),
    };
    print_lines(&report.lines())?;
    log::debug!("rejection of '{selection}': {}%", report.rejection());
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn percent_formatting() {
        assert_eq!(fmt_percent(percent(25, 100)), "25.0");
        assert_eq!(fmt_percent(percent(25, 40)), "62.5");
        assert_eq!(fmt_percent(percent(1, 3)), "33.33");
        assert_eq!(fmt_percent(percent(2, 3)), "66.67");
        assert_eq!(fmt_percent(percent(0, 7)), "0.0");
        assert_eq!(fmt_percent(percent(7, 7)), "100.0");
    }

    #[test]
    fn percent_halves_round_to_even() {
        assert_eq!(fmt_percent(percent(1, 800)), "0.12");
        assert_eq!(fmt_percent(percent(5, 8000)), "0.06");
        assert_eq!(fmt_percent(percent(3, 800)), "0.38");
        // 1.005 is stored below the half, so it rounds down
        assert_eq!(fmt_percent(percent(201, 20000)), "1.0");
    }

    #[test]
    fn conjoin_skips_blanks() {
        assert_eq!(conjoin("wallv > 200", "MuGamma"), "wallv > 200 && MuGamma");
        assert_eq!(conjoin("", "MuGamma"), "MuGamma");
        assert_eq!(conjoin("wallv > 200", " "), "wallv > 200");
    }

    #[test]
    fn efficiency_text() {
        let report = EfficiencyReport {
            total: 100,
            total_signal: 40,
            selected: 25,
            sample_total: None,
            sample_name: "PDK".into(),
            signal_name: "MuGamma".into(),
        };
        assert_eq!(
            report.to_string(),
            "Total number of PDK events inside true FV is 100.\n\
             Total number of MuGamma events inside true FV is 40.\n\
             Efficiency after this cut is: 25/100 = 25.0%.\n\
             With Respect to MuGammas inside FV: 25/40 = 62.5%.\n"
        );
    }

    #[test]
    fn rejection_text_with_sample() {
        let report = RejectionReport {
            total: 100,
            selected: 10,
            sample_total: Some(30),
            background_name: "atm nu MC".into(),
        };
        assert_eq!(
            report.to_string(),
            "Total number of atm nu MC events inside true FV is 100.\n\
             Rejection after this cut is 10/100 = 10.0%.\n\
             Rejection with respect to this sample inside FV: 10/30 = 33.33%.\n"
        );
        assert_eq!(report.sample_rejection(), Some(33.33));
    }

    #[test]
    fn totals_print_before_empty_signal_count() {
        let report = EfficiencyReport {
            total: 100,
            total_signal: 0,
            selected: 25,
            sample_total: None,
            sample_name: "PDK".into(),
            signal_name: "MuGamma".into(),
        };
        let mut out = Vec::new();
        let err = write_lines(&mut out, &report.lines()).unwrap_err();
        assert!(matches!(err, PlotError::ZeroDenominator { ref what } if what.starts_with("MuGamma")));
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "Total number of PDK events inside true FV is 100.\n\
             Total number of MuGamma events inside true FV is 0.\n\
             Efficiency after this cut is: 25/100 = 25.0%.\n"
        );
    }

    #[test]
    fn rejection_prints_total_before_empty_sample() {
        let report = RejectionReport {
            total: 100,
            selected: 10,
            sample_total: Some(0),
            background_name: "atm nu MC".into(),
        };
        let mut out = Vec::new();
        let err = write_lines(&mut out, &report.lines()).unwrap_err();
        assert!(matches!(err, PlotError::ZeroDenominator { ref what } if what == "the reference sample"));
        assert_eq!(String::from_utf8(out).unwrap().lines().count(), 2);
    }

    #[test]
    fn empty_fiducial_volume() {
        let ds = Dataset::from_columns("h1", [("wallv", vec![10.0, 20.0]), ("MuGamma", vec![1.0, 0.0])])
            .unwrap();
        let err = report_rejection(&ds, "", None, &ReportConfig::default()).unwrap_err();
        assert!(matches!(err, PlotError::ZeroDenominator { ref what } if what.contains("fiducial")));
        let err = report_efficiency(&ds, "", None, &ReportConfig::default()).unwrap_err();
        assert!(matches!(err, PlotError::ZeroDenominator { .. }));
    }
}
