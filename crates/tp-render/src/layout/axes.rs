/// Axis range with tick generation and data→pixel mapping.
#[derive(Debug, Clone)]
pub struct Axis {
    pub min: f64,
    pub max: f64,
    pub log: bool,
    pub label: String,
    pub tick_positions: Vec<f64>,
    pub tick_labels: Vec<String>,
    pub minor_ticks: Vec<f64>,
}

impl Axis {
    /// Linear axis spanning exactly `[min, max]` with "nice" ticks inside.
    ///
    /// Histogram x axes keep the booked range, like ROOT frames do.
    pub fn exact_linear(min: f64, max: f64, target_ticks: usize) -> Self {
        let (min, max) = if max > min { (min, max) } else { (min - 1.0, min + 1.0) };
        let step = nice_step((max - min) / target_ticks.max(2) as f64);
        let first = (min / step).ceil() * step;
        let tol = step * 1e-6;

        let mut ticks = Vec::new();
        let mut labels = Vec::new();
        let mut i = 0;
        loop {
            let v = first + step * i as f64;
            if v > max + tol {
                break;
            }
            ticks.push(v);
            labels.push(format_tick(v, step));
            i += 1;
        }

        let minor_step = step / 5.0;
        let first_minor = (min / minor_step).ceil() * minor_step;
        let mut minor = Vec::new();
        let mut j = 0;
        loop {
            let v = first_minor + minor_step * j as f64;
            if v > max + tol {
                break;
            }
            if !ticks.iter().any(|t| (t - v).abs() < minor_step * 0.01) {
                minor.push(v);
            }
            j += 1;
        }

        Self {
            min,
            max,
            log: false,
            label: String::new(),
            tick_positions: ticks,
            tick_labels: labels,
            minor_ticks: minor,
        }
    }

    /// Logarithmic axis covering whole decades around the data.
    pub fn auto_log(data_min: f64, data_max: f64) -> Self {
        let data_min = data_min.max(1e-20);
        let data_max = data_max.max(data_min * 10.0);
        let log_min = data_min.log10().floor() as i32;
        let log_max = data_max.log10().ceil() as i32;

        let mut ticks = Vec::new();
        let mut labels = Vec::new();
        let mut minor = Vec::new();

        for exp in log_min..=log_max {
            ticks.push(10.0_f64.powi(exp));
            labels.push(decade_label(exp));
            if exp < log_max {
                for m in 2..=9 {
                    minor.push(m as f64 * 10.0_f64.powi(exp));
                }
            }
        }

        Self {
            min: 10.0_f64.powi(log_min),
            max: 10.0_f64.powi(log_max),
            log: true,
            label: String::new(),
            tick_positions: ticks,
            tick_labels: labels,
            minor_ticks: minor,
        }
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }

    /// Map a data value to a pixel coordinate.
    pub fn data_to_pixel(&self, value: f64, px_min: f64, px_max: f64) -> f64 {
        let frac = if self.log {
            let lv = value.max(1e-20).ln();
            let lmin = self.min.max(1e-20).ln();
            let lmax = self.max.max(1e-20).ln();
            (lv - lmin) / (lmax - lmin)
        } else {
            (value - self.min) / (self.max - self.min)
        };
        px_min + frac * (px_max - px_min)
    }
}

fn nice_step(rough: f64) -> f64 {
    let exp = rough.abs().log10().floor();
    let frac = rough / 10.0_f64.powf(exp);
    let nice_frac = if frac <= 1.5 {
        1.0
    } else if frac <= 3.5 {
        2.0
    } else if frac <= 7.5 {
        5.0
    } else {
        10.0
    };
    nice_frac * 10.0_f64.powf(exp)
}

fn format_tick(value: f64, step: f64) -> String {
    let decimals = if step >= 1.0 { 0 } else { (-step.log10().floor()) as usize };
    // avoid "-0"
    let value = if value.abs() < step * 0.01 { 0.0 } else { value };
    if decimals == 0 {
        format!("{}", value.round() as i64)
    } else {
        format!("{value:.decimals$}")
    }
}

/// ROOT labels the first decades plainly and the rest as powers of ten.
fn decade_label(exp: i32) -> String {
    match exp {
        0 => "1".into(),
        1 => "10".into(),
        -1 => "0.1".into(),
        _ => format!("10{}", superscript(exp)),
    }
}

fn superscript(n: i32) -> String {
    n.to_string()
        .chars()
        .map(|c| match c {
            '-' => '\u{207B}',
            '0' => '\u{2070}',
            '1' => '\u{00B9}',
            '2' => '\u{00B2}',
            '3' => '\u{00B3}',
            '4' => '\u{2074}',
            '5' => '\u{2075}',
            '6' => '\u{2076}',
            '7' => '\u{2077}',
            '8' => '\u{2078}',
            '9' => '\u{2079}',
            _ => c,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn exact_linear_keeps_range() {
        let ax = Axis::exact_linear(0.0, 500.0, 8);
        assert_eq!((ax.min, ax.max), (0.0, 500.0));
        assert_eq!(ax.tick_positions.first().copied(), Some(0.0));
        assert_eq!(ax.tick_labels.last().map(String::as_str), Some("500"));
        assert!(ax.tick_positions.iter().all(|t| (0.0..=500.0).contains(t)));
    }

    #[test]
    fn exact_linear_odd_range() {
        let ax = Axis::exact_linear(0.13, 0.97, 5);
        assert!(ax.tick_positions.iter().all(|t| *t >= 0.13 && *t <= 0.97));
        assert!(ax.tick_labels.iter().all(|l| l.starts_with("0.")));
    }

    #[test]
    fn data_to_pixel_linear() {
        let ax = Axis::exact_linear(0.0, 100.0, 5);
        assert_relative_eq!(ax.data_to_pixel(50.0, 0.0, 500.0), 250.0);
    }

    #[test]
    fn log_axis_covers_decades() {
        let ax = Axis::auto_log(0.5, 2000.0);
        assert!(ax.log);
        assert_relative_eq!(ax.min, 0.1, epsilon = 1e-12);
        assert_relative_eq!(ax.max, 10000.0, epsilon = 1e-9);
        assert_eq!(ax.tick_labels[1], "1");
        assert_eq!(ax.tick_labels[4], "10³");
        assert_relative_eq!(ax.data_to_pixel(10.0, 0.0, 500.0), 200.0, epsilon = 1e-9);
    }

    #[test]
    fn nice_step_values() {
        assert_relative_eq!(nice_step(3.2), 2.0);
        assert_relative_eq!(nice_step(0.7), 0.5);
        assert_relative_eq!(nice_step(15.0), 10.0);
        assert_relative_eq!(nice_step(4.5), 5.0);
    }
}
