//! ROOT C++ macro output (`.C`), replayable with `root -l name.C`.

use std::collections::HashSet;
use std::fmt::Write as FmtWrite;

use crate::scene::{Draw1d, LegendSpec, Scene, SceneBody, Series1d, Series2d, StatFields, StatsSpec};

/// Write `scene` as a ROOT macro whose entry point is `function_name()`.
pub fn scene_to_macro(scene: &Scene, function_name: &str) -> String {
    let func = sanitize_ident(function_name);
    let canvas = sanitize_ident(&scene.name);
    let mut out = String::with_capacity(16 * 1024);

    let _ = writeln!(out, "// ROOT macro written by treeplot");
    let _ = writeln!(out, "void {func}()");
    out.push_str("{\n");
    let _ = writeln!(
        out,
        "   TCanvas *{canvas} = new TCanvas(\"{}\", \"{}\", {}, {});",
        escape(&scene.name),
        escape(&scene.name),
        scene.width.round() as i64,
        scene.height.round() as i64
    );
    let _ = writeln!(out, "   {canvas}->SetLogy({});", i32::from(scene.log_y));

    let stats = scene.stats.filter(|s| !s.fields.is_empty());
    match stats {
        Some(s) => {
            let _ = writeln!(out, "   gStyle->SetOptStat(\"{}\");", stat_letters(&s.fields));
        }
        None => {
            let _ = writeln!(out, "   gStyle->SetOptStat(0);");
        }
    }

    let title = axis_title(scene);
    let mut names = ObjectNames::new([canvas.as_str(), "leg"]);
    let mut objects = Vec::new();
    match &scene.body {
        SceneBody::Empty => {}
        SceneBody::Hist1d(series) => {
            for (i, s) in series.iter().enumerate() {
                let obj = names.claim(&s.name);
                write_hist1d(&mut out, &obj, s, &title, i, stats.is_some());
                objects.push(obj);
            }
        }
        SceneBody::Hist2d(series) => {
            for (i, s) in series.iter().enumerate() {
                let obj = names.claim(&s.name);
                write_hist2d(&mut out, &obj, s, &title, i, stats.is_some());
                objects.push(obj);
            }
        }
    }

    if let Some(spec) = stats
        && !objects.is_empty()
    {
        let vars: Vec<String> = objects.iter().map(|o| o.var.clone()).collect();
        write_stats_placement(&mut out, &canvas, &vars, &spec);
    }

    if let Some(legend) = &scene.legend {
        write_legend(&mut out, legend, &objects);
    }

    for (i, l) in scene.lines.iter().enumerate() {
        let var = format!("line{i}");
        let _ = writeln!(out, "   TLine *{var} = new TLine({}, {}, {}, {});", l.x1, l.y1, l.x2, l.y2);
        let _ = writeln!(out, "   {var}->SetLineColor({});", l.color);
        let _ = writeln!(out, "   {var}->SetLineWidth({});", l.width);
        let _ = writeln!(out, "   {var}->SetLineStyle({});", l.style);
        let _ = writeln!(out, "   {var}->Draw();");
    }

    let _ = writeln!(out, "   {canvas}->Modified();");
    let _ = writeln!(out, "   {canvas}->cd();");
    out.push_str("}\n");
    out
}

fn write_hist1d(out: &mut String, obj: &MacroObject, s: &Series1d, title: &str, index: usize, with_stats: bool) {
    let var = &obj.var;
    let _ = writeln!(
        out,
        "   TH1F *{var} = new TH1F(\"{}\", \"{}\", {}, {}, {});",
        escape(&obj.root_name),
        title,
        s.axis.nbins,
        s.axis.min,
        s.axis.max
    );
    for bin in 0..=s.axis.nbins + 1 {
        let v = s.contents.get(bin).copied().unwrap_or(0.0);
        let _ = writeln!(out, "   {var}->SetBinContent({bin}, {v});");
    }
    if s.draw == Draw1d::Errors {
        for bin in 0..=s.axis.nbins + 1 {
            let e = s.bin_error(bin);
            if e != 0.0 {
                let _ = writeln!(out, "   {var}->SetBinError({bin}, {e});");
            }
        }
    }
    let _ = writeln!(out, "   {var}->SetEntries({});", s.entries);
    let _ = writeln!(out, "   {var}->SetLineColor({});", s.color);
    let _ = writeln!(out, "   {var}->SetLineWidth({});", s.line_width);
    if !with_stats {
        let _ = writeln!(out, "   {var}->SetStats(0);");
    }
    let style = match s.draw {
        Draw1d::Hist => "HIST",
        Draw1d::Errors => "E",
    };
    let _ = writeln!(out, "   {var}->Draw(\"{}\");", draw_option(style, index, with_stats));
}

fn write_hist2d(out: &mut String, obj: &MacroObject, s: &Series2d, title: &str, index: usize, with_stats: bool) {
    let var = &obj.var;
    let _ = writeln!(
        out,
        "   TH2F *{var} = new TH2F(\"{}\", \"{}\", {}, {}, {}, {}, {}, {});",
        escape(&obj.root_name),
        title,
        s.x.nbins,
        s.x.min,
        s.x.max,
        s.y.nbins,
        s.y.min,
        s.y.max
    );
    for by in 0..=s.y.nbins + 1 {
        for bx in 0..=s.x.nbins + 1 {
            let v = s.cell(bx, by);
            if v != 0.0 {
                let _ = writeln!(out, "   {var}->SetBinContent({bx}, {by}, {v});");
            }
        }
    }
    let _ = writeln!(out, "   {var}->SetEntries({});", s.entries);
    let _ = writeln!(out, "   {var}->SetMarkerColor({});", s.color);
    let _ = writeln!(out, "   {var}->SetLineColor({});", s.color);
    if !with_stats {
        let _ = writeln!(out, "   {var}->SetStats(0);");
    }
    let style = s.draw.as_option().to_uppercase();
    let _ = writeln!(out, "   {var}->Draw(\"{}\");", draw_option(&style, index, with_stats));
}

/// First series draws plainly, the rest overlay; `sames` keeps a stats box each.
fn draw_option(style: &str, index: usize, with_stats: bool) -> String {
    let overlay = match (index, with_stats) {
        (0, _) => "",
        (_, true) => "sames",
        (_, false) => "same",
    };
    [style, overlay].iter().filter(|s| !s.is_empty()).copied().collect::<Vec<_>>().join(" ")
}

fn write_stats_placement(out: &mut String, canvas: &str, objects: &[String], spec: &StatsSpec) {
    let _ = writeln!(out, "   {canvas}->Update();");
    let height = (spec.y2 - spec.y1).abs();
    let top = spec.y1.max(spec.y2);
    for (i, obj) in objects.iter().enumerate() {
        let st = format!("st_{obj}");
        let y2 = top - height * i as f64;
        let _ = writeln!(out, "   TPaveStats *{st} = (TPaveStats*){obj}->FindObject(\"stats\");");
        let _ = writeln!(out, "   if ({st}) {{");
        let _ = writeln!(out, "      {st}->SetX1NDC({});", spec.x1.min(spec.x2));
        let _ = writeln!(out, "      {st}->SetX2NDC({});", spec.x1.max(spec.x2));
        let _ = writeln!(out, "      {st}->SetY1NDC({});", round_ndc(y2 - height));
        let _ = writeln!(out, "      {st}->SetY2NDC({});", round_ndc(y2));
        let _ = writeln!(out, "   }}");
    }
}

fn write_legend(out: &mut String, legend: &LegendSpec, objects: &[MacroObject]) {
    let header = legend.header.as_deref().map(|h| format!("\"{}\"", escape(h)));
    let _ = writeln!(
        out,
        "   TLegend *leg = new TLegend({}, {}, {}, {}, {}, \"brNDC\");",
        legend.x1,
        legend.y1,
        legend.x2,
        legend.y2,
        header.as_deref().unwrap_or("NULL")
    );
    let _ = writeln!(out, "   leg->SetBorderSize({});", legend.border_size);
    match legend.fill_color {
        Some(c) => {
            let _ = writeln!(out, "   leg->SetFillColor({c});");
        }
        None => {
            let _ = writeln!(out, "   leg->SetFillStyle(0);");
        }
    }
    let _ = writeln!(out, "   leg->SetTextFont({});", legend.text_font);
    let _ = writeln!(out, "   leg->SetTextSize({});", legend.text_size);
    // the k-th entry naming a histogram points at its k-th copy on the pad
    let mut used = vec![false; objects.len()];
    for entry in &legend.entries {
        let object = entry
            .object
            .as_deref()
            .and_then(|name| {
                let mut first = None;
                let mut free = None;
                for (i, o) in objects.iter().enumerate() {
                    if o.scene_name != name {
                        continue;
                    }
                    first.get_or_insert(i);
                    if !used[i] {
                        free = Some(i);
                        break;
                    }
                }
                let i = free.or(first)?;
                used[i] = true;
                Some(objects[i].var.clone())
            })
            .unwrap_or_else(|| "(TObject*)0".to_string());
        let _ = writeln!(
            out,
            "   leg->AddEntry({object}, \"{}\", \"{}\");",
            escape(&entry.label),
            escape(&entry.option)
        );
    }
    let _ = writeln!(out, "   leg->Draw();");
}

/// A histogram as declared in the macro.
struct MacroObject {
    /// Series name in the scene.
    scene_name: String,
    /// ROOT object name, unique on the pad.
    root_name: String,
    /// C++ variable name.
    var: String,
}

/// Hands out C++ variables and ROOT names, suffixing repeats with `_1`, `_2`, ...
struct ObjectNames {
    taken: HashSet<String>,
}

impl ObjectNames {
    fn new<'a>(reserved: impl IntoIterator<Item = &'a str>) -> Self {
        Self { taken: reserved.into_iter().map(str::to_string).collect() }
    }

    fn claim(&mut self, name: &str) -> MacroObject {
        let base = sanitize_ident(name);
        let mut k = 0usize;
        let var = loop {
            let candidate = if k == 0 { base.clone() } else { format!("{base}_{k}") };
            if self.taken.insert(candidate.clone()) {
                break candidate;
            }
            k += 1;
        };
        let root_name = if k == 0 { name.to_string() } else { format!("{name}_{k}") };
        MacroObject { scene_name: name.to_string(), root_name, var }
    }
}

/// `"title;x label;y label"`, ROOT's combined title form.
fn axis_title(scene: &Scene) -> String {
    escape(&format!("{};{};{}", scene.title, scene.x_label, scene.y_label))
}

fn stat_letters(f: &StatFields) -> String {
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
    .filter(|(on, _)| *on)
    .map(|(_, c)| *c)
    .collect()
}

fn round_ndc(v: f64) -> f64 {
    (v * 1e6).round() / 1e6
}

fn escape(s: &str) -> String {
    s.replace('\\', "\\\\").replace('"', "\\\"")
}

/// A valid C++ identifier derived from `name`.
pub fn sanitize_ident(name: &str) -> String {
    let mut ident: String =
        name.chars().map(|c| if c.is_ascii_alphanumeric() || c == '_' { c } else { '_' }).collect();
    if ident.is_empty() || ident.starts_with(|c: char| c.is_ascii_digit()) {
        ident.insert(0, '_');
    }
    ident
}
