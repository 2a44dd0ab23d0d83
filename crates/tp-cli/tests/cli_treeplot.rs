use std::path::{Path, PathBuf};
use std::process::{Command, Output};

use tp_tree::{Dataset, write_tree_parquet};

fn bin_path() -> PathBuf {
    PathBuf::from(env!("CARGO_BIN_EXE_treeplot"))
}

fn run(args: &[&str]) -> Output {
    Command::new(bin_path())
        .args(args)
        .output()
        .unwrap_or_else(|e| panic!("failed to run {:?} {:?}: {}", bin_path(), args, e))
}

fn stdout(out: &Output) -> String {
    assert!(
        out.status.success(),
        "treeplot failed: {}",
        String::from_utf8_lossy(&out.stderr)
    );
    String::from_utf8(out.stdout.clone()).unwrap()
}

/// Signal tree: 100 events in the fiducial volume, 40 MuGamma, 25 of those
/// with `pmu < 250`; plus 20 events outside.
fn write_trees(dir: &Path) {
    let n = 120;
    let wallv = (0..n).map(|i| if i < 100 { 300.0 } else { 100.0 }).collect();
    let mugamma = (0..n).map(|i| if i < 40 { 1.0 } else { 0.0 }).collect();
    let pmu = (0..n).map(|i| if i < 40 { 10.0 * i as f64 } else { 500.0 }).collect();
    let pdk = Dataset::from_columns("h1", [("wallv", wallv), ("MuGamma", mugamma), ("pmu", pmu)]).unwrap();
    write_tree_parquet(&pdk, &dir.join("pdk.parquet")).unwrap();

    let atm_pmu = (0..100).map(|i| if i < 10 { 100.0 } else { 400.0 }).collect();
    let atm = Dataset::from_columns(
        "h1",
        [("wallv", vec![250.0; 100]), ("MuGamma", vec![0.0; 100]), ("pmu", atm_pmu)],
    )
    .unwrap();
    write_tree_parquet(&atm, &dir.join("atm.parquet")).unwrap();
}

#[test]
fn count_prints_entries() {
    let dir = tempfile::tempdir().unwrap();
    write_trees(dir.path());
    let base = dir.path().to_str().unwrap();

    let all = run(&["count", "--base", base, "--file", "pdk.parquet"]);
    assert_eq!(stdout(&all).trim(), "120");

    let fv = run(&["count", "--base", base, "--file", "pdk.parquet", "--cut", "wallv > 200"]);
    assert_eq!(stdout(&fv).trim(), "100");
}

#[test]
fn eff_and_bck_reports() {
    let dir = tempfile::tempdir().unwrap();
    write_trees(dir.path());
    let base = dir.path().to_str().unwrap();

    let eff = run(&[
        "eff",
        "--base",
        base,
        "--file",
        "pdk.parquet",
        "--cut",
        "wallv > 200 && MuGamma && pmu < 250",
    ]);
    let text = stdout(&eff);
    assert!(text.contains("Total number of PDK events inside true FV is 100."));
    assert!(text.contains("Efficiency after this cut is: 25/100 = 25.0%."));
    assert!(text.contains("With Respect to MuGammas inside FV: 25/40 = 62.5%."));

    let bck = run(&["bck", "--base", base, "--file", "atm.parquet", "--cut", "wallv > 200 && pmu < 250"]);
    let text = stdout(&bck);
    assert!(text.contains("Total number of atm nu MC events inside true FV is 100."));
    assert!(text.contains("Rejection after this cut is 10/100 = 10.0%."));
}

#[test]
fn report_names_from_config() {
    let dir = tempfile::tempdir().unwrap();
    write_trees(dir.path());
    let cfg = dir.path().join("tools.yaml");
    std::fs::write(&cfg, "report:\n  background_name: cosmic\n").unwrap();

    let out = run(&[
        "--config",
        cfg.to_str().unwrap(),
        "bck",
        "--base",
        dir.path().to_str().unwrap(),
        "--file",
        "atm.parquet",
        "--cut",
        "pmu < 250",
    ]);
    assert!(stdout(&out).contains("Total number of cosmic events inside true FV is 100."));
}

#[test]
fn zero_denominator_fails() {
    let dir = tempfile::tempdir().unwrap();
    write_trees(dir.path());
    let out = run(&[
        "bck",
        "--base",
        dir.path().to_str().unwrap(),
        "--file",
        "atm.parquet",
        "--cut",
        "pmu < 250",
        "--sample",
        "pmu > 1000",
    ]);
    assert!(!out.status.success());
    assert!(String::from_utf8_lossy(&out.stderr).contains("zero denominator"));
}

#[test]
fn draw2_writes_three_files() {
    let dir = tempfile::tempdir().unwrap();
    write_trees(dir.path());
    let out_base = dir.path().join("plots").join("pmu");

    let out = run(&[
        "draw2",
        "--base",
        dir.path().to_str().unwrap(),
        "--file",
        "pdk.parquet",
        "--file2",
        "atm.parquet",
        "pmu",
        "--cut1",
        "wallv > 200 && MuGamma",
        "--cut2",
        "wallv > 200",
        "--nbins",
        "50",
        "--xmax",
        "500",
        "--norm",
        "--log",
        "--legend",
        "PDK",
        "atm",
        "--line",
        "250,0,250,0.5",
        "--out",
        out_base.to_str().unwrap(),
    ]);
    stdout(&out);

    for ext in ["png", "jpg", "C"] {
        let path = dir.path().join("plots").join(format!("pmu.{ext}"));
        assert!(path.exists(), "missing {}", path.display());
    }
    assert_eq!(std::fs::read_dir(dir.path().join("plots")).unwrap().count(), 3);
    let macro_text = std::fs::read_to_string(dir.path().join("plots/pmu.C")).unwrap();
    assert!(macro_text.contains("SetLogy(1)"));
}

#[test]
fn draw_unknown_column_fails() {
    let dir = tempfile::tempdir().unwrap();
    write_trees(dir.path());
    let out = run(&[
        "draw",
        "--base",
        dir.path().to_str().unwrap(),
        "--file",
        "pdk.parquet",
        "evis",
        "--out",
        dir.path().join("evis").to_str().unwrap(),
    ]);
    assert!(!out.status.success());
    assert!(String::from_utf8_lossy(&out.stderr).contains("evis"));
}
