use std::fs;
use std::path::Path;

use assert_cmd::Command;
use calamine::{Data, Reader, Xlsx, open_workbook};
use serde_json::Value;
use tempfile::TempDir;

const MOLECULES: [&str; 4] = ["Acetylcholine", "Norepinephrine", "Dopamine", "Serotonin"];

fn write_book(path: &Path, rows: &[Vec<&str>], extra_sheet: bool) {
    let mut book = umya_spreadsheet::new_file();
    let sheet = book.get_active_sheet_mut();
    for (r, row) in rows.iter().enumerate() {
        for (c, value) in row.iter().enumerate() {
            let cell = sheet.get_cell_mut((c as u32 + 1, r as u32 + 1));
            match value.parse::<f64>() {
                Ok(v) => {
                    cell.set_value_number(v);
                }
                Err(_) => {
                    cell.set_value_string(*value);
                }
            }
        }
    }
    if extra_sheet {
        book.new_sheet("Sheet2").unwrap();
    }
    umya_spreadsheet::writer::xlsx::write(&book, path).unwrap();
}

fn patient_rows(id: &'static str) -> Vec<Vec<&'static str>> {
    vec![
        vec![id, "1", "weights", "1", "0.5", "0", "0", "0.25"],
        vec![id, "1", "Acetylcholine", "2", "0", "0", "0", "0"],
        vec![id, "1", "Norepinephrine", "1", "0", "0", "1", "0"],
        vec![id, "1", "Dopamine", "0", "0", "3", "0", "0"],
        vec![id, "0", "Serotonin", "0", "2", "0", "0", "4"],
    ]
}

fn write_fixture(dir: &Path, patients: &[&'static str], extra_sheet: bool) {
    let mut rows = vec![vec![
        "id", "in_use", "molecule", "i0", "i1", "i2", "i3", "i4",
    ]];
    for id in patients {
        rows.extend(patient_rows(id));
    }
    write_book(&dir.join("input.xlsx"), &rows, extra_sheet);
    write_book(
        &dir.join("tpl.xlsx"),
        &[vec!["molecule", "s0", "s1", "s2", "s3", "s4", "p"]],
        false,
    );
}

fn run_cmd(dir: &Path, out: &Path) -> Command {
    let mut cmd = Command::cargo_bin("neurosim").unwrap();
    cmd.arg("--input")
        .arg(dir.join("input.xlsx"))
        .arg("--template")
        .arg(dir.join("tpl.xlsx"))
        .arg("--out")
        .arg(out);
    cmd
}

fn read_rows(path: &Path) -> Vec<Vec<Data>> {
    let mut wb: Xlsx<_> = open_workbook(path).unwrap();
    let name = wb.sheet_names()[0].clone();
    let range = wb.worksheet_range(&name).unwrap();
    range.rows().map(|r| r.to_vec()).collect()
}

#[test]
fn run_writes_one_file_per_patient() {
    let tmp = TempDir::new().unwrap();
    write_fixture(tmp.path(), &["1", "2"], false);
    let out = tmp.path().join("results");

    run_cmd(tmp.path(), &out).assert().success();

    for id in [1, 2] {
        let rows = read_rows(&out.join(format!("patient-{}.xlsx", id)));
        assert_eq!(rows.len(), 85);
        for (i, row) in rows[1..].iter().enumerate() {
            assert_eq!(row[0], Data::String(MOLECULES[i % 4].to_string()));
        }
    }
    assert!(!out.join("summary.json").exists());
}

#[test]
fn run_is_deterministic() {
    let tmp = TempDir::new().unwrap();
    write_fixture(tmp.path(), &["5"], false);
    let first = tmp.path().join("a");
    let second = tmp.path().join("b");

    run_cmd(tmp.path(), &first).assert().success();
    run_cmd(tmp.path(), &second).assert().success();

    assert_eq!(
        read_rows(&first.join("patient-5.xlsx")),
        read_rows(&second.join("patient-5.xlsx"))
    );
}

#[test]
fn run_reuses_existing_results_folder() {
    let tmp = TempDir::new().unwrap();
    write_fixture(tmp.path(), &["1"], false);
    let out = tmp.path().join("results");
    fs::create_dir_all(&out).unwrap();

    run_cmd(tmp.path(), &out).assert().success();
    run_cmd(tmp.path(), &out).assert().success();
    assert!(out.join("patient-1.xlsx").exists());
}

#[test]
fn two_sheet_input_fails_before_any_output() {
    let tmp = TempDir::new().unwrap();
    write_fixture(tmp.path(), &["1"], true);
    let out = tmp.path().join("results");

    let assert = run_cmd(tmp.path(), &out).assert().failure();
    let stderr = String::from_utf8_lossy(&assert.get_output().stderr).to_string();
    assert!(stderr.contains("input format error"), "{stderr}");
    assert!(!out.exists());
}

#[test]
fn json_summary_lists_patients() {
    let tmp = TempDir::new().unwrap();
    write_fixture(tmp.path(), &["3", "1"], false);
    let out = tmp.path().join("results");

    run_cmd(tmp.path(), &out).arg("--json").assert().success();

    let v: Value = serde_json::from_slice(&fs::read(out.join("summary.json")).unwrap()).unwrap();
    assert_eq!(v["tool"], "neurosim");
    assert_eq!(v["schema_version"], "v1");
    assert_eq!(v["input_meta"]["patients"], 2);
    assert_eq!(v["input_meta"]["rows"], 10);
    let patients = v["patients"].as_array().unwrap();
    assert_eq!(patients.len(), 2);
    assert_eq!(patients[0]["id"], 1);
    assert_eq!(patients[0]["output"], "patient-1.xlsx");
    assert_eq!(patients[0]["scenarios"], 21);
    assert_eq!(patients[0]["rows"], 84);
    assert!(patients[0]["baseline"]["Dopamine"].is_number());
    assert!(patients[0]["peak_shift"]["delta"].is_number());
    assert!(v["failures"].as_array().unwrap().is_empty());
}

#[test]
fn keep_going_skips_incomplete_patient_and_fails_run() {
    let tmp = TempDir::new().unwrap();
    let mut rows = vec![vec![
        "id", "in_use", "molecule", "i0", "i1", "i2", "i3", "i4",
    ]];
    rows.extend(patient_rows("1"));
    rows.push(vec!["2", "1", "weights", "1", "1", "1", "1", "1"]);
    write_book(&tmp.path().join("input.xlsx"), &rows, false);
    write_book(&tmp.path().join("tpl.xlsx"), &[vec!["molecule"]], false);
    let out = tmp.path().join("results");

    let assert = run_cmd(tmp.path(), &out)
        .arg("--keep-going")
        .arg("--json")
        .assert()
        .failure();
    let stdout = String::from_utf8_lossy(&assert.get_output().stdout).to_string();
    assert!(stdout.contains("Failures: 2"), "{stdout}");

    assert!(out.join("patient-1.xlsx").exists());
    assert!(!out.join("patient-2.xlsx").exists());
    let v: Value = serde_json::from_slice(&fs::read(out.join("summary.json")).unwrap()).unwrap();
    assert_eq!(v["failures"][0]["id"], 2);
}

#[test]
fn incomplete_patient_aborts_without_keep_going() {
    let tmp = TempDir::new().unwrap();
    let mut rows = vec![vec![
        "id", "in_use", "molecule", "i0", "i1", "i2", "i3", "i4",
    ]];
    rows.push(vec!["4", "1", "Dopamine", "1", "1", "1", "1", "1"]);
    write_book(&tmp.path().join("input.xlsx"), &rows, false);
    write_book(&tmp.path().join("tpl.xlsx"), &[vec!["molecule"]], false);
    let out = tmp.path().join("results");

    let assert = run_cmd(tmp.path(), &out).assert().failure();
    let stderr = String::from_utf8_lossy(&assert.get_output().stderr).to_string();
    assert!(stderr.contains("patient 4: missing data"), "{stderr}");
    assert!(!out.exists());
}

#[test]
fn validate_reports_counts_and_writes_nothing() {
    let tmp = TempDir::new().unwrap();
    write_fixture(tmp.path(), &["1", "2"], false);

    let mut cmd = Command::cargo_bin("neurosim").unwrap();
    cmd.current_dir(tmp.path())
        .arg("validate")
        .arg("--input")
        .arg(tmp.path().join("input.xlsx"));
    let assert = cmd.assert().success();
    let stdout = String::from_utf8_lossy(&assert.get_output().stdout).to_string();
    assert!(stdout.contains("patients: 2"), "{stdout}");
    assert!(stdout.contains("rows: 10"), "{stdout}");
    assert!(!tmp.path().join("results").exists());
}
