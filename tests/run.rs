//! End-to-end tests for the file-to-file run

use nodestitch::{OutputFormat, RunConfig, StitchConfig, StitchError, run};
use std::fs;
use tempfile::TempDir;

const CANDIDATES: &str = "\
# day month year count hour
1 9 2005 2 0
1 100 50 280.0 25.0
2 300 40 140.0 15.0
1 9 2005 2 6
1 98 51 279.0 25.5
2 299 41 139.0 15.5
1 9 2005 1 12
1 97 52 278.2 26.1
";

fn setup(dir: &TempDir) -> RunConfig {
    let input = dir.path().join("candidates.txt");
    fs::write(&input, CANDIDATES).unwrap();
    RunConfig {
        input: Some(input),
        output: Some(dir.path().join("paths.txt")),
        ..RunConfig::default()
    }
}

#[test]
fn test_run_std() {
    let dir = TempDir::new().unwrap();
    let config = setup(&dir);
    let summary = run(&config).unwrap();

    assert_eq!(summary.stats.time_steps, 3);
    assert_eq!(summary.stats.candidates, 5);
    assert_eq!(summary.stats.paths_found, 1);
    assert_eq!(summary.stats.paths_discarded, 1);
    assert!(!summary.ingest.has_warnings());

    let written = fs::read_to_string(config.output.as_ref().unwrap()).unwrap();
    let lines: Vec<&str> = written.lines().collect();
    assert_eq!(lines.len(), 4);
    assert_eq!(lines[0], "start\t3\t1\t9\t2005\t0\t");
    assert_eq!(lines[3], "\t1\t97\t52\t278.2\t26.1\t1\t9\t2005\t12\t");
}

#[test]
fn test_run_visit() {
    let dir = TempDir::new().unwrap();
    let mut config = setup(&dir);
    config.output_format = OutputFormat::Visit;
    config.stitch = StitchConfig {
        min_path_length: 2,
        ..StitchConfig::default()
    };
    run(&config).unwrap();

    let written = fs::read_to_string(config.output.as_ref().unwrap()).unwrap();
    let lines: Vec<&str> = written.lines().collect();
    assert_eq!(lines[0], "id,time_id,year,month,day,hour,no,i,j,lon,lat");
    assert_eq!(lines.len(), 1 + 3 + 2);
    assert!(lines[4].starts_with("2,\t1,\t2005,\t9,\t1,\t0,"));
}

#[test]
fn test_missing_input_path() {
    let config = RunConfig {
        output: Some("unused.txt".into()),
        ..RunConfig::default()
    };
    let err = run(&config).unwrap_err();
    assert!(matches!(err, StitchError::Configuration(_)));
}

#[test]
fn test_missing_output_path() {
    let dir = TempDir::new().unwrap();
    let mut config = setup(&dir);
    config.output = None;
    assert!(matches!(run(&config), Err(StitchError::Configuration(_))));
}

#[test]
fn test_bad_schema_leaves_no_output() {
    let dir = TempDir::new().unwrap();
    let mut config = setup(&dir);
    config.format = "no,i,j,lon".to_string();
    assert!(matches!(run(&config), Err(StitchError::Configuration(_))));
    assert!(!config.output.as_ref().unwrap().exists());
}

#[test]
fn test_malformed_input_leaves_no_output() {
    let dir = TempDir::new().unwrap();
    let config = setup(&dir);
    fs::write(config.input.as_ref().unwrap(), "1 9 2005\n").unwrap();
    assert!(matches!(run(&config), Err(StitchError::Format { .. })));
    assert!(!config.output.as_ref().unwrap().exists());
}

#[test]
fn test_unreadable_input_reports_path() {
    let dir = TempDir::new().unwrap();
    let config = RunConfig {
        input: Some(dir.path().join("absent.txt")),
        output: Some(dir.path().join("paths.txt")),
        ..RunConfig::default()
    };
    let err = run(&config).unwrap_err();
    assert!(matches!(err, StitchError::Io { .. }));
    assert!(err.to_string().contains("absent.txt"));
}

#[test]
fn test_unwritable_output_reports_path() {
    let dir = TempDir::new().unwrap();
    let mut config = setup(&dir);
    config.output = Some(dir.path().join("no_such_dir").join("paths.txt"));
    let err = run(&config).unwrap_err();
    assert!(matches!(err, StitchError::Io { .. }));
    assert!(err.to_string().contains("no_such_dir"));
}
