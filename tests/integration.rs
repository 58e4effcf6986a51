use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;
use tempfile::TempDir;

const SITES: &str = r#"{"type":"FeatureCollection","features":[
  {"type":"Feature","geometry":{"type":"Point","coordinates":[22.501,38.482]},
   "properties":{"site":"Delphi","buildings":[
     {"doc_id":"B1","id":"Temple of Apollo","order":["Doric"],"morphology":["peripteral"],"age":["Classical"],"date":["-370"]},
     {"doc_id":"B2","id":"Treasury of the Siphnians","order":["Ionic"],"morphology":["in antis"],"age":["Archaic","undetermined"]}
   ]}},
  {"type":"Feature","geometry":{"type":"Point","coordinates":[23.726,37.971]},
   "properties":{"site":"Athens","buildings":[
     {"doc_id":"B11","id":"Parthenon","order":["Doric"],"morphology":["peripteral"],"age":["High Classical"]},
     {"doc_id":"B12","id":"Erechtheion","order":["Ionic"],"age":["Classical"],"date":["NaN"]}
   ]}},
  {"type":"Feature","geometry":{"type":"Point","coordinates":[12.486,41.891]},
   "properties":{"site":"Rome","buildings":[
     {"doc_id":"R1","id":"Temple of Mars Ultor","order":["Corinthian"],"morphology":["peripteral"],"age":["Augustan"]}
   ]}}
]}"#;

fn atlas_binary() -> PathBuf {
    let mut path = std::env::current_exe().unwrap();
    path.pop(); // remove test binary name
    path.pop(); // remove deps/
    path.push("atlas");
    path
}

fn setup_test_env_with(dataset: &str) -> (TempDir, PathBuf) {
    let tmp = TempDir::new().unwrap();
    let root = tmp.path().to_path_buf();

    let config_dir = root.join("config");
    fs::create_dir_all(&config_dir).unwrap();
    let data_dir = root.join("data");
    fs::create_dir_all(&data_dir).unwrap();

    fs::write(data_dir.join("sites.geojson"), dataset).unwrap();

    let config_content = format!(
        r#"[data]
path = "{}/data/sites.geojson"

[server]
bind = "127.0.0.1:7341"

[logging]
filter = "warn"
"#,
        root.display()
    );

    let config_path = config_dir.join("atlas.toml");
    fs::write(&config_path, config_content).unwrap();

    (tmp, config_path)
}

fn setup_test_env() -> (TempDir, PathBuf) {
    setup_test_env_with(SITES)
}

fn run_atlas(config_path: &Path, args: &[&str]) -> (String, String, bool) {
    let binary = atlas_binary();
    let output = Command::new(&binary)
        .arg("--config")
        .arg(config_path.to_str().unwrap())
        .args(args)
        .env_remove("RUST_LOG")
        .output()
        .unwrap_or_else(|e| panic!("Failed to run atlas binary at {:?}: {}", binary, e));

    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();
    let success = output.status.success();
    (stdout, stderr, success)
}

#[test]
fn test_check_reports_counts() {
    let (_tmp, config_path) = setup_test_env();

    let (stdout, stderr, success) = run_atlas(&config_path, &["check"]);
    assert!(success, "check failed: stdout={}, stderr={}", stdout, stderr);
    assert!(stdout.contains("Sites:       3"), "got: {}", stdout);
    assert!(stdout.contains("Buildings:   5"), "got: {}", stdout);
    assert!(stdout.contains("Order (3 values)"), "got: {}", stdout);
}

#[test]
fn test_check_drops_placeholders_from_options() {
    let (_tmp, config_path) = setup_test_env();

    let (stdout, _, success) = run_atlas(&config_path, &["check"]);
    assert!(success);
    assert!(!stdout.contains("undetermined"));
    assert!(!stdout.contains("NaN"));
}

#[test]
fn test_check_malformed_dataset_fails() {
    let (_tmp, config_path) = setup_test_env_with(r#"{"type":"FeatureCollection","features":[{"#);

    let (_, stderr, success) = run_atlas(&config_path, &["check"]);
    assert!(!success, "check should fail on a truncated dataset");
    assert!(stderr.contains("Failed to load dataset"), "got: {}", stderr);
}

#[test]
fn test_check_invalid_shape_fails() {
    let bad = SITES.replace(r#""order":["Corinthian"]"#, r#""order":"Corinthian""#);
    let (_tmp, config_path) = setup_test_env_with(&bad);

    let (_, stderr, success) = run_atlas(&config_path, &["check"]);
    assert!(!success);
    assert!(stderr.contains("invalid dataset"), "got: {}", stderr);
}

#[test]
fn test_filter_without_flags_shows_everything() {
    let (_tmp, config_path) = setup_test_env();

    let (stdout, _, success) = run_atlas(&config_path, &["filter"]);
    assert!(success);
    assert!(stdout.contains("3 sites, 5 buildings visible (of 3 sites, 5 buildings)"));
}

#[test]
fn test_filter_order_and_period() {
    let (_tmp, config_path) = setup_test_env();

    let (stdout, stderr, success) = run_atlas(
        &config_path,
        &["filter", "--order", "Doric", "--period", "classical"],
    );
    assert!(success, "filter failed: stderr={}", stderr);
    assert!(stdout.contains("Delphi"));
    assert!(stdout.contains("Athens"));
    assert!(!stdout.contains("Rome"));
    assert!(stdout.contains("B1 "));
    assert!(stdout.contains("B11"));
    assert!(!stdout.contains("B12"));
    assert!(stdout.contains("2 sites, 2 buildings visible"));
}

#[test]
fn test_filter_prunes_empty_sites() {
    let (_tmp, config_path) = setup_test_env();

    let (stdout, _, success) = run_atlas(
        &config_path,
        &["filter", "--order", "Ionic", "--period", "classical"],
    );
    assert!(success);
    assert!(!stdout.contains("Delphi"));
    assert!(stdout.contains("Erechtheion"));
    assert!(stdout.contains("1 sites, 1 buildings visible"));
}

#[test]
fn test_filter_values_within_attribute_are_alternatives() {
    let (_tmp, config_path) = setup_test_env();

    let (stdout, _, success) = run_atlas(
        &config_path,
        &[
            "filter",
            "--order",
            "Doric",
            "--order",
            "Corinthian",
            "--typology",
            "peripteral",
        ],
    );
    assert!(success);
    assert!(stdout.contains("3 sites, 3 buildings visible"), "got: {}", stdout);
}

#[test]
fn test_filter_json_output() {
    let (_tmp, config_path) = setup_test_env();

    let (stdout, _, success) = run_atlas(
        &config_path,
        &["filter", "--period", "early_empire", "--json"],
    );
    assert!(success);
    let doc: serde_json::Value = serde_json::from_str(&stdout).expect("stdout is JSON");
    assert_eq!(doc["type"], "FeatureCollection");
    let features = doc["features"].as_array().unwrap();
    assert_eq!(features.len(), 1);
    assert_eq!(features[0]["properties"]["site"], "Rome");
    assert_eq!(features[0]["geometry"]["coordinates"][0], 12.486);
}

#[test]
fn test_filter_unknown_period_rejected() {
    let (_tmp, config_path) = setup_test_env();

    let (_, stderr, success) = run_atlas(&config_path, &["filter", "--period", "bronze_age"]);
    assert!(!success);
    assert!(stderr.contains("unknown period id"), "got: {}", stderr);
}

#[test]
fn test_periods_needs_no_config() {
    let tmp = TempDir::new().unwrap();
    let missing = tmp.path().join("absent.toml");

    let (stdout, stderr, success) = run_atlas(&missing, &["periods"]);
    assert!(success, "periods failed: stderr={}", stderr);
    assert!(stdout.contains("early_empire"));
    assert!(stdout.contains("Peisistratid"));
    assert!(stdout.contains("Timeline: -800 to 476 (1276 years)"));
}

#[test]
fn test_missing_config_fails() {
    let tmp = TempDir::new().unwrap();
    let missing = tmp.path().join("absent.toml");

    let (_, stderr, success) = run_atlas(&missing, &["check"]);
    assert!(!success);
    assert!(stderr.contains("Failed to read config file"));
}
