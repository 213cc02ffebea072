//! End-to-end tests for the swarmgen CLI

// Internal imports (std, crate)
use std::collections::BTreeSet;
use std::io::Cursor;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};

// External imports (alphabetized)
use serde_json::Value as JsonValue;
use tempfile::TempDir;
use zip::ZipArchive;

fn fixture(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("../swarmgen-core/tests/fixtures")
        .join(name)
}

/// Run the binary inside `dir` with config discovery isolated to it
fn swarmgen(dir: &Path, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_swarmgen"))
        .args(args)
        .current_dir(dir)
        .env_remove("SWARMGEN_CONFIG")
        .env("HOME", dir)
        .output()
        .expect("failed to run swarmgen")
}

fn entries(path: &Path) -> BTreeSet<String> {
    let bytes = std::fs::read(path).unwrap();
    let mut archive = ZipArchive::new(Cursor::new(bytes)).unwrap();
    (0..archive.len())
        .map(|i| archive.by_index(i).unwrap().name().to_string())
        .filter(|name| !name.ends_with('/'))
        .collect()
}

fn assert_success(output: &Output) {
    assert!(
        output.status.success(),
        "stdout: {}\nstderr: {}",
        String::from_utf8_lossy(&output.stdout),
        String::from_utf8_lossy(&output.stderr)
    );
}

#[test]
fn test_generate_full_default_output() {
    let dir = TempDir::new().unwrap();
    let spec = fixture("beer-api.json");
    let output = swarmgen(dir.path(), &["generate", "--spec", spec.to_str().unwrap()]);
    assert_success(&output);

    // Named after the derived artifact id
    let archive = dir.path().join("beer-api.zip");
    let names = entries(&archive);
    assert!(names.contains("pom.xml"));
    assert!(names.contains("src/main/java/api/beer/rest/BeersResource.java"));
    assert!(String::from_utf8_lossy(&output.stdout).contains("beer-api.zip"));
}

#[test]
fn test_generate_contract_only_with_settings() {
    let dir = TempDir::new().unwrap();
    let spec = fixture("beer-api.json");
    let out = dir.path().join("out").join("simple.zip");
    let output = swarmgen(
        dir.path(),
        &[
            "generate",
            "--spec",
            spec.to_str().unwrap(),
            "--output",
            out.to_str().unwrap(),
            "--mode",
            "contract-only",
            "--base-package",
            "io.openapi.simple",
        ],
    );
    assert_success(&output);

    let names = entries(&out);
    assert!(names.contains("src/main/java/io/openapi/simple/model/Beer.java"));
    assert!(!names.contains("pom.xml"));
}

#[test]
fn test_generate_from_config_file() {
    let dir = TempDir::new().unwrap();
    let spec = fixture("gateway-api.json");
    let config = format!(
        "spec_location: {}\noutput_path: gateway.zip\nmode: contract_only\n",
        spec.display()
    );
    std::fs::write(dir.path().join("swarmgen.yaml"), config).unwrap();

    let output = swarmgen(dir.path(), &["generate"]);
    assert_success(&output);
    assert_eq!(
        entries(&dir.path().join("gateway.zip")),
        BTreeSet::from(["src/main/resources/META-INF/api-contract.json".to_string()])
    );
}

#[test]
fn test_extract_then_generate_from_model() {
    let dir = TempDir::new().unwrap();
    let spec = fixture("beer-api.json");
    let model_path = dir.path().join("beer-api.model.json");

    let output = swarmgen(
        dir.path(),
        &[
            "extract",
            "--spec",
            spec.to_str().unwrap(),
            "--output",
            model_path.to_str().unwrap(),
        ],
    );
    assert_success(&output);

    let model: JsonValue =
        serde_json::from_str(&std::fs::read_to_string(&model_path).unwrap()).unwrap();
    assert_eq!(model["project"]["title"], "Beer API");
    assert_eq!(model["resources"][0]["className"], "BeersResource");

    let out = dir.path().join("from-model.zip");
    let output = swarmgen(
        dir.path(),
        &[
            "generate",
            "--spec",
            spec.to_str().unwrap(),
            "--model",
            model_path.to_str().unwrap(),
            "--output",
            out.to_str().unwrap(),
        ],
    );
    assert_success(&output);
    assert!(entries(&out).contains("src/main/java/api/beer/model/Brewery.java"));
}

#[test]
fn test_invalid_spec_fails_without_archive() {
    let dir = TempDir::new().unwrap();
    let spec = dir.path().join("broken.json");
    std::fs::write(
        &spec,
        r#"{"openapi": "3.0.0", "info": {"version": "1"}, "paths": {}}"#,
    )
    .unwrap();
    let out = dir.path().join("broken.zip");

    let output = swarmgen(
        dir.path(),
        &[
            "generate",
            "--spec",
            spec.to_str().unwrap(),
            "--output",
            out.to_str().unwrap(),
        ],
    );
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("Invalid specification"));
    assert!(!out.exists());
}

#[test]
fn test_missing_spec_is_reported() {
    let dir = TempDir::new().unwrap();
    let output = swarmgen(dir.path(), &["generate"]);
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("No specification given"));
}
