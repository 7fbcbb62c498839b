use std::{fs, path::PathBuf};

use tempfile::tempdir;

use trellis_cli::{Args, run};

/// Demos live at the workspace root, not in the crate.
fn demos_path() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .parent()
        .unwrap()
        .parent()
        .unwrap()
        .join("demos")
}

/// Collects all .tls files from a directory
fn collect_tls_files(dir: PathBuf) -> Vec<PathBuf> {
    let mut files = if let Ok(entries) = fs::read_dir(&dir) {
        entries
            .flatten()
            .map(|entry| entry.path())
            .filter(|path| {
                path.is_file() && path.extension().and_then(|s| s.to_str()) == Some("tls")
            })
            .collect()
    } else {
        Vec::new()
    };

    // Sort for consistent test output
    files.sort();
    files
}

fn args(input: &PathBuf, output: Option<PathBuf>, strict: bool) -> Args {
    Args {
        input: input.to_string_lossy().to_string(),
        output: output.map(|path| path.to_string_lossy().to_string()),
        config: None,
        log_level: "off".to_string(),
        strict,
    }
}

#[test]
fn e2e_smoke_test_valid_demos() {
    let temp_dir = tempdir().expect("Failed to create temp directory");
    let demos = collect_tls_files(demos_path());
    assert!(!demos.is_empty(), "No demos found in demos/");

    let mut failed = Vec::new();
    for demo in &demos {
        let output_path = temp_dir
            .path()
            .join(format!("{}.json", demo.file_stem().unwrap().to_string_lossy()));

        match run(&args(demo, Some(output_path.clone()), false)) {
            Ok(_) => {
                let json = fs::read_to_string(&output_path).unwrap();
                let value: serde_json::Value = serde_json::from_str(&json).unwrap();
                let nodes = value["nodes"].as_array().unwrap();
                assert!(!nodes.is_empty(), "{} produced no nodes", demo.display());
                assert!(nodes.iter().all(|node| node["position"]["x"].is_number()));
            }
            Err(err) => failed.push((demo.clone(), err)),
        }
    }

    if !failed.is_empty() {
        eprintln!("\nDemos that failed:");
        for (path, err) in &failed {
            eprintln!("  - {}: {}", path.display(), err);
        }
        panic!("{} demo(s) failed unexpectedly", failed.len());
    }
}

#[test]
fn e2e_smoke_test_error_demos_fail_in_strict_mode() {
    let temp_dir = tempdir().expect("Failed to create temp directory");
    let error_demos = collect_tls_files(demos_path().join("errors"));
    assert!(!error_demos.is_empty(), "No error demos found in demos/errors/");

    let mut unexpectedly_succeeded = Vec::new();
    for demo in &error_demos {
        let output_path = temp_dir
            .path()
            .join(format!("error_{}.json", demo.file_stem().unwrap().to_string_lossy()));

        // Lenient mode still lays the diagram out and reports the warnings.
        let summary = run(&args(demo, Some(output_path.clone()), false)).unwrap();
        assert!(!summary.diagnostics.is_empty(), "{} reported nothing", demo.display());

        if run(&args(demo, Some(output_path), true)).is_ok() {
            unexpectedly_succeeded.push(demo.clone());
        }
    }

    if !unexpectedly_succeeded.is_empty() {
        eprintln!("\nError demos that unexpectedly succeeded:");
        for path in &unexpectedly_succeeded {
            eprintln!("  - {}", path.display());
        }
        panic!(
            "{} error demo(s) succeeded unexpectedly",
            unexpectedly_succeeded.len()
        );
    }
}

#[test]
fn e2e_missing_input_is_an_error() {
    let temp_dir = tempdir().expect("Failed to create temp directory");
    let missing = temp_dir.path().join("missing.tls");
    assert!(run(&args(&missing, None, false)).is_err());
}

#[test]
fn e2e_explicit_config_is_applied() {
    let temp_dir = tempdir().expect("Failed to create temp directory");
    let input = temp_dir.path().join("pair.tls");
    let config = temp_dir.path().join("config.toml");
    let output = temp_dir.path().join("pair.json");
    fs::write(&input, "A [x: 1]\nB [x: 1]\nA -> B\n").unwrap();
    fs::write(&config, "[layout]\nmargin = 0\norientation = \"top-to-bottom\"\n").unwrap();

    let mut run_args = args(&input, Some(output.clone()), true);
    run_args.config = Some(config.to_string_lossy().to_string());
    run(&run_args).unwrap();

    let value: serde_json::Value = serde_json::from_str(&fs::read_to_string(output).unwrap()).unwrap();
    assert_eq!(value["nodes"][0]["position"]["x"], 0.0);
    assert_eq!(value["nodes"][0]["position"]["y"], 0.0);
    assert_eq!(value["nodes"][1]["position"]["y"], 200.0);
}
