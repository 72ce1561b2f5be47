#![cfg(unix)]

use std::error::Error;
use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};
use std::time::Duration;

use tempfile::TempDir;

use callgraph_hook::engine::{Orchestrator, RunOptions, Toolchain};
use callgraph_hook::errors::HookError;

type TestResult = Result<(), Box<dyn Error>>;

/// Write an executable stub script standing in for an external tool.
fn write_stub(dir: &Path, name: &str, script: &str) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, script).unwrap();
    let mut perms = fs::metadata(&path).unwrap().permissions();
    perms.set_mode(0o755);
    fs::set_permissions(&path, perms).unwrap();
    path
}

/// Toolchain whose analyzer emits a fixed graph description and whose
/// renderer passes it through unchanged.
fn stub_toolchain(dir: &Path, vcs: &str) -> Toolchain {
    let analyzer = write_stub(
        dir,
        "analyzer.sh",
        "#!/bin/sh\necho '{\"graph\": []}'\n",
    );
    let renderer = write_stub(dir, "renderer.sh", "#!/bin/sh\ncat\n");
    Toolchain {
        analyzer: analyzer.to_string_lossy().into_owned(),
        renderer: renderer.to_string_lossy().into_owned(),
        vcs: vcs.to_string(),
    }
}

fn write_config(dir: &Path, inputs: &Path, output_format: &str) -> PathBuf {
    let path = dir.join("callgraph.config.json");
    let value = serde_json::json!({
        "input_directory": inputs,
        "files": [],
        "output_format": output_format
    });
    fs::write(&path, serde_json::to_string_pretty(&value).unwrap()).unwrap();
    path
}

fn options(toolchain: Toolchain) -> RunOptions {
    RunOptions {
        toolchain,
        timeout: Some(Duration::from_secs(10)),
    }
}

#[tokio::test]
async fn full_run_generates_both_formats_and_stages() -> TestResult {
    let stubs = TempDir::new()?;
    let inputs = TempDir::new()?;
    let configs = TempDir::new()?;
    fs::write(inputs.path().join("mod.py"), "pass\n")?;

    let config_path = write_config(configs.path(), inputs.path(), "svg");
    let orchestrator = Orchestrator::new(options(stub_toolchain(stubs.path(), "true")));

    let report = orchestrator.run(&config_path).await?;

    assert!(report.rotated.is_empty());
    assert_eq!(report.outcomes.len(), 2);
    assert_eq!(report.outcomes[0].format, "json");
    assert_eq!(report.outcomes[1].format, "svg");
    assert!(report.staged);

    assert_eq!(
        fs::read_to_string(inputs.path().join("callgraph.json"))?,
        "{\"graph\": []}\n"
    );
    assert_eq!(
        fs::read_to_string(inputs.path().join("callgraph.svg"))?,
        "{\"graph\": []}\n"
    );

    Ok(())
}

#[tokio::test]
async fn second_run_rotates_once_and_reproduces_artifacts() -> TestResult {
    let stubs = TempDir::new()?;
    let inputs = TempDir::new()?;
    let configs = TempDir::new()?;
    fs::write(inputs.path().join("mod.py"), "pass\n")?;

    let config_path = write_config(configs.path(), inputs.path(), "svg");
    let orchestrator = Orchestrator::new(options(stub_toolchain(stubs.path(), "true")));

    orchestrator.run(&config_path).await?;
    let first = fs::read_to_string(inputs.path().join("callgraph.json"))?;

    let report = orchestrator.run(&config_path).await?;

    // Exactly one rotation per artifact, and deterministic regeneration.
    assert_eq!(report.rotated.len(), 2);
    assert_eq!(
        fs::read_to_string(inputs.path().join("callgraph.json"))?,
        first
    );
    assert!(inputs.path().join("callgraph.json.bak").exists());
    assert!(inputs.path().join("callgraph.svg.bak").exists());
    assert!(!inputs.path().join("callgraph.json.bak.bak").exists());

    Ok(())
}

#[tokio::test]
async fn primary_failure_skips_the_secondary_step() -> TestResult {
    let stubs = TempDir::new()?;
    let inputs = TempDir::new()?;
    let configs = TempDir::new()?;
    fs::write(inputs.path().join("mod.py"), "pass\n")?;

    let mut toolchain = stub_toolchain(stubs.path(), "true");
    toolchain.analyzer = write_stub(
        stubs.path(),
        "analyzer-broken.sh",
        "#!/bin/sh\necho 'analyzer exploded' >&2\nexit 3\n",
    )
    .to_string_lossy()
    .into_owned();

    let config_path = write_config(configs.path(), inputs.path(), "svg");
    let orchestrator = Orchestrator::new(options(toolchain));

    match orchestrator.run(&config_path).await {
        Err(HookError::Generation {
            format,
            code,
            stderr,
        }) => {
            assert_eq!(format, "json");
            assert_eq!(code, Some(3));
            assert!(stderr.contains("analyzer exploded"));
        }
        other => panic!("expected Generation error, got {other:?}"),
    }

    // The secondary command never ran.
    assert!(!inputs.path().join("callgraph.svg").exists());

    Ok(())
}

#[tokio::test]
async fn secondary_failure_leaves_the_primary_artifact() -> TestResult {
    let stubs = TempDir::new()?;
    let inputs = TempDir::new()?;
    let configs = TempDir::new()?;
    fs::write(inputs.path().join("mod.py"), "pass\n")?;

    let mut toolchain = stub_toolchain(stubs.path(), "true");
    toolchain.renderer = write_stub(
        stubs.path(),
        "renderer-svg-broken.sh",
        "#!/bin/sh\ncase \"$1\" in\n-Tsvg) echo 'render failed' >&2; exit 1;;\n*) cat;;\nesac\n",
    )
    .to_string_lossy()
    .into_owned();

    let config_path = write_config(configs.path(), inputs.path(), "svg");
    let orchestrator = Orchestrator::new(options(toolchain));

    match orchestrator.run(&config_path).await {
        Err(HookError::Generation { format, .. }) => assert_eq!(format, "svg"),
        other => panic!("expected Generation error, got {other:?}"),
    }

    // Partial success stays visible: the primary artifact survives.
    assert_eq!(
        fs::read_to_string(inputs.path().join("callgraph.json"))?,
        "{\"graph\": []}\n"
    );

    Ok(())
}

#[tokio::test]
async fn staging_failure_is_advisory() -> TestResult {
    let stubs = TempDir::new()?;
    let inputs = TempDir::new()?;
    let configs = TempDir::new()?;
    fs::write(inputs.path().join("mod.py"), "pass\n")?;

    let config_path = write_config(configs.path(), inputs.path(), "");
    let orchestrator = Orchestrator::new(options(stub_toolchain(stubs.path(), "false")));

    let report = orchestrator.run(&config_path).await?;

    assert!(!report.staged);
    assert_eq!(report.outcomes.len(), 1);
    assert!(inputs.path().join("callgraph.json").exists());

    Ok(())
}

#[tokio::test]
async fn empty_output_format_skips_the_secondary_job() -> TestResult {
    let stubs = TempDir::new()?;
    let inputs = TempDir::new()?;
    let configs = TempDir::new()?;
    fs::write(inputs.path().join("mod.py"), "pass\n")?;

    let config_path = write_config(configs.path(), inputs.path(), "");
    let orchestrator = Orchestrator::new(options(stub_toolchain(stubs.path(), "true")));

    let report = orchestrator.run(&config_path).await?;

    assert_eq!(report.outcomes.len(), 1);
    assert_eq!(report.outcomes[0].format, "json");
    assert!(!inputs.path().join("callgraph.svg").exists());

    Ok(())
}

#[tokio::test]
async fn resolution_failure_leaves_prior_artifacts_unrotated() -> TestResult {
    let stubs = TempDir::new()?;
    let inputs = TempDir::new()?;
    let configs = TempDir::new()?;
    fs::write(inputs.path().join("callgraph.json"), "committed artifact")?;

    let config_path = configs.path().join("callgraph.config.json");
    let value = serde_json::json!({
        "input_directory": inputs.path(),
        "files": ["missing.py"],
        "output_format": ""
    });
    fs::write(&config_path, serde_json::to_string(&value)?)?;

    let orchestrator = Orchestrator::new(options(stub_toolchain(stubs.path(), "true")));

    match orchestrator.run(&config_path).await {
        Err(HookError::MissingInput(path)) => {
            assert_eq!(path, inputs.path().join("missing.py"));
        }
        other => panic!("expected MissingInput, got {other:?}"),
    }

    // Resolution failed before rotation touched anything.
    assert_eq!(
        fs::read_to_string(inputs.path().join("callgraph.json"))?,
        "committed artifact"
    );
    assert!(!inputs.path().join("callgraph.json.bak").exists());

    Ok(())
}
