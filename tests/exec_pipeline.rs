#![cfg(unix)]

use std::error::Error;
use std::fs;
use std::time::Duration;

use tempfile::TempDir;

use callgraph_hook::exec::{CommandSpec, Pipeline, run, run_blocking};

type TestResult = Result<(), Box<dyn Error>>;

#[tokio::test]
async fn pipeline_pipes_stages_and_redirects_to_file() -> TestResult {
    let dir = TempDir::new()?;
    let out = dir.path().join("out.txt");

    let pipeline = Pipeline::new(CommandSpec::new("echo").arg("hello"))
        .pipe(CommandSpec::new("cat"))
        .redirect_to(&out);

    let output = run(&pipeline, None).await?;
    assert!(output.success);
    assert_eq!(output.code, Some(0));
    assert_eq!(fs::read_to_string(&out)?, "hello\n");
    // Redirected output is not also captured.
    assert!(output.stdout.is_empty());

    Ok(())
}

#[tokio::test]
async fn captures_stdout_when_not_redirected() -> TestResult {
    let pipeline =
        Pipeline::new(CommandSpec::new("echo").arg("hi")).pipe(CommandSpec::new("cat"));

    let output = run(&pipeline, None).await?;
    assert!(output.success);
    assert_eq!(output.stdout, "hi\n");

    Ok(())
}

#[tokio::test]
async fn any_failing_stage_fails_the_whole_pipeline() -> TestResult {
    // The last stage succeeds; the failure of the first stage must still be
    // observed.
    let pipeline = Pipeline::new(CommandSpec::new("false")).pipe(CommandSpec::new("cat"));

    let output = run(&pipeline, None).await?;
    assert!(!output.success);
    assert_eq!(output.code, Some(1));

    Ok(())
}

#[tokio::test]
async fn exit_code_comes_from_the_first_failing_stage() -> TestResult {
    let pipeline = Pipeline::new(CommandSpec::new("sh").arg("-c").arg("exit 7"))
        .pipe(CommandSpec::new("cat"));

    let output = run(&pipeline, None).await?;
    assert!(!output.success);
    assert_eq!(output.code, Some(7));

    Ok(())
}

#[tokio::test]
async fn stderr_is_captured_across_stages() -> TestResult {
    let pipeline = Pipeline::new(
        CommandSpec::new("sh")
            .arg("-c")
            .arg("echo oops >&2; exit 1"),
    );

    let output = run(&pipeline, None).await?;
    assert!(!output.success);
    assert!(output.stderr.contains("oops"));

    Ok(())
}

#[tokio::test]
async fn timeout_fails_like_a_nonzero_exit() -> TestResult {
    let pipeline = Pipeline::new(CommandSpec::new("sleep").arg("5"));

    let output = run(&pipeline, Some(Duration::from_millis(100))).await?;
    assert!(!output.success);
    assert_eq!(output.code, None);
    assert!(output.stderr.contains("timed out"));

    Ok(())
}

#[test]
fn blocking_call_has_identical_semantics() -> TestResult {
    let ok = Pipeline::new(CommandSpec::new("echo").arg("ok"));
    let output = run_blocking(&ok, None)?;
    assert!(output.success);
    assert_eq!(output.stdout, "ok\n");

    let failing = Pipeline::new(CommandSpec::new("false"));
    let output = run_blocking(&failing, None)?;
    assert!(!output.success);
    assert_eq!(output.code, Some(1));

    Ok(())
}

#[test]
fn pipeline_renders_like_a_shell_command_line() {
    let pipeline = Pipeline::new(CommandSpec::new("pyan").arg("a.py").arg("--dot"))
        .pipe(CommandSpec::new("dot").arg("-Tjson"))
        .redirect_to("src/callgraph.json");

    assert_eq!(
        pipeline.to_string(),
        "pyan a.py --dot | dot -Tjson > src/callgraph.json"
    );
}
