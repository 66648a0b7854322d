//! Test command - discover fixtures, run them through the interpreter, report

use crate::config::Config;
use crate::locate;
use crate::testing::TestReporter;
use anyhow::{bail, Context, Result};
use loxtest_config::ConfigLoader;
use loxtest_core::{discover, DiscoveryOptions, GroupTally, RunSummary, TestRunner};
use std::env;
use std::io::{self, Write};
use std::path::PathBuf;
use tracing::info;

/// Arguments for the test command
#[derive(Debug, Default)]
pub struct TestArgs {
    /// Interpreter under test; searched for when absent
    pub executable: Option<PathBuf>,
    /// Fixture root, overriding configuration
    pub dir: Option<PathBuf>,
    /// Only run fixtures whose relative path contains this
    pub filter: Option<String>,
    /// Disable colored output
    pub no_color: bool,
    /// Explicit loxtest.toml instead of searching upwards
    pub config: Option<PathBuf>,
}

/// Run the test command, printing to stdout
pub fn run(args: TestArgs, cli_config: &Config) -> Result<RunSummary> {
    let stdout = io::stdout();
    let mut reporter = TestReporter::new(stdout.lock(), cli_config.palette(args.no_color));
    run_with(args, &mut reporter)
}

/// Run the test command against any reporter
pub fn run_with<W: Write>(args: TestArgs, reporter: &mut TestReporter<W>) -> Result<RunSummary> {
    let loader = ConfigLoader::new();
    let harness = match &args.config {
        Some(path) => loader
            .load_from_file(path)
            .with_context(|| format!("Failed to load {}", path.display()))?,
        None => loader
            .load_from_directory(&env::current_dir()?)
            .context("Failed to load harness configuration")?,
    };

    // Resolve the interpreter before touching any fixture
    let executable = match args.executable {
        Some(path) => path,
        None => {
            reporter.executable_not_specified(harness.executable_name())?;
            let found = locate::locate(&harness.search_patterns(), harness.prefer(), reporter)?;
            match found {
                Some(path) => path,
                None => bail!("Could not find {} executable", harness.executable_name()),
            }
        }
    };
    info!(executable = %executable.display(), "using interpreter");

    let root = args.dir.unwrap_or_else(|| harness.tests_dir());
    let options = DiscoveryOptions::default().with_source_extension(harness.source_extension());
    let mut discovery = discover(&root, &options)?;
    reporter.discovery_warnings(&discovery)?;

    if let Some(pattern) = &args.filter {
        discovery = discovery.filter(pattern);
    }

    let mut summary = RunSummary::new();
    if discovery.is_empty() {
        reporter.no_tests()?;
        return Ok(summary);
    }

    let runner = TestRunner::new(executable);
    for (key, group) in &discovery.groups {
        reporter.group_header(key)?;
        let mut tally = GroupTally::new(key.as_str());
        for case in &group.cases {
            let execution = runner.run(case)?;
            reporter.case_result(case, &execution)?;
            tally.record(execution.passed);
        }
        reporter.group_summary(&tally)?;
        summary.push(tally);
    }
    reporter.run_summary(&summary)?;

    Ok(summary)
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use crate::config::Palette;
    use std::fs;
    use tempfile::tempdir;

    fn fixture(root: &std::path::Path, rel: &str, source: &str, output: &str) {
        let dir = root.join(rel);
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join("prog.lox"), source).unwrap();
        fs::write(dir.join("output"), output).unwrap();
    }

    fn args_for(dir: &std::path::Path) -> TestArgs {
        TestArgs {
            executable: Some(PathBuf::from("/bin/sh")),
            dir: Some(dir.to_path_buf()),
            no_color: true,
            ..Default::default()
        }
    }

    #[test]
    fn test_no_tests_found() {
        let dir = tempdir().unwrap();
        let mut reporter = TestReporter::new(Vec::new(), Palette::plain());

        let summary = run_with(args_for(dir.path()), &mut reporter).unwrap();
        assert_eq!(summary.total(), 0);
        let text = String::from_utf8(reporter.into_inner()).unwrap();
        assert!(text.contains("No tests found."));
    }

    #[test]
    fn test_counts_per_group() {
        let dir = tempdir().unwrap();
        fixture(dir.path(), "a/pass", "echo ok\n", "ok\n");
        fixture(dir.path(), "a/fail", "echo ok\n", "ko\n");
        fixture(dir.path(), "b/pass", "echo hi\n", "hi\n");

        let mut reporter = TestReporter::new(Vec::new(), Palette::plain());
        let summary = run_with(args_for(dir.path()), &mut reporter).unwrap();

        assert_eq!(summary.total(), 3);
        assert_eq!(summary.passed(), 2);
        assert_eq!(summary.failed(), 1);
        assert_eq!(summary.groups[0].key, "a");
        assert_eq!(summary.groups[0].total(), 2);
        assert_eq!(summary.groups[1].key, "b");
    }

    #[test]
    fn test_filter_limits_run() {
        let dir = tempdir().unwrap();
        fixture(dir.path(), "a/one", "echo 1\n", "1\n");
        fixture(dir.path(), "a/two", "echo 2\n", "2\n");

        let args = TestArgs {
            filter: Some("two".to_string()),
            ..args_for(dir.path())
        };
        let mut reporter = TestReporter::new(Vec::new(), Palette::plain());
        let summary = run_with(args, &mut reporter).unwrap();
        assert_eq!(summary.total(), 1);
    }

    #[test]
    fn test_spawn_failure_aborts_run() {
        let dir = tempdir().unwrap();
        fixture(dir.path(), "a/one", "echo 1\n", "1\n");

        let args = TestArgs {
            executable: Some(dir.path().join("no-such-interpreter")),
            ..args_for(dir.path())
        };
        let mut reporter = TestReporter::new(Vec::new(), Palette::plain());
        assert!(run_with(args, &mut reporter).is_err());
    }

    #[test]
    fn test_missing_root_is_error() {
        let dir = tempdir().unwrap();
        let mut reporter = TestReporter::new(Vec::new(), Palette::plain());
        let result = run_with(args_for(&dir.path().join("absent")), &mut reporter);
        assert!(result.is_err());
    }
}
