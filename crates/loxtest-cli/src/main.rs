use anyhow::Result;
use clap::error::ErrorKind;
use clap::Parser;
use std::path::PathBuf;

mod commands;
mod config;
mod locate;
mod testing;

/// Black-box test harness for Lox interpreters.
///
/// Discovers fixture directories under the test root, runs the interpreter
/// once per fixture with the fixture's source file, and compares stdout or
/// stderr byte for byte against the expected files.
///
/// FIXTURE LAYOUT (one leaf directory per test):
///     *.lox           The program under test (exactly one)
///     in, input       Content fed to stdin (optional)
///     out, output     Expected stdout
///     error           Expected stderr (takes precedence over stdout)
///
/// EXAMPLES:
///     loxtest                          Search for clox and run tests/
///     loxtest build/release/clox       Use an explicit interpreter
///     loxtest --dir suites --strict    Other root, non-zero exit on failure
///
/// ENVIRONMENT VARIABLES:
///     LOXTEST_EXECUTABLE        Interpreter path (same as the positional argument)
///     LOXTEST_TESTS_DIR         Fixture root
///     LOXTEST_SOURCE_EXTENSION  Source file extension (default: lox)
///     LOXTEST_EXECUTABLE_NAME   Interpreter name used by the search (default: clox)
///     LOXTEST_LOG               Log filter for diagnostics on stderr (default: warn)
///     NO_COLOR                  Set to disable colored output
#[derive(Parser, Debug)]
#[command(name = "loxtest")]
#[command(version, verbatim_doc_comment)]
struct Cli {
    /// Path to the interpreter under test
    #[arg(env = "LOXTEST_EXECUTABLE")]
    executable: Option<PathBuf>,

    /// Fixture root (default: tests, or harness.tests_dir from loxtest.toml)
    #[arg(long, short = 'd')]
    dir: Option<PathBuf>,

    /// Only run fixtures whose path contains this pattern
    #[arg(long, short = 'f')]
    filter: Option<String>,

    /// Disable colored output
    #[arg(long)]
    no_color: bool,

    /// Exit with status 1 when any test fails
    #[arg(long)]
    strict: bool,

    /// Use this loxtest.toml instead of searching parent directories
    #[arg(long, short = 'c')]
    config: Option<PathBuf>,
}

fn main() -> Result<()> {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) if matches!(e.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => e.exit(),
        Err(e) => {
            // Usage errors exit 1, not clap's default 2
            let _ = e.print();
            std::process::exit(1);
        }
    };

    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_env("LOXTEST_LOG")
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();

    let cli_config = config::Config::from_env();
    let args = commands::test::TestArgs {
        executable: cli.executable,
        dir: cli.dir,
        filter: cli.filter,
        no_color: cli.no_color,
        config: cli.config,
    };
    let summary = commands::test::run(args, &cli_config)?;

    // Failures only change the exit status when asked to
    if cli.strict && !summary.all_passed() {
        std::process::exit(1);
    }

    Ok(())
}
