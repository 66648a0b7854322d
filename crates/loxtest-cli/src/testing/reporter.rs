//! Test reporter - console output for discovery, execution and the summary

use crate::config::{Palette, Tone};
use loxtest_core::{
    compare_channel, ChannelReport, Diff, Discovery, Execution, GroupTally, RunSummary, TestCase,
};
use std::io::{self, Write};
use std::path::Path;

/// Writes the human-readable run report
pub struct TestReporter<W: Write> {
    out: W,
    palette: Palette,
}

impl<W: Write> TestReporter<W> {
    pub fn new(out: W, palette: Palette) -> Self {
        Self { out, palette }
    }

    #[cfg(test)]
    pub fn into_inner(self) -> W {
        self.out
    }

    fn paint(&self, tone: Tone, text: &str) -> String {
        self.palette.paint(tone, text)
    }

    // ------------------------------------------------------------------------
    // Executable search
    // ------------------------------------------------------------------------

    pub fn executable_not_specified(&mut self, name: &str) -> io::Result<()> {
        let line = self.paint(Tone::Detail, &format!("{} executable path not specified", name));
        writeln!(self.out, "{}", line)
    }

    pub fn searching(&mut self, pattern: &str) -> io::Result<()> {
        let line = self.paint(Tone::Detail, &format!("Searching in {}", pattern));
        write!(self.out, "{}. ", line)?;
        self.out.flush()
    }

    pub fn found_unique(&mut self, path: &Path) -> io::Result<()> {
        let line = self.paint(
            Tone::Success,
            &format!("Found executable at {}", path.display()),
        );
        writeln!(self.out, "{}.", line)
    }

    pub fn found_preferred(&mut self, path: &Path) -> io::Result<()> {
        let multiple = self.paint(Tone::Detail, "Found multiple matches. ");
        let taking = self.paint(Tone::Success, &format!("Taking {}", path.display()));
        writeln!(self.out, "{}{}.", multiple, taking)
    }

    pub fn found_fallback(&mut self, path: &Path, prefer: &str) -> io::Result<()> {
        let multiple = self.paint(Tone::Detail, "Found multiple matches. ");
        let taking = self.paint(
            Tone::Warn,
            &format!(
                "Could not find a {} executable, taking {}",
                prefer,
                path.display()
            ),
        );
        writeln!(self.out, "{}{}.", multiple, taking)
    }

    pub fn found_nothing(&mut self) -> io::Result<()> {
        writeln!(self.out)
    }

    // ------------------------------------------------------------------------
    // Discovery
    // ------------------------------------------------------------------------

    /// Warn about skipped fixtures and fixtures that feed stdin
    pub fn discovery_warnings(&mut self, discovery: &Discovery) -> io::Result<()> {
        for skipped in &discovery.skipped {
            let line = self.paint(
                Tone::Warn,
                &format!(
                    "{}. The test in {} will be skipped",
                    skipped.reason,
                    discovery.relative(&skipped.directory).display()
                ),
            );
            writeln!(self.out, "{}", line)?;
        }

        for case in discovery.cases().filter(|c| c.has_stdin()) {
            let line = self.paint(
                Tone::Warn,
                &format!(
                    "Reading from stdin is not yet supported for Lox (test in {})",
                    discovery.relative(&case.directory).display()
                ),
            );
            writeln!(self.out, "{}", line)?;
        }

        Ok(())
    }

    pub fn no_tests(&mut self) -> io::Result<()> {
        let line = self.paint(Tone::Warn, "No tests found.");
        writeln!(self.out, "{}", line)
    }

    // ------------------------------------------------------------------------
    // Execution
    // ------------------------------------------------------------------------

    pub fn group_header(&mut self, key: &str) -> io::Result<()> {
        let header = self.paint(Tone::Info, &format!("Group '{}'", key));
        writeln!(self.out, "{}:", header)
    }

    /// Report one finished case, with failure details when it failed
    pub fn case_result(&mut self, case: &TestCase, execution: &Execution) -> io::Result<()> {
        let name = case.name();
        if execution.passed {
            let line = self.paint(Tone::Success, &format!("Test '{}' passed", name));
            return writeln!(self.out, "  {}", line);
        }

        let line = self.paint(Tone::Error, &format!("Test '{}' failed", name));
        writeln!(self.out, "  {}", line)?;

        let stdout = compare_channel(case.expected_stdout.as_deref(), &execution.stdout);
        self.channel(&stdout, "stdout")?;
        let stderr = compare_channel(case.expected_stderr.as_deref(), &execution.stderr);
        self.channel(&stderr, "stderr")
    }

    fn channel(&mut self, report: &ChannelReport, name: &str) -> io::Result<()> {
        match report {
            ChannelReport::Mismatch { expected, diff } => {
                self.expected_block(expected, name)?;
                let label = self.paint(Tone::Detail, &format!("Found ({})", name));
                writeln!(self.out, "    {}:", label)?;
                let rendered = self.render_diff(diff);
                self.verbatim(&rendered)
            }
            ChannelReport::Missing { expected } => {
                self.expected_block(expected, name)?;
                let line = self.paint(Tone::Warn, &format!("Found nothing in {}", name));
                writeln!(self.out, "    {}", line)
            }
            ChannelReport::Unexpected { actual } => {
                let expected = self.paint(Tone::Error, &format!("Expected nothing ({})", name));
                writeln!(self.out, "    {}", expected)?;
                let label = self.paint(Tone::Detail, &format!("Found ({})", name));
                writeln!(self.out, "    {}:", label)?;
                self.verbatim(actual)
            }
            ChannelReport::Silent => Ok(()),
        }
    }

    fn expected_block(&mut self, expected: &str, name: &str) -> io::Result<()> {
        let label = self.paint(Tone::Error, &format!("Expected ({})", name));
        writeln!(self.out, "    {}:", label)?;
        self.verbatim(expected)
    }

    /// Write fixture or process text as-is, closing the line if it was left open
    fn verbatim(&mut self, text: &str) -> io::Result<()> {
        write!(self.out, "{}", text)?;
        if !text.is_empty() && !text.ends_with('\n') {
            writeln!(self.out)?;
        }
        Ok(())
    }

    /// Colour wrong spans, or bracket them when colour is off
    fn render_diff(&self, diff: &Diff) -> String {
        if !self.palette.is_enabled() {
            return diff.to_string();
        }
        diff.segments
            .iter()
            .map(|segment| {
                if segment.wrong {
                    self.paint(Tone::Highlight, &segment.text)
                } else {
                    segment.text.clone()
                }
            })
            .collect()
    }

    pub fn group_summary(&mut self, tally: &GroupTally) -> io::Result<()> {
        let header = self.paint(Tone::Info, &format!("Group '{}'", tally.key));
        let counts = self.counts(tally.passed, tally.failed, tally.total());
        writeln!(self.out, "{}: {}", header, counts)
    }

    pub fn run_summary(&mut self, summary: &RunSummary) -> io::Result<()> {
        let label = self.paint(Tone::Info, "Summary");
        let counts = self.counts(summary.passed(), summary.failed(), summary.total());
        writeln!(self.out)?;
        writeln!(self.out, "{}: {}", label, counts)
    }

    fn counts(&self, passed: usize, failed: usize, total: usize) -> String {
        let mut text = self.paint(Tone::Success, &format!("{}/{} passed", passed, total));
        if failed > 0 {
            text.push_str(", ");
            text.push_str(&self.paint(Tone::Error, &format!("{}/{} failed", failed, total)));
        }
        text
    }
}
