//! Test case model - one fixture directory, typed by file role

use std::path::{Path, PathBuf};

/// Role a file plays inside a fixture directory
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileRole {
    /// The program handed to the interpreter (`*.<ext>`)
    Source,
    /// Content fed to the interpreter's stdin (`in` / `input`)
    Stdin,
    /// Expected stdout (`out` / `output`)
    ExpectedStdout,
    /// Expected stderr (`error`)
    ExpectedStderr,
}

impl FileRole {
    /// Classify a file by name. Files with no role return `None` and are ignored.
    pub fn classify(file_name: &str, source_extension: &str) -> Option<FileRole> {
        match file_name {
            "out" | "output" => return Some(FileRole::ExpectedStdout),
            "in" | "input" => return Some(FileRole::Stdin),
            "error" => return Some(FileRole::ExpectedStderr),
            _ => {}
        }

        Path::new(file_name)
            .extension()
            .filter(|ext| *ext == source_extension)
            .map(|_| FileRole::Source)
    }
}

/// A single discovered fixture
///
/// Fully determined by its directory and never mutated after discovery.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TestCase {
    /// Leaf directory holding the fixture files
    pub directory: PathBuf,
    /// Content of the `in`/`input` file, if any
    pub stdin_content: Option<String>,
    /// Content of the `out`/`output` file, if any
    pub expected_stdout: Option<String>,
    /// Content of the `error` file, if any
    pub expected_stderr: Option<String>,
    /// The single source file passed to the interpreter
    pub source_path: PathBuf,
}

impl TestCase {
    /// Name shown in reports: the leaf directory name
    pub fn name(&self) -> String {
        self.directory
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.directory.display().to_string())
    }

    pub fn has_stdin(&self) -> bool {
        self.stdin_content.is_some()
    }
}

/// Fixtures sharing a parent directory
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TestGroup {
    /// Parent directory relative to the test root, `/`-separated, `.` for the root itself
    pub key: String,
    /// Cases sorted by directory path
    pub cases: Vec<TestCase>,
}

impl TestGroup {
    pub fn new(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            cases: Vec::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.cases.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cases.is_empty()
    }

    pub(crate) fn sort(&mut self) {
        self.cases.sort_by(|a, b| a.directory.cmp(&b.directory));
    }
}
