//! Fixture discovery - map a directory tree into typed test cases
//!
//! Only strict leaf directories (no subdirectories, at least one file) are
//! candidates, so suites can be nested into categories to any depth. Each
//! candidate's parent directory, relative to the root, is its group key.

use crate::error::{CoreError, CoreResult};
use crate::fixture::{FileRole, TestCase, TestGroup};
use std::collections::BTreeMap;
use std::fmt;
use std::fs;
use std::path::{Component, Path, PathBuf};
use tracing::{debug, trace, warn};
use walkdir::WalkDir;

/// Default extension of interpreter source files
pub const DEFAULT_SOURCE_EXTENSION: &str = "lox";

/// Knobs for discovery
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiscoveryOptions {
    /// Extension (without the dot) that marks the source file
    pub source_extension: String,
}

impl Default for DiscoveryOptions {
    fn default() -> Self {
        Self {
            source_extension: DEFAULT_SOURCE_EXTENSION.to_string(),
        }
    }
}

impl DiscoveryOptions {
    pub fn with_source_extension(mut self, extension: impl Into<String>) -> Self {
        self.source_extension = extension.into();
        self
    }
}

/// Why a leaf directory did not become a test case
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    /// More than one source file in the directory
    MultipleSources { extension: String },
    /// No source file in the directory
    MissingSource { extension: String },
    /// Neither `out`/`output` nor `error` present
    MissingExpectation,
    /// A fixture file could not be read as text
    Unreadable { file: PathBuf, message: String },
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::MultipleSources { extension } => {
                write!(f, "Cannot have more than one {} file for test", extension)
            }
            SkipReason::MissingSource { extension } => {
                write!(f, "No {} file was found", extension)
            }
            SkipReason::MissingExpectation => write!(f, "No output or error file was found"),
            SkipReason::Unreadable { file, message } => {
                write!(f, "Could not read {}: {}", file.display(), message)
            }
        }
    }
}

/// A leaf directory excluded from the run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedFixture {
    pub directory: PathBuf,
    pub reason: SkipReason,
}

/// Result of one discovery pass
#[derive(Debug, Clone, Default)]
pub struct Discovery {
    /// Root the tree was discovered from
    pub root: PathBuf,
    /// Groups keyed by parent directory, iterated in key order
    pub groups: BTreeMap<String, TestGroup>,
    /// Leaf directories that were excluded, in walk order
    pub skipped: Vec<SkippedFixture>,
}

impl Discovery {
    /// Total number of discovered cases across all groups
    pub fn case_count(&self) -> usize {
        self.groups.values().map(TestGroup::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.case_count() == 0
    }

    /// Path of `directory` relative to the discovery root, for display
    pub fn relative<'a>(&self, directory: &'a Path) -> &'a Path {
        directory.strip_prefix(&self.root).unwrap_or(directory)
    }

    /// Iterate over every case in report order
    pub fn cases(&self) -> impl Iterator<Item = &TestCase> {
        self.groups.values().flat_map(|g| g.cases.iter())
    }

    /// Keep only cases whose directory (relative to the root) contains `pattern`
    pub fn filter(&self, pattern: &str) -> Self {
        let groups = self
            .groups
            .iter()
            .filter_map(|(key, group)| {
                let cases: Vec<TestCase> = group
                    .cases
                    .iter()
                    .filter(|case| {
                        self.relative(&case.directory)
                            .to_string_lossy()
                            .contains(pattern)
                    })
                    .cloned()
                    .collect();
                if cases.is_empty() {
                    None
                } else {
                    Some((
                        key.clone(),
                        TestGroup {
                            key: key.clone(),
                            cases,
                        },
                    ))
                }
            })
            .collect();

        Discovery {
            root: self.root.clone(),
            groups,
            skipped: Vec::new(),
        }
    }
}

/// Discover every fixture under `root`
pub fn discover(root: &Path, options: &DiscoveryOptions) -> CoreResult<Discovery> {
    if !root.is_dir() {
        return Err(CoreError::RootNotFound(root.to_path_buf()));
    }

    let mut discovery = Discovery {
        root: root.to_path_buf(),
        ..Default::default()
    };

    for entry in WalkDir::new(root).follow_links(true) {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                warn!("skipping unreadable entry during discovery: {}", e);
                continue;
            }
        };
        if !entry.file_type().is_dir() {
            continue;
        }

        let directory = entry.path();
        let Some(files) = leaf_files(directory) else {
            trace!(dir = %directory.display(), "not a leaf, skipping");
            continue;
        };

        match make_case(directory, &files, options) {
            Ok(case) => {
                let key = group_key(root, directory);
                debug!(group = %key, dir = %directory.display(), "discovered fixture");
                discovery
                    .groups
                    .entry(key.clone())
                    .or_insert_with(|| TestGroup::new(key))
                    .cases
                    .push(case);
            }
            Err(reason) => {
                debug!(dir = %directory.display(), %reason, "skipping fixture");
                discovery.skipped.push(SkippedFixture {
                    directory: directory.to_path_buf(),
                    reason,
                });
            }
        }
    }

    for group in discovery.groups.values_mut() {
        group.sort();
    }

    Ok(discovery)
}

/// File names of `directory` if it is a leaf: no subdirectories, at least one file
fn leaf_files(directory: &Path) -> Option<Vec<String>> {
    let entries = match fs::read_dir(directory) {
        Ok(entries) => entries,
        Err(e) => {
            warn!(dir = %directory.display(), "cannot list directory: {}", e);
            return None;
        }
    };

    let mut files = Vec::new();
    for entry in entries.filter_map(Result::ok) {
        if entry.path().is_dir() {
            return None;
        }
        files.push(entry.file_name().to_string_lossy().into_owned());
    }

    if files.is_empty() {
        return None;
    }
    files.sort();
    Some(files)
}

/// Build a case from a leaf directory's files, or explain why it cannot be one
fn make_case(
    directory: &Path,
    files: &[String],
    options: &DiscoveryOptions,
) -> Result<TestCase, SkipReason> {
    let extension = &options.source_extension;

    let mut source = None;
    let mut stdin = None;
    let mut stdout = None;
    let mut stderr = None;

    for name in files {
        let slot = match FileRole::classify(name, extension) {
            Some(FileRole::Source) => {
                if source.is_some() {
                    return Err(SkipReason::MultipleSources {
                        extension: extension.clone(),
                    });
                }
                &mut source
            }
            Some(FileRole::Stdin) => &mut stdin,
            Some(FileRole::ExpectedStdout) => &mut stdout,
            Some(FileRole::ExpectedStderr) => &mut stderr,
            None => continue,
        };
        *slot = Some(directory.join(name));
    }

    if stdout.is_none() && stderr.is_none() {
        return Err(SkipReason::MissingExpectation);
    }
    let Some(source_path) = source else {
        return Err(SkipReason::MissingSource {
            extension: extension.clone(),
        });
    };

    Ok(TestCase {
        directory: directory.to_path_buf(),
        stdin_content: read_optional(stdin)?,
        expected_stdout: read_optional(stdout)?,
        expected_stderr: read_optional(stderr)?,
        source_path,
    })
}

/// Read a fixture file verbatim, trailing newline included
fn read_optional(path: Option<PathBuf>) -> Result<Option<String>, SkipReason> {
    path.map(|path| {
        fs::read_to_string(&path).map_err(|e| SkipReason::Unreadable {
            file: path,
            message: e.to_string(),
        })
    })
    .transpose()
}

/// Parent of `directory` relative to `root`, rendered with `/` separators
fn group_key(root: &Path, directory: &Path) -> String {
    let relative = directory
        .parent()
        .and_then(|parent| parent.strip_prefix(root).ok());

    let parts: Vec<String> = relative
        .map(|rel| {
            rel.components()
                .filter_map(|c| match c {
                    Component::Normal(part) => Some(part.to_string_lossy().into_owned()),
                    _ => None,
                })
                .collect()
        })
        .unwrap_or_default();

    if parts.is_empty() {
        ".".to_string()
    } else {
        parts.join("/")
    }
}
