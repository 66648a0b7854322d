//! Configuration Loader
//!
//! Handles loading loxtest.toml and applying environment overrides.

use crate::harness::{validate_extension, HarnessFile};
use crate::{ConfigResult, CONFIG_FILE_NAME};
use std::env;
use std::path::{Path, PathBuf};

/// Default fixture root
pub const DEFAULT_TESTS_DIR: &str = "tests";
/// Default source extension
pub const DEFAULT_SOURCE_EXTENSION: &str = "lox";
/// Default interpreter file name
pub const DEFAULT_EXECUTABLE_NAME: &str = "clox";
/// Default tie-breaker among several executable matches
pub const DEFAULT_PREFER: &str = "release";

/// Configuration loader
///
/// Sources, lowest priority first:
/// 1. Built-in defaults
/// 2. loxtest.toml (nearest one walking up from the start directory)
/// 3. Environment variables (LOXTEST_*)
/// 4. CLI flags - handled by caller
#[derive(Debug, Default)]
pub struct ConfigLoader;

/// Merged configuration result
#[derive(Debug, Clone, Default)]
pub struct Config {
    /// File configuration with environment overrides applied
    pub file: HarnessFile,

    /// Directory where loxtest.toml was found
    pub project_root: Option<PathBuf>,

    /// Fixture root from LOXTEST_TESTS_DIR, taken as given
    tests_dir_override: Option<PathBuf>,
}

impl ConfigLoader {
    pub fn new() -> Self {
        Self
    }

    /// Load configuration starting from the given directory
    ///
    /// Walks up the directory tree to find loxtest.toml. No file is not an
    /// error: defaults apply and there is no project root.
    pub fn load_from_directory(&self, start_dir: &Path) -> ConfigResult<Config> {
        let (project_root, file) = self.find_harness_file(start_dir)?;
        self.finish(file, project_root)
    }

    /// Load configuration from a specific loxtest.toml
    pub fn load_from_file(&self, config_path: &Path) -> ConfigResult<Config> {
        let file = HarnessFile::load_from_file(config_path)?;
        let project_root = config_path.parent().map(|p| p.to_path_buf());
        self.finish(file, project_root)
    }

    fn finish(&self, file: HarnessFile, project_root: Option<PathBuf>) -> ConfigResult<Config> {
        let mut config = Config {
            file,
            project_root,
            tests_dir_override: None,
        };
        self.apply_env_overrides(&mut config)?;
        config.file.validate()?;
        Ok(config)
    }

    /// Find loxtest.toml by walking up the directory tree
    fn find_harness_file(&self, start_dir: &Path) -> ConfigResult<(Option<PathBuf>, HarnessFile)> {
        let mut current = start_dir.to_path_buf();

        loop {
            let config_path = current.join(CONFIG_FILE_NAME);

            if config_path.exists() {
                let file = HarnessFile::load_from_file(&config_path)?;
                return Ok((Some(current), file));
            }

            match current.parent() {
                Some(parent) => current = parent.to_path_buf(),
                None => return Ok((None, HarnessFile::default())),
            }
        }
    }

    /// Apply environment variable overrides
    ///
    /// - LOXTEST_TESTS_DIR: fixture root, relative to the working directory
    /// - LOXTEST_SOURCE_EXTENSION: source file extension
    /// - LOXTEST_EXECUTABLE_NAME: interpreter file name used by the search
    fn apply_env_overrides(&self, config: &mut Config) -> ConfigResult<()> {
        if let Ok(dir) = env::var("LOXTEST_TESTS_DIR") {
            if !dir.is_empty() {
                config.tests_dir_override = Some(PathBuf::from(dir));
            }
        }

        if let Ok(ext) = env::var("LOXTEST_SOURCE_EXTENSION") {
            validate_extension(&ext)?;
            config.file.harness_mut().source_extension = Some(ext);
        }

        if let Ok(name) = env::var("LOXTEST_EXECUTABLE_NAME") {
            config.file.executable_mut().name = Some(name);
        }

        Ok(())
    }
}

impl Config {
    /// Fixture root
    ///
    /// Precedence: LOXTEST_TESTS_DIR, then `harness.tests_dir` resolved against
    /// the project root, then `tests` under the project root or working directory.
    pub fn tests_dir(&self) -> PathBuf {
        if let Some(dir) = &self.tests_dir_override {
            return dir.clone();
        }
        let dir = self
            .file
            .tests_dir()
            .unwrap_or_else(|| Path::new(DEFAULT_TESTS_DIR));
        match &self.project_root {
            Some(root) => root.join(dir),
            None => dir.to_path_buf(),
        }
    }

    pub fn source_extension(&self) -> &str {
        self.file
            .source_extension()
            .unwrap_or(DEFAULT_SOURCE_EXTENSION)
    }

    pub fn executable_name(&self) -> &str {
        self.file.executable_name().unwrap_or(DEFAULT_EXECUTABLE_NAME)
    }

    /// Glob patterns searched for the interpreter, in order
    pub fn search_patterns(&self) -> Vec<String> {
        match self.file.search_patterns() {
            Some(patterns) => patterns.to_vec(),
            None => default_search_patterns(self.executable_name()),
        }
    }

    pub fn prefer(&self) -> &str {
        self.file.prefer().unwrap_or(DEFAULT_PREFER)
    }

    pub fn project_root(&self) -> Option<&Path> {
        self.project_root.as_deref()
    }

    /// Check if a loxtest.toml was found
    pub fn is_project(&self) -> bool {
        self.project_root.is_some()
    }
}

/// The stock search: the current tree, a sibling build directory, then the parent tree
pub fn default_search_patterns(executable_name: &str) -> Vec<String> {
    vec![
        format!("./**/{}", executable_name),
        format!("../build/**/{}", executable_name),
        format!("../**/{}", executable_name),
    ]
}
