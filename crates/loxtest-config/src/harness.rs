//! Harness configuration file (loxtest.toml)

use crate::{ConfigError, ConfigResult};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Contents of loxtest.toml. Every key is optional.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(deny_unknown_fields)]
pub struct HarnessFile {
    /// Where fixtures live and how they are recognised
    #[serde(skip_serializing_if = "Option::is_none")]
    pub harness: Option<HarnessSection>,

    /// How to locate the interpreter under test
    #[serde(skip_serializing_if = "Option::is_none")]
    pub executable: Option<ExecutableSection>,
}

/// `[harness]` section
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(deny_unknown_fields)]
pub struct HarnessSection {
    /// Fixture root, relative to the directory holding loxtest.toml (default: "tests")
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tests_dir: Option<PathBuf>,

    /// Source file extension without the dot (default: "lox")
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_extension: Option<String>,
}

/// `[executable]` section
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(deny_unknown_fields)]
pub struct ExecutableSection {
    /// File name of the interpreter (default: "clox")
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// Glob patterns tried in order when no path is given
    #[serde(skip_serializing_if = "Option::is_none")]
    pub search: Option<Vec<String>>,

    /// Substring preferred among several matches (default: "release")
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prefer: Option<String>,
}

impl HarnessFile {
    /// Load harness configuration from a file
    pub fn load_from_file(path: &Path) -> ConfigResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                ConfigError::NotFound(path.to_path_buf())
            } else {
                ConfigError::IoError(e)
            }
        })?;

        let config: Self = toml::from_str(&content).map_err(|e| ConfigError::TomlParseError {
            file: path.to_path_buf(),
            error: e,
        })?;

        config.validate()?;
        Ok(config)
    }

    /// Validate the harness configuration
    pub fn validate(&self) -> ConfigResult<()> {
        if let Some(harness) = &self.harness {
            if let Some(ext) = &harness.source_extension {
                validate_extension(ext)?;
            }
        }

        if let Some(exe) = &self.executable {
            if let Some(name) = &exe.name {
                if name.trim().is_empty() {
                    return Err(invalid("executable.name", "name cannot be empty"));
                }
            }
            if let Some(patterns) = &exe.search {
                if patterns.iter().any(|p| p.trim().is_empty()) {
                    return Err(invalid(
                        "executable.search",
                        "search patterns cannot be empty",
                    ));
                }
            }
            if let Some(prefer) = &exe.prefer {
                if prefer.is_empty() {
                    return Err(invalid("executable.prefer", "prefer cannot be empty"));
                }
            }
        }

        Ok(())
    }

    pub fn tests_dir(&self) -> Option<&Path> {
        self.harness.as_ref().and_then(|h| h.tests_dir.as_deref())
    }

    pub fn source_extension(&self) -> Option<&str> {
        self.harness
            .as_ref()
            .and_then(|h| h.source_extension.as_deref())
    }

    pub fn executable_name(&self) -> Option<&str> {
        self.executable.as_ref().and_then(|e| e.name.as_deref())
    }

    pub fn search_patterns(&self) -> Option<&[String]> {
        self.executable.as_ref().and_then(|e| e.search.as_deref())
    }

    pub fn prefer(&self) -> Option<&str> {
        self.executable.as_ref().and_then(|e| e.prefer.as_deref())
    }

    pub(crate) fn harness_mut(&mut self) -> &mut HarnessSection {
        self.harness.get_or_insert_with(Default::default)
    }

    pub(crate) fn executable_mut(&mut self) -> &mut ExecutableSection {
        self.executable.get_or_insert_with(Default::default)
    }
}

/// Extensions are bare suffixes: no dot, no separators
pub(crate) fn validate_extension(ext: &str) -> ConfigResult<()> {
    if ext.is_empty() {
        return Err(invalid(
            "harness.source_extension",
            "extension cannot be empty",
        ));
    }
    if ext.contains(['.', '/', '\\']) {
        return Err(invalid(
            "harness.source_extension",
            &format!("'{}' must be a bare extension such as \"lox\"", ext),
        ));
    }
    Ok(())
}

fn invalid(field: &str, reason: &str) -> ConfigError {
    ConfigError::InvalidValue {
        field: field.to_string(),
        reason: reason.to_string(),
    }
}
