//! Locate the interpreter executable when no path is given
//!
//! Patterns are tried in order and the first one with any match decides.
//! Among several matches the first path containing the preferred marker
//! (normally "release") wins, otherwise the first match is taken.

use crate::testing::TestReporter;
use anyhow::{Context, Result};
use std::io::Write;
use std::path::PathBuf;
use tracing::debug;

/// Which rule picked the executable
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selection {
    /// The pattern matched exactly one file
    Unique(PathBuf),
    /// Several matches, one contained the preferred marker
    Preferred(PathBuf),
    /// Several matches, none preferred: the first one
    Fallback(PathBuf),
}

impl Selection {
    pub fn into_path(self) -> PathBuf {
        match self {
            Selection::Unique(p) | Selection::Preferred(p) | Selection::Fallback(p) => p,
        }
    }
}

/// Pick one executable from the matches of a single pattern
pub fn select(mut matches: Vec<PathBuf>, prefer: &str) -> Option<Selection> {
    match matches.len() {
        0 => None,
        1 => matches.pop().map(Selection::Unique),
        _ => {
            let preferred = matches
                .iter()
                .position(|p| p.to_string_lossy().contains(prefer));
            match preferred {
                Some(index) => Some(Selection::Preferred(matches.swap_remove(index))),
                None => Some(Selection::Fallback(matches.swap_remove(0))),
            }
        }
    }
}

/// Regular files matching a glob pattern, in glob order
pub fn search(pattern: &str) -> Result<Vec<PathBuf>> {
    let paths = glob::glob(pattern).with_context(|| format!("Invalid search pattern: {}", pattern))?;

    let mut matches = Vec::new();
    for entry in paths {
        match entry {
            Ok(path) if path.is_file() => matches.push(path),
            Ok(path) => debug!(path = %path.display(), "ignoring non-file match"),
            Err(e) => debug!("unreadable path during search: {}", e),
        }
    }
    Ok(matches)
}

/// Try each pattern in order, reporting progress, and return the chosen executable
pub fn locate<W: Write>(
    patterns: &[String],
    prefer: &str,
    reporter: &mut TestReporter<W>,
) -> Result<Option<PathBuf>> {
    for pattern in patterns {
        reporter.searching(pattern)?;
        let matches = search(pattern)?;
        debug!(pattern = %pattern, count = matches.len(), "searched for executable");

        let Some(selection) = select(matches, prefer) else {
            reporter.found_nothing()?;
            continue;
        };
        match &selection {
            Selection::Unique(path) => reporter.found_unique(path)?,
            Selection::Preferred(path) => reporter.found_preferred(path)?,
            Selection::Fallback(path) => reporter.found_fallback(path, prefer)?,
        }
        return Ok(Some(selection.into_path()));
    }
    Ok(None)
}
