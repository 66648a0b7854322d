//! Loxtest Core - black-box fixture testing for interpreter executables
//!
//! This library provides the pieces the `loxtest` driver is assembled from:
//! - Fixture discovery (leaf directories become test cases)
//! - Execution of the interpreter under test and the pass/fail verdict
//! - Positional diffing used to explain failures
//! - Per-group and overall result aggregation

/// Loxtest core version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub mod diff;
pub mod discovery;
pub mod engine;
pub mod error;
pub mod fixture;
pub mod summary;

pub use diff::{compare_channel, render_diff, ChannelReport, Diff, DiffSegment};
pub use discovery::{discover, Discovery, DiscoveryOptions, SkipReason, SkippedFixture};
pub use engine::{verdict, Execution, TestRunner};
pub use error::{CoreError, CoreResult};
pub use fixture::{FileRole, TestCase, TestGroup};
pub use summary::{GroupTally, RunSummary};
