//! Console reporting for fixture runs

pub mod reporter;

pub use reporter::TestReporter;
